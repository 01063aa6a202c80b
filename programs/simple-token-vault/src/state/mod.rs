pub mod events;
pub mod user_deposit;
pub mod vault;

pub use events::*;
pub use user_deposit::*;
pub use vault::*;
