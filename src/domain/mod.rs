pub mod listing;
pub mod order;
pub mod session;
pub mod user;

pub use listing::*;
pub use order::*;
pub use session::*;
pub use user::*;
