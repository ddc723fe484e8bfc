//! System assembly: actor startup, wiring, and graceful shutdown.

pub mod error;
pub mod market_system;
pub mod tracing;

pub use error::*;
pub use market_system::*;
pub use self::tracing::*;
