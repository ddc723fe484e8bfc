//! Typed handles onto the running actors.
//!
//! Every client is a cheap `Clone` around a channel sender. Request/response
//! plumbing lives in `macros`; methods that need extra care (credentials,
//! action result matching, shutdown) are written out by hand.

#[macro_use]
mod macros;

mod catalog_client;
mod identity_client;
mod order_client;
mod session_client;

pub use catalog_client::CatalogClient;
pub use identity_client::IdentityClient;
pub use order_client::OrderClient;
pub use session_client::SessionClient;
