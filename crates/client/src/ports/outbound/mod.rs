//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must
//! implement, so application services can talk to the backend without
//! depending on a concrete HTTP client.

pub mod api_port;
pub mod credentials;

pub use api_port::{ApiError, GameApiPort};
pub use credentials::BearerToken;

#[cfg(any(test, feature = "testing"))]
pub use api_port::MockGameApiPort;
