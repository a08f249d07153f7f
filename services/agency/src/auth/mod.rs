//! Request authentication and authorization.
//!
//! # Purpose
//! Groups identity resolution, the per-request access gate, and the failure
//! taxonomy shared by both.
pub mod error;
pub mod gate;
pub mod resolver;

pub use error::AccessError;
pub use gate::AccessGate;
pub use resolver::IdentityResolver;
