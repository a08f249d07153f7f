//! Agency HTTP API module.
//!
//! # Purpose
//! Exposes route handler modules and the shared error and payload types.
//! Every protected handler calls the access gate before doing any work.
pub mod error;
pub mod existence;
pub mod permissions;
pub mod system;
pub mod types;
