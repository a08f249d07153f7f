//! Bulk existence checks over unique traveller fields.
pub mod filter;
pub mod reconciler;

pub use filter::{FilterConfig, ScalableBloomFilter};
pub use reconciler::{ExistenceReconciler, ExistenceResult};
