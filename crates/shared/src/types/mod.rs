//! Common types used across the application.

pub mod id;
pub mod lifecycle;
pub mod pagination;

pub use id::*;
pub use lifecycle::RecordState;
pub use pagination::{PageMeta, PageRequest, PageResponse};
