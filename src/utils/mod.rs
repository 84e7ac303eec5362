//! Small helpers shared across layers.

pub mod serde_ext;
