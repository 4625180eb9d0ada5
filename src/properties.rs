//! The format-independent audio properties view.

pub use crate::types::properties::FileProperties;
