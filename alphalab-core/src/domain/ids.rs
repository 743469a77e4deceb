//! Canonical integer ids.
//!
//! Both ids are positions in their index (`AssetIndex`, `DateIndex`), assigned
//! once at panel-build time and stable for the lifetime of a run.

/// Position of an asset in the asset index.
pub type AssetId = usize;

/// Position of a date in the ascending date index.
pub type DateId = usize;
