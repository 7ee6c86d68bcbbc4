//! Command handlers grouped by resource.

pub(crate) mod discovery;
pub(crate) mod product;
