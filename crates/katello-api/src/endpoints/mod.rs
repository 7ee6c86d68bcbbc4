//! One-call wrappers over Katello REST resources.
//!
//! Each submodule extends [`KatelloClient`](crate::KatelloClient) with the
//! methods for one resource family. Methods perform exactly one HTTP call and
//! return the decoded records untouched; disambiguation lives in
//! [`lookup`](crate::lookup).

pub mod accounts;
pub mod content;
pub mod organizations;
pub mod products;
pub mod repositories;
pub mod systems;

/// Push `(key, value)` onto a query when the value is present.
pub(crate) fn push_param(query: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(value) = value {
        query.push((key, value.to_string()));
    }
}
