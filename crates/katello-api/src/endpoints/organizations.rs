//! Organizations and lifecycle environments.

use crate::client::KatelloClient;
use crate::error::ApiResult;
use crate::models::{Environment, Organization};

impl KatelloClient {
    /// Fetch an organization by name; `None` when the server does not know it.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures or non-404 error statuses.
    pub async fn organization(&self, org: &str) -> ApiResult<Option<Organization>> {
        self.get_optional(&["api", "organizations", org], &[]).await
    }

    /// Environments of `org` whose name equals `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body cannot be decoded.
    pub async fn environments_by_name(&self, org: &str, name: &str) -> ApiResult<Vec<Environment>> {
        self.get_json(
            &["api", "organizations", org, "environments"],
            &[("name", name.to_string())],
        )
        .await
    }

    /// The Library environment(s) of `org`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body cannot be decoded.
    pub async fn library_environments(&self, org: &str) -> ApiResult<Vec<Environment>> {
        self.get_json(
            &["api", "organizations", org, "environments"],
            &[("library", "true".to_string())],
        )
        .await
    }
}
