//! Repositories and URL discovery.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::client::KatelloClient;
use crate::error::ApiResult;
use crate::models::{Repository, TaskStatus};

/// Attributes of a repository to create inside a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewRepository {
    /// Owning organization name.
    pub organization_id: String,
    /// Owning product.
    pub product_id: i64,
    /// Display name.
    pub name: String,
    /// ASCII label.
    pub label: String,
    /// Feed URL.
    pub url: String,
    /// GPG key used to verify packages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpg_key_name: Option<String>,
    /// Publish over plain http in addition to https.
    pub unprotected: bool,
    /// Content type served by the feed.
    pub content_type: String,
}

impl KatelloClient {
    /// Repositories of a product inside one environment, optionally filtered by name.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body cannot be decoded.
    pub async fn repos_by_env_product(
        &self,
        environment_id: i64,
        product_id: i64,
        name: Option<&str>,
        include_disabled: bool,
    ) -> ApiResult<Vec<Repository>> {
        let environment = environment_id.to_string();
        let product = product_id.to_string();
        let mut query = vec![("include_disabled", include_disabled.to_string())];
        super::push_param(&mut query, "name", name);
        self.get_json(
            &[
                "api",
                "environments",
                &environment,
                "products",
                &product,
                "repositories",
            ],
            &query,
        )
        .await
    }

    /// Full record of one repository.
    ///
    /// # Errors
    ///
    /// Returns an error when the repository does not exist or the request fails.
    pub async fn repository(&self, repository_id: i64) -> ApiResult<Repository> {
        let id = repository_id.to_string();
        self.get_json(&["api", "repositories", &id], &[]).await
    }

    /// Create a repository.
    ///
    /// # Errors
    ///
    /// Returns an error when the server rejects the repository.
    pub async fn create_repository(&self, repository: &NewRepository) -> ApiResult<Repository> {
        self.send_json(Method::POST, &["api", "repositories"], Some(repository))
            .await
    }

    /// Start crawling `url` for repository roots; the task result lists the URLs found.
    ///
    /// # Errors
    ///
    /// Returns an error when the discovery cannot be submitted.
    pub async fn discover_repositories(&self, org: &str, url: &str) -> ApiResult<TaskStatus> {
        self.send_json(
            Method::POST,
            &["api", "organizations", org, "repositories", "discovery"],
            Some(&json!({ "url": url })),
        )
        .await
    }
}
