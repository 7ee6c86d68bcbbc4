//! Products, their synchronization and repository sets.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::push_param;
use crate::client::KatelloClient;
use crate::error::ApiResult;
use crate::models::{OneOrMany, Product, RepositorySet, TaskStatus};

/// Attributes of a product to create under a provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewProduct {
    /// Display name.
    pub name: String,
    /// ASCII label; generated by the server when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Free-form description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// GPG key inherited by new repositories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpg_key_name: Option<String>,
}

/// Attribute changes for an existing product.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProductUpdate {
    /// New description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New GPG key; an empty string detaches the current key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpg_key_name: Option<String>,
    /// Whether the key change also applies to the product's repositories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
}

#[derive(Serialize)]
struct ProductEnvelope<'a, T> {
    product: &'a T,
}

fn product_path<'a>(org: &'a str, id: &'a str, tail: &[&'a str]) -> Vec<&'a str> {
    let mut path = vec!["api", "organizations", org, "products", id];
    path.extend_from_slice(tail);
    path
}

impl KatelloClient {
    /// Products of `org` filtered by any combination of name, label and Candlepin id.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body cannot be decoded.
    pub async fn products_matching(
        &self,
        org: &str,
        name: Option<&str>,
        label: Option<&str>,
        cp_id: Option<&str>,
    ) -> ApiResult<Vec<Product>> {
        let mut query = Vec::new();
        push_param(&mut query, "name", name);
        push_param(&mut query, "label", label);
        push_param(&mut query, "cp_id", cp_id);
        self.get_json(&["api", "organizations", org, "products"], &query)
            .await
    }

    /// Every product of `org`; marketing products only when requested.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body cannot be decoded.
    pub async fn products_by_org(
        &self,
        org: &str,
        include_marketing: bool,
    ) -> ApiResult<Vec<Product>> {
        self.get_json(
            &["api", "organizations", org, "products"],
            &[("include_marketing", include_marketing.to_string())],
        )
        .await
    }

    /// Products served by one provider.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body cannot be decoded.
    pub async fn products_by_provider(
        &self,
        provider_id: i64,
        include_marketing: bool,
    ) -> ApiResult<Vec<Product>> {
        let provider = provider_id.to_string();
        self.get_json(
            &["api", "providers", &provider, "products"],
            &[("include_marketing", include_marketing.to_string())],
        )
        .await
    }

    /// Create a product under a provider.
    ///
    /// # Errors
    ///
    /// Returns an error when the server rejects the product.
    pub async fn create_product(
        &self,
        provider_id: i64,
        product: &NewProduct,
    ) -> ApiResult<Product> {
        let provider = provider_id.to_string();
        self.send_json(
            Method::POST,
            &["api", "providers", &provider, "product_create"],
            Some(&ProductEnvelope { product }),
        )
        .await
    }

    /// Update description and GPG key of a product.
    ///
    /// # Errors
    ///
    /// Returns an error when the server rejects the update.
    pub async fn update_product(
        &self,
        org: &str,
        product_id: i64,
        update: &ProductUpdate,
    ) -> ApiResult<Product> {
        let id = product_id.to_string();
        self.send_json(
            Method::PUT,
            &product_path(org, &id, &[]),
            Some(&ProductEnvelope { product: update }),
        )
        .await
    }

    /// Delete a product and its content.
    ///
    /// # Errors
    ///
    /// Returns an error when the server rejects the deletion.
    pub async fn delete_product(&self, org: &str, product_id: i64) -> ApiResult<String> {
        let id = product_id.to_string();
        self.send_message::<()>(Method::DELETE, &product_path(org, &id, &[]), None)
            .await
    }

    /// Start synchronizing every repository of a product.
    ///
    /// # Errors
    ///
    /// Returns an error when the sync cannot be submitted.
    pub async fn sync_product(&self, org: &str, product_id: i64) -> ApiResult<Vec<TaskStatus>> {
        let id = product_id.to_string();
        let tasks: OneOrMany<TaskStatus> = self
            .send_json::<(), _>(Method::POST, &product_path(org, &id, &["sync"]), None)
            .await?;
        Ok(tasks.into_vec())
    }

    /// Status of the most recent synchronization of a product.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body cannot be decoded.
    pub async fn product_sync_status(
        &self,
        org: &str,
        product_id: i64,
    ) -> ApiResult<Vec<TaskStatus>> {
        let id = product_id.to_string();
        let tasks: OneOrMany<TaskStatus> = self
            .get_json(&product_path(org, &id, &["sync"]), &[])
            .await?;
        Ok(tasks.into_vec())
    }

    /// Cancel the running synchronization of a product.
    ///
    /// # Errors
    ///
    /// Returns an error when the server rejects the cancellation.
    pub async fn cancel_product_sync(&self, org: &str, product_id: i64) -> ApiResult<String> {
        let id = product_id.to_string();
        self.send_message::<()>(Method::DELETE, &product_path(org, &id, &["sync"]), None)
            .await
    }

    /// Attach a synchronization plan to a product.
    ///
    /// # Errors
    ///
    /// Returns an error when the server rejects the plan.
    pub async fn set_product_sync_plan(
        &self,
        org: &str,
        product_id: i64,
        plan_id: i64,
    ) -> ApiResult<String> {
        let id = product_id.to_string();
        self.send_message(
            Method::POST,
            &product_path(org, &id, &["sync_plan"]),
            Some(&json!({ "plan_id": plan_id })),
        )
        .await
    }

    /// Detach the synchronization plan of a product.
    ///
    /// # Errors
    ///
    /// Returns an error when the server rejects the change.
    pub async fn remove_product_sync_plan(&self, org: &str, product_id: i64) -> ApiResult<String> {
        let id = product_id.to_string();
        self.send_message::<()>(
            Method::DELETE,
            &product_path(org, &id, &["sync_plan"]),
            None,
        )
        .await
    }

    /// Repository sets available to a Red Hat product.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body cannot be decoded.
    pub async fn repository_sets(
        &self,
        org: &str,
        product_id: i64,
    ) -> ApiResult<Vec<RepositorySet>> {
        let id = product_id.to_string();
        self.get_json(&product_path(org, &id, &["repository_sets"]), &[])
            .await
    }

    /// Submit enabling of a repository set; returns the server task.
    ///
    /// # Errors
    ///
    /// Returns an error when the server rejects the request.
    pub async fn enable_repository_set(
        &self,
        org: &str,
        product_id: i64,
        set: &str,
    ) -> ApiResult<TaskStatus> {
        self.toggle_repository_set(org, product_id, set, "enable")
            .await
    }

    /// Submit disabling of a repository set; returns the server task.
    ///
    /// # Errors
    ///
    /// Returns an error when the server rejects the request.
    pub async fn disable_repository_set(
        &self,
        org: &str,
        product_id: i64,
        set: &str,
    ) -> ApiResult<TaskStatus> {
        self.toggle_repository_set(org, product_id, set, "disable")
            .await
    }

    async fn toggle_repository_set(
        &self,
        org: &str,
        product_id: i64,
        set: &str,
        action: &str,
    ) -> ApiResult<TaskStatus> {
        let id = product_id.to_string();
        self.send_json::<(), _>(
            Method::POST,
            &product_path(org, &id, &["repository_sets", set, action]),
            None,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::tests::client_for;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn products_matching_sends_only_supplied_filters() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/organizations/ACME/products")
                .query_param("label", "ACME_Prod");
            then.status(200)
                .json_body(json!([{"id": 3, "name": "Prod", "label": "ACME_Prod"}]));
        });

        let client = client_for(&server);
        let products = client
            .products_matching("ACME", None, Some("ACME_Prod"), None)
            .await
            .expect("query succeeds");
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].label, "ACME_Prod");
        mock.assert();
    }

    #[tokio::test]
    async fn create_product_wraps_attributes() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/providers/4/product_create")
                .json_body(json!({
                    "product": {"name": "Fedora", "description": "upstream"}
                }));
            then.status(200)
                .json_body(json!({"id": 9, "name": "Fedora", "label": "Fedora"}));
        });

        let client = client_for(&server);
        let product = client
            .create_product(
                4,
                &NewProduct {
                    name: "Fedora".into(),
                    description: Some("upstream".into()),
                    ..NewProduct::default()
                },
            )
            .await
            .expect("create succeeds");
        assert_eq!(product.id, 9);
        mock.assert();
    }

    #[tokio::test]
    async fn sync_product_accepts_single_task_body() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/organizations/ACME/products/9/sync");
            then.status(202)
                .json_body(json!({"uuid": "t-1", "state": "waiting"}));
        });

        let client = client_for(&server);
        let tasks = client.sync_product("ACME", 9).await.expect("sync submits");
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].uuid, "t-1");
    }

    #[tokio::test]
    async fn delete_product_returns_server_message() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(DELETE).path("/api/organizations/ACME/products/9");
            then.status(200).body("\"Deleted product '9'\"");
        });

        let client = client_for(&server);
        let message = client.delete_product("ACME", 9).await.expect("delete succeeds");
        assert_eq!(message, "Deleted product '9'");
    }
}
