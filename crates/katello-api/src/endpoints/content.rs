//! Providers, sync plans, content views, templates, changesets and filters.

use super::push_param;
use crate::client::KatelloClient;
use crate::error::ApiResult;
use crate::models::{
    Changeset, ContentView, ContentViewDefinition, Filter, Provider, SyncPlan, Template,
};

impl KatelloClient {
    /// Providers of `org` named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body cannot be decoded.
    pub async fn providers_by_name(&self, org: &str, name: &str) -> ApiResult<Vec<Provider>> {
        self.get_json(
            &["api", "organizations", org, "providers"],
            &[("name", name.to_string())],
        )
        .await
    }

    /// Synchronization plans of `org` named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body cannot be decoded.
    pub async fn sync_plans_by_name(&self, org: &str, name: &str) -> ApiResult<Vec<SyncPlan>> {
        self.get_json(
            &["api", "organizations", org, "sync_plans"],
            &[("name", name.to_string())],
        )
        .await
    }

    /// Content views of `org` labelled `label`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body cannot be decoded.
    pub async fn content_views_by_label(
        &self,
        org: &str,
        label: &str,
    ) -> ApiResult<Vec<ContentView>> {
        self.get_json(
            &["api", "organizations", org, "content_views"],
            &[("label", label.to_string())],
        )
        .await
    }

    /// Content view definitions of `org` filtered by any of label, name and id.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body cannot be decoded.
    pub async fn cv_definitions_matching(
        &self,
        org: &str,
        label: Option<&str>,
        name: Option<&str>,
        id: Option<&str>,
    ) -> ApiResult<Vec<ContentViewDefinition>> {
        let mut query = Vec::new();
        push_param(&mut query, "label", label);
        push_param(&mut query, "name", name);
        push_param(&mut query, "id", id);
        self.get_json(
            &["api", "organizations", org, "content_view_definitions"],
            &query,
        )
        .await
    }

    /// Templates of an environment named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body cannot be decoded.
    pub async fn templates_by_name(
        &self,
        environment_id: i64,
        name: &str,
    ) -> ApiResult<Vec<Template>> {
        let environment = environment_id.to_string();
        self.get_json(
            &["api", "environments", &environment, "templates"],
            &[("name", name.to_string())],
        )
        .await
    }

    /// Changesets of an environment named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body cannot be decoded.
    pub async fn changesets_by_name(
        &self,
        org: &str,
        environment_id: i64,
        name: &str,
    ) -> ApiResult<Vec<Changeset>> {
        let environment = environment_id.to_string();
        self.get_json(
            &[
                "api",
                "organizations",
                org,
                "environments",
                &environment,
                "changesets",
            ],
            &[("name", name.to_string())],
        )
        .await
    }

    /// A package filter by name; `None` when the server does not know it.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures or non-404 error statuses.
    pub async fn filter(&self, org: &str, name: &str) -> ApiResult<Option<Filter>> {
        self.get_optional(&["api", "organizations", org, "filters", name], &[])
            .await
    }
}
