//! Registered systems and system groups.

use crate::client::KatelloClient;
use crate::error::ApiResult;
use crate::models::{System, SystemGroup};

/// Server-side filter for system listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemFilter<'a> {
    /// Match the consumer UUID.
    Uuid(&'a str),
    /// Match the host name.
    Name(&'a str),
}

impl SystemFilter<'_> {
    fn query(self) -> [(&'static str, String); 1] {
        match self {
            Self::Uuid(uuid) => [("uuid", uuid.to_string())],
            Self::Name(name) => [("name", name.to_string())],
        }
    }
}

impl KatelloClient {
    /// Systems registered in `org`; `None` when the server answers 404.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures or non-404 error statuses.
    pub async fn systems_by_org(
        &self,
        org: &str,
        filter: SystemFilter<'_>,
    ) -> ApiResult<Option<Vec<System>>> {
        self.get_optional(&["api", "organizations", org, "systems"], &filter.query())
            .await
    }

    /// Systems registered to one environment; `None` when the server answers 404.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures or non-404 error statuses.
    pub async fn systems_by_env(
        &self,
        environment_id: i64,
        filter: SystemFilter<'_>,
    ) -> ApiResult<Option<Vec<System>>> {
        let environment = environment_id.to_string();
        self.get_optional(
            &["api", "environments", &environment, "systems"],
            &filter.query(),
        )
        .await
    }

    /// Full record of one system.
    ///
    /// # Errors
    ///
    /// Returns an error when the system does not exist or the request fails.
    pub async fn system(&self, uuid: &str) -> ApiResult<System> {
        self.get_json(&["api", "systems", uuid], &[]).await
    }

    /// System groups of `org` named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body cannot be decoded.
    pub async fn system_groups_by_name(
        &self,
        org: &str,
        name: &str,
    ) -> ApiResult<Vec<SystemGroup>> {
        self.get_json(
            &["api", "organizations", org, "system_groups"],
            &[("name", name.to_string())],
        )
        .await
    }
}
