//! Users, roles and permissions.

use crate::client::KatelloClient;
use crate::error::ApiResult;
use crate::models::{Permission, Role, User};

impl KatelloClient {
    /// Users whose login equals `username`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body cannot be decoded.
    pub async fn users_by_name(&self, username: &str) -> ApiResult<Vec<User>> {
        self.get_json(&["api", "users"], &[("username", username.to_string())])
            .await
    }

    /// Roles named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body cannot be decoded.
    pub async fn roles_by_name(&self, name: &str) -> ApiResult<Vec<Role>> {
        self.get_json(&["api", "roles"], &[("name", name.to_string())])
            .await
    }

    /// Permissions of a role named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error when the request fails or the body cannot be decoded.
    pub async fn permissions_by_name(&self, role_id: i64, name: &str) -> ApiResult<Vec<Permission>> {
        let role = role_id.to_string();
        self.get_json(
            &["api", "roles", &role, "permissions"],
            &[("name", name.to_string())],
        )
        .await
    }
}
