//! Typed records returned by the Katello API.
//!
//! Only the identifying and displayed fields are modelled; anything else the
//! server sends is ignored during decoding.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level tenant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Organization {
    /// Numeric identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// ASCII label used in URLs.
    #[serde(default)]
    pub label: Option<String>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Lifecycle environment inside an organization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Environment {
    /// Numeric identifier.
    pub id: i64,
    /// Display name (e.g. `Library`, `Dev`).
    pub name: String,
    /// ASCII label.
    #[serde(default)]
    pub label: Option<String>,
    /// Whether this is the organization's root environment.
    #[serde(default)]
    pub library: bool,
    /// Owning organization.
    #[serde(default)]
    pub organization_id: Option<i64>,
}

/// Logical grouping of repositories under a provider.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Product {
    /// Numeric identifier.
    pub id: i64,
    /// Candlepin identifier.
    #[serde(default)]
    pub cp_id: Option<String>,
    /// Display name.
    pub name: String,
    /// ASCII label.
    #[serde(default)]
    pub label: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Owning provider.
    #[serde(default)]
    pub provider_id: Option<i64>,
    /// Name of the owning provider.
    #[serde(default)]
    pub provider_name: Option<String>,
    /// Attached synchronization plan.
    #[serde(default)]
    pub sync_plan_id: Option<i64>,
    /// Name of the attached synchronization plan.
    #[serde(default)]
    pub sync_plan_name: Option<String>,
    /// Timestamp of the last synchronization.
    #[serde(default)]
    pub last_sync: Option<String>,
    /// State label of the last synchronization.
    #[serde(default)]
    pub sync_state: Option<String>,
    /// GPG key assigned to the product.
    #[serde(default)]
    pub gpg_key_name: Option<String>,
    /// Whether this is a marketing product.
    #[serde(default)]
    pub marketing_product: Option<bool>,
}

/// Repository inside a product and environment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Repository {
    /// Numeric identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// ASCII label.
    #[serde(default)]
    pub label: Option<String>,
    /// Whether the repository is enabled.
    #[serde(default)]
    pub enabled: Option<bool>,
    /// Feed URL.
    #[serde(default)]
    pub url: Option<String>,
    /// Owning product.
    #[serde(default)]
    pub product_id: Option<i64>,
    /// Environment holding this copy.
    #[serde(default)]
    pub environment_id: Option<i64>,
}

/// Upstream content source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Provider {
    /// Numeric identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Provider type (`Custom`, `Red Hat`).
    #[serde(default)]
    pub provider_type: Option<String>,
    /// Owning organization.
    #[serde(default)]
    pub organization_id: Option<i64>,
}

/// System template.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Template {
    /// Numeric identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Environment the template lives in.
    #[serde(default)]
    pub environment_id: Option<i64>,
}

/// Promotion or deletion changeset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Changeset {
    /// Numeric identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Lifecycle state (`new`, `promoted`, ...).
    #[serde(default)]
    pub state: Option<String>,
    /// Target environment.
    #[serde(default)]
    pub environment_id: Option<i64>,
}

/// User account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    /// Numeric identifier.
    pub id: i64,
    /// Login name.
    pub username: String,
    /// Contact address.
    #[serde(default)]
    pub email: Option<String>,
}

/// User role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Role {
    /// Numeric identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Synchronization plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SyncPlan {
    /// Numeric identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Recurrence (`hourly`, `daily`, `weekly`, `none`).
    #[serde(default)]
    pub interval: Option<String>,
    /// First synchronization date.
    #[serde(default)]
    pub sync_date: Option<String>,
}

/// Permission attached to a role.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Permission {
    /// Numeric identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Package filter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Filter {
    /// Numeric identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Filtered package names.
    #[serde(default)]
    pub package_list: Vec<String>,
}

/// Group of registered systems.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemGroup {
    /// Numeric identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Registered consumer system.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct System {
    /// Consumer UUID.
    pub uuid: String,
    /// Host name.
    pub name: String,
    /// Environment the system is registered to.
    #[serde(default)]
    pub environment_id: Option<i64>,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
}

/// Published content view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentView {
    /// Numeric identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// ASCII label.
    pub label: String,
}

/// Content view definition.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContentViewDefinition {
    /// Numeric identifier.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// ASCII label.
    pub label: String,
}

/// Red Hat repository set that can be enabled for a product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RepositorySet {
    /// Set identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Whether the set is enabled in Katello.
    #[serde(default)]
    pub katello_enabled: bool,
}

/// Lifecycle state of a server-side task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// Queued on the server.
    Waiting,
    /// Executing.
    Running,
    /// Completed successfully.
    Finished,
    /// Completed with an error.
    Error,
    /// Canceled before completion.
    Canceled,
    /// Abandoned after exceeding its time budget.
    TimedOut,
    /// State string this client does not recognise (e.g. `not_synced`).
    #[serde(other)]
    Unknown,
}

impl TaskState {
    /// Whether the task is still queued or executing.
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Waiting | Self::Running)
    }
}

/// Item and byte counters reported by long-running tasks.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskProgress {
    /// Items the task has to process.
    #[serde(default)]
    pub total_count: u64,
    /// Items still to process.
    #[serde(default)]
    pub items_left: u64,
    /// Bytes the task has to transfer.
    #[serde(default)]
    pub total_size: u64,
    /// Bytes still to transfer.
    #[serde(default)]
    pub size_left: u64,
    /// Error payloads reported by the task.
    #[serde(default)]
    pub error_details: Vec<Value>,
}

/// Snapshot of one server-side task.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskStatus {
    /// Task identifier used for polling.
    pub uuid: String,
    /// Current lifecycle state.
    pub state: TaskState,
    /// Progress counters, when the task reports them.
    #[serde(default)]
    pub progress: Option<TaskProgress>,
    /// Task result payload once finished.
    #[serde(default)]
    pub result: Option<Value>,
    /// Start timestamp.
    #[serde(default)]
    pub start_time: Option<String>,
    /// Finish timestamp.
    #[serde(default)]
    pub finish_time: Option<String>,
}

/// Response shape that is either one record or a list of them.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            Self::Many(items) => items,
            Self::One(item) => vec![item],
        }
    }
}
