//! Error types for API calls and name resolution.
//!
//! # Design
//!
//! - `ApiError` covers transport, status and decoding failures of a single call.
//! - `LookupError` is the resolution layer's closed set of outcomes; it carries
//!   the resource kind, the identifier that was tried and the enclosing scope so
//!   callers can branch on the variant instead of parsing message text.

use std::fmt::{self, Display, Formatter};

use reqwest::StatusCode;
use thiserror::Error;

/// Result alias for single API calls.
pub type ApiResult<T> = Result<T, ApiError>;

/// Result alias for resolution helpers.
pub type LookupResult<T> = Result<T, LookupError>;

/// Failures raised while talking to the Katello server.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The configured base URL cannot carry path segments.
    #[error("base URL '{base}' cannot be used for API requests")]
    InvalidBaseUrl {
        /// Offending base URL.
        base: String,
    },
    /// The request never produced a response.
    #[error("request to {path} failed")]
    Transport {
        /// API path that was requested.
        path: String,
        /// Underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-success status.
    #[error("{message} (status {status})")]
    Status {
        /// API path that was requested.
        path: String,
        /// HTTP status returned by the server.
        status: StatusCode,
        /// Message extracted from the error body.
        message: String,
    },
    /// The response body did not match the expected record shape.
    #[error("failed to decode response from {path}")]
    Decode {
        /// API path that was requested.
        path: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status attached to the error, when the server responded.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Kinds of records the resolution layer can look up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Top-level tenant.
    Organization,
    /// Lifecycle environment inside an organization.
    Environment,
    /// Product grouping repositories.
    Product,
    /// Repository inside a product and environment.
    Repository,
    /// Upstream content provider.
    Provider,
    /// System template.
    Template,
    /// Promotion or deletion changeset.
    Changeset,
    /// User account.
    User,
    /// User role.
    Role,
    /// Synchronization plan.
    SyncPlan,
    /// Permission attached to a role.
    Permission,
    /// Package filter.
    Filter,
    /// Group of registered systems.
    SystemGroup,
    /// Registered consumer system.
    System,
    /// Published content view.
    ContentView,
    /// Content view definition.
    ContentViewDefinition,
}

impl ResourceKind {
    /// Human-readable label used in messages.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Organization => "organization",
            Self::Environment => "environment",
            Self::Product => "product",
            Self::Repository => "repository",
            Self::Provider => "provider",
            Self::Template => "template",
            Self::Changeset => "changeset",
            Self::User => "user",
            Self::Role => "user role",
            Self::SyncPlan => "sync plan",
            Self::Permission => "permission",
            Self::Filter => "filter",
            Self::SystemGroup => "system group",
            Self::System => "system",
            Self::ContentView => "content view",
            Self::ContentViewDefinition => "content view definition",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Parent records a lookup was confined to, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    entries: Vec<(ResourceKind, String)>,
}

impl Scope {
    /// Scope covering the whole server.
    #[must_use]
    pub const fn global() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Scope limited to one organization.
    #[must_use]
    pub fn organization(name: &str) -> Self {
        Self::global().with(ResourceKind::Organization, name)
    }

    /// Narrow the scope by another parent record.
    #[must_use]
    pub fn with(mut self, kind: ResourceKind, name: impl Into<String>) -> Self {
        self.entries.push((kind, name.into()));
        self
    }

    /// Name recorded for `kind`, if the scope includes it.
    #[must_use]
    pub fn get(&self, kind: ResourceKind) -> Option<&str> {
        self.entries
            .iter()
            .find(|(entry, _)| *entry == kind)
            .map(|(_, name)| name.as_str())
    }
}

impl Display for Scope {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        for (index, (kind, name)) in self.entries.iter().enumerate() {
            let joiner = if index == 0 { " within" } else { "," };
            write!(formatter, "{joiner} {kind} [ {name} ]")?;
        }
        Ok(())
    }
}

/// Outcome of a failed name-to-record resolution.
#[derive(Debug, Error)]
pub enum LookupError {
    /// No record matched the supplied identifiers.
    #[error("could not find {kind} [ {identifier} ]{scope}")]
    NotFound {
        /// Kind of record that was looked up.
        kind: ResourceKind,
        /// Identifiers supplied by the caller.
        identifier: String,
        /// Parent records the lookup was confined to.
        scope: Scope,
    },
    /// The identifiers did not single out one record.
    #[error("ambiguous {kind} [ {identifier} ]{scope}: {matches} records matched; {hint}")]
    Ambiguous {
        /// Kind of record that was looked up.
        kind: ResourceKind,
        /// Identifiers supplied by the caller.
        identifier: String,
        /// Parent records the lookup was confined to.
        scope: Scope,
        /// Number of records the server returned.
        matches: usize,
        /// How to narrow the lookup.
        hint: &'static str,
    },
    /// The server could not be queried.
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl LookupError {
    /// Kind of record the failed lookup targeted, when known.
    #[must_use]
    pub const fn kind(&self) -> Option<ResourceKind> {
        match self {
            Self::NotFound { kind, .. } | Self::Ambiguous { kind, .. } => Some(*kind),
            Self::Api(_) => None,
        }
    }
}
