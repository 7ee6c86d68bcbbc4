//! Name-to-record resolution for the Katello API.
//!
//! Katello addresses records by numeric id, operators by name. Every helper
//! here queries the server for candidates and applies the same policy:
//! - no candidate: [`LookupError::NotFound`] naming every identifier and the scope
//! - one candidate: the record, re-fetched when the listing is abridged
//! - several candidates: [`LookupError::Ambiguous`] with a hint on how to narrow
//!
//! Composite helpers chain simpler ones; a failure in an inner lookup aborts
//! the whole resolution.

use std::fmt::{self, Display, Formatter};

use crate::client::KatelloClient;
use crate::endpoints::systems::SystemFilter;
use crate::error::{LookupError, LookupResult, ResourceKind, Scope};
use crate::models::{
    Changeset, ContentView, ContentViewDefinition, Environment, Filter, Organization, Permission,
    Product, Provider, Repository, Role, SyncPlan, System, SystemGroup, Template, User,
};

/// Name of the root environment every organization carries.
pub const LIBRARY: &str = "Library";

const HINT_NARROW: &str = "use a more specific identifier";
const HINT_PRODUCT: &str = "recommend using product id; the product id may be retrieved using the 'product list' command";
const HINT_DEFINITION: &str = "recommend using label or id; these may be retrieved using the 'content definition list' command";
const HINT_REPOSITORY: &str = "recommend using the repository id";
const HINT_SYSTEM_UUID: &str = "use --uuid to specify the system";
const HINT_SYSTEM_ENVIRONMENT: &str = "you have to specify the environment";
const HINT_SYSTEM_UUID_MISMATCH: &str = "check the system uuid";

/// How a product is singled out within an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductSelector {
    /// Display name; not necessarily unique.
    Name(String),
    /// ASCII label.
    Label(String),
    /// Candlepin product id.
    Id(String),
}

impl ProductSelector {
    const fn parts(&self) -> (Option<&str>, Option<&str>, Option<&str>) {
        match self {
            Self::Name(name) => (Some(name.as_str()), None, None),
            Self::Label(label) => (None, Some(label.as_str()), None),
            Self::Id(id) => (None, None, Some(id.as_str())),
        }
    }
}

impl Display for ProductSelector {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => formatter.write_str(name),
            Self::Label(label) => write!(formatter, "label={label}"),
            Self::Id(id) => write!(formatter, "id={id}"),
        }
    }
}

/// How a content view definition is singled out within an organization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionSelector {
    /// ASCII label.
    Label(String),
    /// Display name; not necessarily unique.
    Name(String),
    /// Numeric id.
    Id(String),
}

impl DefinitionSelector {
    const fn parts(&self) -> (Option<&str>, Option<&str>, Option<&str>) {
        match self {
            Self::Label(label) => (Some(label.as_str()), None, None),
            Self::Name(name) => (None, Some(name.as_str()), None),
            Self::Id(id) => (None, None, Some(id.as_str())),
        }
    }
}

impl Display for DefinitionSelector {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Label(label) => formatter.write_str(label),
            Self::Name(name) => write!(formatter, "name={name}"),
            Self::Id(id) => write!(formatter, "id={id}"),
        }
    }
}

/// Identifiers available for a registered system.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SystemSelector {
    /// Host name.
    pub name: Option<String>,
    /// Environment the system is registered to.
    pub environment: Option<String>,
    /// Consumer UUID; takes precedence over name and environment.
    pub uuid: Option<String>,
}

impl Display for SystemSelector {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(name) = &self.name {
            parts.push(name.clone());
        }
        if let Some(uuid) = &self.uuid {
            parts.push(format!("uuid={uuid}"));
        }
        if parts.is_empty() {
            parts.push("<unspecified>".to_string());
        }
        formatter.write_str(&parts.join(", "))
    }
}

/// What is being resolved and where.
struct Target {
    kind: ResourceKind,
    identifier: String,
    scope: Scope,
}

impl Target {
    fn new(kind: ResourceKind, identifier: impl Display, scope: Scope) -> Self {
        Self {
            kind,
            identifier: identifier.to_string(),
            scope,
        }
    }

    fn not_found(self) -> LookupError {
        LookupError::NotFound {
            kind: self.kind,
            identifier: self.identifier,
            scope: self.scope,
        }
    }

    fn ambiguous(self, matches: usize, hint: &'static str) -> LookupError {
        LookupError::Ambiguous {
            kind: self.kind,
            identifier: self.identifier,
            scope: self.scope,
            matches,
            hint,
        }
    }

    fn exactly_one<T>(self, mut candidates: Vec<T>, hint: &'static str) -> LookupResult<T> {
        match candidates.len() {
            0 => Err(self.not_found()),
            1 => Ok(candidates.swap_remove(0)),
            matches => Err(self.ambiguous(matches, hint)),
        }
    }

    fn found<T>(self, candidate: Option<T>) -> LookupResult<T> {
        candidate.ok_or_else(|| self.not_found())
    }
}

/// Resolve an organization by name.
///
/// # Errors
///
/// [`LookupError::NotFound`] when the server does not know the organization.
pub async fn get_organization(client: &KatelloClient, org: &str) -> LookupResult<Organization> {
    let target = Target::new(ResourceKind::Organization, org, Scope::global());
    target.found(client.organization(org).await?)
}

/// Resolve an environment by name, or the Library environment when `env` is `None`.
///
/// # Errors
///
/// [`LookupError::NotFound`] or [`LookupError::Ambiguous`] per the module policy.
pub async fn get_environment(
    client: &KatelloClient,
    org: &str,
    env: Option<&str>,
) -> LookupResult<Environment> {
    let scope = Scope::organization(org);
    match env {
        Some(name) => Target::new(ResourceKind::Environment, name, scope)
            .exactly_one(client.environments_by_name(org, name).await?, HINT_NARROW),
        None => Target::new(ResourceKind::Environment, LIBRARY, scope)
            .exactly_one(client.library_environments(org).await?, HINT_NARROW),
    }
}

/// Resolve the Library environment of an organization.
///
/// # Errors
///
/// [`LookupError::NotFound`] when the organization has no Library.
pub async fn get_library(client: &KatelloClient, org: &str) -> LookupResult<Environment> {
    get_environment(client, org, None).await
}

/// Resolve a product by name, label or Candlepin id.
///
/// # Errors
///
/// [`LookupError::Ambiguous`] recommends the product id when a name matches
/// several products.
pub async fn get_product(
    client: &KatelloClient,
    org: &str,
    selector: &ProductSelector,
) -> LookupResult<Product> {
    let (name, label, cp_id) = selector.parts();
    let products = client.products_matching(org, name, label, cp_id).await?;
    Target::new(ResourceKind::Product, selector, Scope::organization(org))
        .exactly_one(products, HINT_PRODUCT)
}

/// Resolve a content view by label.
///
/// # Errors
///
/// [`LookupError::NotFound`] or [`LookupError::Ambiguous`] per the module policy.
pub async fn get_content_view(
    client: &KatelloClient,
    org: &str,
    label: &str,
) -> LookupResult<ContentView> {
    let views = client.content_views_by_label(org, label).await?;
    Target::new(ResourceKind::ContentView, label, Scope::organization(org))
        .exactly_one(views, HINT_NARROW)
}

/// Resolve a content view definition by label, name or id.
///
/// # Errors
///
/// [`LookupError::Ambiguous`] recommends label or id when a name matches
/// several definitions.
pub async fn get_cv_definition(
    client: &KatelloClient,
    org: &str,
    selector: &DefinitionSelector,
) -> LookupResult<ContentViewDefinition> {
    let (label, name, id) = selector.parts();
    let definitions = client.cv_definitions_matching(org, label, name, id).await?;
    Target::new(
        ResourceKind::ContentViewDefinition,
        selector,
        Scope::organization(org),
    )
    .exactly_one(definitions, HINT_DEFINITION)
}

/// Resolve a repository of a product inside an environment (Library when `env` is `None`).
///
/// The environment and product are resolved first; the matching repository
/// is re-fetched by id because listings omit detail fields.
///
/// # Errors
///
/// Any failure of the inner environment or product lookup, then
/// [`LookupError::NotFound`] or [`LookupError::Ambiguous`] for the repository.
pub async fn get_repo(
    client: &KatelloClient,
    org: &str,
    repo: &str,
    product: &ProductSelector,
    env: Option<&str>,
    include_disabled: bool,
) -> LookupResult<Repository> {
    let environment = get_environment(client, org, env).await?;
    let resolved = get_product(client, org, product).await?;

    let repos = client
        .repos_by_env_product(environment.id, resolved.id, Some(repo), include_disabled)
        .await?;
    let scope = Scope::organization(org)
        .with(ResourceKind::Product, product.to_string())
        .with(ResourceKind::Environment, environment.name);
    let found = Target::new(ResourceKind::Repository, repo, scope)
        .exactly_one(repos, HINT_REPOSITORY)?;
    Ok(client.repository(found.id).await?)
}

/// Resolve a provider by name.
///
/// # Errors
///
/// [`LookupError::NotFound`] or [`LookupError::Ambiguous`] per the module policy.
pub async fn get_provider(client: &KatelloClient, org: &str, name: &str) -> LookupResult<Provider> {
    let providers = client.providers_by_name(org, name).await?;
    Target::new(ResourceKind::Provider, name, Scope::organization(org))
        .exactly_one(providers, HINT_NARROW)
}

/// Resolve a system template inside an environment (Library when `env` is `None`).
///
/// # Errors
///
/// Any failure of the environment lookup, then the module policy for the template.
pub async fn get_template(
    client: &KatelloClient,
    org: &str,
    env: Option<&str>,
    name: &str,
) -> LookupResult<Template> {
    let environment = get_environment(client, org, env).await?;
    let templates = client.templates_by_name(environment.id, name).await?;
    let scope = Scope::organization(org).with(ResourceKind::Environment, environment.name);
    Target::new(ResourceKind::Template, name, scope).exactly_one(templates, HINT_NARROW)
}

/// Resolve a changeset inside an environment (Library when `env` is `None`).
///
/// # Errors
///
/// Any failure of the environment lookup, then the module policy for the changeset.
pub async fn get_changeset(
    client: &KatelloClient,
    org: &str,
    env: Option<&str>,
    name: &str,
) -> LookupResult<Changeset> {
    let environment = get_environment(client, org, env).await?;
    let changesets = client
        .changesets_by_name(org, environment.id, name)
        .await?;
    let scope = Scope::organization(org).with(ResourceKind::Environment, environment.name);
    Target::new(ResourceKind::Changeset, name, scope).exactly_one(changesets, HINT_NARROW)
}

/// Resolve a user by login.
///
/// # Errors
///
/// [`LookupError::NotFound`] or [`LookupError::Ambiguous`] per the module policy.
pub async fn get_user(client: &KatelloClient, username: &str) -> LookupResult<User> {
    let users = client.users_by_name(username).await?;
    Target::new(ResourceKind::User, username, Scope::global()).exactly_one(users, HINT_NARROW)
}

/// Resolve a user role by name.
///
/// # Errors
///
/// [`LookupError::NotFound`] or [`LookupError::Ambiguous`] per the module policy.
pub async fn get_role(client: &KatelloClient, name: &str) -> LookupResult<Role> {
    let roles = client.roles_by_name(name).await?;
    Target::new(ResourceKind::Role, name, Scope::global()).exactly_one(roles, HINT_NARROW)
}

/// Resolve a synchronization plan by name.
///
/// # Errors
///
/// [`LookupError::NotFound`] or [`LookupError::Ambiguous`] per the module policy.
pub async fn get_sync_plan(client: &KatelloClient, org: &str, name: &str) -> LookupResult<SyncPlan> {
    let plans = client.sync_plans_by_name(org, name).await?;
    Target::new(ResourceKind::SyncPlan, name, Scope::organization(org))
        .exactly_one(plans, HINT_NARROW)
}

/// Resolve a permission of a role; the role is resolved first.
///
/// # Errors
///
/// Any failure of the role lookup, then the module policy for the permission.
pub async fn get_permission(
    client: &KatelloClient,
    role: &str,
    name: &str,
) -> LookupResult<Permission> {
    let resolved = get_role(client, role).await?;
    let permissions = client.permissions_by_name(resolved.id, name).await?;
    let scope = Scope::global().with(ResourceKind::Role, role);
    Target::new(ResourceKind::Permission, name, scope).exactly_one(permissions, HINT_NARROW)
}

/// Resolve a package filter by name.
///
/// # Errors
///
/// [`LookupError::NotFound`] when the server does not know the filter.
pub async fn get_filter(client: &KatelloClient, org: &str, name: &str) -> LookupResult<Filter> {
    let target = Target::new(ResourceKind::Filter, name, Scope::organization(org));
    target.found(client.filter(org, name).await?)
}

/// Resolve a system group by name.
///
/// # Errors
///
/// [`LookupError::NotFound`] or [`LookupError::Ambiguous`] per the module policy.
pub async fn get_system_group(
    client: &KatelloClient,
    org: &str,
    name: &str,
) -> LookupResult<SystemGroup> {
    let groups = client.system_groups_by_name(org, name).await?;
    Target::new(ResourceKind::SystemGroup, name, Scope::organization(org))
        .exactly_one(groups, HINT_NARROW)
}

/// Resolve a registered system and return its full record.
///
/// The query depends on which identifiers were supplied:
/// - `uuid`: organization-wide by uuid; a 404 is not-found, any count other
///   than one (zero included) is ambiguous
/// - `name` only: organization-wide by name; a 404 or zero is not-found,
///   several is ambiguous
/// - `name` and `environment`: environment-wide by name; a 404 is not-found,
///   any count other than one (zero included) is ambiguous
///
/// # Errors
///
/// [`LookupError::NotFound`] or [`LookupError::Ambiguous`] as listed above.
pub async fn get_system(
    client: &KatelloClient,
    org: &str,
    selector: &SystemSelector,
) -> LookupResult<System> {
    let name = selector.name.as_deref().unwrap_or_default();
    let found = if let Some(uuid) = selector.uuid.as_deref() {
        let target = Target::new(ResourceKind::System, selector, Scope::organization(org));
        match client.systems_by_org(org, SystemFilter::Uuid(uuid)).await? {
            None => return Err(target.not_found()),
            Some(systems) if systems.len() != 1 => {
                return Err(target.ambiguous(systems.len(), HINT_SYSTEM_UUID_MISMATCH));
            }
            Some(mut systems) => systems.swap_remove(0),
        }
    } else if let Some(env) = selector.environment.as_deref() {
        let environment = get_environment(client, org, Some(env)).await?;
        let scope = Scope::organization(org).with(ResourceKind::Environment, env);
        let target = Target::new(ResourceKind::System, selector, scope);
        match client
            .systems_by_env(environment.id, SystemFilter::Name(name))
            .await?
        {
            None => return Err(target.not_found()),
            Some(systems) if systems.len() != 1 => {
                return Err(target.ambiguous(systems.len(), HINT_SYSTEM_ENVIRONMENT));
            }
            Some(mut systems) => systems.swap_remove(0),
        }
    } else {
        let target = Target::new(ResourceKind::System, selector, Scope::organization(org));
        let systems = client
            .systems_by_org(org, SystemFilter::Name(name))
            .await?
            .unwrap_or_default();
        target.exactly_one(systems, HINT_SYSTEM_UUID)?
    };

    Ok(client.system(&found.uuid).await?)
}
