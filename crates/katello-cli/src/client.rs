//! Shared client utilities, error types, and request context for the CLI.

use std::fmt::{self, Display, Formatter};
use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::anyhow;
use katello_api::{ApiError, Credentials, HEADER_REQUEST_ID, KatelloClient, LookupError};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode};
use url::Url;

use crate::cli::{Cli, OutputFormat};

/// CLI-level error type separating usage mistakes, data problems and
/// operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
    Data(String),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) fn data(message: impl Into<String>) -> Self {
        Self::Data(message.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
            Self::Data(_) => 65,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) | Self::Data(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        match err.status() {
            Some(
                StatusCode::BAD_REQUEST | StatusCode::CONFLICT | StatusCode::UNPROCESSABLE_ENTITY,
            ) => Self::validation(err.to_string()),
            _ => Self::failure(err),
        }
    }
}

impl From<LookupError> for CliError {
    fn from(err: LookupError) -> Self {
        match err {
            LookupError::Api(api) => api.into(),
            other @ (LookupError::NotFound { .. } | LookupError::Ambiguous { .. }) => {
                Self::data(other.to_string())
            }
        }
    }
}

/// Application context passed to command handlers.
#[derive(Clone)]
pub(crate) struct AppContext {
    pub(crate) api: KatelloClient,
    pub(crate) output: OutputFormat,
    pub(crate) poll_interval: Duration,
}

impl AppContext {
    /// Construct the API client from global options.
    pub(crate) fn from_cli(cli: &Cli, trace_id: &str) -> CliResult<Self> {
        let http = build_http_client(cli.timeout, cli.insecure, trace_id)?;
        let credentials = resolve_credentials(cli.username.clone(), cli.password.clone())?;
        Ok(Self {
            api: KatelloClient::new(http, cli.server_url.clone(), credentials),
            output: cli.output,
            poll_interval: Duration::from_millis(cli.poll_interval_ms),
        })
    }
}

/// Build the HTTP client every request goes through.
pub(crate) fn build_http_client(
    timeout_secs: u64,
    insecure: bool,
    trace_id: &str,
) -> CliResult<Client> {
    let mut default_headers = HeaderMap::new();
    let request_id = HeaderValue::from_str(trace_id)
        .map_err(|_| CliError::failure(anyhow!("trace identifier contains invalid characters")))?;
    default_headers.insert(HEADER_REQUEST_ID, request_id);

    if insecure {
        tracing::warn!("TLS certificate verification disabled");
    }

    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .default_headers(default_headers)
        .danger_accept_invalid_certs(insecure)
        .build()
        .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))
}

/// Pair the username with a password, prompting on a terminal when the
/// password was not supplied.
pub(crate) fn resolve_credentials(
    username: Option<String>,
    password: Option<String>,
) -> CliResult<Option<Credentials>> {
    let Some(username) = username.map(|name| name.trim().to_string()) else {
        if password.is_some() {
            return Err(CliError::validation(
                "--password requires --username (or KATELLO_USERNAME)",
            ));
        }
        return Ok(None);
    };
    if username.is_empty() {
        return Err(CliError::validation("username cannot be empty"));
    }

    let password = match password {
        Some(password) => password,
        None if io::stdin().is_terminal() => {
            rpassword::prompt_password(format!("Password for {username}: ")).map_err(|err| {
                CliError::failure(anyhow!("failed to read password from stdin: {err}"))
            })?
        }
        None => {
            return Err(CliError::validation(
                "password required; supply via --password or KATELLO_PASSWORD when running non-interactively",
            ));
        }
    };

    Ok(Some(Credentials { username, password }))
}

/// Parse the server URL provided to the CLI.
pub(crate) fn parse_url(input: &str) -> Result<Url, String> {
    let url = input
        .parse::<Url>()
        .map_err(|err| format!("invalid URL '{input}': {err}"))?;
    if url.cannot_be_a_base() {
        return Err(format!("URL '{input}' cannot be used as a server root"));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use katello_api::{ResourceKind, Scope};

    #[test]
    fn exit_codes_follow_error_class() {
        assert_eq!(CliError::validation("bad").exit_code(), 2);
        assert_eq!(CliError::failure(anyhow!("boom")).exit_code(), 3);
        assert_eq!(CliError::data("missing").exit_code(), 65);
    }

    #[test]
    fn lookup_failures_become_data_errors() {
        let err: CliError = LookupError::NotFound {
            kind: ResourceKind::Product,
            identifier: "Prod1".into(),
            scope: Scope::organization("ACME"),
        }
        .into();
        assert_eq!(err.exit_code(), 65);
        assert_eq!(
            err.display_message(),
            "could not find product [ Prod1 ] within organization [ ACME ]"
        );
    }

    #[test]
    fn parse_url_rejects_non_base_urls() {
        assert!(parse_url("https://katello.example/katello/").is_ok());
        assert!(parse_url("mailto:admin@example.com").is_err());
        assert!(parse_url("not a url").is_err());
    }

    #[test]
    fn credentials_are_optional_and_paired() {
        assert!(matches!(resolve_credentials(None, None), Ok(None)));
        let creds = resolve_credentials(Some(" admin ".into()), Some("secret".into()))
            .expect("credentials resolve")
            .expect("credentials present");
        assert_eq!(creds.username, "admin");
        assert!(matches!(
            resolve_credentials(None, Some("secret".into())),
            Err(CliError::Validation(_))
        ));
    }

    #[test]
    fn http_client_rejects_invalid_trace_ids() {
        assert!(build_http_client(5, false, "trace-1").is_ok());
        assert!(matches!(
            build_http_client(5, false, "bad\ntrace"),
            Err(CliError::Failure(_))
        ));
    }
}
