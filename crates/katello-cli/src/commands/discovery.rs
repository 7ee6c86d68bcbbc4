//! Repository discovery for `product create --url`.
//!
//! The server crawls the URL as an asynchronous task and reports the
//! repository roots it found; the operator picks which of them become
//! repositories of the new product.

use std::collections::BTreeSet;
use std::io::{BufRead, Write};

use anyhow::anyhow;
use katello_api::endpoints::repositories::NewRepository;
use katello_api::models::Product;
use katello_api::{AsyncTask, TaskOutcome};
use serde_json::Value;
use url::Url;

use crate::client::{AppContext, CliError, CliResult};

/// URL schemes the server can crawl.
pub(crate) const ALLOWED_URL_SCHEMES: &[&str] = &["http", "https", "ftp", "file"];

const CONTENT_TYPE_YUM: &str = "yum";
const SELECTION_PROMPT: &str = "Select repositories to create (all, none, or numbers such as 1,3-4): ";

/// Reject URLs the server cannot crawl.
pub(crate) fn validate_repo_url(raw: &str) -> CliResult<Url> {
    let url = raw
        .trim()
        .parse::<Url>()
        .map_err(|err| CliError::validation(format!("invalid URL '{raw}': {err}")))?;
    if ALLOWED_URL_SCHEMES.contains(&url.scheme()) {
        Ok(url)
    } else {
        Err(CliError::validation(format!(
            "URL scheme '{}' is not supported; use one of: {}",
            url.scheme(),
            ALLOWED_URL_SCHEMES.join(", ")
        )))
    }
}

/// Run discovery under `url` and return the repository URLs it found.
pub(crate) async fn discover_repositories(
    ctx: &AppContext,
    org: &str,
    url: &Url,
) -> CliResult<Vec<String>> {
    let submitted = ctx.api.discover_repositories(org, url.as_str()).await?;
    let task = ctx
        .api
        .wait_for_task(AsyncTask::single(submitted), ctx.poll_interval, |_| {})
        .await?;

    match task.outcome() {
        TaskOutcome::Ok => Ok(discovered_urls(task.result())),
        TaskOutcome::Failed => {
            let details = task.error_messages();
            let message = if details.is_empty() {
                format!("Repository discovery at [ {url} ] failed")
            } else {
                format!(
                    "Repository discovery at [ {url} ] failed: {}",
                    details.join("; ")
                )
            };
            Err(CliError::data(message))
        }
        TaskOutcome::Canceled => Err(CliError::data(format!(
            "Repository discovery at [ {url} ] canceled"
        ))),
    }
}

fn discovered_urls(result: Option<&Value>) -> Vec<String> {
    result
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

/// Parse an answer to the selection prompt into zero-based indices.
///
/// Accepts `all`/`a`, `none`/`n`/empty, or comma-separated 1-based numbers
/// and inclusive ranges.
pub(crate) fn parse_selection(input: &str, count: usize) -> Result<Vec<usize>, String> {
    let answer = input.trim().to_ascii_lowercase();
    match answer.as_str() {
        "all" | "a" => return Ok((0..count).collect()),
        "" | "none" | "n" => return Ok(Vec::new()),
        _ => {}
    }

    let mut selected = BTreeSet::new();
    for part in answer.split(',').map(str::trim).filter(|part| !part.is_empty()) {
        let (start, end) = match part.split_once('-') {
            Some((start, end)) => (parse_index(start, count)?, parse_index(end, count)?),
            None => {
                let index = parse_index(part, count)?;
                (index, index)
            }
        };
        if start > end {
            return Err(format!("invalid range '{part}'"));
        }
        selected.extend(start..=end);
    }
    Ok(selected.into_iter().collect())
}

fn parse_index(raw: &str, count: usize) -> Result<usize, String> {
    let number = raw
        .trim()
        .parse::<usize>()
        .map_err(|_| format!("'{}' is not a number", raw.trim()))?;
    if number == 0 || number > count {
        return Err(format!("{number} is out of range (1-{count})"));
    }
    Ok(number - 1)
}

/// Let the operator pick discovered URLs; `assume_yes` takes all of them.
///
/// End of input counts as selecting nothing.
pub(crate) fn select_repositories<R, W>(
    source: &Url,
    urls: &[String],
    assume_yes: bool,
    input: &mut R,
    out: &mut W,
) -> CliResult<Vec<String>>
where
    R: BufRead,
    W: Write,
{
    if assume_yes {
        return Ok(urls.to_vec());
    }

    let io_failure = |err: std::io::Error| CliError::failure(anyhow!("terminal I/O failed: {err}"));
    if urls.is_empty() {
        writeln!(out, "No repositories discovered @ [ {source} ]").map_err(io_failure)?;
        return Ok(Vec::new());
    }

    writeln!(out, "Repository Urls discovered @ [ {source} ]").map_err(io_failure)?;
    for (index, url) in urls.iter().enumerate() {
        writeln!(out, "{:>4}) {url}", index + 1).map_err(io_failure)?;
    }

    loop {
        write!(out, "{SELECTION_PROMPT}").map_err(io_failure)?;
        out.flush().map_err(io_failure)?;

        let mut answer = String::new();
        if input.read_line(&mut answer).map_err(io_failure)? == 0 {
            return Ok(Vec::new());
        }
        match parse_selection(&answer, urls.len()) {
            Ok(indices) => return Ok(indices.into_iter().map(|i| urls[i].clone()).collect()),
            Err(reason) => writeln!(out, "{reason}").map_err(io_failure)?,
        }
    }
}

/// Suffix derived from the path of a discovered URL.
fn url_suffix(url: &str) -> String {
    let path = Url::parse(url).map_or_else(|_| url.to_string(), |parsed| parsed.path().to_string());
    path.replace('/', "_").trim_end_matches('_').to_string()
}

/// Repository name for a discovered URL: product name plus the URL path.
#[must_use]
pub(crate) fn repo_name(product_name: &str, url: &str) -> String {
    format!("{product_name}{}", url_suffix(url))
}

/// Repository label for a discovered URL, limited to `[A-Za-z0-9_-]`.
#[must_use]
pub(crate) fn repo_label(product_label: &str, url: &str) -> String {
    format!("{product_label}{}", url_suffix(url))
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '_' || ch == '-' {
                ch
            } else {
                '_'
            }
        })
        .collect()
}

/// Create one repository per selected URL inside `product`.
pub(crate) async fn create_repositories<W: Write>(
    ctx: &AppContext,
    org: &str,
    product: &Product,
    urls: &[String],
    gpg_key_name: Option<&str>,
    unprotected: bool,
    out: &mut W,
) -> CliResult<()> {
    let label_base = if product.label.is_empty() {
        product.name.as_str()
    } else {
        product.label.as_str()
    };
    for url in urls {
        let repository = NewRepository {
            organization_id: org.to_string(),
            product_id: product.id,
            name: repo_name(&product.name, url),
            label: repo_label(label_base, url),
            url: url.clone(),
            gpg_key_name: gpg_key_name.map(str::to_string),
            unprotected,
            content_type: CONTENT_TYPE_YUM.to_string(),
        };
        tracing::debug!(name = %repository.name, url = %url, "creating repository");
        ctx.api.create_repository(&repository).await?;
        writeln!(out, "Successfully created repository [ {} ]", repository.name)
            .map_err(|err| CliError::failure(anyhow!("terminal I/O failed: {err}")))?;
    }
    Ok(())
}
