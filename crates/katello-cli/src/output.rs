//! Output renderers and formatting helpers for CLI commands.

use anyhow::anyhow;
use chrono::{DateTime, Local};
use katello_api::models::{Product, RepositorySet};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

/// Snapshot rendered by `product status`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct ProductStatusView<'a> {
    pub(crate) id: i64,
    pub(crate) name: &'a str,
    pub(crate) provider_id: Option<i64>,
    pub(crate) provider_name: Option<&'a str>,
    pub(crate) last_sync: Option<&'a str>,
    pub(crate) sync_state: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) progress: Option<String>,
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> CliResult<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))?;
    println!("{text}");
    Ok(())
}

pub(crate) fn render_product_list(
    header: &str,
    products: &[Product],
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(products)?,
        OutputFormat::Table => {
            println!("{header}");
            println!();
            println!(
                "{:<6} {:<24} {:<24} {:<11} {:<18} {:<16} {:<19} GPG key",
                "ID", "Name", "Label", "Provider ID", "Provider Name", "Sync Plan Name", "Last Sync"
            );
            for product in products {
                println!(
                    "{:<6} {:<24} {:<24} {:<11} {:<18} {:<16} {:<19} {}",
                    product.id,
                    product.name,
                    product.label,
                    display_id(product.provider_id),
                    display_text(product.provider_name.as_deref()),
                    display_text(product.sync_plan_name.as_deref()),
                    format_sync_time(product.last_sync.as_deref()),
                    display_text(product.gpg_key_name.as_deref()),
                );
            }
        }
    }
    Ok(())
}

pub(crate) fn render_product_status(
    status: &ProductStatusView<'_>,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(status)?,
        OutputFormat::Table => {
            println!("Product Status");
            println!();
            println!("ID:            {}", status.id);
            println!("Name:          {}", status.name);
            println!("Provider ID:   {}", display_id(status.provider_id));
            println!("Provider Name: {}", display_text(status.provider_name));
            println!("Last Sync:     {}", format_sync_time(status.last_sync));
            println!("Sync State:    {}", format_sync_state(status.sync_state));
            if let Some(progress) = &status.progress {
                println!("Progress:      {progress}");
            }
        }
    }
    Ok(())
}

pub(crate) fn render_repository_sets(
    product_name: &str,
    sets: &[RepositorySet],
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => print_json(sets)?,
        OutputFormat::Table => {
            println!("Repository Sets For Product [ {product_name} ]");
            println!();
            println!("{:<12} {:<60} Enabled?", "ID", "Name");
            for set in sets {
                println!(
                    "{:<12} {:<60} {}",
                    set.id,
                    set.name,
                    if set.katello_enabled { "true" } else { "false" }
                );
            }
        }
    }
    Ok(())
}

/// Render a last-sync timestamp in local time; `never` when absent.
#[must_use]
pub(crate) fn format_sync_time(value: Option<&str>) -> String {
    match value {
        None => "never".to_string(),
        Some(raw) if raw.trim().is_empty() => "never".to_string(),
        Some(raw) => DateTime::parse_from_rfc3339(raw).map_or_else(
            |_| raw.to_string(),
            |parsed| {
                parsed
                    .with_timezone(&Local)
                    .format("%Y/%m/%d %H:%M:%S")
                    .to_string()
            },
        ),
    }
}

/// Human label for a server sync state.
#[must_use]
pub(crate) fn format_sync_state(value: Option<&str>) -> String {
    let label = match value.unwrap_or("not_synced") {
        "not_synced" => "Not synced",
        "waiting" => "Waiting",
        "running" => "Running",
        "finished" => "Sync complete",
        "error" => "Error",
        "canceled" => "Canceled",
        "timed_out" => "Timed out",
        other => other,
    };
    label.to_string()
}

fn display_id(value: Option<i64>) -> String {
    value.map_or_else(String::new, |id| id.to_string())
}

fn display_text(value: Option<&str>) -> &str {
    value.unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_sync_time_handles_missing_and_raw_values() {
        assert_eq!(format_sync_time(None), "never");
        assert_eq!(format_sync_time(Some("  ")), "never");
        assert_eq!(format_sync_time(Some("yesterday")), "yesterday");
    }

    #[test]
    fn format_sync_time_renders_local_timestamp() {
        let raw = "2013-02-05T10:15:30Z";
        let expected = DateTime::parse_from_rfc3339(raw)
            .expect("valid timestamp")
            .with_timezone(&Local)
            .format("%Y/%m/%d %H:%M:%S")
            .to_string();
        assert_eq!(format_sync_time(Some(raw)), expected);
    }

    #[test]
    fn format_sync_state_maps_known_states() {
        assert_eq!(format_sync_state(None), "Not synced");
        assert_eq!(format_sync_state(Some("finished")), "Sync complete");
        assert_eq!(format_sync_state(Some("timed_out")), "Timed out");
        assert_eq!(format_sync_state(Some("paused")), "paused");
    }

    #[test]
    fn status_view_omits_progress_when_idle() {
        let view = ProductStatusView {
            id: 7,
            name: "Prod1",
            provider_id: Some(1),
            provider_name: Some("Custom"),
            last_sync: None,
            sync_state: Some("finished"),
            progress: None,
        };
        let json = serde_json::to_value(&view).expect("serializes");
        assert!(json.get("progress").is_none());
        assert_eq!(json["name"], "Prod1");
    }
}
