//! Argument parsing and command dispatch.

use clap::{ArgGroup, Args, Parser, Subcommand, ValueEnum};
use katello_api::{DEFAULT_BASE_URL, ProductSelector};
use tracing::Instrument;
use url::Url;
use uuid::Uuid;

use crate::client::{AppContext, CliError, CliResult, parse_url};
use crate::commands::product::{
    handle_product_cancel_sync, handle_product_create, handle_product_delete,
    handle_product_list, handle_product_remove_plan, handle_product_repo_set_toggle,
    handle_product_repo_sets, handle_product_set_plan, handle_product_status,
    handle_product_sync, handle_product_update,
};
use crate::logging::init_logging;

const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

/// Parses CLI arguments, executes the requested command, and reports the
/// outcome. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();
    if let Err(err) = init_logging(cli.verbose) {
        eprintln!("warning: {err:#}");
    }

    let command_name = command_label(&cli.command);
    let trace_id = Uuid::new_v4().to_string();
    let span = tracing::info_span!("command", command = command_name, trace_id = %trace_id);

    let result = dispatch(cli, &trace_id).instrument(span).await;

    match result {
        Ok(()) => {
            tracing::debug!(command = command_name, "command succeeded");
            0
        }
        Err(err) => {
            let exit_code = err.exit_code();
            eprintln!("error: {}", err.display_message());
            tracing::debug!(command = command_name, exit_code, "command failed");
            exit_code
        }
    }
}

async fn dispatch(cli: Cli, trace_id: &str) -> CliResult<()> {
    let ctx = AppContext::from_cli(&cli, trace_id)?;

    match cli.command {
        Command::Product(product) => match product {
            ProductCommand::List(args) => handle_product_list(&ctx, args).await,
            ProductCommand::Sync(args) => handle_product_sync(&ctx, args).await,
            ProductCommand::CancelSync(args) => handle_product_cancel_sync(&ctx, args).await,
            ProductCommand::Status(args) => handle_product_status(&ctx, args).await,
            ProductCommand::Create(args) => handle_product_create(&ctx, args).await,
            ProductCommand::Update(args) => handle_product_update(&ctx, args).await,
            ProductCommand::Delete(args) => handle_product_delete(&ctx, args).await,
            ProductCommand::SetPlan(args) => handle_product_set_plan(&ctx, args).await,
            ProductCommand::RemovePlan(args) => handle_product_remove_plan(&ctx, args).await,
            ProductCommand::ListRepoSets(args) => handle_product_repo_sets(&ctx, args).await,
            ProductCommand::EnableRepoSet(args) => {
                handle_product_repo_set_toggle(&ctx, args, true).await
            }
            ProductCommand::DisableRepoSet(args) => {
                handle_product_repo_set_toggle(&ctx, args, false).await
            }
        },
    }
}

#[derive(Parser)]
#[command(name = "katello", about = "Command-line client for the Katello content server")]
pub(crate) struct Cli {
    #[arg(
        id = "server_url",
        long = "server",
        global = true,
        env = "KATELLO_URL",
        value_parser = parse_url,
        default_value = DEFAULT_BASE_URL,
        help = "Katello server root"
    )]
    pub(crate) server_url: Url,
    #[arg(short = 'u', long, global = true, env = "KATELLO_USERNAME")]
    pub(crate) username: Option<String>,
    #[arg(
        short = 'p',
        long,
        global = true,
        env = "KATELLO_PASSWORD",
        hide_env_values = true
    )]
    pub(crate) password: Option<String>,
    #[arg(
        long,
        global = true,
        env = "KATELLO_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    pub(crate) timeout: u64,
    #[arg(
        long = "poll-interval-ms",
        global = true,
        env = "KATELLO_POLL_INTERVAL_MS",
        default_value_t = DEFAULT_POLL_INTERVAL_MS,
        help = "Delay between task status polls"
    )]
    pub(crate) poll_interval_ms: u64,
    #[arg(long, global = true, help = "Accept invalid TLS certificates")]
    pub(crate) insecure: bool,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    pub(crate) output: OutputFormat,
    #[arg(short = 'v', long, global = true, help = "Log request details to stderr")]
    pub(crate) verbose: bool,
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    #[command(subcommand, about = "Product specific actions")]
    Product(ProductCommand),
}

#[derive(Subcommand)]
pub(crate) enum ProductCommand {
    #[command(about = "List known products")]
    List(ProductListArgs),
    #[command(about = "Synchronize a product")]
    Sync(ProductArgs),
    #[command(name = "cancel_sync", about = "Cancel currently running synchronization")]
    CancelSync(ProductArgs),
    #[command(about = "Status of product's synchronization")]
    Status(ProductArgs),
    #[command(about = "Create a new product with one or more repositories")]
    Create(ProductCreateArgs),
    #[command(about = "Update a product's attributes")]
    Update(ProductUpdateArgs),
    #[command(about = "Delete a product")]
    Delete(ProductArgs),
    #[command(name = "set_plan", about = "Set a synchronization plan")]
    SetPlan(ProductSetPlanArgs),
    #[command(name = "remove_plan", about = "Remove a synchronization plan")]
    RemovePlan(ProductArgs),
    #[command(name = "list_repo_sets", about = "List repository sets for a Red Hat product")]
    ListRepoSets(ProductArgs),
    #[command(name = "enable_repo_set", about = "Enable a repository set for a Red Hat product")]
    EnableRepoSet(RepoSetArgs),
    #[command(name = "disable_repo_set", about = "Disable a repository set for a Red Hat product")]
    DisableRepoSet(RepoSetArgs),
}

/// Organization plus exactly one product identifier.
#[derive(Args, Clone, Debug, Default)]
#[command(group(ArgGroup::new("product_selector").required(true).args(["name", "label", "id"])))]
pub(crate) struct ProductArgs {
    #[arg(long, help = "Organization name")]
    pub(crate) org: String,
    #[arg(long, help = "Product name")]
    pub(crate) name: Option<String>,
    #[arg(long, help = "Product label")]
    pub(crate) label: Option<String>,
    #[arg(long, help = "Product id")]
    pub(crate) id: Option<String>,
}

impl ProductArgs {
    pub(crate) fn selector(&self) -> CliResult<ProductSelector> {
        match (&self.name, &self.label, &self.id) {
            (Some(name), None, None) => Ok(ProductSelector::Name(name.clone())),
            (None, Some(label), None) => Ok(ProductSelector::Label(label.clone())),
            (None, None, Some(id)) => Ok(ProductSelector::Id(id.clone())),
            _ => Err(CliError::validation(
                "exactly one of --name, --label or --id is required",
            )),
        }
    }
}

#[derive(Args, Clone, Debug, Default)]
pub(crate) struct ProductListArgs {
    #[arg(long, help = "Organization name")]
    pub(crate) org: String,
    #[arg(long, help = "Limit the listing to one provider")]
    pub(crate) provider: Option<String>,
    #[arg(long, help = "Include marketing products")]
    pub(crate) all: bool,
}

#[derive(Args, Clone, Debug, Default)]
pub(crate) struct ProductCreateArgs {
    #[arg(long, help = "Organization name")]
    pub(crate) org: String,
    #[arg(long, help = "Provider name")]
    pub(crate) provider: String,
    #[arg(long, help = "Product name")]
    pub(crate) name: String,
    #[arg(long, help = "Product label; generated from the name when absent")]
    pub(crate) label: Option<String>,
    #[arg(long)]
    pub(crate) description: Option<String>,
    #[arg(long, help = "Repository URL to discover repositories under")]
    pub(crate) url: Option<String>,
    #[arg(long, help = "Skip discovery and create no repositories")]
    pub(crate) nodisc: bool,
    #[arg(long, help = "Create every discovered repository without prompting")]
    pub(crate) assumeyes: bool,
    #[arg(long, help = "GPG key used by every new repository")]
    pub(crate) gpgkey: Option<String>,
    #[arg(long, help = "Publish discovered repositories over HTTP")]
    pub(crate) unprotected: bool,
}

#[derive(Args, Clone, Debug, Default)]
pub(crate) struct ProductUpdateArgs {
    #[command(flatten)]
    pub(crate) product: ProductArgs,
    #[arg(long)]
    pub(crate) description: Option<String>,
    #[arg(long, conflicts_with = "nogpgkey", help = "Assign a GPG key")]
    pub(crate) gpgkey: Option<String>,
    #[arg(long, help = "Detach the current GPG key")]
    pub(crate) nogpgkey: bool,
    #[arg(long, help = "Apply the GPG key change to the product's repositories")]
    pub(crate) recursive: bool,
}

#[derive(Args, Clone, Debug, Default)]
pub(crate) struct ProductSetPlanArgs {
    #[command(flatten)]
    pub(crate) product: ProductArgs,
    #[arg(long, help = "Synchronization plan name")]
    pub(crate) plan: String,
}

#[derive(Args, Clone, Debug, Default)]
pub(crate) struct RepoSetArgs {
    #[command(flatten)]
    pub(crate) product: ProductArgs,
    #[arg(long = "set_name", help = "Repository set name")]
    pub(crate) set_name: String,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

pub(crate) const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Product(product) => match product {
            ProductCommand::List(_) => "product_list",
            ProductCommand::Sync(_) => "product_sync",
            ProductCommand::CancelSync(_) => "product_cancel_sync",
            ProductCommand::Status(_) => "product_status",
            ProductCommand::Create(_) => "product_create",
            ProductCommand::Update(_) => "product_update",
            ProductCommand::Delete(_) => "product_delete",
            ProductCommand::SetPlan(_) => "product_set_plan",
            ProductCommand::RemovePlan(_) => "product_remove_plan",
            ProductCommand::ListRepoSets(_) => "product_list_repo_sets",
            ProductCommand::EnableRepoSet(_) => "product_enable_repo_set",
            ProductCommand::DisableRepoSet(_) => "product_disable_repo_set",
        },
    }
}
