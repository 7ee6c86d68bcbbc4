//! Handlers for the `product` verbs.
//!
//! Every handler resolves the names it was given before issuing its
//! mutating call, so a failed lookup leaves the server untouched.

use std::io::{self, BufRead, BufReader, IsTerminal, Write};

use anyhow::anyhow;
use katello_api::endpoints::products::{NewProduct, ProductUpdate};
use katello_api::lookup::{get_product, get_provider, get_sync_plan};
use katello_api::models::Product;
use katello_api::{AsyncTask, TaskOutcome};

use crate::cli::{
    ProductArgs, ProductCreateArgs, ProductListArgs, ProductSetPlanArgs, ProductUpdateArgs,
    RepoSetArgs,
};
use crate::client::{AppContext, CliError, CliResult};
use crate::commands::discovery::{
    create_repositories, discover_repositories, select_repositories, validate_repo_url,
};
use crate::output::{
    ProductStatusView, render_product_list, render_product_status, render_repository_sets,
};

/// Messages printed for each terminal state of a task.
struct TaskMessages {
    ok: String,
    failed: String,
    canceled: String,
}

async fn resolve_product(ctx: &AppContext, args: &ProductArgs) -> CliResult<Product> {
    let selector = args.selector()?;
    Ok(get_product(&ctx.api, &args.org, &selector).await?)
}

fn evaluate_task(task: &AsyncTask, messages: TaskMessages) -> CliResult<()> {
    match task.outcome() {
        TaskOutcome::Ok => {
            println!("{}", messages.ok);
            Ok(())
        }
        TaskOutcome::Failed => {
            for detail in task.error_messages() {
                tracing::warn!(error = %detail, "task reported an error");
            }
            Err(CliError::data(messages.failed))
        }
        TaskOutcome::Canceled => Err(CliError::data(messages.canceled)),
    }
}

/// `"<pct>% done (<done> of <total> packages downloaded)"`.
#[must_use]
pub(crate) fn sync_progress(task: &AsyncTask) -> String {
    format!(
        "{}% done ({} of {} packages downloaded)",
        task.percent_complete(),
        task.completed_count(),
        task.total_count()
    )
}

fn report_sync_progress(task: &AsyncTask) {
    let mut stderr = io::stderr();
    if stderr.is_terminal() {
        let _ = write!(stderr, "\r{}", sync_progress(task));
        if !task.is_running() {
            let _ = writeln!(stderr);
        }
    }
}

pub(crate) async fn handle_product_list(ctx: &AppContext, args: ProductListArgs) -> CliResult<()> {
    let (header, products) = match &args.provider {
        Some(provider_name) => {
            let provider = get_provider(&ctx.api, &args.org, provider_name).await?;
            let products = ctx.api.products_by_provider(provider.id, args.all).await?;
            (
                format!("Product List For Provider [ {provider_name} ]"),
                products,
            )
        }
        None => {
            let products = ctx.api.products_by_org(&args.org, args.all).await?;
            (
                format!("Product List For Organization {}", args.org),
                products,
            )
        }
    };
    render_product_list(&header, &products, ctx.output)
}

pub(crate) async fn handle_product_sync(ctx: &AppContext, args: ProductArgs) -> CliResult<()> {
    let product = resolve_product(ctx, &args).await?;

    let submitted = ctx.api.sync_product(&args.org, product.id).await?;
    let task = ctx
        .api
        .wait_for_task(
            AsyncTask::new(submitted),
            ctx.poll_interval,
            report_sync_progress,
        )
        .await?;

    evaluate_task(
        &task,
        TaskMessages {
            ok: format!("Product [ {} ] synchronized", product.name),
            failed: format!("Product [ {} ] failed to sync", product.name),
            canceled: format!("Product [ {} ] synchronization canceled", product.name),
        },
    )
}

pub(crate) async fn handle_product_cancel_sync(
    ctx: &AppContext,
    args: ProductArgs,
) -> CliResult<()> {
    let product = resolve_product(ctx, &args).await?;
    let message = ctx.api.cancel_product_sync(&args.org, product.id).await?;
    println!("{message}");
    Ok(())
}

pub(crate) async fn handle_product_status(ctx: &AppContext, args: ProductArgs) -> CliResult<()> {
    let product = resolve_product(ctx, &args).await?;
    let task = AsyncTask::new(ctx.api.product_sync_status(&args.org, product.id).await?);
    render_product_status(&status_view(&product, &task), ctx.output)
}

/// Status snapshot of `product`; progress is reported only while `task` runs.
pub(crate) fn status_view<'a>(product: &'a Product, task: &AsyncTask) -> ProductStatusView<'a> {
    ProductStatusView {
        id: product.id,
        name: &product.name,
        provider_id: product.provider_id,
        provider_name: product.provider_name.as_deref(),
        last_sync: product.last_sync.as_deref(),
        sync_state: product.sync_state.as_deref(),
        progress: task.is_running().then(|| sync_progress(task)),
    }
}

pub(crate) async fn handle_product_create(
    ctx: &AppContext,
    args: ProductCreateArgs,
) -> CliResult<()> {
    let mut input = BufReader::new(io::stdin());
    let mut out = io::stdout();
    create_product(ctx, args, &mut input, &mut out).await
}

/// Create a product and, unless disabled, the repositories discovered under `--url`.
pub(crate) async fn create_product<R, W>(
    ctx: &AppContext,
    args: ProductCreateArgs,
    input: &mut R,
    out: &mut W,
) -> CliResult<()>
where
    R: BufRead,
    W: Write,
{
    let name = args.name.trim();
    if name.is_empty() {
        return Err(CliError::validation("product name cannot be empty"));
    }
    let url = args.url.as_deref().map(validate_repo_url).transpose()?;

    let provider = get_provider(&ctx.api, &args.org, &args.provider).await?;
    let request = NewProduct {
        name: name.to_string(),
        label: args.label.clone(),
        description: args.description.clone(),
        gpg_key_name: args.gpgkey.clone(),
    };
    let product = ctx.api.create_product(provider.id, &request).await?;
    writeln!(out, "Successfully created product [ {name} ]")
        .map_err(|err| CliError::failure(anyhow!("terminal I/O failed: {err}")))?;

    let Some(url) = url else {
        return Ok(());
    };
    if args.nodisc {
        tracing::debug!(url = %url, "repository discovery skipped");
        return Ok(());
    }

    let discovered = discover_repositories(ctx, &args.org, &url).await?;
    let selected = select_repositories(&url, &discovered, args.assumeyes, input, out)?;
    create_repositories(
        ctx,
        &args.org,
        &product,
        &selected,
        args.gpgkey.as_deref(),
        args.unprotected,
        out,
    )
    .await
}

pub(crate) async fn handle_product_update(
    ctx: &AppContext,
    args: ProductUpdateArgs,
) -> CliResult<()> {
    let gpg_key_name = if args.nogpgkey {
        Some(String::new())
    } else {
        args.gpgkey.clone()
    };
    if args.description.is_none() && gpg_key_name.is_none() {
        return Err(CliError::validation(
            "nothing to update; pass --description, --gpgkey or --nogpgkey",
        ));
    }

    let product = resolve_product(ctx, &args.product).await?;
    let update = ProductUpdate {
        description: args.description.clone(),
        gpg_key_name,
        recursive: args.recursive.then_some(true),
    };
    let updated = ctx
        .api
        .update_product(&args.product.org, product.id, &update)
        .await?;
    println!("Successfully updated product [ {} ]", updated.name);
    Ok(())
}

pub(crate) async fn handle_product_delete(ctx: &AppContext, args: ProductArgs) -> CliResult<()> {
    let product = resolve_product(ctx, &args).await?;
    let message = ctx.api.delete_product(&args.org, product.id).await?;
    println!("{message}");
    Ok(())
}

pub(crate) async fn handle_product_set_plan(
    ctx: &AppContext,
    args: ProductSetPlanArgs,
) -> CliResult<()> {
    let org = &args.product.org;
    let product = resolve_product(ctx, &args.product).await?;
    let plan = get_sync_plan(&ctx.api, org, &args.plan).await?;

    let message = ctx
        .api
        .set_product_sync_plan(org, product.id, plan.id)
        .await?;
    println!("{message}");
    Ok(())
}

pub(crate) async fn handle_product_remove_plan(
    ctx: &AppContext,
    args: ProductArgs,
) -> CliResult<()> {
    let product = resolve_product(ctx, &args).await?;
    let message = ctx
        .api
        .remove_product_sync_plan(&args.org, product.id)
        .await?;
    println!("{message}");
    Ok(())
}

pub(crate) async fn handle_product_repo_sets(ctx: &AppContext, args: ProductArgs) -> CliResult<()> {
    let product = resolve_product(ctx, &args).await?;
    let mut sets = ctx.api.repository_sets(&args.org, product.id).await?;
    sets.sort_by(|left, right| left.name.cmp(&right.name));
    render_repository_sets(&product.name, &sets, ctx.output)
}

pub(crate) async fn handle_product_repo_set_toggle(
    ctx: &AppContext,
    args: RepoSetArgs,
    enable: bool,
) -> CliResult<()> {
    let org = &args.product.org;
    let set_name = &args.set_name;
    let product = resolve_product(ctx, &args.product).await?;

    let submitted = if enable {
        ctx.api
            .enable_repository_set(org, product.id, set_name)
            .await?
    } else {
        ctx.api
            .disable_repository_set(org, product.id, set_name)
            .await?
    };
    let task = ctx
        .api
        .wait_for_task(AsyncTask::single(submitted), ctx.poll_interval, |_| {})
        .await?;

    let (verb, done) = if enable {
        ("enable", "enabled")
    } else {
        ("disable", "disabled")
    };
    evaluate_task(
        &task,
        TaskMessages {
            ok: format!("Repository Set [ {set_name} ] {done}."),
            failed: format!("Repository {verb} [ {set_name} ] failed."),
            canceled: format!("Repository {verb} [ {set_name} ] canceled."),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::time::Duration;

    use httpmock::prelude::*;
    use katello_api::KatelloClient;
    use katello_api::models::TaskStatus;
    use reqwest::Client;
    use serde_json::json;

    use crate::cli::OutputFormat;

    fn context_with(server: &MockServer) -> AppContext {
        AppContext {
            api: KatelloClient::new(
                Client::new(),
                server.base_url().parse().expect("valid URL"),
                None,
            ),
            output: OutputFormat::Table,
            poll_interval: Duration::ZERO,
        }
    }

    fn by_name(name: &str) -> ProductArgs {
        ProductArgs {
            org: "ACME".into(),
            name: Some(name.into()),
            ..ProductArgs::default()
        }
    }

    fn mock_product_lookup(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/organizations/ACME/products")
                .query_param("name", "Zoo");
            then.status(200).json_body(json!([{
                "id": 7,
                "name": "Zoo",
                "label": "zoo",
                "provider_id": 3,
                "provider_name": "Custom"
            }]));
        });
    }

    fn mock_provider_lookup(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/organizations/ACME/providers")
                .query_param("name", "Custom");
            then.status(200).json_body(json!([{"id": 3, "name": "Custom"}]));
        });
    }

    fn create_args(url: Option<&str>) -> ProductCreateArgs {
        ProductCreateArgs {
            org: "ACME".into(),
            provider: "Custom".into(),
            name: "Zoo".into(),
            label: Some("zoo".into()),
            url: url.map(str::to_string),
            ..ProductCreateArgs::default()
        }
    }

    fn new_repository_body(name: &str, label: &str, url: &str) -> serde_json::Value {
        json!({
            "organization_id": "ACME",
            "product_id": 7,
            "name": name,
            "label": label,
            "url": url,
            "unprotected": false,
            "content_type": "yum"
        })
    }

    #[tokio::test]
    async fn sync_polls_until_finished() {
        let server = MockServer::start_async().await;
        mock_product_lookup(&server);
        let submit = server.mock(|when, then| {
            when.method(POST)
                .path("/api/organizations/ACME/products/7/sync");
            then.status(202).json_body(json!([
                {"uuid": "s-1", "state": "running", "progress": {"total_count": 4, "items_left": 4}}
            ]));
        });
        let poll = server.mock(|when, then| {
            when.method(GET).path("/api/tasks/s-1");
            then.status(200).json_body(json!({
                "uuid": "s-1",
                "state": "finished",
                "progress": {"total_count": 4, "items_left": 0}
            }));
        });

        let ctx = context_with(&server);
        handle_product_sync(&ctx, by_name("Zoo"))
            .await
            .expect("sync should succeed");
        submit.assert();
        poll.assert();
    }

    #[tokio::test]
    async fn sync_failure_maps_to_data_error() {
        let server = MockServer::start_async().await;
        mock_product_lookup(&server);
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/organizations/ACME/products/7/sync");
            then.status(202).json_body(json!({
                "uuid": "s-1",
                "state": "error",
                "progress": {"error_details": ["404 on repodata"]}
            }));
        });

        let ctx = context_with(&server);
        let err = handle_product_sync(&ctx, by_name("Zoo"))
            .await
            .expect_err("failed task should surface");
        assert_eq!(err.exit_code(), 65);
        assert_eq!(err.display_message(), "Product [ Zoo ] failed to sync");
    }

    #[tokio::test]
    async fn sync_canceled_reports_cancellation() {
        let server = MockServer::start_async().await;
        mock_product_lookup(&server);
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/organizations/ACME/products/7/sync");
            then.status(202)
                .json_body(json!([{"uuid": "s-1", "state": "canceled"}]));
        });

        let ctx = context_with(&server);
        let err = handle_product_sync(&ctx, by_name("Zoo"))
            .await
            .expect_err("canceled task should surface");
        assert_eq!(
            err.display_message(),
            "Product [ Zoo ] synchronization canceled"
        );
    }

    #[tokio::test]
    async fn missing_product_aborts_before_sync() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/organizations/ACME/products");
            then.status(200).json_body(json!([]));
        });
        let submit = server.mock(|when, then| {
            when.method(POST)
                .path("/api/organizations/ACME/products/7/sync");
            then.status(202).json_body(json!([]));
        });

        let ctx = context_with(&server);
        let err = handle_product_sync(&ctx, by_name("Zoo"))
            .await
            .expect_err("lookup failure should abort");
        assert_eq!(err.exit_code(), 65);
        assert!(err.display_message().contains("could not find product [ Zoo ]"));
        submit.assert_hits(0);
    }

    #[test]
    fn sync_progress_reports_integer_percentage() {
        let task: TaskStatus = serde_json::from_value(json!({
            "uuid": "s-1",
            "state": "running",
            "progress": {"total_count": 3, "items_left": 2}
        }))
        .expect("status decodes");
        assert_eq!(
            sync_progress(&AsyncTask::single(task)),
            "33% done (1 of 3 packages downloaded)"
        );
    }

    #[tokio::test]
    async fn status_reads_last_sync_task() {
        let server = MockServer::start_async().await;
        mock_product_lookup(&server);
        let status = server.mock(|when, then| {
            when.method(GET)
                .path("/api/organizations/ACME/products/7/sync");
            then.status(200).json_body(json!([
                {"uuid": "s-1", "state": "running", "progress": {"total_count": 10, "items_left": 5}}
            ]));
        });

        let ctx = context_with(&server);
        handle_product_status(&ctx, by_name("Zoo"))
            .await
            .expect("status should render");
        status.assert();
    }

    #[test]
    fn status_view_reports_progress_only_while_running() {
        let product: Product = serde_json::from_value(json!({
            "id": 7,
            "name": "Zoo",
            "label": "zoo",
            "provider_id": 3,
            "sync_state": "running"
        }))
        .expect("product decodes");
        let running: TaskStatus = serde_json::from_value(json!({
            "uuid": "s-1",
            "state": "running",
            "progress": {"total_count": 10, "items_left": 5}
        }))
        .expect("status decodes");
        let finished: TaskStatus = serde_json::from_value(json!({
            "uuid": "s-1",
            "state": "finished",
            "progress": {"total_count": 10, "items_left": 0}
        }))
        .expect("status decodes");

        let view = status_view(&product, &AsyncTask::single(running));
        assert_eq!(view.id, 7);
        assert_eq!(view.name, "Zoo");
        assert_eq!(view.sync_state, Some("running"));
        assert_eq!(
            view.progress.as_deref(),
            Some("50% done (5 of 10 packages downloaded)")
        );

        let view = status_view(&product, &AsyncTask::single(finished));
        assert_eq!(view.progress, None);
        assert!(status_view(&product, &AsyncTask::default()).progress.is_none());
    }

    #[tokio::test]
    async fn create_with_discovery_creates_every_url_when_assumed() {
        let server = MockServer::start_async().await;
        mock_provider_lookup(&server);
        let create = server.mock(|when, then| {
            when.method(POST)
                .path("/api/providers/3/product_create")
                .json_body(json!({"product": {"name": "Zoo", "label": "zoo"}}));
            then.status(200)
                .json_body(json!({"id": 7, "name": "Zoo", "label": "zoo"}));
        });
        let discovery = server.mock(|when, then| {
            when.method(POST)
                .path("/api/organizations/ACME/repositories/discovery")
                .json_body(json!({"url": "http://mirror.example/pub/"}));
            then.status(202)
                .json_body(json!({"uuid": "d-1", "state": "running"}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/api/tasks/d-1");
            then.status(200).json_body(json!({
                "uuid": "d-1",
                "state": "finished",
                "result": ["http://mirror.example/pub/el6/", "http://mirror.example/pub/el7/"]
            }));
        });
        let repos = server.mock(|when, then| {
            when.method(POST).path("/api/repositories");
            then.status(200)
                .json_body(json!({"id": 20, "name": "Zoo_pub_el6"}));
        });

        let ctx = context_with(&server);
        let mut args = create_args(Some("http://mirror.example/pub/"));
        args.assumeyes = true;
        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        create_product(&ctx, args, &mut input, &mut out)
            .await
            .expect("create should succeed");

        create.assert();
        discovery.assert();
        repos.assert_hits(2);
        let transcript = String::from_utf8(out).expect("utf8 output");
        assert!(transcript.contains("Successfully created product [ Zoo ]"));
        assert!(transcript.contains("Successfully created repository [ Zoo_pub_el6 ]"));
        assert!(transcript.contains("Successfully created repository [ Zoo_pub_el7 ]"));
    }

    #[tokio::test]
    async fn create_with_selection_creates_only_chosen_urls() {
        let server = MockServer::start_async().await;
        mock_provider_lookup(&server);
        server.mock(|when, then| {
            when.method(POST).path("/api/providers/3/product_create");
            then.status(200)
                .json_body(json!({"id": 7, "name": "Zoo", "label": "zoo"}));
        });
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/organizations/ACME/repositories/discovery");
            then.status(202).json_body(json!({
                "uuid": "d-1",
                "state": "finished",
                "result": ["http://mirror.example/pub/el6/", "http://mirror.example/pub/el7/"]
            }));
        });
        let chosen = server.mock(|when, then| {
            when.method(POST).path("/api/repositories").json_body(new_repository_body(
                "Zoo_pub_el7",
                "zoo_pub_el7",
                "http://mirror.example/pub/el7/",
            ));
            then.status(200)
                .json_body(json!({"id": 21, "name": "Zoo_pub_el7"}));
        });
        let skipped = server.mock(|when, then| {
            when.method(POST).path("/api/repositories").json_body(new_repository_body(
                "Zoo_pub_el6",
                "zoo_pub_el6",
                "http://mirror.example/pub/el6/",
            ));
            then.status(200)
                .json_body(json!({"id": 20, "name": "Zoo_pub_el6"}));
        });

        let ctx = context_with(&server);
        let mut input = Cursor::new(b"2\n".to_vec());
        let mut out = Vec::new();
        create_product(
            &ctx,
            create_args(Some("http://mirror.example/pub/")),
            &mut input,
            &mut out,
        )
        .await
        .expect("create should succeed");

        chosen.assert_hits(1);
        skipped.assert_hits(0);
    }

    #[tokio::test]
    async fn create_with_nodisc_skips_discovery() {
        let server = MockServer::start_async().await;
        mock_provider_lookup(&server);
        let create = server.mock(|when, then| {
            when.method(POST).path("/api/providers/3/product_create");
            then.status(200)
                .json_body(json!({"id": 7, "name": "Zoo", "label": "zoo"}));
        });
        let discovery = server.mock(|when, then| {
            when.method(POST)
                .path("/api/organizations/ACME/repositories/discovery");
            then.status(202)
                .json_body(json!({"uuid": "d-1", "state": "finished"}));
        });

        let ctx = context_with(&server);
        let mut args = create_args(Some("http://mirror.example/pub/"));
        args.nodisc = true;
        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        create_product(&ctx, args, &mut input, &mut out)
            .await
            .expect("create should succeed");

        create.assert();
        discovery.assert_hits(0);
    }

    #[tokio::test]
    async fn create_rejects_unsupported_scheme_before_any_call() {
        let server = MockServer::start_async().await;
        let provider = server.mock(|when, then| {
            when.method(GET).path("/api/organizations/ACME/providers");
            then.status(200).json_body(json!([{"id": 3, "name": "Custom"}]));
        });

        let ctx = context_with(&server);
        let mut input = Cursor::new(Vec::new());
        let mut out = Vec::new();
        let err = create_product(
            &ctx,
            create_args(Some("gopher://mirror.example/")),
            &mut input,
            &mut out,
        )
        .await
        .expect_err("unsupported scheme should fail");
        assert_eq!(err.exit_code(), 2);
        provider.assert_hits(0);
    }

    #[tokio::test]
    async fn update_sends_empty_key_for_nogpgkey() {
        let server = MockServer::start_async().await;
        mock_product_lookup(&server);
        let update = server.mock(|when, then| {
            when.method(PUT)
                .path("/api/organizations/ACME/products/7")
                .json_body(json!({"product": {"gpg_key_name": "", "recursive": true}}));
            then.status(200)
                .json_body(json!({"id": 7, "name": "Zoo", "label": "zoo"}));
        });

        let ctx = context_with(&server);
        let args = ProductUpdateArgs {
            product: by_name("Zoo"),
            nogpgkey: true,
            recursive: true,
            ..ProductUpdateArgs::default()
        };
        handle_product_update(&ctx, args)
            .await
            .expect("update should succeed");
        update.assert();
    }

    #[tokio::test]
    async fn update_without_changes_is_a_validation_error() {
        let server = MockServer::start_async().await;
        let lookup = server.mock(|when, then| {
            when.method(GET).path("/api/organizations/ACME/products");
            then.status(200).json_body(json!([]));
        });

        let ctx = context_with(&server);
        let args = ProductUpdateArgs {
            product: by_name("Zoo"),
            ..ProductUpdateArgs::default()
        };
        let err = handle_product_update(&ctx, args)
            .await
            .expect_err("empty update should fail");
        assert_eq!(err.exit_code(), 2);
        lookup.assert_hits(0);
    }

    #[tokio::test]
    async fn set_plan_requires_both_lookups_before_mutating() {
        let server = MockServer::start_async().await;
        mock_product_lookup(&server);
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/organizations/ACME/sync_plans")
                .query_param("name", "nightly");
            then.status(200).json_body(json!([]));
        });
        let attach = server.mock(|when, then| {
            when.method(POST)
                .path("/api/organizations/ACME/products/7/sync_plan");
            then.status(200).json_body(json!("Synchronization plan set"));
        });

        let ctx = context_with(&server);
        let args = ProductSetPlanArgs {
            product: by_name("Zoo"),
            plan: "nightly".into(),
        };
        let err = handle_product_set_plan(&ctx, args)
            .await
            .expect_err("missing plan should abort");
        assert!(err.display_message().contains("could not find sync plan [ nightly ]"));
        attach.assert_hits(0);
    }

    #[tokio::test]
    async fn set_plan_posts_plan_id() {
        let server = MockServer::start_async().await;
        mock_product_lookup(&server);
        server.mock(|when, then| {
            when.method(GET)
                .path("/api/organizations/ACME/sync_plans")
                .query_param("name", "nightly");
            then.status(200)
                .json_body(json!([{"id": 4, "name": "nightly"}]));
        });
        let attach = server.mock(|when, then| {
            when.method(POST)
                .path("/api/organizations/ACME/products/7/sync_plan")
                .json_body(json!({"plan_id": 4}));
            then.status(200).json_body(json!("Synchronization plan set"));
        });

        let ctx = context_with(&server);
        let args = ProductSetPlanArgs {
            product: by_name("Zoo"),
            plan: "nightly".into(),
        };
        handle_product_set_plan(&ctx, args)
            .await
            .expect("plan should attach");
        attach.assert();
    }

    #[tokio::test]
    async fn delete_and_remove_plan_call_their_endpoints() {
        let server = MockServer::start_async().await;
        mock_product_lookup(&server);
        let delete = server.mock(|when, then| {
            when.method(DELETE).path("/api/organizations/ACME/products/7");
            then.status(200).json_body(json!("Deleted product '7'"));
        });
        let detach = server.mock(|when, then| {
            when.method(DELETE)
                .path("/api/organizations/ACME/products/7/sync_plan");
            then.status(200).body("Synchronization plan removed");
        });

        let ctx = context_with(&server);
        handle_product_remove_plan(&ctx, by_name("Zoo"))
            .await
            .expect("plan removal should succeed");
        handle_product_delete(&ctx, by_name("Zoo"))
            .await
            .expect("delete should succeed");
        detach.assert();
        delete.assert();
    }

    #[tokio::test]
    async fn list_by_provider_resolves_provider_first() {
        let server = MockServer::start_async().await;
        mock_provider_lookup(&server);
        let listing = server.mock(|when, then| {
            when.method(GET)
                .path("/api/providers/3/products")
                .query_param("include_marketing", "false");
            then.status(200).json_body(json!([
                {"id": 7, "name": "Zoo", "label": "zoo", "last_sync": null}
            ]));
        });

        let ctx = context_with(&server);
        let args = ProductListArgs {
            org: "ACME".into(),
            provider: Some("Custom".into()),
            all: false,
        };
        handle_product_list(&ctx, args)
            .await
            .expect("listing should succeed");
        listing.assert();
    }

    #[tokio::test]
    async fn repo_set_enable_waits_for_task() {
        let server = MockServer::start_async().await;
        mock_product_lookup(&server);
        let enable = server.mock(|when, then| {
            when.method(POST)
                .path("/api/organizations/ACME/products/7/repository_sets/rhel-6-server/enable");
            then.status(202)
                .json_body(json!({"uuid": "e-1", "state": "waiting"}));
        });
        let poll = server.mock(|when, then| {
            when.method(GET).path("/api/tasks/e-1");
            then.status(200)
                .json_body(json!({"uuid": "e-1", "state": "finished"}));
        });

        let ctx = context_with(&server);
        let args = RepoSetArgs {
            product: by_name("Zoo"),
            set_name: "rhel-6-server".into(),
        };
        handle_product_repo_set_toggle(&ctx, args, true)
            .await
            .expect("enable should succeed");
        enable.assert();
        poll.assert();
    }

    #[tokio::test]
    async fn repo_set_disable_failure_names_the_set() {
        let server = MockServer::start_async().await;
        mock_product_lookup(&server);
        server.mock(|when, then| {
            when.method(POST)
                .path("/api/organizations/ACME/products/7/repository_sets/Extras/disable");
            then.status(202)
                .json_body(json!({"uuid": "e-1", "state": "error"}));
        });

        let ctx = context_with(&server);
        let args = RepoSetArgs {
            product: by_name("Zoo"),
            set_name: "Extras".into(),
        };
        let err = handle_product_repo_set_toggle(&ctx, args, false)
            .await
            .expect_err("failed task should surface");
        assert_eq!(err.display_message(), "Repository disable [ Extras ] failed.");
    }

    #[tokio::test]
    async fn repo_sets_are_listed() {
        let server = MockServer::start_async().await;
        mock_product_lookup(&server);
        let sets = server.mock(|when, then| {
            when.method(GET)
                .path("/api/organizations/ACME/products/7/repository_sets");
            then.status(200).json_body(json!([
                {"id": "2", "name": "Zeta", "katello_enabled": false},
                {"id": "1", "name": "Alpha", "katello_enabled": true}
            ]));
        });

        let ctx = context_with(&server);
        handle_product_repo_sets(&ctx, by_name("Zoo"))
            .await
            .expect("listing should succeed");
        sets.assert();
    }
}
