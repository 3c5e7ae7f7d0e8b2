use std::{process, sync::Arc};

use quillpost::{
    application::{
        content::{ContentClient, ContentClientConfig, ContentOutcome},
        error::AppError,
        render::render_body,
    },
    config::{self, Command, PostArgs, PostsArgs},
    infra::{
        telemetry,
        upstream::{HttpPostSource, HttpSourceConfig},
    },
};
use tracing::{Dispatch, Level, dispatcher, error, info};
use tracing_subscriber::fmt as tracing_fmt;

mod output;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        report_application_error(&error);
        process::exit(1);
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_writer(std::io::stderr)
        .with_max_level(Level::ERROR)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<(), AppError> {
    let (cli_args, settings) = config::load_with_cli()
        .map_err(|err| AppError::unexpected(format!("failed to load configuration: {err}")))?;

    telemetry::init(&settings.logging)?;
    let client = build_client(&settings)?;

    match cli_args.command {
        Command::Posts(args) => run_posts(&client, args).await,
        Command::Post(args) => run_post(&client, args).await,
        Command::Slugs(_) => run_slugs(&client).await,
    }
}

fn build_client(settings: &config::Settings) -> Result<ContentClient, AppError> {
    let source = HttpPostSource::new(HttpSourceConfig::from(&settings.content))?;

    info!(
        target = "quillpost::main",
        endpoint = %source.endpoint(),
        revalidate_secs = settings.content.revalidate.as_secs(),
        "content client ready"
    );

    Ok(ContentClient::new(
        ContentClientConfig::from(&settings.content),
        Arc::new(source),
    ))
}

async fn run_posts(client: &ContentClient, args: PostsArgs) -> Result<(), AppError> {
    let posts = ready(client.fetch_published().await)?;

    if args.json {
        output::print_json(&posts)
    } else {
        output::print_post_table(&posts);
        Ok(())
    }
}

async fn run_post(client: &ContentClient, args: PostArgs) -> Result<(), AppError> {
    if args.slug.trim().is_empty() {
        return Err(AppError::validation("slug must not be empty"));
    }

    let post = ready(client.find_by_slug(&args.slug).await)?
        .ok_or_else(|| AppError::not_found(&args.slug))?;

    if args.json {
        output::print_json(&post)
    } else if args.html {
        output::print_html(&render_body(&post.content).html);
        Ok(())
    } else {
        output::print_post_detail(&post);
        Ok(())
    }
}

async fn run_slugs(client: &ContentClient) -> Result<(), AppError> {
    let slugs = ready(client.fetch_slugs().await)?;
    output::print_lines(&slugs);
    Ok(())
}

/// Degraded outcomes become errors here: the binary exits non-zero instead of
/// printing an empty result.
fn ready<T>(outcome: ContentOutcome<T>) -> Result<T, AppError> {
    match outcome {
        ContentOutcome::Ready(value) => Ok(value),
        ContentOutcome::Degraded(error) => Err(AppError::Upstream(error)),
    }
}
