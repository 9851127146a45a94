mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use babylog_core::db;
use babylog_core::llm::{OpenAiClient, OpenAiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
use babylog_core::PostgresActivityLog;
use clap::{Args, Parser, Subcommand};
use state::AppState;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Babylog activity logging API server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP API server
    Serve(ServeArgs),
    /// Run database migrations
    Migrate(DatabaseArgs),
}

#[derive(Args, Debug)]
struct DatabaseArgs {
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value_t = 10)]
    max_connections: u32,
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    openai_api_key: String,

    #[arg(long, env = "OPENAI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    openai_base_url: String,

    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    openai_model: String,

    #[arg(long, env = "OPENAI_TIMEOUT_SECS", default_value_t = 60)]
    openai_timeout_secs: u64,

    #[arg(long, env = "BABYLOG_BIND", default_value = "0.0.0.0:8000")]
    bind: SocketAddr,

    /// Skip running migrations before serving
    #[arg(long)]
    skip_migrations: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve(args) => serve(args).await,
        Command::Migrate(args) => {
            let pool = connect_pool(&args).await?;
            db::run_migrations(&pool).await?;
            info!("Database migrations applied");
            Ok(())
        }
    }
}

async fn serve(args: ServeArgs) -> Result<()> {
    let pool = connect_pool(&args.database).await?;
    if args.skip_migrations {
        warn!("Skipping migrations before serving");
    } else {
        db::run_migrations(&pool).await?;
    }

    let client = OpenAiClient::new(OpenAiConfig {
        api_key: args.openai_api_key,
        base_url: args.openai_base_url,
        model: args.openai_model,
        timeout: Duration::from_secs(args.openai_timeout_secs),
    })
    .context("failed to build language model client")?;
    info!(model = client.model(), "language model client ready");

    let state = AppState::new(Arc::new(client), Arc::new(PostgresActivityLog::new(pool)));
    let router = routes::router(state);

    let listener = TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn connect_pool(args: &DatabaseArgs) -> Result<db::DbPool> {
    db::connect(&args.database_url, args.max_connections).await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
}
