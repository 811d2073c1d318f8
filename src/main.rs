use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use person_directory::cli::{Cli, Commands, ServeArgs};
use person_directory::config::{self, AppConfig};
use person_directory::database::{seed, DatabaseManager};
use person_directory::{app, app_with_cors, AppState, BasicAuthGate};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, BASIC_AUTH_USERS, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,tower_http=info")),
        )
        .init();

    match Cli::parse().command() {
        Commands::Serve(args) => serve(config::config(), args).await,
        Commands::HashPassword { password, cost } => {
            let hash = bcrypt::hash(password, cost).context("failed to hash password")?;
            println!("{}", hash);
            Ok(())
        }
    }
}

async fn serve(config: &AppConfig, args: ServeArgs) -> anyhow::Result<()> {
    tracing::info!("Starting Person Directory in {:?} mode", config.environment);

    let persons = DatabaseManager::open(&config.database)
        .await
        .context("failed to open person store")?;

    if let Some(path) = &config.seed.file {
        let seed_file = seed::SeedFile::load(path)?;
        seed::apply(persons.as_ref(), &seed_file.persons, config.seed.reset)
            .await
            .with_context(|| format!("failed to seed from {}", path.display()))?;
    }

    let state = AppState::new(persons);
    let gate = BasicAuthGate::new(config.security.basic_auth_users.clone());
    let router = if config.security.enable_cors {
        app_with_cors(state, gate)
    } else {
        app(state, gate)
    };

    let bind_addr = format!(
        "{}:{}",
        args.bind.as_deref().unwrap_or(&config.server.bind_addr),
        args.port.unwrap_or(config.server.port)
    );
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!("Person Directory listening on http://{}", bind_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
