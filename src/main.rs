mod cli;

use anyhow::{Context, Result};
use clap::Parser;

use cli::args::{Cli, Commands};
use cli::handlers::{self, Registration};
use qaza::config::{AppConfig, BackendKind, Session, SessionFile};
use qaza::store::RestStore;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Loading config")?;
    let sessions = SessionFile::new(AppConfig::session_path()?);

    match cli.command {
        Some(Commands::Setup {
            local,
            url,
            anon_key,
        }) => handlers::handle_setup(&mut config, local, url, anon_key),
        Some(Commands::Register {
            email,
            first_name,
            last_name,
            birth_year,
            gender,
        }) => {
            let form = Registration {
                email,
                first_name,
                last_name,
                birth_year,
                gender,
            };
            handlers::handle_register(&config, &sessions, form).await
        }
        Some(Commands::Login { email }) => handlers::handle_login(&config, &sessions, &email).await,
        Some(Commands::Logout) => handlers::handle_logout(&config, &sessions).await,
        Some(Commands::Miss { prayer, count }) => {
            let delta = handlers::positive_count(count)?;
            adjust(&config, &sessions, &prayer, delta).await
        }
        Some(Commands::Makeup { prayer, count }) => {
            let delta = -handlers::positive_count(count)?;
            adjust(&config, &sessions, &prayer, delta).await
        }
        // No subcommand → show stats
        Some(Commands::Stats) | None => {
            let session = sessions.load(config.backend.kind)?;
            match config.backend.kind {
                BackendKind::Local => {
                    let store = handlers::open_local()?;
                    handlers::handle_stats(store, session.as_ref()).await
                }
                BackendKind::Remote => {
                    let store = remote_store(&config, session.as_ref())?;
                    handlers::handle_stats(store, session.as_ref()).await
                }
            }
        }
    }
}

async fn adjust(config: &AppConfig, sessions: &SessionFile, prayer: &str, delta: i64) -> Result<()> {
    let session = sessions.load(config.backend.kind)?;
    match config.backend.kind {
        BackendKind::Local => {
            let store = handlers::open_local()?;
            handlers::handle_adjust(store, session.as_ref(), prayer, delta).await
        }
        BackendKind::Remote => {
            let store = remote_store(config, session.as_ref())?;
            handlers::handle_adjust(store, session.as_ref(), prayer, delta).await
        }
    }
}

fn remote_store(config: &AppConfig, session: Option<&Session>) -> Result<RestStore> {
    let (url, anon_key) = config.backend.remote_credentials()?;
    let store = RestStore::new(url, anon_key);
    Ok(match session.and_then(|s| s.access_token.as_deref()) {
        Some(token) => store.with_access_token(token),
        None => store,
    })
}
