use eyre::{Context, Result};
use tokio_util::sync::CancellationToken;
use transcripts::cli::Command;
use transcripts::config::{self, init_logger};
use transcripts::render::Renderer;
use transcripts::server::{self, AppState};
use transcripts::storage::new_storage;

#[tokio::main]
async fn main() -> Result<()> {
    let cmd = Command::new();
    if cmd.version() {
        cmd.print_version();
        return Ok(());
    }

    std::panic::set_hook(Box::new(|panic_info| {
        better_panic::Settings::auto().create_panic_handler()(panic_info);
    }));

    let config = cmd.get_config()?;
    init_logger(&config.log)?;
    log::info!("Starting {}", config::version());

    if config.auth.api_secret.is_empty() {
        log::warn!("No api_secret configured, every ingestion request will be rejected");
    }
    if config.auth.admin_username.is_empty() || config.auth.admin_password.is_empty() {
        log::warn!("Admin credentials are not configured, admin login is disabled");
    }

    let storage = new_storage(&config.storage)
        .await
        .wrap_err("initializing storage")?;
    log::info!("Storage initialized");

    let renderer = Renderer::from_config(&config.render).wrap_err("initializing renderer")?;

    let token = CancellationToken::new();
    tokio::spawn(wait_for_signal(token.clone()));

    let state = AppState::new(storage.clone(), renderer, config.auth.clone())
        .wrap_err("initializing server state")?;
    let result = server::serve(&config.server, state, token).await;

    // Last handle, closes the database connection.
    drop(storage);
    log::info!("Storage closed");
    result
}

async fn wait_for_signal(token: CancellationToken) {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            log::error!("Listening for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                log::error!("Listening for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    log::info!("Shutdown requested");
    token.cancel();
}
