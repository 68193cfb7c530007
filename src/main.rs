use color_eyre::{eyre::eyre, Result};
use eframe::egui;
use tokio::runtime::Handle;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use virtual_joystick::persistence::{JoystickSession, PersistenceManager, SessionStore};
use virtual_joystick::ui::JoystickDemoApp;

const DEFAULT_SESSION: &str = "default";

#[tokio::main]
async fn main() -> Result<()> {
    setup()?;

    let store = SessionStore::default_location();
    info!("Using session directory {}", store.base_path().display());

    let session = match store.load(DEFAULT_SESSION).await {
        Ok(session) => session,
        Err(e) => {
            warn!("Could not load session {}: {}", DEFAULT_SESSION, e);
            JoystickSession::default()
        }
    };

    let persistence = PersistenceManager::spawn(store);
    let session_sender = persistence.get_sender();
    let runtime = Handle::current();

    info!("Starting UI");
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([960.0, 640.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Virtual Joystick",
        native_options,
        Box::new(|cc| {
            Ok(Box::new(JoystickDemoApp::new(
                cc,
                runtime,
                session_sender,
                DEFAULT_SESSION.to_string(),
                session,
            )?))
        }),
    )
    .map_err(|e| eyre!("Failed to run UI: {}", e))?;

    persistence.shutdown().await;
    Ok(())
}

fn setup() -> Result<()> {
    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "0")
    }
    color_eyre::install()?;
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", "info")
    }
    setup_logging_env();
    Ok(())
}

fn setup_logging_env() {
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();
}
