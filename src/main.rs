use campusroute::app::time_resolver::SystemClock;
use campusroute::app::{AppContext, AppOptions};
use campusroute::cli::{self, Input, TerminalPresenter};
use campusroute::config::Config;
use campusroute::models::PoiCatalog;
use campusroute::runtime::{Session, SessionCommand};
use campusroute::services::{FixedGeolocator, HttpRoutingClient, RoutingBackend};
use campusroute::AppError;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so stdout stays the panel transcript
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "campusroute=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    // Load configuration
    let config = Config::from_env().map_err(AppError::Config)?;
    tracing::info!(
        routing_api = %config.routing_api_url,
        geolocation = config.geolocation_supported(),
        "Configuration loaded"
    );

    // POIs first, then the hit-test layer (built by the context), then input
    let backend = Arc::new(HttpRoutingClient::new(config.routing_api_url.clone()));
    let pois = backend
        .fetch_locations()
        .await
        .map_err(|e| format!("Failed to load POIs: {}", e))?;
    let catalog = PoiCatalog::new(pois);

    let ctx = AppContext::new(catalog, AppOptions::from(&config), Box::new(SystemClock));
    let session = Session::new(ctx, backend, Arc::new(FixedGeolocator::new(config.gps_fix)));

    let (commands, inbox) = mpsc::channel(32);
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => break,
                Err(e) => {
                    tracing::error!("Failed to read input: {}", e);
                    break;
                }
            };

            match cli::parse_line(&line) {
                Ok(Input::Command(command)) => {
                    let quit = command == SessionCommand::Quit;
                    if commands.send(command).await.is_err() || quit {
                        break;
                    }
                }
                Ok(Input::Help) => println!("{}", cli::HELP),
                Ok(Input::Blank) => {}
                Err(e) => eprintln!("{}", e),
            }
        }
    });

    println!("Type 'help' for commands.");
    session.run(inbox, TerminalPresenter::new(std::io::stdout())).await;

    tracing::info!("Session ended");
    Ok(())
}
