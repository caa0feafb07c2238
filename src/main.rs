use pricewatch::channel::TelegramChannel;
use pricewatch::clock::SystemClock;
use pricewatch::quotes::YahooSource;
use pricewatch::{Config, Store, Watcher};
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    // Load configuration; missing credentials abort before any I/O.
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    let store = Store::new(&config);
    let prices = Arc::new(YahooSource::new(config.quote_api_url.clone()));
    let channel = Arc::new(TelegramChannel::new(
        config.telegram_api_url.clone(),
        config.telegram_token.clone(),
        config.telegram_chat_id.clone(),
    ));
    let clock = Arc::new(SystemClock::new(config.timezone));

    let watcher = Watcher::new(
        config,
        store,
        prices,
        channel.clone(),
        channel,
        clock,
    );

    match watcher.run_once().await {
        Ok(summary) => {
            tracing::info!(
                "Pass complete: {} commands, {} instruments, {} universes, {} alerts sent",
                summary.commands_consumed,
                summary.instruments_evaluated,
                summary.universes_scanned,
                summary.alerts_sent
            );
        }
        Err(e) => {
            eprintln!("Failed to persist state: {}", e);
            std::process::exit(1);
        }
    }
}
