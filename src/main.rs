// region:    --- Imports
use jewel_market::auction::AuctionService;
use jewel_market::billing::BillingService;
use jewel_market::clock::{Clock, SystemClock};
use jewel_market::config::Settings;
use jewel_market::handlers::{self, AppState};
use jewel_market::pricing::{MetalPrices, MetalsPriceClient, PriceBoard, PricePoller};
use jewel_market::scheduler::AuctionScheduler;
use jewel_market::store::{KvStore, MemoryStore, PostgresStore};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
// endregion: --- Imports

// region:    --- Main
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // logging
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .without_time()
        .with_target(false)
        .init();

    let settings = Settings::load()?;

    // storage: Postgres when configured, otherwise in-process memory
    let store: Arc<dyn KvStore> = match &settings.database_url {
        Some(url) => {
            let postgres = PostgresStore::connect(url).await?;
            if let Err(e) = postgres.initialize_schema().await {
                error!("{:<12} --> schema initialization failed: {:?}", "Main", e);
                return Err(e.into());
            }
            info!("{:<12} --> Postgres store ready", "Main");
            Arc::new(postgres)
        }
        None => {
            warn!("{:<12} --> no database_url, using in-memory store", "Main");
            Arc::new(MemoryStore::new())
        }
    };
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    // metal prices: first refresh before serving, then poll
    let client = Arc::new(MetalsPriceClient::new(&settings));
    let prices = PriceBoard::new(MetalPrices::mock(client.currency(), clock.now()));
    let poller = PricePoller::new(
        client,
        prices.clone(),
        Arc::clone(&clock),
        Duration::from_secs(settings.metals.poll_interval_secs.max(1)),
    );
    poller.refresh().await;
    poller.start();

    let auctions = Arc::new(AuctionService::new(Arc::clone(&store), Arc::clone(&clock)));
    let billing = Arc::new(BillingService::new(store, clock, prices.clone()));

    // expiry sweep
    AuctionScheduler::new(
        Arc::clone(&auctions),
        Duration::from_secs(settings.auction.sweep_interval_secs.max(1)),
    )
    .start();

    let routes_all = handlers::router(AppState {
        auctions,
        billing,
        prices,
    });

    let listener = TcpListener::bind(&settings.server.bind_addr).await?;
    info!(
        "{:<12} --> Web Server: Listening on {}",
        "Main",
        listener.local_addr()?
    );

    if let Err(err) = axum::serve(listener, routes_all.into_make_service()).await {
        error!("{:<12} --> Server error: {}", "Main", err);
    }
    Ok(())
}
// endregion: --- Main
