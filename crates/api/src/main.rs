//! API server entry point.

use std::sync::Arc;

use api::config::Config;
use api::routes::cart::AppState;
use cart_store::{CartStore, InMemoryCartStore, PostgresCartStore};
use checkout::{CheckoutInitiator, EventPublisher, InMemoryEventPublisher};
use domain::{
    CartService, HttpCatalogClient, HttpClientConfig, HttpDiscountClient, HttpInventoryClient,
    HttpTaxClient,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Wires the application state with HTTP collaborator clients.
fn build_state<S: CartStore + 'static>(
    store: S,
    config: &Config,
    publisher: Arc<dyn EventPublisher>,
) -> Arc<AppState<S>> {
    let timeout = config.collaborator_timeout;
    let client = |base_url: &String| HttpClientConfig::new(base_url.clone()).with_timeout(timeout);

    let catalog =
        HttpCatalogClient::new(client(&config.catalog_url)).expect("failed to build catalog client");
    let inventory = HttpInventoryClient::new(client(&config.inventory_url))
        .expect("failed to build inventory client");
    let discount = HttpDiscountClient::new(client(&config.discount_url))
        .expect("failed to build discount client");
    let tax = HttpTaxClient::new(client(&config.tax_url)).expect("failed to build tax client");

    let cart_service = Arc::new(CartService::new(
        store,
        Arc::new(catalog),
        Arc::new(inventory),
        Arc::new(discount),
        Arc::new(tax),
    ));
    let checkout = CheckoutInitiator::new(cart_service.clone(), publisher);

    Arc::new(AppState {
        cart_service,
        checkout,
    })
}

async fn serve<S: CartStore + 'static>(
    store: S,
    config: &Config,
    publisher: Arc<dyn EventPublisher>,
    metrics_handle: PrometheusHandle,
) {
    let state = build_state(store, config, publisher);
    let app = api::create_app(state, metrics_handle);

    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}

#[tokio::main]
async fn main() {
    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Load configuration
    let config = Config::from_env();

    // 4. Create the process-scoped event publisher
    #[cfg(feature = "kafka")]
    let (publisher, kafka): (
        Arc<dyn EventPublisher>,
        Option<Arc<checkout::KafkaEventPublisher>>,
    ) = match &config.kafka_brokers {
        Some(brokers) => {
            let kafka = Arc::new(
                checkout::KafkaEventPublisher::new(brokers.clone())
                    .expect("failed to create Kafka producer"),
            );
            (kafka.clone(), Some(kafka))
        }
        None => {
            tracing::warn!("KAFKA_BROKERS not set, checkout events stay in-memory");
            (Arc::new(InMemoryEventPublisher::new()), None)
        }
    };

    #[cfg(not(feature = "kafka"))]
    let publisher: Arc<dyn EventPublisher> = {
        if config.kafka_brokers.is_some() {
            tracing::warn!(
                "KAFKA_BROKERS is set but the kafka feature is disabled, \
                 checkout events stay in-memory"
            );
        }
        Arc::new(InMemoryEventPublisher::new())
    };

    // 5. Select the store and run the server
    match &config.database_url {
        Some(url) => {
            let pool = sqlx::postgres::PgPoolOptions::new()
                .max_connections(10)
                .connect(url)
                .await
                .expect("failed to connect to database");
            let store = PostgresCartStore::new(pool);
            store.run_migrations().await.expect("migrations failed");
            tracing::info!("using PostgreSQL cart store");

            serve(store, &config, publisher, metrics_handle).await;
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory cart store");
            serve(InMemoryCartStore::new(), &config, publisher, metrics_handle).await;
        }
    }

    // 6. Drain the broker session before exiting
    #[cfg(feature = "kafka")]
    if let Some(kafka) = kafka {
        if let Err(e) = kafka.flush(std::time::Duration::from_secs(5)) {
            tracing::warn!(error = %e, "failed to flush Kafka producer");
        }
    }
}
