use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryCheckResultRepository};
use crate::routes::with_course_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use course_checker::catalog::{CatalogCache, CatalogStore, JsonDirectoryStore};
use course_checker::config::AppConfig;
use course_checker::courses::CourseCheckService;
use course_checker::error::AppError;
use course_checker::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }
    if let Some(root) = args.catalog_dir.take() {
        config.catalog.root = root;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(JsonDirectoryStore::from_config(&config.catalog));
    let cache = Arc::new(CatalogCache::from_config(store, &config.catalog));
    info!(root = %config.catalog.root.display(), "loading programme catalog");
    cache.initialize()?;

    let _refresher = spawn_catalog_refresher(
        cache.clone(),
        Duration::from_secs(config.catalog.refresh_check_secs),
    );

    let repository = Arc::new(InMemoryCheckResultRepository::default());
    let course_service = Arc::new(CourseCheckService::new(cache, repository));

    let app = with_course_routes(course_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "course checker ready");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Periodically reloads the catalog once its TTL has lapsed.
///
/// Store reads block, so each refresh runs on the blocking pool. A failed
/// refresh keeps serving the previous snapshot and is retried on the next tick.
pub(crate) fn spawn_catalog_refresher<S>(
    cache: Arc<CatalogCache<S>>,
    check_every: Duration,
) -> JoinHandle<()>
where
    S: CatalogStore + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(check_every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; the catalog was just loaded.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if !cache.should_refresh() {
                debug!("catalog still fresh");
                continue;
            }

            let worker = cache.clone();
            match tokio::task::spawn_blocking(move || worker.refresh()).await {
                Ok(Ok(report)) => info!(
                    programmes = report.programmes,
                    failed = report.failed.len(),
                    "catalog refreshed"
                ),
                Ok(Err(err)) => {
                    warn!(error = %err, "catalog refresh failed; serving previous snapshot")
                }
                Err(err) => error!(error = %err, "catalog refresh task aborted"),
            }
        }
    })
}
