use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use idm_core::validation::DeclarativeValidator;
use idm_db::cache::{Cache, MemoryCache, RedisCache};
use idm_db::repositories::{CachedRoleRepo, PgEmployeeRepo, PgRoleRepo};
use tokio_util::sync::CancellationToken;

use idm_api::config::{RoleCacheConfig, ServerConfig};
use idm_api::router::build_app_router;
use idm_api::services::{DynRoleService, EmployeeSvc, RoleSvc};
use idm_api::state::AppState;
use idm_api::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Configuration ---
    let config = ServerConfig::from_env().context("Invalid configuration")?;

    // --- Tracing ---
    init_tracing(&config.log)?;
    tracing::info!(
        app = %config.app_name,
        version = %config.app_version,
        host = %config.host,
        port = config.port,
        "Loaded server configuration"
    );

    // --- Database ---
    let pool = idm_db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    idm_db::health_check(&pool)
        .await
        .context("Database health check failed")?;

    idm_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- Services ---
    let employees = Arc::new(EmployeeSvc::new(
        PgEmployeeRepo::new(pool.clone()),
        DeclarativeValidator,
    ));

    let roles: DynRoleService = match build_role_cache(&config.role_cache).await? {
        Some(cache) => Arc::new(RoleSvc::new(
            CachedRoleRepo::with_ttl(
                PgRoleRepo::new(pool.clone()),
                cache,
                Duration::from_secs(config.role_cache.ttl_secs),
            ),
            DeclarativeValidator,
        )),
        None => Arc::new(RoleSvc::new(
            PgRoleRepo::new(pool.clone()),
            DeclarativeValidator,
        )),
    };

    // --- App state ---
    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        employees,
        roles,
    };

    let app = build_app_router(state, &config);

    // --- Start server ---
    let host = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST address '{}'", config.host))?;
    let addr = SocketAddr::new(host, config.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    tracing::info!(%addr, "Starting server");

    let shutdown = CancellationToken::new();
    let mut server = tokio::spawn(
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.clone().cancelled_owned())
            .into_future(),
    );

    tokio::select! {
        result = &mut server => {
            result.context("Server task failed")?.context("Server error")?;
            return Ok(());
        }
        () = shutdown_signal() => {}
    }

    // --- Drain in-flight requests, bounded ---
    shutdown.cancel();
    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    match tokio::time::timeout(grace, &mut server).await {
        Ok(result) => {
            result.context("Server task failed")?.context("Server error")?;
            tracing::info!("Server drained in-flight requests");
        }
        Err(_) => {
            tracing::warn!(
                grace_secs = grace.as_secs(),
                "Grace period elapsed, forcing shutdown"
            );
            server.abort();
        }
    }

    pool.close().await;
    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Pick the role cache backend: Redis when a URL is configured, the
/// in-process map otherwise, or none when caching is disabled.
async fn build_role_cache(config: &RoleCacheConfig) -> anyhow::Result<Option<Arc<dyn Cache>>> {
    if !config.enabled {
        tracing::info!("Role cache disabled");
        return Ok(None);
    }

    match &config.redis_url {
        Some(url) => {
            let cache = RedisCache::connect(url)
                .await
                .context("Failed to connect to Redis")?;
            tracing::info!(ttl_secs = config.ttl_secs, "Role cache backed by Redis");
            Ok(Some(Arc::new(cache)))
        }
        None => {
            tracing::info!(ttl_secs = config.ttl_secs, "Role cache held in process");
            Ok(Some(Arc::new(MemoryCache::new())))
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix) so the server
/// shuts down cleanly whether stopped interactively or by a process
/// manager (e.g. systemd, Docker, Kubernetes).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
