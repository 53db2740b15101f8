mod config;

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{info, warn};

use runway_api::{HttpApi, ProvisionerAdapter};
use runway_core::{ControlPlane, IdentityGenerator, Provisioner, control::memory::InMemoryControlPlane};
use runway_kube::KubeControlPlane;
use runway_observe::{init_local_offset, init_logger};
use runway_prometheus::PrometheusMetrics;

use crate::config::{AgentConfig, Backend, ControlPlaneConfig};

fn main() -> anyhow::Result<()> {
    // Local offset must be read before any worker thread exists.
    init_local_offset();

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("building tokio runtime")?
        .block_on(run())
}

async fn run() -> anyhow::Result<()> {
    // 1) config
    let (cfg, source) = AgentConfig::load(std::env::args().skip(1))?;

    // 2) logger
    init_logger(&cfg.logger)?;
    match &source {
        Some(path) => info!(path = %path.display(), "configuration loaded"),
        None => info!("no configuration file; using built-in defaults"),
    }

    // 3) control plane
    let plane = control_plane(&cfg.control_plane).await?;
    info!(backend = plane.name(), namespace = %cfg.policy.namespace, "control plane ready");

    // 4) metrics + provisioner
    let metrics = PrometheusMetrics::new().context("registering metrics")?;
    let provisioner = Provisioner::new(cfg.policy.clone(), plane)?
        .with_identity(IdentityGenerator::from_policy(&cfg.identity))
        .with_timeouts(cfg.control_plane.timeouts)?
        .with_metrics(Arc::new(metrics.clone()));

    // 5) http
    let shutdown = CancellationToken::new();
    let tasks = TaskTracker::new();
    let adapter = ProvisionerAdapter::new(provisioner)
        .with_shutdown(shutdown.clone())
        .with_tracker(tasks.clone());
    let mut api = HttpApi::new(Arc::new(adapter)).with_metrics(metrics);
    if let Some(dir) = &cfg.server.static_dir {
        info!(dir = %dir.display(), "serving static files");
        api = api.with_static_dir(dir);
    }
    let app = api.router();

    let listener = TcpListener::bind(cfg.server.listen)
        .await
        .with_context(|| format!("binding {}", cfg.server.listen))?;
    info!(listen = %cfg.server.listen, "serving");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await;

    // 6) drain: requests whose clients went away are still rolling back
    tasks.close();
    if !tasks.is_empty() {
        info!(in_flight = tasks.len(), "waiting for in-flight provisioning");
    }
    tasks.wait().await;

    served.context("http server")?;
    info!("stopped");
    Ok(())
}

async fn control_plane(cfg: &ControlPlaneConfig) -> anyhow::Result<Arc<dyn ControlPlane>> {
    Ok(match cfg.backend {
        Backend::Kubernetes => match cfg.context.as_deref() {
            Some(context) => Arc::new(KubeControlPlane::from_context(context).await?),
            None => Arc::new(KubeControlPlane::try_default().await?),
        },
        Backend::Memory => {
            warn!("in-memory control plane; runners are not deployed anywhere");
            Arc::new(InMemoryControlPlane::new())
        }
    })
}

/// Resolves on ctrl-c or SIGTERM and cancels in-flight provisioning.
async fn shutdown_signal(shutdown: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown requested; cancelling in-flight requests");
    shutdown.cancel();
}
