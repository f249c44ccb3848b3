use crate::config::{Config, ExecutorMode};
use anyhow::{Context, Result};
use mcp_relay_core::{Metrics, Orchestrator};
use mcp_relay_policy::{PermissionEngine, PrivilegedKeys};
use mcp_relay_providers::{CompletionRelay, OpenAICompatibleBackend};
use mcp_relay_tools::backends::catalog::LIST_TOOLS;
use mcp_relay_tools::backends::filesystem::LIST as LIST_DIRECTORY;
use mcp_relay_tools::{
    CatalogBackend, FilesystemBackend, FixtureBackend, McpProxyBackend, StorageLocation, ToolBackend,
    ToolCatalog, ToolDispatcher,
};
use std::sync::Arc;
use tracing::{info, warn};

/// Everything a request handler needs. Immutable once built.
pub struct AppState {
    pub catalog: Arc<ToolCatalog>,
    pub orchestrator: Arc<Orchestrator>,
    pub metrics: Arc<Metrics>,
    pub max_body_bytes: usize,
}

pub fn build(config: &Config) -> Result<Arc<AppState>> {
    let catalog = Arc::new(ToolCatalog::builtin());
    let metrics = Metrics::new();

    let dispatcher = Arc::new(build_dispatcher(config, catalog.clone())?);

    let privileged = PrivilegedKeys::new(config.privileged_keys.iter().cloned());
    if privileged.is_empty() {
        warn!("No privileged keys configured; privileged tools are unavailable");
    }
    let permissions = Arc::new(PermissionEngine::new(catalog.clone(), privileged));

    let backend = Arc::new(OpenAICompatibleBackend::new(config.completion_backend.url.clone()));
    let relay = Arc::new(CompletionRelay::new(
        backend,
        catalog.clone(),
        config.completion_backend.timeout_ms,
    ));

    info!(
        "Relay ready: {} tools, {} privileged keys, {} backend at {}",
        catalog.len(),
        permissions.privileged_key_count(),
        relay.backend_name(),
        config.completion_backend.url
    );

    let orchestrator = Arc::new(Orchestrator::new(relay, permissions, dispatcher, metrics.clone()));
    Ok(Arc::new(AppState {
        catalog,
        orchestrator,
        metrics,
        max_body_bytes: config.max_body_bytes,
    }))
}

fn build_dispatcher(config: &Config, catalog: Arc<ToolCatalog>) -> Result<ToolDispatcher> {
    let executor = &config.executor;
    let discovery = Arc::new(CatalogBackend::new(catalog.clone()));

    let dispatcher = match executor.mode {
        ExecutorMode::Fixture => {
            let storage = StorageLocation::new(&config.storage_public_url, &config.storage_bucket);
            let files = match &config.filesystem_root {
                Some(root) => FilesystemBackend::with_root(root)
                    .with_context(|| format!("Invalid filesystem_root {}", root.display()))?,
                None => FilesystemBackend::new(),
            };
            info!("Tool executor: fixture");

            let fallback: Arc<dyn ToolBackend> = Arc::new(FixtureBackend::new(storage));
            ToolDispatcher::new(catalog, fallback, executor.timeout_ms)
                .route(LIST_DIRECTORY, Arc::new(files))
        }
        ExecutorMode::Proxy => {
            let proxy = McpProxyBackend::new(executor.proxy_url.clone(), executor.timeout_ms)
                .context("Failed to build MCP proxy client")?;
            info!("Tool executor: MCP proxy at {}", proxy.base_url());

            ToolDispatcher::new(catalog, Arc::new(proxy), executor.timeout_ms)
        }
    };

    Ok(dispatcher.route(LIST_TOOLS, discovery))
}
