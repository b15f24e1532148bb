//! Toolkit that turns an MCP session's tool catalog into host tools.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use tokio::sync::OnceCell;

use super::tool::MCPTool;
use crate::config::ToolkitConfig;
use crate::error::ToolkitError;
use crate::session::{OperationDescriptor, ToolSession};
use crate::tools::tool::{Tool, Toolkit};

/// Lifecycle of a toolkit's session setup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ToolkitState {
    Uninitialized,
    Initializing,
    Ready,
}

impl ToolkitState {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Self::Initializing,
            2 => Self::Ready,
            _ => Self::Uninitialized,
        }
    }
}

/// Whether `get_tools` re-reads the catalog on every call.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DiscoveryPolicy {
    /// Fetch the catalog from the session on every call.
    #[default]
    AlwaysRefresh,
    /// Fetch once, then serve the cached catalog.
    CacheOnce,
}

/// MCP server toolkit.
///
/// Owns a shared reference to one session. The session's setup runs at most
/// once per toolkit, behind a single in-flight guard; discovery is a separate
/// step that implicitly initializes first.
pub struct MCPToolkit {
    session: Arc<dyn ToolSession>,
    setup: OnceCell<()>,
    state: AtomicU8,
    discovery: DiscoveryPolicy,
    catalog: RwLock<Option<Arc<[OperationDescriptor]>>>,
}

impl MCPToolkit {
    pub fn new(session: Arc<dyn ToolSession>) -> Self {
        Self {
            session,
            setup: OnceCell::new(),
            state: AtomicU8::new(ToolkitState::Uninitialized as u8),
            discovery: DiscoveryPolicy::default(),
            catalog: RwLock::new(None),
        }
    }

    /// Build a toolkit using the discovery policy from `config`.
    pub fn from_config(session: Arc<dyn ToolSession>, config: &ToolkitConfig) -> Self {
        Self::new(session).with_discovery_policy(config.discovery)
    }

    pub fn with_discovery_policy(mut self, policy: DiscoveryPolicy) -> Self {
        self.discovery = policy;
        self
    }

    pub fn discovery_policy(&self) -> DiscoveryPolicy {
        self.discovery
    }

    /// The session every tool from this toolkit calls into.
    pub fn session(&self) -> &Arc<dyn ToolSession> {
        &self.session
    }

    pub fn state(&self) -> ToolkitState {
        ToolkitState::from_u8(self.state.load(Ordering::Acquire))
    }

    pub fn is_initialized(&self) -> bool {
        self.setup.initialized()
    }

    /// Run the session's setup once. Later calls return immediately.
    ///
    /// Concurrent callers wait on the same in-flight setup. On failure, or
    /// when the setup future is dropped before completing, the toolkit
    /// returns to `Uninitialized` and the next call retries.
    pub async fn initialize(&self) -> Result<(), ToolkitError> {
        self.setup
            .get_or_try_init(|| async {
                let pending = PendingSetup::start(&self.state);
                self.session.initialize().await?;
                tracing::debug!("MCP toolkit session initialized");
                pending.finish();
                Ok::<(), ToolkitError>(())
            })
            .await
            .map(|_| ())
    }

    /// Tools for the session's current catalog, following the discovery policy.
    pub async fn get_tools(&self) -> Result<Vec<MCPTool>, ToolkitError> {
        match self.discovery {
            DiscoveryPolicy::AlwaysRefresh => self.refresh_tools().await,
            DiscoveryPolicy::CacheOnce => {
                if let Some(catalog) = self.cached_catalog() {
                    return Ok(self.materialize(&catalog));
                }
                self.refresh_tools().await
            }
        }
    }

    /// Re-fetch the catalog regardless of policy, initializing first if needed.
    pub async fn refresh_tools(&self) -> Result<Vec<MCPTool>, ToolkitError> {
        self.initialize().await?;

        let operations: Arc<[OperationDescriptor]> =
            self.session.list_operations().await?.into();
        tracing::debug!(count = operations.len(), "discovered MCP tools");

        let tools = self.materialize(&operations);
        self.store_catalog(operations);
        Ok(tools)
    }

    /// Tools from the last successful discovery, without touching the session.
    pub fn cached_tools(&self) -> Result<Vec<MCPTool>, ToolkitError> {
        match self.cached_catalog() {
            Some(catalog) => Ok(self.materialize(&catalog)),
            None => Err(ToolkitError::NotReady(
                "no tool catalog has been discovered yet; call get_tools first".into(),
            )),
        }
    }

    /// Operations from the last successful discovery.
    pub fn cached_operations(&self) -> Option<Vec<OperationDescriptor>> {
        self.cached_catalog().map(|catalog| catalog.to_vec())
    }

    fn materialize(&self, operations: &[OperationDescriptor]) -> Vec<MCPTool> {
        operations
            .iter()
            .cloned()
            .map(|operation| MCPTool::from_operation(operation, Arc::clone(&self.session)))
            .collect()
    }

    fn cached_catalog(&self) -> Option<Arc<[OperationDescriptor]>> {
        match self.catalog.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn store_catalog(&self, operations: Arc<[OperationDescriptor]>) {
        let mut guard = match self.catalog.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = Some(operations);
    }

}

/// Marks setup as in flight. Unless finished, dropping it resets the state to
/// `Uninitialized`, which covers both failed and cancelled setups.
struct PendingSetup<'a> {
    state: &'a AtomicU8,
    finished: bool,
}

impl<'a> PendingSetup<'a> {
    fn start(state: &'a AtomicU8) -> Self {
        state.store(ToolkitState::Initializing as u8, Ordering::Release);
        Self {
            state,
            finished: false,
        }
    }

    fn finish(mut self) {
        self.state
            .store(ToolkitState::Ready as u8, Ordering::Release);
        self.finished = true;
    }
}

impl Drop for PendingSetup<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.state
                .store(ToolkitState::Uninitialized as u8, Ordering::Release);
        }
    }
}

#[async_trait]
impl Toolkit for MCPToolkit {
    async fn initialize(&self) -> Result<(), ToolkitError> {
        MCPToolkit::initialize(self).await
    }

    async fn get_tools(&self) -> Result<Vec<Arc<dyn Tool>>, ToolkitError> {
        let tools = MCPToolkit::get_tools(self).await?;
        Ok(tools
            .into_iter()
            .map(|tool| Arc::new(tool) as Arc<dyn Tool>)
            .collect())
    }
}

impl std::fmt::Debug for MCPToolkit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MCPToolkit")
            .field("state", &self.state())
            .field("discovery", &self.discovery)
            .field(
                "cached_operations",
                &self.cached_catalog().map(|catalog| catalog.len()),
            )
            .finish()
    }
}
