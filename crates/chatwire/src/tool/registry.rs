//! Tool registry and sequential dispatch.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::instrument;

use super::{ToolError, ToolHandler};
use crate::chat::{ToolCall, ToolDefinition, ToolResult};
use crate::error::LlmError;

/// Tool handlers indexed by name.
///
/// Names are kept sorted, so [`definitions`](Self::definitions) is
/// deterministic and encoding a chat built from it is reproducible.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    handlers: BTreeMap<String, Arc<dyn ToolHandler>>,
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ToolRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler under its definition's name.
    ///
    /// A handler with the same name is replaced.
    pub fn register(&mut self, handler: impl ToolHandler + 'static) -> &mut Self {
        let name = handler.definition().name;
        self.handlers.insert(name, Arc::new(handler));
        self
    }

    /// Registers a shared handler.
    pub fn register_shared(&mut self, handler: Arc<dyn ToolHandler>) -> &mut Self {
        let name = handler.definition().name;
        self.handlers.insert(name, handler);
        self
    }

    /// Returns the handler registered as `name`.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn ToolHandler>> {
        self.handlers.get(name)
    }

    /// Returns whether a handler is registered as `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Definitions of every registered tool, sorted by name.
    ///
    /// Pass this to [`Chat::with_tools`](crate::Chat::with_tools).
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.handlers.values().map(|h| h.definition()).collect()
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Returns true if no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Runs `calls` strictly in order and collects their results.
    ///
    /// The first failure stops the batch: later handlers are never invoked
    /// and results of earlier calls are dropped. The failure is returned as
    /// [`LlmError::Tool`].
    #[instrument(skip_all, fields(calls = calls.len()))]
    pub async fn dispatch(&self, calls: &[ToolCall]) -> Result<Vec<ToolResult>, LlmError> {
        let mut results = Vec::with_capacity(calls.len());
        for call in calls {
            let Some(handler) = self.handlers.get(&call.name) else {
                tracing::debug!(tool = %call.name, "no handler registered");
                return Err(ToolError::NotFound(call.name.clone()).into());
            };
            let output = handler.execute(call.arguments.clone()).await.map_err(|e| {
                tracing::debug!(tool = %call.name, call_id = %call.id, error = %e, "tool failed");
                e
            })?;
            results.push(ToolResult {
                id: call.id.clone(),
                name: call.name.clone(),
                output,
            });
        }
        Ok(results)
    }
}
