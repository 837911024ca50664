//! Tool handler trait and the closure-backed implementation.

use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::ToolError;
use crate::chat::ToolDefinition;

/// Boxed future returned by [`ToolHandler::execute`].
pub type ToolFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send + 'a>>;

/// A single tool the model can invoke.
///
/// Implementations decode the untyped arguments into whatever shape they
/// expect, run, and return their output serialized as JSON. The trait is
/// object-safe so handlers can be stored as `Arc<dyn ToolHandler>`.
///
/// For most tools, [`tool_fn`] is simpler than implementing this by hand.
///
/// ```rust
/// use chatwire::ToolDefinition;
/// use chatwire::tool::{ToolError, ToolFuture, ToolHandler};
/// use serde_json::{Value, json};
///
/// struct Clock;
///
/// impl ToolHandler for Clock {
///     fn definition(&self) -> ToolDefinition {
///         ToolDefinition::new("now", "Current unix time", json!({"type": "object"}))
///     }
///
///     fn execute(&self, _arguments: Value) -> ToolFuture<'_> {
///         Box::pin(async { Ok("1700000000".to_string()) })
///     }
/// }
/// ```
pub trait ToolHandler: Send + Sync {
    /// The definition advertised to the model.
    fn definition(&self) -> ToolDefinition;

    /// Runs the tool on `arguments` and returns its JSON-serialized output.
    fn execute(&self, arguments: Value) -> ToolFuture<'_>;
}

/// A tool handler backed by an async closure over typed arguments.
///
/// Created by [`tool_fn`].
pub struct FnToolHandler<A, F> {
    definition: ToolDefinition,
    handler: F,
    _args: PhantomData<fn(A)>,
}

impl<A, F> std::fmt::Debug for FnToolHandler<A, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnToolHandler")
            .field("name", &self.definition.name)
            .finish_non_exhaustive()
    }
}

impl<A, F, Fut, O> ToolHandler for FnToolHandler<A, F>
where
    A: DeserializeOwned,
    F: Fn(A) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, ToolError>> + Send + 'static,
    O: Serialize,
{
    fn definition(&self) -> ToolDefinition {
        self.definition.clone()
    }

    fn execute(&self, arguments: Value) -> ToolFuture<'_> {
        let args = match serde_json::from_value::<A>(arguments) {
            Ok(args) => args,
            Err(e) => {
                let err = ToolError::InvalidArguments(format!("{}: {e}", self.definition.name));
                return Box::pin(async move { Err(err) });
            }
        };
        let fut = (self.handler)(args);
        Box::pin(async move {
            let output = fut.await?;
            serde_json::to_string(&output)
                .map_err(|e| ToolError::ExecutionFailed(format!("output is not serializable: {e}")))
        })
    }
}

/// Wraps an async closure as a [`ToolHandler`].
///
/// The closure receives the call arguments already decoded into `A`; a
/// payload that does not decode yields [`ToolError::InvalidArguments`]
/// without running the closure. The closure's output is serialized with
/// `serde_json`.
///
/// ```rust
/// use chatwire::ToolDefinition;
/// use chatwire::tool::{ToolRegistry, tool_fn};
/// use serde::Deserialize;
/// use serde_json::json;
///
/// #[derive(Deserialize)]
/// struct AddArgs {
///     a: f64,
///     b: f64,
/// }
///
/// let mut registry = ToolRegistry::new();
/// registry.register(tool_fn(
///     ToolDefinition::new("add", "Add two numbers", json!({"type": "object"})),
///     |args: AddArgs| async move { Ok(json!({"sum": args.a + args.b})) },
/// ));
/// assert!(registry.contains("add"));
/// ```
pub fn tool_fn<A, F, Fut, O>(definition: ToolDefinition, handler: F) -> FnToolHandler<A, F>
where
    A: DeserializeOwned,
    F: Fn(A) -> Fut + Send + Sync,
    Fut: Future<Output = Result<O, ToolError>> + Send + 'static,
    O: Serialize,
{
    FnToolHandler {
        definition,
        handler,
        _args: PhantomData,
    }
}
