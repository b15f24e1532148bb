//! Shared test helpers and mock session.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use mcp_toolkit::error::ToolkitError;
use mcp_toolkit::session::{InvocationResult, OperationDescriptor, ToolSession};
use mcp_toolkit::tools::JsonObject;

pub const READ_FILE_DESCRIPTION: &str = "Read the complete contents of a file from the file system. \
Handles various text encodings and provides detailed error messages if the file cannot be read. \
Use this tool when you need to examine the contents of a single file. \
Only works within allowed directories.";

pub fn read_file_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": { "path": { "type": "string" } },
        "required": ["path"]
    })
}

pub fn read_file_operation() -> OperationDescriptor {
    OperationDescriptor::new("read_file", READ_FILE_DESCRIPTION, read_file_schema())
}

/// A session that returns canned catalogs and call results and counts calls.
#[derive(Default)]
pub struct MockSession {
    initialize_delay: Option<Duration>,
    initialize_calls: AtomicUsize,
    list_calls: AtomicUsize,
    initialize_failures: Mutex<VecDeque<ToolkitError>>,
    catalog: Mutex<Vec<OperationDescriptor>>,
    call_results: Mutex<VecDeque<Result<InvocationResult, ToolkitError>>>,
    calls: Mutex<Vec<(String, JsonObject)>>,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog with the single `read_file` operation.
    pub fn with_read_file() -> Self {
        let session = Self::new();
        session.set_catalog(vec![read_file_operation()]);
        session
    }

    /// Make `initialize` suspend for `delay` before completing.
    pub fn with_initialize_delay(mut self, delay: Duration) -> Self {
        self.initialize_delay = Some(delay);
        self
    }

    pub fn set_catalog(&self, operations: Vec<OperationDescriptor>) {
        *self.catalog.lock().unwrap() = operations;
    }

    pub fn fail_next_initialize(&self, error: ToolkitError) {
        self.initialize_failures.lock().unwrap().push_back(error);
    }

    pub fn queue_result(&self, result: InvocationResult) {
        self.call_results.lock().unwrap().push_back(Ok(result));
    }

    pub fn queue_call_error(&self, error: ToolkitError) {
        self.call_results.lock().unwrap().push_back(Err(error));
    }

    pub fn initialize_calls(&self) -> usize {
        self.initialize_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<(String, JsonObject)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ToolSession for MockSession {
    async fn initialize(&self) -> Result<(), ToolkitError> {
        self.initialize_calls.fetch_add(1, Ordering::SeqCst);
        match self.initialize_delay {
            Some(delay) => tokio::time::sleep(delay).await,
            None => tokio::task::yield_now().await,
        }
        match self.initialize_failures.lock().unwrap().pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    async fn list_operations(&self) -> Result<Vec<OperationDescriptor>, ToolkitError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.catalog.lock().unwrap().clone())
    }

    async fn call_operation(
        &self,
        name: &str,
        arguments: JsonObject,
    ) -> Result<InvocationResult, ToolkitError> {
        self.calls
            .lock()
            .unwrap()
            .push((name.to_string(), arguments));
        self.call_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ToolkitError::Transport("missing mock call result".into())))
    }
}
