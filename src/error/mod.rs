//! Error types for the MCP toolkit.

pub mod unified;

pub use unified::{ErrorCategory, RecoverySuggestion};

use thiserror::Error;

/// Primary error type for all toolkit operations.
#[derive(Error, Debug)]
pub enum ToolkitError {
    /// The session's one-time setup (MCP handshake) failed.
    #[error("Session setup failed: {0}")]
    Setup(String),

    /// Fetching the remote tool catalog failed.
    #[error("Tool discovery failed: {0}")]
    Discovery(String),

    /// The remote tool ran and reported `isError`. The message is the
    /// serialized result content, verbatim.
    #[error("{message}")]
    RemoteTool { tool_name: String, message: String },

    #[error("Not ready: {0}")]
    NotReady(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolkitError {
    /// Create a remote tool failure.
    pub fn remote_tool(tool_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RemoteTool {
            tool_name: tool_name.into(),
            message: message.into(),
        }
    }

    /// Classify this error into a category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::Setup(_) => ErrorCategory::Setup,
            Self::Discovery(_) => ErrorCategory::Discovery,
            Self::RemoteTool { .. } => ErrorCategory::RemoteTool,
            Self::NotReady(_) | Self::InvalidState(_) => ErrorCategory::NotReady,
            Self::Transport(_) | Self::Io(_) => ErrorCategory::Transport,
            Self::Timeout(_) => ErrorCategory::Timeout,
            Self::InvalidArgument(_) => ErrorCategory::Arguments,
            Self::Configuration(_) => ErrorCategory::Configuration,
            Self::Serialization(_) => ErrorCategory::Serialization,
        }
    }

    /// Whether retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Setup
                | ErrorCategory::Discovery
                | ErrorCategory::Transport
                | ErrorCategory::Timeout
        )
    }

    /// Whether the host tool-failure convention applies to this error.
    ///
    /// Only remote tool failures qualify; everything else is a fault of the
    /// plumbing and propagates to the caller.
    pub fn is_tool_failure(&self) -> bool {
        matches!(self, Self::RemoteTool { .. })
    }

    /// Suggest recovery actions.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self.category() {
            ErrorCategory::Setup => RecoverySuggestion::RetryInitialize,
            ErrorCategory::Discovery => RecoverySuggestion::RetryDiscovery,
            ErrorCategory::Transport | ErrorCategory::Timeout => {
                RecoverySuggestion::RetryWithBackoff
            }
            ErrorCategory::RemoteTool => RecoverySuggestion::ReportToModel,
            ErrorCategory::Arguments => RecoverySuggestion::CheckArguments,
            ErrorCategory::Configuration => RecoverySuggestion::CheckConfiguration,
            ErrorCategory::NotReady | ErrorCategory::Serialization => RecoverySuggestion::Abort,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ToolkitError>;
