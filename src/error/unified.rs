//! Error classification and recovery.

use serde::{Deserialize, Serialize};
use strum::Display;

/// Broad error category for routing recovery logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorCategory {
    Setup,
    Discovery,
    RemoteTool,
    NotReady,
    Transport,
    Timeout,
    Arguments,
    Configuration,
    Serialization,
}

/// Suggested recovery action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoverySuggestion {
    RetryInitialize,
    RetryDiscovery,
    RetryWithBackoff,
    /// Hand the failure back to the model as a tool result.
    ReportToModel,
    CheckArguments,
    CheckConfiguration,
    Abort,
}
