//! Error types for recipe-tools

use thiserror::Error;

/// Errors raised while driving an external tool.
#[derive(Error, Debug)]
pub enum ToolError {
    /// Executable could not be found
    #[error("{program} is not installed or not in PATH")]
    NotFound { program: String },

    /// Command ran but exited unsuccessfully
    #[error("`{command}` exited with code {exit_code}: {output}")]
    CommandFailed {
        command: String,
        exit_code: i32,
        /// Last lines the command printed, stdout then stderr
        output: String,
    },

    /// Command exceeded its time limit
    #[error("`{command}` timed out after {timeout_secs} seconds")]
    Timeout { command: String, timeout_secs: u64 },

    /// Command succeeded but printed nothing where output was required
    #[error("`{command}` returned empty output")]
    EmptyOutput { command: String },

    /// Jiri profile name is not known
    #[error("unknown jiri profile: {0}")]
    UnknownProfile(String),

    /// A jiri command needing a checkout root ran before a profile was selected
    #[error("no jiri profile selected")]
    ProfileNotSelected,

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ToolError {
    /// Build a `CommandFailed` error, mostly useful for fakes.
    pub fn failed(command: impl Into<String>, exit_code: i32, output: impl Into<String>) -> Self {
        ToolError::CommandFailed {
            command: command.into(),
            exit_code,
            output: output.into(),
        }
    }
}

/// Result type for tool operations.
pub type Result<T> = std::result::Result<T, ToolError>;
