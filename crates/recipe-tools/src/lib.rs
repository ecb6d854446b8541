//! recipe-tools: external tool layer for the jiri build recipe
//!
//! Wraps the command-line tools the recipe drives behind small async traits:
//!
//! - [`ManifestTool`]: jiri (profile, clean, import, update, patch)
//! - [`VersionControl`]: git (`rev-parse`)
//! - [`Toolchain`]: go (install check, build, test)
//!
//! Commands run through a [`CommandRunner`]; [`ProcessRunner`] spawns real
//! processes, while [`fakes`] provides recording stand-ins.

pub mod collaborators;
pub mod command;
pub mod error;
pub mod fakes;
pub mod git;
pub mod go;
pub mod jiri;

pub use collaborators::{ManifestTool, Toolchain, VersionControl};
pub use command::{CommandOutput, CommandRunner, CommandSpec, ProcessRunner, ScopedEnv};
pub use error::{Result, ToolError};
pub use git::GitCli;
pub use go::GoToolchain;
pub use jiri::{JiriConfig, JiriProfile, JiriTool, DEFAULT_PROFILE};
