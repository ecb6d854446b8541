//! Collaborator traits the build recipe drives.
//!
//! Each trait is one external tool seen through the operations the recipe
//! needs. Real implementations live in [`crate::jiri`], [`crate::git`] and
//! [`crate::go`]; [`crate::fakes`] records calls instead of running anything.

use crate::command::ScopedEnv;
use crate::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Manifest-driven multi-repository checkout tool (jiri).
#[async_trait]
pub trait ManifestTool: Send + Sync {
    /// Make sure the tool is installed and runnable.
    async fn ensure_tool(&self) -> Result<()>;

    /// Select the named configuration profile.
    async fn set_profile(&self, name: &str) -> Result<()>;

    /// Remove local state left by a prior checkout.
    async fn clean(&self) -> Result<()>;

    /// Import `manifest` from the `remote` manifest repository.
    async fn import_manifest(&self, manifest: &str, remote: &str, overwrite: bool) -> Result<()>;

    /// Sync every project, optionally deleting projects no longer in the manifest.
    async fn update(&self, gc: bool) -> Result<()>;

    /// Apply a code-review patch ref fetched from `host`.
    async fn patch(&self, patch_ref: &str, host: &str, delete: bool, force: bool) -> Result<()>;
}

/// Version-control queries.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Commit hash checked out in `dir`.
    async fn rev_parse(&self, dir: &Path) -> Result<String>;
}

/// Language toolchain used to build and test the package.
#[async_trait]
pub trait Toolchain: Send + Sync {
    /// Make sure the toolchain is installed.
    async fn install(&self) -> Result<()>;

    /// Compile `package` with the given linker flags and scoped environment.
    async fn build(&self, package: &str, ldflags: &str, env: &ScopedEnv, force: bool)
        -> Result<()>;

    /// Run the tests of `package` with the given scoped environment.
    async fn test(&self, package: &str, env: &ScopedEnv) -> Result<()>;
}
