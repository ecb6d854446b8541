//! Build workspace layout.

use recipe_tools::ScopedEnv;
use std::path::{Path, PathBuf};

/// Package built and tested by the recipe.
pub const JIRI_PACKAGE: &str = "fuchsia.googlesource.com/jiri/cmd/jiri";

/// Checkout location of the jiri sources, relative to GOPATH.
const SOURCE_SUBDIR: [&str; 3] = ["src", "fuchsia.googlesource.com", "jiri"];

/// The directory tree owned by one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `<root>/go`
    pub fn gopath(&self) -> PathBuf {
        self.root.join("go")
    }

    /// `<root>/go/src/fuchsia.googlesource.com/jiri`
    pub fn source_dir(&self) -> PathBuf {
        SOURCE_SUBDIR
            .iter()
            .fold(self.gopath(), |path, part| path.join(part))
    }

    /// Environment shared by every toolchain invocation.
    pub fn toolchain_env(&self) -> ScopedEnv {
        let mut env = ScopedEnv::new();
        env.insert(
            "GOPATH".to_string(),
            self.gopath().to_string_lossy().into_owned(),
        );
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let ws = Workspace::new("/b/build");
        assert_eq!(ws.gopath(), PathBuf::from("/b/build/go"));
        assert_eq!(
            ws.source_dir(),
            PathBuf::from("/b/build/go/src/fuchsia.googlesource.com/jiri")
        );
    }

    #[test]
    fn test_toolchain_env_has_only_gopath() {
        let env = Workspace::new("/b/build").toolchain_env();
        assert_eq!(env.len(), 1);
        assert_eq!(env["GOPATH"], "/b/build/go");
    }
}
