//! Drives the real process-backed tools against stub executables.

#![cfg(unix)]

use recipe_tools::{
    GoToolchain, JiriConfig, JiriTool, ManifestTool, ScopedEnv, ToolError, Toolchain,
};
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable shell script that appends its arguments to `log`.
fn stub_tool(dir: &Path, name: &str, log: &Path, exit_code: i32) -> PathBuf {
    let path = dir.join(name);
    let script = format!(
        "#!/bin/sh\necho \"$@\" >> {}\nexit {}\n",
        log.display(),
        exit_code
    );
    std::fs::write(&path, script).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();
    path
}

fn read_log(log: &Path) -> Vec<String> {
    std::fs::read_to_string(log)
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_jiri_checkout_sequence() {
    let bin = tempfile::tempdir().unwrap();
    let workspace = tempfile::tempdir().unwrap();
    let log = bin.path().join("jiri.log");
    let jiri_bin = stub_tool(bin.path(), "jiri", &log, 0);

    let config = JiriConfig::new(workspace.path()).with_binary(jiri_bin.to_string_lossy());
    let jiri = JiriTool::new(config);

    jiri.ensure_tool().await.unwrap();
    jiri.set_profile("jiri").await.unwrap();
    jiri.clean().await.unwrap();
    jiri.import_manifest("jiri", "https://fuchsia.googlesource.com/manifest", true)
        .await
        .unwrap();
    jiri.update(true).await.unwrap();

    let lines = read_log(&log);
    assert_eq!(lines[0], "version");
    assert!(lines[1].starts_with("init "));
    assert_eq!(&lines[2..], &[
        "project -clean-all".to_string(),
        "import -overwrite jiri https://fuchsia.googlesource.com/manifest".to_string(),
        "update -gc".to_string(),
    ]);
}

#[tokio::test]
async fn test_jiri_failure_surfaces_exit_code() {
    let bin = tempfile::tempdir().unwrap();
    let workspace = tempfile::tempdir().unwrap();
    std::fs::create_dir(workspace.path().join(".jiri_root")).unwrap();
    let log = bin.path().join("jiri.log");
    let jiri_bin = stub_tool(bin.path(), "jiri", &log, 3);

    let jiri = JiriTool::new(
        JiriConfig::new(workspace.path()).with_binary(jiri_bin.to_string_lossy()),
    );
    jiri.set_profile("jiri").await.unwrap();
    let err = jiri.update(true).await.unwrap_err();

    assert!(matches!(err, ToolError::CommandFailed { exit_code: 3, .. }));
}

#[tokio::test]
async fn test_go_build_and_test_with_scoped_env() {
    let bin = tempfile::tempdir().unwrap();
    let log = bin.path().join("go.log");
    let path = bin.path().join("go");
    let script = format!(
        "#!/bin/sh\necho \"$1 GOOS=$GOOS GOARCH=$GOARCH\" >> {}\n",
        log.display()
    );
    std::fs::write(&path, script).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();

    let go = GoToolchain::new(path.to_string_lossy());
    let mut build_env = ScopedEnv::new();
    build_env.insert("GOPATH".to_string(), "/b/go".to_string());
    build_env.insert("GOOS".to_string(), "linux".to_string());
    build_env.insert("GOARCH".to_string(), "arm64".to_string());
    let mut test_env = ScopedEnv::new();
    test_env.insert("GOPATH".to_string(), "/b/go".to_string());

    go.build("example.com/cmd/tool", "-X main.v=1", &build_env, true)
        .await
        .unwrap();
    go.test("example.com/cmd/tool", &test_env).await.unwrap();

    let lines = read_log(&log);
    assert_eq!(lines[0], "build GOOS=linux GOARCH=arm64");
    assert_eq!(lines[1], "test GOOS= GOARCH=");
}

#[tokio::test]
async fn test_go_runs_in_workspace_root() {
    let bin = tempfile::tempdir().unwrap();
    let workspace = tempfile::tempdir().unwrap();
    let log = bin.path().join("go.log");
    let path = bin.path().join("go");
    let script = format!("#!/bin/sh\necho \"$1 $(pwd -P)\" >> {}\n", log.display());
    std::fs::write(&path, script).unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();

    let go = GoToolchain::new(path.to_string_lossy()).with_workdir(workspace.path());
    let env = ScopedEnv::new();
    go.build("example.com/cmd/tool", "", &env, true)
        .await
        .unwrap();
    go.test("example.com/cmd/tool", &env).await.unwrap();

    let root = workspace.path().canonicalize().unwrap();
    let lines = read_log(&log);
    assert_eq!(lines, vec![
        format!("build {}", root.display()),
        format!("test {}", root.display()),
    ]);
}

#[tokio::test]
async fn test_go_test_failure_carries_stdout() {
    let bin = tempfile::tempdir().unwrap();
    let path = bin.path().join("go");
    std::fs::write(
        &path,
        "#!/bin/sh\necho '--- FAIL: TestImport (0.00s)'\necho FAIL\nexit 1\n",
    )
    .unwrap();
    let mut perms = std::fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).unwrap();

    let go = GoToolchain::new(path.to_string_lossy());
    let err = go
        .test("example.com/cmd/tool", &ScopedEnv::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ToolError::CommandFailed { exit_code: 1, .. }));
    assert!(err.to_string().contains("--- FAIL: TestImport"));
}

#[tokio::test]
async fn test_missing_jiri_binary() {
    let workspace = tempfile::tempdir().unwrap();
    let jiri = JiriTool::new(
        JiriConfig::new(workspace.path()).with_binary("/nonexistent/bin/jiri"),
    );
    let err = jiri.ensure_tool().await.unwrap_err();
    assert!(matches!(err, ToolError::NotFound { .. }));
}
