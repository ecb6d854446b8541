//! jiri-recipe: build recipe CLI
//!
//! Checks out a jiri workspace, applies a Gerrit patch for commit-queue runs,
//! then cross-compiles and tests the jiri binary.
//!
//! ## Commands
//!
//! - `run`: execute the recipe against the real jiri/git/go tools
//! - `plan`: resolve properties and print the tool calls a run would make

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use recipe_core::{BuildProperties, BuildRequest, Collaborators, Recipe, Workspace};
use recipe_tools::fakes::RecordingTools;
use recipe_tools::{GitCli, GoToolchain, JiriConfig, JiriTool};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "jiri-recipe")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Check out, cross-compile and test jiri", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the recipe
    Run {
        #[command(flatten)]
        properties: PropertyArgs,

        #[command(flatten)]
        tools: ToolArgs,
    },

    /// Print the tool calls a run would make, without running anything
    Plan {
        #[command(flatten)]
        properties: PropertyArgs,

        /// Build workspace root
        #[arg(long, env = "JIRI_RECIPE_WORKSPACE", default_value = ".")]
        workspace: PathBuf,
    },
}

/// Build properties. Flags override values read from `--properties`.
#[derive(Args, Debug, Default)]
struct PropertyArgs {
    /// JSON file with build properties
    #[arg(long = "properties", value_name = "FILE")]
    file: Option<PathBuf>,

    /// Gerrit host
    #[arg(long)]
    gerrit_host: Option<String>,

    /// Gerrit project
    #[arg(long)]
    gerrit_project: Option<String>,

    /// Gerrit patch ref
    #[arg(long)]
    gerrit_patch_ref: Option<String>,

    /// Full URL of the git repository
    #[arg(long)]
    repository: Option<String>,

    /// Refspec to check out (default: master)
    #[arg(long)]
    refspec: Option<String>,

    /// Build category ("cq" for commit-queue runs)
    #[arg(long)]
    category: Option<String>,

    /// jiri manifest to import
    #[arg(long)]
    manifest: Option<String>,

    /// Remote manifest repository
    #[arg(long)]
    remote: Option<String>,

    /// Target to build, <os>-<arch>
    #[arg(long)]
    target: Option<String>,
}

impl PropertyArgs {
    fn load(self) -> Result<BuildProperties> {
        let mut props = match &self.file {
            Some(path) => BuildProperties::from_path(path)
                .with_context(|| format!("Failed to read properties from {}", path.display()))?,
            None => BuildProperties::default(),
        };

        let overrides = [
            (&mut props.gerrit_host, self.gerrit_host),
            (&mut props.gerrit_project, self.gerrit_project),
            (&mut props.gerrit_patch_ref, self.gerrit_patch_ref),
            (&mut props.repo_url, self.repository),
            (&mut props.refspec, self.refspec),
            (&mut props.category, self.category),
            (&mut props.manifest, self.manifest),
            (&mut props.remote, self.remote),
            (&mut props.target, self.target),
        ];
        for (field, value) in overrides {
            if value.is_some() {
                *field = value;
            }
        }

        Ok(props)
    }
}

/// Tool locations and limits for real runs.
#[derive(Args, Debug)]
struct ToolArgs {
    /// Build workspace root
    #[arg(long, env = "JIRI_RECIPE_WORKSPACE", default_value = ".")]
    workspace: PathBuf,

    /// jiri executable
    #[arg(long, env = "JIRI_BIN", default_value = "jiri")]
    jiri_bin: String,

    /// git executable
    #[arg(long, env = "GIT_BIN", default_value = "git")]
    git_bin: String,

    /// go executable
    #[arg(long, env = "GO_BIN", default_value = "go")]
    go_bin: String,

    /// Per-command timeout in seconds (0 = none)
    #[arg(long, env = "JIRI_RECIPE_STEP_TIMEOUT", default_value = "0")]
    step_timeout: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    recipe_core::init_tracing(cli.json, level);

    let output = match cli.command {
        Commands::Run { properties, tools } => cmd_run(properties.load()?, tools).await?,
        Commands::Plan {
            properties,
            workspace,
        } => cmd_plan(properties.load()?, &absolute(&workspace)?).await?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Run the recipe with the real tools and return the report.
async fn cmd_run(props: BuildProperties, tools: ToolArgs) -> Result<Value> {
    let root = absolute(&tools.workspace)?;
    info!(workspace = %root.display(), "Starting jiri recipe");

    let jiri = JiriTool::new(
        JiriConfig::new(&root)
            .with_binary(tools.jiri_bin)
            .with_timeout(tools.step_timeout),
    );
    let git = GitCli::new(tools.git_bin);
    let go = GoToolchain::new(tools.go_bin)
        .with_workdir(&root)
        .with_timeout(tools.step_timeout);

    let recipe = Recipe::new(Workspace::new(root), Collaborators::new(&jiri, &git, &go));
    let report = recipe.run(&props).await.context("jiri recipe failed")?;

    info!(
        run_id = %report.run_id,
        duration_ms = report.duration_ms,
        "jiri recipe completed successfully"
    );
    Ok(serde_json::to_value(&report)?)
}

/// Run the recipe against recording fakes and return the calls made.
async fn cmd_plan(props: BuildProperties, root: &Path) -> Result<Value> {
    let request = BuildRequest::from_properties(&props).context("Invalid build properties")?;

    let tools = RecordingTools::new();
    let recipe = Recipe::new(Workspace::new(root), Collaborators::from_one(&tools));
    recipe
        .execute(&request)
        .await
        .context("Simulated run failed")?;

    Ok(json!({
        "trigger": request.trigger,
        "checkout": request.checkout,
        "target": request.target.to_string(),
        "calls": tools.calls(),
    }))
}

fn absolute(path: &Path) -> Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Failed to read current directory")?;
    Ok(cwd.join(path))
}
