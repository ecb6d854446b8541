//! recipe-core: the jiri build recipe
//!
//! Checks out a jiri-managed workspace and cross-compiles and tests the jiri
//! binary:
//! - Resolves trigger properties to a validated checkout and target
//! - Prepares the workspace with jiri (profile, clean, import, update)
//! - Applies the Gerrit patch for commit-queue runs
//! - Stamps the build with commit and time, then builds and tests with go

pub mod error;
pub mod obs;
pub mod pipeline;
pub mod platform;
pub mod properties;
pub mod request;
pub mod stamp;
pub mod step;
pub mod telemetry;
pub mod trigger;
pub mod workspace;

// Re-export key types
pub use error::{RecipeError, Result};
pub use pipeline::{Collaborators, Recipe, RecipeReport};
pub use platform::TargetPlatform;
pub use properties::{BuildProperties, CQ_CATEGORY, DEFAULT_REFSPEC};
pub use request::BuildRequest;
pub use stamp::BuildStamp;
pub use step::{RecipeStep, StepRecord};
pub use telemetry::init_tracing;
pub use trigger::{Checkout, TriggerSource};
pub use workspace::{Workspace, JIRI_PACKAGE};
