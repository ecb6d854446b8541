//! Validated build request.

use crate::error::{RecipeError, Result};
use crate::platform::TargetPlatform;
use crate::properties::BuildProperties;
use crate::trigger::{Checkout, TriggerSource};
use serde::{Deserialize, Serialize};

/// Everything the pipeline needs, checked up front.
///
/// Building one performs no side effects, so an invalid request aborts the
/// run before the workspace is touched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRequest {
    pub trigger: TriggerSource,
    pub checkout: Checkout,
    pub manifest: String,
    pub remote: String,
    pub target: TargetPlatform,
}

impl BuildRequest {
    pub fn from_properties(props: &BuildProperties) -> Result<Self> {
        let trigger = TriggerSource::from_properties(props)?;
        let checkout = trigger.resolve()?;
        let manifest = required(props.manifest.as_deref(), "manifest")?;
        let remote = required(props.remote.as_deref(), "remote")?;
        let target = required(props.target.as_deref(), "target")?.parse::<TargetPlatform>()?;

        Ok(BuildRequest {
            trigger,
            checkout,
            manifest,
            remote,
            target,
        })
    }
}

fn required(value: Option<&str>, property: &'static str) -> Result<String> {
    value
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or(RecipeError::MissingProperty(property))
}
