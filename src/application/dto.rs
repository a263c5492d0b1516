//! Request and response types for the application layer

use std::path::PathBuf;

use crate::application::ValidationError;
use crate::generation::{AppId, BuildOutcome, OutputKind};

/// One generation request: the model's completed text plus the caller's
/// routing decision. Permissions and app existence were already checked by
/// the app-management collaborator issuing this.
#[derive(Debug, Clone)]
pub struct GenerateAppRequest {
    pub kind: OutputKind,
    pub app_id: AppId,
    pub model_text: String,
}

impl GenerateAppRequest {
    /// Validate the request before any work happens.
    ///
    /// Framework projects tolerate empty text (it is only README notes);
    /// the parsed kinds require some content up front.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.app_id == 0 {
            return Err(ValidationError::InvalidAppId);
        }
        if self.kind != OutputKind::FrameworkProject && self.model_text.trim().is_empty() {
            return Err(ValidationError::EmptyModelText(self.kind));
        }
        Ok(())
    }
}

/// What the caller gets back: the materialized location and, for framework
/// projects, the build report.
#[derive(Debug, Clone)]
pub struct GenerateAppResponse {
    pub output_path: PathBuf,
    pub build: Option<BuildOutcome>,
}
