//! Results produced by one pipeline run.

use serde::Serialize;

/// Caption, tags and thumbnail produced for one video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    pub caption: String,
    /// May be empty when the provider answer was incomplete.
    pub hashtags: Vec<String>,
    pub keywords: Vec<String>,
    pub thumbnail_url: String,
}

/// Everything a successful run produced, plus the reply text composed from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedVideo {
    /// Public URL of the uploaded video.
    pub video_url: String,
    pub generation: GenerationResult,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingStatus {
    Completed,
    Failed,
}

/// Value handed from the pipeline to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessingOutcome {
    Completed(ProcessedVideo),
    /// `reason` is for logs only; users get a generic notice.
    Failed { reason: String },
}

impl ProcessingOutcome {
    pub fn status(&self) -> ProcessingStatus {
        match self {
            ProcessingOutcome::Completed(_) => ProcessingStatus::Completed,
            ProcessingOutcome::Failed { .. } => ProcessingStatus::Failed,
        }
    }

    pub fn data(&self) -> Option<&ProcessedVideo> {
        match self {
            ProcessingOutcome::Completed(video) => Some(video),
            ProcessingOutcome::Failed { .. } => None,
        }
    }
}
