/*!
 * Per-video enhancement workflow.
 *
 * Ties the enhancement API to the enhancement store: a video is submitted
 * at most once, and its latest transcript is turned into a subtitle track.
 */

use log::info;
use serde_json::Value;

use crate::captions::{entries_from_json, to_subtitle_track, SubtitleTrack};
use crate::catalog::{DisciplineCatalog, EnhancementStore};
use crate::enhancement::{EnhancementApi, EnhancementRequest};
use crate::errors::AppError;

/// Result of [`EnhancementWorkflow::request_for_video`]
#[derive(Debug, Clone, PartialEq)]
pub enum RequestOutcome {
    /// The store already had a request for this video; nothing was sent
    AlreadyRequested,
    /// The service accepted the request; carries its answer, if any
    Requested(Option<Value>),
}

pub struct EnhancementWorkflow<A, S> {
    api: A,
    store: S,
}

impl<A: EnhancementApi, S: EnhancementStore> EnhancementWorkflow<A, S> {
    pub fn new(api: A, store: S) -> Self {
        Self { api, store }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn is_requested(&self, video_id: &str) -> bool {
        self.store.is_requested(video_id)
    }

    pub fn is_ready(&self, video_id: &str) -> bool {
        self.store.is_ready(video_id)
    }

    /// Submit `request` for a video unless one was already recorded
    pub async fn request_for_video(
        &self,
        video_id: &str,
        request: &EnhancementRequest,
        catalog: &dyn DisciplineCatalog,
    ) -> Result<RequestOutcome, AppError> {
        if self.store.is_requested(video_id) {
            info!("Enhancement already requested for video {}", video_id);
            return Ok(RequestOutcome::AlreadyRequested);
        }

        let answer = self.api.create_from_url(request, catalog).await?;
        let enhancement_id = answer
            .as_ref()
            .and_then(|value| value.get("id"))
            .and_then(Value::as_str)
            .map(str::to_string);

        info!(
            "Enhancement requested for video {} ({})",
            video_id,
            enhancement_id.as_deref().unwrap_or("no id returned")
        );
        self.store.mark_requested(video_id, enhancement_id);
        Ok(RequestOutcome::Requested(answer))
    }

    /// Build the subtitle track of a video from the latest enhancement version
    /// and mark the video ready
    pub async fn captions_for_video(
        &self,
        video_id: &str,
        enhancement_id: &str,
        duration_seconds: f64,
    ) -> Result<SubtitleTrack, AppError> {
        let version = self.api.get_latest_version(enhancement_id).await?;
        let entries = entries_from_json(&version)?;
        let track = to_subtitle_track(&entries, duration_seconds);

        info!(
            "Built {} captions out of {} transcript entries for video {}",
            track.len(),
            entries.len(),
            video_id
        );
        self.store.mark_ready(video_id);
        Ok(track)
    }
}
