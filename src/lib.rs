/*!
 * # podenhance - AI enhancement client for a video platform
 *
 * A Rust library for requesting AI transcription of videos from a remote
 * enhancement service and turning the transcripts into subtitle tracks.
 *
 * ## Features
 *
 * - Client-credentials authentication with a cached bearer token
 * - Typed client for the enhancement endpoints (list, fetch, create from URL, versions)
 * - Recovery of a JSON object embedded in a noisy response body
 * - Transcript to WebVTT-like subtitle track conversion, clipped to the video duration
 * - Per-video "requested" / "ready" bookkeeping
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `enhancement`: Enhancement service client:
 *   - `enhancement::token`: Bearer token cache
 *   - `enhancement::client`: REST client
 *   - `enhancement::extract`: Embedded JSON recovery
 *   - `enhancement::models`: Request and response bodies
 * - `captions`: Subtitle track conversion and time formatting
 * - `catalog`: Discipline catalog and enhancement store
 * - `workflow`: Per-video enhancement workflow
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod captions;
pub mod catalog;
pub mod enhancement;
pub mod errors;
pub mod workflow;

// Re-export main types for easier usage
pub use app_config::{ApiConfig, Config, CredentialsConfig};
pub use captions::{convert_time, to_subtitle_track, Caption, CaptionEntry, SubtitleTrack};
pub use catalog::{DisciplineCatalog, EnhancementStore, InMemoryEnhancementStore, StaticDisciplineCatalog};
pub use enhancement::extract::{extract_json, try_extract_json};
pub use enhancement::{EnhancementApi, EnhancementClient, EnhancementRequest};
pub use errors::{AppError, CaptionError, EnhancementError};
pub use workflow::{EnhancementWorkflow, RequestOutcome};
