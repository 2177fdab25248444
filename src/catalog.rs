/*!
 * Collaborators of the enhancement workflow.
 *
 * The discipline catalog supplies the subject titles sent with every
 * creation request. The enhancement store records, per video, whether an
 * enhancement was requested and whether its result is ready.
 */

use std::collections::HashMap;
use std::sync::Arc;
use parking_lot::RwLock;
use log::debug;

/// Ordered list of discipline titles
pub trait DisciplineCatalog: Send + Sync {
    /// Titles in catalog order
    fn titles(&self) -> Vec<String>;

    fn is_empty(&self) -> bool {
        self.titles().is_empty()
    }
}

/// Fixed catalog, typically read from the configuration file
#[derive(Debug, Clone, Default)]
pub struct StaticDisciplineCatalog {
    titles: Vec<String>,
}

impl StaticDisciplineCatalog {
    pub fn new<I, S>(titles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            titles: titles.into_iter().map(Into::into).collect(),
        }
    }
}

impl DisciplineCatalog for StaticDisciplineCatalog {
    fn titles(&self) -> Vec<String> {
        self.titles.clone()
    }
}

/// Enhancement state of one video
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancementRecord {
    /// Identifier assigned by the service, when it returned one
    pub enhancement_id: Option<String>,
    pub is_ready: bool,
}

/// Persistence of enhancement state, keyed by video identifier
pub trait EnhancementStore: Send + Sync {
    /// An enhancement was already requested for this video
    fn is_requested(&self, video_id: &str) -> bool;

    /// The enhancement of this video is ready
    fn is_ready(&self, video_id: &str) -> bool;

    /// Record a request
    fn mark_requested(&self, video_id: &str, enhancement_id: Option<String>);

    /// Record that the enhancement result is available
    fn mark_ready(&self, video_id: &str);
}

/// Thread-safe in-memory store
#[derive(Debug, Clone, Default)]
pub struct InMemoryEnhancementStore {
    records: Arc<RwLock<HashMap<String, EnhancementRecord>>>,
}

impl InMemoryEnhancementStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record of a video, if any
    pub fn get(&self, video_id: &str) -> Option<EnhancementRecord> {
        self.records.read().get(video_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }
}

impl EnhancementStore for InMemoryEnhancementStore {
    fn is_requested(&self, video_id: &str) -> bool {
        self.records.read().contains_key(video_id)
    }

    fn is_ready(&self, video_id: &str) -> bool {
        self.records
            .read()
            .get(video_id)
            .is_some_and(|record| record.is_ready)
    }

    fn mark_requested(&self, video_id: &str, enhancement_id: Option<String>) {
        debug!("Enhancement requested for video {}", video_id);
        self.records.write().insert(
            video_id.to_string(),
            EnhancementRecord {
                enhancement_id,
                is_ready: false,
            },
        );
    }

    fn mark_ready(&self, video_id: &str) {
        let mut records = self.records.write();
        let record = records
            .entry(video_id.to_string())
            .or_insert(EnhancementRecord {
                enhancement_id: None,
                is_ready: false,
            });
        record.is_ready = true;
    }
}
