//! Asset fetching with shared progress tracking.
//!
//! An [`AssetSource`] delivers raw bytes; the [`LoadingManager`] assigns
//! request ids, remembers what each request is for and feeds the
//! [`ProgressTracker`]. Completions are polled from the frame loop; a
//! resource only counts as finished once the caller has processed it and
//! called [`LoadingManager::finish`], so progress cannot reach 100 before
//! the model is normalized and the environment installed.

mod decode;
mod progress;

use std::path::PathBuf;

pub use decode::{
    decode_environment, decode_texture, DecodedEnvironment, DecodedImage,
};
pub use progress::{LoadStage, ProgressTracker, ProgressUpdate, StageLabel};
use rustc_hash::FxHashMap;

use crate::catalog::{BakedSlot, Category};
use crate::error::LoadError;
use crate::options::LoadingOptions;

/// Identifies one fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    /// Wrap a raw value.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw value.
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// What a fetched payload will become.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssetKind {
    /// Room geometry.
    Model,
    /// HDR environment panorama.
    Environment,
    /// Baked texture for a fixed mesh group.
    Baked(BakedSlot),
    /// Texture for a catalog variant.
    Variant {
        /// Owning category.
        category: Category,
        /// Index into the category's variants.
        index: usize,
    },
}

/// Delivers asset bytes. Implementations may complete requests in any
/// order and across any number of polls.
pub trait AssetSource {
    /// Begin fetching `path`.
    fn start(&mut self, id: RequestId, path: &str);

    /// Drain finished fetches.
    fn poll(&mut self) -> Vec<(RequestId, Result<Vec<u8>, LoadError>)>;

    /// Abandon every in-flight fetch.
    fn cancel_all(&mut self) {}
}

/// Reads assets from a directory, treating request paths as relative to
/// it. Requests complete on the next poll.
#[derive(Debug)]
pub struct FsSource {
    root: PathBuf,
    queued: Vec<(RequestId, String)>,
}

impl FsSource {
    /// Source rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            queued: Vec::new(),
        }
    }
}

impl AssetSource for FsSource {
    fn start(&mut self, id: RequestId, path: &str) {
        self.queued.push((id, path.to_owned()));
    }

    fn poll(&mut self) -> Vec<(RequestId, Result<Vec<u8>, LoadError>)> {
        self.queued
            .drain(..)
            .map(|(id, path)| {
                let full = self.root.join(path.trim_start_matches('/'));
                let result =
                    std::fs::read(&full).map_err(|e| LoadError::Fetch {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                (id, result)
            })
            .collect()
    }

    fn cancel_all(&mut self) {
        self.queued.clear();
    }
}

/// A fetch that has resolved and is waiting to be processed.
#[derive(Debug)]
pub struct Completion {
    /// Request id to pass back to [`LoadingManager::finish`].
    pub id: RequestId,
    /// Purpose of the request.
    pub kind: AssetKind,
    /// Requested path.
    pub path: String,
    /// Payload or failure.
    pub result: Result<Vec<u8>, LoadError>,
}

/// Tracks in-flight requests and overall progress.
pub struct LoadingManager {
    source: Box<dyn AssetSource>,
    pending: FxHashMap<RequestId, (AssetKind, String)>,
    processing: FxHashMap<RequestId, AssetKind>,
    next_id: u64,
    progress: ProgressTracker,
}

impl LoadingManager {
    /// Manager fetching through `source`.
    pub fn new(source: Box<dyn AssetSource>, options: &LoadingOptions) -> Self {
        Self {
            source,
            pending: FxHashMap::default(),
            processing: FxHashMap::default(),
            next_id: 0,
            progress: ProgressTracker::new(options),
        }
    }

    /// Request `path` for `kind`.
    pub fn request(&mut self, kind: AssetKind, path: &str) -> RequestId {
        let id = RequestId(self.next_id);
        self.next_id += 1;
        let _ = self.pending.insert(id, (kind, path.to_owned()));
        self.progress.item_start();
        log::debug!("loading {path} ({kind:?})");
        self.source.start(id, path);
        id
    }

    /// Collect resolved fetches. Each must be handed back to
    /// [`finish`](Self::finish) once processed.
    pub fn poll(&mut self) -> Vec<Completion> {
        let mut done = Vec::new();
        for (id, result) in self.source.poll() {
            let Some((kind, path)) = self.pending.remove(&id) else {
                log::debug!("ignoring completion for unknown request {id:?}");
                continue;
            };
            if let Err(e) = &result {
                log::error!("{e}");
            }
            let _ = self.processing.insert(id, kind);
            done.push(Completion {
                id,
                kind,
                path,
                result,
            });
        }
        done
    }

    /// Mark a polled request as fully processed.
    pub fn finish(&mut self, id: RequestId) {
        if self.processing.remove(&id).is_some() {
            self.progress.item_end();
        }
    }

    /// Whether `id` is still waiting on its source.
    #[must_use]
    pub fn is_pending(&self, id: RequestId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Number of requests not yet finished.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.pending.len() + self.processing.len()
    }

    /// Progress state.
    #[must_use]
    pub fn progress(&self) -> &ProgressTracker {
        &self.progress
    }

    /// Mutable progress state, for the per-frame tick.
    pub fn progress_mut(&mut self) -> &mut ProgressTracker {
        &mut self.progress
    }

    /// Abandon every in-flight request.
    pub fn cancel_all(&mut self) {
        self.source.cancel_all();
        self.pending.clear();
        self.processing.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headless::MemorySource;

    #[test]
    fn progress_waits_for_finish() {
        let source = MemorySource::new();
        source.insert("/a", b"a".to_vec());
        let mut manager =
            LoadingManager::new(Box::new(source.clone()), &LoadingOptions::default());
        let id = manager.request(AssetKind::Model, "/a");
        let done = manager.poll();
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].kind, AssetKind::Model);
        assert!(!manager.progress().all_loaded());
        manager.finish(id);
        assert!(manager.progress().all_loaded());
        assert_eq!(manager.outstanding(), 0);
    }

    #[test]
    fn failures_still_complete() {
        let source = MemorySource::new();
        let mut manager =
            LoadingManager::new(Box::new(source), &LoadingOptions::default());
        let id = manager.request(AssetKind::Environment, "/missing.hdr");
        let done = manager.poll();
        assert!(matches!(done[0].result, Err(LoadError::Fetch { .. })));
        manager.finish(id);
        assert!(manager.progress().all_loaded());
    }

    #[test]
    fn fs_source_strips_leading_slash() {
        let dir = std::env::temp_dir().join("visualiser-fs-source-test");
        std::fs::create_dir_all(dir.join("t")).unwrap();
        std::fs::write(dir.join("t/x.bin"), b"xyz").unwrap();
        let mut source = FsSource::new(&dir);
        source.start(RequestId(1), "/t/x.bin");
        source.start(RequestId(2), "/t/none.bin");
        let mut out = source.poll();
        out.sort_by_key(|(id, _)| *id);
        assert_eq!(out[0].1.as_deref().ok(), Some(&b"xyz"[..]));
        assert!(out[1].1.is_err());
    }
}
