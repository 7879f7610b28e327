use std::{
    sync::{Arc, OnceLock},
    thread::JoinHandle,
};

use rayon::prelude::*;

use crate::{
    assets::decode::{FrameImage, decode_image},
    assets::sequence::{FrameSequence, SequenceSpec},
    assets::source::FrameSource,
    foundation::core::FrameIndex,
    foundation::error::{ReelError, ReelResult},
};

#[derive(Clone, Debug, Default)]
/// Worker pool controls for preloading.
pub struct PreloadOpts {
    /// Optional explicit worker thread count. `None` uses rayon's default.
    pub threads: Option<usize>,
}

/// Load every frame of `spec` from `source` and wait for all of them to settle.
///
/// Individual failures are logged and leave a hole; they never fail the batch. The
/// returned sequence always has exactly `spec.count` slots. Errors are only returned for
/// an invalid `spec` or an unusable worker configuration.
#[tracing::instrument(skip(source, opts), fields(base = %spec.base_path, count = spec.count))]
pub fn preload_sequence(
    spec: &SequenceSpec,
    source: &dyn FrameSource,
    opts: &PreloadOpts,
) -> ReelResult<FrameSequence> {
    spec.validate()?;
    let pool = build_thread_pool(opts.threads)?;

    let slots: Vec<Option<FrameImage>> = pool.install(|| {
        (0..spec.count)
            .into_par_iter()
            .map(|i| load_slot(spec, source, FrameIndex(i)))
            .collect()
    });

    let seq = FrameSequence::from_slots(slots);
    tracing::debug!(
        loaded = seq.loaded_count(),
        missing = seq.len() - seq.loaded_count(),
        "frame preload settled"
    );
    Ok(seq)
}

fn load_slot(spec: &SequenceSpec, source: &dyn FrameSource, index: FrameIndex) -> Option<FrameImage> {
    let asset_path = spec.asset_path(index);
    let loaded = source
        .fetch(&asset_path)
        .and_then(|bytes| decode_image(&bytes));
    match loaded {
        Ok(img) => Some(img),
        Err(err) => {
            tracing::error!(file = %spec.file_name(index), error = %err, "failed to load frame image");
            None
        }
    }
}

fn build_thread_pool(threads: Option<usize>) -> ReelResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(ReelError::validation(
            "preload 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| ReelError::asset(format!("failed to build rayon thread pool: {e}")))
}

/// Starts background preloads.
pub struct Preloader;

impl Preloader {
    /// Run [`preload_sequence`] on a background thread.
    ///
    /// The returned handle reports ready only once every slot has settled.
    pub fn spawn(
        spec: SequenceSpec,
        source: Arc<dyn FrameSource>,
        opts: PreloadOpts,
    ) -> ReelResult<PreloadHandle> {
        spec.validate()?;
        let done = Arc::new(OnceLock::new());
        let failed = Arc::new(OnceLock::new());
        let worker_done = Arc::clone(&done);
        let worker_failed = Arc::clone(&failed);
        let worker = std::thread::Builder::new()
            .name("scrollreel-preload".to_string())
            .spawn(move || -> ReelResult<Arc<FrameSequence>> {
                match preload_sequence(&spec, source.as_ref(), &opts) {
                    Ok(seq) => {
                        let seq = Arc::new(seq);
                        let _ = worker_done.set(Arc::clone(&seq));
                        Ok(seq)
                    }
                    Err(err) => {
                        tracing::error!(error = %err, "background frame preload failed");
                        let _ = worker_failed.set(err.to_string());
                        Err(err)
                    }
                }
            })
            .map_err(|e| ReelError::asset(format!("failed to spawn preload thread: {e}")))?;
        Ok(PreloadHandle {
            done,
            failed,
            worker: Some(worker),
        })
    }
}

/// Ready signal and result slot of a background preload.
pub struct PreloadHandle {
    done: Arc<OnceLock<Arc<FrameSequence>>>,
    failed: Arc<OnceLock<String>>,
    worker: Option<JoinHandle<ReelResult<Arc<FrameSequence>>>>,
}

impl PreloadHandle {
    /// Wrap an already loaded sequence; ready immediately.
    pub fn ready(seq: Arc<FrameSequence>) -> Self {
        let done = OnceLock::new();
        let _ = done.set(seq);
        Self {
            done: Arc::new(done),
            failed: Arc::new(OnceLock::new()),
            worker: None,
        }
    }

    pub fn is_ready(&self) -> bool {
        self.done.get().is_some()
    }

    /// Why the batch could not run at all, once the worker gave up. A handle that failed
    /// never becomes ready.
    pub fn failure(&self) -> Option<&str> {
        self.failed.get().map(String::as_str)
    }

    /// The loaded sequence, once ready.
    pub fn frames(&self) -> Option<Arc<FrameSequence>> {
        self.done.get().cloned()
    }

    /// Block until the batch settles.
    pub fn wait(mut self) -> ReelResult<Arc<FrameSequence>> {
        if let Some(worker) = self.worker.take() {
            return worker
                .join()
                .map_err(|_| ReelError::asset("preload worker panicked"))?;
        }
        self.done
            .get()
            .cloned()
            .ok_or_else(|| ReelError::asset("preload finished without a sequence"))
    }
}

impl std::fmt::Debug for PreloadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreloadHandle")
            .field("ready", &self.is_ready())
            .field("failure", &self.failure())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/preload.rs"]
mod tests;
