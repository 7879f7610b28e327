use std::{cell::RefCell, rc::Rc, sync::Arc};

use crate::{
    assets::preload::PreloadHandle,
    assets::sequence::FrameSequence,
    config::SceneConfig,
    foundation::core::{FrameIndex, Progress},
    foundation::error::ReelResult,
    overlay::choreo::{Choreography, PanelState},
    render::renderer::{FrameRenderer, RenderOutcome},
    render::surface::RenderTarget,
    scroll::mapper::FrameMapper,
    scroll::tracker::{ProgressObserver, ProgressSource, ProgressUpdate, SharedObserver, Subscription},
};

/// Whether the scene can draw yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneStatus {
    /// Frames are still loading; nothing is drawn.
    Loading,
    /// All frame loads settled.
    Ready,
    /// The preload could not run; the scene will never draw.
    Failed,
}

enum Frames {
    Loading(PreloadHandle),
    Ready(Arc<FrameSequence>),
    Failed(String),
}

impl Frames {
    fn status(&self) -> SceneStatus {
        match self {
            Self::Loading(_) => SceneStatus::Loading,
            Self::Ready(_) => SceneStatus::Ready,
            Self::Failed(_) => SceneStatus::Failed,
        }
    }
}

/// Everything derived from the latest progress value.
#[derive(Clone, Debug, PartialEq)]
pub struct SceneSnapshot {
    pub progress: Progress,
    pub frame: FrameIndex,
    /// Result of the most recent draw; `None` while loading.
    pub outcome: Option<RenderOutcome>,
    pub panels: Vec<PanelState>,
}

/// The scroll-driven sequence: preloaded frames, a canvas target and the overlay
/// choreography, all recomputed top-down from one progress value.
///
/// Attach it to a [`ProgressSource`] with [`ScrollScene::attach`] or feed it updates
/// directly.
pub struct ScrollScene<T> {
    frames: Frames,
    mapper: FrameMapper,
    renderer: FrameRenderer,
    choreography: Choreography,
    target: T,
    progress: Progress,
    outcome: Option<RenderOutcome>,
}

impl<T: RenderTarget> ScrollScene<T> {
    pub fn new(
        frames: PreloadHandle,
        target: T,
        mapper: FrameMapper,
        renderer: FrameRenderer,
        choreography: Choreography,
    ) -> Self {
        let mut scene = Self {
            frames: Frames::Loading(frames),
            mapper,
            renderer,
            choreography,
            target,
            progress: Progress::START,
            outcome: None,
        };
        scene.poll();
        scene
    }

    pub fn from_config(config: &SceneConfig, frames: PreloadHandle, target: T) -> ReelResult<Self> {
        config.validate()?;
        Ok(Self::new(
            frames,
            target,
            FrameMapper::new(config.frame_count)?,
            FrameRenderer::new(config.render_settings()),
            config.choreography()?,
        ))
    }

    pub fn status(&self) -> SceneStatus {
        self.frames.status()
    }

    /// Why the preload failed, when [`SceneStatus::Failed`].
    pub fn failure(&self) -> Option<&str> {
        match &self.frames {
            Frames::Failed(reason) => Some(reason.as_str()),
            _ => None,
        }
    }

    /// Subscribe `scene` to `source` and adopt the source's current progress.
    ///
    /// Sources only notify on change, so a scene subscribed to a source that already
    /// moved away from the start would otherwise lag behind it.
    pub fn attach(scene: &Rc<RefCell<Self>>, source: &mut dyn ProgressSource) -> Subscription
    where
        T: 'static,
    {
        let subscription = source.subscribe(Box::new(SharedObserver(Rc::clone(scene))));
        scene.borrow_mut().sync_with(&*source);
        subscription
    }

    /// Adopt `source`'s current progress and redraw.
    pub fn sync_with(&mut self, source: &dyn ProgressSource) {
        self.set_progress(source.progress());
    }

    /// Check the preload; on the transition to ready, draw the current frame once.
    pub fn poll(&mut self) -> SceneStatus {
        if self.promote_if_ready() {
            self.redraw();
        }
        self.status()
    }

    fn promote_if_ready(&mut self) -> bool {
        let Frames::Loading(handle) = &self.frames else {
            return false;
        };
        if let Some(reason) = handle.failure() {
            let reason = reason.to_string();
            tracing::error!(error = %reason, "frame preload failed; scene will not draw");
            self.frames = Frames::Failed(reason);
            return false;
        }
        let Some(seq) = handle.frames() else {
            return false;
        };
        if seq.len() != self.mapper.count() {
            tracing::warn!(
                loaded = seq.len(),
                expected = self.mapper.count(),
                "frame sequence length differs from configured frame count"
            );
        }
        self.frames = Frames::Ready(seq);
        true
    }

    /// Apply a new progress value and redraw.
    pub fn set_progress(&mut self, progress: Progress) {
        self.progress = progress;
        self.promote_if_ready();
        self.redraw();
    }

    pub fn progress(&self) -> Progress {
        self.progress
    }

    pub fn current_frame(&self) -> FrameIndex {
        self.mapper.index_for(self.progress)
    }

    pub fn panels(&self) -> Vec<PanelState> {
        self.choreography.sample(self.progress)
    }

    pub fn last_outcome(&self) -> Option<RenderOutcome> {
        self.outcome
    }

    pub fn frames(&self) -> Option<&Arc<FrameSequence>> {
        match &self.frames {
            Frames::Ready(seq) => Some(seq),
            Frames::Loading(_) | Frames::Failed(_) => None,
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Mutable access to the render target, e.g. to apply a new layout size before a
    /// resize notification.
    pub fn target_mut(&mut self) -> &mut T {
        &mut self.target
    }

    pub fn snapshot(&self) -> SceneSnapshot {
        SceneSnapshot {
            progress: self.progress,
            frame: self.current_frame(),
            outcome: self.outcome,
            panels: self.panels(),
        }
    }

    /// Draw the frame for the current progress. No-op unless ready.
    pub fn redraw(&mut self) {
        let Frames::Ready(seq) = &self.frames else {
            return;
        };
        let index = self.mapper.index_for(self.progress);
        match self.renderer.render(&mut self.target, seq, index.0 as f64) {
            Ok(outcome) => self.outcome = Some(outcome),
            Err(err) => {
                tracing::warn!(frame = index.0, error = %err, "frame draw failed");
            }
        }
    }
}

impl<T: RenderTarget> ProgressObserver for ScrollScene<T> {
    fn on_progress(&mut self, update: ProgressUpdate) {
        self.set_progress(update.progress);
    }
}

impl<T> std::fmt::Debug for ScrollScene<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollScene")
            .field("status", &self.frames.status())
            .field("progress", &self.progress)
            .field("outcome", &self.outcome)
            .finish()
    }
}
