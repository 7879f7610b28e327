//! scrollreel plays a pre-rendered image sequence in step with page scroll.
//!
//! A tall scroll container maps its scroll span to a progress value in `[0, 1]`; that
//! value selects one frame of a fixed-length image sequence, which is drawn into a
//! canvas with "contain" fit, while a small set of overlay text panels fade and slide
//! through a staged reveal driven by the same value.
//!
//! # Pipeline overview
//!
//! 1. **Preload**: `SequenceSpec + FrameSource -> FrameSequence` (join-all, failed slots stay holes)
//! 2. **Track**: scroll / resize events -> [`Progress`] via [`ScrollTracker`]
//! 3. **Map**: [`Progress`] -> [`FrameIndex`] via [`FrameMapper`]
//! 4. **Render**: [`FrameIndex`] -> pixels in a [`RenderTarget`] via [`FrameRenderer`]
//! 5. **Choreograph**: [`Progress`] -> [`PanelState`]s via [`Choreography`]
//!
//! [`ScrollScene`] wires steps 3 to 5 together and subscribes to any [`ProgressSource`].
//!
//! The [`connect`] module carries two optional data-store connectors used by the
//! surrounding site. The animation pipeline does not depend on them.
#![forbid(unsafe_code)]

mod assets;
mod config;
mod foundation;
mod overlay;
mod render;
mod scene;
mod scroll;

pub mod connect;

pub use assets::decode::{FrameImage, decode_image};
pub use assets::preload::{PreloadHandle, PreloadOpts, Preloader, preload_sequence};
pub use assets::sequence::{
    DEFAULT_EXTENSION, DEFAULT_FRAME_COUNT, DEFAULT_NAME_DIGITS, FrameSequence, SequenceSpec,
    frame_file_name,
};
pub use assets::source::{DirSource, FrameSource, MemorySource};
pub use config::{DEFAULT_BACKGROUND_RGBA, DEFAULT_CONTAINER_VIEWPORTS, SceneConfig};
pub use foundation::core::{FrameIndex, PixelSize, Progress, Rect, Size, Vec2, ViewportSize};
pub use foundation::error::{ReelError, ReelResult};
pub use overlay::choreo::{Choreography, PanelId, PanelState, PanelTracks};
pub use overlay::ease::Ease;
pub use overlay::track::{Breakpoint, Lerp, Track};
pub use render::fit::contain_fit;
pub use render::renderer::{FrameRenderer, RenderOutcome, RenderSettings, ScaleFilter};
pub use render::surface::{OffscreenCanvas, RenderTarget, Surface};
pub use scene::{SceneSnapshot, SceneStatus, ScrollScene};
pub use scroll::mapper::FrameMapper;
pub use scroll::tracker::{
    ProgressObserver, ProgressSource, ProgressUpdate, ScrollLayout, ScrollTracker, SharedObserver,
    Subscription, UpdateCause, scroll_progress,
};
