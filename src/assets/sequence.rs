use std::sync::Arc;

use crate::{
    assets::decode::FrameImage,
    foundation::core::FrameIndex,
    foundation::error::{ReelError, ReelResult},
};

/// Number of frames in the stock product sequence.
pub const DEFAULT_FRAME_COUNT: usize = 192;
/// Zero-padding width of frame file names (`00001.png`).
pub const DEFAULT_NAME_DIGITS: usize = 5;
/// File extension of frame images.
pub const DEFAULT_EXTENSION: &str = "png";

/// File name for the frame at one-based `ordinal`, zero-padded to `digits`.
///
/// `frame_file_name(1, 5, "png") == "00001.png"`.
pub fn frame_file_name(ordinal: usize, digits: usize, extension: &str) -> String {
    format!("{:0width$}.{}", ordinal, extension, width = digits)
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Where a frame sequence lives and how its files are named.
pub struct SequenceSpec {
    /// Directory (asset path prefix) holding the frames. Empty means "source root".
    pub base_path: String,
    /// Fixed number of frames.
    pub count: usize,
    /// Zero-padding width of the one-based file ordinal.
    pub digits: usize,
    /// File extension without the dot.
    pub extension: String,
}

impl SequenceSpec {
    /// Stock naming (`00001.png` .. `NNNNN.png`) under `base_path`.
    pub fn new(base_path: impl Into<String>, count: usize) -> Self {
        Self {
            base_path: base_path.into(),
            count,
            digits: DEFAULT_NAME_DIGITS,
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }

    pub fn validate(&self) -> ReelResult<()> {
        if self.count == 0 {
            return Err(ReelError::validation("frame count must be > 0"));
        }
        if self.digits == 0 {
            return Err(ReelError::validation("frame name digits must be > 0"));
        }
        if self.extension.is_empty() {
            return Err(ReelError::validation("frame extension must be non-empty"));
        }
        Ok(())
    }

    /// File name of the frame at `index`; index 0 is always ordinal 1.
    pub fn file_name(&self, index: FrameIndex) -> String {
        frame_file_name(index.ordinal(), self.digits, &self.extension)
    }

    /// Asset path `{base_path}/{file_name}` handed to a [`FrameSource`](crate::FrameSource).
    pub fn asset_path(&self, index: FrameIndex) -> String {
        let name = self.file_name(index);
        let base = self.base_path.trim_end_matches('/');
        if base.is_empty() {
            name
        } else {
            format!("{base}/{name}")
        }
    }
}

/// Fixed-length, ordered set of frame slots. A slot whose load failed stays `None`.
///
/// The slot count never changes after construction.
#[derive(Clone, Debug)]
pub struct FrameSequence {
    slots: Box<[Option<Arc<FrameImage>>]>,
}

impl FrameSequence {
    /// Build a sequence from per-slot outcomes, in index order.
    pub fn from_slots(slots: Vec<Option<FrameImage>>) -> Self {
        Self {
            slots: slots.into_iter().map(|s| s.map(Arc::new)).collect(),
        }
    }

    /// A sequence of `count` empty slots.
    pub fn empty(count: usize) -> Self {
        Self {
            slots: vec![None; count].into_boxed_slice(),
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Image at `index`, or `None` for holes and out-of-range indices.
    pub fn get(&self, index: FrameIndex) -> Option<&FrameImage> {
        self.slots.get(index.0).and_then(|s| s.as_deref())
    }

    pub fn loaded_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Indices whose load failed.
    pub fn missing(&self) -> Vec<FrameIndex> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_none())
            .map(|(i, _)| FrameIndex(i))
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/sequence.rs"]
mod tests;
