use crate::{
    foundation::core::{FrameIndex, Progress},
    foundation::error::{ReelError, ReelResult},
};

/// Linear map from scroll progress to a frame index in a sequence of `count` frames.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameMapper {
    count: usize,
}

impl FrameMapper {
    pub fn new(count: usize) -> ReelResult<Self> {
        if count == 0 {
            return Err(ReelError::validation("frame mapper needs at least one frame"));
        }
        Ok(Self { count })
    }

    pub fn count(self) -> usize {
        self.count
    }

    /// `clamp(round(progress * (count - 1)), 0, count - 1)`, defined for every input.
    pub fn index(self, progress: f64) -> FrameIndex {
        let last = (self.count - 1) as f64;
        round_to_index(progress * last, self.count)
    }

    pub fn index_for(self, progress: Progress) -> FrameIndex {
        self.index(progress.get())
    }
}

/// Round a fractional frame position and clamp it into `[0, count - 1]`. `NaN` maps to 0.
pub(crate) fn round_to_index(position: f64, count: usize) -> FrameIndex {
    if count == 0 || position.is_nan() {
        return FrameIndex(0);
    }
    let last = count - 1;
    let rounded = position.round();
    if rounded <= 0.0 {
        FrameIndex(0)
    } else if rounded >= last as f64 {
        FrameIndex(last)
    } else {
        FrameIndex(rounded as usize)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/mapper.rs"]
mod tests;
