pub use kurbo::{Rect, Size, Vec2};

use crate::foundation::error::{ReelError, ReelResult};

/// Zero-based position of a frame inside a [`FrameSequence`](crate::FrameSequence).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub usize);

impl FrameIndex {
    /// One-based ordinal used when naming frame files.
    pub fn ordinal(self) -> usize {
        self.0 + 1
    }
}

/// Normalized scroll progress, always inside `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd, serde::Serialize)]
pub struct Progress(f64);

impl Progress {
    /// Start of the scroll span.
    pub const START: Self = Self(0.0);
    /// End of the scroll span.
    pub const END: Self = Self(1.0);

    /// Clamp an arbitrary value into `[0, 1]`. `NaN` maps to `0`.
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::START;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Raw value in `[0, 1]`.
    pub fn get(self) -> f64 {
        self.0
    }
}

impl<'de> serde::Deserialize<'de> for Progress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        f64::deserialize(deserializer).map(Self::new)
    }
}

/// Layout size of an element in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Backing-store size in physical pixels for device pixel ratio `dpr`.
    ///
    /// Non-finite or non-positive ratios fall back to `1.0`. Fractional products are
    /// truncated, matching how a canvas buffer dimension is assigned.
    pub fn to_physical(self, dpr: f64) -> PixelSize {
        let dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
        fn dim(v: f64) -> u32 {
            if v.is_finite() && v > 0.0 {
                v.min(u32::MAX as f64) as u32
            } else {
                0
            }
        }
        PixelSize {
            width: dim(self.width * dpr),
            height: dim(self.height * dpr),
        }
    }
}

/// Size of a pixel buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PixelSize {
    pub width: u32,
    pub height: u32,
}

impl PixelSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Byte length of a tightly packed RGBA8 buffer of this size.
    pub fn rgba_len(self) -> ReelResult<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(4))
            .ok_or_else(|| ReelError::validation("pixel buffer size overflows usize"))
    }

    pub fn to_size(self) -> Size {
        Size::new(f64::from(self.width), f64::from(self.height))
    }
}
