use crate::{
    foundation::core::Vec2,
    foundation::error::{ReelError, ReelResult},
    overlay::ease::Ease,
};

/// Interpolation contract for track value types.
pub trait Lerp: Sized {
    /// Interpolate from `a` to `b` with normalized factor `t` in `[0, 1]`.
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
/// One breakpoint of a [`Track`].
pub struct Breakpoint<T> {
    /// Progress at which the track takes `value`.
    pub at: f64,
    pub value: T,
    /// Curve applied toward the next breakpoint.
    #[serde(default)]
    pub ease: Ease,
}

/// Piecewise mapping from progress to a value.
///
/// Linear (or eased) between consecutive breakpoints, held at the first value before
/// the first breakpoint and at the last value after the last one.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<Breakpoint<T>>", into = "Vec<Breakpoint<T>>")]
#[serde(bound(serialize = "T: Clone + serde::Serialize"))]
pub struct Track<T> {
    keys: Vec<Breakpoint<T>>,
}

impl<T> Track<T> {
    /// Linear track through `(at[i], values[i])`.
    pub fn linear(at: &[f64], values: Vec<T>) -> ReelResult<Self> {
        if at.len() != values.len() {
            return Err(ReelError::validation(format!(
                "track has {} breakpoints but {} values",
                at.len(),
                values.len()
            )));
        }
        let keys = at
            .iter()
            .zip(values)
            .map(|(&at, value)| Breakpoint {
                at,
                value,
                ease: Ease::Linear,
            })
            .collect();
        Self::from_breakpoints(keys)
    }

    /// Track from explicit breakpoints; they must be non-empty, finite and sorted.
    pub fn from_breakpoints(keys: Vec<Breakpoint<T>>) -> ReelResult<Self> {
        if keys.is_empty() {
            return Err(ReelError::validation("track needs at least one breakpoint"));
        }
        if keys.iter().any(|k| !k.at.is_finite()) {
            return Err(ReelError::validation("track breakpoints must be finite"));
        }
        if !keys.windows(2).all(|w| w[0].at <= w[1].at) {
            return Err(ReelError::validation(
                "track breakpoints must be sorted by progress",
            ));
        }
        Ok(Self { keys })
    }

    /// Track that always yields `value`.
    pub fn constant(value: T) -> Self {
        Self {
            keys: vec![Breakpoint {
                at: 0.0,
                value,
                ease: Ease::Linear,
            }],
        }
    }

    pub fn breakpoints(&self) -> &[Breakpoint<T>] {
        &self.keys
    }
}

impl<T> Track<T>
where
    T: Lerp + Clone,
{
    pub fn sample(&self, progress: f64) -> T {
        let first = &self.keys[0];
        let last = &self.keys[self.keys.len() - 1];
        if progress.is_nan() || progress <= first.at {
            return first.value.clone();
        }
        if progress >= last.at {
            return last.value.clone();
        }

        let idx = self.keys.partition_point(|k| k.at <= progress);
        let a = &self.keys[idx - 1];
        let b = &self.keys[idx];
        let denom = b.at - a.at;
        if denom <= 0.0 {
            return b.value.clone();
        }

        let t = (progress - a.at) / denom;
        T::lerp(&a.value, &b.value, a.ease.apply(t))
    }
}

impl<T> TryFrom<Vec<Breakpoint<T>>> for Track<T> {
    type Error = ReelError;

    fn try_from(keys: Vec<Breakpoint<T>>) -> Result<Self, Self::Error> {
        Self::from_breakpoints(keys)
    }
}

impl<T> From<Track<T>> for Vec<Breakpoint<T>> {
    fn from(track: Track<T>) -> Self {
        track.keys
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/track.rs"]
mod tests;
