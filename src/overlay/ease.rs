/// Shaping curve for one track segment, applied to the normalized position `t` between
/// two breakpoints. Names follow CSS timing keywords so configs read like stylesheets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    #[default]
    Linear,
    /// Quadratic acceleration.
    EaseIn,
    /// Quadratic deceleration; panels settle into place.
    EaseOut,
    /// Smoothstep, zero slope at both ends.
    EaseInOut,
    /// Hold the segment's start value until the next breakpoint.
    Step,
}

impl Ease {
    pub fn apply(self, t: f64) -> f64 {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        match self {
            Self::Linear => t,
            Self::EaseIn => t * t,
            Self::EaseOut => t * (2.0 - t),
            Self::EaseInOut => t * t * (3.0 - 2.0 * t),
            Self::Step => {
                if t >= 1.0 {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/ease.rs"]
mod tests;
