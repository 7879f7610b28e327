use crate::{
    foundation::core::{Progress, Vec2},
    foundation::error::{ReelError, ReelResult},
    overlay::track::Track,
};

/// Identity of an overlay text panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelId {
    /// Centered headline shown at the top of the scroll.
    Title,
    /// Left-aligned feature callout.
    LeftCallout,
    /// Right-aligned feature callout.
    RightCallout,
    /// Closing call-to-action with a button.
    CallToAction,
}

/// Visual parameters of one panel at a given progress.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PanelState {
    pub id: PanelId,
    pub opacity: f64,
    /// Translation in CSS pixels.
    pub offset: Vec2,
    pub scale: f64,
    /// Whether the panel receives pointer input. Non-interactive panels let scroll and
    /// clicks pass through to the page.
    pub interactive: bool,
}

impl PanelState {
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

/// Tracks driving one panel. Each panel is a pure function of progress.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PanelTracks {
    pub id: PanelId,
    pub opacity: Track<f64>,
    #[serde(default = "zero_offset")]
    pub offset: Track<Vec2>,
    #[serde(default = "unit_scale")]
    pub scale: Track<f64>,
    #[serde(default)]
    pub interactive: bool,
}

fn zero_offset() -> Track<Vec2> {
    Track::constant(Vec2::ZERO)
}

fn unit_scale() -> Track<f64> {
    Track::constant(1.0)
}

impl PanelTracks {
    pub fn sample(&self, progress: Progress) -> PanelState {
        let p = progress.get();
        PanelState {
            id: self.id,
            opacity: self.opacity.sample(p).clamp(0.0, 1.0),
            offset: self.offset.sample(p),
            scale: self.scale.sample(p),
            interactive: self.interactive,
        }
    }
}

/// Staged reveal of the overlay panels across the scroll.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Choreography {
    pub panels: Vec<PanelTracks>,
}

impl Choreography {
    /// The four-panel reveal: title fades up and out, two callouts slide in from opposite
    /// sides, and the call-to-action scales in and stays.
    pub fn standard() -> ReelResult<Self> {
        let title = PanelTracks {
            id: PanelId::Title,
            opacity: Track::linear(&[0.0, 0.1, 0.2], vec![1.0, 1.0, 0.0])?,
            offset: Track::linear(&[0.0, 0.2], vec![Vec2::ZERO, Vec2::new(0.0, -50.0)])?,
            scale: unit_scale(),
            interactive: false,
        };
        let left = PanelTracks {
            id: PanelId::LeftCallout,
            opacity: Track::linear(&[0.2, 0.3, 0.4], vec![0.0, 1.0, 0.0])?,
            offset: Track::linear(
                &[0.2, 0.3, 0.4],
                vec![Vec2::new(-50.0, 0.0), Vec2::ZERO, Vec2::new(-50.0, 0.0)],
            )?,
            scale: unit_scale(),
            interactive: false,
        };
        let right = PanelTracks {
            id: PanelId::RightCallout,
            opacity: Track::linear(&[0.5, 0.6, 0.7], vec![0.0, 1.0, 0.0])?,
            offset: Track::linear(
                &[0.5, 0.6, 0.7],
                vec![Vec2::new(50.0, 0.0), Vec2::ZERO, Vec2::new(50.0, 0.0)],
            )?,
            scale: unit_scale(),
            interactive: false,
        };
        let cta = PanelTracks {
            id: PanelId::CallToAction,
            opacity: Track::linear(&[0.8, 0.9, 1.0], vec![0.0, 1.0, 1.0])?,
            offset: zero_offset(),
            scale: Track::linear(&[0.8, 0.9], vec![0.9, 1.0])?,
            interactive: true,
        };
        Ok(Self {
            panels: vec![title, left, right, cta],
        })
    }

    /// Panel ids must be unique.
    pub fn validate(&self) -> ReelResult<()> {
        for (i, panel) in self.panels.iter().enumerate() {
            if self.panels[..i].iter().any(|p| p.id == panel.id) {
                return Err(ReelError::validation(format!(
                    "duplicate overlay panel {:?}",
                    panel.id
                )));
            }
        }
        Ok(())
    }

    /// Visual state of every panel at `progress`, in declaration order.
    pub fn sample(&self, progress: Progress) -> Vec<PanelState> {
        self.panels.iter().map(|p| p.sample(progress)).collect()
    }

    pub fn panel(&self, id: PanelId) -> Option<&PanelTracks> {
        self.panels.iter().find(|p| p.id == id)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/overlay/choreo.rs"]
mod tests;
