use std::{fs::File, io::BufReader, path::Path};

use anyhow::Context;

use crate::{
    assets::sequence::{DEFAULT_EXTENSION, DEFAULT_FRAME_COUNT, DEFAULT_NAME_DIGITS, SequenceSpec},
    foundation::error::{ReelError, ReelResult},
    overlay::choreo::Choreography,
    render::renderer::{RenderSettings, ScaleFilter},
};

/// Page background behind the sequence (`#050505`).
pub const DEFAULT_BACKGROUND_RGBA: [u8; 4] = [5, 5, 5, 255];

/// Height of the scroll container in viewport heights (a `400vh` section).
pub const DEFAULT_CONTAINER_VIEWPORTS: f64 = 4.0;

/// Scene description loaded from JSON. Every field except `base_path` has a default.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SceneConfig {
    /// Asset path prefix of the frame images.
    pub base_path: String,
    #[serde(default = "default_frame_count")]
    pub frame_count: usize,
    #[serde(default = "default_digits")]
    pub digits: usize,
    #[serde(default = "default_extension")]
    pub extension: String,
    #[serde(default = "default_container_viewports")]
    pub container_viewports: f64,
    /// Straight-alpha RGBA8 color the canvas is filled with before each draw. Unset, the
    /// canvas is cleared to transparent and the page shows through the letterbox.
    #[serde(default)]
    pub clear_rgba: Option<[u8; 4]>,
    /// Page background, straight-alpha RGBA8, composited under the canvas when a still
    /// image is exported. `null` exports with transparency.
    #[serde(default = "default_background_rgba")]
    pub background_rgba: Option<[u8; 4]>,
    #[serde(default)]
    pub filter: ScaleFilter,
    /// Overlay panels. Defaults to [`Choreography::standard`].
    #[serde(default)]
    pub choreography: Option<Choreography>,
}

fn default_frame_count() -> usize {
    DEFAULT_FRAME_COUNT
}

fn default_digits() -> usize {
    DEFAULT_NAME_DIGITS
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_container_viewports() -> f64 {
    DEFAULT_CONTAINER_VIEWPORTS
}

fn default_background_rgba() -> Option<[u8; 4]> {
    Some(DEFAULT_BACKGROUND_RGBA)
}

impl SceneConfig {
    /// Stock configuration for the sequence under `base_path`.
    pub fn new(base_path: impl Into<String>) -> Self {
        Self {
            base_path: base_path.into(),
            frame_count: DEFAULT_FRAME_COUNT,
            digits: DEFAULT_NAME_DIGITS,
            extension: DEFAULT_EXTENSION.to_string(),
            container_viewports: DEFAULT_CONTAINER_VIEWPORTS,
            clear_rgba: None,
            background_rgba: default_background_rgba(),
            filter: ScaleFilter::default(),
            choreography: None,
        }
    }

    pub fn from_json_str(json: &str) -> ReelResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> ReelResult<Self> {
        let f = File::open(path).with_context(|| format!("open scene config '{}'", path.display()))?;
        let config: Self = serde_json::from_reader(BufReader::new(f))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ReelResult<()> {
        self.sequence_spec().validate()?;
        if !self.container_viewports.is_finite() || self.container_viewports < 1.0 {
            return Err(ReelError::validation(
                "container_viewports must be finite and >= 1",
            ));
        }
        if let Some(c) = &self.choreography {
            c.validate()?;
        }
        Ok(())
    }

    pub fn sequence_spec(&self) -> SequenceSpec {
        SequenceSpec {
            base_path: self.base_path.clone(),
            count: self.frame_count,
            digits: self.digits,
            extension: self.extension.clone(),
        }
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            clear_rgba: self.clear_rgba.map(premultiply),
            filter: self.filter,
        }
    }

    pub fn choreography(&self) -> ReelResult<Choreography> {
        match &self.choreography {
            Some(c) => Ok(c.clone()),
            None => Choreography::standard(),
        }
    }
}

fn premultiply(rgba: [u8; 4]) -> [u8; 4] {
    let mut px = rgba;
    crate::foundation::math::premultiply_rgba8_in_place(&mut px);
    px
}
