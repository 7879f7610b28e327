use image::imageops::{self, FilterType};

use crate::{
    assets::decode::FrameImage,
    assets::sequence::FrameSequence,
    foundation::core::{FrameIndex, Rect},
    foundation::error::ReelResult,
    foundation::math::source_over_premul,
    render::fit::contain_fit,
    render::surface::{RenderTarget, Surface},
    scroll::mapper::round_to_index,
};

/// Resampling filter used when scaling a frame to its destination rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum ScaleFilter {
    Nearest,
    #[default]
    Bilinear,
}

impl ScaleFilter {
    fn to_image_filter(self) -> FilterType {
        match self {
            Self::Nearest => FilterType::Nearest,
            Self::Bilinear => FilterType::Triangle,
        }
    }
}

/// Renderer settings.
#[derive(Clone, Debug, Default)]
pub struct RenderSettings {
    /// If set, the surface is filled with this premultiplied RGBA8 color instead of
    /// cleared to transparent before drawing.
    pub clear_rgba: Option<[u8; 4]>,
    pub filter: ScaleFilter,
}

/// What a call to [`FrameRenderer::render`] did.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RenderOutcome {
    /// The frame was drawn into `dest` (physical pixels).
    Drawn { index: FrameIndex, dest: Rect },
    /// The slot at `index` is a hole; the surface was left untouched.
    MissingFrame { index: FrameIndex },
    /// The target has no drawing context.
    NoContext,
    /// Canvas or image has a zero dimension; nothing was drawn.
    EmptyGeometry { index: FrameIndex },
}

/// Draws one frame of a [`FrameSequence`] into a [`RenderTarget`] with contain fit.
///
/// Holds no per-draw state: rendering the same inputs twice yields identical pixels.
#[derive(Clone, Debug, Default)]
pub struct FrameRenderer {
    settings: RenderSettings,
}

impl FrameRenderer {
    pub fn new(settings: RenderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// Render the frame nearest to `position` (rounded, clamped into the sequence).
    ///
    /// Missing frames and unavailable contexts are no-ops. The backing buffer is resized
    /// to `client_size * dpr` only when that size changed.
    pub fn render(
        &self,
        target: &mut dyn RenderTarget,
        frames: &FrameSequence,
        position: f64,
    ) -> ReelResult<RenderOutcome> {
        let physical = target
            .client_size()
            .to_physical(target.device_pixel_ratio());
        let Some(surface) = target.surface_mut() else {
            return Ok(RenderOutcome::NoContext);
        };

        let index = round_to_index(position, frames.len());
        let Some(image) = frames.get(index) else {
            return Ok(RenderOutcome::MissingFrame { index });
        };

        surface.resize_if_needed(physical)?;

        let Some(dest) = contain_fit(physical.to_size(), image.size().to_size()) else {
            return Ok(RenderOutcome::EmptyGeometry { index });
        };

        match self.settings.clear_rgba {
            Some(rgba) => surface.fill(rgba),
            None => surface.clear(),
        }
        if !draw_image(surface, image, dest, self.settings.filter) {
            return Ok(RenderOutcome::EmptyGeometry { index });
        }
        Ok(RenderOutcome::Drawn { index, dest })
    }
}

/// Scale `image` to `dest` (snapped to whole pixels) and composite it source-over.
fn draw_image(surface: &mut Surface, image: &FrameImage, dest: Rect, filter: ScaleFilter) -> bool {
    let x0 = dest.x0.round();
    let y0 = dest.y0.round();
    let draw_w = (dest.x1.round() - x0).max(0.0) as u32;
    let draw_h = (dest.y1.round() - y0).max(0.0) as u32;
    if draw_w == 0 || draw_h == 0 {
        return false;
    }

    let Some(src) = image::ImageBuffer::<image::Rgba<u8>, &[u8]>::from_raw(
        image.width,
        image.height,
        image.rgba8_premul.as_slice(),
    ) else {
        return false;
    };
    let scaled = imageops::resize(&src, draw_w, draw_h, filter.to_image_filter());

    let size = surface.size();
    let (x0, y0) = (x0 as i64, y0 as i64);
    let stride = size.width as usize * 4;
    let data = surface.data_mut();
    for (sy, row) in scaled.rows().enumerate() {
        let dy = y0 + sy as i64;
        if dy < 0 || dy >= i64::from(size.height) {
            continue;
        }
        for (sx, px) in row.enumerate() {
            let dx = x0 + sx as i64;
            if dx < 0 || dx >= i64::from(size.width) {
                continue;
            }
            let off = dy as usize * stride + dx as usize * 4;
            source_over_premul(&mut data[off..off + 4], &px.0);
        }
    }
    true
}

#[cfg(test)]
#[path = "../../tests/unit/render/renderer.rs"]
mod tests;
