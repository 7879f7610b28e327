use crate::foundation::{
    core::{PixelSize, ViewportSize},
    error::{ReelError, ReelResult},
    math::{premultiply_rgba8_in_place, source_over_premul, unpremultiply_rgba8_in_place},
};

/// Backing pixel buffer of a canvas: premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Surface {
    size: PixelSize,
    data: Vec<u8>,
    reallocations: u64,
}

impl Surface {
    pub fn new(size: PixelSize) -> ReelResult<Self> {
        let mut surface = Self::default();
        surface.resize_if_needed(size)?;
        Ok(surface)
    }

    pub fn size(&self) -> PixelSize {
        self.size
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// How many times the buffer has been reallocated by a size change.
    pub fn reallocations(&self) -> u64 {
        self.reallocations
    }

    /// Reallocate only when `size` differs from the current size. Returns whether it did.
    ///
    /// A reallocated buffer starts fully transparent.
    pub fn resize_if_needed(&mut self, size: PixelSize) -> ReelResult<bool> {
        if size == self.size {
            return Ok(false);
        }
        let len = size.rgba_len()?;
        self.data = vec![0u8; len];
        self.size = size;
        self.reallocations += 1;
        tracing::debug!(width = size.width, height = size.height, "canvas surface reallocated");
        Ok(true)
    }

    /// Reset every pixel to transparent.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Fill every pixel with a premultiplied color.
    pub fn fill(&mut self, rgba_premul: [u8; 4]) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&rgba_premul);
        }
    }

    /// Copy of the pixels as a straight-alpha image, ready for encoding.
    pub fn to_rgba_image(&self) -> ReelResult<image::RgbaImage> {
        self.export(self.data.clone())
    }

    /// Like [`Surface::to_rgba_image`], but composited over a straight-alpha `background`
    /// color. The surface itself is left as drawn.
    pub fn to_rgba_image_over(&self, background: [u8; 4]) -> ReelResult<image::RgbaImage> {
        let mut bg = background;
        premultiply_rgba8_in_place(&mut bg);
        let mut flat = bg.repeat(self.data.len() / 4);
        for (dst, src) in flat.chunks_exact_mut(4).zip(self.data.chunks_exact(4)) {
            source_over_premul(dst, src);
        }
        self.export(flat)
    }

    fn export(&self, mut premul: Vec<u8>) -> ReelResult<image::RgbaImage> {
        unpremultiply_rgba8_in_place(&mut premul);
        image::RgbaImage::from_raw(self.size.width, self.size.height, premul)
            .ok_or_else(|| ReelError::render("surface buffer does not match its size"))
    }
}

/// Something a frame can be drawn into: live layout size, pixel density, and a drawing
/// context that may be unavailable.
pub trait RenderTarget {
    /// Current layout size in CSS pixels.
    fn client_size(&self) -> ViewportSize;

    /// Physical pixels per CSS pixel.
    fn device_pixel_ratio(&self) -> f64;

    /// Backing surface, or `None` when no drawing context is available.
    fn surface_mut(&mut self) -> Option<&mut Surface>;
}

/// Headless canvas: a layout size, a device pixel ratio and an optional backing surface.
#[derive(Clone, Debug)]
pub struct OffscreenCanvas {
    client: ViewportSize,
    dpr: f64,
    surface: Option<Surface>,
}

impl OffscreenCanvas {
    pub fn new(client: ViewportSize, dpr: f64) -> Self {
        Self {
            client,
            dpr,
            surface: Some(Surface::default()),
        }
    }

    /// Canvas whose drawing context is unavailable; every draw is a no-op.
    pub fn detached(client: ViewportSize, dpr: f64) -> Self {
        Self {
            client,
            dpr,
            surface: None,
        }
    }

    pub fn set_client_size(&mut self, client: ViewportSize) {
        self.client = client;
    }

    pub fn set_device_pixel_ratio(&mut self, dpr: f64) {
        self.dpr = dpr;
    }

    pub fn surface(&self) -> Option<&Surface> {
        self.surface.as_ref()
    }
}

impl RenderTarget for OffscreenCanvas {
    fn client_size(&self) -> ViewportSize {
        self.client
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.dpr
    }

    fn surface_mut(&mut self) -> Option<&mut Surface> {
        self.surface.as_mut()
    }
}
