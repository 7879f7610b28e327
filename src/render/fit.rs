use crate::foundation::core::{Rect, Size};

/// Destination rectangle that fits `image` entirely inside `canvas`, preserving aspect
/// ratio and centering the slack axis.
///
/// When the canvas is relatively wider than the image, height fills and the image is
/// centered horizontally; otherwise width fills and it is centered vertically.
/// Returns `None` if either size has a zero or non-finite dimension.
pub fn contain_fit(canvas: Size, image: Size) -> Option<Rect> {
    if !is_drawable(canvas) || !is_drawable(image) {
        return None;
    }

    let image_ratio = image.width / image.height;
    let canvas_ratio = canvas.width / canvas.height;

    let (draw_w, draw_h, offset_x, offset_y) = if canvas_ratio > image_ratio {
        let draw_h = canvas.height;
        let draw_w = draw_h * image_ratio;
        (draw_w, draw_h, (canvas.width - draw_w) / 2.0, 0.0)
    } else {
        let draw_w = canvas.width;
        let draw_h = draw_w / image_ratio;
        (draw_w, draw_h, 0.0, (canvas.height - draw_h) / 2.0)
    };

    Some(Rect::new(
        offset_x,
        offset_y,
        offset_x + draw_w,
        offset_y + draw_h,
    ))
}

fn is_drawable(size: Size) -> bool {
    size.width.is_finite() && size.height.is_finite() && size.width > 0.0 && size.height > 0.0
}

#[cfg(test)]
#[path = "../../tests/unit/render/fit.rs"]
mod tests;
