use std::sync::Arc;

use super::*;
use crate::foundation::core::{PixelSize, ViewportSize};
use crate::render::surface::OffscreenCanvas;

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn two_pixel_image() -> FrameImage {
    let mut px = Vec::new();
    px.extend_from_slice(&RED);
    px.extend_from_slice(&BLUE);
    FrameImage {
        width: 2,
        height: 1,
        rgba8_premul: Arc::new(px),
    }
}

fn seq_with_hole() -> FrameSequence {
    FrameSequence::from_slots(vec![Some(two_pixel_image()), None, Some(two_pixel_image())])
}

fn nearest() -> FrameRenderer {
    FrameRenderer::new(RenderSettings {
        clear_rgba: None,
        filter: ScaleFilter::Nearest,
    })
}

fn pixel(surface: &Surface, x: u32, y: u32) -> [u8; 4] {
    let off = ((y * surface.size().width + x) * 4) as usize;
    let d = surface.data();
    [d[off], d[off + 1], d[off + 2], d[off + 3]]
}

#[test]
fn draws_contain_fit_centered_vertically() {
    let mut canvas = OffscreenCanvas::new(ViewportSize::new(4.0, 4.0), 1.0);
    let out = nearest().render(&mut canvas, &seq_with_hole(), 0.0).unwrap();
    assert_eq!(
        out,
        RenderOutcome::Drawn {
            index: FrameIndex(0),
            dest: Rect::new(0.0, 1.0, 4.0, 3.0),
        }
    );

    let s = canvas.surface().unwrap();
    assert_eq!(s.size(), PixelSize::new(4, 4));
    assert_eq!(pixel(s, 0, 0), [0, 0, 0, 0]);
    assert_eq!(pixel(s, 0, 1), RED);
    assert_eq!(pixel(s, 1, 2), RED);
    assert_eq!(pixel(s, 3, 1), BLUE);
    assert_eq!(pixel(s, 2, 2), BLUE);
    assert_eq!(pixel(s, 3, 3), [0, 0, 0, 0]);
}

#[test]
fn backing_buffer_scales_with_device_pixel_ratio() {
    let mut canvas = OffscreenCanvas::new(ViewportSize::new(2.0, 2.0), 2.0);
    nearest().render(&mut canvas, &seq_with_hole(), 0.0).unwrap();
    assert_eq!(canvas.surface().unwrap().size(), PixelSize::new(4, 4));
}

#[test]
fn missing_frame_leaves_surface_untouched() {
    let mut canvas = OffscreenCanvas::new(ViewportSize::new(4.0, 4.0), 1.0);
    let renderer = nearest();
    renderer.render(&mut canvas, &seq_with_hole(), 0.0).unwrap();
    let before = canvas.surface().unwrap().clone();

    canvas.set_client_size(ViewportSize::new(8.0, 8.0));
    let out = renderer.render(&mut canvas, &seq_with_hole(), 1.0).unwrap();
    assert_eq!(out, RenderOutcome::MissingFrame { index: FrameIndex(1) });
    assert_eq!(canvas.surface().unwrap(), &before);
}

#[test]
fn detached_canvas_is_a_no_op() {
    let mut canvas = OffscreenCanvas::detached(ViewportSize::new(4.0, 4.0), 1.0);
    let out = nearest().render(&mut canvas, &seq_with_hole(), 0.0).unwrap();
    assert_eq!(out, RenderOutcome::NoContext);
}

#[test]
fn repeated_render_is_idempotent_and_reallocates_once() {
    let mut canvas = OffscreenCanvas::new(ViewportSize::new(7.0, 5.0), 1.5);
    let renderer = FrameRenderer::default();
    let seq = seq_with_hole();

    renderer.render(&mut canvas, &seq, 2.0).unwrap();
    let first = canvas.surface().unwrap().data().to_vec();
    renderer.render(&mut canvas, &seq, 2.0).unwrap();
    let s = canvas.surface().unwrap();

    assert_eq!(s.data(), first.as_slice());
    assert_eq!(s.reallocations(), 1);
}

#[test]
fn resize_reallocates_and_redraws() {
    let mut canvas = OffscreenCanvas::new(ViewportSize::new(4.0, 4.0), 1.0);
    let renderer = nearest();
    let seq = seq_with_hole();
    renderer.render(&mut canvas, &seq, 0.0).unwrap();

    canvas.set_client_size(ViewportSize::new(8.0, 2.0));
    let out = renderer.render(&mut canvas, &seq, 0.0).unwrap();
    assert_eq!(
        out,
        RenderOutcome::Drawn {
            index: FrameIndex(0),
            dest: Rect::new(2.0, 0.0, 6.0, 2.0),
        }
    );
    let s = canvas.surface().unwrap();
    assert_eq!(s.reallocations(), 2);
    assert_eq!(pixel(s, 0, 0), [0, 0, 0, 0]);
    assert_eq!(pixel(s, 2, 0), RED);
    assert_eq!(pixel(s, 5, 1), BLUE);
}

#[test]
fn fractional_and_out_of_range_positions_are_rounded_and_clamped() {
    let mut canvas = OffscreenCanvas::new(ViewportSize::new(4.0, 4.0), 1.0);
    let renderer = nearest();
    let seq = seq_with_hole();

    let out = renderer.render(&mut canvas, &seq, 1.6).unwrap();
    assert!(matches!(out, RenderOutcome::Drawn { index: FrameIndex(2), .. }));
    let out = renderer.render(&mut canvas, &seq, -4.0).unwrap();
    assert!(matches!(out, RenderOutcome::Drawn { index: FrameIndex(0), .. }));
    let out = renderer.render(&mut canvas, &seq, 99.0).unwrap();
    assert!(matches!(out, RenderOutcome::Drawn { index: FrameIndex(2), .. }));
}

#[test]
fn zero_sized_canvas_is_guarded() {
    let mut canvas = OffscreenCanvas::new(ViewportSize::new(0.0, 300.0), 1.0);
    let out = nearest().render(&mut canvas, &seq_with_hole(), 0.0).unwrap();
    assert_eq!(out, RenderOutcome::EmptyGeometry { index: FrameIndex(0) });
}

#[test]
fn clear_color_fills_letterbox() {
    let mut canvas = OffscreenCanvas::new(ViewportSize::new(4.0, 4.0), 1.0);
    let renderer = FrameRenderer::new(RenderSettings {
        clear_rgba: Some([5, 5, 5, 255]),
        filter: ScaleFilter::Nearest,
    });
    renderer.render(&mut canvas, &seq_with_hole(), 0.0).unwrap();
    let s = canvas.surface().unwrap();
    assert_eq!(pixel(s, 0, 0), [5, 5, 5, 255]);
    assert_eq!(pixel(s, 0, 1), RED);
}
