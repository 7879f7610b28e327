use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn wide_canvas_fills_height_and_centers_horizontally() {
    let r = contain_fit(Size::new(1600.0, 800.0), Size::new(1000.0, 1000.0)).unwrap();
    assert_eq!(r, Rect::new(400.0, 0.0, 1200.0, 800.0));
}

#[test]
fn tall_canvas_fills_width_and_centers_vertically() {
    let r = contain_fit(Size::new(800.0, 1200.0), Size::new(1920.0, 1080.0)).unwrap();
    assert!(approx(r.x0, 0.0));
    assert!(approx(r.width(), 800.0));
    assert!(approx(r.height(), 450.0));
    assert!(approx(r.y0, 375.0));
    assert!(approx(1200.0 - r.y1, r.y0));
}

#[test]
fn equal_ratios_fill_exactly() {
    let r = contain_fit(Size::new(1920.0, 1080.0), Size::new(960.0, 540.0)).unwrap();
    assert_eq!(r, Rect::new(0.0, 0.0, 1920.0, 1080.0));
}

#[test]
fn aspect_ratio_is_preserved_and_margins_are_equal() {
    let canvases = [(300.0, 200.0), (200.0, 300.0), (1234.0, 77.0), (5.0, 999.0)];
    let images = [(16.0, 9.0), (9.0, 16.0), (1.0, 1.0), (640.0, 481.0)];
    for (cw, ch) in canvases {
        for (iw, ih) in images {
            let r = contain_fit(Size::new(cw, ch), Size::new(iw, ih)).unwrap();
            assert!(approx(r.width() / r.height(), iw / ih));
            assert!(approx(r.width(), cw) || approx(r.height(), ch));
            assert!(r.width() <= cw + 1e-9 && r.height() <= ch + 1e-9);
            assert!(approx(r.x0, cw - r.x1));
            assert!(approx(r.y0, ch - r.y1));
        }
    }
}

#[test]
fn zero_or_non_finite_sizes_are_rejected() {
    assert!(contain_fit(Size::new(0.0, 100.0), Size::new(10.0, 10.0)).is_none());
    assert!(contain_fit(Size::new(100.0, 100.0), Size::new(10.0, 0.0)).is_none());
    assert!(contain_fit(Size::new(f64::NAN, 100.0), Size::new(10.0, 10.0)).is_none());
}
