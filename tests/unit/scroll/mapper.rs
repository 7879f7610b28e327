use super::*;

#[test]
fn endpoints_map_to_first_and_last_frame() {
    let m = FrameMapper::new(192).unwrap();
    assert_eq!(m.index(0.0), FrameIndex(0));
    assert_eq!(m.index(1.0), FrameIndex(191));
    assert_eq!(m.index_for(Progress::END), FrameIndex(191));
}

#[test]
fn midpoint_rounds_half_away_from_zero() {
    let m = FrameMapper::new(192).unwrap();
    // 0.5 * 191 = 95.5
    assert_eq!(m.index(0.5), FrameIndex(96));
}

#[test]
fn out_of_range_inputs_clamp() {
    let m = FrameMapper::new(192).unwrap();
    assert_eq!(m.index(-3.0), FrameIndex(0));
    assert_eq!(m.index(7.5), FrameIndex(191));
    assert_eq!(m.index(f64::NEG_INFINITY), FrameIndex(0));
    assert_eq!(m.index(f64::INFINITY), FrameIndex(191));
    assert_eq!(m.index(f64::NAN), FrameIndex(0));
}

#[test]
fn index_is_monotonic_over_unit_range() {
    let m = FrameMapper::new(192).unwrap();
    let mut prev = m.index(0.0);
    for step in 1..=10_000 {
        let p = f64::from(step) / 10_000.0;
        let idx = m.index(p);
        assert!(idx >= prev, "index decreased at p={p}");
        assert!(idx.0 < 192);
        prev = idx;
    }
}

#[test]
fn single_frame_sequence_always_maps_to_zero() {
    let m = FrameMapper::new(1).unwrap();
    assert_eq!(m.index(0.0), FrameIndex(0));
    assert_eq!(m.index(1.0), FrameIndex(0));
}

#[test]
fn zero_frames_is_rejected() {
    assert!(FrameMapper::new(0).is_err());
}

#[test]
fn round_to_index_clamps_fractional_positions() {
    assert_eq!(round_to_index(2.4, 5), FrameIndex(2));
    assert_eq!(round_to_index(2.5, 5), FrameIndex(3));
    assert_eq!(round_to_index(-0.4, 5), FrameIndex(0));
    assert_eq!(round_to_index(9.0, 5), FrameIndex(4));
}
