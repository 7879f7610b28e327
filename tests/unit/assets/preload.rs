use std::{
    io::Cursor,
    sync::{Mutex, mpsc},
};

use super::*;
use crate::assets::source::MemorySource;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

fn source_with(spec: &SequenceSpec, present: &[usize]) -> MemorySource {
    let mut src = MemorySource::new();
    for &i in present {
        src.insert(spec.asset_path(FrameIndex(i)), png_bytes(2, 1, [255, 0, 0, 255]));
    }
    src
}

#[test]
fn failed_slots_become_holes_without_failing_batch() {
    let spec = SequenceSpec::new("/assets/seq", 6);
    let src = source_with(&spec, &[0, 1, 3, 5]);

    let seq = preload_sequence(&spec, &src, &PreloadOpts::default()).unwrap();
    assert_eq!(seq.len(), 6);
    assert_eq!(seq.loaded_count(), 4);
    assert_eq!(seq.missing(), vec![FrameIndex(2), FrameIndex(4)]);
    assert_eq!(seq.get(FrameIndex(0)).unwrap().width, 2);
}

#[test]
fn undecodable_bytes_are_holes_too() {
    let spec = SequenceSpec::new("", 2);
    let src = source_with(&spec, &[0]).with(spec.asset_path(FrameIndex(1)), b"garbage".to_vec());

    let seq = preload_sequence(&spec, &src, &PreloadOpts { threads: Some(1) }).unwrap();
    assert_eq!(seq.len(), 2);
    assert!(seq.get(FrameIndex(0)).is_some());
    assert!(seq.get(FrameIndex(1)).is_none());
}

#[test]
fn all_missing_still_settles_with_full_length() {
    let spec = SequenceSpec::new("nowhere", 5);
    let seq = preload_sequence(&spec, &MemorySource::new(), &PreloadOpts::default()).unwrap();
    assert_eq!(seq.len(), 5);
    assert_eq!(seq.loaded_count(), 0);
}

#[test]
fn zero_threads_and_zero_count_are_rejected() {
    let spec = SequenceSpec::new("", 2);
    assert!(preload_sequence(&spec, &MemorySource::new(), &PreloadOpts { threads: Some(0) }).is_err());

    let empty = SequenceSpec::new("", 0);
    assert!(preload_sequence(&empty, &MemorySource::new(), &PreloadOpts::default()).is_err());
}

struct GatedSource {
    inner: MemorySource,
    gated_path: String,
    gate: Mutex<mpsc::Receiver<()>>,
}

impl FrameSource for GatedSource {
    fn fetch(&self, asset_path: &str) -> ReelResult<Vec<u8>> {
        if asset_path == self.gated_path {
            let _ = self.gate.lock().unwrap().recv();
        }
        self.inner.fetch(asset_path)
    }
}

#[test]
fn ready_flips_only_after_every_slot_settles() {
    let spec = SequenceSpec::new("seq", 4);
    let (tx, rx) = mpsc::channel();
    let source = GatedSource {
        inner: source_with(&spec, &[0, 1, 3]),
        gated_path: spec.asset_path(FrameIndex(3)),
        gate: Mutex::new(rx),
    };

    let handle = Preloader::spawn(spec, Arc::new(source), PreloadOpts { threads: Some(2) }).unwrap();
    assert!(!handle.is_ready());
    assert!(handle.frames().is_none());

    tx.send(()).unwrap();
    let seq = handle.wait().unwrap();
    assert_eq!(seq.len(), 4);
    assert_eq!(seq.loaded_count(), 3);
    assert!(seq.get(FrameIndex(2)).is_none());
}

#[test]
fn ready_handle_reports_immediately() {
    let seq = Arc::new(FrameSequence::empty(3));
    let handle = PreloadHandle::ready(Arc::clone(&seq));
    assert!(handle.is_ready());
    assert_eq!(handle.frames().unwrap().len(), 3);
    assert_eq!(handle.wait().unwrap().len(), 3);
}

#[test]
fn worker_failure_is_reported_on_the_handle() {
    let spec = SequenceSpec::new("seq", 2);
    let handle = Preloader::spawn(
        spec,
        Arc::new(MemorySource::new()),
        PreloadOpts { threads: Some(0) },
    )
    .unwrap();

    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(10);
    while handle.failure().is_none() {
        assert!(std::time::Instant::now() < deadline, "failure was never recorded");
        std::thread::sleep(std::time::Duration::from_millis(2));
    }
    assert!(handle.failure().unwrap().contains("threads"));
    assert!(!handle.is_ready());
    assert!(handle.frames().is_none());
    assert!(handle.wait().is_err());
}
