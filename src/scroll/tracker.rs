use std::{cell::RefCell, rc::Rc};

use crate::foundation::core::Progress;

/// Vertical geometry of the scroll container and the viewport, in CSS pixels.
///
/// Progress runs from the moment the container's top meets the viewport top
/// (`start`) to the moment its bottom meets the viewport bottom (`end`).
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScrollLayout {
    /// Document offset of the container's top edge.
    pub container_top: f64,
    /// Full height of the container.
    pub container_height: f64,
    /// Height of the visible viewport.
    pub viewport_height: f64,
}

impl ScrollLayout {
    /// Container that starts at the document top and spans `viewports` viewport heights.
    pub fn tall_container(viewport_height: f64, viewports: f64) -> Self {
        Self {
            container_top: 0.0,
            container_height: viewport_height * viewports,
            viewport_height,
        }
    }

    pub fn start(&self) -> f64 {
        self.container_top
    }

    pub fn end(&self) -> f64 {
        self.container_top + self.container_height - self.viewport_height
    }

    pub fn progress_at(&self, scroll_top: f64) -> Progress {
        scroll_progress(scroll_top, self.start(), self.end())
    }

    /// Scroll offset that yields `progress`; the inverse of [`ScrollLayout::progress_at`].
    pub fn scroll_top_for(&self, progress: Progress) -> f64 {
        self.start() + (self.end() - self.start()).max(0.0) * progress.get()
    }
}

/// `(scroll_top - start) / (end - start)` clamped to `[0, 1]`.
///
/// A span that is empty or inverted has no interior: progress is `1` once `scroll_top`
/// reaches `start` and `0` before it.
pub fn scroll_progress(scroll_top: f64, start: f64, end: f64) -> Progress {
    let span = end - start;
    if span.is_nan() || span <= 0.0 {
        return if scroll_top >= start {
            Progress::END
        } else {
            Progress::START
        };
    }
    Progress::new((scroll_top - start) / span)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Event that produced a progress update.
pub enum UpdateCause {
    /// The scroll offset moved.
    Scroll,
    /// Layout changed (viewport or container resized).
    Resize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
/// One progress notification.
pub struct ProgressUpdate {
    pub progress: Progress,
    pub cause: UpdateCause,
}

/// Consumer of progress updates.
pub trait ProgressObserver {
    fn on_progress(&mut self, update: ProgressUpdate);
}

impl<F> ProgressObserver for F
where
    F: FnMut(ProgressUpdate),
{
    fn on_progress(&mut self, update: ProgressUpdate) {
        self(update)
    }
}

/// Wrapper that lets a shared, interior-mutable observer be subscribed while its owner
/// keeps a handle to it.
pub struct SharedObserver<T>(pub Rc<RefCell<T>>);

impl<T: ProgressObserver> ProgressObserver for SharedObserver<T> {
    fn on_progress(&mut self, update: ProgressUpdate) {
        self.0.borrow_mut().on_progress(update);
    }
}

/// Token returned by [`ProgressSource::subscribe`]; pass it back to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

/// A single source of truth for scroll progress that downstream consumers subscribe to.
pub trait ProgressSource {
    /// Latest progress value.
    fn progress(&self) -> Progress;

    /// Register `observer`; it receives every subsequent update.
    fn subscribe(&mut self, observer: Box<dyn ProgressObserver>) -> Subscription;

    /// Deregister. Returns `false` when the subscription was already gone.
    fn unsubscribe(&mut self, subscription: Subscription) -> bool;
}

/// Event-driven tracker: feed it scroll and resize events, it recomputes progress and
/// notifies subscribers synchronously.
pub struct ScrollTracker {
    layout: ScrollLayout,
    scroll_top: f64,
    progress: Progress,
    next_id: u64,
    observers: Vec<(Subscription, Box<dyn ProgressObserver>)>,
}

impl ScrollTracker {
    pub fn new(layout: ScrollLayout) -> Self {
        Self {
            layout,
            scroll_top: 0.0,
            progress: layout.progress_at(0.0),
            next_id: 0,
            observers: Vec::new(),
        }
    }

    pub fn layout(&self) -> ScrollLayout {
        self.layout
    }

    pub fn scroll_top(&self) -> f64 {
        self.scroll_top
    }

    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    /// Handle a scroll event. Subscribers are notified only when progress changed.
    pub fn on_scroll(&mut self, scroll_top: f64) {
        self.scroll_top = scroll_top;
        let next = self.layout.progress_at(scroll_top);
        if next == self.progress {
            return;
        }
        self.progress = next;
        self.notify(UpdateCause::Scroll);
    }

    /// Handle a layout change. Subscribers are always notified so they can redraw.
    pub fn on_resize(&mut self, layout: ScrollLayout) {
        self.layout = layout;
        self.progress = layout.progress_at(self.scroll_top);
        self.notify(UpdateCause::Resize);
    }

    fn notify(&mut self, cause: UpdateCause) {
        let update = ProgressUpdate {
            progress: self.progress,
            cause,
        };
        for (_, observer) in &mut self.observers {
            observer.on_progress(update);
        }
    }
}

impl ProgressSource for ScrollTracker {
    fn progress(&self) -> Progress {
        self.progress
    }

    fn subscribe(&mut self, observer: Box<dyn ProgressObserver>) -> Subscription {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        self.observers.push((id, observer));
        id
    }

    fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(id, _)| *id != subscription);
        self.observers.len() != before
    }
}

impl std::fmt::Debug for ScrollTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollTracker")
            .field("layout", &self.layout)
            .field("scroll_top", &self.scroll_top)
            .field("progress", &self.progress)
            .field("observers", &self.observers.len())
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/tracker.rs"]
mod tests;
