// src/app/layout.rs
//! Viewport-width signal driving the mobile/desktop layout switch.
//!
//! UI thread only: listeners live behind `Rc<RefCell<…>>`. A `Subscription`
//! removes its listener when dropped.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use tracing::debug;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutMode {
    /// List only.
    Mobile,
    /// List plus detail side panel.
    Desktop,
}

impl LayoutMode {
    pub fn for_width(width: f32, breakpoint: f32) -> Self {
        if width < breakpoint {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

type Listener = Box<dyn FnMut(LayoutMode)>;
type ListenerList = RefCell<Vec<(u64, Listener)>>;

pub struct ViewportSignal {
    breakpoint: f32,
    width: Option<f32>,
    mode: LayoutMode,
    listeners: Rc<ListenerList>,
    next_id: u64,
}

impl ViewportSignal {
    pub fn new(breakpoint: f32) -> Self {
        Self {
            breakpoint,
            width: None,
            mode: LayoutMode::Desktop,
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_id: 0,
        }
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn width(&self) -> Option<f32> {
        self.width
    }

    /// Register `f`; it is called right away with the current mode and again on every change.
    pub fn subscribe<F>(&mut self, mut f: F) -> Subscription
    where
        F: FnMut(LayoutMode) + 'static,
    {
        let id = self.next_id;
        self.next_id += 1;
        f(self.mode);
        self.listeners.borrow_mut().push((id, Box::new(f)));
        Subscription {
            id,
            listeners: Rc::downgrade(&self.listeners),
        }
    }

    /// Feed the latest viewport width. Returns true when the layout mode flipped.
    pub fn resize(&mut self, width: f32) -> bool {
        if self.width == Some(width) {
            return false;
        }
        self.width = Some(width);
        let mode = LayoutMode::for_width(width, self.breakpoint);
        if mode == self.mode {
            return false;
        }
        debug!("layout {:?} -> {:?} at width {width:.0}", self.mode, mode);
        self.mode = mode;
        for (_, listener) in self.listeners.borrow_mut().iter_mut() {
            listener(mode);
        }
        true
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    listeners: Weak<ListenerList>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(list) = self.listeners.upgrade() {
            list.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn threshold_is_exclusive_for_mobile() {
        assert_eq!(LayoutMode::for_width(999.0, 1000.0), LayoutMode::Mobile);
        assert_eq!(LayoutMode::for_width(1000.0, 1000.0), LayoutMode::Desktop);
    }

    #[test]
    fn subscribers_follow_resizes() {
        let mut signal = ViewportSignal::new(1000.0);
        let seen = Rc::new(Cell::new(None));
        let sink = Rc::clone(&seen);
        let _sub = signal.subscribe(move |m| sink.set(Some(m)));
        assert_eq!(seen.get(), Some(LayoutMode::Desktop));

        assert!(signal.resize(640.0));
        assert_eq!(seen.get(), Some(LayoutMode::Mobile));
        assert!(!signal.resize(700.0));
        assert!(signal.resize(1280.0));
        assert_eq!(seen.get(), Some(LayoutMode::Desktop));
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let mut signal = ViewportSignal::new(1000.0);
        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let sub = signal.subscribe(move |_| counter.set(counter.get() + 1));
        assert_eq!(signal.subscriber_count(), 1);
        drop(sub);
        assert_eq!(signal.subscriber_count(), 0);
        signal.resize(320.0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn subscription_outliving_signal_is_harmless() {
        let mut signal = ViewportSignal::new(1000.0);
        let sub = signal.subscribe(|_| {});
        drop(signal);
        drop(sub);
    }
}
