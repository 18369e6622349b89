//! Single-entry event routing.
//!
//! Every event goes through [`EventRouter::post`]. Keyboard events are first
//! offered to the shortcut handler; anything it does not consume is handed to
//! the one registered consumer, synchronously, on the caller's thread. There is
//! no queue: an event is dropped as soon as `post` returns.

use crate::event::InputEvent;
use log::debug;

/// Receives routed events.
///
/// The listener borrows the event for the duration of the call only.
pub trait InputListener: Send {
    fn on_input(&mut self, event: &InputEvent);
}

impl<F> InputListener for F
where
    F: FnMut(&InputEvent) + Send,
{
    fn on_input(&mut self, event: &InputEvent) {
        self(event)
    }
}

/// Gets first look at key events; returning `true` stops routing.
pub trait ShortcutHandler: Send {
    fn try_consume(&mut self, event: &InputEvent) -> bool;
}

impl<F> ShortcutHandler for F
where
    F: FnMut(&InputEvent) -> bool + Send,
{
    fn try_consume(&mut self, event: &InputEvent) -> bool {
        self(event)
    }
}

/// Running totals, mostly for diagnostics and tests.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RouterStats {
    pub posted: u64,
    /// Key events swallowed by the shortcut handler.
    pub intercepted: u64,
    /// Events handed to the consumer.
    pub delivered: u64,
    /// Events with no consumer registered.
    pub unclaimed: u64,
}

#[derive(Default)]
pub struct EventRouter {
    consumer: Option<Box<dyn InputListener>>,
    shortcuts: Option<Box<dyn ShortcutHandler>>,
    log_events: bool,
    stats: RouterStats,
}

impl EventRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the consumer. Only one is kept; last call wins.
    pub fn set_consumer(&mut self, listener: impl InputListener + 'static) {
        self.consumer = Some(Box::new(listener));
    }

    pub fn clear_consumer(&mut self) {
        self.consumer = None;
    }

    pub fn has_consumer(&self) -> bool {
        self.consumer.is_some()
    }

    pub fn set_shortcut_handler(&mut self, handler: impl ShortcutHandler + 'static) {
        self.shortcuts = Some(Box::new(handler));
    }

    /// Log every posted event at `debug` level.
    pub fn set_event_logging(&mut self, enabled: bool) {
        self.log_events = enabled;
    }

    pub fn event_logging(&self) -> bool {
        self.log_events
    }

    pub fn stats(&self) -> RouterStats {
        self.stats
    }

    /// Route one event. Always accepted; there is no backpressure.
    pub fn post(&mut self, event: InputEvent) -> bool {
        self.stats.posted += 1;
        if self.log_events {
            debug!("input: device={} {:?}", event.device, event.kind);
        }

        if event.is_key() {
            if let Some(handler) = self.shortcuts.as_mut() {
                if handler.try_consume(&event) {
                    self.stats.intercepted += 1;
                    if self.log_events {
                        debug!("input: consumed by shortcut handler");
                    }
                    return true;
                }
            }
        }

        match self.consumer.as_mut() {
            Some(consumer) => {
                consumer.on_input(&event);
                self.stats.delivered += 1;
            }
            None => self.stats.unclaimed += 1,
        }
        true
    }
}
