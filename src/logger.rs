use crate::event::InputEvent;
use crate::eventbus::InputListener;
use log::info;

/// A consumer that logs every delivered event through the `log` facade.
///
/// Handy as a placeholder consumer while bringing up a new frontend.
#[derive(Debug, Default)]
pub struct EventLogger {
    count: u64,
}

impl EventLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of events seen so far.
    pub fn count(&self) -> u64 {
        self.count
    }
}

impl InputListener for EventLogger {
    fn on_input(&mut self, event: &InputEvent) {
        self.count += 1;
        info!("[input] device={} {:?}", event.device, event.kind);
    }
}
