use std::cell::RefCell;
use std::rc::Rc;

/// Frame scheduling capability supplied by the host
///
/// The controller asks for at most one pending tick at a time. When the
/// frame fires the host calls `ScrubController::tick` with the elapsed time.
pub trait FrameScheduler {
    /// Ask for one `tick` on the next frame
    fn request_tick(&mut self);

    /// Drop the pending request, if any
    fn cancel_tick(&mut self);
}

#[derive(Debug, Default, Clone, Copy)]
struct ManualState {
    pending: bool,
    requests: u64,
    cancels: u64,
}

/// Scheduler driven by hand: tests and headless hosts poll it
///
/// Clones share state, so the host keeps one clone and gives the other to
/// the controller.
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a tick is currently requested
    pub fn is_pending(&self) -> bool {
        self.state.borrow().pending
    }

    /// Consume the pending request; call before delivering the tick
    pub fn take_pending(&self) -> bool {
        let mut state = self.state.borrow_mut();
        std::mem::replace(&mut state.pending, false)
    }

    /// Total requests seen
    pub fn requests(&self) -> u64 {
        self.state.borrow().requests
    }

    /// Total cancellations seen
    pub fn cancels(&self) -> u64 {
        self.state.borrow().cancels
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_tick(&mut self) {
        let mut state = self.state.borrow_mut();
        state.pending = true;
        state.requests += 1;
    }

    fn cancel_tick(&mut self) {
        let mut state = self.state.borrow_mut();
        state.pending = false;
        state.cancels += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_state() {
        let host = ManualScheduler::new();
        let mut handed_out = host.clone();

        handed_out.request_tick();
        assert!(host.is_pending());
        assert!(host.take_pending());
        assert!(!host.is_pending());
        assert!(!host.take_pending());

        handed_out.request_tick();
        handed_out.cancel_tick();
        assert!(!host.is_pending());
        assert_eq!(host.requests(), 2);
        assert_eq!(host.cancels(), 1);
    }
}
