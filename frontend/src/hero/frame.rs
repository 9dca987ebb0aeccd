//! Coalesces render requests into at most one pending animation frame.

#[derive(Debug, Default)]
pub struct FrameGate {
    pending: Option<i32>,
}

impl FrameGate {
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Calls `request` only when no frame is pending yet. Returns whether a
    /// new frame was requested.
    pub fn schedule<F, E>(&mut self, request: F) -> Result<bool, E>
    where
        F: FnOnce() -> Result<i32, E>,
    {
        if self.pending.is_some() {
            return Ok(false);
        }
        self.pending = Some(request()?);
        Ok(true)
    }

    /// The frame callback ran; the next render request may schedule again.
    pub fn fire(&mut self) -> bool {
        self.pending.take().is_some()
    }

    /// Hands back the pending request id so the caller can cancel it.
    pub fn cancel(&mut self) -> Option<i32> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn burst_schedules_a_single_frame() {
        let requests = Cell::new(0);
        let mut gate = FrameGate::default();
        for _ in 0..50 {
            let _ = gate.schedule(|| -> Result<i32, ()> {
                requests.set(requests.get() + 1);
                Ok(requests.get())
            });
        }
        assert_eq!(requests.get(), 1);
        assert!(gate.is_pending());

        assert!(gate.fire());
        assert!(!gate.is_pending());
        assert_eq!(gate.schedule(|| Ok::<_, ()>(7)), Ok(true));
        assert_eq!(gate.cancel(), Some(7));
        assert!(!gate.fire());
    }

    #[test]
    fn failed_request_leaves_gate_idle() {
        let mut gate = FrameGate::default();
        assert_eq!(gate.schedule(|| Err::<i32, _>("no window")), Err("no window"));
        assert!(!gate.is_pending());
    }
}
