/// Handle to a scheduled, not-yet-run frame pass.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PassHandle(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ScheduleOutcome {
    pub handle: PassHandle,
    /// The pending pass this request replaced, if any.
    pub superseded: Option<PassHandle>,
}

/// Single-slot animation-frame scheduler.
///
/// At most one pass is pending at any time. Scheduling while a pass is
/// pending cancels it and installs the new one, so a burst of triggers
/// between two paints collapses into one pass carrying the latest payload.
#[derive(Debug)]
pub struct FrameScheduler<T> {
    next_handle: u64,
    pending: Option<(PassHandle, T)>,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self {
            next_handle: 0,
            pending: None,
        }
    }
}

impl<T> FrameScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, payload: T) -> ScheduleOutcome {
        let handle = PassHandle(self.next_handle);
        self.next_handle = self.next_handle.wrapping_add(1);
        let superseded = self.pending.replace((handle, payload)).map(|(h, _)| h);
        ScheduleOutcome { handle, superseded }
    }

    pub fn cancel_all(&mut self) -> Option<PassHandle> {
        self.pending.take().map(|(h, _)| h)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Called once per paint: hands out the pending pass, if any.
    pub fn take_due(&mut self) -> Option<(PassHandle, T)> {
        self.pending.take()
    }
}

#[cfg(test)]
mod tests {
    use super::FrameScheduler;

    #[test]
    fn burst_collapses_to_latest() {
        let mut sched = FrameScheduler::new();
        let a = sched.schedule("move");
        let b = sched.schedule("zoom");
        let c = sched.schedule("rotate");

        assert_eq!(a.superseded, None);
        assert_eq!(b.superseded, Some(a.handle));
        assert_eq!(c.superseded, Some(b.handle));

        assert_eq!(sched.take_due(), Some((c.handle, "rotate")));
        assert_eq!(sched.take_due(), None);
    }

    #[test]
    fn handles_are_unique() {
        let mut sched = FrameScheduler::new();
        let a = sched.schedule(());
        sched.take_due();
        let b = sched.schedule(());
        assert_ne!(a.handle, b.handle);
    }

    #[test]
    fn cancel_all_reports_the_dropped_pass() {
        let mut sched = FrameScheduler::new();
        sched.schedule(1);
        let b = sched.schedule(2);
        assert_eq!(sched.cancel_all(), Some(b.handle));
        assert!(!sched.is_pending());
        assert_eq!(sched.cancel_all(), None);
        assert_eq!(sched.take_due(), None);
    }
}
