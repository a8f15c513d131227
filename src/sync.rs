// Join gate for the loader/CMS race: the item reveal may only start once both
// the entry animation and the content population have finished, in either order.

/// The two completion signals the gate waits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinSignal {
    LoaderComplete,
    ContentLoaded,
}

/// Fires a single continuation exactly once, when both signals have arrived.
#[derive(Debug, Default)]
pub struct JoinGate {
    loader_complete: bool,
    content_loaded: bool,
    fired: bool,
}

impl JoinGate {
    pub fn new() -> Self {
        JoinGate::default()
    }

    /// Record a signal. Returns true exactly once: on the call that completes
    /// the pair. Duplicate signals are absorbed.
    pub fn signal(&mut self, signal: JoinSignal) -> bool {
        match signal {
            JoinSignal::LoaderComplete => self.loader_complete = true,
            JoinSignal::ContentLoaded => self.content_loaded = true,
        }
        if self.loader_complete && self.content_loaded && !self.fired {
            self.fired = true;
            true
        } else {
            false
        }
    }

    pub fn is_ready(&self) -> bool {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_when_both_arrive_loader_first() {
        let mut gate = JoinGate::new();
        assert!(!gate.signal(JoinSignal::LoaderComplete));
        assert!(gate.signal(JoinSignal::ContentLoaded));
        assert!(gate.is_ready());
    }

    #[test]
    fn fires_once_when_both_arrive_content_first() {
        let mut gate = JoinGate::new();
        assert!(!gate.signal(JoinSignal::ContentLoaded));
        assert!(gate.signal(JoinSignal::LoaderComplete));
    }

    #[test]
    fn duplicate_signals_never_refire() {
        let mut gate = JoinGate::new();
        gate.signal(JoinSignal::ContentLoaded);
        assert!(!gate.signal(JoinSignal::ContentLoaded));
        assert!(gate.signal(JoinSignal::LoaderComplete));
        assert!(!gate.signal(JoinSignal::LoaderComplete));
        assert!(!gate.signal(JoinSignal::ContentLoaded));
    }
}
