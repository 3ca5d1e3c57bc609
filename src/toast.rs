//! Transient notification banner with a small fade-in/fade-out lifecycle.
//!
//! A toast moves through appearing, visible, and disappearing phases on its
//! own timer. Each toast owns its timing anchor, so showing a new toast
//! while an old one is mid-flight can never be cut short by the old one's
//! schedule. `tick` takes the current instant as an argument, which keeps
//! the whole lifecycle testable without sleeping.

use std::time::{Duration, Instant};

pub(crate) const APPEAR: Duration = Duration::from_millis(100);
pub(crate) const VISIBLE: Duration = Duration::from_millis(3000);
pub(crate) const DISAPPEAR: Duration = Duration::from_millis(400);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Error,
    Success,
    Info,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Appearing,
    Visible,
    Disappearing,
}

#[derive(Debug)]
pub struct Toast {
    pub message: String,
    pub kind: ToastKind,
    pub phase: Phase,
    phase_started: Instant,
}

impl Toast {
    /// Transition phases render dimmed, standing in for the fade.
    pub fn is_transitioning(&self) -> bool {
        matches!(self.phase, Phase::Appearing | Phase::Disappearing)
    }
}

#[derive(Debug, Default)]
pub struct ToastState {
    current: Option<Toast>,
}

impl ToastState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace whatever is showing with a fresh toast starting its
    /// appearing phase at `now`.
    pub fn show(&mut self, kind: ToastKind, message: impl Into<String>, now: Instant) {
        self.current = Some(Toast {
            message: message.into(),
            kind,
            phase: Phase::Appearing,
            phase_started: now,
        });
    }

    pub fn error(&mut self, message: impl Into<String>, now: Instant) {
        self.show(ToastKind::Error, message, now);
    }

    pub fn success(&mut self, message: impl Into<String>, now: Instant) {
        self.show(ToastKind::Success, message, now);
    }

    pub fn info(&mut self, message: impl Into<String>, now: Instant) {
        self.show(ToastKind::Info, message, now);
    }

    /// Skip straight to the fade-out.
    pub fn dismiss(&mut self, now: Instant) {
        if let Some(toast) = self.current.as_mut() {
            if toast.phase != Phase::Disappearing {
                toast.phase = Phase::Disappearing;
                toast.phase_started = now;
            }
        }
    }

    /// Advance the lifecycle to where it should be at `now`. Phase anchors
    /// chain (each phase starts exactly when the previous one ended), so a
    /// late tick after a stall lands in the right phase instead of
    /// stretching every phase by the stall.
    pub fn tick(&mut self, now: Instant) {
        while let Some(toast) = self.current.as_mut() {
            let duration = match toast.phase {
                Phase::Appearing => APPEAR,
                Phase::Visible => VISIBLE,
                Phase::Disappearing => DISAPPEAR,
            };
            if now.duration_since(toast.phase_started) < duration {
                return;
            }
            match toast.phase {
                Phase::Appearing => {
                    toast.phase_started += duration;
                    toast.phase = Phase::Visible;
                }
                Phase::Visible => {
                    toast.phase_started += duration;
                    toast.phase = Phase::Disappearing;
                }
                Phase::Disappearing => {
                    self.current = None;
                    return;
                }
            }
        }
    }

    pub fn active(&self) -> Option<&Toast> {
        self.current.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let state = ToastState::new();
        assert!(state.active().is_none());
    }

    #[test]
    fn walks_through_all_phases() {
        let t0 = Instant::now();
        let mut state = ToastState::new();
        state.error("Cannot connect to the server", t0);
        assert_eq!(state.active().unwrap().phase, Phase::Appearing);

        state.tick(t0 + APPEAR);
        assert_eq!(state.active().unwrap().phase, Phase::Visible);

        state.tick(t0 + APPEAR + VISIBLE);
        assert_eq!(state.active().unwrap().phase, Phase::Disappearing);

        state.tick(t0 + APPEAR + VISIBLE + DISAPPEAR);
        assert!(state.active().is_none());
    }

    #[test]
    fn one_late_tick_lands_in_the_right_phase() {
        let t0 = Instant::now();
        let mut state = ToastState::new();
        state.info("saved", t0);

        // A single tick long after the whole lifecycle should clear it.
        state.tick(t0 + APPEAR + VISIBLE + DISAPPEAR + Duration::from_secs(5));
        assert!(state.active().is_none());
    }

    #[test]
    fn early_tick_changes_nothing() {
        let t0 = Instant::now();
        let mut state = ToastState::new();
        state.success("Logged in!", t0);
        state.tick(t0 + Duration::from_millis(50));
        assert_eq!(state.active().unwrap().phase, Phase::Appearing);
    }

    #[test]
    fn replacement_toast_runs_its_own_full_schedule() {
        let t0 = Instant::now();
        let mut state = ToastState::new();
        state.error("first", t0);
        state.tick(t0 + APPEAR);

        // Replace mid-visible; the first toast's expiry must not apply.
        let t1 = t0 + APPEAR + Duration::from_millis(2900);
        state.success("second", t1);
        assert_eq!(state.active().unwrap().message, "second");
        assert_eq!(state.active().unwrap().phase, Phase::Appearing);

        // Past the first toast's would-be expiry, the second is still up.
        state.tick(t0 + APPEAR + VISIBLE + Duration::from_millis(100));
        let toast = state.active().unwrap();
        assert_eq!(toast.message, "second");
        assert_eq!(toast.phase, Phase::Visible);

        // And it fades on its own schedule.
        state.tick(t1 + APPEAR + VISIBLE + DISAPPEAR);
        assert!(state.active().is_none());
    }

    #[test]
    fn dismiss_jumps_to_fade_out() {
        let t0 = Instant::now();
        let mut state = ToastState::new();
        state.info("tip", t0);
        state.tick(t0 + APPEAR);

        let t1 = t0 + APPEAR + Duration::from_millis(500);
        state.dismiss(t1);
        assert_eq!(state.active().unwrap().phase, Phase::Disappearing);

        state.tick(t1 + DISAPPEAR);
        assert!(state.active().is_none());
    }

    #[test]
    fn transitioning_covers_both_fades() {
        let t0 = Instant::now();
        let mut state = ToastState::new();
        state.error("oops", t0);
        assert!(state.active().unwrap().is_transitioning());
        state.tick(t0 + APPEAR);
        assert!(!state.active().unwrap().is_transitioning());
        state.tick(t0 + APPEAR + VISIBLE);
        assert!(state.active().unwrap().is_transitioning());
    }
}
