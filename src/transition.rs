// Page-transition coordinator: the full-screen two-panel loader overlay.
// The engine emits timeline plans; the applier runs them on GSAP and owns the
// sessionStorage key and the Lenis stop/start calls the steps name.

use serde::{Deserialize, Serialize};

use crate::scroll::Ease;
use crate::types::TransitionSettings;

/// One instruction for the applier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum TransitionStep {
    LockScroll,
    UnlockScroll,
    /// Read-and-clear of the cross-navigation session flag.
    ClearSessionFlag,
    SetSessionFlag,
    ShowOverlay,
    HideOverlay,
    SnapPanelsClosed,
    SnapPanelsOpen,
    FadeLogoIn { duration_ms: u64 },
    FadeLogoOut { duration_ms: u64 },
    OpenPanels { duration_ms: u64, ease: Ease },
    ClosePanels { duration_ms: u64, ease: Ease },
    /// Start the page-specific entrance animations.
    InvokeReady,
    Navigate { href: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimelineItem {
    pub at_ms: u64,
    pub step: TransitionStep,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TransitionPlan {
    pub items: Vec<TimelineItem>,
}

impl TransitionPlan {
    fn push(&mut self, at_ms: u64, step: TransitionStep) {
        self.items.push(TimelineItem { at_ms, step });
    }

    pub fn contains(&self, step: &TransitionStep) -> bool {
        self.items.iter().any(|item| &item.step == step)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Entering,
    Idle,
    Exiting,
}

/// Two transitions per page life: panels open on entry, close on exit.
/// Scroll is locked for the full duration of either animation and re-enabled
/// by the time the page is interactive; with no overlay in the DOM both
/// operations degrade to a no-op callback / immediate navigation.
pub struct TransitionCoordinator {
    settings: TransitionSettings,
    phase: Phase,
}

impl TransitionCoordinator {
    pub fn new(settings: TransitionSettings) -> Self {
        TransitionCoordinator {
            settings,
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Plan the entry animation. `flag_was_set` is the persisted cross-navigation
    /// flag: when set, this load follows an animated exit, so the panels already
    /// cover the page and the snap-to-closed + logo setup is skipped.
    pub fn entry_plan(&mut self, flag_was_set: bool, overlay_present: bool) -> TransitionPlan {
        let mut plan = TransitionPlan::default();

        if !overlay_present {
            self.phase = Phase::Idle;
            plan.push(0, TransitionStep::InvokeReady);
            return plan;
        }

        self.phase = Phase::Entering;
        let s = self.settings;

        plan.push(0, TransitionStep::LockScroll);
        plan.push(0, TransitionStep::ClearSessionFlag);

        let open_start = if flag_was_set {
            0
        } else {
            plan.push(0, TransitionStep::SnapPanelsClosed);
            plan.push(
                0,
                TransitionStep::FadeLogoIn {
                    duration_ms: s.logo_in_ms,
                },
            );
            plan.push(
                s.logo_in_ms + s.hold_ms,
                TransitionStep::FadeLogoOut {
                    duration_ms: s.logo_out_ms,
                },
            );
            s.logo_in_ms + s.hold_ms + s.logo_out_ms
        };

        plan.push(
            open_start,
            TransitionStep::OpenPanels {
                duration_ms: s.panels_ms,
                ease: Ease::Power2InOut,
            },
        );
        // Page animations start once the diagonals are "open enough",
        // before the overlay fully clears.
        let ready_at = open_start + (s.panels_ms as f32 * s.ready_fraction) as u64;
        plan.push(ready_at, TransitionStep::InvokeReady);

        let open_end = open_start + s.panels_ms;
        plan.push(open_end, TransitionStep::UnlockScroll);
        plan.push(open_end, TransitionStep::HideOverlay);

        plan
    }

    /// The host calls this when the entry animation has fully completed.
    pub fn entry_complete(&mut self) {
        if self.phase == Phase::Entering {
            self.phase = Phase::Idle;
        }
    }

    /// Plan the exit animation toward `href`. The session flag is persisted
    /// strictly before navigation; scroll is never re-enabled on the departing
    /// page. A second call while an exit is in flight is ignored.
    pub fn begin_exit(&mut self, href: &str, overlay_present: bool) -> Option<TransitionPlan> {
        if self.phase == Phase::Exiting {
            return None;
        }
        self.phase = Phase::Exiting;

        let mut plan = TransitionPlan::default();

        if !overlay_present {
            plan.push(
                0,
                TransitionStep::Navigate {
                    href: href.to_string(),
                },
            );
            return Some(plan);
        }

        let s = self.settings;
        plan.push(0, TransitionStep::LockScroll);
        plan.push(0, TransitionStep::ShowOverlay);
        plan.push(0, TransitionStep::SnapPanelsOpen);
        plan.push(
            0,
            TransitionStep::ClosePanels {
                duration_ms: s.panels_ms,
                ease: Ease::Power2InOut,
            },
        );
        plan.push(s.panels_ms, TransitionStep::SetSessionFlag);
        plan.push(
            s.panels_ms,
            TransitionStep::Navigate {
                href: href.to_string(),
            },
        );

        Some(plan)
    }
}
