// Mobile menu: burger toggle driving a full-screen panel reveal with staggered
// link entrances. Open plays a timeline; close reverses the applier's cached
// copy of it, so the engine only tracks state and emits the forward plan.

use serde::{Deserialize, Serialize};

use crate::scroll::{Ease, TweenKind, TweenStep};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MenuPlan {
    /// Body scroll is locked while the menu is open.
    pub lock_scroll: bool,
    pub steps: Vec<TweenStep>,
}

#[derive(Debug, Default)]
pub struct MenuController {
    is_open: bool,
}

impl MenuController {
    pub fn new() -> Self {
        MenuController::default()
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Open the menu. Returns None when it is already open.
    pub fn open(&mut self) -> Option<MenuPlan> {
        if self.is_open {
            return None;
        }
        self.is_open = true;
        Some(open_plan())
    }

    /// Close the menu. Returns true when the applier should reverse the open
    /// timeline and unlock scroll once the reverse completes.
    pub fn close(&mut self) -> bool {
        if !self.is_open {
            return false;
        }
        self.is_open = false;
        true
    }

    pub fn toggle(&mut self) -> MenuToggle {
        match self.open() {
            Some(plan) => MenuToggle::Open(plan),
            None => {
                self.close();
                MenuToggle::Close
            }
        }
    }

    /// A tapped link closes the menu (after a beat, so the page transition can
    /// start underneath) unless it points at the current page.
    pub fn should_close_on_link(&self, link_is_active: bool) -> bool {
        self.is_open && !link_is_active
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MenuToggle {
    Open(MenuPlan),
    Close,
}

fn tween(
    selector: &str,
    at_ms: u64,
    duration_ms: u64,
    stagger_ms: u64,
    ease: Ease,
    kind: TweenKind,
) -> TweenStep {
    TweenStep {
        selector: selector.to_string(),
        at_ms,
        duration_ms,
        stagger_ms,
        ease,
        kind,
    }
}

fn open_plan() -> MenuPlan {
    MenuPlan {
        lock_scroll: true,
        steps: vec![
            tween(
                ".mobile-menu__panel--top, .mobile-menu__panel--bottom",
                0,
                800,
                0,
                Ease::Power3InOut,
                TweenKind::PanelsReveal,
            ),
            tween(
                ".mobile-menu__content",
                400,
                300,
                0,
                Ease::Power2Out,
                TweenKind::FadeIn,
            ),
            tween(
                ".mobile-menu__link",
                500,
                600,
                80,
                Ease::Power3Out,
                TweenKind::SlideUpFade,
            ),
            tween(
                ".mobile-menu__separator",
                800,
                500,
                0,
                Ease::Power2Out,
                TweenKind::ScaleX,
            ),
            tween(
                ".mobile-menu__cta",
                900,
                500,
                0,
                Ease::BackOut,
                TweenKind::SlideUpFade,
            ),
        ],
    }
}
