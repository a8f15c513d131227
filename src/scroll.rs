// Scroll-reactive helpers: easing curves, navbar show/hide state, parallax
// scrub values, and the declarative hero entrance timeline. Pure presentation
// math; the applier maps these onto GSAP tweens.

use serde::{Deserialize, Serialize};

/// Easing curves matching the GSAP names used by the site.
/// Power2 is cubic, Power3 quartic, Power4 quintic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ease {
    Linear,
    Power2In,
    Power2Out,
    Power2InOut,
    Power3Out,
    Power3InOut,
    Power4Out,
    BackOut,
}

impl Ease {
    /// GSAP name for the applier.
    pub fn gsap_name(&self) -> &'static str {
        match self {
            Ease::Linear => "none",
            Ease::Power2In => "power2.in",
            Ease::Power2Out => "power2.out",
            Ease::Power2InOut => "power2.inOut",
            Ease::Power3Out => "power3.out",
            Ease::Power3InOut => "power3.inOut",
            Ease::Power4Out => "power4.out",
            Ease::BackOut => "back.out(1.2)",
        }
    }
}

/// Evaluate an easing curve at progress t (clamped to 0..1).
pub fn ease(t: f32, curve: Ease) -> f32 {
    let t = t.clamp(0.0, 1.0);
    match curve {
        Ease::Linear => t,
        Ease::Power2In => t.powi(3),
        Ease::Power2Out => 1.0 - (1.0 - t).powi(3),
        Ease::Power2InOut => {
            if t < 0.5 {
                4.0 * t * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
            }
        }
        Ease::Power3Out => 1.0 - (1.0 - t).powi(4),
        Ease::Power3InOut => {
            if t < 0.5 {
                8.0 * t.powi(4)
            } else {
                1.0 - (-2.0 * t + 2.0).powi(4) / 2.0
            }
        }
        Ease::Power4Out => 1.0 - (1.0 - t).powi(5),
        Ease::BackOut => {
            let c1 = 1.70158 * 1.2;
            let c3 = c1 + 1.0;
            1.0 + c3 * (t - 1.0).powi(3) + c1 * (t - 1.0).powi(2)
        }
    }
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

// =============================================================================
// Navbar scroll behavior
// =============================================================================

/// Desktop widths hide the navbar while scrolling down past the threshold and
/// turn it solid past the hero. Emits a change only when the state flips, so
/// the applier touches the DOM at most once per flip.
pub struct NavbarScroll {
    hide_after_px: f32,
    desktop_min_px: f32,
    last_hidden: Option<bool>,
    last_solid: Option<bool>,
}

/// DOM class changes for one scroll sample. None means unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NavbarUpdate {
    pub hidden: Option<bool>,
    pub solid: Option<bool>,
}

impl Default for NavbarScroll {
    fn default() -> Self {
        NavbarScroll {
            hide_after_px: 100.0,
            desktop_min_px: 769.0,
            last_hidden: None,
            last_solid: None,
        }
    }
}

impl NavbarScroll {
    /// direction: 1 scrolling down, -1 scrolling up, 0 idle.
    pub fn on_scroll(
        &mut self,
        scroll_y: f32,
        direction: i32,
        viewport_width: f32,
        hero_height: Option<f32>,
    ) -> NavbarUpdate {
        let mut update = NavbarUpdate::default();

        let hidden = if viewport_width < self.desktop_min_px {
            // Mobile keeps the navbar visible.
            false
        } else {
            match direction {
                1 => scroll_y > self.hide_after_px,
                -1 => false,
                _ => self.last_hidden.unwrap_or(false),
            }
        };
        if self.last_hidden != Some(hidden) {
            self.last_hidden = Some(hidden);
            update.hidden = Some(hidden);
        }

        if let Some(hero_height) = hero_height {
            let solid = scroll_y > hero_height - 100.0;
            if self.last_solid != Some(solid) {
                self.last_solid = Some(solid);
                update.solid = Some(solid);
            }
        }

        update
    }
}

// =============================================================================
// Parallax and count-up
// =============================================================================

/// Separator image offset (yPercent) for a scrub progress over the trigger range.
pub fn parallax_offset(progress: f32) -> f32 {
    lerp(0.0, 10.0, progress.clamp(0.0, 1.0))
}

/// Numbers-section count-up value at a given animation progress.
pub fn count_up(target: i64, progress: f32) -> i64 {
    (target as f32 * ease(progress, Ease::Power3Out)).round() as i64
}

// =============================================================================
// Hero entrance timeline
// =============================================================================

/// One tween in a declarative entrance sequence.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TweenStep {
    pub selector: String,
    pub at_ms: u64,
    pub duration_ms: u64,
    /// Delay between successive matched elements (0 = tween them together).
    #[serde(default)]
    pub stagger_ms: u64,
    pub ease: Ease,
    pub kind: TweenKind,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TweenKind {
    FadeIn,
    /// Translate from a yPercent offset back to rest.
    SlideUpPercent { from: f32 },
    /// Fade in while translating up from the current offset.
    SlideUpFade,
    /// Reveal a line mask (inner element slides from 120% to 0).
    RevealLine,
    /// Slide both diagonal panels back to cover the viewport.
    PanelsReveal,
    ScaleX,
}

fn step(selector: &str, at_ms: u64, duration_ms: u64, curve: Ease, kind: TweenKind) -> TweenStep {
    TweenStep {
        selector: selector.to_string(),
        at_ms,
        duration_ms,
        stagger_ms: 0,
        ease: curve,
        kind,
    }
}

/// Homepage hero entrance, fired by the transition coordinator's ready callback.
pub fn hero_entrance() -> Vec<TweenStep> {
    vec![
        step(".navbar__logo", 0, 400, Ease::Power2Out, TweenKind::FadeIn),
        step(".navbar__line", 100, 450, Ease::Power2Out, TweenKind::ScaleX),
        step(".navbar__menu", 150, 300, Ease::Power2Out, TweenKind::FadeIn),
        step(".burger-menu", 150, 300, Ease::Power2Out, TweenKind::FadeIn),
        step(".hero__eyebrow", 200, 400, Ease::Power2Out, TweenKind::FadeIn),
        step(
            ".hero__title .reveal:nth-child(1) .reveal__inner",
            250,
            750,
            Ease::Power4Out,
            TweenKind::RevealLine,
        ),
        step(
            ".hero__title .reveal:nth-child(2) .reveal__inner",
            400,
            750,
            Ease::Power4Out,
            TweenKind::RevealLine,
        ),
        step(
            ".hero__title .reveal:nth-child(3) .reveal__inner",
            550,
            750,
            Ease::Power4Out,
            TweenKind::RevealLine,
        ),
        step(".hero__description", 700, 400, Ease::Power2Out, TweenKind::FadeIn),
        step(
            ".hero__scroll-wrapper",
            800,
            400,
            Ease::Power2Out,
            TweenKind::FadeIn,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn easing_bounds() {
        for curve in [
            Ease::Linear,
            Ease::Power2In,
            Ease::Power2Out,
            Ease::Power2InOut,
            Ease::Power3Out,
            Ease::Power3InOut,
            Ease::Power4Out,
            Ease::BackOut,
        ] {
            assert!(ease(0.0, curve).abs() < 0.001, "{curve:?} start");
            assert!((ease(1.0, curve) - 1.0).abs() < 0.001, "{curve:?} end");
        }
    }

    #[test]
    fn navbar_hides_only_past_threshold_scrolling_down() {
        let mut nav = NavbarScroll::default();
        let update = nav.on_scroll(50.0, 1, 1440.0, None);
        assert_eq!(update.hidden, Some(false));
        let update = nav.on_scroll(300.0, 1, 1440.0, None);
        assert_eq!(update.hidden, Some(true));
        // Same state again: no change emitted.
        let update = nav.on_scroll(400.0, 1, 1440.0, None);
        assert_eq!(update.hidden, None);
        let update = nav.on_scroll(350.0, -1, 1440.0, None);
        assert_eq!(update.hidden, Some(false));
    }

    #[test]
    fn navbar_stays_visible_on_mobile() {
        let mut nav = NavbarScroll::default();
        let update = nav.on_scroll(500.0, 1, 390.0, None);
        assert_eq!(update.hidden, Some(false));
    }

    #[test]
    fn navbar_turns_solid_past_hero() {
        let mut nav = NavbarScroll::default();
        let update = nav.on_scroll(0.0, 1, 1440.0, Some(800.0));
        assert_eq!(update.solid, Some(false));
        let update = nav.on_scroll(750.0, 1, 1440.0, Some(800.0));
        assert_eq!(update.solid, Some(true));
        let update = nav.on_scroll(500.0, -1, 1440.0, Some(800.0));
        assert_eq!(update.solid, Some(false));
    }

    #[test]
    fn parallax_clamps_progress() {
        assert_eq!(parallax_offset(-1.0), 0.0);
        assert_eq!(parallax_offset(2.0), 10.0);
        assert!((parallax_offset(0.5) - 5.0).abs() < 0.001);
    }

    #[test]
    fn count_up_reaches_target() {
        assert_eq!(count_up(250, 0.0), 0);
        assert_eq!(count_up(250, 1.0), 250);
        // Power3Out front-loads the motion.
        assert!(count_up(250, 0.5) > 125);
    }

    #[test]
    fn hero_entrance_is_ordered_and_staggers_title_lines() {
        let steps = hero_entrance();
        assert!(steps.windows(2).all(|w| w[0].at_ms <= w[1].at_ms));
        let reveals: Vec<u64> = steps
            .iter()
            .filter(|s| s.kind == TweenKind::RevealLine)
            .map(|s| s.at_ms)
            .collect();
        assert_eq!(reveals, vec![250, 400, 550]);
    }
}
