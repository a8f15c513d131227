// Typewriter word cycle for the about hero: erase the current word, type the
// next, hold, repeat. Deterministic tick machine driven by the host clock, so
// a frame at any timestamp yields exactly one display state.

use serde::{Deserialize, Serialize};

use crate::types::TypewriterTimings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// Waiting out the start delay after the hero entrance.
    Idle,
    Erasing,
    PauseBeforeType,
    Typing,
    /// Word fully typed, holding before the next erase.
    Holding,
}

/// Display state for one animation frame.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypewriterFrame {
    pub text: String,
    /// Whether the caret should be shown (erase through type, not while holding).
    pub typing: bool,
}

pub struct Typewriter {
    words: Vec<String>,
    timings: TypewriterTimings,
    word_index: usize,
    shown_chars: usize,
    phase: Phase,
    started: bool,
    next_at_ms: u64,
}

impl Typewriter {
    pub fn new(words: Vec<String>, timings: TypewriterTimings) -> Self {
        let shown_chars = words.first().map(|w| w.chars().count()).unwrap_or(0);
        Typewriter {
            words,
            timings,
            word_index: 0,
            shown_chars,
            phase: Phase::Idle,
            started: false,
            next_at_ms: 0,
        }
    }

    /// Override the default words with CMS-loaded ones. Ignored once started.
    pub fn set_words(&mut self, words: Vec<String>) {
        if self.started || words.is_empty() {
            return;
        }
        self.shown_chars = words[0].chars().count();
        self.words = words;
    }

    /// Begin the cycle; the first erase starts after the configured delay.
    pub fn start(&mut self, now_ms: u64) {
        if self.words.is_empty() {
            return;
        }
        self.started = true;
        self.next_at_ms = now_ms + self.timings.start_delay_ms;
    }

    /// Advance to `now_ms` and return the display state.
    pub fn frame(&mut self, now_ms: u64) -> TypewriterFrame {
        while self.started && now_ms >= self.next_at_ms {
            self.step();
        }
        TypewriterFrame {
            text: self.current_text(),
            typing: matches!(
                self.phase,
                Phase::Erasing | Phase::PauseBeforeType | Phase::Typing
            ),
        }
    }

    fn current_text(&self) -> String {
        match self.words.get(self.word_index) {
            Some(word) => word.chars().take(self.shown_chars).collect(),
            None => String::new(),
        }
    }

    fn step(&mut self) {
        let t = self.timings;
        match self.phase {
            Phase::Idle | Phase::Holding => {
                self.phase = Phase::Erasing;
                self.next_at_ms += t.erase_ms_per_char;
            }
            Phase::Erasing => {
                if self.shown_chars > 0 {
                    self.shown_chars -= 1;
                }
                if self.shown_chars == 0 {
                    self.word_index = (self.word_index + 1) % self.words.len();
                    self.phase = Phase::PauseBeforeType;
                    self.next_at_ms += t.pause_before_type_ms;
                } else {
                    self.next_at_ms += t.erase_ms_per_char;
                }
            }
            Phase::PauseBeforeType => {
                self.phase = Phase::Typing;
                self.next_at_ms += t.type_ms_per_char;
            }
            Phase::Typing => {
                let len = self
                    .words
                    .get(self.word_index)
                    .map(|w| w.chars().count())
                    .unwrap_or(0);
                if self.shown_chars < len {
                    self.shown_chars += 1;
                }
                if self.shown_chars >= len {
                    self.phase = Phase::Holding;
                    self.next_at_ms += t.hold_ms;
                } else {
                    self.next_at_ms += t.type_ms_per_char;
                }
            }
        }
    }
}
