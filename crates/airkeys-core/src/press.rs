//! Debounced key-press resolution.
//!
//! Two states, derived from the last accepted timestamp rather than stored:
//! Idle (no press within the interval) and Cooling (inside it). The first
//! press of a session is always accepted.

use crate::consts::{DEBOUNCE_INTERVAL_MS, DELETE_LABEL};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

/// Typed text. Mutated only by accepted presses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputBuffer {
    text: String,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, s: &str) {
        self.text.push_str(s);
    }

    /// No-op on an empty buffer.
    pub fn remove_last(&mut self) -> Option<char> {
        self.text.pop()
    }

    pub fn apply(&mut self, edit: &KeyEdit) {
        match edit {
            KeyEdit::Append(s) => self.append(s),
            KeyEdit::DeleteLast => {
                self.remove_last();
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters.
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

impl fmt::Display for OutputBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Session-wide debounce state. Written only by [`PressResolver::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PressState {
    last_label: Option<String>,
    last_at: Option<Duration>,
}

impl PressState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_label(&self) -> Option<&str> {
        self.last_label.as_deref()
    }

    pub fn last_at(&self) -> Option<Duration> {
        self.last_at
    }

    /// Within `interval` of the last accepted press.
    pub fn is_cooling(&self, now: Duration, interval: Duration) -> bool {
        match self.last_at {
            Some(at) => now.saturating_sub(at) <= interval,
            None => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEdit {
    Append(String),
    DeleteLast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub label: String,
    pub at: Duration,
    pub edit: KeyEdit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PressOutcome {
    /// The detector reported no press.
    NoPress,
    /// A press arrived inside the debounce window and was dropped.
    Debounced { label: String },
    Accepted(KeyPress),
}

impl PressOutcome {
    pub fn accepted(&self) -> Option<&KeyPress> {
        match self {
            PressOutcome::Accepted(p) => Some(p),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PressResolver {
    interval: Duration,
    delete_label: String,
}

impl PressResolver {
    pub fn new(interval: Duration, delete_label: impl Into<String>) -> Self {
        Self {
            interval,
            delete_label: delete_label.into(),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn delete_label(&self) -> &str {
        &self.delete_label
    }

    fn edit_for(&self, label: &str) -> KeyEdit {
        if label == self.delete_label {
            KeyEdit::DeleteLast
        } else {
            KeyEdit::Append(label.to_string())
        }
    }

    /// Accepts `pressed` iff more than the interval has passed since the last
    /// accepted press. Only an acceptance touches `state` and `output`.
    pub fn resolve(
        &self,
        pressed: Option<&str>,
        now: Duration,
        state: &mut PressState,
        output: &mut OutputBuffer,
    ) -> PressOutcome {
        let Some(label) = pressed else {
            return PressOutcome::NoPress;
        };

        if state.is_cooling(now, self.interval) {
            debug!("Debounced press '{}'", label);
            return PressOutcome::Debounced {
                label: label.to_string(),
            };
        }

        let edit = self.edit_for(label);
        output.apply(&edit);
        state.last_label = Some(label.to_string());
        state.last_at = Some(now);

        info!("⌨️  Key pressed: '{}' (buffer: {} chars)", label, output.len());

        PressOutcome::Accepted(KeyPress {
            label: label.to_string(),
            at: now,
            edit,
        })
    }
}

impl Default for PressResolver {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEBOUNCE_INTERVAL_MS), DELETE_LABEL)
    }
}
