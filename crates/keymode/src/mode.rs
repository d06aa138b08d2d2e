use std::{
    fmt,
    sync::atomic::{AtomicU8, Ordering},
};

use serde::{Deserialize, Serialize};

/// Which mode the keyboard is in.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Keys pass through to the foreground application.
    Insert,
    /// Keys drive shortcuts and never reach the foreground application.
    #[default]
    Command,
    /// A hint session is open and letters select labels.
    LabelCapture,
}

impl Mode {
    /// Encoding used by [`ModeCell`].
    const fn to_u8(self) -> u8 {
        match self {
            Self::Insert => 0,
            Self::Command => 1,
            Self::LabelCapture => 2,
        }
    }

    /// Inverse of [`to_u8`](Self::to_u8). Only values written by `to_u8` are ever stored.
    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Insert,
            2 => Self::LabelCapture,
            _ => Self::Command,
        }
    }

    /// True when key events are kept from the foreground application.
    pub fn swallows_keys(self) -> bool {
        !matches!(self, Self::Insert)
    }

    /// Lowercase name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Command => "command",
            Self::LabelCapture => "label_capture",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lock-free holder for the current [`Mode`].
///
/// Shared between the key callback and the polling loop. Every transition goes
/// through a compare-and-swap so that a toggle can never overwrite a
/// concurrent session change.
#[derive(Debug)]
pub struct ModeCell {
    /// Encoded mode.
    raw: AtomicU8,
}

impl Default for ModeCell {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

impl ModeCell {
    /// Create a cell holding `mode`.
    pub const fn new(mode: Mode) -> Self {
        Self {
            raw: AtomicU8::new(mode.to_u8()),
        }
    }

    /// Current mode.
    pub fn load(&self) -> Mode {
        Mode::from_u8(self.raw.load(Ordering::Acquire))
    }

    /// Unconditionally set the mode, returning the previous one.
    pub fn swap(&self, mode: Mode) -> Mode {
        let prev = Mode::from_u8(self.raw.swap(mode.to_u8(), Ordering::AcqRel));
        if prev != mode {
            tracing::debug!(from = prev.name(), to = mode.name(), "mode_change");
        }
        prev
    }

    /// Set the mode to `to` only if it is currently `from`.
    ///
    /// Returns the mode observed when the exchange failed.
    pub fn transition(&self, from: Mode, to: Mode) -> Result<(), Mode> {
        match self.raw.compare_exchange(
            from.to_u8(),
            to.to_u8(),
            Ordering::AcqRel,
            Ordering::Acquire,
        ) {
            Ok(_) => {
                if from != to {
                    tracing::debug!(from = from.name(), to = to.name(), "mode_change");
                }
                Ok(())
            }
            Err(raw) => Err(Mode::from_u8(raw)),
        }
    }

    /// Flip between `Insert` and `Command`.
    ///
    /// Returns the new mode, or `None` when a hint session owns the keyboard.
    pub fn toggle_insert(&self) -> Option<Mode> {
        loop {
            let cur = self.load();
            let next = match cur {
                Mode::Insert => Mode::Command,
                Mode::Command => Mode::Insert,
                Mode::LabelCapture => return None,
            };
            if self.transition(cur, next).is_ok() {
                return Some(next);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{sync::Arc, thread};

    use super::*;

    #[test]
    fn default_is_command() {
        assert_eq!(ModeCell::default().load(), Mode::Command);
        assert!(Mode::Command.swallows_keys());
        assert!(Mode::LabelCapture.swallows_keys());
        assert!(!Mode::Insert.swallows_keys());
    }

    #[test]
    fn encoding_round_trips() {
        for m in [Mode::Insert, Mode::Command, Mode::LabelCapture] {
            assert_eq!(Mode::from_u8(m.to_u8()), m);
        }
    }

    #[test]
    fn toggle_skips_label_capture() {
        let cell = ModeCell::new(Mode::Insert);
        assert_eq!(cell.toggle_insert(), Some(Mode::Command));
        assert_eq!(cell.toggle_insert(), Some(Mode::Insert));
        cell.swap(Mode::LabelCapture);
        assert_eq!(cell.toggle_insert(), None);
        assert_eq!(cell.load(), Mode::LabelCapture);
    }

    #[test]
    fn transition_reports_observed_mode() {
        let cell = ModeCell::new(Mode::Command);
        assert_eq!(cell.transition(Mode::Insert, Mode::Command), Err(Mode::Command));
        assert_eq!(cell.transition(Mode::Command, Mode::LabelCapture), Ok(()));
        assert_eq!(cell.load(), Mode::LabelCapture);
    }

    #[test]
    fn concurrent_toggles_balance() {
        let cell = Arc::new(ModeCell::new(Mode::Command));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let c = Arc::clone(&cell);
                thread::spawn(move || {
                    for _ in 0..1000 {
                        c.toggle_insert();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        // 4000 flips is even
        assert_eq!(cell.load(), Mode::Command);
    }

    #[test]
    fn mode_ron_names() {
        let m: Mode = ron::from_str("insert").unwrap();
        assert_eq!(m, Mode::Insert);
        assert_eq!(ron::to_string(&Mode::LabelCapture).unwrap(), "label_capture");
    }
}
