//! Scripted key replay.
//!
//! A script is a list of key events, one per line:
//!
//! ```text
//! # open hints and pick the second label
//! down s
//! down d
//! down f
//! up f
//! up d
//! up s
//! type m
//! raw tap a      # arrives on the raw-input channel
//! close
//! ```
//!
//! `down`, `up` and `tap` take a key spec (`a`, `ctrl`, `esc`, `LeftControl`).
//! Prefix them with `raw` to send on the raw-input channel instead of the
//! hook. `type` taps each letter of a word, `open` and `close` drive the
//! session directly. The engine's queue is pumped after every line.

use std::{
    fmt,
    io::{self, Write},
};

use config::Channel;
use hintmap_engine::{Decision, Engine};
use thiserror::Error;
use vkey::Key;

use crate::collab::Transcript;

/// Script parse failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    /// The key spec names no known key.
    #[error("line {line}: unknown key `{name}`")]
    UnknownKey {
        /// 1-based line number.
        line: usize,
        /// Offending spec.
        name: String,
    },
    /// The line does not match any command.
    #[error("line {line}: cannot parse `{text}`")]
    Syntax {
        /// 1-based line number.
        line: usize,
        /// Offending line, trimmed.
        text: String,
    },
}

/// One script command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// A single key transition.
    Key {
        /// Key.
        key: Key,
        /// True for key-down.
        down: bool,
        /// Source channel.
        channel: Channel,
    },
    /// Key-down then key-up.
    Tap(Key, Channel),
    /// Tap each letter on the hook channel.
    Type(String),
    /// Open a session as if the hint shortcut fired.
    Open,
    /// Close the open session.
    Close,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = |c: &Channel| match c {
            Channel::Hook => "",
            Channel::RawInput => "raw ",
        };
        match self {
            Self::Key { key, down, channel } => {
                let verb = if *down { "down" } else { "up" };
                write!(f, "{}{} {}", prefix(channel), verb, key.to_spec())
            }
            Self::Tap(key, channel) => write!(f, "{}tap {}", prefix(channel), key.to_spec()),
            Self::Type(word) => write!(f, "type {word}"),
            Self::Open => f.write_str("open"),
            Self::Close => f.write_str("close"),
        }
    }
}

/// A parsed step with its source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    /// 1-based line number.
    pub line: usize,
    /// Command.
    pub step: Step,
}

/// Parse one key spec.
fn key_at(line: usize, name: &str) -> Result<Key, ScriptError> {
    Key::from_spec(name).ok_or_else(|| ScriptError::UnknownKey {
        line,
        name: name.to_string(),
    })
}

/// Parse a script. Blank lines and `#` comments are skipped.
pub fn parse_script(src: &str) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut out = Vec::new();
    for (idx, raw) in src.lines().enumerate() {
        let line = idx + 1;
        let text = raw.split('#').next().unwrap_or_default().trim();
        if text.is_empty() {
            continue;
        }
        let words: Vec<&str> = text.split_whitespace().collect();
        let (channel, rest) = match words.split_first() {
            Some((&"raw", rest)) => (Channel::RawInput, rest),
            _ => (Channel::Hook, &words[..]),
        };
        let step = match (channel, rest) {
            (_, ["down", k]) => Step::Key {
                key: key_at(line, k)?,
                down: true,
                channel,
            },
            (_, ["up", k]) => Step::Key {
                key: key_at(line, k)?,
                down: false,
                channel,
            },
            (_, ["tap", k]) => Step::Tap(key_at(line, k)?, channel),
            (Channel::Hook, ["type", word]) if word.chars().all(|c| c.is_ascii_alphabetic()) => {
                Step::Type((*word).to_string())
            }
            (Channel::Hook, ["open"]) => Step::Open,
            (Channel::Hook, ["close"]) => Step::Close,
            _ => {
                return Err(ScriptError::Syntax {
                    line,
                    text: text.to_string(),
                });
            }
        };
        out.push(ScriptLine { line, step });
    }
    Ok(out)
}

/// Decision counts over a replay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    /// Key events swallowed.
    pub consumed: usize,
    /// Key events passed on.
    pub passed: usize,
    /// Key events from the other channel.
    pub ignored: usize,
}

impl Summary {
    /// Count one decision.
    fn record(&mut self, d: Decision) {
        match d {
            Decision::Consumed => self.consumed += 1,
            Decision::PassThrough => self.passed += 1,
            Decision::Ignored => self.ignored += 1,
        }
    }
}

/// Short name for a decision in replay output.
fn decision_name(d: Decision) -> &'static str {
    match d {
        Decision::Consumed => "consumed",
        Decision::PassThrough => "pass",
        Decision::Ignored => "ignored",
    }
}

/// Run `script` against `engine`, writing one line per step followed by the
/// collaborator calls it caused.
pub fn run<W: Write>(
    engine: &Engine,
    transcript: &Transcript,
    script: &[ScriptLine],
    out: &mut W,
) -> io::Result<Summary> {
    let mut summary = Summary::default();
    engine.pump();
    for entry in transcript.drain() {
        writeln!(out, "    {entry}")?;
    }
    for ScriptLine { line, step } in script {
        let mut decisions = Vec::new();
        match step {
            Step::Key { key, down, channel } => {
                decisions.push(engine.handle_key(*key, *down, *channel));
            }
            Step::Tap(key, channel) => {
                decisions.push(engine.handle_key(*key, true, *channel));
                decisions.push(engine.handle_key(*key, false, *channel));
            }
            Step::Type(word) => {
                for key in word.chars().filter_map(Key::from_letter) {
                    decisions.push(engine.handle_key(key, true, Channel::Hook));
                    decisions.push(engine.handle_key(key, false, Channel::Hook));
                }
            }
            Step::Open => engine.open_session(),
            Step::Close => engine.close_session(),
        }
        engine.pump();
        for d in &decisions {
            summary.record(*d);
        }
        let verdict: Vec<&str> = decisions.iter().map(|d| decision_name(*d)).collect();
        let typed = engine.typed();
        let shown = step.to_string();
        write!(out, "{line:>4}: {shown:<16} mode={}", engine.mode())?;
        if !verdict.is_empty() {
            write!(out, " [{}]", verdict.join(" "))?;
        }
        if !typed.is_empty() {
            write!(out, " typed={typed}")?;
        }
        writeln!(out)?;
        for entry in transcript.drain() {
            writeln!(out, "    {entry}")?;
        }
    }
    Ok(summary)
}
