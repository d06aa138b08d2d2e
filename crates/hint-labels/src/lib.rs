//! Hint label generation.
//!
//! Turns an element count into an ordered list of short, unique, prefix-free
//! letter labels. Prefix freedom is what lets the engine act on the final
//! character of a label without waiting to see whether the user keeps typing.
//!
//! - [`Alphabet`]: the two disjoint letter sets labels are built from.
//! - [`Label`]: one generated label.
//! - [`generate`]: labels from the default alphabet.

mod alphabet;
mod error;
mod label;

pub use alphabet::{Alphabet, DEFAULT_DOUBLES, DEFAULT_SINGLES};
pub use error::LabelError;
pub use label::Label;

/// Generate `count` labels from the default alphabet.
///
/// Returns fewer than `count` labels when the alphabet's capacity is exceeded.
pub fn generate(count: usize) -> Vec<Label> {
    Alphabet::default().generate(count)
}
