//! vkey: Windows virtual-key codes, key specs, chords and held-key sets.
//!
//! - `Key`: Enum of the virtual-key codes the hint engine cares about,
//!   `repr(u16)` with the exact `VK_*` values.
//! - Spec helpers: `Key::from_spec`, `Key::to_spec` accept and emit short
//!   user-facing names ("ctrl", "esc", "a", ",").
//! - `Chord`: an ordered, duplicate-free set of keys written "s+d+f".
//! - `KeySet`: a fixed-size bitset of currently held keys. It never
//!   allocates, so it is safe to update from a keyboard hook callback.

mod key;
pub use key::{Key, VirtualKey};

mod spec;

mod chord;
pub use chord::Chord;

mod keyset;
pub use keyset::KeySet;
