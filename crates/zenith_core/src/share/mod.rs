//! Goal-list sharing through URL-embedded snapshots.
//!
//! # Responsibility
//! - Turn a goal list into a token that fits in a URL fragment, and back.
//! - Build and parse `#data=<token>` share links.
//!
//! # Invariants
//! - Tokens only contain characters from `alphabet::TOKEN_ALPHABET`.
//! - Decode failures are typed (`DecodeError`); nothing is partially applied.
//!
//! # See also
//! - docs/architecture/share-snapshot.md

pub mod alphabet;
pub mod codec;
pub mod link;
pub(crate) mod record;
