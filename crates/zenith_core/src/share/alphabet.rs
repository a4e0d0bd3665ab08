//! URL-fragment-safe alphabet transform.
//!
//! # Responsibility
//! - Map arbitrary bytes to text drawn only from [`TOKEN_ALPHABET`] and back.
//! - Reject any input that is not the canonical image of some byte sequence.
//!
//! # Invariants
//! - Output never contains padding or characters that need percent-encoding.
//! - `decode_text(encode_bytes(b)) == Ok(b)` for every byte slice `b`.
//! - Decoding is strict: one text maps to at most one byte sequence.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::{DecodeError, Engine};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Every character a token may contain (RFC 4648 section 5, no padding).
pub const TOKEN_ALPHABET: &str =
    "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Returns whether `c` belongs to [`TOKEN_ALPHABET`].
pub fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Encodes raw bytes into alphabet-safe text.
pub fn encode_bytes(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Decodes alphabet-safe text back into raw bytes.
///
/// # Errors
/// - `InvalidCharacter` for the first character outside [`TOKEN_ALPHABET`].
/// - `InvalidLength` when the length cannot come from [`encode_bytes`].
/// - `NonCanonical` when trailing bits are set that `encode_bytes` never sets.
pub fn decode_text(text: &str) -> Result<Vec<u8>, AlphabetError> {
    if let Some((position, character)) = text.char_indices().find(|(_, c)| !is_token_char(*c)) {
        return Err(AlphabetError::InvalidCharacter {
            position,
            character,
        });
    }
    if text.len() % 4 == 1 {
        return Err(AlphabetError::InvalidLength(text.len()));
    }

    URL_SAFE_NO_PAD.decode(text).map_err(|err| match err {
        DecodeError::InvalidLength(len) => AlphabetError::InvalidLength(len),
        DecodeError::InvalidByte(position, byte) => AlphabetError::InvalidCharacter {
            position,
            character: char::from(byte),
        },
        DecodeError::InvalidLastSymbol(position, _) => AlphabetError::NonCanonical(position),
        DecodeError::InvalidPadding => AlphabetError::NonCanonical(text.len()),
    })
}

/// Reverse-transform failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlphabetError {
    InvalidCharacter { position: usize, character: char },
    InvalidLength(usize),
    /// Final symbol carries bits that a canonical encoding leaves zero.
    NonCanonical(usize),
}

impl Display for AlphabetError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCharacter {
                position,
                character,
            } => write!(
                f,
                "character {character:?} at byte {position} is outside the token alphabet"
            ),
            Self::InvalidLength(len) => write!(f, "token length {len} is not a valid encoding"),
            Self::NonCanonical(position) => {
                write!(f, "token symbol at byte {position} is not canonical")
            }
        }
    }
}

impl Error for AlphabetError {}
