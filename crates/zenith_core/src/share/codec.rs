//! Share snapshot codec.
//!
//! # Responsibility
//! - Encode a goal list into an opaque, URL-fragment-safe token.
//! - Decode a token back into goals, reporting every failure as a typed
//!   `DecodeError` instead of a raw parser error.
//!
//! # Invariants
//! - `decode(&encode(goals)?) == Ok(goals)` for every list that validates.
//! - Encoding is deterministic: equal input lists yield byte-equal tokens.
//! - Decoding is all-or-nothing: one bad record fails the whole token.
//! - An explicitly encoded empty list is a valid token; an empty token is not.
//!
//! # Format
//! `token = alphabet(utf8(json({"v":1,"goals":[...]})))`. A bare JSON array
//! payload is accepted as the unversioned legacy format.
//!
//! # See also
//! - docs/architecture/share-snapshot.md

use crate::model::goal::{Goal, GoalValidationError};
use crate::share::alphabet::{self, AlphabetError};
use crate::share::record::{
    as_object, optional_str, required_category, required_number, required_str,
};
use log::{info, warn};
use serde::Serialize;
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Newest envelope version this build writes and reads.
pub const SNAPSHOT_VERSION: u64 = 1;

#[derive(Serialize)]
struct EnvelopeRef<'a> {
    v: u64,
    goals: &'a [Goal],
}

/// Encodes goals into a share token.
///
/// Every record is validated first so that a produced token always decodes.
///
/// # Errors
/// - `InvalidRecord` for the first goal violating `Goal::validate`.
/// - `Serialize` when JSON serialization fails.
pub fn encode(goals: &[Goal]) -> Result<String, EncodeError> {
    for (index, goal) in goals.iter().enumerate() {
        goal.validate()
            .map_err(|reason| EncodeError::InvalidRecord { index, reason })?;
    }

    let payload = serde_json::to_vec(&EnvelopeRef {
        v: SNAPSHOT_VERSION,
        goals,
    })
    .map_err(EncodeError::Serialize)?;
    let token = alphabet::encode_bytes(&payload);

    info!(
        "event=snapshot_encode module=share status=ok goals={} payload_bytes={} token_chars={}",
        goals.len(),
        payload.len(),
        token.len()
    );
    Ok(token)
}

/// Decodes a share token into goals.
///
/// Surrounding ASCII whitespace is ignored so that tokens survive copy/paste.
///
/// # Errors
/// - `EmptyOrMissing` when the token is empty after trimming.
/// - `MalformedAlphabet` when the text is not a canonical alphabet encoding.
/// - `MalformedStructure` when the payload is not a supported snapshot.
/// - `InvalidRecord` when any goal violates record invariants.
pub fn decode(token: &str) -> Result<Vec<Goal>, DecodeError> {
    let result = decode_inner(token.trim_matches(|c: char| c.is_ascii_whitespace()));
    match &result {
        Ok(goals) => info!(
            "event=snapshot_decode module=share status=ok goals={} token_chars={}",
            goals.len(),
            token.len()
        ),
        Err(err) => warn!(
            "event=snapshot_decode module=share status=error error_kind={} token_chars={}",
            err.kind(),
            token.len()
        ),
    }
    result
}

/// Decodes an optional token, mapping `None` to `EmptyOrMissing`.
pub fn decode_optional(token: Option<&str>) -> Result<Vec<Goal>, DecodeError> {
    match token {
        Some(token) => decode(token),
        None => Err(DecodeError::EmptyOrMissing),
    }
}

fn decode_inner(token: &str) -> Result<Vec<Goal>, DecodeError> {
    if token.is_empty() {
        return Err(DecodeError::EmptyOrMissing);
    }

    let bytes = alphabet::decode_text(token).map_err(DecodeError::MalformedAlphabet)?;
    let text = std::str::from_utf8(&bytes)
        .map_err(|_| DecodeError::MalformedStructure(StructureError::NotUtf8))?;
    let payload: Value = serde_json::from_str(text)
        .map_err(|err| DecodeError::MalformedStructure(StructureError::Json(err.to_string())))?;

    let records = match payload {
        Value::Array(records) => records,
        Value::Object(mut envelope) => {
            let version = envelope
                .get("v")
                .and_then(Value::as_u64)
                .ok_or(DecodeError::MalformedStructure(
                    StructureError::MissingVersion,
                ))?;
            if version == 0 || version > SNAPSHOT_VERSION {
                return Err(DecodeError::MalformedStructure(
                    StructureError::UnsupportedVersion(version),
                ));
            }
            match envelope.remove("goals") {
                Some(Value::Array(records)) => records,
                _ => {
                    return Err(DecodeError::MalformedStructure(
                        StructureError::UnexpectedShape("envelope `goals` must be an array"),
                    ));
                }
            }
        }
        _ => {
            return Err(DecodeError::MalformedStructure(
                StructureError::UnexpectedShape("payload must be an object or array"),
            ));
        }
    };

    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            goal_from_value(record).map_err(|reason| DecodeError::InvalidRecord { index, reason })
        })
        .collect()
}

fn goal_from_value(value: &Value) -> Result<Goal, GoalValidationError> {
    let object = as_object(value)?;
    let goal = Goal {
        id: required_str(object, "id")?,
        title: required_str(object, "title")?,
        category: required_category(object)?,
        kr_number: required_str(object, "krNumber")?,
        target: required_number(object, "target")?,
        actual: required_number(object, "actual")?,
        unit: required_str(object, "unit")?,
        description: required_str(object, "description")?,
        due_date: optional_str(object, "dueDate")?,
    };
    goal.validate()?;
    Ok(goal)
}

/// Reason a decoded payload is not a usable snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    NotUtf8,
    /// JSON syntax error, including truncation.
    Json(String),
    MissingVersion,
    /// Envelope written by a newer (or bogus) format version.
    UnsupportedVersion(u64),
    UnexpectedShape(&'static str),
}

impl Display for StructureError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotUtf8 => write!(f, "payload is not valid UTF-8"),
            Self::Json(message) => write!(f, "payload is not valid JSON: {message}"),
            Self::MissingVersion => write!(f, "snapshot envelope has no version"),
            Self::UnsupportedVersion(version) => write!(
                f,
                "snapshot version {version} is not supported (latest {SNAPSHOT_VERSION})"
            ),
            Self::UnexpectedShape(details) => write!(f, "unexpected snapshot shape: {details}"),
        }
    }
}

/// Decode failure; each variant maps to a distinct user-facing message.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodeError {
    /// No token to import. Not a corruption signal.
    EmptyOrMissing,
    MalformedAlphabet(AlphabetError),
    MalformedStructure(StructureError),
    InvalidRecord {
        index: usize,
        reason: GoalValidationError,
    },
}

impl DecodeError {
    /// Stable machine-readable kind for FFI and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyOrMissing => "empty_or_missing",
            Self::MalformedAlphabet(_) => "malformed_alphabet",
            Self::MalformedStructure(_) => "malformed_structure",
            Self::InvalidRecord { .. } => "invalid_record",
        }
    }
}

impl Display for DecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyOrMissing => write!(f, "no share token to import"),
            Self::MalformedAlphabet(err) => write!(f, "share token is malformed: {err}"),
            Self::MalformedStructure(err) => write!(f, "share token is corrupted: {err}"),
            Self::InvalidRecord { index, reason } => {
                write!(f, "shared goal #{} is invalid: {reason}", index + 1)
            }
        }
    }
}

impl Error for DecodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::EmptyOrMissing => None,
            Self::MalformedAlphabet(err) => Some(err),
            Self::MalformedStructure(_) => None,
            Self::InvalidRecord { reason, .. } => Some(reason),
        }
    }
}

/// Encode failure.
#[derive(Debug)]
pub enum EncodeError {
    InvalidRecord {
        index: usize,
        reason: GoalValidationError,
    },
    Serialize(serde_json::Error),
}

impl Display for EncodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRecord { index, reason } => {
                write!(f, "goal #{} cannot be shared: {reason}", index + 1)
            }
            Self::Serialize(err) => write!(f, "snapshot serialization failed: {err}"),
        }
    }
}

impl Error for EncodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidRecord { reason, .. } => Some(reason),
            Self::Serialize(err) => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{decode, encode, DecodeError, StructureError};
    use crate::model::goal::{Goal, GoalCategory, GoalValidationError};
    use crate::share::alphabet::encode_bytes;

    fn goal(id: &str) -> Goal {
        Goal {
            id: id.to_string(),
            title: "Ship app".to_string(),
            category: GoalCategory::Career,
            kr_number: "KR1".to_string(),
            target: 1.0,
            actual: 0.0,
            unit: "release".to_string(),
            description: String::new(),
            due_date: None,
        }
    }

    #[test]
    fn envelope_layout_is_stable() {
        let token = encode(&[goal("g1")]).unwrap();
        let bytes = crate::share::alphabet::decode_text(&token).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"v":1,"goals":[{"id":"g1","title":"Ship app","category":"Career","krNumber":"KR1","target":1.0,"actual":0.0,"unit":"release","description":""}]}"#
        );
    }

    #[test]
    fn legacy_bare_array_payload_decodes() {
        let token = encode_bytes(
            br#"[{"id":"g1","title":"Ship app","category":"Career","krNumber":"KR1","target":1,"actual":0,"unit":"release","description":""}]"#,
        );
        assert_eq!(decode(&token).unwrap(), vec![goal("g1")]);
    }

    #[test]
    fn newer_envelope_version_is_rejected() {
        let token = encode_bytes(br#"{"v":2,"goals":[]}"#);
        assert_eq!(
            decode(&token),
            Err(DecodeError::MalformedStructure(
                StructureError::UnsupportedVersion(2)
            ))
        );
    }

    #[test]
    fn envelope_without_version_is_rejected() {
        let token = encode_bytes(br#"{"goals":[]}"#);
        assert_eq!(
            decode(&token),
            Err(DecodeError::MalformedStructure(
                StructureError::MissingVersion
            ))
        );
    }

    #[test]
    fn scalar_payload_is_malformed_structure() {
        let token = encode_bytes(b"42");
        assert!(matches!(
            decode(&token),
            Err(DecodeError::MalformedStructure(
                StructureError::UnexpectedShape(_)
            ))
        ));
    }

    #[test]
    fn invalid_utf8_is_malformed_structure() {
        let token = encode_bytes(&[0xff, 0xfe, 0x00]);
        assert_eq!(
            decode(&token),
            Err(DecodeError::MalformedStructure(StructureError::NotUtf8))
        );
    }

    #[test]
    fn encode_rejects_invalid_goal_with_index() {
        let mut bad = goal("g2");
        bad.target = f64::NAN;
        let err = encode(&[goal("g1"), bad]).unwrap_err();
        match err {
            super::EncodeError::InvalidRecord { index, reason } => {
                assert_eq!(index, 1);
                assert!(matches!(reason, GoalValidationError::InvalidTarget(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let token = encode(&[goal("g1")]).unwrap();
        assert_eq!(decode(&format!(" {token}\n")).unwrap(), vec![goal("g1")]);
        assert_eq!(decode(" \t"), Err(DecodeError::EmptyOrMissing));
    }

    #[test]
    fn error_kinds_are_distinct() {
        let kinds = [
            DecodeError::EmptyOrMissing.kind(),
            decode("@@").unwrap_err().kind(),
            decode(&encode_bytes(b"{")).unwrap_err().kind(),
            decode(&encode_bytes(br#"[{"id":"x"}]"#)).unwrap_err().kind(),
        ];
        assert_eq!(
            kinds,
            [
                "empty_or_missing",
                "malformed_alphabet",
                "malformed_structure",
                "invalid_record"
            ]
        );
    }
}
