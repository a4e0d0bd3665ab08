//! Share URL embedding and transport size advice.
//!
//! # Responsibility
//! - Build `<origin><path>#data=<token>` links from a base URL.
//! - Locate the token inside an incoming URL fragment.
//! - Classify link length against common transport ceilings.
//!
//! # Invariants
//! - Size advice is a warning only; the codec never caps input size.
//! - A URL without a `data=` fragment param has no token (`None`), which is
//!   reported as `EmptyOrMissing` rather than corruption.

use crate::model::goal::Goal;
use crate::share::codec::{decode, DecodeError};
use log::warn;

/// Fragment parameter that carries the token.
pub const SHARE_FRAGMENT_KEY: &str = "data";

/// Links above this length get truncated by some chat apps and old browsers.
pub const LONG_LINK_CHARS: usize = 2_000;

/// Byte-mode capacity of a version 40 QR code at error correction level L.
pub const QR_CAPACITY_CHARS: usize = 2_953;

const INDEX_DOCUMENT: &str = "index.html";

/// Transport-size classification for a share link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkSize {
    Comfortable,
    /// May be cut off when pasted into messaging apps.
    Long,
    /// Too long for any QR code; share by link only.
    ExceedsQrCapacity,
}

/// Builds a share link by replacing any fragment of `base_url`.
///
/// A trailing `index.html` is dropped so links stay short and stable whether
/// the app was opened at its directory or its document URL.
pub fn build_share_url(base_url: &str, token: &str) -> String {
    let without_fragment = base_url.split('#').next().unwrap_or(base_url);
    let clean = without_fragment
        .strip_suffix(INDEX_DOCUMENT)
        .unwrap_or(without_fragment);
    format!("{clean}#{SHARE_FRAGMENT_KEY}={token}")
}

/// Extracts the raw token from a share URL fragment.
///
/// Accepts `#data=<token>` alone or among other `&`-separated fragment
/// params. Returns `None` when there is no fragment or no `data` param.
pub fn extract_token(url: &str) -> Option<&str> {
    let (_, fragment) = url.split_once('#')?;
    fragment.split('&').find_map(|param| {
        param
            .split_once('=')
            .filter(|(key, _)| *key == SHARE_FRAGMENT_KEY)
            .map(|(_, value)| value)
    })
}

/// Decodes the goals carried by a share URL.
///
/// # Errors
/// - `EmptyOrMissing` when the URL has no `data` fragment param or it is empty.
/// - Any other `DecodeError` produced by the codec.
pub fn decode_share_url(url: &str) -> Result<Vec<Goal>, DecodeError> {
    match extract_token(url.trim()) {
        Some(token) => decode(token),
        None => Err(DecodeError::EmptyOrMissing),
    }
}

/// Classifies a full share link by length.
pub fn assess_link_size(url: &str) -> LinkSize {
    let chars = url.chars().count();
    let size = if chars > QR_CAPACITY_CHARS {
        LinkSize::ExceedsQrCapacity
    } else if chars > LONG_LINK_CHARS {
        LinkSize::Long
    } else {
        LinkSize::Comfortable
    };
    if size != LinkSize::Comfortable {
        warn!(
            "event=share_link_size module=share status=warn size={:?} url_chars={}",
            size, chars
        );
    }
    size
}

#[cfg(test)]
mod tests {
    use super::{assess_link_size, build_share_url, extract_token, LinkSize};

    #[test]
    fn build_drops_existing_fragment_and_index_document() {
        assert_eq!(
            build_share_url("https://zenith.app/plan/index.html#data=old", "abc"),
            "https://zenith.app/plan/#data=abc"
        );
        assert_eq!(
            build_share_url("https://zenith.app/", "abc"),
            "https://zenith.app/#data=abc"
        );
    }

    #[test]
    fn extract_finds_data_param_among_others() {
        assert_eq!(
            extract_token("https://zenith.app/#view=list&data=XYZ_-1"),
            Some("XYZ_-1")
        );
        assert_eq!(extract_token("https://zenith.app/#data="), Some(""));
    }

    #[test]
    fn extract_requires_exact_key() {
        assert_eq!(extract_token("https://zenith.app/#mydata=abc"), None);
        assert_eq!(extract_token("https://zenith.app/?data=abc"), None);
    }

    #[test]
    fn size_thresholds_are_inclusive_upper_bounds() {
        assert_eq!(assess_link_size(&"a".repeat(2_000)), LinkSize::Comfortable);
        assert_eq!(assess_link_size(&"a".repeat(2_001)), LinkSize::Long);
        assert_eq!(assess_link_size(&"a".repeat(2_953)), LinkSize::Long);
        assert_eq!(
            assess_link_size(&"a".repeat(2_954)),
            LinkSize::ExceedsQrCapacity
        );
    }
}
