//! URL-safe resource and user identifiers.
//!
//! A GUID is a version-4 UUID rendered as 22 characters of unpadded
//! base64url, compact enough to use directly as a path segment.

use base64ct::{Base64UrlUnpadded, Encoding};
use uuid::Uuid;

/// Rendered length of every identifier, 16 bytes of unpadded base64url.
pub const GUID_LENGTH: usize = 22;

/// Create a new unique identifier.
///
/// Panics if the system random source is unavailable, identifiers are
/// trust-sensitive and must never degrade to a weaker source.
#[must_use]
pub fn new() -> String {
    Base64UrlUnpadded::encode_string(Uuid::new_v4().as_bytes())
}

/// Returns true if the supplied value is a valid GUID.
///
/// Rejects anything that is not exactly 22 characters, is not canonical
/// base64url, or does not decode to a version-4 UUID. Used to sanitize
/// externally supplied identifiers before they reach a query.
#[must_use]
pub fn validate(candidate: &str) -> bool {
    if candidate.len() != GUID_LENGTH {
        return false;
    }

    let mut buf = [0u8; 16];
    let Ok(bytes) = Base64UrlUnpadded::decode(candidate.as_bytes(), &mut buf) else {
        return false;
    };

    if bytes.len() != 16 {
        return false;
    }

    Uuid::from_bytes(buf).get_version_num() == 4
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_valid() {
        for _ in 0..100 {
            let guid = new();
            assert_eq!(guid.len(), GUID_LENGTH);
            assert!(validate(&guid));
        }
    }

    #[test]
    fn test_new_is_unique() {
        let first = new();
        let second = new();
        assert_ne!(first, second);
    }

    #[test]
    fn test_validate_rejects_wrong_length() {
        assert!(!validate(""));
        assert!(!validate("abc"));
        assert!(!validate(&new()[..21]));
        assert!(!validate(&format!("{}A", new())));
    }

    #[test]
    fn test_validate_rejects_bad_alphabet() {
        let mut guid = new();
        guid.replace_range(0..1, "~");
        assert!(!validate(&guid));

        // Standard base64 alphabet, not the url-safe one.
        assert!(!validate("ab+cdefghijklmnopqrst/"));
    }

    #[test]
    fn test_validate_rejects_wrong_uuid_version() {
        // All-zero bytes decode fine but carry version 0.
        let nil = Base64UrlUnpadded::encode_string(Uuid::nil().as_bytes());
        assert_eq!(nil.len(), GUID_LENGTH);
        assert!(!validate(&nil));
    }

    #[test]
    fn test_validate_rejects_mutated_character() {
        let guid = new();
        // Swap one character for another from the alphabet; the version
        // nibble or the canonical-encoding check catches nearly all of these
        // when they land on structural positions.
        let mutated = format!("~{}", &guid[1..]);
        assert!(!validate(&mutated));
    }
}
