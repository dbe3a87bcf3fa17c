//! XOR checksum validation
//!
//! A sentence looks like `$PCHRS,0,1000,0.1,0.2,0.3,*45`. The checksum is the XOR of every
//! byte between the leading `$` and the `,*` separator, with the commas left out.
//! Validation is best-effort: anything malformed is simply rejected.

use crate::types::PacketError;

/// Separator between the sentence body and its hex checksum
pub const TRAILER_SEPARATOR: &str = ",*";

/// Leading sentinel of every sentence
pub const SENTINEL: char = '$';

/// A line whose trailer matched the XOR of its body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedSentence<'a> {
    body: &'a str,
    checksum: u8,
}

impl<'a> ValidatedSentence<'a> {
    /// Everything before the `,*` separator, sentinel included
    pub fn body(&self) -> &'a str {
        self.body
    }

    pub fn checksum(&self) -> u8 {
        self.checksum
    }
}

/// XOR of the body bytes after stripping the sentinel and all commas
pub fn compute(body: &str) -> u8 {
    body.strip_prefix(SENTINEL)
        .unwrap_or(body)
        .bytes()
        .filter(|&b| b != b',')
        .fold(0, |acc, b| acc ^ b)
}

/// Verify a raw line against its checksum trailer
pub fn verify(line: &str) -> Result<ValidatedSentence<'_>, PacketError> {
    let (body, trailer) = line
        .split_once(TRAILER_SEPARATOR)
        .ok_or(PacketError::MalformedTrailer)?;

    let expected = parse_trailer(trailer).ok_or(PacketError::MalformedTrailer)?;
    let computed = compute(body);

    if expected == u32::from(computed) {
        Ok(ValidatedSentence {
            body,
            checksum: computed,
        })
    } else {
        Err(PacketError::ChecksumMismatch { expected, computed })
    }
}

fn parse_trailer(trailer: &str) -> Option<u32> {
    let digits = trailer.trim();
    if digits.is_empty() {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_ignores_sentinel_and_commas() {
        assert_eq!(compute("$PCHRS,0,1000,0.1,0.2,0.3"), 0x45);
        assert_eq!(compute("PCHRS010000.10.20.3"), 0x45);
        assert_eq!(compute("$"), 0);
        assert_eq!(compute(""), 0);
    }

    #[test]
    fn test_verify_valid_sentence() {
        let sentence = verify("$PCHRS,0,1000,0.1,0.2,0.3,*45").unwrap();
        assert_eq!(sentence.body(), "$PCHRS,0,1000,0.1,0.2,0.3");
        assert_eq!(sentence.checksum(), 0x45);
    }

    #[test]
    fn test_verify_accepts_lowercase_and_padding() {
        assert!(verify("$PCHRS,1,1014,0.01,-0.02,9.81,*5f").is_ok());
        assert!(verify("$PCHRS,1,1014,0.01,-0.02,9.81,*5F \r").is_ok());
        assert!(verify("$PCHRS,1,1014,0.01,-0.02,9.81,*005F").is_ok());
    }

    #[test]
    fn test_verify_mismatch() {
        // One digit changed in the body
        let err = verify("$PCHRS,0,1000,0.1,0.7,0.3,*45").unwrap_err();
        assert!(matches!(err, PacketError::ChecksumMismatch { expected: 0x45, .. }));
    }

    #[test]
    fn test_verify_malformed_trailer() {
        assert_eq!(verify("garbage line"), Err(PacketError::MalformedTrailer));
        assert_eq!(verify("$PCHRS,0,1000,*"), Err(PacketError::MalformedTrailer));
        assert_eq!(verify("$PCHRS,0,1000,*ZZ"), Err(PacketError::MalformedTrailer));
        assert_eq!(verify("$PCHRS,0,1000*45"), Err(PacketError::MalformedTrailer));
        assert_eq!(verify(""), Err(PacketError::MalformedTrailer));
    }

    #[test]
    fn test_verify_huge_trailer_is_malformed() {
        assert_eq!(
            verify("$PCHRS,0,*FFFFFFFFFFFF"),
            Err(PacketError::MalformedTrailer)
        );
    }
}
