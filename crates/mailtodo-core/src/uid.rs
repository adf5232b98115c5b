//! Task identifiers.
//!
//! An identifier is 128 random bits printed as five lowercase hex groups
//! of 8-4-4-4-12 digits. It has the shape of a UUID but the version and
//! variant bits are left random.

use std::fmt;
use std::str::FromStr;

use rand::RngCore;
use rand::rngs::OsRng;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Unique identifier of a generated task.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uid(String);

impl Uid {
    /// Draws a new identifier from the operating system random source.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Entropy`] if the random source cannot be read.
    pub fn generate() -> Result<Self> {
        let mut bytes = [0u8; 16];
        OsRng.try_fill_bytes(&mut bytes)?;
        Ok(Self::from_bytes(bytes))
    }

    /// Formats fixed bytes as an identifier.
    #[must_use]
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes).hyphenated().to_string())
    }

    /// Returns the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the calendar file holding the task.
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.ics", self.0)
    }
}

impl FromStr for Uid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        // Only the lowercase hyphenated form round-trips.
        match Uuid::try_parse(s) {
            Ok(uuid) if uuid.hyphenated().to_string() == s => Ok(Self(s.to_string())),
            _ => Err(Error::InvalidUid(s.to_string())),
        }
    }
}

impl AsRef<str> for Uid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_from_bytes_layout() {
        let bytes = [
            0x00, 0x11, 0x22, 0x33, 0x44, 0x55, 0x66, 0x77, 0x88, 0x99, 0xaa, 0xbb, 0xcc, 0xdd,
            0xee, 0xff,
        ];
        let uid = Uid::from_bytes(bytes);
        assert_eq!(uid.as_str(), "00112233-4455-6677-8899-aabbccddeeff");
        assert_eq!(uid.file_name(), "00112233-4455-6677-8899-aabbccddeeff.ics");
    }

    #[test]
    fn test_generate_is_well_formed_and_unique() {
        let uids: HashSet<Uid> = (0..64).map(|_| Uid::generate().unwrap()).collect();
        assert_eq!(uids.len(), 64);
        for uid in &uids {
            assert!(uid.as_str().parse::<Uid>().is_ok(), "{uid}");
        }
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "",
            "00112233-4455-6677-8899",
            "00112233-4455-6677-8899-aabbccddeef",
            "00112233-4455-6677-8899-AABBCCDDEEFF",
            "0011223g-4455-6677-8899-aabbccddeeff",
            "001122334455-6677-8899-aabbccddeeff-",
            "00112233445566778899aabbccddeeff",
            "{00112233-4455-6677-8899-aabbccddeeff}",
            "urn:uuid:00112233-4455-6677-8899-aabbccddeeff",
        ] {
            assert!(matches!(bad.parse::<Uid>(), Err(Error::InvalidUid(_))), "{bad}");
        }
    }

    proptest! {
        #[test]
        fn prop_from_bytes_always_parses(bytes in any::<[u8; 16]>()) {
            let uid = Uid::from_bytes(bytes);
            prop_assert_eq!(uid.as_str().len(), 36);
            prop_assert!(uid.as_str().parse::<Uid>().is_ok());
        }
    }
}
