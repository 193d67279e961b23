//! Normalized lookup keys.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CacheError, Result};

/// Lower-cased form of a caller-supplied key.
///
/// Two raw keys that differ only in case normalize to the same value. Surrounding
/// whitespace is kept as-is; only empty and blank keys are rejected.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NormalizedKey(String);

impl NormalizedKey {
    /// Normalizes a raw key.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.trim().is_empty() {
            return Err(CacheError::InvalidKey(raw.to_string()));
        }
        Ok(Self(raw.to_lowercase()))
    }

    /// Returns the normalized key.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for NormalizedKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for NormalizedKey {
    type Error = CacheError;

    fn try_from(raw: String) -> Result<Self> {
        Self::parse(&raw)
    }
}

impl From<NormalizedKey> for String {
    fn from(key: NormalizedKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    #[test_case("Pikachu", "pikachu" ; "title case")]
    #[test_case("BULBASAUR", "bulbasaur" ; "upper case")]
    #[test_case("mr. mime", "mr. mime" ; "already lower")]
    #[test_case("Flabébé", "flabébé" ; "non ascii")]
    #[test_case(" Eevee ", " eevee " ; "whitespace kept")]
    fn test_normalize(raw: &str, expected: &str) {
        assert_eq!(NormalizedKey::parse(raw).unwrap().as_str(), expected);
    }

    #[test_case("" ; "empty")]
    #[test_case("   " ; "spaces")]
    #[test_case("\t\n" ; "control whitespace")]
    fn test_reject_blank(raw: &str) {
        let err = NormalizedKey::parse(raw).unwrap_err();
        assert!(err.is_key_error());
    }

    #[test]
    fn test_serde_rejects_blank() {
        let key: NormalizedKey = serde_json::from_str("\"Charmander\"").unwrap();
        assert_eq!(key.as_str(), "charmander");
        assert!(serde_json::from_str::<NormalizedKey>("\"\"").is_err());
    }

    proptest! {
        #[test]
        fn prop_normalize_is_idempotent(raw in "[A-Za-z0-9 .'-]{0,24}") {
            if let Ok(key) = NormalizedKey::parse(&raw) {
                let again = NormalizedKey::parse(key.as_str()).unwrap();
                prop_assert_eq!(again, key);
            }
        }

        #[test]
        fn prop_case_variants_collide(raw in "[a-z]{1,16}") {
            let lower = NormalizedKey::parse(&raw).unwrap();
            let upper = NormalizedKey::parse(&raw.to_uppercase()).unwrap();
            prop_assert_eq!(lower, upper);
        }
    }
}
