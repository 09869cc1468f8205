//! Generation flags as stored in the CSV files.
//!
//! Flags are written as `0`/`1`. When reading, only the literal `0` means
//! "not supported"; every other value counts as supported.

use serde::{Deserialize, Deserializer, Serializer};

pub fn is_supported(raw: &str) -> bool {
    raw.trim() != "0"
}

pub fn serialize<S>(value: &bool, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u8(u8::from(*value))
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(is_supported(&raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_zero_is_unsupported() {
        assert!(!is_supported("0"));
        assert!(!is_supported(" 0 "));
        assert!(is_supported("1"));
        assert!(is_supported("2"));
        assert!(is_supported("True"));
        assert!(is_supported(""));
    }
}
