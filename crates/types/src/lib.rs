//! Validated text types shared across Stickerbox crates.
//!
//! Tag names and sticker filenames arrive from HTTP request bodies and must
//! never be empty once whitespace is stripped. [`NonEmptyText`] encodes that
//! rule in the type so the registry layer can rely on it instead of
//! re-checking strings at every call site.

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("text cannot be empty")]
    Empty,
}

/// A string that is guaranteed to contain at least one non-whitespace
/// character.
///
/// Input is trimmed of leading and trailing whitespace during construction;
/// the stored value is the trimmed form.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText`, trimming surrounding whitespace.
    ///
    /// Returns `Err(TextError::Empty)` when the trimmed input is empty.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the value, returning the inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl serde::Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_text() {
        let text = NonEmptyText::new("funny").unwrap();
        assert_eq!(text.as_str(), "funny");
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let text = NonEmptyText::new("  cat.png \n").unwrap();
        assert_eq!(text.as_str(), "cat.png");
    }

    #[test]
    fn rejects_empty_and_whitespace_only() {
        assert!(matches!(NonEmptyText::new(""), Err(TextError::Empty)));
        assert!(matches!(NonEmptyText::new("   \t"), Err(TextError::Empty)));
    }

    #[test]
    fn preserves_non_ascii_text() {
        let text = NonEmptyText::new("表情包").unwrap();
        assert_eq!(text.as_str(), "表情包");
    }

    #[test]
    fn serde_round_trip() {
        let text = NonEmptyText::new("meme").unwrap();
        let json = serde_json::to_string(&text).unwrap();
        assert_eq!(json, "\"meme\"");
        let back: NonEmptyText = serde_json::from_str(&json).unwrap();
        assert_eq!(back, text);
    }

    #[test]
    fn deserialize_rejects_empty() {
        let result: Result<NonEmptyText, _> = serde_json::from_str("\"  \"");
        assert!(result.is_err());
    }
}
