//! Validation for VFS names
//!
//! SQLite looks VFSes up by a NUL-terminated name, and users type that name into
//! `?vfs=` URI parameters. Names are therefore restricted to a small, URI-safe
//! alphabet.

use crate::error::{Result, SkyliteError};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A validated VFS name
///
/// # Rules
/// - ASCII letters, digits, `.`, `_` and `-` only
/// - Must start with a letter or digit
/// - Length: 1-64 characters
///
/// Valid names: "skylite", "unix-excl", "s3.cache_2"
///
/// Invalid names: "" (empty), "-skylite" (leading hyphen), "sky lite" (space),
/// "sky/lite" (slash)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VfsName(String);

impl VfsName {
    const PATTERN: &'static str = r"^[A-Za-z0-9][A-Za-z0-9._-]*$";

    /// Maximum length
    pub const MAX_LENGTH: usize = 64;

    /// Create a new validated name
    ///
    /// # Errors
    ///
    /// Returns `InvalidVfsName` if the name doesn't meet validation rules.
    ///
    /// ```
    /// use skylite::VfsName;
    ///
    /// let name = VfsName::new("skylite").unwrap();
    /// assert_eq!(name.as_str(), "skylite");
    ///
    /// assert!(VfsName::new("sky lite").is_err());
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        Self::validate(&name)?;
        Ok(VfsName(name))
    }

    fn validate(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(SkyliteError::InvalidVfsName(
                "name cannot be empty".to_string(),
            ));
        }

        if name.len() > Self::MAX_LENGTH {
            return Err(SkyliteError::InvalidVfsName(format!(
                "name too long (max {} characters)",
                Self::MAX_LENGTH
            )));
        }

        let re = Regex::new(Self::PATTERN)
            .map_err(|e| SkyliteError::InvalidVfsName(e.to_string()))?;
        if !re.is_match(name) {
            return Err(SkyliteError::InvalidVfsName(format!(
                "'{}' must start with a letter or digit and contain only letters, digits, '.', '_' or '-'",
                name
            )));
        }

        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for VfsName {
    fn default() -> Self {
        VfsName(crate::DEFAULT_VFS_NAME.to_string())
    }
}

impl AsRef<str> for VfsName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VfsName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for VfsName {
    type Error = SkyliteError;

    fn try_from(value: String) -> Result<Self> {
        VfsName::new(value)
    }
}

impl TryFrom<&str> for VfsName {
    type Error = SkyliteError;

    fn try_from(value: &str) -> Result<Self> {
        VfsName::new(value)
    }
}

impl From<VfsName> for String {
    fn from(name: VfsName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_names() {
        assert!(VfsName::new("skylite").is_ok());
        assert!(VfsName::new("unix-excl").is_ok());
        assert!(VfsName::new("s3.cache_2").is_ok());
        assert!(VfsName::new("A").is_ok());
        assert!(VfsName::new("9lives").is_ok());
    }

    #[test]
    fn test_invalid_names() {
        assert!(VfsName::new("").is_err());
        assert!(VfsName::new("-skylite").is_err());
        assert!(VfsName::new(".hidden").is_err());
        assert!(VfsName::new("sky lite").is_err());
        assert!(VfsName::new("sky/lite").is_err());
        assert!(VfsName::new("sky\0lite").is_err());
        assert!(VfsName::new("a".repeat(VfsName::MAX_LENGTH + 1)).is_err());
    }

    #[test]
    fn test_default_is_skylite() {
        assert_eq!(VfsName::default().as_str(), "skylite");
    }

    #[test]
    fn test_serde_rejects_invalid_name() {
        #[derive(Deserialize)]
        struct Wrapper {
            name: VfsName,
        }

        let ok: Wrapper = toml::from_str(r#"name = "skylite""#).unwrap();
        assert_eq!(ok.name.as_str(), "skylite");

        let bad = toml::from_str::<Wrapper>(r#"name = "sky lite""#);
        assert!(bad.is_err());
    }

    proptest! {
        #[test]
        fn prop_accepts_well_formed(name in "[A-Za-z0-9][A-Za-z0-9._-]{0,63}") {
            let parsed = VfsName::new(name.clone()).unwrap();
            prop_assert_eq!(parsed.as_str(), name.as_str());
        }

        #[test]
        fn prop_rejects_foreign_chars(
            prefix in "[a-z]{1,8}",
            bad in "[ /:?#\\\\]",
            suffix in "[a-z]{0,8}",
        ) {
            let name = format!("{}{}{}", prefix, bad, suffix);
            prop_assert!(VfsName::new(name).is_err());
        }
    }
}
