//! Secure memory handling for sensitive data
//!
//! Provides a password wrapper that zeroes its memory on drop and never
//! appears in Debug or Display output.

use std::fmt;

use zeroize::{Zeroize, ZeroizeOnDrop};

/// A password supplied by the user
///
/// The contents are zeroed on drop and redacted from all formatting, so
/// the password cannot leak through logs or error messages.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct Password {
    inner: String,
}

impl Password {
    /// Create a new Password
    pub fn new(s: impl Into<String>) -> Self {
        Self { inner: s.into() }
    }

    /// Get the password contents
    pub fn as_str(&self) -> &str {
        &self.inner
    }

    /// Get the password bytes
    pub fn as_bytes(&self) -> &[u8] {
        self.inner.as_bytes()
    }

    /// Get the length in bytes
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl From<String> for Password {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for Password {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// Don't print the contents in Debug output
impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Password")
            .field("len", &self.inner.len())
            .finish()
    }
}

// Don't print the contents in Display output
impl fmt::Display for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED {} bytes]", self.inner.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_creation() {
        let p = Password::new("test");
        assert_eq!(p.as_str(), "test");
        assert_eq!(p.len(), 4);
        assert!(!p.is_empty());
    }

    #[test]
    fn test_password_from_string() {
        let p: Password = String::from("test").into();
        assert_eq!(p.as_str(), "test");
    }

    #[test]
    fn test_password_debug_redacted() {
        let p = Password::new("secret");
        let debug = format!("{:?}", p);
        assert!(!debug.contains("secret"));
        assert!(debug.contains("Password"));
    }

    #[test]
    fn test_password_display_redacted() {
        let p = Password::new("secret");
        let display = format!("{}", p);
        assert!(!display.contains("secret"));
        assert!(display.contains("REDACTED"));
    }
}
