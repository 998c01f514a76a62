#![forbid(unsafe_code)]

//! Error type shared across the fieldtip crates.
//!
//! Nothing in this subsystem is fatal: anchor-not-found is an `Option`,
//! not an error, and every `Err` path degrades to a reachable affordance
//! instead of breaking the host page.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A host-page mutation (icon/panel/style attachment) failed.
    #[error("host operation failed: {0}")]
    Host(String),

    /// The panel markup could not be rewritten by the sanitizer.
    #[error("markup sanitization failed: {0}")]
    Sanitize(String),
}

impl Error {
    #[must_use]
    pub fn host(message: impl Into<String>) -> Self {
        Self::Host(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn display_formats() {
        assert_eq!(
            Error::host("panel slot missing").to_string(),
            "host operation failed: panel slot missing"
        );
        assert_eq!(
            Error::Sanitize("unbalanced markup".into()).to_string(),
            "markup sanitization failed: unbalanced markup"
        );
    }
}
