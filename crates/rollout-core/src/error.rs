//! Typed failures raised by the rollout core.
//!
//! Lower layers return [`DeployError`] for conditions callers may want to
//! match on. Workflow and command layers wrap these in `anyhow::Error` with
//! additional context, so the CLI can print the full cause chain.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DeployError {
    /// A required input was blank or missing.
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// The package has no installed record.
    #[error("Package '{id}' is not installed")]
    NotInstalled { id: String },

    /// No configured repository holds the requested package.
    #[error("Package '{id}'{} was not found in any repository", version_suffix(.version))]
    PackageNotFound { id: String, version: Option<String> },

    /// A script or other child process failed.
    #[error("External process '{program}' failed: {detail}")]
    ExternalProcess { program: String, detail: String },

    /// Text that does not parse as a package version.
    #[error("Invalid version '{input}': {reason}")]
    InvalidVersion { input: String, reason: String },

    /// A package archive that is malformed or does not match its metadata.
    #[error("Invalid package {}: {reason}", .path.display())]
    InvalidPackage { path: PathBuf, reason: String },
}

impl DeployError {
    pub fn blank(name: &'static str) -> Self {
        Self::InvalidArgument {
            name,
            reason: "must not be empty".to_string(),
        }
    }
}

fn version_suffix(version: &Option<String>) -> String {
    match version {
        Some(v) => format!(" (version {v})"),
        None => String::new(),
    }
}

/// Fail with [`DeployError::InvalidArgument`] when `value` is blank.
pub fn ensure_not_blank(name: &'static str, value: &str) -> Result<(), DeployError> {
    if value.trim().is_empty() {
        return Err(DeployError::blank(name));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_not_found_mentions_version_when_present() {
        let err = DeployError::PackageNotFound {
            id: "Web.Api".to_string(),
            version: Some("1.2.0".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Package 'Web.Api' (version 1.2.0) was not found in any repository"
        );

        let err = DeployError::PackageNotFound {
            id: "Web.Api".to_string(),
            version: None,
        };
        assert_eq!(
            err.to_string(),
            "Package 'Web.Api' was not found in any repository"
        );
    }

    #[test]
    fn ensure_not_blank_rejects_whitespace() {
        assert!(ensure_not_blank("id", "   ").is_err());
        assert!(ensure_not_blank("id", "Web.Api").is_ok());
    }
}
