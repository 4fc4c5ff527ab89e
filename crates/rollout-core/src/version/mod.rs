//! Package versions.
//!
//! Packages use four-part versions (`major.minor.build.revision`) with an
//! optional pre-release tag, e.g. `2.1.0.17` or `1.0.0-beta`. The text a
//! version was parsed from is kept verbatim and is what [`Display`] prints;
//! ordering and equality work on the numeric parts and the tag.
//!
//! [`Display`]: std::fmt::Display

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::DeployError;

const MAX_PARTS: usize = 4;

#[derive(Debug, Clone)]
pub struct SemanticVersion {
    parts: [u64; MAX_PARTS],
    special: Option<String>,
    /// Lowercased tag used for ordering; empty for releases.
    release: semver::Prerelease,
    original: String,
}

impl SemanticVersion {
    /// Create a release version from its four numeric parts.
    pub fn new(major: u64, minor: u64, build: u64, revision: u64) -> Self {
        Self {
            parts: [major, minor, build, revision],
            special: None,
            release: semver::Prerelease::EMPTY,
            original: format!("{major}.{minor}.{build}.{revision}"),
        }
    }

    pub fn parse(input: &str) -> Result<Self, DeployError> {
        let text = input.trim();
        let invalid = |reason: &str| DeployError::InvalidVersion {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        if text.is_empty() {
            return Err(invalid("version is empty"));
        }

        let (numbers, special) = match text.split_once('-') {
            Some((numbers, special)) => (numbers, Some(special)),
            None => (text, None),
        };

        let segments: Vec<&str> = numbers.split('.').collect();
        if segments.len() > MAX_PARTS {
            return Err(invalid("at most four numeric parts are allowed"));
        }

        let mut parts = [0u64; MAX_PARTS];
        for (slot, segment) in parts.iter_mut().zip(&segments) {
            if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid("numeric parts must be non-empty digit sequences"));
            }
            *slot = segment
                .parse()
                .map_err(|_| invalid("numeric part is out of range"))?;
        }

        let release = match special {
            None => semver::Prerelease::EMPTY,
            Some(tag) => {
                let starts_with_letter = tag.chars().next().is_some_and(|c| c.is_ascii_alphabetic());
                let well_formed = tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
                if !starts_with_letter || !well_formed {
                    return Err(invalid(
                        "pre-release tag must start with a letter and contain only letters, digits or '-'",
                    ));
                }
                semver::Prerelease::new(&tag.to_ascii_lowercase())
                    .map_err(|e| invalid(&e.to_string()))?
            }
        };

        Ok(Self {
            parts,
            special: special.map(str::to_string),
            release,
            original: text.to_string(),
        })
    }

    pub fn major(&self) -> u64 {
        self.parts[0]
    }

    pub fn minor(&self) -> u64 {
        self.parts[1]
    }

    pub fn build(&self) -> u64 {
        self.parts[2]
    }

    pub fn revision(&self) -> u64 {
        self.parts[3]
    }

    /// Pre-release tag as written, without the leading `-`.
    pub fn special(&self) -> Option<&str> {
        self.special.as_deref()
    }

    /// The exact text this version was created from.
    pub fn as_str(&self) -> &str {
        &self.original
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemanticVersion {}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parts
            .cmp(&other.parts)
            .then_with(|| self.release.cmp(&other.release))
    }
}

impl Hash for SemanticVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.parts.hash(state);
        self.release.hash(state);
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl FromStr for SemanticVersion {
    type Err = DeployError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for SemanticVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.original)
    }
}

impl<'de> Deserialize<'de> for SemanticVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::parse(&text).map_err(serde::de::Error::custom)
    }
}

/// Version encoded in a `{id}.{version}` name, e.g. a package folder or an
/// archive file stem. The id prefix is compared ignoring ASCII case; `None`
/// when the prefix differs or the remainder is not a version.
pub fn parse_versioned_name(name: &str, id: &str) -> Option<SemanticVersion> {
    let prefix_len = id.len() + 1;
    if id.is_empty() || name.len() <= prefix_len || !name.is_char_boundary(prefix_len) {
        return None;
    }
    let (prefix, suffix) = name.split_at(prefix_len);
    if !prefix.ends_with('.') || !prefix[..id.len()].eq_ignore_ascii_case(id) {
        return None;
    }
    SemanticVersion::parse(suffix).ok()
}
