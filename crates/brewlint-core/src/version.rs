//! Release tags and their ordering.
//!
//! Tags look like `v1.2.3`, `1.2`, or `v2.0.0-rc.1`. Ordering compares major,
//! minor, and patch numerically; when those are equal a release outranks any
//! pre-release, and two pre-releases compare lexicographically by suffix.
//! Build metadata after `+` is ignored.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Error returned when a tag is not a dotted numeric version.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("not a version tag: {0:?}")]
pub struct VersionError(pub String);

/// A parsed release tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub pre: Option<String>,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre: None,
        }
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || VersionError(s.to_string());
        let body = s.trim();
        let body = body
            .strip_prefix('v')
            .or_else(|| body.strip_prefix('V'))
            .unwrap_or(body);
        let body = body.split_once('+').map_or(body, |(head, _build)| head);
        let (core, pre) = match body.split_once('-') {
            Some((core, pre)) if !pre.is_empty() => (core, Some(pre.to_string())),
            Some(_) => return Err(err()),
            None => (body, None),
        };

        let mut parts = [0u64; 3];
        let mut count = 0;
        for piece in core.split('.') {
            if count == parts.len() || piece.is_empty() {
                return Err(err());
            }
            if !piece.bytes().all(|b| b.is_ascii_digit()) {
                return Err(err());
            }
            parts[count] = piece.parse().map_err(|_| err())?;
            count += 1;
        }

        Ok(Self {
            major: parts[0],
            minor: parts[1],
            patch: parts[2],
            pre,
        })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (&self.pre, &other.pre) {
                (None, None) => Ordering::Equal,
                (None, Some(_)) => Ordering::Greater,
                (Some(_), None) => Ordering::Less,
                (Some(a), Some(b)) => a.cmp(b),
            })
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(ref pre) = self.pre {
            write!(f, "-{}", pre)?;
        }
        Ok(())
    }
}

/// Compares two raw tags.
///
/// Parseable tags outrank unparseable ones; unparseable tags fall back to
/// plain string order. Parseable tags that compare equal (`v1.0` and
/// `1.0.0`) are broken by string order so the result is total.
pub fn compare_tags(a: &str, b: &str) -> Ordering {
    match (a.parse::<Version>(), b.parse::<Version>()) {
        (Ok(va), Ok(vb)) => va.cmp(&vb).then_with(|| a.cmp(b)),
        (Ok(_), Err(_)) => Ordering::Greater,
        (Err(_), Ok(_)) => Ordering::Less,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        s.parse().unwrap()
    }

    #[test]
    fn parses_prefixed_tag() {
        assert_eq!(v("v1.0.6"), Version::new(1, 0, 6));
    }

    #[test]
    fn missing_components_default_to_zero() {
        assert_eq!(v("2"), Version::new(2, 0, 0));
        assert_eq!(v("1.4"), Version::new(1, 4, 0));
    }

    #[test]
    fn parses_prerelease_and_ignores_build() {
        let parsed = v("v2.0.0-rc.1+build.5");
        assert_eq!(parsed.pre.as_deref(), Some("rc.1"));
        assert_eq!(parsed.to_string(), "2.0.0-rc.1");
    }

    #[test]
    fn rejects_garbage() {
        assert!("latest".parse::<Version>().is_err());
        assert!("1..2".parse::<Version>().is_err());
        assert!("1.2.3.4".parse::<Version>().is_err());
        assert!("1.2-".parse::<Version>().is_err());
    }

    #[test]
    fn numeric_not_lexicographic() {
        assert!(v("v1.10.0") > v("v1.9.0"));
        assert!(v("v1.1.0") > v("v1.0.6"));
    }

    #[test]
    fn release_outranks_prerelease() {
        assert!(v("1.0.0") > v("1.0.0-rc.2"));
        assert!(v("1.0.0-rc.2") > v("1.0.0-rc.1"));
        assert!(v("1.0.0-beta") > v("1.0.0-alpha"));
    }

    #[test]
    fn compare_tags_prefers_parseable() {
        assert_eq!(compare_tags("v0.0.1", "nightly"), Ordering::Greater);
        assert_eq!(compare_tags("b", "a"), Ordering::Greater);
        assert_eq!(compare_tags("v1.0.0", "v1.0.0"), Ordering::Equal);
        assert_ne!(compare_tags("v1.0", "1.0.0"), Ordering::Equal);
    }
}
