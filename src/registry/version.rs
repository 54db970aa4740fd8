//! Lenient version ordering for registry records.
//!
//! Registry entries carry free-form version strings. Comparison only has
//! to be good enough to pick the newest record per server: a dotted
//! numeric release, an optional `v`/`V` prefix, and an optional
//! pre-release tail that sorts below the bare release.

use std::cmp::Ordering;

/// A parsed version. Unparseable strings stay `None` at the call sites
/// and never displace a parsed version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    release: Vec<u64>,
    pre: Option<String>,
}

impl Version {
    /// Parse a version string leniently. Returns None when the release
    /// segments are not dotted numbers.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        let s = s.strip_prefix(['v', 'V']).unwrap_or(s);

        // Build metadata never participates in ordering
        let s = s.split('+').next().unwrap_or(s);

        let (release_part, pre) = match s.split_once('-') {
            Some((release, pre)) => (release, Some(pre.to_string())),
            None => (s, None),
        };

        let release: Vec<u64> = release_part
            .split('.')
            .map(|segment| segment.parse::<u64>().ok())
            .collect::<Option<_>>()?;
        if release.is_empty() {
            return None;
        }

        Some(Self { release, pre })
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.release.len().max(other.release.len());
        for i in 0..len {
            let a = self.release.get(i).copied().unwrap_or(0);
            let b = other.release.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                other => return other,
            }
        }

        // Equal releases: a pre-release sorts below the bare release
        match (&self.pre, &other.pre) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(s: &str) -> Version {
        Version::parse(s).unwrap()
    }

    #[test]
    fn test_parse_basic() {
        assert!(Version::parse("1.2.3").is_some());
        assert!(Version::parse("v1.2.3").is_some());
        assert!(Version::parse("V0.1").is_some());
        assert!(Version::parse("2").is_some());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Version::parse("").is_none());
        assert!(Version::parse("latest").is_none());
        assert!(Version::parse("1.2.x").is_none());
    }

    #[test]
    fn test_ordering() {
        assert!(v("1.2.3") > v("1.2.2"));
        assert!(v("2.0") > v("1.9.9"));
        assert!(v("1.10.0") > v("1.9.0"));
    }

    #[test]
    fn test_ordering_pads_missing_segments() {
        assert_eq!(v("1.2").cmp(&v("1.2.0")), Ordering::Equal);
        assert!(v("1.2.1") > v("1.2"));
    }

    #[test]
    fn test_prefix_ignored() {
        assert_eq!(v("v1.2.3").cmp(&v("1.2.3")), Ordering::Equal);
    }

    #[test]
    fn test_prerelease_sorts_below_release() {
        assert!(v("1.0.0") > v("1.0.0-rc.1"));
        assert!(v("1.0.0-rc.2") > v("1.0.0-rc.1"));
    }

    #[test]
    fn test_build_metadata_ignored() {
        assert_eq!(v("1.0.0+build5").cmp(&v("1.0.0")), Ordering::Equal);
    }
}
