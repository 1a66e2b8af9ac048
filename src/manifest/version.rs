//! Dependency version spec parsing.
//!
//! A spec is split into `||` branches, each branch into comparators
//! (`>=1.2.0 <2.0.0`, `^15.5.10`, `1.2.3 - 2.0.0`). Anything a branch holds
//! besides comparators (`1.x`, `npm:react@18.2.0`, tags) marks the branch as
//! unbounded, since its lowest admitted version cannot be known.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use semver::{Prerelease, Version};
use std::fmt;

static COMPARATOR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(<=|>=|<|>|=|\^|~)?\s*v?(\d+)(?:\.(\d+))?(?:\.(\d+))?(?:-([0-9A-Za-z.-]+))?(?:\+[0-9A-Za-z.-]+)?",
    )
    .expect("comparator pattern is valid")
});

/// Range operator preceding a version number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeOperator {
    Exact,
    Caret,
    Tilde,
    GreaterOrEqual,
    Greater,
    LessOrEqual,
    Less,
    Other,
}

impl RangeOperator {
    fn from_token(token: Option<&str>) -> Self {
        match token {
            None | Some("=") => RangeOperator::Exact,
            Some("^") => RangeOperator::Caret,
            Some("~") => RangeOperator::Tilde,
            Some(">=") => RangeOperator::GreaterOrEqual,
            Some(">") => RangeOperator::Greater,
            Some("<=") => RangeOperator::LessOrEqual,
            Some("<") => RangeOperator::Less,
            Some(_) => RangeOperator::Other,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Comparator {
    operator: RangeOperator,
    version: Version,
}

impl Comparator {
    fn from_captures(captures: &Captures<'_>) -> Option<Self> {
        let part = |index: usize| {
            captures
                .get(index)
                .map_or(Some(0), |m| m.as_str().parse::<u64>().ok())
        };
        let mut version = Version::new(part(2)?, part(3)?, part(4)?);
        if let Some(pre) = captures.get(5) {
            version.pre = Prerelease::new(pre.as_str()).ok()?;
        }
        Some(Self {
            operator: RangeOperator::from_token(captures.get(1).map(|m| m.as_str())),
            version,
        })
    }

    /// Lower bound this comparator puts on admitted versions, if any.
    fn lower_bound(&self) -> Option<LowerBound> {
        match self.operator {
            RangeOperator::Exact
            | RangeOperator::Caret
            | RangeOperator::Tilde
            | RangeOperator::GreaterOrEqual => Some(LowerBound {
                version: self.version.clone(),
                inclusive: true,
            }),
            RangeOperator::Greater => Some(LowerBound {
                version: self.version.clone(),
                inclusive: false,
            }),
            RangeOperator::LessOrEqual | RangeOperator::Less | RangeOperator::Other => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct LowerBound {
    version: Version,
    inclusive: bool,
}

impl LowerBound {
    /// Whether nothing admitted by this bound sorts below `minimum`.
    fn at_least(&self, minimum: &Version) -> bool {
        if self.version >= *minimum {
            return true;
        }
        if self.inclusive || !self.version.pre.is_empty() {
            return false;
        }
        // `>1.2.3` admits nothing below 1.2.4.
        let successor = Version::new(
            self.version.major,
            self.version.minor,
            self.version.patch + 1,
        );
        successor >= *minimum
    }
}

/// One `||` alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Branch {
    comparators: Vec<Comparator>,
    /// Branch text that is not a comparator.
    unrecognized: bool,
}

impl Branch {
    fn parse(text: &str) -> Self {
        if let Some((low, high)) = text.split_once(" - ") {
            // Hyphen range: inclusive on both ends.
            let low = Self::parse(low.trim());
            let high = Self::parse(high.trim());
            let mut comparators = Vec::new();
            comparators.extend(low.comparators.into_iter().map(|mut c| {
                c.operator = RangeOperator::GreaterOrEqual;
                c
            }));
            comparators.extend(high.comparators.into_iter().map(|mut c| {
                c.operator = RangeOperator::LessOrEqual;
                c
            }));
            let unrecognized = low.unrecognized || high.unrecognized || comparators.len() != 2;
            return Self {
                comparators,
                unrecognized,
            };
        }

        let mut comparators = Vec::new();
        let mut unrecognized = false;
        let mut cursor = 0;
        for captures in COMPARATOR_PATTERN.captures_iter(text) {
            let Some(whole) = captures.get(0) else {
                continue;
            };
            unrecognized |= !text[cursor..whole.start()].trim().is_empty();
            cursor = whole.end();
            match Comparator::from_captures(&captures) {
                Some(comparator) => comparators.push(comparator),
                None => unrecognized = true,
            }
        }
        unrecognized |= !text[cursor..].trim().is_empty();
        Self {
            comparators,
            unrecognized,
        }
    }

    /// Tightest lower bound of the branch; `None` when it is unbounded below.
    fn lower_bound(&self) -> Option<LowerBound> {
        if self.unrecognized {
            return None;
        }
        self.comparators
            .iter()
            .filter_map(Comparator::lower_bound)
            .max_by(|a, b| {
                a.version
                    .cmp(&b.version)
                    .then_with(|| b.inclusive.cmp(&a.inclusive))
            })
    }
}

/// A declared dependency version such as `^15.5.10`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionSpec {
    branches: Vec<Branch>,
    raw: String,
}

impl VersionSpec {
    /// Parse a spec; returns `None` when it carries no version number
    /// (`latest`, `workspace:*`, git URLs).
    pub fn parse(raw: &str) -> Option<Self> {
        let branches: Vec<Branch> = raw.split("||").map(|b| Branch::parse(b.trim())).collect();
        if branches.iter().all(|branch| branch.comparators.is_empty()) {
            return None;
        }
        Some(Self {
            branches,
            raw: raw.to_string(),
        })
    }

    /// Operator of a single-comparator spec; [`RangeOperator::Other`] for
    /// unions, compound ranges and unrecognized text.
    pub fn operator(&self) -> RangeOperator {
        match self.branches.as_slice() {
            [branch] if !branch.unrecognized && branch.comparators.len() == 1 => {
                branch.comparators[0].operator
            }
            _ => RangeOperator::Other,
        }
    }

    /// First version in the spec, missing parts as zero.
    pub fn base(&self) -> &Version {
        self.branches
            .iter()
            .flat_map(|branch| branch.comparators.iter())
            .map(|comparator| &comparator.version)
            .next()
            .unwrap_or(&ZERO)
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// True for exact versions without a range operator.
    pub fn is_pinned(&self) -> bool {
        self.operator() == RangeOperator::Exact
    }

    /// Whether every version this spec admits is at least `minimum`.
    /// Branches without a lower bound (`<16`, `1.x`) never qualify.
    pub fn satisfies_minimum(&self, minimum: &Version) -> bool {
        self.branches
            .iter()
            .filter(|branch| !branch.comparators.is_empty() || branch.unrecognized)
            .all(|branch| {
                branch
                    .lower_bound()
                    .is_some_and(|bound| bound.at_least(minimum))
            })
    }
}

static ZERO: Version = Version::new(0, 0, 0);

impl fmt::Display for VersionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admits_nothing_below(raw: &str, minimum: &str) -> bool {
        VersionSpec::parse(raw)
            .unwrap()
            .satisfies_minimum(&Version::parse(minimum).unwrap())
    }

    #[test]
    fn parses_caret_spec() {
        let spec = VersionSpec::parse("^15.5.10").unwrap();
        assert_eq!(spec.operator(), RangeOperator::Caret);
        assert_eq!(spec.base(), &Version::new(15, 5, 10));
        assert!(!spec.is_pinned());
    }

    #[test]
    fn parses_exact_and_tilde() {
        assert!(VersionSpec::parse("18.2.0").unwrap().is_pinned());
        assert!(VersionSpec::parse("1.0.0-beta.1").unwrap().is_pinned());
        assert_eq!(
            VersionSpec::parse("~5.3.3").unwrap().operator(),
            RangeOperator::Tilde
        );
        assert_eq!(
            VersionSpec::parse(">= 1.2.0").unwrap().operator(),
            RangeOperator::GreaterOrEqual
        );
        assert_eq!(
            VersionSpec::parse("<16.0.0").unwrap().operator(),
            RangeOperator::Less
        );
    }

    #[test]
    fn prerelease_is_part_of_base() {
        let spec = VersionSpec::parse("15.5.10-canary.3").unwrap();
        assert_eq!(spec.base().pre.as_str(), "canary.3");
        assert!(spec.base() < &Version::new(15, 5, 10));
    }

    #[test]
    fn partial_versions_fill_zeroes() {
        let spec = VersionSpec::parse("^15").unwrap();
        assert_eq!(spec.base(), &Version::new(15, 0, 0));
    }

    #[test]
    fn compound_ranges_are_other() {
        for raw in ["1.2.3 - 2.0.0", "npm:react@18.2.0", ">=1.0.0 <2.0.0", "^1 || ^2", "1.x"] {
            assert_eq!(
                VersionSpec::parse(raw).unwrap().operator(),
                RangeOperator::Other,
                "{raw}"
            );
        }
    }

    #[test]
    fn tags_do_not_parse() {
        assert!(VersionSpec::parse("latest").is_none());
        assert!(VersionSpec::parse("workspace:*").is_none());
    }

    #[test]
    fn minimum_comparison_uses_lower_bound() {
        assert!(admits_nothing_below("^15.5.10", "15.5.10"));
        assert!(admits_nothing_below("^16.0.0", "15.5.10"));
        assert!(!admits_nothing_below("^15.4.0", "15.5.10"));
        assert!(!admits_nothing_below("15.5.9", "15.5.10"));
    }

    #[test]
    fn upper_bound_only_specs_never_satisfy_minimum() {
        assert!(!admits_nothing_below("<16.0.0", "15.5.10"));
        assert!(!admits_nothing_below("<=15.9.0", "15.5.10"));
        assert!(!admits_nothing_below("1.x", "1.0.0"));
        assert!(!admits_nothing_below("npm:next@16.0.0", "15.5.10"));
    }

    #[test]
    fn prerelease_sorts_below_release() {
        assert!(!admits_nothing_below("15.5.10-canary.3", "15.5.10"));
        assert!(!admits_nothing_below("^15.5.10-canary.3", "15.5.10"));
        assert!(admits_nothing_below("15.5.11-canary.1", "15.5.10"));
    }

    #[test]
    fn exclusive_lower_bound_admits_only_greater_versions() {
        assert!(admits_nothing_below(">15.5.9", "15.5.10"));
        assert!(!admits_nothing_below(">15.5.8", "15.5.10"));
        assert!(admits_nothing_below(">15.5.10", "15.5.10"));
    }

    #[test]
    fn unions_use_the_lowest_branch() {
        assert!(!admits_nothing_below("^14.2.0 || ^15.5.10", "15.5.10"));
        assert!(admits_nothing_below("^15.5.10 || ^16.0.0", "15.5.10"));
        assert!(!admits_nothing_below("^15.5.10 || <15.0.0", "15.5.10"));
    }

    #[test]
    fn ranges_use_their_tightest_lower_bound() {
        assert!(admits_nothing_below(">=15.5.10 <16.0.0", "15.5.10"));
        assert!(!admits_nothing_below(">=15.0.0 <16.0.0", "15.5.10"));
        assert!(admits_nothing_below("15.5.10 - 16.0.0", "15.5.10"));
        assert!(!admits_nothing_below("15.4.0 - 16.0.0", "15.5.10"));
    }
}
