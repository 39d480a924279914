//! Import path classification into ordered buckets

use std::fmt;

use regex::Regex;

/// A named category into which import paths are grouped for display.
///
/// The derived `Ord` is the emission order: standard library first, the
/// current module last, caller-supplied groups in between in the order the
/// caller listed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bucket {
    /// Standard library imports; also the default when no rule matches.
    Standard,
    /// Third-party imports not claimed by a more specific rule.
    Other,
    /// `k8s.io` imports.
    Kubernetes,
    /// `github.com/openshift` imports.
    Openshift,
    /// Caller-supplied organization group, ordered by flag position.
    Group(usize),
    /// Imports belonging to the module being formatted.
    Module,
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Bucket::Standard => write!(f, "standard"),
            Bucket::Other => write!(f, "other"),
            Bucket::Kubernetes => write!(f, "kubernetes"),
            Bucket::Openshift => write!(f, "openshift"),
            Bucket::Group(n) => write!(f, "group{}", n),
            Bucket::Module => write!(f, "module"),
        }
    }
}

/// A single (bucket, pattern) pair. Patterns are unanchored, so matching is
/// "contains", mirroring the loose style of the stock rules.
#[derive(Debug, Clone)]
pub struct ClassificationRule {
    pub bucket: Bucket,
    pub pattern: Regex,
}

/// The ordered rule list. Built once at startup from the CLI flags and
/// shared read-only across workers.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<ClassificationRule>,
}

impl RuleSet {
    /// Build the standard rule list around a module pattern and optional
    /// extra group patterns.
    ///
    /// Priority order is significant: the module rule comes first so a module
    /// living inside an organization namespace still classifies as the
    /// module, and the generic third-party domain rule comes last so every
    /// more specific rule gets a chance before it.
    pub fn new(module: &str, groups: &[String]) -> Result<Self, regex::Error> {
        let mut rules = vec![
            ClassificationRule {
                bucket: Bucket::Module,
                pattern: Regex::new(module)?,
            },
            ClassificationRule {
                bucket: Bucket::Kubernetes,
                pattern: Regex::new("k8s.io")?,
            },
            ClassificationRule {
                bucket: Bucket::Openshift,
                pattern: Regex::new("github.com/openshift")?,
            },
        ];
        for (i, group) in groups.iter().enumerate() {
            rules.push(ClassificationRule {
                bucket: Bucket::Group(i),
                pattern: Regex::new(group)?,
            });
        }
        rules.push(ClassificationRule {
            bucket: Bucket::Other,
            pattern: Regex::new(r"[a-zA-Z0-9]+\.[a-zA-Z0-9]+/")?,
        });
        Ok(Self { rules })
    }

    /// Assign an import path to a bucket: first matching rule wins, no match
    /// falls through to the standard-library bucket.
    pub fn classify(&self, path: &str) -> Bucket {
        for rule in &self.rules {
            if rule.pattern.is_match(path) {
                return rule.bucket;
            }
        }
        Bucket::Standard
    }
}
