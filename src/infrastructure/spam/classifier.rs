use std::{path::Path, sync::Arc};

use anyhow::Context;
use parking_lot::RwLock;
use regex::{Regex, RegexBuilder};

use crate::entities::submission::SubmissionRequest;

/// Built-in screen list, used when no patterns file is configured.
pub const DEFAULT_PATTERNS: &[&str] = &[
    "viagra",
    "casino",
    "lottery",
    "winner",
    "inheritance",
    "million",
    "urgent",
    "congratulations",
];

/// Outcome of screening one submission. `matched_pattern` is for
/// server-side logging only and is never sent back to the caller.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub is_spam: bool,
    pub matched_pattern: Option<String>,
}

impl Verdict {
    fn clean() -> Self {
        Verdict {
            is_spam: false,
            matched_pattern: None,
        }
    }
}

/// Heuristic pattern screen over submission content. The pattern list is
/// swapped wholesale under a lock so it can be reloaded while requests are
/// in flight.
#[derive(Clone)]
pub struct SpamClassifier {
    patterns: Arc<RwLock<Vec<Regex>>>,
}

impl SpamClassifier {
    pub fn new(patterns: &[&str]) -> anyhow::Result<Self> {
        Ok(Self {
            patterns: Arc::new(RwLock::new(compile(patterns)?)),
        })
    }

    pub fn with_default_patterns() -> Self {
        Self {
            patterns: Arc::new(RwLock::new(
                compile(DEFAULT_PATTERNS).expect("default patterns compile"),
            )),
        }
    }

    /// Load patterns from a file with one case-insensitive regex per line.
    /// Blank lines and lines starting with `#` are skipped.
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let classifier = Self {
            patterns: Arc::new(RwLock::new(Vec::new())),
        };
        classifier.reload_from_file(path)?;
        Ok(classifier)
    }

    /// Re-read the patterns file, replacing the active list atomically.
    /// On any error the previous list stays in effect.
    pub fn reload_from_file(&self, path: impl AsRef<Path>) -> anyhow::Result<usize> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading spam patterns from {}", path.display()))?;

        let lines: Vec<&str> = raw
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .collect();

        let compiled = compile(&lines)?;
        let count = compiled.len();
        *self.patterns.write() = compiled;
        Ok(count)
    }

    /// Screen `name`, `email`, and `message`, stopping at the first match.
    /// Heuristic only; false positives and negatives are expected.
    pub fn classify(&self, req: &SubmissionRequest) -> Verdict {
        let patterns = self.patterns.read();
        for re in patterns.iter() {
            for field in [&req.name, &req.email, &req.message] {
                if re.is_match(field) {
                    return Verdict {
                        is_spam: true,
                        matched_pattern: Some(re.as_str().to_string()),
                    };
                }
            }
        }
        Verdict::clean()
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.read().len()
    }
}

fn compile(patterns: &[&str]) -> anyhow::Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .build()
                .with_context(|| format!("invalid spam pattern: {p}"))
        })
        .collect()
}
