//! Immutable, ordered target list and per-worker round-robin cursors.

use std::fmt;
use std::sync::Arc;

use crate::error::ValidationError;

/// One endpoint the workers request, kept as the raw string it was given as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target(String);

impl Target {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered targets shared read-only by every worker.
#[derive(Debug, Clone)]
pub struct TargetSet {
    targets: Arc<[Target]>,
}

impl TargetSet {
    /// Keeps the entries that start with `prefix`, preserving input order.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTargets`] when no entry matches.
    pub fn load<I, S>(raw_entries: I, prefix: &str) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let targets: Vec<Target> = raw_entries
            .into_iter()
            .filter(|entry| entry.as_ref().starts_with(prefix))
            .map(|entry| Target(entry.as_ref().to_owned()))
            .collect();

        if targets.is_empty() {
            return Err(ValidationError::EmptyTargets {
                prefix: prefix.to_owned(),
            });
        }

        Ok(Self {
            targets: targets.into(),
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter()
    }

    /// A fresh cursor positioned on the first target.
    #[must_use]
    pub fn cursor(&self) -> TargetCursor {
        TargetCursor {
            targets: Arc::clone(&self.targets),
            position: 0,
        }
    }
}

/// Circular position into a [`TargetSet`], owned by a single worker.
#[derive(Debug)]
pub struct TargetCursor {
    targets: Arc<[Target]>,
    position: usize,
}

impl TargetCursor {
    /// Returns the current target and advances, wrapping after the last one.
    pub fn next_target(&mut self) -> Option<&Target> {
        let len = self.targets.len();
        let index = self.position;
        self.position = index.saturating_add(1).checked_rem(len).unwrap_or(0);
        self.targets.get(index)
    }
}
