//! Breadcrumb trail for menu navigation
//!
//! The trail is a value, not shared state: `push` and `pop` return a new
//! trail and leave the receiver untouched, so each menu invocation owns the
//! trail it was handed.

use std::fmt;

/// Label of the root menu, fixed for the life of the process
pub const ROOT_LABEL: &str = "Hive";

/// Separator used when the trail is rendered as a path
pub const PATH_SEPARATOR: &str = " › ";

/// Ordered labels from the root menu to the current menu. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Breadcrumb {
    labels: Vec<String>,
}

impl Default for Breadcrumb {
    fn default() -> Self {
        Self::root()
    }
}

impl Breadcrumb {
    /// Trail holding only the root label
    pub fn root() -> Self {
        Self {
            labels: vec![ROOT_LABEL.to_string()],
        }
    }

    /// Trail with one more label appended
    pub fn push(&self, label: impl Into<String>) -> Self {
        let mut labels = self.labels.clone();
        labels.push(label.into());
        Self { labels }
    }

    /// Trail with the last label removed. The root cannot be popped.
    pub fn pop(&self) -> Self {
        if self.labels.len() <= 1 {
            return self.clone();
        }
        let mut labels = self.labels.clone();
        labels.pop();
        Self { labels }
    }

    /// The labels, root first
    pub fn current(&self) -> &[String] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// A trail always holds at least the root label
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.labels.len() == 1
    }

    /// Label of the innermost menu
    pub fn leaf(&self) -> &str {
        self.labels.last().map(String::as_str).unwrap_or(ROOT_LABEL)
    }

    /// Labels joined into a display path
    pub fn path(&self) -> String {
        self.labels.join(PATH_SEPARATOR)
    }
}

impl fmt::Display for Breadcrumb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}
