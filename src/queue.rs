use serde::Serialize;
use std::fmt;

/// Dispatch target: selects both the queue and the remote path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Logs,
    Reports,
}

impl Category {
    /// Resolve a dispatch target name. Only the exact strings `logs` and
    /// `reports` are recognized.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "logs" => Some(Category::Logs),
            "reports" => Some(Category::Reports),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Logs => "logs",
            Category::Reports => "reports",
        }
    }

    /// Path of the category's endpoint under the service's API namespace.
    pub fn path(&self) -> &'static str {
        match self {
            Category::Logs => "api/logs",
            Category::Reports => "api/reports",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered, unbounded buffer of entries awaiting dispatch to one category.
#[derive(Debug, Clone)]
pub struct EndpointQueue<E> {
    category: Category,
    entries: Vec<E>,
}

impl<E: Serialize> EndpointQueue<E> {
    pub fn new(category: Category) -> Self {
        Self {
            category,
            entries: Vec::new(),
        }
    }

    pub fn category(&self) -> Category {
        self.category
    }

    /// Append an entry to the tail. No validation, no dedup.
    pub fn add(&mut self, entry: E) {
        self.entries.push(entry);
    }

    /// JSON array of the current entries in insertion order.
    pub fn serialize(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.entries)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
