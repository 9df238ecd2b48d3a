//! # Permission index
//!
//! In-memory lookup structure built from allow-list entries.
//! An index is immutable once handed to a checker; reloading builds a new one.

use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::warn;

use pubapi_meta::{normalize_type_name, package_of, MethodKey};

use crate::entry::PermissionEntry;

/// Which rule granted a lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleMatch {
    /// An exact `(type, method)` entry.
    Method,
    /// A class-level entry for the type.
    Class,
    /// A package-level entry with this prefix.
    Package(String),
}

/// Allow-list lookup tables.
///
/// # Example
///
/// ```
/// use pubapi_meta::MethodKey;
/// use pubapi_rules::{PermissionEntry, PermissionIndex};
///
/// let index: PermissionIndex = [
///     PermissionEntry::method("app.Service", "call", "()V"),
///     PermissionEntry::class("app.Dto"),
///     PermissionEntry::package("app.util"),
/// ]
/// .into_iter()
/// .collect();
///
/// assert!(index.is_permitted("app.Service", &MethodKey::new("call", "()V")));
/// assert!(!index.is_permitted("app.Service", &MethodKey::new("call", "(I)V")));
/// assert!(index.is_permitted("app.Dto", &MethodKey::new("anything", "()V")));
/// assert!(index.is_permitted("app.util.text.Strings", &MethodKey::new("trim", "()V")));
/// ```
#[derive(Debug, Clone, Default, Serialize)]
pub struct PermissionIndex {
    /// Method-level entries grouped by owning type.
    methods: HashMap<String, HashSet<MethodKey>>,
    /// Class-level entries.
    classes: HashSet<String>,
    /// Package-level prefixes.
    packages: BTreeSet<String>,
}

impl PermissionIndex {
    /// Create an empty index. Every lookup against it is denied.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one entry. Repeated entries are idempotent.
    pub fn add(&mut self, entry: PermissionEntry) {
        match entry {
            PermissionEntry::Method { type_name, method } => {
                self.methods.entry(type_name).or_default().insert(method);
            }
            PermissionEntry::Class { type_name } => {
                self.classes.insert(type_name);
            }
            PermissionEntry::Package { prefix } => {
                self.packages.insert(prefix);
            }
        }
    }

    /// Parse allow-list text and add every recognized entry.
    ///
    /// Malformed lines are logged and skipped.
    ///
    /// # Arguments
    ///
    /// * `text` - Allow-list file contents
    /// * `source` - Label for log messages (usually the file path)
    ///
    /// # Returns
    ///
    /// Number of entries added
    pub fn extend_from_str(&mut self, text: &str, source: &str) -> usize {
        let mut added = 0;
        for (number, line) in text.lines().enumerate() {
            match PermissionEntry::parse(line) {
                Ok(Some(entry)) => {
                    self.add(entry);
                    added += 1;
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(source = %source, line = number + 1, error = %err, "Skipping malformed allow-list entry");
                }
            }
        }
        added
    }

    /// Build an index from allow-list text.
    pub fn from_config_str(text: &str) -> Self {
        let mut index = Self::new();
        index.extend_from_str(text, "<inline>");
        index
    }

    /// Find the rule permitting `method` as declared on `type_name`.
    ///
    /// Rules are consulted in order: exact method, class, package.
    pub fn lookup(&self, type_name: &str, method: &MethodKey) -> Option<RuleMatch> {
        let type_name = normalize_type_name(type_name);

        if self
            .methods
            .get(&type_name)
            .is_some_and(|methods| methods.contains(method))
        {
            return Some(RuleMatch::Method);
        }

        if self.classes.contains(&type_name) {
            return Some(RuleMatch::Class);
        }

        self.package_prefix(&type_name)
            .map(|prefix| RuleMatch::Package(prefix.to_string()))
    }

    /// Check whether `method` declared on `type_name` is permitted.
    pub fn is_permitted(&self, type_name: &str, method: &MethodKey) -> bool {
        self.lookup(type_name, method).is_some()
    }

    /// Package prefix covering the type's package, if any.
    ///
    /// A prefix covers its own package and every sub-package, but never a
    /// sibling that merely shares leading characters (`a.b` does not cover
    /// `a.bc`).
    pub fn package_prefix(&self, type_name: &str) -> Option<&str> {
        let package = package_of(type_name);
        self.packages
            .iter()
            .find(|prefix| {
                package == prefix.as_str()
                    || (package.starts_with(prefix.as_str())
                        && package[prefix.len()..].starts_with('.'))
            })
            .map(String::as_str)
    }

    /// All entries, sorted by their display form.
    pub fn entries(&self) -> Vec<PermissionEntry> {
        let mut entries: Vec<PermissionEntry> = self
            .methods
            .iter()
            .flat_map(|(type_name, methods)| {
                methods.iter().map(move |method| PermissionEntry::Method {
                    type_name: type_name.clone(),
                    method: method.clone(),
                })
            })
            .chain(self.classes.iter().map(|type_name| PermissionEntry::Class {
                type_name: type_name.clone(),
            }))
            .chain(self.packages.iter().map(|prefix| PermissionEntry::Package {
                prefix: prefix.clone(),
            }))
            .collect();
        entries.sort_by_key(|entry| entry.to_string());
        entries
    }

    /// Number of distinct entries.
    pub fn len(&self) -> usize {
        self.methods.values().map(HashSet::len).sum::<usize>()
            + self.classes.len()
            + self.packages.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FromIterator<PermissionEntry> for PermissionIndex {
    fn from_iter<T: IntoIterator<Item = PermissionEntry>>(iter: T) -> Self {
        let mut index = PermissionIndex::new();
        for entry in iter {
            index.add(entry);
        }
        index
    }
}
