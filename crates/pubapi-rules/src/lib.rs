//! # Published API Allow-lists
//!
//! This crate turns allow-list configuration into a [`PermissionIndex`].
//!
//! ## Overview
//!
//! The pubapi-rules crate handles:
//! - **Entries**: Method-, class- and package-level [`PermissionEntry`] records
//! - **Grammar**: One entry per line, see [`entry`]
//! - **Index**: Lookup tables answering "is this member, as declared on this type, permitted?"
//! - **Loading**: [`load_config`] reads every file in an allow-list directory
//!
//! ## Architecture
//!
//! ```text
//! config dir/
//!   ├─ core.config  ─┐
//!   └─ web.config   ─┴─ PermissionEntry::parse (per line) ─→ PermissionIndex
//!                                                             ├─ methods  (type → {MethodKey})
//!                                                             ├─ classes  {type}
//!                                                             └─ packages {prefix}
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use pubapi_meta::MethodKey;
//! use pubapi_rules::PermissionIndex;
//!
//! let index = PermissionIndex::from_config_str(
//!     "pkg.TestClass testMethod ()V\n\
//!      pkg.util\n",
//! );
//!
//! assert!(index.is_permitted("pkg.TestClass", &MethodKey::new("testMethod", "()V")));
//! assert!(!index.is_permitted("pkg.TestClass", &MethodKey::new("testMethod2", "()V")));
//! assert!(index.is_permitted("pkg.util.Strings", &MethodKey::new("trim", "()V")));
//! ```
//!
//! The index only answers for the *declaring* type it is asked about.
//! Walking the type hierarchy to find that type is the job of `pubapi-check`.

pub mod entry;
pub mod error;
pub mod index;
pub mod loader;

// Re-export main types for convenience
pub use entry::PermissionEntry;
pub use error::{ConfigError, ConfigResult, EntryError};
pub use index::{PermissionIndex, RuleMatch};
pub use loader::load_config;
