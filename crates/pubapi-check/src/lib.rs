//! # Published API Checks
//!
//! This crate answers whether a call site uses an API that is on the
//! published allow-list.
//!
//! ## Overview
//!
//! The pubapi-check crate handles:
//! - **Resolution**: Finding the type that actually declares a called member
//! - **Judgement**: Matching the declaring type against the installed [`PermissionIndex`](pubapi_rules::PermissionIndex)
//! - **Reloading**: Replacing the allow-list atomically while queries run
//! - **Global access**: Process-wide helpers in [`global`]
//!
//! ## Architecture
//!
//! ```text
//! is_permitted(type, method, descriptor)
//!   │
//!   ├─ HierarchyResolver ── own members → superclasses → interfaces → java.lang.Object
//!   │        │
//!   │        └─ private member? ─→ permitted
//!   │
//!   └─ PermissionIndex::lookup(declaring type) ─→ method / class / package rule
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use pubapi_check::ApiChecker;
//! use pubapi_meta::{InMemoryProvider, TypeDescriptor};
//! use pubapi_rules::PermissionIndex;
//!
//! let provider = InMemoryProvider::new()
//!     .with(TypeDescriptor::interface("lib.Api").method("call", "()V"))
//!     .with(
//!         TypeDescriptor::class("app.Impl")
//!             .extends("java.lang.Object")
//!             .implements("lib.Api"),
//!     );
//!
//! let checker = ApiChecker::new(provider);
//! checker.install(PermissionIndex::from_config_str("lib.Api call ()V"));
//!
//! // Inherited from the interface, so the interface's entry applies.
//! assert!(checker.is_permitted("app.Impl", "call", "()V").unwrap());
//! // Declared by java.lang.Object, which is not listed.
//! assert!(!checker.is_permitted("app.Impl", "hashCode", "()I").unwrap());
//! ```
//!
//! ## Errors
//!
//! A query whose declaring type cannot be determined fails with
//! [`CheckError::UnresolvableType`]. Callers should report it as
//! "cannot judge" rather than as a violation.

pub mod checker;
pub mod error;
pub mod global;
pub mod resolver;

// Re-export main types for convenience
pub use checker::{ApiChecker, Verdict};
pub use error::{CheckError, CheckResult};
pub use resolver::{Declaration, HierarchyResolver};
