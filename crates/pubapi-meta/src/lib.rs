//! # Published API Type Metadata
//!
//! This crate describes compiled JVM types for the published API checks:
//! which members a type declares itself, and which supertypes it names.
//!
//! ## Overview
//!
//! The pubapi-meta crate handles:
//! - **Members**: Method identity ([`MethodKey`]) and [`Visibility`]
//! - **Descriptors**: Per-type [`TypeDescriptor`]s, including the implicit root ancestor
//! - **Providers**: The [`TypeMetadataProvider`] seam plus two implementations
//!
//! ## Architecture
//!
//! ```text
//! TypeMetadataProvider::describe("a.b.C")
//!   ├─ InMemoryProvider   (builder / JSON fixtures)
//!   └─ ClassPathProvider  (a/b/C.class under class-path roots)
//!         └─ ClassFile::parse → TypeDescriptor
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use pubapi_meta::{InMemoryProvider, MethodKey, TypeDescriptor, TypeMetadataProvider};
//!
//! let provider = InMemoryProvider::new()
//!     .with(TypeDescriptor::interface("app.Api").method("call", "()V"))
//!     .with(TypeDescriptor::class("app.Impl").implements("app.Api"));
//!
//! let api = provider.describe("app.Api").unwrap();
//! assert!(api.find_member(&MethodKey::new("call", "()V")).is_some());
//! ```
//!
//! ## Root Ancestor
//!
//! `java.lang.Object` is never loaded from a provider. It is modelled by
//! [`TypeDescriptor::root()`] with a fixed method set (`toString`, `equals`,
//! `hashCode`, ...).

pub mod classfile;
pub mod classpath;
pub mod descriptor;
pub mod error;
pub mod member;
pub mod provider;

// Re-export main types for convenience
pub use classfile::{ClassFile, ClassFormatError};
pub use classpath::ClassPathProvider;
pub use descriptor::{normalize_type_name, package_of, TypeDescriptor, TypeKind, ROOT_TYPE};
pub use error::{MetadataError, MetadataResult};
pub use member::{MemberInfo, MethodKey, Visibility};
pub use provider::{InMemoryProvider, TypeMetadataProvider};
