//! Metadata provider trait and the in-memory implementation.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::descriptor::{normalize_type_name, TypeDescriptor};
use crate::error::{MetadataError, MetadataResult};

/// Source of type descriptors.
///
/// Implementations must behave as a pure function of the type name for the
/// lifetime of a scan. Any caching is the provider's own business; callers
/// never hold on to descriptors across lookups.
pub trait TypeMetadataProvider: Send + Sync {
    /// Describe a type by its fully-qualified, dotted name.
    ///
    /// Returns [`MetadataError::NotFound`] when the type is unknown.
    fn describe(&self, type_name: &str) -> MetadataResult<Arc<TypeDescriptor>>;
}

impl<P: TypeMetadataProvider + ?Sized> TypeMetadataProvider for Arc<P> {
    fn describe(&self, type_name: &str) -> MetadataResult<Arc<TypeDescriptor>> {
        (**self).describe(type_name)
    }
}

impl<P: TypeMetadataProvider + ?Sized> TypeMetadataProvider for Box<P> {
    fn describe(&self, type_name: &str) -> MetadataResult<Arc<TypeDescriptor>> {
        (**self).describe(type_name)
    }
}

/// Provider backed by a fixed map of descriptors.
///
/// Useful for tests and for hosts that already hold parsed metadata.
///
/// # Example
///
/// ```
/// use pubapi_meta::{InMemoryProvider, TypeDescriptor, TypeMetadataProvider};
///
/// let provider = InMemoryProvider::new()
///     .with(TypeDescriptor::interface("app.Api").method("call", "()V"))
///     .with(TypeDescriptor::class("app.Impl").implements("app.Api"));
///
/// assert!(provider.describe("app.Impl").is_ok());
/// assert!(provider.describe("app.Missing").unwrap_err().is_not_found());
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    types: HashMap<String, Arc<TypeDescriptor>>,
}

impl InMemoryProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self {
            types: HashMap::new(),
        }
    }

    /// Add a descriptor, replacing any previous one with the same name.
    pub fn insert(&mut self, descriptor: TypeDescriptor) {
        self.types
            .insert(normalize_type_name(&descriptor.name), Arc::new(descriptor));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, descriptor: TypeDescriptor) -> Self {
        self.insert(descriptor);
        self
    }

    /// Build a provider from a JSON array of descriptors.
    ///
    /// # Example
    ///
    /// ```
    /// use pubapi_meta::{InMemoryProvider, TypeMetadataProvider};
    ///
    /// let provider = InMemoryProvider::from_json_str(r#"[
    ///     {"name": "app.Api", "kind": "interface",
    ///      "methods": [{"name": "call", "descriptor": "()V"}]}
    /// ]"#).unwrap();
    /// assert!(provider.describe("app.Api").unwrap().is_interface());
    /// ```
    pub fn from_json_str(json: &str) -> MetadataResult<Self> {
        let descriptors: Vec<TypeDescriptor> = serde_json::from_str(json)?;
        Ok(descriptors.into_iter().collect())
    }

    /// Build a provider from a JSON fixture file.
    pub fn from_json_file(path: impl AsRef<Path>) -> MetadataResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| MetadataError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Number of known types.
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl FromIterator<TypeDescriptor> for InMemoryProvider {
    fn from_iter<T: IntoIterator<Item = TypeDescriptor>>(iter: T) -> Self {
        let mut provider = InMemoryProvider::new();
        for descriptor in iter {
            provider.insert(descriptor);
        }
        provider
    }
}

impl TypeMetadataProvider for InMemoryProvider {
    fn describe(&self, type_name: &str) -> MetadataResult<Arc<TypeDescriptor>> {
        let name = normalize_type_name(type_name);
        self.types
            .get(&name)
            .cloned()
            .ok_or_else(|| MetadataError::not_found(name))
    }
}
