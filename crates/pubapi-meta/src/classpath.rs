//! Class-path backed metadata provider.
//!
//! Resolves `a.b.C$D` to `<root>/a/b/C$D.class` in each configured
//! class-path directory, in order, and caches the decoded descriptors.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

use crate::classfile::ClassFile;
use crate::descriptor::{normalize_type_name, TypeDescriptor};
use crate::error::{MetadataError, MetadataResult};
use crate::provider::TypeMetadataProvider;

/// Provider reading compiled classes from class-path directories.
///
/// # Example
///
/// ```rust,no_run
/// use pubapi_meta::{ClassPathProvider, TypeMetadataProvider};
///
/// let provider = ClassPathProvider::new(["build/classes/java/main"]);
/// let desc = provider.describe("com.example.Service").unwrap();
/// println!("{} declares {} members", desc.name, desc.methods.len());
/// ```
pub struct ClassPathProvider {
    roots: Vec<PathBuf>,
    cache: RwLock<HashMap<String, Arc<TypeDescriptor>>>,
}

impl ClassPathProvider {
    /// Create a provider over the given class-path directories.
    ///
    /// # Arguments
    ///
    /// * `roots` - Directories searched in order; the first hit wins
    pub fn new<I, P>(roots: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            roots: roots.into_iter().map(Into::into).collect(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Configured class-path directories.
    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Number of cached descriptors.
    pub fn cached(&self) -> usize {
        self.cache.read().len()
    }

    fn relative_path(type_name: &str) -> PathBuf {
        PathBuf::from(format!("{}.class", type_name.replace('.', "/")))
    }

    fn load(&self, type_name: &str) -> MetadataResult<Option<TypeDescriptor>> {
        let relative = Self::relative_path(type_name);
        for root in &self.roots {
            let path = root.join(&relative);
            if !path.is_file() {
                trace!(path = %path.display(), "class file not in root");
                continue;
            }
            return read_class_file(&path).map(Some);
        }
        Ok(None)
    }
}

/// Decode one class file into a descriptor.
pub fn read_class_file(path: &Path) -> MetadataResult<TypeDescriptor> {
    let bytes = std::fs::read(path).map_err(|source| MetadataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let class = ClassFile::parse(&bytes).map_err(|source| MetadataError::ClassFormat {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(class.into_descriptor())
}

impl TypeMetadataProvider for ClassPathProvider {
    fn describe(&self, type_name: &str) -> MetadataResult<Arc<TypeDescriptor>> {
        let name = normalize_type_name(type_name);
        if let Some(desc) = self.cache.read().get(&name) {
            return Ok(Arc::clone(desc));
        }

        let desc = match self.load(&name)? {
            Some(desc) => Arc::new(desc),
            None => return Err(MetadataError::not_found(name)),
        };
        debug!(type_name = %name, methods = desc.methods.len(), "loaded class metadata");

        let mut cache = self.cache.write();
        Ok(Arc::clone(cache.entry(name).or_insert(desc)))
    }
}
