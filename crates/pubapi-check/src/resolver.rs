//! # Hierarchy resolution
//!
//! Finds the type that actually declares a member, the way virtual dispatch
//! would: the queried type first, then its superclass chain, then its
//! interfaces in declaration order, and finally the implicit root ancestor.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, warn};

use pubapi_meta::{
    normalize_type_name, MemberInfo, MetadataError, MethodKey, TypeDescriptor, TypeKind,
    TypeMetadataProvider, ROOT_TYPE,
};

use crate::error::{CheckError, CheckResult};

/// The member a query resolved to, and the type declaring it.
#[derive(Debug, Clone)]
pub struct Declaration {
    /// Type whose own member table holds the member.
    pub declaring_type: Arc<TypeDescriptor>,
    /// The matched member.
    pub member: MemberInfo,
}

impl Declaration {
    fn new(declaring_type: &Arc<TypeDescriptor>, member: &MemberInfo) -> Self {
        Self {
            declaring_type: Arc::clone(declaring_type),
            member: member.clone(),
        }
    }

    /// Name of the declaring type.
    pub fn type_name(&self) -> &str {
        &self.declaring_type.name
    }
}

/// Depth-first declaring-type search over a metadata provider.
///
/// The resolver holds no state between calls. Descriptors are requested
/// from the provider on every walk.
///
/// # Example
///
/// ```
/// use pubapi_check::HierarchyResolver;
/// use pubapi_meta::{InMemoryProvider, MethodKey, TypeDescriptor};
///
/// let provider = InMemoryProvider::new()
///     .with(TypeDescriptor::interface("app.Api").method("call", "()V"))
///     .with(TypeDescriptor::class("app.Impl").extends("java.lang.Object").implements("app.Api"));
///
/// let resolver = HierarchyResolver::new(&provider);
/// let found = resolver.resolve("app.Impl", &MethodKey::new("call", "()V")).unwrap();
/// assert_eq!(found.type_name(), "app.Api");
///
/// let found = resolver.resolve("app.Impl", &MethodKey::new("hashCode", "()I")).unwrap();
/// assert_eq!(found.type_name(), "java.lang.Object");
/// ```
pub struct HierarchyResolver<'p> {
    provider: &'p dyn TypeMetadataProvider,
}

impl<'p> HierarchyResolver<'p> {
    /// Create a resolver over a provider.
    pub fn new(provider: &'p dyn TypeMetadataProvider) -> Self {
        Self { provider }
    }

    /// Find the declaring type of `key` as seen from `type_name`.
    ///
    /// # Errors
    ///
    /// [`CheckError::UnresolvableType`] naming `type_name` when the queried
    /// type or any type visited on the way cannot be loaded, or when no
    /// type in the reachable hierarchy (root included) declares the member.
    pub fn resolve(&self, type_name: &str, key: &MethodKey) -> CheckResult<Declaration> {
        let name = normalize_type_name(type_name);

        let start = self.describe(&name).map_err(|err| {
            warn!(type_name = %name, error = %err, "Queried type has no metadata");
            CheckError::unresolvable(&name, Some(err))
        })?;

        let found = if key.is_constructor() {
            // Constructors are never inherited.
            start.find_member(key).map(|member| Declaration::new(&start, member))
        } else {
            let mut visited = HashSet::new();
            let walked = self.search(&start, key, &mut visited).map_err(|err| {
                warn!(type_name = %name, error = %err, "Type hierarchy walk hit unloadable type");
                CheckError::unresolvable(&name, Some(err))
            })?;
            walked.or_else(|| self.root_fallback(key))
        };

        match found {
            Some(declaration) => {
                debug!(
                    type_name = %name,
                    member = %key,
                    declaring_type = %declaration.type_name(),
                    "Resolved declaring type"
                );
                Ok(declaration)
            }
            None => Err(CheckError::unresolvable(&name, None)),
        }
    }

    fn describe(&self, name: &str) -> Result<Arc<TypeDescriptor>, MetadataError> {
        if name == ROOT_TYPE {
            return Ok(Arc::new(TypeDescriptor::root()));
        }
        self.provider.describe(name)
    }

    /// Own members, then the superclass chain, then interfaces in order.
    ///
    /// The root ancestor is never entered here; it is the final fallback
    /// after every explicit supertype has been searched.
    fn search(
        &self,
        current: &Arc<TypeDescriptor>,
        key: &MethodKey,
        visited: &mut HashSet<String>,
    ) -> Result<Option<Declaration>, MetadataError> {
        // A type already searched without a match cannot match on a second visit.
        if !visited.insert(current.name.clone()) {
            return Ok(None);
        }

        if let Some(member) = current.find_member(key) {
            return Ok(Some(Declaration::new(current, member)));
        }

        if current.kind == TypeKind::Class {
            if let Some(superclass) = current.superclass.as_deref() {
                if superclass != ROOT_TYPE {
                    let parent = self.provider.describe(superclass)?;
                    if let Some(found) = self.search(&parent, key, visited)? {
                        return Ok(Some(found));
                    }
                }
            }
        }

        for interface in &current.interfaces {
            let parent = self.provider.describe(interface)?;
            if let Some(found) = self.search(&parent, key, visited)? {
                return Ok(Some(found));
            }
        }

        Ok(None)
    }

    fn root_fallback(&self, key: &MethodKey) -> Option<Declaration> {
        let root = Arc::new(TypeDescriptor::root());
        root.find_member(key).map(|member| Declaration::new(&root, member))
    }
}
