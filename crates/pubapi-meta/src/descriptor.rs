//! # Type descriptors
//!
//! Static description of one type: its own declared members, its direct
//! superclass and its directly declared interfaces. Descriptors are what a
//! [`TypeMetadataProvider`](crate::TypeMetadataProvider) hands out.

use serde::{Deserialize, Serialize};

use crate::member::{MemberInfo, MethodKey, Visibility};

/// Name of the universal base type every class implicitly derives from.
pub const ROOT_TYPE: &str = "java.lang.Object";

/// Normalize a type name to dotted form (`a/b/C$D` becomes `a.b.C$D`).
pub fn normalize_type_name(name: &str) -> String {
    name.trim().replace('/', ".")
}

/// Kind of node in the type hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    /// A class, enum or record.
    #[default]
    Class,
    /// An interface or annotation type.
    Interface,
    /// The implicit root ancestor.
    Root,
}

/// Descriptor of a single type.
///
/// # Example
///
/// ```
/// use pubapi_meta::{MethodKey, TypeDescriptor, TypeKind};
///
/// let desc = TypeDescriptor::class("app.Sub")
///     .extends("app.Super")
///     .implements("app.Api")
///     .method("run", "()V");
///
/// assert_eq!(desc.kind, TypeKind::Class);
/// assert_eq!(desc.superclass.as_deref(), Some("app.Super"));
/// assert!(desc.find_member(&MethodKey::new("run", "()V")).is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawDescriptor")]
pub struct TypeDescriptor {
    /// Fully-qualified, dotted type name (nested types keep `$`).
    pub name: String,

    /// Class, interface or root.
    pub kind: TypeKind,

    /// Methods and constructors declared directly on this type, in declaration order.
    pub methods: Vec<MemberInfo>,

    /// Direct superclass. `None` for interfaces and the root type when built
    /// through the constructors or deserialized; the resolver only follows it
    /// for classes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superclass: Option<String>,

    /// Directly implemented (or, for interfaces, extended) interfaces, in declaration order.
    pub interfaces: Vec<String>,
}

/// Fixture shape; names may use `/` separators.
#[derive(Debug, Deserialize)]
struct RawDescriptor {
    name: String,
    #[serde(default)]
    kind: TypeKind,
    #[serde(default)]
    methods: Vec<MemberInfo>,
    #[serde(default)]
    superclass: Option<String>,
    #[serde(default)]
    interfaces: Vec<String>,
}

impl From<RawDescriptor> for TypeDescriptor {
    fn from(raw: RawDescriptor) -> Self {
        let superclass = match raw.kind {
            TypeKind::Class => raw.superclass.as_deref().map(normalize_type_name),
            TypeKind::Interface | TypeKind::Root => None,
        };
        TypeDescriptor {
            name: normalize_type_name(&raw.name),
            kind: raw.kind,
            methods: raw.methods,
            superclass,
            interfaces: raw
                .interfaces
                .iter()
                .map(|name| normalize_type_name(name))
                .collect(),
        }
    }
}

impl TypeDescriptor {
    /// Create an empty class descriptor.
    pub fn class(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Class)
    }

    /// Create an empty interface descriptor.
    pub fn interface(name: impl Into<String>) -> Self {
        Self::with_kind(name, TypeKind::Interface)
    }

    fn with_kind(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: normalize_type_name(&name.into()),
            kind,
            methods: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
        }
    }

    /// The root ancestor with its fixed method set.
    ///
    /// # Example
    ///
    /// ```
    /// use pubapi_meta::{MethodKey, TypeDescriptor, TypeKind, ROOT_TYPE};
    ///
    /// let root = TypeDescriptor::root();
    /// assert_eq!(root.name, ROOT_TYPE);
    /// assert_eq!(root.kind, TypeKind::Root);
    /// assert!(root.find_member(&MethodKey::new("hashCode", "()I")).is_some());
    /// ```
    pub fn root() -> Self {
        let mut root = Self::with_kind(ROOT_TYPE, TypeKind::Root);
        root.methods = vec![
            MemberInfo::new("<init>", "()V", Visibility::Public),
            MemberInfo::new("getClass", "()Ljava/lang/Class;", Visibility::Public),
            MemberInfo::new("hashCode", "()I", Visibility::Public),
            MemberInfo::new("equals", "(Ljava/lang/Object;)Z", Visibility::Public),
            MemberInfo::new("clone", "()Ljava/lang/Object;", Visibility::Protected),
            MemberInfo::new("toString", "()Ljava/lang/String;", Visibility::Public),
            MemberInfo::new("notify", "()V", Visibility::Public),
            MemberInfo::new("notifyAll", "()V", Visibility::Public),
            MemberInfo::new("wait", "()V", Visibility::Public),
            MemberInfo::new("wait", "(J)V", Visibility::Public),
            MemberInfo::new("wait", "(JI)V", Visibility::Public),
            MemberInfo::new("finalize", "()V", Visibility::Protected),
        ];
        root
    }

    /// Set the direct superclass. Ignored for interfaces.
    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        if self.kind == TypeKind::Class {
            self.superclass = Some(normalize_type_name(&superclass.into()));
        }
        self
    }

    /// Add a directly implemented or extended interface.
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(normalize_type_name(&interface.into()));
        self
    }

    /// Declare a public method.
    pub fn method(self, name: impl Into<String>, descriptor: &str) -> Self {
        self.member(name, descriptor, Visibility::Public)
    }

    /// Declare a private method.
    pub fn private_method(self, name: impl Into<String>, descriptor: &str) -> Self {
        self.member(name, descriptor, Visibility::Private)
    }

    /// Declare a method with explicit visibility.
    pub fn member(mut self, name: impl Into<String>, descriptor: &str, visibility: Visibility) -> Self {
        self.methods.push(MemberInfo::new(name, descriptor, visibility));
        self
    }

    /// Look up a member declared directly on this type.
    pub fn find_member(&self, key: &MethodKey) -> Option<&MemberInfo> {
        self.methods.iter().find(|m| &m.key == key)
    }

    /// Check if this is an interface.
    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    /// Check if this is the root ancestor.
    pub fn is_root(&self) -> bool {
        self.kind == TypeKind::Root || self.name == ROOT_TYPE
    }

    /// Package part of the name (empty for the default package).
    ///
    /// # Example
    ///
    /// ```
    /// use pubapi_meta::TypeDescriptor;
    ///
    /// assert_eq!(TypeDescriptor::class("a.b.C$D").package(), "a.b");
    /// assert_eq!(TypeDescriptor::class("Plain").package(), "");
    /// ```
    pub fn package(&self) -> &str {
        package_of(&self.name)
    }
}

/// Package part of a dotted type name.
pub fn package_of(type_name: &str) -> &str {
    type_name.rfind('.').map(|i| &type_name[..i]).unwrap_or("")
}
