//! # Members
//!
//! Method identity and visibility for declared members of a type.
//! A member is identified by its name plus the parameter part of its JVM
//! descriptor.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a method or constructor within a type.
///
/// The key holds the method name and the *parameter* part of the
/// descriptor (`"(I[Ljava.lang.String;)"`). Class-name separators are
/// normalized to `.`, and the return type is dropped: two members differing
/// only in their parameter lists are distinct keys.
///
/// # Example
///
/// ```
/// use pubapi_meta::MethodKey;
///
/// let a = MethodKey::new("toString", "()Ljava/lang/String;");
/// let b = MethodKey::new("toString", "()V");
/// assert_eq!(a, b);
///
/// let c = MethodKey::new("toString", "(I)V");
/// assert_ne!(a, c);
/// assert_eq!(a.to_string(), "toString()");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MethodKey {
    name: String,
    params: String,
}

impl MethodKey {
    /// Create a key from a method name and a JVM descriptor.
    ///
    /// # Arguments
    ///
    /// * `name` - Method name (`<init>` for constructors)
    /// * `descriptor` - Full descriptor (`"(I)V"`) or bare parameter part (`"(I)"`)
    pub fn new(name: impl Into<String>, descriptor: &str) -> Self {
        Self {
            name: name.into(),
            params: parameter_part(descriptor),
        }
    }

    /// Method name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized parameter descriptor, including the parentheses.
    pub fn params(&self) -> &str {
        &self.params
    }

    /// Constructors and static initializers are never inherited.
    pub fn is_constructor(&self) -> bool {
        self.name == "<init>" || self.name == "<clinit>"
    }
}

impl fmt::Display for MethodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.params)
    }
}

impl From<String> for MethodKey {
    fn from(value: String) -> Self {
        match value.find('(') {
            Some(idx) => MethodKey::new(&value[..idx], &value[idx..]),
            None => MethodKey::new(value, ""),
        }
    }
}

impl From<MethodKey> for String {
    fn from(key: MethodKey) -> Self {
        key.to_string()
    }
}

/// Cut a descriptor down to its normalized parameter part.
fn parameter_part(descriptor: &str) -> String {
    let descriptor = descriptor.trim();
    let end = descriptor.find(')').map(|i| i + 1).unwrap_or(descriptor.len());
    descriptor[..end].replace('/', ".")
}

/// Member visibility as recorded in compiled metadata.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Reachable from anywhere.
    #[default]
    Public,
    /// Reachable from subclasses and the same package.
    Protected,
    /// Reachable from the same package only.
    Package,
    /// Reachable from the declaring type only.
    Private,
}

impl Visibility {
    const ACC_PUBLIC: u16 = 0x0001;
    const ACC_PRIVATE: u16 = 0x0002;
    const ACC_PROTECTED: u16 = 0x0004;

    /// Derive visibility from JVM access flags.
    ///
    /// # Example
    ///
    /// ```
    /// use pubapi_meta::Visibility;
    ///
    /// assert_eq!(Visibility::from_access_flags(0x0001), Visibility::Public);
    /// assert_eq!(Visibility::from_access_flags(0x000A), Visibility::Private);
    /// assert_eq!(Visibility::from_access_flags(0x0000), Visibility::Package);
    /// ```
    pub fn from_access_flags(flags: u16) -> Self {
        if flags & Self::ACC_PUBLIC != 0 {
            Visibility::Public
        } else if flags & Self::ACC_PRIVATE != 0 {
            Visibility::Private
        } else if flags & Self::ACC_PROTECTED != 0 {
            Visibility::Protected
        } else {
            Visibility::Package
        }
    }

    /// Private members cannot be referenced by outside callers.
    pub fn is_private(&self) -> bool {
        matches!(self, Visibility::Private)
    }

    /// Get the string representation of the visibility.
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Protected => "protected",
            Visibility::Package => "package",
            Visibility::Private => "private",
        }
    }
}

/// A member declared directly on a type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawMember", into = "RawMember")]
pub struct MemberInfo {
    /// Member identity.
    pub key: MethodKey,
    /// Declared visibility.
    pub visibility: Visibility,
}

impl MemberInfo {
    /// Create a member with the given visibility.
    pub fn new(name: impl Into<String>, descriptor: &str, visibility: Visibility) -> Self {
        Self {
            key: MethodKey::new(name, descriptor),
            visibility,
        }
    }
}

/// Fixture shape: `{"name": "foo", "descriptor": "()V", "visibility": "private"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawMember {
    name: String,
    descriptor: String,
    #[serde(default)]
    visibility: Visibility,
}

impl From<RawMember> for MemberInfo {
    fn from(raw: RawMember) -> Self {
        MemberInfo::new(raw.name, &raw.descriptor, raw.visibility)
    }
}

impl From<MemberInfo> for RawMember {
    fn from(member: MemberInfo) -> Self {
        RawMember {
            name: member.key.name,
            descriptor: member.key.params,
            visibility: member.visibility,
        }
    }
}
