//! # Allow-list entries
//!
//! One allow-list line parses into zero or one [`PermissionEntry`].
//!
//! ## Grammar
//!
//! ```text
//! # comment                                  ignored
//! a.b.Type  method  (Ljava/lang/String;)V    method-level (tab or space separated)
//! a.b.Type.method(java.lang.String, int[])   method-level, Java source form
//! a.b.Type                                   class-level (last segment capitalized or nested)
//! a.b.Outer$Inner                            class-level
//! a.b                                        package-level (covers sub-packages)
//! a.b.*                                      package-level
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use pubapi_meta::{normalize_type_name, MethodKey};

use crate::error::EntryError;

/// One parsed allow-list record.
///
/// # Example
///
/// ```
/// use pubapi_rules::PermissionEntry;
/// use pubapi_meta::MethodKey;
///
/// let entry = PermissionEntry::parse("pkg.TestClass testMethod ()V").unwrap().unwrap();
/// assert_eq!(
///     entry,
///     PermissionEntry::Method {
///         type_name: "pkg.TestClass".to_string(),
///         method: MethodKey::new("testMethod", "()V"),
///     }
/// );
///
/// assert!(PermissionEntry::parse("   ").unwrap().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PermissionEntry {
    /// A single member of one type.
    Method {
        /// Owning type.
        type_name: String,
        /// Permitted member.
        method: MethodKey,
    },

    /// Every member declared on one type.
    Class {
        /// Permitted type.
        type_name: String,
    },

    /// Every type in a package and its sub-packages.
    Package {
        /// Package path without trailing separator.
        prefix: String,
    },
}

impl PermissionEntry {
    /// Create a method-level entry.
    pub fn method(type_name: &str, method: &str, descriptor: &str) -> Self {
        PermissionEntry::Method {
            type_name: normalize_type_name(type_name),
            method: MethodKey::new(method, descriptor),
        }
    }

    /// Create a class-level entry.
    pub fn class(type_name: &str) -> Self {
        PermissionEntry::Class {
            type_name: normalize_type_name(type_name),
        }
    }

    /// Create a package-level entry.
    pub fn package(prefix: &str) -> Self {
        PermissionEntry::Package {
            prefix: normalize_type_name(prefix),
        }
    }

    /// Parse one line.
    ///
    /// # Returns
    ///
    /// `Ok(None)` for blank and comment lines, `Ok(Some(entry))` for a
    /// recognized entry, and `Err` for a line matching no form.
    pub fn parse(line: &str) -> Result<Option<Self>, EntryError> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }

        if let Some(open) = line.find('(') {
            if !line[..open].contains(char::is_whitespace) {
                return parse_source_form(line, open).map(Some);
            }
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [type_name, method, descriptor] => {
                if !descriptor.starts_with('(') {
                    return Err(EntryError::new(line, "descriptor must start with '('"));
                }
                Ok(Some(Self::method(type_name, method, descriptor)))
            }
            [single] => parse_single(line, single).map(Some),
            _ => Err(EntryError::new(
                line,
                "expected 'type method descriptor', a type, or a package",
            )),
        }
    }

    /// Kind label used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PermissionEntry::Method { .. } => "method",
            PermissionEntry::Class { .. } => "class",
            PermissionEntry::Package { .. } => "package",
        }
    }
}

impl fmt::Display for PermissionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermissionEntry::Method { type_name, method } => {
                write!(f, "{}\t{}\t{}", type_name, method.name(), method.params())
            }
            PermissionEntry::Class { type_name } => write!(f, "{}", type_name),
            PermissionEntry::Package { prefix } => write!(f, "{}.*", prefix),
        }
    }
}

fn parse_single(line: &str, token: &str) -> Result<PermissionEntry, EntryError> {
    if let Some(prefix) = token.strip_suffix(".*") {
        if prefix.is_empty() {
            return Err(EntryError::new(line, "empty package wildcard"));
        }
        return Ok(PermissionEntry::package(prefix));
    }

    let name = normalize_type_name(token);
    if name.starts_with('.') || name.ends_with('.') || name.contains("..") {
        return Err(EntryError::new(line, "empty name segment"));
    }

    let last = name.rsplit('.').next().unwrap_or_default();
    let looks_like_type =
        last.contains('$') || last.chars().next().is_some_and(|c| c.is_uppercase());
    if looks_like_type {
        Ok(PermissionEntry::Class { type_name: name })
    } else {
        Ok(PermissionEntry::Package { prefix: name })
    }
}

/// `a.b.Type.method(java.lang.String, int[])`
fn parse_source_form(line: &str, open: usize) -> Result<PermissionEntry, EntryError> {
    let close = line
        .rfind(')')
        .filter(|close| *close > open)
        .ok_or_else(|| EntryError::new(line, "unbalanced parentheses"))?;
    if !line[close + 1..].trim().is_empty() {
        return Err(EntryError::new(line, "unexpected text after parameter list"));
    }

    let head = normalize_type_name(&line[..open]);
    let (type_name, method) = head
        .rsplit_once('.')
        .filter(|(owner, method)| !owner.is_empty() && !method.is_empty())
        .ok_or_else(|| EntryError::new(line, "expected 'type.method(...)'"))?;

    // `a.b.Type.Type(int)` names a constructor.
    let simple_name = type_name.rsplit(|c: char| c == '.' || c == '$').next().unwrap_or_default();
    let method = if method == simple_name { "<init>" } else { method };

    let descriptor = source_params_to_descriptor(&line[open + 1..close])
        .ok_or_else(|| EntryError::new(line, "invalid parameter type"))?;

    Ok(PermissionEntry::Method {
        type_name: type_name.to_string(),
        method: MethodKey::new(method, &descriptor),
    })
}

/// Convert a Java source parameter list into a descriptor parameter part.
///
/// # Example
///
/// ```
/// use pubapi_rules::entry::source_params_to_descriptor;
///
/// assert_eq!(
///     source_params_to_descriptor("java.lang.String, int[], long...").as_deref(),
///     Some("(Ljava.lang.String;[I[J)")
/// );
/// ```
pub fn source_params_to_descriptor(params: &str) -> Option<String> {
    let params = strip_generics(params);
    let mut descriptor = String::from("(");
    for param in params.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        descriptor.push_str(&source_type_to_descriptor(param)?);
    }
    descriptor.push(')');
    Some(descriptor)
}

fn source_type_to_descriptor(param: &str) -> Option<String> {
    let mut base = param.trim();
    let mut dims = 0;
    loop {
        if let Some(rest) = base.strip_suffix("[]") {
            base = rest.trim_end();
        } else if let Some(rest) = base.strip_suffix("...") {
            base = rest.trim_end();
        } else {
            break;
        }
        dims += 1;
    }
    if base.is_empty() || base.contains(char::is_whitespace) {
        return None;
    }

    let element = match base {
        "int" => "I".to_string(),
        "long" => "J".to_string(),
        "byte" => "B".to_string(),
        "short" => "S".to_string(),
        "char" => "C".to_string(),
        "float" => "F".to_string(),
        "double" => "D".to_string(),
        "boolean" => "Z".to_string(),
        "void" => return None,
        name => format!("L{};", normalize_type_name(name)),
    };
    Some(format!("{}{}", "[".repeat(dims), element))
}

fn strip_generics(text: &str) -> String {
    let mut depth = 0usize;
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => depth += 1,
            '>' => depth = depth.saturating_sub(1),
            c if depth == 0 => out.push(c),
            _ => {}
        }
    }
    out
}
