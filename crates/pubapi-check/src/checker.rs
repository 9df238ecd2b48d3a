//! # API checker
//!
//! Combines a metadata provider with the currently installed allow-list.
//!
//! The installed [`PermissionIndex`] sits behind a single shared pointer.
//! Loading builds a complete new index off to the side and then replaces
//! that pointer, so a query sees either the old index or the new one, never
//! a partial one. Query results are memoized per installed index.

use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use pubapi_meta::{MethodKey, TypeMetadataProvider};
use pubapi_rules::{load_config, PermissionIndex, RuleMatch};

use crate::error::CheckResult;
use crate::resolver::{Declaration, HierarchyResolver};

/// Outcome of a single permission query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The declaring member is private and exempt from the allow-list.
    Private {
        /// Declaring type.
        declaring_type: String,
    },

    /// An allow-list rule covers the declaring type.
    Granted {
        /// Declaring type.
        declaring_type: String,
        /// Rule that matched.
        rule: RuleMatch,
    },

    /// No rule covers the declaring type.
    Denied {
        /// Declaring type.
        declaring_type: String,
    },
}

impl Verdict {
    /// Check whether the query is permitted.
    pub fn is_permitted(&self) -> bool {
        !matches!(self, Verdict::Denied { .. })
    }

    /// Type the member was resolved to.
    pub fn declaring_type(&self) -> &str {
        match self {
            Verdict::Private { declaring_type }
            | Verdict::Granted { declaring_type, .. }
            | Verdict::Denied { declaring_type } => declaring_type,
        }
    }

    fn judge(declaration: &Declaration, index: &PermissionIndex) -> Self {
        let declaring_type = declaration.type_name().to_string();
        if declaration.member.visibility.is_private() {
            return Verdict::Private { declaring_type };
        }
        match index.lookup(&declaring_type, &declaration.member.key) {
            Some(rule) => Verdict::Granted {
                declaring_type,
                rule,
            },
            None => Verdict::Denied { declaring_type },
        }
    }
}

type QueryKey = (String, String, String);

/// Answers memoized per installed allow-list are capped at this many queries.
const MAX_CACHED_ANSWERS: usize = 64 * 1024;

/// One installed allow-list together with the answers computed against it.
struct Snapshot {
    index: Arc<PermissionIndex>,
    /// Filled until [`MAX_CACHED_ANSWERS`]; later queries are answered uncached.
    answers: Mutex<HashMap<QueryKey, bool>>,
}

impl Snapshot {
    fn new(index: PermissionIndex) -> Arc<Self> {
        Arc::new(Self {
            index: Arc::new(index),
            answers: Mutex::new(HashMap::new()),
        })
    }
}

/// Answers "is this API call allowed?" for a scan.
///
/// # Example
///
/// ```
/// use pubapi_check::ApiChecker;
/// use pubapi_meta::{InMemoryProvider, TypeDescriptor};
/// use pubapi_rules::PermissionIndex;
///
/// let provider = InMemoryProvider::new().with(
///     TypeDescriptor::class("pkg.TestClass")
///         .extends("java.lang.Object")
///         .method("testMethod", "()V")
///         .method("testMethod2", "()V"),
/// );
///
/// let checker = ApiChecker::new(provider);
/// checker.install(PermissionIndex::from_config_str("pkg.TestClass testMethod ()V"));
///
/// assert!(checker.is_permitted("pkg.TestClass", "testMethod", "()V").unwrap());
/// assert!(!checker.is_permitted("pkg.TestClass", "testMethod2", "()V").unwrap());
/// ```
pub struct ApiChecker {
    provider: Arc<dyn TypeMetadataProvider>,
    current: RwLock<Arc<Snapshot>>,
    loading: Mutex<()>,
}

impl ApiChecker {
    /// Create a checker with an empty allow-list.
    pub fn new(provider: impl TypeMetadataProvider + 'static) -> Self {
        Self::with_shared_provider(Arc::new(provider))
    }

    /// Create a checker over a provider shared with other components.
    pub fn with_shared_provider(provider: Arc<dyn TypeMetadataProvider>) -> Self {
        Self {
            provider,
            current: RwLock::new(Snapshot::new(PermissionIndex::new())),
            loading: Mutex::new(()),
        }
    }

    /// Builder form of [`install`](Self::install).
    pub fn with_index(self, index: PermissionIndex) -> Self {
        self.install(index);
        self
    }

    /// Load an allow-list directory and install it, replacing the current one.
    ///
    /// On failure the previously installed allow-list stays in effect.
    /// Concurrent loads are serialized.
    ///
    /// # Errors
    ///
    /// [`CheckError::Config`](crate::CheckError::Config) when the directory
    /// is missing, is not a directory, or cannot be read.
    pub fn load_config(&self, dir: impl AsRef<Path>) -> CheckResult<()> {
        let _guard = self.loading.lock();
        let index = load_config(dir.as_ref())?;
        info!(path = %dir.as_ref().display(), entries = index.len(), "Installing allow-list");
        self.install(index);
        Ok(())
    }

    /// Install an already built index, replacing the current one.
    pub fn install(&self, index: PermissionIndex) {
        let snapshot = Snapshot::new(index);
        *self.current.write() = snapshot;
    }

    /// Currently installed allow-list.
    pub fn index(&self) -> Arc<PermissionIndex> {
        Arc::clone(&self.snapshot().index)
    }

    fn snapshot(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read())
    }

    /// Check whether calling `method` with `descriptor` on `type_name` is permitted.
    ///
    /// # Arguments
    ///
    /// * `type_name` - Type named at the call site (`a.b.C`, `a/b/C` or `a.b.Outer$Inner`)
    /// * `method` - Method name (`<init>` for constructors)
    /// * `descriptor` - JVM descriptor of the member
    ///
    /// # Errors
    ///
    /// [`CheckError::UnresolvableType`](crate::CheckError::UnresolvableType)
    /// when the declaring type cannot be determined. Treat it as "cannot
    /// judge", not as "denied".
    pub fn is_permitted(&self, type_name: &str, method: &str, descriptor: &str) -> CheckResult<bool> {
        let snapshot = self.snapshot();
        let query = (
            type_name.to_string(),
            method.to_string(),
            descriptor.to_string(),
        );
        if let Some(answer) = snapshot.answers.lock().get(&query) {
            return Ok(*answer);
        }

        let answer = self.judge(&snapshot.index, type_name, method, descriptor)?.is_permitted();
        let mut answers = snapshot.answers.lock();
        if answers.len() < MAX_CACHED_ANSWERS {
            answers.insert(query, answer);
        }
        Ok(answer)
    }

    /// Like [`is_permitted`](Self::is_permitted) but reports why.
    pub fn explain(&self, type_name: &str, method: &str, descriptor: &str) -> CheckResult<Verdict> {
        let snapshot = self.snapshot();
        self.judge(&snapshot.index, type_name, method, descriptor)
    }

    fn judge(
        &self,
        index: &PermissionIndex,
        type_name: &str,
        method: &str,
        descriptor: &str,
    ) -> CheckResult<Verdict> {
        let key = MethodKey::new(method, descriptor);
        let declaration = HierarchyResolver::new(self.provider.as_ref()).resolve(type_name, &key)?;
        let verdict = Verdict::judge(&declaration, index);
        debug!(
            type_name,
            member = %key,
            declaring_type = verdict.declaring_type(),
            permitted = verdict.is_permitted(),
            "Judged API usage"
        );
        Ok(verdict)
    }
}
