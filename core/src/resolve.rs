//! Custom validator resolution and whitelists.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::error::ResolveError;
use crate::validators::Validator;

/// Turns a custom-validator identifier into a validator instance.
///
/// Implementations must be safe to call concurrently and must return an
/// equivalent instance for repeated calls with the same identifier.
pub trait Resolver {
    /// Obtains the validator registered under `id`.
    ///
    /// # Errors
    ///
    /// [`ResolveError::Unknown`] if nothing is registered under `id`.
    fn resolve(&self, id: &str) -> Result<Arc<dyn Validator>, ResolveError>;
}

/// An explicit map from validator identifier to instance.
///
/// # Examples
///
/// ```
/// use paramspec_core::{CommonPasswords, Resolver, ValidatorRegistry};
///
/// let registry = ValidatorRegistry::new().with("good_password", CommonPasswords);
/// assert!(registry.resolve("good_password").is_ok());
/// assert!(registry.resolve("missing").is_err());
/// ```
#[derive(Default, Clone)]
pub struct ValidatorRegistry {
    validators: HashMap<String, Arc<dyn Validator>>,
}

impl ValidatorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `validator` under `id`, replacing any previous entry.
    pub fn register(&mut self, id: impl Into<String>, validator: impl Validator + 'static) {
        self.validators.insert(id.into(), Arc::new(validator));
    }

    /// Builder-style [`register`](ValidatorRegistry::register).
    pub fn with(mut self, id: impl Into<String>, validator: impl Validator + 'static) -> Self {
        self.register(id, validator);
        self
    }

    /// Returns `true` if `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.validators.contains_key(id)
    }

    /// Registered identifiers, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Number of registered validators.
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    /// Returns `true` if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

impl Resolver for ValidatorRegistry {
    fn resolve(&self, id: &str) -> Result<Arc<dyn Validator>, ResolveError> {
        self.validators
            .get(id)
            .cloned()
            .ok_or_else(|| ResolveError::Unknown(id.to_string()))
    }
}

type Factory = dyn Fn(&str) -> Result<Arc<dyn Validator>, ResolveError> + Send + Sync;

/// Builds validators on first use through a factory and caches them per id.
///
/// Two threads resolving the same id for the first time may both run the
/// factory; the first insert wins.
pub struct CachingResolver {
    factory: Box<Factory>,
    cache: RwLock<HashMap<String, Arc<dyn Validator>>>,
}

impl CachingResolver {
    /// Wraps `factory`, which must be idempotent per id.
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&str) -> Result<Arc<dyn Validator>, ResolveError> + Send + Sync + 'static,
    {
        Self {
            factory: Box::new(factory),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cached instances.
    pub fn cached(&self) -> usize {
        self.cache.read().map(|cache| cache.len()).unwrap_or(0)
    }
}

impl fmt::Debug for CachingResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CachingResolver")
            .field("cached", &self.cached())
            .finish_non_exhaustive()
    }
}

impl Resolver for CachingResolver {
    fn resolve(&self, id: &str) -> Result<Arc<dyn Validator>, ResolveError> {
        if let Ok(cache) = self.cache.read() {
            if let Some(hit) = cache.get(id) {
                return Ok(Arc::clone(hit));
            }
        }

        let built = (self.factory)(id)?;
        debug!(id, "built custom validator");
        match self.cache.write() {
            Ok(mut cache) => Ok(Arc::clone(
                cache.entry(id.to_string()).or_insert(built),
            )),
            // A poisoned cache only loses memoization.
            Err(_) => Ok(built),
        }
    }
}

/// Parameter names always permitted under strict schemas.
pub trait Whitelist {
    /// Returns the permitted names.
    fn names(&self) -> BTreeSet<&str>;
}

/// A fixed set of whitelisted names.
///
/// # Examples
///
/// ```
/// use paramspec_core::{ParamsWhitelist, Whitelist};
///
/// let whitelist = ParamsWhitelist::new(["cachebuster", "_"]);
/// assert!(whitelist.names().contains("cachebuster"));
/// assert!(ParamsWhitelist::empty().names().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamsWhitelist {
    names: BTreeSet<String>,
}

impl ParamsWhitelist {
    /// Creates a whitelist from names.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// A whitelist permitting nothing extra.
    pub fn empty() -> Self {
        Self::default()
    }
}

impl Whitelist for ParamsWhitelist {
    fn names(&self) -> BTreeSet<&str> {
        self.names.iter().map(String::as_str).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CommonPasswords, Problems, StringLength};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_registry_unknown_id() {
        let registry = ValidatorRegistry::new();
        assert_eq!(
            registry.resolve("nope").err(),
            Some(ResolveError::Unknown("nope".into()))
        );
    }

    #[test]
    fn test_registry_lists_ids_sorted() {
        let registry = ValidatorRegistry::new()
            .with("b", CommonPasswords)
            .with("a", StringLength::new(Some(1), None).unwrap());
        assert_eq!(registry.ids(), ["a", "b"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_caching_resolver_builds_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let resolver = CachingResolver::new(move |id| {
            counter.fetch_add(1, Ordering::SeqCst);
            match id {
                "good_password" => Ok(Arc::new(CommonPasswords) as Arc<dyn Validator>),
                other => Err(ResolveError::Unknown(other.to_string())),
            }
        });

        for _ in 0..3 {
            let validator = resolver.resolve("good_password").unwrap();
            let mut problems = Problems::new();
            validator.validate(&mut problems, "password", Some("dragon"));
            assert_eq!(problems.len(), 1);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(resolver.cached(), 1);

        assert!(resolver.resolve("other").is_err());
        assert_eq!(resolver.cached(), 1);
    }
}
