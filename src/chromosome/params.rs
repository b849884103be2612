//! Opaque configuration handed to [`Chromosome::initialize`](super::Chromosome::initialize).

use std::any::{self, Any};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Lookup failure in [`InitParams`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParamError {
    #[error("missing parameter `{0}`")]
    Missing(String),

    #[error("parameter `{key}` is not of type `{expected}`")]
    WrongType { key: String, expected: &'static str },
}

/// String-keyed map of arbitrary values, shared by every chromosome of a run.
///
/// Values are stored behind [`Arc`], so cloning the map is cheap and the
/// same instance is read concurrently by all initialization tasks.
///
/// ```
/// use u_evolve::chromosome::{InitParams, ParamError};
///
/// let params = InitParams::new()
///     .with("genes", 16usize)
///     .with("bounds", (-5.0f64, 5.0f64));
///
/// assert_eq!(*params.get::<usize>("genes").unwrap(), 16);
/// assert_eq!(params.get_or("scale", 1.0f64).unwrap(), 1.0);
/// assert!(matches!(params.get::<u32>("genes"), Err(ParamError::WrongType { .. })));
/// ```
#[derive(Clone, Default)]
pub struct InitParams {
    values: HashMap<String, Arc<dyn Any + Send + Sync>>,
}

impl InitParams {
    /// Creates an empty parameter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` under `key`, replacing any previous value.
    pub fn insert<T: Any + Send + Sync>(&mut self, key: impl Into<String>, value: T) {
        self.values.insert(key.into(), Arc::new(value));
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with<T: Any + Send + Sync>(mut self, key: impl Into<String>, value: T) -> Self {
        self.insert(key, value);
        self
    }

    /// Returns the value stored under `key` as a `T`.
    pub fn get<T: Any>(&self, key: &str) -> Result<&T, ParamError> {
        let entry = self
            .values
            .get(key)
            .ok_or_else(|| ParamError::Missing(key.to_string()))?;
        let value: &(dyn Any + Send + Sync) = entry.as_ref();
        value.downcast_ref::<T>().ok_or_else(|| ParamError::WrongType {
            key: key.to_string(),
            expected: any::type_name::<T>(),
        })
    }

    /// Returns a copy of the value under `key`, or `default` if the key is
    /// absent. A present value of the wrong type is still an error.
    pub fn get_or<T: Any + Clone>(&self, key: &str, default: T) -> Result<T, ParamError> {
        match self.get::<T>(key) {
            Ok(value) => Ok(value.clone()),
            Err(ParamError::Missing(_)) => Ok(default),
            Err(err) => Err(err),
        }
    }

    /// Returns `true` if a value is stored under `key`.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl fmt::Debug for InitParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.values.keys().collect();
        keys.sort();
        f.debug_struct("InitParams").field("keys", &keys).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_typed_value() {
        let params = InitParams::new().with("n", 3usize).with("name", "knapsack".to_string());
        assert_eq!(*params.get::<usize>("n").unwrap(), 3);
        assert_eq!(params.get::<String>("name").unwrap(), "knapsack");
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_missing_key() {
        let params = InitParams::new();
        assert_eq!(
            params.get::<usize>("n"),
            Err(ParamError::Missing("n".to_string()))
        );
        assert!(params.is_empty());
    }

    #[test]
    fn test_wrong_type() {
        let params = InitParams::new().with("n", 3i64);
        match params.get::<usize>("n") {
            Err(ParamError::WrongType { key, expected }) => {
                assert_eq!(key, "n");
                assert_eq!(expected, "usize");
            }
            other => panic!("expected WrongType, got {other:?}"),
        }
    }

    #[test]
    fn test_get_or() {
        let params = InitParams::new().with("rate", 0.5f64);
        assert_eq!(params.get_or("rate", 1.0f64).unwrap(), 0.5);
        assert_eq!(params.get_or("other", 1.0f64).unwrap(), 1.0);
        assert!(params.get_or("rate", 1usize).is_err());
    }

    #[test]
    fn test_insert_replaces() {
        let mut params = InitParams::new();
        params.insert("n", 1usize);
        params.insert("n", 2usize);
        assert_eq!(*params.get::<usize>("n").unwrap(), 2);
        assert!(params.contains_key("n"));
    }

    #[test]
    fn test_clone_shares_values() {
        let params = InitParams::new().with("v", vec![1, 2, 3]);
        let copy = params.clone();
        assert_eq!(copy.get::<Vec<i32>>("v").unwrap(), &vec![1, 2, 3]);
    }

    #[test]
    fn test_error_converts_to_anyhow() {
        fn read(params: &InitParams) -> anyhow::Result<usize> {
            Ok(*params.get::<usize>("n")?)
        }
        let err = read(&InitParams::new()).unwrap_err();
        assert_eq!(err.to_string(), "missing parameter `n`");
    }
}
