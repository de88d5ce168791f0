//! Provide a [`Context`] shared by every resolver of one execution.
//!
//! The context holds a DashMap of named JSON entries, so resolvers running concurrently can
//! read and update request-scoped data (the authenticated user, loaders, counters...) without
//! additional locking.

use std::sync::Arc;

use dashmap::DashMap;
use serde::Deserialize;
use serde::Serialize;

use crate::json_ext::Value;

/// Holds [`Context`] entries.
pub(crate) type Entries = Arc<DashMap<String, Value>>;

/// The context value handed to every resolver of an execution.
///
/// Cloning is cheap and clones share their entries.
#[derive(Clone, Debug, Default)]
pub struct Context {
    entries: Entries,
}

impl Context {
    pub fn new() -> Self {
        Context {
            entries: Default::default(),
        }
    }

    pub fn get<K, V>(&self, key: K) -> Result<Option<V>, serde_json::Error>
    where
        K: Into<String>,
        V: for<'de> Deserialize<'de>,
    {
        self.entries
            .get(&key.into())
            .map(|v| serde_json_bytes::from_value(v.value().clone()))
            .transpose()
    }

    pub fn insert<K, V>(&self, key: K, value: V) -> Result<Option<V>, serde_json::Error>
    where
        K: Into<String>,
        V: for<'de> Deserialize<'de> + Serialize,
    {
        let value = serde_json_bytes::to_value(value)?;
        self.entries
            .insert(key.into(), value)
            .map(serde_json_bytes::from_value)
            .transpose()
    }

    pub fn upsert<K, V>(
        &self,
        key: K,
        upsert: impl Fn(V) -> V,
        default: impl Fn() -> V,
    ) -> Result<(), serde_json::Error>
    where
        K: Into<String>,
        V: for<'de> Deserialize<'de> + Serialize,
    {
        let key = key.into();
        self.entries
            .entry(key.clone())
            .or_try_insert_with(|| serde_json_bytes::to_value((default)()))?;
        let mut result = Ok(());
        self.entries
            .alter(&key, |_, v| match serde_json_bytes::from_value(v.clone()) {
                Ok(value) => match serde_json_bytes::to_value((upsert)(value)) {
                    Ok(value) => value,
                    Err(e) => {
                        result = Err(e);
                        v
                    }
                },
                Err(e) => {
                    result = Err(e);
                    v
                }
            });
        result
    }

    pub fn contains_key<K>(&self, key: K) -> bool
    where
        K: Into<String>,
    {
        self.entries.contains_key(&key.into())
    }
}
