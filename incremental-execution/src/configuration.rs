//! Logic for loading execution configuration in to an object model
use displaydoc::Display;
use schemars::JsonSchema;
use schemars::schema::RootSchema;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use typed_builder::TypedBuilder;

/// Error loading a [`Configuration`].
#[derive(Debug, Error, Display)]
pub enum ConfigurationError {
    /// Could not deserialize configuration: {0}
    Deserialize(#[from] serde_yaml::Error),
}

/// How the executor behaves where GraphQL leaves room for a choice.
#[derive(
    Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize, JsonSchema, TypedBuilder,
)]
#[serde(deny_unknown_fields, default)]
pub struct Configuration {
    /// How the top-level fields of a mutation are executed.
    /// Defaults to `serial`.
    #[builder(default)]
    pub mutations: MutationExecution,

    /// What happens when a selected field is not defined on its parent type.
    /// Defaults to `ignore`.
    #[builder(default)]
    pub undefined_fields: UndefinedFields,
}

/// Execution strategy of a mutation's top-level fields.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MutationExecution {
    /// A top-level field is resolved only once the previous one has completed.
    #[default]
    Serial,

    /// Top-level fields are resolved concurrently, like query fields.
    Parallel,
}

/// Treatment of selections naming a field that does not exist.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedFields {
    /// The response key produces no events at all.
    #[default]
    Ignore,

    /// The response key produces `init`, an `UNDEFINED_FIELD` error and `complete`.
    Error,
}

impl Configuration {
    /// Parses a YAML document. Missing keys take their default value.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigurationError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// The JSON schema of the configuration, for editor support.
    pub fn json_schema() -> RootSchema {
        schemars::schema_for!(Configuration)
    }
}
