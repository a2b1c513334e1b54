//! Configuration module for Bard.
//!
//! Handles grammar delimiters, request defaults and the schema location.

mod settings;

pub use settings::{
    expand_env_vars, GrammarSettings, RequestDefaults, SchemaSettings, Settings, SettingsError,
};
