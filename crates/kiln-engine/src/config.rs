//! Compiler configuration (kiln.toml)
//!
//! ```toml
//! [compiler]
//! minimize-names = true
//! allow-unsupported-constructs = false
//! main-assembly = "App"
//! ```

use crate::typesys::{AssemblyId, TypeSystem};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Validation error
    #[error("Invalid config: {0}")]
    ValidationError(String),

    /// The configured main assembly is not part of the declaration set
    #[error("Unknown main assembly: {0}")]
    UnknownAssembly(String),
}

/// Contents of a kiln.toml file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct KilnConfig {
    #[serde(default)]
    pub compiler: CompilerOptions,
}

impl KilnConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: KilnConfig = toml::from_str(content)?;
        config.compiler.validate()?;
        Ok(config)
    }
}

/// Options of one compilation
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct CompilerOptions {
    /// Replace non-public names by short generated ones
    #[serde(default)]
    pub minimize_names: bool,

    /// Skip the unsupported-construct pre-scan
    #[serde(default)]
    pub allow_unsupported_constructs: bool,

    /// Assembly whose declarations are compiled (default: the first one)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_assembly: Option<String>,
}

impl CompilerOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(name) = &self.main_assembly {
            if name.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "main-assembly cannot be empty".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// The main assembly within `ts`
    pub fn resolve_main_assembly(&self, ts: &TypeSystem) -> Result<AssemblyId, ConfigError> {
        match &self.main_assembly {
            Some(name) => ts
                .find_assembly(name)
                .ok_or_else(|| ConfigError::UnknownAssembly(name.clone())),
            None if ts.assemblies.is_empty() => Err(ConfigError::ValidationError(
                "the declaration set has no assemblies".to_string(),
            )),
            None => Ok(AssemblyId(0)),
        }
    }
}
