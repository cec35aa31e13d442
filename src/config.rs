//! Generator configuration
//!
//! Loaded from a TOML file such as:
//!
//! ```toml
//! indent = "    "
//! pointers = true
//! using_namespace_std = true
//!
//! [types.algorithmic]
//! long = "Entier long"
//!
//! [types.cpp]
//! long = "long"
//! ```
//!
//! Every key is optional. Type tables overlay the defaults.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::codegen::TypeTable;
use crate::errors::{CompileError, CompileResult};

/// Type tables of both backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeTables {
    pub algorithmic: TypeTable,
    pub cpp: TypeTable,
}

impl Default for TypeTables {
    fn default() -> Self {
        Self {
            algorithmic: TypeTable::algorithmic(),
            cpp: TypeTable::cpp(),
        }
    }
}

/// Settings shared by the generators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// One level of indentation
    pub indent: String,
    /// Accept pointer declarations, `new` and `&x` in the algorithmic backend
    pub pointers: bool,
    /// Prefix structure parameters and return types with `struct` in C++
    pub struct_keyword: bool,
    /// Import the namespace in C++ and drop its prefix
    pub using_namespace_std: bool,
    pub namespace: String,
    pub types: TypeTables,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent: default_indent(),
            pointers: false,
            struct_keyword: true,
            using_namespace_std: false,
            namespace: default_namespace(),
            types: TypeTables::default(),
        }
    }
}

fn default_indent() -> String {
    "\t".to_string()
}

fn default_namespace() -> String {
    "std".to_string()
}

fn default_struct_keyword() -> bool {
    true
}

/// On-disk layout of the configuration file
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default = "default_indent")]
    indent: String,
    #[serde(default)]
    pointers: bool,
    #[serde(default = "default_struct_keyword")]
    struct_keyword: bool,
    #[serde(default)]
    using_namespace_std: bool,
    #[serde(default = "default_namespace")]
    namespace: String,
    #[serde(default)]
    types: TypeOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TypeOverrides {
    #[serde(default)]
    algorithmic: HashMap<String, String>,
    #[serde(default)]
    cpp: HashMap<String, String>,
}

impl From<ConfigFile> for Config {
    fn from(file: ConfigFile) -> Self {
        let mut types = TypeTables::default();
        types.algorithmic.extend(file.types.algorithmic);
        types.cpp.extend(file.types.cpp);

        Self {
            indent: file.indent,
            pointers: file.pointers,
            struct_keyword: file.struct_keyword,
            using_namespace_std: file.using_namespace_std,
            namespace: file.namespace,
            types,
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text
    pub fn from_toml(text: &str) -> CompileResult<Config> {
        let file: ConfigFile = toml::from_str(text)
            .map_err(|e| CompileError::config(format!("failed to parse configuration: {}", e)))?;
        Ok(file.into())
    }

    /// Load a configuration file
    pub fn load(path: impl AsRef<Path>) -> CompileResult<Config> {
        let text = fs::read_to_string(path)?;
        Self::from_toml(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_toml(
            r#"
indent = "    "
pointers = true
struct_keyword = false

[types.algorithmic]
long = "Entier long"
int = "Ent"

[types.cpp]
long = "long"
"#,
        )
        .unwrap();

        assert_eq!(config.indent, "    ");
        assert!(config.pointers);
        assert!(!config.struct_keyword);
        assert!(!config.using_namespace_std);
        assert_eq!(config.types.algorithmic.get("long"), Some("Entier long"));
        assert_eq!(config.types.algorithmic.get("int"), Some("Ent"));
        assert_eq!(config.types.algorithmic.get("float"), Some("Réel"));
        assert_eq!(config.types.cpp.get("long"), Some("long"));
        assert_eq!(config.types.cpp.get("string"), Some("std::string"));
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        assert!(matches!(
            Config::from_toml("pointers = \"yes\""),
            Err(CompileError::Config { .. })
        ));
        assert!(matches!(
            Config::from_toml("tabs = 4"),
            Err(CompileError::Config { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            Config::load("/nonexistent/algorithmic.toml"),
            Err(CompileError::Io(_))
        ));
    }
}
