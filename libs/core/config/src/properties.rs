//! Minimal `.properties` file loader
//!
//! Supports the subset of the Java properties format that configuration
//! files in this workspace actually use: one `key = value` pair per line,
//! blank lines, and `#`/`!` comment lines. Values keep internal whitespace
//! but are trimmed at both ends.

use std::collections::HashMap;
use std::fmt::Display;
use std::path::Path;
use std::str::FromStr;

use crate::ConfigError;

/// A parsed set of string properties
#[derive(Clone, Debug, Default)]
pub struct Properties {
    values: HashMap<String, String>,
}

impl Properties {
    /// Read and parse a properties file from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse properties from a string
    ///
    /// Lines without a `=` separator are rejected so typos in the file
    /// surface as errors instead of silently dropped settings.
    pub fn parse(input: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();

        for (number, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::ParseError {
                    key: format!("line {}", number + 1),
                    details: format!("expected 'key = value', got '{line}'"),
                });
            };

            values.insert(key.trim().to_string(), value.trim().to_string());
        }

        Ok(Self { values })
    }

    /// Look up a property value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Look up a property value, falling back to a default
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Look up and parse a property value, falling back to a default when absent
    pub fn get_parsed_or<T>(&self, key: &str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.parse().map_err(|e: T::Err| ConfigError::ParseError {
                key: key.to_string(),
                details: e.to_string(),
            }),
        }
    }

    /// Number of properties
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
