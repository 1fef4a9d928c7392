// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::err::InvalidConfigError;
use serde::{Deserialize, Serialize};

/// Capacity of a freshly created list, sentinel slot included.
pub const DEFAULT_INITIAL_CAPACITY: usize = 4;

/// The smallest slot array that can hold the sentinel plus one free slot.
pub const MIN_SUPPORTED_CAPACITY: usize = 2;

/// Sizing and checking policy of an `IndexedList`.
///
/// Deserializes from a partial document; missing fields fall back to
/// [`ListConfig::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    initial_capacity: usize,
    min_capacity: usize,
    verify_on_mutation: bool,
}

impl ListConfig {
    #[inline]
    pub const fn new(initial_capacity: usize, min_capacity: usize) -> Self {
        Self {
            initial_capacity,
            min_capacity,
            verify_on_mutation: true,
        }
    }

    #[inline]
    pub const fn initial_capacity(&self) -> usize {
        self.initial_capacity
    }

    /// Shrinking never halves capacity below this bound.
    #[inline]
    pub const fn min_capacity(&self) -> usize {
        self.min_capacity
    }

    /// Whether every public mutation is bracketed by a full `verify` pass.
    #[inline]
    pub const fn verify_on_mutation(&self) -> bool {
        self.verify_on_mutation
    }

    #[inline]
    pub const fn with_verify_on_mutation(mut self, enabled: bool) -> Self {
        self.verify_on_mutation = enabled;
        self
    }

    pub fn validate(&self) -> Result<(), InvalidConfigError> {
        if self.initial_capacity < MIN_SUPPORTED_CAPACITY {
            return Err(InvalidConfigError::new(
                "initial_capacity must leave room for the sentinel and one free slot",
            ));
        }
        if self.min_capacity < MIN_SUPPORTED_CAPACITY {
            return Err(InvalidConfigError::new(
                "min_capacity must leave room for the sentinel and one free slot",
            ));
        }
        if self.min_capacity > self.initial_capacity {
            return Err(InvalidConfigError::new(
                "min_capacity must not exceed initial_capacity",
            ));
        }
        Ok(())
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INITIAL_CAPACITY, DEFAULT_INITIAL_CAPACITY)
    }
}

/// Where a list was created. Only diagnostics read it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Provenance {
    pub name: String,
    pub file: String,
    pub function: String,
    pub line: u32,
}

impl Provenance {
    pub fn new(
        name: impl Into<String>,
        file: impl Into<String>,
        function: impl Into<String>,
        line: u32,
    ) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            function: function.into(),
            line,
        }
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} created in {} at {}:{}",
            self.name, self.function, self.file, self.line
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let cfg = ListConfig::default();
        assert_eq!(cfg.initial_capacity(), 4);
        assert_eq!(cfg.min_capacity(), 4);
        assert!(cfg.verify_on_mutation());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_capacities() {
        assert!(ListConfig::new(1, 1).validate().is_err());
        assert!(ListConfig::new(4, 1).validate().is_err());
        assert!(ListConfig::new(4, 8).validate().is_err());
        assert!(ListConfig::new(16, 2).validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let cfg: ListConfig = serde_json::from_str(r#"{ "initial_capacity": 16 }"#).unwrap();
        assert_eq!(cfg.initial_capacity(), 16);
        assert_eq!(cfg.min_capacity(), DEFAULT_INITIAL_CAPACITY);
        assert!(cfg.verify_on_mutation());

        let cfg: ListConfig =
            serde_json::from_str(r#"{ "verify_on_mutation": false }"#).unwrap();
        assert_eq!(cfg, ListConfig::default().with_verify_on_mutation(false));
    }

    #[test]
    fn test_provenance_display() {
        let p = Provenance::new("list", "main.rs", "main", 12);
        assert_eq!(format!("{}", p), "list created in main at main.rs:12");
    }
}
