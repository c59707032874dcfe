//! Parser configuration.

use serde::{Deserialize, Serialize};

/// Nesting limit used when no options are given.
pub const DEFAULT_MAX_NESTING_DEPTH: u32 = 200;

/// Options shared by the type expression and doc comment parsers.
///
/// Deserializes from camelCase JSON, e.g. `{"maxNestingDepth": 64}`. Missing
/// fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ParseOptions {
    /// How deeply type constructs may nest before the parser gives up on the
    /// expression with a diagnostic.
    pub max_nesting_depth: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(ParseOptions::default().max_nesting_depth, 200);
    }

    #[test]
    fn test_deserialize_camel_case() {
        let options: ParseOptions = serde_json::from_str(r#"{"maxNestingDepth": 64}"#).unwrap();
        assert_eq!(options.max_nesting_depth, 64);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let options: ParseOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ParseOptions::default());
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        assert!(serde_json::from_str::<ParseOptions>(r#"{"depth": 1}"#).is_err());
    }
}
