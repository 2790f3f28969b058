use crate::ConfigError;
use mooring_schema::{DEFAULT_JUNCTION_SEPARATOR, build::ResolveOptions};
use serde::{Deserialize, Serialize};

///
/// SchemaConfig
/// `[schema]` section: knobs for boot-time schema resolution.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    pub junction_separator: String,
    pub lowercase_identities: bool,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            junction_separator: DEFAULT_JUNCTION_SEPARATOR.to_string(),
            lowercase_identities: true,
        }
    }
}

impl SchemaConfig {
    #[must_use]
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            junction_separator: self.junction_separator.clone(),
            lowercase_identities: self.lowercase_identities,
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidValue {
            field: "schema.junction_separator",
            reason: reason.to_string(),
        };

        if self.junction_separator.is_empty() {
            return Err(invalid("must not be empty"));
        }
        if self.junction_separator.starts_with('.') {
            return Err(invalid("must not start with '.'"));
        }
        if self.junction_separator.chars().any(char::is_whitespace) {
            return Err(invalid("must not contain whitespace"));
        }

        Ok(())
    }
}
