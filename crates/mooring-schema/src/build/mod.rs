//! Schema assembly: the boot-time composition root.


use crate::{
    DEFAULT_JUNCTION_SEPARATOR, SchemaError,
    load::{RawCollection, load_collections},
    node::SchemaDictionary,
    resolve::{resolve_belongs_to, resolve_many_to_many},
    validate::{validate_loaded, validate_resolved},
};
use serde::{Deserialize, Serialize};

///
/// ResolveOptions
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default)]
pub struct ResolveOptions {
    /// Placed between the two sides of a synthesized junction identity.
    pub junction_separator: String,

    /// Lower-case identities and relation targets while loading.
    pub lowercase_identities: bool,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            junction_separator: DEFAULT_JUNCTION_SEPARATOR.to_string(),
            lowercase_identities: true,
        }
    }
}

impl ResolveOptions {
    #[must_use]
    pub fn normalize_identity(&self, identity: &str) -> String {
        let trimmed = identity.trim();

        if self.lowercase_identities {
            trimmed.to_lowercase()
        } else {
            trimmed.to_string()
        }
    }
}

///
/// Resolve raw definitions into a finalized dictionary.
///
/// Stages run in a fixed order and none is retried:
/// 1. load and normalize entries, then validate them structurally;
/// 2. the belongs-to pass;
/// 3. the many-to-many pass, merging synthesized junctions;
/// 4. validation of the resolved dictionary.
///
/// Each stage consumes the previous stage's dictionary by reference and
/// returns a new one, so a failure never leaves a half-resolved result.
///
pub fn resolve(
    raw: &[RawCollection],
    options: &ResolveOptions,
) -> Result<SchemaDictionary, SchemaError> {
    let span = tracing::debug_span!("schema_resolve", definitions = raw.len());
    let _enter = span.enter();

    let loaded = load_collections(raw, options)?;
    validate_loaded(&loaded).map_err(SchemaError::Validation)?;

    let keyed = resolve_belongs_to(&loaded)?;
    let resolved = resolve_many_to_many(&keyed, &options.junction_separator)?;
    validate_resolved(&resolved).map_err(SchemaError::Validation)?;

    tracing::debug!(
        collections = resolved.len(),
        junctions = resolved.junctions().count(),
        "schema resolved"
    );

    Ok(resolved)
}
