//! ## Crate layout
//! - `config`: TOML configuration and logging setup.
//! - `core`: rows, values, joins, populate and the integrator.
//! - `schema`: raw definitions, validation and association resolution.
//! - `plan`: join instructions derived from a resolved schema.
//! - `registry`: the shared, reloadable schema snapshot.
//!
//! `Mooring` ties them together: resolve once at boot, then plan and
//! integrate populates against the current snapshot.

pub use mooring_config as config;
pub use mooring_core as core;
pub use mooring_schema as schema;

pub mod error;
pub mod plan;
pub mod registry;

pub use error::{Error, ErrorKind, ErrorOrigin};

use crate::{plan::plan_populate, registry::SchemaRegistry};
use mooring_config::Config;
use mooring_core::{
    integrate::{JoinInstruction, RowCache, integrate},
    row::Row,
};
use mooring_schema::{load::RawCollection, node::SchemaDictionary};

//
// Consts
//

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

///
/// Prelude
///

pub mod prelude {
    pub use crate::{
        Mooring,
        core::prelude::*,
        plan::plan_populate,
        registry::SchemaRegistry,
        schema::{
            build::ResolveOptions,
            load::{RawAttribute, RawCollection, RawMember},
            node::SchemaDictionary,
        },
    };
    pub use serde::{Deserialize, Serialize};
}

///
/// Mooring
///

#[derive(Debug)]
pub struct Mooring {
    registry: SchemaRegistry,
}

impl Mooring {
    /// Resolve `definitions` with the schema section of `config`.
    pub fn boot(config: &Config, definitions: &[RawCollection]) -> Result<Self, Error> {
        let registry = SchemaRegistry::new(definitions, config.schema.resolve_options())?;
        tracing::info!(collections = registry.snapshot().len(), "mooring booted");

        Ok(Self { registry })
    }

    #[must_use]
    pub const fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Plan every alias against the current snapshot.
    pub fn plan(&self, identity: &str, aliases: &[&str]) -> Result<Vec<JoinInstruction>, Error> {
        plan_aliases(&self.registry.snapshot(), identity, aliases)
    }

    /// Populate `aliases` on the cached rows of `identity`.
    pub fn populate(
        &self,
        cache: &RowCache,
        identity: &str,
        aliases: &[&str],
    ) -> Result<Vec<Row>, Error> {
        let schema = self.registry.snapshot();
        let parent = schema.get(identity).ok_or_else(|| plan::PlanError::UnknownCollection {
            collection: identity.to_string(),
        })?;
        let primary_key = parent
            .primary_key_column()
            .ok_or_else(|| plan::PlanError::MissingPrimaryKey {
                collection: identity.to_string(),
            })?;

        let instructions = plan_aliases(&schema, identity, aliases)?;

        Ok(integrate(cache, &instructions, primary_key)?)
    }
}

fn plan_aliases(
    schema: &SchemaDictionary,
    identity: &str,
    aliases: &[&str],
) -> Result<Vec<JoinInstruction>, Error> {
    let mut instructions = Vec::new();
    for alias in aliases {
        instructions.extend(plan_populate(schema, identity, alias)?);
    }

    Ok(instructions)
}
