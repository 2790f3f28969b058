//! Join-instruction planning from a resolved schema.
//!
//! The planner turns `identity.alias` into the one or two hops the integrator
//! consumes. It only reads the dictionary; rows are never involved.


use mooring_core::integrate::JoinInstruction;
use mooring_schema::node::{Attribute, CollectionSchema, ForeignKey, HasMany, SchemaDictionary};
use thiserror::Error as ThisError;

///
/// PlanError
///

#[remain::sorted]
#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum PlanError {
    #[error("collection '{collection}' attribute '{attribute}' has several foreign keys on '{target}'")]
    AmbiguousForeignKey {
        collection: String,
        attribute: String,
        target: String,
    },

    #[error("collection '{collection}' has no primary key")]
    MissingPrimaryKey { collection: String },

    #[error("collection '{collection}' attribute '{attribute}' is not an association")]
    NotAnAssociation {
        collection: String,
        attribute: String,
    },

    #[error("collection '{collection}' attribute '{attribute}' has no foreign key on '{target}'")]
    UnboundForeignKey {
        collection: String,
        attribute: String,
        target: String,
    },

    #[error("collection '{collection}' has no attribute '{attribute}'")]
    UnknownAttribute {
        collection: String,
        attribute: String,
    },

    #[error("unknown collection '{collection}'")]
    UnknownCollection { collection: String },
}

///
/// Plan the join instructions that populate `identity.alias`.
///
/// Foreign keys plan one hop onto the referenced row. One-to-many plans one
/// hop onto the child's foreign key. Many-to-many and `through` relations plan
/// two hops over the junction collection.
///
pub fn plan_populate(
    schema: &SchemaDictionary,
    identity: &str,
    alias: &str,
) -> Result<Vec<JoinInstruction>, PlanError> {
    let planner = Planner { schema, identity, alias };
    let parent = planner.collection(identity)?;

    let attribute = parent
        .attribute(alias)
        .ok_or_else(|| PlanError::UnknownAttribute {
            collection: identity.to_string(),
            attribute: alias.to_string(),
        })?;

    let instructions = match attribute {
        Attribute::ForeignKey(fk) => vec![planner.belongs_to(fk)?],
        Attribute::HasMany(has_many) => planner.has_many(parent, has_many)?,
        Attribute::Scalar(_) | Attribute::BelongsTo(_) => {
            return Err(PlanError::NotAnAssociation {
                collection: identity.to_string(),
                attribute: alias.to_string(),
            });
        }
    };

    tracing::trace!(
        collection = identity,
        alias,
        hops = instructions.len(),
        "planned populate"
    );

    Ok(instructions)
}

///
/// Planner
///

struct Planner<'a> {
    schema: &'a SchemaDictionary,
    identity: &'a str,
    alias: &'a str,
}

impl<'a> Planner<'a> {
    fn collection(&self, identity: &str) -> Result<&'a CollectionSchema, PlanError> {
        self.schema
            .get(identity)
            .ok_or_else(|| PlanError::UnknownCollection {
                collection: identity.to_string(),
            })
    }

    fn primary_key_column(collection: &'a CollectionSchema) -> Result<&'a str, PlanError> {
        collection
            .primary_key_column()
            .ok_or_else(|| PlanError::MissingPrimaryKey {
                collection: collection.identity.clone(),
            })
    }

    fn belongs_to(&self, fk: &ForeignKey) -> Result<JoinInstruction, PlanError> {
        let target = self.collection(&fk.references)?;
        let target_column = target
            .attribute(&fk.on)
            .and_then(|attribute| attribute.column_name(&fk.on))
            .unwrap_or(&fk.on);

        let instruction = JoinInstruction::new(
            self.identity,
            fk.column_name.as_str(),
            fk.references.as_str(),
            target_column,
            self.alias,
        );

        Ok(if self.alias == fk.column_name {
            instruction
        } else {
            instruction.removing_parent_key()
        })
    }

    fn has_many(
        &self,
        parent: &'a CollectionSchema,
        has_many: &HasMany,
    ) -> Result<Vec<JoinInstruction>, PlanError> {
        let parent_pk = Self::primary_key_column(parent)?;
        let child = self.collection(&has_many.collection)?;

        if let Some(through) = &has_many.through {
            let junction = self.collection(through)?;
            let (this_fk, other_fk) = self.through_columns(junction, &child.identity)?;

            return self.two_hops(parent_pk, junction, this_fk, other_fk, child);
        }

        if let Some(junction) = self.schema.junction_for(self.identity, self.alias) {
            let (this_fk, other_fk) = self.junction_columns(junction)?;

            return self.two_hops(parent_pk, junction, this_fk, other_fk, child);
        }

        let fk = self.inverse_foreign_key(child, has_many.via.as_deref())?;

        Ok(vec![JoinInstruction::new(
            self.identity,
            parent_pk,
            child.identity.as_str(),
            fk.column_name.as_str(),
            self.alias,
        )])
    }

    fn two_hops(
        &self,
        parent_pk: &str,
        junction: &CollectionSchema,
        this_fk: &ForeignKey,
        other_fk: &ForeignKey,
        child: &'a CollectionSchema,
    ) -> Result<Vec<JoinInstruction>, PlanError> {
        let child_pk = Self::primary_key_column(child)?;

        Ok(vec![
            JoinInstruction::new(
                self.identity,
                parent_pk,
                junction.identity.as_str(),
                this_fk.column_name.as_str(),
                self.alias,
            )
            .through_junction(),
            JoinInstruction::new(
                junction.identity.as_str(),
                other_fk.column_name.as_str(),
                child.identity.as_str(),
                child_pk,
                self.alias,
            ),
        ])
    }

    // Synthesized junction columns carry the attribute they serve in `via`.
    fn junction_columns(
        &self,
        junction: &'a CollectionSchema,
    ) -> Result<(&'a ForeignKey, &'a ForeignKey), PlanError> {
        let columns: Vec<&ForeignKey> = junction
            .attributes
            .values()
            .filter_map(Attribute::as_foreign_key)
            .collect();

        let this = columns
            .iter()
            .position(|fk| fk.references == self.identity && fk.via.as_deref() == Some(self.alias));

        match (this, columns.as_slice()) {
            (Some(0), [this, other]) | (Some(1), [other, this]) => Ok((*this, *other)),
            _ => Err(self.unbound(&junction.identity)),
        }
    }

    // Declared junctions carry no `via`. A self-reference takes its first
    // column for this side and the next one for the child.
    fn through_columns(
        &self,
        junction: &'a CollectionSchema,
        child: &'a str,
    ) -> Result<(&'a ForeignKey, &'a ForeignKey), PlanError> {
        let (this_name, this) = junction
            .foreign_keys_to(self.identity)
            .next()
            .ok_or_else(|| self.unbound(&junction.identity))?;

        junction
            .foreign_keys_to(child)
            .find(|(name, _)| *name != this_name)
            .map(|(_, other)| (this, other))
            .ok_or_else(|| self.unbound(&junction.identity))
    }

    fn inverse_foreign_key(
        &self,
        child: &'a CollectionSchema,
        via: Option<&str>,
    ) -> Result<&'a ForeignKey, PlanError> {
        if let Some(via) = via {
            return child
                .attribute(via)
                .and_then(Attribute::as_foreign_key)
                .filter(|fk| fk.references == self.identity)
                .ok_or_else(|| self.unbound(&child.identity));
        }

        let mut candidates = child.foreign_keys_to(self.identity);
        match (candidates.next(), candidates.next()) {
            (Some((_, fk)), None) => Ok(fk),
            (None, _) => Err(self.unbound(&child.identity)),
            (Some(_), Some(_)) => Err(PlanError::AmbiguousForeignKey {
                collection: self.identity.to_string(),
                attribute: self.alias.to_string(),
                target: child.identity.clone(),
            }),
        }
    }

    fn unbound(&self, target: &str) -> PlanError {
        PlanError::UnboundForeignKey {
            collection: self.identity.to_string(),
            attribute: self.alias.to_string(),
            target: target.to_string(),
        }
    }
}
