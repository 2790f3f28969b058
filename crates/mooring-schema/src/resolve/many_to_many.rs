use crate::{
    SchemaError,
    node::{Attribute, CollectionSchema, ForeignKey, HasMany, Scalar, SchemaDictionary},
    resolve::belongs_to::foreign_key_column,
};
use std::collections::BTreeMap;

///
/// Side
/// One end of a many-to-many pair: `identity.attribute`.
///

#[derive(Clone, Copy, Debug)]
struct Side<'a> {
    identity: &'a str,
    attribute: &'a str,
    has_many: &'a HasMany,
    collection: &'a CollectionSchema,
}

impl<'a> Side<'a> {
    const fn key(&self) -> (&'a str, &'a str) {
        (self.identity, self.attribute)
    }

    fn primary_key(&self) -> Result<(&str, &Scalar), SchemaError> {
        self.collection
            .primary_key()
            .ok_or_else(|| SchemaError::MissingPrimaryKey {
                collection: self.identity.to_string(),
            })
    }
}

/// Both sides of a pair, ordered. Rendered junction identities are lossy,
/// so pairs are told apart by this key.
type PairKey<'a> = ((&'a str, &'a str), (&'a str, &'a str));

///
/// Inverse
/// What the target side of a `HasMany` turned out to be.
///

enum Inverse<'a> {
    OneToMany,
    ManyToMany(&'a str, &'a HasMany),
}

///
/// Synthesize one junction collection per symmetric `HasMany` pair.
///
/// Pairs are keyed by both sides in lexicographic order and the second
/// encounter of a pair is skipped. Two different pairs rendering the same
/// junction identity collide.
/// `through` relations synthesize nothing but must name a collection with
/// foreign keys to both sides. The input dictionary is left untouched.
///
pub fn resolve_many_to_many(
    dictionary: &SchemaDictionary,
    separator: &str,
) -> Result<SchemaDictionary, SchemaError> {
    let mut junctions: BTreeMap<String, CollectionSchema> = BTreeMap::new();
    let mut claimed: BTreeMap<String, PairKey<'_>> = BTreeMap::new();

    for (identity, collection) in dictionary {
        for (name, attribute) in &collection.attributes {
            let Attribute::HasMany(has_many) = attribute else {
                continue;
            };
            let target = dictionary.target(identity, name, &has_many.collection)?;

            if let Some(through) = &has_many.through {
                check_through(dictionary, identity, name, through, &target.identity)?;
                continue;
            }

            let Inverse::ManyToMany(inverse_name, inverse) =
                find_inverse(identity, name, has_many, target)?
            else {
                continue;
            };

            let this = Side {
                identity,
                attribute: name,
                has_many,
                collection,
            };
            let other = Side {
                identity: &target.identity,
                attribute: inverse_name,
                has_many: inverse,
                collection: target,
            };
            let (first, second) = if this.key() <= other.key() {
                (this, other)
            } else {
                (other, this)
            };

            let pair = (first.key(), second.key());
            let junction_identity = junction_identity(first, second, separator);
            match claimed.get(&junction_identity) {
                Some(existing) if *existing == pair => continue,
                Some(_) => {
                    return Err(SchemaError::JunctionCollision {
                        identity: junction_identity,
                    });
                }
                None => {}
            }
            if dictionary.contains_key(&junction_identity) {
                return Err(SchemaError::JunctionCollision {
                    identity: junction_identity,
                });
            }

            let junction = build_junction(junction_identity, first, second)?;
            tracing::trace!(
                junction = %junction.identity,
                connection = ?junction.connection,
                "synthesized junction collection"
            );
            claimed.insert(junction.identity.clone(), pair);
            junctions.insert(junction.identity.clone(), junction);
        }
    }

    tracing::debug!(junctions = junctions.len(), "many-to-many pass finished");

    let mut resolved = dictionary.clone();
    for junction in junctions.into_values() {
        resolved.insert(junction);
    }

    Ok(resolved)
}

/// `"{id1}_{attr1}{sep}{id2}_{attr2}"` with sides already ordered.
fn junction_identity(first: Side<'_>, second: Side<'_>, separator: &str) -> String {
    format!(
        "{}_{}{separator}{}_{}",
        first.identity, first.attribute, second.identity, second.attribute
    )
}

fn find_inverse<'a>(
    identity: &str,
    name: &str,
    has_many: &HasMany,
    target: &'a CollectionSchema,
) -> Result<Inverse<'a>, SchemaError> {
    // an inverse HasMany must point back here, and at this attribute if it says so
    let points_back = |inverse: &HasMany| {
        inverse.collection == identity && inverse.via.as_deref().is_none_or(|via| via == name)
    };

    let Some(via) = has_many.via.as_deref() else {
        let candidates: Vec<_> = target
            .attributes
            .iter()
            .filter_map(|(inverse_name, attribute)| {
                attribute
                    .as_has_many()
                    .filter(|inverse| points_back(*inverse))
                    .map(|inverse| (inverse_name.as_str(), inverse))
            })
            .collect();

        // no inverse collection; a foreign key back here makes it one-to-many
        let foreign_keys_back = target.foreign_keys_to(identity).count();

        return match candidates.as_slice() {
            [(inverse_name, inverse)] => {
                check_inverse_through(identity, name, inverse)?;
                Ok(Inverse::ManyToMany(*inverse_name, *inverse))
            }
            [] if foreign_keys_back > 0 => Ok(Inverse::OneToMany),
            _ => Err(SchemaError::AmbiguousVia {
                collection: identity.to_string(),
                attribute: name.to_string(),
                target: target.identity.clone(),
                candidates: candidates.len(),
            }),
        };
    };

    let (inverse_name, attribute) =
        target
            .attributes
            .get_key_value(via)
            .ok_or_else(|| SchemaError::UnknownVia {
                collection: identity.to_string(),
                attribute: name.to_string(),
                target: target.identity.clone(),
                via: via.to_string(),
            })?;

    match attribute {
        Attribute::HasMany(inverse) if points_back(inverse) => {
            check_inverse_through(identity, name, inverse)?;
            Ok(Inverse::ManyToMany(inverse_name, inverse))
        }
        Attribute::ForeignKey(fk) if fk.references == identity => Ok(Inverse::OneToMany),
        _ => Err(SchemaError::ViaMismatch {
            collection: identity.to_string(),
            attribute: name.to_string(),
            target: target.identity.clone(),
            via: via.to_string(),
        }),
    }
}

// Only one side naming a through collection would make the pair ambiguous.
fn check_inverse_through(identity: &str, name: &str, inverse: &HasMany) -> Result<(), SchemaError> {
    match &inverse.through {
        Some(through) => Err(SchemaError::ThroughMismatch {
            collection: identity.to_string(),
            attribute: name.to_string(),
            through: through.clone(),
        }),
        None => Ok(()),
    }
}

fn check_through(
    dictionary: &SchemaDictionary,
    identity: &str,
    name: &str,
    through: &str,
    target: &str,
) -> Result<(), SchemaError> {
    let junction = dictionary.target(identity, name, through)?;
    let to_self = junction.foreign_keys_to(identity).count();

    let bridges = if identity == target {
        to_self >= 2
    } else {
        to_self >= 1 && junction.foreign_keys_to(target).next().is_some()
    };

    if bridges {
        Ok(())
    } else {
        Err(SchemaError::ThroughMismatch {
            collection: identity.to_string(),
            attribute: name.to_string(),
            through: through.to_string(),
        })
    }
}

fn build_junction(
    identity: String,
    first: Side<'_>,
    second: Side<'_>,
) -> Result<CollectionSchema, SchemaError> {
    let connection = junction_connection(first, second)?;
    let (first_column, second_column) = junction_columns(first, second)?;

    let mut attributes = BTreeMap::new();
    for (side, column) in [(first, first_column), (second, second_column)] {
        let (pk_name, pk) = side.primary_key()?;
        attributes.insert(
            column.clone(),
            Attribute::ForeignKey(ForeignKey {
                column_name: column,
                ty: pk.ty,
                references: side.identity.to_string(),
                on: pk_name.to_string(),
                via: Some(side.attribute.to_string()),
            }),
        );
    }

    Ok(CollectionSchema {
        identity,
        attributes,
        junction_table: true,
        connection,
    })
}

// Plain pairs use `lower(identity)_pk`. Self-references would collide, so
// each side uses `attribute_pk`; a single attribute pointing at itself keeps
// `identity_pk` for the first side.
fn junction_columns(first: Side<'_>, second: Side<'_>) -> Result<(String, String), SchemaError> {
    let (first_pk, _) = first.primary_key()?;
    let (second_pk, _) = second.primary_key()?;

    let columns = if first.identity != second.identity {
        (
            foreign_key_column(first.identity, first_pk),
            foreign_key_column(second.identity, second_pk),
        )
    } else if first.attribute == second.attribute {
        (
            foreign_key_column(first.identity, first_pk),
            format!("{}_{second_pk}", second.attribute),
        )
    } else {
        (
            format!("{}_{first_pk}", first.attribute),
            format!("{}_{second_pk}", second.attribute),
        )
    };

    Ok(columns)
}

// The junction lives with the dominant side. Without one, both sides must
// share a connection.
fn junction_connection(first: Side<'_>, second: Side<'_>) -> Result<Option<String>, SchemaError> {
    let same_attribute = first.key() == second.key();

    if !same_attribute && first.has_many.dominant && second.has_many.dominant {
        return Err(SchemaError::DominantConflict {
            collection: first.identity.to_string(),
            attribute: first.attribute.to_string(),
            target: second.identity.to_string(),
        });
    }

    if let Some(dominant) = [first, second].into_iter().find(|side| side.has_many.dominant) {
        return Ok(dominant.collection.connection.clone());
    }

    if first.collection.connection == second.collection.connection {
        Ok(first.collection.connection.clone())
    } else {
        Err(SchemaError::MissingDominant {
            collection: first.identity.to_string(),
            attribute: first.attribute.to_string(),
            target: second.identity.to_string(),
        })
    }
}
