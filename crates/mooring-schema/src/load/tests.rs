use crate::{
    SchemaError,
    build::ResolveOptions,
    load::{RawAttribute, RawCollection, RawMember, load_collections},
    node::{Attribute, BelongsTo, HasMany, Scalar},
    types::AttributeType,
};

fn parse(json: &str) -> Vec<RawCollection> {
    serde_json::from_str(json).expect("fixture should deserialize")
}

fn load(raw: &[RawCollection]) -> Result<crate::node::SchemaDictionary, SchemaError> {
    load_collections(raw, &ResolveOptions::default())
}

#[test]
fn members_are_normalized() {
    let raw = parse(
        r#"[{
            "identity": "User",
            "attributes": {
                "id": { "type": "integer", "primaryKey": true },
                "name": "String",
                "team": { "model": "Team" },
                "posts": { "collection": "post", "via": "author" },
                "fullName": { "method": "fullName" }
            }
        }]"#,
    );

    let dictionary = load(&raw).expect("load should succeed");
    let user = &dictionary["user"];

    assert_eq!(
        user.attribute("id"),
        Some(&Attribute::Scalar(Scalar::new(AttributeType::Integer).primary()))
    );
    assert_eq!(
        user.attribute("name"),
        Some(&Attribute::Scalar(Scalar::new(AttributeType::String)))
    );
    assert_eq!(
        user.attribute("team"),
        Some(&Attribute::BelongsTo(BelongsTo::new("team")))
    );
    assert_eq!(
        user.attribute("posts"),
        Some(&Attribute::HasMany(HasMany::new("post").via("author")))
    );
    assert!(user.attribute("fullName").is_none(), "methods are stripped");
}

#[test]
fn table_name_is_an_identity_alias() {
    let raw = parse(r#"[{ "tableName": "Accounts", "connection": "disk" }]"#);

    let dictionary = load(&raw).expect("load should succeed");

    assert_eq!(dictionary["accounts"].connection.as_deref(), Some("disk"));
}

#[test]
fn identity_casing_can_be_kept() {
    let raw = [RawCollection::new("Accounts")];
    let options = ResolveOptions {
        lowercase_identities: false,
        ..ResolveOptions::default()
    };

    let dictionary = load_collections(&raw, &options).expect("load should succeed");

    assert!(dictionary.contains_key("Accounts"));
}

#[test]
fn blank_identity_is_rejected() {
    let raw = [RawCollection::new("user"), RawCollection::new("  ")];

    assert_eq!(load(&raw), Err(SchemaError::MissingIdentity { index: 1 }));
}

#[test]
fn repeated_identity_is_rejected_after_normalizing() {
    let raw = [RawCollection::new("User"), RawCollection::new("user")];

    assert_eq!(
        load(&raw),
        Err(SchemaError::DuplicateIdentity {
            identity: "user".to_string()
        })
    );
}

#[test]
fn untyped_descriptor_is_invalid() {
    let raw = [RawCollection::new("user").with("mystery", RawAttribute::default())];

    assert!(matches!(
        load(&raw),
        Err(SchemaError::InvalidAttribute { attribute, .. }) if attribute == "mystery"
    ));
}

#[test]
fn unknown_shorthand_type_is_invalid() {
    let raw = [RawCollection::new("user").with("balance", "money")];

    assert_eq!(
        load(&raw),
        Err(SchemaError::InvalidAttribute {
            collection: "user".to_string(),
            attribute: "balance".to_string(),
            reason: "unknown attribute type 'money'".to_string(),
        })
    );
}

#[test]
fn relation_markers_are_exclusive() {
    let raw = [RawCollection::new("user").with(
        "team",
        RawAttribute {
            model: Some("team".to_string()),
            collection: Some("team".to_string()),
            ..RawAttribute::default()
        },
    )];

    assert!(matches!(
        load(&raw),
        Err(SchemaError::InvalidAttribute { .. })
    ));
}

#[test]
fn declared_foreign_keys_need_a_target() {
    let raw = parse(
        r#"[{
            "identity": "post",
            "attributes": {
                "author": { "type": "integer", "foreignKey": true, "references": "user" }
            }
        }]"#,
    );

    assert!(matches!(
        load(&raw),
        Err(SchemaError::InvalidAttribute { reason, .. }) if reason.contains("references and on")
    ));
}

#[test]
fn declared_foreign_key_defaults_its_column() {
    let raw = parse(
        r#"[{
            "identity": "post",
            "attributes": {
                "author": { "type": "integer", "foreignKey": true, "references": "User", "on": "id" }
            }
        }]"#,
    );

    let dictionary = load(&raw).expect("load should succeed");
    let Some(Attribute::ForeignKey(fk)) = dictionary["post"].attribute("author") else {
        panic!("author should be a foreign key");
    };

    assert_eq!(fk.column_name, "author");
    assert_eq!(fk.references, "user");
}

#[test]
fn method_members_only_match_exact_shape() {
    let member: RawMember =
        serde_json::from_str(r#"{ "method": "x", "type": "string" }"#).expect("parses");

    assert!(matches!(member, RawMember::Descriptor(_)));
}
