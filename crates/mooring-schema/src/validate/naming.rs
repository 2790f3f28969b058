use crate::{MAX_ATTRIBUTE_NAME_LEN, MAX_IDENTITY_LEN, err, error::ErrorTree, node::CollectionSchema};

// Joined rows prefix child columns with dots, so names must not start with one.
const NAMESPACE_MARKER: char = '.';

pub fn validate_naming(collection: &CollectionSchema, errs: &mut ErrorTree) {
    check_name("identity", &collection.identity, MAX_IDENTITY_LEN, errs);

    for (name, attribute) in &collection.attributes {
        check_name("attribute", name, MAX_ATTRIBUTE_NAME_LEN, errs);

        match attribute.column_name(name) {
            Some(column) if column != name => {
                check_name("column", column, MAX_ATTRIBUTE_NAME_LEN, errs.route(name));
            }
            _ => {}
        }
    }
}

fn check_name(label: &str, name: &str, max_len: usize, errs: &mut ErrorTree) {
    if name.is_empty() {
        err!(errs, "{label} name is empty");
        return;
    }
    if name.len() > max_len {
        err!(errs, "{label} '{name}' exceeds {max_len} characters");
    }
    if name.starts_with(NAMESPACE_MARKER) {
        err!(errs, "{label} '{name}' starts with '{NAMESPACE_MARKER}'");
    }
    if name.chars().any(char::is_whitespace) {
        err!(errs, "{label} '{name}' contains whitespace");
    }
}
