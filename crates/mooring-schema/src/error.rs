use std::{collections::BTreeMap, fmt};

///
/// ErrorTree
///
/// Route-aware error aggregation for staged validation. Messages are attached
/// either at the root or under a route (collection identity, then attribute
/// name), so every problem in a definition set is reported in one pass.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ErrorTree {
    messages: Vec<String>,
    children: BTreeMap<String, Self>,
}

impl ErrorTree {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Vec::new(),
            children: BTreeMap::new(),
        }
    }

    /// Add a message at this level.
    pub fn add(&mut self, message: impl fmt::Display) {
        self.messages.push(message.to_string());
    }

    /// Borrow (creating if needed) the subtree under `route`.
    pub fn route(&mut self, route: &str) -> &mut Self {
        self.children.entry(route.to_string()).or_default()
    }

    /// Fold `other` into this tree, joining routes that already exist.
    pub fn merge(&mut self, other: Self) {
        self.messages.extend(other.messages);

        for (route, child) in other.children {
            self.route(&route).merge(child);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.children.values().all(Self::is_empty)
    }

    /// Total number of messages in this tree and all subtrees.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len() + self.children.values().map(Self::len).sum::<usize>()
    }

    /// Flatten into `(route, message)` pairs; routes are dot-joined.
    #[must_use]
    pub fn flatten(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        self.flatten_into("", &mut out);

        out
    }

    fn flatten_into(&self, prefix: &str, out: &mut Vec<(String, String)>) {
        for message in &self.messages {
            out.push((prefix.to_string(), message.clone()));
        }

        for (route, child) in &self.children {
            let path = if prefix.is_empty() {
                route.clone()
            } else {
                format!("{prefix}.{route}")
            };
            child.flatten_into(&path, out);
        }
    }

    /// `Ok(())` when nothing was recorded, otherwise the tree itself.
    pub fn result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ErrorTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flat = self.flatten();

        for (i, (route, message)) in flat.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            if route.is_empty() {
                write!(f, "{message}")?;
            } else {
                write!(f, "{route}: {message}")?;
            }
        }

        Ok(())
    }
}

///
/// err!
/// Format a message straight into an `ErrorTree`.
///

#[macro_export]
macro_rules! err {
    ($errs:expr, $($arg:tt)*) => {
        $errs.add(format!($($arg)*))
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tree_is_ok() {
        assert_eq!(ErrorTree::new().result(), Ok(()));

        let mut tree = ErrorTree::new();
        tree.route("user");
        assert!(tree.is_empty(), "empty routes do not count as errors");
    }

    #[test]
    fn routes_flatten_in_order() {
        let mut tree = ErrorTree::new();
        err!(tree.route("user").route("name"), "too long");
        err!(tree, "global {}", 1);
        tree.route("account").add("no primary key");

        assert_eq!(
            tree.flatten(),
            vec![
                (String::new(), "global 1".to_string()),
                ("account".to_string(), "no primary key".to_string()),
                ("user.name".to_string(), "too long".to_string()),
            ]
        );
        assert_eq!(tree.len(), 3);
        assert_eq!(
            tree.to_string(),
            "global 1; account: no primary key; user.name: too long"
        );
    }

    #[test]
    fn merge_joins_shared_routes() {
        let mut left = ErrorTree::new();
        left.route("user").add("a");
        let mut right = ErrorTree::new();
        right.route("user").add("b");

        left.merge(right);

        assert_eq!(left.len(), 2);
        assert_eq!(left.flatten()[1], ("user".to_string(), "b".to_string()));
    }
}
