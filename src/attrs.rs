//! Attribute sets annotated onto outgoing queries.

use std::collections::BTreeMap;

use crate::escape::{write_key_escape, write_value_escape};

/// A set of name/value attributes attached to a query.
///
/// Names are unique within a set. Encoding is canonical: names are emitted in
/// ascending byte order regardless of insertion order, so the same set always
/// produces the same string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attrs(BTreeMap<String, String>);

impl Attrs {
    /// Create an empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an attribute set from an alternating name/value list.
    ///
    /// # Panics
    ///
    /// Panics when given an odd number of elements. This is a construction
    /// fault in the calling code, not a runtime condition.
    pub fn from_pairs<'a, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let pairs: Vec<&str> = pairs.into_iter().collect();
        if pairs.len() % 2 == 1 {
            panic!("got odd number of attribute pairs");
        }
        let mut attrs = Self::new();
        for pair in pairs.chunks(2) {
            attrs.insert(pair[0], pair[1]);
        }
        attrs
    }

    /// Set one attribute, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }

    /// Overlay `other` onto this set. On name collision the value from
    /// `other` wins.
    pub fn update(&mut self, other: Attrs) {
        self.0.extend(other.0);
    }

    /// Look up an attribute by name.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Encode the set as `name1='value1',name2='value2'`.
    ///
    /// Names are escaped as query components, values as path components with
    /// `%20` for spaces, per the comment wire format. An empty set encodes to
    /// the empty string.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        self.encode_into(&mut out);
        out
    }

    pub(crate) fn encode_into(&self, out: &mut String) {
        for (i, (name, value)) in self.0.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            write_key_escape(name, out);
            out.push('=');
            out.push('\'');
            write_value_escape(value, out);
            out.push('\'');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_empty_set() {
        assert_eq!(Attrs::new().encode(), "");
    }

    #[test]
    fn encode_single_attr() {
        assert_eq!(Attrs::from_pairs(["key", "value"]).encode(), "key='value'");
    }

    #[test]
    fn encode_sorts_and_escapes() {
        let attrs = Attrs::from_pairs([
            "key", "DROP TABLE FOO", //
            "2key", "/param first", //
            "name", "1234",
        ]);
        assert_eq!(
            attrs.encode(),
            "2key='%2Fparam%20first',key='DROP%20TABLE%20FOO',name='1234'"
        );
    }

    #[test]
    fn encode_ignores_insertion_order() {
        let mut forward = Attrs::new();
        forward.insert("a", "1");
        forward.insert("b", "2");

        let mut reverse = Attrs::new();
        reverse.insert("b", "2");
        reverse.insert("a", "1");

        assert_eq!(forward.encode(), reverse.encode());
    }

    #[test]
    fn update_overlays_later_values() {
        let mut attrs = Attrs::from_pairs(["k", "a", "keep", "yes"]);
        attrs.update(Attrs::from_pairs(["k", "b"]));

        assert_eq!(attrs.get("k"), Some("b"));
        assert_eq!(attrs.get("keep"), Some("yes"));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    #[should_panic(expected = "odd number of attribute pairs")]
    fn from_pairs_rejects_odd_count() {
        let _ = Attrs::from_pairs(["key", "value", "dangling"]);
    }
}
