use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single comparable fact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Fact {
    Number(Decimal),
    Flag(bool),
}

/// Small ordered set of named facts, in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comparables(Vec<(String, Fact)>);

impl Comparables {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert a fact, replacing any existing fact with the same name in place.
    pub fn insert(&mut self, name: impl Into<String>, fact: Fact) {
        let name = name.into();
        match self.0.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = fact,
            None => self.0.push((name, fact)),
        }
    }

    /// Builder-style [`insert`](Self::insert).
    pub fn with(mut self, name: impl Into<String>, fact: Fact) -> Self {
        self.insert(name, fact);
        self
    }

    pub fn get(&self, name: &str) -> Option<Fact> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, f)| *f)
    }

    pub fn number(&self, name: &str) -> Option<Decimal> {
        match self.get(name)? {
            Fact::Number(value) => Some(value),
            Fact::Flag(_) => None,
        }
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            Fact::Flag(value) => Some(value),
            Fact::Number(_) => None,
        }
    }

    /// First name in `required` that has no fact.
    pub fn first_missing<'a>(&self, required: &[&'a str]) -> Option<&'a str> {
        required.iter().copied().find(|name| self.get(name).is_none())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Fact)> {
        self.0.iter().map(|(n, f)| (n.as_str(), *f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insert_replaces_in_place() {
        let mut comparables = Comparables::new()
            .with("side_a", Fact::Number(dec!(1)))
            .with("side_b", Fact::Number(dec!(2)));
        comparables.insert("side_a", Fact::Number(dec!(5)));

        let names: Vec<_> = comparables.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["side_a", "side_b"]);
        assert_eq!(comparables.number("side_a"), Some(dec!(5)));
    }

    #[test]
    fn test_typed_accessors() {
        let comparables = Comparables::new()
            .with("term_found", Fact::Flag(true))
            .with("term_count", Fact::Number(dec!(3)));
        assert_eq!(comparables.flag("term_found"), Some(true));
        assert_eq!(comparables.number("term_found"), None);
        assert_eq!(comparables.number("term_count"), Some(dec!(3)));
        assert_eq!(comparables.flag("missing"), None);
    }

    #[test]
    fn test_first_missing() {
        let comparables = Comparables::new().with("side_a", Fact::Number(dec!(1)));
        assert_eq!(comparables.first_missing(&["side_a", "side_b"]), Some("side_b"));
        assert_eq!(comparables.first_missing(&["side_a"]), None);
    }
}
