//! People and the names they were seen under.
//!
//! A `Person` is the canonical record; an `Alias` is a name observed in the
//! wild together with the people it may refer to, each with a likelihood score.

use serde_json::Value;

use super::history::HistoricalProperty;
use super::name::Name;
use crate::document::{scalar, Document, DocumentError, FieldKind, FieldSpec, Node, Result, SchemaDef, TypeRegistry};

pub static PERSON: SchemaDef = SchemaDef {
    name: "Person",
    tag: Some("Person"),
    fields: &[
        FieldSpec::new("display_name", FieldKind::Str),
        FieldSpec::new("names", FieldKind::Document("HistoricalProperty")),
        FieldSpec::new("honorifics", FieldKind::Document("HistoricalProperty")),
        FieldSpec::new("affiliations", FieldKind::Document("HistoricalProperty")),
        FieldSpec::new("emails", FieldKind::Document("HistoricalProperty")),
    ],
    mixins: &[],
    string_like: false,
};

pub static ALIAS: SchemaDef = SchemaDef {
    name: "Alias",
    tag: Some("Alias"),
    fields: &[
        FieldSpec::new("name", FieldKind::Document("Name")),
        FieldSpec::new("persons", FieldKind::List),
    ],
    mixins: &[],
    string_like: false,
};

#[derive(Debug, Clone, Default)]
pub struct Person {
    pub id: Option<Value>,
    pub display_name: Option<String>,
    pub names: Option<HistoricalProperty>,
    pub honorifics: Option<HistoricalProperty>,
    pub affiliations: Option<HistoricalProperty>,
    pub emails: Option<HistoricalProperty>,
}

impl Person {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: Some(display_name.into()),
            ..Self::default()
        }
    }

    /// Record a name observed at `time`, starting the history if needed
    pub fn observe_name(&mut self, time: Node, name: Name) {
        self.names
            .get_or_insert_with(|| HistoricalProperty::new(false))
            .update(time, Node::doc(name));
    }

    /// Record an affiliation observed at `time`; people may hold several at once
    pub fn observe_affiliation(&mut self, time: Node, affiliation: impl Into<String>) {
        self.affiliations
            .get_or_insert_with(|| HistoricalProperty::new(true))
            .update(time, Node::from(affiliation.into()));
    }

    /// The most recently observed name
    pub fn current_name(&self) -> Option<&Name> {
        self.names
            .as_ref()
            .and_then(HistoricalProperty::current)
            .and_then(Node::as_document::<Name>)
    }
}

impl Document for Person {
    fn schema_def(&self) -> &'static SchemaDef {
        &PERSON
    }

    fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Value) {
        self.id = Some(id);
    }

    fn dump_field(&self, registry: &TypeRegistry, field: &str) -> Result<Option<Value>> {
        match field {
            "display_name" => Ok(scalar(&self.display_name)),
            "names" => registry.dump_nested(&self.names),
            "honorifics" => registry.dump_nested(&self.honorifics),
            "affiliations" => registry.dump_nested(&self.affiliations),
            "emails" => registry.dump_nested(&self.emails),
            _ => Ok(None),
        }
    }

    fn load_field(&mut self, field: &str, node: Node) -> Result<()> {
        match field {
            "display_name" => self.display_name = Some(node.into_string(field)?),
            "names" => self.names = Some(node.into_document(field)?),
            "honorifics" => self.honorifics = Some(node.into_document(field)?),
            "affiliations" => self.affiliations = Some(node.into_document(field)?),
            "emails" => self.emails = Some(node.into_document(field)?),
            _ => {}
        }
        Ok(())
    }
}

/// A candidate person for an alias: `[person id, likelihood]`
#[derive(Debug, Clone, PartialEq)]
pub struct PersonLink {
    pub person: Value,
    pub likelihood: f64,
}

#[derive(Debug, Clone, Default)]
pub struct Alias {
    pub id: Option<Value>,
    pub name: Option<Name>,
    pub persons: Option<Vec<Node>>,
}

impl Alias {
    pub fn new(name: Name) -> Self {
        Self {
            id: None,
            name: Some(name),
            persons: Some(Vec::new()),
        }
    }

    /// Attach a person this alias may stand for
    pub fn link(&mut self, person: Value, likelihood: f64) {
        self.persons
            .get_or_insert_with(Vec::new)
            .push(Node::List(vec![Node::Plain(person), Node::from(likelihood)]));
    }

    /// The `[id, score]` pairs, read back into typed links
    pub fn links(&self) -> Result<Vec<PersonLink>> {
        let mut links = Vec::new();
        for entry in self.persons.as_deref().unwrap_or(&[]) {
            match entry.as_list() {
                Some([Node::Plain(person), Node::Plain(score)]) if score.is_number() => {
                    links.push(PersonLink {
                        person: person.clone(),
                        likelihood: score.as_f64().unwrap_or_default(),
                    });
                }
                _ => return Err(DocumentError::invalid_field("persons", "[person id, likelihood] pairs")),
            }
        }
        Ok(links)
    }
}

impl Document for Alias {
    fn schema_def(&self) -> &'static SchemaDef {
        &ALIAS
    }

    fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Value) {
        self.id = Some(id);
    }

    fn dump_field(&self, registry: &TypeRegistry, field: &str) -> Result<Option<Value>> {
        match field {
            "name" => registry.dump_nested(&self.name),
            "persons" => registry.dump_list(&self.persons),
            _ => Ok(None),
        }
    }

    fn load_field(&mut self, field: &str, node: Node) -> Result<()> {
        match field {
            "name" => self.name = Some(node.into_document(field)?),
            "persons" => self.persons = Some(node.into_list(field)?),
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{registry, MonthYear};
    use serde_json::json;

    #[test]
    fn test_person_round_trip() {
        let registry = registry();
        let mut person = Person::new("Mikhail Lukin");
        person.observe_name(Node::doc(MonthYear::new(2001, 1)), Name::new(vec!["M.", "D."], "Lukin"));
        person.observe_affiliation(Node::doc(MonthYear::new(2001, 1)), "Harvard University");

        let dumped = registry.dump(&Node::doc(person)).unwrap();
        assert_eq!(dumped["_type"], json!("Person"));
        assert_eq!(dumped["names"]["data"][0][1]["last"], json!("Lukin"));
        assert!(dumped.get("emails").is_none());

        let loaded: Person = registry.load_as(&dumped).unwrap();
        assert_eq!(loaded.current_name(), Some(&Name::new(vec!["M.", "D."], "Lukin")));
        assert!(loaded.honorifics.is_none());
        assert_eq!(registry.dump(&Node::doc(loaded)).unwrap(), dumped);
    }

    #[test]
    fn test_alias_links() {
        let mut alias = Alias::new(Name::new(vec!["M."], "Lukin"));
        alias.link(json!("person-1"), 0.75);
        alias.link(json!("person-2"), 0.25);

        let links = alias.links().unwrap();
        assert_eq!(links.len(), 2);
        assert_eq!(links[0].person, json!("person-1"));
        assert_eq!(links[1].likelihood, 0.25);
    }

    #[test]
    fn test_alias_load_preserves_links_and_id() {
        let registry = registry();
        let value = json!({
            "_type": "Alias",
            "_id": "alias-9",
            "name": {"_type": "Name", "names": ["M."], "last": "Lukin"},
            "persons": [["p1", 1]],
        });
        let alias: Alias = registry.load_as(&value).unwrap();
        assert_eq!(alias.id, Some(json!("alias-9")));
        assert_eq!(alias.links().unwrap()[0].likelihood, 1.0);
        assert_eq!(registry.dump(&Node::doc(alias)).unwrap(), value);
    }

    #[test]
    fn test_malformed_links_are_reported() {
        let mut alias = Alias::default();
        alias.persons = Some(vec![Node::from("p1")]);
        assert!(alias.links().is_err());
    }
}
