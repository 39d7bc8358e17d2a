use serde_json::Value;

use crate::document::{
    scalar, Document, DocumentError, FieldKind, FieldSpec, Node, Result, SchemaDef, TypeRegistry,
};

pub static HISTORICAL_PROPERTY: SchemaDef = SchemaDef {
    name: "HistoricalProperty",
    tag: Some("HistoricalProperty"),
    fields: &[
        FieldSpec::new("simul", FieldKind::Bool),
        FieldSpec::new("data", FieldKind::List),
    ],
    mixins: &[],
    string_like: false,
};

/// One observed value and when it was observed
#[derive(Debug, Clone)]
pub struct HistoricalEntry {
    pub time: Node,
    pub value: Node,
}

/// A field whose past values are all retained.
///
/// `simul` marks properties that may hold several values at once (a person
/// with two affiliations). Entries are only ever appended; stored as
/// `[[time, value], ...]`.
#[derive(Debug, Clone, Default)]
pub struct HistoricalProperty {
    pub id: Option<Value>,
    pub simul: Option<bool>,
    data: Option<Vec<HistoricalEntry>>,
}

impl HistoricalProperty {
    pub fn new(simul: bool) -> Self {
        Self {
            id: None,
            simul: Some(simul),
            data: Some(Vec::new()),
        }
    }

    /// Record `value` as observed at `time`
    pub fn update(&mut self, time: Node, value: Node) {
        self.data
            .get_or_insert_with(Vec::new)
            .push(HistoricalEntry { time, value });
    }

    pub fn entries(&self) -> &[HistoricalEntry] {
        self.data.as_deref().unwrap_or(&[])
    }

    /// Most recently recorded value
    pub fn current(&self) -> Option<&Node> {
        self.entries().last().map(|entry| &entry.value)
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

impl Document for HistoricalProperty {
    fn schema_def(&self) -> &'static SchemaDef {
        &HISTORICAL_PROPERTY
    }

    fn id(&self) -> Option<&Value> {
        self.id.as_ref()
    }

    fn set_id(&mut self, id: Value) {
        self.id = Some(id);
    }

    fn dump_field(&self, registry: &TypeRegistry, field: &str) -> Result<Option<Value>> {
        match field {
            "simul" => Ok(scalar(&self.simul)),
            "data" => match &self.data {
                Some(entries) => {
                    let mut out = Vec::with_capacity(entries.len());
                    for entry in entries {
                        out.push(Value::Array(vec![
                            registry.dump(&entry.time)?,
                            registry.dump(&entry.value)?,
                        ]));
                    }
                    Ok(Some(Value::Array(out)))
                }
                None => Ok(None),
            },
            _ => Ok(None),
        }
    }

    fn load_field(&mut self, field: &str, node: Node) -> Result<()> {
        match field {
            "simul" => self.simul = Some(node.into_bool(field)?),
            "data" => {
                let mut entries = Vec::new();
                for pair in node.into_list(field)? {
                    let [time, value]: [Node; 2] = pair
                        .into_list(field)?
                        .try_into()
                        .map_err(|_| DocumentError::invalid_field(field, "[time, value] pairs"))?;
                    entries.push(HistoricalEntry { time, value });
                }
                self.data = Some(entries);
            }
            _ => {}
        }
        Ok(())
    }
}
