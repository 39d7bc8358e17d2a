use log::debug;
use serde_json::{json, Value};

use super::DocumentStore;
use crate::catalog::{Alias, Name, PersonLink};
use crate::document::{Node, Result, TypeRegistry, ID_KEY, TYPE_KEY};
use crate::names::{compatible, Compatibility};

const ALIAS_TAG: &str = "Alias";

/// A stored alias whose name may refer to the same person as the query
#[derive(Debug, Clone, PartialEq)]
pub struct AliasCandidate {
    pub alias_id: Value,
    pub name: Name,
    /// How the query name relates to the alias name
    pub compatibility: Compatibility,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AliasResolution {
    /// The exact name is already stored; these are the people it was linked to
    Known { alias_id: Value, persons: Vec<PersonLink> },
    /// No exact alias; every stored alias with the same surname that is not incompatible
    Candidates(Vec<AliasCandidate>),
}

/// Look `name` up among the aliases in `store`.
///
/// An alias whose name equals the query's wins outright, whether found by its
/// dumped form or rated `Identical` by [`compatible`] (unset and empty given
/// names dump differently but name the same person). Otherwise aliases sharing
/// the surname are compared with [`compatible`].
pub fn resolve_alias<S: DocumentStore>(
    store: &S,
    registry: &TypeRegistry,
    name: &Name,
) -> Result<AliasResolution> {
    let mut query = name.clone();
    query.id = None;
    let dumped = registry.dump(&Node::doc(query))?;

    if let Some(found) = store.find_one(&json!({(TYPE_KEY): ALIAS_TAG, "name": dumped})) {
        let alias: Alias = registry.load_as(found)?;
        debug!("Known alias for {}", name);
        return Ok(AliasResolution::Known {
            alias_id: found.get(ID_KEY).cloned().unwrap_or(Value::Null),
            persons: alias.links()?,
        });
    }

    let mut candidates = Vec::new();
    for stored in store.find("name.last", &Value::String(name.surname().to_string())) {
        if stored.get(TYPE_KEY).and_then(Value::as_str) != Some(ALIAS_TAG) {
            continue;
        }
        let alias: Alias = registry.load_as(stored)?;
        let Some(alias_name) = alias.name.as_ref() else {
            continue;
        };
        let compatibility = compatible(name, alias_name);
        if compatibility == Compatibility::Identical {
            debug!("Alias equal to {} found by comparison", name);
            return Ok(AliasResolution::Known {
                alias_id: stored.get(ID_KEY).cloned().unwrap_or(Value::Null),
                persons: alias.links()?,
            });
        }
        if compatibility.is_compatible() {
            candidates.push(AliasCandidate {
                alias_id: stored.get(ID_KEY).cloned().unwrap_or(Value::Null),
                name: alias_name.clone(),
                compatibility,
            });
        }
    }

    debug!("{} candidate aliases for {}", candidates.len(), name);
    Ok(AliasResolution::Candidates(candidates))
}
