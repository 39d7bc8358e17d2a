use anyhow::{Context, Result};
use log::info;
use serde_json::{json, Value};
use std::path::Path;

use crate::cli::ResolveAliasArgs;
use hphysics_metadata::catalog::{registry, Alias, Name};
use hphysics_metadata::common::setup_logging;
use hphysics_metadata::document::Node;
use hphysics_metadata::store::{resolve_alias, AliasResolution, DocumentStore, JsonlStore};

pub fn run_resolve_alias(args: ResolveAliasArgs) -> Result<AliasResolution> {
    setup_logging(&args.log_level)?;

    let name = Name::parse_listing(&args.name)
        .with_context(|| format!("No surname in '{}'", args.name))?;
    let store_path = Path::new(&args.store);
    let mut store = JsonlStore::open(store_path)?;
    let registry = registry();

    let resolution = resolve_alias(&store, registry, &name)?;

    let report = match &resolution {
        AliasResolution::Known { alias_id, persons } => json!({
            "name": name.full_name(),
            "known": true,
            "alias_id": alias_id,
            "persons": persons
                .iter()
                .map(|link| json!([link.person, link.likelihood]))
                .collect::<Vec<_>>(),
        }),
        AliasResolution::Candidates(candidates) => json!({
            "name": name.full_name(),
            "known": false,
            "candidates": candidates
                .iter()
                .map(|c| json!({
                    "alias_id": c.alias_id,
                    "name": c.name.full_name(),
                    "compatibility": c.compatibility.to_string(),
                }))
                .collect::<Vec<_>>(),
        }),
    };
    println!("{}", report);

    if let (AliasResolution::Candidates(_), Some(person)) = (&resolution, &args.link) {
        let mut alias = Alias::new(name.clone());
        alias.link(Value::String(person.clone()), args.likelihood);
        let id = store.insert(registry.dump(&Node::doc(alias))?)?;
        store
            .save(store_path)
            .with_context(|| format!("Failed to save alias store: {}", args.store))?;
        info!("Stored alias {} for '{}' linked to {}", id, name, person);
    }

    Ok(resolution)
}
