use anyhow::{Context, Result};
use log::debug;
use serde_json::json;

use crate::cli::CompareNamesArgs;
use hphysics_metadata::catalog::Name;
use hphysics_metadata::common::setup_logging;
use hphysics_metadata::names::{compatible, Compatibility};

pub fn run_compare_names(args: CompareNamesArgs) -> Result<Compatibility> {
    setup_logging(&args.log_level)?;

    let first = Name::parse_listing(&args.first)
        .with_context(|| format!("No surname in '{}'", args.first))?;
    let second = Name::parse_listing(&args.second)
        .with_context(|| format!("No surname in '{}'", args.second))?;
    debug!("Comparing '{}' with '{}'", first, second);

    let result = compatible(&first, &second);
    println!(
        "{}",
        json!({
            "first": first.full_name(),
            "second": second.full_name(),
            "compatibility": result.to_string(),
        })
    );

    Ok(result)
}
