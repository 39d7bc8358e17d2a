use anyhow::{Context, Result};
use log::{info, warn};
use serde_json::Value;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use crate::cli::CheckArgs;
use hphysics_metadata::catalog::registry;
use hphysics_metadata::common::{create_document_progress_bar, format_elapsed, setup_logging, CheckStats};
use hphysics_metadata::document::{Node, TypeRegistry, TYPE_KEY};

pub fn run_check(args: CheckArgs) -> Result<CheckStats> {
    let start_time = Instant::now();

    setup_logging(&args.log_level)?;

    info!("Checking dump/load round trip");
    info!("Input: {}", args.input);

    if !Path::new(&args.input).exists() {
        return Err(anyhow::anyhow!("Input file does not exist: {}", args.input));
    }

    let raw = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read input file: {}", args.input))?;
    let lines: Vec<&str> = raw.lines().filter(|line| !line.trim().is_empty()).collect();

    let mut writer = match &args.output {
        Some(path) => Some(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create output file: {}", path))?,
        )),
        None => None,
    };

    let registry = registry();
    let pb = create_document_progress_bar(lines.len() as u64);
    let mut stats = CheckStats::default();

    for (index, line) in lines.iter().enumerate() {
        stats.total_documents += 1;
        pb.inc(1);

        let (value, loaded) = match parse_and_load(registry, line) {
            Ok(parsed) => parsed,
            Err(e) if !args.fail_fast => {
                warn!("Document {} failed to load: {:#}", index + 1, e);
                stats.failed += 1;
                continue;
            }
            Err(e) => {
                pb.abandon();
                return Err(e).with_context(|| format!("Document {} failed to load", index + 1));
            }
        };

        let tag = loaded
            .type_tag()
            .or_else(|| value.get(TYPE_KEY).and_then(Value::as_str))
            .unwrap_or("untyped");
        stats.record_type(tag);

        let dumped = registry
            .dump(&loaded)
            .with_context(|| format!("Document {} failed to dump", index + 1))?;
        if dumped == value {
            stats.round_tripped += 1;
        } else {
            stats.changed += 1;
            info!("Document {} ({}) changed shape on round trip", index + 1, tag);
        }

        if let Some(w) = writer.as_mut() {
            serde_json::to_writer(&mut *w, &dumped)?;
            writeln!(w)?;
        }
    }

    if let Some(mut w) = writer {
        w.flush()?;
    }
    pb.finish_with_message("done");

    info!("==================== CHECK SUMMARY ====================");
    info!("Total execution time: {}", format_elapsed(start_time.elapsed()));
    info!("Documents: {}", stats.total_documents);
    info!("Round-tripped unchanged: {}", stats.round_tripped);
    info!("Changed on round trip: {}", stats.changed);
    info!("Failed to load: {}", stats.failed);
    for (tag, count) in &stats.by_type {
        info!("  {}: {}", tag, count);
    }
    info!("========================================================");

    println!("{}", serde_json::to_string(&stats)?);

    Ok(stats)
}

/// Parse one line and rebuild its documents
fn parse_and_load(registry: &TypeRegistry, line: &str) -> Result<(Value, Node)> {
    let value: Value = serde_json::from_str(line).context("Invalid JSON")?;
    let loaded = registry.load(&value)?;
    Ok((value, loaded))
}
