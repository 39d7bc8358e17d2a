use anyhow::{Context, Result};
use log::info;
use serde_json::json;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use crate::cli::SegmentArgs;
use hphysics_metadata::common::{create_spinner, format_elapsed, setup_logging, SegmentStats};
use hphysics_metadata::pacs::{segment, PacsVocabulary};

pub fn run_segment(args: SegmentArgs) -> Result<SegmentStats> {
    let start_time = Instant::now();

    setup_logging(&args.log_level)?;

    let vocabulary = PacsVocabulary::load(Path::new(&args.vocabulary))?;
    info!("Loaded {} PACS phrases from {}", vocabulary.len(), args.vocabulary);

    let lines: Vec<String> = match (&args.keywords, &args.input) {
        (Some(keywords), _) => vec![keywords.clone()],
        (None, Some(input)) => {
            let file = File::open(input)
                .with_context(|| format!("Failed to open input file: {}", input))?;
            BufReader::new(file)
                .lines()
                .collect::<io::Result<Vec<_>>>()
                .with_context(|| format!("Failed to read input file: {}", input))?
        }
        (None, None) => {
            return Err(anyhow::anyhow!("Provide a keyword string or --input"));
        }
    };

    let mut writer: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("Failed to create output file: {}", path))?,
        )),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    let spinner = args.input.as_ref().map(|_| create_spinner("Segmenting keyword strings..."));
    let mut stats = SegmentStats::default();

    for line in &lines {
        let result = segment(line, &vocabulary);

        stats.total_strings += 1;
        stats.codes_found += result.codes.len();
        stats.leftover_phrases += result.leftover.len();
        if result.is_fully_resolved() {
            stats.fully_resolved += 1;
        }

        let record = json!({
            "keywords": line,
            "codes": result.codes,
            "leftover": result.leftover,
            "cost": result.cost,
        });
        writeln!(writer, "{}", record)?;

        if let Some(pb) = &spinner {
            pb.inc(1);
        }
    }
    writer.flush()?;

    if let Some(pb) = spinner {
        pb.finish_with_message(format!("Segmented {} keyword strings", stats.total_strings));
    }

    info!("==================== SEGMENT SUMMARY ====================");
    info!("Total execution time: {}", format_elapsed(start_time.elapsed()));
    info!("Keyword strings: {}", stats.total_strings);
    info!("Fully resolved: {}", stats.fully_resolved);
    info!("Codes found: {}", stats.codes_found);
    info!("Leftover phrases: {}", stats.leftover_phrases);
    info!("==========================================================");

    Ok(stats)
}
