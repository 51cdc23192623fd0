//! Top-level compile orchestration wiring discovery, the meta-file
//! oracle, and the parallel compile step together.

pub mod parallel;

use crate::cli::Args;
use crate::discover::discover;
use crate::meta::XmlMetadataOracle;
use crate::oracle::InlineSymbolOracle;
use compiler::{ConsoleLogger, Logger};

pub struct CompileSummary {
    pub total: usize,
    pub failed: Vec<(std::path::PathBuf, anyhow::Error)>,
}

pub fn run(args: &Args) -> anyhow::Result<CompileSummary> {
    let resolved = args.resolve()?;
    if !resolved.source_dir.is_dir() {
        anyhow::bail!("source dir does not exist or is not a directory: {}", resolved.source_dir.display());
    }

    let meta_paths: Vec<std::path::PathBuf> = resolved
        .meta_files
        .as_deref()
        .map(|s| s.split(',').map(std::path::PathBuf::from).collect())
        .unwrap_or_default();
    let metadata = XmlMetadataOracle::load_all(&meta_paths)?;
    let symbols = InlineSymbolOracle::new();
    let logger = ConsoleLogger::new(resolved.log_level);
    let config = resolved.emit_config;

    let units = discover(&resolved.source_dir, &resolved.output_dir)?;
    logger.info(&format!("discovered {} compilation unit(s) under {}", units.len(), resolved.source_dir.display()));

    let results = parallel::compile_all(&units, &config, &logger, &symbols, &metadata);

    let total = results.len();
    let mut failed = Vec::new();
    for result in results {
        if let Err(e) = result.outcome {
            logger.error(&format!("{}: {}", result.json_path.display(), e));
            failed.push((result.json_path, e));
        }
    }
    Ok(CompileSummary { total, failed })
}
