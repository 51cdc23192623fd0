//! Per-unit compile step, fanned out with `rayon` (§5 "the renderer is
//! pure and re-entrant; it could be parallelised per file if the driver
//! chose to" — the transformer itself is single-threaded per unit, but
//! units are independent of one another so the driver parallelises across
//! them).

use crate::discover::SourceUnit;
use compiler::output::renderer::Renderer;
use compiler::transform::decl::lower_compilation_unit;
use compiler::{EmitConfig, Logger};
use rayon::prelude::*;
use semantic::{CompilationUnit, MetadataOracle, SymbolOracle};
use std::fs;

pub struct UnitResult {
    pub json_path: std::path::PathBuf,
    pub output_path: std::path::PathBuf,
    pub outcome: anyhow::Result<()>,
}

pub fn compile_all(
    units: &[SourceUnit],
    config: &EmitConfig,
    logger: &(dyn Logger + Sync),
    symbols: &(dyn SymbolOracle + Sync),
    metadata: &(dyn MetadataOracle + Sync),
) -> Vec<UnitResult> {
    units
        .par_iter()
        .map(|unit| {
            let outcome = compile_one(unit, config, logger, symbols, metadata);
            UnitResult { json_path: unit.json_path.clone(), output_path: unit.output_path.clone(), outcome }
        })
        .collect()
}

fn compile_one(
    unit: &SourceUnit,
    config: &EmitConfig,
    logger: &(dyn Logger + Sync),
    symbols: &(dyn SymbolOracle + Sync),
    metadata: &(dyn MetadataOracle + Sync),
) -> anyhow::Result<()> {
    let text = fs::read_to_string(&unit.json_path)
        .map_err(|e| anyhow::anyhow!("reading {}: {}", unit.json_path.display(), e))?;
    let compilation_unit: CompilationUnit = serde_json::from_str(&text)
        .map_err(|e| anyhow::anyhow!("parsing {}: {}", unit.json_path.display(), e))?;

    logger.debug(&format!("compiling {}", unit.json_path.display()));

    let mut ctx = compiler::TransformContext::new(config, logger, symbols, metadata);
    let module = lower_compilation_unit(&mut ctx, &compilation_unit)
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    let rendered = Renderer::render_module(config, &module);

    if let Some(parent) = unit.output_path.parent() {
        fs::create_dir_all(parent).map_err(|e| anyhow::anyhow!("creating {}: {}", parent.display(), e))?;
    }
    fs::write(&unit.output_path, rendered).map_err(|e| anyhow::anyhow!("writing {}: {}", unit.output_path.display(), e))?;
    Ok(())
}
