//! Source discovery and mirrored-tree output paths (§6 "Output... one
//! text file per compilation unit").
//!
//! Each compilation unit arrives as a `*.json`-serialized
//! [`semantic::CompilationUnit`] under `-s`; the rendered `.lua` file is
//! written at the same path relative to `-d`.

use std::path::{Path, PathBuf};

/// One discovered compilation unit: its JSON source path and the mirrored
/// `.lua` path it should be rendered to.
pub struct SourceUnit {
    pub json_path: PathBuf,
    pub output_path: PathBuf,
}

pub fn discover(source_dir: &Path, output_dir: &Path) -> anyhow::Result<Vec<SourceUnit>> {
    let pattern = source_dir.join("**").join("*.json");
    let pattern_str = pattern.to_string_lossy();
    let mut units = Vec::new();
    for entry in glob::glob(&pattern_str).map_err(|e| anyhow::anyhow!("bad glob pattern {}: {}", pattern_str, e))? {
        let json_path = entry.map_err(|e| anyhow::anyhow!("reading source dir entry: {}", e))?;
        let relative = json_path
            .strip_prefix(source_dir)
            .map_err(|e| anyhow::anyhow!("{} is not under {}: {}", json_path.display(), source_dir.display(), e))?;
        let output_path = output_dir.join(relative).with_extension("lua");
        units.push(SourceUnit { json_path, output_path });
    }
    units.sort_by(|a, b| a.json_path.cmp(&b.json_path));
    Ok(units)
}
