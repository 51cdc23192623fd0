//! Project-file style configuration (`-p project.json`), an alternative to
//! spelling every `-l`/`-m`/`-i`/... flag on the command line each run.
//! Modeled on `compiler-cli/src/config/angular.rs`'s serde-`Deserialize`
//! config structs: a thin JSON schema, no validation beyond what serde gives
//! for free, loaded once up front and merged into [`crate::cli::Args`].

use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub source_dir: Option<String>,
    pub output_dir: Option<String>,
    pub libs: Option<Vec<String>>,
    pub meta_files: Option<Vec<String>>,
    pub csc_flags: Option<String>,
    pub classic: Option<bool>,
    pub indent: Option<usize>,
    pub semicolons: Option<bool>,
    pub export_attributes: Option<bool>,
}

impl ProjectConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("reading project file {}: {}", path.display(), e))?;
        let config: ProjectConfig = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("parsing project file {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Comma-joined `libs`/`meta_files` lists, matching the shape `Args`'s
    /// own `-l`/`-m` flags already parse.
    pub fn libs_csv(&self) -> Option<String> {
        self.libs.as_ref().map(|v| v.join(","))
    }

    pub fn meta_files_csv(&self) -> Option<String> {
        self.meta_files.as_ref().map(|v| v.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_default_to_none() {
        let config: ProjectConfig = serde_json::from_str("{}").unwrap();
        assert!(config.libs.is_none());
        assert!(config.meta_files.is_none());
        assert!(config.indent.is_none());
    }

    #[test]
    fn libs_and_meta_files_join_to_csv() {
        let config: ProjectConfig = serde_json::from_str(
            r#"{"libs": ["a", "b"], "metaFiles": ["x.xml"]}"#,
        )
        .unwrap();
        assert_eq!(config.libs_csv().as_deref(), Some("a,b"));
        assert_eq!(config.meta_files_csv().as_deref(), Some("x.xml"));
    }
}
