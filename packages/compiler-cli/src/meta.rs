//! XML meta-file loader (§6 "XML meta file"): per-method code-template
//! overrides. A method with no entry falls back to the declaration
//! transformer's default translation.

use compiler::MetadataOracle;
use indexmap::IndexMap;
use semantic::Symbol;
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(rename = "metadata")]
struct MetaFile {
    #[serde(rename = "method", default)]
    methods: Vec<MethodEntry>,
}

#[derive(Debug, Deserialize)]
struct MethodEntry {
    /// `Namespace.Type.Method` — matched against the symbol's containing
    /// type plus its own name.
    #[serde(rename = "@name")]
    name: String,
    #[serde(rename = "@template")]
    template: String,
}

/// `MetadataOracle` backed by one or more merged XML meta files.
#[derive(Default)]
pub struct XmlMetadataOracle {
    templates: IndexMap<String, String>,
}

impl XmlMetadataOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and merges every meta file in `paths`; a later file's entries
    /// win over an earlier file's for the same qualified name.
    pub fn load_all(paths: &[impl AsRef<Path>]) -> anyhow::Result<Self> {
        let mut oracle = Self::new();
        for path in paths {
            oracle.load(path.as_ref())?;
        }
        Ok(oracle)
    }

    pub fn load(&mut self, path: &Path) -> anyhow::Result<()> {
        let text = fs::read_to_string(path).map_err(|e| anyhow::anyhow!("reading meta file {}: {}", path.display(), e))?;
        let parsed: MetaFile = quick_xml::de::from_str(&text)
            .map_err(|e| anyhow::anyhow!("parsing meta file {}: {}", path.display(), e))?;
        for entry in parsed.methods {
            self.templates.insert(entry.name, entry.template);
        }
        Ok(())
    }

    fn qualified_name(method: &Symbol) -> String {
        match &method.containing_type {
            Some(ty) => format!("{}.{}", ty.display_name(), method.name),
            None => method.name.clone(),
        }
    }
}

impl MetadataOracle for XmlMetadataOracle {
    fn code_template_for(&self, method: &Symbol) -> Option<&str> {
        self.templates.get(&Self::qualified_name(method)).map(|s| s.as_str())
    }
}
