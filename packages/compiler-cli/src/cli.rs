//! Argument contract (§6 "CLI"): `-s source-dir` (required unless supplied
//! by `-p`), `-d output-dir` (required unless supplied by `-p`), `-l libs`,
//! `-m meta-files`, `-csc flags`, `-c` classic mode, `-i indent`, `-sem`
//! semicolons, `-a` export-attributes, `-p` project file, `-h` help.

use crate::config::ProjectConfig;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cslua", version, about = "Compiles L-src semantic trees to L-dst (Lua) source")]
pub struct Args {
    /// Directory to search for compilation-unit JSON files. May be omitted
    /// if `-p` supplies it.
    #[arg(short = 's', long = "src", value_name = "DIR")]
    pub source_dir: Option<PathBuf>,

    /// Directory the rendered `.lua` tree is written to, mirroring the
    /// source directory's relative structure. May be omitted if `-p`
    /// supplies it.
    #[arg(short = 'd', long = "out", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Project file carrying the same settings as project-file style
    /// config, overridden field-by-field by whichever of the flags below
    /// are also passed.
    #[arg(short = 'p', long = "project", value_name = "FILE")]
    pub project: Option<PathBuf>,

    /// Reference library directories, comma-separated. Accepted for
    /// interface parity with the wider toolchain; this driver has no
    /// cross-unit resolution step to feed them into.
    #[arg(short = 'l', long = "libs", value_name = "DIRS")]
    pub libs: Option<String>,

    /// XML meta file(s) supplying per-method code-template overrides,
    /// comma-separated.
    #[arg(short = 'm', long = "meta", value_name = "FILES")]
    pub meta_files: Option<String>,

    /// Extra flags passed through to the semantic front-end that produced
    /// the input trees. Opaque to this driver.
    #[arg(long = "csc", value_name = "FLAGS")]
    pub csc_flags: Option<String>,

    /// Emit the Lua 5.1-compatible dialect.
    #[arg(short = 'c', long = "classic")]
    pub classic: bool,

    /// Indent width in spaces. Defaults to the renderer's own default (2).
    #[arg(short = 'i', long = "indent", value_name = "N")]
    pub indent: Option<usize>,

    /// Emit trailing semicolons.
    #[arg(long = "sem")]
    pub semicolons: bool,

    /// Keep `@CSharpLua.*` attribute doc-comments in rendered output.
    #[arg(short = 'a', long = "export-attributes")]
    pub export_attributes: bool,

    /// Verbosity: repeat for more detail (`-v`, `-vv`).
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// `Args` merged with an optional `-p` project file, with command-line flags
/// winning over the project file field-by-field wherever both are present.
pub struct ResolvedArgs {
    pub source_dir: PathBuf,
    pub output_dir: PathBuf,
    pub meta_files: Option<String>,
    pub emit_config: compiler::EmitConfig,
    pub log_level: compiler::LogLevel,
}

impl Args {
    pub fn resolve(&self) -> anyhow::Result<ResolvedArgs> {
        let project = self.project.as_deref().map(ProjectConfig::load).transpose()?.unwrap_or_default();

        let source_dir = self
            .source_dir
            .clone()
            .or_else(|| project.source_dir.as_ref().map(PathBuf::from))
            .ok_or_else(|| anyhow::anyhow!("no source directory: pass -s or set sourceDir in the project file"))?;
        let output_dir = self
            .output_dir
            .clone()
            .or_else(|| project.output_dir.as_ref().map(PathBuf::from))
            .ok_or_else(|| anyhow::anyhow!("no output directory: pass -d or set outputDir in the project file"))?;
        let meta_files = self.meta_files.clone().or_else(|| project.meta_files_csv());

        let defaults = compiler::EmitConfig::default();
        let emit_config = compiler::EmitConfig {
            indent_width: self.indent.or(project.indent).unwrap_or(defaults.indent_width),
            classic_dialect: self.classic || project.classic.unwrap_or(false),
            semicolons: self.semicolons || project.semicolons.unwrap_or(false),
            export_attributes: self.export_attributes || project.export_attributes.unwrap_or(false),
        };

        Ok(ResolvedArgs { source_dir, output_dir, meta_files, emit_config, log_level: self.log_level() })
    }

    pub fn log_level(&self) -> compiler::LogLevel {
        match self.verbose {
            0 => compiler::LogLevel::Warn,
            1 => compiler::LogLevel::Info,
            _ => compiler::LogLevel::Debug,
        }
    }
}
