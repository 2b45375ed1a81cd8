//! bsc_compiler: Compiler orchestration.
//!
//! Creates the program, parses every source file (in parallel, one arena per
//! file), applies the project's diagnostic filtering and transpiles the
//! results to BrightScript.

use bsc_config::BsConfig;
use bsc_diagnostics::{Diagnostic, DiagnosticCollection};
use bsc_parser::{ParseMode, ParseOptions, Parser};
use bsc_scanner::Lexer;
use bsc_transpiler::TranspileOptions;
use bumpalo::Bump;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading sources or writing output.
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("cannot read '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("source path '{}' does not exist", path.display())]
    MissingSource { path: PathBuf },
}

/// One source file, addressed by its path relative to the root directory.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub text: String,
}

impl SourceFile {
    pub fn mode(&self) -> ParseMode {
        ParseMode::for_path(&self.path)
    }
}

/// A transpiled file, relative to the staging directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputFile {
    pub path: PathBuf,
    pub text: String,
}

/// The program represents the entire compilation unit.
pub struct Program {
    pub config: BsConfig,
    source_files: Vec<SourceFile>,
}

impl Program {
    pub fn new(config: BsConfig) -> Self {
        Self {
            config,
            source_files: Vec::new(),
        }
    }

    /// Add a source file to the program. `path` is relative to the root
    /// directory; a file already present under that path is replaced.
    pub fn add_source(&mut self, path: impl Into<PathBuf>, text: impl Into<String>) {
        let path = path.into();
        let text = text.into();
        match self.source_files.iter_mut().find(|file| file.path == path) {
            Some(existing) => existing.text = text,
            None => self.source_files.push(SourceFile { path, text }),
        }
    }

    pub fn source_files(&self) -> &[SourceFile] {
        &self.source_files
    }

    /// Load the configured files from disk.
    ///
    /// Each `files` entry is a file or directory relative to the root
    /// directory. With no entries, the whole root directory is searched.
    /// Directories contribute every `.brs` and `.bs` file below them.
    pub fn load_files(&mut self) -> Result<(), ProgramError> {
        let root = self.config.root_dir();
        let entries = if self.config.files.is_empty() {
            vec![root.clone()]
        } else {
            self.config.files.iter().map(|entry| root.join(entry)).collect()
        };

        let mut found = Vec::new();
        for entry in entries {
            if entry.is_dir() {
                collect_source_files(&entry, &mut found)?;
            } else if entry.is_file() {
                found.push(entry);
            } else {
                return Err(ProgramError::MissingSource { path: entry });
            }
        }
        found.sort();
        found.dedup();
        if found.is_empty() {
            tracing::warn!(root = %root.display(), "no .brs or .bs files found");
        }

        for path in found {
            let text = std::fs::read_to_string(&path).map_err(|source| ProgramError::Read {
                path: path.clone(),
                source,
            })?;
            let relative = path.strip_prefix(&root).map(Path::to_path_buf).unwrap_or(path);
            self.add_source(relative, text);
        }
        tracing::debug!(files = self.source_files.len(), root = %root.display(), "loaded sources");
        Ok(())
    }

    /// Parse every file and return the diagnostics that survive the
    /// configured filters, sorted by file and position.
    pub fn compile(&self) -> DiagnosticCollection {
        let per_file: Vec<Vec<Diagnostic>> = self
            .source_files
            .par_iter()
            .map(|file| {
                let arena = Bump::new();
                let scanned = Lexer::scan(&file.text);
                let result = Parser::parse(&arena, &scanned.tokens, ParseOptions { mode: file.mode() });
                tracing::debug!(
                    file = %file.path.display(),
                    statements = result.statements.len(),
                    diagnostics = scanned.diagnostics.len() + result.diagnostics.len(),
                    "parsed"
                );
                let name = self.relative_name(&file.path);
                scanned
                    .diagnostics
                    .into_iter()
                    .chain(result.diagnostics)
                    .map(|diagnostic| diagnostic.with_file(name.clone()))
                    .collect()
            })
            .collect();

        let mut diagnostics = DiagnosticCollection::new();
        let mut total = 0;
        for diagnostic in per_file.into_iter().flatten() {
            total += 1;
            if self.config.is_reported(&diagnostic) {
                diagnostics.add(self.display_name(diagnostic));
            }
        }
        tracing::info!(
            files = self.source_files.len(),
            reported = diagnostics.len(),
            filtered = total - diagnostics.len(),
            "compiled"
        );
        diagnostics.sort();
        diagnostics
    }

    /// Options the transpiler runs with for this project.
    pub fn transpile_options(&self) -> TranspileOptions {
        TranspileOptions {
            scope_protection: self.config.conditional_scope_protection,
            ..TranspileOptions::default()
        }
    }

    /// Transpile every file to BrightScript. `.bs` files come out as `.brs`.
    pub fn transpile(&self) -> Vec<OutputFile> {
        let options = self.transpile_options();
        self.source_files
            .par_iter()
            .map(|file| {
                let arena = Bump::new();
                let scanned = Lexer::scan(&file.text);
                let result = Parser::parse(&arena, &scanned.tokens, ParseOptions { mode: file.mode() });
                OutputFile {
                    path: file.path.with_extension("brs"),
                    text: bsc_transpiler::transpile(result.statements, &options),
                }
            })
            .collect()
    }

    /// Write output files below the staging directory.
    pub fn write_output_files(&self, outputs: &[OutputFile]) -> Result<(), ProgramError> {
        let staging = self.config.staging_dir();
        for output in outputs {
            let path = staging.join(&output.path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|source| ProgramError::Write {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            std::fs::write(&path, &output.text).map_err(|source| ProgramError::Write {
                path: path.clone(),
                source,
            })?;
        }
        tracing::info!(files = outputs.len(), staging = %staging.display(), "wrote output");
        Ok(())
    }

    fn relative_name(&self, path: &Path) -> String {
        path.to_string_lossy().replace('\\', "/")
    }

    /// Filters match relative paths; this runs after them.
    fn display_name(&self, diagnostic: Diagnostic) -> Diagnostic {
        if !self.config.emit_full_paths {
            return diagnostic;
        }
        match diagnostic.file.clone() {
            Some(file) => {
                let full = self.config.root_dir().join(file);
                diagnostic.with_file(full.to_string_lossy().into_owned())
            }
            None => diagnostic,
        }
    }
}

fn collect_source_files(dir: &Path, found: &mut Vec<PathBuf>) -> Result<(), ProgramError> {
    let read_error = |source: std::io::Error| ProgramError::Read { path: dir.to_path_buf(), source };
    for entry in std::fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.is_dir() {
            collect_source_files(&path, found)?;
        } else if is_source_file(&path) {
            found.push(path);
        }
    }
    Ok(())
}

fn is_source_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("brs") || ext.eq_ignore_ascii_case("bs")
    )
}
