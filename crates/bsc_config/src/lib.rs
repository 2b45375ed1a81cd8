//! bsc_config: bsconfig.json parsing and project options.
//!
//! Parses bsconfig.json files into a [`BsConfig`]. Paths inside a config file
//! are relative to the directory that contains it; [`load_config`] resolves
//! them and follows `extends` chains, with the child overriding its parent.

use bsc_diagnostics::{Diagnostic, DiagnosticSeverity};
use bsc_transpiler::ScopeProtection;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while reading a project configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config file '{}' must contain a JSON object", path.display())]
    NotAnObject { path: PathBuf },

    /// A config file extends itself, directly or through other files.
    #[error("circular 'extends' chain at '{}'", path.display())]
    ExtendsCycle { path: PathBuf },
}

/// The bsconfig.json file structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BsConfig {
    /// Path to a parent config whose values this one overrides.
    pub extends: Option<String>,
    /// Working directory used when `rootDir` is not set.
    pub cwd: Option<PathBuf>,
    /// Project root. Source paths are relative to it.
    pub root_dir: Option<PathBuf>,
    /// Files or directories to compile, relative to `rootDir`. Empty means
    /// every `.brs` and `.bs` file under `rootDir`.
    pub files: Vec<String>,
    /// Where transpiled files are written.
    #[serde(alias = "stagingFolderPath")]
    pub staging_dir: Option<PathBuf>,
    /// Diagnostic codes that are never reported.
    pub ignore_error_codes: Vec<u32>,
    pub diagnostic_filters: Vec<DiagnosticFilter>,
    /// Least severe diagnostic that is still reported.
    pub diagnostic_level: DiagnosticSeverity,
    pub log_level: LogLevel,
    /// How conditional expressions with effectful parts are transpiled.
    pub conditional_scope_protection: ScopeProtection,
    /// Print absolute file paths in diagnostics.
    pub emit_full_paths: bool,
    /// Print reported diagnostics to the console.
    pub show_diagnostics_in_console: bool,
}

impl Default for BsConfig {
    fn default() -> Self {
        Self {
            extends: None,
            cwd: None,
            root_dir: None,
            files: Vec::new(),
            staging_dir: None,
            ignore_error_codes: Vec::new(),
            diagnostic_filters: Vec::new(),
            diagnostic_level: DiagnosticSeverity::Warning,
            log_level: LogLevel::default(),
            conditional_scope_protection: ScopeProtection::Safe,
            emit_full_paths: false,
            show_diagnostics_in_console: true,
        }
    }
}

impl BsConfig {
    /// The project root, falling back to `cwd` and then the current
    /// directory.
    pub fn root_dir(&self) -> PathBuf {
        self.root_dir
            .clone()
            .or_else(|| self.cwd.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// The staging directory, falling back to `<rootDir>/../out`.
    pub fn staging_dir(&self) -> PathBuf {
        match &self.staging_dir {
            Some(dir) => dir.clone(),
            None => self.root_dir().join("..").join("out"),
        }
    }

    /// Whether a diagnostic survives the configured filters and level.
    ///
    /// `file` is the diagnostic's path relative to the root directory.
    pub fn is_reported(&self, diagnostic: &Diagnostic) -> bool {
        if diagnostic.severity > self.diagnostic_level {
            return false;
        }
        if self.ignore_error_codes.contains(&diagnostic.code) {
            return false;
        }
        let file = diagnostic.file.as_deref();
        !self
            .diagnostic_filters
            .iter()
            .any(|filter| filter.matches(diagnostic.code, file))
    }
}

/// One entry of `diagnosticFilters`.
///
/// Accepts a bare code, a path, `{ "src": path, "codes": [...] }`, or
/// `{ "codes": [...] }`. Paths match exactly or as a directory prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DiagnosticFilter {
    Code(u32),
    Path(String),
    Src { src: String, codes: Option<Vec<u32>> },
    Codes { codes: Vec<u32> },
}

impl DiagnosticFilter {
    /// Whether this filter suppresses a diagnostic with `code` in `file`.
    pub fn matches(&self, code: u32, file: Option<&str>) -> bool {
        match self {
            DiagnosticFilter::Code(c) => *c == code,
            DiagnosticFilter::Codes { codes } => codes.contains(&code),
            DiagnosticFilter::Path(src) => file.is_some_and(|f| path_matches(src, f)),
            DiagnosticFilter::Src { src, codes } => {
                let in_file = file.is_some_and(|f| path_matches(src, f));
                in_file && codes.as_ref().map_or(true, |codes| codes.contains(&code))
            }
        }
    }
}

fn path_matches(pattern: &str, file: &str) -> bool {
    let pattern = normalize(pattern);
    let file = normalize(file);
    let pattern = pattern.trim_end_matches('/');
    file == pattern || file.strip_prefix(pattern).is_some_and(|rest| rest.starts_with('/'))
}

fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    path.strip_prefix("./").map(str::to_string).unwrap_or(path)
}

/// Console log level, as written in `logLevel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Log,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// The `tracing` filter directive for this level.
    pub fn directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn | LogLevel::Log => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Parse a bsconfig.json file from a string. `extends` is not followed.
pub fn parse_config(content: &str) -> Result<BsConfig, serde_json::Error> {
    serde_json::from_str(content)
}

/// Load a bsconfig.json file, following `extends` and resolving `rootDir`,
/// `stagingDir` and `cwd` against the directory of the file that set them.
pub fn load_config(path: &Path) -> Result<BsConfig, ConfigError> {
    let mut chain = Vec::new();
    let mut value = load_value(path, &mut chain)?;
    // A config without rootDir or cwd is rooted at its own directory.
    if !value.contains_key("rootDir") && !value.contains_key("cwd") {
        let dir = config_dir(path);
        value.insert("rootDir".to_string(), Value::String(dir.to_string_lossy().into_owned()));
    }
    let config: BsConfig = serde_json::from_value(Value::Object(value))
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
    tracing::debug!(path = %path.display(), files = chain.len(), "loaded config");
    Ok(config)
}

fn load_value(path: &Path, chain: &mut Vec<PathBuf>) -> Result<Map<String, Value>, ConfigError> {
    let key = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    if chain.contains(&key) {
        return Err(ConfigError::ExtendsCycle { path: path.to_path_buf() });
    }
    chain.push(key);

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
    let Value::Object(mut own) = value else {
        return Err(ConfigError::NotAnObject { path: path.to_path_buf() });
    };

    let dir = config_dir(path);
    for field in ["rootDir", "stagingDir", "stagingFolderPath", "cwd"] {
        if let Some(Value::String(relative)) = own.get(field) {
            let resolved = dir.join(relative).to_string_lossy().into_owned();
            own.insert(field.to_string(), Value::String(resolved));
        }
    }

    let parent = match own.get("extends") {
        Some(Value::String(parent)) => Some(dir.join(parent)),
        _ => None,
    };
    let Some(parent) = parent else {
        return Ok(own);
    };
    let mut merged = load_value(&parent, chain)?;
    own.remove("extends");
    for (key, value) in own {
        merged.insert(key, value);
    }
    Ok(merged)
}

fn config_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    }
}
