//! TOML configuration loading for the CLI.
//!
//! Every field is optional in the file; [`ConfigFile::into_config`] merges
//! the file with the command-line override and falls back to the library
//! defaults for the rest.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use impart_client::{AnalyzerConfig, ImportTable};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("no analyzer command: pass --analyzer or set `command` in the config")]
    MissingCommand,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConfigFile {
    /// Analyzer executable.
    pub command: Option<String>,
    /// Arguments the analyzer is launched with.
    pub args: Option<Vec<String>>,
    /// Substring marking a diagnostic as an unresolved-symbol report.
    pub unresolved_marker: Option<String>,
    /// Symbol-to-import table, as `[[imports]]` entries.
    pub imports: Option<ImportTable>,
}

impl ConfigFile {
    /// Merge with the `--analyzer` override into a full client config.
    pub fn into_config(self, override_command: Option<String>) -> Result<AnalyzerConfig, ConfigError> {
        let command = override_command
            .or(self.command)
            .ok_or(ConfigError::MissingCommand)?;

        let mut config = AnalyzerConfig::new(command);
        if let Some(args) = self.args {
            config.args = args;
        }
        if let Some(marker) = self.unresolved_marker {
            config.unresolved_marker = marker;
        }
        if let Some(imports) = self.imports {
            config.imports = imports;
        }
        Ok(config)
    }
}

pub fn load(path: &Path) -> Result<ConfigFile, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn full_config_round_trips() {
        let file = write_config(
            r#"
command = "dart"
args = ["analyzer", "--lsp"]
unresolved_marker = "is not defined"

[[imports]]
symbol = "Completer"
path = "dart:async"

[[imports]]
symbol = "File"
path = "dart:io"
"#,
        );

        let config = load(file.path()).unwrap().into_config(None).unwrap();
        assert_eq!(config.command, "dart");
        assert_eq!(config.args, vec!["analyzer", "--lsp"]);
        assert_eq!(config.imports.len(), 2);
    }

    #[test]
    fn empty_file_uses_library_defaults() {
        let file = write_config("");
        let config = load(file.path())
            .unwrap()
            .into_config(Some(String::from("dart")))
            .unwrap();
        assert_eq!(config.command, "dart");
        assert_eq!(config.args, vec!["--lsp"]);
        assert_eq!(config.unresolved_marker, "is not defined");
    }

    #[test]
    fn cli_override_beats_file_command() {
        let file = write_config(r#"command = "dart""#);
        let config = load(file.path())
            .unwrap()
            .into_config(Some(String::from("dart-beta")))
            .unwrap();
        assert_eq!(config.command, "dart-beta");
    }

    #[test]
    fn missing_command_everywhere_is_an_error() {
        let err = ConfigFile::default().into_config(None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCommand));
    }

    #[test]
    fn unreadable_file_reports_path() {
        let err = load(Path::new("/definitely/not/here.toml")).unwrap_err();
        match err {
            ConfigError::Read { path, .. } => {
                assert_eq!(path, PathBuf::from("/definitely/not/here.toml"));
            }
            other => panic!("expected Read error, got {other:?}"),
        }
    }

    #[test]
    fn broken_toml_is_a_parse_error() {
        let file = write_config("command = [not toml");
        assert!(matches!(
            load(file.path()).unwrap_err(),
            ConfigError::Parse { .. }
        ));
    }
}
