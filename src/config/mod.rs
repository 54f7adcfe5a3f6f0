//! Configuration loading for Chatlint

mod schema;

pub use schema::{
    Config, ConfigOverride, RuleSeverity, SubmissionConfig, Thresholds, ThresholdsConfig,
};

use globset::{Glob, GlobSet, GlobSetBuilder};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_FILENAME: &str = ".chatlintrc.json";

/// Errors raised while locating or reading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config: {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in config: {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Circular extends detected in config: {}", .0.display())]
    CircularExtends(PathBuf),

    #[error("Extended config not found: {} (referenced from {})", path.display(), from.display())]
    ExtendsNotFound { path: PathBuf, from: PathBuf },

    #[error("Invalid glob pattern: {pattern}")]
    Glob {
        pattern: String,
        #[source]
        source: globset::Error,
    },
}

/// Find and load config file with extends resolution. Searches current directory then parents.
pub fn load_config(work_dir: &Path, custom_path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = if let Some(p) = custom_path {
        let path = if p.is_absolute() {
            p.to_path_buf()
        } else {
            work_dir.join(p)
        };
        if !path.exists() {
            return Err(ConfigError::NotFound(path));
        }
        Some(path)
    } else {
        find_config_in_parents(work_dir)
    };

    let config = match path {
        Some(path) => {
            tracing::debug!(path = %path.display(), "loading config");
            load_config_with_extends(&path, &mut HashSet::new())?
        }
        None => Config::default(),
    };

    for id in config.unknown_rule_ids() {
        tracing::warn!(rule = %id, "unknown rule id in config is ignored");
    }

    Ok(config)
}

/// Load a config file and resolve extends chain
fn load_config_with_extends(
    config_path: &Path,
    visited: &mut HashSet<PathBuf>,
) -> Result<Config, ConfigError> {
    // Prevent circular extends
    let canonical = config_path
        .canonicalize()
        .unwrap_or_else(|_| config_path.to_path_buf());
    if !visited.insert(canonical) {
        return Err(ConfigError::CircularExtends(config_path.to_path_buf()));
    }

    let content = fs::read_to_string(config_path).map_err(|source| ConfigError::Read {
        path: config_path.to_path_buf(),
        source,
    })?;
    let mut config: Config =
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: config_path.to_path_buf(),
            source,
        })?;

    if let Some(extends) = config.extends.take() {
        let base_config = resolve_extends(config_path, &extends, visited)?;
        config.merge_from(base_config);
    }

    Ok(config)
}

/// Resolve an extends reference (relative to the referencing config) to a config
fn resolve_extends(
    config_path: &Path,
    extends: &str,
    visited: &mut HashSet<PathBuf>,
) -> Result<Config, ConfigError> {
    let config_dir = config_path.parent().unwrap_or(Path::new("."));

    let extends_path = if Path::new(extends).is_absolute() {
        PathBuf::from(extends)
    } else {
        config_dir.join(extends)
    };

    // Ensure it has .json extension
    let extends_path = if extends_path.extension().is_none() {
        extends_path.with_extension("json")
    } else {
        extends_path
    };

    if !extends_path.exists() {
        return Err(ConfigError::ExtendsNotFound {
            path: extends_path,
            from: config_path.to_path_buf(),
        });
    }

    load_config_with_extends(&extends_path, visited)
}

/// Search for .chatlintrc.json in directory and its parents
fn find_config_in_parents(start_dir: &Path) -> Option<PathBuf> {
    start_dir
        .ancestors()
        .map(|dir| dir.join(CONFIG_FILENAME))
        .find(|candidate| candidate.exists())
}

/// Build a GlobSet from patterns for path matching
pub fn build_glob_set(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| ConfigError::Glob {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| ConfigError::Glob {
        pattern: patterns.join(", "),
        source,
    })
}

/// Contents written by `chatlint init`
pub fn default_config_json(min_turns: Option<usize>) -> String {
    let defaults = Thresholds::default();
    format!(
        r#"{{
  "rules": {{
    "no_speakers": "warning",
    "insufficient_turns": "warning",
    "ad_content": "warning"
  }},
  "thresholds": {{
    "minTurns": {},
    "maxSystemRatio": {},
    "singleSpeakerLines": {},
    "unknownLines": {}
  }},
  "submission": {{
    "minChars": {},
    "maxChars": {}
  }},
  "include": ["**/*.txt"],
  "ignore": ["**/drafts/**"]
}}
"#,
        min_turns.unwrap_or(defaults.min_turns),
        defaults.max_system_ratio,
        defaults.single_speaker_lines,
        defaults.unknown_lines,
        crate::submission::DEFAULT_MIN_CHARS,
        crate::submission::DEFAULT_MAX_CHARS,
    )
}
