//! Config schema and deserialization

use crate::submission::{SubmissionLimits, DEFAULT_MAX_CHARS, DEFAULT_MIN_CHARS};
use crate::Rule;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Rule severity override (error, warning, off)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleSeverity {
    Error,
    Warning,
    /// Disable the rule entirely
    Off,
}

impl RuleSeverity {
    /// Convert to crate::Severity if not Off
    pub fn to_severity(self) -> Option<crate::Severity> {
        match self {
            RuleSeverity::Error => Some(crate::Severity::Error),
            RuleSeverity::Warning => Some(crate::Severity::Warning),
            RuleSeverity::Off => None,
        }
    }
}

/// Rule thresholds as written in the config file (unset values inherit)
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdsConfig {
    /// Minimum speaker alternations before `insufficient_turns` stops firing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_turns: Option<usize>,
    /// Share of system lines above which `too_many_system_messages` fires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_system_ratio: Option<f64>,
    /// One-sided line count above which `single_speaker` fires
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub single_speaker_lines: Option<usize>,
    /// Unknown line count above which `many_unknown` may fire
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unknown_lines: Option<usize>,
}

/// Resolved thresholds used by the rule engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub min_turns: usize,
    pub max_system_ratio: f64,
    pub single_speaker_lines: usize,
    pub unknown_lines: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_turns: 4,
            max_system_ratio: 0.3,
            single_speaker_lines: 3,
            unknown_lines: 3,
        }
    }
}

/// Submission limits as written in the config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_chars: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_chars: Option<usize>,
}

/// Per-path override configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigOverride {
    /// Glob patterns this override applies to
    pub files: Vec<String>,

    /// Optional rule overrides for matched files
    #[serde(default)]
    pub rules: HashMap<String, RuleSeverity>,

    /// Optional threshold overrides for matched files
    #[serde(default)]
    pub thresholds: ThresholdsConfig,
}

/// Root config structure for .chatlintrc.json
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Extend another config file (path relative to this config)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<String>,

    /// Per-rule severity overrides. Key is the rule id in snake_case.
    #[serde(default)]
    pub rules: HashMap<String, RuleSeverity>,

    #[serde(default)]
    pub thresholds: ThresholdsConfig,

    #[serde(default)]
    pub submission: SubmissionConfig,

    /// Glob patterns for files/directories to exclude from directory scans
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Transcript file patterns for directory scans (default: **/*.txt)
    #[serde(default)]
    pub include: Vec<String>,

    /// Per-path configuration overrides
    #[serde(default)]
    pub overrides: Vec<ConfigOverride>,
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(mut self, cli_min_turns: Option<usize>) -> Self {
        if cli_min_turns.is_some() {
            self.thresholds.min_turns = cli_min_turns;
        }
        self
    }

    /// Get the configured severity for a rule, if any
    pub fn rule_severity(&self, rule: Rule) -> Option<RuleSeverity> {
        self.rules.get(rule.id()).copied()
    }

    /// Rule ids in `rules` (and overrides) that do not name a known rule
    pub fn unknown_rule_ids(&self) -> Vec<&str> {
        self.rules
            .keys()
            .chain(self.overrides.iter().flat_map(|o| o.rules.keys()))
            .map(String::as_str)
            .filter(|id| Rule::from_id(id).is_none())
            .collect()
    }

    /// Thresholds with defaults filled in
    pub fn thresholds(&self) -> Thresholds {
        let defaults = Thresholds::default();
        Thresholds {
            min_turns: self.thresholds.min_turns.unwrap_or(defaults.min_turns),
            max_system_ratio: self
                .thresholds
                .max_system_ratio
                .unwrap_or(defaults.max_system_ratio),
            single_speaker_lines: self
                .thresholds
                .single_speaker_lines
                .unwrap_or(defaults.single_speaker_lines),
            unknown_lines: self.thresholds.unknown_lines.unwrap_or(defaults.unknown_lines),
        }
    }

    /// Submission limits with defaults filled in
    pub fn submission_limits(&self) -> SubmissionLimits {
        SubmissionLimits {
            min_chars: self.submission.min_chars.unwrap_or(DEFAULT_MIN_CHARS),
            max_chars: self.submission.max_chars.unwrap_or(DEFAULT_MAX_CHARS),
        }
    }

    /// Transcript file patterns for directory scans
    pub fn include_patterns(&self) -> Vec<String> {
        if self.include.is_empty() {
            vec!["**/*.txt".to_string()]
        } else {
            self.include.clone()
        }
    }

    /// Get effective config for a specific transcript path, applying overrides
    pub fn effective_for_file(&self, file_path: &Path) -> Config {
        let mut effective = self.clone();
        effective.overrides = Vec::new();

        // Apply matching overrides in order
        for override_cfg in &self.overrides {
            if Self::matches_override(file_path, &override_cfg.files) {
                for (rule, severity) in &override_cfg.rules {
                    effective.rules.insert(rule.clone(), *severity);
                }
                let t = override_cfg.thresholds;
                let e = &mut effective.thresholds;
                e.min_turns = t.min_turns.or(e.min_turns);
                e.max_system_ratio = t.max_system_ratio.or(e.max_system_ratio);
                e.single_speaker_lines = t.single_speaker_lines.or(e.single_speaker_lines);
                e.unknown_lines = t.unknown_lines.or(e.unknown_lines);
            }
        }

        effective
    }

    /// Check if a file path matches any of the override patterns
    fn matches_override(file_path: &Path, patterns: &[String]) -> bool {
        patterns.iter().any(|pattern| {
            globset::Glob::new(pattern)
                .map(|glob| glob.compile_matcher().is_match(file_path))
                .unwrap_or(false)
        })
    }

    /// Merge another config into this one (for extends)
    pub fn merge_from(&mut self, base: Config) {
        // Base values are overridden by this config's values
        if self.extends.is_none() {
            self.extends = base.extends;
        }

        // Merge rules (this config takes precedence)
        for (rule, severity) in base.rules {
            self.rules.entry(rule).or_insert(severity);
        }

        let t = &mut self.thresholds;
        t.min_turns = t.min_turns.or(base.thresholds.min_turns);
        t.max_system_ratio = t.max_system_ratio.or(base.thresholds.max_system_ratio);
        t.single_speaker_lines = t
            .single_speaker_lines
            .or(base.thresholds.single_speaker_lines);
        t.unknown_lines = t.unknown_lines.or(base.thresholds.unknown_lines);

        let s = &mut self.submission;
        s.min_chars = s.min_chars.or(base.submission.min_chars);
        s.max_chars = s.max_chars.or(base.submission.max_chars);

        // Merge ignore patterns
        let mut all_ignores = base.ignore;
        all_ignores.append(&mut self.ignore);
        self.ignore = all_ignores;

        if self.include.is_empty() {
            self.include = base.include;
        }

        // Prepend base overrides
        let mut all_overrides = base.overrides;
        all_overrides.append(&mut self.overrides);
        self.overrides = all_overrides;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_builtin_rules() {
        let config = Config::default();
        let t = config.thresholds();
        assert_eq!(t, Thresholds::default());
        assert_eq!(t.min_turns, 4);
        assert_eq!(t.max_system_ratio, 0.3);
        assert_eq!(config.submission_limits(), SubmissionLimits::default());
        assert_eq!(config.include_patterns(), vec!["**/*.txt".to_string()]);
    }

    #[test]
    fn parses_camel_case_fields() {
        let config: Config = serde_json::from_str(
            r#"{
                "rules": { "insufficient_turns": "off", "ad_content": "error" },
                "thresholds": { "minTurns": 6, "maxSystemRatio": 0.5 },
                "submission": { "maxChars": 8000 }
            }"#,
        )
        .unwrap();
        assert_eq!(
            config.rule_severity(Rule::InsufficientTurns),
            Some(RuleSeverity::Off)
        );
        assert_eq!(config.rule_severity(Rule::AdContent), Some(RuleSeverity::Error));
        assert_eq!(config.rule_severity(Rule::Gibberish), None);
        assert_eq!(config.thresholds().min_turns, 6);
        assert_eq!(config.thresholds().unknown_lines, 3);
        assert_eq!(config.submission_limits().max_chars, 8000);
        assert_eq!(config.submission_limits().min_chars, 10);
    }

    #[test]
    fn rejects_unknown_severity() {
        let result: Result<Config, _> =
            serde_json::from_str(r#"{ "rules": { "gibberish": "info" } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn reports_unknown_rule_ids() {
        let config: Config = serde_json::from_str(
            r#"{ "rules": { "gibberish": "off", "weak-assertion": "error" } }"#,
        )
        .unwrap();
        assert_eq!(config.unknown_rule_ids(), vec!["weak-assertion"]);
    }

    #[test]
    fn cli_min_turns_takes_precedence() {
        let config: Config =
            serde_json::from_str(r#"{ "thresholds": { "minTurns": 6 } }"#).unwrap();
        assert_eq!(config.clone().merge_with_cli(None).thresholds().min_turns, 6);
        assert_eq!(config.merge_with_cli(Some(2)).thresholds().min_turns, 2);
    }

    #[test]
    fn merge_from_prefers_child_values() {
        let mut child: Config = serde_json::from_str(
            r#"{ "rules": { "gibberish": "error" }, "thresholds": { "minTurns": 2 }, "ignore": ["b"] }"#,
        )
        .unwrap();
        let base: Config = serde_json::from_str(
            r#"{
                "rules": { "gibberish": "off", "ad_content": "off" },
                "thresholds": { "minTurns": 8, "unknownLines": 5 },
                "ignore": ["a"],
                "include": ["**/*.log"]
            }"#,
        )
        .unwrap();
        child.merge_from(base);
        assert_eq!(child.rule_severity(Rule::Gibberish), Some(RuleSeverity::Error));
        assert_eq!(child.rule_severity(Rule::AdContent), Some(RuleSeverity::Off));
        assert_eq!(child.thresholds().min_turns, 2);
        assert_eq!(child.thresholds().unknown_lines, 5);
        assert_eq!(child.ignore, vec!["a".to_string(), "b".to_string()]);
        assert_eq!(child.include_patterns(), vec!["**/*.log".to_string()]);
    }

    #[test]
    fn overrides_apply_to_matching_paths() {
        let config: Config = serde_json::from_str(
            r#"{
                "thresholds": { "minTurns": 4 },
                "overrides": [
                    {
                        "files": ["**/group/**"],
                        "rules": { "too_many_system_messages": "off" },
                        "thresholds": { "minTurns": 10 }
                    }
                ]
            }"#,
        )
        .unwrap();

        let regular = config.effective_for_file(Path::new("chats/alice.txt"));
        assert_eq!(regular.thresholds().min_turns, 4);
        assert_eq!(regular.rule_severity(Rule::TooManySystemMessages), None);

        let group = config.effective_for_file(Path::new("chats/group/family.txt"));
        assert_eq!(group.thresholds().min_turns, 10);
        assert_eq!(
            group.rule_severity(Rule::TooManySystemMessages),
            Some(RuleSeverity::Off)
        );
        assert!(group.overrides.is_empty());
    }
}
