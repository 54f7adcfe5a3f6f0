//! Quality engine - runs the pipeline and aggregates rule results

use crate::config::{Config, RuleSeverity, Thresholds};
use crate::detector::{NoiseDetector, NoiseFlags};
use crate::parser::LineParser;
use crate::submission::SubmissionCheck;
use crate::{Issue, ParsedLine, Report, Rule};
use anyhow::Result;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::rules::{default_rules, QualityRule, RuleContext};
use super::stats::ConversationStats;

/// Main engine that parses, detects noise and evaluates every rule
pub struct QualityEngine {
    parser: LineParser,
    detector: NoiseDetector,
    rules: Vec<Box<dyn QualityRule>>,
    thresholds: Thresholds,
    /// Severity overrides from config
    severities: HashMap<Rule, RuleSeverity>,
}

impl QualityEngine {
    /// Create an engine with the built-in rules and default thresholds
    pub fn new() -> Self {
        Self {
            parser: LineParser::new(),
            detector: NoiseDetector::new(),
            rules: default_rules(),
            thresholds: Thresholds::default(),
            severities: HashMap::new(),
        }
    }

    /// Create an engine using thresholds and rule overrides from config
    pub fn with_config(config: &Config) -> Self {
        let severities = Rule::ALL
            .into_iter()
            .filter_map(|rule| config.rule_severity(rule).map(|s| (rule, s)))
            .collect();
        Self {
            thresholds: config.thresholds(),
            severities,
            ..Self::new()
        }
    }

    /// Assess raw transcript text
    pub fn assess(&self, text: &str) -> Report {
        let lines = self.parser.parse(text);
        let stats = ConversationStats::from_lines(&lines);
        let noise = self.detector.detect(text);
        let report = self.evaluate(&lines, &stats, noise);
        tracing::debug!(
            lines = stats.total_lines,
            me = stats.me_count,
            other = stats.other_count,
            system = stats.system_count,
            unknown = stats.unknown_count,
            turns = stats.turn_count,
            issues = report.issues.len(),
            severity = %report.overall_severity,
            "transcript assessed"
        );
        report
    }

    /// Evaluate parsed lines, their stats and the noise flags into a report.
    ///
    /// Input without any non-blank line short-circuits to [`Report::empty`]
    /// before any rule runs.
    pub fn evaluate(
        &self,
        lines: &[ParsedLine],
        stats: &ConversationStats,
        noise: NoiseFlags,
    ) -> Report {
        if lines.is_empty() {
            return Report::empty();
        }

        let ctx = RuleContext {
            stats,
            noise,
            thresholds: &self.thresholds,
        };

        let issues: Vec<Issue> = self
            .rules
            .iter()
            .filter_map(|rule| {
                let issue = rule.evaluate(&ctx)?;
                tracing::trace!(rule = rule.name(), kind = %issue.kind, "rule fired");
                Some(issue)
            })
            .collect();
        let issues = self.apply_config_to_issues(issues);

        Report::from_issues(issues, stats.into_stats(noise.gibberish, ctx.has_system_noise()))
    }

    /// Apply config to filter and adjust issue severity
    fn apply_config_to_issues(&self, issues: Vec<Issue>) -> Vec<Issue> {
        if self.severities.is_empty() {
            return issues;
        }

        issues
            .into_iter()
            .filter_map(|mut issue| match self.severities.get(&issue.kind) {
                Some(RuleSeverity::Off) => None,
                Some(rs) => {
                    if let Some(sev) = rs.to_severity() {
                        issue.severity = sev;
                    }
                    Some(issue)
                }
                None => Some(issue),
            })
            .collect()
    }
}

impl Default for QualityEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Assessment of one transcript, with its origin and submission status
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptResult {
    /// File path, or `<stdin>`
    pub source: PathBuf,
    pub report: Report,
    pub submission: SubmissionCheck,
}

impl TranscriptResult {
    /// Assess `text` using the config effective for `source`
    pub fn assess(source: &Path, text: &str, config: &Config) -> Self {
        let effective = config.effective_for_file(source);
        Self {
            source: source.to_path_buf(),
            report: QualityEngine::with_config(&effective).assess(text),
            submission: effective.submission_limits().check(text),
        }
    }

    /// Whether the transcript passes: valid report, submittable, and with
    /// `strict` no warnings either
    pub fn passes(&self, strict: bool) -> bool {
        self.report.is_valid
            && self.submission.is_ok()
            && !(strict && self.report.overall_severity > crate::Severity::Good)
    }
}

/// Read and assess a single transcript file
pub fn assess_file(path: &Path, config: &Config) -> Result<TranscriptResult> {
    let text = crate::input::read_transcript(path)?;
    Ok(TranscriptResult::assess(path, &text, config))
}

/// Assess transcript files in parallel using rayon. Each assessment is pure
/// and independent, so no coordination is needed between workers.
pub fn assess_parallel(paths: &[PathBuf], config: &Config) -> Vec<Result<TranscriptResult>> {
    use rayon::prelude::*;

    paths.par_iter().map(|p| assess_file(p, config)).collect()
}

/// Aggregate statistics from multiple transcript assessments
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    /// Number of transcripts assessed
    pub transcripts: usize,
    /// Transcripts whose report is valid
    pub valid: usize,
    /// Transcripts within the submission length range
    pub submittable: usize,
    /// Total number of issues found
    pub total_issues: usize,
    /// Issue count per rule id, in rule order
    pub issues_by_rule: Vec<(String, usize)>,
}

/// Get aggregate stats from multiple results
pub fn aggregate_stats(results: &[TranscriptResult]) -> AggregateStats {
    let issues_by_rule = Rule::ALL
        .into_iter()
        .map(|rule| {
            let n = results
                .iter()
                .flat_map(|r| &r.report.issues)
                .filter(|i| i.kind == rule)
                .count();
            (rule.id().to_string(), n)
        })
        .filter(|(_, n)| *n > 0)
        .collect();

    AggregateStats {
        transcripts: results.len(),
        valid: results.iter().filter(|r| r.report.is_valid).count(),
        submittable: results.iter().filter(|r| r.submission.is_ok()).count(),
        total_issues: results.iter().map(|r| r.report.issues.len()).sum(),
        issues_by_rule,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Severity;
    use tempfile::TempDir;

    const BALANCED: &str = "我:a\n对方:b\n我:c\n对方:d\n我:e\n对方:f";

    fn config(json: &str) -> Config {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_empty_input_short_circuits() {
        let engine = QualityEngine::new();
        for text in ["", "   ", "\n\n\t\n"] {
            let report = engine.assess(text);
            assert_eq!(report, Report::empty());
            assert!(!report.is_valid);
            assert_eq!(report.overall_severity, Severity::Error);
            assert!(report.issues.is_empty());
        }
    }

    #[test]
    fn test_balanced_dialogue_is_good() {
        let report = QualityEngine::new().assess(BALANCED);
        assert_eq!(report.stats.me_count, 3);
        assert_eq!(report.stats.other_count, 3);
        assert_eq!(report.stats.turn_count, 5);
        assert!(report.issues.is_empty(), "unexpected issues: {:?}", report.issues);
        assert_eq!(report.overall_severity, Severity::Good);
        assert!(report.is_valid);
    }

    #[test]
    fn test_issue_order_follows_rule_order() {
        // One-sided, garbled, with a link: R3, R4, R5, R7, R8
        let text = "我: 啊啊啊啊啊啊啊啊啊啊啊啊\n我: http://spam.cn\n我: 1\n我: 2\n我: 3";
        let report = QualityEngine::new().assess(text);
        let kinds: Vec<Rule> = report.issues.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                Rule::NoOtherMessages,
                Rule::InsufficientTurns,
                Rule::Gibberish,
                Rule::AdContent,
                Rule::SingleSpeaker,
            ]
        );
        assert_eq!(report.overall_severity, Severity::Warning);
        assert!(report.is_valid);
    }

    #[test]
    fn test_no_speakers_excludes_partial_rules() {
        let report = QualityEngine::new().assess("随便写点什么\n没有前缀\n还是没有\n最后一行");
        assert!(report.has_issue(Rule::NoSpeakers));
        assert!(!report.has_issue(Rule::NoMyMessages));
        assert!(!report.has_issue(Rule::NoOtherMessages));
        // Nobody speaks, so the turn rule stays quiet
        assert!(!report.has_issue(Rule::InsufficientTurns));
        assert!(report.has_issue(Rule::ManyUnknown));
    }

    #[test]
    fn test_system_noise_sets_flag() {
        let text = "12:30\n我: 在吗\n13:00\n对方: 在\n昨天 21:04";
        let report = QualityEngine::new().assess(text);
        assert_eq!(report.stats.system_count, 3);
        assert!(report.stats.has_system_noise);
        assert!(report.has_issue(Rule::TooManySystemMessages));
    }

    #[test]
    fn test_config_off_removes_issue() {
        let engine = QualityEngine::with_config(&config(
            r#"{ "rules": { "insufficient_turns": "off" } }"#,
        ));
        let report = engine.assess("我: 你好\n对方: 你好");
        assert!(!report.has_issue(Rule::InsufficientTurns));
        assert_eq!(report.overall_severity, Severity::Good);
    }

    #[test]
    fn test_config_error_invalidates_report() {
        let engine =
            QualityEngine::with_config(&config(r#"{ "rules": { "ad_content": "error" } }"#));
        let report = engine.assess(&format!("{}\n我: 加微信 abc", BALANCED));
        assert!(report.has_issue(Rule::AdContent));
        assert_eq!(report.overall_severity, Severity::Error);
        assert!(!report.is_valid);
    }

    #[test]
    fn test_disabling_no_speakers_does_not_enable_partial_rules() {
        let engine =
            QualityEngine::with_config(&config(r#"{ "rules": { "no_speakers": "off" } }"#));
        let report = engine.assess("没有前缀的一行");
        assert!(!report.has_issue(Rule::NoSpeakers));
        assert!(!report.has_issue(Rule::NoMyMessages));
        assert!(!report.has_issue(Rule::NoOtherMessages));
    }

    #[test]
    fn test_thresholds_from_config() {
        let engine = QualityEngine::with_config(&config(r#"{ "thresholds": { "minTurns": 6 } }"#));
        assert!(engine.assess(BALANCED).has_issue(Rule::InsufficientTurns));
    }

    #[test]
    fn test_assess_file_and_aggregate() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("good.txt");
        let short = dir.path().join("short.txt");
        std::fs::write(&good, BALANCED).unwrap();
        std::fs::write(&short, "我: 嗯").unwrap();

        let paths = vec![good, short];
        let results: Vec<TranscriptResult> = assess_parallel(&paths, &Config::default())
            .into_iter()
            .map(|r| r.unwrap())
            .collect();
        assert_eq!(results.len(), 2);
        assert!(results[0].passes(true));
        assert!(!results[1].submission.is_ok());
        assert!(!results[1].passes(false));

        let agg = aggregate_stats(&results);
        assert_eq!(agg.transcripts, 2);
        assert_eq!(agg.valid, 2);
        assert_eq!(agg.submittable, 1);
        assert_eq!(agg.total_issues, results[1].report.issues.len());
        assert!(agg
            .issues_by_rule
            .contains(&("no_other_messages".to_string(), 1)));
    }

    #[test]
    fn test_aggregate_empty() {
        assert_eq!(aggregate_stats(&[]), AggregateStats::default());
    }
}
