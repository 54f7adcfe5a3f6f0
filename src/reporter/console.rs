//! Console reporter with colored output

use crate::analyzer::engine::{AggregateStats, TranscriptResult};
use crate::{Issue, Severity, Stats};
use colored::Colorize;
use std::fmt::Write;

/// Reporter for terminal output
pub struct ConsoleReporter {
    /// Whether to use colors
    use_colors: bool,
    /// Whether to show verbose output
    verbose: bool,
}

impl ConsoleReporter {
    /// Create a new console reporter
    pub fn new() -> Self {
        Self {
            use_colors: true,
            verbose: false,
        }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    /// Enable verbose output
    pub fn verbose(mut self) -> Self {
        self.verbose = true;
        self
    }

    /// Report a single transcript result
    pub fn report(&self, result: &TranscriptResult) {
        print!("{}", self.render(result));
    }

    /// Report multiple results with summary
    pub fn report_many(&self, results: &[TranscriptResult], stats: &AggregateStats) {
        for result in results {
            self.report(result);
            println!("{}", "─".repeat(60));
        }

        print!("{}", self.render_summary(stats));
    }

    /// Report in quiet mode (one line per transcript)
    pub fn report_quiet(&self, result: &TranscriptResult) {
        println!("{}", self.render_quiet(result));
    }

    /// Render a full result block
    pub fn render(&self, result: &TranscriptResult) -> String {
        let mut out = String::new();
        let report = &result.report;

        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "{}",
            self.paint_bold(&format!("Transcript: {}", result.source.display()))
        );
        let _ = writeln!(
            out,
            "   Quality: {} | Submission: {}",
            self.severity_badge(report.overall_severity),
            self.submission_label(result)
        );
        let _ = writeln!(out, "   {}", Self::stats_line(&report.stats));
        if self.verbose {
            let _ = writeln!(
                out,
                "   System: {} | Unknown: {} | Gibberish: {} | System noise: {}",
                report.stats.system_count,
                report.stats.unknown_count,
                report.stats.has_gibberish,
                report.stats.has_system_noise
            );
        }
        let _ = writeln!(out);

        if report.issues.is_empty() {
            if report.stats.total_lines == 0 {
                let _ = writeln!(out, "   {}", self.paint_red("The transcript is empty"));
            } else {
                let _ = writeln!(out, "   {}", self.paint_green("No issues found"));
            }
        } else {
            let _ = writeln!(out, "   {}", self.paint_bold("Issues Found:"));
            for issue in &report.issues {
                self.render_issue(&mut out, issue);
            }
        }

        let _ = writeln!(out);
        out
    }

    /// Render the quiet one-line form
    pub fn render_quiet(&self, result: &TranscriptResult) -> String {
        let mut line = format!(
            "{}: {} ({} issue(s))",
            result.source.display(),
            self.severity_badge(result.report.overall_severity),
            result.report.issues.len()
        );
        if !result.submission.is_ok() {
            let _ = write!(line, " [{}]", result.submission);
        }
        line
    }

    /// Render the summary block for multiple transcripts
    pub fn render_summary(&self, stats: &AggregateStats) -> String {
        let mut out = String::new();
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", "═".repeat(60));
        let _ = writeln!(out, "{}", self.paint_bold("Summary"));
        let _ = writeln!(out, "{}", "═".repeat(60));
        let _ = writeln!(out, "   Transcripts:   {}", stats.transcripts);
        let _ = writeln!(out, "   Valid:         {}", stats.valid);
        let _ = writeln!(out, "   Submittable:   {}", stats.submittable);
        let _ = writeln!(out, "   Total issues:  {}", stats.total_issues);
        if self.verbose {
            for (rule, count) in &stats.issues_by_rule {
                let _ = writeln!(out, "     {:<26} {}", rule, count);
            }
        }
        let _ = writeln!(out);
        out
    }

    fn render_issue(&self, out: &mut String, issue: &Issue) {
        let icon = match issue.severity {
            Severity::Error => self.paint_red("✗"),
            Severity::Warning => self.paint_yellow("⚠"),
            Severity::Good => self.paint_green("✓"),
        };

        let _ = writeln!(
            out,
            "   {} [{}] {}",
            icon,
            self.paint_dimmed(issue.kind.id()),
            issue.message
        );

        if let Some(ref suggestion) = issue.suggestion {
            let _ = writeln!(out, "       {} {}", self.paint_dimmed("→"), suggestion);
        }
    }

    fn stats_line(stats: &Stats) -> String {
        format!(
            "Lines: {} | Me: {} | Other: {} | Turns: {}",
            stats.total_lines, stats.me_count, stats.other_count, stats.turn_count
        )
    }

    fn submission_label(&self, result: &TranscriptResult) -> String {
        let label = result.submission.to_string();
        if result.submission.is_ok() {
            label
        } else {
            self.paint_red(&label)
        }
    }

    fn severity_badge(&self, severity: Severity) -> String {
        let s = severity.to_string().to_uppercase();
        match severity {
            Severity::Good => self.paint_green(&s),
            Severity::Warning => self.paint_yellow(&s),
            Severity::Error => self.paint_red(&s),
        }
    }

    fn paint_bold(&self, s: &str) -> String {
        if self.use_colors {
            s.bold().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_dimmed(&self, s: &str) -> String {
        if self.use_colors {
            s.dimmed().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_green(&self, s: &str) -> String {
        if self.use_colors {
            s.green().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_yellow(&self, s: &str) -> String {
        if self.use_colors {
            s.yellow().to_string()
        } else {
            s.to_string()
        }
    }

    fn paint_red(&self, s: &str) -> String {
        if self.use_colors {
            s.red().bold().to_string()
        } else {
            s.to_string()
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::path::Path;

    fn result(text: &str) -> TranscriptResult {
        TranscriptResult::assess(Path::new("chat.txt"), text, &Config::default())
    }

    #[test]
    fn test_render_lists_issues_with_rule_ids() {
        let reporter = ConsoleReporter::new().without_colors();
        let out = reporter.render(&result("我: 在吗\n我: 在不在\n我: 回我一下\n我: 人呢"));
        assert!(out.contains("Transcript: chat.txt"));
        assert!(out.contains("Quality: WARNING"));
        assert!(out.contains("[no_other_messages]"));
        assert!(out.contains("[single_speaker]"));
        assert!(out.contains("→ Mark the other party's messages"));
    }

    #[test]
    fn test_render_clean_transcript() {
        let reporter = ConsoleReporter::new().without_colors();
        let out = reporter.render(&result("我:你好呀\n对方:你好\n我:在干嘛\n对方:上班\n我:辛苦了"));
        assert!(out.contains("Quality: GOOD"));
        assert!(out.contains("No issues found"));
        assert!(out.contains("Me: 3 | Other: 2 | Turns: 4"));
    }

    #[test]
    fn test_render_empty_transcript() {
        let reporter = ConsoleReporter::new().without_colors();
        let out = reporter.render(&result("  \n "));
        assert!(out.contains("Quality: ERROR"));
        assert!(out.contains("The transcript is empty"));
    }

    #[test]
    fn test_verbose_shows_extra_stats() {
        let reporter = ConsoleReporter::new().without_colors().verbose();
        let out = reporter.render(&result("12:30\n我: 嗨"));
        assert!(out.contains("System: 1 | Unknown: 0"));
    }

    #[test]
    fn test_quiet_line_flags_submission() {
        let reporter = ConsoleReporter::new().without_colors();
        let line = reporter.render_quiet(&result("我: 嗯"));
        assert!(line.starts_with("chat.txt: WARNING"));
        assert!(line.contains("needs at least 10"));
    }

    #[test]
    fn test_summary_counts() {
        let reporter = ConsoleReporter::new().without_colors();
        let stats = AggregateStats {
            transcripts: 3,
            valid: 2,
            submittable: 1,
            total_issues: 4,
            issues_by_rule: vec![("gibberish".to_string(), 4)],
        };
        let out = reporter.render_summary(&stats);
        assert!(out.contains("Transcripts:   3"));
        assert!(out.contains("Submittable:   1"));
        assert!(!out.contains("gibberish"));
        assert!(ConsoleReporter::new()
            .without_colors()
            .verbose()
            .render_summary(&stats)
            .contains("gibberish"));
    }
}
