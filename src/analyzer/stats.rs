//! Conversation statistics: per-role tallies and the turn counter

use crate::{ParsedLine, Speaker, Stats};

/// Per-role line tallies for a parsed transcript
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversationStats {
    pub total_lines: usize,
    pub me_count: usize,
    pub other_count: usize,
    pub system_count: usize,
    pub unknown_count: usize,
    pub turn_count: usize,
}

impl ConversationStats {
    /// Tally speakers in a single pass and count turns
    pub fn from_lines(lines: &[ParsedLine]) -> Self {
        let mut stats = lines.iter().fold(Self::default(), |mut acc, line| {
            acc.total_lines += 1;
            match line.speaker {
                Speaker::Me => acc.me_count += 1,
                Speaker::Other => acc.other_count += 1,
                Speaker::System => acc.system_count += 1,
                Speaker::Unknown => acc.unknown_count += 1,
            }
            acc
        });
        stats.turn_count = count_turns(lines.iter().map(|l| l.speaker));
        stats
    }

    /// Share of lines that are system notifications (0.0 for no lines)
    pub fn system_ratio(&self) -> f64 {
        if self.total_lines == 0 {
            0.0
        } else {
            self.system_count as f64 / self.total_lines as f64
        }
    }

    /// Convert into report stats, adding the noise flags
    pub fn into_stats(self, has_gibberish: bool, has_system_noise: bool) -> Stats {
        Stats {
            total_lines: self.total_lines,
            me_count: self.me_count,
            other_count: self.other_count,
            system_count: self.system_count,
            unknown_count: self.unknown_count,
            turn_count: self.turn_count,
            has_gibberish,
            has_system_noise,
        }
    }
}

/// Count speaker alternations in line order.
///
/// System and Unknown lines are skipped entirely. The first attributed line
/// only sets the current speaker; every later attributed line that differs
/// from it counts one turn. A strictly alternating six-line exchange therefore
/// yields 5, not 3 round trips.
pub fn count_turns<I>(speakers: I) -> usize
where
    I: IntoIterator<Item = Speaker>,
{
    speakers
        .into_iter()
        .filter(|s| s.is_attributed())
        .fold((None, 0usize), |(last, turns), speaker| match last {
            Some(prev) if prev != speaker => (Some(speaker), turns + 1),
            _ => (Some(speaker), turns),
        })
        .1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Speaker::*;

    fn line(speaker: Speaker) -> ParsedLine {
        ParsedLine {
            speaker,
            content: String::new(),
        }
    }

    #[test]
    fn alternating_exchange_counts_alternations() {
        assert_eq!(count_turns([Me, Other, Me, Other, Me, Other]), 5);
    }

    #[test]
    fn no_attributed_lines_is_zero() {
        assert_eq!(count_turns(Vec::<Speaker>::new()), 0);
        assert_eq!(count_turns([System, Unknown, System]), 0);
    }

    #[test]
    fn first_attributed_line_does_not_count() {
        assert_eq!(count_turns([Other]), 0);
        assert_eq!(count_turns([Me, Me, Me]), 0);
    }

    #[test]
    fn system_and_unknown_do_not_break_runs() {
        // Me, [System], Me is still one speaker; the Other afterwards is one switch
        assert_eq!(count_turns([Me, System, Me, Unknown, Other]), 1);
        assert_eq!(count_turns([Me, Unknown, Other, System, Me]), 2);
    }

    #[test]
    fn consecutive_same_speaker_collapses() {
        assert_eq!(count_turns([Me, Me, Other, Other, Me]), 2);
    }

    #[test]
    fn tallies_partition_lines() {
        let lines = vec![line(Me), line(Other), line(System), line(Unknown), line(Me)];
        let stats = ConversationStats::from_lines(&lines);
        assert_eq!(stats.total_lines, 5);
        assert_eq!(stats.me_count, 2);
        assert_eq!(stats.other_count, 1);
        assert_eq!(stats.system_count, 1);
        assert_eq!(stats.unknown_count, 1);
        assert_eq!(stats.turn_count, 2);
        assert_eq!(
            stats.me_count + stats.other_count + stats.system_count + stats.unknown_count,
            stats.total_lines
        );
    }

    #[test]
    fn system_ratio_handles_empty() {
        assert_eq!(ConversationStats::default().system_ratio(), 0.0);
        let lines = vec![line(System), line(Me), line(Me), line(Me)];
        assert_eq!(ConversationStats::from_lines(&lines).system_ratio(), 0.25);
    }
}
