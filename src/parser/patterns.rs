//! Pattern tables for speaker classification.
//!
//! Tables are compiled once per process and shared read-only; see
//! [`global_patterns`].

use regex::Regex;

/// Token that marks a self-authored line. A permissive "Name:" prefix that
/// starts with it is never treated as the other party.
pub const SELF_TOKEN: char = '我';

/// Platform notification signatures (timestamps, recalls, calls, transfers,
/// group membership). Anchored where the notification is the whole line.
const SYSTEM_PATTERNS: &[&str] = &[
    // 12:30, 09:15:02
    r"^\d{1,2}:\d{2}(:\d{2})?$",
    // 2024-03-01, 2024/3/1 12:30, 2024年3月1日
    r"^\d{4}[-/年]\d{1,2}[-/月]\d{1,2}日?(\s+\d{1,2}:\d{2}(:\d{2})?)?$",
    // 3月1日, 3月1日 下午 2:30
    r"^\d{1,2}月\d{1,2}日(\s*(上午|下午|中午|晚上|凌晨)?\s*\d{1,2}:\d{2})?$",
    // 昨天 21:04, 星期三 08:00, 周五, 上午 10:12
    r"^(昨天|今天|前天|刚刚|星期[一二三四五六日天]|周[一二三四五六日天])(\s*(上午|下午|中午|晚上|凌晨)?\s*\d{1,2}:\d{2})?$",
    r"^(上午|下午|中午|晚上|凌晨)\s*\d{1,2}:\d{2}$",
    // Notifications below never carry a "Name:" prefix
    r"^[^:：]*撤回了一条消息",
    r"(?i)^[^:]*recalled a message$",
    // Voice/video calls
    r"^(语音|视频)通话",
    r"^[^:：]*通话时长\s*\d",
    r"^(对方)?(已取消|已拒绝|未接听|无应答|忙线中)$",
    // Transfers and red packets
    r"^\[(转账|红包|语音|图片|视频|表情|文件|位置|链接|动画表情|聊天记录)\]",
    r"^[^:：]{0,12}(已收款|已被领取|领取了.{0,12}红包|向你转账|转账给你)",
    // Group membership
    r"^[^:：]*邀请.{1,20}加入了群聊",
    r"^[^:：]*(加入了群聊|移出了群聊|退出了群聊|修改群名为)",
    // Friend request acknowledgements
    r"^[^:：]*(你已添加了|以上是打招呼的内容|现在可以开始聊天了)",
    r"^(以下为新消息|消息已发出，但被对方拒收了)",
];

/// Self-authored prefixes. The whole match is stripped from the content.
const ME_PATTERNS: &[&str] = &[
    r"^我\s*[:：]\s*",
    r"(?i)^(me|myself|i)\s*[:：]\s*",
    r"^(本人|自己)\s*[:：]\s*",
    r"^\[我\]\s*",
];

/// Explicit other-party markers.
const OTHER_PATTERNS: &[&str] = &[
    r"^(对方|他|她|ta|TA|Ta)\s*[:：]\s*",
    r"(?i)^(other|them|they|him|her|partner)\s*[:：]\s*",
    r"^(男朋友|女朋友|男友|女友|老公|老婆|对象|妈妈|爸爸|老板|同事)\s*[:：]\s*",
    r"^\[对方\]\s*",
];

/// Permissive fallback: any short name followed by a separator.
const NAME_PREFIX_PATTERN: &str = r"^[^\s:：]{1,10}\s*[:：]\s*";

/// Compiled pattern tables
pub struct PatternSet {
    pub system: Vec<Regex>,
    pub me: Vec<Regex>,
    pub other: Vec<Regex>,
    pub name_prefix: Option<Regex>,
}

impl PatternSet {
    /// Compile all tables. Patterns are literals; a failure is a bug in the
    /// tables and surfaces in the tests below.
    pub fn new() -> Self {
        Self {
            system: compile_all(SYSTEM_PATTERNS),
            me: compile_all(ME_PATTERNS),
            other: compile_all(OTHER_PATTERNS),
            name_prefix: compile_all(&[NAME_PREFIX_PATTERN]).into_iter().next(),
        }
    }
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::new()
    }
}

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| match Regex::new(p) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::error!(pattern = %p, error = %e, "invalid speaker pattern skipped");
                None
            }
        })
        .collect()
}

/// Global pattern tables (compile once per process).
pub fn global_patterns() -> &'static PatternSet {
    use std::sync::OnceLock;
    static PATTERNS: OnceLock<PatternSet> = OnceLock::new();
    PATTERNS.get_or_init(PatternSet::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_tables_compile() {
        for p in SYSTEM_PATTERNS.iter().chain(ME_PATTERNS).chain(OTHER_PATTERNS) {
            assert!(Regex::new(p).is_ok(), "pattern failed to compile: {}", p);
        }
        assert!(Regex::new(NAME_PREFIX_PATTERN).is_ok());
        let set = PatternSet::new();
        assert_eq!(set.system.len(), SYSTEM_PATTERNS.len());
        assert_eq!(set.me.len(), ME_PATTERNS.len());
        assert_eq!(set.other.len(), OTHER_PATTERNS.len());
        assert!(set.name_prefix.is_some());
    }

    #[test]
    fn name_prefix_is_limited_to_ten_chars() {
        let re = global_patterns().name_prefix.as_ref().unwrap();
        assert!(re.is_match("小明: 你好"));
        assert!(re.is_match("abcdefghij: hi"));
        assert!(!re.is_match("abcdefghijk: hi"));
        assert!(!re.is_match("no separator here"));
    }
}
