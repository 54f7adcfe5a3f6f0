//! Whole-text noise detection: gibberish and advertisement/spam.
//!
//! Both detectors work on the raw transcript rather than parsed lines and are
//! independent of each other. Each is a short-circuiting OR over its signature
//! table.

use regex::Regex;
use std::sync::OnceLock;

/// A character repeated this many times in a row counts as gibberish
pub const MAX_CHAR_REPEAT: usize = 11;

/// Gibberish signatures that can be expressed as a regex
const GIBBERISH_PATTERNS: &[&str] = &[
    // Placeholder boxes and classic GBK/UTF-8 mojibake glyphs
    r"[□■◇◆▯▮◻◼锟斤拷烫屯]{3,}",
    // Control characters other than tab and line breaks
    r"[\x00-\x08\x0B\x0C\x0E-\x1F\x7F]{2,}",
    // Keyboard mashing: a long unbroken run of Latin letters
    r"[A-Za-z]{20,}",
    // Unicode replacement characters from a broken decode
    r"\x{FFFD}{2,}",
];

/// Promotional phrases, bare URLs and redeemable-code formats
const AD_PATTERNS: &[&str] = &[
    r"(?i)https?://\S+",
    r"(?i)\bwww\.[a-z0-9-]+\.[a-z]{2,}",
    r"(?i)\b[a-z0-9-]+\.(com|cn|net|top|xyz|vip|shop)(/\S*)?\b",
    r"(加微信|加我微信|加[vV]信?|[vV][xX][:：]|微信号[:：]?|扫码|二维码|私聊领取)",
    r"(优惠券|免费领取|限时(优惠|特价|抢购)|点击链接|复制链接|立即下单|包邮)",
    r"(兼职|日赚|日结|刷单|代理招募|躺赚|月入[过上]?万)",
    // Taobao-style share tokens: ￥AbCd1234￥
    r"[￥¥$€][A-Za-z0-9]{8,}[￥¥$€]",
    r"(口令|兑换码|邀请码|优惠码)[:：]?\s*[A-Za-z0-9]{4,}",
];

/// Flags produced by running both detectors
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoiseFlags {
    pub gibberish: bool,
    pub ad_content: bool,
}

/// Detector for gibberish and advertisement content
pub struct NoiseDetector {
    gibberish: &'static [Regex],
    ads: &'static [Regex],
}

impl NoiseDetector {
    pub fn new() -> Self {
        static GIBBERISH: OnceLock<Vec<Regex>> = OnceLock::new();
        static ADS: OnceLock<Vec<Regex>> = OnceLock::new();
        Self {
            gibberish: GIBBERISH.get_or_init(|| compile_all(GIBBERISH_PATTERNS)),
            ads: ADS.get_or_init(|| compile_all(AD_PATTERNS)),
        }
    }

    /// Run both detectors over the full text
    pub fn detect(&self, text: &str) -> NoiseFlags {
        NoiseFlags {
            gibberish: self.has_gibberish(text),
            ad_content: self.has_ad_content(text),
        }
    }

    /// True if the text carries any corruption or non-linguistic signature
    pub fn has_gibberish(&self, text: &str) -> bool {
        self.gibberish.iter().any(|re| re.is_match(text)) || has_long_repeat(text)
    }

    /// True if any promotional phrase, URL or redeem code appears
    pub fn has_ad_content(&self, text: &str) -> bool {
        self.ads.iter().any(|re| re.is_match(text))
    }
}

impl Default for NoiseDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// The regex crate has no backreferences, so runs of one repeated character
/// are counted by hand. Runs of line breaks (blank lines) are ignored.
fn has_long_repeat(text: &str) -> bool {
    let mut prev: Option<char> = None;
    let mut run = 0usize;
    for c in text.chars() {
        if Some(c) == prev {
            run += 1;
        } else {
            prev = Some(c);
            run = 1;
        }
        if run >= MAX_CHAR_REPEAT && c != '\n' && c != '\r' {
            return true;
        }
    }
    false
}

fn compile_all(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .filter_map(|p| match Regex::new(p) {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::error!(pattern = %p, error = %e, "invalid noise pattern skipped");
                None
            }
        })
        .collect()
}
