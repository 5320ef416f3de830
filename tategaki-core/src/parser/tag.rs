//! Recognition of the directives found inside `［＃...］`

use crate::types::{HeadingLevel, TextSizeKind, SESAME_DOT};
use regex::Regex;
use std::sync::LazyLock;

const NUMBER: &str = r"[0-9０-９〇一二三四五六七八九十]+";

/// Deepest indent a directive may ask for; larger counts leave the tag literal
const MAX_INDENT: u32 = 100;

static EMPHASIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^「(.+)」に(傍点|白ゴマ傍点|丸傍点|白丸傍点|黒三角傍点|白三角傍点|二重丸傍点|蛇の目傍点|ばつ傍点)$")
        .expect("emphasis pattern")
});

static HEADING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^「(.+)」は([大中小])見出し$").expect("heading pattern"));

static INDENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^(?:天から)?({NUMBER})字下げ$")).expect("indent pattern")
});

static BLOCK_INDENT_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^ここから({NUMBER})字下げ$")).expect("block indent pattern")
});

static TEXT_SIZE_OPEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"^({NUMBER})段階(小さ|大き)な文字$")).expect("text size pattern")
});

static TEXT_SIZE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(小さ|大き)な文字終わり$").expect("text size close pattern"));

static SPECIAL_CHAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^「([^」]+)」(.*)$").expect("special char pattern"));

static JIS_CODE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:第[34]水準)?[12]-\d{1,2}-\d{1,2}").expect("jis code pattern")
});

static UNICODE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"U\+([0-9A-Fa-f]{4,6})").expect("unicode pattern"));

/// A recognized directive
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Tag {
    /// Emphasis marks over a preceding run
    Emphasis { target: String, mark: &'static str },
    /// Heading over a preceding run
    Heading { target: String, level: HeadingLevel },
    /// Inline indentation by a number of full-width spaces
    Indent(u32),
    BlockIndentOpen(u32),
    BlockIndentClose,
    TextSizeOpen { size: TextSizeKind, steps: u8 },
    TextSizeClose(TextSizeKind),
    SpecialChar {
        description: String,
        unicode: Option<String>,
        code: Option<String>,
    },
}

impl Tag {
    /// Recognize the content between `［＃` and `］`; `None` means literal text
    pub(crate) fn recognize(content: &str) -> Option<Tag> {
        if let Some(caps) = EMPHASIS.captures(content) {
            return Some(Tag::Emphasis {
                target: caps[1].to_string(),
                mark: emphasis_mark(&caps[2]),
            });
        }

        if let Some(caps) = HEADING.captures(content) {
            let level = caps[2].chars().next().and_then(HeadingLevel::from_marker)?;
            return Some(Tag::Heading {
                target: caps[1].to_string(),
                level,
            });
        }

        if content == "ここで字下げ終わり" {
            return Some(Tag::BlockIndentClose);
        }

        if let Some(caps) = BLOCK_INDENT_OPEN.captures(content) {
            return indent_count(&caps[1]).map(Tag::BlockIndentOpen);
        }

        if let Some(caps) = INDENT.captures(content) {
            return indent_count(&caps[1]).map(Tag::Indent);
        }

        if let Some(caps) = TEXT_SIZE_OPEN.captures(content) {
            let steps = parse_japanese_number(&caps[1])?;
            return Some(Tag::TextSizeOpen {
                size: size_kind(&caps[2]),
                steps: u8::try_from(steps).unwrap_or(u8::MAX),
            });
        }

        if let Some(caps) = TEXT_SIZE_CLOSE.captures(content) {
            return Some(Tag::TextSizeClose(size_kind(&caps[1])));
        }

        if let Some(caps) = SPECIAL_CHAR.captures(content) {
            let rest = &caps[2];
            let unicode = UNICODE_CODE
                .captures(rest)
                .map(|u| format!("U+{}", u[1].to_ascii_uppercase()));
            let code = JIS_CODE.find(rest).map(|m| m.as_str().to_string());
            if unicode.is_some() || code.is_some() {
                return Some(Tag::SpecialChar {
                    description: caps[1].to_string(),
                    unicode,
                    code,
                });
            }
        }

        None
    }
}

fn size_kind(marker: &str) -> TextSizeKind {
    if marker == "大き" {
        TextSizeKind::Large
    } else {
        TextSizeKind::Small
    }
}

fn emphasis_mark(name: &str) -> &'static str {
    match name {
        "白ゴマ傍点" => "﹆",
        "丸傍点" => "●",
        "白丸傍点" => "○",
        "黒三角傍点" => "▲",
        "白三角傍点" => "△",
        "二重丸傍点" => "◎",
        "蛇の目傍点" => "◉",
        "ばつ傍点" => "×",
        _ => SESAME_DOT,
    }
}

/// Parse ASCII, full-width or kanji numerals (`3`, `３`, `三`, `十二`, `二十`)
fn indent_count(s: &str) -> Option<u32> {
    parse_japanese_number(s).filter(|&n| n <= MAX_INDENT)
}

pub(crate) fn parse_japanese_number(s: &str) -> Option<u32> {
    if s.is_empty() {
        return None;
    }

    let mut total: u32 = 0;
    let mut current: u32 = 0;
    for c in s.chars() {
        let digit = match c {
            '0'..='9' => c as u32 - '0' as u32,
            '０'..='９' => c as u32 - '０' as u32,
            '〇' => 0,
            '一' => 1,
            '二' => 2,
            '三' => 3,
            '四' => 4,
            '五' => 5,
            '六' => 6,
            '七' => 7,
            '八' => 8,
            '九' => 9,
            '十' => {
                total = total.checked_add(current.max(1).checked_mul(10)?)?;
                current = 0;
                continue;
            }
            _ => return None,
        };
        current = current.checked_mul(10)?.checked_add(digit)?;
    }
    total.checked_add(current)
}

/// Resolve a `U+XXXX` designation to its character
pub(crate) fn resolve_unicode(designation: &str) -> Option<char> {
    let hex = designation.strip_prefix("U+")?;
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}
