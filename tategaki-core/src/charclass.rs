//! Character classes used by the parser and the layout stages

/// Characters that may not start a line
pub const FORBIDDEN_LINE_START: &[char] = &[
    '、', '。', '，', '．', '・', '：', '；', '？', '！', '‼', '⁇', '⁈', '⁉', '」', '』', '】',
    '〕', '）', '｝', '〉', '》', '］', '〟', '’', '”', '〙', '〗', '｣', '｡', '､', 'ー', '〜',
    '～', '…', '‥', 'ゝ', 'ゞ', '々', 'ヽ', 'ヾ', 'ぁ', 'ぃ', 'ぅ', 'ぇ', 'ぉ', 'っ', 'ゃ', 'ゅ',
    'ょ', 'ゎ', 'ゕ', 'ゖ', 'ァ', 'ィ', 'ゥ', 'ェ', 'ォ', 'ッ', 'ャ', 'ュ', 'ョ', 'ヮ', 'ヵ', 'ヶ',
    ',', '.', ':', ';', '?', '!', ')', ']', '}',
];

/// Characters that may not end a line
pub const FORBIDDEN_LINE_END: &[char] = &[
    '「', '『', '【', '〔', '（', '｛', '〈', '《', '［', '〝', '‘', '“', '〘', '〖', '｢', '(',
    '[', '{',
];

/// Sentence-ending punctuation
pub const SENTENCE_ENDERS: &[char] = &['。', '｡', '．', '！', '？', '!', '?'];

/// Clause separators
pub const CLAUSE_MARKERS: &[char] = &['、', '､', '，', ','];

/// Opening dialogue brackets
pub const DIALOGUE_OPEN: &[char] = &['「', '『'];

/// Closing dialogue brackets
pub const DIALOGUE_CLOSE: &[char] = &['」', '』'];

/// Grammatical particles after which a line may break, longest first
pub const PARTICLES: &[&str] = &[
    "ながら", "から", "まで", "より", "だけ", "しか", "でも", "さえ", "こそ", "つつ", "は", "が",
    "を", "に", "で", "と", "の", "へ", "ば", "て",
];

pub fn is_forbidden_line_start(c: char) -> bool {
    FORBIDDEN_LINE_START.contains(&c)
}

pub fn is_forbidden_line_end(c: char) -> bool {
    FORBIDDEN_LINE_END.contains(&c)
}

pub fn is_sentence_ender(c: char) -> bool {
    SENTENCE_ENDERS.contains(&c)
}

pub fn is_clause_marker(c: char) -> bool {
    CLAUSE_MARKERS.contains(&c)
}

pub fn is_dialogue_open(c: char) -> bool {
    DIALOGUE_OPEN.contains(&c)
}

pub fn is_dialogue_close(c: char) -> bool {
    DIALOGUE_CLOSE.contains(&c)
}

pub fn is_dialogue_bracket(c: char) -> bool {
    is_dialogue_open(c) || is_dialogue_close(c)
}

/// Whether `c` can carry an implicit ruby annotation
pub fn is_ideograph(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{20000}'..='\u{2FA1F}'
        | '々' | '〆' | '〇' | 'ヶ' | 'ヵ'
    )
}

/// Whether a break between `before` and `after` keeps kinsoku rules
pub fn is_legal_break(before: char, after: char) -> bool {
    !is_forbidden_line_end(before) && !is_forbidden_line_start(after)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ideographs() {
        assert!(is_ideograph('漢'));
        assert!(is_ideograph('々'));
        assert!(!is_ideograph('か'));
        assert!(!is_ideograph('カ'));
        assert!(!is_ideograph('A'));
    }

    #[test]
    fn test_legal_break() {
        assert!(is_legal_break('。', 'あ'));
        assert!(!is_legal_break('あ', '。'));
        assert!(!is_legal_break('「', 'あ'));
        assert!(!is_legal_break('あ', '」'));
    }

    #[test]
    fn test_particles_longest_first() {
        let first_single = PARTICLES.iter().position(|p| p.chars().count() == 1).unwrap();
        assert!(PARTICLES[first_single..]
            .iter()
            .all(|p| p.chars().count() == 1));
    }
}
