// this_file: crates/typeset-unicode/src/mirror.rs

//! Bidi mirroring for the characters that commonly appear in RTL text.
//!
//! The table covers the paired brackets, comparison signs and quotation
//! marks of the Bidi_Mirroring_Glyph property that real-world text uses.

/// Return the mirrored counterpart of `ch`, if it has one.
pub fn mirrored(ch: char) -> Option<char> {
    let mirror = match ch {
        '(' => ')',
        ')' => '(',
        '<' => '>',
        '>' => '<',
        '[' => ']',
        ']' => '[',
        '{' => '}',
        '}' => '{',
        '«' => '»',
        '»' => '«',
        '‹' => '›',
        '›' => '‹',
        '⁅' => '⁆',
        '⁆' => '⁅',
        '⁽' => '⁾',
        '⁾' => '⁽',
        '₍' => '₎',
        '₎' => '₍',
        '≤' => '≥',
        '≥' => '≤',
        '≪' => '≫',
        '≫' => '≪',
        '⊂' => '⊃',
        '⊃' => '⊂',
        '⊆' => '⊇',
        '⊇' => '⊆',
        '⌈' => '⌉',
        '⌉' => '⌈',
        '⌊' => '⌋',
        '⌋' => '⌊',
        '〈' => '〉',
        '〉' => '〈',
        '⟨' => '⟩',
        '⟩' => '⟨',
        '⟦' => '⟧',
        '⟧' => '⟦',
        '〈' => '〉',
        '〉' => '〈',
        '《' => '》',
        '》' => '《',
        '「' => '」',
        '」' => '「',
        '『' => '』',
        '』' => '『',
        '【' => '】',
        '】' => '【',
        '〔' => '〕',
        '〕' => '〔',
        '（' => '）',
        '）' => '（',
        '［' => '］',
        '］' => '［',
        '｛' => '｝',
        '｝' => '｛',
        '＜' => '＞',
        '＞' => '＜',
        _ => return None,
    };
    Some(mirror)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mirrors_ascii_brackets() {
        assert_eq!(mirrored('('), Some(')'));
        assert_eq!(mirrored(']'), Some('['));
        assert_eq!(mirrored('{'), Some('}'));
        assert_eq!(mirrored('>'), Some('<'));
    }

    #[test]
    fn mirrors_quotation_marks() {
        assert_eq!(mirrored('«'), Some('»'));
        assert_eq!(mirrored('›'), Some('‹'));
    }

    #[test]
    fn mirroring_is_an_involution() {
        for ch in ['(', '≤', '⟨', '「', '（', '⌊'] {
            let mirror = mirrored(ch).unwrap();
            assert_eq!(mirrored(mirror), Some(ch));
        }
    }

    #[test]
    fn leaves_other_characters_alone() {
        assert_eq!(mirrored('a'), None);
        assert_eq!(mirrored('א'), None);
        assert_eq!(mirrored('"'), None);
    }
}
