// this_file: crates/typeset-unicode/src/script.rs

//! Script itemization over UTF-16 code units.
//!
//! Characters of the Common and Inherited scripts take the script of the
//! text around them: the preceding real script when there is one,
//! otherwise the following one.

use std::ops::Range;

use icu_properties::{props::Script, CodePointMapData, CodePointMapDataBorrowed};
use typeset_core::{
    types::{Tag, WritingDirection},
    Text,
};

/// A maximal run of code units sharing one resolved script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptRun {
    pub code_unit_range: Range<usize>,
    pub script: Script,
    /// ISO 15924 tag of `script`
    pub tag: Tag,
}

impl ScriptRun {
    /// Direction the script is written in when no bidi override applies.
    pub fn direction(&self) -> WritingDirection {
        script_direction(self.script)
    }
}

/// Resolved script of every code unit of a text.
#[derive(Debug, Clone, Default)]
pub struct ScriptClassifier {
    scripts: Vec<Script>,
}

impl ScriptClassifier {
    pub fn new(text: &Text) -> Self {
        let map: CodePointMapDataBorrowed<'static, Script> = CodePointMapData::<Script>::new();

        let mut scripts = Vec::with_capacity(text.len());
        let mut current: Option<Script> = None;
        let mut pending = 0usize;
        for (_, ch) in text.chars(0..text.len()) {
            let script = map.get(ch);
            let resolved = if is_real_script(script) {
                if current.is_none() {
                    // Leading neutrals take the first real script.
                    for slot in &mut scripts[..pending] {
                        *slot = script;
                    }
                }
                current = Some(script);
                script
            } else {
                if current.is_none() {
                    pending += ch.len_utf16();
                }
                current.unwrap_or(script)
            };
            for _ in 0..ch.len_utf16() {
                scripts.push(resolved);
            }
        }

        Self { scripts }
    }

    /// Resolved script of the code unit at `index`.
    pub fn script_at(&self, index: usize) -> Script {
        self.scripts[index]
    }

    /// Script runs of `range` in logical order.
    pub fn runs(&self, range: Range<usize>) -> Vec<ScriptRun> {
        let mut runs: Vec<ScriptRun> = Vec::new();
        for index in range {
            let script = self.scripts[index];
            match runs.last_mut() {
                Some(run) if run.script == script => run.code_unit_range.end = index + 1,
                _ => runs.push(ScriptRun {
                    code_unit_range: index..index + 1,
                    script,
                    tag: script_tag(script),
                }),
            }
        }
        runs
    }
}

fn is_real_script(script: Script) -> bool {
    !matches!(script, Script::Common | Script::Inherited | Script::Unknown)
}

/// Natural writing direction of `script`.
pub fn script_direction(script: Script) -> WritingDirection {
    match script {
        Script::Arabic
        | Script::Hebrew
        | Script::Syriac
        | Script::Thaana
        | Script::Nko
        | Script::Samaritan
        | Script::Mandaic
        | Script::Adlam
        | Script::HanifiRohingya
        | Script::Yezidi
        | Script::ImperialAramaic
        | Script::Phoenician
        | Script::Kharoshthi
        | Script::Avestan
        | Script::MendeKikakui
        | Script::OldHungarian => WritingDirection::RightToLeft,
        _ => WritingDirection::LeftToRight,
    }
}

/// ISO 15924 tag for `script`.
///
/// Scripts outside the table map to `Zzzz`.
pub fn script_tag(script: Script) -> Tag {
    let tag: &[u8; 4] = match script {
        Script::Common => b"Zyyy",
        Script::Inherited => b"Zinh",
        Script::Adlam => b"Adlm",
        Script::Arabic => b"Arab",
        Script::Armenian => b"Armn",
        Script::Balinese => b"Bali",
        Script::Bengali => b"Beng",
        Script::Bopomofo => b"Bopo",
        Script::Braille => b"Brai",
        Script::Cherokee => b"Cher",
        Script::Coptic => b"Copt",
        Script::Cyrillic => b"Cyrl",
        Script::Devanagari => b"Deva",
        Script::Ethiopic => b"Ethi",
        Script::Georgian => b"Geor",
        Script::Greek => b"Grek",
        Script::Gujarati => b"Gujr",
        Script::Gurmukhi => b"Guru",
        Script::Han => b"Hani",
        Script::Hangul => b"Hang",
        Script::Hebrew => b"Hebr",
        Script::Hiragana => b"Hira",
        Script::Javanese => b"Java",
        Script::Kannada => b"Knda",
        Script::Katakana => b"Kana",
        Script::Khmer => b"Khmr",
        Script::Lao => b"Laoo",
        Script::Latin => b"Latn",
        Script::Malayalam => b"Mlym",
        Script::Mandaic => b"Mand",
        Script::Mongolian => b"Mong",
        Script::Myanmar => b"Mymr",
        Script::Nko => b"Nkoo",
        Script::Ogham => b"Ogam",
        Script::Oriya => b"Orya",
        Script::Runic => b"Runr",
        Script::Samaritan => b"Samr",
        Script::Sinhala => b"Sinh",
        Script::Syriac => b"Syrc",
        Script::Tamil => b"Taml",
        Script::Telugu => b"Telu",
        Script::Thaana => b"Thaa",
        Script::Thai => b"Thai",
        Script::Tibetan => b"Tibt",
        Script::Tifinagh => b"Tfng",
        Script::Vai => b"Vaii",
        Script::Yi => b"Yiii",
        _ => b"Zzzz",
    };
    Tag::new(tag)
}
