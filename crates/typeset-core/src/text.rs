//! A string addressed by UTF-16 code units
//!
//! Every range in the layout core is a half-open interval of UTF-16 code
//! units. `Text` keeps the Rust string for the classifiers that want `&str`
//! and the tables needed to translate between the two coordinate systems.

use std::ops::Range;

/// Immutable text with UTF-16 code unit addressing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    string: String,
    units: Vec<u16>,
    /// Byte offset of the character covering each code unit, plus a final
    /// entry equal to the string length.
    unit_bytes: Vec<usize>,
}

impl Text {
    pub fn new(string: impl Into<String>) -> Self {
        let string = string.into();
        let units: Vec<u16> = string.encode_utf16().collect();
        let mut unit_bytes = Vec::with_capacity(units.len() + 1);
        for (byte, ch) in string.char_indices() {
            for _ in 0..ch.len_utf16() {
                unit_bytes.push(byte);
            }
        }
        unit_bytes.push(string.len());

        Self {
            string,
            units,
            unit_bytes,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.string
    }

    pub fn units(&self) -> &[u16] {
        &self.units
    }

    /// Length in UTF-16 code units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Byte offset of the character covering `unit`
    pub fn byte_offset(&self, unit: usize) -> usize {
        assert!(
            unit <= self.len(),
            "code unit {unit} out of bounds for text of {} code units",
            self.len()
        );
        self.unit_bytes[unit]
    }

    /// Code unit offset of a byte offset lying on a character boundary
    pub fn unit_offset(&self, byte: usize) -> usize {
        self.unit_bytes.partition_point(|&b| b < byte)
    }

    /// Character covering `unit` (the whole pair for either surrogate half)
    pub fn char_at(&self, unit: usize) -> Option<char> {
        if unit >= self.len() {
            return None;
        }
        self.string[self.unit_bytes[unit]..].chars().next()
    }

    /// Characters in `range` with the code unit offset each one starts at
    pub fn chars(&self, range: Range<usize>) -> impl Iterator<Item = (usize, char)> + '_ {
        let slice = self.slice(range.clone());
        let mut unit = range.start;
        slice.chars().map(move |ch| {
            let start = unit;
            unit += ch.len_utf16();
            (start, ch)
        })
    }

    /// The string slice covering `range`
    pub fn slice(&self, range: Range<usize>) -> &str {
        self.check_range(&range);
        &self.string[self.unit_bytes[range.start]..self.unit_bytes[range.end]]
    }

    /// Character index of the character covering `unit`
    pub fn char_index(&self, unit: usize) -> usize {
        let byte = self.byte_offset(unit);
        self.string[..byte].chars().count()
    }

    /// Code unit offset of the character at `char_index`
    pub fn unit_index(&self, char_index: usize) -> usize {
        self.string
            .chars()
            .take(char_index)
            .map(char::len_utf16)
            .sum()
    }

    /// Whether the character covering `unit` is whitespace
    pub fn is_whitespace_at(&self, unit: usize) -> bool {
        self.char_at(unit).is_some_and(char::is_whitespace)
    }

    /// Start of the whitespace run that ends `range`
    pub fn trailing_whitespace_start(&self, range: Range<usize>) -> usize {
        let mut start = range.end;
        let slice = self.slice(range.clone());
        for ch in slice.chars().rev() {
            if !ch.is_whitespace() {
                break;
            }
            start -= ch.len_utf16();
        }
        start.max(range.start)
    }

    /// End of the whitespace run that starts `range`
    pub fn leading_whitespace_end(&self, range: Range<usize>) -> usize {
        let mut end = range.start;
        let slice = self.slice(range.clone());
        for ch in slice.chars() {
            if !ch.is_whitespace() {
                break;
            }
            end += ch.len_utf16();
        }
        end.min(range.end)
    }

    /// Panics unless `range` is a valid code unit range of this text
    pub fn check_range(&self, range: &Range<usize>) {
        assert!(
            range.start <= range.end && range.end <= self.len(),
            "code unit range {}..{} out of bounds for text of {} code units",
            range.start,
            range.end,
            self.len()
        );
    }
}

impl From<&str> for Text {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Text {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_offsets() {
        let text = Text::new("Hello");
        assert_eq!(text.len(), 5);
        assert_eq!(text.byte_offset(3), 3);
        assert_eq!(text.unit_offset(3), 3);
        assert_eq!(text.char_at(1), Some('e'));
    }

    #[test]
    fn test_multibyte_offsets() {
        // 'ש' is two bytes and one code unit
        let text = Text::new("aשb");
        assert_eq!(text.len(), 3);
        assert_eq!(text.byte_offset(2), 3);
        assert_eq!(text.unit_offset(3), 2);
        assert_eq!(text.slice(1..2), "ש");
    }

    #[test]
    fn test_surrogate_pairs() {
        // U+1F600 takes two code units
        let text = Text::new("a😀b");
        assert_eq!(text.len(), 4);
        assert_eq!(text.char_at(1), Some('😀'));
        assert_eq!(text.char_at(2), Some('😀'));
        assert_eq!(text.char_index(3), 2);
        assert_eq!(text.unit_index(2), 3);
        let chars: Vec<(usize, char)> = text.chars(0..4).collect();
        assert_eq!(chars, vec![(0, 'a'), (1, '😀'), (3, 'b')]);
    }

    #[test]
    fn test_whitespace_edges() {
        let text = Text::new("  ab  ");
        assert_eq!(text.leading_whitespace_end(0..6), 2);
        assert_eq!(text.trailing_whitespace_start(0..6), 4);
        assert_eq!(text.trailing_whitespace_start(0..2), 0);
        assert!(text.is_whitespace_at(5));
    }

    #[test]
    #[should_panic(expected = "out of bounds")]
    fn test_range_out_of_bounds_panics() {
        let text = Text::new("abc");
        text.slice(1..4);
    }
}
