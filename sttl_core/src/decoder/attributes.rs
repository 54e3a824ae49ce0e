//! Attribute tokenizer for `code=value;code=value;` blocks.

use sttl_schema::CodeTable;

/// Separates attribute pairs inside a block.
pub const PAIR_SEPARATOR: char = ';';

/// Separates an attribute code from its value.
pub const VALUE_SEPARATOR: char = '=';

/// Splits attribute blocks into `(label, value)` pairs.
///
/// Each pair is resolved by matching the longest attribute code that is
/// immediately followed by `=`. Codes are prefixes of one another (`a`, `aa`,
/// `ab`), so a shorter code is only tried when no longer one fits. A code may
/// start anywhere in a segment that is not inside a word, so stray text such
/// as `Name: ai=Annie` still yields `Name`. Values run to the next `;` or the
/// end of the block and may be empty. Segments with no recognizable code are
/// dropped.
#[derive(Debug, Clone, Copy)]
pub struct AttributeTokenizer<'t> {
    table: &'t CodeTable,
}

impl<'t> AttributeTokenizer<'t> {
    pub fn new(table: &'t CodeTable) -> Self {
        Self { table }
    }

    /// Tokenize a block, preserving the order of the pairs.
    pub fn tokenize<'s>(&self, block: &'s str) -> Vec<(&'t str, &'s str)> {
        block
            .split(PAIR_SEPARATOR)
            .filter_map(|segment| self.resolve_pair(segment))
            .collect()
    }

    /// First code in `segment` that starts on a word boundary and is followed
    /// by `=`; the value is everything after that `=`.
    fn resolve_pair<'s>(&self, segment: &'s str) -> Option<(&'t str, &'s str)> {
        if segment.trim().is_empty() {
            return None;
        }

        let mut after_word = false;
        for (start, ch) in segment.char_indices() {
            if !after_word {
                let rest = &segment[start..];
                if let Some(code) = self.table.longest_code_before(rest, VALUE_SEPARATOR) {
                    let label = self.table.label_of(code)?;
                    let value = &rest[code.len() + VALUE_SEPARATOR.len_utf8()..];
                    return Some((label, value));
                }
            }
            after_word = is_word_char(ch);
        }

        tracing::debug!(segment, "dropping attribute with unknown code");
        None
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
