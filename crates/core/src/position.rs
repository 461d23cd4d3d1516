/// A zero-based line and UTF-16 code-unit column, the editor protocol's
/// text addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextPosition {
    pub line: u32,
    pub character: u32,
}

impl TextPosition {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Byte offset of a protocol position within `text`.
///
/// A line past the end of the document clamps to the document end; a column
/// past the end of its line clamps to the line end. Columns count UTF-16
/// code units, so characters outside the Basic Multilingual Plane count as
/// two; a column landing inside a surrogate pair clamps to the character
/// boundary before it.
pub fn offset_at(text: &str, pos: TextPosition) -> usize {
    let mut offset = 0;
    let mut remaining_lines = pos.line;

    while remaining_lines > 0 {
        match text[offset..].find('\n') {
            Some(i) => {
                offset += i + 1;
                remaining_lines -= 1;
            }
            None => return text.len(),
        }
    }

    let mut remaining_units = pos.character;
    for (i, c) in text[offset..].char_indices() {
        if remaining_units == 0 || c == '\n' || c == '\r' {
            return offset + i;
        }
        let width = c.len_utf16() as u32;
        if width > remaining_units {
            return offset + i;
        }
        remaining_units -= width;
    }

    text.len()
}

/// The text selected between two protocol positions.
pub fn slice_range(text: &str, start: TextPosition, end: TextPosition) -> &str {
    let start_offset = offset_at(text, start);
    let end_offset = offset_at(text, end).max(start_offset);
    &text[start_offset..end_offset]
}

/// Replace the text between two protocol positions, returning the new
/// document text. Used for incremental document synchronization.
pub fn replace_range(text: &str, start: TextPosition, end: TextPosition, new_text: &str) -> String {
    let start_offset = offset_at(text, start);
    let end_offset = offset_at(text, end).max(start_offset);

    let mut out = String::with_capacity(text.len() - (end_offset - start_offset) + new_text.len());
    out.push_str(&text[..start_offset]);
    out.push_str(new_text);
    out.push_str(&text[end_offset..]);
    out
}
