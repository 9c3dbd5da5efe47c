/// One unit of classified notes text, prior to rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupBlock {
    /// Section heading text, leading `#` markers stripped.
    Heading(String),
    /// Single list entry. Bullet markers are stripped; numeric prefixes
    /// (`1.`, `2.`) are retained as part of the text.
    ListItem(String),
    /// Free-form trimmed text line; may be empty.
    Paragraph(String),
}

/// Classify notes text into an ordered block sequence.
///
/// Pure, deterministic, and total: unrecognized lines become paragraphs,
/// never errors. Empty input yields an empty sequence. Splitting is on
/// `\n` so whitespace-only and trailing empty lines are faithfully
/// reproduced as empty paragraphs.
pub fn format(text: &str) -> Vec<MarkupBlock> {
    if text.is_empty() {
        return Vec::new();
    }
    text.split('\n').map(classify_line).collect()
}

/// Per-line classifier. Priority: heading, bullet, numeric list,
/// paragraph.
fn classify_line(line: &str) -> MarkupBlock {
    if line.starts_with('#') {
        return MarkupBlock::Heading(line.trim_start_matches('#').trim().to_string());
    }
    if line.starts_with('-') || line.starts_with('*') {
        return MarkupBlock::ListItem(line[1..].trim().to_string());
    }
    if has_numeric_marker(line) {
        return MarkupBlock::ListItem(line.trim().to_string());
    }
    MarkupBlock::Paragraph(line.trim().to_string())
}

/// True when the line starts with one or more digits followed by `.`.
fn has_numeric_marker(line: &str) -> bool {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0 && line.as_bytes().get(digits) == Some(&b'.')
}
