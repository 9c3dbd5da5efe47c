/// Convert rendered notes markup to plain text for export.
///
/// Best-effort textual inverse of [`render`](crate::markup::render),
/// operating on the rendered markup rather than the block sequence:
/// headings become a line framed by blank lines, list containers are
/// unwrapped to one `  • ` line per item, paragraphs become single
/// lines. Information not preserved by rendering (bullet vs numeric
/// items) is lost here; that is accepted lossy behavior.
pub fn to_plain_text(rendered: &str) -> String {
    let mut out = String::with_capacity(rendered.len());
    let mut rest = rendered;

    loop {
        let Some(start) = rest.find('<') else {
            out.push_str(rest);
            break;
        };
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let Some(end) = after.find('>') else {
            // Unterminated tag: keep the remainder verbatim.
            out.push_str(&rest[start..]);
            break;
        };
        match &after[..end] {
            "h3" | "/h3" | "ul" | "/ul" => out.push('\n'),
            "li" => out.push_str("  \u{2022} "),
            "/li" | "/p" => out.push('\n'),
            "p" => {}
            // Unknown tags carry no text of their own; skip them.
            _ => {}
        }
        rest = &after[end + 1..];
    }

    out
}
