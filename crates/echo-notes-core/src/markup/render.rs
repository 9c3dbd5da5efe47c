use crate::markup::MarkupBlock;

/// Render a block sequence as markup.
///
/// A maximal run of consecutive list items is wrapped in a single
/// `<ul>` container; headings and paragraphs render standalone, in
/// original order. The projection is deterministic, so rendering the
/// same sequence twice yields identical markup.
pub fn render(blocks: &[MarkupBlock]) -> String {
    let mut out = String::new();
    let mut in_list = false;

    for block in blocks {
        match block {
            MarkupBlock::ListItem(text) => {
                if !in_list {
                    out.push_str("<ul>");
                    in_list = true;
                }
                out.push_str("<li>");
                out.push_str(text);
                out.push_str("</li>");
            }
            MarkupBlock::Heading(text) => {
                if in_list {
                    out.push_str("</ul>");
                    in_list = false;
                }
                out.push_str("<h3>");
                out.push_str(text);
                out.push_str("</h3>");
            }
            MarkupBlock::Paragraph(text) => {
                if in_list {
                    out.push_str("</ul>");
                    in_list = false;
                }
                out.push_str("<p>");
                out.push_str(text);
                out.push_str("</p>");
            }
        }
    }

    if in_list {
        out.push_str("</ul>");
    }

    out
}
