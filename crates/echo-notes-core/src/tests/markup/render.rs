use crate::markup::{MarkupBlock, format, render};

/// WHAT: Consecutive list items share a single list container
/// WHY: One logical list must not render as several
#[test]
fn given_consecutive_items_when_rendered_then_single_container() {
    // Given: A heading followed by a run of items
    let blocks = vec![
        MarkupBlock::Heading("Topics".to_string()),
        MarkupBlock::ListItem("first".to_string()),
        MarkupBlock::ListItem("second".to_string()),
    ];

    // When: Rendering
    let markup = render(&blocks);

    // Then: Both items sit in one container
    assert_eq!(
        markup,
        "<h3>Topics</h3><ul><li>first</li><li>second</li></ul>"
    );
}

/// WHAT: A paragraph between item runs splits the list in two
#[test]
fn given_interrupted_items_when_rendered_then_two_containers() {
    // Given: Two item runs separated by a paragraph
    let blocks = vec![
        MarkupBlock::ListItem("a".to_string()),
        MarkupBlock::Paragraph("aside".to_string()),
        MarkupBlock::ListItem("b".to_string()),
    ];

    // When: Rendering
    let markup = render(&blocks);

    // Then: Each run gets its own container
    assert_eq!(markup, "<ul><li>a</li></ul><p>aside</p><ul><li>b</li></ul>");
}

/// WHAT: A trailing list run is closed at the end of output
#[test]
fn given_trailing_items_when_rendered_then_container_closed() {
    let blocks = vec![MarkupBlock::ListItem("last".to_string())];
    assert_eq!(render(&blocks), "<ul><li>last</li></ul>");
}

/// WHAT: No blocks render to the empty string
#[test]
fn given_no_blocks_when_rendered_then_empty() {
    assert_eq!(render(&[]), "");
}

/// WHAT: Formatting then rendering the same text is repeatable
/// WHY: Re-running a session's output through the pipeline must not drift
#[test]
fn given_same_text_when_rendered_twice_then_identical_markup() {
    let text = "# Summary\n- one\n- two\n\n1. numbered\nclosing remark";
    let first = render(&format(text));
    let second = render(&format(text));
    assert_eq!(first, second);
    assert_eq!(
        first,
        "<h3>Summary</h3><ul><li>one</li><li>two</li></ul>\
         <p></p><ul><li>1. numbered</li></ul><p>closing remark</p>"
    );
}
