//! Notes markup formatting.
//!
//! Converts semi-structured notes text into classified blocks, renders
//! them as markup, and exports rendered markup back to plain text for
//! the clipboard. Classification and rendering are separate stages so
//! each is independently testable.

mod export;
mod formatter;
mod render;

pub use {
    export::to_plain_text,
    formatter::{MarkupBlock, format},
    render::render,
};
