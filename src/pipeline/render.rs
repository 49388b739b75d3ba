//! Markdown rendering: one deterministic pass over the block sequence.
//!
//! Every block maps to a fixed piece of output followed by a blank separator
//! line; trailing blank lines are stripped at the end. The renderer trusts
//! its input — block invariants (absolute URLs, header row first) were
//! established by the extractor — so there is no error path here and
//! rendering the same sequence twice yields identical output.
//!
//! Known, intentionally preserved limitations: table cells are not escaped
//! and no column-width alignment is attempted.

use crate::block::{Block, EmphasisStyle};

/// Render blocks to a Markdown string.
pub fn render(blocks: &[Block]) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(blocks.len() * 2);

    for block in blocks {
        match block {
            Block::Heading { level, text } => {
                lines.push(format!("{} {}", "#".repeat(*level as usize), text));
            }
            Block::Text { text, .. } => lines.push(text.clone()),
            Block::Emphasis {
                style: EmphasisStyle::Bold,
                text,
            } => lines.push(format!("**{text}**")),
            Block::Emphasis {
                style: EmphasisStyle::Italic,
                text,
            } => lines.push(format!("*{text}*")),
            Block::InlineCode { text } => lines.push(format!("`{text}`")),
            Block::CodeBlock { code } => {
                lines.push("```".to_string());
                lines.push(code.clone());
                lines.push("```".to_string());
            }
            Block::Blockquote { text } => lines.push(format!("> {text}")),
            Block::HorizontalRule => lines.push("---".to_string()),
            Block::Link { href, text } => lines.push(format!("[{text}]({href})")),
            Block::Image { src, alt } => lines.push(format!("![{alt}]({src})")),
            Block::ListItem { ordered, text } => {
                let prefix = if *ordered { "1." } else { "-" };
                lines.push(format!("{prefix} {text}"));
            }
            Block::Table { rows } => {
                // A rowless table produces nothing — not even the separator
                // blank line.
                let Some(header) = rows.first() else { continue };
                lines.push(pipe_row(header));
                lines.push(pipe_row(&vec!["---".to_string(); header.len()]));
                for row in &rows[1..] {
                    lines.push(pipe_row(row));
                }
            }
            Block::Media { tag, src } => {
                lines.push(format!("[{}]({src})", tag.to_string().to_uppercase()));
            }
        }
        lines.push(String::new());
    }

    while lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines.join("\n")
}

fn pipe_row(cells: &[String]) -> String {
    format!("| {} |", cells.join(" | "))
}
