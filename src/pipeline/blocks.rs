//! Flatten a page body's block sequence into line-oriented marked-up text.
//!
//! One block becomes one line. Structure that the line parsers need later is
//! kept as textual prefixes:
//!
//! | Block                | Line                     |
//! |----------------------|--------------------------|
//! | `heading_1..3`       | `# `, `## `, `### ` + text |
//! | `bulleted_list_item` | `- ` + text              |
//! | `numbered_list_item` | `1. ` + text             |
//! | `paragraph`          | text                     |
//! | anything else        | empty line               |
//!
//! Bold runs are wrapped in `**…**` in every text-bearing block. Numbered
//! items always use `1.`; consumers only test the prefix.

use crate::model::{Block, RichText};

/// Join the flattened lines of `blocks` with `\n`.
pub fn flatten_blocks(blocks: &[Block]) -> String {
    blocks
        .iter()
        .map(flatten_block)
        .collect::<Vec<_>>()
        .join("\n")
}

fn flatten_block(block: &Block) -> String {
    match block {
        Block::Paragraph { paragraph } => inline(&paragraph.rich_text),
        Block::Heading1 { heading_1 } => format!("# {}", inline(&heading_1.rich_text)),
        Block::Heading2 { heading_2 } => format!("## {}", inline(&heading_2.rich_text)),
        Block::Heading3 { heading_3 } => format!("### {}", inline(&heading_3.rich_text)),
        Block::BulletedListItem { bulleted_list_item } => {
            format!("- {}", inline(&bulleted_list_item.rich_text))
        }
        Block::NumberedListItem { numbered_list_item } => {
            format!("1. {}", inline(&numbered_list_item.rich_text))
        }
        Block::Other => String::new(),
    }
}

fn inline(runs: &[RichText]) -> String {
    let mut line = String::new();
    for run in runs {
        if run.annotations.bold && !run.plain_text.is_empty() {
            line.push_str("**");
            line.push_str(&run.plain_text);
            line.push_str("**");
        } else {
            line.push_str(&run.plain_text);
        }
    }
    line
}
