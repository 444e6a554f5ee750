use thiserror::Error;

use crate::types::BlockType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line_no}: indentation at depth {depth} steps outside of its block")]
    Structural { line_no: usize, depth: usize },

    #[error("line {line_no}: '{keyword}' is not a block type")]
    InvalidBlockType { line_no: usize, keyword: String },

    #[error("line {line_no}: '{field}' expects {expected} argument(s), found {found}")]
    InvalidArity {
        line_no: usize,
        field: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("line {line_no}: '{value}' is not an integer")]
    InvalidNumber { line_no: usize, value: String },

    #[error("line {line_no}: action has no 'set' field")]
    MissingSetField { line_no: usize },

    #[error("line {line_no}: {block_type} blocks are not interpreted")]
    UnsupportedBlock { line_no: usize, block_type: BlockType },
}

impl ParseError {
    pub fn line_no(&self) -> usize {
        match self {
            ParseError::Structural { line_no, .. }
            | ParseError::InvalidBlockType { line_no, .. }
            | ParseError::InvalidArity { line_no, .. }
            | ParseError::InvalidNumber { line_no, .. }
            | ParseError::MissingSetField { line_no }
            | ParseError::UnsupportedBlock { line_no, .. } => *line_no,
        }
    }
}

/// A [`ParseError`] tagged with the block it came from.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} block at line {header_line_no}: {source}", block_label(.block_type))]
pub struct BlockError {
    pub block_type: Option<BlockType>,
    pub header_line_no: usize,
    #[source]
    pub source: ParseError,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Block(#[from] BlockError),
    #[error("failed to render missions: {0}")]
    Json(#[from] serde_json::Error),
}

fn block_label(block_type: &Option<BlockType>) -> &'static str {
    block_type.map_or("unknown", BlockType::keyword)
}
