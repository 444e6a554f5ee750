use log::{debug, info, warn};

use crate::ast::{Block, NodeId, SourceLine, Tree};
use crate::error::{BlockError, ParseError};
use crate::lexer::{self, Lexed, Tag};
use crate::parser;
use crate::types::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first malformed block.
    #[default]
    FailFast,
    /// Record every block error and keep parsing sibling blocks.
    Collect,
}

#[derive(Debug, Clone)]
pub struct ParseOptions {
    pub indent_char: char,
    pub error_policy: ErrorPolicy,
    /// Fail on block types that are recognised but have no interpreter,
    /// instead of passing them through as [`OpaqueBlock`]s.
    pub require_full_interpretation: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            indent_char: '\t',
            error_policy: ErrorPolicy::FailFast,
            require_full_interpretation: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParseReport {
    /// Successfully interpreted blocks, in source order.
    pub blocks: Vec<ParsedBlock>,
    pub errors: Vec<BlockError>,
}

impl ParseReport {
    pub fn missions(&self) -> impl Iterator<Item = &Mission> {
        self.blocks.iter().filter_map(ParsedBlock::as_mission)
    }

    pub fn into_missions(self) -> Vec<Mission> {
        self.blocks
            .into_iter()
            .filter_map(|block| match block {
                ParsedBlock::Mission(mission) => Some(mission),
                ParsedBlock::Opaque(_) => None,
            })
            .collect()
    }
}

#[derive(Debug, Default)]
pub struct Interpreter {
    options: ParseOptions,
}

impl Interpreter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    pub fn interpret(&self, blocks: Vec<Block>) -> Result<ParseReport, BlockError> {
        let mut report = ParseReport::default();

        for block in &blocks {
            match self.interpret_block(block) {
                Ok(Some(parsed)) => report.blocks.push(parsed),
                Ok(None) => {}
                Err(err) => match self.options.error_policy {
                    ErrorPolicy::FailFast => return Err(err),
                    ErrorPolicy::Collect => {
                        warn!("skipping {}", err);
                        report.errors.push(err);
                    }
                },
            }
        }

        info!(
            "interpreted {} of {} blocks ({} missions, {} errors)",
            report.blocks.len(),
            blocks.len(),
            report.missions().count(),
            report.errors.len()
        );
        Ok(report)
    }

    pub fn interpret_block(&self, block: &Block) -> Result<Option<ParsedBlock>, BlockError> {
        let Some(header) = block.header() else {
            return Ok(None);
        };
        let in_block = |block_type: Option<BlockType>, source: ParseError| BlockError {
            block_type,
            header_line_no: header.line_no,
            source,
        };

        let (block_type, args) =
            parse_block_header(header).map_err(|e| in_block(None, e))?;
        debug!("line {}: {} block {:?}", header.line_no, block_type, args);

        match block_type {
            BlockType::Mission => {
                let tree = parser::build_tree(block).map_err(|e| in_block(Some(block_type), e))?;
                let Some(tree) = tree else {
                    return Ok(None);
                };
                let mission = parse_mission(&tree, tree.root(), args)
                    .map_err(|e| in_block(Some(block_type), e))?;
                Ok(Some(ParsedBlock::Mission(mission)))
            }
            BlockType::Shipyard | BlockType::Event | BlockType::Ship => {
                if self.options.require_full_interpretation {
                    return Err(in_block(
                        Some(block_type),
                        ParseError::UnsupportedBlock {
                            line_no: header.line_no,
                            block_type,
                        },
                    ));
                }
                warn!(
                    "line {}: passing {} block through uninterpreted",
                    header.line_no, block_type
                );
                Ok(Some(ParsedBlock::Opaque(OpaqueBlock {
                    block_type,
                    line_no: header.line_no,
                    arguments: args,
                    body: block.body().to_vec(),
                })))
            }
        }
    }
}

pub fn parse_block_header(header: &SourceLine) -> Result<(BlockType, Vec<String>), ParseError> {
    let Lexed { tag, args } = lexer::lex(&header.text);
    match tag.and_then(Tag::block_type) {
        Some(block_type) => Ok((block_type, args)),
        None => Err(ParseError::InvalidBlockType {
            line_no: header.line_no,
            keyword: header
                .text
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_string(),
        }),
    }
}

pub fn parse_mission(tree: &Tree, root: NodeId, args: Vec<String>) -> Result<Mission, ParseError> {
    let line_no = tree.node(root).line.line_no;
    let found = args.len();
    let mut args = args.into_iter();
    // mission "<id>" ["<description>"]
    let (Some(id), description, None) = (args.next(), args.next(), args.next()) else {
        return Err(ParseError::InvalidArity {
            line_no,
            field: "mission",
            expected: if found == 0 { 1 } else { 2 },
            found,
        });
    };
    let mut mission = Mission::new(id);
    mission.description = description;

    for child in tree.children(root) {
        let line = &tree.node(child).line;
        let lexed = lexer::lex(&line.text);
        match lexed.tag {
            Some(Tag::ToOffer) => mission.to_offer = parse_to_offer(tree, child)?,
            Some(Tag::OnComplete) => mission.on_complete = Some(parse_on_complete(tree, child)?),
            Some(Tag::Name) => mission.name = Some(exactly_one(lexed.args, line.line_no, "name")?),
            Some(Tag::Description) => {
                mission.description = Some(exactly_one(lexed.args, line.line_no, "description")?)
            }
            _ => debug!("line {}: ignoring '{}'", line.line_no, line.text),
        }
    }

    Ok(mission)
}

pub fn parse_to_offer(tree: &Tree, id: NodeId) -> Result<ToOffer, ParseError> {
    let mut to_offer = ToOffer::default();

    for child in tree.children(id) {
        let line = &tree.node(child).line;
        let lexed = lexer::lex(&line.text);
        match lexed.tag {
            Some(Tag::Has) => {
                let event = Event::new(exactly_one(lexed.args, line.line_no, "has")?);
                to_offer.has = Some(Has { event });
            }
            Some(Tag::Or) | Some(Tag::And) => to_offer.conditions.push(opaque(tree, child)),
            _ => debug!("line {}: ignoring condition '{}'", line.line_no, line.text),
        }
    }

    Ok(to_offer)
}

pub fn parse_on_complete(tree: &Tree, id: NodeId) -> Result<OnComplete, ParseError> {
    let mut on_complete = OnComplete::default();

    for child in tree.children(id) {
        let line = &tree.node(child).line;
        let lexed = lexer::lex(&line.text);
        match lexed.tag {
            Some(Tag::Payment) => {
                let value = exactly_one(lexed.args, line.line_no, "payment")?;
                let amount = value.parse::<i64>().map_err(|_| ParseError::InvalidNumber {
                    line_no: line.line_no,
                    value,
                })?;
                on_complete.payment = Some(Payment { amount });
            }
            Some(Tag::Conversation) => {
                on_complete.conversation = Some(parse_conversation(tree, child)?)
            }
            Some(Tag::Event) => {
                let id = exactly_one(lexed.args, line.line_no, "event")?;
                on_complete.events.push(Event::new(id));
            }
            None => {
                // Bare flag lines set that flag when the mission completes.
                if let Some(id) = lexer::arguments(&line.text).into_iter().next() {
                    on_complete.events.push(Event::new(id));
                }
            }
            Some(_) => debug!("line {}: ignoring effect '{}'", line.line_no, line.text),
        }
    }

    Ok(on_complete)
}

pub fn parse_conversation(tree: &Tree, id: NodeId) -> Result<Conversation, ParseError> {
    let mut conversation = Conversation::default();

    for child in tree.children(id) {
        if lexer::lex(&tree.node(child).line.text).tag == Some(Tag::Action) {
            let action = parse_action(tree, child)?;
            conversation.entries.push(ConversationEntry::Action(action));
        }
        conversation
            .entries
            .push(ConversationEntry::Line(opaque(tree, child)));
    }

    Ok(conversation)
}

pub fn parse_action(tree: &Tree, id: NodeId) -> Result<Action, ParseError> {
    let mut sets = tree.children(id).filter_map(|child| {
        let line = &tree.node(child).line;
        let lexed = lexer::lex(&line.text);
        (lexed.tag == Some(Tag::Set)).then_some((line.line_no, lexed.args))
    });

    let Some((line_no, args)) = sets.next() else {
        return Err(ParseError::MissingSetField {
            line_no: tree.node(id).line.line_no,
        });
    };
    if let Some((extra_line_no, _)) = sets.next() {
        return Err(ParseError::InvalidArity {
            line_no: extra_line_no,
            field: "action set",
            expected: 1,
            found: 2 + sets.count(),
        });
    }

    let event = Event::new(exactly_one(args, line_no, "set")?);
    Ok(Action { event })
}

fn opaque(tree: &Tree, id: NodeId) -> OpaqueNode {
    let node = tree.node(id);
    OpaqueNode {
        line_no: node.line.line_no,
        text: node.line.text.clone(),
        children: tree.children(id).map(|child| opaque(tree, child)).collect(),
    }
}

fn exactly_one(args: Vec<String>, line_no: usize, field: &'static str) -> Result<String, ParseError> {
    let found = args.len();
    match <[String; 1]>::try_from(args) {
        Ok([arg]) => Ok(arg),
        Err(_) => Err(ParseError::InvalidArity {
            line_no,
            field,
            expected: 1,
            found,
        }),
    }
}
