use winnow::combinator::{delimited, preceded, repeat};
use winnow::token::take_till;
use winnow::{ModalResult, Parser};

use crate::types::BlockType;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Description,
    Event,
    Mission,
    Name,
    OnOffer,
    Ship,
    Shipyard,
    Source,
    ToOffer,
    Waypoint,
    Or,
    And,
    Has,
    OnComplete,
    Payment,
    Conversation,
    Choice,
    Action,
    Set,
}

impl Tag {
    pub const ALL: [Tag; 19] = [
        Tag::Description,
        Tag::Event,
        Tag::Mission,
        Tag::Name,
        Tag::OnOffer,
        Tag::Ship,
        Tag::Shipyard,
        Tag::Source,
        Tag::ToOffer,
        Tag::Waypoint,
        Tag::Or,
        Tag::And,
        Tag::Has,
        Tag::OnComplete,
        Tag::Payment,
        Tag::Conversation,
        Tag::Choice,
        Tag::Action,
        Tag::Set,
    ];

    pub fn keyword(self) -> &'static str {
        match self {
            Tag::Description => "description",
            Tag::Event => "event",
            Tag::Mission => "mission",
            Tag::Name => "name",
            Tag::OnOffer => "on offer",
            Tag::Ship => "ship",
            Tag::Shipyard => "shipyard",
            Tag::Source => "source",
            Tag::ToOffer => "to offer",
            Tag::Waypoint => "waypoint",
            Tag::Or => "or",
            Tag::And => "and",
            Tag::Has => "has",
            Tag::OnComplete => "on complete",
            Tag::Payment => "payment",
            Tag::Conversation => "conversation",
            Tag::Choice => "choice",
            Tag::Action => "action",
            Tag::Set => "set",
        }
    }

    pub fn block_type(self) -> Option<BlockType> {
        match self {
            Tag::Mission => Some(BlockType::Mission),
            Tag::Shipyard => Some(BlockType::Shipyard),
            Tag::Event => Some(BlockType::Event),
            Tag::Ship => Some(BlockType::Ship),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexed {
    pub tag: Option<Tag>,
    pub args: Vec<String>,
}

/// Classifies a trimmed line. A keyword only matches when it is followed by
/// whitespace or the end of the line; the longest matching keyword wins.
pub fn lex(text: &str) -> Lexed {
    let matched = Tag::ALL
        .iter()
        .copied()
        .filter_map(|tag| keyword_rest(text, tag.keyword()).map(|rest| (tag, rest)))
        .max_by_key(|(tag, _)| tag.keyword().len());

    match matched {
        Some((tag, rest)) => Lexed {
            tag: Some(tag),
            args: arguments(rest),
        },
        None => Lexed {
            tag: None,
            args: vec![text.to_string()],
        },
    }
}

fn keyword_rest<'a>(text: &'a str, keyword: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(keyword)?;
    let mut chars = rest.chars();
    match chars.next() {
        None => Some(rest),
        Some(c) if c.is_whitespace() => Some(chars.as_str()),
        Some(_) => None,
    }
}

/// Splits the text after a keyword into arguments: every complete quoted
/// segment, or the whole trimmed text when there are none.
pub fn arguments(rest: &str) -> Vec<String> {
    let mut input = rest;
    let quoted = quoted_segments(&mut input).unwrap_or_default();
    if !quoted.is_empty() {
        return quoted.into_iter().map(str::to_string).collect();
    }

    let trimmed = rest.trim();
    if trimmed.is_empty() {
        Vec::new()
    } else {
        vec![trimmed.to_string()]
    }
}

fn quoted_segments<'s>(input: &mut &'s str) -> ModalResult<Vec<&'s str>> {
    repeat(0.., preceded(take_till(0.., '"'), quoted)).parse_next(input)
}

fn quoted<'s>(input: &mut &'s str) -> ModalResult<&'s str> {
    delimited('"', take_till(0.., '"'), '"').parse_next(input)
}
