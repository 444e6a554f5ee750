use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ast::SourceLine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockType {
    Mission,
    Shipyard,
    Event,
    Ship,
}

impl BlockType {
    pub fn keyword(self) -> &'static str {
        match self {
            BlockType::Mission => "mission",
            BlockType::Shipyard => "shipyard",
            BlockType::Event => "event",
            BlockType::Ship => "ship",
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    pub to_offer: ToOffer,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub on_complete: Option<OnComplete>,
}

impl Mission {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            to_offer: ToOffer::default(),
            on_complete: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ToOffer {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub has: Option<Has>,
    /// `or` / `and` groups, kept verbatim.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub conditions: Vec<OpaqueNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Has {
    pub event: Event,
}

/// A named global flag. Two events are the same event when their ids match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
}

impl Event {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OnComplete {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub payment: Option<Payment>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub conversation: Option<Conversation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Conversation {
    pub entries: Vec<ConversationEntry>,
}

impl Conversation {
    pub fn actions(&self) -> impl Iterator<Item = &Action> {
        self.entries.iter().filter_map(|entry| match entry {
            ConversationEntry::Action(action) => Some(action),
            ConversationEntry::Line(_) => None,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConversationEntry {
    Action(Action),
    Line(OpaqueNode),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub event: Event,
}

/// An uninterpreted subtree: dialogue, choices, condition groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpaqueNode {
    pub line_no: usize,
    pub text: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub children: Vec<OpaqueNode>,
}

/// A block that was recognised but not interpreted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpaqueBlock {
    pub block_type: BlockType,
    pub line_no: usize,
    pub arguments: Vec<String>,
    pub body: Vec<SourceLine>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParsedBlock {
    Mission(Mission),
    Opaque(OpaqueBlock),
}

impl ParsedBlock {
    pub fn as_mission(&self) -> Option<&Mission> {
        match self {
            ParsedBlock::Mission(mission) => Some(mission),
            ParsedBlock::Opaque(_) => None,
        }
    }
}
