// SPDX-License-Identifier: LGPL-2.1-or-later
// See Notices.txt for copyright information

use hashbrown::HashMap;
use serde::{ser::SerializeMap, Serialize, Serializer};
use std::fmt;

#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TypeTag(String);

impl TypeTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'_ str> for TypeTag {
    fn from(v: &str) -> Self {
        Self::new(v)
    }
}

impl From<String> for TypeTag {
    fn from(v: String) -> Self {
        Self(v)
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Operand {
    pub name: String,
    pub width: usize,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub operand_type: Option<TypeTag>,
    #[serde(rename = "wwidth", skip_serializing_if = "Option::is_none")]
    pub wide_width: Option<usize>,
}

impl Operand {
    pub fn new(name: impl Into<String>, width: usize) -> Self {
        Self {
            name: name.into(),
            width,
            operand_type: None,
            wide_width: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackEffect {
    Types(Vec<TypeTag>),
    Dynamic,
}

impl Default for StackEffect {
    fn default() -> Self {
        Self::Types(Vec::new())
    }
}

impl Serialize for StackEffect {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Types(types) => types.serialize(serializer),
            Self::Dynamic => "dynamic".serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstructionForm {
    pub name: String,
    pub opcode: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instruction {
    pub wideable: bool,
    pub args: Vec<Operand>,
    pub popped: StackEffect,
    pub pushed: Vec<TypeTag>,
    pub forms: Vec<InstructionForm>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstructionRecord {
    /// too irregular to extract; serialized as `{"manual": true}`
    Manual,
    Extracted(Instruction),
}

impl InstructionRecord {
    pub fn is_manual(&self) -> bool {
        matches!(self, Self::Manual)
    }
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            Self::Manual => None,
            Self::Extracted(instruction) => Some(instruction),
        }
    }
}

impl Serialize for InstructionRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Manual => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("manual", &true)?;
                map.end()
            }
            Self::Extracted(instruction) => instruction.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct InstructionTable {
    entries: Vec<(String, InstructionRecord)>,
    indexes: HashMap<String, usize>,
}

impl InstructionTable {
    pub fn new() -> Self {
        Self::default()
    }
    // replacing keeps the original position
    pub fn insert(&mut self, name: String, record: InstructionRecord) -> Option<InstructionRecord> {
        if let Some(&index) = self.indexes.get(&name) {
            return Some(std::mem::replace(&mut self.entries[index].1, record));
        }
        self.indexes.insert(name.clone(), self.entries.len());
        self.entries.push((name, record));
        None
    }
    pub fn get(&self, name: &str) -> Option<&InstructionRecord> {
        self.indexes.get(name).map(|&index| &self.entries[index].1)
    }
    pub fn contains(&self, name: &str) -> bool {
        self.indexes.contains_key(name)
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &InstructionRecord)> {
        self.entries.iter().map(|(name, record)| (&**name, record))
    }
}

impl Serialize for InstructionTable {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, record) in &self.entries {
            map.serialize_entry(name, record)?;
        }
        map.end()
    }
}
