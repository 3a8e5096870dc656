// SPDX-License-Identifier: LGPL-2.1-or-later
// See Notices.txt for copyright information

#[cfg(feature = "serde")]
use serde::Serialize;
use std::fmt;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pos {
    pub byte_index: usize,
}

#[cfg(feature = "serde")]
impl Serialize for Pos {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        format!("{:?}", self).serialize(serializer)
    }
}

impl fmt::Debug for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.byte_index)
    }
}

impl Pos {
    pub fn new(byte_index: usize) -> Self {
        Self { byte_index }
    }
}

pub trait GetPos {
    fn pos(&self) -> Pos;
}

impl GetPos for Pos {
    fn pos(&self) -> Pos {
        *self
    }
}

impl<T: GetPos + ?Sized> GetPos for &'_ T {
    fn pos(&self) -> Pos {
        (**self).pos()
    }
}

macro_rules! impl_get_pos {
    ($($name:ident,)+) => {
        $(
            impl GetPos for $name {
                fn pos(&self) -> Pos {
                    self.pos
                }
            }
        )+
    };
}

impl_get_pos! {
    Element,
    Attribute,
    Text,
    Comment,
    Directive,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Document {
    pub content: Vec<Node>,
}

impl GetPos for Document {
    fn pos(&self) -> Pos {
        self.content.first().map_or(Pos::new(0), GetPos::pos)
    }
}

macro_rules! declare_transparent_enum {
    (
        #[serde(tag = $tag:literal)]
        enum $name:ident {
            $($alternative:ident,)+
        }
    ) => {
        #[derive(Clone)]
        #[cfg_attr(feature = "serde", derive(Serialize), serde(tag = $tag))]
        pub enum $name {
            $($alternative($alternative),)+
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Self::$alternative(v) => fmt::Debug::fmt(v, f),)+
                }
            }
        }

        impl GetPos for $name {
            fn pos(&self) -> Pos {
                match self {
                    $(Self::$alternative(v) => v.pos(),)+
                }
            }
        }
    };
}

declare_transparent_enum! {
    #[serde(tag = "node_type")]
    enum Node {
        Element,
        Text,
        Comment,
        Directive,
    }
}

impl Node {
    pub fn element(&self) -> Option<&Element> {
        if let Self::Element(element) = self {
            Some(element)
        } else {
            None
        }
    }
    pub fn text(&self) -> Option<&Text> {
        if let Self::Text(text) = self {
            Some(text)
        } else {
            None
        }
    }
    pub fn is_whitespace(&self) -> bool {
        match self {
            Self::Text(text) => text.data.trim().is_empty(),
            _ => false,
        }
    }
    pub fn text_content(&self) -> String {
        let mut retval = String::new();
        self.write_text_content(&mut retval);
        retval
    }
    fn write_text_content(&self, out: &mut String) {
        match self {
            Self::Element(element) => element.write_text_content(out),
            Self::Text(text) => out.push_str(&text.data),
            Self::Comment(_) | Self::Directive(_) => {}
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Attribute {
    pub pos: Pos,
    pub name: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Element {
    pub pos: Pos,
    pub name: String,
    pub attribs: Vec<Attribute>,
    pub children: Vec<Node>,
}

impl Element {
    /// value of the first attribute called `name`; value-less attributes give `""`
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attribs
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_deref().unwrap_or(""))
    }
    pub fn element_children(&self) -> impl Iterator<Item = &Element> + Clone {
        self.children.iter().filter_map(Node::element)
    }
    pub fn text_content(&self) -> String {
        let mut retval = String::new();
        self.write_text_content(&mut retval);
        retval
    }
    fn write_text_content(&self, out: &mut String) {
        for child in &self.children {
            child.write_text_content(out);
        }
    }
    pub fn is(&self, name: &str, class: &str) -> bool {
        self.name == name && self.attr("class") == Some(class)
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Text {
    pub pos: Pos,
    pub data: String,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Comment {
    pub pos: Pos,
    pub content: String,
}

/// `<!DOCTYPE ...>` or `<?xml ...?>`
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Directive {
    pub pos: Pos,
    pub content: String,
}
