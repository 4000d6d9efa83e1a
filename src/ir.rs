use serde::{Deserialize, Serialize};
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// MARKUP IR
// The tree handed to the compiler by the parser. Embedded JavaScript is carried
// as source text and re-parsed on demand during analysis.
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum MarkupNode {
    Element(ElementNode),
    Text(TextNode),
    Expression(ExpressionNode),
    Spread(SpreadNode),
}

impl MarkupNode {
    pub fn kind(&self) -> &'static str {
        match self {
            MarkupNode::Element(_) => "element",
            MarkupNode::Text(_) => "text",
            MarkupNode::Expression(_) => "expression",
            MarkupNode::Spread(_) => "spread",
        }
    }

    pub fn location(&self) -> &SourceLocation {
        match self {
            MarkupNode::Element(n) => &n.location,
            MarkupNode::Text(n) => &n.location,
            MarkupNode::Expression(n) => &n.location,
            MarkupNode::Spread(n) => &n.location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementNode {
    pub tag: TagName,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub children: Vec<MarkupNode>,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextNode {
    pub value: String,
    #[serde(default)]
    pub location: SourceLocation,
}

/// An embedded-expression container child, e.g. `{count() + 1}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpressionNode {
    pub code: String,
    #[serde(default)]
    pub location: SourceLocation,
}

/// A spread child, e.g. `{...items}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadNode {
    pub code: String,
    #[serde(default)]
    pub location: SourceLocation,
}

/// A tag reference as written in markup: a simple name, a dotted member path,
/// or a namespaced name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TagName {
    Identifier { name: String },
    Member { object: Box<TagName>, property: String },
    Namespaced { namespace: String, name: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Attribute {
    Named(NamedAttribute),
    Spread(SpreadAttribute),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedAttribute {
    pub name: String,
    /// `None` means a bare attribute, which reads as boolean `true`.
    #[serde(default)]
    pub value: Option<AttributeValue>,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpreadAttribute {
    pub argument: String,
    #[serde(default)]
    pub location: SourceLocation,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeValue {
    /// A quoted literal straight from the markup, e.g. `name="value"`.
    Literal(String),
    /// An embedded-expression value, e.g. `name={expr}`, carried as JS source.
    Expression(String),
}

// ═══════════════════════════════════════════════════════════════════════════════
// ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// The pass defines no failure conditions of its own; collaborator failures
/// travel through this type unmodified to the enclosing driver.
#[derive(Debug, Clone, Error)]
pub enum CompileError {
    #[error("cannot add binding `{0}` after the table is frozen")]
    FrozenBindingTable(String),
    #[error("template compiler failed on {kind} node at {line}:{column}: {message}")]
    Template {
        kind: &'static str,
        line: u32,
        column: u32,
        message: String,
    },
}
