//! Generic syntax tree
//!
//! swc's typed AST is lowered into this uniform shape so the pattern
//! checkers can treat every construct the same way: a kind tag, host byte
//! offsets, an optional line/column location and an ordered list of named
//! fields. A field either holds child nodes or a scalar; only the former are
//! visited by the walker, so offsets and locations never have to be filtered
//! out by name.

use serde::Serialize;
use std::fmt;

/// Identity of a node, unique within one tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

/// Zero-based line and zero-based character column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
}

/// Node type tags, named after the ESTree/Babel conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    // Statements
    ExpressionStatement,
    BlockStatement,
    EmptyStatement,
    DebuggerStatement,
    WithStatement,
    ReturnStatement,
    LabeledStatement,
    BreakStatement,
    ContinueStatement,
    IfStatement,
    SwitchStatement,
    SwitchCase,
    ThrowStatement,
    TryStatement,
    CatchClause,
    WhileStatement,
    DoWhileStatement,
    ForStatement,
    ForInStatement,
    ForOfStatement,
    // Declarations
    FunctionDeclaration,
    VariableDeclaration,
    VariableDeclarator,
    ClassDeclaration,
    ClassBody,
    ClassMethod,
    ClassProperty,
    StaticBlock,
    ImportDeclaration,
    ImportSpecifier,
    ImportDefaultSpecifier,
    ImportNamespaceSpecifier,
    ExportNamedDeclaration,
    ExportDefaultDeclaration,
    // Expressions
    Identifier,
    PrivateName,
    ThisExpression,
    Super,
    Import,
    ArrayExpression,
    ObjectExpression,
    ObjectProperty,
    ObjectMethod,
    SpreadElement,
    FunctionExpression,
    ArrowFunctionExpression,
    ClassExpression,
    UnaryExpression,
    UpdateExpression,
    BinaryExpression,
    LogicalExpression,
    AssignmentExpression,
    MemberExpression,
    ConditionalExpression,
    CallExpression,
    NewExpression,
    SequenceExpression,
    TemplateLiteral,
    TemplateElement,
    TaggedTemplateExpression,
    YieldExpression,
    AwaitExpression,
    MetaProperty,
    // Literals
    StringLiteral,
    NumericLiteral,
    BooleanLiteral,
    NullLiteral,
    RegExpLiteral,
    BigIntLiteral,
    // Patterns
    ObjectPattern,
    ArrayPattern,
    RestElement,
    AssignmentPattern,
    // JSX
    JSXElement,
    JSXFragment,
    JSXOpeningElement,
    JSXAttribute,
    JSXSpreadAttribute,
    JSXExpressionContainer,
    // TypeScript
    TSAsExpression,
    TSSatisfiesExpression,
    TSNonNullExpression,
    TSTypeAssertion,
    TSParameterProperty,
    TSInterfaceDeclaration,
    TSTypeAliasDeclaration,
    TSEnumDeclaration,
    TSModuleDeclaration,
    /// Constructs the pipeline never looks inside
    Other(&'static str),
}

impl NodeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Program => "Program",
            Self::ExpressionStatement => "ExpressionStatement",
            Self::BlockStatement => "BlockStatement",
            Self::EmptyStatement => "EmptyStatement",
            Self::DebuggerStatement => "DebuggerStatement",
            Self::WithStatement => "WithStatement",
            Self::ReturnStatement => "ReturnStatement",
            Self::LabeledStatement => "LabeledStatement",
            Self::BreakStatement => "BreakStatement",
            Self::ContinueStatement => "ContinueStatement",
            Self::IfStatement => "IfStatement",
            Self::SwitchStatement => "SwitchStatement",
            Self::SwitchCase => "SwitchCase",
            Self::ThrowStatement => "ThrowStatement",
            Self::TryStatement => "TryStatement",
            Self::CatchClause => "CatchClause",
            Self::WhileStatement => "WhileStatement",
            Self::DoWhileStatement => "DoWhileStatement",
            Self::ForStatement => "ForStatement",
            Self::ForInStatement => "ForInStatement",
            Self::ForOfStatement => "ForOfStatement",
            Self::FunctionDeclaration => "FunctionDeclaration",
            Self::VariableDeclaration => "VariableDeclaration",
            Self::VariableDeclarator => "VariableDeclarator",
            Self::ClassDeclaration => "ClassDeclaration",
            Self::ClassBody => "ClassBody",
            Self::ClassMethod => "ClassMethod",
            Self::ClassProperty => "ClassProperty",
            Self::StaticBlock => "StaticBlock",
            Self::ImportDeclaration => "ImportDeclaration",
            Self::ImportSpecifier => "ImportSpecifier",
            Self::ImportDefaultSpecifier => "ImportDefaultSpecifier",
            Self::ImportNamespaceSpecifier => "ImportNamespaceSpecifier",
            Self::ExportNamedDeclaration => "ExportNamedDeclaration",
            Self::ExportDefaultDeclaration => "ExportDefaultDeclaration",
            Self::Identifier => "Identifier",
            Self::PrivateName => "PrivateName",
            Self::ThisExpression => "ThisExpression",
            Self::Super => "Super",
            Self::Import => "Import",
            Self::ArrayExpression => "ArrayExpression",
            Self::ObjectExpression => "ObjectExpression",
            Self::ObjectProperty => "ObjectProperty",
            Self::ObjectMethod => "ObjectMethod",
            Self::SpreadElement => "SpreadElement",
            Self::FunctionExpression => "FunctionExpression",
            Self::ArrowFunctionExpression => "ArrowFunctionExpression",
            Self::ClassExpression => "ClassExpression",
            Self::UnaryExpression => "UnaryExpression",
            Self::UpdateExpression => "UpdateExpression",
            Self::BinaryExpression => "BinaryExpression",
            Self::LogicalExpression => "LogicalExpression",
            Self::AssignmentExpression => "AssignmentExpression",
            Self::MemberExpression => "MemberExpression",
            Self::ConditionalExpression => "ConditionalExpression",
            Self::CallExpression => "CallExpression",
            Self::NewExpression => "NewExpression",
            Self::SequenceExpression => "SequenceExpression",
            Self::TemplateLiteral => "TemplateLiteral",
            Self::TemplateElement => "TemplateElement",
            Self::TaggedTemplateExpression => "TaggedTemplateExpression",
            Self::YieldExpression => "YieldExpression",
            Self::AwaitExpression => "AwaitExpression",
            Self::MetaProperty => "MetaProperty",
            Self::StringLiteral => "StringLiteral",
            Self::NumericLiteral => "NumericLiteral",
            Self::BooleanLiteral => "BooleanLiteral",
            Self::NullLiteral => "NullLiteral",
            Self::RegExpLiteral => "RegExpLiteral",
            Self::BigIntLiteral => "BigIntLiteral",
            Self::ObjectPattern => "ObjectPattern",
            Self::ArrayPattern => "ArrayPattern",
            Self::RestElement => "RestElement",
            Self::AssignmentPattern => "AssignmentPattern",
            Self::JSXElement => "JSXElement",
            Self::JSXFragment => "JSXFragment",
            Self::JSXOpeningElement => "JSXOpeningElement",
            Self::JSXAttribute => "JSXAttribute",
            Self::JSXSpreadAttribute => "JSXSpreadAttribute",
            Self::JSXExpressionContainer => "JSXExpressionContainer",
            Self::TSAsExpression => "TSAsExpression",
            Self::TSSatisfiesExpression => "TSSatisfiesExpression",
            Self::TSNonNullExpression => "TSNonNullExpression",
            Self::TSTypeAssertion => "TSTypeAssertion",
            Self::TSParameterProperty => "TSParameterProperty",
            Self::TSInterfaceDeclaration => "TSInterfaceDeclaration",
            Self::TSTypeAliasDeclaration => "TSTypeAliasDeclaration",
            Self::TSEnumDeclaration => "TSEnumDeclaration",
            Self::TSModuleDeclaration => "TSModuleDeclaration",
            Self::Other(name) => *name,
        }
    }

    /// Nodes that own a parameter list and a body.
    pub fn is_function_like(&self) -> bool {
        matches!(
            self,
            Self::FunctionDeclaration
                | Self::FunctionExpression
                | Self::ArrowFunctionExpression
                | Self::ClassMethod
                | Self::ObjectMethod
        )
    }

    /// Statement-level nodes, including class members.
    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            Self::ExpressionStatement
                | Self::BlockStatement
                | Self::EmptyStatement
                | Self::DebuggerStatement
                | Self::WithStatement
                | Self::ReturnStatement
                | Self::LabeledStatement
                | Self::BreakStatement
                | Self::ContinueStatement
                | Self::IfStatement
                | Self::SwitchStatement
                | Self::ThrowStatement
                | Self::TryStatement
                | Self::WhileStatement
                | Self::DoWhileStatement
                | Self::ForStatement
                | Self::ForInStatement
                | Self::ForOfStatement
                | Self::FunctionDeclaration
                | Self::VariableDeclaration
                | Self::ClassDeclaration
                | Self::ClassMethod
                | Self::ClassProperty
                | Self::StaticBlock
                | Self::ImportDeclaration
                | Self::ExportNamedDeclaration
                | Self::ExportDefaultDeclaration
                | Self::TSInterfaceDeclaration
                | Self::TSTypeAliasDeclaration
                | Self::TSEnumDeclaration
                | Self::TSModuleDeclaration
        )
    }

    /// TypeScript wrappers that do not change the wrapped value.
    pub fn is_type_wrapper(&self) -> bool {
        matches!(
            self,
            Self::TSAsExpression
                | Self::TSSatisfiesExpression
                | Self::TSNonNullExpression
                | Self::TSTypeAssertion
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a named node field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Field {
    Node(Box<SourceNode>),
    Nodes(Vec<SourceNode>),
    Str(String),
    Bool(bool),
    Num(f64),
}

/// One node of the generic tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceNode {
    pub id: NodeId,
    pub kind: NodeKind,
    /// Byte offset of the first character, host coordinates
    pub start: usize,
    /// Byte offset one past the last character, host coordinates
    pub end: usize,
    pub loc: Option<SourceLocation>,
    fields: Vec<(&'static str, Field)>,
}

/// ESTree-like JSON: `type`, `start`, `end`, `loc`, then the fields.
impl Serialize for SourceNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("type", self.kind.as_str())?;
        map.serialize_entry("start", &self.start)?;
        map.serialize_entry("end", &self.end)?;
        if let Some(loc) = &self.loc {
            map.serialize_entry("loc", loc)?;
        }
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl SourceNode {
    pub fn new(id: NodeId, kind: NodeKind, start: usize, end: usize) -> Self {
        Self {
            id,
            kind,
            start,
            end,
            loc: None,
            fields: Vec::new(),
        }
    }

    pub fn with_loc(mut self, loc: SourceLocation) -> Self {
        self.loc = Some(loc);
        self
    }

    /// Adds a single-node field; `None` leaves the field absent.
    pub fn push_node(&mut self, name: &'static str, node: Option<SourceNode>) {
        if let Some(node) = node {
            self.fields.push((name, Field::Node(Box::new(node))));
        }
    }

    pub fn push_nodes(&mut self, name: &'static str, nodes: Vec<SourceNode>) {
        self.fields.push((name, Field::Nodes(nodes)));
    }

    pub fn push_str(&mut self, name: &'static str, value: impl Into<String>) {
        self.fields.push((name, Field::Str(value.into())));
    }

    pub fn push_bool(&mut self, name: &'static str, value: bool) {
        self.fields.push((name, Field::Bool(value)));
    }

    pub fn push_num(&mut self, name: &'static str, value: f64) {
        self.fields.push((name, Field::Num(value)));
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields
            .iter()
            .find(|(field_name, _)| *field_name == name)
            .map(|(_, field)| field)
    }

    pub fn fields(&self) -> impl Iterator<Item = (&'static str, &Field)> {
        self.fields.iter().map(|(name, field)| (*name, field))
    }

    /// Single child stored under `name`.
    pub fn child(&self, name: &str) -> Option<&SourceNode> {
        match self.field(name) {
            Some(Field::Node(node)) => Some(node),
            _ => None,
        }
    }

    /// Child list stored under `name`; empty when absent.
    pub fn list(&self, name: &str) -> &[SourceNode] {
        match self.field(name) {
            Some(Field::Nodes(nodes)) => nodes,
            _ => &[],
        }
    }

    pub fn str_field(&self, name: &str) -> Option<&str> {
        match self.field(name) {
            Some(Field::Str(value)) => Some(value),
            _ => None,
        }
    }

    /// Boolean field; absent means `false`.
    pub fn flag(&self, name: &str) -> bool {
        matches!(self.field(name), Some(Field::Bool(true)))
    }

    /// Every node-valued child, in field order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = &SourceNode> {
        self.fields.iter().flat_map(|(_, field)| match field {
            Field::Node(node) => std::slice::from_ref(&**node),
            Field::Nodes(nodes) => nodes.as_slice(),
            _ => &[][..],
        })
    }

    pub fn children_mut(&mut self) -> impl Iterator<Item = &mut SourceNode> {
        self.fields.iter_mut().flat_map(|(_, field)| match field {
            Field::Node(node) => std::slice::from_mut(&mut **node).iter_mut(),
            Field::Nodes(nodes) => nodes.iter_mut(),
            _ => Default::default(),
        })
    }

    pub fn is(&self, kind: NodeKind) -> bool {
        self.kind == kind
    }

    /// `name` of an identifier or private name.
    pub fn name(&self) -> Option<&str> {
        match self.kind {
            NodeKind::Identifier | NodeKind::PrivateName => self.str_field("name"),
            _ => None,
        }
    }

    pub fn is_identifier_named(&self, name: &str) -> bool {
        self.kind == NodeKind::Identifier && self.name() == Some(name)
    }

    pub fn start_line(&self) -> usize {
        self.loc.map(|loc| loc.start.line).unwrap_or(0)
    }

    pub fn end_line(&self) -> usize {
        self.loc.map(|loc| loc.end.line).unwrap_or(0)
    }

    pub fn start_column(&self) -> usize {
        self.loc.map(|loc| loc.start.column).unwrap_or(0)
    }

    pub fn contains_line(&self, line: usize) -> bool {
        self.loc
            .map(|loc| loc.start.line <= line && line <= loc.end.line)
            .unwrap_or(false)
    }

    pub fn contains_range(&self, other: &SourceNode) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// Number of lines spanned, for picking the innermost candidate.
    pub fn line_span(&self) -> usize {
        self.end_line().saturating_sub(self.start_line())
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Source text of the node; empty if the offsets do not fit `document`.
    pub fn text<'a>(&self, document: &'a str) -> &'a str {
        document.get(self.start..self.end).unwrap_or("")
    }
}
