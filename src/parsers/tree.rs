//! Front-end independent syntax tree
//!
//! Declarations (imports, classes, methods, annotations) are kept as plain
//! structs; statement and expression code is a closed set of [`Node`]
//! variants reached through a uniform [`Node::children`] accessor. A
//! front-end lowers its own tree into this shape, so the extractor never
//! sees a concrete parser type.

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

/// A parsed compilation unit
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompilationUnit {
    pub imports: Vec<ImportDecl>,
    /// Top-level classes in declaration order
    pub classes: Vec<ClassDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportDecl {
    /// Dotted path without a trailing wildcard
    pub path: String,
    pub is_static: bool,
    pub is_wildcard: bool,
}

impl ImportDecl {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            is_static: false,
            is_wildcard: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub name: String,
    /// Methods declared directly in the class body
    pub methods: Vec<MethodDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub name: String,
    pub annotations: Vec<Annotation>,
    /// Top-level statements of the body, `None` for abstract/native methods
    pub body: Option<Vec<Node>>,
}

impl Drop for MethodDecl {
    fn drop(&mut self) {
        if let Some(body) = self.body.take() {
            dismantle(body);
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    /// Name segments, `["org", "testng", "annotations", "Test"]`
    pub segments: Vec<String>,
}

impl Annotation {
    pub fn simple(name: impl Into<String>) -> Self {
        Self {
            segments: vec![name.into()],
        }
    }

    pub fn name(&self) -> String {
        self.segments.join(".")
    }
}

/// Source text of a node, shared with the rest of the file.
///
/// Only a byte range is stored; whitespace is collapsed when the text is
/// rendered.
#[derive(Clone)]
pub struct SourceText {
    source: Arc<str>,
    range: Range<usize>,
}

impl SourceText {
    pub fn new(source: Arc<str>, range: Range<usize>) -> Self {
        Self { source, range }
    }

    pub fn raw(&self) -> &str {
        self.source.get(self.range.clone()).unwrap_or("")
    }

    /// Text with every whitespace run collapsed to one space
    pub fn render(&self) -> String {
        self.raw().split_whitespace().collect::<Vec<_>>().join(" ")
    }
}

impl From<&str> for SourceText {
    fn from(text: &str) -> Self {
        Self::new(Arc::from(text), 0..text.len())
    }
}

impl From<String> for SourceText {
    fn from(text: String) -> Self {
        let len = text.len();
        Self::new(Arc::from(text), 0..len)
    }
}

impl Default for SourceText {
    fn default() -> Self {
        Self::from("")
    }
}

impl PartialEq for SourceText {
    fn eq(&self, other: &Self) -> bool {
        self.raw() == other.raw()
    }
}

impl fmt::Debug for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.raw(), f)
    }
}

impl fmt::Display for SourceText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Statement/expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Literal token, raw source text (`"admin"`, `10`, `true`)
    Literal(String),
    /// Name or field reference: `member` or `qualifier.member`
    MemberReference {
        qualifier: Option<String>,
        member: String,
    },
    Binary {
        left: Box<Node>,
        operator: String,
        right: Box<Node>,
    },
    Invocation(Invocation),
    /// Anything else; `kind` is the front-end's node kind
    Other {
        kind: String,
        text: SourceText,
        children: Vec<Child>,
    },
}

/// A structural child of an [`Node::Other`]
#[derive(Debug, Clone, PartialEq)]
pub enum Child {
    Node(Node),
    Sequence(Vec<Node>),
    /// Punctuation, keywords and operators; never contains calls
    Token(String),
}

/// Method invocation flattened into a base call plus chained selectors.
///
/// `driver.findElement(x).sendKeys(y)` is one `Invocation` for
/// `findElement` (qualifier `driver`) with a single selector for `sendKeys`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Invocation {
    pub member: String,
    pub qualifier: Option<String>,
    pub arguments: Vec<Node>,
    /// Calls made on this call's result, left to right
    pub selectors: Vec<Invocation>,
    /// Receiver expression that is not a plain name (`new Page(d).open()`)
    pub receiver: Option<Box<Node>>,
    /// Source text of the whole chain
    pub text: SourceText,
}


impl Invocation {
    pub fn new(member: impl Into<String>) -> Self {
        let member = member.into();
        Self {
            text: format!("{}()", member).into(),
            member,
            ..Default::default()
        }
    }

    pub fn on(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    pub fn arg(mut self, node: Node) -> Self {
        self.arguments.push(node);
        self
    }

    pub fn then(mut self, selector: Invocation) -> Self {
        self.selectors.push(selector);
        self
    }
}

/// Node kinds whose contents are code executed on its own (lambda bodies,
/// anonymous class bodies), as opposed to a value expression
const CODE_BLOCK_KINDS: &[&str] = &["lambda_expression", "class_body"];

impl Node {
    pub fn literal(text: impl Into<String>) -> Self {
        Node::Literal(text.into())
    }

    pub fn name(member: impl Into<String>) -> Self {
        Node::MemberReference {
            qualifier: None,
            member: member.into(),
        }
    }

    pub fn field(qualifier: impl Into<String>, member: impl Into<String>) -> Self {
        Node::MemberReference {
            qualifier: Some(qualifier.into()),
            member: member.into(),
        }
    }

    pub fn other(kind: impl Into<String>, text: impl Into<SourceText>, children: Vec<Child>) -> Self {
        Node::Other {
            kind: kind.into(),
            text: text.into(),
            children,
        }
    }

    /// True for nodes whose body runs as code of its own
    pub fn is_code_block(&self) -> bool {
        matches!(self, Node::Other { kind, .. } if CODE_BLOCK_KINDS.contains(&kind.as_str()))
    }

    /// Structural children. Invocations expose their receiver only; their
    /// arguments and selectors are reached through the [`Invocation`] itself.
    pub fn children(&self) -> Vec<&Child> {
        match self {
            Node::Other { children, .. } => children.iter().collect(),
            _ => Vec::new(),
        }
    }
}

/// Drop a statement list without recursing into nested expressions.
///
/// Every node is emptied of its children before it goes out of scope, so
/// the compiler generated drop glue only ever sees shallow nodes.
pub fn dismantle(nodes: Vec<Node>) {
    let mut stack = nodes;
    while let Some(mut node) = stack.pop() {
        match &mut node {
            Node::Literal(_) | Node::MemberReference { .. } => {}
            Node::Binary { left, right, .. } => {
                stack.push(std::mem::replace(left.as_mut(), Node::Literal(String::new())));
                stack.push(std::mem::replace(right.as_mut(), Node::Literal(String::new())));
            }
            Node::Invocation(invocation) => take_invocation(invocation, &mut stack),
            Node::Other { children, .. } => {
                for child in children.drain(..) {
                    match child {
                        Child::Node(child) => stack.push(child),
                        Child::Sequence(items) => stack.extend(items),
                        Child::Token(_) => {}
                    }
                }
            }
        }
    }
}

fn take_invocation(invocation: &mut Invocation, stack: &mut Vec<Node>) {
    stack.append(&mut invocation.arguments);
    if let Some(receiver) = invocation.receiver.take() {
        stack.push(*receiver);
    }
    stack.extend(invocation.selectors.drain(..).map(Node::Invocation));
}
