//! Java front-end using tree-sitter
//!
//! Turns Java source text into a [`CompilationUnit`]. tree-sitter recovers
//! from syntax errors by inserting ERROR and MISSING nodes; any such node
//! rejects the whole file, so callers never see a partially parsed tree.
//! The grammar is also more permissive than Java itself (statements at the
//! top level, keywords lexed as identifiers), and those trees are rejected
//! the same way.

use crate::parsers::tree::{
    Annotation, Child, ClassDecl, CompilationUnit, ImportDecl, Invocation, MethodDecl, Node,
    SourceText,
};
use crate::parsers::{JavaFrontend, ParseError};
use std::sync::Arc;
use tracing::debug;
use tree_sitter::{Node as TsNode, Parser};

const LITERAL_KINDS: &[&str] = &[
    "string_literal",
    "character_literal",
    "text_block",
    "decimal_integer_literal",
    "hex_integer_literal",
    "octal_integer_literal",
    "binary_integer_literal",
    "decimal_floating_point_literal",
    "hex_floating_point_literal",
    "true",
    "false",
    "null_literal",
];

/// Kinds lowered to a plain sequence of their named children
const SEQUENCE_KINDS: &[&str] = &["argument_list", "block", "array_initializer"];

/// Receivers that read as a simple name
const NAME_KINDS: &[&str] = &["identifier", "this", "super"];

/// Declarations a compilation unit may contain
const TOP_LEVEL_KINDS: &[&str] = &[
    "package_declaration",
    "import_declaration",
    "class_declaration",
    "interface_declaration",
    "enum_declaration",
    "record_declaration",
    "annotation_type_declaration",
    "module_declaration",
    "line_comment",
    "block_comment",
];

/// Reserved words that can never name anything
const RESERVED_WORDS: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "true", "false", "null",
];

/// tree-sitter based [`JavaFrontend`]
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeSitterJava;

impl JavaFrontend for TreeSitterJava {
    fn parse(&self, source: &str, label: &str) -> Result<CompilationUnit, ParseError> {
        let mut parser = Parser::new();
        let language = tree_sitter_java::LANGUAGE;
        parser
            .set_language(&language.into())
            .map_err(|e| ParseError::syntax(format!("failed to load Java grammar: {}", e)))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseError::syntax("parser produced no tree"))?;

        let root = tree.root_node();
        let src = source.as_bytes();

        let problem = if root.has_error() {
            Some(
                first_syntax_error(root, src)
                    .unwrap_or_else(|| "source could not be parsed".to_string()),
            )
        } else {
            first_invalid_construct(root, src)
        };
        if let Some(message) = problem {
            let message = if label.is_empty() {
                message
            } else {
                format!("{}: {}", label, message)
            };
            return Err(ParseError::syntax(message));
        }

        let shared: Arc<str> = Arc::from(source);
        let mut unit = CompilationUnit::default();
        for child in root.named_children(&mut root.walk()) {
            match child.kind() {
                "import_declaration" => unit.imports.push(parse_import(child, src)),
                "class_declaration" => {
                    if let Some(class) = parse_class(child, &shared) {
                        unit.classes.push(class);
                    }
                }
                _ => {}
            }
        }

        debug!(
            "{}: {} imports, {} top-level classes",
            if label.is_empty() { "<source>" } else { label },
            unit.imports.len(),
            unit.classes.len()
        );

        Ok(unit)
    }
}

/// Describe the first ERROR or MISSING node in document order
fn first_syntax_error(root: TsNode, src: &[u8]) -> Option<String> {
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        if node.is_missing() {
            return Some(at_position(node, format!("missing \"{}\"", node.kind())));
        }
        if node.is_error() {
            return Some(unexpected(node, src));
        }
        if !node.has_error() {
            continue;
        }
        let children: Vec<TsNode> = node.children(&mut node.walk()).collect();
        stack.extend(children.into_iter().rev());
    }
    None
}

/// Describe the first construct the grammar accepts but Java does not:
/// anything but a declaration or `;` at the top level, or a reserved word
/// used as an identifier.
fn first_invalid_construct(root: TsNode, src: &[u8]) -> Option<String> {
    for child in root.children(&mut root.walk()) {
        let allowed = if child.is_named() {
            TOP_LEVEL_KINDS.contains(&child.kind())
        } else {
            child.kind() == ";"
        };
        if !allowed {
            return Some(unexpected(child, src));
        }
    }

    let mut cursor = root.walk();
    loop {
        let node = cursor.node();
        if matches!(node.kind(), "identifier" | "type_identifier")
            && RESERVED_WORDS.contains(&node_text(node, src))
        {
            return Some(unexpected(node, src));
        }
        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return None;
            }
        }
    }
}

fn unexpected(node: TsNode, src: &[u8]) -> String {
    let text = collapse_whitespace(node_text(node, src));
    let snippet: String = text.chars().take(40).collect();
    let what = if snippet.is_empty() {
        "unexpected input".to_string()
    } else if snippet.len() < text.len() {
        format!("unexpected \"{}...\"", snippet)
    } else {
        format!("unexpected \"{}\"", snippet)
    };
    at_position(node, what)
}

fn at_position(node: TsNode, what: String) -> String {
    let pos = node.start_position();
    format!("{} at line {}, column {}", what, pos.row + 1, pos.column + 1)
}

fn parse_import(node: TsNode, src: &[u8]) -> ImportDecl {
    let mut decl = ImportDecl::new(String::new());
    for child in node.children(&mut node.walk()) {
        match child.kind() {
            "static" => decl.is_static = true,
            "asterisk" => decl.is_wildcard = true,
            "identifier" | "scoped_identifier" => decl.path = identifier_segments(child, src).join("."),
            _ => {}
        }
    }
    decl
}

fn parse_class(node: TsNode, source: &Arc<str>) -> Option<ClassDecl> {
    let src = source.as_bytes();
    let name = node_text(node.child_by_field_name("name")?, src).to_string();
    let mut methods = Vec::new();

    if let Some(body) = node.child_by_field_name("body") {
        for member in body.named_children(&mut body.walk()) {
            if member.kind() == "method_declaration" {
                if let Some(method) = parse_method(member, source) {
                    methods.push(method);
                }
            }
        }
    }

    Some(ClassDecl { name, methods })
}

fn parse_method(node: TsNode, source: &Arc<str>) -> Option<MethodDecl> {
    let src = source.as_bytes();
    let name = node_text(node.child_by_field_name("name")?, src).to_string();

    let mut annotations = Vec::new();
    for child in node.children(&mut node.walk()) {
        if child.kind() != "modifiers" {
            continue;
        }
        for modifier in child.children(&mut child.walk()) {
            if matches!(modifier.kind(), "marker_annotation" | "annotation") {
                if let Some(name_node) = modifier.child_by_field_name("name") {
                    annotations.push(Annotation {
                        segments: identifier_segments(name_node, src),
                    });
                }
            }
        }
    }

    let body = node.child_by_field_name("body").map(|block| match lower(block, source) {
        Child::Sequence(statements) => statements,
        Child::Node(node) => vec![node],
        Child::Token(_) => Vec::new(),
    });

    Some(MethodDecl {
        name,
        annotations,
        body,
    })
}

/// Identifier texts under `node` in source order (`a.b.c` -> `[a, b, c]`)
fn identifier_segments(node: TsNode, src: &[u8]) -> Vec<String> {
    let mut segments = Vec::new();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        if current.kind() == "identifier" {
            segments.push(node_text(current, src).to_string());
            continue;
        }
        let children: Vec<TsNode> = current.named_children(&mut current.walk()).collect();
        stack.extend(children.into_iter().rev());
    }
    segments
}

type Lowered = Vec<(Option<&'static str>, Child)>;

/// Lower a tree-sitter subtree into [`Node`]s.
///
/// Nodes are listed in pre-order with an explicit stack and then assembled
/// in reverse, so every child is built before its parent and nesting depth
/// never touches the call stack. Children are moved into their parent, never
/// copied, and node text is kept as a range into the shared source.
fn lower(root: TsNode, source: &Arc<str>) -> Child {
    let mut nodes: Vec<TsNode> = Vec::new();
    let mut kids: Vec<Vec<(Option<&'static str>, usize)>> = Vec::new();
    let mut stack: Vec<(TsNode, Option<usize>, Option<&'static str>)> = vec![(root, None, None)];

    while let Some((node, parent, field)) = stack.pop() {
        let idx = nodes.len();
        nodes.push(node);
        kids.push(Vec::new());
        if let Some(parent) = parent {
            kids[parent].push((field, idx));
        }

        let mut pending = Vec::new();
        let mut cursor = node.walk();
        if cursor.goto_first_child() {
            loop {
                let child = cursor.node();
                if !child.is_extra() {
                    pending.push((child, Some(idx), cursor.field_name()));
                }
                if !cursor.goto_next_sibling() {
                    break;
                }
            }
        }
        stack.extend(pending.into_iter().rev());
    }

    let mut built: Vec<Option<Child>> = (0..nodes.len()).map(|_| None).collect();
    for idx in (0..nodes.len()).rev() {
        let children: Lowered = kids[idx]
            .iter()
            .filter_map(|&(field, child)| built[child].take().map(|c| (field, c)))
            .collect();
        built[idx] = Some(assemble(nodes[idx], source, children));
    }

    built
        .first_mut()
        .and_then(Option::take)
        .unwrap_or_else(|| Child::Sequence(Vec::new()))
}

/// Build one lowered node from its already lowered children
fn assemble(node: TsNode, source: &Arc<str>, children: Lowered) -> Child {
    let src = source.as_bytes();
    if !node.is_named() {
        return Child::Token(node_text(node, src).to_string());
    }

    let kind = node.kind();
    if LITERAL_KINDS.contains(&kind) {
        return Child::Node(Node::Literal(node_text(node, src).to_string()));
    }
    if NAME_KINDS.contains(&kind) {
        return Child::Node(Node::name(node_text(node, src)));
    }
    if SEQUENCE_KINDS.contains(&kind) {
        let items = children
            .into_iter()
            .flat_map(|(_, child)| match child {
                Child::Node(node) => vec![node],
                Child::Sequence(nodes) => nodes,
                Child::Token(_) => Vec::new(),
            })
            .collect();
        return Child::Sequence(items);
    }

    let children = match kind {
        "field_access" => match assemble_field_access(node, src, children) {
            Ok(reference) => return Child::Node(reference),
            Err(children) => children,
        },
        "binary_expression" => match assemble_binary(children) {
            Ok(binary) => return Child::Node(binary),
            Err(children) => children,
        },
        "method_invocation" => match assemble_invocation(node, source, children) {
            Ok(invocation) => return Child::Node(Node::Invocation(invocation)),
            Err(children) => children,
        },
        _ => children,
    };

    Child::Node(Node::Other {
        kind: kind.to_string(),
        text: span(node, source),
        children: children.into_iter().map(|(_, child)| child).collect(),
    })
}

/// `a.b` where `a` is itself a name or field path; anything else is handed back
fn assemble_field_access(node: TsNode, src: &[u8], mut children: Lowered) -> Result<Node, Lowered> {
    let Some(member) = node.child_by_field_name("field").map(|f| node_text(f, src)) else {
        return Err(children);
    };
    let Some(pos) = children.iter().position(|(field, child)| {
        *field == Some("object") && matches!(child, Child::Node(Node::MemberReference { .. }))
    }) else {
        return Err(children);
    };
    match children.remove(pos) {
        (_, Child::Node(Node::MemberReference { qualifier, member: last })) => {
            let mut path = qualifier.map(|q| q + ".").unwrap_or_default();
            path.push_str(&last);
            Ok(Node::field(path, member))
        }
        other => {
            children.insert(pos, other);
            Err(children)
        }
    }
}

fn assemble_binary(children: Lowered) -> Result<Node, Lowered> {
    let has = |name: &str, token: bool| {
        children.iter().any(|(field, child)| {
            *field == Some(name)
                && match child {
                    Child::Token(_) => token,
                    Child::Node(_) => !token,
                    Child::Sequence(_) => false,
                }
        })
    };
    if !(has("left", false) && has("operator", true) && has("right", false)) {
        return Err(children);
    }

    let mut left = None;
    let mut right = None;
    let mut operator = String::new();
    for (name, child) in children {
        match (name, child) {
            (Some("left"), Child::Node(node)) => left = Some(node),
            (Some("right"), Child::Node(node)) => right = Some(node),
            (Some("operator"), Child::Token(op)) => operator = op,
            _ => {}
        }
    }
    Ok(Node::Binary {
        left: Box::new(left.unwrap_or_else(|| Node::Literal(String::new()))),
        operator,
        right: Box::new(right.unwrap_or_else(|| Node::Literal(String::new()))),
    })
}

fn assemble_invocation(node: TsNode, source: &Arc<str>, children: Lowered) -> Result<Invocation, Lowered> {
    let Some(name_node) = node.child_by_field_name("name") else {
        return Err(children);
    };
    let member = node_text(name_node, source.as_bytes()).to_string();

    let mut object = None;
    let mut arguments = Vec::new();
    for (name, child) in children {
        match (name, child) {
            (Some("object"), child) => object = Some(child),
            (Some("arguments"), Child::Sequence(args)) => arguments = args,
            _ => {}
        }
    }

    let text = span(node, source);
    let invocation = match object {
        // Chained call: hang it off the base of the existing chain
        Some(Child::Node(Node::Invocation(mut base))) => {
            base.selectors.push(Invocation {
                member,
                qualifier: None,
                arguments,
                selectors: Vec::new(),
                receiver: None,
                text: SourceText::new(source.clone(), name_node.start_byte()..node.end_byte()),
            });
            base.text = text;
            base
        }
        Some(Child::Node(Node::MemberReference { qualifier, member: last })) => Invocation {
            member,
            qualifier: Some(match qualifier {
                Some(q) => format!("{}.{}", q, last),
                None => last,
            }),
            arguments,
            selectors: Vec::new(),
            receiver: None,
            text,
        },
        Some(Child::Node(receiver)) => Invocation {
            member,
            qualifier: None,
            arguments,
            selectors: Vec::new(),
            receiver: Some(Box::new(receiver)),
            text,
        },
        _ => Invocation {
            member,
            qualifier: None,
            arguments,
            selectors: Vec::new(),
            receiver: None,
            text,
        },
    };
    Ok(invocation)
}

fn span(node: TsNode, source: &Arc<str>) -> SourceText {
    SourceText::new(source.clone(), node.start_byte()..node.end_byte())
}

fn node_text<'a>(node: TsNode, src: &'a [u8]) -> &'a str {
    node.utf8_text(src).unwrap_or("")
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> CompilationUnit {
        TreeSitterJava
            .parse(source, "Test.java")
            .expect("should parse Java source")
    }

    fn first_statement(source: &str) -> Node {
        let unit = parse(source);
        let method = &unit.classes[0].methods[0];
        method.body.as_ref().expect("method should have a body")[0].clone()
    }

    fn find_invocation(node: &Node) -> Option<Invocation> {
        let mut stack = vec![node.clone()];
        while let Some(current) = stack.pop() {
            match current {
                Node::Invocation(inv) => return Some(inv),
                Node::Other { children, .. } => {
                    for child in children.into_iter().rev() {
                        match child {
                            Child::Node(n) => stack.push(n),
                            Child::Sequence(nodes) => stack.extend(nodes.into_iter().rev()),
                            Child::Token(_) => {}
                        }
                    }
                }
                _ => {}
            }
        }
        None
    }

    #[test]
    fn test_imports_and_flags() {
        let unit = parse(
            r#"
import org.openqa.selenium.By;
import static org.testng.Assert.assertEquals;
import org.openqa.selenium.support.ui.*;

public class A {}
"#,
        );
        assert_eq!(unit.imports.len(), 3);
        assert_eq!(unit.imports[0].path, "org.openqa.selenium.By");
        assert!(!unit.imports[0].is_static);
        assert_eq!(unit.imports[1].path, "org.testng.Assert.assertEquals");
        assert!(unit.imports[1].is_static);
        assert_eq!(unit.imports[2].path, "org.openqa.selenium.support.ui");
        assert!(unit.imports[2].is_wildcard);
    }

    #[test]
    fn test_methods_exclude_constructors_and_nested_classes() {
        let unit = parse(
            r#"
public class Outer {
    public Outer() {}
    void first() {}
    abstract void second();
    static class Inner {
        void hidden() {}
    }
}
class Later {
    void other() {}
}
"#,
        );
        assert_eq!(unit.classes.len(), 2);
        let outer = &unit.classes[0];
        assert_eq!(outer.name, "Outer");
        let names: Vec<_> = outer.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second"]);
        assert!(outer.methods[1].body.is_none());
        assert_eq!(unit.classes[1].name, "Later");
    }

    #[test]
    fn test_annotation_segments() {
        let unit = parse(
            r#"
public class A {
    @Test
    @org.testng.annotations.BeforeMethod
    @Parameters({"browser"})
    public void m() {}
}
"#,
        );
        let names: Vec<String> = unit.classes[0].methods[0]
            .annotations
            .iter()
            .map(Annotation::name)
            .collect();
        assert_eq!(
            names,
            vec!["Test", "org.testng.annotations.BeforeMethod", "Parameters"]
        );
    }

    #[test]
    fn test_chain_is_flattened_onto_base_call() {
        let statement = first_statement(
            r#"
class A {
    void m() {
        driver.findElement(By.id("u")).sendKeys("admin");
    }
}
"#,
        );
        let inv = find_invocation(&statement).expect("should find invocation");
        assert_eq!(inv.member, "findElement");
        assert_eq!(inv.qualifier.as_deref(), Some("driver"));
        assert_eq!(inv.arguments.len(), 1);
        assert!(matches!(&inv.arguments[0], Node::Invocation(arg) if arg.member == "id"));
        assert_eq!(inv.selectors.len(), 1);
        assert_eq!(inv.selectors[0].member, "sendKeys");
        assert_eq!(inv.selectors[0].qualifier, None);
        assert_eq!(inv.selectors[0].arguments, vec![Node::literal("\"admin\"")]);
    }

    #[test]
    fn test_field_access_qualifier() {
        let statement = first_statement(
            r#"
class A {
    void m() {
        this.driver.get(BASE_URL + "/login");
    }
}
"#,
        );
        let inv = find_invocation(&statement).expect("should find invocation");
        assert_eq!(inv.qualifier.as_deref(), Some("this.driver"));
        match &inv.arguments[0] {
            Node::Binary { operator, .. } => assert_eq!(operator, "+"),
            other => panic!("expected binary argument, got {:?}", other),
        }
    }

    #[test]
    fn test_complex_receiver_is_kept() {
        let statement = first_statement(
            r#"
class A {
    void m() {
        new LoginPage(driver).open();
    }
}
"#,
        );
        let inv = find_invocation(&statement).expect("should find invocation");
        assert_eq!(inv.member, "open");
        assert_eq!(inv.qualifier, None);
        assert!(matches!(inv.receiver.as_deref(), Some(Node::Other { kind, .. }) if kind == "object_creation_expression"));
    }

    #[test]
    fn test_unterminated_class_is_syntax_invalid() {
        let err = TreeSitterJava
            .parse("public class Broken {\n    void m() {\n", "Broken.java")
            .unwrap_err();
        let ParseError::SyntaxInvalid { message } = err;
        assert!(message.starts_with("Broken.java: "), "got: {}", message);
        assert!(message.contains("line"), "got: {}", message);
    }

    #[test]
    fn test_garbage_is_syntax_invalid() {
        assert!(TreeSitterJava.parse("class { ;;; }}}", "").is_err());
    }

    #[test]
    fn test_top_level_statement_is_syntax_invalid() {
        let err = TreeSitterJava
            .parse("driver.get(\"x\");\n", "P.java")
            .unwrap_err();
        assert_eq!(
            err.message(),
            "P.java: unexpected \"driver.get(\"x\");\" at line 1, column 1"
        );
    }

    #[test]
    fn test_keyword_as_identifier_is_syntax_invalid() {
        let err = TreeSitterJava
            .parse("class A { void m() { return return; } }", "A.java")
            .unwrap_err();
        assert!(err.message().starts_with("A.java: "), "got: {}", err.message());
    }

    #[test]
    fn test_declarations_and_comments_are_accepted() {
        let unit = parse(
            r#"
// header
package com.example.tests;

import org.openqa.selenium.By;;

/* block */
interface Page {}
enum Browser { CHROME }
public class A { void check() { var value = 1; } }
"#,
        );
        assert_eq!(unit.classes.len(), 1);
        assert_eq!(unit.classes[0].methods[0].name, "check");
    }

    #[test]
    fn test_deeply_parenthesized_expression_parses() {
        let depth = 2000;
        let expr = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        let source = format!("class A {{ void m() {{ int x = {}; }} }}", expr);
        let unit = parse(&source);
        assert_eq!(unit.classes[0].methods.len(), 1);
    }

    #[test]
    fn test_long_chain_lowers_in_linear_shape() {
        let links = 20_000;
        let source = format!("class A {{ void m() {{ d.a(){}; }} }}", ".c()".repeat(links));
        let unit = parse(&source);
        let body = unit.classes[0].methods[0].body.as_ref().expect("body");
        let Node::Other { children, .. } = &body[0] else {
            panic!("expected expression statement");
        };
        let Some(Child::Node(Node::Invocation(base))) = children.first() else {
            panic!("expected invocation");
        };
        assert_eq!(base.member, "a");
        assert_eq!(base.qualifier.as_deref(), Some("d"));
        assert_eq!(base.selectors.len(), links);
        assert_eq!(base.selectors[links - 1].text.raw(), "c()");
    }

    #[test]
    fn test_long_concatenation_argument() {
        let terms = 20_000;
        let expr = vec!["x"; terms].join(" + ");
        let source = format!("class A {{ void m() {{ d.get({}); }} }}", expr);
        let metadata = crate::parsers::parse_source(&source, "A.java").expect("should parse");
        let calls = &metadata.methods[0].calls;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].arguments, vec![expr]);
    }
}
