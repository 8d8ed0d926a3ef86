//! Metadata extraction
//!
//! Walks a [`CompilationUnit`] and produces the [`SourceMetadata`] record:
//! import classification, the primary class and its methods, annotations,
//! and the ordered call sequence of every method body.

use crate::models::{CallInfo, MethodDescriptor, SourceMetadata};
use crate::parsers::imports::{is_automation_import, is_test_framework_import};
use crate::parsers::tree::{Annotation, Child, CompilationUnit, Invocation, MethodDecl, Node};
use tracing::debug;

/// Build the metadata record for one compilation unit
pub fn extract(unit: &CompilationUnit, file_name: &str) -> SourceMetadata {
    let mut metadata = SourceMetadata {
        file_name: file_name.to_string(),
        ..Default::default()
    };

    for import in &unit.imports {
        metadata.imports.push(import.path.clone());
        if is_automation_import(&import.path) {
            metadata.automation_imports.push(import.path.clone());
        }
        if is_test_framework_import(&import.path) {
            metadata.uses_test_framework = true;
        }
        if import.is_wildcard {
            debug!("{}: wildcard import {}.*", file_name, import.path);
        }
    }

    // Single-class contract: later top-level classes are not represented
    if let Some(class) = unit.classes.first() {
        metadata.class_name = class.name.clone();
        metadata.methods = class.methods.iter().map(describe_method).collect();

        for ignored in unit.classes.iter().skip(1) {
            debug!(
                "{}: ignoring additional top-level class {}",
                file_name, ignored.name
            );
        }
    }

    metadata
}

fn describe_method(method: &MethodDecl) -> MethodDescriptor {
    let mut calls = Vec::new();
    for statement in method.body.iter().flatten() {
        collect_calls(statement, &mut calls);
    }

    MethodDescriptor {
        name: method.name.clone(),
        annotations: method.annotations.iter().map(Annotation::name).collect(),
        calls,
    }
}

/// Whether invocations reached in the current position are recorded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Statement level: every invocation is an action
    Record,
    /// Inside an argument list: the value is summarized by its string form
    Argument,
}

enum Work<'a> {
    Visit(&'a Node, Mode),
    Invoke(&'a Invocation, Mode),
    Emit(&'a Invocation),
}

/// Child mode: code blocks passed around as values are still actions
fn mode_for(node: &Node, mode: Mode) -> Mode {
    if node.is_code_block() {
        Mode::Record
    } else {
        mode
    }
}

/// Append the calls performed by `root` to `calls`, in discovery order.
///
/// An invocation is recorded before the calls chained onto its result, so
/// `a(x).b(y).c(z)` yields `a, b, c`. A receiver that is not a plain name is
/// walked before the call made on it. Invocations used as argument values are
/// not recorded; code blocks inside arguments (lambdas, anonymous classes) are.
pub fn collect_calls(root: &Node, calls: &mut Vec<CallInfo>) {
    let mut stack = vec![Work::Visit(root, Mode::Record)];

    while let Some(work) = stack.pop() {
        match work {
            Work::Emit(invocation) => calls.push(call_info(invocation)),
            Work::Invoke(invocation, mode) => {
                // Pushed in reverse: receiver, self, arguments, selectors
                for selector in invocation.selectors.iter().rev() {
                    stack.push(Work::Invoke(selector, mode));
                }
                for argument in invocation.arguments.iter().rev() {
                    stack.push(Work::Visit(argument, mode_for(argument, Mode::Argument)));
                }
                if mode == Mode::Record {
                    stack.push(Work::Emit(invocation));
                }
                if let Some(receiver) = invocation.receiver.as_deref() {
                    stack.push(Work::Visit(receiver, mode_for(receiver, mode)));
                }
            }
            Work::Visit(node, mode) => match node {
                Node::Literal(_) | Node::MemberReference { .. } => {}
                Node::Binary { left, right, .. } => {
                    stack.push(Work::Visit(right.as_ref(), mode));
                    stack.push(Work::Visit(left.as_ref(), mode));
                }
                Node::Invocation(invocation) => stack.push(Work::Invoke(invocation, mode)),
                Node::Other { .. } => {
                    for child in node.children().into_iter().rev() {
                        match child {
                            Child::Node(child) => stack.push(Work::Visit(child, mode_for(child, mode))),
                            Child::Sequence(items) => {
                                for item in items.iter().rev() {
                                    stack.push(Work::Visit(item, mode_for(item, mode)));
                                }
                            }
                            Child::Token(_) => {}
                        }
                    }
                }
            },
        }
    }
}

fn call_info(invocation: &Invocation) -> CallInfo {
    CallInfo {
        method: invocation.member.clone(),
        qualifier: invocation.qualifier.clone(),
        arguments: invocation.arguments.iter().map(stringify).collect(),
    }
}

enum Piece<'a> {
    Node(&'a Node),
    Operator(&'a str),
}

/// Display form of an argument expression.
///
/// Literals keep their raw text, references render as `qualifier.member`,
/// binary expressions as `left op right`; anything else falls back to its
/// source text with whitespace collapsed.
pub fn stringify(node: &Node) -> String {
    let mut out = String::new();
    let mut stack = vec![Piece::Node(node)];

    while let Some(piece) = stack.pop() {
        match piece {
            Piece::Operator(op) => {
                out.push(' ');
                out.push_str(op);
                out.push(' ');
            }
            Piece::Node(Node::Binary {
                left,
                operator,
                right,
            }) => {
                stack.push(Piece::Node(right.as_ref()));
                stack.push(Piece::Operator(operator.as_str()));
                stack.push(Piece::Node(left.as_ref()));
            }
            Piece::Node(Node::Literal(text)) => out.push_str(text),
            Piece::Node(Node::MemberReference { qualifier, member }) => {
                if let Some(q) = qualifier {
                    out.push_str(q);
                    out.push('.');
                }
                out.push_str(member);
            }
            Piece::Node(Node::Invocation(invocation)) => out.push_str(&invocation.text.render()),
            Piece::Node(Node::Other { text, .. }) => out.push_str(&text.render()),
        }
    }

    out
}
