//! Core data models for Seleniport
//!
//! These value objects describe what the extractor recovered from one Java
//! source file. They are built once, owned by the caller, and serialize to the
//! plain JSON record handed to the conversion step.

use serde::{Deserialize, Serialize};

/// One method-invocation expression found in a method body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CallInfo {
    /// Simple name of the invoked method (`findElement`)
    pub method: String,
    /// Textual receiver (`driver`, `this.driver`, `By`), `None` for calls
    /// chained onto a previous result or made without a receiver
    pub qualifier: Option<String>,
    /// Stringified argument expressions, in source order
    pub arguments: Vec<String>,
}

impl CallInfo {
    pub fn new(method: impl Into<String>, qualifier: Option<String>, arguments: Vec<String>) -> Self {
        Self {
            method: method.into(),
            qualifier,
            arguments,
        }
    }

    /// Render as it would read in source: `driver.findElement(By.id("u"))`
    pub fn display(&self) -> String {
        let args = self.arguments.join(", ");
        match &self.qualifier {
            Some(q) => format!("{}.{}({})", q, self.method, args),
            None => format!(".{}({})", self.method, args),
        }
    }
}

/// A method declared directly on the primary class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MethodDescriptor {
    pub name: String,
    /// Annotation names in declaration order, qualified names joined with `.`
    pub annotations: Vec<String>,
    /// Calls in discovery order (pre-order, chains left to right)
    pub calls: Vec<CallInfo>,
}

impl MethodDescriptor {
    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations
            .iter()
            .any(|a| a == name || a.rsplit('.').next() == Some(name))
    }
}

/// Structured description of one Java source file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SourceMetadata {
    pub file_name: String,
    /// First top-level class name, empty if the file declares none
    pub class_name: String,
    /// Every import path in declaration order, duplicates kept
    pub imports: Vec<String>,
    /// Subset of `imports` that belong to the browser-automation libraries
    pub automation_imports: Vec<String>,
    /// True if any import belongs to the TestNG package
    pub uses_test_framework: bool,
    pub methods: Vec<MethodDescriptor>,
}

impl SourceMetadata {
    /// Total number of recorded calls across all methods
    pub fn call_count(&self) -> usize {
        self.methods.iter().map(|m| m.calls.len()).sum()
    }

    /// Methods carrying an annotation with the given simple name
    pub fn methods_annotated<'a>(
        &'a self,
        annotation: &'a str,
    ) -> impl Iterator<Item = &'a MethodDescriptor> + 'a {
        self.methods
            .iter()
            .filter(move |m| m.has_annotation(annotation))
    }

    pub fn method(&self, name: &str) -> Option<&MethodDescriptor> {
        self.methods.iter().find(|m| m.name == name)
    }
}
