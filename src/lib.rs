//! Seleniport - Selenium/TestNG to Playwright migration
//!
//! The core is a metadata extractor: [`parsers::parse_source`] turns Java
//! test source into a [`models::SourceMetadata`] record of imports, the
//! primary class, its methods, their annotations and the ordered calls of
//! each method body. The [`pipeline`] hands that record and the source to an
//! LLM ([`ai`]) that writes the Playwright test.

pub mod ai;
pub mod cli;
pub mod config;
pub mod models;
pub mod parsers;
pub mod pipeline;
pub mod reporters;

pub use models::{CallInfo, MethodDescriptor, SourceMetadata};
pub use parsers::{parse_file, parse_source, JavaFrontend, ParseError};
