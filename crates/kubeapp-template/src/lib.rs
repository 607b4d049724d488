//! # kubeapp-template
//!
//! Turns a placeholder-bearing app definition into concrete text.
//!
//! Handles:
//! - **Lexer**: Scanning `$NAME|default:VALUE|Title$` occurrences with `nom`.
//! - **Field**: Grouping occurrences by name and resolving defaults.
//! - **Autogen**: Random tokens for `default:autogen` fields.
//! - **Filler**: Rewriting the template with resolved or caller-supplied values.

pub mod autogen;
pub mod field;
pub mod filler;
pub mod lexer;

pub use field::{Field, FieldTable};
pub use filler::{FieldValues, Template};
