//! Error and diagnostic system for the scene parser.
//!
//! Every phase (lexing, parsing, elaboration) reports problems as
//! [`Diagnostic`] values. Fatal problems are wrapped in a [`ParseError`];
//! warnings travel alongside a successfully parsed scene.
//!
//! # Example
//!
//! ```
//! # use scenery_parser::error::{Diagnostic, ErrorCode};
//! # use scenery_parser::Span;
//!
//! let diag = Diagnostic::warning("could not find parent node `Camera/Rig`")
//!     .with_code(ErrorCode::E200)
//!     .with_label(Span::new(120..132), "unknown parent path")
//!     .with_help("the node is dropped from the scene tree");
//! ```

mod collector;
mod diagnostic;
mod error_code;
mod label;
mod parse_error;
mod severity;

pub(crate) use collector::DiagnosticCollector;

pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use parse_error::ParseError;
pub use severity::Severity;
