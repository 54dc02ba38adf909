//! DOCX parsing module.

mod body;
mod docx_parser;
mod options;
mod parts;

pub(crate) use body::{NON_BREAKING_HYPHEN, SOFT_HYPHEN};
#[cfg(test)]
pub(crate) use body::{parse_paragraph, parse_table};
#[cfg(test)]
pub(crate) use docx_parser::read_entry;
pub use docx_parser::DocxParser;
pub use options::{ErrorMode, ParseOptions};
