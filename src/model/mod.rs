//! Document model types for DOCX content.
//!
//! This module defines the in-memory representation shared by the reader,
//! the extraction engine and the writer. A document is an ordered list of
//! body blocks; raw properties XML is carried alongside so that a document
//! read from disk can be written back with its formatting intact.

mod block;
mod document;
mod paragraph;
mod table;

pub use block::Block;
pub use document::{Document, Metadata, PackageSource, StyleInfo, StyleSheet};
pub use paragraph::{InlineContent, Paragraph, ParagraphStyle, TextRun};
pub use table::{Table, TableCell, TableRow};
