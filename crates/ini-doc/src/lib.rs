//! INI document parsing, merging, and persistence
//!
//! Reads INI text into a case-insensitive, order-preserving document,
//! overlays read-through merge layers, and writes it back with comments,
//! quoting and escapes intact.

pub mod document;
pub mod error;
pub mod line;
pub mod merge;
pub mod options;
pub mod parser;
pub mod persist;
pub mod store;
pub mod view;

pub use document::IniDocument;
pub use error::{Error, Result};
pub use line::ParsedLine;
pub use merge::{MergeLayer, MergeStrategy, SharedDocument};
pub use options::{DEFAULT_SECTION_TERMINATOR, IniOptions};
pub use parser::{BestEffortParser, LineParser, ParsePolicy, StrictParser};
pub use persist::PersistStrategy;
pub use store::{Entry, Section, SectionStore};
pub use view::{SectionView, SectionViewMut};
