//! Source files and locations.
//!
//! Every file loaded into a `Source` gets a distinct `Unit`,
//! and positions and spans inside the file are relative to that unit.
//! The lexer additionally tracks a human-readable `Location` (line, column, offset).

mod loc;
mod source;

pub use crate::loc::{Unit, Pos, Span, Spanned, WithLoc, Location};
pub use crate::source::{Source, SourceFile, SourceSlice, SourceLineSpans};
