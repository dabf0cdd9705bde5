use std::io;
use std::fs;
use std::path::Path;
use std::collections::HashMap;
use crate::loc::{Unit, Pos, Span};
use crate::loc::{unit_from_u32, pos_from_u32, span_from_u32};

/// An iterator over the spans of consecutive lines.
///
/// Each span includes the trailing newline, if any.
#[derive(Clone)]
pub struct SourceLineSpans<'a> {
    slice: &'a [u32],
    unit: Unit,
}

impl<'a> Iterator for SourceLineSpans<'a> {
    type Item = Span;

    fn next(&mut self) -> Option<Span> {
        if let Some((&p, newslice)) = self.slice.split_first() {
            if let Some(&q) = newslice.first() {
                self.slice = newslice;
                return Some(span_from_u32(self.unit, p, q));
            }
        }
        None
    }
}

/// A single source file, decoded into Unicode scalar values.
pub struct SourceFile {
    path: String, // not PathBuf since it is solely for reporting
    chars: Vec<char>,
    unit: Unit,
    lineoffs: Vec<u32>,
}

impl SourceFile {
    fn calculate_lineoffs(data: &[char]) -> Vec<u32> {
        // the BOM is kept in the buffer but excluded from the file span
        let begin = if data.first() == Some(&'\u{feff}') { 1 } else { 0 };
        let end = data.len() as u32;

        let mut it = data[begin as usize..].iter().cloned().peekable();
        let mut off = begin;
        let mut lineoffs = vec![off];
        while let Some(c) = it.next() {
            off += 1;
            match c {
                '\r' => {
                    // `\r\n` is a single line break
                    if it.peek() == Some(&'\n') {
                        it.next();
                        off += 1;
                    }
                    lineoffs.push(off);
                }
                '\n' => lineoffs.push(off),
                _ => {}
            }
        }

        lineoffs.push(end);
        lineoffs
    }

    pub fn from_file(path: &Path) -> io::Result<SourceFile> {
        let data = fs::read(path)?;
        Ok(SourceFile::from_u8(path.display().to_string(), data))
    }

    /// Creates a source file from UTF-8 bytes; invalid sequences become U+FFFD.
    pub fn from_u8(path: String, data: Vec<u8>) -> SourceFile {
        SourceFile::from_chars(path, String::from_utf8_lossy(&data).chars().collect())
    }

    pub fn from_str(path: String, data: &str) -> SourceFile {
        SourceFile::from_chars(path, data.chars().collect())
    }

    fn from_chars(path: String, chars: Vec<char>) -> SourceFile {
        let lineoffs = SourceFile::calculate_lineoffs(&chars);
        SourceFile { path, chars, unit: Unit::dummy(), lineoffs }
    }

    fn set_unit(&mut self, unit: Unit) {
        assert!(!unit.is_dummy() && self.unit.is_dummy());
        self.unit = unit;
    }

    pub fn path(&self) -> &str { &self.path }

    pub fn unit(&self) -> Unit { self.unit }

    pub fn span(&self) -> Span {
        let begin = self.lineoffs.first().cloned().unwrap_or(0);
        let end = self.lineoffs.last().cloned().unwrap_or(0);
        span_from_u32(self.unit, begin, end)
    }

    // line number starts from 0
    pub fn line_from_pos(&self, pos: Pos) -> Option<(usize, Span)> {
        let unit = pos.unit();
        let pos = pos.to_usize() as u32;
        if unit.is_dummy() || unit != self.unit {
            return None;
        }

        let lineoffs = &self.lineoffs[..self.lineoffs.len()-1];
        let i = match lineoffs.binary_search(&pos) {
            Ok(i) => i,
            Err(0) => return None, // pos < span.begin()
            Err(i) => i-1,
        };
        let begin = self.lineoffs[i];
        let end = self.lineoffs[i+1];
        if end < pos { return None; } // pos > span.end()
        Some((i, span_from_u32(unit, begin, end)))
    }

    // line number starts from 0
    // the line span iterator contains both the first and last line covered by the span
    pub fn lines_from_span(&self, span: Span) -> Option<(usize, SourceLineSpans, usize)> {
        let unit = span.unit();
        if unit.is_dummy() || unit != self.unit {
            return None;
        }

        let (begin, _) = self.line_from_pos(span.begin())?;
        let (end, _) = self.line_from_pos(span.end())?;
        let spans = SourceLineSpans { slice: &self.lineoffs[begin..(end+2)], unit };
        Some((begin, spans, end))
    }
}

/// A borrowed run of source characters.
pub type SourceSlice<'a> = &'a [char];

/// The registry of all source files.
pub struct Source {
    files: HashMap<Unit, SourceFile>,
    next_unit: u32,
}

impl Source {
    pub fn new() -> Source {
        Source { files: HashMap::new(), next_unit: 1 }
    }

    pub fn add(&mut self, mut file: SourceFile) -> Span {
        let unit = unit_from_u32(self.next_unit);
        file.set_unit(unit);
        let span = file.span();
        self.files.insert(unit, file);
        self.next_unit += 1;
        span
    }

    pub fn slice_from_span(&self, span: Span) -> Option<SourceSlice> {
        let file = self.files.get(&span.unit())?;
        let range = span.begin().to_usize()..span.end().to_usize();
        file.chars.get(range)
    }

    pub fn get_file(&self, unit: Unit) -> Option<&SourceFile> {
        self.files.get(&unit)
    }

    /// Returns a position `offset` characters after the beginning of `span`.
    pub fn pos_in_span(&self, span: Span, offset: usize) -> Pos {
        if !span.is_dummy() {
            pos_from_u32(span.unit(), span.begin().to_usize() as u32 + offset as u32)
        } else {
            span.begin()
        }
    }
}

impl Default for Source {
    fn default() -> Source { Source::new() }
}

#[test]
fn test_source_file() {
    let unit = unit_from_u32(1);
    let mk_pos = |pos| pos_from_u32(unit, pos);
    let mk_span = |begin, end| span_from_u32(unit, begin, end);
    let tr_lines = |(begin, spans, end): (usize, SourceLineSpans, usize)| {
        (begin, spans.collect::<Vec<Span>>(), end)
    };

    // empty file
    let mut f = SourceFile::from_str("foo".into(), "");
    f.set_unit(unit);
    assert_eq!(f.span(), mk_span(0, 0));
    assert_eq!(f.line_from_pos(mk_pos(0)), Some((0, mk_span(0, 0))));
    assert_eq!(f.line_from_pos(mk_pos(1)), None);

    const SOURCE: &str = "\u{feff}hello\nworld\r\n\ra\n\nxyz";
    // line span:           <--->  <--->   /\ ^ /\ <->
    // char offset:    0    123456 789012 3 4 56 7 890

    let mut f = SourceFile::from_str("foo".into(), SOURCE);
    f.set_unit(unit);
    assert_eq!(f.span(), mk_span(1, 21));
    assert_eq!(f.lines_from_span(f.span()).map(&tr_lines),
               Some((0, vec![mk_span(1, 7), mk_span(7, 14), mk_span(14, 15), mk_span(15, 17),
                             mk_span(17, 18), mk_span(18, 21)], 5)));
    assert_eq!(f.line_from_pos(mk_pos(0)), None);
    assert_eq!(f.line_from_pos(mk_pos(1)), Some((0, mk_span(1, 7))));
    assert_eq!(f.line_from_pos(mk_pos(7)), Some((1, mk_span(7, 14))));
    assert_eq!(f.line_from_pos(mk_pos(21)), Some((5, mk_span(18, 21)))); // allow past-the-end
    assert_eq!(f.line_from_pos(mk_pos(22)), None);
    assert_eq!(f.lines_from_span(mk_span(12, 16)).map(&tr_lines),
               Some((1, vec![mk_span(7, 14), mk_span(14, 15), mk_span(15, 17)], 3)));
    assert_eq!(f.lines_from_span(mk_span(0, 3)).map(&tr_lines), None);

    let mut source = Source::new();
    let span = source.add(SourceFile::from_str("bar".into(), "한글 ok"));
    assert_eq!(span.len(), 5);
    assert_eq!(source.slice_from_span(span), Some(&['한', '글', ' ', 'o', 'k'][..]));
}
