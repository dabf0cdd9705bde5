use std::ops;
use std::fmt;

/// An identifier of a source file registered to `Source`. Unit 0 is reserved for the dummy.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Unit {
    unit: u32,
}

pub(crate) fn unit_from_u32(unit: u32) -> Unit {
    Unit { unit }
}

impl Unit {
    pub fn dummy() -> Unit {
        Unit { unit: 0 }
    }

    pub fn is_dummy(&self) -> bool {
        self.unit == 0
    }
}

/// A character offset into a particular unit.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Pos {
    unit: u32,
    pos: u32,
}

pub(crate) fn pos_from_u32(unit: Unit, pos: u32) -> Pos {
    Pos { unit: unit.unit, pos }
}

impl Pos {
    pub fn dummy() -> Pos {
        Pos { unit: 0, pos: 0 }
    }

    pub fn is_dummy(&self) -> bool {
        self.unit().is_dummy()
    }

    pub fn unit(&self) -> Unit {
        Unit { unit: self.unit }
    }

    pub fn to_usize(&self) -> usize {
        self.pos as usize
    }

    /// Moves the position by given number of characters. A dummy position does not move.
    pub fn offset_by(&self, delta: usize) -> Pos {
        if self.is_dummy() {
            *self
        } else {
            Pos { unit: self.unit, pos: self.pos + delta as u32 }
        }
    }
}

impl fmt::Debug for Pos {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_dummy() {
            write!(f, "@_")
        } else {
            write!(f, "@{}/{}", self.unit, self.pos)
        }
    }
}

/// A half-open range of characters in a unit.
///
/// The dummy span (in the unit 0) indicates the absence of location informations.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    unit: u32,
    begin: u32,
    end: u32,
}

pub(crate) fn span_from_u32(unit: Unit, begin: u32, end: u32) -> Span {
    Span { unit: unit.unit, begin, end }
}

impl Span {
    /// Makes a span between two positions, which may be given in any order.
    /// Any dummy position results in a dummy span.
    pub fn new(begin: Pos, end: Pos) -> Span {
        if begin.is_dummy() || end.is_dummy() {
            return Span::dummy();
        }
        assert!(begin.unit == end.unit, "Span::new with positions from different units");
        if begin.pos <= end.pos {
            Span { unit: begin.unit, begin: begin.pos, end: end.pos }
        } else {
            Span { unit: begin.unit, begin: end.pos, end: begin.pos }
        }
    }

    pub fn dummy() -> Span {
        Span { unit: 0, begin: 0, end: 0 }
    }

    pub fn is_dummy(&self) -> bool {
        self.unit().is_dummy()
    }

    pub fn unit(&self) -> Unit {
        Unit { unit: self.unit }
    }

    pub fn begin(&self) -> Pos {
        Pos { unit: self.unit, pos: self.begin }
    }

    pub fn end(&self) -> Pos {
        Pos { unit: self.unit, pos: self.end }
    }

    /// The number of characters covered by the span; zero for the dummy span.
    pub fn len(&self) -> usize {
        (self.end - self.begin) as usize
    }
}

// printed only in the alternate mode, so that `{:?}` of a token shows the token alone
impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !f.alternate() {
            Ok(())
        } else if self.unit == 0 {
            write!(f, "@_")
        } else if self.begin == self.end {
            write!(f, "@{}/{}", self.unit, self.begin)
        } else {
            write!(f, "@{}/{}-{}", self.unit, self.begin, self.end)
        }
    }
}

impl From<Pos> for Span {
    fn from(pos: Pos) -> Span {
        Span { unit: pos.unit, begin: pos.pos, end: pos.pos }
    }
}

/// A value with an associated span.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Spanned<T> {
    pub span: Span,
    pub base: T,
}

impl<T> ops::Deref for Spanned<T> {
    type Target = T;
    fn deref(&self) -> &T { &self.base }
}

impl<T: fmt::Debug> fmt::Debug for Spanned<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&self.base, f)?;
        fmt::Debug::fmt(&self.span, f)
    }
}

pub trait WithLoc: Sized {
    fn with_loc<Loc: Into<Span>>(self, loc: Loc) -> Spanned<Self> {
        Spanned { span: loc.into(), base: self }
    }
}

impl<T> WithLoc for T {}

/// A human-readable cursor position.
///
/// `line` and `column` start from 1, `offset` counts characters from 0.
/// Columns are counted in characters; a tab is a single column.
/// Line breaks are `\n`, `\r\n` and a lone `\r`, as in `SourceFile`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Location {
    pub line: u32,
    pub column: u32,
    pub offset: u32,
}

impl Location {
    pub fn start() -> Location {
        Location { line: 1, column: 1, offset: 0 }
    }

    /// Steps over a single character `c`, which is followed by `next`.
    pub fn advance(&mut self, c: char, next: Option<char>) {
        self.offset += 1;
        match (c, next) {
            ('\r', Some('\n')) => {} // the line ends at `\n`
            ('\r', _) | ('\n', _) => {
                self.line += 1;
                self.column = 1;
            }
            _ => self.column += 1,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}(+{})", self.line, self.column, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn advance_all(s: &str) -> Location {
        let chars: Vec<char> = s.chars().collect();
        let mut loc = Location::start();
        for (i, &c) in chars.iter().enumerate() {
            loc.advance(c, chars.get(i + 1).cloned());
        }
        loc
    }

    #[test]
    fn test_span() {
        let unit = unit_from_u32(1);
        let span = |b, e| span_from_u32(unit, b, e);

        assert_eq!(span(3, 7).len(), 4);
        assert_eq!(Span::dummy().len(), 0);
        assert_eq!(Span::new(pos_from_u32(unit, 9), pos_from_u32(unit, 4)), span(4, 9));
        assert_eq!(Span::new(Pos::dummy(), pos_from_u32(unit, 4)), Span::dummy());
        assert_eq!(Span::from(pos_from_u32(unit, 3)), span(3, 3));
        assert_eq!(pos_from_u32(unit, 3).offset_by(2), pos_from_u32(unit, 5));
        assert_eq!(Pos::dummy().offset_by(2), Pos::dummy());
        assert_eq!(format!("{:#?}", span(3, 7)), "@1/3-7");
        assert_eq!(format!("{:#?}", span(3, 3)), "@1/3");
        assert_eq!(format!("{:#?}", Span::dummy()), "@_");
        assert_eq!(format!("{:?}", span(3, 7)), "");
    }

    #[test]
    fn test_location_advance() {
        let loc = advance_all("ab\ncd");
        assert_eq!((loc.line, loc.column, loc.offset), (2, 3, 5));

        let loc = advance_all("\n\n\t");
        assert_eq!((loc.line, loc.column, loc.offset), (3, 2, 3));
        assert_eq!(loc.to_string(), "3:2");
    }

    #[test]
    fn test_location_carriage_return() {
        let loc = advance_all("a\r\nb");
        assert_eq!((loc.line, loc.column, loc.offset), (2, 2, 4));

        let loc = advance_all("a\rb\rcd");
        assert_eq!((loc.line, loc.column, loc.offset), (3, 3, 6));

        let loc = advance_all("\r\r\n");
        assert_eq!((loc.line, loc.column, loc.offset), (3, 1, 3));
    }
}
