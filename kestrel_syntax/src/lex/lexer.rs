use std::error;
use std::fmt;

use kestrel_env::{Source, Pos, Span, Spanned, WithLoc, Location};
use kestrel_diag::{Locale, Localize, Localized};
use crate::message as m;

use super::{Tok, Punct};

fn is_identifier_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn is_operator_char(c: char) -> bool {
    match c {
        '+' | '-' | '*' | '/' | '%' | '=' | '<' | '>' |
        '!' | '&' | '|' | '^' | '~' | '?' | '.' => true,
        _ => false,
    }
}

// every identifier-shaped run goes through this first.
// only runs longer than two characters can have a radix prefix,
// and an unknown prefix means the whole run is read in decimal.
fn parse_number(s: &str) -> Option<u64> {
    let (digits, radix) = if s.chars().count() <= 2 {
        (s, 10)
    } else {
        match s.get(..2) {
            Some("0x") => (&s[2..], 16),
            Some("0b") => (&s[2..], 2),
            Some("0o") => (&s[2..], 8),
            _ => (s, 10),
        }
    };
    let digits: String = digits.chars().filter(|&c| c != '_').collect();
    u64::from_str_radix(&digits, radix).ok()
}

/// The kind of a lexical error.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// A control character outside of literals.
    InvalidCharacter(char),

    /// An empty character literal, or one with more than one character.
    InvalidCharacterLiteral,

    /// An unknown escape sequence, or a malformed `\x{...}`.
    /// The payload is the character following the backslash.
    InvalidEscape(char),

    /// The file ended in the middle of a literal or a block comment.
    UnexpectedEof,
}

impl Localize for ErrorKind {
    fn fmt_localized(&self, f: &mut fmt::Formatter, locale: Locale) -> fmt::Result {
        match *self {
            ErrorKind::InvalidCharacter(c) => {
                let msg = m::InvalidCharacter { ch: format!("{:?}", c) };
                msg.fmt_localized(f, locale)
            }
            ErrorKind::InvalidCharacterLiteral => {
                m::InvalidCharacterLiteral {}.fmt_localized(f, locale)
            }
            ErrorKind::InvalidEscape(c) => {
                let msg = m::InvalidEscape { ch: c.escape_debug().to_string() };
                msg.fmt_localized(f, locale)
            }
            ErrorKind::UnexpectedEof => {
                m::UnexpectedEof {}.fmt_localized(f, locale)
            }
        }
    }
}

/// A lexical error. Lexing stops at the first one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Error {
    pub kind: ErrorKind,
    /// The cursor at the time of failure.
    pub loc: Location,
    /// From the beginning of the offending token to the failure point.
    pub span: Span,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.loc, Localized::new(&self.kind, Locale::dummy()))
    }
}

impl error::Error for Error {}

/// A hand-written scanner over a character buffer.
///
/// As an iterator, it yields every token except for the final `Tok::EOF`
/// and stops right after the first error.
pub struct Lexer<'a> {
    chars: &'a [char],
    base: Pos,
    idx: usize,
    loc: Location,
    done: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a Source, span: Span) -> Lexer<'a> {
        let chars = source.slice_from_span(span).unwrap_or(&[]);
        let mut loc = Location::start();
        if let Some(file) = source.get_file(span.unit()) {
            if let Some((line, linespan)) = file.line_from_pos(span.begin()) {
                loc.line = line as u32 + 1;
                loc.column = (span.begin().to_usize() - linespan.begin().to_usize()) as u32 + 1;
            }
            loc.offset = span.begin().to_usize() as u32;
        }
        Lexer { chars, base: span.begin(), idx: 0, loc, done: false }
    }

    /// Lexes a bare buffer not registered to any `Source`. Tokens get dummy spans.
    pub fn from_chars(chars: &'a [char]) -> Lexer<'a> {
        Lexer { chars, base: Pos::dummy(), idx: 0, loc: Location::start(), done: false }
    }

    /// The current cursor.
    pub fn location(&self) -> Location {
        self.loc
    }

    fn pos(&self) -> Pos {
        self.base.offset_by(self.idx)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.idx).cloned()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.chars.get(self.idx + n).cloned()
    }

    fn advance(&mut self, n: usize) {
        for _ in 0..n {
            match self.peek() {
                Some(c) => {
                    self.loc.advance(c, self.peek_at(1));
                    self.idx += 1;
                }
                None => break,
            }
        }
    }

    fn read(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.advance(1);
        Some(c)
    }

    fn scan_while<Cond>(&mut self, mut cond: Cond) -> String where Cond: FnMut(char) -> bool {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if !cond(c) {
                break;
            }
            s.push(c);
            self.advance(1);
        }
        s
    }

    fn error(&self, begin: Pos, kind: ErrorKind) -> Error {
        debug!("lexer error at {:?}: {:?}", self.loc, kind);
        Error { kind, loc: self.loc, span: Span::new(begin, self.pos()) }
    }

    fn token(&self, begin: Pos, tok: Tok) -> Spanned<Tok> {
        let tok = tok.with_loc(Span::new(begin, self.pos()));
        trace!("lexed {:?} until {:?}", tok, self.loc);
        tok
    }

    // the backslash has been consumed
    fn scan_escape(&mut self, begin: Pos) -> Result<char, Error> {
        let c = match self.read() {
            Some(c) => c,
            None => return Err(self.error(begin, ErrorKind::UnexpectedEof)),
        };
        match c {
            'n' => Ok('\n'),
            't' => Ok('\t'),
            'r' => Ok('\r'),
            '"' => Ok('"'),
            '\'' => Ok('\''),
            '\\' => Ok('\\'),
            'x' => {
                match self.read() {
                    Some('{') => {}
                    Some(_) => return Err(self.error(begin, ErrorKind::InvalidEscape('x'))),
                    None => return Err(self.error(begin, ErrorKind::UnexpectedEof)),
                }
                let hex = self.scan_while(|c| c.is_ascii_hexdigit());
                match self.read() {
                    Some('}') => {}
                    Some(_) => return Err(self.error(begin, ErrorKind::InvalidEscape('x'))),
                    None => return Err(self.error(begin, ErrorKind::UnexpectedEof)),
                }
                match u8::from_str_radix(&hex, 16) {
                    Ok(v) => Ok(char::from(v)),
                    Err(_) => Err(self.error(begin, ErrorKind::InvalidEscape('x'))),
                }
            }
            c => Err(self.error(begin, ErrorKind::InvalidEscape(c))),
        }
    }

    // the opening quote has been consumed
    fn scan_char_literal(&mut self, begin: Pos) -> Result<u8, Error> {
        let c = match self.read() {
            Some('\'') => return Err(self.error(begin, ErrorKind::InvalidCharacterLiteral)),
            Some('\\') => self.scan_escape(begin)?,
            Some(c) => c,
            None => return Err(self.error(begin, ErrorKind::UnexpectedEof)),
        };
        match self.read() {
            Some('\'') => Ok((c as u32 & 0xff) as u8),
            Some(_) => Err(self.error(begin, ErrorKind::InvalidCharacterLiteral)),
            None => Err(self.error(begin, ErrorKind::UnexpectedEof)),
        }
    }

    // the opening quote has been consumed
    fn scan_string_literal(&mut self, begin: Pos) -> Result<String, Error> {
        let mut s = String::new();
        loop {
            match self.read() {
                Some('"') => return Ok(s),
                Some('\\') => s.push(self.scan_escape(begin)?),
                Some(c) => s.push(c),
                None => return Err(self.error(begin, ErrorKind::UnexpectedEof)),
            }
        }
    }

    // block comments do not nest; the first `*/` closes it
    fn skip_block_comment(&mut self, begin: Pos) -> Result<(), Error> {
        self.advance(2);
        loop {
            match self.read() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance(1);
                    return Ok(());
                }
                Some(_) => {}
                None => return Err(self.error(begin, ErrorKind::UnexpectedEof)),
            }
        }
    }

    fn scan_operator(&mut self) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if !is_operator_char(c) {
                break;
            }
            // a comment right after an operator is not part of it
            if c == '/' {
                if let Some('/') | Some('*') = self.peek_at(1) {
                    break;
                }
            }
            s.push(c);
            self.advance(1);
        }
        s
    }

    /// Reads the next token.
    ///
    /// Unlike the iterator interface, this returns `Tok::EOF` at the end of file
    /// (repeatedly, if called again).
    pub fn next_token(&mut self) -> Result<Spanned<Tok>, Error> {
        loop {
            self.scan_while(|c| c.is_whitespace() && c != '\n');

            let begin = self.pos();
            let c = match self.peek() {
                Some(c) => c,
                None => return Ok(self.token(begin, Tok::EOF)),
            };

            match c {
                '\n' | ';' => {
                    self.advance(1);
                    let sep = if c == '\n' { Punct::Newline } else { Punct::Semicolon };
                    let tok = self.token(begin, Tok::Punct(sep));
                    // consecutive separators are collapsed into the first one
                    self.scan_while(|c| c.is_whitespace() || c == ';');
                    return Ok(tok);
                }

                '/' if self.peek_at(1) == Some('/') => {
                    // do NOT consume the newline, it is a separator
                    self.scan_while(|c| c != '\n');
                }

                '/' if self.peek_at(1) == Some('*') => {
                    self.skip_block_comment(begin)?;
                }

                '\'' => {
                    self.advance(1);
                    let v = self.scan_char_literal(begin)?;
                    return Ok(self.token(begin, Tok::Char(v)));
                }

                '"' => {
                    self.advance(1);
                    let s = self.scan_string_literal(begin)?;
                    return Ok(self.token(begin, Tok::Str(s)));
                }

                c if is_identifier_char(c) => {
                    let word = self.scan_while(is_identifier_char);
                    let tok = match parse_number(&word) {
                        Some(value) => Tok::Num { raw: word, value },
                        None => Tok::from_word(&word),
                    };
                    return Ok(self.token(begin, tok));
                }

                '.' if self.peek_at(1) == Some('.') && self.peek_at(2) == Some('.') => {
                    self.advance(3);
                    return Ok(self.token(begin, Tok::Punct(Punct::Ellipsis)));
                }

                '[' => {
                    self.advance(1);
                    return Ok(self.token(begin, Tok::Punct(Punct::LBracket)));
                }

                ']' => {
                    self.advance(1);
                    return Ok(self.token(begin, Tok::Punct(Punct::RBracket)));
                }

                '#' => {
                    self.advance(1);
                    let word = self.scan_while(is_identifier_char);
                    let tok = if word.is_empty() {
                        Tok::Unknown("#".to_owned())
                    } else {
                        Tok::from_word(&format!("#{}", word))
                    };
                    return Ok(self.token(begin, tok));
                }

                c if is_operator_char(c) => {
                    let op = self.scan_operator();
                    return Ok(self.token(begin, Tok::from_punct(&op)));
                }

                c if c.is_control() => {
                    self.advance(1);
                    return Err(self.error(begin, ErrorKind::InvalidCharacter(c)));
                }

                c => {
                    self.advance(1);
                    return Ok(self.token(begin, Tok::from_punct(&c.to_string())));
                }
            }
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Spanned<Tok>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.next_token() {
            Ok(ref tok) if tok.base == Tok::EOF => {
                self.done = true;
                None
            }
            Ok(tok) => Some(Ok(tok)),
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use kestrel_env::{Source, SourceFile, Span, Location};
    use crate::lex::{Tok, Punct, Op, Keyword, Directive};
    use super::{Lexer, ErrorKind};

    fn lex(s: &str) -> Result<Vec<Tok>, ErrorKind> {
        let chars: Vec<char> = s.chars().collect();
        Lexer::from_chars(&chars).map(|tok| tok.map(|tok| tok.base).map_err(|e| e.kind)).collect()
    }

    fn num(raw: &str, value: u64) -> Tok { Tok::Num { raw: raw.to_owned(), value } }
    fn name(s: &str) -> Tok { Tok::Name(s.to_owned()) }
    fn punct(p: Punct) -> Tok { Tok::Punct(p) }

    #[test]
    fn test_numbers() {
        assert_eq!(lex("1_000"), Ok(vec![num("1_000", 1000)]));
        assert_eq!(lex("0x1F"), Ok(vec![num("0x1F", 31)]));
        assert_eq!(lex("0b101 0o17 42"), Ok(vec![num("0b101", 5), num("0o17", 15), num("42", 42)]));
        assert_eq!(lex("0x_ff_ff"), Ok(vec![num("0x_ff_ff", 0xffff)]));
        assert_eq!(lex("007"), Ok(vec![num("007", 7)]));
        assert_eq!(lex("_1"), Ok(vec![num("_1", 1)]));
        assert_eq!(lex("0x"), Ok(vec![name("0x")]));
        assert_eq!(lex("0xZZ"), Ok(vec![name("0xZZ")]));
        assert_eq!(lex("12ab"), Ok(vec![name("12ab")]));
        assert_eq!(lex("_"), Ok(vec![name("_")]));
        // does not fit in 64 bits
        assert_eq!(lex("99999999999999999999"), Ok(vec![name("99999999999999999999")]));
    }

    #[test]
    fn test_separators_and_comments() {
        assert_eq!(lex("// comment\nlet"), Ok(vec![punct(Punct::Newline), Tok::Keyword(Keyword::Let)]));
        assert_eq!(lex("a\n\n  ;\n b"), Ok(vec![name("a"), punct(Punct::Newline), name("b")]));
        assert_eq!(lex("a;\nb"), Ok(vec![name("a"), punct(Punct::Semicolon), name("b")]));
        assert_eq!(lex(" \t a \r"), Ok(vec![name("a")]));
        assert_eq!(lex("a /* b\n */ c"), Ok(vec![name("a"), name("c")]));
        assert_eq!(lex("/* a /* b */ c */"), Ok(vec![name("c"), Tok::Unknown("*/".to_owned())]));
        assert_eq!(lex("a+// c"), Ok(vec![name("a"), Tok::Op(Op::Plus)]));
        assert_eq!(lex("/* abc"), Err(ErrorKind::UnexpectedEof));
        assert_eq!(lex(""), Ok(vec![]));
    }

    #[test]
    fn test_strings() {
        assert_eq!(lex("\"a\\nb\""), Ok(vec![Tok::Str("a\nb".to_owned())]));
        assert_eq!(lex(r#""\x{41}\t\"\\""#), Ok(vec![Tok::Str("A\t\"\\".to_owned())]));
        assert_eq!(lex(r#""""#), Ok(vec![Tok::Str(String::new())]));
        assert_eq!(lex("\"abc"), Err(ErrorKind::UnexpectedEof));
        assert_eq!(lex(r#""\q""#), Err(ErrorKind::InvalidEscape('q')));
        assert_eq!(lex(r#""\x41""#), Err(ErrorKind::InvalidEscape('x')));
        assert_eq!(lex(r#""\x{41""#), Err(ErrorKind::InvalidEscape('x')));
        assert_eq!(lex(r#""\x{100}""#), Err(ErrorKind::InvalidEscape('x')));
        assert_eq!(lex(r#""\x{}""#), Err(ErrorKind::InvalidEscape('x')));
        assert_eq!(lex("\"\\"), Err(ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_chars() {
        assert_eq!(lex("'x'"), Ok(vec![Tok::Char(b'x')]));
        assert_eq!(lex(r"'\n'"), Ok(vec![Tok::Char(b'\n')]));
        assert_eq!(lex(r"'\x{ff}'"), Ok(vec![Tok::Char(0xff)]));
        assert_eq!(lex("'\u{141}'"), Ok(vec![Tok::Char(0x41)]));
        assert_eq!(lex("''"), Err(ErrorKind::InvalidCharacterLiteral));
        assert_eq!(lex("'ab'"), Err(ErrorKind::InvalidCharacterLiteral));
        assert_eq!(lex("'a"), Err(ErrorKind::UnexpectedEof));
    }

    #[test]
    fn test_operators_and_punctuations() {
        assert_eq!(lex("a += b"), Ok(vec![name("a"), Tok::Op(Op::PlusEq), name("b")]));
        assert_eq!(lex("x->y"), Ok(vec![name("x"), punct(Punct::Arrow), name("y")]));
        assert_eq!(lex("f(a, b...)"),
                   Ok(vec![name("f"), punct(Punct::LParen), name("a"), punct(Punct::Comma),
                           name("b"), punct(Punct::Ellipsis), punct(Punct::RParen)]));
        assert_eq!(lex("a.b"), Ok(vec![name("a"), punct(Punct::Dot), name("b")]));
        assert_eq!(lex("a ?? b?"),
                   Ok(vec![name("a"), Tok::Op(Op::QuesQues), name("b"), punct(Punct::Ques)]));
        assert_eq!(lex("[x: 1]"),
                   Ok(vec![punct(Punct::LBracket), name("x"), punct(Punct::Colon),
                           num("1", 1), punct(Punct::RBracket)]));
        assert_eq!(lex("{}"), Ok(vec![punct(Punct::LBrace), punct(Punct::RBrace)]));
        assert_eq!(lex("a+-b"), Ok(vec![name("a"), Tok::Unknown("+-".to_owned()), name("b")]));
        assert_eq!(lex("@"), Ok(vec![Tok::Unknown("@".to_owned())]));
        assert_eq!(lex("\u{1}"), Err(ErrorKind::InvalidCharacter('\u{1}')));
    }

    #[test]
    fn test_keywords_and_directives() {
        assert_eq!(lex("func self mutating"),
                   Ok(vec![Tok::Keyword(Keyword::Func), name("self"), name("mutating")]));
        assert_eq!(lex("#file #line #foo # x"),
                   Ok(vec![Tok::Directive(Directive::File), Tok::Directive(Directive::Line),
                           name("#foo"), Tok::Unknown("#".to_owned()), name("x")]));
        assert_eq!(lex("letter let"), Ok(vec![name("letter"), Tok::Keyword(Keyword::Let)]));
    }

    #[test]
    fn test_locations() {
        let chars: Vec<char> = "a\n  bc".chars().collect();
        let mut lexer = Lexer::from_chars(&chars);
        assert_eq!(lexer.next_token().map(|t| t.base), Ok(name("a")));
        assert_eq!(lexer.location(), Location { line: 1, column: 2, offset: 1 });
        assert_eq!(lexer.next_token().map(|t| t.base), Ok(punct(Punct::Newline)));
        assert_eq!(lexer.location(), Location { line: 2, column: 3, offset: 4 });
        assert_eq!(lexer.next_token().map(|t| t.base), Ok(name("bc")));
        assert_eq!(lexer.location(), Location { line: 2, column: 5, offset: 6 });
        assert_eq!(lexer.next_token().map(|t| t.base), Ok(Tok::EOF));
        assert_eq!(lexer.next_token().map(|t| t.base), Ok(Tok::EOF));

        let chars: Vec<char> = "ab \"x".chars().collect();
        let mut lexer = Lexer::from_chars(&chars);
        assert!(lexer.next().is_some());
        let err = lexer.next().unwrap().unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnexpectedEof);
        assert_eq!(err.loc, Location { line: 1, column: 6, offset: 5 });
        assert!(lexer.next().is_none());
    }

    #[test]
    fn test_spans() {
        let mut source = Source::new();
        let span = source.add(SourceFile::from_str("<test>".into(), "let x\n= 1"));
        let at = |off| source.pos_in_span(span, off);
        let toks: Vec<_> = Lexer::new(&source, span).map(|t| t.unwrap()).collect();
        assert_eq!(toks.iter().map(|t| t.base.clone()).collect::<Vec<_>>(),
                   vec![Tok::Keyword(Keyword::Let), name("x"), punct(Punct::Newline),
                        Tok::Op(Op::Eq), num("1", 1)]);
        assert_eq!(toks[0].span, Span::new(at(0), at(3)));
        assert_eq!(toks[1].span, Span::new(at(4), at(5)));
        assert_eq!(toks[2].span, Span::new(at(5), at(6)));
        assert_eq!(toks[4].span, Span::new(at(8), at(9)));
        assert_eq!(toks[4].span.len(), 1);
    }

    #[test]
    fn test_locations_carriage_return() {
        let mut source = Source::new();
        let span = source.add(SourceFile::from_str("<test>".into(), "x\r  yz\r\nw"));
        let mut lexer = Lexer::new(&source, span);
        assert_eq!(lexer.next_token().map(|t| t.base), Ok(name("x")));
        let yz = lexer.next_token().unwrap();
        assert_eq!(yz.base, name("yz"));
        assert_eq!(lexer.location(), Location { line: 2, column: 5, offset: 6 });
        let file = source.get_file(span.unit()).unwrap();
        assert_eq!(file.line_from_pos(yz.span.begin()).map(|(line, _)| line), Some(1));

        assert_eq!(lexer.next_token().map(|t| t.base), Ok(punct(Punct::Newline)));
        assert_eq!(lexer.location(), Location { line: 3, column: 1, offset: 8 });
        let w = lexer.next_token().unwrap();
        assert_eq!(file.line_from_pos(w.span.begin()).map(|(line, _)| line), Some(2));
    }

    #[test]
    fn test_error_display() {
        let chars: Vec<char> = "\n'ab'".chars().collect();
        let err = Lexer::from_chars(&chars).find_map(|t| t.err()).unwrap();
        assert_eq!(err.to_string(),
                   "2:4: A character literal should contain exactly one character");
    }
}
