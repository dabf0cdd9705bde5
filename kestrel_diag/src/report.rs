use std::cmp;
use std::fmt;
use std::result;
use std::io;
use std::io::Write;
use std::collections::HashMap;
use std::cell::RefCell;
use std::rc::Rc;
use unicode_width::UnicodeWidthChar;
use term::{color, StderrTerminal};
use term::terminfo::{TermInfo, TerminfoTerminal};

use kestrel_env::{Source, SourceSlice, Span};
use crate::message::{Locale, Localize, Localized, get_message_locale};

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum Kind {
    Note,
    Warning,
    Error,
    Fatal,
}

impl Kind {
    pub fn colors(&self) -> (/*dim*/ color::Color, /*bright*/ color::Color) {
        match *self {
            Kind::Fatal => (color::RED, color::BRIGHT_RED),
            Kind::Error => (color::RED, color::BRIGHT_RED),
            Kind::Warning => (color::YELLOW, color::BRIGHT_YELLOW),
            Kind::Note => (color::CYAN, color::BRIGHT_CYAN),
        }
    }
}

/// A request to stop the further processing.
#[must_use]
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Stop {
    /// This cannot be recovered and should terminate immediately.
    Fatal,
}

pub type Result<T> = result::Result<T, Stop>;

pub trait Report {
    fn message_locale(&self) -> Locale;
    fn add_span(&self, kind: Kind, span: Span, msg: &dyn Localize) -> Result<()>;
}

// lets `Reporter` work through a `&dyn Report`
impl<'a, R: Report + ?Sized> Report for &'a R {
    fn message_locale(&self) -> Locale { (**self).message_locale() }
    fn add_span(&self, k: Kind, s: Span, m: &dyn Localize) -> Result<()> { (**self).add_span(k, s, m) }
}

pub trait Reporter: Report + Sized {
    fn fatal<Loc: Into<Span>, Msg: Localize, T>(&self, loc: Loc, msg: Msg) -> ReportMore<T> {
        info!("reporting fatal error: {:?}", msg);
        let ret = self.add_span(Kind::Fatal, loc.into(), &msg);
        if let Err(Stop::Fatal) = ret {
            ReportMore { result: Err(Stop::Fatal) }
        } else {
            panic!("Report::fatal should always return Err(Stop::Fatal) but returned {:?}", ret)
        }
    }
}

impl<T: Report> Reporter for T {}

/// The outcome of a report, to be returned with `done`.
#[must_use]
pub struct ReportMore<T> {
    result: Result<T>,
}

impl<T> ReportMore<T> {
    pub fn done(self) -> Result<T> { self.result }
}

/// Returns a terminal for the standard error.
/// Without a usable terminfo entry, the terminal writes plain text without colors.
pub fn stderr_or_plain() -> Box<StderrTerminal> {
    term::stderr().unwrap_or_else(|| {
        let plain = TermInfo {
            names: Vec::new(),
            bools: HashMap::new(),
            numbers: HashMap::new(),
            strings: HashMap::new(),
        };
        Box::new(TerminfoTerminal::new_with_terminfo(io::stderr(), plain))
    })
}

fn strip_newline(mut s: SourceSlice) -> SourceSlice {
    while let Some(&'\r') | Some(&'\n') = s.last() {
        s = &s[..s.len()-1];
    }
    s
}

fn char_width(c: char) -> usize {
    c.width_cjk().unwrap_or(1)
}

// expands tabs to 8-column stops, starting from and updating the column `next_col` (0-based)
fn expand_tabs(line: SourceSlice, next_col: &mut usize) -> String {
    let mut col = *next_col;
    let mut ret = String::new();
    for &c in line {
        if c == '\t' {
            let newcol = (col + 8) & !7; // 0..7->8, 8..15->16, ...
            for _ in col..newcol { ret.push(' '); }
            col = newcol;
        } else {
            col += char_width(c);
            ret.push(c);
        }
    }
    *next_col = col;
    ret
}

// a source line split around the reported range, and the marker line drawn under it:
//
// 123 | aaaaXXXXXbbb
//     |     ^^^^^
#[derive(Clone, PartialEq, Eq, Debug)]
struct Excerpt {
    begincol: usize,
    before: String,
    marked: String,
    after: String,
    marker: String,
}

impl Excerpt {
    // `begin` and `end` are character offsets into the line, clamped to the line
    fn new(line: SourceSlice, begin: usize, end: usize) -> Excerpt {
        let line = strip_newline(line);
        let end = cmp::min(end, line.len());
        let begin = cmp::min(begin, end);

        let mut col = 0;
        let before = expand_tabs(&line[..begin], &mut col);
        let begincol = col;
        let marked = expand_tabs(&line[begin..end], &mut col);
        let endcol = col;
        let after = expand_tabs(&line[end..], &mut col);

        let marker = if begincol == endcol {
            format!("{:1$}*", "", begincol)
        } else {
            format!("{:2$}{:^>3$}", "", "", begincol, endcol - begincol)
        };
        Excerpt { begincol, before, marked, after, marker }
    }
}

fn paint(term: &mut StderrTerminal, fg: color::Color, args: fmt::Arguments) {
    let _ = term.fg(fg);
    let _ = term.write_fmt(args);
    let _ = term.reset();
}

/// A report that prints every diagnostic to the standard error, with a source excerpt.
pub struct ConsoleReport {
    source: Rc<RefCell<Source>>,
    term: RefCell<Box<StderrTerminal>>,
    locale: Locale,
}

impl ConsoleReport {
    pub fn new(source: Rc<RefCell<Source>>) -> ConsoleReport {
        let locale = get_message_locale().unwrap_or_else(Locale::dummy);
        ConsoleReport { source, term: RefCell::new(stderr_or_plain()), locale }
    }

    // the `path:line:col: ` prefix and the excerpt of the first line covered by `span`
    fn locate(&self, span: Span) -> Option<(String, usize, Excerpt)> {
        let source = self.source.borrow();
        let file = source.get_file(span.unit())?;
        let (beginline, mut spans, endline) = file.lines_from_span(span)?;
        let linespan = spans.next()?;
        let line = source.slice_from_span(linespan)?;

        let base = linespan.begin().to_usize();
        let excerpt = Excerpt::new(line, span.begin().to_usize() - base,
                                   span.end().to_usize() - base);
        let mut prefix = format!("{}:{}:{}: ", file.path(), beginline + 1, excerpt.begincol + 1);
        if beginline != endline {
            prefix.push_str(&format!("{}:_ ", endline + 1));
        }
        Some((prefix, beginline + 1, excerpt))
    }
}

impl Report for ConsoleReport {
    fn message_locale(&self) -> Locale {
        self.locale
    }

    fn add_span(&self, kind: Kind, span: Span, msg: &dyn Localize) -> Result<()> {
        let located = self.locate(span);
        let mut term = self.term.borrow_mut();
        let term = &mut **term;

        if let Some((ref prefix, _, _)) = located {
            let _ = write!(term, "{}", prefix);
        }
        let (dim, bright) = kind.colors();
        paint(term, dim, format_args!("["));
        paint(term, bright, format_args!("{:?}", kind));
        paint(term, dim, format_args!("] "));
        paint(term, color::BRIGHT_WHITE, format_args!("{}", Localized::new(msg, self.locale)));
        let _ = writeln!(term);

        if let Some((_, lineno, excerpt)) = located {
            let ndigits = lineno.to_string().len();
            paint(term, color::BRIGHT_BLACK, format_args!("{:1$} | ", lineno, ndigits));
            let _ = write!(term, "{}", excerpt.before);
            paint(term, bright, format_args!("{}", excerpt.marked));
            let _ = writeln!(term, "{}", excerpt.after);
            paint(term, color::BRIGHT_BLACK, format_args!("{:1$} | ", "", ndigits));
            paint(term, bright, format_args!("{}", excerpt.marker));
            let _ = writeln!(term);
        }

        if kind == Kind::Fatal { Err(Stop::Fatal) } else { Ok(()) }
    }
}

/// A report that collects every diagnostic as a localized string.
pub struct CollectedReport {
    collected: RefCell<Vec<(Kind, Span, String)>>,
    locale: Locale,
}

impl CollectedReport {
    pub fn new(locale: Locale) -> CollectedReport {
        CollectedReport { collected: RefCell::new(Vec::new()), locale }
    }

    pub fn into_reports(self) -> Vec<(Kind, Span, String)> {
        self.collected.into_inner()
    }
}

impl Report for CollectedReport {
    fn message_locale(&self) -> Locale {
        self.locale
    }

    fn add_span(&self, kind: Kind, span: Span, msg: &dyn Localize) -> Result<()> {
        let msg = Localized::new(msg, self.locale).to_string();
        self.collected.borrow_mut().push((kind, span, msg));
        if kind == Kind::Fatal { Err(Stop::Fatal) } else { Ok(()) }
    }
}

/// A report that stops at any diagnostic.
pub struct NoReport;

impl Report for NoReport {
    fn message_locale(&self) -> Locale {
        Locale::dummy()
    }

    fn add_span(&self, _kind: Kind, _span: Span, _msg: &dyn Localize) -> Result<()> {
        Err(Stop::Fatal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collected_report() {
        let report = CollectedReport::new(Locale::new("en").unwrap());
        assert_eq!(report.fatal::<_, _, ()>(Span::dummy(), "bail").done(), Err(Stop::Fatal));
        assert_eq!(report.add_span(Kind::Warning, Span::dummy(), &"hmm"), Ok(()));
        let reports = report.into_reports();
        let kinds: Vec<_> = reports.iter().map(|&(kind, _, ref msg)| (kind, &msg[..])).collect();
        assert_eq!(kinds, [(Kind::Fatal, "bail"), (Kind::Warning, "hmm")]);
    }

    #[test]
    fn test_no_report() {
        assert_eq!(NoReport.add_span(Kind::Note, Span::dummy(), &"anything"), Err(Stop::Fatal));
    }

    #[test]
    fn test_kind_order() {
        assert!(Kind::Note < Kind::Warning);
        assert!(Kind::Error < Kind::Fatal);
    }

    #[test]
    fn test_expand_tabs() {
        let line: Vec<char> = "\tab한c".chars().collect();
        let mut col = 0;
        assert_eq!(expand_tabs(&line, &mut col), "        ab한c");
        assert_eq!(col, 13);
        let mut col = 3;
        assert_eq!(expand_tabs(&line[..1], &mut col), "     ");
        assert_eq!(col, 8);
    }

    #[test]
    fn test_excerpt() {
        let line: Vec<char> = "\tlet 한 = x\r\n".chars().collect();
        let excerpt = Excerpt::new(&line, 5, 6);
        assert_eq!(excerpt.begincol, 12);
        assert_eq!(excerpt.before, "        let ");
        assert_eq!(excerpt.marked, "한");
        assert_eq!(excerpt.after, " = x");
        assert_eq!(excerpt.marker, format!("{:12}^^", ""));

        // an empty range is marked with `*`, and the range is clamped to the line
        let excerpt = Excerpt::new(&line, 20, 30);
        assert_eq!(excerpt.after, "");
        assert_eq!(excerpt.begincol, 18);
        assert_eq!(excerpt.marker, format!("{:18}*", ""));
    }
}
