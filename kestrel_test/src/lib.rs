//! A data-driven test harness for Kestrel.
//!
//! Each `*.kes` file in the scanned directory holds one or more tests,
//! each of them starting with a divider line:
//!
//! ```text
//! //--8<-- test-name -- options
//! let x = "abc
//! //! expected output
//! //@^ Fatal: Premature end of file in a literal or comment
//! ```
//!
//! * `//--8<--` starts a new test and `//-->8--` starts an ignored test.
//!   The only recognized option is `exact`, which requires reports to match exactly.
//! * `//! text` gives a line of the expected output.
//!   A trailing `\` joins the line with the next `//!` line.
//! * `//@ Kind: message` expects a report of given kind and message.
//!   It can be followed by a line marker: `<` (this line), `^` (lines above),
//!   `v` (lines below), a line number, or a range of them separated by `-`.
//!
//! The markers and anything after them are stripped from the input.

#[macro_use] extern crate lazy_static;
#[macro_use] extern crate log;

use std::fmt;
use std::env;
use std::fs;
use std::mem;
use std::panic;
use std::process;
use std::any::Any;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::cell::RefCell;
use std::rc::Rc;
use std::fs::File;
use std::error::Error;
use std::collections::HashMap;
use regex::Regex;
use term::StderrTerminal;
use term::color::{self, Color};
use clap::{App, Arg, ArgMatches};
use kestrel_env::{Source, SourceFile, Span};
use kestrel_diag::{Locale, Kind, Report, CollectedReport, ConsoleReport, stderr_or_plain};

pub trait Testing {
    /// Runs a single test over the main input and returns its output.
    fn run(&self, source: Rc<RefCell<Source>>, span: Span, report: Rc<dyn Report>) -> String;

    fn check_output(&self, actual: &str, expected: &str) -> bool { actual == expected }

    fn augment_args<'a, 'b: 'a>(&self, app: App<'a, 'b>) -> App<'a, 'b> { app }
    fn collect_args<'a>(&mut self, _matches: &ArgMatches<'a>) {}
}

#[derive(Debug)]
pub struct TestError {
    desc: String,
    cause: Option<Box<dyn Error>>,
}

impl TestError {
    fn new(desc: String) -> TestError {
        TestError { desc, cause: None }
    }

    fn with_cause<E: Error + 'static>(desc: String, cause: E) -> TestError {
        TestError { desc, cause: Some(Box::new(cause)) }
    }
}

impl Error for TestError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.cause.as_ref().map(|err| &**err)
    }
}

impl fmt::Display for TestError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.desc)?;
        if let Some(ref cause) = self.cause {
            write!(f, " ({})", cause)?;
        }
        Ok(())
    }
}

/// An expected report.
#[derive(Clone, PartialEq, Eq, Debug, Hash)]
pub struct Expected {
    /// The first and last line numbers (1-based), if any.
    pub lines: Option<(usize, usize)>,
    pub kind: Kind,
    pub msg: String,
}

fn kind_from_str(s: &str) -> Option<Kind> {
    match &s.to_ascii_lowercase()[..] {
        "note" => Some(Kind::Note),
        "warn" | "warning" => Some(Kind::Warning),
        "error" => Some(Kind::Error),
        "fatal" => Some(Kind::Fatal),
        _ => None,
    }
}

// splits the line into the input part and the report expectation, if any
fn split_line(s: &str, lineno: usize) -> Result<(&str, Option<Expected>), TestError> {
    lazy_static! {
        static ref LINE_PATTERN: Regex =
            Regex::new(r"(?xs)
                         ^ (?P<line> .*?)
                           //@ (?: (?P<line1> \d+ | < | \^+ | v+)
                                   (?: - (?P<line2> \d+ | < | \^+ | v+) )?
                               )?
                               \s+ (?P<kind> \w+): (?P<msg> .*)
                         $").unwrap();
    }

    let err = || TestError::new(format!("invalid report expectation at line {}", lineno));

    assert!(lineno > 0);
    let caps = match LINE_PATTERN.captures(s) {
        Some(caps) => caps,
        None if s.contains("//@") => return Err(err()),
        None => return Ok((s, None)),
    };

    let parse_lineno = |s: &str| -> Result<usize, TestError> {
        if s.starts_with('<') {
            Ok(lineno)
        } else if s.starts_with('^') {
            match lineno.checked_sub(s.len()) {
                Some(0) | None => Err(err()),
                Some(lineno) => Ok(lineno),
            }
        } else if s.starts_with('v') {
            lineno.checked_add(s.len()).ok_or_else(err)
        } else {
            s.parse().map_err(|e| TestError::with_cause(format!("invalid line number at \
                                                                 line {}", lineno), e))
        }
    };

    let lines = match caps.name("line1") {
        Some(line1) => {
            let line1 = parse_lineno(line1.as_str())?;
            let line2 = match caps.name("line2") {
                Some(line2) => parse_lineno(line2.as_str())?,
                None => line1,
            };
            if line1 > line2 || line1 == 0 { return Err(err()); }
            Some((line1, line2))
        }
        None => None,
    };

    let line = caps.name("line").map_or("", |m| m.as_str());
    let kind = caps.name("kind").and_then(|m| kind_from_str(m.as_str())).ok_or_else(err)?;
    let msg = caps.name("msg").map_or("", |m| m.as_str()).trim().to_owned();
    Ok((line, Some(Expected { lines, kind, msg })))
}

#[test]
fn test_split_line() {
    let split_line = |line, lineno| split_line(line, lineno).map_err(|_| ());
    let expected = |lines, msg: &str| Some(Expected { lines, kind: Kind::Error, msg: msg.into() });

    assert_eq!(split_line("hello\r\n", 42), Ok(("hello\r\n", None)));
    assert_eq!(split_line("hello //@\n", 42), Err(()));
    assert_eq!(split_line("hello //@ hufffffff\n", 42), Err(()));
    assert_eq!(split_line("hello //@ Error: whatever\tffff\t ", 42),
               Ok(("hello ", expected(None, "whatever\tffff"))));
    assert_eq!(split_line("hello //@ eRROR: whatever ", 42),
               Ok(("hello ", expected(None, "whatever"))));
    assert_eq!(split_line("hello //@ log: whatever ", 42), Err(()));
    assert_eq!(split_line("hello //@ Error: //@ Error: whatever ", 42),
               Ok(("hello ", expected(None, "//@ Error: whatever"))));
    assert_eq!(split_line("hello //@ some Error: whatever ", 42), Err(()));
    assert_eq!(split_line("hello //@< Error: whatever ", 42),
               Ok(("hello ", expected(Some((42, 42)), "whatever"))));
    assert_eq!(split_line("hello //@^^^^ Error: whatever ", 42),
               Ok(("hello ", expected(Some((38, 38)), "whatever"))));
    assert_eq!(split_line("hello //@^^ Error: whatever ", 2), Err(()));
    assert_eq!(split_line("hello //@vvv Error: whatever ", 42),
               Ok(("hello ", expected(Some((45, 45)), "whatever"))));
    assert_eq!(split_line("hello //@7-9 Error: whatever ", 42),
               Ok(("hello ", expected(Some((7, 9)), "whatever"))));
    assert_eq!(split_line("hello //@7-6 Error: whatever ", 42), Err(()));
    assert_eq!(split_line("hello //@999999999999999999999999 Error: whatever ", 42), Err(()));
    assert_eq!(split_line("hello //@^-v Error: whatever ", 42),
               Ok(("hello ", expected(Some((41, 43)), "whatever"))));
    assert_eq!(split_line("hello //@v-< Error: whatever ", 42), Err(()));
    assert_eq!(split_line("hello //@<-45 Error: whatever ", 42),
               Ok(("hello ", expected(Some((42, 45)), "whatever"))));
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Test {
    pub file: PathBuf,
    pub first_line: usize, // the first line after the divider
    pub name: String, // can be an empty string
    pub input: Vec<String>,
    pub output: Vec<String>,
    pub reports: Vec<Expected>,
    pub ignored: bool,
    pub exact: bool,
}

// returns `(ignored, name, options)` if the line is a divider
fn parse_divider(line: &str) -> Option<(bool, &str, Vec<&str>)> {
    if !line.starts_with("//") {
        return None;
    }
    let line = &line[2..];
    let pos = line.find("--8<--").or_else(|| line.find("-->8--"))?;
    if !line[..pos].chars().all(|c| c == '-') {
        return None;
    }

    let dash_or_space = |c: char| c == '-' || c.is_whitespace();
    let ignored = &line[pos..pos+6] == "-->8--";
    let line = line[pos+6..].trim_start_matches(&dash_or_space);
    let (name, options) = match line.find("--") {
        Some(pos) => (line[..pos].trim_end(), line[pos..].trim_matches(&dash_or_space)),
        None => (line.trim_end_matches(&dash_or_space), ""),
    };
    Some((ignored, name, options.split_whitespace().collect()))
}

fn extract_tests(path: &Path) -> Result<Vec<Test>, TestError> {
    let f = File::open(path)
        .map_err(|e| TestError::with_cause(format!("cannot open {}", path.display()), e))?;
    let f = BufReader::new(f);

    let mut tests = Vec::new();
    let mut test: Option<Test> = None;
    let mut output_cont = false; // did the last output line end with `\`?

    let mut flush = |test: Option<Test>, output_cont: bool, lineno: usize| {
        if output_cont {
            return Err(TestError::new(format!("found a trailing `\\` in the output \
                                               at line {}", lineno - 1)));
        }
        if let Some(test) = test {
            if !(test.reports.is_empty() && test.output.is_empty()) {
                tests.push(test);
            }
        }
        Ok(())
    };

    let mut next_lineno = 1;
    for (lineno, line) in f.lines().enumerate() {
        let line = line.map_err(|e| TestError::with_cause(format!("cannot read {}",
                                                                  path.display()), e))?;
        let lineno = lineno + 1;
        next_lineno = lineno + 1;

        let premature_err = || TestError::new(format!("found test expectation before the first \
                                                       `//--8<--` at line {}", lineno));

        if let Some((ignored, name, options)) = parse_divider(&line) {
            flush(test.take(), output_cont, lineno)?;
            output_cont = false;
            test = Some(Test {
                file: path.to_owned(),
                first_line: next_lineno,
                name: name.to_owned(),
                input: Vec::new(),
                output: Vec::new(),
                reports: Vec::new(),
                ignored,
                exact: options.contains(&"exact"),
            });
            continue;
        }

        let test = test.as_mut().ok_or_else(premature_err);

        if let Some(pos) = line.find("//!") {
            let test = test?;
            let mut next = line[pos+3..].trim_start();
            let next_cont = next.ends_with('\\');
            if next_cont {
                next = &next[..next.len()-1];
            }
            match test.output.last_mut() {
                Some(last) if output_cont => last.push_str(next),
                _ => test.output.push(next.to_owned()),
            }
            output_cont = next_cont;
            test.input.push(line[..pos].to_owned());
            continue;
        }

        if output_cont {
            return Err(TestError::new(format!("found a trailing `\\` in the output \
                                               at line {}", lineno - 1)));
        }

        match test {
            Ok(test) => {
                let (input, expected) = split_line(&line, test.input.len() + 1)?;
                test.input.push(input.to_owned());
                test.reports.extend(expected);
            }
            // blank lines and comments before the first test are allowed
            Err(e) => {
                if line.contains("//@") { return Err(e); }
            }
        }
    }

    flush(test, output_cont, next_lineno)?;
    Ok(tests)
}

struct TestLog {
    test: Test,
    source: Source,
    delta_only: bool, // if true, `collected` contains unexpected reports only
    panicked: bool,
    output: String,
    collected: Vec<(Kind, Span, String)>,
}

enum TestResult { Passed, Failed, Panicked, Ignored }

impl TestResult {
    fn style(&self) -> (Color, Option<Color>, &'static str) {
        match *self {
            TestResult::Passed => (color::BRIGHT_GREEN, None, "PASSED"),
            TestResult::Failed => (color::BRIGHT_RED, None, "FAILED"),
            TestResult::Panicked => (color::BLACK, Some(color::RED), "PANIC"),
            TestResult::Ignored => (color::BRIGHT_BLACK, None, "IGNORE"),
        }
    }
}

type ReportKey = (Option<(usize, usize)>, Kind, String);

/// Matches collected reports against expected ones as multisets.
#[derive(Default)]
struct Tally {
    // # of expected reports - # of collected reports
    counts: HashMap<ReportKey, isize>,
    unknown: bool, // some collected report was never expected
}

impl Tally {
    fn expect(&mut self, key: ReportKey) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    fn collect(&mut self, key: ReportKey) {
        match self.counts.get_mut(&key) {
            Some(count) => *count -= 1,
            None => self.unknown = true,
        }
    }

    /// Every expected report should have been collected.
    /// Excess reports only matter for the exact matching.
    fn is_satisfied(&self, exact: bool) -> bool {
        if exact {
            !self.unknown && self.counts.values().all(|&v| v == 0)
        } else {
            self.counts.values().all(|&v| v <= 0)
        }
    }

    fn is_excess(&self, key: &ReportKey) -> bool {
        self.counts.get(key).map_or(true, |&v| v < 0)
    }
}

const MAIN_PATH: &str = "<test main>";

#[must_use]
pub struct Tester<T> {
    testing: T,
    filter: Option<Regex>,
    term: Box<StderrTerminal>,
    verbose: bool,
    exact_diags: bool,
    message_locale: Locale,
    stop_on_panic: bool,
    displayed_logs: Vec<TestLog>,
    num_tested: usize,
    num_passed: usize,
}

impl<T: Testing> Tester<T> {
    pub fn new(name: &str, mut testing: T) -> Tester<T> {
        // `cargo test` passes its own args to every tester, so `+` is accepted as a prefix
        let args = env::args().map(|s| {
            let pluses = s.len() - s.trim_start_matches('+').len();
            format!("{}{}", "-".repeat(pluses), &s[pluses..])
        });

        let app = App::new(name)
            .arg(Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .help("Displays all test outputs regardless of the result."))
            .arg(Arg::with_name("exact_diags")
                .short("e")
                .long("exact-diags")
                .help("Fails a test on any report not listed in its expectations."))
            .arg(Arg::with_name("message_locale")
                .short("l")
                .long("message-locale")
                .takes_value(true)
                .help("Reports in given locale (e.g. `ko`). Expectations are written in English."))
            .arg(Arg::with_name("stop_on_panic")
                .short("p")
                .long("stop-on-panic")
                .help("Aborts at the first panicking test with `RUST_BACKTRACE=1`."))
            .arg(Arg::with_name("filter")
                .help("Runs tests whose name matches given regular expression."));
        let app = testing.augment_args(app);
        let matches = app.get_matches_from(args);

        let filter = matches.value_of("filter").map(|s| {
            Regex::new(s).expect("pattern should be a valid regex")
        });
        let message_locale = matches.value_of("message_locale").unwrap_or("en");
        let message_locale = Locale::new(message_locale).expect("unrecognized message locale");
        let stop_on_panic = matches.is_present("stop_on_panic");
        testing.collect_args(&matches);

        if stop_on_panic {
            env::set_var("RUST_BACKTRACE", "1");
        }

        Tester {
            testing,
            filter,
            term: stderr_or_plain(),
            verbose: matches.is_present("verbose"),
            exact_diags: matches.is_present("exact_diags"),
            message_locale,
            stop_on_panic,
            displayed_logs: Vec::new(),
            num_tested: 0,
            num_passed: 0,
        }
    }

    pub fn scan<P: AsRef<Path>>(mut self, dir: P) -> Tester<T> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir).expect("failed to read the test directory")
            .map(|f| f.expect("failed to read the test directory").path())
            .filter(|path| path.extension().map_or(false, |ext| ext == "kes"))
            .collect();
        paths.sort();

        for path in paths {
            let tests = extract_tests(&path).unwrap_or_else(|e| {
                panic!("failed to parse the test file {}: {}", path.display(), e)
            });
            info!("extracted {} test(s) from {}", tests.len(), path.display());

            let filter = self.filter.as_ref();
            let selected: Vec<Test> = tests.into_iter().filter(|test| {
                filter.map_or(true, |filter| filter.is_match(&test.name))
            }).collect();
            for (i, test) in selected.into_iter().enumerate() {
                if i == 0 {
                    let _ = writeln!(self.term);
                    self.paint(color::BRIGHT_MAGENTA, format_args!("{:10}{}\n", "", path.display()));
                }
                if test.ignored {
                    self.note_test(&test, TestResult::Ignored);
                } else {
                    self.test(test);
                }
            }
        }

        self
    }

    pub fn done(mut self) {
        let failed = self.num_tested - self.num_passed;
        let _ = writeln!(self.term, "\n{} passed, {} failed", self.num_passed, failed);
        for log in mem::take(&mut self.displayed_logs) {
            self.note_test_output(log);
        }
        let _ = writeln!(self.term);

        if failed > 0 {
            process::exit(1);
        }
    }

    fn string_from_panic(err: Box<dyn Any + Send>) -> String {
        match err.downcast::<String>() {
            Ok(s) => *s,
            Err(err) => match err.downcast_ref::<&'static str>() {
                Some(s) => (*s).to_owned(),
                None => "<unknown error>".to_owned(),
            },
        }
    }

    fn test(&mut self, test: Test) {
        let mut source = Source::new();
        let input = SourceFile::from_u8(MAIN_PATH.to_owned(), test.input.join("\n").into_bytes());
        let inputspan = source.add(input);

        let source = Rc::new(RefCell::new(source));
        let collected = Rc::new(CollectedReport::new(self.message_locale));
        let output = {
            let testing = panic::AssertUnwindSafe(&self.testing);
            let source = panic::AssertUnwindSafe(source.clone());
            let report = panic::AssertUnwindSafe(collected.clone());
            if !self.stop_on_panic {
                panic::set_hook(Box::new(|_| {})); // the panic is shown in the test log instead
            }
            let output = panic::catch_unwind(move || {
                testing.run(source.0, inputspan, report.0)
            });
            let _ = panic::take_hook();
            output
        };
        let source = match Rc::try_unwrap(source) {
            Ok(source) => source.into_inner(),
            Err(_) => panic!("Testing::run should not keep the Source"),
        };
        let mut collected = match Rc::try_unwrap(collected) {
            Ok(report) => report.into_reports(),
            Err(_) => panic!("Testing::run should not keep the Report"),
        };
        self.num_tested += 1;

        let key_of = |&(kind, span, ref msg): &(Kind, Span, String)| -> ReportKey {
            let lines = source.get_file(span.unit()).and_then(|file| {
                file.lines_from_span(span).map(|(begin, _, end)| (begin + 1, end + 1))
            });
            (lines, kind, msg.clone())
        };

        let mut tally = Tally::default();
        let success = match output {
            Ok(ref output) if self.testing.check_output(output, &test.output.join("\n")) => {
                for expected in &test.reports {
                    tally.expect((expected.lines, expected.kind, expected.msg.clone()));
                }
                for report in &collected {
                    tally.collect(key_of(report));
                }
                tally.is_satisfied(self.exact_diags || test.exact)
            }
            _ => false,
        };

        if success {
            self.note_test(&test, TestResult::Passed);
            self.num_passed += 1;

            // unexpected reports are still displayed
            if !self.verbose {
                collected.retain(|report| tally.is_excess(&key_of(report)));
            }
            if !collected.is_empty() {
                let output = output.unwrap_or_default();
                self.displayed_logs.push(TestLog {
                    test, source, delta_only: !self.verbose, panicked: false, output, collected,
                });
            }
            return;
        }

        let (panicked, output) = match output {
            Ok(output) => {
                self.note_test(&test, TestResult::Failed);
                (false, output)
            }
            Err(e) => {
                self.note_test(&test, TestResult::Panicked);
                if self.stop_on_panic {
                    panic::resume_unwind(e);
                }
                (true, Self::string_from_panic(e))
            }
        };
        self.displayed_logs.push(TestLog {
            test, source, delta_only: false, panicked, output, collected,
        });
    }

    // terminal errors are ignored; the text is still written without colors
    fn paint(&mut self, fg: Color, args: fmt::Arguments) {
        let _ = self.term.fg(fg);
        let _ = self.term.write_fmt(args);
        let _ = self.term.reset();
    }

    fn rule(&mut self, title: &str) {
        self.paint(color::BRIGHT_BLACK, format_args!("{:-<60}\n", title));
    }

    fn note_test(&mut self, test: &Test, result: TestResult) {
        let (fg, bg, label) = result.style();
        let _ = write!(self.term, "  ");
        if let Some(bg) = bg {
            let _ = self.term.bg(bg);
        }
        self.paint(fg, format_args!("{}", label));
        let _ = write!(self.term, "{:1$}  ", "", 6 - label.len());
        if test.name.is_empty() {
            self.paint(color::BRIGHT_WHITE,
                       format_args!("<anonymous test at line {}>\n", test.first_line));
        } else {
            self.paint(color::BRIGHT_WHITE, format_args!("{}\n", test.name));
        }
    }

    fn note_expected(&mut self, expected: &Expected) {
        let _ = match expected.lines {
            Some((begin, end)) if begin == end => write!(self.term, "{}:{}:_: ", MAIN_PATH, begin),
            Some((begin, end)) => write!(self.term, "{}:{}:_: {}:_ ", MAIN_PATH, begin, end),
            None => Ok(()),
        };
        let (dim, bright) = expected.kind.colors();
        self.paint(dim, format_args!("["));
        self.paint(bright, format_args!("{:?}", expected.kind));
        self.paint(dim, format_args!("] "));
        self.paint(color::BRIGHT_WHITE, format_args!("{}\n", expected.msg));
    }

    fn note_test_output(&mut self, log: TestLog) {
        let _ = writeln!(self.term);
        self.paint(color::BRIGHT_MAGENTA, format_args!("{} ", log.test.file.display()));
        if !log.test.name.is_empty() {
            self.paint(color::BRIGHT_WHITE, format_args!("{} ", log.test.name));
        }
        let _ = writeln!(self.term, "(at line {})", log.test.first_line);

        if log.delta_only {
            self.rule("ACTUAL (DIFF FROM EXPECTED) ");
        } else {
            self.rule("EXPECTED ");
            for line in &log.test.output {
                self.paint(color::BRIGHT_WHITE, format_args!("{}\n", line));
            }
            if !log.test.reports.is_empty() {
                let _ = writeln!(self.term);
                for expected in &log.test.reports {
                    self.note_expected(expected);
                }
            }

            self.rule("ACTUAL ");
            if log.panicked {
                let _ = self.term.bg(color::RED);
                self.paint(color::BLACK, format_args!("PANICKED"));
                self.paint(color::BRIGHT_RED, format_args!(" {}\n", log.output));
            } else {
                self.paint(color::BRIGHT_WHITE, format_args!("{}\n", log.output));
            }
        }

        if !log.collected.is_empty() {
            if !log.delta_only {
                let _ = writeln!(self.term);
            }
            let display = ConsoleReport::new(Rc::new(RefCell::new(log.source)));
            for (kind, span, msg) in log.collected {
                let _ = display.add_span(kind, span, &msg);
            }
        }

        self.rule("");
    }
}

#[test]
fn test_tally() {
    let key = |line, msg: &str| (Some((line, line)), Kind::Error, msg.to_owned());

    let mut tally = Tally::default();
    tally.expect(key(1, "a"));
    tally.expect(key(1, "a"));
    tally.collect(key(1, "a"));
    assert!(!tally.is_satisfied(false));
    tally.collect(key(1, "a"));
    assert!(tally.is_satisfied(false));
    assert!(tally.is_satisfied(true));

    // one report too many
    tally.collect(key(1, "a"));
    assert!(tally.is_satisfied(false));
    assert!(!tally.is_satisfied(true));
    assert!(tally.is_excess(&key(1, "a")));

    let mut tally = Tally::default();
    tally.expect(key(2, "b"));
    tally.collect(key(2, "b"));
    tally.collect(key(3, "b"));
    assert!(tally.is_satisfied(false));
    assert!(!tally.is_satisfied(true));
    assert!(!tally.is_excess(&key(2, "b")));
    assert!(tally.is_excess(&key(3, "b")));
}

#[test]
fn test_extract_tests() {
    let dir = env::temp_dir().join(format!("kestrel-test-{}", process::id()));
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("sample.kes");
    {
        let mut f = File::create(&path).unwrap();
        writeln!(f, "// a leading comment").unwrap();
        writeln!(f, "//--8<-- first -- exact").unwrap();
        writeln!(f, "let x").unwrap();
        writeln!(f, "//! a \\").unwrap();
        writeln!(f, "//! b").unwrap();
        writeln!(f, "//-->8-- second").unwrap();
        writeln!(f, "\"abc //@< Fatal: oops").unwrap();
        writeln!(f, "//--8<-- empty").unwrap();
    }

    let tests = extract_tests(&path).unwrap();
    fs::remove_dir_all(&dir).unwrap();

    assert_eq!(tests.len(), 2);
    assert_eq!(tests[0].name, "first");
    assert_eq!(tests[0].first_line, 3);
    assert!(tests[0].exact && !tests[0].ignored);
    assert_eq!(tests[0].input, vec!["let x", "", ""]);
    assert_eq!(tests[0].output, vec!["a b"]);
    assert_eq!(tests[1].name, "second");
    assert!(tests[1].ignored);
    assert_eq!(tests[1].input, vec!["\"abc "]);
    assert_eq!(tests[1].reports, vec![Expected { lines: Some((1, 1)), kind: Kind::Fatal,
                                                 msg: "oops".to_owned() }]);
}

#[test]
fn test_parse_divider() {
    assert_eq!(parse_divider("//--8<-- foo -- exact"), Some((false, "foo", vec!["exact"])));
    assert_eq!(parse_divider("//-----8<----- bar"), Some((false, "bar", vec![])));
    assert_eq!(parse_divider("//-->8-- baz ------"), Some((true, "baz", vec![])));
    assert_eq!(parse_divider("//--8<--"), Some((false, "", vec![])));
    assert_eq!(parse_divider("x //--8<-- foo"), None);
    assert_eq!(parse_divider("// --8<-- foo"), None);
}
