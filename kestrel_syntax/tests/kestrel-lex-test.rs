use std::cell::RefCell;
use std::rc::Rc;
use clap::{App, Arg, ArgMatches};
use kestrel_env::{Source, Span};
use kestrel_diag::Report;

struct Testing {
    span_pattern: regex::Regex,
    keep_spans: bool,
}

impl Testing {
    fn new() -> Testing {
        let span_pattern = regex::Regex::new(r"@(?:_|\d+(?:/\d+(?:-\d+)?)?)").unwrap();
        assert_eq!(span_pattern.replace_all("[X@1/3, Y@1/3-7]@_", ""), "[X, Y]");
        Testing { span_pattern, keep_spans: false }
    }
}

impl kestrel_test::Testing for Testing {
    fn run(&self, source: Rc<RefCell<Source>>, span: Span, report: Rc<dyn Report>) -> String {
        let tokens = match kestrel_syntax::lex_chunk(&source.borrow(), span, &*report) {
            Ok(tokens) => tokens,
            Err(_) => return String::from("error"),
        };
        let tokens: Vec<String> =
            tokens.iter().map(|tok| format!("{:?}{:#?}", tok.base, tok.span)).collect();
        let output = format!("[{}]", tokens.join(", "));
        if self.keep_spans {
            output
        } else {
            self.span_pattern.replace_all(&output, "").into_owned()
        }
    }

    fn augment_args<'a, 'b: 'a>(&self, app: App<'a, 'b>) -> App<'a, 'b> {
        app.arg(Arg::with_name("keep_spans")
            .short("s")
            .long("keep-spans")
            .help("Keeps token spans in the output. Most tests will fail."))
    }

    fn collect_args<'a>(&mut self, matches: &ArgMatches<'a>) {
        self.keep_spans = matches.is_present("keep_spans");
    }
}

fn main() {
    env_logger::init();
    kestrel_test::Tester::new("kestrel-lex-test", Testing::new()).scan("src/tests").done();
}
