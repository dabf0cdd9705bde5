//! The lexer for Kestrel.
//!
//! The lexer turns a source span into a sequence of `Tok`s.
//! Lexical errors are not recoverable; `lex_chunk` forwards the first one
//! to the report as a fatal diagnostic.

#[macro_use] extern crate log;
#[macro_use] extern crate kestrel_diag;

use kestrel_env::{Source, Span, Spanned};
use kestrel_diag::{Report, Reporter};

pub use crate::lex::{Tok, Punct, Op, Keyword, Attribute, Directive, Lexer, Error, ErrorKind};

pub mod lex;
mod message;

/// Lexes the whole span into a list of tokens, excluding the final `Tok::EOF`.
pub fn lex_chunk(source: &Source, span: Span,
                 report: &dyn Report) -> kestrel_diag::Result<Vec<Spanned<Tok>>> {
    if source.slice_from_span(span).is_none() {
        return report.fatal(span, message::NoFileForSpan {}).done();
    }

    let mut tokens = Vec::new();
    for tok in Lexer::new(source, span) {
        match tok {
            Ok(tok) => tokens.push(tok),
            Err(e) => {
                debug!("stopped lexing at {:?}", e.loc);
                return report.fatal(e.span, e.kind).done();
            }
        }
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use kestrel_env::{Source, SourceFile, Span};
    use kestrel_diag::{Locale, Kind, Stop, CollectedReport, NoReport};
    use super::{lex_chunk, Tok, Keyword, Punct};

    #[test]
    fn test_lex_chunk() {
        let mut source = Source::new();
        let span = source.add(SourceFile::from_str("<test>".into(), "let x\n\n"));
        let tokens = lex_chunk(&source, span, &NoReport).unwrap();
        let tokens: Vec<Tok> = tokens.into_iter().map(|t| t.base).collect();
        assert_eq!(tokens, vec![Tok::Keyword(Keyword::Let), Tok::Name("x".to_owned()),
                                Tok::Punct(Punct::Newline)]);
    }

    #[test]
    fn test_lex_chunk_error() {
        let mut source = Source::new();
        let span = source.add(SourceFile::from_str("<test>".into(), "x = \"abc"));
        let report = CollectedReport::new(Locale::new("en").unwrap());
        assert_eq!(lex_chunk(&source, span, &report), Err(Stop::Fatal));
        let reports = report.into_reports();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].0, Kind::Fatal);
        assert_eq!(reports[0].1, Span::new(source.pos_in_span(span, 4), source.pos_in_span(span, 8)));
        assert_eq!(reports[0].2, "Premature end of file in a literal or comment");
    }

    #[test]
    fn test_lex_chunk_no_file() {
        let source = Source::new();
        let report = CollectedReport::new(Locale::new("ko").unwrap());
        assert_eq!(lex_chunk(&source, Span::dummy(), &report), Err(Stop::Fatal));
        assert_eq!(report.into_reports()[0].2,
                   "주어진 코드 범위에 대응하는 소스 파일이 존재하지 않습니다");
    }
}
