//! Lexical analysis.

use std::fmt;

use kestrel_diag::{Locale, Localize, Localized};

/// A token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tok {
    /// A number, with its original spelling.
    ///
    /// Any identifier-shaped run that parses as a number becomes this token,
    /// so `_1` and `1_000` are both numbers.
    Num { raw: String, value: u64 },

    /// An identifier, including unrecognized `#`-prefixed words.
    Name(String),

    /// A character or an operator-like run that has no other meaning.
    Unknown(String),

    /// A character literal, truncated to 8 bits.
    Char(u8),

    /// A string literal with escapes processed.
    Str(String),

    /// A builtin operator.
    Op(Op),

    /// A punctuation, including line separators.
    Punct(Punct),

    /// A reserved keyword.
    Keyword(Keyword),

    /// A compiler-introspection directive like `#file`.
    Directive(Directive),

    /// The end of file.
    ///
    /// The lexer produces this exactly once and stops afterwards.
    EOF,
}

impl Tok {
    /// Classifies a punctuation or operator spelling.
    pub fn from_punct(s: &str) -> Tok {
        if let Some(op) = Op::from_spelling(s) {
            Tok::Op(op)
        } else if let Some(p) = Punct::from_spelling(s) {
            Tok::Punct(p)
        } else {
            Tok::Unknown(s.to_owned())
        }
    }

    /// Classifies an identifier-shaped spelling into a keyword, a directive or a name.
    pub fn from_word(s: &str) -> Tok {
        if let Some(kw) = Keyword::from(s) {
            Tok::Keyword(kw)
        } else if let Some(dir) = Directive::from(s) {
            Tok::Directive(dir)
        } else {
            Tok::Name(s.to_owned())
        }
    }

    /// Returns true if the token cannot be used as a plain identifier.
    ///
    /// Declaration attributes and `self` are lexed as names but still count as keywords.
    pub fn is_keyword(&self) -> bool {
        match *self {
            Tok::Keyword(_) => true,
            Tok::Name(ref name) => name == "self" || Attribute::from(name).is_some(),
            _ => false,
        }
    }

    pub fn is_line_separator(&self) -> bool {
        match *self {
            Tok::Punct(Punct::Newline) | Tok::Punct(Punct::Semicolon) => true,
            _ => false,
        }
    }

    pub fn is_literal(&self) -> bool {
        match *self {
            Tok::Num { .. } | Tok::Char(_) | Tok::Str(_) => true,
            Tok::Keyword(Keyword::True) | Tok::Keyword(Keyword::False) |
            Tok::Keyword(Keyword::Nil) => true,
            _ => false,
        }
    }

    pub fn is_eof(&self) -> bool {
        *self == Tok::EOF
    }
}

impl Localize for Tok {
    fn fmt_localized(&self, f: &mut fmt::Formatter, locale: Locale) -> fmt::Result {
        match (locale.language(), self) {
            ("ko", &Tok::Num { .. })      => write!(f, "숫자"),
            (_,    &Tok::Num { .. })      => write!(f, "a number"),
            ("ko", &Tok::Name(_))         => write!(f, "이름"),
            (_,    &Tok::Name(_))         => write!(f, "a name"),
            ("ko", &Tok::Unknown(ref s))  => write!(f, "알 수 없는 문자 `{}`", s),
            (_,    &Tok::Unknown(ref s))  => write!(f, "an unknown character `{}`", s),
            ("ko", &Tok::Char(_))         => write!(f, "문자 리터럴"),
            (_,    &Tok::Char(_))         => write!(f, "a character literal"),
            ("ko", &Tok::Str(_))          => write!(f, "문자열 리터럴"),
            (_,    &Tok::Str(_))          => write!(f, "a string literal"),
            (_,    &Tok::Op(op))          => write!(f, "{}", Localized::new(&op, locale)),
            (_,    &Tok::Punct(p))        => write!(f, "{}", Localized::new(&p, locale)),
            (_,    &Tok::Keyword(kw))     => write!(f, "{}", Localized::new(&kw, locale)),
            (_,    &Tok::Directive(dir))  => write!(f, "{}", Localized::new(&dir, locale)),
            ("ko", &Tok::EOF)             => write!(f, "파일의 끝"),
            (_,    &Tok::EOF)             => write!(f, "the end of file"),
        }
    }
}

impl<'a> Localize for &'a Tok {
    fn fmt_localized(&self, f: &mut fmt::Formatter, locale: Locale) -> fmt::Result {
        (**self).fmt_localized(f, locale)
    }
}

macro_rules! define_puncts {
    ($ty:ident, $doc:tt, |$locale:ident|: $($i:ident $s:tt $t:expr, #[$m:meta])*) => (
        #[doc = $doc]
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum $ty { $(#[$m] $i,)* }

        impl $ty {
            pub fn from_spelling(s: &str) -> Option<$ty> {
                match s {
                    $($s => Some($ty::$i),)*
                    _ => None,
                }
            }

            pub fn spelling(&self) -> &'static str {
                match *self { $($ty::$i => $s,)* }
            }
        }

        impl Localize for $ty {
            fn fmt_localized(&self, f: &mut fmt::Formatter, $locale: Locale) -> fmt::Result {
                let text = match *self { $($ty::$i => $t,)* };
                fmt::Display::fmt(text, f)
            }
        }
    );
}

define_puncts! { Punct, "A punctuation.", |locale|:
    LParen      "("     "`(`",      /// `(`.
    RParen      ")"     "`)`",      /// `)`.
    LBrace      "{"     "`{`",      /// `{`.
    RBrace      "}"     "`}`",      /// `}`.
    LBracket    "["     "`[`",      /// `[`.
    RBracket    "]"     "`]`",      /// `]`.
    Comma       ","     "`,`",      /// `,`.
    Colon       ":"     "`:`",      /// `:`.
    Dot         "."     "`.`",      /// `.`.
    Arrow       "->"    "`->`",     /// `->`.
    Ellipsis    "..."   "`...`",    /// `...`.
    Ques        "?"     "`?`",      /// `?`.
    Semicolon   ";"     "`;`",      /// `;`. Interchangeable with a newline.
    Newline     "\n"    match locale.language() { "ko" => "개행문자", _ => "a newline" },
                        /// A newline. Blank lines are collapsed into one.
}

define_puncts! { Op, "A builtin operator.", |_locale|:
    Plus        "+"     "`+`",      /// `+`.
    Minus       "-"     "`-`",      /// `-`.
    Star        "*"     "`*`",      /// `*`.
    Slash       "/"     "`/`",      /// `/`.
    Percent     "%"     "`%`",      /// `%`.
    LtLt        "<<"    "`<<`",     /// `<<`.
    GtGt        ">>"    "`>>`",     /// `>>`.
    Amp         "&"     "`&`",      /// `&`.
    Pipe        "|"     "`|`",      /// `|`.
    Caret       "^"     "`^`",      /// `^`.
    Tilde       "~"     "`~`",      /// `~`.
    Bang        "!"     "`!`",      /// `!`.
    AmpAmp      "&&"    "`&&`",     /// `&&`.
    PipePipe    "||"    "`||`",     /// `||`.
    EqEq        "=="    "`==`",     /// `==`.
    BangEq      "!="    "`!=`",     /// `!=`.
    Lt          "<"     "`<`",      /// `<`.
    LtEq        "<="    "`<=`",     /// `<=`.
    Gt          ">"     "`>`",      /// `>`.
    GtEq        ">="    "`>=`",     /// `>=`.
    Eq          "="     "`=`",      /// `=`.
    PlusEq      "+="    "`+=`",     /// `+=`.
    MinusEq     "-="    "`-=`",     /// `-=`.
    StarEq      "*="    "`*=`",     /// `*=`.
    SlashEq     "/="    "`/=`",     /// `/=`.
    PercentEq   "%="    "`%=`",     /// `%=`.
    LtLtEq      "<<="   "`<<=`",    /// `<<=`.
    GtGtEq      ">>="   "`>>=`",    /// `>>=`.
    AmpEq       "&="    "`&=`",     /// `&=`.
    PipeEq      "|="    "`|=`",     /// `|=`.
    CaretEq     "^="    "`^=`",     /// `^=`.
    QuesQues    "??"    "`??`",     /// `??`.
}

impl Op {
    /// For a compound assignment like `+=`, returns the underlying operator.
    pub fn assignment_base(&self) -> Option<Op> {
        match *self {
            Op::PlusEq => Some(Op::Plus),
            Op::MinusEq => Some(Op::Minus),
            Op::StarEq => Some(Op::Star),
            Op::SlashEq => Some(Op::Slash),
            Op::PercentEq => Some(Op::Percent),
            Op::LtLtEq => Some(Op::LtLt),
            Op::GtGtEq => Some(Op::GtGt),
            Op::AmpEq => Some(Op::Amp),
            Op::PipeEq => Some(Op::Pipe),
            Op::CaretEq => Some(Op::Caret),
            _ => None,
        }
    }

    pub fn is_assignment(&self) -> bool {
        *self == Op::Eq || self.assignment_base().is_some()
    }
}

macro_rules! define_words {
    ($ty:ident, $doc:tt, $what_ko:tt, $what:tt: $($i:ident $t:expr, #[$m:meta])*) => (
        #[doc = $doc]
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum $ty { $(#[$m] $i,)* }

        impl $ty {
            pub fn from(s: &str) -> Option<$ty> {
                match s {
                    $($t => Some($ty::$i),)*
                    _ => None,
                }
            }

            pub fn name(&self) -> &'static str {
                match *self { $($ty::$i => $t,)* }
            }
        }

        impl Localize for $ty {
            fn fmt_localized(&self, f: &mut fmt::Formatter, locale: Locale) -> fmt::Result {
                match locale.language() {
                    "ko" => write!(f, "{} `{}`", $what_ko, self.name()),
                    _ => write!(f, "{} `{}`", $what, self.name()),
                }
            }
        }
    );
}

define_words! { Keyword, "A reserved keyword.", "예약어", "a keyword":
    Func        "func",         /// `func`.
    Type        "type",         /// `type`.
    Extension   "extension",    /// `extension`.
    Protocol    "protocol",     /// `protocol`.
    Var         "var",          /// `var`.
    Let         "let",          /// `let`.
    If          "if",           /// `if`.
    Else        "else",         /// `else`.
    While       "while",        /// `while`.
    For         "for",          /// `for`.
    In          "in",           /// `in`.
    Return      "return",       /// `return`.
    Break       "break",        /// `break`.
    Continue    "continue",     /// `continue`.
    Switch      "switch",       /// `switch`.
    Case        "case",         /// `case`.
    Default     "default",      /// `default`.
    Nil         "nil",          /// `nil`.
    True        "true",         /// `true`.
    False       "false",        /// `false`.
    Sizeof      "sizeof",       /// `sizeof`.
    Init        "init",         /// `init`.
    Deinit      "deinit",       /// `deinit`.
    Subscript   "subscript",    /// `subscript`.
    As          "as",           /// `as`.
    Is          "is",           /// `is`.
    Operator    "operator",     /// `operator`.
}

define_words! { Attribute, "A declaration attribute. These are lexed as names.",
                "속성", "an attribute":
    Foreign     "foreign",      /// `foreign`.
    Static      "static",       /// `static`.
    Mutating    "mutating",     /// `mutating`.
    Indirect    "indirect",     /// `indirect`.
    Noreturn    "noreturn",     /// `noreturn`.
    Implicit    "implicit",     /// `implicit`.
}

define_words! { Directive, "A compiler-introspection directive.", "지시어", "a directive":
    Function    "#function",    /// `#function`, the name of the enclosing function.
    File        "#file",        /// `#file`, the current file path.
    Line        "#line",        /// `#line`, the current line number.
    Warning     "#warning",     /// `#warning`, emits a warning at compile time.
    Error       "#error",       /// `#error`, emits an error at compile time.
}

mod lexer;

pub use self::lexer::{Lexer, Error, ErrorKind};

#[test]
fn test_classify() {
    assert_eq!(Tok::from_punct("->"), Tok::Punct(Punct::Arrow));
    assert_eq!(Tok::from_punct("<<="), Tok::Op(Op::LtLtEq));
    assert_eq!(Tok::from_punct("?"), Tok::Punct(Punct::Ques));
    assert_eq!(Tok::from_punct("??"), Tok::Op(Op::QuesQues));
    assert_eq!(Tok::from_punct("+-"), Tok::Unknown("+-".to_owned()));
    assert_eq!(Tok::from_punct("@"), Tok::Unknown("@".to_owned()));

    assert_eq!(Tok::from_word("let"), Tok::Keyword(Keyword::Let));
    assert_eq!(Tok::from_word("#file"), Tok::Directive(Directive::File));
    assert_eq!(Tok::from_word("#pragma"), Tok::Name("#pragma".to_owned()));
    assert_eq!(Tok::from_word("letter"), Tok::Name("letter".to_owned()));
}

#[test]
fn test_is_keyword() {
    assert!(Tok::Keyword(Keyword::Func).is_keyword());
    assert!(Tok::Name("self".to_owned()).is_keyword());
    assert!(Tok::Name("mutating".to_owned()).is_keyword());
    assert!(!Tok::Name("selfish".to_owned()).is_keyword());
    assert!(!Tok::Directive(Directive::Line).is_keyword());
    assert!(!Tok::Str("self".to_owned()).is_keyword());
}

#[test]
fn test_localize() {
    let en = Locale::new("en").unwrap();
    let ko = Locale::new("ko-KR").unwrap();
    let tok = Tok::Keyword(Keyword::Let);
    assert_eq!(format!("{}", Localized::new(&tok, en)), "a keyword `let`");
    assert_eq!(format!("{}", Localized::new(&tok, ko)), "예약어 `let`");
    let tok = Tok::Punct(Punct::Newline);
    assert_eq!(format!("{}", Localized::new(&tok, en)), "a newline");
    assert_eq!(format!("{}", Localized::new(&tok, ko)), "개행문자");
    assert_eq!(format!("{}", Localized::new(&Tok::Op(Op::AmpAmp), en)), "`&&`");
    assert_eq!(format!("{}", Localized::new(&Tok::EOF, en)), "the end of file");
}
