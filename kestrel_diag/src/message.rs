//! Message localization.
//!
//! Messages are written in English by default, with Korean translations.

use std::fmt;
use std::str;
use std::env;

/// The message locale, a lowercased IETF language tag of up to 8 bytes (e.g. `ko-kr`).
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Locale {
    tag: [u8; 8],
    len: u8,
}

impl Locale {
    /// Parses a locale like `en`, `ko-KR` or `ko_KR.UTF-8`.
    ///
    /// The encoding and modifier after `.` or `@` are ignored, and `_` is read as `-`.
    pub fn new(locale: &str) -> Option<Locale> {
        let locale = locale.split(|c| c == '.' || c == '@').next().unwrap_or("");
        if locale.len() < 2 || locale.len() > 8 {
            return None;
        }

        let mut tag = [0u8; 8];
        for (dst, c) in tag.iter_mut().zip(locale.bytes()) {
            *dst = match c {
                b'-' | b'_' => b'-',
                c if c.is_ascii_alphabetic() => c.to_ascii_lowercase(),
                _ => return None,
            };
        }
        if !tag[..2].iter().all(u8::is_ascii_lowercase) {
            return None;
        }

        Some(Locale { tag, len: locale.len() as u8 })
    }

    /// The locale used when the environment gives none. Every message falls back to English.
    pub fn dummy() -> Locale {
        Locale { tag: *b"xx\0\0\0\0\0\0", len: 2 }
    }

    pub fn as_str(&self) -> &str {
        str::from_utf8(&self.tag[..self.len as usize]).unwrap_or("xx")
    }

    /// The language part of the locale, e.g. `ko` for `ko-kr`.
    pub fn language(&self) -> &str {
        self.as_str().split('-').next().unwrap_or("xx")
    }
}

impl fmt::Debug for Locale {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "<Locale {}>", self.as_str())
    }
}

/// Returns the message locale from `LC_ALL`, `LC_MESSAGES` or `LANG` in this order.
pub fn get_message_locale() -> Option<Locale> {
    let var = ["LC_ALL", "LC_MESSAGES", "LANG"].iter()
        .filter_map(|var| env::var(var).ok())
        .find(|s| !s.is_empty())?;
    Locale::new(&var)
}

/// Any type that can be formatted into a localized text.
pub trait Localize: fmt::Debug {
    fn fmt_localized(&self, f: &mut fmt::Formatter, locale: Locale) -> fmt::Result;
}

impl<T: fmt::Display + fmt::Debug> Localize for T {
    fn fmt_localized(&self, f: &mut fmt::Formatter, _locale: Locale) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Formats `base` in the given locale, e.g. `Localized::new(&msg, locale).to_string()`.
pub struct Localized<'b, T: Localize + ?Sized + 'b> {
    base: &'b T,
    locale: Locale,
}

impl<'b, T: Localize + ?Sized + 'b> Localized<'b, T> {
    pub fn new(base: &'b T, locale: Locale) -> Localized<'b, T> {
        Localized { base, locale }
    }
}

impl<'b, T: Localize + ?Sized + 'b> fmt::Display for Localized<'b, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.base.fmt_localized(f, self.locale)
    }
}

/// Defines a localizable message as a struct.
///
/// ```rust,ignore
/// define_msg! { pub UnknownName { name: String }:
///     "ko" => "알 수 없는 이름 {name}",
///     _    => "Unknown name {name}",
/// }
/// ```
///
/// Each field should be localizable and is available to the format strings by its name.
/// The last arm should be `_`, which is used for English.
/// A message without fields is still constructed as `UnknownName {}`.
#[macro_export]
macro_rules! define_msg {
    // the field arguments are bundled into one token tree, so that they can be
    // repeated inside each locale arm
    (@arm $f:ident; $format:tt; ($($args:tt)*)) => (
        write!($f, $format $($args)*)
    );

    (@match $f:ident, $locale:ident; $($lang:pat => $format:tt),+; $args:tt) => (
        match $locale.language() {
            $($lang => $crate::define_msg!(@arm $f; $format; $args),)+
        }
    );

    ($vis:vis $name:ident $({ $($fname:ident: $ftype:ty),* $(,)? })?:
     $($lang:pat => $format:tt),+ $(,)?) => (
        #[derive(Debug)]
        $vis struct $name {
            $($(pub $fname: $ftype,)*)?
        }

        impl $crate::Localize for $name {
            fn fmt_localized(&self, f: &mut ::std::fmt::Formatter,
                             locale: $crate::Locale) -> ::std::fmt::Result {
                $crate::define_msg!(@match f, locale; $($lang => $format),+;
                    ($($(, $fname = $crate::Localized::new(&self.$fname, locale))*)?))
            }
        }
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    define_msg! { Greeting { name: String }:
        "ko" => "안녕하세요, {name}님",
        _    => "Hello, {name}",
    }

    define_msg! { Farewell:
        "ko" => "안녕히 가세요",
        _    => "Goodbye",
    }

    fn locale(s: &str) -> Locale {
        Locale::new(s).unwrap()
    }

    #[test]
    fn test_locale_names() {
        assert!(Locale::new("").is_none());
        assert!(Locale::new("e").is_none());
        assert!(Locale::new("C").is_none());
        assert!(Locale::new("ko-KR-x-qqq").is_none());
        assert!(Locale::new("12").is_none());
        assert_eq!(locale("ko-KR"), locale("ko_kr"));
        assert_eq!(locale("ko_KR.UTF-8"), locale("ko-kr"));
        assert_eq!(locale("ko_KR@euro").as_str(), "ko-kr");
        assert_ne!(locale("ko-KR"), locale("ko"));
        assert_eq!(locale("KO"), locale("ko"));
        assert_eq!(locale("ko-KR").language(), "ko");
        assert_eq!(Locale::dummy().language(), "xx");
    }

    #[test]
    fn test_define_msg() {
        let msg = Greeting { name: "Kestrel".to_owned() };
        assert_eq!(Localized::new(&msg, locale("en")).to_string(), "Hello, Kestrel");
        assert_eq!(Localized::new(&msg, locale("ko-KR")).to_string(), "안녕하세요, Kestrel님");
        assert_eq!(Localized::new(&msg, Locale::dummy()).to_string(), "Hello, Kestrel");
        assert_eq!(Localized::new(&Farewell {}, locale("ko")).to_string(), "안녕히 가세요");
    }
}
