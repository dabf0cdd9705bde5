use std::fmt;

use super::DataType;

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

// also covers widths like `Int7` which only `DataType::int` can make
fn spells_builtin(name: &str) -> bool {
    if let DataType::Custom(_) = DataType::from_name(name) {
        let digits = name.strip_prefix("UInt").or_else(|| name.strip_prefix("Int"));
        match digits {
            Some(d) => !d.is_empty() && d.bytes().all(|c| c.is_ascii_digit()),
            None => false,
        }
    } else {
        true
    }
}

// a nominal name is printed bare only when it cannot be read as anything else
fn fmt_name(name: &str, nominal: bool, f: &mut fmt::Formatter) -> fmt::Result {
    if is_identifier(name) && !(nominal && spells_builtin(name)) {
        return f.write_str(name);
    }
    f.write_str("`")?;
    for c in name.chars() {
        if c == '`' || c == '\\' {
            f.write_str("\\")?;
        }
        write!(f, "{}", c)?;
    }
    f.write_str("`")
}

// types that continue to the right without a closing delimiter
fn is_open_ended(ty: &DataType) -> bool {
    match *ty {
        DataType::Function { .. } => true,
        DataType::Pointer(ref pointee) => is_open_ended(pointee),
        _ => false,
    }
}

fn is_composition(ty: &DataType) -> bool {
    match *ty { DataType::ProtocolComposition(_) => true, _ => false }
}

fn is_compound_composition(ty: &DataType) -> bool {
    match *ty { DataType::ProtocolComposition(ref tys) => !tys.is_empty(), _ => false }
}

fn fmt_list(tys: &[DataType], erase_lengths: bool, f: &mut fmt::Formatter) -> fmt::Result {
    for (i, ty) in tys.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        fmt_type(ty, erase_lengths, f)?;
    }
    Ok(())
}

fn fmt_grouped(ty: &DataType, group: bool, erase_lengths: bool,
               f: &mut fmt::Formatter) -> fmt::Result {
    if group {
        f.write_str("(")?;
        fmt_type(ty, erase_lengths, f)?;
        f.write_str(")")
    } else {
        fmt_type(ty, erase_lengths, f)
    }
}

fn fmt_type(ty: &DataType, erase_lengths: bool, f: &mut fmt::Formatter) -> fmt::Result {
    match *ty {
        DataType::Int { width: 64, signed } => f.write_str(if signed { "Int" } else { "UInt" }),
        DataType::Int { width, signed } => {
            write!(f, "{}{}", if signed { "Int" } else { "UInt" }, width)
        }
        DataType::Floating(kind) => f.write_str(kind.name()),
        DataType::Bool => f.write_str("Bool"),
        DataType::Void => f.write_str("Void"),
        DataType::Custom(ref name) => fmt_name(name, true, f),
        DataType::TypeVariable(ref name) => {
            f.write_str("'")?;
            fmt_name(name, false, f)
        }

        DataType::Error => f.write_str("<<error type>>"),
        DataType::IntegerLiteral => f.write_str("<<integer literal>>"),
        DataType::FloatingLiteral => f.write_str("<<floating literal>>"),
        DataType::StringLiteral => f.write_str("<<string literal>>"),
        DataType::NilLiteral => f.write_str("<<nil literal>>"),

        DataType::Function { ref args, ref ret, variadic } => {
            f.write_str("(")?;
            fmt_list(args, erase_lengths, f)?;
            if variadic {
                f.write_str(if args.is_empty() { "..." } else { ", ..." })?;
            }
            f.write_str(") -> ")?;
            fmt_grouped(ret, is_compound_composition(ret), erase_lengths, f)
        }
        DataType::Pointer(ref pointee) => {
            f.write_str("*")?;
            fmt_grouped(pointee, is_compound_composition(pointee), erase_lengths, f)
        }
        DataType::Array(ref elem, length) => {
            f.write_str("[")?;
            fmt_type(elem, erase_lengths, f)?;
            match length {
                Some(n) if !erase_lengths => write!(f, "; {}]", n),
                _ => f.write_str("]"),
            }
        }
        DataType::Tuple(ref elems) => {
            f.write_str("(")?;
            fmt_list(elems, erase_lengths, f)?;
            f.write_str(if elems.len() == 1 { ",)" } else { ")" })
        }
        DataType::ProtocolComposition(ref tys) => {
            if tys.is_empty() {
                return f.write_str("Any");
            }
            for (i, ty) in tys.iter().enumerate() {
                if i > 0 {
                    f.write_str(" & ")?;
                }
                fmt_grouped(ty, is_open_ended(ty) || is_composition(ty), erase_lengths, f)?;
            }
            if tys.len() == 1 {
                f.write_str(" & Any")?;
            }
            Ok(())
        }
    }
}

struct Erased<'a>(&'a DataType);

impl<'a> fmt::Display for Erased<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_type(self.0, true, f)
    }
}

/// The description with every array length removed, which agrees with the equality.
pub fn erased_description(ty: &DataType) -> String {
    Erased(ty).to_string()
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt_type(self, false, f)
    }
}

/// `Debug` prints the same text as `Display`, which is already unambiguous.
pub fn fmt_debug(ty: &DataType, f: &mut fmt::Formatter) -> fmt::Result {
    fmt_type(ty, false, f)
}
