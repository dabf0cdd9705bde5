//! The type algebra.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::collections::hash_map::DefaultHasher;

pub use self::subst::Substitution;

mod display;
mod coerce;
mod subst;
mod literals;

/// A kind of IEEE floating point numbers.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum FloatKind {
    /// `Float`, 32 bits.
    Float,

    /// `Double`, 64 bits.
    Double,

    /// `Float80`, the x87 extended precision.
    Float80,
}

impl FloatKind {
    pub fn name(&self) -> &'static str {
        match *self {
            FloatKind::Float => "Float",
            FloatKind::Double => "Double",
            FloatKind::Float80 => "Float80",
        }
    }
}

/// A type.
///
/// Types are plain values: two structurally equal trees are indistinguishable,
/// and every operation returns a new type instead of mutating the receiver.
///
/// The literal types and `Error` are transient. They exist only between parsing
/// and the end of type resolution and should never be seen by code generation.
#[derive(Clone)]
pub enum DataType {
    /// A fixed-width integer.
    Int { width: u32, signed: bool },

    /// A floating point number.
    Floating(FloatKind),

    /// `Bool`.
    Bool,

    /// `Void`.
    Void,

    /// A nominal type (struct, class or protocol) referred by its name.
    Custom(String),

    /// An unresolved generic parameter.
    TypeVariable(String),

    /// A type that failed to resolve.
    ///
    /// This is not equal to any other type except itself,
    /// and lets the analysis continue after a local failure.
    Error,

    /// The type of an integer literal without a contextual type yet.
    IntegerLiteral,

    /// The type of a floating point literal without a contextual type yet.
    FloatingLiteral,

    /// The type of a string literal without a contextual type yet.
    StringLiteral,

    /// The type of `nil` without a contextual type yet.
    NilLiteral,

    /// A function type.
    Function { args: Vec<DataType>, ret: Box<DataType>, variadic: bool },

    /// A pointer. Multiple levels of pointers nest.
    Pointer(Box<DataType>),

    /// An array with an optional fixed length (`None` for unsized arrays).
    ///
    /// The length does not participate in the equality.
    Array(Box<DataType>, Option<u64>),

    /// A tuple.
    Tuple(Vec<DataType>),

    /// A composition of protocols. The empty composition is `Any`.
    ProtocolComposition(Vec<DataType>),
}

// XORed to every hash so that a type does not hash like its description
const HASH_SALT: u64 = 0x6b65_7374_7265_6c31;

impl DataType {
    pub fn int(width: u32, signed: bool) -> DataType { DataType::Int { width, signed } }

    pub fn int8() -> DataType { DataType::int(8, true) }
    pub fn int16() -> DataType { DataType::int(16, true) }
    pub fn int32() -> DataType { DataType::int(32, true) }
    pub fn int64() -> DataType { DataType::int(64, true) }
    pub fn uint8() -> DataType { DataType::int(8, false) }
    pub fn uint16() -> DataType { DataType::int(16, false) }
    pub fn uint32() -> DataType { DataType::int(32, false) }
    pub fn uint64() -> DataType { DataType::int(64, false) }

    pub fn float() -> DataType { DataType::Floating(FloatKind::Float) }
    pub fn double() -> DataType { DataType::Floating(FloatKind::Double) }
    pub fn float80() -> DataType { DataType::Floating(FloatKind::Float80) }

    pub fn bool() -> DataType { DataType::Bool }
    pub fn void() -> DataType { DataType::Void }

    /// The string type, a pointer to 8-bit characters.
    pub fn string() -> DataType { DataType::pointer(DataType::int8()) }

    /// The universal type, an empty protocol composition.
    pub fn any() -> DataType { DataType::ProtocolComposition(Vec::new()) }

    pub fn custom<S: Into<String>>(name: S) -> DataType { DataType::Custom(name.into()) }

    pub fn type_variable<S: Into<String>>(name: S) -> DataType {
        DataType::TypeVariable(name.into())
    }

    pub fn pointer(pointee: DataType) -> DataType { DataType::Pointer(Box::new(pointee)) }

    pub fn array(elem: DataType, length: Option<u64>) -> DataType {
        DataType::Array(Box::new(elem), length)
    }

    pub fn function(args: Vec<DataType>, ret: DataType, variadic: bool) -> DataType {
        DataType::Function { args, ret: Box::new(ret), variadic }
    }

    pub fn tuple(elems: Vec<DataType>) -> DataType { DataType::Tuple(elems) }

    pub fn composition(protocols: Vec<DataType>) -> DataType {
        DataType::ProtocolComposition(protocols)
    }

    /// Resolves a type name as written in the source.
    ///
    /// Builtin spellings give builtin types, every other name is a nominal type.
    pub fn from_name(name: &str) -> DataType {
        match name {
            "Int" | "Int64" => DataType::int64(),
            "Int8" => DataType::int8(),
            "Int16" => DataType::int16(),
            "Int32" => DataType::int32(),
            "UInt" | "UInt64" => DataType::uint64(),
            "UInt8" => DataType::uint8(),
            "UInt16" => DataType::uint16(),
            "UInt32" => DataType::uint32(),
            "Float" => DataType::float(),
            "Double" => DataType::double(),
            "Float80" => DataType::float80(),
            "Bool" => DataType::Bool,
            "Void" => DataType::Void,
            "Any" => DataType::any(),
            _ => DataType::Custom(name.to_owned()),
        }
    }

    pub fn is_integer(&self) -> bool {
        match *self { DataType::Int { .. } => true, _ => false }
    }

    pub fn is_signed(&self) -> bool {
        match *self { DataType::Int { signed, .. } => signed, _ => false }
    }

    pub fn is_floating(&self) -> bool {
        match *self { DataType::Floating(_) => true, _ => false }
    }

    pub fn is_numeric(&self) -> bool {
        self.is_integer() || self.is_floating()
    }

    pub fn is_pointer(&self) -> bool {
        match *self { DataType::Pointer(_) => true, _ => false }
    }

    pub fn is_function(&self) -> bool {
        match *self { DataType::Function { .. } => true, _ => false }
    }

    pub fn is_any(&self) -> bool {
        match *self { DataType::ProtocolComposition(ref tys) => tys.is_empty(), _ => false }
    }

    /// Returns the bit width of integer types.
    pub fn width(&self) -> Option<u32> {
        match *self { DataType::Int { width, .. } => Some(width), _ => None }
    }

    /// Unwraps one level of arrays and every level of pointers.
    pub fn element_type(&self) -> &DataType {
        match *self {
            DataType::Array(ref elem, _) => elem,
            DataType::Pointer(ref pointee) => pointee.element_type(),
            _ => self,
        }
    }

    pub fn pointer_level(&self) -> usize {
        match *self {
            DataType::Pointer(ref pointee) => 1 + pointee.pointer_level(),
            _ => 0,
        }
    }

    /// The canonical description of the type.
    pub fn description(&self) -> String {
        self.to_string()
    }

    /// The hash of the type, derived from its description with array lengths erased.
    pub fn hash_value(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        display::erased_description(self).hash(&mut hasher);
        hasher.finish() ^ HASH_SALT
    }

    /// Calls `f` for this type and every type nested in it, in the traversal order
    /// (arguments before the return type, elements from left to right).
    pub fn walk<F: FnMut(&DataType)>(&self, f: &mut F) {
        f(self);
        match *self {
            DataType::Function { ref args, ref ret, .. } => {
                for arg in args { arg.walk(f); }
                ret.walk(f);
            }
            DataType::Pointer(ref t) | DataType::Array(ref t, _) => t.walk(f),
            DataType::Tuple(ref tys) | DataType::ProtocolComposition(ref tys) => {
                for t in tys { t.walk(f); }
            }
            DataType::Int { .. } | DataType::Floating(_) | DataType::Bool | DataType::Void |
            DataType::Custom(_) | DataType::TypeVariable(_) | DataType::Error |
            DataType::IntegerLiteral | DataType::FloatingLiteral |
            DataType::StringLiteral | DataType::NilLiteral => {}
        }
    }

    /// Rebuilds the type with `f` applied to each immediately nested type.
    /// Types without nested types are returned as is.
    pub fn map_children<F: FnMut(&DataType) -> DataType>(&self, mut f: F) -> DataType {
        match *self {
            DataType::Function { ref args, ref ret, variadic } => {
                let args = args.iter().map(&mut f).collect();
                let ret = Box::new(f(ret));
                DataType::Function { args, ret, variadic }
            }
            DataType::Pointer(ref t) => DataType::Pointer(Box::new(f(t))),
            DataType::Array(ref t, length) => DataType::Array(Box::new(f(t)), length),
            DataType::Tuple(ref tys) => DataType::Tuple(tys.iter().map(f).collect()),
            DataType::ProtocolComposition(ref tys) => {
                DataType::ProtocolComposition(tys.iter().map(f).collect())
            }
            DataType::Int { .. } | DataType::Floating(_) | DataType::Bool | DataType::Void |
            DataType::Custom(_) | DataType::TypeVariable(_) | DataType::Error |
            DataType::IntegerLiteral | DataType::FloatingLiteral |
            DataType::StringLiteral | DataType::NilLiteral => self.clone(),
        }
    }
}

impl PartialEq for DataType {
    fn eq(&self, other: &DataType) -> bool {
        match (self, other) {
            (&DataType::Int { width: w1, signed: s1 }, &DataType::Int { width: w2, signed: s2 }) =>
                w1 == w2 && s1 == s2,
            (&DataType::Floating(k1), &DataType::Floating(k2)) => k1 == k2,
            (&DataType::Bool, &DataType::Bool) => true,
            (&DataType::Void, &DataType::Void) => true,
            (&DataType::Custom(ref a), &DataType::Custom(ref b)) => a == b,
            (&DataType::TypeVariable(ref a), &DataType::TypeVariable(ref b)) => a == b,
            (&DataType::Error, &DataType::Error) => true,
            (&DataType::IntegerLiteral, &DataType::IntegerLiteral) => true,
            (&DataType::FloatingLiteral, &DataType::FloatingLiteral) => true,
            (&DataType::StringLiteral, &DataType::StringLiteral) => true,
            (&DataType::NilLiteral, &DataType::NilLiteral) => true,
            (&DataType::Function { args: ref a1, ret: ref r1, variadic: v1 },
             &DataType::Function { args: ref a2, ret: ref r2, variadic: v2 }) =>
                a1 == a2 && r1 == r2 && v1 == v2,
            (&DataType::Pointer(ref a), &DataType::Pointer(ref b)) => a == b,
            (&DataType::Array(ref a, _), &DataType::Array(ref b, _)) => a == b,
            (&DataType::Tuple(ref a), &DataType::Tuple(ref b)) => a == b,
            (&DataType::ProtocolComposition(ref a), &DataType::ProtocolComposition(ref b)) => a == b,
            (_, _) => false,
        }
    }
}

impl Eq for DataType {}

impl Hash for DataType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.hash_value());
    }
}

impl fmt::Debug for DataType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        display::fmt_debug(self, f)
    }
}
