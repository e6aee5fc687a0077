use std::fmt::Display;

/// The base kinds every RWLZ type is built from.
///
/// `Error` is not a source type: the checker produces it whenever resolution
/// fails, and it is compatible with everything so one mistake does not cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Int,
    Float,
    Bool,
    Char,
    String,
    Void,
    Auto,
    Error,
}

impl Display for BaseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BaseType::Int => "int",
            BaseType::Float => "float",
            BaseType::Bool => "bool",
            BaseType::Char => "char",
            BaseType::String => "string",
            BaseType::Void => "void",
            BaseType::Auto => "auto",
            BaseType::Error => "<error>",
        };

        write!(f, "{}", name)
    }
}

/// A type descriptor: base kind, array-ness and const-ness.
///
/// Equality only looks at the base kind and array-ness; `is_const` never
/// makes two otherwise identical types differ.
#[derive(Debug, Clone, Copy, Eq)]
pub struct Type {
    pub base: BaseType,
    pub is_array: bool,
    pub is_const: bool,
}

impl Type {
    pub const fn new(base: BaseType) -> Self {
        Type {
            base,
            is_array: false,
            is_const: false,
        }
    }

    pub const fn array(base: BaseType) -> Self {
        Type {
            base,
            is_array: true,
            is_const: false,
        }
    }

    pub const fn int() -> Self {
        Type::new(BaseType::Int)
    }

    pub const fn float() -> Self {
        Type::new(BaseType::Float)
    }

    pub const fn bool() -> Self {
        Type::new(BaseType::Bool)
    }

    pub const fn char() -> Self {
        Type::new(BaseType::Char)
    }

    pub const fn string() -> Self {
        Type::new(BaseType::String)
    }

    pub const fn void() -> Self {
        Type::new(BaseType::Void)
    }

    pub const fn auto() -> Self {
        Type::new(BaseType::Auto)
    }

    pub const fn error() -> Self {
        Type::new(BaseType::Error)
    }

    pub fn with_const(mut self, is_const: bool) -> Self {
        self.is_const = is_const;
        self
    }

    /// The array type whose elements are `self`.
    pub fn as_array(mut self) -> Self {
        self.is_array = true;
        self
    }

    /// The element type of an array type; scalars are returned unchanged.
    pub fn element(mut self) -> Self {
        self.is_array = false;
        self
    }

    pub fn is_error(&self) -> bool {
        self.base == BaseType::Error
    }

    pub fn is_auto(&self) -> bool {
        self.base == BaseType::Auto
    }

    pub fn is_void(&self) -> bool {
        !self.is_array && self.base == BaseType::Void
    }

    /// `int` or `float` scalars.
    pub fn is_numeric(&self) -> bool {
        !self.is_array && matches!(self.base, BaseType::Int | BaseType::Float)
    }

    pub fn is_scalar(&self, base: BaseType) -> bool {
        !self.is_array && self.base == base
    }
}

impl PartialEq for Type {
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base && self.is_array == other.is_array
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }

        if self.is_array {
            write!(f, "array {}", self.base)
        } else {
            write!(f, "{}", self.base)
        }
    }
}
