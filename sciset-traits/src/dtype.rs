//! Element-kind registry.
//!
//! Every dataset carries a [`DType`] tag. Scalar kinds map one-to-one onto a
//! buffer element type; compound kinds (`Array*`, complex, RGB) describe a
//! buffer of their [`base`](DType::base) kind where each logical item spans
//! several consecutive slots. The slot count itself is stored on the dataset
//! as an explicit item size, never decoded from the numeric code.

use std::fmt;

/// Multiplier turning a base code into its "array of base" code.
pub const ARRAY_MULTIPLIER: i32 = 100;

/// Width of the RGB compound kind.
pub const RGB_ITEM_SIZE: usize = 3;

/// Errors raised by registry lookups.
#[derive(Debug, thiserror::Error)]
pub enum DTypeError {
    #[error("unknown dtype code {0}")]
    UnknownCode(i32),

    #[error("{dtype} cannot hold items of {isize} elements")]
    InvalidItemSize { dtype: DType, isize: usize },

    #[error("no compound kind exists over {0}")]
    NoCompound(DType),
}

/// Element kind of a dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Bool,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    /// Pair of `f32` slots `[re, im]`.
    Complex64,
    /// Pair of `f64` slots `[re, im]`.
    Complex128,
    String,
    Object,
    ArrayInt8,
    ArrayInt16,
    ArrayInt32,
    ArrayInt64,
    ArrayFloat32,
    ArrayFloat64,
    /// Semantic tag over `(Int16, isize = 3)`.
    Rgb,
}

const ALL: [DType; 18] = [
    DType::Bool,
    DType::Int8,
    DType::Int16,
    DType::Int32,
    DType::Int64,
    DType::Float32,
    DType::Float64,
    DType::Complex64,
    DType::Complex128,
    DType::String,
    DType::Object,
    DType::ArrayInt8,
    DType::ArrayInt16,
    DType::ArrayInt32,
    DType::ArrayInt64,
    DType::ArrayFloat32,
    DType::ArrayFloat64,
    DType::Rgb,
];

impl DType {
    /// Numeric registry code.
    pub const fn code(self) -> i32 {
        match self {
            DType::Bool => 0,
            DType::Int8 => 1,
            DType::Int16 => 2,
            DType::Int32 => 3,
            DType::Int64 => 4,
            DType::Float32 => 5,
            DType::Float64 => 6,
            DType::Complex64 => 7,
            DType::Complex128 => 8,
            DType::String => 9,
            DType::Object => -1,
            DType::ArrayInt8 => ARRAY_MULTIPLIER,
            DType::ArrayInt16 => 2 * ARRAY_MULTIPLIER,
            DType::ArrayInt32 => 3 * ARRAY_MULTIPLIER,
            DType::ArrayInt64 => 4 * ARRAY_MULTIPLIER,
            DType::ArrayFloat32 => 5 * ARRAY_MULTIPLIER,
            DType::ArrayFloat64 => 6 * ARRAY_MULTIPLIER,
            DType::Rgb => 2 * ARRAY_MULTIPLIER + RGB_ITEM_SIZE as i32,
        }
    }

    /// Look up a kind by its registry code.
    pub fn from_code(code: i32) -> Result<DType, DTypeError> {
        ALL.iter()
            .copied()
            .find(|d| d.code() == code)
            .ok_or(DTypeError::UnknownCode(code))
    }

    /// Scalar kind stored in the backing buffer.
    pub const fn base(self) -> DType {
        match self {
            DType::Complex64 | DType::ArrayFloat32 => DType::Float32,
            DType::Complex128 | DType::ArrayFloat64 => DType::Float64,
            DType::ArrayInt8 => DType::Int8,
            DType::ArrayInt16 | DType::Rgb => DType::Int16,
            DType::ArrayInt32 => DType::Int32,
            DType::ArrayInt64 => DType::Int64,
            other => other,
        }
    }

    /// Item size implied by the kind, `None` for generic array kinds.
    pub const fn fixed_item_size(self) -> Option<usize> {
        match self {
            DType::Complex64 | DType::Complex128 => Some(2),
            DType::Rgb => Some(RGB_ITEM_SIZE),
            DType::ArrayInt8
            | DType::ArrayInt16
            | DType::ArrayInt32
            | DType::ArrayInt64
            | DType::ArrayFloat32
            | DType::ArrayFloat64 => None,
            _ => Some(1),
        }
    }

    /// Array kind over a scalar base, if one exists.
    pub fn array_of(base: DType) -> Result<DType, DTypeError> {
        match base.base() {
            DType::Int8 => Ok(DType::ArrayInt8),
            DType::Int16 => Ok(DType::ArrayInt16),
            DType::Int32 => Ok(DType::ArrayInt32),
            DType::Int64 => Ok(DType::ArrayInt64),
            DType::Float32 => Ok(DType::ArrayFloat32),
            DType::Float64 => Ok(DType::ArrayFloat64),
            other => Err(DTypeError::NoCompound(other)),
        }
    }

    /// Kind describing items of `isize` slots over `base`.
    ///
    /// A width of one yields the scalar base itself.
    pub fn compound(base: DType, isize: usize) -> Result<DType, DTypeError> {
        if isize == 0 {
            return Err(DTypeError::InvalidItemSize { dtype: base, isize });
        }
        if isize == 1 {
            return Ok(base.base());
        }
        DType::array_of(base)
    }

    /// Check that `isize` is a legal item size for this kind.
    pub fn validate_item_size(self, isize: usize) -> Result<(), DTypeError> {
        let ok = match self.fixed_item_size() {
            Some(n) => n == isize,
            None => isize >= 1,
        };
        if ok {
            Ok(())
        } else {
            Err(DTypeError::InvalidItemSize { dtype: self, isize })
        }
    }

    /// Same compound shape over a different base kind.
    ///
    /// Complex kinds keep their meaning over float bases and degrade to
    /// arrays over integer ones; RGB survives only over `Int16`.
    pub fn with_base(self, base: DType) -> DType {
        let base = base.base();
        match self {
            DType::Complex64 | DType::Complex128 => match base {
                DType::Float32 => DType::Complex64,
                DType::Float64 => DType::Complex128,
                other => DType::array_of(other).unwrap_or(other),
            },
            DType::Rgb if base == DType::Int16 => DType::Rgb,
            d if d.is_array() || d == DType::Rgb => DType::array_of(base).unwrap_or(base),
            _ => base,
        }
    }

    pub const fn is_bool(self) -> bool {
        matches!(self, DType::Bool)
    }

    /// Integer kinds, scalar or compound.
    pub const fn is_integer(self) -> bool {
        matches!(
            self.base(),
            DType::Int8 | DType::Int16 | DType::Int32 | DType::Int64
        )
    }

    /// Floating kinds, including complex and float arrays.
    pub const fn is_float(self) -> bool {
        matches!(self.base(), DType::Float32 | DType::Float64)
    }

    pub const fn is_complex(self) -> bool {
        matches!(self, DType::Complex64 | DType::Complex128)
    }

    pub const fn is_array(self) -> bool {
        matches!(
            self,
            DType::ArrayInt8
                | DType::ArrayInt16
                | DType::ArrayInt32
                | DType::ArrayInt64
                | DType::ArrayFloat32
                | DType::ArrayFloat64
        )
    }

    /// Kinds whose items span more than one slot.
    pub const fn is_compound(self) -> bool {
        self.is_array() || self.is_complex() || matches!(self, DType::Rgb)
    }

    pub const fn is_numeric(self) -> bool {
        !matches!(self, DType::String | DType::Object)
    }

    /// Short lowercase name.
    pub const fn name(self) -> &'static str {
        match self {
            DType::Bool => "bool",
            DType::Int8 => "int8",
            DType::Int16 => "int16",
            DType::Int32 => "int32",
            DType::Int64 => "int64",
            DType::Float32 => "float32",
            DType::Float64 => "float64",
            DType::Complex64 => "complex64",
            DType::Complex128 => "complex128",
            DType::String => "string",
            DType::Object => "object",
            DType::ArrayInt8 => "array_int8",
            DType::ArrayInt16 => "array_int16",
            DType::ArrayInt32 => "array_int32",
            DType::ArrayInt64 => "array_int64",
            DType::ArrayFloat32 => "array_float32",
            DType::ArrayFloat64 => "array_float64",
            DType::Rgb => "rgb",
        }
    }

    /// Position in the scalar widening ladder.
    fn ladder(self) -> u8 {
        match self {
            DType::Bool => 0,
            DType::Int8 => 1,
            DType::Int16 => 2,
            DType::Int32 => 3,
            DType::Int64 => 4,
            DType::Float32 => 5,
            DType::Float64 => 6,
            DType::Complex64 => 7,
            DType::Complex128 => 8,
            _ => 0,
        }
    }

    /// Kind able to hold values of both `self` and `other`.
    ///
    /// Integers wider than 16 bits combined with single precision widen to
    /// double precision, mirroring the usual mantissa-width rule.
    pub fn promote(self, other: DType) -> DType {
        use DType::*;
        if self == Object || other == Object {
            return Object;
        }
        if self == String || other == String {
            return String;
        }
        let compound = (self.is_array() || self == Rgb) || (other.is_array() || other == Rgb);
        let a = if self.is_complex() { self } else { self.base() };
        let b = if other.is_complex() { other } else { other.base() };
        let (lo, hi) = if a.ladder() <= b.ladder() { (a, b) } else { (b, a) };
        let needs_double = matches!(lo, Int32 | Int64 | Float64);
        let scalar = match hi {
            Complex64 if needs_double => Complex128,
            Float32 if needs_double => Float64,
            _ => hi,
        };
        if compound {
            if scalar.is_complex() {
                return Complex128;
            }
            return DType::array_of(scalar).unwrap_or(scalar);
        }
        scalar
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i32> for DType {
    type Error = DTypeError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        DType::from_code(code)
    }
}
