use sciset_view::{
    DType, Dataset, DatasetError, DatasetIterator, Element, Result, Slice, Value,
};

/// A dataset whose element kind is chosen at runtime.
///
/// One variant per buffer element type; compound kinds (complex, RGB,
/// arrays) live in the variant of their base with a wider item.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyDataset {
    Bool(Dataset<bool>),
    Int8(Dataset<i8>),
    Int16(Dataset<i16>),
    Int32(Dataset<i32>),
    Int64(Dataset<i64>),
    Float32(Dataset<f32>),
    Float64(Dataset<f64>),
    String(Dataset<String>),
}

/// Run `$body` with `$d` bound to the inner dataset, whatever its type.
macro_rules! dispatch {
    ($value:expr, $d:ident => $body:expr) => {
        match $value {
            AnyDataset::Bool($d) => $body,
            AnyDataset::Int8($d) => $body,
            AnyDataset::Int16($d) => $body,
            AnyDataset::Int32($d) => $body,
            AnyDataset::Int64($d) => $body,
            AnyDataset::Float32($d) => $body,
            AnyDataset::Float64($d) => $body,
            AnyDataset::String($d) => $body,
        }
    };
}

/// Like [`dispatch!`] but rewraps the resulting dataset in the same variant.
macro_rules! map_same {
    ($value:expr, $d:ident => $body:expr) => {
        match $value {
            AnyDataset::Bool($d) => AnyDataset::Bool($body),
            AnyDataset::Int8($d) => AnyDataset::Int8($body),
            AnyDataset::Int16($d) => AnyDataset::Int16($body),
            AnyDataset::Int32($d) => AnyDataset::Int32($body),
            AnyDataset::Int64($d) => AnyDataset::Int64($body),
            AnyDataset::Float32($d) => AnyDataset::Float32($body),
            AnyDataset::Float64($d) => AnyDataset::Float64($body),
            AnyDataset::String($d) => AnyDataset::String($body),
        }
    };
}

/// Run a generic expression with `$t` bound to the buffer type of `$dtype`.
macro_rules! with_base {
    ($dtype:expr, $t:ident => $body:expr) => {
        match $dtype.base() {
            DType::Bool => {
                type $t = bool;
                $body
            }
            DType::Int8 => {
                type $t = i8;
                $body
            }
            DType::Int16 => {
                type $t = i16;
                $body
            }
            DType::Int32 => {
                type $t = i32;
                $body
            }
            DType::Int64 => {
                type $t = i64;
                $body
            }
            DType::Float32 => {
                type $t = f32;
                $body
            }
            DType::Float64 => {
                type $t = f64;
                $body
            }
            DType::String => {
                type $t = String;
                $body
            }
            other => Err(DatasetError::Unsupported(format!(
                "no dataset can store {other} values"
            ))),
        }
    };
}

/// Element types that have an [`AnyDataset`] variant.
pub trait AnyElement: Element {
    fn wrap(d: Dataset<Self>) -> AnyDataset;

    fn peek(any: &AnyDataset) -> Option<&Dataset<Self>>;

    fn peek_mut(any: &mut AnyDataset) -> Option<&mut Dataset<Self>>;
}

macro_rules! impl_any_element {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl AnyElement for $t {
                fn wrap(d: Dataset<Self>) -> AnyDataset {
                    AnyDataset::$variant(d)
                }

                fn peek(any: &AnyDataset) -> Option<&Dataset<Self>> {
                    match any {
                        AnyDataset::$variant(d) => Some(d),
                        _ => None,
                    }
                }

                fn peek_mut(any: &mut AnyDataset) -> Option<&mut Dataset<Self>> {
                    match any {
                        AnyDataset::$variant(d) => Some(d),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_any_element!(
    bool => Bool,
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f32 => Float32,
    f64 => Float64,
    String => String,
);

impl<T: AnyElement> From<Dataset<T>> for AnyDataset {
    fn from(d: Dataset<T>) -> Self {
        T::wrap(d)
    }
}

impl AnyDataset {
    /// Zero-filled dataset of kind `dtype`, with the item width the kind
    /// implies (one for generic arrays).
    pub fn zeros(dtype: DType, shape: &[usize]) -> Result<Self> {
        Self::zeros_compound(dtype, dtype.fixed_item_size().unwrap_or(1), shape)
    }

    /// Zero-filled dataset of kind `dtype` with `isize`-slot items.
    pub fn zeros_compound(dtype: DType, isize: usize, shape: &[usize]) -> Result<Self> {
        with_base!(dtype, T => Ok(Dataset::<T>::zeros_of(dtype, isize, shape)?.into()))
    }

    /// Convert to kind `dtype`.
    ///
    /// The item width is kept unless `dtype` fixes another one (e.g. a
    /// scalar dataset cast to a complex kind), in which case items are
    /// padded or truncated as by [`cast_compound`](Self::cast_compound).
    pub fn cast(&self, dtype: DType) -> Result<Self> {
        let isize = dtype
            .fixed_item_size()
            .unwrap_or_else(|| self.elements_per_item());
        if isize != self.elements_per_item() {
            return self.cast_compound(false, dtype, isize);
        }
        with_base!(dtype, T => {
            let out = dispatch!(self, d => d.cast::<T>())?;
            let out = if out.dtype() == dtype { out } else { out.with_dtype(dtype)? };
            Ok(out.into())
        })
    }

    /// Convert to kind `dtype` with `isize`-slot items; see
    /// [`Dataset::compound_from`].
    pub fn cast_compound(&self, repeat: bool, dtype: DType, isize: usize) -> Result<Self> {
        with_base!(dtype, T => {
            let out = dispatch!(self, d => Dataset::<T>::compound_from(d, repeat, isize))?;
            let out = if out.dtype() == dtype { out } else { out.with_dtype(dtype)? };
            Ok(out.into())
        })
    }

    /// Borrow the inner dataset if its element type is `T`.
    pub fn downcast_ref<T: AnyElement>(&self) -> Option<&Dataset<T>> {
        T::peek(self)
    }

    pub fn downcast_mut<T: AnyElement>(&mut self) -> Option<&mut Dataset<T>> {
        T::peek_mut(self)
    }

    pub fn dtype(&self) -> DType {
        dispatch!(self, d => d.dtype())
    }

    pub fn name(&self) -> &str {
        dispatch!(self, d => d.name())
    }

    pub fn shape(&self) -> &[usize] {
        dispatch!(self, d => d.shape())
    }

    pub fn size(&self) -> usize {
        dispatch!(self, d => d.size())
    }

    pub fn rank(&self) -> usize {
        dispatch!(self, d => d.rank())
    }

    pub fn elements_per_item(&self) -> usize {
        dispatch!(self, d => d.elements_per_item())
    }

    pub fn is_view(&self) -> bool {
        dispatch!(self, d => d.is_view())
    }

    pub fn iterator(&self, with_position: bool) -> DatasetIterator {
        dispatch!(self, d => d.iterator(with_position))
    }

    pub fn get_double(&self, pos: &[usize]) -> Result<f64> {
        dispatch!(self, d => d.get_double(pos))
    }

    pub fn get_long(&self, pos: &[usize]) -> Result<i64> {
        dispatch!(self, d => d.get_long(pos))
    }

    /// Item at an absolute index; see [`Dataset::get_object_abs`].
    pub fn get_object_abs(&self, index: usize) -> Result<Value> {
        dispatch!(self, d => d.get_object_abs(index))
    }

    pub fn set(&mut self, pos: &[usize], value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        dispatch!(self, d => d.set(pos, value))
    }

    pub fn fill(&mut self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        dispatch!(self, d => d.fill(value))
    }

    pub fn get_view(&self) -> Self {
        map_same!(self, d => d.get_view())
    }

    pub fn get_slice_view(&self, slices: &[Option<Slice>]) -> Result<Self> {
        Ok(map_same!(self, d => d.get_slice_view(slices)?))
    }

    pub fn get_slice(&self, slices: &[Option<Slice>]) -> Result<Self> {
        Ok(map_same!(self, d => d.get_slice(slices)?))
    }

    pub fn hash_code(&self) -> u64 {
        dispatch!(self, d => d.hash_code())
    }
}

/// Kind able to hold the values of every input, `None` for no inputs.
pub fn promoted_dtype(inputs: &[&AnyDataset]) -> Option<DType> {
    inputs.iter().map(|d| d.dtype()).reduce(DType::promote)
}
