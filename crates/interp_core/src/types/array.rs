//! Dense row-major arrays and borrowed views.
//!
//! The interpolation kernel treats every input as a flat buffer plus a shape.
//! Rows are addressed by index through bounds-checked slices rather than
//! pointer offsets.

use super::ShapeError;

/// Number of elements implied by a shape (1 for a scalar).
#[inline]
pub fn element_count(shape: &[usize]) -> usize {
    shape.iter().product()
}

fn check_len(shape: &[usize], len: usize) -> Result<(), ShapeError> {
    let expected = element_count(shape);
    if expected != len {
        return Err(ShapeError::BufferLength {
            shape: shape.to_vec(),
            expected,
            got: len,
        });
    }
    Ok(())
}

/// Owned dense array in row-major order.
///
/// # Example
///
/// ```
/// use interp_core::types::Array;
///
/// let a = Array::new(vec![2, 3], vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert_eq!(a.shape(), &[2, 3]);
/// assert_eq!(a.view().row(1, 3), &[3.0, 4.0, 5.0]);
///
/// assert!(Array::new(vec![2, 3], vec![0.0; 5]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "RawArray<T>", bound(deserialize = "T: serde::Deserialize<'de>"))
)]
pub struct Array<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

/// Unchecked wire form of [`Array`]; validated on conversion.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawArray<T> {
    shape: Vec<usize>,
    data: Vec<T>,
}

#[cfg(feature = "serde")]
impl<T> TryFrom<RawArray<T>> for Array<T> {
    type Error = ShapeError;

    fn try_from(raw: RawArray<T>) -> Result<Self, Self::Error> {
        Array::new(raw.shape, raw.data)
    }
}

impl<T> Array<T> {
    /// Wraps `data` with `shape`, checking that the lengths agree.
    pub fn new(shape: Vec<usize>, data: Vec<T>) -> Result<Self, ShapeError> {
        check_len(&shape, data.len())?;
        Ok(Self { shape, data })
    }

    /// One-dimensional array over `data`.
    pub fn from_vec(data: Vec<T>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Rank-0 array holding a single value.
    pub fn scalar(value: T) -> Self {
        Self {
            shape: Vec::new(),
            data: vec![value],
        }
    }

    /// Array of `shape` filled with `T::default()`.
    pub fn zeros(shape: &[usize]) -> Self
    where
        T: Default + Clone,
    {
        Self {
            shape: shape.to_vec(),
            data: vec![T::default(); element_count(shape)],
        }
    }

    /// Shape of the array.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Flat row-major data.
    #[inline]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Consumes the array, returning the flat data.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Borrows the array read-only.
    #[inline]
    pub fn view(&self) -> ArrayView<'_, T> {
        ArrayView {
            shape: &self.shape,
            data: &self.data,
        }
    }

    /// Borrows the array mutably.
    #[inline]
    pub fn view_mut(&mut self) -> ArrayViewMut<'_, T> {
        ArrayViewMut {
            shape: &self.shape,
            data: &mut self.data,
        }
    }
}

/// Read-only borrowed view of a dense array.
#[derive(Debug, Clone, Copy)]
pub struct ArrayView<'a, T> {
    shape: &'a [usize],
    data: &'a [T],
}

impl<'a, T> ArrayView<'a, T> {
    /// Views `data` with `shape`, checking that the lengths agree.
    pub fn new(shape: &'a [usize], data: &'a [T]) -> Result<Self, ShapeError> {
        check_len(shape, data.len())?;
        Ok(Self { shape, data })
    }

    /// Shape of the view.
    #[inline]
    pub fn shape(&self) -> &'a [usize] {
        self.shape
    }

    /// Number of dimensions.
    #[inline]
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Flat row-major data.
    #[inline]
    pub fn data(&self) -> &'a [T] {
        self.data
    }

    /// Total number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true if the view holds no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row `k` when the data is read as rows of `row_len` elements.
    ///
    /// # Panics
    ///
    /// Panics if the row lies outside the buffer.
    #[inline]
    pub fn row(&self, k: usize, row_len: usize) -> &'a [T] {
        &self.data[k * row_len..(k + 1) * row_len]
    }
}

/// Mutable borrowed view of a dense array.
#[derive(Debug)]
pub struct ArrayViewMut<'a, T> {
    shape: &'a [usize],
    data: &'a mut [T],
}

impl<'a, T> ArrayViewMut<'a, T> {
    /// Views `data` mutably with `shape`, checking that the lengths agree.
    pub fn new(shape: &'a [usize], data: &'a mut [T]) -> Result<Self, ShapeError> {
        check_len(shape, data.len())?;
        Ok(Self { shape, data })
    }

    /// Shape of the view.
    #[inline]
    pub fn shape(&self) -> &'a [usize] {
        self.shape
    }

    /// Flat row-major data.
    #[inline]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut *self.data
    }

    /// Consumes the view, returning the mutable buffer.
    #[inline]
    pub fn into_data(self) -> &'a mut [T] {
        self.data
    }
}
