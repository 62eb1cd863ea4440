use thiserror::Error;

/// An error type for tensor operations.
#[derive(Error, Debug, PartialEq)]
pub enum TensorError {
    /// Tensor shape does not match the provided data.
    ///
    /// The product of the shape extents must equal the number of elements exactly.
    #[error("Shape mismatch: expected {expected} elements for shape, but got {actual} elements in data")]
    InvalidShape {
        /// Expected number of elements based on shape
        expected: usize,
        /// Actual number of elements in the data
        actual: usize,
    },

    /// Index exceeds tensor bounds.
    #[error("Index {index} out of bounds for dimension of size {size}")]
    IndexOutOfBounds {
        /// The invalid index that was attempted
        index: usize,
        /// The size of the dimension being indexed
        size: usize,
    },
}

impl TensorError {
    /// Creates an InvalidShape error.
    pub fn invalid_shape(expected: usize, actual: usize) -> Self {
        Self::InvalidShape { expected, actual }
    }

    /// Creates an IndexOutOfBounds error.
    pub fn index_out_of_bounds(index: usize, size: usize) -> Self {
        Self::IndexOutOfBounds { index, size }
    }
}

/// Computes the strides for a row-major (C-contiguous) tensor layout.
///
/// The rightmost dimension has stride 1 and each dimension's stride is the product
/// of all extents to its right.
///
/// # Examples
///
/// ```rust
/// use vexel_tensor::get_strides_from_shape;
///
/// assert_eq!(get_strides_from_shape([2, 3]), [3, 1]);
/// assert_eq!(get_strides_from_shape([2, 3, 4]), [12, 4, 1]);
/// ```
pub fn get_strides_from_shape<const N: usize>(shape: [usize; N]) -> [usize; N] {
    let mut strides: [usize; N] = [0; N];
    let mut stride = 1;
    for i in (0..shape.len()).rev() {
        strides[i] = stride;
        stride *= shape[i];
    }
    strides
}

/// A multi-dimensional array (tensor) with owned data.
///
/// The data is always stored contiguously in row-major order, so the flat offset of
/// a coordinate is the dot product of the coordinate with [`Tensor::strides`].
///
/// # Type Parameters
///
/// * `T` - The element type stored in the tensor
/// * `N` - The number of dimensions
///
/// # Examples
///
/// ```rust
/// use vexel_tensor::Tensor2;
///
/// let t = Tensor2::<u8>::from_shape_vec([2, 2], vec![1, 2, 3, 4]).unwrap();
/// assert_eq!(t.shape, [2, 2]);
/// assert_eq!(t.strides, [2, 1]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor<T, const N: usize> {
    /// The storage of the tensor.
    pub(crate) storage: Vec<T>,
    /// The shape of the tensor.
    pub shape: [usize; N],
    /// The strides of the tensor data in memory.
    pub strides: [usize; N],
}

impl<T, const N: usize> Tensor<T, N> {
    /// Creates a new `Tensor` with the given shape and data.
    ///
    /// # Errors
    ///
    /// If the number of elements in the data does not match the shape of the tensor, an error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use vexel_tensor::Tensor2;
    ///
    /// let t = Tensor2::<u8>::from_shape_vec([2, 2], vec![1, 2, 3, 4]).unwrap();
    /// assert_eq!(t.as_slice(), &[1, 2, 3, 4]);
    ///
    /// assert!(Tensor2::<u8>::from_shape_vec([2, 3], vec![1, 2, 3, 4]).is_err());
    /// ```
    pub fn from_shape_vec(shape: [usize; N], data: Vec<T>) -> Result<Self, TensorError> {
        let numel = shape.iter().product::<usize>();
        if numel != data.len() {
            return Err(TensorError::invalid_shape(numel, data.len()));
        }
        Ok(Self {
            storage: data,
            shape,
            strides: get_strides_from_shape(shape),
        })
    }

    /// Creates a new `Tensor` with the given shape and slice of data.
    ///
    /// # Errors
    ///
    /// If the number of elements in the data does not match the shape of the tensor, an error is returned.
    pub fn from_shape_slice(shape: [usize; N], data: &[T]) -> Result<Self, TensorError>
    where
        T: Clone,
    {
        Self::from_shape_vec(shape, data.to_vec())
    }

    /// Creates a new `Tensor` with the given shape filled with `value`.
    ///
    /// # Example
    ///
    /// ```
    /// use vexel_tensor::{Tensor1, Tensor3};
    ///
    /// let t = Tensor1::<u8>::from_shape_val([4], 0).unwrap();
    /// assert_eq!(t.as_slice(), &[0, 0, 0, 0]);
    ///
    /// let t = Tensor3::<u8>::from_shape_val([2, 1, 3], 2).unwrap();
    /// assert_eq!(t.numel(), 6);
    /// ```
    pub fn from_shape_val(shape: [usize; N], value: T) -> Result<Self, TensorError>
    where
        T: Clone,
    {
        let numel = shape.iter().product::<usize>();
        Self::from_shape_vec(shape, vec![value; numel])
    }

    /// Creates a new `Tensor` by evaluating `f` at every coordinate in row-major order.
    ///
    /// # Example
    ///
    /// ```
    /// use vexel_tensor::Tensor2;
    ///
    /// let t = Tensor2::<u8>::from_shape_fn([2, 2], |[i, j]| (i * 2 + j) as u8).unwrap();
    /// assert_eq!(t.as_slice(), &[0, 1, 2, 3]);
    /// ```
    pub fn from_shape_fn<F>(shape: [usize; N], f: F) -> Result<Self, TensorError>
    where
        F: Fn([usize; N]) -> T,
    {
        let numel = shape.iter().product::<usize>();
        let data: Vec<T> = (0..numel)
            .map(|i| {
                let mut index = [0; N];
                let mut j = i;
                for k in (0..N).rev() {
                    index[k] = j % shape[k];
                    j /= shape[k];
                }
                f(index)
            })
            .collect();
        Self::from_shape_vec(shape, data)
    }

    /// Creates a new tensor filled with zeros.
    pub fn zeros(shape: [usize; N]) -> Result<Self, TensorError>
    where
        T: Clone + num_traits::Zero,
    {
        Self::from_shape_val(shape, T::zero())
    }

    /// Returns the tensor data as a slice in row-major order.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.storage
    }

    /// Returns the tensor data as a mutable slice in row-major order.
    #[inline]
    pub fn as_slice_mut(&mut self) -> &mut [T] {
        &mut self.storage
    }

    /// Consumes the tensor and returns the underlying vector.
    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.storage
    }

    /// Returns an iterator over the elements of the tensor in row-major order.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.storage.iter()
    }

    /// Returns the number of elements in the tensor.
    #[inline]
    pub fn numel(&self) -> usize {
        self.storage.len()
    }

    /// Returns true if any extent of the tensor is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Get the offset of the element at the given index, or `None` if any coordinate is out of bounds.
    pub fn get_iter_offset(&self, index: [usize; N]) -> Option<usize> {
        let mut offset = 0;
        for ((&idx, dim_size), stride) in index.iter().zip(self.shape).zip(self.strides) {
            if idx >= dim_size {
                return None;
            }
            offset += idx * stride;
        }
        Some(offset)
    }

    /// Get the offset of the element at the given index without checking dim sizes.
    pub fn get_iter_offset_unchecked(&self, index: [usize; N]) -> usize {
        index
            .iter()
            .zip(self.strides)
            .map(|(&idx, stride)| idx * stride)
            .sum()
    }

    /// Get the coordinate of the element at the given flat offset without bounds checks.
    ///
    /// The reverse of [`Tensor::get_iter_offset_unchecked`].
    pub fn get_index_unchecked(&self, offset: usize) -> [usize; N] {
        let mut idx = [0; N];
        let mut rem = offset;
        for (dim_i, &s) in self.strides.iter().enumerate() {
            if s == 0 {
                continue;
            }
            idx[dim_i] = rem / s;
            rem %= s;
        }
        idx
    }

    /// Get the coordinate of the element at the given flat offset.
    ///
    /// # Errors
    ///
    /// If the offset is out of bounds (>= numel), an error is returned.
    ///
    /// # Example
    ///
    /// ```
    /// use vexel_tensor::Tensor3;
    ///
    /// let t = Tensor3::<u8>::zeros([2, 3, 4]).unwrap();
    /// assert_eq!(t.get_index(17).unwrap(), [1, 1, 1]);
    /// assert!(t.get_index(24).is_err());
    /// ```
    pub fn get_index(&self, offset: usize) -> Result<[usize; N], TensorError> {
        let numel = self.numel();
        if offset >= numel {
            return Err(TensorError::index_out_of_bounds(offset, numel));
        }
        Ok(self.get_index_unchecked(offset))
    }

    /// Get the element at the given index without checking if the index is out of bounds.
    ///
    /// # Panics
    ///
    /// Panics if the computed offset lies outside the storage.
    pub fn get_unchecked(&self, index: [usize; N]) -> &T {
        &self.storage[self.get_iter_offset_unchecked(index)]
    }

    /// Get the element at the given index, checking if the index is out of bounds.
    ///
    /// # Example
    ///
    /// ```
    /// use vexel_tensor::Tensor2;
    ///
    /// let t = Tensor2::<u8>::from_shape_vec([2, 2], vec![1, 2, 3, 4]).unwrap();
    /// assert_eq!(t.get([1, 0]), Some(&3));
    /// assert!(t.get([0, 2]).is_none());
    /// ```
    pub fn get(&self, index: [usize; N]) -> Option<&T> {
        self.get_iter_offset(index)
            .and_then(|i| self.storage.get(i))
    }

    /// Get a mutable reference to the element at the given index.
    pub fn get_mut(&mut self, index: [usize; N]) -> Option<&mut T> {
        self.get_iter_offset(index)
            .and_then(move |i| self.storage.get_mut(i))
    }

    /// Apply a function to each element of the tensor, producing a tensor of the same shape.
    ///
    /// # Example
    ///
    /// ```
    /// use vexel_tensor::Tensor1;
    ///
    /// let t = Tensor1::<u8>::from_shape_vec([4], vec![1, 2, 3, 4]).unwrap();
    /// let t2 = t.map(|x| *x as f32 * 0.5);
    /// assert_eq!(t2.as_slice(), &[0.5, 1.0, 1.5, 2.0]);
    /// ```
    pub fn map<U, F>(&self, f: F) -> Tensor<U, N>
    where
        F: Fn(&T) -> U,
    {
        Tensor {
            storage: self.storage.iter().map(f).collect(),
            shape: self.shape,
            strides: self.strides,
        }
    }

    /// Returns true if both tensors have the same shape.
    #[inline]
    pub fn same_shape<U>(&self, other: &Tensor<U, N>) -> bool {
        self.shape == other.shape
    }
}

#[cfg(test)]
mod tests {
    use crate::{Tensor, Tensor1, Tensor2, Tensor3, TensorError};

    #[test]
    fn constructor_2d() -> Result<(), TensorError> {
        let t = Tensor2::<u8>::from_shape_vec([1, 2], vec![1, 2])?;
        assert_eq!(t.shape, [1, 2]);
        assert_eq!(t.as_slice(), &[1, 2]);
        assert_eq!(t.strides, [2, 1]);
        assert_eq!(t.numel(), 2);
        Ok(())
    }

    #[test]
    fn constructor_invalid_shape() {
        let res = Tensor2::<u8>::from_shape_vec([3, 3], vec![0; 8]);
        assert_eq!(res, Err(TensorError::invalid_shape(9, 8)));
    }

    #[test]
    fn empty_tensor() -> Result<(), TensorError> {
        let t = Tensor3::<u16>::zeros([0, 4, 4])?;
        assert!(t.is_empty());
        assert_eq!(t.numel(), 0);
        assert!(t.get([0, 0, 0]).is_none());
        Ok(())
    }

    #[test]
    fn get_3d() -> Result<(), TensorError> {
        let t = Tensor3::<u8>::from_shape_vec([2, 1, 3], vec![1, 2, 3, 4, 5, 6])?;
        assert_eq!(t.get([0, 0, 2]), Some(&3));
        assert_eq!(t.get([1, 0, 0]), Some(&4));
        assert_eq!(t.get([1, 0, 2]), Some(&6));
        assert!(t.get([2, 0, 0]).is_none());
        assert!(t.get([0, 1, 0]).is_none());
        assert!(t.get([0, 0, 3]).is_none());
        Ok(())
    }

    #[test]
    fn get_mut_writes_through() -> Result<(), TensorError> {
        let mut t = Tensor2::<i32>::zeros([2, 3])?;
        if let Some(v) = t.get_mut([1, 2]) {
            *v = 7;
        }
        assert_eq!(t.as_slice(), &[0, 0, 0, 0, 0, 7]);
        assert!(t.get_mut([2, 0]).is_none());
        Ok(())
    }

    #[test]
    fn offset_index_inverse() -> Result<(), TensorError> {
        let t = Tensor3::<u8>::zeros([3, 4, 5])?;
        for offset in 0..t.numel() {
            let index = t.get_index(offset)?;
            assert_eq!(t.get_iter_offset(index), Some(offset));
        }
        Ok(())
    }

    #[test]
    fn from_shape_fn_row_major() -> Result<(), TensorError> {
        let t = Tensor::<usize, 2>::from_shape_fn([2, 3], |[r, c]| r * 10 + c)?;
        assert_eq!(t.as_slice(), &[0, 1, 2, 10, 11, 12]);
        Ok(())
    }

    #[test]
    fn map_keeps_shape() -> Result<(), TensorError> {
        let t = Tensor1::<u8>::from_shape_vec([3], vec![0, 1, 2])?;
        let b = t.map(|&v| v != 0);
        assert_eq!(b.shape, [3]);
        assert_eq!(b.as_slice(), &[false, true, true]);
        assert!(t.same_shape(&b));
        Ok(())
    }
}
