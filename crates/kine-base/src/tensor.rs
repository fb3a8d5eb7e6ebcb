use std::fmt;

#[derive(Debug, PartialEq)]
pub enum TensorError {
    ShapeOverflow,
    ShapeMismatch { expected: usize, got: usize },
}

impl fmt::Display for TensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorError::ShapeOverflow => write!(f, "shape dimensions overflow when multiplied"),
            TensorError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {expected} elements, got {got}")
            }
        }
    }
}

impl std::error::Error for TensorError {}

/// Dense row-major array with a runtime shape.
#[derive(Clone, PartialEq)]
pub struct Tensor<T> {
    pub shape: Vec<usize>,
    pub data: Vec<T>,
}

impl<T: fmt::Debug> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // detection tensors hold tens of thousands of values
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("len", &self.data.len())
            .finish()
    }
}

fn element_count(shape: &[usize]) -> Result<usize, TensorError> {
    shape.iter().try_fold(1usize, |product, &dim| {
        product.checked_mul(dim).ok_or(TensorError::ShapeOverflow)
    })
}

impl<T> Tensor<T> {
    pub fn new(shape: Vec<usize>, data: Vec<T>) -> Result<Self, TensorError> {
        let expected = element_count(&shape)?;
        if expected != data.len() {
            return Err(TensorError::ShapeMismatch {
                expected,
                got: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// `(rows, cols)` for a rank-2 tensor, `None` for any other rank.
    pub fn dims2(&self) -> Option<(usize, usize)> {
        match self.shape.as_slice() {
            &[rows, cols] => Some((rows, cols)),
            _ => None,
        }
    }

    /// One row of a rank-2 tensor.
    pub fn row(&self, index: usize) -> Option<&[T]> {
        let (rows, cols) = self.dims2()?;
        if index >= rows {
            return None;
        }
        let start = index.checked_mul(cols)?;
        self.data.get(start..start.checked_add(cols)?)
    }
}

impl<T: Copy> Tensor<T> {
    /// Element `[row, col]` of a rank-2 tensor, `None` when out of range.
    pub fn at2(&self, row: usize, col: usize) -> Option<T> {
        let (_, cols) = self.dims2()?;
        if col >= cols {
            return None;
        }
        self.row(row).map(|r| r[col])
    }

    /// Swap the two axes of a rank-2 tensor.
    ///
    /// `None` for other ranks and when `data` does not match `shape`.
    pub fn transposed(&self) -> Option<Self> {
        let (rows, cols) = self.dims2()?;
        if rows.checked_mul(cols) != Some(self.data.len()) {
            return None;
        }
        let mut data = Vec::with_capacity(self.data.len());
        for c in 0..cols {
            for r in 0..rows {
                data.push(self.data[r * cols + c]);
            }
        }
        Some(Self {
            shape: vec![cols, rows],
            data,
        })
    }
}

impl<T: Default + Clone> Tensor<T> {
    pub fn zeros(shape: Vec<usize>) -> Result<Self, TensorError> {
        let count = element_count(&shape)?;
        Ok(Self {
            shape,
            data: vec![T::default(); count],
        })
    }
}
