/// C-ordered (row-major) layout of an N-dimensional array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowMajor {
    shape: Vec<usize>,
    strides: Vec<usize>,
}

impl RowMajor {
    pub fn new(shape: &[usize]) -> Self {
        let mut strides = vec![1; shape.len()];
        for idx in (0..shape.len().saturating_sub(1)).rev() {
            strides[idx] = strides[idx + 1] * shape[idx + 1];
        }
        Self {
            shape: shape.to_vec(),
            strides,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn numel(&self) -> usize {
        self.shape.iter().product()
    }

    pub fn linear_idx(&self, index: &[usize]) -> Option<usize> {
        let mut total = 0;
        for ((s, st), i) in self.shape.iter().zip(self.strides.iter()).zip(index.iter()) {
            if i >= s {
                return None;
            }
            total += i * st;
        }
        Some(total)
    }
}

/// Owned N-dimensional buffer with a [RowMajor] layout.
#[derive(Debug, Clone, PartialEq)]
pub struct NdBuffer<T> {
    data: Vec<T>,
    layout: RowMajor,
}

impl<T: Copy> NdBuffer<T> {
    /// Caller guarantees `data.len()` matches the layout.
    pub fn new_unchecked(data: Vec<T>, layout: RowMajor) -> Self {
        debug_assert_eq!(data.len(), layout.numel());
        Self { data, layout }
    }

    pub fn layout(&self) -> &RowMajor {
        &self.layout
    }

    pub fn shape(&self) -> &[usize] {
        self.layout.shape()
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Apply `f` to every 1D line of the array running along `axis`.
    ///
    /// Lines are gathered into a scratch buffer, so `f` always sees contiguous data.
    pub fn for_each_line_mut<Func: FnMut(&mut [T])>(&mut self, axis: usize, mut f: Func) {
        let len = self.layout.shape[axis];
        if len == 0 || self.data.is_empty() {
            return;
        }
        let stride = self.layout.strides[axis];
        let block = stride * len;
        let mut scratch = Vec::with_capacity(len);

        for block_start in (0..self.data.len()).step_by(block) {
            for offset in 0..stride {
                let start = block_start + offset;
                scratch.clear();
                scratch.extend((0..len).map(|i| self.data[start + i * stride]));
                f(&mut scratch);
                for (i, v) in scratch.iter().enumerate() {
                    self.data[start + i * stride] = *v;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strides() {
        let layout = RowMajor::new(&[2, 3, 4]);
        assert_eq!(layout.strides(), &[12, 4, 1]);
        assert_eq!(layout.numel(), 24);
        assert_eq!(layout.linear_idx(&[1, 2, 3]), Some(23));
        assert_eq!(layout.linear_idx(&[0, 3, 0]), None);
    }

    #[test]
    fn test_lines() {
        let layout = RowMajor::new(&[2, 3]);
        let mut arr = NdBuffer::new_unchecked(vec![0, 1, 2, 3, 4, 5], layout);

        let mut seen = vec![];
        arr.for_each_line_mut(0, |line| seen.push(line.to_vec()));
        assert_eq!(seen, vec![vec![0, 3], vec![1, 4], vec![2, 5]]);

        arr.for_each_line_mut(1, |line| line.reverse());
        assert_eq!(arr.data(), &[2, 1, 0, 5, 4, 3]);
    }
}
