use std::ops::{Index, IndexMut};
use crate::canvas::{Canvas, Data, Meta, Initial};

/// Row-major pixel layout, origin at the top-left.
#[derive(Copy, Clone, Debug)]
pub struct RowMajor {
    width:  usize,
    height: usize
}

impl Meta for RowMajor {
    fn new(width: usize, height: usize) -> Self {
        RowMajor {
            width:  width,
            height: height
        }
    }

    #[inline(always)]
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    #[inline(always)]
    fn index(&self, p: (usize, usize)) -> usize {
        p.0 + p.1 * self.width
    }
}

/// A canvas backed by any `Data` store and laid out by `M`.
pub struct Array<D, M> {
    pub data:   D,
    pub meta:   M
}

/// Accumulation buffer for traced intensities.
pub type Density = Array<Vec<f32>, RowMajor>;

impl<D, M> Canvas for Array<D, M> where D: Data, M: Meta
{
    type Data = D;
    type Meta = M;

    #[inline(always)]
    fn run<F, O>(&self, f: F) -> O
        where F: FnOnce(&M, &D) -> O
    {
        f(&self.meta, &self.data)
    }

    fn run_mut<F, O>(&mut self, f: F) -> O
        where F: FnOnce(&M, &mut D) -> O
    {
        f(&self.meta, &mut self.data)
    }

    fn new(meta: M, data: D) -> Self {
        Array {
            data:   data,
            meta:   meta
        }
    }
}

impl<T: Default + Clone> Array<Vec<T>, RowMajor> {
    pub fn zeros(width: usize, height: usize) -> Self {
        Array::new(RowMajor::new(width, height), Vec::initial(width, height))
    }
}

impl<D, M> Index<(usize, usize)> for Array<D, M> where D: Data, M: Meta
{
    type Output = D::Item;

    #[inline(always)]
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        let index = self.meta.index(idx);
        self.data.get(index)
    }
}
impl<D, M> IndexMut<(usize, usize)> for Array<D, M> where D: Data, M: Meta
{
    #[inline(always)]
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut Self::Output {
        let index = self.meta.index(idx);
        self.data.get_mut(index)
    }
}

#[test]
fn test_row_major() {
    let mut a: Density = Array::zeros(4, 3);
    assert_eq!(a.size(), (4, 3));
    a[(3, 2)] = 2.5;
    a[(1, 0)] = 1.0;
    assert_eq!(a.data[11], 2.5);
    assert_eq!(a.data[1], 1.0);
    assert_eq!(a.meta.clip(4, 0), None);
    assert_eq!(a.meta.clip(-1, 0), None);
    assert_eq!(a.meta.clip(3, 2), Some(11));
}
