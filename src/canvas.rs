use std::ops::DerefMut;

/// Pixel layout of a canvas: its size and how a pixel maps into storage.
pub trait Meta {
    fn new(width: usize, height: usize) -> Self;

    fn size(&self) -> (usize, usize);

    fn index(&self, p: (usize, usize)) -> usize;

    /** storage index of a signed pixel position, or None if it lies off the canvas **/
    fn clip(&self, x: isize, y: isize) -> Option<usize> {
        let (width, height) = self.size();
        if x >= 0 && (x as usize) < width && y >= 0 && (y as usize) < height {
            Some(self.index((x as usize, y as usize)))
        } else {
            None
        }
    }
}

/// Pixel storage.
pub trait Data {
    type Item;

    fn get(&self, index: usize) -> &Self::Item;
    fn get_mut(&mut self, index: usize) -> &mut Self::Item;
}

pub trait Canvas {
    type Data: Data;
    type Meta: Meta;

    fn run<F, O>(&self, f: F) -> O
        where F: FnOnce(&Self::Meta, &Self::Data) -> O;

    fn run_mut<F, O>(&mut self, f: F) -> O
        where F: FnOnce(&Self::Meta, &mut Self::Data) -> O;

    fn new(meta: Self::Meta, data: Self::Data) -> Self;

    fn size(&self) -> (usize, usize) {
        self.run(|meta, _| meta.size())
    }
}

pub trait Initial {
    fn initial(width: usize, height: usize) -> Self;
}

impl<A, T> Data for A where A: DerefMut<Target=[T]> {
    type Item = T;

    fn get(&self, index: usize) -> &T {
        &self[index]
    }
    fn get_mut(&mut self, index: usize) -> &mut T {
        &mut self[index]
    }
}

impl<T> Initial for Vec<T> where T: Default + Clone {
    fn initial(width: usize, height: usize) -> Self {
        vec![T::default(); width * height]
    }
}
