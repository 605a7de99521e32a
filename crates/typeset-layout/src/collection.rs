//! Read-only indexed views
//!
//! Glyph runs expose slices of their source run's arrays re-based to their
//! own coordinates. Instead of copying, they hand out views built from
//! three pieces: a plain slice, a [`Window`] that shifts indices into a
//! sub-range, and a [`Mapped`] view that transforms every item.

use std::ops::Range;

/// Something with a length and items addressable by index
pub trait Collection {
    type Item;

    /// Number of items
    fn len(&self) -> usize;

    /// Item at `index`; panics when `index >= len()`
    fn item(&self, index: usize) -> Self::Item;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate all items in order
    fn items(&self) -> Items<'_, Self>
    where
        Self: Sized,
    {
        Items {
            collection: self,
            index: 0,
        }
    }

    /// Collect all items
    fn to_vec(&self) -> Vec<Self::Item>
    where
        Self: Sized,
    {
        self.items().collect()
    }

    /// View of the items in `range`
    fn window(self, range: Range<usize>) -> Window<Self>
    where
        Self: Sized,
    {
        Window::new(self, range)
    }

    /// View that passes every item through `transform`
    fn mapped<F, U>(self, transform: F) -> Mapped<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Item) -> U,
    {
        Mapped {
            base: self,
            transform,
        }
    }
}

impl<T: Copy> Collection for &[T] {
    type Item = T;

    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    fn item(&self, index: usize) -> T {
        self[index]
    }
}

/// Iterator over a [`Collection`]
pub struct Items<'a, C> {
    collection: &'a C,
    index: usize,
}

impl<C: Collection> Iterator for Items<'_, C> {
    type Item = C::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.collection.len() {
            return None;
        }
        let item = self.collection.item(self.index);
        self.index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.collection.len().saturating_sub(self.index);
        (remaining, Some(remaining))
    }
}

impl<C: Collection> ExactSizeIterator for Items<'_, C> {}

/// Sub-range of another collection, indexed from zero
#[derive(Debug, Clone)]
pub struct Window<C> {
    base: C,
    start: usize,
    len: usize,
}

impl<C: Collection> Window<C> {
    pub fn new(base: C, range: Range<usize>) -> Self {
        assert!(
            range.start <= range.end && range.end <= base.len(),
            "window {}..{} out of bounds for collection of {} items",
            range.start,
            range.end,
            base.len()
        );
        Self {
            base,
            start: range.start,
            len: range.len(),
        }
    }
}

impl<C: Collection> Collection for Window<C> {
    type Item = C::Item;

    fn len(&self) -> usize {
        self.len
    }

    fn item(&self, index: usize) -> Self::Item {
        assert!(index < self.len, "index {index} out of bounds for window of {}", self.len);
        self.base.item(self.start + index)
    }
}

/// Item-by-item transformation of another collection
#[derive(Clone)]
pub struct Mapped<C, F> {
    base: C,
    transform: F,
}

impl<C, F, U> Collection for Mapped<C, F>
where
    C: Collection,
    F: Fn(C::Item) -> U,
{
    type Item = U;

    fn len(&self) -> usize {
        self.base.len()
    }

    fn item(&self, index: usize) -> U {
        (self.transform)(self.base.item(index))
    }
}
