use std::iter::{self, FusedIterator, Once};

use crate::error::{ArcioError, Result};

/// Grows or shrinks `list` to `len` without reallocating.
///
/// New slots are filled with clones of `fill`. Asking for more than the
/// current capacity is an error and leaves `list` alone: capacity is a hard
/// ceiling here, never grown. Call `reserve` first to raise it.
pub fn resize_fixed<T: Clone>(list: &mut Vec<T>, len: usize, fill: T) -> Result<()> {
    if len > list.capacity() {
        return Err(ArcioError::invalid(format!(
            "length {} exceeds fixed capacity {}",
            len,
            list.capacity()
        )));
    }
    list.resize(len, fill);
    Ok(())
}

pub fn single<T>(item: T) -> Once<T> {
    iter::once(item)
}

/// Turns a "read the next item" callback into an iterator.
///
/// `Ok(None)` ends the iteration. An error is yielded once and then the
/// iterator is exhausted, a half read stream has no sane next item.
pub struct ReadIter<F> {
    next: F,
    done: bool,
}

impl<F> ReadIter<F> {
    pub fn new(next: F) -> Self {
        ReadIter { next, done: false }
    }
}

impl<T, E, F> Iterator for ReadIter<F>
where
    F: FnMut() -> std::result::Result<Option<T>, E>,
{
    type Item = std::result::Result<T, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match (self.next)() {
            Ok(Some(x)) => Some(Ok(x)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl<T, E, F> FusedIterator for ReadIter<F> where F: FnMut() -> std::result::Result<Option<T>, E> {}

#[cfg(test)]
mod test_resize_fixed {
    use super::*;

    #[test]
    fn grow_within_capacity() {
        let mut list: Vec<u8> = Vec::with_capacity(8);
        list.push(1);
        let cap = list.capacity();

        resize_fixed(&mut list, 5, 0).unwrap();
        assert_eq!(list, vec![1, 0, 0, 0, 0]);
        assert_eq!(list.capacity(), cap);
    }

    #[test]
    fn shrink() {
        let mut list = vec![1, 2, 3, 4];
        resize_fixed(&mut list, 2, 9).unwrap();
        assert_eq!(list, vec![1, 2]);
    }

    #[test]
    fn past_capacity() {
        let mut list: Vec<u8> = Vec::with_capacity(2);
        list.push(7);
        let cap = list.capacity();

        let res = resize_fixed(&mut list, cap + 1, 0);
        assert!(matches!(res, Err(ArcioError::InvalidArgument(_))));
        assert_eq!(list, vec![7]);
        assert_eq!(list.capacity(), cap);
    }

    #[test]
    fn reserve_then_grow() {
        let mut list: Vec<u8> = Vec::with_capacity(1);
        let want = list.capacity() + 4;
        list.reserve(want);

        resize_fixed(&mut list, want, 3).unwrap();
        assert_eq!(list.len(), want);
    }
}
