use std::marker::PhantomData;

use super::{AlignedRead, ReadsFilter};

/// Conjunction of two read filters.
///
/// `head` is asked first; reads it rejects never reach `tail`, so the cheaper check belongs in front.
/// Chains nest: `Chain::new(a, Chain::new(b, c))`.
#[derive(Copy, Clone, Debug)]
pub struct Chain<R, Head, Tail> {
    head: Head,
    tail: Tail,
    read: PhantomData<fn(&R)>,
}

impl<R: AlignedRead, Head: ReadsFilter<R>, Tail: ReadsFilter<R>> Chain<R, Head, Tail> {
    pub fn new(head: Head, tail: Tail) -> Self {
        Self { head, tail, read: PhantomData }
    }
}

impl<R: AlignedRead, Head: ReadsFilter<R>, Tail: ReadsFilter<R>> ReadsFilter<R> for Chain<R, Head, Tail> {
    #[inline]
    fn is_read_ok(&self, record: &R) -> bool {
        self.head.is_read_ok(record) && self.tail.is_read_ok(record)
    }
}
