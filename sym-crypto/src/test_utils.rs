//! Proptest strategies shared by the property tests.
use core::fmt;
use core::ops;
use proptest::arbitrary::{any, Arbitrary};
use proptest::{array, prop_oneof};
use proptest::collection::vec;
use proptest::num::u8::Any;
use proptest::strategy::{BoxedStrategy, Strategy};
use crate::aes::Key;

/// A stack allocated byte list of at most `C` bytes.
#[derive(Clone, Copy)]
pub struct BoundList<const C: usize> {
    inner: [u8; C],
    len: usize
}

impl<const C: usize> fmt::Debug for BoundList<C> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut dbg = f.debug_struct("BoundList");
        dbg.field("len", &self.len);

        if C <= 32 {
            dbg.field("inner", &self.as_slice());
        }

        dbg.finish()
    }
}

impl<const C: usize> BoundList<C> {
    #[track_caller]
    pub fn new_from_slice(slice: &[u8]) -> Self {
        assert!(slice.len() <= C, "slice larger than the list capacity");
        let mut inner = [0u8; C];
        inner[..slice.len()].copy_from_slice(slice);
        Self { inner, len: slice.len() }
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.inner[..self.len]
    }
}

impl<const C: usize> ops::Deref for BoundList<C> {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<const C: usize> Arbitrary for BoundList<C> {
    type Parameters = ();

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        (0..=C, array::uniform::<Any, C>(any::<u8>()))
            .prop_map(|(len, inner)| BoundList { inner, len })
            .boxed()
    }

    type Strategy = BoxedStrategy<Self>;
}

/// Up to `C` values of `T`, used to drive arbitrary sequences of updates.
#[derive(Clone)]
pub struct AnyList<const C: usize, T> {
    inner: Vec<T>
}

impl<const C: usize, T: fmt::Debug> fmt::Debug for AnyList<C, T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("AnyList").field("len", &self.inner.len()).finish()
    }
}

impl<const C: usize, T> AnyList<C, T> {
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.inner.as_slice()
    }
}

impl<const C: usize, const B: usize> AnyList<C, BoundList<B>> {
    /// Concatenates every list into a single message.
    pub fn join(&self) -> Vec<u8> {
        self.inner.iter().flat_map(|l| l.as_slice().iter().copied()).collect()
    }
}

impl<const C: usize, T> ops::Deref for AnyList<C, T> {
    type Target = [T];

    fn deref(&self) -> &Self::Target {
        self.as_slice()
    }
}

impl<const C: usize, T: Arbitrary + fmt::Debug + 'static> Arbitrary for AnyList<C, T>
    where <T as Arbitrary>::Strategy: 'static
{
    type Parameters = ();

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        vec(any::<T>(), 0..=C)
            .prop_map(|inner| Self { inner })
            .boxed()
    }

    type Strategy = BoxedStrategy<Self>;
}

impl Arbitrary for Key {
    type Parameters = ();

    fn arbitrary_with(_args: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            any::<[u8; 32]>().prop_map(Key::Aes256),
            any::<[u8; 24]>().prop_map(Key::Aes192),
            any::<[u8; 16]>().prop_map(Key::Aes128)
        ].boxed()
    }

    type Strategy = BoxedStrategy<Self>;
}
