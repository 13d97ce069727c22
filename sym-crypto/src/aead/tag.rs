use core::fmt;

use crate::ct;

/// An authentication tag of 4 to 16 bytes.
#[must_use = "You must use the tag, or the AEAD is doing nothing for you"]
#[derive(Copy, Clone, Default)]
pub struct Tag {
    inner: [u8; 16],
    len: usize,
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_fmt(format_args!("Tag({:?})", self.as_slice()))
    }
}

impl Tag {
    /// The largest tag in bytes.
    pub const CAPACITY: usize = 16;

    /// Copies `tag` into a new `Tag`, keeping at most [`CAPACITY`](Self::CAPACITY) bytes.
    pub fn new(tag: &[u8]) -> Self {
        let len = tag.len().min(Self::CAPACITY);
        let mut inner = [0u8; Self::CAPACITY];
        inner[..len].copy_from_slice(&tag[..len]);
        Self { inner, len }
    }

    /// A tag of `len` zero bytes, what [`AeadCipher::mac`](super::AeadCipher::mac) reports
    /// before the first `do_final`.
    pub const fn zeroed(len: usize) -> Self {
        let len = if len > Self::CAPACITY { Self::CAPACITY } else { len };
        Self { inner: [0u8; Self::CAPACITY], len }
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.inner[..self.len]
    }
}

impl AsRef<[u8]> for Tag {
    #[inline]
    fn as_ref(&self) -> &[u8] {
        self.as_slice()
    }
}

impl PartialEq for Tag {
    /// Constant Time Equivalence
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        ct::ct_eq(self.as_slice(), other.as_slice())
    }
}

impl Eq for Tag {}

impl PartialEq<[u8]> for Tag {
    /// Constant Time Equivalence
    #[inline]
    fn eq(&self, other: &[u8]) -> bool {
        ct::ct_eq(self.as_slice(), other)
    }
}
