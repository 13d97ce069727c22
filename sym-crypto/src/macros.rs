macro_rules! non_fips {
    ($($item:item)*) => {
        $(
            #[cfg(feature = "allow-non-fips")]
            #[cfg_attr(docsrs, doc(cfg(feature = "allow-non-fips")))]
            $item
        )*
    };
}

macro_rules! std {
    ($($item:item)*) => {
        $(
            #[cfg(feature = "std")]
            #[cfg_attr(docsrs, doc(cfg(feature = "std")))]
            $item
        )*
    };
}

/// Forwards every `BlockCipher` method through a pointer-like wrapper.
macro_rules! forward_block_cipher {
    ($($wrapper:ty),* $(,)?) => {
        $(
            impl<C: $crate::cipher::BlockCipher + ?Sized> $crate::cipher::BlockCipher for $wrapper {
                #[inline]
                fn algorithm_name(&self) -> alloc::string::String {
                    (**self).algorithm_name()
                }

                #[inline]
                fn init(
                    &mut self,
                    for_encryption: bool,
                    params: &$crate::params::CipherParameters
                ) -> Result<(), $crate::Error> {
                    (**self).init(for_encryption, params)
                }

                #[inline]
                fn block_size(&self) -> usize {
                    (**self).block_size()
                }

                #[inline]
                fn process_block(
                    &mut self,
                    input: &[u8],
                    output: &mut [u8]
                ) -> Result<usize, $crate::Error> {
                    (**self).process_block(input, output)
                }

                #[inline]
                fn reset(&mut self) {
                    (**self).reset();
                }

                #[inline]
                fn multi_block_size(&self) -> usize {
                    (**self).multi_block_size()
                }

                #[inline]
                fn process_blocks(
                    &mut self,
                    input: &[u8],
                    block_count: usize,
                    output: &mut [u8]
                ) -> Result<usize, $crate::Error> {
                    (**self).process_blocks(input, block_count, output)
                }

                #[inline]
                fn allows_partial_block(&self) -> bool {
                    (**self).allows_partial_block()
                }
            }
        )*
    };
}
