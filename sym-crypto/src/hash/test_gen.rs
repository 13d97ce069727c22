/// Generates the test suite every digest carries, checking it against the RustCrypto
/// implementation of the same algorithm.
macro_rules! digest_tests {
    ($name:ident, $rc:ty, $ds:literal) => {

    };
}
