//! The "opaque" native kernels from spec.md §6: PRNG, shuffle, offset-sort,
//! statistic functions, and the CSM tail-bound primitive.
//!
//! spec.md treats these as an external C-ABI library bound through FFI.
//! This is a from-scratch rewrite with no such library to bind, so each
//! primitive is reimplemented in plain Rust; §9's "Open question" on this
//! exact point explicitly allows it, on the condition that the external
//! contracts in §6 keep holding. See DESIGN.md for the specific
//! reimplementation choices (notably the CSM bound, for which no
//! reference implementation was available to port).

pub mod csm;
pub mod prng;
pub mod shuffle;
pub mod sort;
pub mod stats;

pub use csm::csm;
pub use prng::Prng;
pub use shuffle::shuffle;
pub use sort::offset_sort;
