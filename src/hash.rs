//! Hashing and mixing utilities.
//!
//! The table derives a bucket from the low bits of a 64-bit hash, so hashes
//! must be well mixed in every bit. [`hash_bytes`] is a MurmurHash64A
//! variant for byte strings and [`hash_int`] is the murmur3 64-bit finalizer
//! for integers. [`BuildRobinHoodHasher`] combines both into a deterministic
//! [`BuildHasher`].

use core::hash::BuildHasher;
use core::hash::Hasher;

const MURMUR_M: u64 = 0xc6a4a7935bd1e995;
const MURMUR_SEED: u64 = 0xe17a1465;
const MURMUR_R: u32 = 47;

/// Hashes a byte string with MurmurHash64A.
///
/// Blocks are read little-endian regardless of the target, so the result is
/// the same on every platform.
///
/// # Examples
///
/// ```rust
/// # use robin_hood_map::hash::hash_bytes;
/// assert_eq!(hash_bytes(b"robin hood"), hash_bytes(b"robin hood"));
/// assert_ne!(hash_bytes(b"robin hood"), hash_bytes(b"robin good"));
/// ```
pub fn hash_bytes(bytes: &[u8]) -> u64 {
    let mut h = MURMUR_SEED ^ (bytes.len() as u64).wrapping_mul(MURMUR_M);

    let mut blocks = bytes.chunks_exact(8);
    for block in &mut blocks {
        let mut buf = [0u8; 8];
        buf.copy_from_slice(block);
        let mut k = u64::from_le_bytes(buf);

        k = k.wrapping_mul(MURMUR_M);
        k ^= k >> MURMUR_R;
        k = k.wrapping_mul(MURMUR_M);

        h ^= k;
        h = h.wrapping_mul(MURMUR_M);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        for (i, byte) in tail.iter().enumerate().rev() {
            h ^= (*byte as u64) << (i * 8);
        }
        h = h.wrapping_mul(MURMUR_M);
    }

    h ^= h >> MURMUR_R;
    h = h.wrapping_mul(MURMUR_M);
    h ^= h >> MURMUR_R;
    h
}

/// Mixes a 64-bit integer with the murmur3 finalizer.
///
/// The mapping is a bijection, so distinct integers never collide before
/// masking.
///
/// # Examples
///
/// ```rust
/// # use robin_hood_map::hash::hash_int;
/// assert_eq!(hash_int(0), 0);
/// assert_ne!(hash_int(1) & 0xFF, hash_int(2) & 0xFF);
/// ```
#[inline]
pub fn hash_int(value: u64) -> u64 {
    let mut h = value;
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51afd7ed558ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ceb9fe1a85ec53);
    h ^= h >> 33;
    h
}

/// A deterministic [`Hasher`] built from [`hash_int`] and [`hash_bytes`].
///
/// Every write is folded into the running state with [`hash_int`]. The
/// hasher is unkeyed: do not use it for tables that hold attacker-chosen
/// keys.
#[derive(Clone, Copy, Debug, Default)]
pub struct RobinHoodHasher {
    state: u64,
}

impl RobinHoodHasher {
    #[inline(always)]
    fn mix(&mut self, value: u64) {
        self.state = hash_int(self.state ^ value);
    }
}

impl Hasher for RobinHoodHasher {
    #[inline]
    fn finish(&self) -> u64 {
        self.state
    }

    #[inline]
    fn write(&mut self, bytes: &[u8]) {
        self.mix(hash_bytes(bytes));
    }

    #[inline]
    fn write_u8(&mut self, i: u8) {
        self.mix(i as u64);
    }

    #[inline]
    fn write_u16(&mut self, i: u16) {
        self.mix(i as u64);
    }

    #[inline]
    fn write_u32(&mut self, i: u32) {
        self.mix(i as u64);
    }

    #[inline]
    fn write_u64(&mut self, i: u64) {
        self.mix(i);
    }

    #[inline]
    fn write_u128(&mut self, i: u128) {
        self.mix(i as u64);
        self.mix((i >> 64) as u64);
    }

    #[inline]
    fn write_usize(&mut self, i: usize) {
        self.mix(i as u64);
    }
}

/// Builds [`RobinHoodHasher`]s. Every builder produces identical hashers.
#[derive(Clone, Copy, Debug, Default)]
pub struct BuildRobinHoodHasher;

impl BuildHasher for BuildRobinHoodHasher {
    type Hasher = RobinHoodHasher;

    #[inline]
    fn build_hasher(&self) -> Self::Hasher {
        RobinHoodHasher::default()
    }
}
