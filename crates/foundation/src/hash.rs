/// 32-bit polynomial rolling hash (`h = h * 31 + unit`) over UTF-16 code units.
///
/// The mapping is stable across runs and platforms; curve shapes derived from
/// it must stay identical between sessions, so do not swap this for a
/// general-purpose hasher.
pub fn seed_hash(key: &str) -> i32 {
    key.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

/// Magnitude of a seed hash. Defined for `i32::MIN`.
pub fn seed_magnitude(hash: i32) -> u32 {
    hash.unsigned_abs()
}
