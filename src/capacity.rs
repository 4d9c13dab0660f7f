//! Prime capacity planning.
//!
//! Every table in this crate sizes its bucket array and its slot array to the
//! same prime. Primes keep `hash % bucket_count` well distributed even for
//! weak hashers, and doubling growth keeps amortized insertion O(1).

use crate::error::Error;

/// The largest capacity the planner will hand out.
///
/// Doubling stops here instead of overflowing; anything above is rejected
/// with [`Error::CapacityOverflow`].
pub const MAX_PRIME_CAPACITY: usize = 0x7FFF_FFC3;

/// Trial division skips candidates `p` with `(p - 1) % HASH_PRIME == 0`.
const HASH_PRIME: usize = 101;

/// Precomputed primes, roughly 1.2x apart, covering the common sizes.
pub const PRIMES: [usize; 72] = [
    3, 7, 11, 17, 23, 29, 37, 47, 59, 71, 89, 107, 131, 163, 197, 239, 293, 353, 431, 521, 631, 761,
    919, 1103, 1327, 1597, 1931, 2333, 2801, 3371, 4049, 4861, 5839, 7013, 8419, 10103, 12143,
    14591, 17519, 21023, 25229, 30293, 36353, 43627, 52361, 62851, 75431, 90523, 108631, 130363,
    156437, 187751, 225307, 270371, 324449, 389357, 467237, 560689, 672827, 807403, 968897,
    1162687, 1395263, 1674319, 2009191, 2411033, 2893249, 3471899, 4166287, 4999559, 5999471,
    7199369,
];

/// Returns `true` if `candidate` is prime.
pub fn is_prime(candidate: usize) -> bool {
    if candidate & 1 == 0 {
        return candidate == 2;
    }

    let mut divisor = 3usize;
    while divisor.saturating_mul(divisor) <= candidate {
        if candidate % divisor == 0 {
            return false;
        }
        divisor += 2;
    }

    candidate != 1
}

/// Returns the smallest usable prime that is at least `min`.
///
/// Table primes are preferred; beyond the table the next suitable odd prime
/// is found by trial division.
///
/// # Errors
///
/// Returns [`Error::CapacityOverflow`] if `min` exceeds
/// [`MAX_PRIME_CAPACITY`].
///
/// # Examples
///
/// ```rust
/// use prime_hash::capacity::next_prime;
///
/// assert_eq!(next_prime(0), Ok(3));
/// assert_eq!(next_prime(8), Ok(11));
/// ```
pub fn next_prime(min: usize) -> Result<usize, Error> {
    if min > MAX_PRIME_CAPACITY {
        return Err(Error::CapacityOverflow);
    }

    if let Some(&prime) = PRIMES.iter().find(|&&prime| prime >= min) {
        return Ok(prime);
    }

    let mut candidate = min | 1;
    while candidate < MAX_PRIME_CAPACITY {
        if is_prime(candidate) && (candidate - 1) % HASH_PRIME != 0 {
            return Ok(candidate);
        }
        candidate += 2;
    }

    Ok(MAX_PRIME_CAPACITY)
}

/// Returns the capacity a full table of `current` slots should grow to.
///
/// This is the next prime after doubling, clamped to
/// [`MAX_PRIME_CAPACITY`] once doubling would overshoot it.
///
/// # Errors
///
/// Returns [`Error::CapacityOverflow`] if `current` is already at the
/// maximum.
pub fn growth_target(current: usize) -> Result<usize, Error> {
    if current >= MAX_PRIME_CAPACITY {
        return Err(Error::CapacityOverflow);
    }

    let doubled = current.saturating_mul(2);
    if doubled > MAX_PRIME_CAPACITY {
        return Ok(MAX_PRIME_CAPACITY);
    }

    next_prime(doubled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_sorted_and_prime() {
        assert!(PRIMES.windows(2).all(|w| w[0] < w[1]));
        assert!(PRIMES.iter().all(|&p| is_prime(p)));
        assert!(is_prime(MAX_PRIME_CAPACITY));
    }

    #[test]
    fn small_values() {
        assert!(!is_prime(0));
        assert!(!is_prime(1));
        assert!(is_prime(2));
        assert!(is_prime(3));
        assert!(!is_prime(9));
        assert!(!is_prime(25));
        assert!(is_prime(7919));
    }

    #[test]
    fn next_prime_uses_table() {
        assert_eq!(next_prime(0), Ok(3));
        assert_eq!(next_prime(1), Ok(3));
        assert_eq!(next_prime(3), Ok(3));
        assert_eq!(next_prime(4), Ok(7));
        assert_eq!(next_prime(100), Ok(107));
        assert_eq!(next_prime(7_199_369), Ok(7_199_369));
    }

    #[test]
    fn next_prime_beyond_table() {
        let prime = next_prime(7_199_370).unwrap();
        assert!(prime > 7_199_369);
        assert!(is_prime(prime));
        assert_ne!((prime - 1) % HASH_PRIME, 0);
    }

    #[test]
    fn next_prime_rejects_oversized() {
        assert_eq!(next_prime(MAX_PRIME_CAPACITY), Ok(MAX_PRIME_CAPACITY));
        assert_eq!(
            next_prime(MAX_PRIME_CAPACITY + 1),
            Err(Error::CapacityOverflow)
        );
    }

    #[test]
    fn growth_doubles() {
        assert_eq!(growth_target(0), Ok(3));
        assert_eq!(growth_target(3), Ok(7));
        assert_eq!(growth_target(7), Ok(17));
        assert_eq!(growth_target(17), Ok(37));
        for &p in PRIMES.iter().take(40) {
            assert!(growth_target(p).unwrap() >= p * 2);
        }
    }

    #[test]
    fn growth_clamps_at_max() {
        assert_eq!(
            growth_target(MAX_PRIME_CAPACITY / 2 + 1),
            Ok(MAX_PRIME_CAPACITY)
        );
        assert_eq!(
            growth_target(MAX_PRIME_CAPACITY),
            Err(Error::CapacityOverflow)
        );
    }
}
