//! Trial-division primality test
//!
//! Pure leaf collaborator with no concurrency concerns: odd candidates are
//! tested against odd divisors up to the square root.

/// Returns whether `n` is prime.
pub fn is_prime(n: u64) -> bool {
    if n <= 1 {
        return false;
    }
    if n == 2 {
        return true;
    }
    if n % 2 == 0 {
        return false;
    }

    let mut divisor = 3;
    // divisor <= n / divisor is the sqrt bound without the overflow that
    // divisor * divisor hits near the top of the u64 range.
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor += 2;
    }
    true
}
