//! Prime numbers and factorisation.

use lazy_static::lazy_static;
use parking_lot::Mutex;

use crate::Integer;

lazy_static! {
    /// Primes found so far, in increasing order. Grown on demand.
    static ref PRIMES: Mutex<Vec<u64>> = Mutex::new(vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29]);
}

/// Extends `primes` until it has more than `count` entries.
fn extend_to(primes: &mut Vec<u64>, count: usize) {
    let mut candidate = primes.last().copied().unwrap_or(1) + 2;
    while primes.len() <= count {
        if primes
            .iter()
            .take_while(|&&p| p * p <= candidate)
            .all(|&p| candidate % p != 0)
        {
            primes.push(candidate);
        }
        candidate += 2;
    }
}

/// Returns the `i`th prime, counting from zero, so `prime(0) == 2`.
pub fn prime(i: usize) -> u64 {
    let mut primes = PRIMES.lock();
    extend_to(&mut primes, i);
    primes[i]
}

/// Returns the prime factors of `n` in increasing order, with repetition.
///
/// The sign is ignored, and zero and ±1 have no prime factors. Trial division
/// is used, so this is only practical for moderately sized inputs.
pub fn prime_decomposition(n: &Integer) -> Vec<Integer> {
    let mut n = n.abs();
    let mut factors = vec![];
    if n.is_zero() {
        return factors;
    }
    let mut i = 0;
    while n > 1 {
        let p = Integer::from(prime(i));
        if &p * &p > n {
            factors.push(n);
            break;
        }
        while p.divides(&n) {
            n = &n / &p;
            factors.push(p.clone());
        }
        i += 1;
    }
    factors
}

/// Returns the prime factorisation of `n` as `(prime, exponent)` pairs in
/// increasing order of prime.
pub fn prime_power_decomposition(n: &Integer) -> Vec<(Integer, u32)> {
    let mut ret: Vec<(Integer, u32)> = vec![];
    for p in prime_decomposition(n) {
        match ret.last_mut() {
            Some((q, e)) if *q == p => *e += 1,
            _ => ret.push((p, 1)),
        }
    }
    ret
}
