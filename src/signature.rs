//! One-time signature scheme: a Winternitz-style hash-chain signature over
//! trytes, built on the ternary sponge.

use crate::sponge::{hash_block, Sponge, HASH_LEN};

pub const FRAGMENT_LEN: usize = HASH_LEN;
const CHAIN_LEN: usize = 27; // (MAX_TRYTE - MIN_TRYTE + 1)
const MAX_TRYTE: i8 = 13;
const MIN_TRYTE: i8 = -13;

/// Number of 243-trit fragments (and signature slabs) for security level `L`.
pub fn fragment_count(security: u8) -> usize {
    security as usize * CHAIN_LEN
}

/// `subseed(seed, index)`: `index` balanced-ternary increments of `seed`,
/// absorbed into a fresh 27-round sponge and squeezed to `HASH_LEN` trits.
pub fn subseed(seed_trits: &[i8], index: u64) -> Vec<i8> {
    let mut s = seed_trits.to_vec();
    for _ in 0..index {
        crate::trits::increment(&mut s);
    }
    let mut sponge = Sponge::new(27);
    sponge.absorb(&s);
    sponge.squeeze(HASH_LEN)
}

/// Expand a subseed into a whitened private key of `fragment_count(security)
/// * HASH_LEN` trits.
pub fn private_key(subseed: &[i8], security: u8) -> Vec<i8> {
    let n = fragment_count(security);
    let mut sponge = Sponge::new(27);
    sponge.absorb(subseed);
    let mut raw = Vec::with_capacity(n * FRAGMENT_LEN);
    for _ in 0..n {
        raw.extend(sponge.squeeze(FRAGMENT_LEN));
    }
    let mut key = vec![0i8; n * FRAGMENT_LEN];
    for k in 0..n {
        let frag = &raw[k * FRAGMENT_LEN..(k + 1) * FRAGMENT_LEN];
        let whitened = hash_block(frag, 27);
        key[k * FRAGMENT_LEN..(k + 1) * FRAGMENT_LEN].copy_from_slice(&whitened);
    }
    key
}

/// Digest committed to by a subseed: each of `fragment_count(security)` raw
/// blocks is iterated through the full 27-step hash chain, then absorbed
/// into an accumulator sponge whose final squeeze is the digest.
pub fn digest_from_subseed(subseed: &[i8], security: u8) -> Vec<i8> {
    let n = fragment_count(security);
    let mut raw_sponge = Sponge::new(27);
    raw_sponge.absorb(subseed);
    let mut digest_sponge = Sponge::new(27);
    for _ in 0..n {
        let mut h = raw_sponge.squeeze(FRAGMENT_LEN);
        for _ in 0..CHAIN_LEN {
            h = hash_block(&h, 27);
        }
        digest_sponge.absorb(&h);
    }
    digest_sponge.squeeze(HASH_LEN)
}

/// The Merkle leaf address for a digest: the squeeze of a fresh sponge that
/// absorbed it.
pub fn address_from_digest(digest: &[i8]) -> Vec<i8> {
    let mut sponge = Sponge::new(27);
    sponge.absorb(digest);
    sponge.squeeze(HASH_LEN)
}

/// Balanced tryte value `tv_i` of fragment `i` read from a `HASH_LEN`-trit
/// hmac buffer: three consecutive trits starting at `3*i`.
fn fragment_tryte_value(h: &[i8], i: usize) -> i8 {
    h[3 * i] + 3 * h[3 * i + 1] + 9 * h[3 * i + 2]
}

/// Sign `h` (the message hmac, `HASH_LEN` trits) with `key` (a private key
/// of matching security level).
pub fn sign(h: &[i8], key: &[i8]) -> Vec<i8> {
    let n = key.len() / FRAGMENT_LEN;
    let mut sig = vec![0i8; key.len()];
    for i in 0..n {
        let tv = fragment_tryte_value(h, i);
        let steps = (MAX_TRYTE - tv) as usize;
        let mut buf = key[i * FRAGMENT_LEN..(i + 1) * FRAGMENT_LEN].to_vec();
        for _ in 0..steps {
            buf = hash_block(&buf, 27);
        }
        sig[i * FRAGMENT_LEN..(i + 1) * FRAGMENT_LEN].copy_from_slice(&buf);
    }
    sig
}

/// Recover the digest a signature `sig` over hmac `h` commits to, by
/// iterating each slab the remaining distance to the whitened key block and
/// absorbing the concatenation into a fresh sponge.
pub fn digest_from_signature(h: &[i8], sig: &[i8]) -> Vec<i8> {
    let n = sig.len() / FRAGMENT_LEN;
    let mut sponge = Sponge::new(27);
    for i in 0..n {
        let tv = fragment_tryte_value(h, i);
        let steps = (tv - MIN_TRYTE) as usize;
        let mut buf = sig[i * FRAGMENT_LEN..(i + 1) * FRAGMENT_LEN].to_vec();
        for _ in 0..steps {
            buf = hash_block(&buf, 27);
        }
        sponge.absorb(&buf);
    }
    sponge.squeeze(HASH_LEN)
}

/// Return the smallest security level `1..=3` whose cumulative third-sum of
/// `h` (a `HASH_LEN`-trit hmac) is zero, or `0` if none is.
pub fn checksum_security(h: &[i8]) -> u8 {
    debug_assert_eq!(h.len(), HASH_LEN);
    let third = HASH_LEN / 3;
    let prefix_sum = |n: usize| -> i64 { h[0..n].iter().map(|&t| t as i64).sum() };
    if prefix_sum(third) == 0 {
        1
    } else if prefix_sum(2 * third) == 0 {
        2
    } else if prefix_sum(3 * third) == 0 {
        3
    } else {
        0
    }
}
