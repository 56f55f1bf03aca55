//! Stream-cipher-like masking over trits, driven by the sponge rate.

use crate::sponge::{Sponge, HASH_LEN};

/// Balanced-ternary addition saturated back into `{-1, 0, 1}`: `2` wraps to
/// `-1`, `-2` wraps to `1`. Commutative, and its own inverse under negation:
/// `trit_sum(trit_sum(a, b), -b) == a`.
pub fn trit_sum(a: i8, b: i8) -> i8 {
    let s = a + b;
    if s == 2 {
        -1
    } else if s == -2 {
        1
    } else {
        s
    }
}

/// Mask `payload` in place, advancing `sponge`. Processes `payload` in
/// `HASH_LEN`-trit chunks (a trailing chunk may be shorter): each chunk is
/// absorbed, then XOR-summed against a running key snapshot of the rate.
pub fn mask(payload: &mut [i8], sponge: &mut Sponge) {
    let mut key_chunk = sponge.rate(HASH_LEN).to_vec();
    let mut offset = 0;
    while offset < payload.len() {
        let n = std::cmp::min(key_chunk.len(), payload.len() - offset);
        let chunk = &mut payload[offset..offset + n];
        let plaintext = chunk.to_vec();
        sponge.absorb(&plaintext);
        let state = sponge.rate(n).to_vec();
        for i in 0..n {
            chunk[i] = trit_sum(plaintext[i], key_chunk[i]);
            key_chunk[i] = state[i];
        }
        offset += n;
    }
}

/// Inverse of [`mask`]: recovers the plaintext from `payload` (the
/// ciphertext) and absorbs the recovered plaintext, keeping the sponge in
/// the same state a matching `mask` call would have left it in.
pub fn unmask(payload: &mut [i8], sponge: &mut Sponge) {
    let mut key_chunk = sponge.rate(HASH_LEN).to_vec();
    let mut offset = 0;
    while offset < payload.len() {
        let n = std::cmp::min(key_chunk.len(), payload.len() - offset);
        let chunk = &mut payload[offset..offset + n];
        let mut plaintext = vec![0i8; n];
        for i in 0..n {
            plaintext[i] = trit_sum(chunk[i], -key_chunk[i]);
        }
        sponge.absorb(&plaintext);
        let state = sponge.rate(n).to_vec();
        for i in 0..n {
            chunk[i] = plaintext[i];
            key_chunk[i] = state[i];
        }
        offset += n;
    }
}

/// Absorb `key_trits` into a fresh 81-round sponge and squeeze one
/// `HASH_LEN`-trit block. Used to derive a non-public message address from
/// a root in private/restricted mode.
pub fn mask_hash(key_trits: &[i8]) -> Vec<i8> {
    let mut sponge = Sponge::new(81);
    sponge.absorb(key_trits);
    sponge.squeeze(crate::sponge::HASH_LEN)
}
