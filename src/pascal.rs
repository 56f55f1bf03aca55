//! Self-delimiting variable-length signed integer encoding in trits.
//!
//! The canonical zero is the fixed 4-trit constant `[1, 0, 0, -1]`. Every
//! other value is encoded as a balanced-base-3 body followed by an encoding
//! word that records which trytes were sign-flipped to make every tryte but
//! the last non-negative.

use crate::error::{Error, Result};

pub const CANONICAL_ZERO: [i8; 4] = [1, 0, 0, -1];

fn trits_value(t: &[i8]) -> i64 {
    let mut v: i64 = 0;
    let mut pow: i64 = 1;
    for &trit in t {
        v += trit as i64 * pow;
        pow *= 3;
    }
    v
}

/// Fewest trits to represent `x` (`x >= 0`) in balanced base 3, where each
/// additional trit multiplies representable magnitude by 3.
fn min_trits(mut x: u64) -> usize {
    let mut n = 0usize;
    let mut max = 0u64; // max representable magnitude with n trits: (3^n - 1) / 2
    while max < x {
        n += 1;
        max = max * 3 + 1;
    }
    let _ = &mut x;
    n
}

fn round_up_to_multiple_of_3(n: usize) -> usize {
    (n + 2) / 3 * 3
}

/// Write the balanced-base-3 trits of `v` into `m` trits, little-endian.
fn to_balanced_trits(v: i64, m: usize) -> Vec<i8> {
    let mut out = vec![0i8; m];
    let mut t = v;
    for slot in out.iter_mut() {
        let r = (((t % 3) + 3 + 1) % 3) - 1;
        *slot = r as i8;
        t = (t - r) / 3;
    }
    out
}

/// Encode `v` as a self-delimiting trit sequence.
pub fn pascal_encode(v: i64) -> Vec<i8> {
    if v == 0 {
        return CANONICAL_ZERO.to_vec();
    }

    let negative = v < 0;
    let magnitude = v.unsigned_abs();
    let m = round_up_to_multiple_of_3(min_trits(magnitude));

    let mut body = to_balanced_trits(magnitude, m);
    if negative {
        for t in body.iter_mut() {
            *t = -*t;
        }
    }

    let num_chunks = m / 3;
    let mut encoding_word = vec![0i8; num_chunks];
    for (k, chunk) in body.chunks_mut(3).enumerate() {
        let is_last = k == num_chunks - 1;
        let value = trits_value(chunk);
        let flip = if is_last { value < 0 } else { value >= 0 };
        if flip {
            for t in chunk.iter_mut() {
                *t = -*t;
            }
            encoding_word[k] = 1;
        }
    }

    let mut out = body;
    out.extend(encoding_word);
    out
}

/// Decode a self-delimiting trit sequence at the start of `t`. Returns the
/// value and the number of trits consumed.
pub fn pascal_decode(t: &[i8]) -> Result<(i64, usize)> {
    if t.len() >= 4 && t[0..4] == CANONICAL_ZERO {
        return Ok((0, 4));
    }

    let mut header = 0usize;
    loop {
        let end = header + 3;
        if end > t.len() {
            return Err(Error::PascalTruncated {
                needed: end,
                available: t.len(),
            });
        }
        let is_terminal = trits_value(&t[header..end]) > 0;
        header = end;
        if is_terminal {
            break;
        }
    }

    let num_chunks = header / 3;
    let word_end = header + num_chunks;
    if word_end > t.len() {
        return Err(Error::PascalTruncated {
            needed: word_end,
            available: t.len(),
        });
    }
    let encoding_word = &t[header..word_end];

    let mut value: i64 = 0;
    let mut pow: i64 = 1;
    for k in 0..num_chunks {
        let chunk = &t[3 * k..3 * k + 3];
        let mut chunk_value = trits_value(chunk);
        if encoding_word[k] != 0 {
            chunk_value = -chunk_value;
        }
        value += pow * chunk_value;
        pow *= 27;
    }

    Ok((value, word_end))
}
