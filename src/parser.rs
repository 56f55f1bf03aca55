//! Message parser: the inverse of `channel::create_message`.

use crate::error::{Error, Result};
use crate::mask::unmask;
use crate::merkle::root_from_siblings;
use crate::pascal::pascal_decode;
use crate::signature::{checksum_security, digest_from_signature, fragment_count, FRAGMENT_LEN};
use crate::sponge::{Sponge, HASH_LEN};
use crate::trits::{from_trits, resolve_side_key_trits, to_trits};

/// A successfully authenticated message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedMessage {
    pub message: String,
    pub next_root: String,
}

/// Decode, authenticate and decrypt `payload` published at `root`. `side_key`
/// must match whatever key (if any) the publisher used.
pub fn parse_message(payload: &str, root: &str, side_key: Option<&str>) -> Result<ParsedMessage> {
    let payload_trits = to_trits(payload)?;
    let root_trits = to_trits(root)?;

    let (index, consumed1) = pascal_decode(&payload_trits)?;
    let (len, consumed2) = pascal_decode(&payload_trits[consumed1..])?;
    if index < 0 || len < 0 {
        return Err(Error::BadChannelState("decoded index/length must be non-negative"));
    }
    let index = index as u64;
    let len = len as usize;

    let next_root_start = consumed1 + consumed2;
    let message_start = next_root_start + HASH_LEN;
    let message_end = message_start + len;
    let nonce_end = message_end + 81;
    if nonce_end > payload_trits.len() {
        return Err(Error::PascalTruncated {
            needed: nonce_end,
            available: payload_trits.len(),
        });
    }

    let side_key_trits = resolve_side_key_trits(side_key)?;

    let mut sponge = Sponge::new(27);
    sponge.absorb(&side_key_trits);
    sponge.absorb(&root_trits);
    sponge.absorb(&payload_trits[0..next_root_start]);

    let mut next_root = payload_trits[next_root_start..next_root_start + HASH_LEN].to_vec();
    unmask(&mut next_root, &mut sponge);

    let mut message = payload_trits[message_start..message_end].to_vec();
    unmask(&mut message, &mut sponge);

    let mut nonce = payload_trits[message_end..nonce_end].to_vec();
    unmask(&mut nonce, &mut sponge);

    let hmac = sponge.rate(HASH_LEN).to_vec();
    let sec = checksum_security(&hmac);
    if sec == 0 {
        return Err(Error::InvalidSecurity);
    }

    let mut meta = payload_trits[nonce_end..].to_vec();
    unmask(&mut meta, &mut sponge);
    sponge.reset();

    let sig_len = fragment_count(sec) * FRAGMENT_LEN;
    if sig_len > meta.len() {
        return Err(Error::PascalTruncated {
            needed: sig_len,
            available: meta.len(),
        });
    }
    let sig = &meta[0..sig_len];
    let digest = digest_from_signature(&hmac, sig);
    sponge.absorb(&digest);

    let (sib_count, d) = pascal_decode(&meta[sig_len..])?;
    if sib_count < 0 {
        return Err(Error::BadChannelState("sibling count must be non-negative"));
    }
    let sib_count = sib_count as usize;
    let siblings_start = sig_len + d;
    let siblings_end = siblings_start + sib_count * HASH_LEN;
    if siblings_end > meta.len() {
        return Err(Error::PascalTruncated {
            needed: siblings_end,
            available: meta.len(),
        });
    }
    let siblings: Vec<Vec<i8>> = meta[siblings_start..siblings_end]
        .chunks_exact(HASH_LEN)
        .map(|c| c.to_vec())
        .collect();

    let recomputed_root = if sib_count == 0 {
        sponge.rate(HASH_LEN).to_vec()
    } else {
        root_from_siblings(sponge.rate(HASH_LEN), &siblings, index)
    };

    let recomputed_root_trytes = from_trits(&recomputed_root)?;
    if recomputed_root_trytes != root {
        return Err(Error::RootMismatch);
    }

    Ok(ParsedMessage {
        message: from_trits(&message)?,
        next_root: from_trits(&next_root)?,
    })
}
