//! Channel state and the message builder.

use crate::error::{Error, Result};
use crate::mask::{mask, mask_hash};
use crate::merkle::MerkleTree;
use crate::pascal::pascal_encode;
use crate::pow;
use crate::signature;
use crate::sponge::{Sponge, HASH_LEN, STATE_LEN};
use crate::trits::{from_trits, pad_trytes, resolve_side_key_trits, to_trits};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Public,
    Private,
    Restricted,
}

impl Mode {
    fn parse(s: &str) -> Result<Mode> {
        match s {
            "public" => Ok(Mode::Public),
            "private" => Ok(Mode::Private),
            "restricted" => Ok(Mode::Restricted),
            other => Err(Error::BadMode(other.to_string())),
        }
    }
}

/// Mutable publisher-side channel record. Owned by the caller; not safe to
/// use `create_message` concurrently on the same state.
#[derive(Clone, Debug)]
pub struct ChannelState {
    pub seed: String,
    pub mode: Mode,
    pub side_key: Option<String>,
    pub security: u8,
    pub start: u64,
    pub count: u64,
    pub next_count: u64,
    pub index: u64,
    pub next_root: Option<String>,
}

/// A published, encoded message ready to hand to the (out-of-scope)
/// transport layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub payload: String,
    pub root: String,
    pub address: String,
}

/// Validate inputs and initialise a fresh channel with a single-leaf
/// Merkle window (`count = next_count = 1`, `index = 0`).
pub fn create_channel(
    seed: &str,
    security: u8,
    mode: &str,
    side_key: Option<&str>,
) -> Result<ChannelState> {
    if seed.chars().count() != 81 {
        return Err(Error::BadSeedLength(seed.chars().count()));
    }
    if !(1..=3).contains(&security) {
        return Err(Error::BadSecurity(security));
    }
    let mode = Mode::parse(mode)?;

    let side_key = match (mode, side_key) {
        (Mode::Restricted, None) => return Err(Error::MissingSideKey),
        (Mode::Restricted, Some(k)) => {
            let len = k.chars().count();
            if len == 0 || len > 81 {
                return Err(Error::BadSideKeyLength(len));
            }
            Some(pad_trytes(k, 81))
        }
        (_, Some(_)) => return Err(Error::UnexpectedSideKey),
        (_, None) => None,
    };

    Ok(ChannelState {
        seed: seed.to_string(),
        mode,
        side_key,
        security,
        start: 0,
        count: 1,
        next_count: 1,
        index: 0,
        next_root: None,
    })
}

/// The root address of the channel's current Merkle window, as 81 trytes.
pub fn channel_root(state: &ChannelState) -> Result<String> {
    let seed_trits = to_trits(&state.seed)?;
    let tree = MerkleTree::build(&seed_trits, state.start, state.count, state.security);
    from_trits(tree.root_address())
}

/// Build, sign, mask and proof-of-work-seal a message, advancing `state` in
/// place.
pub fn create_message(state: &mut ChannelState, message: &str) -> Result<Message> {
    if state.count == 0 {
        return Err(Error::BadChannelState("count must be >= 1"));
    }
    if state.next_count == 0 {
        return Err(Error::BadChannelState("next_count must be >= 1"));
    }
    if state.index >= state.count {
        return Err(Error::BadChannelState("index must be < count"));
    }

    let seed_trits = to_trits(&state.seed)?;
    let message_trits = to_trits(message)?;

    let tree = MerkleTree::build(&seed_trits, state.start, state.count, state.security);
    let next_tree = MerkleTree::build(
        &seed_trits,
        state.start + state.count,
        state.next_count,
        state.security,
    );
    let next_root_trits = next_tree.root_address().to_vec();

    let index_trits = pascal_encode(state.index as i64);
    let len_trits = pascal_encode(message_trits.len() as i64);

    let (key, leaves) = tree.get_subtree(state.index);

    let side_key_trits = resolve_side_key_trits(state.side_key.as_deref())?;

    let mut sponge = Sponge::new(27);
    sponge.absorb(&side_key_trits);
    sponge.absorb(tree.root_address());
    let mut header = index_trits.clone();
    header.extend(len_trits.clone());
    sponge.absorb(&header);

    let mut payload = next_root_trits.clone();
    payload.extend(message_trits.iter().copied());
    mask(&mut payload, &mut sponge);

    let pre_nonce_state = sponge.rate(STATE_LEN).to_vec();
    let mut nonce = pow::search(&pre_nonce_state, state.security, 81, 0)?;
    mask(&mut nonce, &mut sponge);
    payload.extend(nonce);

    let hmac = sponge.rate(HASH_LEN).to_vec();
    let sig = signature::sign(&hmac, &key);
    let siblings_count_trits = pascal_encode(leaves.len() as i64);
    let mut tail = sig;
    tail.extend(siblings_count_trits);
    for sibling in &leaves {
        tail.extend(sibling.iter().copied());
    }
    mask(&mut tail, &mut sponge);
    payload.extend(tail);

    while payload.len() % 3 != 0 {
        payload.push(0);
    }

    let address_trits = match state.mode {
        Mode::Public => tree.root_address().to_vec(),
        Mode::Private | Mode::Restricted => mask_hash(tree.root_address()),
    };

    let root = from_trits(tree.root_address())?;
    let address = from_trits(&address_trits)?;
    let payload_str = from_trits(&payload)?;

    if state.index == state.count - 1 {
        state.start += state.next_count;
        state.index = 0;
    } else {
        state.index += 1;
    }
    state.next_root = Some(from_trits(&next_root_trits)?);

    Ok(Message {
        payload: payload_str,
        root,
        address,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_channel_validates_seed_length() {
        assert!(create_channel(&"A".repeat(80), 1, "public", None).is_err());
        assert!(create_channel(&"A".repeat(81), 1, "public", None).is_ok());
    }

    #[test]
    fn create_channel_validates_security() {
        assert!(create_channel(&"A".repeat(81), 0, "public", None).is_err());
        assert!(create_channel(&"A".repeat(81), 4, "public", None).is_err());
    }

    #[test]
    fn create_channel_validates_mode_sidekey_coherence() {
        assert!(create_channel(&"A".repeat(81), 1, "restricted", None).is_err());
        assert!(create_channel(&"A".repeat(81), 1, "public", Some("KEY")).is_err());
        assert!(create_channel(&"A".repeat(81), 1, "restricted", Some("KEY")).is_ok());
    }

    #[test]
    fn fresh_channel_has_expected_defaults() {
        let state = create_channel(&"A".repeat(81), 2, "public", None).unwrap();
        assert_eq!(state.start, 0);
        assert_eq!(state.count, 1);
        assert_eq!(state.next_count, 1);
        assert_eq!(state.index, 0);
        assert!(state.next_root.is_none());
    }

    #[test]
    fn channel_root_is_deterministic() {
        let state = create_channel(&"A".repeat(81), 2, "public", None).unwrap();
        assert_eq!(channel_root(&state).unwrap(), channel_root(&state).unwrap());
    }
}
