use mam_core::{channel, channel::Mode, create_channel, create_message, parse_message};

#[test]
fn scenario_fresh_public_channel_has_expected_defaults() {
    let state = create_channel(&"A".repeat(81), 2, "public", None).unwrap();
    assert_eq!(state.mode, Mode::Public);
    assert_eq!(state.start, 0);
    assert_eq!(state.count, 1);
    assert_eq!(state.next_count, 1);
    assert_eq!(state.index, 0);
    assert!(state.side_key.is_none());
}

#[test]
fn scenario_channel_root_is_deterministic() {
    let state = create_channel(&"A".repeat(81), 2, "public", None).unwrap();
    let r1 = channel::channel_root(&state).unwrap();
    let r2 = channel::channel_root(&state).unwrap();
    assert_eq!(r1, r2);
}

#[test]
fn scenario_two_message_chain_public_security_1() {
    let mut state = create_channel(&"A".repeat(81), 1, "public", None).unwrap();
    let root0 = channel::channel_root(&state).unwrap();

    let m1 = create_message(&mut state, "HELLO9WORLD").unwrap();
    assert_eq!(m1.root, root0);

    let m2 = create_message(&mut state, "IOTA").unwrap();

    let parsed1 = parse_message(&m1.payload, &m1.root, None).unwrap();
    assert_eq!(parsed1.message, "HELLO9WORLD");
    assert_eq!(parsed1.next_root, m2.root);

    let parsed2 = parse_message(&m2.payload, &m2.root, None).unwrap();
    assert_eq!(parsed2.message, "IOTA");
}

#[test]
fn scenario_restricted_mode_side_key_gates_access() {
    let mut state = create_channel(&"B".repeat(81), 1, "restricted", Some("MYKEY")).unwrap();
    let msg = create_message(&mut state, "SECRET9PAYLOAD").unwrap();

    let ok = parse_message(&msg.payload, &msg.root, Some("MYKEY")).unwrap();
    assert_eq!(ok.message, "SECRET9PAYLOAD");

    assert!(parse_message(&msg.payload, &msg.root, Some("OTHERKEY")).is_err());
    assert!(parse_message(&msg.payload, &msg.root, None).is_err());
}

#[test]
fn scenario_private_mode_address_differs_from_root() {
    let mut state = create_channel(&"C".repeat(81), 1, "private", None).unwrap();
    let msg = create_message(&mut state, "HIDDEN").unwrap();
    assert_ne!(msg.address, msg.root);

    let parsed = parse_message(&msg.payload, &msg.root, None).unwrap();
    assert_eq!(parsed.message, "HIDDEN");
}

#[test]
fn scenario_public_mode_address_equals_root() {
    let mut state = create_channel(&"D".repeat(81), 1, "public", None).unwrap();
    let msg = create_message(&mut state, "PLAIN").unwrap();
    assert_eq!(msg.address, msg.root);
}

#[test]
fn scenario_tamper_detection_on_payload_and_root() {
    let mut state = create_channel(&"E".repeat(81), 1, "public", None).unwrap();
    let msg = create_message(&mut state, "DETECTME").unwrap();

    let mut payload_chars: Vec<char> = msg.payload.chars().collect();
    let i = payload_chars.len() / 3;
    payload_chars[i] = if payload_chars[i] == '9' { 'A' } else { '9' };
    let tampered_payload: String = payload_chars.into_iter().collect();
    assert!(parse_message(&tampered_payload, &msg.root, None).is_err());

    let mut root_chars: Vec<char> = msg.root.chars().collect();
    root_chars[0] = if root_chars[0] == '9' { 'A' } else { '9' };
    let tampered_root: String = root_chars.into_iter().collect();
    assert!(parse_message(&msg.payload, &tampered_root, None).is_err());
}

#[test]
fn scenario_multi_leaf_window_across_several_messages() {
    let mut state = create_channel(&"F".repeat(81), 1, "public", None).unwrap();
    state.count = 3;
    state.next_count = 2;

    let texts = ["MSGA", "MSGB", "MSGC"];
    let mut payloads = Vec::new();
    for text in texts.iter() {
        let msg = create_message(&mut state, text).unwrap();
        payloads.push(msg);
    }
    assert_eq!(state.start, 2);
    assert_eq!(state.index, 0);

    for (i, msg) in payloads.iter().enumerate() {
        let parsed = parse_message(&msg.payload, &msg.root, None).unwrap();
        assert_eq!(parsed.message, texts[i]);
    }
}
