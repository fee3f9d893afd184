use nimiqode::{Nimiqode, MIN_RINGS, VERSION};

#[test]
fn sixteen_byte_payload_roundtrip() {
    let payload: Vec<u8> = (0u8..16).collect();
    let code = Nimiqode::encode(&payload, 0.5, VERSION).unwrap();
    assert!(code.rings().len() >= MIN_RINGS);
    assert_eq!(code.payload(), &payload[..]);

    let decoded = Nimiqode::decode(code.rings().to_vec()).unwrap();
    assert_eq!(decoded.payload(), &payload[..]);
}

#[test]
fn single_byte_payload_roundtrip() {
    let code = Nimiqode::encode(&[0x42], 0.0, VERSION).unwrap();
    let decoded = Nimiqode::decode(code.rings().to_vec()).unwrap();
    assert_eq!(decoded.payload(), &[0x42]);
}

#[test]
fn maximum_payload_roundtrip() {
    // 127 bytes is the largest payload the length field can describe.
    let payload: Vec<u8> = (0..127).map(|i| (i * 7) as u8).collect();
    let code = Nimiqode::encode(&payload, 2.0, VERSION).unwrap();
    let decoded = Nimiqode::decode(code.rings().to_vec()).unwrap();
    assert_eq!(decoded.payload(), &payload[..]);
}

#[test]
fn biased_payloads_roundtrip() {
    // All-zero and all-one payloads exercise the mask selection hardest.
    for byte in [0x00u8, 0xFF] {
        let payload = vec![byte; 32];
        let code = Nimiqode::encode(&payload, 0.3, VERSION).unwrap();
        let decoded = Nimiqode::decode(code.rings().to_vec()).unwrap();
        assert_eq!(decoded.payload(), &payload[..]);
    }
}

#[test]
fn every_ring_is_populated() {
    let code = Nimiqode::encode(b"populated rings", 0.5, VERSION).unwrap();
    for ring in code.rings() {
        let data = ring.data().expect("encode must attach data to every ring");
        assert_eq!(data.len(), ring.capacity());
    }
}
