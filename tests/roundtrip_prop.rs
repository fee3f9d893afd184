use nimiqode::{Nimiqode, MIN_RINGS, VERSION};
use proptest::prelude::*;

proptest! {
    #[test]
    fn roundtrip_random(
        payload in proptest::collection::vec(any::<u8>(), 1..=127),
        factor in 0.0f64..=2.0,
    ) {
        let code = Nimiqode::encode(&payload, factor, VERSION).unwrap();
        prop_assert!(code.rings().len() >= MIN_RINGS);
        let decoded = Nimiqode::decode(code.rings().to_vec()).unwrap();
        prop_assert_eq!(decoded.payload(), &payload[..]);
    }

    #[test]
    fn encode_is_deterministic(payload in proptest::collection::vec(any::<u8>(), 1..=64)) {
        let a = Nimiqode::encode(&payload, 0.5, VERSION).unwrap();
        let b = Nimiqode::encode(&payload, 0.5, VERSION).unwrap();
        prop_assert_eq!(a.rings().len(), b.rings().len());
        for (x, y) in a.rings().iter().zip(b.rings()) {
            prop_assert_eq!(x.data().unwrap(), y.data().unwrap());
        }
    }
}
