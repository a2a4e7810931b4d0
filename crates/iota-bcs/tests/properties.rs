use iota_bcs::prelude::*;
use iota_bcs::uleb;
use proptest::prelude::*;

fn registry() -> Bcs {
    let bcs = Bcs::iota_move();
    bcs.register_struct("Beep", [("id", "address"), ("value", "u64")]).unwrap();
    bcs.register_enum("Shape", [("empty", None), ("tagged", Some("vector<string>"))])
        .unwrap();
    bcs
}

fn beep(id: [u8; 32], value: u64) -> Value {
    Value::struct_of([("id", Value::Address(id.to_vec())), ("value", Value::U64(value))])
}

proptest! {
    #[test]
    fn struct_roundtrip(id in any::<[u8; 32]>(), value in any::<u64>()) {
        let bcs = registry();
        let original = beep(id, value);
        let bytes = bcs.serialize("Beep", &original).unwrap().into_bytes();
        prop_assert_eq!(bytes.len(), 40);
        prop_assert_eq!(bcs.deserialize_exact("Beep", &bytes).unwrap(), original);
    }

    #[test]
    fn serialization_is_deterministic(
        tags in prop::collection::vec("[a-z]{0,12}", 0..8),
        present in any::<bool>(),
    ) {
        let bcs = registry();
        let value = if present {
            Value::variant("tagged", Value::from(tags))
        } else {
            Value::unit_variant("empty")
        };
        let first = bcs.serialize("Shape", &value).unwrap().into_bytes();
        let second = bcs.serialize("Shape", &value).unwrap().into_bytes();
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(bcs.deserialize("Shape", &first).unwrap(), value);
    }

    #[test]
    fn uleb128_is_canonical(value in 0u64..=u32::MAX as u64) {
        let encoded = uleb::encode(value);
        let (decoded, consumed) = uleb::decode(&encoded).unwrap();
        prop_assert_eq!(decoded as u64, value);
        prop_assert_eq!(consumed, encoded.len());

        // A redundant zero continuation group is never accepted.
        if encoded.len() < uleb::MAX_ULEB128_LEN {
            let mut padded = encoded.clone();
            let last = padded.len() - 1;
            padded[last] |= 0x80;
            padded.push(0x00);
            prop_assert!(uleb::decode(&padded).is_err());
        }
    }

    #[test]
    fn u8_range_boundary(value in 0u64..1024) {
        let bcs = Bcs::iota_move();
        let result = bcs.serialize("u8", &Value::U64(value));
        prop_assert_eq!(result.is_ok(), value <= 255);
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in prop::collection::vec(any::<u8>(), 0..96)) {
        let bcs = registry();
        let _ = bcs.deserialize("Beep", &bytes);
        let _ = bcs.deserialize("Shape", &bytes);
        let _ = bcs.deserialize("vector<vector<u256>>", &bytes);
    }
}
