//! Usage walkthrough: registering types, generics, enums and encodings.

use iota_bcs::prelude::*;
use iota_bcs::registry::{ADDRESS, BASE58, BOOL, HEX, STRING, U64, U8};

#[test]
fn test_quick_start() {
    let bcs = Bcs::iota_move();
    bcs.register_alias("UID", ADDRESS).unwrap();
    bcs.register_struct("Coin", [("id", "UID"), ("value", U64)]).unwrap();

    let coin = Value::struct_of([
        (
            "id",
            Value::address("0000000000000000000000000000000000000000000000000000000000000001")
                .unwrap(),
        ),
        ("value", Value::U64(1_000_000)),
    ]);
    let bytes = bcs.serialize("Coin", &coin).unwrap().into_bytes();
    let decoded = bcs.deserialize("Coin", &bytes).unwrap();
    assert_eq!(decoded, coin);

    let some = bcs.serialize("Option<Coin>", &Value::some(decoded)).unwrap();
    assert_eq!(some.as_bytes()[0], 1);
    assert_eq!(&some.as_bytes()[1..], bytes.as_slice());
    assert_eq!(bcs.serialize("Option<Coin>", &Value::none()).unwrap().into_bytes(), vec![0]);
}

#[test]
fn test_u8_vectors_with_both_configs() {
    let val = Value::from(vec![1u8, 2, 3, 4]);

    let bcs = Bcs::iota_move();
    let ser = bcs.serialize("vector<u8>", &val).unwrap().into_bytes();
    assert_eq!(ser, vec![4, 1, 2, 3, 4]);
    assert_eq!(bcs.deserialize("vector<u8>", &ser).unwrap(), val);

    let rust = Bcs::rust();
    let ser = rust.serialize("Vec<u8>", &val).unwrap().into_bytes();
    assert_eq!(ser, vec![4, 1, 2, 3, 4]);
    assert_eq!(rust.deserialize("Vec<u8>", &ser).unwrap(), val);
}

#[test]
fn test_primitive_types() {
    let bcs = Bcs::iota_move();
    assert_eq!(bcs.serialize(U8, &Value::U8(100)).unwrap().into_bytes(), vec![100]);
    assert_eq!(
        bcs.serialize(U64, &Value::U64(1_000_000)).unwrap().to_hex(),
        "40420f0000000000"
    );
    assert_eq!(bcs.serialize(BOOL, &true.into()).unwrap().to_hex(), "01");
    assert_eq!(
        bcs.serialize(STRING, &"this is an ascii string".into())
            .unwrap()
            .as_bytes()[0],
        23
    );

    let matrix = Value::from(vec![vec![0u8, 0, 0], vec![1, 1, 1], vec![2, 2, 2]]);
    assert_eq!(
        bcs.serialize("vector<vector<u8>>", &matrix).unwrap().into_bytes(),
        vec![3, 3, 0, 0, 0, 3, 1, 1, 1, 3, 2, 2, 2]
    );
}

#[test]
fn test_short_address_is_rejected() {
    let bcs = Bcs::iota_move();
    let err = bcs
        .serialize(ADDRESS, &"0000000000000000000000000000000000000001".into())
        .unwrap_err();
    assert_eq!(err, BcsError::AddressLength { expected: 32, actual: 20 });
}

#[test]
fn test_alias_override_changes_encoding() {
    let bcs = Bcs::iota_move();
    bcs.register_alias("ObjectDigest", BASE58).unwrap();
    let b58 = bcs.serialize("ObjectDigest", &"Ldp".into()).unwrap().into_bytes();
    assert_eq!(b58[0] as usize, b58.len() - 1);

    bcs.register_alias("ObjectDigest", HEX).unwrap();
    let hex = bcs.serialize("ObjectDigest", &"C0FFEE".into()).unwrap().into_bytes();
    assert_eq!(hex, vec![3, 0xc0, 0xff, 0xee]);
}

#[test]
fn test_struct_references_struct() {
    let bcs = Bcs::iota_move();
    bcs.register_struct("Balance", [("value", U64)]).unwrap();
    bcs.register_struct("Coin", [("id", ADDRESS), ("balance", "Balance")]).unwrap();

    let bytes = bcs
        .serialize(
            "Coin",
            &Value::struct_of([
                (
                    "id",
                    Value::from("0x0000000000000000000000000000000000000000000000000000000000000005"),
                ),
                (
                    "balance",
                    Value::struct_of([("value", Value::U64(100_000_000))]),
                ),
            ]),
        )
        .unwrap()
        .into_bytes();
    assert_eq!(bytes.len(), 40);
    assert_eq!(bytes[31], 5);
    assert_eq!(&bytes[32..], &100_000_000u64.to_le_bytes());
}

#[test]
fn test_generics() {
    let bcs = Bcs::iota_move();
    bcs.register_struct("Container<T>", [("contents", "T")]).unwrap();

    let hex = bcs
        .serialize(
            TypeRef::generic("Container", [TypeRef::named(U8)]),
            &Value::struct_of([("contents", Value::U8(100))]),
        )
        .unwrap()
        .to_hex();
    assert_eq!(hex, "64");

    let hex = bcs
        .serialize(
            "Container<vector<bool>>",
            &Value::struct_of([("contents", Value::from(vec![true, false, true]))]),
        )
        .unwrap()
        .to_hex();
    assert_eq!(hex, "03010001");

    bcs.register_struct("VecMap<Key, Val>", [("keys", "vector<Key>"), ("values", "vector<Val>")])
        .unwrap();
    let bytes = bcs
        .serialize(
            "VecMap<string, string>",
            &Value::struct_of([
                ("keys", Value::from(vec!["key1", "key2", "key3"])),
                ("values", Value::from(vec!["value1", "value2", "value3"])),
            ]),
        )
        .unwrap()
        .into_bytes();
    assert_eq!(bytes[0], 3);
    assert_eq!(&bytes[1..6], b"\x04key1");
}

#[test]
fn test_enum_with_option() {
    let bcs = Bcs::iota_move();
    bcs.register_enum(
        "TransactionType",
        [("single", Some("vector<u8>")), ("batch", Some("vector<vector<u8>>"))],
    )
    .unwrap();

    let none = bcs.serialize("Option<TransactionType>", &Value::none()).unwrap();
    assert_eq!(none.to_hex(), "00");

    let single = bcs
        .serialize(
            "Option<TransactionType>",
            &Value::some(Value::variant("single", Value::Bytes(vec![1, 2, 3, 4, 5, 6]))),
        )
        .unwrap();
    assert_eq!(single.to_hex(), "010006010203040506");

    let batch = bcs
        .serialize(
            "Option<TransactionType>",
            &Value::some(Value::variant(
                "batch",
                Value::from(vec![vec![1u8, 2, 3, 4, 5, 6], vec![1, 2, 3, 4, 5, 6]]),
            )),
        )
        .unwrap();
    assert_eq!(batch.to_hex(), "0101020601020304050606010203040506");
}

#[test]
fn test_writer_encodings() {
    let bcs = Bcs::iota_move();
    let writer = bcs.serialize(STRING, &"this is a string".into()).unwrap();
    let bytes = writer.to_bytes();
    assert_eq!(bcs.deserialize(STRING, &bytes).unwrap(), Value::from("this is a string"));
    assert_eq!(Encoding::Hex.decode(&writer.to_hex()).unwrap(), bytes);
    assert_eq!(Encoding::Base64.decode(&writer.to_base64()).unwrap(), bytes);
    assert_eq!(Encoding::Base58.decode(&writer.to_base58()).unwrap(), bytes);
}
