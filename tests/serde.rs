// ABOUTME: Integration tests for serde encoding and decoding through the public API.
// ABOUTME: Exercises derived structs, enums, maps and the types the format cannot hold.

use serde::{Deserialize, Serialize};
use serde_octets::{decode, from_slice, octets, to_value, to_vec, Error, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
enum State {
    Idle,
    Seeding { peers: u32 },
    Paused(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Torrent {
    name: String,
    size: u64,
    comment: Option<String>,
    state: State,
    trackers: BTreeMap<String, u16>,
}

fn sample() -> Torrent {
    let mut trackers = BTreeMap::new();
    trackers.insert("udp://a.example".to_string(), 6969);
    trackers.insert("udp://b.example".to_string(), 1337);
    Torrent {
        name: "archive.tar".to_string(),
        size: 1 << 40,
        comment: None,
        state: State::Seeding { peers: 12 },
        trackers,
    }
}

#[test]
fn derived_struct_roundtrip() {
    let original = sample();
    let bytes = to_vec(&original).unwrap();
    let decoded: Torrent = from_slice(&bytes).unwrap();
    assert_eq!(decoded, original);
}

#[test]
fn derived_struct_wire_shape() {
    let bytes = to_vec(&sample()).unwrap();
    let value = decode(&bytes).unwrap();

    let fields: Vec<_> = value
        .as_mapping()
        .unwrap()
        .keys()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(fields, ["name", "size", "comment", "state", "trackers"]);
    assert_eq!(value.get_key("comment"), Some(&Value::Null));
    assert_eq!(
        value.get_key("state"),
        Some(&octets!({ "Seeding": { "peers": 12u64 } }))
    );
}

#[test]
fn enum_variants_roundtrip() {
    for state in [
        State::Idle,
        State::Seeding { peers: 0 },
        State::Paused("disk full".to_string()),
    ] {
        let bytes = to_vec(&state).unwrap();
        assert_eq!(from_slice::<State>(&bytes).unwrap(), state);
    }
}

#[test]
fn value_from_serde_matches_macro() {
    #[derive(Serialize)]
    struct Entry<'a> {
        key: &'a str,
        #[serde(with = "raw")]
        blob: &'a [u8],
        count: u8,
    }

    mod raw {
        pub fn serialize<S: serde::Serializer>(b: &&[u8], s: S) -> Result<S::Ok, S::Error> {
            s.serialize_bytes(b)
        }
    }

    let entry = Entry {
        key: "k",
        blob: &[9, 8, 7],
        count: 3,
    };
    assert_eq!(
        to_value(&entry).unwrap(),
        octets!({ "key": "k", "blob": b"\x09\x08\x07", "count": 3u64 })
    );
}

#[test]
fn unrepresentable_types_fail_cleanly() {
    #[derive(Serialize)]
    struct Reading {
        celsius: f32,
    }

    #[derive(Serialize)]
    struct Offset {
        delta: i32,
    }

    assert_eq!(
        to_vec(&Reading { celsius: 21.5 }),
        Err(Error::Unsupported("floating point"))
    );
    assert_eq!(to_vec(&Offset { delta: -3 }), Err(Error::ValueOutOfRange));
    assert_eq!(to_vec(&Offset { delta: 3 }).unwrap().len(), 2 + 7 + 9);
}

#[test]
fn oversized_fields_fail_at_encode() {
    #[derive(Serialize)]
    struct Note {
        text: String,
    }

    assert_eq!(
        to_vec(&Note { text: "n".repeat(300) }),
        Err(Error::LengthOverflow { length: 300 })
    );

    let big: BTreeMap<u32, ()> = (0..300).map(|i| (i, ())).collect();
    assert_eq!(to_vec(&big), Err(Error::CountOverflow { count: 300 }));
}

#[test]
fn mismatched_types_are_errors() {
    let bytes = to_vec(&"text").unwrap();
    assert!(matches!(from_slice::<u64>(&bytes), Err(Error::Custom(_))));

    let bytes = to_vec(&5u64).unwrap();
    assert!(matches!(from_slice::<String>(&bytes), Err(Error::Custom(_))));
}
