// Decodes a few literal buffers and prints what comes out.
use serde_octets::{decode, decode_one, encode, octets};

fn main() {
    // {"null": null, "octets": <01 02 03>, "integer": 12345}
    let sample: &[u8] = &[
        0x03, 0x03, 0x06, 0x04, b'n', b'u', b'l', b'l', 0x00, 0x06, 0x06, b'o', b'c', b't',
        b'e', b't', b's', 0x04, 0x03, 0x01, 0x02, 0x03, 0x06, 0x07, b'i', b'n', b't', b'e',
        b'g', b'e', b'r', 0x07, 0x39, 0x30, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ];

    match decode(sample) {
        Ok(value) => println!("decoded: {value}"),
        Err(err) => println!("decode failed: {err}"),
    }

    // Walk the pairs by offset
    let mut pos = 2;
    for _ in 0..sample[1] {
        let Ok((key, after_key)) = decode_one(sample, pos) else { break };
        let Ok((value, after_value)) = decode_one(sample, after_key) else { break };
        println!("  [{pos:>2}..{after_value:>2}] {key} => {value}");
        pos = after_value;
    }

    let nested = octets!({
        "outer": {
            "inner": b"\x01\x02\x03",
            "value": 42u64
        }
    });
    match encode(&nested) {
        Ok(bytes) => println!("encoded {nested} as {bytes:02x?}"),
        Err(err) => println!("encode failed: {err}"),
    }

    let max = [0x07, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff];
    match decode(&max) {
        Ok(value) => println!("max integer: {value}"),
        Err(err) => println!("decode failed: {err}"),
    }

    // A malformed buffer: unknown tag 0xab inside a mapping
    match decode(&[0x03, 0x01, 0x06, 0x01, b'k', 0xab]) {
        Ok(value) => println!("unexpected success: {value}"),
        Err(err) => println!("rejected: {err} ({})", err.error_type()),
    }
}
