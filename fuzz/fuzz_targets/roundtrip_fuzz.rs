#![no_main]
use libfuzzer_sys::fuzz_target;
use lzgreedy::engine::{self, ParseOptions};
use lzgreedy::ops::{MAX_MATCH_LEN, Operation};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First byte picks the level and a small window, the rest is input.
    let flags = data[0];
    let payload = &data[1..];
    let opts = ParseOptions {
        level: u32::from(flags % 10),
        dict_size: Some(64 << (flags >> 5)),
        buffer_size: Some(MAX_MATCH_LEN + 1 + usize::from(flags & 0x1f)),
        chunk_size: 1 + usize::from(flags & 0x3f),
    };

    let (ops, stats) = engine::parse_with_options(payload, &opts).unwrap();
    assert_eq!(stats.bytes_in, payload.len() as u64);
    for op in &ops {
        if let Operation::Match(m) = op {
            assert!(m.distance <= 64 << (flags >> 5));
        }
    }

    let decoded = engine::decode(&ops).unwrap();
    assert_eq!(decoded, payload);
});
