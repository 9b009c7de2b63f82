use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use spartn::*;

const GAD_FRAME: &str = "7304196203fa205b1fc8310b03d3a4b1db7921cb5c2712a7a8c252fd4afb1a963b642a4ecd86bb317c61def5db3da32c65d5059f1cd996173981a0de78ede7";
const OCB_FRAME: &str = "73000f1308caf083c05b3250250000003a2d7ffe0087fd0a319434b10040bfff5000107ff221fffebaa4";
const BPAC_FRAME: &str = "73060684001f405b961282640933ffd868cb89807e87";
const EAS_FRAME: &str = "73080aa5003e805b1e24013044004488cd115599de2266aaef3377bbfca1a028";

fn bytes(hex: &str) -> Vec<u8> {
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).unwrap())
        .collect()
}

fn log(repeat: usize) -> Vec<u8> {
    let mut data = Vec::new();
    for _ in 0..repeat {
        for frame in [OCB_FRAME, GAD_FRAME, BPAC_FRAME, EAS_FRAME] {
            data.extend(bytes(frame));
        }
    }
    data
}

fn read_all(reader: SpartnReader<&[u8]>) -> usize {
    let mut count = 0;
    for message in reader {
        match message {
            Ok(_message) => count += 1,
            Err(e) => panic!("No errors allowed! got: {:?}", e),
        }
    }
    count
}

pub fn criterion_benchmark(c: &mut Criterion) {
    for repeat in [1, 100, 1000] {
        let data = log(repeat);
        c.bench_function(&format!("read_transport_{}", repeat), |b| {
            b.iter(|| {
                let reader = SpartnReader::new(black_box(data.as_slice()));
                assert_eq!(read_all(reader), 4 * repeat);
            })
        });
    }

    let ocb = bytes(OCB_FRAME);
    let options = DecodeOptions {
        decode: true,
        ..DecodeOptions::default()
    };
    let timetags = Timetags::new();
    c.bench_function("decode_ocb", |b| {
        b.iter(|| {
            let message = SpartnMessage::parse(black_box(&ocb), &options, &timetags).unwrap();
            assert!(message.is_decoded());
        })
    });

    #[cfg(feature = "crypto")]
    {
        use chrono::{TimeZone, Utc};

        let gad = bytes(GAD_FRAME);
        let options = DecodeOptions {
            decode: true,
            key: Some("6b30302427df05b4d98911ebff3a4d95".parse().unwrap()),
            basedate: Utc.with_ymd_and_hms(2023, 6, 27, 22, 3, 0).unwrap().into(),
            ..DecodeOptions::default()
        };
        c.bench_function("decrypt_decode_gad", |b| {
            b.iter(|| {
                let message = SpartnMessage::parse(black_box(&gad), &options, &timetags).unwrap();
                assert_eq!(message.padding(), Some(5));
            })
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
