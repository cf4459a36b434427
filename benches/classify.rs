use b64sniff::{Codec, classify};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

fn samples() -> Vec<(&'static str, Vec<u8>)> {
    let mut zip = vec![0x50, 0x4B, 0x03, 0x04];
    zip.extend_from_slice(&[0u8; 26]);
    zip.extend_from_slice(b"ppt/presentation.xml");
    zip.resize(4096, 0x5A);

    let csv: Vec<u8> = "id,name,amount\n"
        .bytes()
        .chain((0..200).flat_map(|i| format!("{i},item{i},{}.50\n", i * 3).into_bytes()))
        .collect();

    let binary: Vec<u8> = (0..4096usize)
        .map(|i| (i.wrapping_mul(0x5DEECE66D).wrapping_add(0xB) >> 16) as u8)
        .collect();

    vec![
        ("pdf", b"%PDF-1.7\n".repeat(100)),
        ("zip_pptx", zip),
        ("csv", csv),
        ("json", br#"{"items": [1, 2, 3], "ok": true}"#.repeat(50)),
        ("plain_text", b"the quick brown fox jumps over the lazy dog ".repeat(100)),
        ("binary", binary),
    ]
}

fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("classify");
    for (name, data) in samples() {
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(name), &data, |b, data| {
            b.iter(|| classify(black_box(data)))
        });
    }
    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let data: Vec<u8> = (0..1_048_576usize).map(|i| (i % 251) as u8).collect();
    let codec = Codec::default();
    let encoded = codec.encode(&data, None, None).unwrap_or_default();

    let mut group = c.benchmark_group("codec");
    group.throughput(Throughput::Bytes(data.len() as u64));
    group.bench_function("encode_1mb", |b| {
        b.iter(|| codec.encode(black_box(&data), None, None))
    });
    group.bench_function("decode_1mb", |b| {
        b.iter(|| codec.decode(black_box(&encoded), None, None))
    });
    group.finish();
}

criterion_group!(benches, bench_classify, bench_codec);
criterion_main!(benches);
