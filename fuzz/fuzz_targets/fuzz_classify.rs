#![no_main]
use b64sniff::classify;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mime = classify(data);
    assert_eq!(mime, classify(data));
});
