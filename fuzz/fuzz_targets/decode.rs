#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|output: &[u8]| {
    if let Ok(res) = curl_h1::parse(output) {
        // Whatever parses must parse the same way twice.
        assert_eq!(curl_h1::parse(output).ok(), Some(res));
    }
});
