#![no_main]

use libfuzzer_sys::fuzz_target;
use zune_core::options::DecoderOptions;

fuzz_target!(|data: &[u8]| {
    let options = DecoderOptions::default()
        .set_max_width(1 << 10)
        .set_max_height(1 << 10)
        .set_confirm_checksum(false);
    let mut decoder = zune_tic::TicDecoder::new_with_options(data, options);
    let _ = decoder.decode();
});
