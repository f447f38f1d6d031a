#![no_main]

use libfuzzer_sys::fuzz_target;
use scholar_api::models::{PaperRecord, RawPublication};

fuzz_target!(|data: &[u8]| {
    // Any publication that deserializes must map and serialize cleanly
    if let Ok(raw) = serde_json::from_slice::<RawPublication>(data) {
        let record = PaperRecord::from(raw);
        let _ = serde_json::to_vec(&record).expect("record serializes");
    }
});
