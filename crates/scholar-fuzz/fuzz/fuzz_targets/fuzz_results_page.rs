#![no_main]

use libfuzzer_sys::fuzz_target;
use scholar_api::client::parse_results_page;
use url::Url;

fuzz_target!(|data: &[u8]| {
    // Arbitrary markup must parse to Ok or Err, never panic
    if let Ok(html) = std::str::from_utf8(data) {
        let base = Url::parse("https://scholar.google.com").expect("valid base");
        let _ = parse_results_page(html, &base);
    }
});
