#![no_main]

use libfuzzer_sys::fuzz_target;
use storyscroll_web::session_record::SessionTrace;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Parsing must never panic; anything accepted must re-export and parse
    // back to the same records.
    if let Ok(trace) = SessionTrace::from_jsonl(text) {
        let again = SessionTrace::from_jsonl(&trace.to_jsonl());
        assert_eq!(again.map(|t| t.records.len()), Ok(trace.records.len()));
    }
});
