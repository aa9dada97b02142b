#![no_main]

use libfuzzer_sys::fuzz_target;
use qrun::config::Keywords;
use qrun::script::tcl_quote;
use qrun::style::highlight_keywords;
use qrun::verdict::count_occurrences;

fuzz_target!(|data: &[u8]| {
    // Convert bytes to UTF-8 string (ignore invalid UTF-8)
    if let Ok(s) = std::str::from_utf8(data) {
        let quoted = tcl_quote(s);
        assert!(!quoted.is_empty());

        // Highlighting must not change what keyword counting sees once codes are stripped
        let keywords = Keywords::default();
        let shown = highlight_keywords(s, &keywords, true);
        let stripped = shown.replace("\x1b[31m", "").replace("\x1b[32m", "").replace("\x1b[0m", "");
        if !s.contains('\x1b') {
            assert_eq!(stripped, s);
        }
        let _ = count_occurrences(s, &keywords.fail);
    }
});
