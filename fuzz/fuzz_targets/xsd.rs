#![no_main]
use libfuzzer_sys::fuzz_target;
use xsdres::ParserConfig;

fuzz_target!(|data: &[u8]| {
    let _ = xsdres::parse_bytes(&ParserConfig::default(), data);
    let lax = ParserConfig::default().with_ignore_schema_namespace(true);
    let _ = xsdres::parse_bytes(&lax, data);
});
