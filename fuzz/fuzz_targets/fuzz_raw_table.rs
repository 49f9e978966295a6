#![no_main]

use libfuzzer_sys::fuzz_target;
use omicsjoin::identifier::RuleSet;
use omicsjoin::raw::RawTable;
use omicsjoin::shaper::TableShaper;
use omicsjoin::table::{ColumnKey, DataType};
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must parse or fail cleanly, never panic
    let raw = match RawTable::from_reader(Cursor::new(data), b'\t', "fuzz") {
        Ok(raw) => raw,
        Err(_) => return,
    };
    let id_column = match raw.headers().first() {
        Some(first) => first.clone(),
        None => return,
    };

    let rules = RuleSet::new("fuzz");
    let shaper = TableShaper::new(DataType::Transcriptomics, &rules).id_columns([id_column.as_str()]);
    let _ = shaper.shape(&raw, |raw, row| Ok(Some(ColumnKey::flat(raw.value(row, 0)))));
});
