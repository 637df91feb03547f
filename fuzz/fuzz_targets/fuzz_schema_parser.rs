#![no_main]

use libfuzzer_sys::fuzz_target;
use pqwrite::schema::SchemaDefinition;

fuzz_target!(|data: &[u8]| {
    // Schema text is UTF-8; anything else is rejected before parsing
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    // Parsing must either succeed or fail with an error, never panic
    if let Ok(schema) = SchemaDefinition::parse(text) {
        // A valid schema prints back to text that parses to the same schema
        let printed = schema.to_string();
        let reparsed = SchemaDefinition::parse(&printed).expect("printed schema must parse");
        assert_eq!(schema, reparsed);

        let _ = schema.to_schema_elements();
        let _ = schema.columns();
    }
});
