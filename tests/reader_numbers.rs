// Reads the stack frame fixture through a temporary file, the way a host
// application hands a persisted report to the reader.
use crash_report_core::{to_json, Configuration, Event, EventReader, NumericToken};
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

fn fixture_path(filename: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(filename)
}

fn read_fixture(filename: &str) -> Event {
    let contents = fs::read(fixture_path(filename))
        .unwrap_or_else(|_| panic!("Failed to read fixture: {filename}"));

    let mut fixture_file = tempfile::Builder::new()
        .prefix("error")
        .suffix(".json")
        .tempfile()
        .expect("Failed to create temp file");
    fixture_file.write_all(&contents).unwrap();
    fixture_file.flush().unwrap();

    let reader = EventReader::new(Arc::new(Configuration::new("key")));
    let file = File::open(fixture_file.path()).unwrap();
    match reader.read_from(file, filename) {
        Ok(event) => event,
        Err(err) => panic!("{:?}", miette::Report::new(err)),
    }
}

#[test]
fn test_exception_stacktrace_numbers() {
    let event = read_fixture("stackframe_numbers.json");
    let stacktrace = event.exceptions()[0].stacktrace();
    assert_eq!(stacktrace.len(), 3);

    match stacktrace[0].line_number() {
        NumericToken::Real(v) => assert!((v - 2_241_790.1).abs() < 0.01),
        other => panic!("expected a real line number, got {other:?}"),
    }
    assert_eq!(
        stacktrace[1].line_number(),
        NumericToken::IntegerWide(150_000_000_000)
    );
    assert_eq!(stacktrace[2].line_number(), NumericToken::IntegerSmall(761));
    assert_eq!(
        stacktrace[2].column_number(),
        Some(NumericToken::IntegerSmall(12))
    );
}

#[test]
fn test_thread_stacktrace_numbers() {
    let event = read_fixture("stackframe_numbers.json");
    let thread = &event.threads()[0];
    assert_eq!(thread.id(), NumericToken::IntegerWide(11_236_722_452_451_234));

    let trace = thread.stacktrace();
    assert_eq!(
        trace[0].line_number(),
        NumericToken::IntegerWide(160_923_409_125_093)
    );
    match trace[1].line_number() {
        NumericToken::Real(v) => assert!((v - 1566.5).abs() < 0.1),
        other => panic!("expected a real line number, got {other:?}"),
    }
}

#[test]
fn test_configuration_is_attached() {
    let event = read_fixture("stackframe_numbers.json");
    assert_eq!(event.config().api_key(), "key");
    assert_eq!(event.context(), Some("MainActivity"));
    assert_eq!(event.unhandled(), Some(true));
}

#[test]
fn test_native_addresses_stay_exact() {
    let event = read_fixture("native_frames.json");
    let exception = &event.exceptions()[0];
    assert_eq!(exception.exception_type(), Some("c"));

    let frames = exception.stacktrace();
    assert_eq!(frames[0].line_number(), NumericToken::IntegerSmall(0));
    assert_eq!(
        frames[0].frame_address(),
        Some(NumericToken::IntegerWide(3_849_839_760))
    );
    assert_eq!(
        frames[1].frame_address(),
        Some(NumericToken::IntegerWide(140_736_470_159_120))
    );
    assert_eq!(
        frames[1].load_address(),
        Some(NumericToken::IntegerWide(140_736_469_000_192))
    );
    assert_eq!(
        frames[1].line_number(),
        NumericToken::IntegerWide(4_194_967_296)
    );
}

#[test]
fn test_fixture_rewrites_with_same_lexemes() {
    let event = read_fixture("stackframe_numbers.json");
    let json = to_json(&event).unwrap();

    for lexeme in [
        "\"lineNumber\":2241790.1",
        "\"lineNumber\":150000000000}",
        "\"lineNumber\":761,",
        "\"id\":11236722452451234",
        "\"lineNumber\":160923409125093",
        "\"lineNumber\":1566.5",
    ] {
        assert!(json.contains(lexeme), "{lexeme} missing from {json}");
    }
}

#[test]
fn test_native_fixture_keeps_report_sections() {
    let event = read_fixture("native_frames.json");
    let json = to_json(&event).unwrap();

    assert!(json.contains("\"duration\":1504.25"), "{json}");
    assert!(
        json.ends_with(r#""breadcrumbs":[],"app":{"versionCode":1,"duration":1504.25,"inForeground":true}}"#),
        "{json}"
    );
    assert!(json.contains("\"frameAddress\":140736470159120"));

    let reread = EventReader::new(Arc::new(Configuration::new("key")))
        .read_str(&json, "rewritten.json")
        .unwrap();
    assert_eq!(reread, event);
}
