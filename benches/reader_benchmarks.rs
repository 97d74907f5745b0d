use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use crash_report_core::{lexer::Lexer, parser::Parser, read_event, to_json, Configuration};
use std::sync::Arc;

// ============================================================================
// Test Data
// ============================================================================

const SMALL_REPORT: &str = r#"{
    "exceptions": [{
        "errorClass": "java.lang.RuntimeException",
        "message": "Whoops",
        "stacktrace": [
            { "method": "a", "file": "A.java", "lineNumber": 2241790.1 },
            { "method": "b", "file": "B.java", "lineNumber": 150000000000 },
            { "method": "c", "file": "C.java", "lineNumber": 761 }
        ]
    }],
    "threads": [{
        "id": 11236722452451234,
        "name": "main",
        "stacktrace": [
            { "method": "loop", "file": "Looper.java", "lineNumber": 160923409125093 },
            { "method": "dispatch", "file": "Handler.java", "lineNumber": 1566.5 }
        ]
    }]
}"#;

// A report with `threads` threads of 32 native frames each.
fn generate_report(threads: usize) -> String {
    let frames: Vec<String> = (0..32u64)
        .map(|i| {
            format!(
                r#"{{ "method": "fn_{i}", "file": "lib.so", "lineNumber": {}, "frameAddress": {} }}"#,
                i * 17,
                140_736_470_159_120 + i * 16
            )
        })
        .collect();
    let stacktrace = frames.join(",");

    let threads: Vec<String> = (0..threads)
        .map(|t| {
            format!(
                r#"{{ "id": {}, "name": "worker-{t}", "stacktrace": [{stacktrace}] }}"#,
                4_294_967_296u64 + t as u64
            )
        })
        .collect();

    format!(
        r#"{{ "exceptions": [{{ "errorClass": "SIGSEGV", "message": "", "stacktrace": [{stacktrace}] }}], "threads": [{}] }}"#,
        threads.join(",")
    )
}

fn config() -> Arc<Configuration> {
    Arc::new(Configuration::new("benchmark"))
}

// ============================================================================
// Lexer Benchmarks
// ============================================================================

fn bench_lexer_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("lexer_thread_scaling");

    for size in [1, 10, 50, 200] {
        let source = generate_report(size);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, src| {
            b.iter(|| {
                let mut lexer = Lexer::new(black_box(src));
                lexer.lex()
            })
        });
    }

    group.finish();
}

// ============================================================================
// Parser Benchmarks
// ============================================================================

fn bench_parser_small(c: &mut Criterion) {
    c.bench_function("parser_small", |b| {
        b.iter(|| {
            let mut parser = Parser::new(black_box(SMALL_REPORT)).unwrap();
            parser.parse_document()
        })
    });
}

fn bench_parser_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser_thread_scaling");

    for size in [1, 10, 50, 200] {
        let source = generate_report(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, src| {
            b.iter(|| {
                let mut parser = Parser::new(black_box(src)).unwrap();
                parser.parse_document()
            })
        });
    }

    group.finish();
}

// ============================================================================
// End-to-End Benchmarks
// ============================================================================

fn bench_e2e_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("e2e_read_event");

    for size in [1, 10, 50, 200] {
        let source = generate_report(size);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, src| {
            b.iter(|| read_event(black_box(src), "benchmark.json", config()))
        });
    }

    group.finish();
}

fn bench_e2e_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("e2e_round_trip");

    for size in [1, 10, 50] {
        let source = generate_report(size);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &source, |b, src| {
            b.iter(|| {
                let event = read_event(black_box(src), "benchmark.json", config()).unwrap();
                to_json(&event).unwrap()
            })
        });
    }

    group.finish();
}

criterion_group!(lexer_benches, bench_lexer_scaling);
criterion_group!(parser_benches, bench_parser_small, bench_parser_scaling);
criterion_group!(e2e_benches, bench_e2e_read, bench_e2e_round_trip);

criterion_main!(lexer_benches, parser_benches, e2e_benches);
