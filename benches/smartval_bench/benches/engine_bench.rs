//! Validation Engine Benchmarks
//!
//! Measures:
//! - Rule spec parsing
//! - Full record validation as the field count grows
//! - Exact-layout versus auto-detected date resolution
//!
//! Run with: cargo bench --package smartval-bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde::Serialize;
use smartval::{DateTimeResolver, InputRecord, RuleSpec, RuleTable, SmartValidator, ValidationEngine};

#[derive(Debug, Clone, Serialize)]
struct Signup {
    username: String,
    email: String,
    age: String,
    dob: String,
    role: String,
}

fn signup() -> Signup {
    Signup {
        username: "john_doe".into(),
        email: "john.doe@example.com".into(),
        age: "30".into(),
        dob: "1990-01-01".into(),
        role: "admin".into(),
    }
}

fn signup_rules() -> RuleTable {
    RuleTable::new()
        .field("username", "string|required|min:6|max:32")
        .field("email", "email|required")
        .field("age", "int|required|range:18,120")
        .field("dob", "required|format:Y-m-d|before:2010-01-01,Y-m-d")
        .field("role", "string|in:user,admin,editor")
}

fn wide_record(fields: usize) -> (InputRecord, RuleTable) {
    let input = (0..fields).map(|i| (format!("field_{i}"), format!("{}", i * 7))).collect();
    let rules = (0..fields)
        .map(|i| (format!("field_{i}"), "int|required|min:0"))
        .collect();
    (input, rules)
}

fn benchmark_spec_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("spec_parsing");

    for spec in [
        "int",
        "string|required|min:6",
        "nullable|required|format:Y-m-d|after:2000-01-01,Y-m-d|before:2030-12-31,Y-m-d",
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(spec.len()), spec, |b, spec| {
            b.iter(|| black_box(RuleSpec::parse(black_box(spec))));
        });
    }

    group.finish();
}

fn benchmark_validation(c: &mut Criterion) {
    let mut group = c.benchmark_group("validation");

    let data = signup();
    let rules = signup_rules();
    group.bench_function("signup_record", |b| {
        b.iter(|| black_box(SmartValidator::new(black_box(&data), &rules)));
    });

    let engine = ValidationEngine::new();
    for size in [10, 50, 100, 500].iter() {
        let (input, rules) = wide_record(*size);
        group.bench_with_input(BenchmarkId::new("int_fields", size), size, |b, _| {
            b.iter(|| black_box(engine.validate(&input, &rules)));
        });
    }

    group.finish();
}

fn benchmark_dates(c: &mut Criterion) {
    let mut group = c.benchmark_group("dates");
    let resolver = DateTimeResolver::default();

    group.bench_function("explicit_layout", |b| {
        b.iter(|| black_box(resolver.resolve("d-M-Y h:i:s A", black_box("05-Mar-2024 02:30:00 PM"))));
    });

    // Last entry in the auto-detect list, so every layout is tried.
    group.bench_function("auto_detect_worst_case", |b| {
        b.iter(|| black_box(resolver.detect(black_box("05-Mar-2024 02:30:00 PM"))));
    });

    group.bench_function("auto_detect_miss", |b| {
        b.iter(|| black_box(resolver.detect(black_box("not a date"))));
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_spec_parsing,
    benchmark_validation,
    benchmark_dates
);
criterion_main!(benches);
