use criterion::{Criterion, criterion_group, criterion_main};
use RustedGraphTutor::function_analysis::config::AnalysisConfig;
use RustedGraphTutor::function_analysis::extrema::get_extrema;
use RustedGraphTutor::function_analysis::function::Function;
use RustedGraphTutor::function_analysis::sampler::Sampler;
use RustedGraphTutor::function_analysis::session::AnalysisSession;
use std::hint::black_box;

fn piecewise() -> Vec<Function> {
    [
        ("(x)**2", "(-3,0)"),
        ("x", "[0,1]"),
        ("sqrt(4 - x**2) + 1/(x - 3)", "(1, 3) U (3, +inf)"),
        ("sin(x)*e(-x/4)", "(-inf, +inf)"),
    ]
    .iter()
    .filter_map(|(expression, domain)| Function::new(expression, domain, (-5.0, 5.0), true).ok())
    .collect()
}

fn bench_fine_sampling(c: &mut Criterion) {
    let functions = piecewise();
    c.bench_function("sample 4 functions at 0.01, cold cache", |b| {
        b.iter(|| Sampler::new().sample_all(black_box(&functions), 0.01, 5.5))
    });
}

fn bench_extrema(c: &mut Criterion) {
    let functions = piecewise();
    let config = AnalysisConfig::default();
    c.bench_function("extrema, warm cache", |b| {
        let mut sampler = Sampler::new();
        b.iter(|| get_extrema(black_box(&functions), &[], &mut sampler, &config))
    });
}

fn bench_range(c: &mut Criterion) {
    let functions = piecewise();
    let session = AnalysisSession::default();
    c.bench_function("range expression", |b| {
        b.iter(|| session.get_range_expression(black_box(&functions), None))
    });
}

criterion_group!(benches, bench_fine_sampling, bench_extrema, bench_range);
criterion_main!(benches);
