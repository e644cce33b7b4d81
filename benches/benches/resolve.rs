//! Benchmark variable resolution time.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};

use benches::context;
use drip::context::ScopeStack;
use drip::{Context, Environment, Scope, Value};

criterion_main! { benches }
criterion_group! { benches, bench_scope, bench_environment, bench_convert, bench_to_value }

/// Benchmarks resolving a name set in the base scope under empty scopes.
fn bench_scope(c: &mut Criterion) {
    let mut g = c.benchmark_group("scope");

    for depth in [1, 10, 50] {
        g.bench_function(format!("depth/{depth}"), |b| {
            let mut scopes = ScopeStack::with_base(Scope::from_iter([("title", "Hello")]));
            for _ in 1..depth {
                scopes.push(Scope::new());
            }
            let mut ctx = Context::default().with_scopes(scopes);
            b.iter(|| ctx.find_variable("title").unwrap());
        });
    }
}

/// Benchmarks resolving through the environment chain.
fn bench_environment(c: &mut Criterion) {
    let mut g = c.benchmark_group("environment");

    g.bench_function("miss", |b| {
        let envs = context::environments(20);
        let mut ctx = Context::default().with_environments(envs.into_iter().collect());
        b.iter(|| ctx.find_variable("title").unwrap());
    });

    g.bench_function("last", |b| {
        let mut envs = context::environments(20);
        envs.push(Environment::from_iter([("title", "Hello")]));
        let mut ctx = Context::default().with_environments(envs.into_iter().collect());
        b.iter(|| ctx.find_variable("title").unwrap());
    });

    g.bench_function("lazy", |b| {
        b.iter_batched(
            || {
                let mut env = Environment::new();
                env.insert_lazy("title", || Value::from("Hello"));
                let mut ctx = Context::default();
                ctx.push_environment(env);
                ctx
            },
            |mut ctx| ctx.find_variable("title").unwrap(),
            BatchSize::SmallInput,
        );
    });
}

/// Benchmarks converting a host object into its drop.
fn bench_convert(c: &mut Criterion) {
    let mut g = c.benchmark_group("convert");

    g.bench_function("drop", |b| {
        let mut ctx = Context::new(context::registry());
        ctx.set("user", context::host());
        b.iter(|| ctx.find_variable("user").unwrap());
    });
}

/// Benchmarks converting serializable data into a value.
fn bench_to_value(c: &mut Criterion) {
    let mut g = c.benchmark_group("to_value");

    let site = context::random(150);
    g.bench_function("site", |b| {
        b.iter(|| drip::to_value(&site).unwrap());
    });
}
