use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jobly::{FieldMapping, JOB_FIELDS, JobFilter, UpdateRequest, compile_job_filter, sql_for_partial_update};

/// An update touching `n` columns: `col0=$1, col1=$2, ...`.
fn update_request(n: usize) -> UpdateRequest {
    (0..n).map(|i| (format!("col{i}"), i as i32)).collect()
}

fn bench_partial_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("partial_update/compile");

    for n in [1, 3, 10, 50] {
        let req = update_request(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &req, |b, req| {
            b.iter(|| {
                let set = sql_for_partial_update(req, &FieldMapping::identity()).unwrap();
                black_box(set.clause());
            });
        });
    }

    group.finish();
}

fn bench_job_update(c: &mut Criterion) {
    let req = UpdateRequest::new()
        .set("title", "Senior Engineer")
        .set("salary", 150_000)
        .set("companyHandle", "c1");
    c.bench_function("partial_update/job_fields", |b| {
        b.iter(|| black_box(sql_for_partial_update(&req, &JOB_FIELDS).unwrap().clause()));
    });
}

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter/compile");

    let filters = [
        ("empty", JobFilter::new()),
        ("min_salary", JobFilter::new().min_salary(100)),
        (
            "all",
            JobFilter::new().title("eng").min_salary(100).has_equity(true),
        ),
    ];
    for (name, filter) in &filters {
        group.bench_with_input(BenchmarkId::from_parameter(name), filter, |b, filter| {
            b.iter(|| black_box(compile_job_filter(filter).unwrap().clause()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_partial_update, bench_job_update, bench_filter);
criterion_main!(benches);
