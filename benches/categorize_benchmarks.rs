use careportal::engine::{categorize, filter_by_search};
use careportal::models::{Appointment, AppointmentStatus};
use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn appointments(n: usize) -> Vec<Appointment> {
    let base = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
    let statuses = AppointmentStatus::KNOWN;

    (0..n)
        .map(|i| {
            let when = base + Duration::hours(i as i64 % 2000);
            let mut a = Appointment::new(
                format!("apt-{i}"),
                when.to_rfc3339(),
                statuses[i % statuses.len()].clone(),
            );
            a.patient_name = Some(format!("Patient {i}"));
            a.clinic_name = Some(format!("Clinic {}", i % 17));
            a
        })
        .collect()
}

fn bench_categorize(c: &mut Criterion) {
    let list = appointments(5_000);
    let now = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap();

    c.bench_function("categorize 5k", |b| {
        b.iter(|| categorize(black_box(&list), black_box(now)))
    });
}

fn bench_search(c: &mut Criterion) {
    let list = appointments(5_000);

    c.bench_function("search 5k", |b| {
        b.iter(|| filter_by_search(black_box(&list), black_box("clinic 3")))
    });
}

criterion_group!(benches, bench_categorize, bench_search);
criterion_main!(benches);
