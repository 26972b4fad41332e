// Criterion benchmarks for MentorLink

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mentorlink::core::{check_conflict, partial_ratio, SearchRanker};
use mentorlink::models::{BookingInterval, BookingStatus, MentorCandidate, ProposedInterval};
use uuid::Uuid;

const SKILLS: [&str; 8] = ["Python", "Rust", "React", "AWS", "SQL", "Figma", "Java", "Kubernetes"];

fn create_candidate(id: usize) -> MentorCandidate {
    MentorCandidate {
        user_id: Uuid::new_v4(),
        name: format!("Mentor {}", id),
        bio: format!("Engineer with {} years of experience helping teams ship", 3 + id % 12),
        skills: vec![
            SKILLS[id % SKILLS.len()].to_string(),
            SKILLS[(id + 3) % SKILLS.len()].to_string(),
        ],
        available: true,
        experience_years: (3 + id % 12) as i32,
        hourly_rate: 60.0 + (id % 10) as f64 * 10.0,
        avatar_url: String::new(),
    }
}

fn create_calendar(mentor_id: Uuid, size: usize) -> Vec<BookingInterval> {
    let day = Utc.with_ymd_and_hms(2026, 1, 5, 8, 0, 0).unwrap();

    (0..size)
        .map(|i| {
            let start = day + Duration::hours(2 * i as i64);
            BookingInterval {
                id: Uuid::new_v4(),
                mentor_id,
                start_time: start,
                end_time: start + Duration::minutes(60),
                status: if i % 4 == 0 { BookingStatus::Cancelled } else { BookingStatus::Scheduled },
            }
        })
        .collect()
}

fn bench_partial_ratio(c: &mut Criterion) {
    let field = "dr. sarah chen phd in computer science with 10+ years in ai/ml machine learning python tensorflow";

    c.bench_function("partial_ratio", |b| {
        b.iter(|| partial_ratio(black_box("tensorflow"), black_box(field)));
    });
}

fn bench_rank(c: &mut Criterion) {
    let ranker = SearchRanker::default();
    let mut group = c.benchmark_group("rank");

    for size in [15, 100, 500] {
        let candidates: Vec<MentorCandidate> = (0..size).map(create_candidate).collect();

        group.bench_with_input(BenchmarkId::from_parameter(size), &candidates, |b, candidates| {
            b.iter(|| ranker.rank(black_box("kubernetes"), black_box(candidates)));
        });
    }

    group.finish();
}

fn bench_check_conflict(c: &mut Criterion) {
    let mentor_id = Uuid::new_v4();
    let mut group = c.benchmark_group("check_conflict");

    for size in [10, 100, 1000] {
        let calendar = create_calendar(mentor_id, size);
        // After the last booking, so every entry is scanned
        let start = calendar[size - 1].end_time + Duration::hours(1);
        let proposed = ProposedInterval {
            mentor_id,
            start_time: start,
            end_time: start + Duration::minutes(45),
        };

        group.bench_with_input(BenchmarkId::from_parameter(size), &calendar, |b, calendar| {
            b.iter(|| check_conflict(black_box(&proposed), black_box(calendar)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_partial_ratio, bench_rank, bench_check_conflict);
criterion_main!(benches);
