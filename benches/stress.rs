use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{Days, NaiveDate, NaiveDateTime};
use ulid::Ulid;

use slotbook::{
    BookingRequest, Engine, MemoryBackend, RetryPolicy, Settings, SlotTime, WorkHours,
};

const PROFESSIONALS: usize = 50;
const DAYS: u64 = 30;
const AVAILABILITY_QUERIES: usize = 5_000;
const BOOKINGS: usize = 2_000;

fn percentile(sorted: &[Duration], p: f64) -> Duration {
    if sorted.is_empty() {
        return Duration::ZERO;
    }
    let idx = ((sorted.len() as f64) * p / 100.0) as usize;
    sorted[idx.min(sorted.len() - 1)]
}

fn print_latency(label: &str, latencies: &mut [Duration]) {
    latencies.sort();
    let total: Duration = latencies.iter().sum();
    let avg = total / latencies.len() as u32;
    println!("  {label}:");
    println!(
        "    n={}, avg={:.3}ms, p50={:.3}ms, p95={:.3}ms, p99={:.3}ms, max={:.3}ms",
        latencies.len(),
        avg.as_secs_f64() * 1000.0,
        percentile(latencies, 50.0).as_secs_f64() * 1000.0,
        percentile(latencies, 95.0).as_secs_f64() * 1000.0,
        percentile(latencies, 99.0).as_secs_f64() * 1000.0,
        latencies.last().unwrap().as_secs_f64() * 1000.0,
    );
}

fn busy_settings() -> Settings {
    Settings {
        work_hours: Some(WorkHours {
            start: "08:00".parse().unwrap(),
            end: "20:00".parse().unwrap(),
        }),
        work_days: (0..=6).collect(),
        ..Default::default()
    }
}

async fn setup(engine: &Engine, base_date: NaiveDate) -> Vec<Ulid> {
    let mut professionals = Vec::with_capacity(PROFESSIONALS);
    for _ in 0..PROFESSIONALS {
        let id = Ulid::new();
        engine.save_settings(id, busy_settings()).await.unwrap();
        professionals.push(id);
    }

    // Pre-book roughly a third of each professional's first week.
    let mut seeded = 0usize;
    for (i, &prof) in professionals.iter().enumerate() {
        for day in 0..7u64 {
            let date = base_date.checked_add_days(Days::new(day)).unwrap();
            for hour in (8..20).step_by(3) {
                let _ = engine
                    .book(BookingRequest {
                        professional_id: prof,
                        client_id: Ulid::new(),
                        service: format!("Service {i}"),
                        date,
                        time: SlotTime::new(hour, 0),
                        price_cents: 10_000,
                        notes: None,
                    })
                    .await;
                seeded += 1;
            }
        }
    }
    println!(
        "  seeded {} professionals, attempted {} bookings",
        professionals.len(),
        seeded
    );
    professionals
}

async fn phase_availability(
    engine: &Engine,
    professionals: &[Ulid],
    base_date: NaiveDate,
    now: NaiveDateTime,
) {
    let mut latencies = Vec::with_capacity(AVAILABILITY_QUERIES);
    for i in 0..AVAILABILITY_QUERIES {
        let prof = professionals[i % professionals.len()];
        let date = base_date
            .checked_add_days(Days::new((i as u64) % DAYS))
            .unwrap();
        let start = Instant::now();
        let slots = engine.available_slots(prof, date, now).await.unwrap();
        latencies.push(start.elapsed());
        assert!(slots.len() <= 24);
    }
    print_latency("availability", &mut latencies);
}

async fn phase_booking(engine: &Engine, professionals: &[Ulid], base_date: NaiveDate) {
    let mut latencies = Vec::with_capacity(BOOKINGS);
    let mut rejected = 0usize;
    for i in 0..BOOKINGS {
        let prof = professionals[i % professionals.len()];
        // Spread bookings over the back half of the window to dodge the seed data.
        let date = base_date
            .checked_add_days(Days::new(7 + (i as u64) % (DAYS - 7)))
            .unwrap();
        let hour = 8 + ((i / professionals.len()) % 12) as u8;
        let start = Instant::now();
        let result = engine
            .book(BookingRequest {
                professional_id: prof,
                client_id: Ulid::new(),
                service: "Bench booking".into(),
                date,
                time: SlotTime::new(hour, 30),
                price_cents: 7_500,
                notes: None,
            })
            .await;
        latencies.push(start.elapsed());
        if result.is_err() {
            rejected += 1;
        }
    }
    println!("  rejected: {rejected}");
    print_latency("booking", &mut latencies);
}

fn main() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .unwrap();

    runtime.block_on(async {
        let engine = Engine::with_retry_policy(
            Arc::new(MemoryBackend::new()),
            RetryPolicy::none(),
        );
        let base_date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let now = base_date.and_hms_opt(0, 0, 0).unwrap();

        println!("phase 0: setup");
        let professionals = setup(&engine, base_date).await;

        println!("phase 1: availability queries");
        phase_availability(&engine, &professionals, base_date, now).await;

        println!("phase 2: bookings");
        phase_booking(&engine, &professionals, base_date).await;
    });
}
