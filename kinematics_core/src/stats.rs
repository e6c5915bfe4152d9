//! In-process operation counters served by the server's `/stats` endpoint.
//! Atomic totals for the hot path, plus a small mutex-guarded per-route
//! breakdown — read far more often than written.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Instant;

#[derive(Debug, Default, Serialize)]
pub struct StatsSnapshot {
    pub requests_total: u64,
    pub errors_total: u64,
    pub solve_time_us_sum: u64,
    pub solve_time_us_count: u64,
    pub average_solve_time_us: f64,
    pub uptime_seconds: u64,
    pub requests_per_route: HashMap<String, u64>,
}

#[derive(Debug)]
pub struct Stats {
    requests_total: AtomicU64,
    errors_total: AtomicU64,
    solve_time_us_sum: AtomicU64,
    solve_time_us_count: AtomicU64,
    requests_per_route: Mutex<HashMap<String, u64>>,
    started_at: Instant,
}

impl Default for Stats {
    fn default() -> Self {
        Stats::new()
    }
}

impl Stats {
    pub fn new() -> Self {
        Stats {
            requests_total: AtomicU64::new(0),
            errors_total: AtomicU64::new(0),
            solve_time_us_sum: AtomicU64::new(0),
            solve_time_us_count: AtomicU64::new(0),
            requests_per_route: Mutex::new(HashMap::new()),
            started_at: Instant::now(),
        }
    }

    /// Record one call to `route`, marking it as failed when `ok` is
    /// `false` and folding `elapsed_us` into the running solve-time average.
    pub fn record(&self, route: &str, ok: bool, elapsed_us: u64) {
        self.requests_total.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.errors_total.fetch_add(1, Ordering::Relaxed);
        }
        self.solve_time_us_sum.fetch_add(elapsed_us, Ordering::Relaxed);
        self.solve_time_us_count.fetch_add(1, Ordering::Relaxed);

        let mut per_route = self.requests_per_route.lock().expect("stats mutex poisoned");
        *per_route.entry(route.to_string()).or_insert(0) += 1;
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let sum = self.solve_time_us_sum.load(Ordering::Relaxed);
        let count = self.solve_time_us_count.load(Ordering::Relaxed);
        let average_solve_time_us = if count > 0 {
            sum as f64 / count as f64
        } else {
            0.0
        };

        StatsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            errors_total: self.errors_total.load(Ordering::Relaxed),
            solve_time_us_sum: sum,
            solve_time_us_count: count,
            average_solve_time_us,
            uptime_seconds: self.started_at.elapsed().as_secs(),
            requests_per_route: self
                .requests_per_route
                .lock()
                .expect("stats mutex poisoned")
                .clone(),
        }
    }
}
