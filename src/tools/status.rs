//! MacroMenu Status Tool
//!
//! Provides runtime status information about the MacroMenu service.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;
use crate::models::GenerationResult;

/// Status response structure
#[derive(Debug, Serialize)]
pub struct MacroMenuStatus {
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub database_path: String,
    pub database_size_bytes: Option<u64>,
    pub catalog_source: String,
    pub catalog_foods: usize,
    pub catalog_anchors: usize,
    pub started_at: DateTime<Utc>,
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
    pub meals_generated: u64,
    pub fallbacks_used: u64,
}

/// Tracks service uptime and generation counters
pub struct StatusTracker {
    start_time: Instant,
    started_at: DateTime<Utc>,
    database_path: PathBuf,
    catalog_source: String,
    catalog_foods: usize,
    catalog_anchors: usize,
    meals_generated: AtomicU64,
    fallbacks_used: AtomicU64,
}

impl StatusTracker {
    /// Create a new status tracker
    pub fn new(database_path: PathBuf, catalog_source: String, catalog_foods: usize, catalog_anchors: usize) -> Self {
        Self {
            start_time: Instant::now(),
            started_at: Utc::now(),
            database_path,
            catalog_source,
            catalog_foods,
            catalog_anchors,
            meals_generated: AtomicU64::new(0),
            fallbacks_used: AtomicU64::new(0),
        }
    }

    /// Count generated meals and how many were fallbacks
    pub fn record<'a, I>(&self, meals: I)
    where
        I: IntoIterator<Item = &'a GenerationResult>,
    {
        for meal in meals {
            self.meals_generated.fetch_add(1, Ordering::Relaxed);
            if meal.fallback {
                self.fallbacks_used.fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    /// Get the current status
    pub fn get_status(&self) -> MacroMenuStatus {
        let build_info = BuildInfo::current();

        // Get database size if it exists
        let database_size_bytes = std::fs::metadata(&self.database_path)
            .ok()
            .map(|m| m.len());

        // Get process info
        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        MacroMenuStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            database_path: self.database_path.display().to_string(),
            database_size_bytes,
            catalog_source: self.catalog_source.clone(),
            catalog_foods: self.catalog_foods,
            catalog_anchors: self.catalog_anchors,
            started_at: self.started_at,
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
            meals_generated: self.meals_generated.load(Ordering::Relaxed),
            fallbacks_used: self.fallbacks_used.load(Ordering::Relaxed),
        }
    }
}
