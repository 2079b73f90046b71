//! `TelemetryProvider` implementations.
//!
//! # How CPU usage is measured (for beginners)
//!
//! CPU usage is not a point-in-time value: it is the share of time the CPUs
//! were busy *between two samples*.  `sysinfo` therefore needs one refresh to
//! establish a baseline before its first reading means anything.
//! [`SysinfoTelemetry::new`] takes that baseline immediately, so the first
//! `METRICS:` line a second later already carries a real number.
//!
//! RAM usage is simply `used / total` memory at the moment of the call.

use std::sync::{Mutex, PoisonError};

use sysinfo::System;

use crate::application::broadcast_telemetry::TelemetryProvider;

/// Live readings from the operating system via `sysinfo`.
pub struct SysinfoTelemetry {
    system: Mutex<System>,
}

impl SysinfoTelemetry {
    /// Creates the provider and takes the baseline CPU sample.
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_usage();
        system.refresh_memory();
        Self {
            system: Mutex::new(system),
        }
    }
}

impl Default for SysinfoTelemetry {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryProvider for SysinfoTelemetry {
    fn cpu_percent(&self) -> u8 {
        let mut system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        system.refresh_cpu_usage();
        to_percent(f64::from(system.global_cpu_usage()))
    }

    fn ram_percent(&self) -> u8 {
        let mut system = self.system.lock().unwrap_or_else(PoisonError::into_inner);
        system.refresh_memory();
        ratio_percent(system.used_memory(), system.total_memory())
    }
}

/// Constant readings, for tests and demos.
#[derive(Debug, Clone, Copy)]
pub struct FixedTelemetry {
    pub cpu: u8,
    pub ram: u8,
}

impl FixedTelemetry {
    pub fn new(cpu: u8, ram: u8) -> Self {
        Self { cpu, ram }
    }
}

impl TelemetryProvider for FixedTelemetry {
    fn cpu_percent(&self) -> u8 {
        self.cpu.min(100)
    }

    fn ram_percent(&self) -> u8 {
        self.ram.min(100)
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Rounds and clamps a percentage to `0..=100`.  NaN reads as 0.
fn to_percent(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

fn ratio_percent(used: u64, total: u64) -> u8 {
    if total == 0 {
        return 0;
    }
    to_percent(used as f64 * 100.0 / total as f64)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
