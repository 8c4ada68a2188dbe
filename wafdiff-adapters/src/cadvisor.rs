//! cAdvisor container resource samples.
//!
//! The collector stores the de-duplicated `stats` entries returned by the
//! cAdvisor v1.1 container API as a JSON array, one element per sample.

use serde::Deserialize;
use wafdiff_types::{DataItem, MetricStore, RunState};

use crate::{Adapter, AdapterError};

pub const CPU_TOTAL: &str = "cpu_total";
pub const CPU_USER: &str = "cpu_user";
pub const CPU_SYSTEM: &str = "cpu_system";
pub const MEMORY_USAGE: &str = "memory_usage";
pub const MEMORY_CACHE: &str = "memory_cache";

/// Every metric produced by this adapter, in display order.
pub const METRICS: [&str; 5] = [CPU_TOTAL, CPU_USER, CPU_SYSTEM, MEMORY_USAGE, MEMORY_CACHE];

#[derive(Debug, Deserialize)]
struct Sample {
    timestamp: String,
    cpu: CpuStats,
    memory: MemoryStats,
}

#[derive(Debug, Deserialize)]
struct CpuStats {
    usage: CpuUsage,
}

#[derive(Debug, Deserialize)]
struct CpuUsage {
    total: f64,
    user: f64,
    system: f64,
}

#[derive(Debug, Deserialize)]
struct MemoryStats {
    usage: f64,
    cache: f64,
}

/// Adapter for stored cAdvisor stats samples.
#[derive(Debug, Clone, Copy, Default)]
pub struct CAdvisorAdapter;

impl Adapter for CAdvisorAdapter {
    fn name(&self) -> &'static str {
        "cAdvisor"
    }

    fn parse(&self, content: &str, state: RunState) -> Result<MetricStore, AdapterError> {
        let samples: Vec<Sample> = serde_json::from_str(content)?;
        let mut store = MetricStore::new(state);
        for metric in METRICS {
            store.ensure(metric);
        }

        for sample in &samples {
            let values = [
                (CPU_TOTAL, sample.cpu.usage.total),
                (CPU_USER, sample.cpu.usage.user),
                (CPU_SYSTEM, sample.cpu.usage.system),
                (MEMORY_USAGE, sample.memory.usage),
                (MEMORY_CACHE, sample.memory.cache),
            ];
            for (metric, value) in values {
                store.push(metric, DataItem::new(sample.timestamp.as_str(), value));
            }
        }

        Ok(store)
    }
}
