//! Collector output on disk.
//!
//! Each supported collector is a [`Tool`]; a tool knows its file names and
//! which parser reads them. [`RunDir`] resolves the files of one test run.

mod run;

pub use run::{RunData, RunDir};

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use wafdiff_adapters::cadvisor::CAdvisorAdapter;
use wafdiff_adapters::ftw::FtwAdapter;
use wafdiff_adapters::locust::LocustAdapter;
use wafdiff_adapters::{Adapter, AdapterError};
use wafdiff_types::{MetricStore, RunState};

/// A collector whose output can be reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tool {
    /// go-ftw rule tests.
    Ftw,
    /// Locust load tests.
    Locust,
    /// cAdvisor container resource usage.
    CAdvisor,
}

impl Tool {
    pub const ALL: [Tool; 3] = [Tool::Ftw, Tool::Locust, Tool::CAdvisor];

    pub fn name(&self) -> &'static str {
        match self {
            Tool::Ftw => "ftw",
            Tool::Locust => "locust",
            Tool::CAdvisor => "cAdvisor",
        }
    }

    /// File name of the collector output, without the run-state prefix.
    pub fn raw_file(&self) -> &'static str {
        match self {
            Tool::Ftw => "ftw.json",
            Tool::Locust => "locust_stats.csv",
            Tool::CAdvisor => "cAdvisor.json",
        }
    }

    /// File name of the tool's thresholds inside the threshold directory.
    pub fn threshold_file(&self) -> String {
        format!("{}.threshold.json", self.name())
    }

    /// Parse collector output with the tool's adapter.
    pub fn parse(&self, content: &str, state: RunState) -> Result<MetricStore, AdapterError> {
        match self {
            Tool::Ftw => FtwAdapter.parse(content, state),
            Tool::Locust => LocustAdapter.parse(content, state),
            Tool::CAdvisor => CAdvisorAdapter.parse(content, state),
        }
    }

    /// Read and parse a collector output file.
    pub fn load(&self, path: &Path, state: RunState) -> Result<MetricStore, AdapterError> {
        match self {
            Tool::Ftw => FtwAdapter.load(path, state),
            Tool::Locust => LocustAdapter.load(path, state),
            Tool::CAdvisor => CAdvisorAdapter.load(path, state),
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tool {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Tool::ALL
            .into_iter()
            .find(|tool| tool.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown tool {:?} (expected ftw, locust or cAdvisor)", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_names() {
        assert_eq!("ftw".parse::<Tool>().unwrap(), Tool::Ftw);
        assert_eq!("Locust".parse::<Tool>().unwrap(), Tool::Locust);
        assert_eq!("cAdvisor".parse::<Tool>().unwrap(), Tool::CAdvisor);
        assert_eq!(" cadvisor ".parse::<Tool>().unwrap(), Tool::CAdvisor);
        assert!("k6".parse::<Tool>().is_err());
    }

    #[test]
    fn test_file_names() {
        assert_eq!(Tool::CAdvisor.threshold_file(), "cAdvisor.threshold.json");
        assert_eq!(Tool::Locust.raw_file(), "locust_stats.csv");
        assert_eq!(Tool::Ftw.to_string(), "ftw");
    }

    #[test]
    fn test_parse_dispatch() {
        let store = Tool::CAdvisor.parse("[]", RunState::After).unwrap();
        assert_eq!(store.state, RunState::After);
        assert!(store.contains("cpu_total"));

        assert!(Tool::Ftw.parse("[]", RunState::Before).is_err());
    }
}
