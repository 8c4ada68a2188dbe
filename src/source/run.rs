//! Files of one test run.

use std::path::{Path, PathBuf};

use wafdiff_adapters::AdapterError;
use wafdiff_types::{MetricStore, RunState};

use super::Tool;

/// Collector output loaded for one tool.
#[derive(Debug, Clone, PartialEq)]
pub enum RunData {
    /// Before and after stores, ready to compare.
    Pair {
        before: MetricStore,
        after: MetricStore,
    },
    /// A single state-less file from older collector runs. Only summaries
    /// can be rendered from it.
    Legacy(MetricStore),
}

/// The directory holding one test's collector output:
/// `<raw-output>/<test-name>/<state>_<raw file>`.
#[derive(Debug, Clone)]
pub struct RunDir {
    path: PathBuf,
}

impl RunDir {
    pub fn new<P: AsRef<Path>>(raw_output: P, test_name: &str) -> Self {
        Self {
            path: raw_output.as_ref().join(test_name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of a tool's output for one run-state.
    pub fn raw_path(&self, tool: Tool, state: RunState) -> PathBuf {
        self.path.join(format!("{}_{}", state.tag(), tool.raw_file()))
    }

    /// Path of a tool's state-less output.
    pub fn legacy_path(&self, tool: Tool) -> PathBuf {
        self.path.join(tool.raw_file())
    }

    /// Load both run-states for a tool.
    ///
    /// go-ftw falls back to a legacy state-less file when neither state file
    /// exists.
    pub fn load(&self, tool: Tool) -> Result<RunData, AdapterError> {
        let before_path = self.raw_path(tool, RunState::Before);
        let after_path = self.raw_path(tool, RunState::After);

        if tool == Tool::Ftw && !before_path.exists() && !after_path.exists() {
            let legacy = self.legacy_path(tool);
            if legacy.exists() {
                tracing::info!("{}: using state-less output {}", tool, legacy.display());
                return tool.load(&legacy, RunState::After).map(RunData::Legacy);
            }
        }

        Ok(RunData::Pair {
            before: tool.load(&before_path, RunState::Before)?,
            after: tool.load(&after_path, RunState::After)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const FTW: &str = r#"{"run": 1, "success": ["920100-1"], "failed": [], "skipped": [],
        "runtime": {"920100-1": 0.2}, "TotalTime": 0.2}"#;

    #[test]
    fn test_paths() {
        let dir = RunDir::new("/data", "baseline");
        assert_eq!(dir.path(), Path::new("/data/baseline"));
        assert_eq!(
            dir.raw_path(Tool::Locust, RunState::Before),
            PathBuf::from("/data/baseline/before_locust_stats.csv")
        );
        assert_eq!(
            dir.raw_path(Tool::CAdvisor, RunState::After),
            PathBuf::from("/data/baseline/after_cAdvisor.json")
        );
        assert_eq!(dir.legacy_path(Tool::Ftw), PathBuf::from("/data/baseline/ftw.json"));
    }

    #[test]
    fn test_load_pair() {
        let root = TempDir::new().unwrap();
        let run = RunDir::new(root.path(), "t1");
        fs::create_dir_all(run.path()).unwrap();
        fs::write(run.raw_path(Tool::Ftw, RunState::Before), FTW).unwrap();
        fs::write(run.raw_path(Tool::Ftw, RunState::After), FTW).unwrap();

        match run.load(Tool::Ftw).unwrap() {
            RunData::Pair { before, after } => {
                assert_eq!(before.state, RunState::Before);
                assert_eq!(after.state, RunState::After);
                assert_eq!(before.items("success").len(), 1);
            }
            other => panic!("expected a pair, got {:?}", other),
        }
    }

    #[test]
    fn test_legacy_ftw_file() {
        let root = TempDir::new().unwrap();
        let run = RunDir::new(root.path(), "t1");
        fs::create_dir_all(run.path()).unwrap();
        fs::write(run.legacy_path(Tool::Ftw), FTW).unwrap();

        assert!(matches!(run.load(Tool::Ftw).unwrap(), RunData::Legacy(_)));
    }

    #[test]
    fn test_missing_files() {
        let root = TempDir::new().unwrap();
        let run = RunDir::new(root.path(), "t1");
        let err = run.load(Tool::CAdvisor).unwrap_err();
        assert!(matches!(err, AdapterError::Io { .. }));
        assert!(err.to_string().contains("before_cAdvisor.json"));
    }
}
