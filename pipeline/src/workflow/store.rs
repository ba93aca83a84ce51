use std::fs;
use std::path::Path;
use std::time::SystemTime;

/// Decides whether a derived artifact from a previous run can be reused, so
/// re-running the batch only regenerates what changed.
pub trait OutputStore {
    fn up_to_date(&self, input: &Path, output: &Path) -> bool;
}

/// Modification-time check against the filesystem. `overwrite` forces
/// regeneration regardless of timestamps.
pub struct FsStore {
    overwrite: bool,
}

impl FsStore {
    pub fn new(overwrite: bool) -> Self {
        Self { overwrite }
    }
}

fn modified(path: &Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|metadata| metadata.modified()).ok()
}

impl OutputStore for FsStore {
    fn up_to_date(&self, input: &Path, output: &Path) -> bool {
        if self.overwrite {
            return false;
        }
        match (modified(input), modified(output)) {
            (Some(input_time), Some(output_time)) => output_time >= input_time,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn missing_output_is_stale() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        fs::write(&input, "data").unwrap();

        let store = FsStore::new(false);
        assert!(!store.up_to_date(&input, &dir.path().join("output.txt")));
    }

    #[test]
    fn output_written_after_input_is_fresh() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let output = dir.path().join("output.txt");
        fs::write(&input, "data").unwrap();
        fs::write(&output, "derived").unwrap();

        let store = FsStore::new(false);
        assert!(store.up_to_date(&input, &output));
    }

    #[test]
    fn overwrite_forces_regeneration() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let output = dir.path().join("output.txt");
        fs::write(&input, "data").unwrap();
        fs::write(&output, "derived").unwrap();

        let store = FsStore::new(true);
        assert!(!store.up_to_date(&input, &output));
    }
}
