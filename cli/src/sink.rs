use std::path::{Path, PathBuf};

use shared::{Artifact, ArtifactSink, ExportError};

/// Saves artifacts as files inside a directory, creating it on first use.
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    saved: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            saved: Vec::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn saved(&self) -> &[PathBuf] {
        &self.saved
    }
}

impl ArtifactSink for DirectorySink {
    fn save(&mut self, artifact: &Artifact) -> Result<(), ExportError> {
        std::fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.bytes).map_err(|e| ExportError::Save {
            file_name: path.display().to_string(),
            reason: e.to_string(),
        })?;

        log::info!("saved {} ({} bytes)", path.display(), artifact.bytes.len());
        self.saved.push(path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_artifact() -> Artifact {
        Artifact {
            file_name: "results.txt".into(),
            mime: "text/plain",
            bytes: b"Prediction: benign\nConfidence Score: 92.5%".to_vec(),
        }
    }

    #[test]
    fn writes_into_nested_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(tmp.path().join("exports/today"));

        sink.save(&text_artifact()).unwrap();

        let path = tmp.path().join("exports/today/results.txt");
        assert_eq!(sink.saved(), [path.clone()]);
        assert_eq!(
            std::fs::read_to_string(path).unwrap(),
            "Prediction: benign\nConfidence Score: 92.5%"
        );
    }

    #[test]
    fn saving_again_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(tmp.path());

        sink.save(&text_artifact()).unwrap();
        sink.save(&text_artifact()).unwrap();

        assert_eq!(sink.saved().len(), 2);
        assert_eq!(std::fs::read_dir(sink.dir()).unwrap().count(), 1);
    }

    #[test]
    fn unwritable_target_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("taken");
        std::fs::write(&blocker, b"file, not a directory").unwrap();
        let mut sink = DirectorySink::new(&blocker);

        assert!(sink.save(&text_artifact()).is_err());
        assert!(sink.saved().is_empty());
    }
}
