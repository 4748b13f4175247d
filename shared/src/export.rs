use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::PredictionResult;
use crate::acquisition::Acquisition;
use crate::error::ExportError;

pub const RESULTS_FILE_NAME: &str = "results.txt";
pub const IMAGE_ENTRY_NAME: &str = "image.jpeg";
pub const ARCHIVE_FILE_NAME: &str = "results_and_image.zip";

/// A finished export, ready to be handed to a save action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Where artifacts end up: a browser download, a directory on disk.
pub trait ArtifactSink {
    fn save(&mut self, artifact: &Artifact) -> Result<(), ExportError>;
}

pub fn results_text(result: &PredictionResult) -> String {
    format!(
        "Prediction: {}\nConfidence Score: {}%",
        result.class_name, result.confidence_score
    )
}

/// Uploads export the text alone; camera captures bundle it with the frame.
pub fn build_artifact(
    result: &PredictionResult,
    acquisition: &Acquisition,
) -> Result<Artifact, ExportError> {
    let text = results_text(result);

    match acquisition {
        Acquisition::Upload { .. } => Ok(Artifact {
            file_name: RESULTS_FILE_NAME.to_string(),
            mime: "text/plain",
            bytes: text.into_bytes(),
        }),
        Acquisition::Camera { frame } => {
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            let mut writer = ZipWriter::new(Cursor::new(Vec::new()));

            writer.start_file(RESULTS_FILE_NAME, options)?;
            writer.write_all(text.as_bytes())?;
            writer.start_file(IMAGE_ENTRY_NAME, options)?;
            writer.write_all(frame.bytes())?;

            let bytes = writer.finish()?.into_inner();
            log::debug!("built {} ({} bytes)", ARCHIVE_FILE_NAME, bytes.len());

            Ok(Artifact {
                file_name: ARCHIVE_FILE_NAME.to_string(),
                mime: "application/zip",
                bytes,
            })
        }
    }
}
