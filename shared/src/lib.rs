pub mod acquisition;
pub mod codec;
pub mod config;
pub mod error;
pub mod export;
pub mod predict;
pub mod session;

use serde::{Deserialize, Serialize};

pub use acquisition::{Acquisition, CameraGuard, CameraStream, RawUpload, Source};
pub use codec::{Dimensions, EncodedImage};
pub use config::ClientConfig;
pub use error::{AcquireError, CodecError, ConfigError, ExportError, PredictError, SessionError};
pub use export::{Artifact, ArtifactSink};
pub use predict::Predictor;
pub use session::{Action, Session, SessionState};

/// Body returned by the classification service on `200 OK`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PredictionResult {
    pub class_name: String,
    /// Percentage in `0..=100`.
    pub confidence_score: f64,
}
