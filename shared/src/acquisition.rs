use strum::Display;

use crate::codec::{self, Dimensions, EncodedImage};
use crate::error::{AcquireError, CodecError};

/// Which path produced the current image. Decides the export format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Source {
    Camera,
    Upload,
}

/// The image currently held by a session, tagged by how it arrived.
#[derive(Debug, Clone, PartialEq)]
pub enum Acquisition {
    /// Full-resolution frame snapshotted from the live camera.
    Camera { frame: EncodedImage },
    /// Uploaded file, already resized for submission.
    Upload {
        image: EncodedImage,
        file_name: Option<String>,
    },
}

impl Acquisition {
    pub fn source(&self) -> Source {
        match self {
            Acquisition::Camera { .. } => Source::Camera,
            Acquisition::Upload { .. } => Source::Upload,
        }
    }

    pub fn image(&self) -> &EncodedImage {
        match self {
            Acquisition::Camera { frame } => frame,
            Acquisition::Upload { image, .. } => image,
        }
    }
}

/// A live camera feed.
///
/// Obtaining one is platform specific (`getUserMedia` in the browser, a
/// snapshot device on the command line); sessions only need to snapshot and
/// stop it.
pub trait CameraStream {
    /// Snapshots the current frame as JPEG at the device's native resolution.
    fn capture_frame(&self) -> Result<EncodedImage, AcquireError>;

    /// Stops every track of the stream.
    fn release(&mut self);
}

/// Owns a [`CameraStream`] and stops it exactly once, either through
/// [`CameraGuard::release`] or on drop.
#[derive(Debug)]
pub struct CameraGuard<S: CameraStream> {
    stream: Option<S>,
}

impl<S: CameraStream> CameraGuard<S> {
    pub fn new(stream: S) -> Self {
        Self {
            stream: Some(stream),
        }
    }

    pub fn stream(&self) -> Option<&S> {
        self.stream.as_ref()
    }

    pub fn is_held(&self) -> bool {
        self.stream.is_some()
    }

    pub fn capture_frame(&self) -> Result<EncodedImage, AcquireError> {
        match &self.stream {
            Some(stream) => stream.capture_frame(),
            None => Err(AcquireError::DeviceUnavailable("camera already released".into())),
        }
    }

    pub fn release(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            stream.release();
            log::debug!("camera released");
        }
    }
}

impl<S: CameraStream> From<S> for CameraGuard<S> {
    fn from(stream: S) -> Self {
        Self::new(stream)
    }
}

impl<S: CameraStream> Drop for CameraGuard<S> {
    fn drop(&mut self) {
        self.release();
    }
}

/// A file picked by the user, not yet resized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUpload {
    pub file_name: Option<String>,
    /// MIME type reported by the picker; sniffed from the bytes when absent.
    pub mime: Option<String>,
    pub bytes: Vec<u8>,
}

impl RawUpload {
    pub fn new(file_name: Option<String>, mime: Option<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name,
            mime,
            bytes,
        }
    }

    pub fn normalize(&self, limits: Dimensions) -> Result<Acquisition, CodecError> {
        let mime = self.mime.as_deref().filter(|mime| !mime.is_empty());
        let image = codec::resize(&self.bytes, mime, limits)?;
        Ok(Acquisition::Upload {
            image,
            file_name: self.file_name.clone(),
        })
    }
}
