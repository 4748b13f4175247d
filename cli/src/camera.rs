use std::path::PathBuf;

use shared::codec;
use shared::{AcquireError, CameraStream, EncodedImage};

/// A camera exposed as a still file that an external grabber keeps current
/// (`fswebcam --loop`, `ffmpeg -update 1`, ...). Each capture reads whatever
/// frame is there at that moment.
#[derive(Debug)]
pub struct SnapshotCamera {
    path: PathBuf,
}

impl SnapshotCamera {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AcquireError> {
        let path = path.into();
        let metadata = std::fs::metadata(&path).map_err(|e| {
            AcquireError::DeviceUnavailable(format!("{}: {}", path.display(), e))
        })?;
        if !metadata.is_file() {
            return Err(AcquireError::DeviceUnavailable(format!(
                "{} is not a snapshot file",
                path.display()
            )));
        }

        log::info!("camera opened at {}", path.display());
        Ok(Self { path })
    }
}

impl CameraStream for SnapshotCamera {
    fn capture_frame(&self) -> Result<EncodedImage, AcquireError> {
        let bytes =
            std::fs::read(&self.path).map_err(|e| AcquireError::Capture(e.to_string()))?;
        Ok(codec::encode_frame(&bytes)?)
    }

    fn release(&mut self) {
        log::info!("camera at {} released", self.path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use shared::Dimensions;

    #[test]
    fn missing_device_is_unavailable() {
        let tmp = tempfile::tempdir().unwrap();

        let err = SnapshotCamera::open(tmp.path().join("video0.jpg")).unwrap_err();
        assert!(matches!(err, AcquireError::DeviceUnavailable(_)));

        let err = SnapshotCamera::open(tmp.path()).unwrap_err();
        assert!(matches!(err, AcquireError::DeviceUnavailable(_)));
    }

    #[test]
    fn capture_reencodes_snapshot_as_jpeg() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("frame.png");
        DynamicImage::ImageRgb8(RgbImage::from_pixel(640, 480, Rgb([90, 60, 50])))
            .save_with_format(&path, ImageFormat::Png)
            .unwrap();

        let camera = SnapshotCamera::open(&path).unwrap();
        let frame = camera.capture_frame().unwrap();

        assert_eq!(frame.mime(), "image/jpeg");
        assert_eq!(frame.dimensions().unwrap(), Dimensions::new(640, 480));
    }

    #[test]
    fn corrupt_snapshot_fails_capture() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), b"garbage").unwrap();

        let camera = SnapshotCamera::open(tmp.path()).unwrap();

        assert!(matches!(
            camera.capture_frame(),
            Err(AcquireError::Codec(_))
        ));
    }
}
