use std::future::Future;

use crate::PredictionResult;
use crate::codec::EncodedImage;
use crate::error::PredictError;

/// Multipart form field carrying the image bytes.
pub const IMAGE_FIELD: &str = "image";

/// Remote classifier. One call per image, never retried.
pub trait Predictor {
    fn predict(
        &self,
        image: &EncodedImage,
    ) -> impl Future<Output = Result<PredictionResult, PredictError>>;
}

/// Maps a raw HTTP status and body onto a prediction. Anything other than
/// `200` is a service failure.
pub fn interpret_response(status: u16, body: &str) -> Result<PredictionResult, PredictError> {
    if status != 200 {
        return Err(PredictError::Service {
            status,
            body: body.to_string(),
        });
    }

    let result: PredictionResult =
        serde_json::from_str(body).map_err(|e| PredictError::InvalidResponse(e.to_string()))?;

    if !(0.0..=100.0).contains(&result.confidence_score) {
        log::warn!(
            "confidence score {} for {} is outside 0-100",
            result.confidence_score,
            result.class_name
        );
    }

    Ok(result)
}
