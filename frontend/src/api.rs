use gloo_file::Blob;
use gloo_net::http::Request;
use shared::predict::{IMAGE_FIELD, interpret_response};
use shared::{EncodedImage, PredictError, PredictionResult, Predictor};
use web_sys::FormData;

use crate::components::utils::js_error;

/// Browser-side client for the classification service.
#[derive(Clone)]
pub struct ApiClient {
    endpoint: String,
}

impl ApiClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Predictor for ApiClient {
    async fn predict(&self, image: &EncodedImage) -> Result<PredictionResult, PredictError> {
        let form_data = FormData::new().map_err(|e| PredictError::Network(js_error(e)))?;
        let blob = Blob::new_with_options(image.bytes(), Some(image.mime()));
        form_data
            .append_with_blob_and_filename(IMAGE_FIELD, blob.as_ref(), &image.file_name())
            .map_err(|e| PredictError::Network(js_error(e)))?;

        log::info!("submitting {} bytes to {}", image.len(), self.endpoint);

        let response = Request::post(&self.endpoint)
            .body(form_data)
            .map_err(|e| PredictError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| PredictError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PredictError::Network(e.to_string()))?;

        interpret_response(status, &body)
    }
}
