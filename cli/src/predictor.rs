use reqwest::multipart::{Form, Part};
use shared::predict::{IMAGE_FIELD, interpret_response};
use shared::{EncodedImage, PredictError, PredictionResult, Predictor};

#[derive(Clone)]
pub struct HttpPredictor {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpPredictor {
    pub fn new(endpoint: impl Into<String>) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("skinscan/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }
}

impl Predictor for HttpPredictor {
    async fn predict(&self, image: &EncodedImage) -> Result<PredictionResult, PredictError> {
        log::info!("submitting {} bytes to {}", image.len(), self.endpoint);

        let part = Part::bytes(image.bytes().to_vec())
            .file_name(image.file_name())
            .mime_str(image.mime())
            .map_err(|e| PredictError::Network(format!("invalid image MIME type: {}", e)))?;
        let form = Form::new().part(IMAGE_FIELD, part);

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PredictError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| PredictError::Network(e.to_string()))?;

        interpret_response(status, &body)
    }
}
