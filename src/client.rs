//! Client for the remote classification backend.

use tracing::warn;

use crate::error::DermaScanError;
use crate::http;
use crate::prediction::{BackendResponse, Prediction};
use crate::upload::UploadedImage;

const PREDICT_API: &str = "predict";

/// Header that bypasses tunnel interstitial pages (the backend is commonly
/// exposed through an ngrok tunnel during demos).
const TUNNEL_BYPASS_HEADER: (&str, &str) = ("ngrok-skip-browser-warning", "true");

pub struct PredictionClient {
    client: reqwest::Client,
    endpoint: Option<String>,
}

impl PredictionClient {
    pub fn new(endpoint_flag: Option<&str>) -> Result<Self, DermaScanError> {
        Ok(Self {
            client: http::shared_client()?,
            endpoint: http::resolve_endpoint(endpoint_flag),
        })
    }

    #[cfg(test)]
    fn new_for_test(endpoint: Option<String>) -> Result<Self, DermaScanError> {
        Ok(Self {
            client: http::shared_client()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Submits one image for classification.
    ///
    /// A missing endpoint is a configuration error and is returned as such —
    /// it must never be papered over with a demo exemplar. Transport and
    /// parsing failures, by contrast, settle into a fallback record so the
    /// report stays renderable when the backend is unreachable.
    pub async fn submit(&self, image: UploadedImage) -> Result<Prediction, DermaScanError> {
        let Some(endpoint) = self.endpoint.as_deref() else {
            warn!(
                env_var = http::ENDPOINT_ENV,
                "No prediction endpoint configured; refusing to submit"
            );
            return Err(DermaScanError::EndpointNotConfigured {
                env_var: http::ENDPOINT_ENV.to_string(),
            });
        };

        let url = format!("{endpoint}/predict");
        let part = reqwest::multipart::Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(image.mime)?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let resp = match self
            .client
            .post(&url)
            .header(TUNNEL_BYPASS_HEADER.0, TUNNEL_BYPASS_HEADER.1)
            .multipart(form)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(err) => {
                warn!(source = PREDICT_API, error = %err, "Prediction request failed; using fallback result");
                return Ok(Prediction::fallback(image));
            }
        };

        let status = resp.status();
        let bytes = match http::read_limited_body(resp, PREDICT_API).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(source = PREDICT_API, error = %err, "Prediction response unreadable; using fallback result");
                return Ok(Prediction::fallback(image));
            }
        };

        if !status.is_success() {
            warn!(
                source = PREDICT_API,
                status = status.as_u16(),
                body = %http::body_excerpt(&bytes),
                "Prediction backend returned an error; using fallback result"
            );
            return Ok(Prediction::fallback(image));
        }

        match serde_json::from_slice::<BackendResponse>(&bytes) {
            Ok(payload) => Ok(Prediction::from_backend(payload, image)),
            Err(err) => {
                warn!(
                    source = PREDICT_API,
                    error = %err,
                    body = %http::body_excerpt(&bytes),
                    "Prediction response did not parse; using fallback result"
                );
                Ok(Prediction::fallback(image))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::DiseaseKind;
    use crate::prediction::PredictionSource;
    use crate::upload::tests::jpeg_bytes;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn image() -> UploadedImage {
        UploadedImage {
            file_name: "lesion.jpg".to_string(),
            mime: "image/jpeg",
            size_bytes: 32,
            bytes: jpeg_bytes(32),
        }
    }

    #[tokio::test]
    async fn submit_normalizes_live_backend_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .and(header("ngrok-skip-browser-warning", "true"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "binary_prediction": "Malignant",
                "binary_probability": 0.92,
                "final_prediction": "MEL",
                "multiclass_probabilities": {"MEL": 0.8, "BCC": 0.1, "AKIEC": 0.1}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = PredictionClient::new_for_test(Some(server.uri())).unwrap();
        let prediction = client.submit(image()).await.unwrap();

        assert_eq!(prediction.source, PredictionSource::Live);
        assert!(prediction.malignant);
        assert_eq!(prediction.disease, DiseaseKind::Melanoma);
        assert_eq!(prediction.confidence, 0.92);
        assert_eq!(prediction.final_prediction.as_deref(), Some("MEL"));
        assert!(prediction.image.is_some());
    }

    #[tokio::test]
    async fn submit_maps_bcc_label_for_malignant_verdict() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "binary_prediction": "Malignant",
                "binary_probability": 0.71,
                "final_prediction": "BCC"
            })))
            .mount(&server)
            .await;

        let client = PredictionClient::new_for_test(Some(server.uri())).unwrap();
        let prediction = client.submit(image()).await.unwrap();
        assert_eq!(prediction.disease, DiseaseKind::BasalCell);
    }

    #[tokio::test]
    async fn server_error_settles_into_fallback_with_image() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let client = PredictionClient::new_for_test(Some(server.uri())).unwrap();
        let prediction = client.submit(image()).await.unwrap();

        assert_eq!(prediction.source, PredictionSource::Fallback);
        assert!(prediction.image.is_some());
    }

    #[tokio::test]
    async fn unreachable_backend_settles_into_fallback() {
        // Nothing listens on this port.
        let client =
            PredictionClient::new_for_test(Some("http://127.0.0.1:1".to_string())).unwrap();
        let prediction = client.submit(image()).await.unwrap();
        assert_eq!(prediction.source, PredictionSource::Fallback);
    }

    #[tokio::test]
    async fn malformed_body_settles_into_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>tunnel page</html>"))
            .mount(&server)
            .await;

        let client = PredictionClient::new_for_test(Some(server.uri())).unwrap();
        let prediction = client.submit(image()).await.unwrap();
        assert_eq!(prediction.source, PredictionSource::Fallback);
    }

    #[tokio::test]
    async fn missing_endpoint_is_an_error_not_a_fallback() {
        let client = PredictionClient::new_for_test(None).unwrap();
        let err = client.submit(image()).await.unwrap_err();
        assert!(matches!(err, DermaScanError::EndpointNotConfigured { .. }));
    }
}
