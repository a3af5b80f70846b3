//! Canonical prediction records and backend payload normalization.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::catalog::DiseaseKind;
use crate::upload::UploadedImage;

/// Whether a record came from the live backend or the demo fallback.
///
/// Downstream consumers must be able to tell a fabricated exemplar apart from
/// a genuine prediction, so the tag travels on the record itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PredictionSource {
    Live,
    Fallback,
}

/// The canonical result of one analysis. Replaced wholesale on each new
/// upload; nothing here persists beyond the process.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub source: PredictionSource,
    pub malignant: bool,
    pub disease: DiseaseKind,
    pub confidence: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multiclass_probabilities: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binary_prediction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_prediction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<UploadedImage>,
    #[serde(with = "time::serde::rfc3339")]
    pub analyzed_at: OffsetDateTime,
}

/// Raw response body of `POST {endpoint}/predict`.
#[derive(Debug, Deserialize)]
pub struct BackendResponse {
    pub binary_prediction: String,
    pub binary_probability: f64,
    pub final_prediction: String,
    /// `BTreeMap` keeps pill order deterministic across renders.
    #[serde(default)]
    pub multiclass_probabilities: Option<BTreeMap<String, f64>>,
}

impl Prediction {
    /// Normalizes a backend payload into the canonical record.
    ///
    /// Benign verdicts always resolve to the benign entry; malignant verdicts
    /// resolve through the label table with melanoma as the default.
    pub fn from_backend(payload: BackendResponse, image: UploadedImage) -> Self {
        let malignant = payload.binary_prediction == "Malignant";
        let disease = if malignant {
            DiseaseKind::from_label_code(&payload.final_prediction, DiseaseKind::Melanoma)
        } else {
            DiseaseKind::Benign
        };

        Self {
            source: PredictionSource::Live,
            malignant,
            disease,
            confidence: payload.binary_probability,
            multiclass_probabilities: payload.multiclass_probabilities,
            binary_prediction: Some(payload.binary_prediction),
            final_prediction: Some(payload.final_prediction),
            image: Some(image),
            analyzed_at: OffsetDateTime::now_utc(),
        }
    }

    /// Fixed demo exemplar returned when the backend is unreachable, keeping
    /// the tool demonstrable offline. The submitted image stays attached.
    ///
    /// Selection is deterministic over the image content so repeated runs on
    /// the same file agree.
    pub fn fallback(image: UploadedImage) -> Self {
        let digest = md5::compute(&image.bytes);
        if digest[0] % 2 == 0 {
            Self::fallback_malignant(image)
        } else {
            Self::fallback_benign(image)
        }
    }

    fn fallback_malignant(image: UploadedImage) -> Self {
        Self {
            source: PredictionSource::Fallback,
            malignant: true,
            disease: DiseaseKind::Melanoma,
            confidence: 0.92,
            multiclass_probabilities: None,
            binary_prediction: None,
            final_prediction: None,
            image: Some(image),
            analyzed_at: OffsetDateTime::now_utc(),
        }
    }

    fn fallback_benign(image: UploadedImage) -> Self {
        Self {
            source: PredictionSource::Fallback,
            malignant: false,
            disease: DiseaseKind::Benign,
            confidence: 0.88,
            multiclass_probabilities: None,
            binary_prediction: None,
            final_prediction: None,
            image: Some(image),
            analyzed_at: OffsetDateTime::now_utc(),
        }
    }
}

/// Presentation state for the analysis report. The three variants replace the
/// `(result, is_loading)` pair that could represent "loading and settled" at
/// the same time.
#[derive(Debug, Clone)]
pub enum ReportState {
    Idle,
    Loading,
    Settled(Prediction),
}
