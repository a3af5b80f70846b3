use serde::Serialize;

use crate::error::DermaScanError;

pub fn to_pretty<T: Serialize>(value: &T) -> Result<String, DermaScanError> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[cfg(test)]
mod tests {
    use super::to_pretty;
    use crate::catalog::DiseaseKind;
    use crate::prediction::{Prediction, PredictionSource};
    use time::OffsetDateTime;

    #[test]
    fn prediction_serializes_without_image_bytes() {
        let prediction = Prediction {
            source: PredictionSource::Live,
            malignant: true,
            disease: DiseaseKind::Melanoma,
            confidence: 0.92,
            multiclass_probabilities: None,
            binary_prediction: Some("Malignant".to_string()),
            final_prediction: Some("MEL".to_string()),
            image: Some(crate::upload::UploadedImage {
                file_name: "lesion.jpg".to_string(),
                mime: "image/jpeg",
                size_bytes: 4,
                bytes: vec![0xFF, 0xD8, 0xFF, 0x00],
            }),
            analyzed_at: OffsetDateTime::UNIX_EPOCH,
        };

        let json = to_pretty(&prediction).expect("prediction json");
        assert!(json.contains("\"source\": \"live\""));
        assert!(json.contains("\"disease\": \"melanoma\""));
        assert!(json.contains("\"file_name\": \"lesion.jpg\""));
        assert!(json.contains("\"size_bytes\": 4"));
        // Raw bytes never reach the JSON output.
        assert!(!json.contains("\"bytes\""));
    }

    #[test]
    fn catalog_entry_serializes_display_fields() {
        let json = to_pretty(DiseaseKind::BasalCell.entry()).expect("entry json");
        assert!(json.contains("\"name\": \"Basal Cell Carcinoma\""));
        assert!(json.contains("\"severity\": \"high\""));
    }
}
