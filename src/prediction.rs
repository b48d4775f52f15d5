use crate::alphabet::AlphabetReference;
use serde::{Deserialize, Deserializer};
use std::fmt;

pub const CONFIDENCE_FALLBACK: &str = "N/A";

/// Response of the classification endpoint. Absent, empty or out-of-range
/// fields deserialize to `None`.
#[derive(Clone, Default, PartialEq, Deserialize)]
pub struct PredictionResult {
    #[serde(default, deserialize_with = "non_blank")]
    pub letter: Option<String>,
    #[serde(default, deserialize_with = "unit_interval")]
    pub confidence: Option<f64>,
    #[serde(default, alias = "image_url", deserialize_with = "non_blank")]
    pub image: Option<String>,
}

impl fmt::Debug for PredictionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PredictionResult")
            .field("letter", &self.letter)
            .field("confidence", &self.confidence)
            .field("image", &self.image.as_deref().map(abbreviate))
            .finish()
    }
}

/// Data URIs run to megabytes; logs keep the head and the length.
fn abbreviate(source: &str) -> String {
    const KEEP: usize = 48;
    if source.chars().count() <= KEEP {
        return source.to_string();
    }
    let head: String = source.chars().take(KEEP).collect();
    format!("{}... ({} bytes)", head, source.len())
}

/// Error body some endpoints send with a failing status.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

fn non_blank<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.trim().is_empty()))
}

fn unit_interval<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.as_f64())
        .filter(|c| c.is_finite() && (0.0..=1.0).contains(c)))
}

/// What the result panel shows for one prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPanel {
    pub letter: String,
    pub confidence: String,
    pub description: String,
    pub image: Option<String>,
}

impl ResultPanel {
    pub fn render(
        prediction: &PredictionResult,
        placeholder_letter: &str,
        alphabet: &AlphabetReference,
    ) -> Self {
        let letter = prediction
            .letter
            .clone()
            .unwrap_or_else(|| placeholder_letter.to_string());

        let confidence = match prediction.confidence {
            Some(confidence) => format!("{:.1}%", confidence * 100.0),
            None => CONFIDENCE_FALLBACK.to_string(),
        };

        let description = alphabet.describe(&letter).to_string();

        Self {
            letter,
            confidence,
            description,
            image: prediction.image.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alphabet::DESCRIPTION_FALLBACK;

    fn parse(json: &str) -> PredictionResult {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_full_response() {
        let prediction = parse(r#"{"letter":"B","confidence":0.873,"image":"data:image/png;base64,AA=="}"#);

        assert_eq!(prediction.letter.as_deref(), Some("B"));
        assert_eq!(prediction.confidence, Some(0.873));
        assert_eq!(prediction.image.as_deref(), Some("data:image/png;base64,AA=="));
    }

    #[test]
    fn test_empty_object() {
        assert_eq!(parse("{}"), PredictionResult::default());
    }

    #[test]
    fn test_blank_and_null_fields_are_absent() {
        let prediction = parse(r#"{"letter":"  ","confidence":null,"image":""}"#);

        assert_eq!(prediction, PredictionResult::default());
    }

    #[test]
    fn test_confidence_out_of_range_is_absent() {
        assert_eq!(parse(r#"{"confidence":1.5}"#).confidence, None);
        assert_eq!(parse(r#"{"confidence":-0.1}"#).confidence, None);
        assert_eq!(parse(r#"{"confidence":"0.5"}"#).confidence, None);
        assert_eq!(parse(r#"{"confidence":0}"#).confidence, Some(0.0));
        assert_eq!(parse(r#"{"confidence":1}"#).confidence, Some(1.0));
    }

    #[test]
    fn test_image_url_alias_and_extra_fields() {
        let prediction = parse(
            r#"{"success":true,"letter":"Unknown","confidence":0.5,"image_url":"/static/uploads/a.jpg"}"#,
        );

        assert_eq!(prediction.letter.as_deref(), Some("Unknown"));
        assert_eq!(prediction.image.as_deref(), Some("/static/uploads/a.jpg"));
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(serde_json::from_str::<PredictionResult>("[1,2]").is_err());
        assert!(serde_json::from_str::<PredictionResult>("<html>").is_err());
    }

    #[test]
    fn test_debug_abbreviates_image() {
        let data_uri = format!("data:image/png;base64,{}", "A".repeat(100_000));
        let prediction = PredictionResult {
            letter: Some("B".to_string()),
            confidence: Some(0.5),
            image: Some(data_uri.clone()),
        };

        let shown = format!("{:?}", prediction);

        assert!(shown.len() < 200);
        assert!(shown.contains("letter: Some(\"B\")"));
        assert!(shown.contains(&format!("({} bytes)", data_uri.len())));

        let short = PredictionResult {
            image: Some("/static/uploads/a.jpg".to_string()),
            ..Default::default()
        };
        assert!(format!("{:?}", short).contains("/static/uploads/a.jpg"));
    }

    #[test]
    fn test_render_empty_uses_fallbacks() {
        let alphabet = AlphabetReference::asl();

        let panel = ResultPanel::render(&PredictionResult::default(), "?", &alphabet);

        assert_eq!(panel.letter, "?");
        assert_eq!(panel.confidence, CONFIDENCE_FALLBACK);
        assert_eq!(panel.description, DESCRIPTION_FALLBACK);
        assert_eq!(panel.image, None);
    }

    #[test]
    fn test_render_letter_and_confidence() {
        let alphabet = AlphabetReference::asl();
        let prediction = PredictionResult {
            letter: Some("B".to_string()),
            confidence: Some(0.873),
            image: None,
        };

        let panel = ResultPanel::render(&prediction, "?", &alphabet);

        assert_eq!(panel.letter, "B");
        assert_eq!(panel.confidence, "87.3%");
        assert_eq!(panel.description, "Flat hand, fingers together, thumb across palm.");
    }

    #[test]
    fn test_render_description_for_every_label() {
        let alphabet = AlphabetReference::asl();

        for label in alphabet.labels() {
            let prediction = PredictionResult {
                letter: Some(label.to_string()),
                ..Default::default()
            };

            let panel = ResultPanel::render(&prediction, "?", &alphabet);

            assert_eq!(Some(panel.description.as_str()), alphabet.lookup(label));
        }

        for label in ["Unknown", "a", "1", "nothing"] {
            let prediction = PredictionResult {
                letter: Some(label.to_string()),
                ..Default::default()
            };

            let panel = ResultPanel::render(&prediction, "?", &alphabet);

            assert_eq!(panel.description, DESCRIPTION_FALLBACK);
        }
    }

    #[test]
    fn test_render_placeholder_is_looked_up() {
        let alphabet = AlphabetReference::asl();

        let panel = ResultPanel::render(&PredictionResult::default(), "A", &alphabet);

        assert_eq!(panel.letter, "A");
        assert_eq!(panel.description, "Closed fist with thumb alongside.");
    }
}
