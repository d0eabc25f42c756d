//! Input resolver: normalizes the two request encodings into one canonical
//! request plus its cost estimate, or fails fast.

use fitroom_core::config::Pricing;
use fitroom_core::types::{
    CostEstimate, FormTryOn, ImageSource, JsonTryOn, TryOnInput, TryOnRequest,
};

use crate::types::PipelineError;

/// Canonical request with its pre-computed charge.
#[derive(Debug, Clone)]
pub struct ResolvedRequest {
    pub request: TryOnRequest,
    pub estimate: CostEstimate,
}

/// Validate and normalize a request in either encoding.
///
/// Validation order: human image source first, then garment input. The cost
/// estimate depends only on the resolved content, never on the encoding.
pub fn resolve(input: TryOnInput, pricing: &Pricing) -> Result<ResolvedRequest, PipelineError> {
    let (human, garment, description, garment_type) = match input {
        TryOnInput::Form(form) => flatten_form(form),
        TryOnInput::Json(body) => flatten_json(body),
    };

    let human = human.ok_or_else(|| PipelineError::Validation("missing human image".into()))?;

    if garment.is_none() && description.is_none() {
        return Err(PipelineError::Validation("missing garment input".into()));
    }

    let needs_generation = garment.is_none() && description.is_some();
    let estimate = CostEstimate::new(pricing, needs_generation);

    Ok(ResolvedRequest {
        request: TryOnRequest {
            human,
            garment,
            description,
            garment_type,
        },
        estimate,
    })
}

type Flattened = (
    Option<ImageSource>,
    Option<ImageSource>,
    Option<String>,
    fitroom_core::GarmentType,
);

/// Binary-capable encoding: attachments win over URLs, garment URL wins over
/// a description.
fn flatten_form(form: FormTryOn) -> Flattened {
    let human = form
        .human_image
        .map(ImageSource::Binary)
        .or_else(|| non_blank(form.human_image_url).map(ImageSource::Url));

    let garment = form
        .garment_image
        .map(ImageSource::Binary)
        .or_else(|| non_blank(form.garment_image_url).map(ImageSource::Url));

    (
        human,
        garment,
        non_blank(form.garment_description),
        form.garment_type,
    )
}

/// Text-only encoding: all fields are strings.
fn flatten_json(body: JsonTryOn) -> Flattened {
    (
        non_blank(body.human_image_url).map(ImageSource::Url),
        non_blank(body.garment_image_url).map(ImageSource::Url),
        non_blank(body.garment_description),
        body.garment_type,
    )
}

/// Whitespace-only strings count as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitroom_core::types::Attachment;
    use fitroom_core::GarmentType;
    use rust_decimal_macros::dec;

    fn pricing() -> Pricing {
        Pricing::default()
    }

    fn attachment() -> Attachment {
        Attachment {
            bytes: vec![1, 2, 3],
            content_type: Some("image/jpeg".into()),
            file_name: Some("a.jpg".into()),
        }
    }

    fn json(human: Option<&str>, garment: Option<&str>, description: Option<&str>) -> TryOnInput {
        TryOnInput::Json(JsonTryOn {
            human_image_url: human.map(String::from),
            garment_image_url: garment.map(String::from),
            garment_description: description.map(String::from),
            garment_type: GarmentType::default(),
        })
    }

    #[test]
    fn missing_human_image_fails_first() {
        let err = resolve(json(None, None, None), &pricing()).unwrap_err();
        match err {
            PipelineError::Validation(msg) => assert_eq!(msg, "missing human image"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn missing_garment_input_fails() {
        let err = resolve(json(Some("https://x/h.jpg"), None, None), &pricing()).unwrap_err();
        match err {
            PipelineError::Validation(msg) => assert_eq!(msg, "missing garment input"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn blank_fields_count_as_absent() {
        let err = resolve(
            json(Some("https://x/h.jpg"), Some("  "), Some("\t")),
            &pricing(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Validation(_)));
    }

    #[test]
    fn garment_url_skips_generation() {
        let resolved = resolve(
            json(Some("https://x/h.jpg"), Some("https://x/g.jpg"), None),
            &pricing(),
        )
        .unwrap();

        assert!(!resolved.estimate.needs_generation);
        assert_eq!(resolved.estimate.total, dec!(0.05));
        assert!(matches!(resolved.request.garment, Some(ImageSource::Url(_))));
    }

    #[test]
    fn description_alone_requires_generation() {
        let resolved = resolve(
            json(Some("https://x/h.jpg"), None, Some("blue denim jacket")),
            &pricing(),
        )
        .unwrap();

        assert!(resolved.estimate.needs_generation);
        assert_eq!(resolved.estimate.total, dec!(0.08));
        assert!(resolved.request.garment.is_none());
        assert_eq!(resolved.request.description.as_deref(), Some("blue denim jacket"));
    }

    #[test]
    fn garment_image_beats_description_for_cost() {
        let resolved = resolve(
            json(
                Some("https://x/h.jpg"),
                Some("https://x/g.jpg"),
                Some("blue denim jacket"),
            ),
            &pricing(),
        )
        .unwrap();

        assert!(!resolved.estimate.needs_generation);
        assert_eq!(resolved.estimate.total, dec!(0.05));
    }

    #[test]
    fn form_attachment_wins_over_url() {
        let resolved = resolve(
            TryOnInput::Form(FormTryOn {
                human_image: Some(attachment()),
                human_image_url: Some("https://x/h.jpg".into()),
                garment_image: Some(attachment()),
                garment_image_url: Some("https://x/g.jpg".into()),
                garment_description: None,
                garment_type: GarmentType::Dresses,
            }),
            &pricing(),
        )
        .unwrap();

        assert!(matches!(resolved.request.human, ImageSource::Binary(_)));
        assert!(matches!(resolved.request.garment, Some(ImageSource::Binary(_))));
        assert_eq!(resolved.request.garment_type, GarmentType::Dresses);
    }

    #[test]
    fn form_description_only_requires_generation() {
        let resolved = resolve(
            TryOnInput::Form(FormTryOn {
                human_image: Some(attachment()),
                garment_description: Some("green silk dress".into()),
                garment_type: GarmentType::Dresses,
                ..FormTryOn::default()
            }),
            &pricing(),
        )
        .unwrap();

        assert!(resolved.estimate.needs_generation);
        assert_eq!(resolved.estimate.total, dec!(0.08));
    }
}
