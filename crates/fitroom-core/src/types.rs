//! Domain types shared across the pipeline and HTTP surface.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::Pricing;

/// Garment category constraining how composition is performed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GarmentType {
    #[default]
    UpperBody,
    LowerBody,
    Dresses,
}

impl GarmentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GarmentType::UpperBody => "upper_body",
            GarmentType::LowerBody => "lower_body",
            GarmentType::Dresses => "dresses",
        }
    }
}

impl std::fmt::Display for GarmentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GarmentType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upper_body" => Ok(GarmentType::UpperBody),
            "lower_body" => Ok(GarmentType::LowerBody),
            "dresses" => Ok(GarmentType::Dresses),
            other => Err(format!("unknown garment type: {}", other)),
        }
    }
}

/// An uploaded binary image as received from a multipart field.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub bytes: Vec<u8>,
    pub content_type: Option<String>,
    pub file_name: Option<String>,
}

/// An image reference: either already hosted or raw bytes to upload.
#[derive(Debug, Clone)]
pub enum ImageSource {
    Url(String),
    Binary(Attachment),
}

/// Text-only request encoding (JSON body).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JsonTryOn {
    #[serde(rename = "humanImageUrl")]
    pub human_image_url: Option<String>,
    #[serde(rename = "garmentImageUrl")]
    pub garment_image_url: Option<String>,
    #[serde(rename = "garmentDescription")]
    pub garment_description: Option<String>,
    #[serde(default, rename = "garmentType")]
    pub garment_type: GarmentType,
}

/// Binary-capable request encoding (multipart form).
#[derive(Debug, Clone, Default)]
pub struct FormTryOn {
    pub human_image: Option<Attachment>,
    pub human_image_url: Option<String>,
    pub garment_image: Option<Attachment>,
    pub garment_image_url: Option<String>,
    pub garment_description: Option<String>,
    pub garment_type: GarmentType,
}

/// A try-on request in one of the two supported encodings.
#[derive(Debug, Clone)]
pub enum TryOnInput {
    Json(JsonTryOn),
    Form(FormTryOn),
}

/// Canonical request produced by the resolver.
#[derive(Debug, Clone)]
pub struct TryOnRequest {
    pub human: ImageSource,
    pub garment: Option<ImageSource>,
    pub description: Option<String>,
    pub garment_type: GarmentType,
}

/// Fixed charge for a request, computed once before any external call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostEstimate {
    pub base: Decimal,
    pub generation: Decimal,
    pub total: Decimal,
    pub needs_generation: bool,
}

impl CostEstimate {
    pub fn new(pricing: &Pricing, needs_generation: bool) -> Self {
        let generation = if needs_generation {
            pricing.generation
        } else {
            Decimal::ZERO
        };
        Self {
            base: pricing.try_on,
            generation,
            total: pricing.try_on + generation,
            needs_generation,
        }
    }
}

/// Ledger snapshot returned by budget checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetCheck {
    #[serde(rename = "hasEnough")]
    pub has_enough: bool,
    pub spent: Decimal,
    pub remaining: Decimal,
    pub limit: Decimal,
}

/// Result of the external composition call, passed through unmodified.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TryOnImage {
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    #[serde(rename = "hasNsfwConcepts")]
    pub has_nsfw_concepts: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn garment_type_wire_names() {
        assert_eq!(
            serde_json::to_value(GarmentType::UpperBody).unwrap(),
            serde_json::json!("upper_body")
        );
        let parsed: GarmentType = serde_json::from_value(serde_json::json!("dresses")).unwrap();
        assert_eq!(parsed, GarmentType::Dresses);
    }

    #[test]
    fn garment_type_defaults_to_upper_body() {
        let body: JsonTryOn =
            serde_json::from_str(r#"{"humanImageUrl": "https://x/h.jpg"}"#).unwrap();
        assert_eq!(body.garment_type, GarmentType::UpperBody);
    }

    #[test]
    fn estimate_includes_generation_only_when_needed() {
        let pricing = Pricing::default();

        let plain = CostEstimate::new(&pricing, false);
        assert_eq!(plain.total, dec!(0.05));
        assert_eq!(plain.generation, Decimal::ZERO);

        let generated = CostEstimate::new(&pricing, true);
        assert_eq!(generated.total, dec!(0.08));
        assert!(generated.needs_generation);
    }

    #[test]
    fn budget_check_field_names() {
        let check = BudgetCheck {
            has_enough: true,
            spent: dec!(0.10),
            remaining: dec!(0.40),
            limit: dec!(0.50),
        };
        let value = serde_json::to_value(check).unwrap();
        assert!(value["hasEnough"].is_boolean());
        assert!(value["spent"].is_number());
        assert!(value["remaining"].is_number());
        assert!(value["limit"].is_number());
    }
}
