//! Try-on routes: the paid pipeline endpoint plus its read-only status.

use std::str::FromStr;
use std::sync::Arc;

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;

use fitroom_core::types::{Attachment, FormTryOn, GarmentType, JsonTryOn, TryOnInput};
use fitroom_runtime::{PipelineError, TryOnOutcome};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tryon", post(process_tryon))
        .route("/tryon/status", get(service_status))
}

/// POST /api/tryon: run one try-on request through the pipeline.
///
/// Accepts a JSON body or a multipart form, dispatched on Content-Type.
async fn process_tryon(
    State(state): State<Arc<AppState>>,
    request: Request,
) -> Response {
    let user_id = user_id_from_headers(request.headers());

    let input = match read_input(request).await {
        Ok(input) => input,
        Err(message) => return validation_response(message),
    };

    match state.orchestrator.process(&user_id, input).await {
        Ok(outcome) => success_response(&user_id, outcome),
        Err(err) => failure_response(state.config.production, err),
    }
}

/// GET /api/tryon/status: service status and the fixed cost constants.
async fn service_status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let pricing = state.orchestrator.pricing();
    Json(json!({
        "status": "ok",
        "service": "fitroom",
        "costs": {
            "tryOn": pricing.try_on,
            "generation": pricing.generation,
        },
        "userLimit": state.ledger.limit(),
    }))
}

/// Derive the caller identity: session header first, then proxy headers,
/// then anonymous.
fn user_id_from_headers(headers: &HeaderMap) -> String {
    if let Some(session) = header_str(headers, "x-session-id") {
        return session;
    }
    if let Some(forwarded) = header_str(headers, "x-forwarded-for") {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    if let Some(real_ip) = header_str(headers, "x-real-ip") {
        return real_ip;
    }
    "anonymous".to_string()
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Extract the request body in whichever of the two encodings it arrived.
async fn read_input(request: Request) -> Result<TryOnInput, String> {
    let content_type = request
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if content_type.starts_with("application/json") {
        let Json(body) = Json::<JsonTryOn>::from_request(request, &())
            .await
            .map_err(|e| format!("invalid JSON body: {}", e))?;
        return Ok(TryOnInput::Json(body));
    }

    if content_type.starts_with("multipart/form-data") {
        let multipart = Multipart::from_request(request, &())
            .await
            .map_err(|e| format!("invalid multipart body: {}", e))?;
        return Ok(TryOnInput::Form(collect_form(multipart).await?));
    }

    Err("unsupported content type: expected JSON or multipart".to_string())
}

async fn collect_form(mut multipart: Multipart) -> Result<FormTryOn, String> {
    let mut form = FormTryOn::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("failed to read multipart field: {}", e))?
    {
        let Some(name) = field.name().map(String::from) else {
            continue;
        };

        match name.as_str() {
            "humanImage" => form.human_image = Some(read_attachment(field).await?),
            "humanImageUrl" => form.human_image_url = Some(read_text(field).await?),
            "garmentImage" => form.garment_image = Some(read_attachment(field).await?),
            "garmentImageUrl" => form.garment_image_url = Some(read_text(field).await?),
            "garmentDescription" => form.garment_description = Some(read_text(field).await?),
            "garmentType" => {
                let raw = read_text(field).await?;
                form.garment_type = GarmentType::from_str(raw.trim())?;
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_attachment(field: axum::extract::multipart::Field<'_>) -> Result<Attachment, String> {
    let content_type = field.content_type().map(String::from);
    let file_name = field.file_name().map(String::from);
    let bytes = field
        .bytes()
        .await
        .map_err(|e| format!("failed to read attachment: {}", e))?;

    Ok(Attachment {
        bytes: bytes.to_vec(),
        content_type,
        file_name,
    })
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, String> {
    field
        .text()
        .await
        .map_err(|e| format!("failed to read field: {}", e))
}

fn success_response(user_id: &str, outcome: TryOnOutcome) -> Response {
    let mut body = json!({
        "success": true,
        "result": outcome.result,
        "cost": outcome.cost,
        "userBudget": {
            "spent": outcome.budget.spent,
            "remaining": outcome.budget.remaining,
            "limit": outcome.budget.limit,
        },
        "metadata": {
            "userId": user_id,
            "garmentType": outcome.garment_type,
            "usedDescription": outcome.used_description,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        },
    });

    if let Some(url) = outcome.generated_garment {
        body["generatedGarment"] = json!(url);
    }

    (StatusCode::OK, Json(body)).into_response()
}

fn validation_response(message: String) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "success": false, "error": message })),
    )
        .into_response()
}

fn failure_response(production: bool, err: PipelineError) -> Response {
    match err {
        PipelineError::Validation(message) => validation_response(message),
        PipelineError::BudgetExceeded { cost, budget } => (
            StatusCode::PAYMENT_REQUIRED,
            Json(json!({
                "success": false,
                "error": "User budget limit reached",
                "userBudget": {
                    "spent": budget.spent,
                    "remaining": budget.remaining,
                    "limit": budget.limit,
                },
                "estimatedCost": cost,
            })),
        )
            .into_response(),
        PipelineError::External { stage, message } => {
            let mut body = json!({
                "success": false,
                "error": format!("{} failed", stage),
            });
            if !production {
                body["details"] = json!(message);
            }
            (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut headers = HeaderMap::new();
        for (name, value) in pairs {
            headers.insert(
                axum::http::HeaderName::from_str(name).unwrap(),
                value.parse().unwrap(),
            );
        }
        headers
    }

    #[test]
    fn session_header_wins() {
        let headers = headers(&[
            ("x-session-id", "sess-1"),
            ("x-forwarded-for", "10.0.0.1, 10.0.0.2"),
            ("x-real-ip", "10.0.0.3"),
        ]);
        assert_eq!(user_id_from_headers(&headers), "sess-1");
    }

    #[test]
    fn forwarded_for_uses_first_hop() {
        let headers = headers(&[("x-forwarded-for", " 10.0.0.1 , 10.0.0.2")]);
        assert_eq!(user_id_from_headers(&headers), "10.0.0.1");
    }

    #[test]
    fn real_ip_is_the_last_resort_before_anonymous() {
        let headers = headers(&[("x-real-ip", "10.0.0.3")]);
        assert_eq!(user_id_from_headers(&headers), "10.0.0.3");

        assert_eq!(user_id_from_headers(&HeaderMap::new()), "anonymous");
    }
}
