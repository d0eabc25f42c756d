//! Response-shape tests: validates that the HTTP payloads carry the field
//! names and types the frontend contract expects.

/// Success payload:
/// { success, result, cost, userBudget, metadata, generatedGarment? }
#[test]
fn test_success_response_shape() {
    let response = serde_json::json!({
        "success": true,
        "result": {
            "imageUrl": "https://cdn.test/result.jpg",
            "width": 768,
            "height": 1024,
            "seed": 42,
            "hasNsfwConcepts": false,
        },
        "generatedGarment": "https://cdn.test/garment.jpg",
        "cost": 0.08,
        "userBudget": {
            "spent": 0.08,
            "remaining": 0.42,
            "limit": 0.50,
        },
        "metadata": {
            "userId": "sess-1",
            "garmentType": "upper_body",
            "usedDescription": true,
            "timestamp": "2026-08-04T12:00:00+00:00",
        },
    });

    assert!(response["success"].is_boolean());
    assert!(response["cost"].is_number());

    let result = &response["result"];
    assert!(result["imageUrl"].is_string());
    assert!(result["width"].is_number());
    assert!(result["height"].is_number());
    assert!(result["seed"].is_number());
    assert!(result["hasNsfwConcepts"].is_boolean());

    let budget = &response["userBudget"];
    assert!(budget["spent"].is_number());
    assert!(budget["remaining"].is_number());
    assert!(budget["limit"].is_number());

    let metadata = &response["metadata"];
    assert!(metadata["userId"].is_string());
    assert!(metadata["garmentType"].is_string());
    assert!(metadata["usedDescription"].is_boolean());
    assert!(metadata["timestamp"].is_string());
}

/// Budget refusal payload (402):
/// { success: false, error, userBudget, estimatedCost }
#[test]
fn test_budget_exceeded_response_shape() {
    let response = serde_json::json!({
        "success": false,
        "error": "User budget limit reached",
        "userBudget": {
            "spent": 0.46,
            "remaining": 0.04,
            "limit": 0.50,
        },
        "estimatedCost": 0.05,
    });

    assert_eq!(response["success"], serde_json::json!(false));
    assert!(response["error"].is_string());
    assert!(response["userBudget"]["spent"].is_number());
    assert!(response["userBudget"]["remaining"].is_number());
    assert!(response["userBudget"]["limit"].is_number());
    assert!(response["estimatedCost"].is_number());
}

/// Validation failure payload (400): { success: false, error }.
#[test]
fn test_validation_response_shape() {
    let response = serde_json::json!({
        "success": false,
        "error": "missing human image",
    });

    assert_eq!(response["success"], serde_json::json!(false));
    assert!(response["error"].is_string());
    assert!(response.get("userBudget").is_none());
}

/// Status payload: { status, service, costs, userLimit }.
#[test]
fn test_status_response_shape() {
    let response = serde_json::json!({
        "status": "ok",
        "service": "fitroom",
        "costs": {
            "tryOn": 0.05,
            "generation": 0.03,
        },
        "userLimit": 0.50,
    });

    assert!(response["status"].is_string());
    assert!(response["service"].is_string());
    assert!(response["costs"]["tryOn"].is_number());
    assert!(response["costs"]["generation"].is_number());
    assert!(response["userLimit"].is_number());
}

/// Admin listing payload: { users: [{ userId, spent, remaining }], limit }.
#[test]
fn test_budget_listing_shape() {
    let response = serde_json::json!({
        "users": [
            { "userId": "sess-1", "spent": 0.10, "remaining": 0.40 },
            { "userId": "sess-2", "spent": 0.55, "remaining": 0.0 },
        ],
        "limit": 0.50,
    });

    assert!(response["users"].is_array());
    assert!(response["limit"].is_number());

    let row = &response["users"][0];
    assert!(row["userId"].is_string());
    assert!(row["spent"].is_number());
    assert!(row["remaining"].is_number());
}
