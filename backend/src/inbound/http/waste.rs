//! Waste classification HTTP handlers.
//!
//! ```text
//! POST /api/waste/classify {"label":"plastic_bottle.jpg"}
//! GET /api/waste/history
//! GET /api/waste/categories
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{ClassificationRecord, WasteCategory};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedPrincipal;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::state::HttpState;

/// Body for `POST /api/waste/classify`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClassifyRequest {
    /// Item label or image file name.
    #[schema(example = "plastic_bottle.jpg")]
    pub label: String,
}

/// One entry of the category catalogue.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBody {
    pub key: WasteCategory,
    #[schema(example = "Recyclable")]
    pub name: &'static str,
    #[schema(example = "Can be processed and made into new products")]
    pub description: &'static str,
}

impl From<WasteCategory> for CategoryBody {
    fn from(category: WasteCategory) -> Self {
        Self {
            key: category,
            name: category.name(),
            description: category.description(),
        }
    }
}

/// Classify an item and record it in the caller's history.
#[utoipa::path(
    post,
    path = "/api/waste/classify",
    request_body = ClassifyRequest,
    responses(
        (status = 200, description = "Classification", body = ClassificationRecord),
        (status = 400, description = "Invalid label", body = ErrorEnvelope),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["waste"],
    operation_id = "classifyWaste"
)]
#[post("/classify")]
pub async fn classify(
    state: web::Data<HttpState>,
    principal: AuthenticatedPrincipal,
    payload: web::Json<ClassifyRequest>,
) -> ApiResult<web::Json<ClassificationRecord>> {
    let record = state
        .classification
        .classify(principal.id(), &payload.label)
        .await?;
    Ok(web::Json(record))
}

/// The caller's most recent classifications, newest first.
#[utoipa::path(
    get,
    path = "/api/waste/history",
    responses(
        (status = 200, description = "Up to ten records", body = [ClassificationRecord]),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    ),
    tags = ["waste"],
    operation_id = "wasteHistory"
)]
#[get("/history")]
pub async fn history(
    state: web::Data<HttpState>,
    principal: AuthenticatedPrincipal,
) -> ApiResult<web::Json<Vec<ClassificationRecord>>> {
    let records = state.classification.history(principal.id()).await?;
    Ok(web::Json(records))
}

/// Category catalogue.
#[utoipa::path(
    get,
    path = "/api/waste/categories",
    responses(
        (status = 200, description = "Categories", body = [CategoryBody]),
        (status = 401, description = "Unauthorised", body = ErrorEnvelope)
    ),
    tags = ["waste"],
    operation_id = "wasteCategories"
)]
#[get("/categories")]
pub async fn categories() -> web::Json<Vec<CategoryBody>> {
    web::Json(WasteCategory::ALL.into_iter().map(CategoryBody::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{HISTORY_LIMIT, PhoneNumber};
    use crate::domain::ports::PrincipalRepository;
    use crate::inbound::http::test_utils::{TestContext, bearer, register};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};

    const PHONE: &str = "+91 90000 44444";

    #[rstest]
    #[actix_web::test]
    async fn classify_returns_the_keyword_record() {
        let ctx = TestContext::new();
        let app = actix_test::init_service(ctx.app()).await;
        let token = register(&app, PHONE).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/waste/classify")
            .insert_header(bearer(&token))
            .set_json(json!({"label": "IMG_Bottle_01.jpg"}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: Value = actix_test::read_body_json(res).await;
        assert_eq!(body["key"], "plastic");
        assert_eq!(body["category"], "recyclable");
        assert_eq!(body["confidencePercent"], 94);
        assert_eq!(body["ecoPoints"], 10);
        assert_eq!(body["label"], "IMG_Bottle_01.jpg");
    }

    #[rstest]
    #[actix_web::test]
    async fn unmatched_labels_are_unclassified() {
        let ctx = TestContext::new();
        let app = actix_test::init_service(ctx.app()).await;
        let token = register(&app, PHONE).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/waste/classify")
            .insert_header(bearer(&token))
            .set_json(json!({"label": "holiday.jpg"}))
            .to_request();
        let body: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["key"], "unclassified");
        assert_eq!(body["ecoPoints"], 0);
    }

    #[rstest]
    #[actix_web::test]
    async fn blank_labels_are_rejected() {
        let ctx = TestContext::new();
        let app = actix_test::init_service(ctx.app()).await;
        let token = register(&app, PHONE).await;

        let req = actix_test::TestRequest::post()
            .uri("/api/waste/classify")
            .insert_header(bearer(&token))
            .set_json(json!({"label": "   "}))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let envelope: ErrorEnvelope = actix_test::read_body_json(res).await;
        assert_eq!(envelope.error, "Please provide an item label");
    }

    #[rstest]
    #[actix_web::test]
    async fn history_keeps_the_latest_ten_newest_first() {
        let ctx = TestContext::new();
        let app = actix_test::init_service(ctx.app()).await;
        let token = register(&app, PHONE).await;

        for n in 0..12 {
            let req = actix_test::TestRequest::post()
                .uri("/api/waste/classify")
                .insert_header(bearer(&token))
                .set_json(json!({"label": format!("paper-{n}.jpg")}))
                .to_request();
            assert_eq!(actix_test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let req = actix_test::TestRequest::get()
            .uri("/api/waste/history")
            .insert_header(bearer(&token))
            .to_request();
        let body: Vec<Value> = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), HISTORY_LIMIT);
        assert_eq!(body[0]["label"], "paper-11.jpg");
        assert_eq!(body[HISTORY_LIMIT - 1]["label"], "paper-2.jpg");
    }

    #[rstest]
    #[actix_web::test]
    async fn history_is_private_to_each_household() {
        let ctx = TestContext::new();
        let app = actix_test::init_service(ctx.app()).await;
        let first = register(&app, PHONE).await;
        let second = register(&app, "+91 90000 55555").await;

        let req = actix_test::TestRequest::post()
            .uri("/api/waste/classify")
            .insert_header(bearer(&first))
            .set_json(json!({"label": "battery"}))
            .to_request();
        actix_test::call_service(&app, req).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/waste/history")
            .insert_header(bearer(&second))
            .to_request();
        let body: Vec<Value> = actix_test::call_and_read_body_json(&app, req).await;
        assert!(body.is_empty());
    }

    #[rstest]
    #[actix_web::test]
    async fn categories_list_the_catalogue() {
        let ctx = TestContext::new();
        let app = actix_test::init_service(ctx.app()).await;
        let token = register(&app, PHONE).await;

        let req = actix_test::TestRequest::get()
            .uri("/api/waste/categories")
            .insert_header(bearer(&token))
            .to_request();
        let body: Vec<Value> = actix_test::call_and_read_body_json(&app, req).await;
        let keys: Vec<&str> = body.iter().filter_map(|c| c["key"].as_str()).collect();
        assert_eq!(
            keys,
            ["recyclable", "organic", "electronic", "hazardous", "general"]
        );
        assert_eq!(body[4]["name"], "General Waste");
    }

    #[rstest]
    #[actix_web::test]
    async fn deleted_households_lose_access() {
        let ctx = TestContext::new();
        let app = actix_test::init_service(ctx.app()).await;
        let token = register(&app, PHONE).await;
        let principal = ctx
            .principals
            .find_by_phone(&PhoneNumber::new(PHONE).expect("phone"))
            .await
            .expect("lookup")
            .expect("registered");
        ctx.principals.remove(principal.id()).expect("remove");

        let req = actix_test::TestRequest::get()
            .uri("/api/waste/history")
            .insert_header(bearer(&token))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        let envelope: ErrorEnvelope = actix_test::read_body_json(res).await;
        assert_eq!(envelope.error, "Not authorized, user not found");
    }
}
