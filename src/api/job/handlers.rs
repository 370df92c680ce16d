use actix_web::{
    get, post,
    web::{scope, Data, Json as PlainJson, ServiceConfig},
    HttpResponse, Responder,
};
use actix_web_validator::Json;
use tracing::info;

use crate::form::{JobFormInput, COMMON_CRON_EXPRESSIONS};
use super::dto::{CronPresetsResponse, FormValidResponse, RollingRangeRequest};
use super::service::{JobFormService, ServiceError};

/// Invalid forms never reach the handler: the extractor runs `Validate`
/// and the configured JsonConfig turns violations into a 400.
#[post("/validate")]
async fn validate_job_form(form: Json<JobFormInput>) -> impl Responder {
    info!("Job form '{}' is valid", form.name.trim());
    HttpResponse::Ok().json(FormValidResponse {
        message: "Job form is valid".to_string(),
    })
}

#[post("/validate/bulk")]
async fn validate_job_forms(
    service: Data<JobFormService>,
    forms: PlainJson<Vec<JobFormInput>>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.validate_bulk(forms.into_inner())?;
    Ok(HttpResponse::Ok().json(response))
}

#[get("/cron-presets")]
async fn cron_presets() -> impl Responder {
    HttpResponse::Ok().json(CronPresetsResponse {
        presets: COMMON_CRON_EXPRESSIONS.to_vec(),
    })
}

#[post("/rolling-range")]
async fn rolling_range(
    service: Data<JobFormService>,
    request: PlainJson<RollingRangeRequest>,
) -> Result<HttpResponse, ServiceError> {
    let response = service.rolling_range(&request)?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn job_config(config: &mut ServiceConfig) {
    config.service(
        scope("jobs")
            .service(validate_job_forms)
            .service(validate_job_form)
            .service(cron_presets)
            .service(rolling_range),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::validation::{json_config, plain_json_config};
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    const LIMIT: usize = 64 * 1024;

    macro_rules! app {
        () => {
            test::init_service(
                App::new()
                    .app_data(Data::new(JobFormService::new(5)))
                    .app_data(json_config(LIMIT))
                    .app_data(plain_json_config(LIMIT))
                    .configure(job_config),
            )
            .await
        };
    }

    fn valid_form() -> Value {
        json!({
            "name": "Weekday upload",
            "site_id": "2",
            "job_type": "upload",
            "target_site_id": "4",
            "schedule_type": "recurring",
            "cron_expression": "0 9 * * 1-5"
        })
    }

    #[actix_web::test]
    async fn test_validate_accepts_valid_form() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/jobs/validate")
            .set_json(valid_form())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Job form is valid");
    }

    #[actix_web::test]
    async fn test_validate_reports_field_errors() {
        let app = app!();
        let mut form = valid_form();
        form["name"] = json!(" ");
        form["target_site_id"] = json!("");
        form["cron_expression"] = json!("99 * * * *");

        let req = test::TestRequest::post()
            .uri("/jobs/validate")
            .set_json(form)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Validation failed");
        assert_eq!(
            body["fields"]["cron_expression"]["errors"],
            json!(["Invalid cron expression format"])
        );
        assert_eq!(
            body["fields"]["target_site_id"]["errors"],
            json!(["Target site is required for upload jobs"])
        );
        assert_eq!(
            body["errors"],
            json!([
                {"field": "name", "message": "Name is required"},
                {"field": "cron_expression", "message": "Invalid cron expression format"},
                {"field": "target_site_id", "message": "Target site is required for upload jobs"}
            ])
        );
    }

    #[actix_web::test]
    async fn test_validate_rejects_malformed_json() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/jobs/validate")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"name\": ")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Request validation failed");
    }

    #[actix_web::test]
    async fn test_bulk_validation_keeps_rule_order() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/jobs/validate/bulk")
            .set_json(json!([
                valid_form(),
                {"name": "", "schedule_type": "one_time"}
            ]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["valid"], 1);
        assert_eq!(body["invalid"], 1);
        assert_eq!(body["results"][0]["result"], json!({"status": "valid"}));

        let fields: Vec<&str> = body["results"][1]["result"]["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["field"].as_str().unwrap())
            .collect();
        assert_eq!(
            fields,
            vec!["name", "site_id", "job_type", "schedule_datetime"]
        );
    }

    #[actix_web::test]
    async fn test_bulk_validation_limit() {
        let app = app!();
        let forms: Vec<Value> = (0..6).map(|_| valid_form()).collect();
        let req = test::TestRequest::post()
            .uri("/jobs/validate/bulk")
            .set_json(forms)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_cron_presets() {
        let app = app!();
        let req = test::TestRequest::get().uri("/jobs/cron-presets").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["presets"].as_array().map(Vec::len), Some(7));
        assert_eq!(
            body["presets"][6],
            json!({"name": "Every weekday at 9 AM", "expression": "0 9 * * 1-5"})
        );
    }

    #[actix_web::test]
    async fn test_rolling_range_preview() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/jobs/rolling-range")
            .set_json(json!({
                "rolling_pattern": "prev_month_26_to_curr_25",
                "reference": "2024-01-05T10:00:00"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["date_from"], "2023-12-26T00:00:00");
        assert_eq!(body["date_to"], "2024-01-25T23:59:59");
    }

    #[actix_web::test]
    async fn test_rolling_range_custom_without_offsets() {
        let app = app!();
        let req = test::TestRequest::post()
            .uri("/jobs/rolling-range")
            .set_json(json!({"rolling_pattern": "custom"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "Invalid rolling date range");
    }
}
