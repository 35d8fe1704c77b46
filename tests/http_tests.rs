#[macro_use]
mod test_utils;

use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use test_utils::*;

#[actix_rt::test]
async fn home_banner_names_the_site() {
    let config = test_config();
    let state = app_state(&config);
    let app = init_app!(state, config);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "Ok");
    assert_eq!(body["api"], "/api/v1");
}

#[actix_rt::test]
async fn admin_routes_require_a_token() {
    let config = test_config();
    let state = app_state(&config);
    let app = init_app!(state, config);

    let req = test::TestRequest::get().uri("/api/v1/admin/projects").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn admin_routes_reject_non_admins() {
    let config = test_config();
    let state = app_state(&config);
    let app = init_app!(state, config);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/projects")
        .insert_header(("Authorization", format!("Bearer {}", access_token(&config, false))))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn refresh_tokens_are_not_access_tokens() {
    let config = test_config();
    let state = app_state(&config);
    let app = init_app!(state, config);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/projects")
        .insert_header(("Authorization", format!("Bearer {}", refresh_token(&config))))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn admin_ids_are_validated_before_lookup() {
    let config = test_config();
    let state = app_state(&config);
    let app = init_app!(state, config);

    let req = test::TestRequest::get()
        .uri("/api/v1/admin/projects/not-a-uuid")
        .insert_header(("Authorization", format!("Bearer {}", access_token(&config, true))))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn me_requires_a_token() {
    let config = test_config();
    let state = app_state(&config);
    let app = init_app!(state, config);

    let req = test::TestRequest::get().uri("/api/v1/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn malformed_json_is_a_bad_request() {
    let config = test_config();
    let state = app_state(&config);
    let app = init_app!(state, config);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{\"email\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].as_str().unwrap().starts_with("JSON payload error"));
}

#[actix_rt::test]
async fn invalid_contact_form_lists_field_errors() {
    let config = test_config();
    let state = app_state(&config);
    let app = init_app!(state, config);

    let req = test::TestRequest::post()
        .uri("/api/v1/contact")
        .peer_addr("203.0.113.9:5000".parse().unwrap())
        .set_json(json!({
            "name": "Ada",
            "email": "not-an-email",
            "message": "Hi"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["email", "message"]);
}

#[actix_rt::test]
async fn contact_form_is_rate_limited_per_ip() {
    let config = test_config();
    let state = app_state(&config);
    let app = init_app!(state, config);

    let mut last = StatusCode::OK;
    for i in 0..6 {
        let req = test::TestRequest::post()
            .uri("/api/v1/contact")
            .peer_addr("198.51.100.4:5000".parse().unwrap())
            .set_json(json!({
                "name": "Ada",
                "email": format!("ada{}@example.com", i),
                "message": "I would like to talk about a project."
            }))
            .to_request();
        last = test::call_service(&app, req).await.status();
    }
    assert_eq!(last, StatusCode::TOO_MANY_REQUESTS);
}

#[actix_rt::test]
async fn invalid_submissions_do_not_use_up_the_limit() {
    let config = test_config();
    let state = app_state(&config);
    let app = init_app!(state, config);

    for _ in 0..8 {
        let req = test::TestRequest::post()
            .uri("/api/v1/quotes")
            .peer_addr("198.51.100.7:5000".parse().unwrap())
            .set_json(json!({"name": "A", "email": "bad", "project_type": "Website", "description": "x"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}

#[actix_rt::test]
async fn missing_media_is_not_found() {
    let config = test_config();
    let state = app_state(&config);
    let app = init_app!(state, config);

    let req = test::TestRequest::get().uri("/uploads/images/missing.png").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn uploads_reject_non_images() {
    let config = test_config();
    let state = app_state(&config);
    let app = init_app!(state, config);

    let boundary = "XBOUNDARYX";
    let body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"notes.txt\"\r\nContent-Type: text/plain\r\n\r\nplain text, not an image\r\n--{b}--\r\n",
        b = boundary
    );

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/uploads")
        .insert_header(("Authorization", format!("Bearer {}", access_token(&config, true))))
        .insert_header(("Content-Type", format!("multipart/form-data; boundary={}", boundary)))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
}

#[actix_rt::test]
async fn uploads_store_images_and_serve_them_back() {
    let config = test_config();
    let state = app_state(&config);
    let app = init_app!(state, config);

    let png: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 13, b'I', b'H', b'D', b'R'];
    let boundary = "XBOUNDARYX";
    let mut body = format!(
        "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"dot.png\"\r\nContent-Type: image/png\r\n\r\n",
        b = boundary
    )
    .into_bytes();
    body.extend_from_slice(png);
    body.extend_from_slice(format!("\r\n--{}--\r\n", boundary).as_bytes());

    let req = test::TestRequest::post()
        .uri("/api/v1/admin/uploads?bucket=projects")
        .insert_header(("Authorization", format!("Bearer {}", access_token(&config, true))))
        .insert_header(("Content-Type", format!("multipart/form-data; boundary={}", boundary)))
        .set_payload(body)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);

    let uploaded: Value = test::read_body_json(resp).await;
    assert_eq!(uploaded["storage"], "object");
    let url = uploaded["url"].as_str().unwrap();
    let path = url.trim_start_matches("https://janedoe.dev");
    assert!(path.starts_with("/uploads/projects/"));

    let resp = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("content-type").unwrap(), "image/png");
}
