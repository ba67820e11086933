use actix_web::{
    body::{to_bytes, BoxBody},
    dev::ServiceResponse,
    http::{header, StatusCode},
    test, web, App,
};
use geetest_relay_domain::model::{DiscordId, Game, GeetestSolution, UserRecord};
use geetest_relay_domain::services::telemetry::{init_telemetry, TelemetryConfig, TelemetryGuard};
use geetest_relay_domain::{ChallengeStore, UserStore};
use geetest_relay_storage::SeaOrmStorage;

use crate::handlers::{
    challenge::{save_result_handler, solve_page_handler, GeetestResult, RESULT_SAVED_MESSAGE},
    fallback_handler, json_error_handler, status_handler,
};
use crate::state::AppState;

const REGISTERED_ID: i64 = 80165437032654848;

fn widget_token(tag: &str) -> String {
    format!("{tag:0<40}")
}

fn result(challenge: &str, validate: &str, seccode: &str) -> GeetestResult {
    GeetestResult {
        geetest_challenge: challenge.into(),
        geetest_validate: validate.into(),
        geetest_seccode: seccode.into(),
    }
}

async fn storage() -> SeaOrmStorage {
    SeaOrmStorage::connect("sqlite::memory:")
        .await
        .expect("storage inits")
}

fn telemetry() -> TelemetryGuard {
    let config = TelemetryConfig::from_env("API_TEST");
    init_telemetry(&config).expect("telemetry inits")
}

async fn seed_user(storage: &SeaOrmStorage) {
    storage
        .insert_user(UserRecord {
            discord_id: DiscordId::new(REGISTERED_ID),
        })
        .await
        .expect("user seeds");
}

async fn body_string(resp: ServiceResponse<BoxBody>) -> String {
    let bytes = to_bytes(resp.into_body()).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn is_html(resp: &ServiceResponse<BoxBody>) -> bool {
    resp.headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("text/html"))
}

#[actix_web::test]
async fn root_status_probe_reports_ok() {
    let app =
        test::init_service(App::new().route("/", web::get().to(status_handler))).await;
    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let parsed: serde_json::Value =
        serde_json::from_str(&body_string(resp).await).unwrap();
    assert_eq!(parsed, serde_json::json!({ "status": "ok" }));
}

#[actix_web::test]
async fn serves_challenge_page_with_embedded_values() {
    let storage = storage().await;
    seed_user(&storage).await;
    let state = AppState::new(storage, telemetry());
    let app = test::init_service(App::new().app_data(web::Data::new(state)).route(
        "/geetest/{game}/{discord_id}/{gt}/{challenge}",
        web::get().to(solve_page_handler),
    ))
    .await;

    let gt = widget_token("gt");
    let challenge = widget_token("challenge");
    let req = test::TestRequest::get()
        .uri(&format!("/geetest/genshin/{REGISTERED_ID}/{gt}/{challenge}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(is_html(&resp));

    let body = body_string(resp).await;
    assert!(body.contains("genshin"));
    assert!(body.contains(&REGISTERED_ID.to_string()));
    assert!(body.contains(&gt));
    assert!(body.contains(&challenge));
}

#[actix_web::test]
async fn unknown_game_renders_error_page() {
    let storage = storage().await;
    seed_user(&storage).await;
    let state = AppState::new(storage, telemetry());
    let app = test::init_service(App::new().app_data(web::Data::new(state)).route(
        "/geetest/{game}/{discord_id}/{gt}/{challenge}",
        web::get().to(solve_page_handler),
    ))
    .await;

    let req = test::TestRequest::get()
        .uri(&format!(
            "/geetest/themis/{REGISTERED_ID}/{}/{}",
            widget_token("gt"),
            widget_token("challenge")
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(is_html(&resp));
    assert!(body_string(resp).await.contains("Unknown game"));
}

#[actix_web::test]
async fn unregistered_user_is_rejected_on_get() {
    let state = AppState::new(storage().await, telemetry());
    let app = test::init_service(App::new().app_data(web::Data::new(state)).route(
        "/geetest/{game}/{discord_id}/{gt}/{challenge}",
        web::get().to(solve_page_handler),
    ))
    .await;

    let req = test::TestRequest::get()
        .uri(&format!(
            "/geetest/genshin/{REGISTERED_ID}/{}/{}",
            widget_token("gt"),
            widget_token("challenge")
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(is_html(&resp));
    assert!(body_string(resp)
        .await
        .contains("register the user first"));
}

#[actix_web::test]
async fn short_widget_tokens_invalidate_the_link() {
    let storage = storage().await;
    seed_user(&storage).await;
    let state = AppState::new(storage, telemetry());
    let app = test::init_service(App::new().app_data(web::Data::new(state)).route(
        "/geetest/{game}/{discord_id}/{gt}/{challenge}",
        web::get().to(solve_page_handler),
    ))
    .await;

    let req = test::TestRequest::get()
        .uri(&format!(
            "/geetest/genshin/{REGISTERED_ID}/too-short/{}",
            widget_token("challenge")
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_string(resp).await.contains("generate a new link"));
}

#[actix_web::test]
async fn non_numeric_discord_id_is_rejected() {
    let storage = storage().await;
    seed_user(&storage).await;
    let state = AppState::new(storage, telemetry());
    let app = test::init_service(App::new().app_data(web::Data::new(state)).route(
        "/geetest/{game}/{discord_id}/{gt}/{challenge}",
        web::get().to(solve_page_handler),
    ))
    .await;

    let req = test::TestRequest::get()
        .uri(&format!(
            "/geetest/genshin/not-an-id/{}/{}",
            widget_token("gt"),
            widget_token("challenge")
        ))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(is_html(&resp));
}

#[actix_web::test]
async fn post_saves_solution_and_confirms() {
    let storage = storage().await;
    seed_user(&storage).await;
    let state = AppState::new(storage.clone(), telemetry());
    let app = test::init_service(App::new().app_data(web::Data::new(state)).route(
        "/geetest/{game}/{discord_id}",
        web::post().to(save_result_handler),
    ))
    .await;

    let req = test::TestRequest::post()
        .uri(&format!("/geetest/genshin/{REGISTERED_ID}"))
        .set_json(result("a", "b", "c"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_string(resp).await, RESULT_SAVED_MESSAGE);

    let record = storage
        .find_challenge(DiscordId::new(REGISTERED_ID))
        .await
        .unwrap()
        .expect("row was created");
    assert_eq!(
        record.solution_for(Game::Genshin),
        Some(&GeetestSolution {
            challenge: "a".into(),
            validate: "b".into(),
            seccode: "c".into(),
        })
    );
}

#[actix_web::test]
async fn post_rejects_unregistered_user() {
    let state = AppState::new(storage().await, telemetry());
    let app = test::init_service(App::new().app_data(web::Data::new(state)).route(
        "/geetest/{game}/{discord_id}",
        web::post().to(save_result_handler),
    ))
    .await;

    let req = test::TestRequest::post()
        .uri(&format!("/geetest/genshin/{REGISTERED_ID}"))
        .set_json(result("a", "b", "c"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(body_string(resp)
        .await
        .contains("register the user first"));
}

#[actix_web::test]
async fn repeated_post_is_idempotent() {
    let storage = storage().await;
    seed_user(&storage).await;
    let state = AppState::new(storage.clone(), telemetry());
    let app = test::init_service(App::new().app_data(web::Data::new(state)).route(
        "/geetest/{game}/{discord_id}",
        web::post().to(save_result_handler),
    ))
    .await;

    for _ in 0..2 {
        let req = test::TestRequest::post()
            .uri(&format!("/geetest/starrail/{REGISTERED_ID}"))
            .set_json(result("a", "b", "c"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let record = storage
        .find_challenge(DiscordId::new(REGISTERED_ID))
        .await
        .unwrap()
        .expect("row was created");
    assert_eq!(
        record.solution_for(Game::StarRail),
        Some(&GeetestSolution {
            challenge: "a".into(),
            validate: "b".into(),
            seccode: "c".into(),
        })
    );
    assert_eq!(record.solution_for(Game::Genshin), None);
    assert_eq!(record.solution_for(Game::Honkai3rd), None);
}

#[actix_web::test]
async fn post_preserves_solutions_for_other_games() {
    let storage = storage().await;
    seed_user(&storage).await;
    let state = AppState::new(storage.clone(), telemetry());
    let app = test::init_service(App::new().app_data(web::Data::new(state)).route(
        "/geetest/{game}/{discord_id}",
        web::post().to(save_result_handler),
    ))
    .await;

    let genshin = test::TestRequest::post()
        .uri(&format!("/geetest/genshin/{REGISTERED_ID}"))
        .set_json(result("a", "b", "c"))
        .to_request();
    assert_eq!(
        test::call_service(&app, genshin).await.status(),
        StatusCode::OK
    );

    let starrail = test::TestRequest::post()
        .uri(&format!("/geetest/starrail/{REGISTERED_ID}"))
        .set_json(result("d", "e", "f"))
        .to_request();
    assert_eq!(
        test::call_service(&app, starrail).await.status(),
        StatusCode::OK
    );

    let record = storage
        .find_challenge(DiscordId::new(REGISTERED_ID))
        .await
        .unwrap()
        .expect("row was created");
    assert_eq!(
        record.solution_for(Game::Genshin),
        Some(&GeetestSolution {
            challenge: "a".into(),
            validate: "b".into(),
            seccode: "c".into(),
        })
    );
    assert_eq!(
        record.solution_for(Game::StarRail),
        Some(&GeetestSolution {
            challenge: "d".into(),
            validate: "e".into(),
            seccode: "f".into(),
        })
    );
}

#[actix_web::test]
async fn unmatched_route_renders_error_page() {
    let app = test::init_service(
        App::new().default_service(web::route().to(fallback_handler)),
    )
    .await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/nothing/here").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(is_html(&resp));
    assert!(body_string(resp).await.contains("does not exist"));
}

#[actix_web::test]
async fn malformed_result_body_renders_error_page() {
    let storage = storage().await;
    seed_user(&storage).await;
    let state = AppState::new(storage, telemetry());
    let app = test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route(
                "/geetest/{game}/{discord_id}",
                web::post().to(save_result_handler),
            ),
    )
    .await;

    let req = test::TestRequest::post()
        .uri(&format!("/geetest/genshin/{REGISTERED_ID}"))
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("not-json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(is_html(&resp));
}
