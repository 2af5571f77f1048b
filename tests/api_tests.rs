use axum::body::Body;
use axum::Router;
use http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_json, body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use cmms_gateway::config::EnvironmentConfig;
use cmms_gateway::create_app;
use cmms_gateway::state::AppState;

const ORDER_ID: &str = "0b7c3a52-2f1e-4d0a-9a51-8a3c1f2e9d10";
const PLAN_ID: &str = "7d1f0c9e-5a4b-4c3d-8e2f-1a0b9c8d7e6f";
const ASSET_ID: &str = "a1f4c2b0-0000-4000-8000-000000000001";
const LOCATION_ID: &str = "b2c3d4e5-0000-4000-8000-000000000002";

struct TestApp {
    backend: MockServer,
    app: Router,
    state: AppState,
}

impl TestApp {
    async fn start() -> Self {
        Self::start_with(|_| {}).await
    }

    async fn start_with(configure: impl FnOnce(&mut EnvironmentConfig)) -> Self {
        let backend = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/notifications/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [],
                "count": 0
            })))
            .mount(&backend)
            .await;

        let mut config = EnvironmentConfig::new(backend.uri(), "test-secret");
        configure(&mut config);
        let state = AppState::new(config).expect("state");
        Self {
            backend,
            app: create_app(state.clone()),
            state,
        }
    }

    async fn requests_to(&self, target: &str) -> usize {
        self.backend
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == target)
            .count()
    }

    async fn expect_backend_logout(&self) {
        Mock::given(method("POST"))
            .and(path("/auth/logout/"))
            .respond_with(ResponseTemplate::new(205))
            .expect(1)
            .mount(&self.backend)
            .await;
    }

    async fn login_as(&self, role: &str) -> String {
        Mock::given(method("POST"))
            .and(path("/auth/login/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access": "backend-access",
                "refresh": "backend-refresh",
                "user": {
                    "id": "u-1",
                    "username": "mgarcia",
                    "email": "mgarcia@example.com",
                    "role": role
                }
            })))
            .mount(&self.backend)
            .await;

        let (status, body) = self
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "username": "mgarcia", "password": "secreto" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {}", body);
        body["data"]["token"].as_str().expect("token").to_string()
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }
}

fn work_order(status: &str) -> Value {
    let mut order = json!({
        "id": ORDER_ID,
        "title": "Revisión de frenos",
        "priority": "Alta",
        "status": status,
        "asset": ASSET_ID,
        "asset_name": "Camión 12"
    });
    if status == "Completada" {
        order["completed_date"] = json!("2024-05-02T15:30:00Z");
        order["actual_hours"] = json!("1.5");
        order["completion_notes"] = json!("Cambio de pastillas");
    }
    order
}

fn plan(recurrence: &str, status: &str, is_paused: bool) -> Value {
    json!({
        "id": PLAN_ID,
        "name": "Servicio 250 horas",
        "asset": ASSET_ID,
        "recurrence_type": recurrence,
        "recurrence_interval": 1,
        "start_date": "2024-01-01",
        "status": status,
        "is_paused": is_paused,
        "usage_threshold": "250",
        "is_due": false,
        "is_overdue": false,
        "days_until_due": null,
        "usage_until_due": 20
    })
}

fn asset() -> Value {
    json!({
        "id": ASSET_ID,
        "name": "Montacargas 3",
        "model": "H25",
        "installation_date": "2021-06-01",
        "status": "Activo",
        "location": LOCATION_ID,
        "location_name": "Bodega Norte",
        "vehicle_type": "Montacargas",
        "serial_number": "SN-0042"
    })
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::start().await;
    let (status, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["active_sessions"], 0);
}

#[tokio::test]
async fn test_health_counts_open_sessions() {
    let app = TestApp::start().await;
    let token = app.login_as("OPERADOR").await;

    let (_, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(body["active_sessions"], 1);

    app.expect_backend_logout().await;
    app.send(Method::POST, "/api/auth/logout", Some(&token), None)
        .await;

    let (_, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(body["active_sessions"], 0);
}

#[tokio::test]
async fn test_expired_sessions_are_reaped_without_polling() {
    let app = TestApp::start_with(|config| config.session_ttl_hours = 0).await;
    app.login_as("SUPERVISOR").await;
    app.expect_backend_logout().await;

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(app.state.sessions.active_sessions().await, 1);

    assert_eq!(app.state.sessions.reap_expired().await, 1);
    assert_eq!(app.state.sessions.active_sessions().await, 0);
    assert_eq!(app.state.sessions.reap_expired().await, 0);

    // El poller de una sesión vencida no llega a consultar el backend
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    assert_eq!(app.requests_to("/notifications/").await, 0);
}

#[tokio::test]
async fn test_expired_token_closes_its_session() {
    let app = TestApp::start_with(|config| config.session_ttl_hours = 0).await;
    let token = app.login_as("SUPERVISOR").await;
    app.expect_backend_logout().await;

    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let (status, _) = app.send(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.state.sessions.active_sessions().await, 0);
}

#[tokio::test]
async fn test_login_with_unknown_role_is_forbidden() {
    let app = TestApp::start().await;

    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "backend-access",
            "refresh": "backend-refresh",
            "user": { "id": "u-9", "username": "tecnico1", "role": "TECNICO" }
        })))
        .mount(&app.backend)
        .await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "tecnico1", "password": "secreto" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], "FORBIDDEN");
    assert!(body["message"].as_str().unwrap().contains("TECNICO"), "{}", body);
    assert_eq!(app.state.sessions.active_sessions().await, 0);
}

#[tokio::test]
async fn test_protected_routes_require_session() {
    let app = TestApp::start().await;
    let (status, body) = app
        .send(Method::GET, "/api/work-orders", None, None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = app
        .send(Method::GET, "/api/work-orders", Some("not-a-token"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_me_logout() {
    let app = TestApp::start().await;
    let token = app.login_as("SUPERVISOR").await;

    let (status, body) = app.send(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "SUPERVISOR");
    assert_eq!(body["user"]["username"], "mgarcia");

    Mock::given(method("POST"))
        .and(path("/auth/logout/"))
        .and(body_json(json!({ "refresh": "backend-refresh" })))
        .respond_with(ResponseTemplate::new(205))
        .expect(1)
        .mount(&app.backend)
        .await;

    let (status, _) = app
        .send(Method::POST, "/api/auth/logout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.send(Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_rejected_by_backend_is_verbatim() {
    let app = TestApp::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "Credenciales inválidas"
        })))
        .mount(&app.backend)
        .await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "username": "mgarcia", "password": "malo" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Credenciales inválidas");
}

#[tokio::test]
async fn test_work_order_detail_offers_table_row() {
    let app = TestApp::start().await;
    let token = app.login_as("OPERADOR").await;

    Mock::given(method("GET"))
        .and(path(format!("/work-orders/{}/", ORDER_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(work_order("Pendiente")))
        .mount(&app.backend)
        .await;

    let (status, body) = app
        .send(Method::GET, &format!("/api/work-orders/{}", ORDER_ID), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "Pendiente");
    assert_eq!(
        body["available_transitions"],
        json!([
            { "target": "En Progreso", "requires_completion_form": false },
            { "target": "Cancelada", "requires_completion_form": false }
        ])
    );
}

#[tokio::test]
async fn test_completed_work_order_has_no_transitions() {
    let app = TestApp::start().await;
    let token = app.login_as("ADMIN").await;

    Mock::given(method("GET"))
        .and(path(format!("/work-orders/{}/", ORDER_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(work_order("Completada")))
        .mount(&app.backend)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/work-orders/{}/transition_status/", ORDER_ID)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.backend)
        .await;

    let (_, body) = app
        .send(Method::GET, &format!("/api/work-orders/{}", ORDER_ID), Some(&token), None)
        .await;
    assert_eq!(body["available_transitions"], json!([]));
    assert_eq!(body["is_terminal"], true);

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/work-orders/{}/transition", ORDER_ID),
            Some(&token),
            Some(json!({ "new_status": "Cancelada" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_complete_with_invalid_payload_never_reaches_backend() {
    let app = TestApp::start().await;
    let token = app.login_as("OPERADOR").await;

    Mock::given(method("GET"))
        .and(path(format!("/work-orders/{}/", ORDER_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(work_order("En Progreso")))
        .expect(0)
        .mount(&app.backend)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/work-orders/{}/complete/", ORDER_ID)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.backend)
        .await;

    let uri = format!("/api/work-orders/{}/complete", ORDER_ID);
    for payload in [
        json!({ "completion_notes": "Listo", "actual_hours": 0 }),
        json!({ "completion_notes": "Listo", "actual_hours": -1 }),
        json!({ "completion_notes": "   ", "actual_hours": 2 }),
    ] {
        let (status, body) = app
            .send(Method::POST, &uri, Some(&token), Some(payload))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_complete_work_order_refetches() {
    let app = TestApp::start().await;
    let token = app.login_as("OPERADOR").await;

    Mock::given(method("GET"))
        .and(path(format!("/work-orders/{}/", ORDER_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(work_order("En Progreso")))
        .up_to_n_times(1)
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/work-orders/{}/", ORDER_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(work_order("Completada")))
        .mount(&app.backend)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/work-orders/{}/complete/", ORDER_ID)))
        .and(body_partial_json(json!({ "completion_notes": "Cambio de pastillas" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&app.backend)
        .await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/work-orders/{}/complete", ORDER_ID),
            Some(&token),
            Some(json!({ "completion_notes": "Cambio de pastillas", "actual_hours": 1.5 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "Completada");
    assert_eq!(body["data"]["available_transitions"], json!([]));
}

#[tokio::test]
async fn test_transition_rejection_is_surfaced_verbatim() {
    let app = TestApp::start().await;
    let token = app.login_as("SUPERVISOR").await;

    Mock::given(method("GET"))
        .and(path(format!("/work-orders/{}/", ORDER_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(work_order("Pendiente")))
        .mount(&app.backend)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/work-orders/{}/transition_status/", ORDER_ID)))
        .and(body_json(json!({ "new_status": "En Progreso" })))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "La orden no tiene técnico asignado"
        })))
        .expect(1)
        .mount(&app.backend)
        .await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/work-orders/{}/transition", ORDER_ID),
            Some(&token),
            Some(json!({ "new_status": "En Progreso" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "SERVER_REJECTED");
    assert_eq!(body["message"], "La orden no tiene técnico asignado");
}

#[tokio::test]
async fn test_transition_to_completed_requires_completion_form() {
    let app = TestApp::start().await;
    let token = app.login_as("SUPERVISOR").await;

    Mock::given(method("GET"))
        .and(path(format!("/work-orders/{}/", ORDER_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(work_order("En Progreso")))
        .mount(&app.backend)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/work-orders/{}/transition_status/", ORDER_ID)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.backend)
        .await;

    let (status, _) = app
        .send(
            Method::POST,
            &format!("/api/work-orders/{}/transition", ORDER_ID),
            Some(&token),
            Some(json!({ "new_status": "Completada" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_operador_asset_form_disables_restricted_fields() {
    let app = TestApp::start().await;
    let token = app.login_as("OPERADOR").await;

    Mock::given(method("GET"))
        .and(path(format!("/assets/{}/", ASSET_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(asset()))
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/locations/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [{ "id": LOCATION_ID, "name": "Bodega Norte" }],
            "count": 1
        })))
        .mount(&app.backend)
        .await;

    let (status, body) = app
        .send(Method::GET, &format!("/api/assets/{}/form", ASSET_ID), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let fields = body["fields"].as_array().unwrap();
    assert_eq!(fields.len(), 8);
    for field in fields {
        let name = field["field"].as_str().unwrap();
        let locked = matches!(name, "vehicle_type" | "serial_number" | "status" | "location");
        assert_eq!(field["disabled"], locked, "field {}", name);
    }
    let serial = fields.iter().find(|f| f["field"] == "serial_number").unwrap();
    assert_eq!(serial["value"], "SN-0042");
    assert_eq!(body["location_options"][0]["name"], "Bodega Norte");
}

#[tokio::test]
async fn test_asset_form_survives_location_failure() {
    let app = TestApp::start().await;
    let token = app.login_as("ADMIN").await;

    Mock::given(method("GET"))
        .and(path("/locations/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.backend)
        .await;

    let (status, body) = app
        .send(Method::GET, "/api/assets/form", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location_options"], json!([]));
    assert!(body["fields"]
        .as_array()
        .unwrap()
        .iter()
        .all(|field| field["disabled"] == false));
}

#[tokio::test]
async fn test_operador_cannot_change_locked_asset_fields() {
    let app = TestApp::start().await;
    let token = app.login_as("OPERADOR").await;

    Mock::given(method("GET"))
        .and(path(format!("/assets/{}/", ASSET_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(asset()))
        .mount(&app.backend)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/assets/{}/", ASSET_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(asset()))
        .expect(0)
        .mount(&app.backend)
        .await;

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/assets/{}", ASSET_ID),
            Some(&token),
            Some(json!({ "name": "Montacargas 3", "serial_number": "SN-9999" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(body["message"].as_str().unwrap().contains("serial_number"));
}

#[tokio::test]
async fn test_operador_update_sends_unchanged_locked_values() {
    let app = TestApp::start().await;
    let token = app.login_as("OPERADOR").await;

    Mock::given(method("GET"))
        .and(path(format!("/assets/{}/", ASSET_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(asset()))
        .mount(&app.backend)
        .await;
    Mock::given(method("PUT"))
        .and(path(format!("/assets/{}/", ASSET_ID)))
        .and(body_partial_json(json!({
            "name": "Montacargas 3B",
            "status": "Activo",
            "location": LOCATION_ID,
            "vehicle_type": "Montacargas",
            "serial_number": "SN-0042"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(asset()))
        .expect(1)
        .mount(&app.backend)
        .await;

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/assets/{}", ASSET_ID),
            Some(&token),
            Some(json!({ "name": "Montacargas 3B", "model": "H25" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
}

#[tokio::test]
async fn test_plan_detail_shows_usage_badge() {
    let app = TestApp::start().await;
    let token = app.login_as("SUPERVISOR").await;

    Mock::given(method("GET"))
        .and(path(format!("/maintenance/plans/{}/", PLAN_ID)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(plan("Por Horas", "Activo", false)),
        )
        .mount(&app.backend)
        .await;

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/maintenance/plans/{}", PLAN_ID),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["due_badge"], json!({ "tone": "gray", "label": "20 hrs restantes" }));
    assert_eq!(body["usage_unit"], "hrs");
    let actions: Vec<&str> = body["available_actions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["pause", "complete", "update_usage"]);
}

#[tokio::test]
async fn test_pause_requires_confirmation_before_any_call() {
    let app = TestApp::start().await;
    let token = app.login_as("SUPERVISOR").await;

    Mock::given(method("GET"))
        .and(path(format!("/maintenance/plans/{}/", PLAN_ID)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(plan("Mensual", "Activo", false)),
        )
        .expect(0)
        .mount(&app.backend)
        .await;

    let uri = format!("/api/maintenance/plans/{}/pause", PLAN_ID);
    let (status, body) = app.send(Method::POST, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::PRECONDITION_REQUIRED);
    assert_eq!(body["code"], "CONFIRMATION_REQUIRED");

    let (status, _) = app
        .send(Method::POST, &uri, Some(&token), Some(json!({ "confirmed": false })))
        .await;
    assert_eq!(status, StatusCode::PRECONDITION_REQUIRED);
}

#[tokio::test]
async fn test_pause_confirmed_dispatches_and_refetches() {
    let app = TestApp::start().await;
    let token = app.login_as("SUPERVISOR").await;

    Mock::given(method("GET"))
        .and(path(format!("/maintenance/plans/{}/", PLAN_ID)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(plan("Mensual", "Activo", false)),
        )
        .up_to_n_times(1)
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/maintenance/plans/{}/", PLAN_ID)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(plan("Mensual", "Pausado", true)),
        )
        .mount(&app.backend)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/maintenance/plans/{}/pause_resume/", PLAN_ID)))
        .and(body_json(json!({ "action": "pause" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": plan("Mensual", "Pausado", true)
        })))
        .expect(1)
        .mount(&app.backend)
        .await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/maintenance/plans/{}/pause", PLAN_ID),
            Some(&token),
            Some(json!({ "confirmed": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["data"]["status"], "Pausado");
    assert_eq!(
        body["data"]["available_actions"],
        json!([{ "action": "resume", "requires_confirmation": true }])
    );
}

#[tokio::test]
async fn test_pause_not_offered_for_paused_plan() {
    let app = TestApp::start().await;
    let token = app.login_as("ADMIN").await;

    Mock::given(method("GET"))
        .and(path(format!("/maintenance/plans/{}/", PLAN_ID)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(plan("Mensual", "Pausado", true)),
        )
        .mount(&app.backend)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/maintenance/plans/{}/pause_resume/", PLAN_ID)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.backend)
        .await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/maintenance/plans/{}/pause", PLAN_ID),
            Some(&token),
            Some(json!({ "confirmed": true })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ACTION_NOT_ALLOWED");
}

#[tokio::test]
async fn test_resume_confirmed_dispatches_and_refetches() {
    let app = TestApp::start().await;
    let token = app.login_as("SUPERVISOR").await;

    Mock::given(method("GET"))
        .and(path(format!("/maintenance/plans/{}/", PLAN_ID)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(plan("Mensual", "Pausado", true)),
        )
        .up_to_n_times(1)
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/maintenance/plans/{}/", PLAN_ID)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(plan("Mensual", "Activo", false)),
        )
        .mount(&app.backend)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/maintenance/plans/{}/pause_resume/", PLAN_ID)))
        .and(body_json(json!({ "action": "resume" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": plan("Mensual", "Activo", false)
        })))
        .expect(1)
        .mount(&app.backend)
        .await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/maintenance/plans/{}/resume", PLAN_ID),
            Some(&token),
            Some(json!({ "confirmed": true })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "Plan reanudado");
    assert_eq!(body["data"]["status"], "Activo");
    let actions: Vec<&str> = body["data"]["available_actions"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["action"].as_str().unwrap())
        .collect();
    assert_eq!(actions, vec!["pause", "complete"]);
}

#[tokio::test]
async fn test_update_usage_sends_reading_and_refetches() {
    let app = TestApp::start().await;
    let token = app.login_as("OPERADOR").await;

    let mut after = plan("Por Horas", "Activo", false);
    after["usage_until_due"] = json!(5);

    Mock::given(method("GET"))
        .and(path(format!("/maintenance/plans/{}/", PLAN_ID)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(plan("Por Horas", "Activo", false)),
        )
        .up_to_n_times(1)
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/maintenance/plans/{}/", PLAN_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(after))
        .mount(&app.backend)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/maintenance/plans/{}/update_usage/", PLAN_ID)))
        .and(body_json(json!({ "current_usage": "245" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .expect(1)
        .mount(&app.backend)
        .await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/maintenance/plans/{}/usage", PLAN_ID),
            Some(&token),
            Some(json!({ "current_usage": 245 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["message"], "Lectura de uso actualizada");
    assert_eq!(body["data"]["due_badge"]["label"], "5 hrs restantes");
}

#[tokio::test]
async fn test_update_usage_rejected_for_time_based_and_terminal_plans() {
    for (recurrence, status) in [("Mensual", "Activo"), ("Por Horas", "Completado")] {
        let app = TestApp::start().await;
        let token = app.login_as("SUPERVISOR").await;

        Mock::given(method("GET"))
            .and(path(format!("/maintenance/plans/{}/", PLAN_ID)))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(plan(recurrence, status, false)),
            )
            .mount(&app.backend)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("/maintenance/plans/{}/update_usage/", PLAN_ID)))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&app.backend)
            .await;

        let (code, body) = app
            .send(
                Method::POST,
                &format!("/api/maintenance/plans/{}/usage", PLAN_ID),
                Some(&token),
                Some(json!({ "current_usage": 300 })),
            )
            .await;
        assert_eq!(code, StatusCode::CONFLICT, "{} {}: {}", recurrence, status, body);
        assert_eq!(body["code"], "ACTION_NOT_ALLOWED");
    }
}

#[tokio::test]
async fn test_update_of_terminal_plan_is_rejected() {
    let app = TestApp::start().await;
    let token = app.login_as("ADMIN").await;

    Mock::given(method("GET"))
        .and(path(format!("/maintenance/plans/{}/", PLAN_ID)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(plan("Mensual", "Cancelado", false)),
        )
        .mount(&app.backend)
        .await;
    Mock::given(method("PATCH"))
        .and(path(format!("/maintenance/plans/{}/", PLAN_ID)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.backend)
        .await;

    let (status, body) = app
        .send(
            Method::PUT,
            &format!("/api/maintenance/plans/{}", PLAN_ID),
            Some(&token),
            Some(json!({ "name": "Servicio mensual" })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{}", body);
    assert_eq!(body["code"], "ACTION_NOT_ALLOWED");
}

#[tokio::test]
async fn test_usage_plan_completion_requires_usage_value() {
    let app = TestApp::start().await;
    let token = app.login_as("SUPERVISOR").await;

    Mock::given(method("GET"))
        .and(path(format!("/maintenance/plans/{}/", PLAN_ID)))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(plan("Por Kilómetros", "Activo", false)),
        )
        .mount(&app.backend)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/maintenance/plans/{}/complete/", PLAN_ID)))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.backend)
        .await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/maintenance/plans/{}/complete", PLAN_ID),
            Some(&token),
            Some(json!({ "completion_date": "2024-05-02" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].get("usage_value").is_some(), "{}", body);
}

#[tokio::test]
async fn test_field_errors_are_mapped_per_field() {
    let app = TestApp::start().await;
    let token = app.login_as("ADMIN").await;

    Mock::given(method("POST"))
        .and(path("/work-orders/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "assigned_to": ["El técnico no está disponible."]
        })))
        .mount(&app.backend)
        .await;

    let (status, body) = app
        .send(
            Method::POST,
            "/api/work-orders",
            Some(&token),
            Some(json!({
                "title": "Cambio de aceite",
                "priority": "Media",
                "asset": ASSET_ID,
                "assigned_to": "c3d4e5f6-0000-4000-8000-000000000003"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["details"]["fields"]["assigned_to"],
        json!(["El técnico no está disponible."])
    );
}

#[tokio::test]
async fn test_dashboard_reports_failed_counter_as_null() {
    let app = TestApp::start().await;
    let token = app.login_as("SUPERVISOR").await;

    Mock::given(method("GET"))
        .and(path("/maintenance/plans/"))
        .and(query_param("is_overdue", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [], "count": 3 })))
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/maintenance/plans/"))
        .and(query_param("is_due", "true"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/work-orders/"))
        .and(query_param("status", "Pendiente"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [], "count": 7 })))
        .mount(&app.backend)
        .await;
    Mock::given(method("GET"))
        .and(path("/work-orders/"))
        .and(query_param("status", "En Progreso"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [], "count": 2 })))
        .mount(&app.backend)
        .await;

    let (status, body) = app
        .send(Method::GET, "/api/dashboard", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["overdue_plans"], 3);
    assert_eq!(body["due_plans"], Value::Null);
    assert_eq!(body["pending_work_orders"], 7);
    assert_eq!(body["in_progress_work_orders"], 2);
}

#[tokio::test]
async fn test_mark_notification_read_refreshes_inbox() {
    let app = TestApp::start().await;
    let token = app.login_as("OPERADOR").await;
    let notification_id = "d4e5f6a7-0000-4000-8000-000000000004";

    Mock::given(method("POST"))
        .and(path(format!("/notifications/{}/mark_read/", notification_id)))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&app.backend)
        .await;

    let (status, body) = app
        .send(
            Method::POST,
            &format!("/api/notifications/{}/read", notification_id),
            Some(&token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["unread_count"], 0);
}
