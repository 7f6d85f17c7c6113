use crate::api::{patients, AppState};
use crate::auth::{api as auth_api, auth_middleware, role_middleware, RoleGate};
use crate::middleware::request_logging;
use axum::{
    middleware,
    routing::{get, post, put},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

const RECEPTIONIST: &str = "receptionist";
const DOCTOR: &str = "doctor";

/// Assemble the full application router.
///
/// Public: `/health`, `/login`. Everything else passes the token gate first,
/// then any per-route role gate.
pub fn build_router(state: AppState) -> Router {
    let receptionist_only =
        middleware::from_fn_with_state(RoleGate::new([RECEPTIONIST]), role_middleware);
    let clinical_staff =
        middleware::from_fn_with_state(RoleGate::new([RECEPTIONIST, DOCTOR]), role_middleware);

    let auth_routes = Router::new()
        .route("/login", post(auth_api::login))
        .with_state(state.authenticator.clone());

    let protected_routes = Router::new()
        .route("/auth/logout", post(auth_api::logout))
        .route("/auth/me", get(auth_api::current_user))
        .route(
            "/patients",
            post(patients::create_patient).route_layer(receptionist_only.clone()),
        )
        .route(
            "/patients/:id",
            get(patients::get_patient).route_layer(clinical_staff).merge(
                put(patients::update_patient)
                    .delete(patients::delete_patient)
                    .route_layer(receptionist_only),
            ),
        )
        .route_layer(middleware::from_fn_with_state(
            state.codec.clone(),
            auth_middleware,
        ))
        .with_state(state.patients.clone());

    let public_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(protected_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
