use axum::{
    Json, Router, middleware,
    routing::{get, post, put},
};

use crate::middleware::{require_auth, require_cron_secret};
use crate::state::AppState;
use crate::{notifications, profile, redeem, subscriptions};

/// All application routes. CORS and tracing layers are added by the server.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/redeem-code", post(redeem::redeem_code));

    let cron_routes = Router::new()
        .route(
            "/send-notifications",
            get(notifications::send_notifications).post(notifications::send_notifications),
        )
        .layer(middleware::from_fn_with_state(state.clone(), require_cron_secret));

    let protected_routes = Router::new()
        .route(
            "/push-subscriptions",
            post(subscriptions::subscribe).delete(subscriptions::unsubscribe),
        )
        .route("/profile/notifications", put(profile::set_notification_preference))
        .route("/notifications", get(notifications::list_notifications))
        .route("/notifications/{id}/read", post(notifications::mark_read))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .merge(public_routes)
        .merge(cron_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;

    use crate::test_support::{RecordingPush, call, empty_request, test_state};

    #[tokio::test]
    async fn health_is_public() {
        let state = test_state(Arc::new(RecordingPush::default()), Some("cron"));
        let (status, body) = call(&state, empty_request("GET", "/health", None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
