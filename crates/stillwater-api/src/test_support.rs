use std::sync::{Arc, Mutex};

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use chrono::FixedOffset;
use futures_util::future::BoxFuture;
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use tower::ServiceExt;

use stillwater_db::Database;
use stillwater_types::api::{Claims, PushPayload};

use crate::push::PushTransport;
use crate::routes::router;
use crate::state::{AppState, AppStateInner};

pub const JWT_SECRET: &str = "test-secret";

/// Records every send; endpoints containing "gone" fail.
#[derive(Default)]
pub struct RecordingPush {
    pub sent: Mutex<Vec<(String, PushPayload)>>,
}

impl PushTransport for RecordingPush {
    fn send<'a>(
        &'a self,
        endpoint: &'a str,
        payload: &'a PushPayload,
    ) -> BoxFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            self.sent
                .lock()
                .unwrap()
                .push((endpoint.to_string(), payload.clone()));
            if endpoint.contains("gone") {
                anyhow::bail!("410 Gone");
            }
            Ok(())
        })
    }
}

pub fn test_state(push: Arc<RecordingPush>, cron_secret: Option<&str>) -> AppState {
    Arc::new(AppStateInner {
        db: Database::open_in_memory().unwrap(),
        push,
        jwt_secret: JWT_SECRET.into(),
        cron_secret: cron_secret.map(str::to_string),
        app_url: "https://app.example/".into(),
        clock_offset: FixedOffset::east_opt(0).unwrap(),
    })
}

pub fn token_for(user_id: &str) -> String {
    let claims = Claims {
        sub: user_id.into(),
        exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp() as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(JWT_SECRET.as_bytes())).unwrap()
}

pub fn json_request(method: &str, uri: &str, body: serde_json::Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn call(state: &AppState, req: Request<Body>) -> (StatusCode, serde_json::Value) {
    let app: Router = router(state.clone());
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}
