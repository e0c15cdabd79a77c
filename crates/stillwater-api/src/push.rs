use std::time::Duration;

use futures_util::future::BoxFuture;
use reqwest::header::HeaderValue;

use stillwater_types::api::PushPayload;

/// Delivers one payload to one subscription endpoint.
///
/// Only the endpoint is used as an address; the subscription keys stay opaque.
pub trait PushTransport: Send + Sync {
    fn send<'a>(&'a self, endpoint: &'a str, payload: &'a PushPayload)
    -> BoxFuture<'a, anyhow::Result<()>>;
}

/// Plain HTTP POST of the JSON payload to the subscription endpoint.
pub struct HttpPushTransport {
    client: reqwest::Client,
}

/// Seconds push services may hold an undelivered message.
const PUSH_TTL_SECS: &str = "86400";

impl HttpPushTransport {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl PushTransport for HttpPushTransport {
    fn send<'a>(
        &'a self,
        endpoint: &'a str,
        payload: &'a PushPayload,
    ) -> BoxFuture<'a, anyhow::Result<()>> {
        Box::pin(async move {
            self.client
                .post(endpoint)
                .header("TTL", HeaderValue::from_static(PUSH_TTL_SECS))
                .json(payload)
                .send()
                .await?
                .error_for_status()?;
            Ok(())
        })
    }
}
