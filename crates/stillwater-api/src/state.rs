use std::sync::Arc;

use chrono::{FixedOffset, NaiveTime, Utc};

use stillwater_db::Database;

use crate::push::PushTransport;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub push: Arc<dyn PushTransport>,
    pub jwt_secret: String,
    /// When set, the dispatch route requires `Authorization: Bearer <secret>`.
    pub cron_secret: Option<String>,
    /// Sent as the `url` of every push payload.
    pub app_url: String,
    /// Offset of the wall clock used for slot matching.
    pub clock_offset: FixedOffset,
}

impl AppStateInner {
    /// Current wall-clock time in the configured offset.
    pub fn local_time(&self) -> NaiveTime {
        Utc::now().with_timezone(&self.clock_offset).time()
    }
}
