use crate::api::ApiClient;
use crate::config::Config;
use crate::errors::ApiError;
use crate::freshness::KeyedView;
use crate::models::{ActivityRecord, DailySummary, Screenshot};
use crate::session::Session;
use crate::summary::{mean_productivity_score, summarize};
use chrono::NaiveDate;
use std::sync::Arc;

/// Everything one day page shows, recomputed on every fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct DayReport {
    pub activities: Vec<ActivityRecord>,
    pub screenshots: Vec<Screenshot>,
    pub summary: DailySummary,
    pub mean_productivity_score: f64,
}

impl DayReport {
    pub fn new(activities: Vec<ActivityRecord>, screenshots: Vec<Screenshot>) -> Self {
        Self {
            summary: summarize(&activities),
            mean_productivity_score: mean_productivity_score(&activities),
            activities,
            screenshots,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserDay {
    pub user_id: i64,
    pub date: NaiveDate,
}

#[derive(Default)]
pub struct Views {
    /// The signed-in user's own day, keyed by date.
    pub own_day: KeyedView<NaiveDate, DayReport>,
    /// The admin's selected user and day.
    pub user_day: KeyedView<UserDay, DayReport>,
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub session: Session,
    pub api: ApiClient,
    pub views: Arc<Views>,
}

impl AppState {
    pub fn new(config: Config, session: Session) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config.api_base_url, config.request_timeout, session.clone())?;
        Ok(Self {
            config: Arc::new(config),
            session,
            api,
            views: Arc::new(Views::default()),
        })
    }
}
