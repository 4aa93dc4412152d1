use async_trait::async_trait;
use liberator_models::{HiddenSection, SyncResponse, UserSettings};
use liberator_trakt::{ApiResponse, RateLimitedClient, TraktApi, TraktError};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{info, instrument, warn};
use crate::capacity::{self, CapacityDecision, CapacityReport};
use crate::export::ExportData;
use crate::transform;

pub const CONTINUE_PROMPT: &str = "Press Enter to continue importing your watch history...";

/// The remote operations of an import, in the order they run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStep {
    Profile,
    Watchlist,
    History,
    HiddenProgress,
    HiddenRecommendations,
}

impl SyncStep {
    pub fn endpoint(&self) -> &'static str {
        match self {
            SyncStep::Profile => "/users/settings",
            SyncStep::Watchlist => "/sync/watchlist",
            SyncStep::History => "/sync/history",
            SyncStep::HiddenProgress => "/users/hidden/progress_watched",
            SyncStep::HiddenRecommendations => "/users/hidden/recommendations",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SyncStep::Profile => "account settings",
            SyncStep::Watchlist => "watchlist",
            SyncStep::History => "watch history",
            SyncStep::HiddenProgress => "hidden from progress",
            SyncStep::HiddenRecommendations => "hidden from recommendations",
        }
    }
}

impl fmt::Display for SyncStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("{step} failed: {source}")]
    Remote {
        step: SyncStep,
        #[source]
        source: TraktError,
    },

    #[error("unexpected {step} response: {source}")]
    Decode {
        step: SyncStep,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed waiting for acknowledgement: {0}")]
    Acknowledgement(#[source] std::io::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    Submitted {
        items: usize,
        status: u16,
        /// `None` when Trakt answered with a body we could not read as counts
        response: Option<SyncResponse>,
    },
    /// A read that completed, such as the account settings
    Fetched { status: u16 },
    Skipped(CapacityReport),
}

#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub step: SyncStep,
    #[serde(flatten)]
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub username: Option<String>,
    pub vip: bool,
    pub episodes: usize,
    pub history_movies: usize,
    pub steps: Vec<StepRecord>,
    #[serde(skip)]
    pub duration: Duration,
}

impl SyncReport {
    pub fn outcome(&self, step: SyncStep) -> Option<&StepOutcome> {
        self.steps.iter().find(|record| record.step == step).map(|record| &record.outcome)
    }

    pub fn watchlist_skipped(&self) -> bool {
        matches!(self.outcome(SyncStep::Watchlist), Some(StepOutcome::Skipped(_)))
    }
}

/// Hooks for surfacing progress and asking the user to continue.
///
/// Every `step_started` is followed by a `step_finished` for the same step
/// unless the step fails.
#[async_trait]
pub trait SyncObserver: Send + Sync {
    fn step_started(&self, _step: SyncStep, _items: usize) {}

    fn step_finished(&self, _step: SyncStep, _outcome: &StepOutcome) {}

    fn capacity_exceeded(&self, report: &CapacityReport);

    /// Resolves once the user says to go on. Implementations that read from a
    /// terminal must not block the runtime thread.
    async fn wait_for_acknowledgement(&self, message: &str) -> std::io::Result<()>;
}

/// Observer that only logs and continues straight away
pub struct LoggingObserver;

#[async_trait]
impl SyncObserver for LoggingObserver {
    fn capacity_exceeded(&self, report: &CapacityReport) {
        warn!(
            shows = report.shows,
            movies = report.movies,
            total = report.total,
            limit = report.limit,
            tier = report.tier(),
            "Watchlist exceeds the account limit, skipping watchlist import"
        );
    }

    async fn wait_for_acknowledgement(&self, _message: &str) -> std::io::Result<()> {
        Ok(())
    }
}

/// Runs the import steps one after another through a single rate-limited client.
///
/// No step starts before the previous one has returned and its body has been
/// read. The first failing step aborts the rest.
pub struct SyncOrchestrator<A> {
    client: RateLimitedClient<A>,
    observer: Arc<dyn SyncObserver>,
}

impl<A: TraktApi> SyncOrchestrator<A> {
    pub fn new(client: RateLimitedClient<A>) -> Self {
        Self {
            client,
            observer: Arc::new(LoggingObserver),
        }
    }

    pub fn with_observer(mut self, observer: Arc<dyn SyncObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[instrument(skip(self, export), fields(backend = self.client.backend_name()))]
    pub async fn sync(&self, export: &ExportData) -> Result<SyncReport, SyncError> {
        let start = Instant::now();
        let mut steps = Vec::with_capacity(4);

        self.observer.step_started(SyncStep::Profile, 0);
        let (status, settings) = self.fetch_profile().await?;
        self.observer.step_finished(SyncStep::Profile, &StepOutcome::Fetched { status });
        let vip = settings.user.vip;
        info!(
            username = settings.user.username.as_deref().unwrap_or("unknown"),
            vip,
            "Fetched Trakt account settings"
        );

        let watchlist = transform::watchlist_batch(&export.shows, &export.movies);
        let outcome = match capacity::decide(vip, watchlist.shows.len(), watchlist.movies.len()) {
            CapacityDecision::Blocked(report) => {
                self.observer.capacity_exceeded(&report);
                self.observer
                    .wait_for_acknowledgement(CONTINUE_PROMPT)
                    .await
                    .map_err(SyncError::Acknowledgement)?;
                StepOutcome::Skipped(report)
            }
            CapacityDecision::Proceed => {
                self.observer.step_started(SyncStep::Watchlist, watchlist.item_count());
                let result = self.client.add_to_watchlist(&watchlist).await;
                submitted(SyncStep::Watchlist, watchlist.item_count(), result)?
            }
        };
        self.finish(&mut steps, SyncStep::Watchlist, outcome);

        let history = transform::history_batch(&export.shows, &export.movies);
        let episodes = history.episode_count();
        let unidentified = history.shows.iter().filter(|show| show.ids.is_empty()).count()
            + history.movies.iter().filter(|movie| movie.ids.is_empty()).count();
        if unidentified > 0 {
            warn!(unidentified, "Some records carry no usable id, Trakt will report them as not found");
        }
        info!(
            episodes,
            movies = history.movies.len(),
            "Adding {} episodes and {} movies to watch history, this may take a while",
            episodes,
            history.movies.len()
        );
        self.observer.step_started(SyncStep::History, episodes + history.movies.len());
        let result = self.client.add_to_history(&history).await;
        let outcome = submitted(SyncStep::History, episodes + history.movies.len(), result)?;
        self.finish(&mut steps, SyncStep::History, outcome);

        let hidden = transform::hidden_batch(&export.shows);
        for (step, section) in [
            (SyncStep::HiddenProgress, HiddenSection::ProgressWatched),
            (SyncStep::HiddenRecommendations, HiddenSection::Recommendations),
        ] {
            self.observer.step_started(step, hidden.item_count());
            let result = self.client.add_hidden_items(section, &hidden).await;
            let outcome = submitted(step, hidden.item_count(), result)?;
            self.finish(&mut steps, step, outcome);
        }

        Ok(SyncReport {
            username: settings.user.username,
            vip,
            episodes,
            history_movies: history.movies.len(),
            steps,
            duration: start.elapsed(),
        })
    }

    async fn fetch_profile(&self) -> Result<(u16, UserSettings), SyncError> {
        let step = SyncStep::Profile;
        let response = self
            .client
            .user_settings()
            .await
            .and_then(|response| response.error_for_status(step.endpoint()))
            .map_err(|source| SyncError::Remote { step, source })?;

        let settings = response.json().map_err(|source| SyncError::Decode { step, source })?;
        Ok((response.status, settings))
    }

    fn finish(&self, steps: &mut Vec<StepRecord>, step: SyncStep, outcome: StepOutcome) {
        self.observer.step_finished(step, &outcome);
        steps.push(StepRecord { step, outcome });
    }
}

fn submitted(
    step: SyncStep,
    items: usize,
    result: Result<ApiResponse, TraktError>,
) -> Result<StepOutcome, SyncError> {
    let response = result
        .and_then(|response| response.error_for_status(step.endpoint()))
        .map_err(|source| SyncError::Remote { step, source })?;

    let parsed = match response.json::<SyncResponse>() {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!(step = %step, error = %e, body = %response.body, "Could not read Trakt response counts");
            None
        }
    };

    info!(step = %step, status = response.status, items, body = %response.body, "Imported {}", step);
    Ok(StepOutcome::Submitted {
        items,
        status: response.status,
        response: parsed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use liberator_models::{
        Episode, ExportIds, HiddenBatch, HistoryBatch, Movie, Season, Show, ShowStatus, WatchlistBatch,
    };
    use serde_json::{json, Value};
    use std::io::ErrorKind;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Endpoints and bodies as the backend saw them, shared with the test
    #[derive(Clone, Default)]
    struct CallLog(Arc<Mutex<Vec<(String, Value)>>>);

    impl CallLog {
        fn push(&self, endpoint: &str, body: Value) {
            self.0.lock().unwrap().push((endpoint.to_string(), body));
        }

        fn endpoints(&self) -> Vec<String> {
            self.0.lock().unwrap().iter().map(|(e, _)| e.clone()).collect()
        }

        fn body(&self, endpoint: &str) -> Option<Value> {
            self.0
                .lock()
                .unwrap()
                .iter()
                .find(|(e, _)| e == endpoint)
                .map(|(_, body)| body.clone())
        }
    }

    /// Records every call and its body; can be told to reject one endpoint
    /// or to answer the settings call with a canned response
    struct RecordingApi {
        vip: bool,
        fail_endpoint: Option<&'static str>,
        profile: Option<ApiResponse>,
        calls: CallLog,
    }

    impl RecordingApi {
        fn new(vip: bool) -> Self {
            Self {
                vip,
                fail_endpoint: None,
                profile: None,
                calls: CallLog::default(),
            }
        }

        fn failing(mut self, endpoint: &'static str) -> Self {
            self.fail_endpoint = Some(endpoint);
            self
        }

        fn with_profile(mut self, response: ApiResponse) -> Self {
            self.profile = Some(response);
            self
        }

        fn record(&self, endpoint: &str, body: Value) -> Result<ApiResponse, TraktError> {
            self.calls.push(endpoint, body);
            if self.fail_endpoint == Some(endpoint) {
                return Ok(ApiResponse::new(500, "internal error"));
            }
            Ok(ApiResponse::new(201, r#"{"added": {"shows": 1}}"#))
        }
    }

    #[async_trait]
    impl TraktApi for RecordingApi {
        fn backend_name(&self) -> &str {
            "recording"
        }

        async fn user_settings(&self) -> Result<ApiResponse, TraktError> {
            self.calls.push("/users/settings", Value::Null);
            match &self.profile {
                Some(response) => Ok(response.clone()),
                None => Ok(ApiResponse::new(
                    200,
                    json!({"user": {"username": "tester", "vip": self.vip}}).to_string(),
                )),
            }
        }

        async fn add_to_watchlist(&self, batch: &WatchlistBatch) -> Result<ApiResponse, TraktError> {
            self.record("/sync/watchlist", serde_json::to_value(batch).unwrap())
        }

        async fn add_to_history(&self, batch: &HistoryBatch) -> Result<ApiResponse, TraktError> {
            self.record("/sync/history", serde_json::to_value(batch).unwrap())
        }

        async fn add_hidden_items(
            &self,
            section: HiddenSection,
            batch: &HiddenBatch,
        ) -> Result<ApiResponse, TraktError> {
            self.record(&format!("/users/hidden/{}", section), serde_json::to_value(batch).unwrap())
        }
    }

    #[derive(Default)]
    struct RecordingObserver {
        reports: Mutex<Vec<CapacityReport>>,
        acknowledgements: AtomicUsize,
        refuse: bool,
        started: Mutex<Vec<SyncStep>>,
        finished: Mutex<Vec<SyncStep>>,
    }

    #[async_trait]
    impl SyncObserver for RecordingObserver {
        fn step_started(&self, step: SyncStep, _items: usize) {
            self.started.lock().unwrap().push(step);
        }

        fn step_finished(&self, step: SyncStep, _outcome: &StepOutcome) {
            self.finished.lock().unwrap().push(step);
        }

        fn capacity_exceeded(&self, report: &CapacityReport) {
            self.reports.lock().unwrap().push(report.clone());
        }

        async fn wait_for_acknowledgement(&self, _message: &str) -> std::io::Result<()> {
            self.acknowledgements.fetch_add(1, Ordering::SeqCst);
            if self.refuse {
                return Err(std::io::Error::new(ErrorKind::UnexpectedEof, "stdin closed"));
            }
            Ok(())
        }
    }

    fn show(tvdb: i64, status: ShowStatus) -> Show {
        Show {
            id: ExportIds { tvdb: Some(tvdb), imdb: Some("-1".to_string()) },
            title: None,
            status,
            seasons: vec![Season {
                number: 1,
                episodes: vec![Episode {
                    number: 1,
                    is_watched: true,
                    watched_at: Some("2020-02-02 20:20:20".to_string()),
                }],
            }],
        }
    }

    fn movie(n: usize, watched: bool) -> Movie {
        Movie {
            id: ExportIds { tvdb: None, imdb: Some(format!("tt{:07}", n)) },
            title: None,
            is_watched: watched,
            watched_at: Some("2018-08-08 08:08:08".to_string()),
        }
    }

    fn over_free_limit() -> ExportData {
        ExportData {
            shows: vec![show(1, ShowStatus::NotStartedYet), show(2, ShowStatus::InProgress)],
            movies: (0..capacity::FREE_WATCHLIST_LIMIT).map(|n| movie(n, n % 2 == 0)).collect(),
        }
    }

    fn orchestrator_with(
        api: RecordingApi,
        observer: RecordingObserver,
    ) -> (SyncOrchestrator<RecordingApi>, Arc<RecordingObserver>, CallLog) {
        let calls = api.calls.clone();
        let observer = Arc::new(observer);
        let orchestrator = SyncOrchestrator::new(RateLimitedClient::new(api, Duration::ZERO))
            .with_observer(observer.clone());
        (orchestrator, observer, calls)
    }

    fn orchestrator(api: RecordingApi) -> (SyncOrchestrator<RecordingApi>, Arc<RecordingObserver>, CallLog) {
        orchestrator_with(api, RecordingObserver::default())
    }

    const ALL_ENDPOINTS: [&str; 5] = [
        "/users/settings",
        "/sync/watchlist",
        "/sync/history",
        "/users/hidden/progress_watched",
        "/users/hidden/recommendations",
    ];

    #[tokio::test]
    async fn test_vip_small_watchlist_is_submitted() {
        let export = ExportData {
            shows: vec![
                show(1, ShowStatus::NotStartedYet),
                show(2, ShowStatus::NotStartedYet),
                show(3, ShowStatus::NotStartedYet),
            ],
            movies: vec![movie(1, true), movie(2, true)],
        };
        let (orchestrator, observer, calls) = orchestrator(RecordingApi::new(true));

        let report = orchestrator.sync(&export).await.unwrap();

        assert_eq!(calls.endpoints(), ALL_ENDPOINTS);
        let watchlist = calls.body("/sync/watchlist").unwrap();
        assert_eq!(watchlist["shows"].as_array().unwrap().len(), 3);
        assert_eq!(watchlist["movies"].as_array().unwrap().len(), 2);

        assert!(report.vip);
        assert!(!report.watchlist_skipped());
        assert_eq!(observer.acknowledgements.load(Ordering::SeqCst), 0);
        match report.outcome(SyncStep::Watchlist) {
            Some(StepOutcome::Submitted { items, status, .. }) => {
                assert_eq!(*items, 5);
                assert_eq!(*status, 201);
            }
            other => panic!("unexpected watchlist outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_free_tier_over_limit_skips_watchlist_only() {
        let (orchestrator, observer, calls) = orchestrator(RecordingApi::new(false));

        let report = orchestrator.sync(&over_free_limit()).await.unwrap();

        assert!(!calls.endpoints().iter().any(|e| e == "/sync/watchlist"));
        assert_eq!(
            calls.endpoints(),
            ["/users/settings", "/sync/history", "/users/hidden/progress_watched", "/users/hidden/recommendations"]
        );

        let history = calls.body("/sync/history").unwrap();
        assert_eq!(history["shows"].as_array().unwrap().len(), 2);
        assert_eq!(
            history["movies"].as_array().unwrap().len(),
            capacity::FREE_WATCHLIST_LIMIT / 2
        );

        assert_eq!(observer.acknowledgements.load(Ordering::SeqCst), 1);
        let reports = observer.reports.lock().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].total, capacity::FREE_WATCHLIST_LIMIT + 1);
        assert_eq!(reports[0].limit, capacity::FREE_WATCHLIST_LIMIT);
        assert!(report.watchlist_skipped());
    }

    #[tokio::test]
    async fn test_failed_acknowledgement_stops_before_history() {
        let observer = RecordingObserver { refuse: true, ..RecordingObserver::default() };
        let (orchestrator, observer, calls) = orchestrator_with(RecordingApi::new(false), observer);

        let err = orchestrator.sync(&over_free_limit()).await.unwrap_err();

        match err {
            SyncError::Acknowledgement(e) => assert_eq!(e.kind(), ErrorKind::UnexpectedEof),
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(observer.reports.lock().unwrap().len(), 1);
        assert_eq!(calls.endpoints(), ["/users/settings"]);
    }

    #[tokio::test]
    async fn test_profile_error_status_aborts_import() {
        let api = RecordingApi::new(true).with_profile(ApiResponse::new(500, "internal error"));
        let (orchestrator, observer, calls) = orchestrator(api);

        let err = orchestrator.sync(&over_free_limit()).await.unwrap_err();

        match err {
            SyncError::Remote { step, source: TraktError::Status { status, .. } } => {
                assert_eq!(step, SyncStep::Profile);
                assert_eq!(status, 500);
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert_eq!(calls.endpoints(), ["/users/settings"]);
        assert!(observer.finished.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unreadable_profile_aborts_import() {
        let api = RecordingApi::new(true).with_profile(ApiResponse::new(200, "<html>maintenance</html>"));
        let (orchestrator, _, calls) = orchestrator(api);

        let err = orchestrator.sync(&ExportData::default()).await.unwrap_err();

        assert!(
            matches!(err, SyncError::Decode { step: SyncStep::Profile, .. }),
            "unexpected error {:?}",
            err
        );
        assert_eq!(calls.endpoints(), ["/users/settings"]);
    }

    #[tokio::test]
    async fn test_every_started_step_is_finished() {
        let (orchestrator, observer, _) = orchestrator(RecordingApi::new(true));

        orchestrator.sync(&ExportData::default()).await.unwrap();

        let started = observer.started.lock().unwrap().clone();
        let finished = observer.finished.lock().unwrap().clone();
        assert_eq!(started, finished);
        assert_eq!(
            finished,
            [
                SyncStep::Profile,
                SyncStep::Watchlist,
                SyncStep::History,
                SyncStep::HiddenProgress,
                SyncStep::HiddenRecommendations,
            ]
        );
    }

    #[tokio::test]
    async fn test_profile_step_reports_fetched_status() {
        struct ProfileOutcome(Mutex<Option<StepOutcome>>);

        #[async_trait]
        impl SyncObserver for ProfileOutcome {
            fn step_finished(&self, step: SyncStep, outcome: &StepOutcome) {
                if step == SyncStep::Profile {
                    *self.0.lock().unwrap() = Some(outcome.clone());
                }
            }

            fn capacity_exceeded(&self, _report: &CapacityReport) {}

            async fn wait_for_acknowledgement(&self, _message: &str) -> std::io::Result<()> {
                Ok(())
            }
        }

        let observer = Arc::new(ProfileOutcome(Mutex::new(None)));
        let orchestrator = SyncOrchestrator::new(RateLimitedClient::new(RecordingApi::new(false), Duration::ZERO))
            .with_observer(observer.clone());

        let report = orchestrator.sync(&ExportData::default()).await.unwrap();

        assert_eq!(*observer.0.lock().unwrap(), Some(StepOutcome::Fetched { status: 200 }));
        assert!(report.outcome(SyncStep::Profile).is_none());
    }

    #[tokio::test]
    async fn test_stopped_shows_hidden_in_both_sections() {
        let export = ExportData {
            shows: vec![
                show(10, ShowStatus::Stopped),
                show(11, ShowStatus::InProgress),
                show(12, ShowStatus::Stopped),
            ],
            movies: Vec::new(),
        };
        let (orchestrator, _, calls) = orchestrator(RecordingApi::new(false));

        orchestrator.sync(&export).await.unwrap();

        let progress = calls.body("/users/hidden/progress_watched").unwrap();
        let recommendations = calls.body("/users/hidden/recommendations").unwrap();
        assert_eq!(progress, recommendations);

        let tvdb: Vec<i64> = progress["shows"]
            .as_array()
            .unwrap()
            .iter()
            .map(|s| s["ids"]["tvdb"].as_i64().unwrap())
            .collect();
        assert_eq!(tvdb, vec![10, 12]);
        assert_eq!(progress["shows"][0]["ids"]["imdb"], "");
    }

    #[tokio::test]
    async fn test_remote_failure_aborts_remaining_steps() {
        let export = ExportData {
            shows: vec![show(1, ShowStatus::Stopped)],
            movies: vec![movie(1, true)],
        };
        let (orchestrator, _, calls) = orchestrator(RecordingApi::new(true).failing("/sync/history"));

        let err = orchestrator.sync(&export).await.unwrap_err();
        match err {
            SyncError::Remote { step, source: TraktError::Status { status, .. } } => {
                assert_eq!(step, SyncStep::History);
                assert_eq!(status, 500);
            }
            other => panic!("unexpected error {:?}", other),
        }

        assert_eq!(calls.endpoints(), ["/users/settings", "/sync/watchlist", "/sync/history"]);
    }

    #[test]
    fn test_unreadable_counts_do_not_fail_step() {
        let outcome = submitted(SyncStep::History, 3, Ok(ApiResponse::new(201, "created"))).unwrap();
        assert_eq!(
            outcome,
            StepOutcome::Submitted { items: 3, status: 201, response: None }
        );
    }

    #[tokio::test]
    async fn test_empty_export_still_runs_every_step() {
        let (orchestrator, _, calls) = orchestrator(RecordingApi::new(false));

        let report = orchestrator.sync(&ExportData::default()).await.unwrap();

        assert_eq!(calls.endpoints(), ALL_ENDPOINTS);
        assert_eq!(report.steps.len(), 4);
        assert_eq!(report.episodes, 0);
    }
}
