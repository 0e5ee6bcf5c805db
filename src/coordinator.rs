//! Issue form coordination.
//!
//! [`IssueFormCoordinator`] owns both forms, the active issue kind, the
//! debounced similar-issue search and the preview/submit workflow. UI layers
//! observe it through [`IssueFormCoordinator::subscribe`] and drive it with
//! the public operations below.
//!
//! Searches may resolve out of order. Every debounced emission bumps a
//! sequence number and only a response carrying the current number is
//! applied, so a slow, older search can never overwrite a newer (or cleared)
//! result list.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use serde::Serialize;
use tokio::sync::watch;

use crate::compose::{new_issue_url, with_marker};
use crate::config::{Config, LABEL_CREATE, LABEL_PREVIEW_TITLE};
use crate::debounce::{DebounceSink, Debouncer};
use crate::error::{HelperError, Result};
use crate::form::{
    BugFormFields, FeatureFormFields, Field, FieldError, Form, FormFields, ValidationOutcome,
};
use crate::navigate::Navigator;
use crate::remote::IssueApi;
use crate::template::{render_bug, render_feature};
use crate::types::{IssueKind, Release, ReleaseVersion, SearchResult};

/// Settings the coordinator needs from configuration
#[derive(Debug, Clone)]
pub struct CoordinatorSettings {
    pub owner: String,
    pub web_base_url: String,
    pub default_repository: String,
    /// Repositories the forms may target
    pub repositories: Vec<String>,
    pub debounce: Duration,
    /// Localized preview dialog title
    pub preview_title: String,
    /// Localized confirm button text
    pub confirm_label: String,
}

impl CoordinatorSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            owner: config.owner.clone(),
            web_base_url: config.web_base_url.clone(),
            default_repository: config.default_repository.clone(),
            repositories: config.repositories.clone(),
            debounce: config.debounce_window(),
            preview_title: config.label(LABEL_PREVIEW_TITLE),
            confirm_label: config.label(LABEL_CREATE),
        }
    }
}

/// Progress of the similar-issue search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    /// No query, or the last query was empty
    Idle,
    /// Input received, debounce window still open
    Waiting,
    /// Request in flight
    Loading,
    /// Results of the latest query are shown
    Ready,
}

impl SearchStatus {
    pub fn is_settled(&self) -> bool {
        matches!(self, SearchStatus::Idle | SearchStatus::Ready)
    }
}

/// Snapshot published to observers after every change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewState {
    pub kind: IssueKind,
    pub versions: Vec<ReleaseVersion>,
    pub releases_loaded: bool,
    pub search_results: Vec<SearchResult>,
    pub search: SearchStatus,
}

/// Rendered issue awaiting confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub kind: IssueKind,
    pub repository: String,
    pub title: String,
    pub markdown: String,
    pub dialog_title: String,
    pub confirm_label: String,
}

#[derive(Debug, Clone)]
struct PendingPreview {
    kind: IssueKind,
    repository: String,
    title: String,
    markdown: String,
}

struct FormState {
    kind: IssueKind,
    bug: Form<BugFormFields>,
    feature: Form<FeatureFormFields>,
    versions: Vec<ReleaseVersion>,
    releases_loaded: bool,
    search_results: Vec<SearchResult>,
    search_status: SearchStatus,
    /// Status to fall back to when a debounced value turns out to be a repeat
    settled_status: SearchStatus,
    search_seq: u64,
    pending_preview: Option<PendingPreview>,
    torn_down: bool,
}

impl FormState {
    fn new(default_repository: &str) -> Self {
        let bug = BugFormFields {
            repository: default_repository.to_string(),
            ..BugFormFields::default()
        };
        let feature = FeatureFormFields {
            repository: default_repository.to_string(),
            ..FeatureFormFields::default()
        };

        Self {
            kind: IssueKind::default(),
            bug: Form::new(bug),
            feature: Form::new(feature),
            versions: Vec::new(),
            releases_loaded: false,
            search_results: Vec::new(),
            search_status: SearchStatus::Idle,
            settled_status: SearchStatus::Idle,
            search_seq: 0,
            pending_preview: None,
            torn_down: false,
        }
    }

    fn view(&self) -> ViewState {
        ViewState {
            kind: self.kind,
            versions: self.versions.clone(),
            releases_loaded: self.releases_loaded,
            search_results: self.search_results.clone(),
            search: self.search_status,
        }
    }

    fn set_search_status(&mut self, status: SearchStatus) {
        self.settled_status = status;
        self.search_status = status;
    }
}

struct Shared {
    state: Mutex<FormState>,
    view: watch::Sender<ViewState>,
}

impl Shared {
    /// Mutate state and publish a snapshot. Does nothing after teardown.
    fn update<R>(&self, f: impl FnOnce(&mut FormState) -> R) -> Option<R> {
        let mut state = self.state.lock();
        if state.torn_down {
            return None;
        }
        let result = f(&mut state);
        self.view.send_replace(state.view());
        Some(result)
    }

    fn apply_releases(&self, result: Result<Vec<Release>>) {
        let versions: Vec<ReleaseVersion> = match result {
            Ok(releases) => releases.into_iter().map(ReleaseVersion::from).collect(),
            Err(e) => {
                tracing::warn!("failed to fetch releases: {e}");
                Vec::new()
            }
        };

        let applied = self.update(|state| {
            if let Some(newest) = versions.first()
                && state.bug.values().version.trim().is_empty()
            {
                state.bug.set(Field::Version, newest.to_string());
            }
            state.versions = versions;
            state.releases_loaded = true;
        });
        if applied.is_none() {
            tracing::debug!("releases arrived after teardown, dropped");
        }
    }

    fn apply_search(&self, seq: u64, query: &str, results: Vec<SearchResult>) {
        self.update(|state| {
            if state.search_seq != seq {
                tracing::debug!(query, seq, current = state.search_seq, "stale search dropped");
                return;
            }
            tracing::debug!(query, count = results.len(), "search results applied");
            state.search_results = results;
            state.settled_status = SearchStatus::Ready;
            if state.search_status != SearchStatus::Waiting {
                state.search_status = SearchStatus::Ready;
            }
        });
    }
}

async fn fetch_releases<A: IssueApi>(api: Arc<A>, shared: Arc<Shared>) {
    let result = api.list_releases().await;
    shared.apply_releases(result);
}

/// Receives debounced search input.
struct SearchSink<A> {
    api: Arc<A>,
    shared: Arc<Shared>,
}

impl<A: IssueApi> DebounceSink<Option<String>> for SearchSink<A> {
    fn emit(&mut self, value: Option<String>) {
        let query = value.filter(|q| !q.is_empty());

        // Clear immediately; a response for an older sequence is ignored
        let seq = self.shared.update(|state| {
            state.search_seq += 1;
            state.search_results.clear();
            state.set_search_status(if query.is_some() {
                SearchStatus::Loading
            } else {
                SearchStatus::Idle
            });
            state.search_seq
        });

        let (Some(seq), Some(query)) = (seq, query) else {
            return;
        };

        let api = Arc::clone(&self.api);
        let shared = Arc::clone(&self.shared);
        tokio::spawn(async move {
            let results = match api.search_issues(&query).await {
                Ok(results) => results,
                Err(e) => {
                    tracing::warn!(%query, "issue search failed: {e}");
                    Vec::new()
                }
            };
            shared.apply_search(seq, &query, results);
        });
    }

    fn suppressed(&mut self, value: Option<String>) {
        tracing::trace!(?value, "repeated search input suppressed");
        self.shared.update(|state| {
            if state.search_status == SearchStatus::Waiting {
                state.search_status = state.settled_status;
            }
        });
    }
}

/// Coordinates the issue forms, similar-issue search and submission.
pub struct IssueFormCoordinator<A: IssueApi> {
    api: Arc<A>,
    navigator: Box<dyn Navigator>,
    settings: CoordinatorSettings,
    shared: Arc<Shared>,
    search_input: Mutex<Option<Debouncer<Option<String>>>>,
    initialized: Mutex<bool>,
}

impl<A: IssueApi> IssueFormCoordinator<A> {
    /// Build both forms with their defaults. Nothing runs until
    /// [`initialize`](Self::initialize).
    pub fn new(api: A, navigator: Box<dyn Navigator>, settings: CoordinatorSettings) -> Self {
        let state = FormState::new(&settings.default_repository);
        let (view, _) = watch::channel(state.view());

        Self {
            api: Arc::new(api),
            navigator,
            settings,
            shared: Arc::new(Shared {
                state: Mutex::new(state),
                view,
            }),
            search_input: Mutex::new(None),
            initialized: Mutex::new(false),
        }
    }

    /// Start the release fetch and wire the search input stream.
    ///
    /// Must be called from within a tokio runtime. Later calls do nothing.
    pub fn initialize(&self) {
        {
            let mut initialized = self.initialized.lock();
            if *initialized || self.shared.state.lock().torn_down {
                return;
            }
            *initialized = true;
        }

        tokio::spawn(fetch_releases(
            Arc::clone(&self.api),
            Arc::clone(&self.shared),
        ));

        let sink = SearchSink {
            api: Arc::clone(&self.api),
            shared: Arc::clone(&self.shared),
        };
        *self.search_input.lock() = Some(Debouncer::spawn(self.settings.debounce, sink));
        tracing::debug!(debounce_ms = self.settings.debounce.as_millis() as u64, "coordinator initialized");
    }

    /// Fetch releases and wait for them to be applied.
    pub async fn load_releases(&self) {
        fetch_releases(Arc::clone(&self.api), Arc::clone(&self.shared)).await;
    }

    /// Observe UI state changes.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.shared.view.subscribe()
    }

    pub fn view(&self) -> ViewState {
        self.shared.state.lock().view()
    }

    pub fn kind(&self) -> IssueKind {
        self.shared.state.lock().kind
    }

    pub fn bug_fields(&self) -> BugFormFields {
        self.shared.state.lock().bug.values().clone()
    }

    pub fn feature_fields(&self) -> FeatureFormFields {
        self.shared.state.lock().feature.values().clone()
    }

    /// Fields of the active form, in display order.
    pub fn active_fields(&self) -> &'static [Field] {
        match self.kind() {
            IssueKind::Bug => BugFormFields::FIELDS,
            IssueKind::Feature => FeatureFormFields::FIELDS,
        }
    }

    /// Switch the active form and drop any search state.
    pub fn set_issue_kind(&self, kind: IssueKind) {
        let input = self.search_input.lock();
        let switched = self.shared.update(|state| {
            state.kind = kind;
            state.search_seq += 1;
            state.search_results.clear();
            state.set_search_status(SearchStatus::Idle);
            if input.is_some() {
                state.search_status = SearchStatus::Waiting;
            }
        });

        if switched.is_some()
            && let Some(debouncer) = input.as_ref()
        {
            debouncer.push(None);
        }
        tracing::debug!(%kind, "issue kind selected");
    }

    /// Feed raw search input. Ignored before `initialize` and after `teardown`.
    pub fn on_search_input(&self, query: &str) {
        let input = self.search_input.lock();
        let Some(debouncer) = input.as_ref() else {
            tracing::debug!("search input ignored, search stream not running");
            return;
        };

        let accepted = self
            .shared
            .update(|state| state.search_status = SearchStatus::Waiting);
        if accepted.is_some() {
            debouncer.push(Some(query.to_string()));
        }
    }

    /// Write a field of the active form, returning its validation outcome.
    ///
    /// A repository outside the configured list is rejected with
    /// `InvalidFormat` and the previous value is kept.
    pub fn set_field(&self, field: Field, value: impl Into<String>) -> Result<ValidationOutcome> {
        let value = value.into();
        let known_repository = field != Field::Repository
            || self.settings.repositories.iter().any(|r| *r == value);

        let outcome = self
            .shared
            .update(|state| {
                if !known_repository {
                    tracing::debug!(repository = %value, "repository not in configured list");
                    return Some(Err(FieldError::InvalidFormat));
                }
                match state.kind {
                    IssueKind::Bug => state.bug.set_and_touch(field, value),
                    IssueKind::Feature => state.feature.set_and_touch(field, value),
                }
            })
            .ok_or_else(|| HelperError::Other("the issue form has been closed".to_string()))?;

        outcome.ok_or(HelperError::UnknownField {
            field,
            kind: self.kind(),
        })
    }

    /// Current value of a field of the active form.
    pub fn field_value(&self, field: Field) -> Option<String> {
        let state = self.shared.state.lock();
        let value = match state.kind {
            IssueKind::Bug => state.bug.values().get(field),
            IssueKind::Feature => state.feature.values().get(field),
        };
        value.map(str::to_string)
    }

    /// Errors of the active form for fields the user has touched.
    pub fn field_errors(&self) -> Vec<(Field, FieldError)> {
        let state = self.shared.state.lock();
        match state.kind {
            IssueKind::Bug => state.bug.visible_errors(),
            IssueKind::Feature => state.feature.visible_errors(),
        }
    }

    /// Validate the whole active form and render its markdown.
    ///
    /// Returns `None`, without rendering, when any field is invalid. The
    /// returned preview is also kept as the pending submission.
    pub fn submit_preview(&self) -> Option<Preview> {
        let pending = self
            .shared
            .update(|state| {
                state.pending_preview = None;

                let pending = match state.kind {
                    IssueKind::Bug => {
                        state.bug.touch_all();
                        if !state.bug.is_valid() {
                            tracing::debug!(errors = ?state.bug.errors(), "bug form invalid");
                            return None;
                        }
                        let values = state.bug.values();
                        PendingPreview {
                            kind: IssueKind::Bug,
                            repository: values.repository().to_string(),
                            title: values.issue_title().to_string(),
                            markdown: render_bug(values),
                        }
                    }
                    IssueKind::Feature => {
                        state.feature.touch_all();
                        if !state.feature.is_valid() {
                            tracing::debug!(errors = ?state.feature.errors(), "feature form invalid");
                            return None;
                        }
                        let values = state.feature.values();
                        PendingPreview {
                            kind: IssueKind::Feature,
                            repository: values.repository().to_string(),
                            title: values.issue_title().to_string(),
                            markdown: render_feature(values),
                        }
                    }
                };

                state.pending_preview = Some(pending.clone());
                Some(pending)
            })
            .flatten()?;

        Some(Preview {
            kind: pending.kind,
            repository: pending.repository,
            title: pending.title,
            markdown: pending.markdown,
            dialog_title: self.settings.preview_title.clone(),
            confirm_label: self.settings.confirm_label.clone(),
        })
    }

    /// Submit the pending preview: append the marker, compose the URL and
    /// open it. Returns the URL.
    pub fn submit(&self) -> Result<String> {
        let pending = self
            .shared
            .update(|state| state.pending_preview.take())
            .flatten()
            .ok_or(HelperError::NothingToSubmit)?;

        let body = with_marker(&pending.markdown);
        let url = new_issue_url(
            &self.settings.web_base_url,
            &self.settings.owner,
            &pending.repository,
            &pending.title,
            &body,
            pending.kind,
        );

        if let Err(e) = self.navigator.open(&url) {
            // Keep the preview so the user can retry
            self.shared.update(|state| {
                state.pending_preview.get_or_insert(pending);
            });
            return Err(e);
        }
        tracing::info!(
            kind = %pending.kind,
            repository = %pending.repository,
            "new issue page composed"
        );
        Ok(url)
    }

    /// Stop the search stream and freeze the state. Idempotent.
    pub fn teardown(&self) {
        if let Some(mut debouncer) = self.search_input.lock().take() {
            debouncer.close();
        }

        let mut state = self.shared.state.lock();
        if !state.torn_down {
            state.torn_down = true;
            state.search_seq += 1;
            tracing::debug!("coordinator torn down");
        }
    }
}

impl<A: IssueApi> Drop for IssueFormCoordinator<A> {
    fn drop(&mut self) {
        self.teardown();
    }
}
