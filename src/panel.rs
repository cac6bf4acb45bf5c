//! Query state of the trends panel and its transition table.
//!
//! Every user action and every completed fetch goes through
//! [`PanelState::apply`], which mutates the state and returns the side effects
//! the host must carry out. After each mutation the `(community, time window)`
//! pair is compared with the pair of the last requested fetch; when it changed
//! a new fetch is requested under a fresh sequence number. Completions carrying
//! any other sequence number are stale and dropped, so a slow response can never
//! overwrite the result of a later request.

use log::{debug, info};

use crate::common::{CommunityChoice, Post, TimeWindow};
use crate::filters::filter_posts;
use crate::trend_fetcher::{FetchError, FetchResult};

pub const FAILURE_TITLE: &str = "Failed to load Reddit posts";

#[derive(Debug)]
pub enum PanelEvent {
    SelectCommunity(CommunityChoice),
    SelectTimeWindow(TimeWindow),
    /// Text typed into the search box. Edits the custom community name in
    /// custom-entry mode, the title filter otherwise.
    SearchTextChanged(String),
    SearchSubmitted(String),
    /// Re-issue the current query even though nothing changed.
    Reload,
    FetchCompleted { seq: u64, result: FetchResult },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub community: String,
    pub window: TimeWindow,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    StartFetch(FetchRequest),
    Notify(Notification),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyKind {
    Error,
    NoData,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyView {
    pub kind: EmptyKind,
    pub title: String,
    pub description: String,
}

/// Everything a renderer needs, derived from the state on demand.
#[derive(Debug)]
pub struct PanelView<'a> {
    pub navigation_title: String,
    pub search_placeholder: &'static str,
    pub search_text: &'a str,
    pub community_subtitle: String,
    pub time_window_title: &'static str,
    pub is_loading: bool,
    pub section_title: Option<String>,
    pub posts: Vec<&'a Post>,
    pub empty_view: Option<EmptyView>,
}

#[derive(Debug)]
pub struct PanelState {
    selection: CommunityChoice,
    custom_community: String,
    search_text: String,
    time_window: TimeWindow,
    posts: Vec<Post>,
    error: Option<FetchError>,
    is_loading: bool,
    next_seq: u64,
    pending_seq: Option<u64>,
    watched: Option<(String, TimeWindow)>,
}

impl PanelState {
    /// A default community outside the presets starts the panel in
    /// custom-entry mode with that name filled in.
    pub fn new(default_community: &str, default_window: TimeWindow) -> Self {
        let (selection, custom_community) = match CommunityChoice::from_value(default_community) {
            Some(choice) => (choice, String::new()),
            None => (CommunityChoice::Custom, default_community.to_string()),
        };

        Self {
            selection,
            custom_community,
            search_text: String::new(),
            time_window: default_window,
            posts: Vec::new(),
            error: None,
            is_loading: true,
            next_seq: 0,
            pending_seq: None,
            watched: None,
        }
    }

    /// Effects of the first render: the initial fetch, if there is anything to fetch.
    pub fn start(&mut self) -> Vec<Effect> {
        self.sync_query()
    }

    pub fn apply(&mut self, event: PanelEvent) -> Vec<Effect> {
        match event {
            PanelEvent::SelectCommunity(choice) => {
                debug!("Community selection changed to '{}'", choice.value());
                self.selection = choice;
                if !choice.is_custom() {
                    self.search_text.clear();
                }
                self.sync_query()
            }
            PanelEvent::SelectTimeWindow(window) => {
                debug!("Time window changed to '{}'", window);
                self.time_window = window;
                self.sync_query()
            }
            PanelEvent::SearchTextChanged(text) => {
                if self.selection.is_custom() {
                    self.custom_community = text;
                    self.sync_query()
                } else {
                    self.search_text = text;
                    Vec::new()
                }
            }
            PanelEvent::SearchSubmitted(text) => {
                if self.selection.is_custom() && !text.is_empty() {
                    self.custom_community = text;
                    self.sync_query()
                } else {
                    Vec::new()
                }
            }
            PanelEvent::Reload => {
                self.watched = None;
                self.sync_query()
            }
            PanelEvent::FetchCompleted { seq, result } => self.complete_fetch(seq, result),
        }
    }

    /// Starts a fetch when the watched query changed since the last request.
    /// An empty community requests nothing and drops the pending fetch, so
    /// the posts already shown stay as they are.
    fn sync_query(&mut self) -> Vec<Effect> {
        let community = self.active_community().to_string();
        let key = (community.clone(), self.time_window);
        if self.watched.as_ref() == Some(&key) {
            return Vec::new();
        }
        self.watched = Some(key);

        if community.is_empty() {
            if let Some(seq) = self.pending_seq.take() {
                debug!("Fetch #{} superseded by an empty community", seq);
            }
            self.is_loading = false;
            return Vec::new();
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        if let Some(previous) = self.pending_seq.replace(seq) {
            debug!("Fetch #{} superseded by #{}", previous, seq);
        }
        self.is_loading = true;
        self.error = None;

        info!(
            "Requesting top posts for r/{} ({}) as fetch #{}",
            community, self.time_window, seq
        );
        vec![Effect::StartFetch(FetchRequest {
            seq,
            community,
            window: self.time_window,
        })]
    }

    fn complete_fetch(&mut self, seq: u64, result: FetchResult) -> Vec<Effect> {
        if self.pending_seq != Some(seq) {
            debug!(
                "Discarding stale completion of fetch #{} (pending: {:?})",
                seq, self.pending_seq
            );
            return Vec::new();
        }
        self.pending_seq = None;
        self.is_loading = false;

        match result {
            Ok(posts) => {
                info!("Fetch #{} returned {} posts", seq, posts.len());
                self.posts = posts;
                self.error = None;
                Vec::new()
            }
            Err(err) => {
                debug!("Fetch #{} failed: {}", seq, err);
                self.posts.clear();
                let notification = Notification {
                    title: FAILURE_TITLE.to_string(),
                    message: err.to_string(),
                };
                self.error = Some(err);
                vec![Effect::Notify(notification)]
            }
        }
    }

    /// The community the current query resolves to; empty while a custom name
    /// has not been typed yet.
    pub fn active_community(&self) -> &str {
        match self.selection {
            CommunityChoice::Preset(value) => value,
            CommunityChoice::Custom => self.custom_community.as_str(),
        }
    }

    pub fn selection(&self) -> CommunityChoice {
        self.selection
    }

    pub fn time_window(&self) -> TimeWindow {
        self.time_window
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn custom_community(&self) -> &str {
        &self.custom_community
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn pending_seq(&self) -> Option<u64> {
        self.pending_seq
    }

    fn awaiting_custom_entry(&self) -> bool {
        self.selection.is_custom() && self.custom_community.is_empty()
    }

    pub fn visible_posts(&self) -> Vec<&Post> {
        filter_posts(&self.posts, &self.search_text, self.selection.is_custom())
    }

    pub fn view(&self) -> PanelView<'_> {
        let community = self.active_community();
        let posts = self.visible_posts();
        let custom = self.selection.is_custom();

        let community_subtitle = if custom {
            if self.custom_community.is_empty() {
                "Enter a subreddit name".to_string()
            } else {
                format!("r/{}", self.custom_community)
            }
        } else {
            self.selection.title().to_string()
        };

        let section_title = if posts.is_empty() {
            None
        } else {
            Some(format!("Trending on r/{}", community))
        };

        let empty_view = if self.is_loading || !posts.is_empty() || self.awaiting_custom_entry() {
            None
        } else if let Some(err) = &self.error {
            Some(EmptyView {
                kind: EmptyKind::Error,
                title: format!("Error loading r/{}", community),
                description: err.to_string(),
            })
        } else {
            Some(EmptyView {
                kind: EmptyKind::NoData,
                title: format!("No posts found for r/{}", community),
                description: "Try changing the subreddit or time range".to_string(),
            })
        };

        PanelView {
            navigation_title: format!("Reddit Trends: r/{}", community),
            search_placeholder: if custom {
                "Enter custom subreddit name..."
            } else {
                "Search within posts..."
            },
            search_text: if custom {
                &self.custom_community
            } else {
                &self.search_text
            },
            community_subtitle,
            time_window_title: self.time_window.title(),
            is_loading: self.is_loading,
            section_title,
            posts,
            empty_view,
        }
    }
}
