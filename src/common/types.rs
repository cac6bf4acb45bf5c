use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

use super::constants::{CUSTOM_COMMUNITY_TITLE, PRESET_COMMUNITIES};

/// One entry of a "top" listing, reduced to the fields the panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub score: i64,
    pub comment_count: u64,
    pub community_name: String,
    pub path: String,
    pub content_url: String,
}

impl Post {
    /// Maps the `data` object of a listing child. Missing or mistyped fields
    /// fall back to empty strings and zero counts instead of failing the fetch.
    pub fn from_json(data: &Value) -> Self {
        Self {
            id: data["id"].as_str().unwrap_or_default().to_string(),
            title: data["title"].as_str().unwrap_or_default().to_string(),
            score: data["score"].as_i64().unwrap_or(0),
            comment_count: data["num_comments"].as_u64().unwrap_or(0),
            community_name: data["subreddit"].as_str().unwrap_or_default().to_string(),
            path: data["permalink"].as_str().unwrap_or_default().to_string(),
            content_url: data["url"].as_str().unwrap_or_default().to_string(),
        }
    }

    pub fn canonical_url(&self, site_base: &str) -> String {
        format!("{}{}", site_base.trim_end_matches('/'), self.path)
    }
}

/// Ranking period for "top" listings.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    #[default]
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeWindow {
    pub const ALL: [TimeWindow; 5] = [
        TimeWindow::Day,
        TimeWindow::Week,
        TimeWindow::Month,
        TimeWindow::Year,
        TimeWindow::All,
    ];

    /// Value of the `t` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
            TimeWindow::Month => "month",
            TimeWindow::Year => "year",
            TimeWindow::All => "all",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            TimeWindow::Day => "Today",
            TimeWindow::Week => "This Week",
            TimeWindow::Month => "This Month",
            TimeWindow::Year => "This Year",
            TimeWindow::All => "All Time",
        }
    }
}

impl fmt::Display for TimeWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeWindow {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        TimeWindow::ALL
            .into_iter()
            .find(|window| window.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown time window '{}' (day, week, month, year, all)", s))
    }
}

/// Which community source is selected in the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommunityChoice {
    Preset(&'static str),
    Custom,
}

impl CommunityChoice {
    pub fn all() -> Vec<CommunityChoice> {
        PRESET_COMMUNITIES
            .iter()
            .map(|(value, _)| CommunityChoice::Preset(*value))
            .chain(std::iter::once(CommunityChoice::Custom))
            .collect()
    }

    /// Looks up a preset by value; `"custom"` selects custom entry.
    pub fn from_value(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("custom") {
            return Some(CommunityChoice::Custom);
        }
        PRESET_COMMUNITIES
            .iter()
            .find(|(preset, _)| *preset == value)
            .map(|(preset, _)| CommunityChoice::Preset(*preset))
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, CommunityChoice::Custom)
    }

    pub fn value(&self) -> &'static str {
        match self {
            CommunityChoice::Preset(value) => *value,
            CommunityChoice::Custom => "custom",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            CommunityChoice::Preset(value) => PRESET_COMMUNITIES
                .iter()
                .find(|(preset, _)| preset == value)
                .map(|(_, title)| *title)
                .unwrap_or(*value),
            CommunityChoice::Custom => CUSTOM_COMMUNITY_TITLE,
        }
    }
}
