/// Default timeout for HTTP requests in seconds
pub const HTTP_TIMEOUT_SECS: u64 = 10;

/// Client identification sent with every request
pub const USER_AGENT: &str = "RedditTrends/0.1 (top posts browser)";

/// Base URL of the JSON listing API
pub const REDDIT_API_URL: &str = "https://www.reddit.com";

/// Base URL used when building canonical post links
pub const REDDIT_SITE_URL: &str = "https://reddit.com";

/// Number of posts requested per fetch
pub const PAGE_SIZE: u32 = 25;

/// Community fetched when the host supplies none
pub const DEFAULT_COMMUNITY: &str = "LandscapePhotography";

/// Preset communities as (value, title)
pub const PRESET_COMMUNITIES: &[(&str, &str)] = &[
    ("LandscapePhotography", "LandscapePhotography"),
    ("popular", "Popular (All Reddit)"),
];

pub const CUSTOM_COMMUNITY_TITLE: &str = "Custom";

/// Spinner template shown while a fetch is in flight
pub const SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
