use anyhow::Result;
use mockito::{Matcher, Server};
use reddit_trends::actions::ActionHost;
use reddit_trends::app::App;
use reddit_trends::panel::EmptyKind;
use reddit_trends::trend_fetcher::{FetcherConfig, FetchResult};
use reddit_trends::*;
use serde_json::json;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[cfg(test)]
mod tests {
    use super::*;

    struct TestData;
    impl TestData {
        const USER_AGENT: &'static str = "TrendsIntegrationTest/1.0";
        const COMMUNITY: &'static str = "LandscapePhotography";
        const LISTING_PATH: &'static str = "/r/LandscapePhotography/top/.json";
    }

    struct NoopActions;
    impl ActionHost for NoopActions {
        fn open_url(&self, _url: &str) -> Result<()> {
            Ok(())
        }

        fn copy_text(&self, _text: &str) -> Result<()> {
            Ok(())
        }
    }

    fn fetcher_for(base_url: &str) -> TrendFetcher {
        TrendFetcher::new(FetcherConfig {
            base_url: base_url.to_string(),
            user_agent: TestData::USER_AGENT.to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    fn create_listing_json() -> serde_json::Value {
        json!({
            "kind": "Listing",
            "data": {
                "after": "t3_zzz",
                "children": [
                    {
                        "kind": "t3",
                        "data": {
                            "id": "p1",
                            "title": "Sunset Valley",
                            "score": 15320,
                            "num_comments": 240,
                            "subreddit": "LandscapePhotography",
                            "permalink": "/r/LandscapePhotography/comments/p1/sunset_valley/",
                            "url": "https://i.redd.it/p1.jpg",
                            "author": "someone",
                            "over_18": false
                        }
                    },
                    {
                        "kind": "t3",
                        "data": {
                            "id": "p2",
                            "title": "Old Barn",
                            "score": 980,
                            "num_comments": 12,
                            "subreddit": "EarthPorn",
                            "permalink": "/r/EarthPorn/comments/p2/old_barn/",
                            "url": "https://www.reddit.com/r/EarthPorn/comments/p2/old_barn/"
                        }
                    },
                    {
                        "kind": "t3",
                        "data": {
                            "id": "p3",
                            "title": "sunny Meadow",
                            "score": -3,
                            "num_comments": 0,
                            "subreddit": "LandscapePhotography",
                            "permalink": "/r/LandscapePhotography/comments/p3/sunny_meadow/",
                            "url": "https://i.redd.it/p3.jpg"
                        }
                    }
                ]
            }
        })
    }

    fn create_empty_listing_json() -> serde_json::Value {
        json!({ "kind": "Listing", "data": { "children": [] } })
    }

    fn listing_query(window: &str) -> Matcher {
        Matcher::AllOf(vec![
            Matcher::UrlEncoded("t".into(), window.into()),
            Matcher::UrlEncoded("limit".into(), "25".into()),
        ])
    }

    #[test]
    fn test_fetch_success_maps_posts_in_order() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", TestData::LISTING_PATH)
            .match_query(listing_query("week"))
            .match_header("user-agent", TestData::USER_AGENT)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(create_listing_json().to_string())
            .create();

        let posts = fetcher_for(&server.url())
            .fetch(TestData::COMMUNITY, TimeWindow::Week)
            .unwrap();

        mock.assert();
        let ids: Vec<&str> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3"]);
        assert_eq!(posts[0].score, 15320);
        assert_eq!(posts[0].comment_count, 240);
        assert_eq!(posts[1].community_name, "EarthPorn");
        assert_eq!(posts[2].score, -3);
        assert_eq!(posts[2].content_url, "https://i.redd.it/p3.jpg");
    }

    #[test]
    fn test_fetch_http_error_status() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", TestData::LISTING_PATH)
            .match_query(Matcher::Any)
            .with_status(429)
            .create();

        let err = fetcher_for(&server.url())
            .fetch(TestData::COMMUNITY, TimeWindow::Day)
            .unwrap_err();

        assert!(matches!(err, FetchError::HttpStatus(429, _)));
        assert_eq!(err.to_string(), "Error 429: Too Many Requests");
    }

    #[test]
    fn test_fetch_empty_listing_is_no_results() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", "/r/QuietPlace/top/.json")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(create_empty_listing_json().to_string())
            .create();

        let err = fetcher_for(&server.url())
            .fetch("QuietPlace", TimeWindow::All)
            .unwrap_err();

        match err {
            FetchError::NoResults(community) => assert_eq!(community, "QuietPlace"),
            other => panic!("expected NoResults, got {:?}", other),
        }
    }

    #[test]
    fn test_fetch_missing_collection_is_no_results() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", TestData::LISTING_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"message": "Not Found"}"#)
            .create();

        let err = fetcher_for(&server.url())
            .fetch(TestData::COMMUNITY, TimeWindow::Day)
            .unwrap_err();
        assert!(matches!(err, FetchError::NoResults(_)));
    }

    #[test]
    fn test_fetch_invalid_json_is_decode_error() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", TestData::LISTING_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("<html><body>blocked</body></html>")
            .create();

        let err = fetcher_for(&server.url())
            .fetch(TestData::COMMUNITY, TimeWindow::Day)
            .unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
    }

    #[test]
    fn test_fetch_unreachable_host_is_network_error() {
        let err = fetcher_for("http://127.0.0.1:1")
            .fetch(TestData::COMMUNITY, TimeWindow::Day)
            .unwrap_err();
        assert!(matches!(err, FetchError::Network(_)));
    }

    #[test]
    fn test_app_renders_fetched_posts_with_filter() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", TestData::LISTING_PATH)
            .match_query(listing_query("day"))
            .with_status(200)
            .with_body(create_listing_json().to_string())
            .create();

        let panel = PanelState::new(TestData::COMMUNITY, TimeWindow::Day);
        let mut app = App::new(
            panel,
            Arc::new(fetcher_for(&server.url())),
            Box::new(NoopActions),
            "https://reddit.com",
        );

        app.start();
        app.wait_until_idle().unwrap();
        mock.assert();

        app.handle(PanelEvent::SearchTextChanged("SUN".into()));
        let view = app.panel().view();
        let titles: Vec<&str> = view.posts.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["Sunset Valley", "sunny Meadow"]);
        assert!(app.notifications().is_empty());
    }

    #[test]
    fn test_app_rate_limited_fetch_notifies_once() {
        let mut server = Server::new();
        let _mock = server
            .mock("GET", TestData::LISTING_PATH)
            .match_query(Matcher::Any)
            .with_status(429)
            .create();

        let panel = PanelState::new(TestData::COMMUNITY, TimeWindow::Day);
        let mut app = App::new(
            panel,
            Arc::new(fetcher_for(&server.url())),
            Box::new(NoopActions),
            "https://reddit.com",
        );

        app.start();
        app.wait_until_idle().unwrap();

        assert!(app.panel().posts().is_empty());
        assert_eq!(app.notifications().len(), 1);
        assert_eq!(app.notifications()[0].message, "Error 429: Too Many Requests");
        let empty = app.panel().view().empty_view.unwrap();
        assert_eq!(empty.kind, EmptyKind::Error);
    }

    /// Answers "day" slowly and everything else at once.
    struct SlowDaySource;
    impl PostSource for SlowDaySource {
        fn fetch(&self, community: &str, window: TimeWindow) -> FetchResult {
            if window == TimeWindow::Day {
                thread::sleep(Duration::from_millis(300));
            }
            Ok(vec![Post {
                id: window.as_str().to_string(),
                title: format!("Top of {}", window.title()),
                score: 1,
                comment_count: 1,
                community_name: community.to_string(),
                path: format!("/r/{}/comments/{}/", community, window),
                content_url: String::new(),
            }])
        }
    }

    #[test]
    fn test_app_slow_stale_response_does_not_overwrite() {
        let panel = PanelState::new(TestData::COMMUNITY, TimeWindow::Day);
        let mut app = App::new(
            panel,
            Arc::new(SlowDaySource),
            Box::new(NoopActions),
            "https://reddit.com",
        );

        app.start();
        app.handle(PanelEvent::SelectTimeWindow(TimeWindow::Week));
        app.wait_until_idle().unwrap();
        assert_eq!(app.panel().posts()[0].id, "week");

        assert!(app.process_next(Duration::from_secs(5)).unwrap());
        assert_eq!(app.panel().posts()[0].id, "week");
        assert!(!app.panel().is_loading());
    }

    #[test]
    fn test_run_once_search_keeps_custom_community() {
        let panel = PanelState::new("EarthPorn", TimeWindow::Week);
        let mut app = App::new(
            panel,
            Arc::new(SlowDaySource),
            Box::new(NoopActions),
            "https://reddit.com",
        );

        assert!(app.run_once(Some("lake".to_string())).unwrap());

        assert_eq!(app.panel().active_community(), "EarthPorn");
        assert!(!app.panel().is_loading());
        assert_eq!(app.panel().pending_seq(), None);
        assert_eq!(app.panel().search_text(), "");

        let view = app.panel().view();
        assert_eq!(view.navigation_title, "Reddit Trends: r/EarthPorn");
        assert_eq!(view.section_title.as_deref(), Some("Trending on r/EarthPorn"));
        assert_eq!(view.posts.len(), 1);
    }

    #[test]
    fn test_run_once_search_filters_preset_community() {
        let panel = PanelState::new(TestData::COMMUNITY, TimeWindow::Week);
        let mut app = App::new(
            panel,
            Arc::new(SlowDaySource),
            Box::new(NoopActions),
            "https://reddit.com",
        );

        assert!(app.run_once(Some("nothing like it".to_string())).unwrap());
        assert_eq!(app.panel().active_community(), TestData::COMMUNITY);
        assert_eq!(app.panel().search_text(), "nothing like it");
        assert!(app.panel().view().posts.is_empty());
    }

    #[test]
    fn test_run_once_network_failure_notifies_once() {
        let panel = PanelState::new(TestData::COMMUNITY, TimeWindow::Day);
        let mut app = App::new(
            panel,
            Arc::new(fetcher_for("http://127.0.0.1:1")),
            Box::new(NoopActions),
            "https://reddit.com",
        );

        assert!(!app.run_once(None).unwrap());
        assert_eq!(app.notifications().len(), 1);
        assert_eq!(app.notifications()[0].title, "Failed to load Reddit posts");
        assert!(matches!(app.panel().error(), Some(FetchError::Network(_))));
    }
}
