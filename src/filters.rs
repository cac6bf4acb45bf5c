use log::debug;

use crate::common::Post;

/// Posts whose title contains `search_text`, ignoring case, in their original
/// order. In custom-entry mode the search box holds the community name, so
/// nothing is filtered.
pub fn filter_posts<'a>(posts: &'a [Post], search_text: &str, custom_mode: bool) -> Vec<&'a Post> {
    if custom_mode || search_text.is_empty() {
        return posts.iter().collect();
    }

    let needle = search_text.to_lowercase();
    let filtered: Vec<&Post> = posts
        .iter()
        .filter(|post| post.title.to_lowercase().contains(&needle))
        .collect();

    debug!(
        "Search '{}' kept {} of {} posts.",
        search_text,
        filtered.len(),
        posts.len()
    );
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(id: &str, title: &str) -> Post {
        Post {
            id: id.to_string(),
            title: title.to_string(),
            score: 1,
            comment_count: 0,
            community_name: "LandscapePhotography".to_string(),
            path: format!("/r/LandscapePhotography/comments/{}/", id),
            content_url: String::new(),
        }
    }

    fn titles(posts: &[&Post]) -> Vec<String> {
        posts.iter().map(|p| p.title.clone()).collect()
    }

    fn sample() -> Vec<Post> {
        vec![
            post("1", "Sunset Valley"),
            post("2", "Old Barn"),
            post("3", "sunny Meadow"),
        ]
    }

    #[test]
    fn test_filter_posts_case_insensitive_keeps_order() {
        let posts = sample();
        let result = filter_posts(&posts, "sun", false);
        assert_eq!(titles(&result), vec!["Sunset Valley", "sunny Meadow"]);
    }

    #[test]
    fn test_filter_posts_uppercase_needle() {
        let posts = sample();
        let result = filter_posts(&posts, "BARN", false);
        assert_eq!(titles(&result), vec!["Old Barn"]);
    }

    #[test]
    fn test_filter_posts_empty_search() {
        let posts = sample();
        assert_eq!(filter_posts(&posts, "", false).len(), 3);
    }

    #[test]
    fn test_filter_posts_custom_mode_is_noop() {
        let posts = sample();
        let result = filter_posts(&posts, "nothing matches this", true);
        assert_eq!(
            titles(&result),
            vec!["Sunset Valley", "Old Barn", "sunny Meadow"]
        );
    }

    #[test]
    fn test_filter_posts_no_match() {
        let posts = sample();
        assert!(filter_posts(&posts, "glacier", false).is_empty());
    }

    #[test]
    fn test_filter_posts_middle_of_word() {
        let posts = sample();
        let result = filter_posts(&posts, "ado", false);
        assert_eq!(titles(&result), vec!["sunny Meadow"]);
    }
}
