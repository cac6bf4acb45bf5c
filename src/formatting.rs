use crate::common::Post;

/// Compact display form of a score or comment count: `1.5k`, `2.5m`, `999`.
/// Thresholds apply to the magnitude and the sign is kept. One decimal,
/// rounded half up.
pub fn format_count(num: i64) -> String {
    let magnitude = num.unsigned_abs();
    let sign = if num < 0 { "-" } else { "" };

    if magnitude >= 1_000_000 {
        format!("{}{}m", sign, one_decimal(magnitude, 1_000_000))
    } else if magnitude >= 1_000 {
        format!("{}{}k", sign, one_decimal(magnitude, 1_000))
    } else {
        num.to_string()
    }
}

fn one_decimal(value: u64, divisor: u64) -> String {
    let value = value as u128;
    let divisor = divisor as u128;
    let tenths = (value * 10 + divisor / 2) / divisor;
    format!("{}.{}", tenths / 10, tenths % 10)
}

/// One list row: title, origin community and the two counters.
pub fn format_post_row(index: usize, post: &Post) -> String {
    format!(
        "{:>2}. {}  r/{}  ↑ {}  💬 {}",
        index,
        post.title,
        post.community_name,
        format_count(post.score),
        format_count(post.comment_count.min(i64::MAX as u64) as i64)
    )
}
