use ammonia;

/// Clean HTML content using the ammonia library.
///
/// This employs a whitelist-based sanitization strategy: it preserves safe tags
/// (like <b>, <p>) while stripping dangerous tags (like <script>, <iframe>)
/// and malicious attributes (like onclick).
///
/// Applied to every free-text field that other clients later render
/// (pet descriptions, adoption messages, story and article bodies).
pub fn clean_html(input: &str) -> String {
    ammonia::clean(input)
}
