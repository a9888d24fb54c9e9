//! Common utilities and helper functions

pub mod retry;

/// Truncate text to a maximum number of characters
pub fn truncate_text(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

/// Join a base URL and an endpoint path with exactly one slash between them
pub fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("short", 10), "short");
        assert_eq!(truncate_text("very long text here", 10), "very lo...");
        assert_eq!(truncate_text("Очередь регистрации", 10), "Очередь...");
    }

    #[test]
    fn test_join_url() {
        assert_eq!(
            join_url("http://localhost:8000/api/", "/queue/"),
            "http://localhost:8000/api/queue/"
        );
        assert_eq!(join_url("http://h/api", "structure/"), "http://h/api/structure/");
    }
}
