#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::config::{AppConfig, QuizConfig};

    fn quiz(reveal_window_ms: u64) -> QuizConfig {
        QuizConfig {
            reveal_window_ms,
            session_idle_secs: 1800,
            bank_path: None,
        }
    }

    #[test]
    fn reveal_window_is_positive_and_bounded() {
        assert_eq!(quiz(2500).reveal_window(), Duration::from_millis(2500));
        assert_eq!(quiz(0).reveal_window(), Duration::from_millis(2500));
        assert_eq!(quiz(600_000).reveal_window(), Duration::from_secs(60));
    }

    #[test]
    fn session_idle_is_positive() {
        let mut config = quiz(2500);
        assert_eq!(config.session_idle(), Duration::from_secs(1800));

        config.session_idle_secs = 0;
        assert_eq!(config.session_idle(), Duration::from_secs(1800));

        config.session_idle_secs = 90;
        assert_eq!(config.session_idle(), Duration::from_secs(90));
    }

    #[test]
    fn loads_with_defaults() {
        let config = AppConfig::load().unwrap();

        assert!(!config.server.address.is_empty());
        assert!(config.quiz.reveal_window() > Duration::ZERO);
        assert!(config.quiz.session_idle() > Duration::ZERO);
    }
}
