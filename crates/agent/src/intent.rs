use tankquote_core::config::DEFAULT_PRICE_KEYWORDS;

/// Detects whether a chat message is asking for a price. Plain
/// case-insensitive substring matching against a keyword list; this is a
/// heuristic trigger, not language understanding.
#[derive(Clone, Debug)]
pub struct PriceIntentDetector {
    keywords: Vec<String>,
}

impl Default for PriceIntentDetector {
    fn default() -> Self {
        Self::new(DEFAULT_PRICE_KEYWORDS.iter().map(|kw| kw.to_string()).collect())
    }
}

impl PriceIntentDetector {
    pub fn new(keywords: Vec<String>) -> Self {
        let keywords = keywords.into_iter().map(|kw| kw.to_lowercase()).collect();
        Self { keywords }
    }

    pub fn detect(&self, message: &str) -> bool {
        let message = message.to_lowercase();
        self.keywords.iter().any(|keyword| message.contains(keyword))
    }
}
