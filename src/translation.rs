use std::collections::{HashMap, HashSet};

/// What a translate toggle asks the caller to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TranslateAction {
    /// No cached text yet; fetch it from the API.
    Fetch,
    /// A fetch for this job is already in flight.
    Pending,
    /// Cached text exists; the show flag is now this value.
    Toggled(bool),
}

/// Translated descriptions keyed by job id, plus whether each is showing.
/// Entries never expire.
#[derive(Debug, Clone, Default)]
pub struct TranslationCache {
    texts: HashMap<i64, String>,
    showing: HashMap<i64, bool>,
    in_flight: HashSet<i64>,
}

impl TranslationCache {
    pub fn from_parts(texts: HashMap<i64, String>, showing: HashMap<i64, bool>) -> Self {
        Self {
            texts,
            showing,
            in_flight: HashSet::new(),
        }
    }

    pub fn texts(&self) -> &HashMap<i64, String> {
        &self.texts
    }

    pub fn states(&self) -> &HashMap<i64, bool> {
        &self.showing
    }

    pub fn text(&self, job_id: i64) -> Option<&str> {
        self.texts.get(&job_id).map(String::as_str)
    }

    pub fn is_showing(&self, job_id: i64) -> bool {
        self.texts.contains_key(&job_id) && self.showing.get(&job_id).copied().unwrap_or(false)
    }

    pub fn is_translating(&self, job_id: i64) -> bool {
        self.in_flight.contains(&job_id)
    }

    /// The description to display: the translation when it is toggled on.
    pub fn display<'a>(&'a self, job_id: i64, original: &'a str) -> &'a str {
        if self.is_showing(job_id) {
            self.text(job_id).unwrap_or(original)
        } else {
            original
        }
    }

    pub fn toggle(&mut self, job_id: i64) -> TranslateAction {
        if self.texts.contains_key(&job_id) {
            let show = !self.is_showing(job_id);
            self.showing.insert(job_id, show);
            return TranslateAction::Toggled(show);
        }
        if !self.in_flight.insert(job_id) {
            return TranslateAction::Pending;
        }
        TranslateAction::Fetch
    }

    /// Stores a fetched translation and shows it.
    pub fn complete(&mut self, job_id: i64, text: String) {
        self.in_flight.remove(&job_id);
        self.texts.insert(job_id, text);
        self.showing.insert(job_id, true);
    }

    pub fn fail(&mut self, job_id: i64) {
        self.in_flight.remove(&job_id);
    }

    pub fn clear(&mut self) {
        self.texts.clear();
        self.showing.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_toggle_fetches_then_flips_cached_flag() {
        let mut cache = TranslationCache::default();
        assert_eq!(cache.toggle(3), TranslateAction::Fetch);
        assert!(cache.is_translating(3));
        assert_eq!(cache.toggle(3), TranslateAction::Pending);

        cache.complete(3, "Mô tả".to_string());
        assert!(cache.is_showing(3));
        assert_eq!(cache.display(3, "Description"), "Mô tả");

        assert_eq!(cache.toggle(3), TranslateAction::Toggled(false));
        assert_eq!(cache.display(3, "Description"), "Description");
        assert_eq!(cache.toggle(3), TranslateAction::Toggled(true));
    }

    #[test]
    fn failed_fetch_can_be_retried() {
        let mut cache = TranslationCache::default();
        assert_eq!(cache.toggle(9), TranslateAction::Fetch);
        cache.fail(9);
        assert!(!cache.is_translating(9));
        assert_eq!(cache.toggle(9), TranslateAction::Fetch);
    }

    #[test]
    fn orphan_show_flag_without_text_is_ignored() {
        let mut showing = HashMap::new();
        showing.insert(5, true);
        let cache = TranslationCache::from_parts(HashMap::new(), showing);
        assert!(!cache.is_showing(5));
        assert_eq!(cache.display(5, "orig"), "orig");
    }
}
