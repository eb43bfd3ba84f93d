//! Browsing session: the view state behind the two-pane job browser.
//!
//! `Session` never talks to the network. Mutators queue [`Command`]s which
//! the app loop drains with [`Session::take_commands`] and runs on tokio;
//! results come back through [`Session::apply`]. Listing requests carry a
//! sequence number and only the most recently issued one may update the
//! visible page.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::filter::{total_pages, FilterState, JobQuery, PerPage};
use crate::models::{Job, JobSource, PageResult};
use crate::prefs::PrefStore;
use crate::translation::{TranslateAction, TranslationCache};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    FetchJobs { seq: u64, query: JobQuery },
    FetchSources,
    FetchLocations,
    FetchFavorites,
    AddFavorite(i64),
    RemoveFavorite(i64),
    Translate { job_id: i64, text: String },
}

#[derive(Debug)]
pub enum Outcome {
    Jobs {
        seq: u64,
        result: Result<PageResult, ApiError>,
    },
    Sources(Result<Vec<JobSource>, ApiError>),
    Locations(Result<Vec<String>, ApiError>),
    Favorites(Result<HashSet<i64>, ApiError>),
    FavoriteAdded {
        job_id: i64,
        result: Result<(), ApiError>,
    },
    FavoriteRemoved {
        job_id: i64,
        result: Result<(), ApiError>,
    },
    Translated {
        job_id: i64,
        result: Result<String, ApiError>,
    },
}

pub struct Session {
    prefs: PrefStore,
    filter: FilterState,
    jobs: Vec<Job>,
    total: u64,
    selected: Option<usize>,
    favorites: HashSet<i64>,
    favorites_pending: HashSet<i64>,
    sources: Vec<JobSource>,
    locations: Vec<String>,
    translations: TranslationCache,
    next_seq: u64,
    latest_seq: Option<u64>,
    commands: Vec<Command>,
    alert: Option<String>,
    status: Option<String>,
}

impl Session {
    pub fn new(prefs: PrefStore) -> Self {
        let per_page = prefs.per_page().unwrap_or_else(|e| {
            warn!(error = %e, "could not read perPage");
            PerPage::default()
        });
        let texts = prefs.translations().unwrap_or_else(|e| {
            warn!(error = %e, "could not read translations");
            Default::default()
        });
        let showing = prefs.translation_states().unwrap_or_else(|e| {
            warn!(error = %e, "could not read translationStates");
            Default::default()
        });
        let translations = TranslationCache::from_parts(texts, showing);
        Self {
            prefs,
            filter: FilterState::new(per_page),
            jobs: Vec::new(),
            total: 0,
            selected: None,
            favorites: HashSet::new(),
            favorites_pending: HashSet::new(),
            sources: Vec::new(),
            locations: Vec::new(),
            translations,
            next_seq: 0,
            latest_seq: None,
            commands: Vec::new(),
            alert: None,
            status: None,
        }
    }

    /// Queues the initial lookups and the first listing request.
    pub fn start(&mut self) {
        self.commands.push(Command::FetchSources);
        self.commands.push(Command::FetchLocations);
        self.commands.push(Command::FetchFavorites);
        self.refresh();
    }

    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Issues a listing request for the current filter.
    pub fn refresh(&mut self) {
        self.next_seq += 1;
        let seq = self.next_seq;
        self.latest_seq = Some(seq);
        self.commands.push(Command::FetchJobs {
            seq,
            query: self.filter.to_query(),
        });
    }

    // --- Read access ---

    pub fn prefs(&self) -> &PrefStore {
        &self.prefs
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn total_pages(&self) -> u32 {
        total_pages(self.total, self.filter.per_page())
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_job(&self) -> Option<&Job> {
        self.selected.and_then(|i| self.jobs.get(i))
    }

    pub fn sources(&self) -> &[JobSource] {
        &self.sources
    }

    pub fn locations(&self) -> &[String] {
        &self.locations
    }

    pub fn favorites(&self) -> &HashSet<i64> {
        &self.favorites
    }

    pub fn is_favorite(&self, job_id: i64) -> bool {
        self.favorites.contains(&job_id)
    }

    pub fn translations(&self) -> &TranslationCache {
        &self.translations
    }

    pub fn is_loading(&self) -> bool {
        self.latest_seq.is_some()
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn dismiss_alert(&mut self) {
        self.alert = None;
    }

    /// Locations containing `needle` (case-insensitive), sorted.
    pub fn matching_locations(&self, needle: &str) -> Vec<&str> {
        let needle = needle.to_lowercase();
        let mut matches: Vec<&str> = self
            .locations
            .iter()
            .map(String::as_str)
            .filter(|l| l.to_lowercase().contains(&needle))
            .collect();
        matches.sort_by_key(|l| l.to_lowercase());
        matches
    }

    // --- Filter mutators ---

    pub fn set_search(&mut self, search: &str) {
        if self.filter.set_search(search) {
            self.refresh();
        }
    }

    pub fn set_source(&mut self, source: Option<&str>) {
        if self.filter.set_source(source) {
            self.refresh();
        }
    }

    /// All sources → first source → … → last source → all sources.
    pub fn cycle_source(&mut self) {
        let next = match self.filter.source() {
            None => self.sources.first(),
            Some(current) => self
                .sources
                .iter()
                .position(|s| s.name == current)
                .and_then(|i| self.sources.get(i + 1)),
        }
        .map(|s| s.name.clone());
        self.set_source(next.as_deref());
    }

    pub fn toggle_location(&mut self, location: &str) {
        if self.filter.toggle_location(location) {
            self.refresh();
        }
    }

    pub fn clear_locations(&mut self) {
        if self.filter.clear_locations() {
            self.refresh();
        }
    }

    pub fn set_favorites_only(&mut self, favorites_only: bool) {
        if self.filter.set_favorites_only(favorites_only) {
            self.refresh();
        }
    }

    pub fn toggle_favorites_only(&mut self) {
        self.set_favorites_only(!self.filter.favorites_only());
    }

    pub fn set_per_page(&mut self, per_page: PerPage) {
        if !self.filter.set_per_page(per_page) {
            return;
        }
        if let Err(e) = self.prefs.set_per_page(per_page) {
            warn!(error = %e, "could not persist perPage");
        }
        self.refresh();
    }

    pub fn set_page(&mut self, page: u32) {
        if self.filter.set_page(page, self.total_pages()) {
            self.refresh();
        }
    }

    pub fn next_page(&mut self) {
        self.set_page(self.filter.page() + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.filter.page().saturating_sub(1));
    }

    // --- Selection ---

    pub fn select(&mut self, index: usize) {
        if index < self.jobs.len() {
            self.selected = Some(index);
        }
    }

    pub fn select_next(&mut self) {
        if let Some(i) = self.selected {
            self.select(i + 1);
        }
    }

    pub fn select_prev(&mut self) {
        if let Some(i) = self.selected {
            self.select(i.saturating_sub(1));
        }
    }

    // --- Favorites and translation ---

    /// Flips favorite membership right away and queues the API call. A
    /// failed call puts the membership back (see [`Session::apply`]).
    /// Toggles on a job whose previous change is still unconfirmed are
    /// ignored, so at most one request per job is in flight.
    pub fn toggle_favorite(&mut self, job_id: i64) {
        if !self.favorites_pending.insert(job_id) {
            debug!(job_id, "favorite change still in flight");
            return;
        }
        if self.favorites.remove(&job_id) {
            self.commands.push(Command::RemoveFavorite(job_id));
        } else {
            self.favorites.insert(job_id);
            self.commands.push(Command::AddFavorite(job_id));
        }
    }

    pub fn toggle_selected_favorite(&mut self) {
        if let Some(id) = self.selected_job().map(|j| j.id) {
            self.toggle_favorite(id);
        }
    }

    pub fn toggle_translation(&mut self, job_id: i64) {
        match self.translations.toggle(job_id) {
            TranslateAction::Fetch => {
                let text = self
                    .jobs
                    .iter()
                    .find(|j| j.id == job_id)
                    .map(|j| j.description.clone())
                    .unwrap_or_default();
                self.commands.push(Command::Translate { job_id, text });
            }
            TranslateAction::Pending => {}
            TranslateAction::Toggled(_) => self.persist_translations(),
        }
    }

    pub fn toggle_selected_translation(&mut self) {
        if let Some(id) = self.selected_job().map(|j| j.id) {
            self.toggle_translation(id);
        }
    }

    /// Drops every cached translation and its flag. Returns how many
    /// translations were removed.
    pub fn clear_translations(&mut self) -> anyhow::Result<usize> {
        let count = self.translations.texts().len();
        self.translations.clear();
        self.prefs.set_translations(self.translations.texts())?;
        self.prefs.set_translation_states(self.translations.states())?;
        info!(count, "translations cleared");
        Ok(count)
    }

    fn persist_translations(&self) {
        let result = self
            .prefs
            .set_translations(self.translations.texts())
            .and_then(|_| self.prefs.set_translation_states(self.translations.states()));
        if let Err(e) = result {
            warn!(error = %e, "could not persist translations");
        }
    }

    // --- Results ---

    pub fn apply(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Jobs { seq, result } => self.apply_jobs(seq, result),
            Outcome::Sources(Ok(sources)) => self.sources = sources,
            Outcome::Locations(Ok(locations)) => self.locations = locations,
            Outcome::Favorites(Ok(favorites)) => self.merge_favorites(favorites),
            Outcome::Sources(Err(e)) => self.report("job sources", &e),
            Outcome::Locations(Err(e)) => self.report("locations", &e),
            Outcome::Favorites(Err(e)) => self.report("favorites", &e),
            Outcome::FavoriteAdded { job_id, result } => {
                self.favorites_pending.remove(&job_id);
                match result {
                    Ok(()) => info!(job_id, "favorite saved"),
                    Err(e) => {
                        self.favorites.remove(&job_id);
                        self.report("favorite", &e);
                        self.alert = Some(format!("Could not save favorite: {}", e));
                    }
                }
            }
            Outcome::FavoriteRemoved { job_id, result } => {
                self.favorites_pending.remove(&job_id);
                match result {
                    Ok(()) => {
                        info!(job_id, "favorite removed");
                        if self.filter.favorites_only() {
                            self.refresh();
                        }
                    }
                    Err(e) => {
                        self.favorites.insert(job_id);
                        self.report("favorite", &e);
                        self.alert = Some(format!("Could not remove favorite: {}", e));
                    }
                }
            }
            Outcome::Translated { job_id, result } => match result {
                Ok(text) => {
                    self.translations.complete(job_id, text);
                    self.persist_translations();
                }
                Err(e) => {
                    self.translations.fail(job_id);
                    self.report("translation", &e);
                }
            },
        }
    }

    /// Takes the server's favorites, keeping local state for jobs with an
    /// unconfirmed change.
    fn merge_favorites(&mut self, mut server: HashSet<i64>) {
        for &job_id in &self.favorites_pending {
            if self.favorites.contains(&job_id) {
                server.insert(job_id);
            } else {
                server.remove(&job_id);
            }
        }
        self.favorites = server;
    }

    fn apply_jobs(&mut self, seq: u64, result: Result<PageResult, ApiError>) {
        if self.latest_seq != Some(seq) {
            debug!(seq, latest = ?self.latest_seq, "dropping stale listing");
            return;
        }
        self.latest_seq = None;
        match result {
            Ok(page) => {
                self.status = None;
                self.total = page.total;
                self.jobs = page.jobs;
                self.selected = if self.jobs.is_empty() { None } else { Some(0) };
                let pages = self.total_pages();
                if self.filter.clamp_page(pages) && pages > 0 {
                    self.refresh();
                }
            }
            Err(e) => self.report("jobs", &e),
        }
    }

    fn report(&mut self, what: &str, error: &ApiError) {
        warn!(error = %error, "error fetching {}", what);
        self.status = Some(format!("Error fetching {}: {}", what, error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn job(id: i64) -> Job {
        Job {
            id,
            title: format!("Job {}", id),
            company: "Acme".to_string(),
            location: "Ha Noi".to_string(),
            description: format!("Description {}", id),
            url: format!("https://jobs/{}", id),
            salary: None,
            deadline: None,
            source: None,
        }
    }

    fn page(ids: &[i64], total: u64) -> PageResult {
        PageResult {
            jobs: ids.iter().copied().map(job).collect(),
            total,
        }
    }

    fn rejected() -> ApiError {
        ApiError::Rejected("Could not save favorite".to_string())
    }

    fn session() -> Session {
        Session::new(PrefStore::open_in_memory().unwrap())
    }

    /// Applies a successful response to the listing request just issued.
    fn answer(session: &mut Session, result: PageResult) {
        let seq = last_fetch(session).0;
        session.apply(Outcome::Jobs {
            seq,
            result: Ok(result),
        });
    }

    fn last_fetch(session: &mut Session) -> (u64, JobQuery) {
        session
            .take_commands()
            .into_iter()
            .rev()
            .find_map(|c| match c {
                Command::FetchJobs { seq, query } => Some((seq, query)),
                _ => None,
            })
            .expect("no listing request queued")
    }

    #[test]
    fn start_queues_lookups_and_first_page() {
        let mut s = session();
        s.start();
        let commands = s.take_commands();
        assert_eq!(commands.len(), 4);
        assert_eq!(commands[0], Command::FetchSources);
        assert!(matches!(&commands[3], Command::FetchJobs { query, .. } if query.page == 1 && query.per_page == 10));
        assert!(s.is_loading());
        assert!(s.take_commands().is_empty());
    }

    #[test]
    fn filter_changes_refetch_from_page_one() {
        let mut s = session();
        s.start();
        answer(&mut s, page(&[1, 2], 95));
        s.set_page(4);
        assert_eq!(last_fetch(&mut s).1.page, 4);

        s.set_search("rust");
        let (_, query) = last_fetch(&mut s);
        assert_eq!(query.page, 1);
        assert_eq!(query.search.as_deref(), Some("rust"));
        assert_eq!(s.filter().page(), 1);
    }

    #[test]
    fn unchanged_filter_issues_nothing() {
        let mut s = session();
        s.set_search("");
        s.set_favorites_only(false);
        s.set_page(1);
        assert!(s.take_commands().is_empty());
    }

    #[test]
    fn out_of_range_pages_are_ignored() {
        let mut s = session();
        s.start();
        answer(&mut s, page(&[1], 20));
        assert_eq!(s.total_pages(), 2);
        s.set_page(3);
        s.prev_page();
        assert!(s.take_commands().is_empty());
        s.next_page();
        assert_eq!(last_fetch(&mut s).1.page, 2);
    }

    #[test]
    fn per_page_change_is_persisted() {
        let mut s = session();
        s.set_per_page(PerPage::new(25).unwrap());
        assert_eq!(last_fetch(&mut s).1.per_page, 25);
        assert_eq!(s.prefs().per_page().unwrap().get(), 25);
    }

    #[test]
    fn new_results_select_first_job_even_if_old_selection_survives() {
        let mut s = session();
        s.start();
        answer(&mut s, page(&[1, 2, 3], 3));
        s.select(2);
        assert_eq!(s.selected_job().map(|j| j.id), Some(3));

        s.set_search("job");
        answer(&mut s, page(&[2, 3], 2));
        assert_eq!(s.selected_job().map(|j| j.id), Some(2));
    }

    #[test]
    fn empty_results_clear_selection() {
        let mut s = session();
        s.start();
        answer(&mut s, page(&[1], 1));
        s.set_search("nothing matches");
        answer(&mut s, page(&[], 0));
        assert!(s.selected_job().is_none());
        assert_eq!(s.total_pages(), 0);
        assert!(!s.is_loading());
    }

    #[test]
    fn stale_listing_responses_are_dropped() {
        let mut s = session();
        s.set_search("r");
        let (first, _) = last_fetch(&mut s);
        s.set_search("ru");
        let (second, _) = last_fetch(&mut s);

        s.apply(Outcome::Jobs {
            seq: second,
            result: Ok(page(&[7], 1)),
        });
        s.apply(Outcome::Jobs {
            seq: first,
            result: Ok(page(&[1, 2, 3], 3)),
        });
        assert_eq!(s.jobs().len(), 1);
        assert_eq!(s.selected_job().map(|j| j.id), Some(7));
    }

    #[test]
    fn failed_listing_keeps_previous_page() {
        let mut s = session();
        s.start();
        answer(&mut s, page(&[1, 2], 2));
        s.set_search("x");
        let (seq, _) = last_fetch(&mut s);
        s.apply(Outcome::Jobs {
            seq,
            result: Err(ApiError::Status {
                status: StatusCode::BAD_GATEWAY,
                body: String::new(),
            }),
        });
        assert_eq!(s.jobs().len(), 2);
        assert!(s.status().unwrap().starts_with("Error fetching jobs"));
    }

    #[test]
    fn shrinking_total_clamps_page_and_refetches() {
        let mut s = session();
        s.start();
        answer(&mut s, page(&[1], 50));
        s.set_page(5);
        answer(&mut s, page(&[], 20));
        assert_eq!(s.filter().page(), 2);
        assert_eq!(last_fetch(&mut s).1.page, 2);
    }

    #[test]
    fn list_and_detail_favorite_toggles_agree() {
        let mut s = session();
        s.start();
        answer(&mut s, page(&[1, 2], 2));

        // list row for job 2
        s.toggle_favorite(2);
        s.select(1);
        assert!(s.is_favorite(s.selected_job().unwrap().id));
        assert_eq!(s.take_commands(), vec![Command::AddFavorite(2)]);
        s.apply(Outcome::FavoriteAdded {
            job_id: 2,
            result: Ok(()),
        });

        // detail pane for the same job
        s.toggle_selected_favorite();
        assert!(!s.is_favorite(2));
        assert_eq!(s.take_commands(), vec![Command::RemoveFavorite(2)]);
    }

    #[test]
    fn favorite_toggles_wait_for_the_pending_request() {
        let mut s = session();
        s.toggle_favorite(4);
        s.toggle_favorite(4);
        assert!(s.is_favorite(4));
        assert_eq!(s.take_commands(), vec![Command::AddFavorite(4)]);

        s.apply(Outcome::FavoriteAdded {
            job_id: 4,
            result: Err(rejected()),
        });
        assert!(!s.is_favorite(4));

        // confirmed, so the next toggle goes out
        s.toggle_favorite(4);
        assert_eq!(s.take_commands(), vec![Command::AddFavorite(4)]);
    }

    #[test]
    fn initial_favorites_keep_unconfirmed_toggles() {
        let mut s = session();
        s.toggle_favorite(5);
        s.apply(Outcome::Favorites(Ok(HashSet::from([1, 2]))));
        s.toggle_favorite(2);
        // a later refresh that predates the removal
        s.apply(Outcome::Favorites(Ok(HashSet::from([1, 2]))));
        assert_eq!(s.favorites(), &HashSet::from([1, 5]));

        s.apply(Outcome::FavoriteAdded {
            job_id: 5,
            result: Ok(()),
        });
        s.apply(Outcome::FavoriteRemoved {
            job_id: 2,
            result: Ok(()),
        });
        s.apply(Outcome::Favorites(Ok(HashSet::from([1, 5]))));
        assert_eq!(s.favorites(), &HashSet::from([1, 5]));
    }

    #[test]
    fn failed_favorite_mutations_revert_and_alert() {
        let mut s = session();
        s.toggle_favorite(4);
        s.apply(Outcome::FavoriteAdded {
            job_id: 4,
            result: Err(rejected()),
        });
        assert!(!s.is_favorite(4));
        assert!(s.alert().unwrap().contains("Could not save favorite"));
        s.dismiss_alert();
        assert!(s.alert().is_none());

        s.apply(Outcome::Favorites(Ok(HashSet::from([8]))));
        s.toggle_favorite(8);
        s.apply(Outcome::FavoriteRemoved {
            job_id: 8,
            result: Err(rejected()),
        });
        assert!(s.is_favorite(8));
        assert!(s.alert().is_some());
    }

    #[test]
    fn removing_a_favorite_refreshes_favorites_view() {
        let mut s = session();
        s.apply(Outcome::Favorites(Ok(HashSet::from([3]))));
        s.set_favorites_only(true);
        answer(&mut s, page(&[3], 1));
        s.toggle_favorite(3);
        assert_eq!(s.take_commands(), vec![Command::RemoveFavorite(3)]);
        s.apply(Outcome::FavoriteRemoved {
            job_id: 3,
            result: Ok(()),
        });
        assert!(last_fetch(&mut s).1.favorites);
    }

    #[test]
    fn translation_is_fetched_once_per_job() {
        let mut s = session();
        s.start();
        answer(&mut s, page(&[1], 1));

        s.toggle_selected_translation();
        s.toggle_selected_translation(); // still in flight
        let commands = s.take_commands();
        assert_eq!(
            commands,
            vec![Command::Translate {
                job_id: 1,
                text: "Description 1".to_string()
            }]
        );

        s.apply(Outcome::Translated {
            job_id: 1,
            result: Ok("Mô tả 1".to_string()),
        });
        assert!(s.translations().is_showing(1));

        s.toggle_selected_translation();
        s.toggle_selected_translation();
        assert!(s.take_commands().is_empty());
        assert!(s.translations().is_showing(1));
        assert_eq!(s.prefs().translation_states().unwrap().get(&1), Some(&true));
        assert_eq!(
            s.prefs().translations().unwrap().get(&1).map(String::as_str),
            Some("Mô tả 1")
        );
    }

    #[test]
    fn clearing_translations_empties_the_store() {
        let mut s = session();
        s.start();
        answer(&mut s, page(&[1], 1));
        s.toggle_translation(1);
        s.take_commands();
        s.apply(Outcome::Translated {
            job_id: 1,
            result: Ok("Mô tả 1".to_string()),
        });
        assert_eq!(s.prefs().translations().unwrap().len(), 1);

        assert_eq!(s.clear_translations().unwrap(), 1);
        assert!(s.translations().text(1).is_none());
        assert!(s.prefs().translations().unwrap().is_empty());
        assert!(s.prefs().translation_states().unwrap().is_empty());

        // the next toggle fetches again
        s.toggle_translation(1);
        assert!(matches!(
            s.take_commands().as_slice(),
            [Command::Translate { job_id: 1, .. }]
        ));
    }

    #[test]
    fn unreadable_prefs_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.db");
        let prefs = PrefStore::open(&path).unwrap();
        rusqlite::Connection::open(&path)
            .unwrap()
            .execute("DROP TABLE preferences", [])
            .unwrap();

        let s = Session::new(prefs);
        assert_eq!(s.filter().per_page(), PerPage::default());
        assert!(s.translations().texts().is_empty());
        assert!(s.translations().states().is_empty());
    }

    #[test]
    fn cached_translations_load_from_prefs() {
        let prefs = PrefStore::open_in_memory().unwrap();
        prefs
            .set_translations(&[(5, "Xin chào".to_string())].into_iter().collect())
            .unwrap();
        let mut s = Session::new(prefs);
        s.toggle_translation(5);
        assert!(s.take_commands().is_empty());
        assert!(s.translations().is_showing(5));
    }

    #[test]
    fn source_cycle_wraps_to_all() {
        let mut s = session();
        s.apply(Outcome::Sources(Ok(vec![
            JobSource { id: 1, name: "itviec".to_string() },
            JobSource { id: 2, name: "topcv".to_string() },
        ])));
        s.cycle_source();
        assert_eq!(s.filter().source(), Some("itviec"));
        s.cycle_source();
        assert_eq!(s.filter().source(), Some("topcv"));
        s.cycle_source();
        assert_eq!(s.filter().source(), None);
        assert_eq!(last_fetch(&mut s).1.source, None);
    }

    #[test]
    fn location_matches_are_case_insensitive_and_sorted() {
        let mut s = session();
        s.apply(Outcome::Locations(Ok(vec![
            "Ho Chi Minh".to_string(),
            "Ha Noi".to_string(),
            "Da Nang".to_string(),
        ])));
        assert_eq!(s.matching_locations("h"), vec!["Ha Noi", "Ho Chi Minh"]);
        assert_eq!(s.matching_locations("NANG"), vec!["Da Nang"]);
        assert_eq!(s.matching_locations("").len(), 3);
    }
}
