//! Filter, search and pagination state for the job listing.
//!
//! Every mutator except [`FilterState::set_page`] puts the listing back on
//! page 1, since a page number means nothing once the result set changes.
//! Mutators return `true` only when the state actually changed; callers use
//! that to decide whether a new listing request is due.

use std::collections::BTreeSet;
use std::fmt;

/// Page sizes offered by the per-page selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PerPage(u32);

impl PerPage {
    pub const ALLOWED: [u32; 4] = [5, 10, 25, 50];
    pub const LARGEST: PerPage = PerPage(50);

    pub fn new(value: u32) -> Option<Self> {
        Self::ALLOWED.contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Next larger size, saturating at the largest.
    pub fn larger(self) -> Self {
        Self::ALLOWED
            .iter()
            .copied()
            .find(|&v| v > self.0)
            .map(Self)
            .unwrap_or(self)
    }

    /// Next smaller size, saturating at the smallest.
    pub fn smaller(self) -> Self {
        Self::ALLOWED
            .iter()
            .rev()
            .copied()
            .find(|&v| v < self.0)
            .map(Self)
            .unwrap_or(self)
    }
}

impl Default for PerPage {
    fn default() -> Self {
        Self(10)
    }
}

impl fmt::Display for PerPage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub fn total_pages(total: u64, per_page: PerPage) -> u32 {
    let per_page = u64::from(per_page.get());
    u32::try_from(total.div_ceil(per_page)).unwrap_or(u32::MAX)
}

/// Parameters of one `/jobs` request. Empty filters are left out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobQuery {
    pub page: u32,
    pub per_page: u32,
    pub source: Option<String>,
    pub search: Option<String>,
    pub favorites: bool,
    pub locations: Vec<String>,
}

impl JobQuery {
    /// Query-string pairs in the order the API documents them.
    /// `locations` repeats once per selected location.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", self.page.to_string()),
            ("per_page", self.per_page.to_string()),
        ];
        if let Some(source) = &self.source {
            params.push(("source", source.clone()));
        }
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        if self.favorites {
            params.push(("favorites", "true".to_string()));
        }
        for location in &self.locations {
            params.push(("locations", location.clone()));
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    search: String,
    source: Option<String>, // None = all sources
    locations: BTreeSet<String>,
    favorites_only: bool,
    page: u32,
    per_page: PerPage,
}

impl FilterState {
    pub fn new(per_page: PerPage) -> Self {
        Self {
            search: String::new(),
            source: None,
            locations: BTreeSet::new(),
            favorites_only: false,
            page: 1,
            per_page,
        }
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn locations(&self) -> &BTreeSet<String> {
        &self.locations
    }

    pub fn favorites_only(&self) -> bool {
        self.favorites_only
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> PerPage {
        self.per_page
    }

    pub fn set_search(&mut self, search: &str) -> bool {
        if self.search == search {
            return false;
        }
        self.search = search.to_string();
        self.page = 1;
        true
    }

    pub fn set_source(&mut self, source: Option<&str>) -> bool {
        let source = source.filter(|s| !s.is_empty());
        if self.source.as_deref() == source {
            return false;
        }
        self.source = source.map(str::to_string);
        self.page = 1;
        true
    }

    /// Adds the location if absent, removes it otherwise.
    pub fn toggle_location(&mut self, location: &str) -> bool {
        if location.is_empty() {
            return false;
        }
        if !self.locations.remove(location) {
            self.locations.insert(location.to_string());
        }
        self.page = 1;
        true
    }

    pub fn clear_locations(&mut self) -> bool {
        if self.locations.is_empty() {
            return false;
        }
        self.locations.clear();
        self.page = 1;
        true
    }

    pub fn set_favorites_only(&mut self, favorites_only: bool) -> bool {
        if self.favorites_only == favorites_only {
            return false;
        }
        self.favorites_only = favorites_only;
        self.page = 1;
        true
    }

    pub fn set_per_page(&mut self, per_page: PerPage) -> bool {
        if self.per_page == per_page {
            return false;
        }
        self.per_page = per_page;
        self.page = 1;
        true
    }

    /// Moves to page `n`. Pages outside `1..=max(total_pages, 1)` are ignored.
    pub fn set_page(&mut self, n: u32, total_pages: u32) -> bool {
        if n < 1 || n > total_pages.max(1) || n == self.page {
            return false;
        }
        self.page = n;
        true
    }

    /// Pulls `page` back inside `1..=max(total_pages, 1)`.
    pub fn clamp_page(&mut self, total_pages: u32) -> bool {
        let max = total_pages.max(1);
        if self.page > max {
            self.page = max;
            return true;
        }
        false
    }

    pub fn to_query(&self) -> JobQuery {
        let search = self.search.trim();
        JobQuery {
            page: self.page,
            per_page: self.per_page.get(),
            source: self.source.clone(),
            search: (!search.is_empty()).then(|| search.to_string()),
            favorites: self.favorites_only,
            locations: self.locations.iter().cloned().collect(),
        }
    }
}

impl Default for FilterState {
    fn default() -> Self {
        Self::new(PerPage::default())
    }
}
