//! Filter → sort → paginate view over an in-memory village record set.
//!
//! Every operation is total. Unknown sort keys are ignored, unknown status
//! filters fall back to ALL and out-of-range pages are clamped.

pub mod detail;
pub mod state;

pub use detail::VillageDetail;
pub use state::{SortConfig, SortDirection, SortKey, StatusFilter, ViewState};

use crate::village::{VillageId, VillageRecord};
use std::cmp::Ordering;

pub const PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct ViewResult<'a> {
    pub page_records: Vec<&'a VillageRecord>,
    pub total_filtered: usize,
    /// Zero when nothing matches.
    pub total_pages: usize,
    pub current_page: usize,
    /// 1-based row number of the first record on the page.
    pub first_row_number: usize,
}

#[derive(Debug, Default)]
pub struct VillageBrowser {
    records: Vec<VillageRecord>,
    state: ViewState,
}

impl VillageBrowser {
    pub fn new(records: Vec<VillageRecord>) -> Self {
        VillageBrowser {
            records,
            state: ViewState::default(),
        }
    }

    /// Replaces the record set. Filter and sort survive, paging starts over.
    pub fn load(&mut self, records: Vec<VillageRecord>) {
        self.records = records;
        self.state.page = 1;
        if let Some(id) = self.state.expanded_id {
            if self.record(id).is_none() {
                self.state.expanded_id = None;
            }
        }
    }

    pub fn records(&self) -> &[VillageRecord] {
        &self.records
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn record(&self, id: VillageId) -> Option<&VillageRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.state.search_text = text.into();
        self.state.page = 1;
    }

    pub fn set_status_filter(&mut self, filter: StatusFilter) {
        self.state.status_filter = filter;
        self.state.page = 1;
    }

    pub fn set_status_filter_str(&mut self, raw: &str) {
        let filter = raw.parse::<StatusFilter>().unwrap_or(StatusFilter::All);
        self.set_status_filter(filter);
    }

    /// Same key flips direction, a new key starts ascending. Page is kept.
    pub fn sort_by(&mut self, key: SortKey) {
        self.state.sort = Some(match self.state.sort {
            Some(cfg) if cfg.key == key => SortConfig {
                key,
                direction: cfg.direction.toggled(),
            },
            _ => SortConfig {
                key,
                direction: SortDirection::Ascending,
            },
        });
    }

    /// Returns false and leaves the state alone for unknown keys.
    pub fn sort_by_str(&mut self, raw: &str) -> bool {
        match raw.parse::<SortKey>() {
            Ok(key) => {
                self.sort_by(key);
                true
            }
            Err(_) => false,
        }
    }

    pub fn set_page(&mut self, n: i64) {
        let last = self.total_pages().max(1) as i64;
        self.state.page = n.clamp(1, last) as usize;
    }

    pub fn next_page(&mut self) {
        self.set_page(self.state.page as i64 + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.state.page as i64 - 1);
    }

    /// Ids outside the current record set are ignored.
    pub fn toggle_expand(&mut self, id: VillageId) {
        if self.state.expanded_id == Some(id) {
            self.state.expanded_id = None;
        } else if self.record(id).is_some() {
            self.state.expanded_id = Some(id);
        }
    }

    pub fn expanded_id(&self) -> Option<VillageId> {
        self.state.expanded_id
    }

    pub fn detail(&self) -> Option<VillageDetail<'_>> {
        self.state
            .expanded_id
            .and_then(|id| self.record(id))
            .map(VillageDetail::for_record)
    }

    pub fn total_pages(&self) -> usize {
        self.filtered().count().div_ceil(PAGE_SIZE)
    }

    pub fn compute_view(&self) -> ViewResult<'_> {
        let mut rows: Vec<&VillageRecord> = self.filtered().collect();

        if let Some(cfg) = self.state.sort {
            // stable: equal keys keep their filtered order in both directions
            rows.sort_by(|a, b| {
                let ord = compare_by(cfg.key, a, b);
                match cfg.direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }

        let total_filtered = rows.len();
        let total_pages = total_filtered.div_ceil(PAGE_SIZE);
        let start = (self.state.page - 1) * PAGE_SIZE;
        let page_records = rows.into_iter().skip(start).take(PAGE_SIZE).collect();

        ViewResult {
            page_records,
            total_filtered,
            total_pages,
            current_page: self.state.page,
            first_row_number: start + 1,
        }
    }

    fn filtered(&self) -> impl Iterator<Item = &VillageRecord> + '_ {
        let needle = self.state.search_text.to_lowercase();
        let status = self.state.status_filter;
        self.records.iter().filter(move |r| {
            let text_ok = needle.is_empty()
                || r.name.to_lowercase().contains(&needle)
                || r.district.to_lowercase().contains(&needle);
            text_ok && status.matches(r.status)
        })
    }
}

fn compare_by(key: SortKey, a: &VillageRecord, b: &VillageRecord) -> Ordering {
    match key {
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::District => a.district.cmp(&b.district),
        SortKey::Status => a.status.label().cmp(b.status.label()),
        SortKey::TotalScore => a.total_score.total_cmp(&b.total_score),
        SortKey::Dimension(d) => a.dimensions.get(d).total_cmp(&b.dimensions.get(d)),
    }
}
