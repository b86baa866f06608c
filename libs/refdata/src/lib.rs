#![forbid(unsafe_code)]

//! Reference-data lookup tables for the screening domain.
//!
//! Each domain enumeration (screening status, cease reason, event status,
//! ...) is a fixed description⇄code table built once at first use and
//! immutable afterwards. Lookups are pure functions; there is no
//! build-cache-if-absent step that could race under concurrent first
//! access.

mod tables;

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One domain enumeration: an immutable description⇄code table.
#[derive(Debug)]
pub struct RefDataTable {
    name: &'static str,
    by_code: HashMap<i32, &'static str>,
    by_description: HashMap<&'static str, i32>,
    by_description_ci: HashMap<String, i32>,
}

impl RefDataTable {
    fn build(name: &'static str, entries: &'static [(i32, &'static str)]) -> Self {
        let mut by_code = HashMap::with_capacity(entries.len());
        let mut by_description = HashMap::with_capacity(entries.len());
        let mut by_description_ci = HashMap::with_capacity(entries.len());
        for &(code, description) in entries {
            by_code.insert(code, description);
            by_description.insert(description, code);
            by_description_ci.insert(description.to_lowercase(), code);
        }
        Self {
            name,
            by_code,
            by_description,
            by_description_ci,
        }
    }

    /// Name of the enumeration this table describes.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Exact description → internal code.
    pub fn by_description(&self, description: &str) -> Option<i32> {
        self.by_description.get(description).copied()
    }

    /// Case-insensitive description → internal code.
    pub fn by_description_ci(&self, description: &str) -> Option<i32> {
        let code = self
            .by_description_ci
            .get(description.trim().to_lowercase().as_str())
            .copied();
        if code.is_none() {
            tracing::debug!("no {} entry matches '{}'", self.name, description);
        }
        code
    }

    /// Internal code → description.
    pub fn by_code(&self, code: i32) -> Option<&'static str> {
        self.by_code.get(&code).copied()
    }

    /// All known descriptions, for diagnostics.
    pub fn descriptions(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.by_description.keys().copied()
    }
}

static SCREENING_STATUS: Lazy<RefDataTable> =
    Lazy::new(|| RefDataTable::build("screening status", tables::SCREENING_STATUS));

static SS_REASON: Lazy<RefDataTable> =
    Lazy::new(|| RefDataTable::build("screening status reason", tables::SS_REASON));

static SDD_REASON: Lazy<RefDataTable> =
    Lazy::new(|| RefDataTable::build("screening due date reason", tables::SDD_REASON));

static SURVEILLANCE_REASON: Lazy<RefDataTable> = Lazy::new(|| {
    RefDataTable::build("surveillance due date reason", tables::SURVEILLANCE_REASON)
});

static CEASE_REASON: Lazy<RefDataTable> =
    Lazy::new(|| RefDataTable::build("cease reason", tables::CEASE_REASON));

static EPISODE_STATUS: Lazy<RefDataTable> =
    Lazy::new(|| RefDataTable::build("episode status", tables::EPISODE_STATUS));

static GENDER: Lazy<RefDataTable> = Lazy::new(|| RefDataTable::build("gender", tables::GENDER));

static EVENT_STATUS: Lazy<RefDataTable> =
    Lazy::new(|| RefDataTable::build("event status", tables::EVENT_STATUS));

/// Screening status of a subject (Call, Recall, Ceased, ...).
pub fn screening_status() -> &'static RefDataTable {
    &SCREENING_STATUS
}

/// Reason a subject's screening status last changed.
pub fn ss_reason() -> &'static RefDataTable {
    &SS_REASON
}

/// Reason a subject's screening due date last changed.
pub fn sdd_reason() -> &'static RefDataTable {
    &SDD_REASON
}

/// Reason a subject's surveillance due date last changed.
pub fn surveillance_reason() -> &'static RefDataTable {
    &SURVEILLANCE_REASON
}

/// Reason a subject was ceased from the programme.
pub fn cease_reason() -> &'static RefDataTable {
    &CEASE_REASON
}

/// Status of a screening episode.
pub fn episode_status() -> &'static RefDataTable {
    &EPISODE_STATUS
}

/// Subject gender.
pub fn gender() -> &'static RefDataTable {
    &GENDER
}

/// Screening event statuses recorded in the subject's event history.
pub fn event_status() -> &'static RefDataTable {
    &EVENT_STATUS
}
