//! The closed registry of selection criteria keys.
//!
//! Keys are matched against the caller's criteria map after normalisation
//! (trim, lowercase, collapse inner whitespace, strip one leading `+`).
//! Each key carries its capability flags; a key missing from this registry
//! is rejected before any clause is built.

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// One supported criteria key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CriteriaKey {
    SubjectAge,
    DateOfBirth,
    DateOfDeath,
    NhsNumber,
    Gender,
    HubCode,
    ScreeningCentreCode,
    ScreeningStatus,
    ScreeningStatusReason,
    ScreeningDueDate,
    ScreeningDueDateReason,
    CalculatedScreeningDueDate,
    SurveillanceDueDate,
    SurveillanceDueDateReason,
    CeaseReason,
    LatestEpisodeStatus,
    HasEpisodes,
    HasEventStatus,
    DoesNotHaveEventStatus,
    HasUnprocessedSspiUpdates,
    HasActiveSupportingNotes,
}

/// Registry entry: key plus capability flags.
#[derive(Debug)]
pub struct KeyDef {
    pub key: CriteriaKey,
    pub description: &'static str,
    /// May the key appear more than once in one criteria set?
    pub allows_multiple_values: bool,
    /// May a value carry the `NOT:` modifier?
    pub allows_not_modifier: bool,
}

const KEY_DEFS: &[KeyDef] = &[
    KeyDef {
        key: CriteriaKey::SubjectAge,
        description: "subject age",
        allows_multiple_values: false,
        allows_not_modifier: false,
    },
    KeyDef {
        key: CriteriaKey::DateOfBirth,
        description: "subject date of birth",
        allows_multiple_values: false,
        allows_not_modifier: false,
    },
    KeyDef {
        key: CriteriaKey::DateOfDeath,
        description: "subject date of death",
        allows_multiple_values: false,
        allows_not_modifier: false,
    },
    KeyDef {
        key: CriteriaKey::NhsNumber,
        description: "subject nhs number",
        allows_multiple_values: false,
        allows_not_modifier: false,
    },
    KeyDef {
        key: CriteriaKey::Gender,
        description: "subject gender",
        allows_multiple_values: false,
        allows_not_modifier: true,
    },
    KeyDef {
        key: CriteriaKey::HubCode,
        description: "subject hub code",
        allows_multiple_values: false,
        allows_not_modifier: false,
    },
    KeyDef {
        key: CriteriaKey::ScreeningCentreCode,
        description: "subject screening centre code",
        allows_multiple_values: false,
        allows_not_modifier: false,
    },
    KeyDef {
        key: CriteriaKey::ScreeningStatus,
        description: "screening status",
        allows_multiple_values: false,
        allows_not_modifier: true,
    },
    KeyDef {
        key: CriteriaKey::ScreeningStatusReason,
        description: "screening status reason",
        allows_multiple_values: false,
        allows_not_modifier: true,
    },
    KeyDef {
        key: CriteriaKey::ScreeningDueDate,
        description: "screening due date",
        allows_multiple_values: false,
        allows_not_modifier: false,
    },
    KeyDef {
        key: CriteriaKey::ScreeningDueDateReason,
        description: "screening due date reason",
        allows_multiple_values: false,
        allows_not_modifier: true,
    },
    KeyDef {
        key: CriteriaKey::CalculatedScreeningDueDate,
        description: "calculated screening due date",
        allows_multiple_values: false,
        allows_not_modifier: false,
    },
    KeyDef {
        key: CriteriaKey::SurveillanceDueDate,
        description: "surveillance due date",
        allows_multiple_values: false,
        allows_not_modifier: false,
    },
    KeyDef {
        key: CriteriaKey::SurveillanceDueDateReason,
        description: "surveillance due date reason",
        allows_multiple_values: false,
        allows_not_modifier: true,
    },
    KeyDef {
        key: CriteriaKey::CeaseReason,
        description: "cease reason",
        allows_multiple_values: false,
        allows_not_modifier: true,
    },
    KeyDef {
        key: CriteriaKey::LatestEpisodeStatus,
        description: "latest episode status",
        allows_multiple_values: false,
        allows_not_modifier: true,
    },
    KeyDef {
        key: CriteriaKey::HasEpisodes,
        description: "subject has episodes",
        allows_multiple_values: false,
        allows_not_modifier: false,
    },
    KeyDef {
        key: CriteriaKey::HasEventStatus,
        description: "has event status",
        allows_multiple_values: true,
        allows_not_modifier: false,
    },
    KeyDef {
        key: CriteriaKey::DoesNotHaveEventStatus,
        description: "does not have event status",
        allows_multiple_values: true,
        allows_not_modifier: false,
    },
    KeyDef {
        key: CriteriaKey::HasUnprocessedSspiUpdates,
        description: "has unprocessed sspi updates",
        allows_multiple_values: false,
        allows_not_modifier: false,
    },
    KeyDef {
        key: CriteriaKey::HasActiveSupportingNotes,
        description: "has active supporting notes",
        allows_multiple_values: false,
        allows_not_modifier: false,
    },
];

static KEY_INDEX: Lazy<HashMap<&'static str, &'static KeyDef>> = Lazy::new(|| {
    let mut index = HashMap::with_capacity(KEY_DEFS.len());
    for def in KEY_DEFS {
        index.insert(def.description, def);
    }
    index
});

/// Normalise a caller-supplied key: trim, lowercase, collapse inner
/// whitespace and strip one leading `+` (used by callers to mark criteria
/// added on top of a base set).
pub fn normalize_key(raw: &str) -> String {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_prefix('+').unwrap_or(trimmed).trim_start();
    trimmed
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Look up a key definition by (unnormalised) description.
pub fn lookup(raw: &str) -> Option<&'static KeyDef> {
    let normalized = normalize_key(raw);
    let def = KEY_INDEX.get(normalized.as_str()).copied();
    if def.is_none() {
        tracing::debug!("no criteria key matches '{}'", raw);
    }
    def
}

impl CriteriaKey {
    /// Registry entry for this key.
    pub fn definition(self) -> &'static KeyDef {
        KEY_DEFS
            .iter()
            .find(|d| d.key == self)
            .expect("every CriteriaKey variant has a registry entry")
    }

    /// Canonical description string.
    pub fn description(self) -> &'static str {
        self.definition().description
    }
}
