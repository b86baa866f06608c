//! Query assembly.
//!
//! A [`QueryBuilder`] folds a criteria set into a [`CompiledQuery`]:
//! validate each key against the registry, parse the value, dispatch to the
//! matching clause builder, then concatenate the accumulated fragments in a
//! fixed order and append the row limit. Any failure aborts the whole
//! compilation; there is no partial-success path.

mod bind;
pub(crate) mod clauses;

pub use bind::BindValue;

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::actor::ActorContext;
use crate::criterion::Criterion;
use crate::error::{CriteriaError, Result};
use crate::registry::{self, CriteriaKey};
use crate::snapshot::SubjectSnapshot;

const SELECT: &str = "SELECT ss.screening_subject_id, ss.nhs_number";
const FROM: &str =
    "FROM screening_subject_t ss JOIN sd_contact_t c ON c.nhs_number = ss.nhs_number";

/// Optional joins a clause may require. Each is added to the query at most
/// once per compilation, however many criteria ask for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Join {
    LatestEpisode,
    GeneticDiagnosis,
    CancerAudit,
}

impl Join {
    fn sql(self) -> &'static str {
        match self {
            Self::LatestEpisode => {
                "LEFT JOIN ep_subject_episode_t ep ON ep.episode_id = \
                 (SELECT MAX(e2.episode_id) FROM ep_subject_episode_t e2 \
                 WHERE e2.screening_subject_id = ss.screening_subject_id)"
            }
            Self::GeneticDiagnosis => {
                "LEFT JOIN genetic_condition_diagnosis_t gcd \
                 ON gcd.screening_subject_id = ss.screening_subject_id"
            }
            Self::CancerAudit => {
                "LEFT JOIN cancer_audit_t ca \
                 ON ca.screening_subject_id = ss.screening_subject_id"
            }
        }
    }
}

/// Mutable accumulator for one compilation pass. Created at the start of
/// [`QueryBuilder::build`], consumed by `finish`, never reused.
#[derive(Debug)]
pub(crate) struct QueryState {
    joins: Vec<&'static str>,
    wheres: Vec<String>,
    binds: BTreeMap<String, BindValue>,
    stems: HashMap<String, usize>,
    join_set: HashSet<Join>,
}

impl QueryState {
    fn new() -> Self {
        Self {
            joins: Vec::new(),
            wheres: Vec::new(),
            binds: BTreeMap::new(),
            stems: HashMap::new(),
            join_set: HashSet::new(),
        }
    }

    /// Register a bind value and return its placeholder (`:stem`, or
    /// `:stem_2`, `:stem_3`... when the stem is already taken). Naming is
    /// deterministic for a given criteria order.
    pub(crate) fn bind(&mut self, stem: &str, value: BindValue) -> String {
        let n = self.stems.entry(stem.to_string()).or_insert(0);
        *n += 1;
        let name = if *n == 1 {
            stem.to_string()
        } else {
            format!("{}_{}", stem, n)
        };
        self.binds.insert(name.clone(), value);
        format!(":{}", name)
    }

    /// Add an optional join, once per compilation.
    pub(crate) fn ensure_join(&mut self, join: Join) {
        if self.join_set.insert(join) {
            self.joins.push(join.sql());
        }
    }

    pub(crate) fn push_where(&mut self, clause: String) {
        self.wheres.push(clause);
    }

    fn finish(self, result_count: usize) -> CompiledQuery {
        let mut text = String::from(SELECT);
        text.push(' ');
        text.push_str(FROM);
        for join in &self.joins {
            text.push(' ');
            text.push_str(join);
        }
        if !self.wheres.is_empty() {
            text.push_str(" WHERE ");
            text.push_str(&self.wheres.join(" AND "));
        }
        text.push_str(&format!(" FETCH FIRST {} ROWS ONLY", result_count));
        CompiledQuery {
            text,
            binds: self.binds,
        }
    }
}

/// Everything a clause builder may consult for one criterion.
pub(crate) struct ClauseContext<'a> {
    pub criterion: &'a Criterion,
    pub actor: &'a ActorContext,
    pub snapshot: Option<&'a SubjectSnapshot>,
}

impl ClauseContext<'_> {
    /// Build the one structured error type, carrying this criterion's key
    /// and original value.
    pub(crate) fn err(&self, reason: impl Into<String>) -> CriteriaError {
        CriteriaError::new(
            self.criterion.key.description(),
            &self.criterion.raw_value,
            reason,
        )
    }
}

/// Compiled query text plus its bind variables. The bind map contains
/// exactly the placeholders referenced in the text.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub text: String,
    pub binds: BTreeMap<String, BindValue>,
}

/// Compiles a subject selection criteria set into SQL.
#[derive(Debug)]
pub struct QueryBuilder<'a> {
    criteria: &'a [(String, String)],
    actor: &'a ActorContext,
    snapshot: Option<&'a SubjectSnapshot>,
    result_count: Option<usize>,
}

impl<'a> QueryBuilder<'a> {
    /// Criteria are ordered `(key, value)` pairs; a key may repeat only when
    /// the registry allows multiple values for it.
    pub fn new(criteria: &'a [(String, String)], actor: &'a ActorContext) -> Self {
        Self {
            criteria,
            actor,
            snapshot: None,
            result_count: None,
        }
    }

    /// Prior subject snapshot, required for `unchanged` criteria.
    pub fn with_snapshot(mut self, snapshot: Option<&'a SubjectSnapshot>) -> Self {
        self.snapshot = snapshot;
        self
    }

    /// Row limit of the compiled query. Defaults to 1.
    pub fn with_result_count(mut self, result_count: usize) -> Self {
        self.result_count = Some(result_count);
        self
    }

    pub fn build(&self) -> Result<CompiledQuery> {
        tracing::debug!("compiling {} selection criteria", self.criteria.len());

        let mut state = QueryState::new();
        let mut occurrences: HashMap<CriteriaKey, usize> = HashMap::new();

        for (raw_key, raw_value) in self.criteria {
            let def = registry::lookup(raw_key)
                .ok_or_else(|| CriteriaError::new(raw_key, raw_value, "unknown criteria key"))?;

            let seen = occurrences.entry(def.key).or_insert(0);
            *seen += 1;
            if *seen > 1 && !def.allows_multiple_values {
                return Err(CriteriaError::new(
                    def.description,
                    raw_value,
                    "multiple values supplied for a single-valued key",
                ));
            }

            let criterion = Criterion::parse(def.key, raw_value);
            if criterion.is_blank() {
                continue;
            }
            if criterion.has_not_modifier && !def.allows_not_modifier {
                return Err(CriteriaError::new(
                    def.description,
                    raw_value,
                    "the NOT: modifier is not allowed for this key",
                ));
            }

            let ctx = ClauseContext {
                criterion: &criterion,
                actor: self.actor,
                snapshot: self.snapshot,
            };
            clauses::build_clause(&mut state, &ctx)?;
        }

        Ok(state.finish(self.result_count.unwrap_or(1)))
    }
}
