#![forbid(unsafe_code)]

//! Compiles human-authored subject selection criteria into parameterized
//! Oracle SQL.
//!
//! The caller supplies a criteria set (ordered `(key, value)` pairs such as
//! `("subject age", "Between 60 and 71")` or
//! `("screening status", "NOT: Ceased")`), the acting user's context, an
//! optional prior snapshot of the subject, and a row limit. The compiler
//! validates every key against a closed registry, parses modifiers and date
//! phrases, and emits `(query text, bind variables)` for the execution
//! engine. Compilation is a pure in-memory fold: same inputs, same query.
//!
//! ```
//! use cohort_criteria::{ActorContext, QueryBuilder};
//!
//! let actor = ActorContext::new(1, 23159, 23162);
//! let criteria = vec![
//!     ("screening status".to_string(), "Ceased".to_string()),
//!     ("subject age".to_string(), "65".to_string()),
//! ];
//! let query = QueryBuilder::new(&criteria, &actor)
//!     .with_result_count(10)
//!     .build()?;
//! assert!(query.text.contains("ss.screening_status_id = :status_id"));
//! # Ok::<(), cohort_criteria::CriteriaError>(())
//! ```

mod actor;
mod builder;
mod criterion;
mod date;
mod error;
mod registry;
mod snapshot;

pub use actor::ActorContext;
pub use builder::{BindValue, CompiledQuery, QueryBuilder};
pub use criterion::{Comparator, Criterion};
pub use date::{
    classify, DateAnchor, DatePhrase, Direction, EventBound, RelComparator, TimeUnit,
};
pub use error::{CriteriaError, Result};
pub use registry::{lookup, normalize_key, CriteriaKey, KeyDef};
pub use snapshot::SubjectSnapshot;

use std::collections::BTreeMap;

/// One-call form of [`QueryBuilder`].
pub fn compile(
    criteria: &[(String, String)],
    actor: &ActorContext,
    snapshot: Option<&SubjectSnapshot>,
    result_count: Option<usize>,
) -> Result<CompiledQuery> {
    let mut builder = QueryBuilder::new(criteria, actor).with_snapshot(snapshot);
    if let Some(n) = result_count {
        builder = builder.with_result_count(n);
    }
    builder.build()
}

/// [`compile`] over a keyed criteria map. Entries are compiled in key
/// order, so the output is a pure function of the map's contents.
pub fn compile_map(
    criteria: &BTreeMap<String, String>,
    actor: &ActorContext,
    snapshot: Option<&SubjectSnapshot>,
    result_count: Option<usize>,
) -> Result<CompiledQuery> {
    let pairs: Vec<(String, String)> = criteria
        .iter()
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    compile(&pairs, actor, snapshot, result_count)
}
