//! Existence criteria over the subject's event history and episodes.

use super::parse_yes_no;
use crate::builder::{BindValue, ClauseContext, QueryState};
use crate::error::Result;

/// `has event status` / `does not have event status`: a correlated
/// existence test against the event history, parameterized by the internal
/// event code. Both keys may repeat; each occurrence appends its own test.
pub(in crate::builder) fn event_status(
    state: &mut QueryState,
    ctx: &ClauseContext<'_>,
    negated: bool,
) -> Result<()> {
    let code = cohort_refdata::event_status()
        .by_description_ci(&ctx.criterion.value)
        .ok_or_else(|| {
            ctx.err(format!(
                "'{}' is not a known event status",
                ctx.criterion.value
            ))
        })?;
    let p = state.bind("event_status_id", BindValue::from(code));
    let quantifier = if negated { "NOT EXISTS" } else { "EXISTS" };
    state.push_where(format!(
        "{} (SELECT 1 FROM subject_epis_event_t ev \
         WHERE ev.screening_subject_id = ss.screening_subject_id \
         AND ev.event_status_id = {})",
        quantifier, p
    ));
    Ok(())
}

/// `subject has episodes`: yes/no existence test, no parameters.
pub(in crate::builder) fn has_episodes(
    state: &mut QueryState,
    ctx: &ClauseContext<'_>,
) -> Result<()> {
    let quantifier = if parse_yes_no(ctx)? { "EXISTS" } else { "NOT EXISTS" };
    state.push_where(format!(
        "{} (SELECT 1 FROM ep_subject_episode_t e \
         WHERE e.screening_subject_id = ss.screening_subject_id)",
        quantifier
    ));
    Ok(())
}
