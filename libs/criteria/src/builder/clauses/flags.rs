//! Pending-update flag criteria over auxiliary tracking tables.
//!
//! These are yes/no criteria with a fixed predicate; no bind variables are
//! involved beyond the existence test itself.

use super::parse_yes_no;
use crate::builder::{ClauseContext, QueryState};
use crate::error::Result;

pub(in crate::builder) fn unprocessed_sspi_updates(
    state: &mut QueryState,
    ctx: &ClauseContext<'_>,
) -> Result<()> {
    let quantifier = if parse_yes_no(ctx)? { "EXISTS" } else { "NOT EXISTS" };
    state.push_where(format!(
        "{} (SELECT 1 FROM sspi_update_queue_t q \
         WHERE q.nhs_number = ss.nhs_number AND q.processed_flag = 'N')",
        quantifier
    ));
    Ok(())
}

pub(in crate::builder) fn active_supporting_notes(
    state: &mut QueryState,
    ctx: &ClauseContext<'_>,
) -> Result<()> {
    let quantifier = if parse_yes_no(ctx)? { "EXISTS" } else { "NOT EXISTS" };
    state.push_where(format!(
        "{} (SELECT 1 FROM supporting_note_t n \
         WHERE n.screening_subject_id = ss.screening_subject_id \
         AND n.active_flag = 'Y')",
        quantifier
    ));
    Ok(())
}
