//! Status and reason criteria resolved through reference data.
//!
//! Values are matched case-insensitively against the relevant enumeration.
//! The sentinels `null`, `not null` and `unchanged` are recognised before
//! any lookup and never carry codes of their own.

use crate::builder::{BindValue, ClauseContext, Join, QueryState};
use crate::criterion::Comparator;
use crate::error::Result;
use crate::snapshot::SubjectSnapshot;
use cohort_refdata::RefDataTable;

type SnapshotField = fn(&SubjectSnapshot) -> Option<i32>;

/// Shared policy for every refdata-backed criterion: sentinel handling,
/// case-insensitive description lookup, comparator application.
pub(in crate::builder) fn refdata_criterion(
    state: &mut QueryState,
    ctx: &ClauseContext<'_>,
    table: &'static RefDataTable,
    column: &'static str,
    stem: &'static str,
    snapshot_field: Option<SnapshotField>,
) -> Result<()> {
    let negated = ctx.criterion.comparator == Comparator::Ne;

    match ctx.criterion.value.to_lowercase().as_str() {
        "null" => {
            state.push_where(null_test(column, !negated));
            return Ok(());
        }
        "not null" => {
            state.push_where(null_test(column, negated));
            return Ok(());
        }
        "unchanged" => {
            let snapshot = ctx
                .snapshot
                .ok_or_else(|| ctx.err("'unchanged' requires a prior subject snapshot"))?;
            let field =
                snapshot_field.ok_or_else(|| ctx.err("the snapshot does not record this field"))?;
            return match field(snapshot) {
                None => {
                    state.push_where(null_test(column, !negated));
                    Ok(())
                }
                Some(code) => {
                    let p = state.bind(stem, BindValue::from(code));
                    state.push_where(format!(
                        "{} {} {}",
                        column,
                        ctx.criterion.comparator.as_sql(),
                        p
                    ));
                    Ok(())
                }
            };
        }
        _ => {}
    }

    let code = table
        .by_description_ci(&ctx.criterion.value)
        .ok_or_else(|| {
            ctx.err(format!(
                "'{}' is not a known {}",
                ctx.criterion.value,
                table.name()
            ))
        })?;
    let p = state.bind(stem, BindValue::from(code));
    state.push_where(format!(
        "{} {} {}",
        column,
        ctx.criterion.comparator.as_sql(),
        p
    ));
    Ok(())
}

fn null_test(column: &str, is_null: bool) -> String {
    if is_null {
        format!("{} IS NULL", column)
    } else {
        format!("{} IS NOT NULL", column)
    }
}

pub(in crate::builder) fn screening_status(
    state: &mut QueryState,
    ctx: &ClauseContext<'_>,
) -> Result<()> {
    refdata_criterion(
        state,
        ctx,
        cohort_refdata::screening_status(),
        "ss.screening_status_id",
        "status_id",
        Some(|s| s.screening_status_id),
    )
}

pub(in crate::builder) fn screening_status_reason(
    state: &mut QueryState,
    ctx: &ClauseContext<'_>,
) -> Result<()> {
    refdata_criterion(
        state,
        ctx,
        cohort_refdata::ss_reason(),
        "ss.ss_reason_id",
        "ss_reason_id",
        Some(|s| s.ss_reason_id),
    )
}

pub(in crate::builder) fn screening_due_date_reason(
    state: &mut QueryState,
    ctx: &ClauseContext<'_>,
) -> Result<()> {
    refdata_criterion(
        state,
        ctx,
        cohort_refdata::sdd_reason(),
        "ss.sdd_reason_id",
        "sdd_reason_id",
        Some(|s| s.sdd_reason_id),
    )
}

pub(in crate::builder) fn surveillance_due_date_reason(
    state: &mut QueryState,
    ctx: &ClauseContext<'_>,
) -> Result<()> {
    refdata_criterion(
        state,
        ctx,
        cohort_refdata::surveillance_reason(),
        "ss.surveillance_reason_id",
        "surveillance_reason_id",
        Some(|s| s.surveillance_reason_id),
    )
}

pub(in crate::builder) fn cease_reason(
    state: &mut QueryState,
    ctx: &ClauseContext<'_>,
) -> Result<()> {
    refdata_criterion(
        state,
        ctx,
        cohort_refdata::cease_reason(),
        "ss.cease_reason_id",
        "cease_reason_id",
        Some(|s| s.cease_reason_id),
    )
}

pub(in crate::builder) fn latest_episode_status(
    state: &mut QueryState,
    ctx: &ClauseContext<'_>,
) -> Result<()> {
    state.ensure_join(Join::LatestEpisode);
    refdata_criterion(
        state,
        ctx,
        cohort_refdata::episode_status(),
        "ep.episode_status_id",
        "episode_status_id",
        None,
    )
}
