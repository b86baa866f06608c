//! Identity and demographic criteria.

use super::status::refdata_criterion;
use crate::builder::{BindValue, ClauseContext, QueryState};
use crate::date::translate::{apply_date_criterion, DateField};
use crate::error::Result;

/// `subject age`: a whole-years age (`65`), an inclusive range
/// (`between 60 and 71`), or any date phrase applied to the date of birth
/// (`2 years ago`, `not null`, ...).
pub(in crate::builder) fn age(state: &mut QueryState, ctx: &ClauseContext<'_>) -> Result<()> {
    let value = ctx.criterion.value.to_lowercase();

    if let Ok(n) = value.parse::<u32>() {
        let p = state.bind("age_years", BindValue::Int(n as i64));
        state.push_where(whole_year_window(&p, &p));
        return Ok(());
    }

    let tokens: Vec<&str> = value.split_whitespace().collect();
    if let ["between", from, "and", to] = tokens.as_slice() {
        let from: u32 = from
            .parse()
            .map_err(|_| ctx.err("age range bounds must be whole years"))?;
        let to: u32 = to
            .parse()
            .map_err(|_| ctx.err("age range bounds must be whole years"))?;
        if from > to {
            return Err(ctx.err("age range lower bound exceeds upper bound"));
        }
        let p_from = state.bind("age_from", BindValue::Int(from as i64));
        let p_to = state.bind("age_to", BindValue::Int(to as i64));
        state.push_where(whole_year_window(&p_from, &p_to));
        return Ok(());
    }

    apply_date_criterion(state, ctx, DateField::DateOfBirth)
}

/// Age in whole years between `from` and `to` inclusive, expressed as a
/// date-of-birth window. Exact on birthdays: a subject turns `from` the day
/// they enter the window and leaves it the day they turn `to + 1`.
fn whole_year_window(from: &str, to: &str) -> String {
    format!(
        "(c.date_of_birth <= ADD_MONTHS(TRUNC(SYSDATE), -12 * {from}) \
         AND c.date_of_birth > ADD_MONTHS(TRUNC(SYSDATE), -12 * ({to} + 1)))",
        from = from,
        to = to
    )
}

pub(in crate::builder) fn nhs_number(
    state: &mut QueryState,
    ctx: &ClauseContext<'_>,
) -> Result<()> {
    let p = state.bind("nhs_number", BindValue::text(ctx.criterion.value.clone()));
    state.push_where(format!(
        "ss.nhs_number {} {}",
        ctx.criterion.comparator.as_sql(),
        p
    ));
    Ok(())
}

pub(in crate::builder) fn gender(state: &mut QueryState, ctx: &ClauseContext<'_>) -> Result<()> {
    refdata_criterion(
        state,
        ctx,
        cohort_refdata::gender(),
        "c.gender_code_id",
        "gender_code_id",
        None,
    )
}
