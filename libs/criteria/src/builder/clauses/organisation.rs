//! Organisational scoping criteria.
//!
//! The value is either a recognised symbol (resolved from the acting
//! user's context) or a literal organisation code resolved to its internal
//! id through a correlated sub-select.

use crate::builder::{BindValue, ClauseContext, QueryState};
use crate::error::Result;

pub(in crate::builder) fn hub_code(state: &mut QueryState, ctx: &ClauseContext<'_>) -> Result<()> {
    org_criterion(state, ctx, "ss.hub_id", "hub_id", "user's hub", ctx.actor.hub_id)
}

pub(in crate::builder) fn screening_centre_code(
    state: &mut QueryState,
    ctx: &ClauseContext<'_>,
) -> Result<()> {
    org_criterion(
        state,
        ctx,
        "ss.sc_id",
        "sc_id",
        "user's screening centre",
        ctx.actor.screening_centre_id,
    )
}

fn org_criterion(
    state: &mut QueryState,
    ctx: &ClauseContext<'_>,
    column: &'static str,
    stem: &'static str,
    own_symbol: &'static str,
    actor_org_id: i64,
) -> Result<()> {
    let value = ctx.criterion.value.to_lowercase();
    match value.as_str() {
        "none" => {
            state.push_where(format!("{} IS NULL", column));
        }
        "not null" => {
            state.push_where(format!("{} IS NOT NULL", column));
        }
        s if s == own_symbol || s == "user's organisation" => {
            let p = state.bind(stem, BindValue::Int(actor_org_id));
            state.push_where(format!("{} = {}", column, p));
        }
        _ => {
            // Not a symbol: treat as a literal organisation code.
            let p = state.bind("org_code", BindValue::text(ctx.criterion.value.clone()));
            state.push_where(format!(
                "{} = (SELECT o.org_id FROM org_t o WHERE o.org_code = {})",
                column, p
            ));
        }
    }
    Ok(())
}
