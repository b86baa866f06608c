//! Clause builders, one family per module.
//!
//! Dispatch is an exhaustive match over [`CriteriaKey`], so adding a key
//! without a handler fails to compile.

mod demographic;
mod events;
mod flags;
mod organisation;
mod status;

use super::{ClauseContext, QueryState};
use crate::date::translate::{apply_date_criterion, DateField};
use crate::error::Result;
use crate::registry::CriteriaKey;

pub(crate) fn build_clause(state: &mut QueryState, ctx: &ClauseContext<'_>) -> Result<()> {
    match ctx.criterion.key {
        CriteriaKey::SubjectAge => demographic::age(state, ctx),
        CriteriaKey::NhsNumber => demographic::nhs_number(state, ctx),
        CriteriaKey::Gender => demographic::gender(state, ctx),
        CriteriaKey::DateOfBirth => apply_date_criterion(state, ctx, DateField::DateOfBirth),
        CriteriaKey::DateOfDeath => apply_date_criterion(state, ctx, DateField::DateOfDeath),

        CriteriaKey::HubCode => organisation::hub_code(state, ctx),
        CriteriaKey::ScreeningCentreCode => organisation::screening_centre_code(state, ctx),

        CriteriaKey::ScreeningStatus => status::screening_status(state, ctx),
        CriteriaKey::ScreeningStatusReason => status::screening_status_reason(state, ctx),
        CriteriaKey::ScreeningDueDateReason => status::screening_due_date_reason(state, ctx),
        CriteriaKey::SurveillanceDueDateReason => {
            status::surveillance_due_date_reason(state, ctx)
        }
        CriteriaKey::CeaseReason => status::cease_reason(state, ctx),
        CriteriaKey::LatestEpisodeStatus => status::latest_episode_status(state, ctx),

        CriteriaKey::ScreeningDueDate => {
            apply_date_criterion(state, ctx, DateField::ScreeningDueDate)
        }
        CriteriaKey::CalculatedScreeningDueDate => {
            apply_date_criterion(state, ctx, DateField::CalculatedSdd)
        }
        CriteriaKey::SurveillanceDueDate => {
            apply_date_criterion(state, ctx, DateField::SurveillanceDueDate)
        }

        CriteriaKey::HasEpisodes => events::has_episodes(state, ctx),
        CriteriaKey::HasEventStatus => events::event_status(state, ctx, false),
        CriteriaKey::DoesNotHaveEventStatus => events::event_status(state, ctx, true),

        CriteriaKey::HasUnprocessedSspiUpdates => flags::unprocessed_sspi_updates(state, ctx),
        CriteriaKey::HasActiveSupportingNotes => flags::active_supporting_notes(state, ctx),
    }
}

/// Parse the value of a yes/no criterion.
pub(in crate::builder) fn parse_yes_no(ctx: &ClauseContext<'_>) -> Result<bool> {
    match ctx.criterion.value.to_lowercase().as_str() {
        "yes" => Ok(true),
        "no" => Ok(false),
        _ => Err(ctx.err("expected 'yes' or 'no'")),
    }
}
