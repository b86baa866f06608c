//! Translation of a classified [`DatePhrase`] into a SQL condition.
//!
//! All date arithmetic is emitted symbolically against the database clock
//! (`TRUNC(SYSDATE)`, `ADD_MONTHS`); the compiler never reads the host
//! clock, so compilation stays a pure function of its inputs.

use super::{classify, DateAnchor, DatePhrase, Direction, EventBound, RelComparator, TimeUnit};
use crate::builder::{BindValue, ClauseContext, Join, QueryState};
use crate::error::Result;
use crate::snapshot::SubjectSnapshot;
use chrono::NaiveDate;

/// Date-valued field a criterion can target. Carries the column expression,
/// the bind-name stem, and the matching snapshot field (where captured).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DateField {
    DateOfBirth,
    DateOfDeath,
    ScreeningDueDate,
    CalculatedSdd,
    SurveillanceDueDate,
}

impl DateField {
    fn column(self) -> &'static str {
        match self {
            Self::DateOfBirth => "c.date_of_birth",
            Self::DateOfDeath => "c.date_of_death",
            Self::ScreeningDueDate => "ss.screening_due_date",
            Self::CalculatedSdd => "ss.calculated_sdd",
            Self::SurveillanceDueDate => "ss.surveillance_due_date",
        }
    }

    fn stem(self) -> &'static str {
        match self {
            Self::DateOfBirth => "dob",
            Self::DateOfDeath => "dod",
            Self::ScreeningDueDate => "due_date",
            Self::CalculatedSdd => "calculated_sdd",
            Self::SurveillanceDueDate => "surveillance_date",
        }
    }

    /// Outer `None`: the snapshot does not record this field at all.
    /// Inner `Option`: the captured value (absent → null test).
    fn snapshot_value(self, snapshot: &SubjectSnapshot) -> Option<Option<NaiveDate>> {
        match self {
            Self::ScreeningDueDate => Some(snapshot.screening_due_date),
            Self::CalculatedSdd => Some(snapshot.calculated_sdd),
            Self::SurveillanceDueDate => Some(snapshot.surveillance_due_date),
            Self::DateOfBirth | Self::DateOfDeath => None,
        }
    }
}

/// Classify the criterion's value and append the matching condition for
/// `field` to the WHERE accumulator.
pub(crate) fn apply_date_criterion(
    state: &mut QueryState,
    ctx: &ClauseContext<'_>,
    field: DateField,
) -> Result<()> {
    let phrase = classify(&ctx.criterion.value)
        .ok_or_else(|| ctx.err("unrecognised date phrase"))?;

    let col = field.column();
    let op = ctx.criterion.comparator.as_sql();
    let stem = field.stem();

    match phrase {
        DatePhrase::AgeYears(n) | DatePhrase::NthBirthday(n) => {
            let p = state.bind(&format!("{}_years", stem), BindValue::Int(n as i64));
            state.push_where(format!(
                "{} {} ADD_MONTHS(c.date_of_birth, 12 * {})",
                col, op, p
            ));
        }
        DatePhrase::Literal(date) => {
            let p = state.bind(stem, BindValue::text(date.format("%Y-%m-%d").to_string()));
            state.push_where(format!("{} {} TO_DATE({}, 'YYYY-MM-DD')", col, op, p));
        }
        DatePhrase::Relative {
            comparator,
            amount,
            unit,
            direction,
        } => {
            let sign: i64 = match direction {
                Direction::Ago => -1,
                Direction::Later => 1,
            };
            let expr = match unit {
                TimeUnit::Day => {
                    let p = state.bind(
                        &format!("{}_days", stem),
                        BindValue::Int(sign * amount as i64),
                    );
                    format!("TRUNC(SYSDATE) + {}", p)
                }
                TimeUnit::Month | TimeUnit::Year => {
                    let months = match unit {
                        TimeUnit::Year => 12 * amount as i64,
                        _ => amount as i64,
                    };
                    let p = state.bind(
                        &format!("{}_months", stem),
                        BindValue::Int(sign * months),
                    );
                    format!("ADD_MONTHS(TRUNC(SYSDATE), {})", p)
                }
            };

            if comparator == RelComparator::Eq {
                state.push_where(format!("{} {} {}", col, op, expr));
            } else {
                // "more than 3 years ago" is a date before today - 36
                // months; the window must also never cross today.
                let rel_op = relative_operator(comparator, direction);
                let clamp = match direction {
                    Direction::Ago => "<=",
                    Direction::Later => ">=",
                };
                state.push_where(format!(
                    "({col} {rel_op} {expr} AND {col} {clamp} TRUNC(SYSDATE))",
                    col = col,
                    rel_op = rel_op,
                    expr = expr,
                    clamp = clamp
                ));
            }
        }
        DatePhrase::Today => state.push_where(format!("{} {} TRUNC(SYSDATE)", col, op)),
        DatePhrase::Yesterday => state.push_where(format!("{} {} TRUNC(SYSDATE) - 1", col, op)),
        DatePhrase::Tomorrow => state.push_where(format!("{} {} TRUNC(SYSDATE) + 1", col, op)),
        DatePhrase::LastBirthday => {
            state.push_where(format!(
                "{} {} ADD_MONTHS(c.date_of_birth, \
                 12 * FLOOR(MONTHS_BETWEEN(TRUNC(SYSDATE), c.date_of_birth) / 12))",
                col, op
            ));
        }
        DatePhrase::Null => state.push_where(format!("{} IS NULL", col)),
        DatePhrase::NotNull => state.push_where(format!("{} IS NOT NULL", col)),
        DatePhrase::BeforeToday => state.push_where(format!("{} < TRUNC(SYSDATE)", col)),
        DatePhrase::AfterToday => state.push_where(format!("{} > TRUNC(SYSDATE)", col)),
        DatePhrase::CalculatedDueDate => {
            state.push_where(format!("{} {} ss.calculated_sdd", col, op));
        }
        DatePhrase::YearsFrom { years, anchor } => {
            let anchor_expr = anchor_expression(state, ctx, &anchor)?;
            let p = state.bind(&format!("{}_years", stem), BindValue::Int(years as i64));
            state.push_where(format!(
                "{} {} ADD_MONTHS({}, 12 * {})",
                col, op, anchor_expr, p
            ));
        }
        DatePhrase::Unchanged => {
            let snapshot = ctx
                .snapshot
                .ok_or_else(|| ctx.err("'unchanged' requires a prior subject snapshot"))?;
            match field.snapshot_value(snapshot) {
                None => {
                    return Err(ctx.err("the snapshot does not record this field"));
                }
                Some(None) => state.push_where(format!("{} IS NULL", col)),
                Some(Some(date)) => {
                    let p = state.bind(stem, BindValue::text(date.format("%Y-%m-%d").to_string()));
                    state.push_where(format!("{} {} TO_DATE({}, 'YYYY-MM-DD')", col, op, p));
                }
            }
        }
    }

    Ok(())
}

fn relative_operator(comparator: RelComparator, direction: Direction) -> &'static str {
    // "more than N ago" means further into the past, so the column
    // comparison inverts for the ago direction.
    match direction {
        Direction::Ago => match comparator {
            RelComparator::Gt => "<",
            RelComparator::Ge => "<=",
            RelComparator::Lt => ">",
            RelComparator::Le => ">=",
            RelComparator::Eq => "=",
        },
        Direction::Later => match comparator {
            RelComparator::Gt => ">",
            RelComparator::Ge => ">=",
            RelComparator::Lt => "<",
            RelComparator::Le => "<=",
            RelComparator::Eq => "=",
        },
    }
}

fn anchor_expression(
    state: &mut QueryState,
    ctx: &ClauseContext<'_>,
    anchor: &DateAnchor,
) -> Result<String> {
    Ok(match anchor {
        DateAnchor::LatestEpisodeEnd => {
            state.ensure_join(Join::LatestEpisode);
            "ep.episode_end_date".to_string()
        }
        DateAnchor::Diagnosis => {
            state.ensure_join(Join::GeneticDiagnosis);
            "gcd.diagnosis_date".to_string()
        }
        DateAnchor::DiagnosticTest => {
            state.ensure_join(Join::CancerAudit);
            "ca.diagnostic_test_date".to_string()
        }
        DateAnchor::SymptomaticProcedure => {
            state.ensure_join(Join::CancerAudit);
            "ca.symptomatic_procedure_date".to_string()
        }
        DateAnchor::Event { bound, description } => {
            let code = cohort_refdata::event_status()
                .by_description_ci(description)
                .ok_or_else(|| ctx.err(format!("unknown event status '{}'", description)))?;
            let agg = match bound {
                EventBound::Earliest => "MIN",
                EventBound::Latest => "MAX",
            };
            let p = state.bind("event_status_id", BindValue::from(code));
            format!(
                "(SELECT {}(ev.event_datestamp) FROM subject_epis_event_t ev \
                 WHERE ev.screening_subject_id = ss.screening_subject_id \
                 AND ev.event_status_id = {})",
                agg, p
            )
        }
    })
}
