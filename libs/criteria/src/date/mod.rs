//! Date phrase grammar.
//!
//! Criteria against date-valued fields are written as human phrases
//! ("2 years ago", "last birthday", "unchanged"). Recognition and
//! translation are separate steps: [`classify`] tokenises a value and
//! produces a [`DatePhrase`] variant, and [`translate`](translate) turns a
//! variant into a SQL date expression against the subject's columns. This
//! keeps the grammar testable in isolation from SQL emission.

pub(crate) mod translate;

use chrono::NaiveDate;

/// Time unit of a relative phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Day,
    Month,
    Year,
}

/// Direction of a relative phrase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ago,
    Later,
}

/// Comparator word prefixing a relative phrase.
///
/// `more than` and `less than` are aliases for `>` and `<`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelComparator {
    Eq,
    Gt,
    Lt,
    Ge,
    Le,
}

/// Which end of the matching event history a computed anchor takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventBound {
    Earliest,
    Latest,
}

/// Anchor date of a `<N> years from ...` phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateAnchor {
    /// End date of the subject's latest episode.
    LatestEpisodeEnd,
    /// Genetic condition diagnosis date.
    Diagnosis,
    /// Diagnostic test date from the cancer audit record.
    DiagnosticTest,
    /// Symptomatic procedure date from the cancer audit record.
    SymptomaticProcedure,
    /// Earliest or latest occurrence of a named event status.
    Event { bound: EventBound, description: String },
}

/// One recognised date phrase.
///
/// The variants correspond to the seven phrase classes of the grammar;
/// [`classify`] tries them in this fixed order and the first match wins, so
/// a bare integer is always an age and never a date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatePhrase {
    /// Bare integer: an age in whole years, anchored at date of birth.
    AgeYears(u32),
    /// `<N> birthday` (N may carry an ordinal suffix, e.g. `65th`).
    NthBirthday(u32),
    /// Absolute date, ISO (`YYYY-MM-DD`) or UK (`DD/MM/YYYY`).
    Literal(NaiveDate),
    /// `[cmp] <N> <unit> ago|later`.
    Relative {
        comparator: RelComparator,
        amount: u32,
        unit: TimeUnit,
        direction: Direction,
    },
    Today,
    Yesterday,
    Tomorrow,
    LastBirthday,
    Null,
    NotNull,
    BeforeToday,
    AfterToday,
    /// `calculated due date`: compares against the calculated due date
    /// column rather than a computed value.
    CalculatedDueDate,
    /// `<N> years from <anchor>`.
    YearsFrom { years: u32, anchor: DateAnchor },
    /// `unchanged`: compares against the prior snapshot.
    Unchanged,
}

/// Recognise a date phrase. Returns `None` when the value matches none of
/// the seven phrase classes; the caller turns that into a criteria error
/// carrying key and value.
pub fn classify(value: &str) -> Option<DatePhrase> {
    let normalized = value.trim().to_lowercase();
    let tokens: Vec<&str> = normalized.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    // 1. Bare integer: always an age, never a date.
    if tokens.len() == 1 {
        if let Ok(n) = tokens[0].parse::<u32>() {
            return Some(DatePhrase::AgeYears(n));
        }
    }

    // 2. Nth birthday ("last birthday" is a named anchor, class 5).
    if tokens.len() == 2 && tokens[1] == "birthday" && tokens[0] != "last" {
        if let Some(n) = parse_ordinal(tokens[0]) {
            return Some(DatePhrase::NthBirthday(n));
        }
    }

    // 3. Absolute date.
    if tokens.len() == 1 {
        if let Some(date) = parse_literal_date(tokens[0]) {
            return Some(DatePhrase::Literal(date));
        }
    }

    // 4. Relative offset.
    if let Some(phrase) = parse_relative(&tokens) {
        return Some(phrase);
    }

    // 5. Named anchors.
    match normalized.as_str() {
        "today" => return Some(DatePhrase::Today),
        "yesterday" => return Some(DatePhrase::Yesterday),
        "tomorrow" => return Some(DatePhrase::Tomorrow),
        "last birthday" => return Some(DatePhrase::LastBirthday),
        "null" => return Some(DatePhrase::Null),
        "not null" => return Some(DatePhrase::NotNull),
        "< today" => return Some(DatePhrase::BeforeToday),
        "> today" => return Some(DatePhrase::AfterToday),
        _ => {}
    }

    // 6. Computed anchors.
    if normalized == "calculated due date" {
        return Some(DatePhrase::CalculatedDueDate);
    }
    if let Some(phrase) = parse_years_from(&tokens) {
        return Some(phrase);
    }

    // 7. Snapshot comparison.
    if normalized == "unchanged" {
        return Some(DatePhrase::Unchanged);
    }

    None
}

fn parse_ordinal(token: &str) -> Option<u32> {
    if let Ok(n) = token.parse::<u32>() {
        return Some(n);
    }
    let digits = token
        .strip_suffix("st")
        .or_else(|| token.strip_suffix("nd"))
        .or_else(|| token.strip_suffix("rd"))
        .or_else(|| token.strip_suffix("th"))?;
    digits.parse().ok()
}

fn parse_literal_date(token: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(token, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(token, "%d/%m/%Y"))
        .ok()
}

fn parse_relative(tokens: &[&str]) -> Option<DatePhrase> {
    let (comparator, rest) = match tokens {
        [">", rest @ ..] => (RelComparator::Gt, rest),
        ["<", rest @ ..] => (RelComparator::Lt, rest),
        [">=", rest @ ..] => (RelComparator::Ge, rest),
        ["<=", rest @ ..] => (RelComparator::Le, rest),
        ["more", "than", rest @ ..] => (RelComparator::Gt, rest),
        ["less", "than", rest @ ..] => (RelComparator::Lt, rest),
        rest => (RelComparator::Eq, rest),
    };

    let [amount, unit, direction] = rest else {
        return None;
    };
    let amount: u32 = amount.parse().ok()?;
    let unit = match *unit {
        "day" | "days" => TimeUnit::Day,
        "month" | "months" => TimeUnit::Month,
        "year" | "years" => TimeUnit::Year,
        _ => return None,
    };
    let direction = match *direction {
        "ago" => Direction::Ago,
        "later" => Direction::Later,
        _ => return None,
    };
    Some(DatePhrase::Relative {
        comparator,
        amount,
        unit,
        direction,
    })
}

fn parse_years_from(tokens: &[&str]) -> Option<DatePhrase> {
    let [years, unit, "from", rest @ ..] = tokens else {
        return None;
    };
    if *unit != "year" && *unit != "years" {
        return None;
    }
    let years: u32 = years.parse().ok()?;

    let anchor = match rest {
        ["latest", "episode", "end"] => DateAnchor::LatestEpisodeEnd,
        ["diagnosis"] => DateAnchor::Diagnosis,
        ["diagnostic", "test"] => DateAnchor::DiagnosticTest,
        ["symptomatic", "procedure"] => DateAnchor::SymptomaticProcedure,
        [bound @ ("earliest" | "latest"), middle @ .., "event"] if !middle.is_empty() => {
            DateAnchor::Event {
                bound: if *bound == "earliest" {
                    EventBound::Earliest
                } else {
                    EventBound::Latest
                },
                description: middle.join(" "),
            }
        }
        _ => return None,
    };
    Some(DatePhrase::YearsFrom { years, anchor })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_integer_is_always_an_age() {
        assert_eq!(classify("65"), Some(DatePhrase::AgeYears(65)));
        assert_eq!(classify(" 0 "), Some(DatePhrase::AgeYears(0)));
    }

    #[test]
    fn nth_birthday_with_and_without_ordinal_suffix() {
        assert_eq!(classify("65 birthday"), Some(DatePhrase::NthBirthday(65)));
        assert_eq!(classify("71st birthday"), Some(DatePhrase::NthBirthday(71)));
        assert_eq!(classify("last birthday"), Some(DatePhrase::LastBirthday));
    }

    #[test]
    fn literal_dates_iso_and_uk() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(classify("2024-02-29"), Some(DatePhrase::Literal(expected)));
        assert_eq!(classify("29/02/2024"), Some(DatePhrase::Literal(expected)));
        assert_eq!(classify("31/02/2024"), None);
    }

    #[test]
    fn relative_phrases() {
        assert_eq!(
            classify("2 years ago"),
            Some(DatePhrase::Relative {
                comparator: RelComparator::Eq,
                amount: 2,
                unit: TimeUnit::Year,
                direction: Direction::Ago,
            })
        );
        assert_eq!(
            classify("10 days later"),
            Some(DatePhrase::Relative {
                comparator: RelComparator::Eq,
                amount: 10,
                unit: TimeUnit::Day,
                direction: Direction::Later,
            })
        );
        assert_eq!(
            classify("more than 6 months ago"),
            Some(DatePhrase::Relative {
                comparator: RelComparator::Gt,
                amount: 6,
                unit: TimeUnit::Month,
                direction: Direction::Ago,
            })
        );
        assert_eq!(
            classify(">= 1 year later"),
            Some(DatePhrase::Relative {
                comparator: RelComparator::Ge,
                amount: 1,
                unit: TimeUnit::Year,
                direction: Direction::Later,
            })
        );
    }

    #[test]
    fn comparator_alone_is_not_a_relative_phrase() {
        assert_eq!(classify("< today"), Some(DatePhrase::BeforeToday));
        assert_eq!(classify("> today"), Some(DatePhrase::AfterToday));
    }

    #[test]
    fn named_anchors() {
        assert_eq!(classify("Today"), Some(DatePhrase::Today));
        assert_eq!(classify("yesterday"), Some(DatePhrase::Yesterday));
        assert_eq!(classify("tomorrow"), Some(DatePhrase::Tomorrow));
        assert_eq!(classify("NULL"), Some(DatePhrase::Null));
        assert_eq!(classify("Not Null"), Some(DatePhrase::NotNull));
    }

    #[test]
    fn computed_anchors() {
        assert_eq!(classify("calculated due date"), Some(DatePhrase::CalculatedDueDate));
        assert_eq!(
            classify("2 years from latest episode end"),
            Some(DatePhrase::YearsFrom {
                years: 2,
                anchor: DateAnchor::LatestEpisodeEnd,
            })
        );
        assert_eq!(
            classify("5 years from diagnosis"),
            Some(DatePhrase::YearsFrom {
                years: 5,
                anchor: DateAnchor::Diagnosis,
            })
        );
        assert_eq!(
            classify("3 years from diagnostic test"),
            Some(DatePhrase::YearsFrom {
                years: 3,
                anchor: DateAnchor::DiagnosticTest,
            })
        );
        assert_eq!(
            classify("3 years from symptomatic procedure"),
            Some(DatePhrase::YearsFrom {
                years: 3,
                anchor: DateAnchor::SymptomaticProcedure,
            })
        );
    }

    #[test]
    fn event_anchor_keeps_the_event_description() {
        assert_eq!(
            classify("10 years from earliest colonoscopy performed event"),
            Some(DatePhrase::YearsFrom {
                years: 10,
                anchor: DateAnchor::Event {
                    bound: EventBound::Earliest,
                    description: "colonoscopy performed".to_string(),
                },
            })
        );
        assert_eq!(
            classify("1 year from latest abnormal result event"),
            Some(DatePhrase::YearsFrom {
                years: 1,
                anchor: DateAnchor::Event {
                    bound: EventBound::Latest,
                    description: "abnormal result".to_string(),
                },
            })
        );
    }

    #[test]
    fn latest_episode_end_is_not_mistaken_for_an_event_anchor() {
        assert_eq!(
            classify("2 years from latest episode end"),
            Some(DatePhrase::YearsFrom {
                years: 2,
                anchor: DateAnchor::LatestEpisodeEnd,
            })
        );
    }

    #[test]
    fn unchanged_is_recognised_last() {
        assert_eq!(classify("unchanged"), Some(DatePhrase::Unchanged));
        assert_eq!(classify("Unchanged"), Some(DatePhrase::Unchanged));
    }

    #[test]
    fn unrecognised_phrases_are_none() {
        assert_eq!(classify(""), None);
        assert_eq!(classify("soonish"), None);
        assert_eq!(classify("2 fortnights ago"), None);
        assert_eq!(classify("years from diagnosis"), None);
        assert_eq!(classify("3 years from earliest event"), None);
    }
}
