//! Chart-ready aggregations over journal entries.
//!
//! All functions are pure: they never fail and return empty or zero-filled
//! output for empty input.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::{JournalEntry, MoodScore, User, UserId};

/// Entries sharing one Monday-based week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekBucket {
    /// Monday on or before every entry date, formatted `YYYY-MM-DD`.
    pub week_start: String,
    /// Human label such as `Week of June 10, 2024`.
    pub label: String,
    /// Entries in arrival order.
    pub entries: Vec<JournalEntry>,
}

/// Monday on or before `date`.
#[must_use]
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = i64::from(date.weekday().num_days_from_monday());
    date - Duration::days(offset)
}

/// Group entries into Monday-keyed weeks, newest week first.
///
/// # Examples
/// ```
/// use gratitude::domain::group_by_week;
///
/// assert!(group_by_week(Vec::new()).is_empty());
/// ```
#[must_use]
pub fn group_by_week(entries: impl IntoIterator<Item = JournalEntry>) -> Vec<WeekBucket> {
    let mut buckets: BTreeMap<String, (NaiveDate, Vec<JournalEntry>)> = BTreeMap::new();
    for entry in entries {
        let monday = week_start(entry.date().date_naive());
        buckets
            .entry(monday.format("%Y-%m-%d").to_string())
            .or_insert_with(|| (monday, Vec::new()))
            .1
            .push(entry);
    }

    buckets
        .into_iter()
        .rev()
        .map(|(week_start, (monday, entries))| WeekBucket {
            week_start,
            label: format!("Week of {}", monday.format("%B %-d, %Y")),
            entries,
        })
        .collect()
}

/// Entries of the calendar week containing today.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeek {
    /// Sunday opening the week.
    pub week_start: NaiveDate,
    /// Whether an entry is already dated today.
    pub has_posted_today: bool,
    /// Entries from Sunday through Saturday, in input order.
    pub entries: Vec<JournalEntry>,
}

/// True when any entry is dated `day` (UTC).
#[must_use]
pub fn posted_on<'a>(
    entries: impl IntoIterator<Item = &'a JournalEntry>,
    day: NaiveDate,
) -> bool {
    entries
        .into_iter()
        .any(|entry| entry.date().date_naive() == day)
}

/// Select the entries of the Sunday-to-Saturday week containing `today`.
///
/// The home view counts weeks from Sunday while [`group_by_week`] keys the
/// archive by Monday.
#[must_use]
pub fn current_week(
    entries: impl IntoIterator<Item = JournalEntry>,
    today: NaiveDate,
) -> CurrentWeek {
    let sunday = today - Duration::days(i64::from(today.weekday().num_days_from_sunday()));
    let saturday = sunday + Duration::days(6);
    let entries: Vec<JournalEntry> = entries
        .into_iter()
        .filter(|entry| (sunday..=saturday).contains(&entry.date().date_naive()))
        .collect();
    CurrentWeek {
        week_start: sunday,
        has_posted_today: posted_on(&entries, today),
        entries,
    }
}

/// Count for one mood level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodCount {
    /// Mood label, e.g. `Awesome`.
    pub name: &'static str,
    /// Number of entries with that mood.
    pub count: usize,
}

fn in_year(entry: &JournalEntry, year: i32) -> bool {
    entry.date().year() == year
}

/// Tally moods of entries dated in `year`.
///
/// Always returns five rows, highest mood first.
#[must_use]
pub fn yearly_mood_counts<'a>(
    entries: impl IntoIterator<Item = &'a JournalEntry>,
    year: i32,
) -> Vec<MoodCount> {
    let mut tally = [0_usize; MoodScore::ALL.len()];
    for entry in entries.into_iter().filter(|entry| in_year(entry, year)) {
        let index = usize::from(entry.mood_score().value()) - 1;
        tally[index] += 1;
    }

    MoodScore::ALL
        .iter()
        .rev()
        .map(|mood| MoodCount {
            name: mood.label(),
            count: tally[usize::from(mood.value()) - 1],
        })
        .collect()
}

/// Per-user counts for one mood level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserMoodRow {
    /// Mood label.
    pub name: &'static str,
    /// Count keyed by legend label.
    pub counts: BTreeMap<String, usize>,
}

/// Yearly mood counts split by user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserMoodBreakdown {
    /// Five rows, highest mood first.
    pub rows: Vec<UserMoodRow>,
    /// Legend labels of contributing users in user-list order.
    pub users: Vec<String>,
}

/// One legend label per user.
///
/// Names repeated ignoring case, as found in documents written before names
/// were unique, get a ` (2)`, ` (3)` suffix in user-list order.
fn legend_labels(users: &[User]) -> Vec<(&UserId, String)> {
    let mut seen: BTreeMap<String, usize> = BTreeMap::new();
    users
        .iter()
        .map(|user| {
            let name = user.display_name().as_ref();
            let occurrence = seen.entry(name.to_lowercase()).or_default();
            *occurrence += 1;
            let label = if *occurrence == 1 {
                name.to_owned()
            } else {
                format!("{name} ({occurrence})")
            };
            (user.id(), label)
        })
        .collect()
}

/// Split the yearly mood tally by user.
///
/// Entries whose owner is not in `users` are ignored. Legend order follows
/// `users`.
#[must_use]
pub fn yearly_mood_breakdown<'a>(
    entries: impl IntoIterator<Item = &'a JournalEntry>,
    users: &[User],
    year: i32,
) -> UserMoodBreakdown {
    let labels = legend_labels(users);
    let label_of: BTreeMap<&UserId, &str> = labels
        .iter()
        .map(|(id, label)| (*id, label.as_str()))
        .collect();

    let mut rows: Vec<UserMoodRow> = MoodScore::ALL
        .iter()
        .rev()
        .map(|mood| UserMoodRow {
            name: mood.label(),
            counts: BTreeMap::new(),
        })
        .collect();

    let mut contributors: Vec<&UserId> = Vec::new();
    for entry in entries.into_iter().filter(|entry| in_year(entry, year)) {
        let Some((owner, label)) = label_of.get_key_value(entry.user_id()) else {
            continue;
        };
        let row_index = MoodScore::ALL.len() - usize::from(entry.mood_score().value());
        *rows[row_index].counts.entry((*label).to_owned()).or_default() += 1;
        if !contributors.contains(owner) {
            contributors.push(*owner);
        }
    }

    let legend = labels
        .into_iter()
        .filter(|(id, _)| contributors.contains(id))
        .map(|(_, label)| label)
        .collect();

    UserMoodBreakdown { rows, users: legend }
}
