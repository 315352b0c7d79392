use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::models::{CategoryDetail, DetailRow, FrequencyCount, Kpis, TicketRecord, TrendPoint};

pub const NOT_AVAILABLE: &str = "N/A";
pub const BLANK_LABEL: &str = "(blank)";

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;

pub fn filter_incident_type(tickets: &[TicketRecord], incident_type: &str) -> Vec<TicketRecord> {
    tickets
        .iter()
        .filter(|ticket| ticket.incident_type == incident_type)
        .cloned()
        .collect()
}

pub fn compute_kpis(tickets: &[TicketRecord]) -> Kpis {
    let total = tickets.len();
    let resolved = tickets
        .iter()
        .filter(|ticket| ticket.status.is_resolved())
        .count();

    let registered = tickets.iter().filter_map(|ticket| ticket.registered_at);
    let period_start = registered.clone().min().map(|at| at.date());
    let period_end = registered.max().map(|at| at.date());

    Kpis {
        total,
        resolved,
        pending: total - resolved,
        average_duration: average_duration(tickets),
        period_start,
        period_end,
    }
}

/// Mean over the tickets that have a duration; the rest count toward
/// neither the sum nor the divisor. Rounds toward negative infinity.
pub fn average_duration(tickets: &[TicketRecord]) -> Option<Duration> {
    let (sum, count) = tickets
        .iter()
        .filter_map(TicketRecord::resolution_duration)
        .fold((0i64, 0i64), |(sum, count), duration| {
            (sum + duration.num_seconds(), count + 1)
        });

    if count == 0 {
        None
    } else {
        Some(Duration::seconds(sum.div_euclid(count)))
    }
}

/// Whole days, then whole hours of what is left.
pub fn split_days_hours(duration: Duration) -> (i64, i64) {
    let secs = duration.num_seconds();
    let days = secs.div_euclid(SECONDS_PER_DAY);
    let hours = secs.rem_euclid(SECONDS_PER_DAY) / SECONDS_PER_HOUR;
    (days, hours)
}

pub fn format_average(duration: Option<Duration>) -> String {
    match duration {
        Some(duration) => {
            let (days, hours) = split_days_hours(duration);
            format!("{days} days {hours} hours")
        }
        None => format!("{NOT_AVAILABLE} days {NOT_AVAILABLE} hours"),
    }
}

pub fn format_period(start: Option<NaiveDate>, end: Option<NaiveDate>) -> String {
    let show = |date: Option<NaiveDate>| {
        date.map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };
    format!("{} to {}", show(start), show(end))
}

pub fn format_duration(duration: Option<Duration>) -> String {
    let Some(duration) = duration else {
        return NOT_AVAILABLE.to_string();
    };
    let secs = duration.num_seconds();
    let days = secs.div_euclid(SECONDS_PER_DAY);
    let rest = secs.rem_euclid(SECONDS_PER_DAY);
    format!(
        "{days} days {:02}:{:02}:{:02}",
        rest / SECONDS_PER_HOUR,
        (rest % SECONDS_PER_HOUR) / 60,
        rest % 60
    )
}

pub fn format_timestamp(value: Option<NaiveDateTime>) -> String {
    value
        .map(|at| at.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Counts labels by descending frequency; equal counts keep the order in
/// which the label first appeared.
pub fn count_frequencies<'a, I>(labels: I) -> Vec<FrequencyCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<FrequencyCount> = Vec::new();

    for label in labels {
        let label = if label.is_empty() { BLANK_LABEL } else { label };
        match positions.get(label) {
            Some(&idx) => counts[idx].count += 1,
            None => {
                positions.insert(label, counts.len());
                counts.push(FrequencyCount {
                    label: label.to_string(),
                    count: 1,
                });
            }
        }
    }

    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

pub fn summarize_by_category(tickets: &[TicketRecord]) -> Vec<FrequencyCount> {
    count_frequencies(tickets.iter().map(|ticket| ticket.category.as_str()))
}

/// Top `limit` branches; the tail is dropped rather than folded into an
/// "other" bucket. Tickets without a branch are not counted.
pub fn summarize_by_branch(tickets: &[TicketRecord], limit: usize) -> Vec<FrequencyCount> {
    let mut counts = count_frequencies(
        tickets
            .iter()
            .map(|ticket| ticket.branch.as_str())
            .filter(|branch| !branch.is_empty()),
    );
    counts.truncate(limit);
    counts
}

/// Tickets per registration date. Rows without a registration date are left
/// out of the series.
pub fn trend_by_date(tickets: &[TicketRecord]) -> Vec<TrendPoint> {
    let mut by_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for at in tickets.iter().filter_map(|ticket| ticket.registered_at) {
        *by_date.entry(at.date()).or_insert(0) += 1;
    }

    by_date
        .into_iter()
        .map(|(date, count)| TrendPoint { date, count })
        .collect()
}

pub fn resolve_selection<'a>(
    categories: &'a [FrequencyCount],
    requested: Option<&str>,
) -> Option<&'a str> {
    if let Some(requested) = requested {
        if let Some(found) = categories.iter().find(|entry| entry.label == requested) {
            return Some(found.label.as_str());
        }
        tracing::warn!(category = requested, "unknown category requested, using default");
    }
    categories.first().map(|entry| entry.label.as_str())
}

pub fn category_detail(tickets: &[TicketRecord], category: &str) -> CategoryDetail {
    let matches_category = |ticket: &&TicketRecord| {
        let label = if ticket.category.is_empty() {
            BLANK_LABEL
        } else {
            ticket.category.as_str()
        };
        label == category
    };

    let rows: Vec<&TicketRecord> = tickets.iter().filter(matches_category).collect();
    let pending = rows
        .iter()
        .filter(|ticket| !ticket.status.is_resolved())
        .count();

    CategoryDetail {
        category: category.to_string(),
        total: rows.len(),
        pending,
        rows: rows
            .into_iter()
            .map(|ticket| DetailRow {
                code: ticket.code.clone(),
                registered_at: format_timestamp(ticket.registered_at),
                estimated_resolution_at: format_timestamp(ticket.estimated_resolution_at),
                duration: format_duration(ticket.resolution_duration()),
            })
            .collect(),
    }
}
