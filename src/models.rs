use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::Serialize;

pub const RESOLVED_STATUS: &str = "Resuelto";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketStatus {
    Resolved,
    Other,
}

impl TicketStatus {
    pub fn from_raw(raw: &str) -> Self {
        if raw == RESOLVED_STATUS {
            TicketStatus::Resolved
        } else {
            TicketStatus::Other
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, TicketStatus::Resolved)
    }
}

#[derive(Debug, Clone)]
pub struct TicketRecord {
    /// 1-based row number in the source sheet, header included.
    pub row: usize,
    pub code: String,
    pub branch: String,
    pub incident_type: String,
    pub category: String,
    pub registered_at: Option<NaiveDateTime>,
    pub estimated_resolution_at: Option<NaiveDateTime>,
    pub status: TicketStatus,
}

impl TicketRecord {
    /// Registration to estimated resolution; `None` unless both ends parsed.
    pub fn resolution_duration(&self) -> Option<Duration> {
        match (self.registered_at, self.estimated_resolution_at) {
            (Some(start), Some(end)) => Some(end - start),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyCount {
    pub label: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Kpis {
    pub total: usize,
    pub resolved: usize,
    pub pending: usize,
    pub average_duration: Option<Duration>,
    pub period_start: Option<NaiveDate>,
    pub period_end: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricTile {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailRow {
    pub code: String,
    pub registered_at: String,
    pub estimated_resolution_at: String,
    pub duration: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryDetail {
    pub category: String,
    pub total: usize,
    pub pending: usize,
    pub rows: Vec<DetailRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub title: String,
    pub tiles: Vec<MetricTile>,
    pub categories: Vec<FrequencyCount>,
    pub selected: Option<CategoryDetail>,
    pub trend: Vec<TrendPoint>,
    pub top_branches: Vec<FrequencyCount>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Dashboard {
    Empty { title: String, message: String },
    Populated(Box<DashboardView>),
}

impl Dashboard {
    pub fn title(&self) -> &str {
        match self {
            Dashboard::Empty { title, .. } => title,
            Dashboard::Populated(view) => &view.title,
        }
    }
}
