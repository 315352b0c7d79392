use tracing::debug;

use crate::config::DashboardSettings;
use crate::metrics;
use crate::models::{Dashboard, DashboardView, MetricTile, TicketRecord};

/// Builds the whole render model from the loaded table and the category the
/// user asked for. Nothing is cached; every call re-derives from `tickets`.
pub fn build_dashboard(
    tickets: &[TicketRecord],
    settings: &DashboardSettings,
    requested: Option<&str>,
) -> Dashboard {
    let filtered = metrics::filter_incident_type(tickets, &settings.incident_type);
    debug!(
        loaded = tickets.len(),
        matched = filtered.len(),
        incident_type = %settings.incident_type,
        "filtered tickets"
    );

    if filtered.is_empty() {
        return Dashboard::Empty {
            title: settings.title(),
            message: settings.empty_message(),
        };
    }

    for ticket in filtered.iter().filter(|t| t.registered_at.is_none()) {
        debug!(row = ticket.row, code = %ticket.code, "ticket has no registration date");
    }

    let kpis = metrics::compute_kpis(&filtered);
    let tiles = vec![
        tile("Total Tickets", kpis.total.to_string()),
        tile("Resolved Tickets", kpis.resolved.to_string()),
        tile("Pending Tickets", kpis.pending.to_string()),
        tile(
            "Avg Response Time",
            metrics::format_average(kpis.average_duration),
        ),
        tile(
            "Period",
            metrics::format_period(kpis.period_start, kpis.period_end),
        ),
    ];

    let categories = metrics::summarize_by_category(&filtered);
    let selected = metrics::resolve_selection(&categories, requested)
        .map(|category| metrics::category_detail(&filtered, category));

    Dashboard::Populated(Box::new(DashboardView {
        title: settings.title(),
        tiles,
        selected,
        trend: metrics::trend_by_date(&filtered),
        top_branches: metrics::summarize_by_branch(&filtered, settings.top_branches),
        categories,
    }))
}

fn tile(label: &str, value: String) -> MetricTile {
    MetricTile {
        label: label.to_string(),
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TicketStatus;
    use chrono::NaiveDate;

    fn ticket(code: &str, incident_type: &str, category: &str, status: &str) -> TicketRecord {
        TicketRecord {
            row: 0,
            code: code.to_string(),
            branch: "Lima".to_string(),
            incident_type: incident_type.to_string(),
            category: category.to_string(),
            registered_at: NaiveDate::from_ymd_opt(2025, 1, 1).and_then(|d| d.and_hms_opt(0, 0, 0)),
            estimated_resolution_at: NaiveDate::from_ymd_opt(2025, 1, 3)
                .and_then(|d| d.and_hms_opt(6, 0, 0)),
            status: TicketStatus::from_raw(status),
        }
    }

    #[test]
    fn empty_filter_yields_empty_state() {
        let tickets = vec![ticket("1", "Impresoras", "Toner", "Resuelto")];
        let dashboard = build_dashboard(&tickets, &DashboardSettings::default(), None);
        match dashboard {
            Dashboard::Empty { title, message } => {
                assert_eq!(title, "Dynamic KPI Dashboard for 'Acceso a SAP'");
                assert_eq!(message, "No data available for 'Acceso a SAP'.");
            }
            Dashboard::Populated(_) => panic!("expected empty state"),
        }
    }

    #[test]
    fn populated_dashboard_has_five_tiles_and_default_selection() {
        let tickets = vec![
            ticket("1", "Acceso a SAP", "Clave", "Resuelto"),
            ticket("2", "Acceso a SAP", "Rol", "Resuelto"),
            ticket("3", "Acceso a SAP", "Rol", "Abierto"),
            ticket("4", "Impresoras", "Rol", "Abierto"),
        ];
        let dashboard = build_dashboard(&tickets, &DashboardSettings::default(), None);
        let Dashboard::Populated(view) = dashboard else {
            panic!("expected populated dashboard");
        };

        let values: Vec<(&str, &str)> = view
            .tiles
            .iter()
            .map(|t| (t.label.as_str(), t.value.as_str()))
            .collect();
        assert_eq!(
            values,
            vec![
                ("Total Tickets", "3"),
                ("Resolved Tickets", "2"),
                ("Pending Tickets", "1"),
                ("Avg Response Time", "2 days 6 hours"),
                ("Period", "2025-01-01 to 2025-01-01"),
            ]
        );

        let selected = view.selected.expect("default selection");
        assert_eq!(selected.category, "Rol");
        assert_eq!(selected.total, 2);
        assert_eq!(selected.pending, 1);
        assert_eq!(view.trend.len(), 1);
        assert_eq!(view.trend[0].count, 3);
        assert_eq!(view.top_branches[0].count, 3);
    }

    #[test]
    fn requested_category_drives_the_detail() {
        let tickets = vec![
            ticket("1", "Acceso a SAP", "Clave", "Abierto"),
            ticket("2", "Acceso a SAP", "Rol", "Resuelto"),
            ticket("3", "Acceso a SAP", "Rol", "Resuelto"),
        ];
        let dashboard = build_dashboard(&tickets, &DashboardSettings::default(), Some("Clave"));
        let Dashboard::Populated(view) = dashboard else {
            panic!("expected populated dashboard");
        };
        let selected = view.selected.expect("selection");
        assert_eq!(selected.category, "Clave");
        assert_eq!(selected.pending, 1);
        assert_eq!(selected.rows.len(), 1);
        assert_eq!(selected.rows[0].code, "1");
    }
}
