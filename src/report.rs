use std::fmt::Write;

use crate::models::{Dashboard, DashboardView};

pub fn render_markdown(dashboard: &Dashboard) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "# {}", dashboard.title());
    let _ = writeln!(output);

    match dashboard {
        Dashboard::Empty { message, .. } => {
            let _ = writeln!(output, "{message}");
        }
        Dashboard::Populated(view) => write_view(&mut output, view),
    }

    output
}

fn write_view(output: &mut String, view: &DashboardView) {
    let _ = writeln!(output, "## High-Level KPIs");
    for tile in &view.tiles {
        let _ = writeln!(output, "- **{}**: {}", tile.label, tile.value);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Tickets by Category");
    for entry in &view.categories {
        let _ = writeln!(output, "- {}: {}", entry.label, entry.count);
    }

    if let Some(detail) = &view.selected {
        let _ = writeln!(output);
        let _ = writeln!(output, "## Details for Category: {}", detail.category);
        let _ = writeln!(output, "Total Tickets in Category: {}", detail.total);
        let _ = writeln!(output);
        let _ = writeln!(output, "Pending Tickets in Category: {}", detail.pending);
        let _ = writeln!(output);
        let _ = writeln!(output, "### Ticket Response Time Details");
        let _ = writeln!(
            output,
            "| 1. Código | 3. Fecha de registro | Fecha estimada resolución | Tiempo de respuesta del ticket |"
        );
        let _ = writeln!(output, "|---|---|---|---|");
        for row in &detail.rows {
            let _ = writeln!(
                output,
                "| {} | {} | {} | {} |",
                escape_cell(&row.code),
                row.registered_at,
                row.estimated_resolution_at,
                row.duration
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Trend: Tickets Over Time");
    if view.trend.is_empty() {
        let _ = writeln!(output, "No registration dates recorded.");
    } else {
        for point in &view.trend {
            let _ = writeln!(output, "- {}: {}", point.date, point.count);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Top 10 Sucursales by Number of Tickets");
    for entry in &view.top_branches {
        let _ = writeln!(output, "- {}: {}", entry.label, entry.count);
    }
}

fn escape_cell(value: &str) -> String {
    value.replace('|', "\\|")
}
