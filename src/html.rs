//! HTML dashboard page
//!
//! Renders the dashboard as one self-contained page with inline CSS and
//! inline SVG charts. In interactive mode the category selector submits
//! `?category=` back to the server, which re-renders the whole page.

use anyhow::Result;

use crate::charts;
use crate::models::{CategoryDetail, Dashboard, DashboardView, FrequencyCount, MetricTile};

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlOptions {
    /// Wire the category selector to reload the page on change.
    pub interactive: bool,
}

pub fn render_page(dashboard: &Dashboard, options: &HtmlOptions) -> Result<String> {
    let body = match dashboard {
        Dashboard::Empty { title, message } => format!(
            "<h1>{}</h1>\n<p class=\"empty\">{}</p>",
            escape_html(title),
            escape_html(message)
        ),
        Dashboard::Populated(view) => render_view(view, options)?,
    };

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="es">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{css}</style>
</head>
<body>
    <div class="container">
{body}
    </div>
</body>
</html>
"#,
        title = escape_html(dashboard.title()),
        css = inline_css(),
        body = body,
    ))
}

fn render_view(view: &DashboardView, options: &HtmlOptions) -> Result<String> {
    let category_chart = charts::category_bar_chart(&view.categories)?;
    let trend_chart = charts::trend_line_chart(&view.trend)?;
    let branch_chart = charts::branch_pie_chart(&view.top_branches)?;
    let selected = view.selected.as_ref().map(|detail| detail.category.as_str());

    Ok(format!(
        r#"<h1>{title}</h1>
<h2>High-Level KPIs</h2>
{tiles}
<h2>Tickets by Category</h2>
<figure class="chart">{category_chart}</figure>
{selector}
{detail}
<h2>Trend: Tickets Over Time</h2>
<figure class="chart">{trend_chart}</figure>
<h2>Top 10 Sucursales by Number of Tickets</h2>
<figure class="chart">{branch_chart}</figure>"#,
        title = escape_html(&view.title),
        tiles = render_tiles(&view.tiles),
        selector = render_selector(&view.categories, selected, options),
        detail = view.selected.as_ref().map(render_detail).unwrap_or_default(),
    ))
}

fn render_tiles(tiles: &[MetricTile]) -> String {
    let cells: String = tiles
        .iter()
        .map(|tile| {
            format!(
                "<div class=\"tile\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
                escape_html(&tile.label),
                escape_html(&tile.value)
            )
        })
        .collect();
    format!("<div class=\"tiles\">{cells}</div>")
}

fn render_selector(
    categories: &[FrequencyCount],
    selected: Option<&str>,
    options: &HtmlOptions,
) -> String {
    let choices: String = categories
        .iter()
        .map(|entry| {
            let marker = if Some(entry.label.as_str()) == selected {
                " selected"
            } else {
                ""
            };
            format!(
                "<option value=\"{value}\"{marker}>{value}</option>",
                value = escape_html(&entry.label)
            )
        })
        .collect();

    let (on_change, disabled) = if options.interactive {
        (" onchange=\"this.form.submit()\"", "")
    } else {
        ("", " disabled")
    };

    format!(
        r#"<form method="get" action="" class="selector">
<label for="category">Select a Category to View Details</label>
<select id="category" name="category"{on_change}{disabled}>{choices}</select>
</form>"#
    )
}

fn render_detail(detail: &CategoryDetail) -> String {
    let rows: String = detail
        .rows
        .iter()
        .map(|row| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                escape_html(&row.code),
                escape_html(&row.registered_at),
                escape_html(&row.estimated_resolution_at),
                escape_html(&row.duration)
            )
        })
        .collect();

    format!(
        r#"<section class="detail">
<h2>Details for Category: {category}</h2>
<p>Total Tickets in Category: {total}</p>
<p>Pending Tickets in Category: {pending}</p>
<h3>Ticket Response Time Details</h3>
<table>
<thead><tr><th>1. Código</th><th>3. Fecha de registro</th><th>Fecha estimada resolución</th><th>Tiempo de respuesta del ticket</th></tr></thead>
<tbody>
{rows}</tbody>
</table>
</section>"#,
        category = escape_html(&detail.category),
        total = detail.total,
        pending = detail.pending,
    )
}

pub fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn inline_css() -> &'static str {
    r#"
* { box-sizing: border-box; }
body {
    font-family: system-ui, -apple-system, 'Segoe UI', sans-serif;
    color: #111827;
    background: #f9fafb;
    margin: 0;
}
.container { max-width: 1100px; margin: 0 auto; padding: 2rem; }
h1 { font-size: 1.9rem; margin-bottom: 1rem; }
h2 { font-size: 1.3rem; margin-top: 2rem; }
.empty { color: #6b7280; }
.tiles { display: grid; grid-template-columns: repeat(5, 1fr); gap: 0.75rem; }
.tile { background: #fff; border: 1px solid #e5e7eb; border-radius: 6px; padding: 0.75rem; }
.tile .label { font-size: 0.8rem; color: #6b7280; }
.tile .value { font-size: 1.25rem; font-weight: 600; margin-top: 0.25rem; }
.chart { margin: 0; background: #fff; border: 1px solid #e5e7eb; border-radius: 6px; overflow-x: auto; }
.selector { margin-top: 1.5rem; }
.selector select { margin-left: 0.5rem; padding: 0.25rem; }
table { border-collapse: collapse; width: 100%; background: #fff; font-size: 0.9rem; }
th, td { border: 1px solid #e5e7eb; padding: 0.4rem 0.6rem; text-align: left; }
th { background: #f3f4f6; }
"#
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DetailRow, TrendPoint};
    use chrono::NaiveDate;

    fn populated() -> Dashboard {
        Dashboard::Populated(Box::new(DashboardView {
            title: "Dynamic KPI Dashboard for 'Acceso a SAP'".to_string(),
            tiles: vec![MetricTile {
                label: "Avg Response Time".to_string(),
                value: "2 days 6 hours".to_string(),
            }],
            categories: vec![
                FrequencyCount {
                    label: "Rol".to_string(),
                    count: 2,
                },
                FrequencyCount {
                    label: "Clave <temporal>".to_string(),
                    count: 1,
                },
            ],
            selected: Some(CategoryDetail {
                category: "Clave <temporal>".to_string(),
                total: 1,
                pending: 1,
                rows: vec![DetailRow {
                    code: "T-9".to_string(),
                    registered_at: "2025-01-01 00:00:00".to_string(),
                    estimated_resolution_at: "N/A".to_string(),
                    duration: "N/A".to_string(),
                }],
            }),
            trend: vec![TrendPoint {
                date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
                count: 3,
            }],
            top_branches: vec![FrequencyCount {
                label: "Lima".to_string(),
                count: 3,
            }],
        }))
    }

    #[test]
    fn empty_state_replaces_all_sections() {
        let dashboard = Dashboard::Empty {
            title: "Dynamic KPI Dashboard for 'Acceso a SAP'".to_string(),
            message: "No data available for 'Acceso a SAP'.".to_string(),
        };
        let page = render_page(&dashboard, &HtmlOptions::default()).unwrap();
        assert!(page.contains("No data available for &#39;Acceso a SAP&#39;."));
        assert!(!page.contains("<svg"));
        assert!(!page.contains("<select"));
        assert!(!page.contains("<table"));
    }

    #[test]
    fn populated_page_has_tiles_charts_and_detail() {
        let page = render_page(&populated(), &HtmlOptions { interactive: true }).unwrap();
        assert_eq!(page.matches("<svg").count(), 3);
        assert!(page.contains("2 days 6 hours"));
        assert!(page.contains(
            "<option value=\"Clave &lt;temporal&gt;\" selected>Clave &lt;temporal&gt;</option>"
        ));
        assert!(page.contains("onchange=\"this.form.submit()\""));
        assert!(page.contains("Pending Tickets in Category: 1"));
        assert!(page.contains("<td>T-9</td>"));
    }

    #[test]
    fn static_snapshot_disables_selector() {
        let page = render_page(&populated(), &HtmlOptions::default()).unwrap();
        assert!(page.contains(" disabled>"));
        assert!(!page.contains("onchange"));
    }
}
