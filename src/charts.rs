//! SVG charts for the dashboard page.
//!
//! Each function renders into an in-memory string through plotters' SVG
//! backend so the result can be inlined straight into HTML.

use std::f64::consts::PI;

use anyhow::Result;
use chrono::Duration;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::models::{FrequencyCount, TrendPoint};

const CHART_WIDTH: u32 = 860;
const CHART_HEIGHT: u32 = 420;
const BAR_ROW_HEIGHT: u32 = 34;

/// Horizontal bars, first category on top, counts printed past the bar end.
pub fn category_bar_chart(categories: &[FrequencyCount]) -> Result<String> {
    let rows = categories.len();
    let height = (rows as u32 * BAR_ROW_HEIGHT + 110).max(220);
    let max = categories.iter().map(|e| e.count).max().unwrap_or(0).max(1) as f64;
    let y_top = (rows as f64 - 0.5).max(0.5);
    let label_at = |y: f64| -> String {
        if (y - y.round()).abs() > 1e-6 || y < -0.1 {
            return String::new();
        }
        let slot = y.round() as usize;
        slot.checked_add(1)
            .and_then(|next| rows.checked_sub(next))
            .and_then(|idx| categories.get(idx))
            .map(|entry| entry.label.clone())
            .unwrap_or_default()
    };

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, (CHART_WIDTH, height)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Tickets by Category", ("sans-serif", 20))
            .margin(12)
            .x_label_area_size(36)
            .y_label_area_size(220)
            .build_cartesian_2d(0f64..max * 1.15, -0.5f64..y_top)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(rows.max(1))
            .y_label_formatter(&|y| label_at(*y))
            .x_label_formatter(&|x| count_label(*x))
            .x_desc("Count")
            .draw()?;

        let slot = |idx: usize| (rows - 1 - idx) as f64;
        chart.draw_series(categories.iter().enumerate().map(|(idx, entry)| {
            let y = slot(idx);
            Rectangle::new(
                [(0.0, y - 0.35), (entry.count as f64, y + 0.35)],
                BLUE.mix(0.8).filled(),
            )
        }))?;

        let value_style = TextStyle::from(("sans-serif", 14).into_font())
            .pos(Pos::new(HPos::Left, VPos::Center));
        chart.draw_series(categories.iter().enumerate().map(|(idx, entry)| {
            Text::new(
                entry.count.to_string(),
                (entry.count as f64 + max * 0.01, slot(idx)),
                value_style.clone(),
            )
        }))?;

        root.present()?;
    }
    Ok(svg)
}

/// Count axis ticks as whole numbers; fractional ticks stay unlabelled.
fn count_label(x: f64) -> String {
    if (x - x.round()).abs() > 1e-6 {
        return String::new();
    }
    format!("{}", x.round() as i64)
}

pub fn trend_line_chart(trend: &[TrendPoint]) -> Result<String> {
    let start = trend.first().map(|point| point.date);
    let span = match (start, trend.last()) {
        (Some(first), Some(last)) => (last.date - first).num_days().max(1) as i32,
        _ => 1,
    };
    let max = trend.iter().map(|p| p.count).max().unwrap_or(0).max(1) as u32;
    let date_at = |offset: i32| -> String {
        start
            .map(|first| {
                (first + Duration::days(i64::from(offset)))
                    .format("%Y-%m-%d")
                    .to_string()
            })
            .unwrap_or_default()
    };

    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;

        let mut chart = ChartBuilder::on(&root)
            .caption("Tickets Over Time", ("sans-serif", 20))
            .margin(12)
            .x_label_area_size(40)
            .y_label_area_size(50)
            .build_cartesian_2d(0i32..span, 0u32..max + 1)?;

        chart
            .configure_mesh()
            .x_labels(6)
            .x_label_formatter(&|x| date_at(*x))
            .x_desc("Fecha")
            .y_desc("Count")
            .draw()?;

        if let Some(first) = start {
            let points: Vec<(i32, u32)> = trend
                .iter()
                .map(|p| ((p.date - first).num_days() as i32, p.count as u32))
                .collect();
            chart.draw_series(LineSeries::new(points.iter().copied(), &BLUE))?;
            chart.draw_series(
                points
                    .iter()
                    .map(|&point| Circle::new(point, 3, BLUE.filled())),
            )?;
        }

        root.present()?;
    }
    Ok(svg)
}

/// Pie with one wedge per branch and a legend to the right.
pub fn branch_pie_chart(branches: &[FrequencyCount]) -> Result<String> {
    let total: usize = branches.iter().map(|e| e.count).sum();

    let mut svg = String::new();
    {
        let root =
            SVGBackend::with_string(&mut svg, (CHART_WIDTH, CHART_HEIGHT)).into_drawing_area();
        root.fill(&WHITE)?;
        let area = root.titled("Top 10 Sucursales by Number of Tickets", ("sans-serif", 20))?;

        let (width, height) = area.dim_in_pixel();
        let radius = (f64::from(height.min(width / 2)) / 2.0 - 16.0).max(10.0);
        let center = (radius as i32 + 24, height as i32 / 2);
        let legend_x = center.0 + radius as i32 + 40;

        let mut angle = -PI / 2.0;
        for (idx, entry) in branches.iter().enumerate() {
            if total == 0 {
                break;
            }
            let share = entry.count as f64 / total as f64;
            let sweep = 2.0 * PI * share;
            let steps = ((share * 120.0).ceil() as usize).max(2);

            let mut points = Vec::with_capacity(steps + 2);
            points.push(center);
            for step in 0..=steps {
                let theta = angle + sweep * step as f64 / steps as f64;
                points.push((
                    center.0 + (radius * theta.cos()).round() as i32,
                    center.1 + (radius * theta.sin()).round() as i32,
                ));
            }
            area.draw(&Polygon::new(points, Palette99::pick(idx).filled()))?;
            angle += sweep;

            let legend_y = 20 + idx as i32 * 26;
            area.draw(&Rectangle::new(
                [(legend_x, legend_y), (legend_x + 14, legend_y + 14)],
                Palette99::pick(idx).filled(),
            ))?;
            area.draw(&Text::new(
                format!("{} ({}, {:.1}%)", entry.label, entry.count, share * 100.0),
                (legend_x + 22, legend_y),
                ("sans-serif", 14),
            ))?;
        }

        root.present()?;
    }
    Ok(svg)
}
