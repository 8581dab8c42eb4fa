//! Plotters-powered bar chart widget for Ratatui.
//!
//! Why Plotters instead of Ratatui's built-in `BarChart` widget?
//! - proper numeric y-axis with tick labels
//! - consistent axis/label styling with the rest of the chart area
//! - easy to extend later (exportable PNG/SVG backends, annotations, etc.)
//!
//! We render Plotters output into the Ratatui buffer using
//! `plotters-ratatui-backend`.

use plotters::prelude::*;
use plotters::style::Color as _;
use plotters_ratatui_backend::widget_fn;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::domain::ProductTotal;

/// A lightweight, render-only bar chart description.
///
/// The widget is intentionally data-driven: totals and bounds are computed
/// outside the render call. This keeps `render()` focused on drawing and
/// makes the data prep testable separately.
pub struct SalesBarChart<'a> {
    /// One bar per product, in display order.
    pub totals: &'a [ProductTotal],
    /// Upper y bound (total sales). Must be positive and finite.
    pub y_max: f64,
}

impl<'a> Widget for SalesBarChart<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // When the available area is too small, Plotters may fail to build a
        // chart. In that case, we render a small hint rather than panicking.
        if area.width < 20 || area.height < 8 {
            buf.set_string(
                area.x,
                area.y,
                "Chart area too small (resize terminal).",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let n = self.totals.len();
        if n == 0 || !self.y_max.is_finite() || self.y_max <= 0.0 {
            buf.set_string(
                area.x,
                area.y,
                "No positive totals to chart.",
                Style::default().fg(Color::Yellow),
            );
            return;
        }

        let names: Vec<String> = self
            .totals
            .iter()
            .map(|t| truncate_label(&t.product))
            .collect();
        let totals: Vec<f64> = self.totals.iter().map(|t| t.total).collect();
        let y_max = self.y_max;

        // `plotters-ratatui-backend` draws Plotters primitives via Ratatui's
        // `Canvas` widget, which ultimately writes to the terminal buffer.
        let widget = widget_fn(move |root| {
            // Bars are centered on integer x positions so the integer axis
            // ticks land under their bars.
            let x_min = -0.5_f64;
            let x_max = n as f64 - 0.5;

            let mut chart = ChartBuilder::on(&root)
                .margin(1)
                // Terminal cells are low-res, so keep label areas compact.
                .set_label_area_size(LabelAreaPosition::Left, 8)
                .set_label_area_size(LabelAreaPosition::Bottom, 3)
                .build_cartesian_2d(x_min..x_max, 0.0..y_max)?;

            // Axes + tick labels. Mesh lines are disabled to reduce clutter
            // in low-resolution terminal rendering.
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("product")
                .y_desc("total sales")
                .x_labels(n)
                .y_labels(5)
                .x_label_formatter(&|v| {
                    let idx = v.round();
                    if (v - idx).abs() > 0.25 || idx < 0.0 {
                        return String::new();
                    }
                    names.get(idx as usize).cloned().unwrap_or_default()
                })
                .y_label_formatter(&|v| format!("{v:.0}"))
                .label_style(("sans-serif", 10).into_font().color(&WHITE))
                .axis_style(&WHITE)
                .bold_line_style(&WHITE)
                .draw()?;

            let bar_color = RGBColor(0, 255, 255); // cyan

            chart.draw_series(totals.iter().enumerate().map(|(i, &total)| {
                let x0 = i as f64 - 0.35;
                let x1 = i as f64 + 0.35;
                Rectangle::new([(x0, 0.0), (x1, total.max(0.0))], bar_color.filled())
            }))?;

            Ok(())
        });

        widget.render(area, buf);
    }
}

fn truncate_label(s: &str) -> String {
    const MAX: usize = 10;
    if s.chars().count() <= MAX {
        return s.to_string();
    }
    let mut out: String = s.chars().take(MAX - 1).collect();
    out.push('.');
    out
}
