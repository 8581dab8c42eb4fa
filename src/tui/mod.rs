//! Ratatui-based terminal UI.
//!
//! The TUI drives the same session operations as the subcommands: load a
//! sales CSV, fit the regression, predict for a date/product pair, and render
//! the total-sales-by-product bar chart.

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Terminal,
};

use crate::cli::DataArgs;
use crate::domain::{parse_date, ProductTotal};
use crate::error::SessionError;
use crate::session::Session;

mod plotters_chart;

use plotters_chart::SalesBarChart;

/// Start the TUI.
///
/// The CSV is resolved (flag or interactive picker) before raw mode is
/// enabled, so the picker's stdin prompt still works normally.
pub fn run(args: DataArgs) -> Result<(), SessionError> {
    let csv_path = crate::app::resolve_csv_path(args.file.as_ref())?;
    let config = crate::app::train_config_from_args(&args);

    let _guard = TerminalGuard::new()?;

    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)
        .map_err(|e| SessionError::terminal(format!("Failed to initialize terminal: {e}")))?;

    let mut app = App::new(config, csv_path);
    app.event_loop(&mut terminal)
}

/// Ensures the terminal is restored (raw mode, alternate screen) on exit.
struct TerminalGuard;

impl TerminalGuard {
    fn new() -> Result<Self, SessionError> {
        enable_raw_mode()
            .map_err(|e| SessionError::terminal(format!("Failed to enable raw mode: {e}")))?;
        if let Err(e) = execute!(io::stdout(), EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(SessionError::terminal(format!(
                "Failed to enter alternate screen: {e}"
            )));
        }
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

struct App {
    session: Session,
    csv_path: PathBuf,
    date_input: String,
    editing_date: bool,
    selected_field: usize,
    product_idx: usize,
    show_chart: bool,
    last_prediction: Option<f64>,
    status: String,
}

/// Settings panel fields reachable with ↑/↓.
const FIELD_DATE: usize = 0;
const FIELD_PRODUCT: usize = 1;

impl App {
    fn new(config: crate::domain::TrainConfig, csv_path: PathBuf) -> Self {
        let mut app = Self {
            session: Session::new(config),
            csv_path,
            date_input: String::new(),
            editing_date: false,
            selected_field: FIELD_DATE,
            product_idx: 0,
            show_chart: false,
            last_prediction: None,
            status: String::new(),
        };
        // A failed initial load keeps the TUI running; the error lands in the
        // status line and `l` retries.
        app.reload();
        app
    }

    fn event_loop<B: ratatui::backend::Backend>(
        &mut self,
        terminal: &mut Terminal<B>,
    ) -> Result<(), SessionError> {
        let mut needs_redraw = true;
        loop {
            if needs_redraw {
                terminal
                    .draw(|f| self.draw(f))
                    .map_err(|e| SessionError::terminal(format!("Terminal draw error: {e}")))?;
                needs_redraw = false;
            }

            if !event::poll(Duration::from_millis(100))
                .map_err(|e| SessionError::terminal(format!("Event poll error: {e}")))?
            {
                continue;
            }

            match event::read()
                .map_err(|e| SessionError::terminal(format!("Event read error: {e}")))?
            {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    if self.handle_key(key.code) {
                        break;
                    }
                    needs_redraw = true;
                }
                Event::Resize(_, _) => {
                    needs_redraw = true;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Returns `true` when the app should exit.
    fn handle_key(&mut self, code: KeyCode) -> bool {
        if self.editing_date {
            self.handle_date_edit(code);
            return false;
        }

        match code {
            KeyCode::Char('q') => return true,
            KeyCode::Up => {
                if self.selected_field > 0 {
                    self.selected_field -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_field < FIELD_PRODUCT {
                    self.selected_field += 1;
                }
            }
            KeyCode::Left => self.adjust_field(-1),
            KeyCode::Right => self.adjust_field(1),
            KeyCode::Enter => {
                if self.selected_field == FIELD_DATE {
                    self.editing_date = true;
                    self.status =
                        "Editing date (YYYY-MM-DD). Enter to apply, Esc to cancel.".to_string();
                }
            }
            KeyCode::Char('l') => self.reload(),
            KeyCode::Char('t') => self.do_train(),
            KeyCode::Char('p') => self.do_predict(),
            KeyCode::Char('g') => self.toggle_chart(),
            _ => {}
        }

        false
    }

    fn handle_date_edit(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => {
                self.editing_date = false;
                self.status = "Date edit canceled.".to_string();
            }
            KeyCode::Enter => {
                self.editing_date = false;
                self.apply_date_input();
            }
            KeyCode::Backspace => {
                self.date_input.pop();
            }
            KeyCode::Char(c) => {
                if c.is_ascii_digit() || c == '-' || c == '/' {
                    self.date_input.push(c);
                }
            }
            _ => {}
        }
    }

    fn adjust_field(&mut self, delta: i32) {
        if self.selected_field != FIELD_PRODUCT {
            return;
        }
        let products = self.session.products();
        if products.is_empty() {
            self.status = "No products loaded. Press l to load the CSV.".to_string();
            return;
        }
        let n = products.len();
        self.product_idx = if delta >= 0 {
            (self.product_idx + 1) % n
        } else {
            (self.product_idx + n - 1) % n
        };
        self.status = format!("product: {}", products[self.product_idx]);
    }

    fn apply_date_input(&mut self) {
        let trimmed = self.date_input.trim().to_string();
        if trimmed.is_empty() {
            self.status = "Predict date cleared.".to_string();
            return;
        }
        match parse_date(&trimmed) {
            Ok(date) => {
                self.status = format!("Predict date set to {date}.");
            }
            Err(err) => {
                self.status = err;
            }
        }
    }

    fn reload(&mut self) {
        self.show_chart = false;
        self.last_prediction = None;
        match self.session.load(&self.csv_path) {
            Ok(dataset) => {
                self.status = format!(
                    "Loaded {} rows, {} products.",
                    dataset.rows.len(),
                    dataset.products.len()
                );
                if self.product_idx >= dataset.products.len() {
                    self.product_idx = 0;
                }
            }
            Err(err) => {
                self.status = err.to_string();
            }
        }
    }

    fn do_train(&mut self) {
        match self.session.train() {
            Ok(report) => {
                let holdout = report
                    .mse_holdout
                    .map(|m| format!("{m:.2}"))
                    .unwrap_or_else(|| "n/a".to_string());
                self.status = format!(
                    "Trained on {} rows. MSE train={:.2}, holdout={holdout}.",
                    report.n_train, report.mse_train
                );
            }
            Err(err) => {
                self.status = err.to_string();
            }
        }
    }

    fn do_predict(&mut self) {
        let date = self.date_input.trim().to_string();
        if date.is_empty() {
            self.status = "Set a date first (select Date, press Enter).".to_string();
            return;
        }
        let Some(product) = self.selected_product() else {
            self.status = "No products loaded. Press l to load the CSV.".to_string();
            return;
        };

        match self.session.predict(&date, &product) {
            Ok(value) => {
                self.last_prediction = Some(value);
                self.status = crate::report::format_prediction(&date, &product, value);
            }
            Err(err) => {
                self.status = err.to_string();
            }
        }
    }

    fn toggle_chart(&mut self) {
        if self.session.dataset().is_none() {
            self.status = "No data loaded. Press l to load the CSV.".to_string();
            return;
        }
        self.show_chart = !self.show_chart;
        self.status = if self.show_chart {
            "Showing total sales by product.".to_string()
        } else {
            "Chart hidden.".to_string()
        };
    }

    fn selected_product(&self) -> Option<String> {
        self.session.products().get(self.product_idx).cloned()
    }

    fn draw(&mut self, frame: &mut ratatui::Frame<'_>) {
        let size = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.draw_header(frame, chunks[0]);
        self.draw_body(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);
    }

    fn draw_header(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let mut lines: Vec<Line> = Vec::new();
        lines.push(Line::from(vec![
            Span::styled("sales", Style::default().fg(Color::Cyan)),
            Span::raw(" — linear sales model (date + product)"),
        ]));

        let (rows, products) = match self.session.dataset() {
            Some(dataset) => (dataset.rows.len(), dataset.products.len()),
            None => (0, 0),
        };
        lines.push(Line::from(Span::styled(
            format!(
                "file: {} | rows: {rows} | products: {products}",
                self.csv_path.display()
            ),
            Style::default().fg(Color::Gray),
        )));

        let model_line = match self.session.last_report() {
            Some(report) => {
                let holdout = report
                    .mse_holdout
                    .map(|m| format!("{m:.2}"))
                    .unwrap_or_else(|| "n/a".to_string());
                format!(
                    "model: {} columns | mse train={:.2} holdout={holdout} | seed={}",
                    report.columns.len(),
                    report.mse_train,
                    report.seed
                )
            }
            None => "model: not trained (press t)".to_string(),
        };
        lines.push(Line::from(Span::styled(
            model_line,
            Style::default().fg(Color::Gray),
        )));

        let p = Paragraph::new(Text::from(lines)).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }

    fn draw_body(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(8)])
            .split(area);

        self.draw_chart(frame, chunks[0]);
        self.draw_settings(frame, chunks[1]);
    }

    fn draw_chart(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let block = Block::default()
            .title("Total sales by product")
            .borders(Borders::ALL);
        let inner = block.inner(area);
        frame.render_widget(block, area);
        frame.render_widget(Clear, inner);

        if !self.show_chart {
            let msg = Paragraph::new("Press g to chart total sales by product.")
                .style(Style::default().fg(Color::Yellow))
                .block(Block::default());
            frame.render_widget(msg, inner);
            return;
        }

        let totals = match self.session.aggregate() {
            Ok(totals) => totals,
            Err(err) => {
                let msg = Paragraph::new(err.to_string())
                    .style(Style::default().fg(Color::Yellow))
                    .block(Block::default());
                frame.render_widget(msg, inner);
                return;
            }
        };

        let widget = SalesBarChart {
            totals: &totals,
            y_max: chart_y_max(&totals),
        };
        frame.render_widget(widget, inner);
    }

    fn draw_settings(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let date_label = if self.date_input.trim().is_empty() {
            "(unset)".to_string()
        } else {
            self.date_input.trim().to_string()
        };
        let product_label = self
            .selected_product()
            .unwrap_or_else(|| "-".to_string());
        let prediction = self
            .last_prediction
            .map(|v| format!("{v:.2}"))
            .unwrap_or_else(|| "-".to_string());

        let items = vec![
            ListItem::new(format!("Date: {date_label}")),
            ListItem::new(format!("Product: {product_label}")),
            ListItem::new(format!("Predicted: {prediction}")),
            ListItem::new(format!(
                "Seed: {} | Holdout: {:.0}%",
                self.session.config().seed,
                self.session.config().holdout_frac * 100.0
            )),
        ];

        let list = List::new(items)
            .block(Block::default().title("Predict").borders(Borders::ALL))
            .highlight_style(Style::default().fg(Color::Black).bg(Color::White))
            .highlight_symbol("» ");

        let mut state = ratatui::widgets::ListState::default();
        state.select(Some(self.selected_field));
        frame.render_stateful_widget(list, area, &mut state);

        if self.editing_date {
            let hint = Paragraph::new(format!("Editing date: {}_", self.date_input))
                .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
            let rect = Rect {
                x: area.x + 2,
                y: area.y + area.height.saturating_sub(2),
                width: area.width.saturating_sub(4),
                height: 1,
            };
            frame.render_widget(hint, rect);
        }
    }

    fn draw_footer(&self, frame: &mut ratatui::Frame<'_>, area: Rect) {
        let help = "↑/↓ select  ←/→ product  Enter edit date  t train  p predict  g chart  l reload  q quit";
        let line = Line::from(vec![
            Span::styled(help, Style::default().fg(Color::Gray)),
            Span::raw(" | "),
            Span::styled(&self.status, Style::default().fg(Color::Yellow)),
        ]);
        let p = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        frame.render_widget(p, area);
    }
}

/// Upper y bound with a little headroom above the tallest bar.
fn chart_y_max(totals: &[ProductTotal]) -> f64 {
    let max = totals
        .iter()
        .map(|t| t.total)
        .filter(|t| t.is_finite())
        .fold(0.0_f64, f64::max);
    if max > 0.0 { max * 1.05 } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn y_max_pads_largest_total() {
        let totals = vec![
            ProductTotal { product: "A".into(), total: 100.0 },
            ProductTotal { product: "B".into(), total: 40.0 },
        ];
        assert!((chart_y_max(&totals) - 105.0).abs() < 1e-9);
    }

    #[test]
    fn y_max_is_zero_without_positive_totals() {
        let totals = vec![ProductTotal { product: "A".into(), total: -3.0 }];
        assert_eq!(chart_y_max(&totals), 0.0);
    }
}
