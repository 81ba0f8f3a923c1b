// src/tui/app.rs — Flight dashboard: state, event loop, and rendering.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    symbols,
    text::{Line, Span},
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};

use crate::dashboard::{DashboardData, FlightOption};

use super::theme::Theme;

// ── Leg selection ────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq)]
enum Leg {
    Outbound,
    Return,
}

// ── App state ────────────────────────────────────────────────────

struct App<'a> {
    data: &'a DashboardData,
    leg: Leg,
    flight_table_state: TableState,
}

impl<'a> App<'a> {
    fn new(data: &'a DashboardData) -> Self {
        let mut flight_table_state = TableState::default();
        if !data.flights.is_empty() {
            flight_table_state.select(Some(0));
        }
        Self {
            data,
            leg: Leg::Outbound,
            flight_table_state,
        }
    }

    fn visible_flights(&self) -> &[FlightOption] {
        match self.leg {
            Leg::Outbound => &self.data.flights,
            Leg::Return => &self.data.return_flights,
        }
    }

    fn toggle_leg(&mut self) {
        if self.data.return_flights.is_empty() {
            return;
        }
        self.leg = match self.leg {
            Leg::Outbound => Leg::Return,
            Leg::Return => Leg::Outbound,
        };
        self.flight_table_state
            .select(if self.visible_flights().is_empty() {
                None
            } else {
                Some(0)
            });
    }

    fn scroll_down(&mut self) {
        let max = self.visible_flights().len().saturating_sub(1);
        let i = self.flight_table_state.selected().unwrap_or(0);
        self.flight_table_state.select(Some((i + 1).min(max)));
    }

    fn scroll_up(&mut self) {
        let i = self.flight_table_state.selected().unwrap_or(0);
        self.flight_table_state.select(Some(i.saturating_sub(1)));
    }
}

// ── Public entry point ───────────────────────────────────────────

/// Show the dashboard full screen. Blocks until the user dismisses it
/// (q / Esc / Ctrl-C).
pub fn show_dashboard(data: &DashboardData) -> anyhow::Result<()> {
    let mut app = App::new(data);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if event::poll(Duration::from_millis(250))? {
            if let Event::Key(key) = event::read()? {
                if key.code == KeyCode::Char('q')
                    || key.code == KeyCode::Esc
                    || (key.code == KeyCode::Char('c')
                        && key.modifiers.contains(KeyModifiers::CONTROL))
                {
                    return Ok(());
                }

                match key.code {
                    KeyCode::Tab | KeyCode::Char('t') => app.toggle_leg(),
                    KeyCode::Down | KeyCode::Char('j') => app.scroll_down(),
                    KeyCode::Up | KeyCode::Char('k') => app.scroll_up(),
                    _ => {}
                }
            }
        }
    }
}

// ── Rendering ────────────────────────────────────────────────────

fn render(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),  // Route header
            Constraint::Length(12), // Price chart
            Constraint::Min(8),     // Flight table
            Constraint::Length(1),  // Footer / key hints
        ])
        .split(size);

    render_route_header(f, chunks[0], app);
    render_price_chart(f, chunks[1], app);
    render_flight_table(f, chunks[2], app);
    render_footer(f, chunks[3], app);
}

fn render_route_header(f: &mut Frame, area: Rect, app: &App) {
    let route = &app.data.route;
    let mut spans = vec![
        Span::styled(
            format!(
                " {} ({}) → {} ({}) ",
                route.origin_name, route.origin_code, route.destination_name, route.destination_code
            ),
            Theme::header(),
        ),
        Span::styled(format!("· {} ", route.display_date), Theme::text_dim()),
    ];
    if !app.data.is_live_data {
        spans.push(Span::styled("· sample data ", Theme::sample_notice()));
    }

    let p = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );
    f.render_widget(p, area);
}

fn render_price_chart(f: &mut Frame, area: Rect, app: &App) {
    let series = &app.data.price_series;

    let price_points: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.price))
        .collect();
    let reference_points: Vec<(f64, f64)> = series
        .iter()
        .enumerate()
        .map(|(i, p)| (i as f64, p.reference_price))
        .collect();

    let min_price = series
        .iter()
        .flat_map(|p| [p.price, p.reference_price])
        .fold(f64::INFINITY, f64::min);
    let max_price = series
        .iter()
        .flat_map(|p| [p.price, p.reference_price])
        .fold(f64::NEG_INFINITY, f64::max);
    let (y_min, y_max) = if series.is_empty() {
        (0.0, 100.0)
    } else {
        (min_price - 20.0, max_price + 20.0)
    };

    let datasets = vec![
        Dataset::default()
            .name("price")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Theme::price_line())
            .data(&price_points),
        Dataset::default()
            .name("optimal")
            .marker(symbols::Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Theme::reference_line())
            .data(&reference_points),
    ];

    let x_labels: Vec<Span> = series
        .iter()
        .step_by((series.len() / 3).max(1))
        .map(|p| Span::styled(p.date.clone(), Theme::text_dim()))
        .collect();
    let y_labels = vec![
        Span::styled(format!("${y_min:.0}"), Theme::text_dim()),
        Span::styled(format!("${:.0}", (y_min + y_max) / 2.0), Theme::text_dim()),
        Span::styled(format!("${y_max:.0}"), Theme::text_dim()),
    ];

    let chart = Chart::new(datasets)
        .block(
            Block::default()
                .title(Span::styled(" Price trend ", Theme::header()))
                .borders(Borders::ALL)
                .border_style(Theme::border()),
        )
        .x_axis(
            Axis::default()
                .bounds([0.0, series.len().saturating_sub(1).max(1) as f64])
                .labels(x_labels),
        )
        .y_axis(Axis::default().bounds([y_min, y_max]).labels(y_labels));

    f.render_widget(chart, area);
}

fn render_flight_table(f: &mut Frame, area: Rect, app: &mut App) {
    let reference = app
        .data
        .price_series
        .first()
        .map(|p| p.reference_price)
        .unwrap_or(0.0);

    let rows: Vec<Row> = app
        .visible_flights()
        .iter()
        .map(|flight| {
            Row::new(vec![
                Span::styled(flight.carrier_name.clone(), Theme::text()),
                Span::styled(flight.flight_number.clone(), Theme::text_dim()),
                Span::styled(
                    format!("{} → {}", flight.departure_time, flight.arrival_time),
                    Theme::text(),
                ),
                Span::styled(flight.duration.clone(), Theme::text_dim()),
                Span::styled(
                    match flight.stop_count {
                        0 => "nonstop".to_string(),
                        1 => "1 stop".to_string(),
                        n => format!("{n} stops"),
                    },
                    Theme::text_dim(),
                ),
                Span::styled(
                    format!("${:.0}", flight.price),
                    Theme::price(flight.price, reference),
                ),
                Span::styled(
                    if flight.is_recommended { "✓" } else { "" }.to_string(),
                    Theme::recommended(),
                ),
            ])
        })
        .collect();

    let title = match app.leg {
        Leg::Outbound => " Flights ",
        Leg::Return => " Return flights ",
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(20),
            Constraint::Length(9),
            Constraint::Length(22),
            Constraint::Length(8),
            Constraint::Length(8),
            Constraint::Length(7),
            Constraint::Length(2),
        ],
    )
    .header(
        Row::new(vec![
            "Airline", "Flight", "Times", "Duration", "Stops", "Price", "",
        ])
        .style(Theme::table_header()),
    )
    .row_highlight_style(Theme::table_selected())
    .block(
        Block::default()
            .title(Span::styled(title, Theme::header()))
            .borders(Borders::ALL)
            .border_style(Theme::border()),
    );

    f.render_stateful_widget(table, area, &mut app.flight_table_state);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let mut hints = vec![
        Span::styled(" q/Esc", Theme::key_hint()),
        Span::styled(" close  ", Theme::key_desc()),
        Span::styled("j/k/\u{2191}\u{2193}", Theme::key_hint()),
        Span::styled(" scroll", Theme::key_desc()),
    ];
    if !app.data.return_flights.is_empty() {
        hints.push(Span::styled("  Tab", Theme::key_hint()));
        hints.push(Span::styled(" outbound/return", Theme::key_desc()));
    }

    let p = Paragraph::new(Line::from(hints));
    f.render_widget(p, area);
}
