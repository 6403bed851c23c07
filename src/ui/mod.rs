use crate::app_state::{App, InputMode, LoadState, SORT_COLUMNS};
use crate::browser::detail::IndicatorEntry;
use crate::browser::{SortKey, VillageDetail, ViewResult};
use crate::village::Status;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, List, ListItem, Paragraph, Row, Table, TableState},
    Frame,
};

const BAR_WIDTH: usize = 20;

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title
            Constraint::Min(0),    // table + detail
            Constraint::Length(9), // command + log
        ])
        .split(f.size());

    render_top_bar(f, chunks[0], app);
    render_main_view(f, chunks[1], app);
    render_bottom_bar(f, chunks[2], app);
}

fn status_color(status: Status) -> Color {
    match status {
        Status::Mandiri => Color::Green,
        Status::Maju => Color::Cyan,
        Status::Berkembang => Color::LightYellow,
        Status::Tertinggal => Color::Gray,
    }
}

fn score_color(v: f64) -> Color {
    if v > 80.0 {
        Color::Green
    } else if v > 60.0 {
        Color::LightYellow
    } else {
        Color::Gray
    }
}

fn bar(v: f64) -> String {
    let filled = ((v.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

fn render_top_bar(f: &mut Frame, area: Rect, app: &App) {
    let total = app.browser.records().len();
    let title_text = Line::from(vec![
        Span::styled(
            " Database Indeks Desa ",
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" - Masterplan Desa Makmur ({} records)", total)),
    ]);

    let paragraph = Paragraph::new(title_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .style(Style::default().fg(Color::Cyan)),
        )
        .alignment(ratatui::layout::Alignment::Center);

    f.render_widget(paragraph, area);
}

fn render_main_view(f: &mut Frame, area: Rect, app: &mut App) {
    match &app.load_state {
        LoadState::Loading => {
            let p = Paragraph::new(Line::from(Span::styled(
                "Memuat Matriks Data...",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )))
            .alignment(ratatui::layout::Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(p, area);
            return;
        }
        LoadState::Failed(msg) => {
            let p = Paragraph::new(vec![
                Line::from(Span::styled(
                    format!("✗ {}", msg),
                    Style::default().fg(Color::Red),
                )),
                Line::from("r / reload untuk mencoba lagi"),
            ])
            .block(Block::default().borders(Borders::ALL).title("Gagal memuat"));
            f.render_widget(p, area);
            return;
        }
        LoadState::Ready => {}
    }

    let detail = app.browser.detail();
    let chunks = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints(if detail.is_some() {
            [Constraint::Min(8), Constraint::Length(11)]
        } else {
            [Constraint::Min(0), Constraint::Length(0)]
        })
        .split(area);

    let view = app.browser.compute_view();
    let mut table_state = TableState::default();
    if !view.page_records.is_empty() {
        table_state.select(Some(app.cursor));
    }
    let table = build_table(app, &view);
    f.render_stateful_widget(table, chunks[0], &mut table_state);

    if let Some(detail) = detail {
        render_detail(f, chunks[1], &detail, app.detail_scroll);
    }
}

fn build_table<'a>(app: &App, view: &ViewResult<'a>) -> Table<'a> {
    let state = app.browser.state();
    let header_cells = std::iter::once(Cell::from("#")).chain(SORT_COLUMNS.iter().enumerate().map(
        |(i, key)| {
            let arrow = match state.sort {
                Some(cfg) if cfg.key == *key => cfg.direction.arrow(),
                _ => "",
            };
            let hotkey = (i + 1) % 10;
            let style = if arrow.is_empty() {
                Style::default().fg(Color::White)
            } else {
                Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD)
            };
            Cell::from(format!("{}{} {}", column_title(*key), arrow, hotkey)).style(style)
        },
    ));
    let header = Row::new(header_cells)
        .style(Style::default().add_modifier(Modifier::BOLD))
        .bottom_margin(0);

    let expanded = app.browser.expanded_id();
    let rows: Vec<Row> = view
        .page_records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let marker = if expanded == Some(r.id) { "▼" } else { " " };
            let mut cells = vec![
                Cell::from(format!("{}{}", marker, view.first_row_number + i)),
                Cell::from(r.name.clone()),
                Cell::from(r.district.clone()),
                Cell::from(r.status.label()).style(Style::default().fg(status_color(r.status))),
                Cell::from(format!("{:.2}", r.total_score))
                    .style(Style::default().fg(score_color(r.total_score))),
            ];
            cells.extend(
                r.dimensions
                    .iter()
                    .map(|(_, v)| Cell::from(format!("{:.2}", v))),
            );
            Row::new(cells)
        })
        .collect();

    let widths = [
        Constraint::Length(5),
        Constraint::Min(16),
        Constraint::Min(14),
        Constraint::Length(13),
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(7),
        Constraint::Length(9),
    ];

    let search = if state.search_text.is_empty() {
        String::new()
    } else {
        format!(" Cari: \"{}\"", state.search_text)
    };
    let title = format!(
        "Desa [Status: {}]{} | Page {} of {} | {} hasil (↑↓ pilih, Enter detail, ←→ halaman, f status, 1-0 urut)",
        state.status_filter,
        search,
        view.current_page,
        view.total_pages,
        view.total_filtered
    );

    Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol(">> ")
}

fn column_title(key: SortKey) -> &'static str {
    match key {
        SortKey::Name => "Desa",
        SortKey::District => "Kecamatan",
        SortKey::Status => "Status ID6",
        SortKey::TotalScore => "Skor",
        SortKey::Dimension(d) => d.code(),
    }
}

fn render_detail(f: &mut Frame, area: Rect, detail: &VillageDetail<'_>, scroll: u16) {
    let chunks = Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
        .split(area);

    let mut dim_lines = vec![Line::from(vec![
        Span::styled(
            format!("{} ", detail.record.name),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(
            "({}, kode {})",
            detail.record.district, detail.record.code
        )),
    ])];
    for (dim, v) in &detail.dimensions {
        dim_lines.push(Line::from(vec![
            Span::raw(format!("{:<6}", dim.code())),
            Span::styled(bar(*v), Style::default().fg(score_color(*v))),
            Span::raw(format!(" {:>6.2}", v)),
        ]));
    }
    let dims = Paragraph::new(dim_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Skor Dimensi (x tutup)"),
    );
    f.render_widget(dims, chunks[0]);

    let heading = |text: &str| {
        Line::from(Span::styled(
            text.to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ))
    };
    let mut ind_lines = Vec::new();
    for group in &detail.groups {
        ind_lines.push(heading(group.dimension.label()));
        ind_lines.extend(group.entries.iter().map(indicator_line));
    }
    if !detail.ungrouped.is_empty() {
        ind_lines.push(heading("Indikator Lainnya"));
        ind_lines.extend(detail.ungrouped.iter().map(indicator_line));
    }
    let indicators = Paragraph::new(ind_lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Detail Indikator (j/k gulir)"),
        )
        .scroll((scroll, 0));
    f.render_widget(indicators, chunks[1]);
}

fn indicator_line(e: &IndicatorEntry) -> Line<'static> {
    let (value, color) = match e.rating {
        Some(5) => ("5".to_string(), Color::Green),
        Some(4) => ("4".to_string(), Color::Cyan),
        Some(3) => ("3".to_string(), Color::LightYellow),
        Some(v) => (v.to_string(), Color::Gray),
        None => ("-".to_string(), Color::DarkGray),
    };
    Line::from(vec![
        Span::raw(format!("  {} {:<30}", e.code, e.label)),
        Span::styled(value, Style::default().fg(color)),
    ])
}

fn render_bottom_bar(f: &mut Frame, area: Rect, app: &App) {
    let bottom_chunks = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let command_prompt = if app.input_mode == InputMode::Command {
        let mut spans = vec![Span::styled(
            "> ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )];
        let cur = app.command_cursor.min(app.command_input.len());
        let (left, right) = app.command_input.split_at(cur);
        spans.push(Span::raw(left));
        spans.push(Span::styled("_", Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(right));
        if let Some(hint) = app.get_completion_hint() {
            spans.push(Span::styled(hint, Style::default().fg(Color::DarkGray)));
        }
        Line::from(spans)
    } else {
        Line::from(vec![
            Span::styled("/ ", Style::default().fg(Color::Yellow)),
            Span::raw("command  r reload  x collapse  q quit"),
        ])
    };
    let command_paragraph = Paragraph::new(command_prompt).block(
        Block::default()
            .borders(Borders::ALL)
            .title(if app.input_mode == InputMode::Command {
                "Command (Enter run, Esc cancel, Tab complete)"
            } else {
                "Command"
            })
            .style(if app.input_mode == InputMode::Command {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::White)
            }),
    );
    f.render_widget(command_paragraph, bottom_chunks[0]);

    let log_items: Vec<ListItem> = app
        .log_messages
        .iter()
        .rev()
        .take(20)
        .map(|msg| {
            let style = if msg.starts_with('✓') {
                Style::default().fg(Color::Green)
            } else if msg.starts_with('✗') {
                Style::default().fg(Color::Red)
            } else if msg.starts_with('⚠') {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(msg.as_str()).style(style)
        })
        .collect();

    let log = List::new(log_items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Log ({})", app.log_messages.len()))
            .style(Style::default().fg(Color::White)),
    );
    f.render_widget(log, bottom_chunks[1]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app_state::AppEvent;
    use crate::village::fixture::generate_villages;
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::mpsc;

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buf = terminal.backend().buffer();
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    fn app() -> App {
        let (cmd_tx, _cmd_rx) = mpsc::unbounded_channel();
        let (_evt_tx, evt_rx) = mpsc::unbounded_channel();
        App::new(Vec::new(), cmd_tx, evt_rx)
    }

    #[test]
    fn bar_fills_proportionally() {
        assert_eq!(bar(0.0).chars().filter(|c| *c == '█').count(), 0);
        assert_eq!(bar(50.0).chars().filter(|c| *c == '█').count(), 10);
        assert_eq!(bar(140.0).chars().filter(|c| *c == '█').count(), BAR_WIDTH);
    }

    #[test]
    fn renders_loading_then_table_and_detail() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(160, 48)).unwrap();
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        assert!(buffer_text(&terminal).contains("Memuat Matriks Data"));

        app.apply_event(AppEvent::Villages(generate_villages(12, 3)));
        app.handle_key_event(crossterm::event::KeyCode::Enter);
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Braja Gemilang"));
        assert!(text.contains("Page 1 of 2"));
        assert!(text.contains("Skor Dimensi"));
        assert!(text.contains("Akses Kesehatan Dasar"));
    }

    #[test]
    fn detail_scrolls_down_to_ungrouped_indicators() {
        let mut app = app();
        let mut terminal = Terminal::new(TestBackend::new(160, 48)).unwrap();
        app.apply_event(AppEvent::Villages(generate_villages(4, 3)));
        app.handle_key_event(crossterm::event::KeyCode::Enter);
        // six headings and 22 grouped entries come first
        app.detail_scroll = 27;
        terminal.draw(|f| draw(f, &mut app)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Indikator Lainnya"));
        assert!(text.contains("Indikator I.04"));
    }
}
