use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use formguide_terminal::compare::TeamComparison;
use formguide_terminal::dataset;
use formguide_terminal::rolling_stats::StatValue;
use formguide_terminal::state::{AppState, PickSide, Screen};

struct App {
    state: AppState,
    should_quit: bool,
}

impl App {
    fn new(state: AppState) -> Self {
        Self {
            state,
            should_quit: false,
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Tab => {
                if self.state.screen == Screen::TeamPick {
                    self.state.toggle_side();
                }
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if self.state.screen == Screen::TeamPick {
                    self.state.select_next();
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if self.state.screen == Screen::TeamPick {
                    self.state.select_prev();
                }
            }
            KeyCode::Enter => {
                if self.state.screen == Screen::TeamPick {
                    self.state.confirm_selection();
                }
            }
            KeyCode::Char('b') | KeyCode::Esc => self.state.back_to_pick(),
            _ => {}
        }
    }
}

fn main() -> Result<()> {
    let paths: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if paths.is_empty() {
        eprintln!("uso: formguide <football-data.csv>...");
        std::process::exit(2);
    }

    let (merged, report) = match dataset::load_tables(&paths) {
        Ok(loaded) => loaded,
        Err(err) => {
            eprintln!("errore: {err}");
            std::process::exit(1);
        }
    };

    let mut app = App::new(AppState::new(merged));
    app.state.push_log(format!(
        "[INFO] Caricati {} file, {} partite totali",
        report.tables_loaded, report.rows_total
    ));
    for err in &report.errors {
        app.state.push_log(format!("[WARN] {err}"));
    }
    if report.date_warnings > 0 {
        app.state.push_log(format!(
            "[WARN] {} date non riconosciute (trattate come assenti)",
            report.date_warnings
        ));
    }

    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).context("enter alt screen")?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend).context("create terminal")?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode().context("disable raw mode")?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .context("leave alt screen")?;
    terminal.show_cursor().context("show cursor")?;

    if let Err(err) = res {
        eprintln!("errore: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(4),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let header =
        Paragraph::new(header_text(&app.state)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.screen {
        Screen::TeamPick => render_team_pick(frame, chunks[1], &app.state),
        Screen::Stats => render_stats(frame, chunks[1], &app.state),
    }

    render_log(frame, chunks[2], &app.state);

    let footer =
        Paragraph::new(footer_text(&app.state)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, chunks[3]);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    format!(
        "FORMGUIDE | Statistiche medie ultime 5 e 10 partite\n{} squadre, {} partite caricate",
        state.teams.len(),
        state.dataset.rows.len()
    )
}

fn footer_text(state: &AppState) -> String {
    match state.screen {
        Screen::TeamPick => {
            "Tab Cambia lato | j/k/↑/↓ Muovi | Enter Conferma | ? Aiuto | q Esci".to_string()
        }
        Screen::Stats => "b/Esc Selezione squadre | ? Aiuto | q Esci".to_string(),
    }
}

fn render_team_pick(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_team_list(frame, cols[0], state, PickSide::Left);
    render_team_list(frame, cols[1], state, PickSide::Right);
}

fn render_team_list(frame: &mut Frame, area: Rect, state: &AppState, side: PickSide) {
    let (title_side, cursor, chosen) = match side {
        PickSide::Left => ("Squadra 1", state.left_cursor, state.left_team.as_deref()),
        PickSide::Right => ("Squadra 2", state.right_cursor, state.right_team.as_deref()),
    };
    let active = state.pick_side == side;
    let border_style = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let title = format!("{} [{}]", title_side, chosen.unwrap_or("—"));
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style);
    let list_area = block.inner(area);
    frame.render_widget(block, area);

    if state.teams.is_empty() {
        let empty =
            Paragraph::new("Nessuna squadra").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, list_area);
        return;
    }

    let visible = list_area.height as usize;
    let (start, end) = visible_range(cursor, state.teams.len(), visible);
    let mut lines: Vec<Line> = Vec::new();
    for idx in start..end {
        let name = state.teams[idx].as_str();
        let style = if idx == cursor && active {
            Style::default().fg(Color::White).bg(Color::DarkGray)
        } else if idx == cursor {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(name.to_string(), style)));
    }
    frame.render_widget(Paragraph::new(lines), list_area);
}

fn render_stats(frame: &mut Frame, area: Rect, state: &AppState) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_team_column(frame, cols[0], state.left_compare.as_ref());
    render_team_column(frame, cols[1], state.right_compare.as_ref());
}

fn render_team_column(frame: &mut Frame, area: Rect, cmp: Option<&TeamComparison>) {
    let Some(cmp) = cmp else {
        let empty = Paragraph::new("Seleziona entrambe le squadre")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, area);
        return;
    };

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(13)])
        .split(area);

    render_stats_table(frame, sections[0], cmp);
    render_detail_table(frame, sections[1], cmp);
}

fn render_stats_table(frame: &mut Frame, area: Rect, cmp: &TeamComparison) {
    let block = Block::default()
        .title(cmp.team.clone())
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if !cmp.has_stats() {
        let info = Paragraph::new(
            "Non ci sono abbastanza dati per calcolare le statistiche per questa squadra.",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(info, inner);
        return;
    }

    let short_header = match &cmp.short {
        Some(stats) => format!("Ultime 5 (n={})", stats.n_eff),
        None => "Ultime 5".to_string(),
    };
    let long_header = match &cmp.long {
        Some(stats) => format!("Ultime 10 (n={})", stats.n_eff),
        None => "Ultime 10".to_string(),
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        format!("{:<18} {:>14} {:>14}", "", short_header, long_header),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for row in &cmp.rows {
        lines.push(Line::from(format!(
            "{:<18} {:>14} {:>14}",
            row.label,
            format_cell(row.short),
            format_cell(row.long)
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_detail_table(frame: &mut Frame, area: Rect, cmp: &TeamComparison) {
    let block = Block::default()
        .title("Dettaglio partite considerate (max 10)")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if cmp.detail.is_empty() {
        let empty = Paragraph::new("Nessuna partita disponibile.")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(empty, inner);
        return;
    }

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        format!(
            "{:<10} {:<14} {:<14} {:>2} {:>2} {:>3}",
            "Data", "Casa", "Trasferta", "GC", "GT", "Ris"
        ),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for row in &cmp.detail {
        lines.push(Line::from(format!(
            "{:<10} {:<14} {:<14} {:>2} {:>2} {:>3}",
            row.date_label(),
            truncate_name(&row.home_team, 14),
            truncate_name(&row.away_team, 14),
            row.field("FTHG").unwrap_or("-"),
            row.field("FTAG").unwrap_or("-"),
            row.field("FTR").unwrap_or("-"),
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_log(frame: &mut Frame, area: Rect, state: &AppState) {
    let block = Block::default().title("Log").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible = inner.height as usize;
    let text = state
        .logs
        .iter()
        .rev()
        .take(visible)
        .rev()
        .cloned()
        .collect::<Vec<_>>()
        .join("\n");
    let log = Paragraph::new(text).style(Style::default().fg(Color::DarkGray));
    frame.render_widget(log, inner);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "Formguide - Aiuto",
        "",
        "Selezione squadre:",
        "  Tab          Cambia selettore",
        "  j/k o ↑/↓    Muovi il cursore",
        "  Enter        Conferma la squadra",
        "",
        "Statistiche:",
        "  b / Esc      Torna alla selezione",
        "",
        "Globali:",
        "  ?            Mostra/nascondi aiuto",
        "  q            Esci",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Aiuto").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn format_cell(value: Option<StatValue>) -> String {
    match value {
        Some(v) => format!("{:.2}", v.as_f64()),
        None => String::new(),
    }
}

fn truncate_name(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        name.to_string()
    } else {
        name.chars().take(max.saturating_sub(1)).collect::<String>() + "…"
    }
}

fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 || visible == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}
