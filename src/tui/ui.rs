//! UI rendering using ratatui
//!
//! Supports multiple screens:
//! - Setup: player roster editing, resume and history shortcuts
//! - Playing: score table with entry box and round-winner overlays
//! - Result: final standings once a game finishes
//! - History: past games

use crate::app::screen::{EntryBox, PlayView};
use crate::app::state::{GameSession, Phase};
use crate::app::{AppCoordinator, Screen};
use crate::game::{Category, Round};
use crate::storage::HistoryEntry;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Row as TableRow, Table},
};

/// Accent used for titles, the current player and the active row.
const ACCENT: Color = Color::LightGreen;

/// Render the appropriate screen based on app state
pub fn render(frame: &mut Frame, coordinator: &AppCoordinator) {
    match &coordinator.screen {
        Screen::Setup {
            names,
            selected,
            error,
            can_resume,
        } => {
            render_setup(
                frame,
                names,
                *selected,
                error.as_deref(),
                *can_resume,
                coordinator.storage_warning.as_deref(),
            );
        }
        Screen::Playing { game, view } => {
            render_playing(
                frame,
                game,
                view,
                coordinator.storage_warning.as_deref(),
            );
        }
        Screen::History { entries, selected } => {
            render_history(
                frame,
                entries,
                *selected,
                coordinator.storage_warning.as_deref(),
            );
        }
    }
}

/// Render the setup screen
fn render_setup(
    frame: &mut Frame,
    names: &[String],
    selected: usize,
    error: Option<&str>,
    can_resume: bool,
    warning: Option<&str>,
) {
    let area = frame.area();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Logo
            Constraint::Length(1), // Resume hint
            Constraint::Length(1), // Spacer
            Constraint::Min(6),    // Name fields
            Constraint::Length(1), // Error
            Constraint::Length(2), // Footer
        ])
        .margin(2)
        .split(area);

    let logo = r#"
 ____    _    ____   ___  ____
|  _ \  / \  |  _ \ / _ \/ ___|
| | | |/ _ \ | | | | | | \___ \
| |_| / ___ \| |_| | |_| |___) |
|____/_/   \_\____/ \___/|____/
"#;
    let logo_widget = Paragraph::new(logo)
        .style(Style::default().fg(ACCENT).bold())
        .alignment(Alignment::Center);
    frame.render_widget(logo_widget, layout[0]);

    if can_resume {
        let resume = Paragraph::new("Saved game found \u{2014} F5 to resume")
            .style(Style::default().fg(Color::Cyan))
            .alignment(Alignment::Center);
        frame.render_widget(resume, layout[1]);
    }

    let items: Vec<ListItem> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let style = if i == selected {
                Style::default().fg(ACCENT).bold()
            } else {
                Style::default().fg(Color::White)
            };
            let prefix = if i == selected { "> " } else { "  " };
            let shown = if name.is_empty() { "_" } else { name.as_str() };
            ListItem::new(format!("{}Player {}: {}", prefix, i + 1, shown)).style(style)
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Players "),
    );
    frame.render_widget(list, layout[3]);

    if let Some(message) = error {
        let error_widget = Paragraph::new(message)
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center);
        frame.render_widget(error_widget, layout[4]);
    }

    render_footer(
        frame,
        layout[5],
        "\u{2191}\u{2193} Select  Type name  Tab Add  S-Tab Remove  Enter Start  F2 History  Esc Quit",
        warning,
    );
}

/// Render the playing screen (score table or final result)
fn render_playing(frame: &mut Frame, game: &GameSession, view: &PlayView, warning: Option<&str>) {
    if game.is_finished() && view.winner.is_none() {
        render_result(frame, game, warning);
        return;
    }

    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Round header
            Constraint::Length(2), // Players bar
            Constraint::Min(10),   // Score table
            Constraint::Length(2), // Footer
        ])
        .margin(1)
        .split(area);

    // Header: round and whose turn it is
    let header = match game.phase() {
        Phase::Round1 => format!(
            "Round 1 (free order) \u{2014} {}'s turn",
            game.current_player().name
        ),
        Phase::Round2 { current_row } => format!(
            "Round 2 \u{2014} {} \u{2014} {}'s turn",
            current_row.label(),
            game.current_player().name
        ),
        Phase::Finished => "Game finished".to_string(),
    };
    let header_widget = Paragraph::new(header)
        .style(Style::default().fg(ACCENT).bold())
        .alignment(Alignment::Center);
    frame.render_widget(header_widget, layout[0]);

    // Players bar with running totals
    let mut spans: Vec<Span> = Vec::new();
    for (i, player) in game.players().iter().enumerate() {
        let (_, _, total) = game.totals_for(i);
        let style = if i == game.current_player_index() {
            Style::default().fg(ACCENT).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        if i > 0 {
            spans.push(Span::raw("   "));
        }
        spans.push(Span::styled(format!("{} {}", player.name, total), style));
    }
    let bar = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(bar, layout[1]);

    render_score_table(frame, layout[2], game, view);

    let keys = match game.phase() {
        Phase::Round1 => "\u{2191}\u{2193} Row  Enter Score  F8 Fill  Esc Exit",
        Phase::Round2 { .. } => "Enter Score  F8 Fill  Esc Exit",
        Phase::Finished => "Enter Continue",
    };
    let footer = match &view.notice {
        Some(notice) => format!("{}  |  {}", notice, keys),
        None => keys.to_string(),
    };
    render_footer(frame, layout[3], &footer, warning);

    // Overlays
    if let Some(entry) = &view.entry {
        render_entry_box(frame, game, entry, view.notice.as_deref());
    }
    if let Some(round) = view.winner {
        render_winner(frame, game, round);
    }
}

/// Render the 15-row score table for the running round
fn render_score_table(frame: &mut Frame, area: Rect, game: &GameSession, view: &PlayView) {
    let round = game.current_round().unwrap_or(Round::Round2);

    let mut header_cells = vec!["Category".to_string(), "".to_string()];
    header_cells.extend(game.players().iter().map(|p| p.name.clone()));
    let header = TableRow::new(header_cells).style(Style::default().fg(Color::White).bold());

    let rows: Vec<TableRow> = Category::ALL
        .iter()
        .map(|category| {
            let active = match game.phase() {
                Phase::Round1 => category.index() == view.cursor,
                Phase::Round2 { current_row } => *category == current_row,
                Phase::Finished => false,
            };
            let marker = if active { "> " } else { "  " };
            let mut cells = vec![
                format!("{}{}", marker, category.label()),
                category.hint().to_string(),
            ];
            for card in game.cards() {
                let text = match card.entry(round, *category) {
                    Some(value) => value.to_string(),
                    None => "\u{b7}".to_string(),
                };
                cells.push(text);
            }
            let style = if active {
                Style::default().fg(ACCENT).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            TableRow::new(cells).style(style)
        })
        .collect();

    let mut widths = vec![Constraint::Length(20), Constraint::Length(6)];
    widths.extend(game.players().iter().map(|_| Constraint::Length(10)));

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", round.label())),
    );
    frame.render_widget(table, area);
}

/// Render the score-entry box overlay
fn render_entry_box(frame: &mut Frame, game: &GameSession, entry: &EntryBox, notice: Option<&str>) {
    let area = centered_rect(44, 8, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                "{} \u{2014} {}",
                game.current_player().name,
                entry.category.label()
            ),
            Style::default().fg(ACCENT).bold(),
        )),
        Line::from(format!(
            "Hint {}   Max {}",
            entry.category.hint(),
            entry.category.max_value()
        )),
        Line::from(format!("Value: {}_", entry.buffer)),
    ];
    if let Some(notice) = notice {
        lines.push(Line::from(Span::styled(
            notice.to_string(),
            Style::default().fg(Color::Red),
        )));
    }
    lines.push(Line::from(Span::styled(
        "Enter Submit  Esc Cancel",
        Style::default().fg(Color::DarkGray),
    )));

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" Score "));
    frame.render_widget(widget, area);
}

/// Render the round-winner overlay
fn render_winner(frame: &mut Frame, game: &GameSession, round: Round) {
    let area = centered_rect(50, 6 + game.players().len() as u16, frame.area());
    frame.render_widget(Clear, area);

    let title = match round {
        Round::Round1 => " Round 1 complete ",
        Round::Round2 => " Game over ",
    };
    let mut lines = Vec::new();
    for (i, (name, total)) in game.round_standings(round).into_iter().enumerate() {
        let style = if i == 0 {
            Style::default().fg(ACCENT).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(Span::styled(
            format!("{}. {} \u{2014} {}", i + 1, name, total),
            style,
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Enter Continue",
        Style::default().fg(Color::DarkGray),
    )));

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(title));
    frame.render_widget(widget, area);
}

/// Render the final standings once the game is finished
fn render_result(frame: &mut Frame, game: &GameSession, warning: Option<&str>) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Min(6),    // Standings
            Constraint::Length(2), // Footer
        ])
        .margin(2)
        .split(area);

    let title = Paragraph::new("Final standings")
        .style(Style::default().fg(ACCENT).bold())
        .alignment(Alignment::Center);
    frame.render_widget(title, layout[0]);

    let header = TableRow::new(vec!["#", "Player", "Round 1", "Round 2", "Total"])
        .style(Style::default().fg(Color::White).bold());
    let rows: Vec<TableRow> = game
        .standings()
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let style = if i == 0 {
                Style::default().fg(ACCENT).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            TableRow::new(vec![
                (i + 1).to_string(),
                line.name,
                line.round1_total.to_string(),
                line.round2_total.to_string(),
                line.total.to_string(),
            ])
            .style(style)
        })
        .collect();
    let widths = [
        Constraint::Length(3),
        Constraint::Length(14),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Length(8),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(table, layout[1]);

    render_footer(frame, layout[2], "Enter New Game  Esc Quit", warning);
}

/// Render the history screen
fn render_history(
    frame: &mut Frame,
    entries: &[HistoryEntry],
    selected: usize,
    warning: Option<&str>,
) {
    let area = frame.area();
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Min(4),    // Game list
            Constraint::Length(6), // Selected game detail
            Constraint::Length(2), // Footer
        ])
        .margin(2)
        .split(area);

    let title = Paragraph::new("Game history")
        .style(Style::default().fg(ACCENT).bold())
        .alignment(Alignment::Center);
    frame.render_widget(title, layout[0]);

    if entries.is_empty() {
        let empty = Paragraph::new("No games recorded yet")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, layout[1]);
    } else {
        let items: Vec<ListItem> = entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let date = entry.date.get(..10).unwrap_or(&entry.date);
                let winner = entry
                    .players
                    .first()
                    .map(|p| format!("{} ({})", p.name, p.total))
                    .unwrap_or_default();
                let style = if i == selected {
                    Style::default().fg(ACCENT).bold()
                } else {
                    Style::default().fg(Color::Gray)
                };
                let prefix = if i == selected { "> " } else { "  " };
                ListItem::new(format!("{}{}  winner: {}", prefix, date, winner)).style(style)
            })
            .collect();
        let list = List::new(items).block(Block::default().borders(Borders::ALL));
        frame.render_widget(list, layout[1]);

        if let Some(entry) = entries.get(selected) {
            let lines: Vec<Line> = entry
                .players
                .iter()
                .enumerate()
                .map(|(i, p)| {
                    Line::from(format!(
                        "{}. {}  R1 {}  R2 {}  total {}",
                        i + 1,
                        p.name,
                        p.round1_total,
                        p.round2_total,
                        p.total
                    ))
                })
                .collect();
            let detail = Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL).title(" Detail "));
            frame.render_widget(detail, layout[2]);
        }
    }

    render_footer(
        frame,
        layout[3],
        "\u{2191}\u{2193} Select  Esc Back",
        warning,
    );
}

fn render_footer(frame: &mut Frame, area: Rect, keys: &str, warning: Option<&str>) {
    let mut lines = vec![Line::from(Span::styled(
        keys.to_string(),
        Style::default().fg(Color::DarkGray),
    ))];
    if let Some(warning) = warning {
        lines.push(Line::from(Span::styled(
            format!("storage: {}", warning),
            Style::default().fg(Color::Yellow),
        )));
    }
    let widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

/// A centered rectangle of fixed size, clamped to the frame
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;
    Rect::new(x, y, width, height)
}
