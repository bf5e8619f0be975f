use crate::game::{Board, Cell, Match, MatchStatus, Piece, Seat, COLS, ROWS};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render(
    frame: &mut Frame,
    game: &Match,
    selected_column: usize,
    message: &Option<String>,
    thinking: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Length(3), // Scores
            Constraint::Min(11),   // Board
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_header(frame, game, thinking, chunks[0]);
    render_scores(frame, game, chunks[1]);
    render_board(frame, game.board(), selected_column, chunks[2]);
    render_message(frame, message, chunks[3]);
    render_controls(frame, chunks[4]);
}

fn piece_color(piece: Piece) -> Color {
    match piece {
        Piece::X => Color::Red,
        Piece::O => Color::Yellow,
    }
}

fn render_header(frame: &mut Frame, game: &Match, thinking: bool, area: Rect) {
    let current = game.current_turn();
    let status = match game.status() {
        MatchStatus::Won(seat) => format!("{} wins!", game.opponent(seat).name()),
        MatchStatus::Draw => "Draw".to_string(),
        MatchStatus::InProgress if thinking => format!("{} is thinking...", current.name()),
        MatchStatus::InProgress => {
            format!("Current Player: {} ({})", current.name(), current.piece().symbol())
        }
    };

    let header = Paragraph::new(status)
        .style(
            Style::default()
                .fg(piece_color(current.piece()))
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Connect Four"));

    frame.render_widget(header, area);
}

fn render_scores(frame: &mut Frame, game: &Match, area: Rect) {
    let mut spans = Vec::new();
    for seat in [Seat::One, Seat::Two] {
        let player = game.opponent(seat);
        spans.push(Span::styled(
            player.name().to_string(),
            Style::default()
                .fg(piece_color(player.piece()))
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(": {} win(s)   ", game.wins_of(seat))));
    }
    spans.push(Span::raw(format!(
        "Rounds: {}   Records: {}",
        game.rounds_completed(),
        game.history_count()
    )));

    let scores = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Totals"));
    frame.render_widget(scores, area);
}

fn render_board(frame: &mut Frame, board: &Board, selected_column: usize, area: Rect) {
    let mut lines = Vec::new();

    // Column numbers with selection indicator
    let mut col_line = vec![Span::raw("   ")]; // Padding (3 chars to match "  ║")
    for col in 0..COLS {
        if col == selected_column {
            col_line.push(Span::styled(
                format!(" {} ", col + 1),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ));
        } else {
            col_line.push(Span::raw(format!(" {} ", col + 1)));
        }
    }
    col_line.push(Span::raw("  ")); // Suffix padding to match " ║"
    lines.push(Line::from(col_line));

    lines.push(Line::from("  ╔══════════════════════╗"));

    for row in 0..ROWS {
        let mut row_spans = vec![Span::raw("  ║")];

        for col in 0..COLS {
            let (symbol, color) = match board.get(row, col) {
                Cell::Empty => (" . ", Color::DarkGray),
                Cell::X => (" ● ", piece_color(Piece::X)),
                Cell::O => (" ● ", piece_color(Piece::O)),
            };
            row_spans.push(Span::styled(symbol, Style::default().fg(color)));
        }

        row_spans.push(Span::raw(" ║"));
        lines.push(Line::from(row_spans));
    }

    lines.push(Line::from("  ╚══════════════════════╝"));

    let mut indicator_line = vec![Span::raw("   ")];
    for col in 0..COLS {
        if col == selected_column {
            indicator_line.push(Span::styled(" ▲ ", Style::default().fg(Color::Cyan)));
        } else {
            indicator_line.push(Span::raw("   "));
        }
    }
    indicator_line.push(Span::raw("  "));
    lines.push(Line::from(indicator_line));

    let board_widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(board_widget, area);
}

fn render_message(frame: &mut Frame, message: &Option<String>, area: Rect) {
    let text = message.as_deref().unwrap_or("");
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let line = Line::from(
        "←/→ or 1-7: Column  |  Enter: Drop  |  S: Save  |  N: New round  |  Q: Quit",
    );

    let controls = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}
