use std::io;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use tracing::{debug, warn};

use crate::ai::RandomAgent;
use crate::config::AutomatedConfig;
use crate::game::{MoveOutcome, COLS};
use crate::persistence::TextStorage;
use crate::session::Session;

pub struct App<S> {
    session: Session<S>,
    automated: AutomatedConfig,
    selected_column: usize,
    should_quit: bool,
    message: Option<String>,
    /// Column chosen by the computer on its worker thread.
    pending_move: Option<Receiver<Option<usize>>>,
}

impl<S: TextStorage> App<S> {
    pub fn new(session: Session<S>, automated: AutomatedConfig) -> Self {
        App {
            session,
            automated,
            selected_column: COLS / 2, // Start in middle
            should_quit: false,
            message: None,
            pending_move: None,
        }
    }

    /// Main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            self.start_automated_move();
            self.poll_automated_move();
            self.handle_events()?;
        }
        Ok(())
    }

    /// Handle keyboard events
    fn handle_events(&mut self) -> io::Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key(key);
                }
            }
        }
        Ok(())
    }

    /// Handle key press
    fn handle_key(&mut self, key: KeyEvent) {
        // Clear message on any key press
        self.message = None;

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Left => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.selected_column < COLS - 1 {
                    self.selected_column += 1;
                }
            }
            KeyCode::Char(c @ '1'..='7') => {
                self.selected_column = c as usize - '1' as usize;
                self.drop_selected();
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                self.drop_selected();
            }
            KeyCode::Char('s') => {
                self.message = Some(match self.session.save() {
                    Ok(index) => format!("Saved as game #{index}"),
                    Err(e) => format!("Save failed: {e}"),
                });
            }
            KeyCode::Char('n') | KeyCode::Char('r') => {
                if self.session.game().is_terminal() {
                    self.session.reset();
                    self.selected_column = COLS / 2;
                    self.message = Some("New round started!".to_string());
                } else {
                    self.message = Some("Finish this round first.".to_string());
                }
            }
            _ => {}
        }
    }

    /// Drop the human player's piece in the selected column
    fn drop_selected(&mut self) {
        let game = self.session.game();
        if game.is_terminal() {
            self.message = Some("Round over! Press 'n' for a new round.".to_string());
            return;
        }
        if game.current_turn().is_automated() {
            self.message = Some(format!("Wait for {} to move.", game.current_turn().name()));
            return;
        }
        self.apply_move(self.selected_column);
    }

    fn apply_move(&mut self, column: usize) {
        match self.session.submit_move(column) {
            Ok(MoveOutcome::Accepted { .. }) => {}
            Ok(MoveOutcome::Won { winner, record }) => {
                let name = self.session.game().opponent(winner).name();
                self.message = Some(format!("{name} wins! (game record #{})", record.number));
            }
            Ok(MoveOutcome::Draw) => {
                self.message = Some("It's a draw!".to_string());
            }
            Err(e) => {
                self.message = Some(format!("{e}. Try again."));
            }
        }

        if let Some(e) = self.session.take_commit_error() {
            self.message = Some(format!("Could not record the win: {e}"));
        }
    }

    /// Let the computer think on a worker thread so the UI keeps drawing.
    fn start_automated_move(&mut self) {
        let game = self.session.game();
        if self.pending_move.is_some()
            || game.is_terminal()
            || !game.current_turn().is_automated()
        {
            return;
        }

        let opponent = game.current_turn().clone();
        let board = *game.board();
        let mut agent = RandomAgent::from_config(&self.automated);
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let choice = opponent.next_move(&board, None, &mut agent);
            let _ = tx.send(choice);
        });
        debug!("automated move requested");
        self.pending_move = Some(rx);
    }

    /// Apply the computer's choice on this thread once it arrives.
    fn poll_automated_move(&mut self) {
        let Some(rx) = &self.pending_move else {
            return;
        };

        match rx.try_recv() {
            Ok(Some(column)) => {
                self.pending_move = None;
                self.apply_move(column);
            }
            Ok(None) => {
                self.pending_move = None;
                self.message = Some("The computer has no legal move.".to_string());
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending_move = None;
                warn!("automated move worker exited without answering");
            }
        }
    }

    /// Render the UI
    fn render(&self, frame: &mut ratatui::Frame) {
        super::game_view::render(
            frame,
            self.session.game(),
            self.selected_column,
            &self.message,
            self.pending_move.is_some(),
        );
    }
}
