use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use slither::{log, Collision, Direction::{self, *}, EndReason, Game, Position, Status, Step, Tick};

use crate::term::{Coords, TermInt, TermManager};

const SNAKE_BODY_CHAR: char = '█';
const FOOD_CHAR: char = 'O';
const DEAD_SNAKE_CHAR: char = 'X';
const IDLE_POLL: Duration = Duration::from_millis(50);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Steer(Direction),
    TogglePause,
    Restart,
    Quit,
}

pub fn command_for(ev: &KeyEvent) -> Option<Command> {
    if ev.modifiers.contains(KeyModifiers::CONTROL) {
        return match ev.code {
            KeyCode::Char('c') => Some(Command::Quit),
            _ => None,
        };
    }

    match ev.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Command::Steer(Up)),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Command::Steer(Left)),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Command::Steer(Down)),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Command::Steer(Right)),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Some(Command::TogglePause),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(Command::Quit),
        _ => None,
    }
}

fn head_char(direction: Direction) -> char {
    match direction {
        Up => '^',
        Down => 'v',
        Left => '<',
        Right => '>',
    }
}

/// Terminal front-end: owns the screen and feeds key presses into a `Game`.
pub struct App {
    term: TermManager,
    game: Game,
}

impl App {
    pub fn new(game: Game) -> Result<Self> {
        let term = TermManager::new().context("Failed to query terminal size")?;

        // Grid plus border, plus one status line
        let grid = game.grid();
        let needed = (grid.width() as u32 + 2, grid.height() as u32 + 3);
        let (w, h) = term.size();
        if (w as u32) < needed.0 || (h as u32) < needed.1 {
            bail!(
                "Terminal is {}x{}, a {}x{} grid needs at least {}x{}",
                w, h, grid.width(), grid.height(), needed.0, needed.1
            );
        }

        Ok(App { term, game })
    }

    /// Runs until the player quits. The terminal is restored even on error.
    pub fn run(&mut self) -> Result<()> {
        self.term.setup().context("Failed to set up terminal")?;
        let res = self.main_loop();
        self.term.restore().context("Failed to restore terminal")?;
        res
    }

    ///////////////////////////////////////////////////////////////////////////

    fn main_loop(&mut self) -> Result<()> {
        if !self.show_intro()? {
            return Ok(());
        }

        loop {
            self.draw_all()?;
            if !self.play_round()? {
                return Ok(());
            }
            self.game.restart();
        }
    }

    fn show_intro(&mut self) -> Result<bool> {
        self.term.show_message(&[
            "Arrow keys or WASD to move",
            "P or Esc to pause",
            "Q or CTRL+C to quit",
            "",
            "Press any key to begin",
        ])?;

        let key = self.term.read_key_blocking()?;
        self.term.hide_message()?;
        Ok(command_for(&key) != Some(Command::Quit))
    }

    /// Plays until game over. Returns whether the player wants another round.
    fn play_round(&mut self) -> Result<bool> {
        let mut next_step = Instant::now() + self.game.tick_interval();

        loop {
            let timeout = match self.game.status() {
                Status::Running => next_step.saturating_duration_since(Instant::now()),
                _ => IDLE_POLL,
            };
            for key_ev in self.term.read_key_events_queue(timeout)? {
                match command_for(&key_ev) {
                    Some(Command::Quit) => return Ok(false),
                    Some(Command::Steer(dir)) => self.game.steer(dir),
                    Some(Command::TogglePause) => self.toggle_pause()?,
                    _ => {}
                }
            }

            if self.game.status() != Status::Running || Instant::now() < next_step {
                continue;
            }
            next_step = Instant::now() + self.game.tick_interval();

            match self.game.update() {
                Tick::Idle => {}
                Tick::Moved(step) => self.draw_step(&step)?,
                Tick::Ate { step, .. } => {
                    self.draw_step(&step)?;
                    self.draw_food()?;
                    self.draw_status()?;
                }
                Tick::Ended { step, reason } => {
                    self.draw_step(&step)?;
                    self.draw_status()?;
                    return self.game_over(reason);
                }
            }
            self.term.flush()?;
        }
    }

    fn toggle_pause(&mut self) -> Result<()> {
        self.game.toggle_pause();
        match self.game.status() {
            Status::Paused => self.term.show_message(&["Paused", "Press P to resume", "or Q to quit"])?,
            _ => self.term.hide_message()?,
        }
        Ok(())
    }

    fn game_over(&mut self, reason: EndReason) -> Result<bool> {
        let title = match reason {
            EndReason::GridFilled => "You won!",
            EndReason::Crashed(Collision::Wall) => "Game over! You hit the wall",
            EndReason::Crashed(Collision::SelfBite) => "Game over! You bit yourself",
        };

        if let EndReason::Crashed(_) = reason {
            let cells: Vec<Coords> = self.game.snake().body().iter().skip(1)
                .filter_map(|pos| self.cell(*pos))
                .collect();
            for cell in cells {
                self.term.print_at(cell, DEAD_SNAKE_CHAR)?;
            }
        }

        let score = format!("Final score: {}", self.game.score());
        self.term.show_message(&[title, score.as_str(), "", "Press R to play again,", "or Q to quit."])?;

        loop {
            match command_for(&self.term.read_key_blocking()?) {
                Some(Command::Restart) => return Ok(true),
                Some(Command::Quit) => return Ok(false),
                _ => {}
            }
        }
    }

    fn draw_all(&mut self) -> Result<()> {
        let grid = self.game.grid();
        self.term.clear()?;
        self.term.draw_borders(grid.width() + 2, grid.height() + 2)?;

        let snake = self.game.snake();
        let body: Vec<Position> = snake.body().iter().skip(1).copied().collect();
        let (head, direction) = (snake.get_head_position(), snake.direction());
        for pos in body {
            self.print_cell(pos, SNAKE_BODY_CHAR)?;
        }
        self.print_cell(head, head_char(direction))?;

        self.draw_food()?;
        self.draw_status()?;
        Ok(self.term.flush()?)
    }

    fn draw_step(&mut self, step: &Step) -> Result<()> {
        // Tail first: the new head may land on the cell the tail just left
        if let Some(old_tail) = step.old_tail {
            self.print_cell(old_tail, ' ')?;
        }
        self.print_cell(step.old_head, SNAKE_BODY_CHAR)?;
        self.print_cell(step.new_head, head_char(self.game.snake().direction()))
    }

    fn draw_food(&mut self) -> Result<()> {
        let (position, eaten) = (self.game.food().position(), self.game.food().eaten());
        if eaten {
            return Ok(());
        }
        self.print_cell(position, FOOD_CHAR)
    }

    fn draw_status(&mut self) -> Result<()> {
        let y = self.game.grid().height() + 2;
        let line = format!(
            "Score: {}  Length: {}  Speed: {}",
            self.game.score(),
            self.game.snake().get_length(),
            self.game.speed()
        );
        self.term.print_line((0, y), &line)?;
        Ok(())
    }

    fn print_cell(&mut self, pos: Position, ch: char) -> Result<()> {
        if let Some(cell) = self.cell(pos) {
            self.term.print_at(cell, ch)?;
        } else {
            log!("Skipped drawing off-grid cell ({}, {})", pos.x, pos.y);
        }
        Ok(())
    }

    /// Screen coordinates of a grid cell, inside the border.
    fn cell(&self, pos: Position) -> Option<Coords> {
        if self.game.grid().contains(pos) {
            Some((pos.x as TermInt + 1, pos.y as TermInt + 1))
        } else {
            None
        }
    }
}
