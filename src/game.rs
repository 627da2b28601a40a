use std::time::Duration;

use crate::config::{GameConfig, Validate};
use crate::food::Food;
use crate::grid::{Direction, Grid, Position};
use crate::log;
use crate::policy::SpeedPolicy;
use crate::rng::GameRng;
use crate::snake::{Collision, Snake, Step};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Running,
    Paused,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    Crashed(Collision),
    /// The snake covers every cell, so no food can be placed.
    GridFilled,
}

/// Outcome of a single `update` call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tick {
    /// Not running, nothing happened.
    Idle,
    Moved(Step),
    Ate { step: Step, food: Position },
    Ended { step: Step, reason: EndReason },
}

pub struct Game {
    config: GameConfig,
    grid: Grid,
    policy: SpeedPolicy,
    rng: GameRng,
    snake: Snake,
    food: Food,
    status: Status,
    end_reason: Option<EndReason>,
    score: u32,
    speed: u32,
    ticks: u64,
}

impl Game {
    /// Fails when `config` does not validate.
    pub fn new(config: GameConfig, mut rng: GameRng) -> Result<Self, String> {
        config.validate()?;
        let grid = config.grid();
        let policy = SpeedPolicy::from_config(&config);
        let (snake, food) = spawn(&config, grid, &mut rng);

        log!("New game on {}x{} grid, seed {}", grid.width(), grid.height(), rng.seed());

        Ok(Game {
            config,
            grid,
            policy,
            rng,
            snake,
            food,
            status: Status::Running,
            end_reason: None,
            score: 0,
            speed: policy.initial_speed(),
            ticks: 0,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn grid(&self) -> Grid {
        self.grid
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &Food {
        &self.food
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Wall-clock time the caller should leave between two updates.
    pub fn tick_interval(&self) -> Duration {
        SpeedPolicy::tick_interval(self.speed)
    }

    /// Turns the snake right away; the last accepted turn before a tick is
    /// the one it moves in. Ignored unless running.
    pub fn steer(&mut self, direction: Direction) {
        if self.status == Status::Running {
            self.snake.change_direction(direction);
        }
    }

    pub fn toggle_pause(&mut self) {
        self.status = match self.status {
            Status::Running => Status::Paused,
            Status::Paused => Status::Running,
            Status::GameOver => return,
        };
        log!("Status now {:?}", self.status);
    }

    pub fn restart(&mut self) {
        let (snake, food) = spawn(&self.config, self.grid, &mut self.rng);
        self.snake = snake;
        self.food = food;
        self.status = Status::Running;
        self.end_reason = None;
        self.score = 0;
        self.speed = self.policy.initial_speed();
        self.ticks = 0;
        log!("Game restarted");
    }

    /// Advances the simulation by one tick: move, then collisions, then food.
    pub fn update(&mut self) -> Tick {
        if self.status != Status::Running {
            return Tick::Idle;
        }
        self.ticks += 1;

        let step = self.snake.move_step();

        if let Some(collision) = self.snake.collision() {
            return self.end(step, EndReason::Crashed(collision));
        }

        let head = self.snake.get_head_position();
        if !self.food.check_eaten(head) {
            return Tick::Moved(step);
        }

        let old_score = self.score;
        self.score = self.policy.award(old_score);
        self.snake.grow(1);

        let speed = self.policy.next_speed(old_score, self.score, self.speed);
        if speed != self.speed {
            log!("Speed {} -> {}", self.speed, speed);
            self.speed = speed;
        }

        if !self.food.respawn(Some(self.snake.body()), &mut self.rng) {
            return self.end(step, EndReason::GridFilled);
        }

        log!(
            "Ate food at ({}, {}), score {}, next food at ({}, {})",
            head.x, head.y, self.score,
            self.food.position().x, self.food.position().y
        );
        Tick::Ate { step, food: head }
    }

    fn end(&mut self, step: Step, reason: EndReason) -> Tick {
        self.status = Status::GameOver;
        self.end_reason = Some(reason);
        log!("Game over ({:?}) after {} ticks, score {}", reason, self.ticks, self.score);
        Tick::Ended { step, reason }
    }
}

fn spawn(config: &GameConfig, grid: Grid, rng: &mut GameRng) -> (Snake, Food) {
    let snake = Snake::new(grid, config.initial_length);
    let mut food = Food::new(grid, rng);
    let placed = food.respawn(Some(snake.body()), rng);
    if !placed {
        log!("No free cell for food at start, food left at ({}, {})", food.position().x, food.position().y);
    }
    debug_assert!(placed, "validated config must leave a free cell for food");
    (snake, food)
}
