use std::collections::VecDeque;

use crate::grid::{Direction::{self, *}, Grid, Position};

/// What a single `move_step` changed, for incremental redraws.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Step {
    pub new_head: Position,
    pub old_head: Position,
    /// `None` when the tail was kept to pay off pending growth.
    pub old_tail: Option<Position>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Collision {
    Wall,
    SelfBite,
}

#[derive(Clone, Debug)]
pub struct Snake {
    grid: Grid,
    body: VecDeque<Position>,
    direction: Direction,
    pending_growth: u32,
}

impl Snake {
    /// A straight snake with its head on the grid centre, trailing to the
    /// left and facing right. Always has at least a head.
    pub fn new(grid: Grid, length: u16) -> Self {
        let head = grid.center();
        let (dx, dy) = Right.delta();

        let body = (0..length.max(1) as i32)
            .map(|i| Position::new(head.x - dx * i, head.y - dy * i))
            .collect();
        Snake { grid, body, direction: Right, pending_growth: 0 }
    }

    /// Head-first, tail-last.
    pub fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_growth(&self) -> u32 {
        self.pending_growth
    }

    pub fn get_head_position(&self) -> Position {
        self.body[0]
    }

    pub fn get_length(&self) -> usize {
        self.body.len()
    }

    /// Advances one cell. Walls and the body are not checked here, see
    /// `check_collision`.
    pub fn move_step(&mut self) -> Step {
        let old_head = self.get_head_position();
        let new_head = old_head + self.direction;

        self.body.push_front(new_head);

        if self.pending_growth > 0 {
            self.pending_growth -= 1;
            Step { new_head, old_head, old_tail: None }
        } else {
            let old_tail = self.body.pop_back();
            Step { new_head, old_head, old_tail }
        }
    }

    /// Reversals are silently ignored.
    pub fn change_direction(&mut self, new_direction: Direction) {
        if !new_direction.is_opposite(self.direction) {
            self.direction = new_direction;
        }
    }

    pub fn grow(&mut self, segments: u32) {
        self.pending_growth = self.pending_growth.saturating_add(segments);
    }

    pub fn collision(&self) -> Option<Collision> {
        let head = self.get_head_position();

        if !self.grid.contains(head) {
            Some(Collision::Wall)
        } else if self.body.iter().skip(1).any(|p| *p == head) {
            Some(Collision::SelfBite)
        } else {
            None
        }
    }

    pub fn check_collision(&self) -> bool {
        self.collision().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snake_at(head: Position, length: u16) -> Snake {
        // Grid sized so that `head` is the centre
        let grid = Grid::new(head.x as u16 * 2 + 1, head.y as u16 * 2 + 1);
        Snake::new(grid, length)
    }

    #[test]
    fn starts_centered_facing_right() {
        let snake = Snake::new(Grid::new(10, 10), 3);
        let body: Vec<_> = snake.body().iter().copied().collect();
        assert_eq!(body, vec![Position::new(5, 5), Position::new(4, 5), Position::new(3, 5)]);
        assert_eq!(snake.direction(), Right);
        assert_eq!(snake.pending_growth(), 0);
        assert!(!snake.check_collision());
    }

    #[test]
    fn move_drops_tail() {
        let mut snake = snake_at(Position::new(5, 5), 3);
        let step = snake.move_step();

        assert_eq!(snake.get_head_position(), Position::new(6, 5));
        assert_eq!(snake.get_length(), 3);
        assert!(!snake.contains(Position::new(3, 5)));
        assert_eq!(step, Step {
            new_head: Position::new(6, 5),
            old_head: Position::new(5, 5),
            old_tail: Some(Position::new(3, 5)),
        });
    }

    #[test]
    fn growth_applies_on_next_move_only() {
        let mut snake = snake_at(Position::new(5, 5), 3);
        snake.grow(1);
        assert_eq!(snake.get_length(), 3);

        let step = snake.move_step();
        assert_eq!(snake.get_length(), 4);
        assert_eq!(snake.pending_growth(), 0);
        assert_eq!(step.old_tail, None);

        snake.move_step();
        assert_eq!(snake.get_length(), 4);
    }

    #[test]
    fn growth_accumulates() {
        let mut snake = snake_at(Position::new(10, 10), 3);
        snake.grow(2);
        snake.grow(1);
        assert_eq!(snake.pending_growth(), 3);

        for expected in [4, 5, 6, 6] {
            let before = snake.pending_growth();
            snake.move_step();
            assert_eq!(snake.get_length(), expected);
            assert_eq!(snake.pending_growth(), before.saturating_sub(1));
        }
    }

    #[test]
    fn growth_saturates() {
        let mut snake = snake_at(Position::new(5, 5), 3);
        snake.grow(u32::MAX);
        snake.grow(5);
        assert_eq!(snake.pending_growth(), u32::MAX);
        snake.move_step();
        assert_eq!(snake.pending_growth(), u32::MAX - 1);
    }

    #[test]
    fn zero_length_still_has_a_head() {
        let snake = Snake::new(Grid::new(10, 10), 0);
        assert_eq!(snake.get_length(), 1);
        assert_eq!(snake.get_head_position(), Position::new(5, 5));
    }

    #[test]
    fn reversal_is_a_no_op() {
        let all = [Up, Down, Left, Right];
        for current in all {
            for requested in all {
                let mut snake = snake_at(Position::new(5, 5), 3);
                snake.direction = current;
                snake.change_direction(requested);

                let expected = if requested == current.opposite() { current } else { requested };
                assert_eq!(snake.direction(), expected, "{:?} -> {:?}", current, requested);
            }
        }
    }

    #[test]
    fn up_while_heading_down_is_ignored() {
        let mut snake = snake_at(Position::new(5, 5), 3);
        snake.change_direction(Down);
        snake.change_direction(Up);
        assert_eq!(snake.direction(), Down);
    }

    #[test]
    fn last_valid_change_before_move_wins() {
        let mut snake = snake_at(Position::new(5, 5), 3);
        snake.change_direction(Up);
        snake.change_direction(Right);
        snake.move_step();
        assert_eq!(snake.get_head_position(), Position::new(6, 5));
    }

    #[test]
    fn leaving_the_grid_is_a_wall_collision() {
        let mut snake = Snake::new(Grid::new(3, 11), 2);
        snake.change_direction(Down);
        snake.change_direction(Left);
        // head (1, 5) -> (0, 5) -> (-1, 5)
        snake.move_step();
        assert!(!snake.check_collision());
        snake.move_step();
        assert_eq!(snake.get_head_position(), Position::new(-1, 5));
        assert_eq!(snake.collision(), Some(Collision::Wall));
        assert!(snake.check_collision());
    }

    #[test]
    fn every_wall_is_detected() {
        for dir in [Up, Down, Left, Right] {
            let mut snake = Snake::new(Grid::new(5, 5), 1);
            snake.direction = dir;
            let mut moves = 0;
            while !snake.check_collision() {
                snake.move_step();
                moves += 1;
            }
            assert_eq!(moves, 3, "{:?}", dir);
            assert_eq!(snake.collision(), Some(Collision::Wall));
        }
    }

    #[test]
    fn biting_own_body_is_detected() {
        let mut snake = snake_at(Position::new(5, 5), 5);
        snake.change_direction(Up);
        snake.move_step();
        snake.change_direction(Left);
        snake.move_step();
        assert!(!snake.check_collision());
        snake.change_direction(Down);
        snake.move_step();
        assert_eq!(snake.collision(), Some(Collision::SelfBite));
    }

    #[test]
    fn moving_into_vacated_tail_cell_is_safe() {
        // A 4-long snake turning in a tight square chases its own tail
        let mut snake = snake_at(Position::new(5, 5), 4);
        for dir in [Up, Left, Down] {
            snake.change_direction(dir);
            snake.move_step();
        }
        assert_eq!(snake.get_head_position(), Position::new(4, 5));
        assert!(!snake.check_collision());
    }

    #[test]
    fn collision_check_does_not_mutate() {
        let mut snake = snake_at(Position::new(5, 5), 3);
        snake.grow(2);
        let before: Vec<_> = snake.body().iter().copied().collect();
        snake.check_collision();
        let after: Vec<_> = snake.body().iter().copied().collect();
        assert_eq!(before, after);
        assert_eq!(snake.pending_growth(), 2);
    }
}
