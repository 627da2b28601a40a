use std::collections::{HashSet, VecDeque};

use crate::grid::{Grid, Position};
use crate::rng::GameRng;

/// Random probes tried before falling back to scanning the free cells.
pub const MAX_SAMPLING_ATTEMPTS: usize = 100;

#[derive(Clone, Debug)]
pub struct Food {
    grid: Grid,
    position: Position,
    eaten: bool,
}

impl Food {
    /// Places the food anywhere on the grid; callers that already have a
    /// snake should `respawn` right away.
    pub fn new(grid: Grid, rng: &mut GameRng) -> Self {
        let position = random_cell(grid, rng);
        Food { grid, position, eaten: false }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn eaten(&self) -> bool {
        self.eaten
    }

    /// Picks a uniformly random cell outside `snake_body`. Returns `None`
    /// only when the body covers every cell.
    pub fn generate_position(
        &self,
        snake_body: Option<&VecDeque<Position>>,
        rng: &mut GameRng,
    ) -> Option<Position> {
        let body = match snake_body {
            Some(body) => body,
            None => return Some(random_cell(self.grid, rng)),
        };

        for _ in 0..MAX_SAMPLING_ATTEMPTS {
            let candidate = random_cell(self.grid, rng);
            if !body.contains(&candidate) {
                return Some(candidate);
            }
        }

        let occupied: HashSet<&Position> = body.iter().collect();
        let free: Vec<Position> = self.grid.cells().filter(|c| !occupied.contains(c)).collect();
        rng.choose(&free).copied()
    }

    /// Moves the food to a fresh cell and clears `eaten`. When no free cell
    /// is left nothing changes and `false` is returned.
    pub fn respawn(&mut self, snake_body: Option<&VecDeque<Position>>, rng: &mut GameRng) -> bool {
        match self.generate_position(snake_body, rng) {
            Some(position) => {
                self.position = position;
                self.eaten = false;
                true
            }
            None => false,
        }
    }

    /// Sets `eaten` on a hit. A miss leaves the flag alone.
    pub fn check_eaten(&mut self, head_position: Position) -> bool {
        if head_position == self.position {
            self.eaten = true;
            return true;
        }
        false
    }

    #[cfg(test)]
    pub(crate) fn place_at(&mut self, position: Position) {
        self.position = position;
    }
}

fn random_cell(grid: Grid, rng: &mut GameRng) -> Position {
    Position::new(
        rng.gen_range(0, grid.width() as i32),
        rng.gen_range(0, grid.height() as i32),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body_of(cells: &[(i32, i32)]) -> VecDeque<Position> {
        cells.iter().map(|&(x, y)| Position::new(x, y)).collect()
    }

    #[test]
    fn new_food_is_on_grid_and_fresh() {
        let grid = Grid::new(6, 4);
        let mut rng = GameRng::new(3);
        for _ in 0..200 {
            let food = Food::new(grid, &mut rng);
            assert!(grid.contains(food.position()));
            assert!(!food.eaten());
        }
    }

    #[test]
    fn respawn_never_lands_on_the_snake() {
        let grid = Grid::new(4, 4);
        let body = body_of(&[(0, 0), (1, 0), (2, 0), (3, 0), (3, 1), (2, 1), (1, 1), (0, 1), (0, 2), (1, 2)]);

        for seed in 0..50 {
            let mut rng = GameRng::new(seed);
            let mut food = Food::new(grid, &mut rng);
            for _ in 0..100 {
                assert!(food.respawn(Some(&body), &mut rng));
                assert!(!body.contains(&food.position()));
                assert!(grid.contains(food.position()));
            }
        }
    }

    #[test]
    fn every_free_cell_is_reachable() {
        let grid = Grid::new(3, 3);
        let body = body_of(&[(1, 1), (0, 1), (0, 0)]);
        let mut rng = GameRng::new(11);
        let food = Food::new(grid, &mut rng);

        let mut seen = HashSet::new();
        for _ in 0..2000 {
            seen.insert(food.generate_position(Some(&body), &mut rng).unwrap());
        }
        assert_eq!(seen.len(), grid.cell_count() - body.len());
    }

    #[test]
    fn single_free_cell_is_found() {
        let grid = Grid::new(3, 2);
        let body = body_of(&[(0, 0), (1, 0), (2, 0), (2, 1), (1, 1)]);
        let mut rng = GameRng::new(5);
        let mut food = Food::new(grid, &mut rng);

        for _ in 0..20 {
            assert!(food.respawn(Some(&body), &mut rng));
            assert_eq!(food.position(), Position::new(0, 1));
        }
    }

    #[test]
    fn full_grid_leaves_food_untouched() {
        let grid = Grid::new(2, 2);
        let body = body_of(&[(0, 0), (1, 0), (1, 1), (0, 1)]);
        let mut rng = GameRng::new(9);
        let mut food = Food::new(grid, &mut rng);
        let before = food.position();
        assert!(food.check_eaten(before));

        assert_eq!(food.generate_position(Some(&body), &mut rng), None);
        assert!(!food.respawn(Some(&body), &mut rng));
        assert_eq!(food.position(), before);
        assert!(food.eaten());
    }

    #[test]
    fn eaten_flag_is_sticky_until_respawn() {
        let grid = Grid::new(8, 8);
        let mut rng = GameRng::new(1);
        let mut food = Food::new(grid, &mut rng);
        let pos = food.position();
        let elsewhere = Position::new(pos.x + 1, pos.y);

        assert!(!food.check_eaten(elsewhere));
        assert!(!food.eaten());

        assert!(food.check_eaten(pos));
        assert!(food.eaten());
        assert!(!food.check_eaten(elsewhere));
        assert!(food.eaten());

        assert!(food.respawn(None, &mut rng));
        assert!(!food.eaten());
    }
}
