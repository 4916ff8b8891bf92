use crate::grid::Grid;
use crate::pos::Pos;
use crate::snake::Snake;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub struct FoodPlacer {
    rng: SmallRng,
    avoid_snake_body: bool,
}

impl FoodPlacer {
    pub fn new(avoid_snake_body: bool, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self { rng, avoid_snake_body }
    }

    /// Random cell in the grid's food area.
    ///
    /// Without `avoid_snake_body` the snake is not consulted, so food can land
    /// on the body. With it, a free cell is chosen uniformly; a full board
    /// falls back to the unrestricted pick.
    pub fn place(&mut self, grid: &Grid, snake: &Snake) -> Pos {
        if self.avoid_snake_body {
            let free: Vec<Pos> = (0..grid.food_rows)
                .flat_map(|y| (0..grid.food_cols).map(move |x| Pos::new(x, y)))
                .filter(|&p| !snake.contains(p))
                .collect();
            if let Some(&p) = free.choose(&mut self.rng) {
                return p;
            }
        }
        Pos::new(
            self.rng.gen_range(0..grid.food_cols),
            self.rng.gen_range(0..grid.food_rows),
        )
    }
}
