use std::{thread::sleep, time::{Duration, Instant}};

use crate::board::Board;
use crate::config::GameConfig;
use crate::food::Food;
use crate::input::InputSource;
use crate::render::{Canvas, Palette};
use crate::snake::{Snake, Direction, MoveResult::{*, self}};

use anyhow::Result;
use log::{debug, info, trace};
use rand::{rngs::StdRng, SeedableRng};

/// Fixed-rate clock. Each `wait` sleeps for whatever is left of the interval
/// since the previous tick.
pub struct Ticker {
    interval: Duration,
    next: Instant,
}

impl Ticker {
    pub fn new(interval: Duration) -> Self {
        Ticker { interval, next: Instant::now() + interval }
    }

    pub fn wait(&mut self) {
        let now = Instant::now();
        if self.next > now {
            sleep(self.next - now);
            self.next += self.interval;
        } else {
            // Fell behind, don't try to catch up with a burst of ticks
            self.next = now + self.interval;
        }
    }
}

pub struct SnakeGame {
    board: Board,
    snake: Snake,
    food: Food,
    palette: Palette,
    rng: StdRng,
}

impl SnakeGame {
    pub fn new(config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, rng)
    }

    pub fn with_rng(config: &GameConfig, mut rng: StdRng) -> Self {
        let board = Board::new(config.grid_width, config.grid_height);
        let snake = Snake::new(board.center());
        let food = Food::new(&board, &mut rng);

        SnakeGame { board, snake, food, palette: config.palette.clone(), rng }
    }

    pub fn board(&self) -> Board {
        self.board
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn steer(&mut self, direction: Direction) {
        self.snake.set_pending(direction);
    }

    /// Commits the buffered turn, moves the snake and relocates eaten food.
    ///
    /// Food is checked once per tick: inside `advance` for a normal move, here
    /// against the center cell after a reset.
    pub fn tick(&mut self) -> MoveResult {
        self.snake.commit();

        let res = self.snake.advance(&self.board, self.food.position(), &mut self.rng);

        match &res {
            Moved { new_head, ate } => {
                trace!("head at ({}, {})", new_head.x, new_head.y);
                if *ate {
                    debug!("food eaten, target length {}", self.snake.target_len());
                    self.food.relocate(&self.board, &mut self.rng);
                }
            }
            Reset => {
                debug!("self-collision, snake reset heading {:?}", self.snake.direction());
                // The reset head can land on the food too
                if self.snake.head() == self.food.position() {
                    self.snake.grow();
                    debug!("food eaten at reset, target length {}", self.snake.target_len());
                    self.food.relocate(&self.board, &mut self.rng);
                }
            }
        }

        res
    }

    /// Draws the whole board from scratch.
    pub fn draw_initial<C: Canvas>(&self, canvas: &mut C) -> Result<()> {
        canvas.clear_board()?;
        self.food.draw(canvas, &self.palette)?;
        self.snake.draw(canvas, &self.palette)?;
        canvas.present()
    }

    /// Draws the changes of one tick: erase the vacated tail, then food, then snake.
    pub fn draw_update<C: Canvas>(&self, canvas: &mut C, res: &MoveResult) -> Result<()> {
        if *res == Reset {
            canvas.clear_board()?;
        }

        if let Some(last) = self.snake.last() {
            canvas.draw_cell(last, self.palette.background, self.palette.background)?;
        }

        self.food.draw(canvas, &self.palette)?;
        self.snake.draw(canvas, &self.palette)?;
        canvas.present()
    }
}

/// Runs the game until the input source asks to quit.
pub fn run<C, I>(game: &mut SnakeGame, canvas: &mut C, input: &mut I, interval: Duration) -> Result<()>
where
    C: Canvas,
    I: InputSource,
{
    let mut ticker = Ticker::new(interval);
    let mut ticks: u64 = 0;

    game.draw_initial(canvas)?;

    loop {
        ticker.wait();

        let polled = input.poll_events()?;
        if polled.quit {
            info!("quit requested after {} ticks", ticks);
            break;
        }

        for dir in polled.directions {
            game.steer(dir);
        }

        let res = game.tick();
        game.draw_update(canvas, &res)?;
        ticks += 1;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Cell;
    use crate::input::{testing::ScriptedInput, PolledInput};
    use crate::render::testing::{DrawOp, RecordingCanvas};
    use crate::snake::Direction::*;

    fn game(width: u16, height: u16, seed: u64) -> SnakeGame {
        let config = GameConfig { grid_width: width, grid_height: height, ..Default::default() };
        SnakeGame::with_rng(&config, StdRng::seed_from_u64(seed))
    }

    fn turn(dirs: &[Direction]) -> PolledInput {
        PolledInput { quit: false, directions: dirs.to_vec() }
    }

    #[test]
    fn test_initial_state() {
        let game = game(32, 24, 1);
        assert_eq!(game.snake().cells().len(), 1);
        assert_eq!(game.snake().head(), Cell::new(16, 12));
        assert_eq!(game.snake().direction(), Right);
        assert!(game.board.contains(game.food.position()));
    }

    #[test]
    fn test_eat_food_end_to_end() {
        let mut game = game(20, 24, 5);
        assert_eq!(game.snake().head(), Cell::new(10, 12));
        game.food = Food::at(Cell::new(11, 12));

        let res = game.tick();

        assert_eq!(res, Moved { new_head: Cell::new(11, 12), ate: true });
        assert_eq!(game.snake().head(), Cell::new(11, 12));
        assert_eq!(game.snake().target_len(), 2);
        assert_eq!(game.snake().len(), 2);
        assert!(game.board.contains(game.food.position()));
    }

    #[test]
    fn test_food_relocation_always_in_bounds() {
        let mut game = game(20, 15, 11);

        for _ in 0..1000 {
            let head = game.snake().head();
            let next = game.board.step(head, game.snake().direction().delta());
            game.food = Food::at(next);

            let res = game.tick();

            assert!(matches!(res, Moved { ate: true, .. }) || res == Reset);
            assert!(game.board.contains(game.food.position()));
        }
    }

    #[test]
    fn test_food_left_alone_without_eating() {
        let mut game = game(20, 15, 3);
        game.food = Food::at(Cell::new(0, 0));

        for _ in 0..5 {
            game.tick();
        }

        assert_eq!(game.food.position(), Cell::new(0, 0));
        assert_eq!(game.snake().head(), Cell::new(15, 7));
    }

    #[test]
    fn test_steer_goes_through_buffer() {
        let mut game = game(20, 15, 3);
        game.food = Food::at(Cell::new(0, 0));

        game.steer(Left);
        game.tick();
        assert_eq!(game.snake().direction(), Right);

        game.steer(Up);
        game.steer(Left);
        game.tick();
        assert_eq!(game.snake().direction(), Up);
        assert_eq!(game.snake().head(), Cell::new(11, 6));
    }

    #[test]
    fn test_reset_redraws_board() {
        let mut game = game(20, 15, 3);
        game.food = Food::at(Cell::new(0, 0));
        game.snake = Snake::from_cells(
            vec![Cell::new(5, 6), Cell::new(6, 6), Cell::new(6, 5), Cell::new(5, 5)],
            Up,
        );
        let mut canvas = RecordingCanvas::default();

        let res = game.tick();
        game.draw_update(&mut canvas, &res).unwrap();

        assert_eq!(res, Reset);
        assert_eq!(canvas.ops.first(), Some(&DrawOp::Clear));
        assert_eq!(
            canvas.ops[1..].to_vec(),
            vec![
                DrawOp::Cell(Cell::new(0, 0), game.palette.food, game.palette.border),
                DrawOp::Cell(Cell::new(10, 7), game.palette.snake, game.palette.border),
                DrawOp::Present,
            ]
        );
    }

    #[test]
    fn test_reset_onto_food_eats_it() {
        let mut game = game(20, 15, 3);
        game.food = Food::at(Cell::new(10, 7));
        game.snake = Snake::from_cells(
            vec![Cell::new(5, 6), Cell::new(6, 6), Cell::new(6, 5), Cell::new(5, 5)],
            Up,
        );

        let res = game.tick();

        assert_eq!(res, Reset);
        assert_eq!(game.snake().cells().len(), 1);
        assert_eq!(game.snake().head(), Cell::new(10, 7));
        assert_eq!(game.snake().target_len(), 2);
        assert!(game.board.contains(game.food.position()));

        // The grown target keeps the tail on the next move
        game.food = Food::at(Cell::new(0, 0));
        game.tick();
        assert_eq!(game.snake().len(), 2);
    }

    #[test]
    fn test_relocated_food_may_land_on_snake() {
        let mut game = game(2, 2, 17);
        game.snake = Snake::from_cells(
            vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(1, 1)],
            Left,
        );

        let mut landed_on_body = false;
        for _ in 0..50 {
            game.food.relocate(&game.board, &mut game.rng);
            assert!(game.board.contains(game.food.position()));
            if game.snake().cells().contains(&game.food.position()) {
                landed_on_body = true;
            }
        }

        assert!(landed_on_body);
    }

    #[test]
    fn test_update_erases_tail_before_drawing() {
        let mut game = game(20, 15, 3);
        game.food = Food::at(Cell::new(0, 0));
        let mut canvas = RecordingCanvas::default();

        let res = game.tick();
        game.draw_update(&mut canvas, &res).unwrap();

        let bg = game.palette.background;
        assert_eq!(
            canvas.ops,
            vec![
                DrawOp::Cell(Cell::new(10, 7), bg, bg),
                DrawOp::Cell(Cell::new(0, 0), game.palette.food, game.palette.border),
                DrawOp::Cell(Cell::new(11, 7), game.palette.snake, game.palette.border),
                DrawOp::Present,
            ]
        );
    }

    #[test]
    fn test_run_until_quit() {
        let mut game = game(20, 15, 3);
        game.food = Food::at(Cell::new(0, 0));
        let mut canvas = RecordingCanvas::default();
        let mut input = ScriptedInput::new(vec![
            turn(&[]),
            turn(&[Down]),
            turn(&[Up, Left]),
        ]);

        run(&mut game, &mut canvas, &mut input, Duration::from_millis(0)).unwrap();

        // One initial frame plus one per completed tick
        assert_eq!(canvas.frames(), 4);
        assert_eq!(canvas.ops.first(), Some(&DrawOp::Clear));
        assert_eq!(game.snake().direction(), Left);
        assert_eq!(game.snake().head(), Cell::new(10, 8));
    }

    #[test]
    fn test_quit_skips_rest_of_tick() {
        let mut game = game(20, 15, 3);
        let mut canvas = RecordingCanvas::default();
        let mut input = ScriptedInput::new(vec![PolledInput { quit: true, directions: vec![Up] }]);

        run(&mut game, &mut canvas, &mut input, Duration::from_millis(0)).unwrap();

        assert_eq!(canvas.frames(), 1);
        assert_eq!(game.snake().head(), Cell::new(10, 7));
        assert_eq!(game.snake().direction(), Right);
    }

    #[test]
    fn test_ticker_keeps_rate() {
        let mut ticker = Ticker::new(Duration::from_millis(5));
        let start = Instant::now();
        for _ in 0..4 {
            ticker.wait();
        }
        assert!(start.elapsed() >= Duration::from_millis(15));
    }
}
