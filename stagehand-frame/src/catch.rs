//! A small pixel game.
mod config;
use crate::ImageSpace;
use anyhow::{ensure, Result};
pub use config::CatchConfig;
use log::trace;
use ndarray::{s, Array3, ArrayD};
use rand::{rngs::SmallRng, Rng, SeedableRng};
use stagehand_core::{
    error::StagehandError,
    space::{DiscreteSpace, Space},
    Env,
};

/// Intensity of the ball and the paddle.
const FOREGROUND: u8 = 255;

/// Catch the falling ball with the paddle.
///
/// The ball starts on the first row in a random column and falls one row per
/// step. The paddle sits on the last row and is moved by the actions
/// `1` (left), `2` (stay) and `3` (right). The episode ends when the ball reaches
/// the last row, with reward `1` if the paddle is under the ball and `-1`
/// otherwise; all other steps give `0`.
///
/// The state is an RGB frame of shape `(rows * cell_size, cols * cell_size, 3)`.
pub struct CatchEnv {
    config: CatchConfig,
    rng: SmallRng,
    act_space: DiscreteSpace,
    ball: (usize, usize),
    paddle: usize,
    reward: f32,
    terminated: bool,
}

impl CatchEnv {
    /// Builds the environment, ready for the first step.
    pub fn build(config: &CatchConfig) -> Result<Self> {
        ensure!(config.rows >= 2, "catch needs at least 2 rows, got {}", config.rows);
        ensure!(config.cols >= 1, "catch needs at least 1 column");
        ensure!(config.cell_size >= 1, "cell size must be positive");

        let mut env = Self {
            config: config.clone(),
            rng: SmallRng::seed_from_u64(config.seed),
            act_space: DiscreteSpace::new(3)?,
            ball: (0, 0),
            paddle: 0,
            reward: 0.0,
            terminated: false,
        };
        env.start_episode();
        Ok(env)
    }

    fn start_episode(&mut self) {
        self.ball = (0, self.rng.gen_range(0..self.config.cols));
        self.paddle = self.config.cols / 2;
        self.reward = 0.0;
        self.terminated = false;
    }

    /// Row and column of the ball.
    pub fn ball(&self) -> (usize, usize) {
        self.ball
    }

    /// Column of the paddle.
    pub fn paddle(&self) -> usize {
        self.paddle
    }

    /// Height and width of the frame in pixels.
    pub fn frame_size(&self) -> (usize, usize) {
        (
            self.config.rows * self.config.cell_size,
            self.config.cols * self.config.cell_size,
        )
    }

    fn paint(frame: &mut Array3<u8>, cell_size: usize, row: usize, col: usize) {
        let (r, c) = (row * cell_size, col * cell_size);
        frame
            .slice_mut(s![r..r + cell_size, c..c + cell_size, ..])
            .map_inplace(|v| *v = FOREGROUND);
    }
}

impl Env for CatchEnv {
    type State = ArrayD<u8>;
    type Act = i64;
    type Reward = f32;
    type Terminal = bool;
    type ActSpace = DiscreteSpace;
    type StateSpace = ImageSpace;

    fn state(&self) -> Result<ArrayD<u8>> {
        let (h, w) = self.frame_size();
        let cell_size = self.config.cell_size;
        let mut frame = Array3::<u8>::zeros((h, w, 3));
        Self::paint(&mut frame, cell_size, self.ball.0, self.ball.1);
        Self::paint(&mut frame, cell_size, self.config.rows - 1, self.paddle);
        Ok(frame.into_dyn())
    }

    fn reward(&self) -> f32 {
        self.reward
    }

    fn is_terminated(&self) -> bool {
        self.terminated
    }

    fn act(&mut self, act: &i64) -> Result<()> {
        if self.terminated {
            return Err(StagehandError::EpisodeOver.into());
        }
        ensure!(self.act_space.contains(act), "invalid action {} for catch", act);

        self.paddle = match *act {
            1 => self.paddle.saturating_sub(1),
            3 => (self.paddle + 1).min(self.config.cols - 1),
            _ => self.paddle,
        };
        self.ball.0 += 1;

        if self.ball.0 == self.config.rows - 1 {
            self.terminated = true;
            self.reward = if self.ball.1 == self.paddle { 1.0 } else { -1.0 };
        } else {
            self.reward = 0.0;
        }
        trace!(
            "ball = {:?}, paddle = {}, reward = {}",
            self.ball,
            self.paddle,
            self.reward
        );
        Ok(())
    }

    fn reset(&mut self) -> Result<()> {
        self.start_episode();
        Ok(())
    }

    fn action_space(&self) -> DiscreteSpace {
        self.act_space
    }

    fn state_space(&self) -> ImageSpace {
        let (h, w) = self.frame_size();
        ImageSpace::new(vec![h, w, 3], 0.0, FOREGROUND as f32)
    }
}
