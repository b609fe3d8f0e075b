//! The games
//!
//! Every game is a plain struct owning its state, seeded at construction and
//! advanced by fixed steps through the [`Game`] trait.

use serde::{Deserialize, Serialize};

use crate::error::{ArcadeError, Result};
use crate::platform::{FixedTimestep, InputState, Key};
use crate::renderer::DrawList;

pub mod asteroids;
pub mod basic_3d;
pub mod bouncing_ball;
pub mod brick_breaker;
pub mod explorer_3d;
pub mod flappy;
pub mod gun_fight;
pub mod life;
pub mod physics_playground;
pub mod physics_sandbox;
pub mod platformer;
pub mod player_goal;
pub mod pong;
pub mod shmup;
pub mod sokoban;
pub mod solar_system;
pub mod tetris;
pub mod vector_field;

/// A single self-contained game
pub trait Game {
    fn id(&self) -> GameId;

    /// Window size in logical pixels
    fn screen_size(&self) -> (u32, u32);

    /// Advance by one fixed step
    fn update(&mut self, input: &InputState, dt: f32);

    /// Record this frame's drawing
    fn draw(&self, list: &mut DrawList);

    /// One-line status for logs (score, lives, generation...)
    fn summary(&self) -> String {
        String::new()
    }

    fn title(&self) -> &'static str {
        self.id().title()
    }
}

/// Shared lifecycle for games with a start screen and an end
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Phase {
    #[default]
    Ready,
    Playing,
    GameOver,
    Won,
}

/// Every game in the collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameId {
    #[serde(rename = "bouncing_ball")]
    BouncingBall,
    #[serde(rename = "player_goal")]
    PlayerGoal,
    #[serde(rename = "pong")]
    Pong,
    #[serde(rename = "pong_2p")]
    PongTwoPlayer,
    #[serde(rename = "brick_breaker")]
    BrickBreaker,
    #[serde(rename = "flappy")]
    Flappy,
    #[serde(rename = "asteroids")]
    Asteroids,
    #[serde(rename = "shmup")]
    Shmup,
    #[serde(rename = "platformer")]
    Platformer,
    #[serde(rename = "platformer_camera")]
    PlatformerCamera,
    #[serde(rename = "platformer_clone")]
    PlatformerClone,
    #[serde(rename = "gun_fight")]
    GunFight,
    #[serde(rename = "tetris")]
    Tetris,
    #[serde(rename = "sokoban")]
    Sokoban,
    #[serde(rename = "life")]
    Life,
    #[serde(rename = "basic_3d")]
    Basic3d,
    #[serde(rename = "vector_field")]
    VectorField,
    #[serde(rename = "solar_system")]
    SolarSystem,
    #[serde(rename = "physics_playground")]
    PhysicsPlayground,
    #[serde(rename = "physics_sandbox")]
    PhysicsSandbox,
    #[serde(rename = "explorer_3d")]
    Explorer3d,
}

impl GameId {
    pub const ALL: [GameId; 21] = [
        GameId::BouncingBall,
        GameId::PlayerGoal,
        GameId::Pong,
        GameId::PongTwoPlayer,
        GameId::BrickBreaker,
        GameId::Flappy,
        GameId::Asteroids,
        GameId::Shmup,
        GameId::Platformer,
        GameId::PlatformerCamera,
        GameId::PlatformerClone,
        GameId::GunFight,
        GameId::Tetris,
        GameId::Sokoban,
        GameId::Life,
        GameId::Basic3d,
        GameId::VectorField,
        GameId::SolarSystem,
        GameId::PhysicsPlayground,
        GameId::PhysicsSandbox,
        GameId::Explorer3d,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameId::BouncingBall => "bouncing_ball",
            GameId::PlayerGoal => "player_goal",
            GameId::Pong => "pong",
            GameId::PongTwoPlayer => "pong_2p",
            GameId::BrickBreaker => "brick_breaker",
            GameId::Flappy => "flappy",
            GameId::Asteroids => "asteroids",
            GameId::Shmup => "shmup",
            GameId::Platformer => "platformer",
            GameId::PlatformerCamera => "platformer_camera",
            GameId::PlatformerClone => "platformer_clone",
            GameId::GunFight => "gun_fight",
            GameId::Tetris => "tetris",
            GameId::Sokoban => "sokoban",
            GameId::Life => "life",
            GameId::Basic3d => "basic_3d",
            GameId::VectorField => "vector_field",
            GameId::SolarSystem => "solar_system",
            GameId::PhysicsPlayground => "physics_playground",
            GameId::PhysicsSandbox => "physics_sandbox",
            GameId::Explorer3d => "explorer_3d",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase().replace('-', "_");
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }

    /// Like [`GameId::from_str`] but with an error naming the input
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| ArcadeError::UnknownGame(s.to_string()))
    }

    /// Window title
    pub fn title(&self) -> &'static str {
        match self {
            GameId::BouncingBall => "Bouncing Ball",
            GameId::PlayerGoal => "Player and Goal",
            GameId::Pong => "Pong",
            GameId::PongTwoPlayer => "Pong - 2 Players",
            GameId::BrickBreaker => "Brick Breaker",
            GameId::Flappy => "Flappy Bird",
            GameId::Asteroids => "Asteroids",
            GameId::Shmup => "Shmup",
            GameId::Platformer => "2D Platformer",
            GameId::PlatformerCamera => "2D Platformer - Camera",
            GameId::PlatformerClone => "2D Platformer - Coins and Enemies",
            GameId::GunFight => "Gun Fight",
            GameId::Tetris => "Tetris Clone",
            GameId::Sokoban => "Sokoban",
            GameId::Life => "Conway's Game of Life",
            GameId::Basic3d => "Basic 3D",
            GameId::VectorField => "Vector Field",
            GameId::SolarSystem => "Solar System",
            GameId::PhysicsPlayground => "Physics Playground",
            GameId::PhysicsSandbox => "3D Physics Sandbox",
            GameId::Explorer3d => "3D Character Control",
        }
    }

    /// Build a fresh game
    ///
    /// Fails only when a game's built-in level text does not parse.
    pub fn create(&self, seed: u64) -> Result<Box<dyn Game>> {
        Ok(match self {
            GameId::BouncingBall => Box::new(bouncing_ball::BouncingBall::new()),
            GameId::PlayerGoal => Box::new(player_goal::PlayerGoal::new(seed)),
            GameId::Pong => Box::new(pong::Pong::new(pong::Mode::VsCpu, seed)),
            GameId::PongTwoPlayer => Box::new(pong::Pong::new(pong::Mode::TwoPlayer, seed)),
            GameId::BrickBreaker => Box::new(brick_breaker::BrickBreaker::new(seed)),
            GameId::Flappy => Box::new(flappy::Flappy::new(seed)),
            GameId::Asteroids => Box::new(asteroids::Asteroids::new(seed)),
            GameId::Shmup => Box::new(shmup::Shmup::new(seed)),
            GameId::Platformer => Box::new(platformer::Platformer::new(platformer::Variant::Basic)?),
            GameId::PlatformerCamera => {
                Box::new(platformer::Platformer::new(platformer::Variant::Camera)?)
            }
            GameId::PlatformerClone => {
                Box::new(platformer::Platformer::new(platformer::Variant::Clone)?)
            }
            GameId::GunFight => Box::new(gun_fight::GunFight::new()),
            GameId::Tetris => Box::new(tetris::Tetris::new(seed)),
            GameId::Sokoban => Box::new(sokoban::Sokoban::new()?),
            GameId::Life => Box::new(life::Life::new(seed)),
            GameId::Basic3d => Box::new(basic_3d::Basic3d::new()),
            GameId::VectorField => Box::new(vector_field::VectorField::new(seed)),
            GameId::SolarSystem => Box::new(solar_system::SolarSystem::new()),
            GameId::PhysicsPlayground => {
                Box::new(physics_playground::PhysicsPlayground::new(seed))
            }
            GameId::PhysicsSandbox => Box::new(physics_sandbox::PhysicsSandbox::new()),
            GameId::Explorer3d => Box::new(explorer_3d::Explorer3d::new()),
        })
    }
}

/// Feed one rendered frame's worth of time to a game
///
/// Runs as many fixed steps as the accumulator allows and clears one-shot
/// input after each of them. Returns the number of steps taken.
pub fn advance_frame(
    game: &mut dyn Game,
    input: &mut InputState,
    clock: &mut FixedTimestep,
    frame_dt: f32,
) -> u32 {
    let steps = clock.advance(frame_dt);
    for _ in 0..steps {
        game.update(input, clock.step());
        input.end_step();
    }
    steps
}

/// Run a game with nobody at the keyboard
///
/// `start` is tapped on the first step and released right after, so title
/// screens are passed and nothing stays held. `each_frame` sees the game after
/// every frame. Returns the number of steps taken.
pub fn run_unattended(
    game: &mut dyn Game,
    start: Key,
    frames: u32,
    frame_dt: f32,
    mut each_frame: impl FnMut(u32, &dyn Game),
) -> u32 {
    let mut input = InputState::pressing(&[start]);
    let mut clock = FixedTimestep::default();
    let mut steps = 0;
    for frame in 0..frames {
        steps += advance_frame(game, &mut input, &mut clock, frame_dt);
        if steps > 0 {
            input.release(start);
        }
        each_frame(frame, &*game);
    }
    steps
}

/// Big centred banner with a hint line below it
pub(crate) fn banner(list: &mut DrawList, screen: (u32, u32), title: &str, hint: &str, color: crate::renderer::Color) {
    let (w, h) = (screen.0 as f32, screen.1 as f32);
    list.text_centered(title, w / 2.0, h / 2.0 - 40.0, 40.0, color);
    if !hint.is_empty() {
        list.text_centered(hint, w / 2.0, h / 2.0 + 10.0, 20.0, crate::renderer::colors::LIGHTGRAY);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_id_round_trip() {
        for id in GameId::ALL {
            assert_eq!(GameId::from_str(id.as_str()), Some(id));
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
        assert_eq!(GameId::from_str("Pong-2P"), Some(GameId::PongTwoPlayer));
        assert!(matches!(GameId::parse("chess"), Err(ArcadeError::UnknownGame(_))));
    }

    #[test]
    fn test_every_game_builds_runs_and_draws() {
        for id in GameId::ALL {
            let mut game = id.create(1).unwrap();
            assert_eq!(game.id(), id);
            let (w, h) = game.screen_size();
            assert!(w >= 400 && h >= 300, "{id:?} window {w}x{h}");

            let steps = run_unattended(game.as_mut(), Key::Space, 120, 1.0 / 60.0, |_, _| {});
            assert!(steps >= 119, "{id:?} ran {steps} steps");
            let mut list = DrawList::new();
            game.draw(&mut list);
            assert!(list.clear_color().is_some(), "{id:?} never clears");
            assert!(list.len() > 1, "{id:?} draws nothing");
        }
    }

    #[test]
    fn test_unattended_start_key_is_only_tapped() {
        let mut sandbox = physics_sandbox::PhysicsSandbox::new();
        let start_y = sandbox.camera.position.y;
        run_unattended(&mut sandbox, Key::Space, 60, 1.0 / 60.0, |_, _| {});
        // One step of flying up at 15 u/s, then nothing
        let climbed = sandbox.camera.position.y - start_y;
        assert!((climbed - 15.0 / 60.0).abs() < 1e-4, "climbed {climbed}");
    }

    #[test]
    fn test_unattended_tap_starts_ready_games() {
        let mut flappy = flappy::Flappy::new(3);
        let mut frames = 0;
        run_unattended(&mut flappy, Key::Space, 10, 1.0 / 60.0, |_, _| frames += 1);
        assert_eq!(frames, 10);
        assert_ne!(flappy.phase, Phase::Ready);
    }

    #[test]
    fn test_advance_frame_clears_one_shots() {
        let mut game = GameId::BouncingBall.create(0).unwrap();
        let mut input = InputState::pressing(&[Key::Space]);
        let mut clock = FixedTimestep::default();
        let steps = advance_frame(game.as_mut(), &mut input, &mut clock, 2.0 / 60.0 + 1e-4);
        assert_eq!(steps, 2);
        assert!(!input.is_pressed(Key::Space));
        assert!(input.is_down(Key::Space));
    }

    #[test]
    fn test_titles_are_unique() {
        let mut titles: Vec<_> = GameId::ALL.iter().map(|id| id.title()).collect();
        titles.sort();
        titles.dedup();
        assert_eq!(titles.len(), 21);
    }
}
