//! Runtime settings
//!
//! Persisted as JSON: LocalStorage in the browser, an optional file on native.
//! Command-line flags override whatever was loaded.

use serde::{Deserialize, Serialize};

use crate::error::{ArcadeError, Result};
use crate::games::GameId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Game to launch
    pub game: GameId,
    /// RNG seed; `None` picks one from the clock
    pub seed: Option<u64>,
    /// Show FPS counter
    pub show_fps: bool,
    /// Frames simulated by the headless runner
    pub headless_frames: u32,
    /// Frame time fed to the headless runner (seconds)
    pub frame_dt: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            game: GameId::BouncingBall,
            seed: None,
            show_fps: true,
            headless_frames: 600,
            frame_dt: 1.0 / 60.0,
        }
    }
}

/// What the binary should do after parsing its arguments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Run,
    List,
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "arcade_classics_settings";

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Seed to use for this run, falling back to `fallback` when unset
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }

    /// Apply command-line flags (program name already stripped)
    ///
    /// `--config <path>` is handled by the caller before this runs.
    pub fn apply_args<I, S>(&mut self, args: I) -> Result<Command>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut command = Command::Run;
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            let arg = arg.as_ref();
            let mut value = |flag: &str| {
                args.next()
                    .map(|v| v.as_ref().to_string())
                    .ok_or_else(|| ArcadeError::Argument(format!("{flag} needs a value")))
            };
            match arg {
                "--list" => command = Command::List,
                "--game" => self.game = GameId::parse(&value(arg)?)?,
                "--seed" => {
                    let v = value(arg)?;
                    self.seed = Some(
                        v.parse()
                            .map_err(|_| ArcadeError::Argument(format!("bad seed '{v}'")))?,
                    );
                }
                "--frames" => {
                    let v = value(arg)?;
                    self.headless_frames = v
                        .parse()
                        .map_err(|_| ArcadeError::Argument(format!("bad frame count '{v}'")))?;
                }
                "--config" => {
                    value(arg)?;
                }
                "--no-fps" => self.show_fps = false,
                other => return Err(ArcadeError::Argument(format!("unknown argument '{other}'"))),
            }
        }
        Ok(command)
    }

    /// Path given with `--config`, if any
    pub fn config_path<S: AsRef<str>>(args: &[S]) -> Option<&str> {
        args.iter()
            .position(|a| a.as_ref() == "--config")
            .and_then(|i| args.get(i + 1))
            .map(|s| s.as_ref())
    }

    /// Load settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_path(path: &std::path::Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {e}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        log::debug!("Settings not persisted on native (key {})", Self::STORAGE_KEY);
    }
}
