//! Static arena tables and tunables.
//!
//! The built-in tables describe a 500x460 arena with four rows of three
//! turrets (top, left, right, bottom edges) and a decoration in each corner.
//! A JSON file may replace any of it; missing fields fall back to the
//! defaults and the result is validated before use.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assets::AssetMetadata;
use crate::entities::FireType;

pub const TURRET_COUNT: usize = 12;
pub const ROW_LEN: usize = 3;
pub const CORNER_COUNT: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurretPlacement {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    pub fire_type: FireType,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpriteOffset {
    pub sx: f32,
    pub sy: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CornerPlacement {
    pub x: f32,
    pub y: f32,
    pub angle: f32,
    #[serde(default)]
    pub sprite: Option<SpriteOffset>,
}

/// Key label shown next to a turret.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OverlayLabel {
    pub x: f32,
    pub y: f32,
    pub letter: char,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSize {
    pub width: f32,
    pub height: f32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    pub surface: SurfaceSize,
    /// Rows of three in order: top, left, right, bottom.
    pub turrets: Vec<TurretPlacement>,
    pub corners: Vec<CornerPlacement>,
    pub overlays: Vec<OverlayLabel>,
    pub assets: AssetMetadata,

    /// Ticks for a turret to climb one intensity level.
    pub fire_delay: u32,
    pub fire_speed: f32,
    pub player_speed: f32,
    /// Distance the player keeps from every surface edge.
    pub player_margin: f32,
    pub player_fire_cooldown: u32,
    pub player_pool_size: usize,
    pub bullet_speed: f32,
    pub toggle_cooldown: u32,
    pub background_speed: f32,
}

fn turret(x: f32, y: f32, angle: f32, fire_type: FireType) -> TurretPlacement {
    TurretPlacement { x, y, angle, fire_type }
}

fn label(x: f32, y: f32, letter: char) -> OverlayLabel {
    OverlayLabel { x, y, letter }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        ArenaConfig {
            surface: SurfaceSize { width: 500.0, height: 460.0 },
            turrets: vec![
                turret(100.0, 0.0, 0.0, FireType::Down),
                turret(200.0, 0.0, 0.0, FireType::Down),
                turret(300.0, 0.0, 0.0, FireType::Down),
                turret(-20.0, 100.0, 270.0, FireType::Right),
                turret(-20.0, 200.0, 270.0, FireType::Right),
                turret(-20.0, 300.0, 270.0, FireType::Right),
                turret(420.0, 100.0, 90.0, FireType::Left),
                turret(420.0, 200.0, 90.0, FireType::Left),
                turret(420.0, 300.0, 90.0, FireType::Left),
                turret(100.0, 400.0, 180.0, FireType::Up),
                turret(200.0, 400.0, 180.0, FireType::Up),
                turret(300.0, 400.0, 180.0, FireType::Up),
            ],
            corners: vec![
                CornerPlacement {
                    x: 0.0,
                    y: 0.0,
                    angle: 0.0,
                    sprite: Some(SpriteOffset { sx: 0.0, sy: 100.0 }),
                },
                CornerPlacement { x: 400.0, y: 0.0, angle: 90.0, sprite: None },
                CornerPlacement { x: 0.0, y: 360.0, angle: 270.0, sprite: None },
                CornerPlacement {
                    x: 400.0,
                    y: 360.0,
                    angle: 0.0,
                    sprite: Some(SpriteOffset { sx: 0.0, sy: 200.0 }),
                },
            ],
            overlays: vec![
                label(150.0, 70.0, 'A'),
                label(250.0, 70.0, 'S'),
                label(350.0, 70.0, 'D'),
                label(70.0, 130.0, 'A'),
                label(70.0, 230.0, 'S'),
                label(70.0, 330.0, 'D'),
                label(430.0, 130.0, 'J'),
                label(430.0, 230.0, 'K'),
                label(430.0, 330.0, 'L'),
                label(150.0, 390.0, 'J'),
                label(250.0, 390.0, 'K'),
                label(350.0, 390.0, 'L'),
            ],
            assets: AssetMetadata::default(),
            fire_delay: 60,
            fire_speed: 4.0,
            player_speed: 5.0,
            player_margin: 60.0,
            player_fire_cooldown: 15,
            player_pool_size: 30,
            bullet_speed: 3.0,
            toggle_cooldown: 15,
            background_speed: 1.0,
        }
    }
}

impl ArenaConfig {
    /// The fire type shared by row `row` (0 top, 1 left, 2 right, 3 bottom).
    pub fn row_fire_type(&self, row: usize) -> FireType {
        self.turrets[row * ROW_LEN].fire_type
    }
}

pub fn load_config_from_path(path: &Path) -> Result<ArenaConfig, String> {
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    let config = parse_config(&raw)
        .map_err(|e| format!("Failed to parse config {}: {e}", path.display()))?;
    validate_config(&config)?;
    log::info!(
        "Loaded arena config from {} ({} turrets, fire_delay {})",
        path.display(),
        config.turrets.len(),
        config.fire_delay
    );
    Ok(config)
}

fn parse_config(raw: &str) -> Result<ArenaConfig, serde_json::Error> {
    serde_json::from_str(raw)
}

pub fn validate_config(config: &ArenaConfig) -> Result<(), String> {
    if config.surface.width <= 0.0 || config.surface.height <= 0.0 {
        return Err("Config validation failed: surface width and height must be > 0".to_string());
    }
    if config.turrets.len() != TURRET_COUNT {
        return Err(format!(
            "Config validation failed: expected {TURRET_COUNT} turrets, found {}",
            config.turrets.len()
        ));
    }
    for (row, placements) in config.turrets.chunks(ROW_LEN).enumerate() {
        let fire_type = placements[0].fire_type;
        if placements.iter().any(|p| p.fire_type != fire_type) {
            return Err(format!(
                "Config validation failed: turret row {row} mixes fire types"
            ));
        }
    }
    if config.corners.len() != CORNER_COUNT {
        return Err(format!(
            "Config validation failed: expected {CORNER_COUNT} corners, found {}",
            config.corners.len()
        ));
    }
    if config.fire_delay < 3 || config.fire_delay % 3 != 0 {
        return Err(format!(
            "Config validation failed: fire_delay must be a positive multiple of 3, got {}",
            config.fire_delay
        ));
    }
    if config.toggle_cooldown == 0 {
        return Err("Config validation failed: toggle_cooldown must be > 0".to_string());
    }
    if config.player_pool_size < 2 {
        return Err("Config validation failed: player_pool_size must be >= 2".to_string());
    }
    for (name, value) in [
        ("fire_speed", config.fire_speed),
        ("bullet_speed", config.bullet_speed),
        ("player_speed", config.player_speed),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(format!("Config validation failed: {name} must be > 0, got {value}"));
        }
    }
    for (name, value) in [
        ("background_speed", config.background_speed),
        ("player_margin", config.player_margin),
    ] {
        if !value.is_finite() || value < 0.0 {
            return Err(format!("Config validation failed: {name} must be >= 0, got {value}"));
        }
    }
    if !config.overlays.is_empty() && config.overlays.len() != TURRET_COUNT {
        log::warn!(
            "Ignoring {} overlay labels (expected {TURRET_COUNT})",
            config.overlays.len()
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_file_path(name_hint: &str) -> std::path::PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .expect("system time before unix epoch")
            .as_nanos();
        std::env::temp_dir().join(format!(
            "turret_arena_config_{}_{}_{}.json",
            name_hint,
            std::process::id(),
            nanos
        ))
    }

    #[test]
    fn default_config_is_valid() {
        let config = ArenaConfig::default();
        validate_config(&config).expect("built-in tables should validate");
        assert_eq!(config.row_fire_type(0), FireType::Down);
        assert_eq!(config.row_fire_type(1), FireType::Right);
        assert_eq!(config.row_fire_type(2), FireType::Left);
        assert_eq!(config.row_fire_type(3), FireType::Up);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let path = temp_file_path("partial");
        fs::write(&path, r#"{ "fire_delay": 30, "toggle_cooldown": 5 }"#).expect("write temp file");

        let config = load_config_from_path(&path).expect("partial config should load");
        assert_eq!(config.fire_delay, 30);
        assert_eq!(config.toggle_cooldown, 5);
        assert_eq!(config.turrets.len(), TURRET_COUNT);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn fire_type_is_read_as_number() {
        let raw = r#"{ "x": 1.0, "y": 2.0, "angle": 90.0, "fire_type": 2 }"#;
        let placement: TurretPlacement = serde_json::from_str(raw).expect("placement parses");
        assert_eq!(placement.fire_type, FireType::Left);

        let bad = r#"{ "x": 1.0, "y": 2.0, "angle": 90.0, "fire_type": 7 }"#;
        assert!(serde_json::from_str::<TurretPlacement>(bad).is_err());
    }

    #[test]
    fn rejects_fire_delay_not_divisible_by_three() {
        let path = temp_file_path("delay");
        fs::write(&path, r#"{ "fire_delay": 50 }"#).expect("write temp file");

        let err = load_config_from_path(&path).expect_err("fire_delay 50 should fail");
        assert!(err.contains("fire_delay"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_negative_fire_speed() {
        let path = temp_file_path("fire_speed");
        fs::write(&path, r#"{ "fire_speed": -4.0 }"#).expect("write temp file");

        let err = load_config_from_path(&path).expect_err("negative fire_speed should fail");
        assert!(err.contains("fire_speed"));
        let _ = fs::remove_file(path);
    }

    #[test]
    fn rejects_stalled_speeds() {
        let mut config = ArenaConfig::default();
        config.bullet_speed = 0.0;
        let err = validate_config(&config).expect_err("zero bullet_speed should fail");
        assert!(err.contains("bullet_speed"));

        let mut config = ArenaConfig::default();
        config.player_speed = f32::NAN;
        let err = validate_config(&config).expect_err("NaN player_speed should fail");
        assert!(err.contains("player_speed"));
    }

    #[test]
    fn rejects_negative_background_speed_and_margin() {
        let mut config = ArenaConfig::default();
        config.background_speed = -1.0;
        let err = validate_config(&config).expect_err("negative background_speed should fail");
        assert!(err.contains("background_speed"));

        let mut config = ArenaConfig::default();
        config.player_margin = f32::INFINITY;
        let err = validate_config(&config).expect_err("infinite player_margin should fail");
        assert!(err.contains("player_margin"));

        let mut config = ArenaConfig::default();
        config.background_speed = 0.0;
        config.player_margin = 0.0;
        validate_config(&config).expect("a still background and no margin are allowed");
    }

    #[test]
    fn rejects_mixed_row() {
        let mut config = ArenaConfig::default();
        config.turrets[4].fire_type = FireType::Up;
        let err = validate_config(&config).expect_err("mixed row should fail");
        assert!(err.contains("row 1"));
    }

    #[test]
    fn rejects_wrong_turret_count() {
        let mut config = ArenaConfig::default();
        config.turrets.pop();
        let err = validate_config(&config).expect_err("11 turrets should fail");
        assert!(err.contains("expected 12 turrets"));
    }

    #[test]
    fn missing_file_reports_path() {
        let path = temp_file_path("missing");
        let err = load_config_from_path(&path).expect_err("missing file should fail");
        assert!(err.starts_with("Failed to read config"));
    }
}
