use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::pose::StorePolicy;
use crate::render::SkeletonProfile;

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub osc: OscConfig,
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct OscConfig {
    /// 待ち受けUDPポート
    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CanvasConfig {
    /// キャンバス幅（ピクセル）。正規化座標の変換に使う
    #[serde(default = "default_width")]
    pub width: u32,
    /// キャンバス高さ（ピクセル）
    #[serde(default = "default_height")]
    pub height: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RenderConfig {
    /// 描画する最低信頼度（この値ちょうどは描画しない）
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    /// 骨格プロファイル ("full" / "minimal")
    #[serde(default = "default_profile")]
    pub profile: SkeletonProfile,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// 保持ポリシー ("time-bounded" / "volatile" / "id-indexed")
    #[serde(default = "default_policy")]
    pub policy: StorePolicy,
    /// 同時に追跡する姿勢の上限
    #[serde(default = "default_max_poses")]
    pub max_poses: usize,
    /// 未更新の姿勢を破棄するまでの秒数 (time-bounded のみ)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: f64,
}

fn default_port() -> u16 { 12345 }
fn default_width() -> u32 { 800 }
fn default_height() -> u32 { 600 }
fn default_confidence_threshold() -> f32 { 0.5 }
fn default_profile() -> SkeletonProfile { SkeletonProfile::Full }
fn default_policy() -> StorePolicy { StorePolicy::TimeBounded }
fn default_max_poses() -> usize { 30 }
fn default_timeout_secs() -> f64 { 1.0 }

impl Default for OscConfig {
    fn default() -> Self {
        Self { port: default_port() }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: default_confidence_threshold(),
            profile: default_profile(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            policy: default_policy(),
            max_poses: default_max_poses(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs)
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// 読めなければデフォルト設定で起動する
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!(
                    "Config not loaded ({}): using defaults",
                    e
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.osc.port, 12345);
        assert_eq!(config.canvas.width, 800);
        assert_eq!(config.canvas.height, 600);
        assert_eq!(config.render.confidence_threshold, 0.5);
        assert_eq!(config.render.profile, SkeletonProfile::Full);
        assert_eq!(config.store.policy, StorePolicy::TimeBounded);
        assert_eq!(config.store.max_poses, 30);
        assert_eq!(config.store.timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_parse_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [osc]
            port = 9000

            [store]
            policy = "volatile"
            "#,
        )
        .unwrap();
        assert_eq!(config.osc.port, 9000);
        assert_eq!(config.store.policy, StorePolicy::Volatile);
        // 省略したフィールドはデフォルト
        assert_eq!(config.store.max_poses, 30);
        assert_eq!(config.canvas.width, 800);
    }

    #[test]
    fn test_parse_profile_and_policy_names() {
        let config: Config = toml::from_str(
            r#"
            [render]
            profile = "minimal"

            [store]
            policy = "id-indexed"
            "#,
        )
        .unwrap();
        assert_eq!(config.render.profile, SkeletonProfile::Minimal);
        assert_eq!(config.store.policy, StorePolicy::IdIndexed);
    }
}
