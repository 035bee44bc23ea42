//! skillmap configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use skillmap_core::traits::TeacherProfile;
use skillmap_core::ClipPolicy;

/// Teacher details as written in the config file.
///
/// Values may reference environment variables as `${VAR_NAME}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    #[serde(default)]
    pub teacher_name: String,
    #[serde(default)]
    pub school: String,
    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub subject: String,
}

impl ProfileConfig {
    pub fn to_profile(&self) -> TeacherProfile {
        TeacherProfile {
            teacher_name: self.teacher_name.clone(),
            school: self.school.clone(),
            grade: self.grade.clone(),
            subject: self.subject.clone(),
        }
    }

    fn resolved(&self) -> Self {
        Self {
            teacher_name: resolve_env_vars(&self.teacher_name),
            school: resolve_env_vars(&self.school),
            grade: resolve_env_vars(&self.grade),
            subject: resolve_env_vars(&self.subject),
        }
    }
}

/// Settings for generated demo classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemoConfig {
    #[serde(default = "default_demo_students")]
    pub students: usize,
    /// Fixed seed for reproducible demo data; random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            students: default_demo_students(),
            seed: None,
        }
    }
}

/// Top-level skillmap configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillmapConfig {
    #[serde(default)]
    pub profile: ProfileConfig,
    /// Accuracy (percent) remedial work aims for.
    #[serde(default = "default_target_accuracy")]
    pub target_accuracy: f64,
    #[serde(default)]
    pub clip_policy: ClipPolicy,
    /// Max concurrent generation requests.
    #[serde(default = "default_parallelism")]
    pub parallelism: usize,
    /// Retries on transient generation errors.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Delay before the first retry, in milliseconds.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,
    #[serde(default)]
    pub demo: DemoConfig,
}

fn default_target_accuracy() -> f64 {
    80.0
}
fn default_parallelism() -> usize {
    4
}
fn default_retries() -> u32 {
    2
}
fn default_retry_delay() -> u64 {
    500
}
fn default_demo_students() -> usize {
    25
}

impl Default for SkillmapConfig {
    fn default() -> Self {
        Self {
            profile: ProfileConfig::default(),
            target_accuracy: default_target_accuracy(),
            clip_policy: ClipPolicy::default(),
            parallelism: default_parallelism(),
            max_retries: default_retries(),
            retry_delay_ms: default_retry_delay(),
            demo: DemoConfig::default(),
        }
    }
}

/// Written by `skillmap init`.
pub const STARTER_CONFIG: &str = r#"# skillmap configuration

# Accuracy (percent) remedial plans should aim for.
target_accuracy = 80.0

# How scores outside [0, max marks] are treated: "symmetric" or "upper-only".
clip_policy = "symmetric"

# Max concurrent generation requests.
parallelism = 4

[profile]
teacher_name = "${USER}"
school = ""
grade = ""
subject = "Mathematics"

[demo]
students = 25
# seed = 42
"#;

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are inserted as-is and never expanded again.
pub fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `skillmap.toml` in the current directory
/// 2. `~/.config/skillmap/config.toml`
///
/// Environment variable overrides: `SKILLMAP_TARGET_ACCURACY`, `SKILLMAP_DEMO_SEED`.
pub fn load_config() -> Result<SkillmapConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<SkillmapConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("skillmap.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => SkillmapConfig::default(),
    };

    Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
}

/// Parse and resolve a TOML config document.
pub fn parse_config(content: &str) -> Result<SkillmapConfig> {
    let mut config: SkillmapConfig = toml::from_str(content)?;
    config.profile = config.profile.resolved();
    if config.parallelism == 0 {
        tracing::warn!("parallelism must be at least 1, using 1");
        config.parallelism = 1;
    }
    Ok(config)
}

/// Apply `SKILLMAP_*` overrides read through `lookup`.
///
/// Unparseable values are ignored with a warning.
pub fn apply_env_overrides<F>(mut config: SkillmapConfig, lookup: F) -> SkillmapConfig
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(raw) = lookup("SKILLMAP_TARGET_ACCURACY") {
        match raw.trim().parse::<f64>() {
            Ok(target) if (0.0..=100.0).contains(&target) => config.target_accuracy = target,
            _ => tracing::warn!("ignoring SKILLMAP_TARGET_ACCURACY={raw}: expected 0-100"),
        }
    }

    if let Some(raw) = lookup("SKILLMAP_DEMO_SEED") {
        match raw.trim().parse::<u64>() {
            Ok(seed) => config.demo.seed = Some(seed),
            Err(_) => tracing::warn!("ignoring SKILLMAP_DEMO_SEED={raw}: expected an integer"),
        }
    }

    config
}

/// Write the starter config to `path`, refusing to overwrite.
pub fn write_starter_config(path: &Path) -> Result<()> {
    if path.exists() {
        anyhow::bail!("{} already exists", path.display());
    }
    std::fs::write(path, STARTER_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("skillmap"))
}
