//! Configuration management utilities.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dirs_next::config_dir;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::domain::format::{TextColor, TextFont, TextFormat};
use crate::infra::fs::FileFilter;

static DEFAULT_CONFIG: Lazy<&'static str> =
    Lazy::new(|| include_str!("../../assets/default-config.toml"));

/// Layered configuration loaded from defaults, user, explicit file, and env.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub dialogs: DialogDefaults,
    #[serde(default)]
    pub format: FormatDefaults,
    #[serde(default)]
    pub logging: Logging,
    #[serde(default)]
    pub editor: Editor,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DialogDefaults {
    #[serde(default)]
    pub initial_directory: Option<PathBuf>,
    #[serde(default)]
    pub default_filter: FileFilter,
    #[serde(default)]
    pub show_hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct FormatDefaults {
    #[serde(default)]
    pub color: TextColor,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub underline: bool,
}

impl FormatDefaults {
    pub fn to_text_format(&self) -> TextFormat {
        TextFormat {
            font: TextFont {
                bold: self.bold,
                italic: self.italic,
                underline: self.underline,
            },
            color: self.color,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logging {
    #[serde(default = "Logging::default_level")]
    pub level: String,
    /// Log destination; defaults to `<data dir>/tabpad/tabpad.log`.
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Logging {
    fn default_level() -> String {
        "info".into()
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Editor {
    #[serde(default = "Editor::default_tab_width")]
    pub tab_width: usize,
}

impl Editor {
    fn default_tab_width() -> usize {
        4
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self {
            tab_width: Self::default_tab_width(),
        }
    }
}

/// Environment overrides for critical settings.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    color: Option<String>,
    log_level: Option<String>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        Self {
            color: env::var("TABPAD_COLOR").ok(),
            log_level: env::var("TABPAD_LOG").ok(),
        }
    }

    #[cfg(test)]
    fn for_tests(color: &str, log_level: &str) -> Self {
        Self {
            color: Some(color.to_owned()),
            log_level: Some(log_level.to_owned()),
        }
    }
}

impl Config {
    /// Load configuration from defaults, the user's global config, an optional explicit file,
    /// and env overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let env = EnvOverrides::from_env();
        let global = global_config_path();
        Self::load_with_layers(global, explicit.map(Path::to_path_buf), env)
    }

    fn load_with_layers(
        global: Option<PathBuf>,
        explicit: Option<PathBuf>,
        env_overrides: EnvOverrides,
    ) -> Result<Self> {
        let mut layers: Vec<ConfigLayer> = Vec::new();

        layers.push(ConfigLayer::parse(&DEFAULT_CONFIG)?);

        if let Some(global_path) = global.filter(|path| path.exists()) {
            layers.push(ConfigLayer::from_file(&global_path)?);
        }

        // An explicitly requested file must exist.
        if let Some(explicit_path) = explicit {
            layers.push(ConfigLayer::from_file(&explicit_path)?);
        }

        let merged = layers
            .into_iter()
            .fold(Config::default(), |config, layer| layer.apply(config));
        apply_env_overrides(merged, env_overrides)
    }
}

/// One config file as written. Keys left out keep the value from the layers below.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigLayer {
    dialogs: DialogsLayer,
    format: FormatLayer,
    logging: LoggingLayer,
    editor: EditorLayer,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DialogsLayer {
    initial_directory: Option<PathBuf>,
    default_filter: Option<FileFilter>,
    show_hidden: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FormatLayer {
    color: Option<TextColor>,
    bold: Option<bool>,
    italic: Option<bool>,
    underline: Option<bool>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LoggingLayer {
    level: Option<String>,
    file: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EditorLayer {
    tab_width: Option<usize>,
}

impl ConfigLayer {
    fn from_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::parse(&data)
    }

    fn parse(contents: &str) -> Result<Self> {
        let layer: ConfigLayer =
            toml::from_str(contents).with_context(|| "failed to parse TOML config".to_string())?;
        Ok(layer)
    }

    fn apply(self, base: Config) -> Config {
        Config {
            dialogs: merge_dialogs(base.dialogs, self.dialogs),
            format: merge_format(base.format, self.format),
            logging: merge_logging(base.logging, self.logging),
            editor: Editor {
                tab_width: self.editor.tab_width.unwrap_or(base.editor.tab_width),
            },
        }
    }
}

fn merge_dialogs(mut base: DialogDefaults, overlay: DialogsLayer) -> DialogDefaults {
    if let Some(value) = overlay.initial_directory {
        base.initial_directory = Some(value);
    }
    if let Some(value) = overlay.default_filter {
        base.default_filter = value;
    }
    if let Some(value) = overlay.show_hidden {
        base.show_hidden = value;
    }
    base
}

fn merge_format(mut base: FormatDefaults, overlay: FormatLayer) -> FormatDefaults {
    if let Some(value) = overlay.color {
        base.color = value;
    }
    if let Some(value) = overlay.bold {
        base.bold = value;
    }
    if let Some(value) = overlay.italic {
        base.italic = value;
    }
    if let Some(value) = overlay.underline {
        base.underline = value;
    }
    base
}

fn merge_logging(mut base: Logging, overlay: LoggingLayer) -> Logging {
    if let Some(value) = overlay.level {
        base.level = value;
    }
    if let Some(value) = overlay.file {
        base.file = Some(value);
    }
    base
}

fn global_config_path() -> Option<PathBuf> {
    config_dir().map(|base| base.join("tabpad/config.toml"))
}

fn apply_env_overrides(mut config: Config, env: EnvOverrides) -> Result<Config> {
    if let Some(color) = env.color {
        config.format.color = color
            .parse::<TextColor>()
            .with_context(|| "invalid TABPAD_COLOR value".to_string())?;
    }
    if let Some(level) = env.log_level {
        config.logging.level = level;
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_uses_defaults_when_no_files() {
        let config =
            Config::load_with_layers(None, None, EnvOverrides::default()).expect("load defaults");
        assert_eq!(config.dialogs.default_filter, FileFilter::Text);
        assert_eq!(config.format.to_text_format(), TextFormat::default());
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.editor.tab_width, 4);
    }

    #[test]
    fn merge_global_and_explicit() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[format]
color = "cyan"
bold = true
[dialogs]
initial_directory = "/srv/notes"
"#,
        )?;

        let explicit = temp.path().join("explicit.toml");
        fs::write(
            &explicit,
            r#"
[dialogs]
default_filter = "all"
[editor]
tab_width = 8
"#,
        )?;

        let config =
            Config::load_with_layers(Some(global), Some(explicit), EnvOverrides::default())?;

        assert_eq!(config.format.color, TextColor::Cyan);
        assert!(config.format.bold);
        assert_eq!(config.dialogs.default_filter, FileFilter::All);
        assert_eq!(
            config.dialogs.initial_directory.as_deref(),
            Some(Path::new("/srv/notes"))
        );
        assert_eq!(config.editor.tab_width, 8);
        Ok(())
    }

    #[test]
    fn explicit_layer_can_restore_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(
            &global,
            r#"
[format]
color = "cyan"
bold = true
[dialogs]
show_hidden = true
[logging]
level = "debug"
[editor]
tab_width = 8
"#,
        )?;

        let explicit = temp.path().join("explicit.toml");
        fs::write(
            &explicit,
            r#"
[format]
color = "default"
bold = false
[dialogs]
show_hidden = false
[logging]
level = "info"
[editor]
tab_width = 4
"#,
        )?;

        let config =
            Config::load_with_layers(Some(global), Some(explicit), EnvOverrides::default())?;

        assert_eq!(config.format.color, TextColor::Default);
        assert!(!config.format.bold);
        assert!(!config.dialogs.show_hidden);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.editor.tab_width, 4);
        Ok(())
    }

    #[test]
    fn omitted_keys_keep_lower_layer_values() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let global = temp.path().join("config.toml");
        fs::write(&global, "[format]\nitalic = true\n")?;
        let explicit = temp.path().join("explicit.toml");
        fs::write(&explicit, "[format]\nunderline = true\n")?;

        let config =
            Config::load_with_layers(Some(global), Some(explicit), EnvOverrides::default())?;

        assert!(config.format.italic);
        assert!(config.format.underline);
        assert!(!config.format.bold);
        Ok(())
    }

    #[test]
    fn missing_global_is_ignored_but_missing_explicit_fails() {
        let temp = tempfile::tempdir().expect("tempdir");
        let absent = temp.path().join("absent.toml");
        assert!(
            Config::load_with_layers(Some(absent.clone()), None, EnvOverrides::default()).is_ok()
        );
        assert!(Config::load_with_layers(None, Some(absent), EnvOverrides::default()).is_err());
    }

    #[test]
    fn env_overrides_take_precedence() -> Result<()> {
        let overrides = EnvOverrides::for_tests("magenta", "debug");
        let config = Config::load_with_layers(None, None, overrides)?;
        assert_eq!(config.format.color, TextColor::Magenta);
        assert_eq!(config.logging.level, "debug");
        Ok(())
    }

    #[test]
    fn invalid_env_color_is_rejected() {
        let overrides = EnvOverrides::for_tests("plaid", "info");
        assert!(Config::load_with_layers(None, None, overrides).is_err());
    }

    #[test]
    fn invalid_config_returns_error() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let file = temp.path().join("broken.toml");
        fs::write(&file, "this is not toml")?;
        let result = ConfigLayer::from_file(&file);
        assert!(result.is_err());
        Ok(())
    }
}
