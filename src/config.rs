//! User configuration: scroll physics, pointer geometry and keybindings.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/momentum-scroll/config.toml`
//! (default `~/.config/momentum-scroll/config.toml`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::drag::DragConfig;
use crate::core::wheel::WheelConfig;
use crate::error::ConfigError;

// ───────────────────────────────────────── actions ───────────

/// Keyboard actions in the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    LineUp,
    LineDown,
    ColumnLeft,
    ColumnRight,
    PageUp,
    PageDown,
    Top,
    Bottom,
    NextPane,
    Quit,
}

impl Action {
    pub const ALL: &[Action] = &[
        Action::LineUp,
        Action::LineDown,
        Action::ColumnLeft,
        Action::ColumnRight,
        Action::PageUp,
        Action::PageDown,
        Action::Top,
        Action::Bottom,
        Action::NextPane,
        Action::Quit,
    ];

    fn config_key(self) -> &'static str {
        match self {
            Action::LineUp => "line_up",
            Action::LineDown => "line_down",
            Action::ColumnLeft => "column_left",
            Action::ColumnRight => "column_right",
            Action::PageUp => "page_up",
            Action::PageDown => "page_down",
            Action::Top => "top",
            Action::Bottom => "bottom",
            Action::NextPane => "next_pane",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// Named keys understood in the config file, canonical spelling first.
const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("Up", KeyCode::Up),
    ("Down", KeyCode::Down),
    ("Left", KeyCode::Left),
    ("Right", KeyCode::Right),
    ("Enter", KeyCode::Enter),
    ("Esc", KeyCode::Esc),
    ("Tab", KeyCode::Tab),
    ("Home", KeyCode::Home),
    ("End", KeyCode::End),
    ("PageUp", KeyCode::PageUp),
    ("PageDown", KeyCode::PageDown),
    ("Space", KeyCode::Char(' ')),
    ("PgUp", KeyCode::PageUp),
    ("PgDn", KeyCode::PageDown),
    ("Escape", KeyCode::Esc),
    ("Return", KeyCode::Enter),
];

/// Modifiers that take part in matching; platform keys like SUPER are ignored.
fn modifier_mask() -> KeyModifiers {
    KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT
}

/// A key code plus modifier combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code && self.modifiers == (event.modifiers & modifier_mask())
    }

    /// Config-file spelling, e.g. `"Ctrl+c"`, `"PageDown"`, `"j"`.
    pub fn to_config_string(&self) -> String {
        let mut s = String::new();
        for (flag, name) in [
            (KeyModifiers::CONTROL, "Ctrl+"),
            (KeyModifiers::ALT, "Alt+"),
            (KeyModifiers::SHIFT, "Shift+"),
        ] {
            if self.modifiers.contains(flag) {
                s.push_str(name);
            }
        }
        match NAMED_KEYS.iter().find(|(_, code)| *code == self.code) {
            Some((name, _)) => s.push_str(name),
            None => match self.code {
                KeyCode::Char(c) => s.push(c),
                KeyCode::F(n) => s.push_str(&format!("F{n}")),
                other => s.push_str(&format!("{other:?}")),
            },
        }
        s
    }

    /// Parse `"Ctrl+c"`, `"Alt+Up"`, `"q"`, `"F5"`.
    pub fn parse(s: &str) -> Option<Self> {
        let (mods, key) = match s.rsplit_once('+') {
            // A bare "+" or a trailing "Ctrl++" binds the plus key itself.
            Some((mods, "")) => (mods.strip_suffix('+').unwrap_or(mods), "+"),
            Some((mods, key)) => (mods, key),
            None => ("", s),
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in mods.split('+').filter(|p| !p.is_empty()) {
            modifiers |= match part.to_ascii_lowercase().as_str() {
                "ctrl" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => return None,
            };
        }

        let code = if let Some((_, code)) = NAMED_KEYS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
        {
            *code
        } else if let Some(n) = key
            .strip_prefix(|c: char| c.eq_ignore_ascii_case(&'f'))
            .and_then(|n| n.parse::<u8>().ok())
        {
            KeyCode::F(n)
        } else {
            let mut chars = key.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        };

        Some(Self { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Animation frames per second.
    pub frame_rate: u32,
    /// Pixel size of one terminal cell; pointer and content geometry are
    /// expressed in these pixels.
    pub cell_width_px: f64,
    pub cell_height_px: f64,
    /// Lines reported by one terminal wheel notch.
    pub wheel_lines_per_notch: f64,
    pub drag: DragConfig,
    pub wheel: WheelConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            frame_rate: 60,
            cell_width_px: 9.0,
            cell_height_px: 18.0,
            wheel_lines_per_notch: 3.0,
            drag: DragConfig::default(),
            wheel: WheelConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(LineUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(LineDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(ColumnLeft, vec![KeyBind::new(Left, n), KeyBind::new(Char('h'), n)]);
        m.insert(ColumnRight, vec![KeyBind::new(Right, n), KeyBind::new(Char('l'), n)]);
        m.insert(Action::PageUp, vec![KeyBind::new(KeyCode::PageUp, n), KeyBind::new(Char('b'), n)]);
        m.insert(
            Action::PageDown,
            vec![KeyBind::new(KeyCode::PageDown, n), KeyBind::new(Char(' '), n)],
        );
        m.insert(Top, vec![KeyBind::new(Home, n), KeyBind::new(Char('g'), n)]);
        m.insert(Bottom, vec![KeyBind::new(End, n), KeyBind::new(Char('G'), KeyModifiers::SHIFT)]);
        m.insert(NextPane, vec![KeyBind::new(Tab, n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n), KeyBind::new(Esc, n)]);

        m
    }

    /// Action bound to a key event.  The binding with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .flat_map(|(&action, binds)| binds.iter().map(move |b| (action, b)))
            .filter(|(_, b)| b.matches(event))
            .max_by_key(|(_, b)| b.modifiers.bits().count_ones())
            .map(|(action, _)| action)
    }

    /// Status-bar hint built from the first binding of a few actions.
    pub fn status_bar_hint(&self) -> String {
        let first = |action: Action| {
            self.bindings
                .get(&action)
                .and_then(|b| b.first())
                .map(KeyBind::to_config_string)
                .unwrap_or_else(|| "?".into())
        };
        format!(
            "drag/wheel: scroll | {}/{}: line | {}: page | {}: pane | {}: quit",
            first(Action::LineUp),
            first(Action::LineDown),
            first(Action::PageDown),
            first(Action::NextPane),
            first(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load from `path`; a missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        for (idx, line) in s.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Parse {
                    line: line_no,
                    message: format!("expected `key = value`, got `{line}`"),
                });
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            let number = || {
                value.parse::<f64>().map_err(|_| ConfigError::Parse {
                    line: line_no,
                    message: format!("`{key}` expects a number, got `{value}`"),
                })
            };

            match key {
                "frame_rate" => {
                    let fps = number()?;
                    if !(1.0..=240.0).contains(&fps) {
                        return Err(ConfigError::OutOfRange {
                            key: "frame_rate",
                            value: fps,
                            expected: "1..=240",
                        });
                    }
                    cfg.frame_rate = fps as u32;
                }
                "cell_width_px" => cfg.cell_width_px = positive("cell_width_px", number()?)?,
                "cell_height_px" => cfg.cell_height_px = positive("cell_height_px", number()?)?,
                "wheel_lines_per_notch" => {
                    cfg.wheel_lines_per_notch = positive("wheel_lines_per_notch", number()?)?
                }
                "drag_threshold_px" => cfg.drag.threshold_px = non_negative("drag_threshold_px", number()?)?,
                "drag_multiplier" => cfg.drag.multiplier = positive("drag_multiplier", number()?)?,
                "drag_damping" => cfg.drag.momentum.damping = number()?,
                "drag_momentum_scale" => cfg.drag.momentum.distance_scale = number()?,
                "drag_stop_threshold" => cfg.drag.momentum.stop_threshold = number()?,
                "wheel_pixels_per_line" => {
                    cfg.wheel.pixels_per_line = positive("wheel_pixels_per_line", number()?)?
                }
                "wheel_page_fraction" => {
                    cfg.wheel.page_fraction = positive("wheel_page_fraction", number()?)?
                }
                "wheel_impulse_strength" => {
                    cfg.wheel.impulse_strength = positive("wheel_impulse_strength", number()?)?
                }
                "wheel_horizontal" => cfg.wheel.horizontal = value == "true",
                "wheel_damping" => cfg.wheel.momentum.damping = number()?,
                "wheel_distance_scale" => cfg.wheel.momentum.distance_scale = number()?,
                "wheel_stop_threshold" => cfg.wheel.momentum.stop_threshold = number()?,
                _ => match Action::from_config_key(key) {
                    Some(action) => {
                        let parsed: Vec<KeyBind> = value
                            .split(',')
                            .map(|p| p.trim().trim_matches('"'))
                            .filter_map(KeyBind::parse)
                            .collect();
                        if parsed.is_empty() {
                            tracing::warn!(line = line_no, key, "no usable key in binding, keeping default");
                        } else {
                            cfg.bindings.insert(action, parsed);
                        }
                    }
                    None => tracing::warn!(line = line_no, key, "unknown config key"),
                },
            }
        }

        cfg.drag.momentum.validate("drag")?;
        cfg.wheel.momentum.validate("wheel")?;
        Ok(cfg)
    }

    pub fn serialise(&self) -> String {
        let mut lines = vec![
            "# momentum-scroll configuration".to_string(),
            String::new(),
            "# Geometry".to_string(),
            format!("frame_rate = {}", self.frame_rate),
            format!("cell_width_px = {}", self.cell_width_px),
            format!("cell_height_px = {}", self.cell_height_px),
            String::new(),
            "# Drag to scroll".to_string(),
            format!("drag_threshold_px = {}", self.drag.threshold_px),
            format!("drag_multiplier = {}", self.drag.multiplier),
            format!("drag_damping = {}", self.drag.momentum.damping),
            format!("drag_momentum_scale = {}", self.drag.momentum.distance_scale),
            format!("drag_stop_threshold = {}", self.drag.momentum.stop_threshold),
            String::new(),
            "# Wheel".to_string(),
            format!("wheel_lines_per_notch = {}", self.wheel_lines_per_notch),
            format!("wheel_pixels_per_line = {}", self.wheel.pixels_per_line),
            format!("wheel_page_fraction = {}", self.wheel.page_fraction),
            format!("wheel_impulse_strength = {}", self.wheel.impulse_strength),
            format!("wheel_horizontal = {}", self.wheel.horizontal),
            format!("wheel_damping = {}", self.wheel.momentum.damping),
            format!("wheel_distance_scale = {}", self.wheel.momentum.distance_scale),
            format!("wheel_stop_threshold = {}", self.wheel.momentum.stop_threshold),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(KeyBind::to_config_string).collect();
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

fn positive(key: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            key,
            value,
            expected: "a positive number",
        })
    }
}

fn non_negative(key: &'static str, value: f64) -> Result<f64, ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ConfigError::OutOfRange {
            key,
            value,
            expected: "zero or more",
        })
    }
}

/// Default config file path (`$XDG_CONFIG_HOME/momentum-scroll/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("momentum-scroll").join("config.toml")
}
