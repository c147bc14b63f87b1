//! Text documents shown in the pager panes.

use std::path::Path;

use anyhow::{Context, Result};

const TAB: &str = "    ";

/// A document split into display lines.
#[derive(Debug, Clone)]
pub struct Document {
    pub name: String,
    pub lines: Vec<String>,
}

impl Document {
    /// Read a file.  Invalid UTF-8 is replaced, tabs are expanded.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::from_text(name, &String::from_utf8_lossy(&bytes)))
    }

    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        Self {
            name: name.into(),
            lines: text.lines().map(|l| l.replace('\t', TAB)).collect(),
        }
    }

    /// Built-in text used when no file is given: long enough to scroll on
    /// both axes.
    pub fn demo() -> Self {
        let mut text = String::new();
        text.push_str("Drag with the left button and let go to fling.\n");
        text.push_str("Spin the wheel a few times in a row to build up speed.\n");
        text.push_str("A click that ends a drag is swallowed; a plain click selects a line.\n\n");
        for i in 1..=400 {
            let ruler: String = (0..(i % 7 + 1) * 12)
                .map(|c| char::from(b'a' + (c % 26) as u8))
                .collect();
            text.push_str(&format!("{i:>4} │ {ruler}\n"));
        }
        Self::from_text("demo", &text)
    }

    /// Longest line, in columns.
    pub fn width(&self) -> usize {
        self.lines.iter().map(|l| l.chars().count()).max().unwrap_or(0)
    }

    /// Line count.
    pub fn height(&self) -> usize {
        self.lines.len()
    }
}
