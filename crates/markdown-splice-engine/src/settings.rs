use serde::{Deserialize, Serialize};

/// Options controlling how source text becomes a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseSettings {
    /// Keep the source buffer and record node positions. Rewriting requires it.
    pub track_source_position: bool,
    /// Recognize GitHub-style pipe tables.
    pub github_tables: bool,
    /// Recognize `~~strikethrough~~`.
    pub strikethrough: bool,
}

impl Default for ParseSettings {
    fn default() -> Self {
        Self {
            track_source_position: true,
            github_tables: true,
            strikethrough: true,
        }
    }
}

impl ParseSettings {
    pub(crate) fn for_fragment(&self) -> Self {
        Self {
            track_source_position: true,
            ..self.clone()
        }
    }
}

/// Line ending written by the HTML renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Newline {
    #[default]
    Lf,
    CrLf,
}

impl Newline {
    pub fn as_str(self) -> &'static str {
        match self {
            Newline::Lf => "\n",
            Newline::CrLf => "\r\n",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    pub newline: Newline,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub parse: ParseSettings,
    pub render: RenderSettings,
}
