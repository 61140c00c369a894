use crate::blocks::Block;
use crate::grid::GridConfig;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug)]
pub enum DocumentError {
    Serde(serde_json::Error),
}

impl From<serde_json::Error> for DocumentError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serde(err)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditorMode {
    #[default]
    Linear,
    Grid,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PageDocument {
    pub uid: String,
    pub title: String,
    #[serde(default)]
    pub mode: EditorMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grid: Option<GridConfig>,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl PageDocument {
    pub fn new(title: &str) -> Self {
        Self {
            uid: Uuid::new_v4().to_string(),
            title: title.to_string(),
            mode: EditorMode::Linear,
            grid: None,
            blocks: Vec::new(),
        }
    }

    pub fn to_json(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(raw)?)
    }
}
