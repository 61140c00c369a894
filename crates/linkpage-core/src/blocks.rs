use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockType {
    Profile,
    #[default]
    Link,
    Product,
    Text,
    Image,
    Form,
    Event,
    Social,
    Divider,
}

impl BlockType {
    pub fn is_profile(&self) -> bool {
        matches!(self, BlockType::Profile)
    }
}

/// Absent until the block is positioned; stripped when the page returns to
/// linear mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridLayout {
    pub column: u32,
    pub row: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub uid: String,
    pub kind: BlockType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<GridLayout>,
    #[serde(default)]
    pub content: serde_json::Value,
}

impl Block {
    pub fn new(kind: BlockType) -> Self {
        Self {
            uid: Uuid::new_v4().to_string(),
            kind,
            created_at: Some(Utc::now().timestamp_millis()),
            layout: None,
            content: serde_json::Value::Null,
        }
    }

    pub fn is_profile(&self) -> bool {
        self.kind.is_profile()
    }
}

#[cfg(test)]
mod tests {
    use super::{Block, BlockType, GridLayout};

    #[test]
    fn new_block_has_uid_and_timestamp() {
        let block = Block::new(BlockType::Link);
        assert!(!block.uid.is_empty());
        assert!(block.created_at.is_some());
        assert_eq!(block.layout, None);
    }

    #[test]
    fn block_json_skips_absent_layout() {
        let block = Block {
            uid: "a".to_string(),
            kind: BlockType::Text,
            created_at: None,
            layout: None,
            content: serde_json::Value::Null,
        };
        let json = serde_json::to_string(&block).expect("serialize");
        assert!(!json.contains("layout"));
        assert!(!json.contains("created_at"));
    }

    #[test]
    fn block_json_round_trips_layout() {
        let block = Block {
            uid: "a".to_string(),
            kind: BlockType::Product,
            created_at: Some(42),
            layout: Some(GridLayout {
                column: 2,
                row: 3,
                width: 2,
                height: 1,
            }),
            content: serde_json::json!({ "title": "Shirt" }),
        };
        let json = serde_json::to_string(&block).expect("serialize");
        let back: Block = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, block);
        assert!(json.contains("\"kind\":\"product\""));
    }
}
