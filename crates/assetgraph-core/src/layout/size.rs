//! Box sizes for asset and foreign nodes.

use crate::key::display_name_for_id;
use crate::model::AssetDefinition;

use super::Size;

/// Width of every asset box in compact mode.
pub const COMPACT_ASSET_WIDTH: f64 = 230.0;
/// Height of a foreign placeholder box.
pub const FOREIGN_HEIGHT: f64 = 30.0;

/// Caller-supplied sizing for layout boxes.
///
/// Asset boxes are sized from the definition; foreign placeholders only
/// have an id to go on.
pub trait NodeSizer {
    fn asset_size(&self, definition: &AssetDefinition, compact: bool) -> Size;
    fn foreign_size(&self, id: &str, compact: bool) -> Size;
}

/// Sizing that matches the asset graph UI's boxes: a label row, an op row
/// and an optional description row; width follows the label length.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultSizer;

impl NodeSizer for DefaultSizer {
    fn asset_size(&self, definition: &AssetDefinition, compact: bool) -> Size {
        let label_len = definition.asset_key.display_name().chars().count() as f64;
        let width = if compact {
            COMPACT_ASSET_WIDTH
        } else {
            (label_len * 9.5).max(250.0) + 25.0
        };
        let mut height = 65.0;
        if definition.description.is_some() {
            height += 25.0;
        }
        Size::new(width, height)
    }

    fn foreign_size(&self, id: &str, compact: bool) -> Size {
        let label_len = display_name_for_id(id).chars().count() as f64;
        let width = if compact {
            label_len.mul_add(6.0, 20.0)
        } else {
            label_len.mul_add(8.0, 30.0)
        };
        Size::new(width, FOREIGN_HEIGHT)
    }
}
