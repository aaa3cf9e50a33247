use bevy::log::{error, warn};
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use std::ops::Range;

use crate::constants::{
    now_timestamp, DEFAULT_LAYER_NAME, DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, EMPTY_TILE,
    MAX_MAP_CELLS,
};
use crate::error::{DocumentError, DocumentResult};

/// Identifier of a drawable/gameplay tile type. [`EMPTY_TILE`] marks an empty cell.
pub type TileId = i32;

/// Stable handle for a layer, independent of its position in the stack.
///
/// `LayerId(0)` means "not yet owned by a stack"; the stack assigns real ids on insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct LayerId(pub u32);

impl LayerId {
    pub const UNASSIGNED: LayerId = LayerId(0);

    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr, Default)]
#[repr(u8)]
pub enum LayerType {
    #[default]
    Tile = 0,
    Background = 1,
    Collision = 2,
    Object = 3,
    Overlay = 4,
}

impl LayerType {
    pub fn display_name(&self) -> &'static str {
        match self {
            LayerType::Tile => "Tiles",
            LayerType::Background => "Background",
            LayerType::Collision => "Collision",
            LayerType::Object => "Objects",
            LayerType::Overlay => "Overlay",
        }
    }

    pub fn all() -> &'static [LayerType] {
        &[
            LayerType::Tile,
            LayerType::Background,
            LayerType::Collision,
            LayerType::Object,
            LayerType::Overlay,
        ]
    }
}

/// RGBA tint applied by the renderer when drawing a layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TintColor {
    #[serde(default = "channel_max")]
    pub r: u8,
    #[serde(default = "channel_max")]
    pub g: u8,
    #[serde(default = "channel_max")]
    pub b: u8,
    #[serde(default = "channel_max")]
    pub a: u8,
}

fn channel_max() -> u8 {
    u8::MAX
}

impl TintColor {
    pub const WHITE: TintColor = TintColor::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for TintColor {
    fn default() -> Self {
        Self::WHITE
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerProperties {
    pub name: String,
    pub layer_type: LayerType,
    pub visible: bool,
    /// Always within `[0, 1]` when set through [`Layer::set_opacity`]
    pub opacity: f32,
    pub locked: bool,
    pub tint_color: TintColor,
    /// Draw order, lower draws first. Owned by the layer stack.
    pub z_order: i32,
    pub description: String,
}

impl Default for LayerProperties {
    fn default() -> Self {
        Self {
            name: DEFAULT_LAYER_NAME.to_string(),
            layer_type: LayerType::Tile,
            visible: true,
            opacity: 1.0,
            locked: false,
            tint_color: TintColor::WHITE,
            z_order: 0,
            description: String::new(),
        }
    }
}

impl LayerProperties {
    pub fn named(name: impl Into<String>, layer_type: LayerType) -> Self {
        Self {
            name: name.into(),
            layer_type,
            ..Self::default()
        }
    }
}

/// A bounded grid of tile ids plus per-layer attributes.
///
/// Reads outside `[0, width) x [0, height)` return [`EMPTY_TILE`]; writes outside it are
/// dropped. `Layer` itself never checks `locked`: lock enforcement lives in the stack.
#[derive(Debug, Clone)]
pub struct Layer {
    id: LayerId,
    properties: LayerProperties,
    width: i32,
    height: i32,
    /// Row-major, `width * height` cells
    tiles: Vec<TileId>,
    modified: bool,
    created_date: String,
    modified_date: String,
}

impl Default for Layer {
    fn default() -> Self {
        Self::new()
    }
}

impl Layer {
    /// Empty 25x15 layer with default properties
    pub fn new() -> Self {
        Self::blank(DEFAULT_MAP_WIDTH, DEFAULT_MAP_HEIGHT, LayerProperties::default())
    }

    pub fn with_properties(
        width: i32,
        height: i32,
        properties: LayerProperties,
    ) -> DocumentResult<Self> {
        validate_dimensions(width, height)?;
        Ok(Self::blank(width, height, properties))
    }

    pub fn sized(width: i32, height: i32) -> DocumentResult<Self> {
        Self::with_properties(width, height, LayerProperties::default())
    }

    /// Caller guarantees validated dimensions
    fn blank(width: i32, height: i32, properties: LayerProperties) -> Self {
        Self::from_grid(width, height, properties, vec![EMPTY_TILE; cell_count(width, height)])
    }

    /// Caller guarantees `tiles` holds `width * height` cells
    fn from_grid(width: i32, height: i32, properties: LayerProperties, tiles: Vec<TileId>) -> Self {
        let created = now_timestamp();
        Self {
            id: LayerId::UNASSIGNED,
            properties,
            width,
            height,
            tiles,
            modified: false,
            modified_date: created.clone(),
            created_date: created,
        }
    }

    /// Rebuilds a layer from persisted parts. A tile grid that does not match the declared
    /// dimensions is replaced by a blank one.
    pub(crate) fn from_parts(
        properties: LayerProperties,
        width: i32,
        height: i32,
        rows: Option<Vec<Vec<TileId>>>,
        created_date: String,
        modified_date: String,
    ) -> DocumentResult<Self> {
        validate_dimensions(width, height)?;

        let tiles = match rows {
            Some(rows) if grid_matches(&rows, width, height) => rows.into_iter().flatten().collect(),
            Some(_) => {
                warn!(
                    "Tile grid of layer '{}' does not match {}x{}, using a blank grid",
                    properties.name, width, height
                );
                vec![EMPTY_TILE; cell_count(width, height)]
            }
            None => vec![EMPTY_TILE; cell_count(width, height)],
        };

        let mut layer = Self::from_grid(width, height, properties, tiles);
        layer.created_date = created_date;
        layer.modified_date = modified_date;
        Ok(layer)
    }

    // Identity

    pub fn id(&self) -> LayerId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: LayerId) {
        self.id = id;
    }

    // Property getters

    pub fn properties(&self) -> &LayerProperties {
        &self.properties
    }

    pub fn name(&self) -> &str {
        &self.properties.name
    }

    pub fn layer_type(&self) -> LayerType {
        self.properties.layer_type
    }

    pub fn is_visible(&self) -> bool {
        self.properties.visible
    }

    pub fn opacity(&self) -> f32 {
        self.properties.opacity
    }

    pub fn is_locked(&self) -> bool {
        self.properties.locked
    }

    pub fn z_order(&self) -> i32 {
        self.properties.z_order
    }

    pub fn tint_color(&self) -> TintColor {
        self.properties.tint_color
    }

    pub fn description(&self) -> &str {
        &self.properties.description
    }

    pub fn created_date(&self) -> &str {
        &self.created_date
    }

    pub fn modified_date(&self) -> &str {
        &self.modified_date
    }

    // Property setters

    pub fn set_properties(&mut self, properties: LayerProperties) {
        self.properties = properties;
        self.set_modified(true);
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.properties.name = name.into();
    }

    pub fn set_type(&mut self, layer_type: LayerType) {
        self.properties.layer_type = layer_type;
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.properties.visible = visible;
    }

    pub fn set_opacity(&mut self, opacity: f32) {
        self.properties.opacity = if opacity.is_nan() {
            1.0
        } else {
            opacity.clamp(0.0, 1.0)
        };
        self.set_modified(true);
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.properties.locked = locked;
    }

    pub fn set_z_order(&mut self, z_order: i32) {
        self.properties.z_order = z_order;
    }

    pub fn set_tint_color(&mut self, color: TintColor) {
        self.properties.tint_color = color;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.properties.description = description.into();
    }

    // Grid access

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Row-major view of every cell
    pub fn tiles(&self) -> &[TileId] {
        &self.tiles
    }

    /// Grid as `height` rows of `width` ids
    pub fn rows(&self) -> Vec<Vec<TileId>> {
        self.tiles
            .chunks(self.width as usize)
            .map(|row| row.to_vec())
            .collect()
    }

    pub fn is_valid_position(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    fn cell_index(&self, x: i32, y: i32) -> Option<usize> {
        self.is_valid_position(x, y)
            .then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn tile(&self, x: i32, y: i32) -> TileId {
        self.cell_index(x, y)
            .map(|i| self.tiles[i])
            .unwrap_or(EMPTY_TILE)
    }

    pub fn set_tile(&mut self, x: i32, y: i32, tile_id: TileId) {
        let Some(i) = self.cell_index(x, y) else {
            return;
        };

        if self.tiles[i] != tile_id {
            self.tiles[i] = tile_id;
            self.set_modified(true);
        }
    }

    /// Number of non-empty cells
    pub fn filled_count(&self) -> usize {
        self.tiles.iter().filter(|&&t| t != EMPTY_TILE).count()
    }

    // Whole-grid operations

    pub fn clear(&mut self) {
        self.fill(EMPTY_TILE);
    }

    pub fn fill(&mut self, tile_id: TileId) {
        self.tiles.fill(tile_id);
        self.set_modified(true);
    }

    /// Reallocates the grid, keeping the overlapping top-left rectangle
    pub fn resize(&mut self, new_width: i32, new_height: i32, default_tile: TileId) -> DocumentResult<()> {
        if let Err(e) = validate_dimensions(new_width, new_height) {
            error!("Invalid layer dimensions: {}x{}", new_width, new_height);
            return Err(e);
        }

        let mut new_tiles = vec![default_tile; cell_count(new_width, new_height)];
        let copy_width = new_width.min(self.width) as usize;
        let copy_height = new_height.min(self.height) as usize;

        for y in 0..copy_height {
            let src = y * self.width as usize;
            let dst = y * new_width as usize;
            new_tiles[dst..dst + copy_width].copy_from_slice(&self.tiles[src..src + copy_width]);
        }

        self.tiles = new_tiles;
        self.width = new_width;
        self.height = new_height;
        self.set_modified(true);
        Ok(())
    }

    /// Resizes with empty padding, only when the dimensions actually differ
    pub fn set_size(&mut self, width: i32, height: i32) -> DocumentResult<()> {
        if width != self.width || height != self.height {
            self.resize(width, height, EMPTY_TILE)?;
        }
        Ok(())
    }

    // Rectangular operations. Iteration is clipped to the part of the rectangle inside the
    // layer, so partial overlaps and far-away origins are fine.

    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, tile_id: TileId) {
        for dy in clipped_offsets(y, height, self.height) {
            for dx in clipped_offsets(x, width, self.width) {
                if let Some(i) = self.cell_index(x + dx, y + dy) {
                    self.tiles[i] = tile_id;
                }
            }
        }
        self.set_modified(true);
    }

    /// Source cells that fall inside this layer, as `(dx, dy, tile)` offsets from the origin
    pub(crate) fn rect_cells(&self, x: i32, y: i32, width: i32, height: i32) -> Vec<(i32, i32, TileId)> {
        let mut cells = Vec::new();
        for dy in clipped_offsets(y, height, self.height) {
            for dx in clipped_offsets(x, width, self.width) {
                if let Some(i) = self.cell_index(x + dx, y + dy) {
                    cells.push((dx, dy, self.tiles[i]));
                }
            }
        }
        cells
    }

    pub(crate) fn paste_cells(&mut self, dest_x: i32, dest_y: i32, cells: &[(i32, i32, TileId)]) {
        for &(dx, dy, tile) in cells {
            if let (Some(x), Some(y)) = (dest_x.checked_add(dx), dest_y.checked_add(dy)) {
                self.set_tile(x, y, tile);
            }
        }
    }

    /// Copies a rectangle into another layer. Cells invalid in either layer are skipped.
    pub fn copy_rect(
        &self,
        src_x: i32,
        src_y: i32,
        width: i32,
        height: i32,
        dest: &mut Layer,
        dest_x: i32,
        dest_y: i32,
    ) {
        let cells = self.rect_cells(src_x, src_y, width, height);
        dest.paste_cells(dest_x, dest_y, &cells);
    }

    /// Reads a rectangle; cells outside the layer come back as [`EMPTY_TILE`]
    pub fn get_rect(&self, x: i32, y: i32, width: i32, height: i32) -> Vec<Vec<TileId>> {
        let tile_at = |dx: i32, dy: i32| match (x.checked_add(dx), y.checked_add(dy)) {
            (Some(cx), Some(cy)) => self.tile(cx, cy),
            _ => EMPTY_TILE,
        };
        (0..height.max(0))
            .map(|dy| (0..width.max(0)).map(|dx| tile_at(dx, dy)).collect())
            .collect()
    }

    pub fn set_rect(&mut self, x: i32, y: i32, data: &[Vec<TileId>]) {
        if data.first().is_none_or(|row| row.is_empty()) {
            return;
        }

        for dy in clipped_offsets(y, saturating_len(data.len()), self.height) {
            let row = &data[dy as usize];
            for dx in clipped_offsets(x, saturating_len(row.len()), self.width) {
                if let Some(i) = self.cell_index(x + dx, y + dy) {
                    self.tiles[i] = row[dx as usize];
                }
            }
        }
        self.set_modified(true);
    }

    // State

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        if modified && !self.modified {
            self.modified_date = now_timestamp();
        }
        self.modified = modified;
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    pub fn debug_summary(&self) -> String {
        format!(
            "Layer '{}' ({}) {}x{} z={} visible={} locked={} opacity={:.2} modified={} filled={}",
            self.properties.name,
            self.properties.layer_type.display_name(),
            self.width,
            self.height,
            self.properties.z_order,
            self.properties.visible,
            self.properties.locked,
            self.properties.opacity,
            self.modified,
            self.filled_count(),
        )
    }
}

/// Rejects non-positive sizes and grids above [`MAX_MAP_CELLS`]
pub(crate) fn validate_dimensions(width: i32, height: i32) -> DocumentResult<()> {
    if width <= 0 || height <= 0 || i64::from(width) * i64::from(height) > MAX_MAP_CELLS {
        return Err(DocumentError::InvalidDimensions { width, height });
    }
    Ok(())
}

fn cell_count(width: i32, height: i32) -> usize {
    width as usize * height as usize
}

/// Offsets in `0..len` for which `origin + offset` lands in `0..limit`
fn clipped_offsets(origin: i32, len: i32, limit: i32) -> Range<i32> {
    let origin = i64::from(origin);
    let start = (-origin).max(0);
    let end = (i64::from(limit) - origin).min(i64::from(len.max(0)));
    if start >= end {
        return 0..0;
    }
    // Both bounds lie in 0..=len
    start as i32..end as i32
}

fn saturating_len(len: usize) -> i32 {
    i32::try_from(len).unwrap_or(i32::MAX)
}

pub(crate) fn grid_matches(rows: &[Vec<TileId>], width: i32, height: i32) -> bool {
    rows.len() == height as usize && rows.iter().all(|row| row.len() == width as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layer_5x5(fill: TileId) -> Layer {
        let mut layer = Layer::sized(5, 5).unwrap();
        layer.fill(fill);
        layer.mark_saved();
        layer
    }

    #[test]
    fn test_new_layer_is_empty() {
        let layer = Layer::new();
        assert_eq!(layer.width(), 25);
        assert_eq!(layer.height(), 15);
        assert!(layer.tiles().iter().all(|&t| t == EMPTY_TILE));
        assert!(!layer.is_modified());
        assert_eq!(layer.name(), "Nova Camada");
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        assert!(Layer::sized(0, 5).is_err());
        assert!(Layer::sized(5, -1).is_err());
    }

    #[test]
    fn test_out_of_range_reads_return_empty() {
        let layer = layer_5x5(3);
        for (x, y) in [(-1, 0), (0, -1), (5, 0), (0, 5), (i32::MIN, i32::MAX)] {
            assert_eq!(layer.tile(x, y), EMPTY_TILE, "({x}, {y}) should be empty");
        }
        assert_eq!(layer.tile(4, 4), 3);
    }

    #[test]
    fn test_out_of_range_writes_are_dropped() {
        let mut layer = layer_5x5(3);
        let before = layer.tiles().to_vec();
        layer.set_tile(-1, 2, 9);
        layer.set_tile(5, 2, 9);
        layer.set_tile(2, 5, 9);
        assert_eq!(layer.tiles(), before.as_slice());
        assert!(!layer.is_modified());
    }

    #[test]
    fn test_set_tile_marks_modified_only_on_change() {
        let mut layer = layer_5x5(3);
        layer.set_tile(1, 1, 3);
        assert!(!layer.is_modified());
        layer.set_tile(1, 1, 4);
        assert!(layer.is_modified());
        assert_eq!(layer.tile(1, 1), 4);
    }

    #[test]
    fn test_resize_keeps_overlap() {
        let mut layer = Layer::sized(3, 2).unwrap();
        layer.set_rect(0, 0, &[vec![1, 2, 3], vec![4, 5, 6]]);

        layer.resize(4, 3, 0).unwrap();
        assert_eq!(
            layer.rows(),
            vec![vec![1, 2, 3, 0], vec![4, 5, 6, 0], vec![0, 0, 0, 0]]
        );

        layer.resize(2, 1, 0).unwrap();
        assert_eq!(layer.rows(), vec![vec![1, 2]]);
    }

    #[test]
    fn test_resize_rejects_invalid_geometry() {
        let mut layer = layer_5x5(2);
        assert!(layer.resize(0, 3, 0).is_err());
        assert!(layer.resize(3, -2, 0).is_err());
        assert_eq!(layer.width(), 5);
        assert_eq!(layer.height(), 5);
        assert!(!layer.is_modified());
    }

    #[test]
    fn test_set_size_only_when_different() {
        let mut layer = layer_5x5(2);
        layer.set_size(5, 5).unwrap();
        assert!(!layer.is_modified());
        layer.set_size(6, 5).unwrap();
        assert_eq!(layer.tile(5, 0), EMPTY_TILE);
        assert_eq!(layer.tile(4, 0), 2);
    }

    #[test]
    fn test_fill_rect_clips_each_cell() {
        let mut layer = layer_5x5(0);
        layer.fill_rect(3, 3, 4, 4, 7);
        assert_eq!(layer.tile(3, 3), 7);
        assert_eq!(layer.tile(4, 4), 7);
        assert_eq!(layer.tile(2, 3), 0);
        assert_eq!(layer.tiles().iter().filter(|&&t| t == 7).count(), 4);
    }

    #[test]
    fn test_copy_rect_partial_overlap() {
        let mut src = layer_5x5(0);
        src.set_rect(0, 0, &[vec![1, 2], vec![3, 4]]);
        let mut dest = Layer::sized(3, 3).unwrap();

        // Source starts one cell outside, destination overflows the right edge
        src.copy_rect(-1, 0, 3, 2, &mut dest, 1, 0);

        assert_eq!(dest.tile(1, 0), EMPTY_TILE);
        assert_eq!(dest.tile(2, 0), 1);
        assert_eq!(dest.tile(2, 1), 3);
        assert_eq!(dest.tile(0, 0), EMPTY_TILE);
    }

    #[test]
    fn test_get_rect_pads_with_empty() {
        let layer = layer_5x5(8);
        let rect = layer.get_rect(4, 4, 2, 2);
        assert_eq!(rect, vec![vec![8, EMPTY_TILE], vec![EMPTY_TILE, EMPTY_TILE]]);
    }

    #[test]
    fn test_set_rect_ignores_empty_data() {
        let mut layer = layer_5x5(1);
        layer.set_rect(0, 0, &[]);
        layer.set_rect(0, 0, &[vec![]]);
        assert!(!layer.is_modified());
    }

    #[test]
    fn test_clear_and_fill_touch_every_cell() {
        let mut layer = layer_5x5(1);
        layer.clear();
        assert!(layer.tiles().iter().all(|&t| t == EMPTY_TILE));
        layer.fill(6);
        assert!(layer.tiles().iter().all(|&t| t == 6));
        assert_eq!(layer.filled_count(), 25);
    }

    #[test]
    fn test_locked_layer_still_writable_directly() {
        let mut layer = layer_5x5(0);
        layer.set_locked(true);
        layer.set_tile(2, 2, 5);
        assert_eq!(layer.tile(2, 2), 5);
    }

    #[test]
    fn test_opacity_is_clamped() {
        let mut layer = Layer::new();
        layer.set_opacity(1.5);
        assert_eq!(layer.opacity(), 1.0);
        layer.set_opacity(-0.5);
        assert_eq!(layer.opacity(), 0.0);
        layer.set_opacity(0.25);
        assert_eq!(layer.opacity(), 0.25);
    }

    #[test]
    fn test_from_parts_mismatch_yields_blank_grid() {
        let layer = Layer::from_parts(
            LayerProperties::default(),
            2,
            2,
            Some(vec![vec![1, 2], vec![3]]),
            String::new(),
            String::new(),
        )
        .unwrap();
        assert!(layer.tiles().iter().all(|&t| t == EMPTY_TILE));
    }

    #[test]
    fn test_layer_type_serializes_as_integer() {
        assert_eq!(serde_json::to_string(&LayerType::Collision).unwrap(), "2");
        let parsed: LayerType = serde_json::from_str("4").unwrap();
        assert_eq!(parsed, LayerType::Overlay);
        assert!(serde_json::from_str::<LayerType>("9").is_err());
    }

    #[test]
    fn test_every_layer_type_round_trips() {
        for (i, layer_type) in LayerType::all().iter().enumerate() {
            let json = serde_json::to_string(layer_type).unwrap();
            assert_eq!(json, i.to_string());
            assert_eq!(serde_json::from_str::<LayerType>(&json).unwrap(), *layer_type);
        }
    }

    #[test]
    fn test_oversized_dimensions_rejected() {
        assert!(matches!(
            Layer::sized(i32::MAX, i32::MAX),
            Err(DocumentError::InvalidDimensions { .. })
        ));
        assert!(Layer::sized(100_000, 100_000).is_err());
        assert!(Layer::sized(4096, 4096).is_ok());
        assert!(Layer::sized(4097, 4096).is_err());

        let mut layer = layer_5x5(0);
        assert!(layer.resize(2_000_000_000, 2, EMPTY_TILE).is_err());
        assert_eq!(layer.width(), 5);
    }

    #[test]
    fn test_from_parts_rejects_oversized_grid() {
        let result = Layer::from_parts(
            LayerProperties::default(),
            2_000_000_000,
            2_000_000_000,
            Some(vec![vec![1]]),
            String::new(),
            String::new(),
        );
        assert!(matches!(result, Err(DocumentError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_rect_operations_with_extreme_origins() {
        let mut layer = layer_5x5(0);

        layer.fill_rect(i32::MAX, 0, 2, 1, 5);
        layer.fill_rect(i32::MIN, i32::MIN, i32::MAX, i32::MAX, 5);
        layer.fill_rect(0, i32::MAX - 1, 3, 3, 5);
        assert!(layer.tiles().iter().all(|&t| t == 0));

        // Huge rectangles only touch the overlap
        layer.fill_rect(-10, -10, i32::MAX, 12, 6);
        assert_eq!(layer.tile(0, 0), 6);
        assert_eq!(layer.tile(4, 1), 6);
        assert_eq!(layer.tile(0, 2), 0);

        let rect = layer.get_rect(i32::MAX, i32::MAX, 2, 2);
        assert_eq!(rect, vec![vec![EMPTY_TILE; 2]; 2]);

        layer.set_rect(i32::MAX, 0, &[vec![7, 7]]);
        layer.set_rect(i32::MIN, i32::MIN, &[vec![7, 7]]);
        assert_eq!(layer.filled_count(), 25);
        assert!(!layer.tiles().contains(&7));

        let mut dest = layer_5x5(0);
        layer.copy_rect(0, 0, 5, 5, &mut dest, i32::MAX, 0);
        layer.copy_rect(0, 0, 5, 5, &mut dest, i32::MIN, i32::MIN);
        assert!(dest.tiles().iter().all(|&t| t == 0));

        layer.copy_rect(i32::MIN, 0, i32::MAX, 5, &mut dest, 0, 0);
        assert!(dest.tiles().iter().all(|&t| t == 0));

        layer.copy_rect(-3, 0, 5, 1, &mut dest, -3, 0);
        assert_eq!((dest.tile(0, 0), dest.tile(1, 0), dest.tile(2, 0)), (6, 6, 0));
    }

    #[test]
    fn test_tint_color_defaults_missing_channels() {
        let color: TintColor = serde_json::from_str(r#"{"r": 10}"#).unwrap();
        assert_eq!(color, TintColor::new(10, 255, 255, 255));
    }
}
