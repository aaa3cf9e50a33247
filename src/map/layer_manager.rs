//! Ordered, exclusively-owned stack of [`Layer`]s.
//!
//! Invariants maintained after every structural operation:
//! - `layers[i].z_order() == i`
//! - the active index is `Some(valid index)`, or `None` exactly when the stack is empty

use bevy::log::{debug, info};

use crate::constants::{
    DEFAULT_LAYER_NAME, DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH, DUPLICATE_SUFFIX, EMPTY_TILE,
    FLATTENED_LAYER_NAME,
};
use crate::error::{DocumentError, DocumentResult};

use super::layer::{validate_dimensions, Layer, LayerId, LayerProperties, LayerType, TileId};

#[derive(Debug, Clone)]
pub struct LayerManager {
    layers: Vec<Layer>,
    active_layer: Option<usize>,
    next_layer_id: u32,
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerManager {
    /// Empty stack
    pub fn new() -> Self {
        Self {
            layers: Vec::new(),
            active_layer: None,
            next_layer_id: 1,
        }
    }

    /// Stack holding a single 25x15 background layer named "Fundo"
    pub fn with_default_layer() -> Self {
        let mut manager = Self::new();
        manager.create_layer(LayerProperties::named("Fundo", LayerType::Background));
        manager.mark_all_layers_saved();
        manager
    }

    // Layer management

    /// Creates a default-sized layer and returns its index
    pub fn create_layer(&mut self, properties: LayerProperties) -> usize {
        self.add_layer(Layer::with_properties(DEFAULT_MAP_WIDTH, DEFAULT_MAP_HEIGHT, properties)
            .unwrap_or_default())
    }

    pub fn create_layer_sized(
        &mut self,
        width: i32,
        height: i32,
        properties: LayerProperties,
    ) -> DocumentResult<usize> {
        let layer = Layer::with_properties(width, height, properties)?;
        Ok(self.add_layer(layer))
    }

    /// Appends a layer, giving it a fresh id. The first layer of an empty stack becomes active.
    pub fn add_layer(&mut self, mut layer: Layer) -> usize {
        layer.set_id(self.allocate_id());
        layer.set_z_order(self.layers.len() as i32);
        info!("Layer added: {} (total: {})", layer.name(), self.layers.len() + 1);

        self.layers.push(layer);
        if self.active_layer.is_none() {
            self.active_layer = Some(0);
        }
        self.layers.len() - 1
    }

    /// Inserts a layer at `index` (clamped to the stack length), keeping its id if it has one.
    ///
    /// The active layer keeps pointing at the same layer it did before the insert.
    pub fn insert_layer(&mut self, index: usize, mut layer: Layer) -> usize {
        if layer.id().is_assigned() && self.index_of(layer.id()).is_none() {
            self.next_layer_id = self.next_layer_id.max(layer.id().0 + 1);
        } else {
            layer.set_id(self.allocate_id());
        }

        let index = index.min(self.layers.len());
        self.layers.insert(index, layer);

        self.active_layer = match self.active_layer {
            None => Some(index),
            Some(active) if active >= index => Some(active + 1),
            other => other,
        };

        self.update_layer_z_orders();
        index
    }

    /// Removes the layer at `index` and hands ownership of it to the caller
    pub fn remove_layer(&mut self, index: usize) -> DocumentResult<Layer> {
        if !self.is_valid_layer_index(index) {
            return Err(DocumentError::InvalidLayerIndex(index));
        }

        let removed = self.layers.remove(index);

        if let Some(active) = self.active_layer
            && active >= index
        {
            self.active_layer = if self.layers.is_empty() {
                None
            } else {
                Some(active.saturating_sub(1))
            };
        }

        self.update_layer_z_orders();
        info!("Layer removed: {}", removed.name());
        Ok(removed)
    }

    pub fn remove_layer_by_name(&mut self, name: &str) -> DocumentResult<Layer> {
        let index = self
            .find_layer_index(name)
            .ok_or_else(|| DocumentError::InvalidFormat(format!("no layer named '{}'", name)))?;
        self.remove_layer(index)
    }

    pub fn clear_layers(&mut self) {
        self.layers.clear();
        self.active_layer = None;
        self.next_layer_id = 1;
        info!("All layers removed");
    }

    // Access

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    pub fn layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.find_layer_index(name).and_then(|i| self.layer(i))
    }

    pub fn layer_by_name_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.find_layer_index(name).and_then(|i| self.layer_mut(i))
    }

    pub fn layer_by_id(&self, id: LayerId) -> Option<&Layer> {
        self.index_of(id).and_then(|i| self.layer(i))
    }

    pub fn layer_by_id_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        self.index_of(id).and_then(|i| self.layer_mut(i))
    }

    /// Current position of the layer with the given id
    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        if !id.is_assigned() {
            return None;
        }
        self.layers.iter().position(|layer| layer.id() == id)
    }

    pub fn active_layer(&self) -> Option<&Layer> {
        self.active_layer.and_then(|i| self.layer(i))
    }

    pub fn active_layer_mut(&mut self) -> Option<&mut Layer> {
        self.active_layer.and_then(|i| self.layers.get_mut(i))
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn active_layer_index(&self) -> Option<usize> {
        self.active_layer
    }

    pub fn set_active_layer(&mut self, index: usize) -> DocumentResult<()> {
        let Some(layer) = self.layers.get(index) else {
            return Err(DocumentError::InvalidLayerIndex(index));
        };
        debug!("Active layer changed to: {}", layer.name());
        self.active_layer = Some(index);
        Ok(())
    }

    pub fn set_active_layer_by_name(&mut self, name: &str) -> DocumentResult<()> {
        let index = self
            .find_layer_index(name)
            .ok_or_else(|| DocumentError::InvalidFormat(format!("no layer named '{}'", name)))?;
        self.set_active_layer(index)
    }

    pub fn next_layer_id(&self) -> u32 {
        self.next_layer_id
    }

    // Ordering

    /// Swaps the layer with the one below it in the stack (towards index 0)
    pub fn move_layer_up(&mut self, index: usize) -> DocumentResult<()> {
        if !self.is_valid_layer_index(index) || index == 0 {
            return Err(DocumentError::InvalidLayerIndex(index));
        }
        self.swap_adjacent(index - 1, index);
        Ok(())
    }

    /// Swaps the layer with the one above it in the stack (towards the last index)
    pub fn move_layer_down(&mut self, index: usize) -> DocumentResult<()> {
        if !self.is_valid_layer_index(index) || index + 1 >= self.layers.len() {
            return Err(DocumentError::InvalidLayerIndex(index));
        }
        self.swap_adjacent(index, index + 1);
        Ok(())
    }

    fn swap_adjacent(&mut self, a: usize, b: usize) {
        self.layers.swap(a, b);
        self.active_layer = match self.active_layer {
            Some(active) if active == a => Some(b),
            Some(active) if active == b => Some(a),
            other => other,
        };
        self.update_layer_z_orders();
    }

    /// Extracts the layer at `index` and reinserts it at `new_order` (clamped to the stack)
    pub fn set_layer_order(&mut self, index: usize, new_order: usize) -> DocumentResult<()> {
        if !self.is_valid_layer_index(index) {
            return Err(DocumentError::InvalidLayerIndex(index));
        }

        let new_order = new_order.min(self.layers.len() - 1);
        if index == new_order {
            return Ok(());
        }

        let layer = self.layers.remove(index);
        self.layers.insert(new_order, layer);

        self.active_layer = self.active_layer.map(|active| {
            if active == index {
                new_order
            } else if index < new_order && active > index && active <= new_order {
                active - 1
            } else if index > new_order && active >= new_order && active < index {
                active + 1
            } else {
                active
            }
        });

        self.update_layer_z_orders();
        Ok(())
    }

    /// Layers in ascending z-order (back to front)
    pub fn layers_sorted_by_z_order(&self) -> Vec<&Layer> {
        let mut sorted: Vec<&Layer> = self.layers.iter().collect();
        sorted.sort_by_key(|layer| layer.z_order());
        sorted
    }

    // Batch property updates

    pub fn set_all_layers_visible(&mut self, visible: bool) {
        for layer in &mut self.layers {
            layer.set_visible(visible);
        }
    }

    pub fn set_layer_visibility(&mut self, index: usize, visible: bool) {
        if let Some(layer) = self.layer_mut(index) {
            layer.set_visible(visible);
        }
    }

    pub fn set_layer_opacity(&mut self, index: usize, opacity: f32) {
        if let Some(layer) = self.layer_mut(index) {
            layer.set_opacity(opacity);
        }
    }

    // Search and filters. Results follow stack order.

    pub fn find_layers_by_type(&self, layer_type: LayerType) -> Vec<usize> {
        self.indices_where(|layer| layer.layer_type() == layer_type)
    }

    /// Case-insensitive substring match on the layer name
    pub fn find_layers_by_name(&self, pattern: &str) -> Vec<usize> {
        let pattern = pattern.to_lowercase();
        self.indices_where(|layer| layer.name().to_lowercase().contains(&pattern))
    }

    pub fn visible_layers(&self) -> Vec<usize> {
        self.indices_where(Layer::is_visible)
    }

    pub fn unlocked_layers(&self) -> Vec<usize> {
        self.indices_where(|layer| !layer.is_locked())
    }

    fn indices_where(&self, predicate: impl Fn(&Layer) -> bool) -> Vec<usize> {
        self.layers
            .iter()
            .enumerate()
            .filter(|(_, layer)| predicate(layer))
            .map(|(i, _)| i)
            .collect()
    }

    // Tile operations. Writes into a locked layer are ignored.

    pub fn tile(&self, x: i32, y: i32) -> TileId {
        self.active_layer()
            .map(|layer| layer.tile(x, y))
            .unwrap_or(EMPTY_TILE)
    }

    pub fn set_tile(&mut self, x: i32, y: i32, tile_id: TileId) {
        if let Some(layer) = self.active_layer_mut()
            && !layer.is_locked()
        {
            layer.set_tile(x, y, tile_id);
        }
    }

    pub fn tile_from_layer(&self, layer_index: usize, x: i32, y: i32) -> TileId {
        self.layer(layer_index)
            .map(|layer| layer.tile(x, y))
            .unwrap_or(EMPTY_TILE)
    }

    pub fn set_tile_in_layer(&mut self, layer_index: usize, x: i32, y: i32, tile_id: TileId) {
        if let Some(layer) = self.layer_mut(layer_index)
            && !layer.is_locked()
        {
            layer.set_tile(x, y, tile_id);
        }
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: i32, height: i32, tile_id: TileId) {
        if let Some(layer) = self.active_layer_mut()
            && !layer.is_locked()
        {
            layer.fill_rect(x, y, width, height, tile_id);
        }
    }

    /// Copies a rectangle between two layers of the stack (or within one)
    #[allow(clippy::too_many_arguments)]
    pub fn copy_rect(
        &mut self,
        src_x: i32,
        src_y: i32,
        width: i32,
        height: i32,
        src_layer: usize,
        dest_layer: usize,
        dest_x: i32,
        dest_y: i32,
    ) {
        let Some(cells) = self
            .layer(src_layer)
            .map(|layer| layer.rect_cells(src_x, src_y, width, height))
        else {
            return;
        };

        if let Some(dest) = self.layer_mut(dest_layer)
            && !dest.is_locked()
        {
            dest.paste_cells(dest_x, dest_y, &cells);
        }
    }

    // Special operations

    /// Deep-copies the layer and inserts the copy right after the source.
    /// Returns the index of the copy.
    pub fn duplicate_layer(&mut self, index: usize) -> DocumentResult<usize> {
        let Some(source) = self.layer(index) else {
            return Err(DocumentError::InvalidLayerIndex(index));
        };

        let mut copy = source.clone();
        let name = self.generate_unique_layer_name(&format!("{}{}", source.name(), DUPLICATE_SUFFIX));
        copy.set_name(name);
        copy.set_modified(true);

        let appended = self.add_layer(copy);
        self.set_layer_order(appended, index + 1)?;
        Ok(index + 1)
    }

    /// Writes every non-empty cell of layer `index` onto layer `index + 1`, then removes
    /// layer `index`. Empty cells never erase content underneath.
    pub fn merge_layer_down(&mut self, index: usize) -> DocumentResult<()> {
        if !self.is_valid_layer_index(index) || index + 1 >= self.layers.len() {
            return Err(DocumentError::InvalidLayerIndex(index));
        }

        let (head, tail) = self.layers.split_at_mut(index + 1);
        let upper = &head[index];
        let lower = &mut tail[0];

        let width = upper.width().min(lower.width());
        let height = upper.height().min(lower.height());
        for y in 0..height {
            for x in 0..width {
                let tile = upper.tile(x, y);
                if tile != EMPTY_TILE {
                    lower.set_tile(x, y, tile);
                }
            }
        }

        self.remove_layer(index).map(|_| ())
    }

    /// Composes every visible layer back to front into one new layer that replaces the
    /// whole stack. Returns `false` when there is nothing to flatten.
    pub fn flatten_layers(&mut self) -> bool {
        if self.visible_layers().len() <= 1 {
            return false;
        }

        let properties = LayerProperties::named(
            self.generate_unique_layer_name(FLATTENED_LAYER_NAME),
            LayerType::Tile,
        );
        let Ok(mut flattened) = Layer::with_properties(self.width(), self.height(), properties)
        else {
            return false;
        };

        for layer in self.layers_sorted_by_z_order() {
            if !layer.is_visible() {
                continue;
            }
            for y in 0..layer.height() {
                for x in 0..layer.width() {
                    let tile = layer.tile(x, y);
                    if tile != EMPTY_TILE {
                        flattened.set_tile(x, y, tile);
                    }
                }
            }
        }
        flattened.set_modified(true);

        self.layers.clear();
        self.active_layer = None;
        self.add_layer(flattened);
        info!("Layers flattened into a single layer");
        true
    }

    // Dimensions

    pub fn resize_all_layers(
        &mut self,
        new_width: i32,
        new_height: i32,
        default_tile: TileId,
    ) -> DocumentResult<()> {
        validate_dimensions(new_width, new_height)?;
        for layer in &mut self.layers {
            layer.resize(new_width, new_height, default_tile)?;
        }
        Ok(())
    }

    /// Width of the bottom layer, 0 for an empty stack
    pub fn width(&self) -> i32 {
        self.layers.first().map(Layer::width).unwrap_or(0)
    }

    pub fn height(&self) -> i32 {
        self.layers.first().map(Layer::height).unwrap_or(0)
    }

    // State

    pub fn has_unsaved_changes(&self) -> bool {
        self.layers.iter().any(Layer::is_modified)
    }

    pub fn mark_all_layers_saved(&mut self) {
        for layer in &mut self.layers {
            layer.mark_saved();
        }
    }

    // Utilities

    /// `base`, then `base 1`, `base 2`, ... until no layer carries the name
    pub fn generate_unique_layer_name(&self, base: &str) -> String {
        let base = if base.is_empty() { DEFAULT_LAYER_NAME } else { base };
        let mut name = base.to_string();
        let mut counter = 1;
        while self.find_layer_index(&name).is_some() {
            name = format!("{} {}", base, counter);
            counter += 1;
        }
        name
    }

    pub fn is_valid_layer_index(&self, index: usize) -> bool {
        index < self.layers.len()
    }

    pub fn debug_summary(&self) -> String {
        let mut summary = format!(
            "{} layer(s), active: {}",
            self.layers.len(),
            self.active_layer
                .map(|i| i.to_string())
                .unwrap_or_else(|| "none".to_string())
        );
        for (i, layer) in self.layers.iter().enumerate() {
            summary.push_str(&format!("\n  [{}] {}", i, layer.debug_summary()));
        }
        summary
    }

    fn allocate_id(&mut self) -> LayerId {
        let id = LayerId(self.next_layer_id);
        self.next_layer_id += 1;
        id
    }

    fn update_layer_z_orders(&mut self) {
        for (i, layer) in self.layers.iter_mut().enumerate() {
            layer.set_z_order(i as i32);
        }
    }

    fn find_layer_index(&self, name: &str) -> Option<usize> {
        self.layers.iter().position(|layer| layer.name() == name)
    }

    /// Rebuilds a stack from persisted parts; ids are reallocated in stack order
    pub(crate) fn from_parts(layers: Vec<Layer>, active_layer: i64, next_layer_id: u32) -> Self {
        let mut manager = Self::new();
        manager.next_layer_id = next_layer_id.max(1);
        for layer in layers {
            manager.add_layer(layer);
        }

        manager.active_layer = usize::try_from(active_layer)
            .ok()
            .filter(|&i| manager.is_valid_layer_index(i))
            .or(if manager.is_empty() { None } else { Some(0) });

        manager.update_layer_z_orders();
        manager.mark_all_layers_saved();
        manager
    }
}
