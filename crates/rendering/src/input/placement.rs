use layout::{Layer, ObjectDefinition};

/// Layer a new placement goes on: the active layer if one is set, else the
/// object's default layer.
pub(crate) fn placement_layer(active: Option<&Layer>, definition: Option<&ObjectDefinition>) -> Layer {
    match (active, definition) {
        (Some(layer), _) => layer.clone(),
        (None, Some(def)) => def.default_layer.clone(),
        (None, None) => Layer::default(),
    }
}

/// Next entry in the layer cycle `None -> layers[0] -> ... -> None`.
pub(crate) fn next_layer(current: Option<&Layer>, layers: &[Layer]) -> Option<Layer> {
    match current {
        None => layers.first().cloned(),
        Some(layer) => {
            let index = layers.iter().position(|l| l == layer)?;
            layers.get(index + 1).cloned()
        }
    }
}

/// Location `step` entries away from `current` in manifest order, wrapping.
pub(crate) fn neighbour_location(keys: &[&str], current: Option<&str>, step: isize) -> Option<String> {
    if keys.is_empty() {
        return None;
    }
    let len = keys.len() as isize;
    let index = match current.and_then(|key| keys.iter().position(|k| *k == key)) {
        Some(index) => (index as isize + step).rem_euclid(len),
        None => 0,
    };
    Some(keys[index as usize].to_string())
}

/// Layers offered by the layer cycle: the shared default plus every default
/// layer the catalog mentions, sorted.
pub fn known_layers<'a>(definitions: impl IntoIterator<Item = &'a ObjectDefinition>) -> Vec<Layer> {
    let mut layers: Vec<Layer> = definitions
        .into_iter()
        .map(|def| def.default_layer.clone())
        .chain(std::iter::once(Layer::default()))
        .collect();
    layers.sort();
    layers.dedup();
    layers
}
