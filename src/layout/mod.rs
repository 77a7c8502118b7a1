pub mod squarify;

use std::collections::{HashMap, HashSet};

use compact_str::CompactString;

use crate::data::{Item, ItemId};

/// A positioned rectangle in the treemap layout, tagged with its source item.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub id: ItemId,
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub name: CompactString,
    pub percentage: f64,
}

impl Placement {
    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    /// Half-open containment test (left/top edges inclusive).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.w && y >= self.y && y < self.y + self.h
    }
}

/// The full layout result (placements + fast lookup).
#[derive(Debug, Default)]
pub struct Layout {
    /// One placement per input item, in strip order
    pub placements: Vec<Placement>,
    /// item → index into `placements` (O(1) hover, tooltip)
    pub id_to_placement: HashMap<ItemId, usize>,
}

impl Layout {
    pub fn get(&self, id: ItemId) -> Option<&Placement> {
        self.id_to_placement.get(&id).map(|&idx| &self.placements[idx])
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("invalid layout input: {0}")]
    InvalidInput(#[from] InvalidInput),
    #[error("degenerate {dimension} ({value}) while placing item at index {index}")]
    DegenerateGeometry {
        index: usize,
        dimension: &'static str,
        value: f64,
    },
}

/// Reasons a layout call is refused before any geometry is computed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidInput {
    #[error("bounding rectangle must be positive and finite, got {width}x{height}")]
    Bounds { width: f64, height: f64 },
    #[error("item {id} at index {index} has non-positive weight {qty}")]
    Weight { index: usize, id: ItemId, qty: f64 },
    #[error("total weight must be positive, got {0}")]
    Total(f64),
    #[error("item id {0} appears more than once")]
    DuplicateId(ItemId),
}

/// Compute the strip-squarified layout of `items` over a `width` x `height` rectangle.
///
/// Item order matters: strips are grown from consecutive items in the order given.
/// Every call recomputes from scratch; nothing is cached between calls.
pub fn compute_layout(items: &[Item], width: f64, height: f64) -> Result<Layout, LayoutError> {
    let total_qty = validate(items, width, height)?;

    tracing::debug!(
        "Laying out {} items (total weight {}) in {:.0}x{:.0} area",
        items.len(),
        total_qty,
        width,
        height
    );

    let placements = squarify::squarify(items, total_qty, width, height)?;

    let id_to_placement = placements
        .iter()
        .enumerate()
        .map(|(idx, placement)| (placement.id, idx))
        .collect();

    Ok(Layout {
        placements,
        id_to_placement,
    })
}

/// Check the input contract. Returns the total weight.
fn validate(items: &[Item], width: f64, height: f64) -> Result<f64, InvalidInput> {
    let positive = |v: f64| v.is_finite() && v > 0.0;

    if !positive(width) || !positive(height) {
        return Err(InvalidInput::Bounds { width, height });
    }

    let mut seen = HashSet::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        if !positive(item.qty) {
            return Err(InvalidInput::Weight {
                index,
                id: item.id,
                qty: item.qty,
            });
        }
        if !seen.insert(item.id) {
            return Err(InvalidInput::DuplicateId(item.id));
        }
    }

    let total: f64 = items.iter().map(|item| item.qty).sum();
    if !positive(total) {
        return Err(InvalidInput::Total(total));
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_items;

    fn item(id: u32, qty: f64) -> Item {
        Item::new(ItemId(id), "x", qty, 0.0)
    }

    #[test]
    fn empty_list_is_a_zero_total() {
        let err = compute_layout(&[], 100.0, 100.0).unwrap_err();
        assert_eq!(err, LayoutError::InvalidInput(InvalidInput::Total(0.0)));
    }

    #[test]
    fn zero_weight_is_rejected() {
        let items = [item(0, 10.0), item(1, 0.0)];
        let err = compute_layout(&items, 100.0, 100.0).unwrap_err();
        assert_eq!(
            err,
            LayoutError::InvalidInput(InvalidInput::Weight {
                index: 1,
                id: ItemId(1),
                qty: 0.0
            })
        );
    }

    #[test]
    fn negative_and_nan_weights_are_rejected() {
        for qty in [-5.0, f64::NAN, f64::INFINITY] {
            let items = [item(0, qty)];
            let err = compute_layout(&items, 100.0, 100.0).unwrap_err();
            assert!(matches!(
                err,
                LayoutError::InvalidInput(InvalidInput::Weight { index: 0, .. })
            ));
        }
    }

    #[test]
    fn non_positive_bounds_are_rejected() {
        let items = sample_items();
        for (w, h) in [(0.0, 800.0), (1000.0, -1.0), (f64::NAN, 10.0)] {
            let err = compute_layout(&items, w, h).unwrap_err();
            assert!(matches!(err, LayoutError::InvalidInput(InvalidInput::Bounds { .. })));
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let items = [item(3, 1.0), item(4, 1.0), item(3, 2.0)];
        let err = compute_layout(&items, 10.0, 10.0).unwrap_err();
        assert_eq!(err, LayoutError::InvalidInput(InvalidInput::DuplicateId(ItemId(3))));
    }

    #[test]
    fn lookup_by_id_finds_each_placement() {
        let items = sample_items();
        let layout = compute_layout(&items, 1000.0, 800.0).unwrap();
        assert_eq!(layout.len(), items.len());
        for item in &items {
            let placement = layout.get(item.id).unwrap();
            assert_eq!(placement.name, item.name);
            assert_eq!(placement.percentage, item.percentage);
        }
        assert!(layout.get(ItemId(99)).is_none());
    }

    #[test]
    fn error_messages_name_the_offender() {
        let err = LayoutError::from(InvalidInput::Weight {
            index: 2,
            id: ItemId(9),
            qty: -1.0,
        });
        assert_eq!(
            err.to_string(),
            "invalid layout input: item #9 at index 2 has non-positive weight -1"
        );
    }
}
