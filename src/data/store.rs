use super::{Item, ItemId};

/// One row coming back from the editor. `id` is `None` for rows added there.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemEdit {
    pub id: Option<ItemId>,
    pub name: String,
    pub qty: f64,
    pub percentage: f64,
}

impl From<&Item> for ItemEdit {
    fn from(item: &Item) -> Self {
        Self {
            id: Some(item.id),
            name: item.name.to_string(),
            qty: item.qty,
            percentage: item.percentage,
        }
    }
}

/// Ordered, editable list of items. Owns id allocation so ids stay unique
/// across add / remove / edit cycles.
#[derive(Debug, Clone, Default)]
pub struct ItemStore {
    items: Vec<Item>,
    next_id: u32,
}

impl ItemStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from existing items, keeping their ids.
    pub fn from_items(items: Vec<Item>) -> Self {
        let next_id = items.iter().map(|item| item.id.0 + 1).max().unwrap_or(0);
        Self { items, next_id }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Allocate a fresh id without inserting anything.
    pub fn allocate_id(&mut self) -> ItemId {
        let id = ItemId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Append a new item at the end of the list. Returns its id.
    pub fn push(&mut self, name: &str, qty: f64, percentage: f64) -> ItemId {
        let id = self.allocate_id();
        self.items.push(Item::new(id, name, qty, percentage));
        id
    }

    /// Remove an item by id. Returns the removed item, if it existed.
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let idx = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(idx))
    }

    /// Replace the list with edited rows, in row order. Known ids are kept,
    /// new rows (and ids this store never handed out) get fresh ids.
    pub fn apply_edits(&mut self, edits: Vec<ItemEdit>) {
        let mut items = Vec::with_capacity(edits.len());
        for edit in edits {
            let id = match edit.id {
                Some(id) if id.0 < self.next_id && !items.iter().any(|i: &Item| i.id == id) => id,
                _ => self.allocate_id(),
            };
            items.push(Item::new(id, &edit.name, edit.qty, edit.percentage));
        }
        self.items = items;
    }

    /// Sum of all weights.
    pub fn total_qty(&self) -> f64 {
        self.items.iter().map(|item| item.qty).sum()
    }
}
