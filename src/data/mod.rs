pub mod store;

use compact_str::CompactString;

/// Caller-assigned item identifier. Stable across edits, unique within a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u32);

impl ItemId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One weighted entry of the treemap.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    /// Display label
    pub name: CompactString,
    /// Weight; drives the area of the item's rectangle. Must be > 0.
    pub qty: f64,
    /// Signed change; drives the fill color.
    pub percentage: f64,
}

impl Item {
    pub fn new(id: ItemId, name: &str, qty: f64, percentage: f64) -> Self {
        Self {
            id,
            name: CompactString::new(name),
            qty,
            percentage,
        }
    }
}

/// Yearly soft drink sales (litres) with their change over the previous year.
pub const SAMPLE_ROWS: [(&str, f64, f64); 6] = [
    ("Pepsi", 8000.0, 70.0),
    ("Sprite", 3000.0, -70.0),
    ("CocaCola", 1000.0, 95.0),
    ("Guaraná Jesus", 1000.0, -2.0),
    ("Fanta Uva", 800.0, 50.0),
    ("Guaraná", 500.0, 20.0),
];

/// The built-in data set, with ids assigned in row order.
pub fn sample_items() -> Vec<Item> {
    SAMPLE_ROWS
        .iter()
        .enumerate()
        .map(|(i, &(name, qty, percentage))| Item::new(ItemId(i as u32), name, qty, percentage))
        .collect()
}

/// Parse a `name:qty:percentage` triple. The name may itself contain colons;
/// the last two fields are always the numbers.
pub fn parse_item(id: ItemId, row: &str) -> Option<Item> {
    let mut parts = row.rsplitn(3, ':');
    let percentage = parts.next()?.trim().parse::<f64>().ok()?;
    let qty = parts.next()?.trim().parse::<f64>().ok()?;
    let name = parts.next()?.trim();
    if name.is_empty() {
        return None;
    }
    Some(Item::new(id, name, qty, percentage))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_items_keep_row_order() {
        let items = sample_items();
        assert_eq!(items.len(), 6);
        assert_eq!(items[0].name, "Pepsi");
        assert_eq!(items[0].qty, 8000.0);
        assert_eq!(items[5].id, ItemId(5));
        assert_eq!(items[3].percentage, -2.0);
    }

    #[test]
    fn parse_item_takes_numbers_from_the_right() {
        let item = parse_item(ItemId(7), "Mate: Leão:250:-3.5").unwrap();
        assert_eq!(item.name, "Mate: Leão");
        assert_eq!(item.qty, 250.0);
        assert_eq!(item.percentage, -3.5);
        assert_eq!(item.id, ItemId(7));
    }

    #[test]
    fn parse_item_rejects_malformed_rows() {
        assert!(parse_item(ItemId(0), "Pepsi:8000").is_none());
        assert!(parse_item(ItemId(0), ":10:1").is_none());
        assert!(parse_item(ItemId(0), "Pepsi:lots:1").is_none());
    }
}
