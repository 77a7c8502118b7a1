use crate::data::store::ItemStore;
use crate::data::ItemId;

/// Information shown for the item under the cursor.
#[derive(Debug, PartialEq)]
pub struct TooltipInfo {
    pub name: String,
    pub qty_display: String,
    /// Share of the total weight, e.g. "55.9%"
    pub share_display: String,
    pub percentage_display: String,
}

impl TooltipInfo {
    /// One-line summary, used as the window title suffix.
    pub fn summary(&self) -> String {
        format!(
            "{}: {} ({} of total), {}",
            self.name, self.qty_display, self.share_display, self.percentage_display
        )
    }
}

/// Build tooltip info for an item.
pub fn build_tooltip(store: &ItemStore, id: ItemId) -> Option<TooltipInfo> {
    let item = store.get(id)?;
    let total = store.total_qty();
    let share = if total > 0.0 { item.qty / total * 100.0 } else { 0.0 };

    Some(TooltipInfo {
        name: item.name.to_string(),
        qty_display: format_qty(item.qty),
        share_display: format!("{:.1}%", share),
        percentage_display: format!("{:+}%", item.percentage + 0.0),
    })
}

/// Format a weight with thousands separators; fractional weights keep two decimals.
pub fn format_qty(qty: f64) -> String {
    let plain = if qty.fract().abs() > 1e-9 {
        format!("{:.2}", qty.abs())
    } else {
        format!("{}", qty.abs())
    };
    let (digits, frac) = match plain.split_once('.') {
        Some((digits, frac)) => (digits, Some(frac)),
        None => (plain.as_str(), None),
    };

    let mut grouped = String::with_capacity(plain.len() + digits.len() / 3 + 1);
    if qty < 0.0 {
        grouped.push('-');
    }
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sample_items;

    #[test]
    fn tooltip_reports_share_and_change() {
        let store = ItemStore::from_items(sample_items());
        let info = build_tooltip(&store, ItemId(1)).unwrap();
        assert_eq!(info.name, "Sprite");
        assert_eq!(info.qty_display, "3,000");
        assert_eq!(info.share_display, "21.0%");
        assert_eq!(info.percentage_display, "-70%");
        assert_eq!(info.summary(), "Sprite: 3,000 (21.0% of total), -70%");
        assert!(build_tooltip(&store, ItemId(42)).is_none());
    }

    #[test]
    fn gains_carry_a_plus_sign() {
        let store = ItemStore::from_items(sample_items());
        assert_eq!(build_tooltip(&store, ItemId(0)).unwrap().percentage_display, "+70%");
    }

    #[test]
    fn negative_zero_change_reads_as_zero() {
        let store = ItemStore::from_items(vec![crate::data::Item::new(ItemId(0), "Kuat", 10.0, -0.0)]);
        assert_eq!(build_tooltip(&store, ItemId(0)).unwrap().percentage_display, "+0%");
    }

    #[test]
    fn qty_grouping() {
        assert_eq!(format_qty(500.0), "500");
        assert_eq!(format_qty(8000.0), "8,000");
        assert_eq!(format_qty(1234567.0), "1,234,567");
        assert_eq!(format_qty(12.5), "12.50");
        assert_eq!(format_qty(1999.999), "2,000.00");
    }
}
