//! Property-based invariant tests for the strip layout.
//!
//! Verifies:
//! 1. Every item gets exactly one placement, in input order
//! 2. Placements stay inside the bounds
//! 3. Placements never overlap
//! 4. Placement areas are proportional to weights and sum to the bounds area
//! 5. Determinism: same input gives the same layout

use proptest::prelude::*;
use squaremap_rs::data::{Item, ItemId};
use squaremap_rs::layout::{compute_layout, Placement};

const EPS: f64 = 1e-6;

// ── Strategy helpers ──────────────────────────────────────────────────

fn arb_items() -> impl Strategy<Value = Vec<Item>> {
    prop::collection::vec((1u32..=10_000, -100i32..=100), 1..40).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, (qty, pct))| Item::new(ItemId(i as u32), &format!("item{i}"), qty as f64, pct as f64))
            .collect()
    })
}

fn arb_bounds() -> impl Strategy<Value = (f64, f64)> {
    (10u32..=2000, 10u32..=2000).prop_map(|(w, h)| (w as f64, h as f64))
}

fn interiors_overlap(a: &Placement, b: &Placement) -> bool {
    a.x + EPS < b.x + b.w && b.x + EPS < a.x + a.w && a.y + EPS < b.y + b.h && b.y + EPS < a.y + a.h
}

// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn one_placement_per_item_in_order(items in arb_items(), (w, h) in arb_bounds()) {
        let layout = compute_layout(&items, w, h).unwrap();
        let ids: Vec<ItemId> = layout.placements.iter().map(|p| p.id).collect();
        let expected: Vec<ItemId> = items.iter().map(|i| i.id).collect();
        prop_assert_eq!(ids, expected);
        for item in &items {
            prop_assert_eq!(layout.get(item.id).map(|p| p.id), Some(item.id));
        }
    }

    #[test]
    fn placements_stay_inside_bounds(items in arb_items(), (w, h) in arb_bounds()) {
        let layout = compute_layout(&items, w, h).unwrap();
        for p in &layout.placements {
            prop_assert!(p.w > 0.0 && p.h > 0.0, "empty placement {:?}", p);
            prop_assert!(p.x >= -EPS && p.y >= -EPS, "placement outside top/left {:?}", p);
            prop_assert!(p.x + p.w <= w + EPS, "placement past right edge {:?}", p);
            prop_assert!(p.y + p.h <= h + EPS, "placement past bottom edge {:?}", p);
        }
    }

    #[test]
    fn placements_never_overlap(items in arb_items(), (w, h) in arb_bounds()) {
        let layout = compute_layout(&items, w, h).unwrap();
        for (i, a) in layout.placements.iter().enumerate() {
            for b in &layout.placements[i + 1..] {
                prop_assert!(!interiors_overlap(a, b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn areas_follow_weights(items in arb_items(), (w, h) in arb_bounds()) {
        let layout = compute_layout(&items, w, h).unwrap();
        let total_qty: f64 = items.iter().map(|i| i.qty).sum();
        let bounds_area = w * h;

        for (item, p) in items.iter().zip(&layout.placements) {
            let expected = item.qty / total_qty * bounds_area;
            prop_assert!(
                (p.area() - expected).abs() <= expected * 1e-9,
                "{} area {} expected {}", item.id, p.area(), expected
            );
        }

        let covered: f64 = layout.placements.iter().map(Placement::area).sum();
        prop_assert!((covered - bounds_area).abs() <= bounds_area * 1e-9);
    }

    #[test]
    fn layout_is_deterministic(items in arb_items(), (w, h) in arb_bounds()) {
        let first = compute_layout(&items, w, h).unwrap();
        let second = compute_layout(&items, w, h).unwrap();
        prop_assert_eq!(first.placements, second.placements);
    }
}
