use super::{LayoutError, Placement};
use crate::data::Item;

/// Target aspect ratio for every strip (square).
const ASPECT_RATIO_GOAL: f64 = 1.0;
/// Half-width of the band around the goal that counts as "square enough".
const ASPECT_TOLERANCE: f64 = 0.4;

/// How a strip is built from the remaining space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Strip spans the full remaining width; members are laid left-to-right,
    /// the strip itself is stacked below the previous one.
    Vertical,
    /// Strip spans the full remaining height; members are laid top-to-bottom,
    /// the strip itself is placed right of the previous one.
    Horizontal,
}

impl Direction {
    /// Re-evaluated at the start of every strip.
    pub fn for_remaining(remaining_w: f64, remaining_h: f64) -> Self {
        if remaining_w / remaining_h < 1.0 {
            Direction::Vertical
        } else {
            Direction::Horizontal
        }
    }

    fn aspect_ratio(self, w: f64, h: f64) -> f64 {
        match self {
            Direction::Vertical => h / w,
            Direction::Horizontal => w / h,
        }
    }
}

/// A group of consecutive items grown while it stays square enough.
#[derive(Debug)]
struct Strip<'a> {
    direction: Direction,
    w: f64,
    h: f64,
    aspect_ratio: f64,
    /// Sum of member weights
    value: f64,
    /// Sum of member weight ratios (of the grand total)
    ratio_sum: f64,
    /// (input index, item)
    members: Vec<(usize, &'a Item)>,
}

impl<'a> Strip<'a> {
    fn seed(
        direction: Direction,
        index: usize,
        item: &'a Item,
        ratio: f64,
        frame: &Frame,
    ) -> Result<Self, LayoutError> {
        let (w, h) = frame.strip_dimensions(direction, ratio);
        check_dimension(index, "strip width", w)?;
        check_dimension(index, "strip height", h)?;
        Ok(Self {
            direction,
            w,
            h,
            aspect_ratio: direction.aspect_ratio(w, h),
            value: item.qty,
            ratio_sum: ratio,
            members: vec![(index, item)],
        })
    }

    /// Aspect ratio of the space left over if the strip were finalized now.
    fn gap_ratio(&self, frame: &Frame) -> f64 {
        let gap_w = non_zero_or(frame.remaining_w - self.w, frame.remaining_w);
        let gap_h = non_zero_or(frame.remaining_h - self.h, frame.remaining_h);
        long_over_short(gap_w, gap_h)
    }

    fn accept(&mut self, index: usize, item: &'a Item, ratio: f64, w: f64, h: f64, average: f64) {
        self.w = w;
        self.h = h;
        self.aspect_ratio = average;
        self.value += item.qty;
        self.ratio_sum += ratio;
        self.members.push((index, item));
    }

    /// Split the strip among its members proportionally to their weights.
    fn subdivide(&self, origin_x: f64, origin_y: f64, out: &mut Vec<Placement>) -> Result<(), LayoutError> {
        let mut x = origin_x;
        let mut y = origin_y;
        for &(index, item) in &self.members {
            let share = item.qty / self.value;
            let (w, h) = match self.direction {
                Direction::Vertical => (share * self.w, self.h),
                Direction::Horizontal => (self.w, share * self.h),
            };
            check_dimension(index, "width", w)?;
            check_dimension(index, "height", h)?;

            out.push(Placement {
                id: item.id,
                x,
                y,
                w,
                h,
                name: item.name.clone(),
                percentage: item.percentage,
            });

            match self.direction {
                Direction::Vertical => x += w,
                Direction::Horizontal => y += h,
            }
        }
        Ok(())
    }
}

/// Full rectangle plus the part of it not yet covered by strips.
/// Consumed space is always the top/left complement of the remainder.
#[derive(Debug)]
struct Frame {
    width: f64,
    height: f64,
    remaining_w: f64,
    remaining_h: f64,
}

impl Frame {
    fn total_area(&self) -> f64 {
        self.width * self.height
    }

    fn origin(&self) -> (f64, f64) {
        (self.width - self.remaining_w, self.height - self.remaining_h)
    }

    /// Strip size for a cumulative weight ratio, pinning the remaining width
    /// (vertical) or height (horizontal).
    fn strip_dimensions(&self, direction: Direction, ratio_sum: f64) -> (f64, f64) {
        let area = ratio_sum * self.total_area();
        match direction {
            Direction::Vertical => (self.remaining_w, area / self.remaining_w),
            Direction::Horizontal => (area / self.remaining_h, self.remaining_h),
        }
    }

    fn shrink(&mut self, strip: &Strip<'_>) {
        match strip.direction {
            Direction::Vertical => self.remaining_h -= strip.h,
            Direction::Horizontal => self.remaining_w -= strip.w,
        }
    }
}

/// Strip-squarify `items` (validated: positive weights, `total_qty > 0`).
///
/// Items are scanned in input order. Each unconsumed item seeds a strip that
/// greedily absorbs the following items until [`rejects_candidate`] says the
/// next one would not keep it square; the strip is then subdivided and the
/// remaining space shrinks by its size.
pub(crate) fn squarify(
    items: &[Item],
    total_qty: f64,
    width: f64,
    height: f64,
) -> Result<Vec<Placement>, LayoutError> {
    let ratios: Vec<f64> = items.iter().map(|item| item.qty / total_qty).collect();
    let mut consumed = vec![false; items.len()];
    let mut placements = Vec::with_capacity(items.len());
    let mut frame = Frame {
        width,
        height,
        remaining_w: width,
        remaining_h: height,
    };

    for index in 0..items.len() {
        if consumed[index] {
            continue;
        }
        consumed[index] = true;

        let direction = Direction::for_remaining(frame.remaining_w, frame.remaining_h);
        let mut strip = Strip::seed(direction, index, &items[index], ratios[index], &frame)?;
        let mut gap_ratio = strip.gap_ratio(&frame);

        for candidate in index + 1..items.len() {
            if consumed[candidate] {
                continue;
            }

            let (w, h) = frame.strip_dimensions(direction, strip.ratio_sum + ratios[candidate]);
            let candidate_ratio = direction.aspect_ratio(w, h);
            let member_count = (strip.members.len() + 1) as f64;
            let average_ratio = (strip.aspect_ratio + candidate_ratio) / member_count;

            if rejects_candidate(gap_ratio, strip.aspect_ratio, average_ratio) {
                tracing::trace!(
                    "Strip at {}: rejected item {} (gap={:.3}, strip={:.3}, avg={:.3})",
                    index,
                    candidate,
                    gap_ratio,
                    strip.aspect_ratio,
                    average_ratio
                );
                break;
            }

            check_dimension(candidate, "strip width", w)?;
            check_dimension(candidate, "strip height", h)?;
            strip.accept(candidate, &items[candidate], ratios[candidate], w, h, average_ratio);
            consumed[candidate] = true;
            gap_ratio = strip.gap_ratio(&frame);
        }

        tracing::debug!(
            "Strip at {}: {:?}, {} member(s), {:.1}x{:.1}",
            index,
            direction,
            strip.members.len(),
            strip.w,
            strip.h
        );

        let (origin_x, origin_y) = frame.origin();
        strip.subdivide(origin_x, origin_y, &mut placements)?;
        frame.shrink(&strip);
    }

    Ok(placements)
}

/// Decide whether growing the strip by the candidate should stop here.
///
/// Rejects when the leftover space is already square and the average stays
/// within tolerance, when the strip itself is already square, or when the
/// candidate moves the average further from the goal. A tie keeps growing.
pub fn rejects_candidate(gap_ratio: f64, strip_ratio: f64, average_ratio: f64) -> bool {
    let in_band = (ASPECT_RATIO_GOAL - ASPECT_TOLERANCE..=ASPECT_RATIO_GOAL + ASPECT_TOLERANCE)
        .contains(&average_ratio);

    if truncate_tenths(gap_ratio) == ASPECT_RATIO_GOAL && in_band {
        return true;
    }
    if truncate_tenths(strip_ratio) == ASPECT_RATIO_GOAL {
        return true;
    }
    (ASPECT_RATIO_GOAL - average_ratio).abs() > (ASPECT_RATIO_GOAL - strip_ratio).abs()
}

/// Truncate toward zero at one decimal place (1.09 -> 1.0, 0.99 -> 0.9).
pub fn truncate_tenths(value: f64) -> f64 {
    (value * 10.0).trunc() / 10.0
}

fn non_zero_or(value: f64, fallback: f64) -> f64 {
    if value == 0.0 {
        fallback
    } else {
        value
    }
}

/// Long side over short side; 1 for equal sides.
fn long_over_short(a: f64, b: f64) -> f64 {
    if a == b {
        return 1.0;
    }
    a.max(b) / a.min(b)
}

fn check_dimension(index: usize, dimension: &'static str, value: f64) -> Result<(), LayoutError> {
    if value.is_finite() && value > 0.0 {
        return Ok(());
    }
    tracing::warn!(
        "Squarify: degenerate {} ({}) for item at index {}, aborting layout",
        dimension,
        value,
        index
    );
    Err(LayoutError::DegenerateGeometry {
        index,
        dimension,
        value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{sample_items, Item, ItemId};

    const EPS: f64 = 1e-6;

    fn items(weights: &[f64]) -> Vec<Item> {
        weights
            .iter()
            .enumerate()
            .map(|(i, &qty)| Item::new(ItemId(i as u32), &format!("item{i}"), qty, 0.0))
            .collect()
    }

    fn run(items: &[Item], w: f64, h: f64) -> Vec<Placement> {
        let total: f64 = items.iter().map(|i| i.qty).sum();
        squarify(items, total, w, h).unwrap()
    }

    fn assert_rect(p: &Placement, x: f64, y: f64, w: f64, h: f64) {
        assert!(
            (p.x - x).abs() < EPS && (p.y - y).abs() < EPS && (p.w - w).abs() < EPS && (p.h - h).abs() < EPS,
            "{} at ({}, {}, {}, {}), expected ({}, {}, {}, {})",
            p.name,
            p.x,
            p.y,
            p.w,
            p.h,
            x,
            y,
            w,
            h
        );
    }

    #[test]
    fn single_item_fills_viewport() {
        for (w, h) in [(300.0, 200.0), (200.0, 300.0), (50.0, 50.0)] {
            let rects = run(&items(&[5.0]), w, h);
            assert_eq!(rects.len(), 1);
            assert_rect(&rects[0], 0.0, 0.0, w, h);
        }
    }

    #[test]
    fn sample_scenario_matches_reference_geometry() {
        let rects = run(&sample_items(), 1000.0, 800.0);
        assert_eq!(rects.len(), 6);

        // Pepsi + Sprite share the first horizontal strip.
        let strip1_w = 1000.0 * 11000.0 / 14300.0;
        let pepsi_h = 800.0 * 8000.0 / 11000.0;
        assert_rect(&rects[0], 0.0, 0.0, strip1_w, pepsi_h);
        assert_rect(&rects[1], 0.0, pepsi_h, strip1_w, 800.0 - pepsi_h);

        // The two 1000s each get their own vertical strip (already square).
        let rest_w = 1000.0 - strip1_w;
        let square_h = 800.0 * 1000.0 / 3300.0;
        assert_rect(&rects[2], strip1_w, 0.0, rest_w, square_h);
        assert_rect(&rects[3], strip1_w, square_h, rest_w, square_h);

        // 800 + 500 close the last strip side by side.
        let last_h = 800.0 - 2.0 * square_h;
        let fanta_w = rest_w * 800.0 / 1300.0;
        assert_rect(&rects[4], strip1_w, 2.0 * square_h, fanta_w, last_h);
        assert_rect(&rects[5], strip1_w + fanta_w, 2.0 * square_h, rest_w - fanta_w, last_h);

        let names: Vec<&str> = rects.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Pepsi", "Sprite", "CocaCola", "Guaraná Jesus", "Fanta Uva", "Guaraná"]);
    }

    #[test]
    fn reversed_order_groups_everything_into_one_strip() {
        let rects = run(&items(&[500.0, 800.0, 1000.0, 1000.0, 3000.0, 8000.0]), 1000.0, 800.0);
        assert_eq!(rects.len(), 6);
        let mut y = 0.0;
        for (rect, qty) in rects.iter().zip([500.0, 800.0, 1000.0, 1000.0, 3000.0, 8000.0]) {
            assert_rect(rect, 0.0, y, 1000.0, 800.0 * qty / 14300.0);
            y += rect.h;
        }
    }

    #[test]
    fn order_changes_grouping() {
        let forward = run(&items(&[8000.0, 3000.0, 1000.0, 1000.0, 800.0, 500.0]), 1000.0, 800.0);
        let reversed = run(&items(&[500.0, 800.0, 1000.0, 1000.0, 3000.0, 8000.0]), 1000.0, 800.0);
        let full_width = |rects: &[Placement]| rects.iter().filter(|r| (r.w - 1000.0).abs() < EPS).count();
        assert_eq!(full_width(&forward), 0);
        assert_eq!(full_width(&reversed), 6);
    }

    #[test]
    fn tall_frame_starts_with_a_vertical_strip() {
        // First strip is exactly square, so it stops right away; the leftover
        // square flips the second strip to horizontal.
        let rects = run(&items(&[1.0, 1.0]), 100.0, 200.0);
        assert_eq!(rects.len(), 2);
        assert_rect(&rects[0], 0.0, 0.0, 100.0, 100.0);
        assert_rect(&rects[1], 0.0, 100.0, 100.0, 100.0);
    }

    #[test]
    fn direction_follows_remaining_shape() {
        assert_eq!(Direction::for_remaining(100.0, 200.0), Direction::Vertical);
        assert_eq!(Direction::for_remaining(200.0, 100.0), Direction::Horizontal);
        assert_eq!(Direction::for_remaining(100.0, 100.0), Direction::Horizontal);
    }

    #[test]
    fn areas_are_proportional_to_weights() {
        let weights = [8000.0, 3000.0, 1000.0, 1000.0, 800.0, 500.0];
        let rects = run(&items(&weights), 1000.0, 800.0);
        let total: f64 = weights.iter().sum();
        for (rect, qty) in rects.iter().zip(weights) {
            assert!((rect.area() / 800_000.0 - qty / total).abs() < 1e-9);
        }
    }

    #[test]
    fn truncation_is_not_rounding() {
        assert_eq!(truncate_tenths(1.09), 1.0);
        assert_eq!(truncate_tenths(0.99), 0.9);
        assert_eq!(truncate_tenths(1.0505), 1.0);
        assert_eq!(truncate_tenths(1.8159), 1.8);
    }

    #[test]
    fn square_strip_rejects_any_candidate() {
        // Rule (b): the strip is already square, even though the average improves.
        assert!(rejects_candidate(2.4, 1.05, 1.0));
    }

    #[test]
    fn square_gap_rejects_when_average_is_in_band() {
        assert!(rejects_candidate(1.04, 0.5, 0.7));
        // Same gap, but the average falls outside [0.6, 1.4]: falls through to (c).
        assert!(!rejects_candidate(1.04, 0.09, 0.095));
    }

    #[test]
    fn candidate_must_improve_squareness() {
        assert!(!rejects_candidate(1.8, 0.70, 0.83));
        assert!(rejects_candidate(3.4, 0.83, 0.63));
        // Equal distance to the goal is not a regression.
        assert!(!rejects_candidate(3.0, 0.75, 1.25));
    }

    #[test]
    fn tied_average_keeps_growing_the_strip() {
        let list = items(&[8.0, 10.0, 8.0, 7.0]);
        let placements = run(&list, 956.0, 594.0);
        let strip_w = 753.2121212121212;
        assert_rect(&placements[0], 0.0, 0.0, strip_w, 182.76923076923077);
        assert_rect(&placements[1], 0.0, 182.76923076923077, strip_w, 228.46153846153848);
        assert_rect(&placements[2], 0.0, 411.2307692307693, strip_w, 182.76923076923077);
        assert_rect(&placements[3], strip_w, 0.0, 202.78787878787875, 594.0);
    }

    #[test]
    fn gap_ratio_of_equal_sides_is_one() {
        assert_eq!(long_over_short(5.0, 5.0), 1.0);
        assert_eq!(long_over_short(2.0, 8.0), 4.0);
        assert_eq!(non_zero_or(0.0, 7.0), 7.0);
        assert_eq!(non_zero_or(3.0, 7.0), 3.0);
    }

    #[test]
    fn vanishing_weight_is_reported_as_degenerate() {
        let list = items(&[1.0, 1e-320]);
        let err = squarify(&list, 1.0, 100.0, 100.0).unwrap_err();
        assert!(matches!(err, LayoutError::DegenerateGeometry { index: 1, .. }));
    }
}
