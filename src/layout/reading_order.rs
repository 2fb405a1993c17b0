//! Reading-order reconstruction for detected regions.
//!
//! Imposes a deterministic linear order over the unordered region set the
//! detector produces for a page.

use super::Region;

/// Sort regions into reading order: ascending top-edge y, ties keeping the
/// original detection order.
///
/// This is a linear top-to-bottom approximation, not true reading-order
/// inference: side-by-side columns will interleave. The tie-break leans on
/// the stability of the sort, so regions sharing a top edge stay in the
/// order the detector emitted them.
pub fn sort_reading_order(mut regions: Vec<Region>) -> Vec<Region> {
    // Vec::sort_by is stable; equal y1 preserves input order.
    regions.sort_by(|a, b| a.bbox.y1.cmp(&b.bbox.y1));
    regions
}

// ============================================================
// Tests
// ============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::BBox;

    fn make_region(label: &str, x1: u32, y1: u32) -> Region {
        Region {
            label: label.to_string(),
            bbox: BBox::new(x1, y1, x1 + 100, y1 + 40),
            confidence: 0.9,
        }
    }

    #[test]
    fn test_sorts_by_top_edge() {
        let regions = vec![
            make_region("Text", 0, 400),
            make_region("Section-header", 0, 50),
            make_region("Picture", 0, 200),
        ];

        let ordered = sort_reading_order(regions);

        let labels: Vec<_> = ordered.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["Section-header", "Picture", "Text"]);
    }

    #[test]
    fn test_ties_keep_detection_order() {
        // Two side-by-side regions with the same top edge: the one detected
        // first stays first, regardless of horizontal position.
        let regions = vec![
            make_region("right", 500, 100),
            make_region("left", 0, 100),
            make_region("below", 0, 300),
        ];

        let ordered = sort_reading_order(regions);

        let labels: Vec<_> = ordered.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, ["right", "left", "below"]);
    }

    #[test]
    fn test_order_is_deterministic() {
        let build = || {
            vec![
                make_region("a", 10, 30),
                make_region("b", 10, 10),
                make_region("c", 10, 20),
                make_region("d", 90, 10),
            ]
        };

        let first: Vec<_> = sort_reading_order(build())
            .iter()
            .map(|r| r.label.clone())
            .collect();
        let second: Vec<_> = sort_reading_order(build())
            .iter()
            .map(|r| r.label.clone())
            .collect();

        assert_eq!(first, second);
        assert_eq!(first, ["b", "d", "a", "c"]);
    }

    #[test]
    fn test_empty_and_single() {
        assert!(sort_reading_order(Vec::new()).is_empty());

        let single = sort_reading_order(vec![make_region("only", 0, 0)]);
        assert_eq!(single.len(), 1);
    }
}
