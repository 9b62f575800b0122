//! Placement record for segments on the unit interval.

/// Sorted, non-overlapping segments on `[0, 1)` and the free gaps between them.
///
/// `gaps[i]` is the free space between the end of segment `i - 1` (or the
/// left boundary `0`) and the start of segment `i` (or the right boundary
/// `1`), so there is always exactly one more gap than segments.
#[derive(Debug, Clone)]
pub struct Layout {
    starts: Vec<f64>,
    ends: Vec<f64>,
    gaps: Vec<f64>,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout {
    /// An empty interval: no segments, one gap of length 1.
    pub fn new() -> Self {
        Self {
            starts: Vec::new(),
            ends: Vec::new(),
            gaps: vec![1.0],
        }
    }

    /// Number of placed segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    #[inline]
    pub fn gaps(&self) -> &[f64] {
        &self.gaps
    }

    /// Largest free gap.
    pub fn max_gap(&self) -> f64 {
        self.gaps.iter().copied().fold(0.0, f64::max)
    }

    /// Whether any gap is strictly longer than `length`.
    pub fn has_gap_longer_than(&self, length: f64) -> bool {
        self.gaps.iter().any(|&g| g > length)
    }

    /// Placed segments as `(start, end)` pairs, ascending by start.
    pub fn segments(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.starts.iter().copied().zip(self.ends.iter().copied())
    }

    /// Index of the gap that `start` falls into.
    #[inline]
    fn slot(&self, start: f64) -> usize {
        self.starts.partition_point(|&s| s <= start)
    }

    /// Bounds `(end of previous segment, start of next segment)` of gap `slot`.
    #[inline]
    fn bounds(&self, slot: usize) -> (f64, f64) {
        let left = if slot == 0 { 0.0 } else { self.ends[slot - 1] };
        let right = self.starts.get(slot).copied().unwrap_or(1.0);
        (left, right)
    }

    /// Whether a segment of `length` starting at `start` lies inside a free gap.
    ///
    /// The start must fall in `[previous end, next start - length)`.
    pub fn fits(&self, start: f64, length: f64) -> bool {
        let (left, right) = self.bounds(self.slot(start));
        left <= start && start < right - length
    }

    /// Place a segment, splitting the gap it lands in.
    ///
    /// Returns `false` and leaves the layout untouched if the segment does
    /// not fit.
    pub fn insert(&mut self, start: f64, length: f64) -> bool {
        let slot = self.slot(start);
        let (left, right) = self.bounds(slot);
        if !(left <= start && start < right - length) {
            return false;
        }

        let end = start + length;
        self.starts.insert(slot, start);
        self.ends.insert(slot, end);
        self.gaps[slot] = start - left;
        self.gaps.insert(slot + 1, right - end);
        true
    }

    /// Total occupied length.
    pub fn occupied(&self) -> f64 {
        self.segments().map(|(s, e)| e - s).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_layout_has_single_unit_gap() {
        let layout = Layout::new();
        assert!(layout.is_empty());
        assert_eq!(layout.gaps(), &[1.0]);
        assert_eq!(layout.max_gap(), 1.0);
    }

    #[test]
    fn test_insert_splits_gap() {
        let mut layout = Layout::new();
        assert!(layout.insert(0.25, 0.5));
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.gaps(), &[0.25, 0.25]);
        assert_eq!(layout.max_gap(), 0.25);
    }

    #[test]
    fn test_insert_keeps_starts_sorted() {
        let mut layout = Layout::new();
        assert!(layout.insert(0.5, 0.125));
        assert!(layout.insert(0.0, 0.25));
        assert!(layout.insert(0.75, 0.125));

        let starts: Vec<f64> = layout.segments().map(|(s, _)| s).collect();
        assert_eq!(starts, vec![0.0, 0.5, 0.75]);
        assert_eq!(layout.gaps(), &[0.0, 0.25, 0.125, 0.125]);
    }

    #[test]
    fn test_fits_rejects_overlap() {
        let mut layout = Layout::new();
        assert!(layout.insert(0.4, 0.2));
        // Start inside the placed segment.
        assert!(!layout.fits(0.5, 0.01));
        // Would run into the placed segment.
        assert!(!layout.fits(0.3, 0.15));
        // Would run past the right boundary.
        assert!(!layout.fits(0.9, 0.2));
        assert!(layout.fits(0.1, 0.2));
        assert!(layout.fits(0.7, 0.2));
    }

    #[test]
    fn test_rejected_insert_leaves_layout_untouched() {
        let mut layout = Layout::new();
        assert!(layout.insert(0.0, 0.5));
        assert!(!layout.insert(0.6, 0.5));
        assert_eq!(layout.len(), 1);
        assert_eq!(layout.gaps(), &[0.0, 0.5]);
    }

    #[test]
    fn test_gap_threshold_is_strict() {
        let mut layout = Layout::new();
        assert!(layout.insert(0.0, 0.5));
        assert!(!layout.has_gap_longer_than(0.5));
        assert!(layout.has_gap_longer_than(0.49));
    }

    #[test]
    fn test_occupied() {
        let mut layout = Layout::new();
        layout.insert(0.0, 0.25);
        layout.insert(0.5, 0.25);
        assert!((layout.occupied() - 0.5).abs() < 1e-12);
    }
}
