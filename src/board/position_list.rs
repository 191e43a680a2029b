//! Sorted, duplicate-free lists of grid positions

use super::Point;

/// Immutable set of grid positions stored as an ascending array.
///
/// Every constructor sorts and deduplicates, so consumers may rely on the
/// order (SGF writers emit points in this order, diffing merges them).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct BoardPositionList {
    positions: Vec<usize>,
}

impl BoardPositionList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_positions<I: IntoIterator<Item = usize>>(positions: I) -> Self {
        let mut positions: Vec<usize> = positions.into_iter().collect();
        positions.sort_unstable();
        positions.dedup();
        Self { positions }
    }

    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Self {
        Self::from_positions(points.into_iter().map(Point::to_position))
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    #[inline]
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        self.positions.iter().map(|&pos| Point::from_position(pos))
    }

    /// Binary-search membership test
    #[inline]
    pub fn contains(&self, pos: usize) -> bool {
        self.positions.binary_search(&pos).is_ok()
    }

    /// Set union, merging both sorted arrays
    pub fn union(&self, other: &BoardPositionList) -> BoardPositionList {
        let (a, b) = (&self.positions, &other.positions);
        let mut merged = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);

        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Less => {
                    merged.push(a[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    merged.push(b[j]);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    merged.push(a[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        merged.extend_from_slice(&a[i..]);
        merged.extend_from_slice(&b[j..]);

        BoardPositionList { positions: merged }
    }

    /// Positions of `self` not present in `other`
    pub fn difference(&self, other: &BoardPositionList) -> BoardPositionList {
        let positions = self
            .positions
            .iter()
            .copied()
            .filter(|&pos| !other.contains(pos))
            .collect();
        BoardPositionList { positions }
    }

    /// Whether the two sets share at least one position
    pub fn overlaps(&self, other: &BoardPositionList) -> bool {
        let (a, b) = (&self.positions, &other.positions);
        let (mut i, mut j) = (0, 0);

        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => return true,
            }
        }

        false
    }
}

impl FromIterator<Point> for BoardPositionList {
    fn from_iter<I: IntoIterator<Item = Point>>(iter: I) -> Self {
        Self::from_points(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::position;
    use std::collections::BTreeSet;

    fn is_strictly_ascending(list: &BoardPositionList) -> bool {
        list.positions().windows(2).all(|w| w[0] < w[1])
    }

    #[test]
    fn test_construction_sorts_and_dedups() {
        let list = BoardPositionList::from_positions([40, 3, 40, 17, 3]);
        assert_eq!(list.positions(), &[3, 17, 40]);
        assert!(is_strictly_ascending(&list));
    }

    #[test]
    fn test_union_matches_set_union() {
        let a = BoardPositionList::from_positions([1, 5, 9, 30, 31]);
        let b = BoardPositionList::from_positions([0, 5, 10, 31, 99]);
        let union = a.union(&b);

        let expected: BTreeSet<usize> = a.positions().iter().chain(b.positions()).copied().collect();
        assert!(is_strictly_ascending(&union));
        assert_eq!(union.positions(), expected.into_iter().collect::<Vec<_>>().as_slice());

        assert_eq!(a.union(&BoardPositionList::new()), a);
    }

    #[test]
    fn test_difference() {
        let a = BoardPositionList::from_positions([1, 5, 9, 30]);
        let b = BoardPositionList::from_positions([5, 30, 44]);
        assert_eq!(a.difference(&b).positions(), &[1, 9]);
        assert!(b.difference(&b).is_empty());
    }

    #[test]
    fn test_overlap() {
        let a = BoardPositionList::from_positions([2, 4, 6]);
        let b = BoardPositionList::from_positions([1, 3, 5, 7]);
        let c = BoardPositionList::from_positions([7, 6]);

        assert!(!a.overlaps(&b));
        assert!(a.overlaps(&c));
        assert!(b.overlaps(&c));
        assert!(!a.overlaps(&BoardPositionList::new()));
    }

    #[test]
    fn test_contains_and_points() {
        let list: BoardPositionList = [Point::new(3, 3), Point::new(0, 1)].into_iter().collect();
        assert!(list.contains(position(3, 3)));
        assert!(!list.contains(position(1, 0)));
        let points: Vec<Point> = list.points().collect();
        assert_eq!(points, vec![Point::new(0, 1), Point::new(3, 3)]);
    }
}
