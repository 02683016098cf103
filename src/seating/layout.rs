//! Grid geometry: spread fill order and 8-neighborhoods.
//!
//! Cells are `(x, y)` with `x` the column and `y` the row, both from 0.

/// Fill order for `count` occupants of a `columns × rows` grid.
///
/// - `count ≥ cells`: row-major.
/// - spacing `cells / count` of at least 2: checkerboard, first every cell
///   with `x ≡ y (mod 2)`, then the remaining cells, both row-major.
/// - otherwise: row-major.
///
/// Returns at most `min(count, cells)` distinct cells.
pub fn spread_positions(count: usize, columns: usize, rows: usize) -> Vec<(usize, usize)> {
    let cells = columns * rows;
    if count == 0 || cells == 0 {
        return Vec::new();
    }

    let spacing = if count >= cells {
        1
    } else {
        (cells / count).max(1)
    };

    let order: Vec<(usize, usize)> = if spacing >= 2 {
        let primary = row_major(columns, rows).filter(|&(x, y)| x % 2 == y % 2);
        let secondary = row_major(columns, rows).filter(|&(x, y)| x % 2 != y % 2);
        primary.chain(secondary).collect()
    } else {
        row_major(columns, rows).collect()
    };

    order.into_iter().take(count).collect()
}

/// Every cell of the grid in row-major order.
pub fn row_major(columns: usize, rows: usize) -> impl Iterator<Item = (usize, usize)> {
    (0..rows).flat_map(move |y| (0..columns).map(move |x| (x, y)))
}

/// In-bounds cells of the 8-neighborhood of `(x, y)`.
pub fn neighborhood(
    x: usize,
    y: usize,
    columns: usize,
    rows: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let xs = x.saturating_sub(1)..=(x + 1).min(columns.saturating_sub(1));
    let ys = y.saturating_sub(1)..=(y + 1).min(rows.saturating_sub(1));
    ys.flat_map(move |ny| xs.clone().map(move |nx| (nx, ny)))
        .filter(move |&cell| cell != (x, y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_sparse_room_uses_checkerboard() {
        let cells = spread_positions(10, 6, 5);
        assert_eq!(cells.len(), 10);
        assert_eq!(&cells[..4], &[(0, 0), (2, 0), (4, 0), (1, 1)]);
        assert!(cells.iter().all(|&(x, y)| x % 2 == y % 2));
    }

    #[test]
    fn test_dense_room_is_row_major() {
        // 30 cells / 28 = spacing 1.
        let cells = spread_positions(28, 6, 5);
        assert_eq!(cells.len(), 28);
        assert_eq!(cells[0], (0, 0));
        assert_eq!(cells[6], (0, 1));
        let unique: HashSet<_> = cells.iter().collect();
        assert_eq!(unique.len(), 28);
        assert!(cells.iter().all(|&(x, y)| x < 6 && y < 5));
    }

    #[test]
    fn test_checkerboard_overflows_to_second_pass() {
        // 6x5: 15 primary cells; 15 occupants still fit the first pass.
        let cells = spread_positions(15, 6, 5);
        assert!(cells.iter().all(|&(x, y)| x % 2 == y % 2));

        // 3x3 with 4 occupants: spacing 2, 5 primary cells.
        let cells = spread_positions(4, 3, 3);
        assert_eq!(cells, vec![(0, 0), (2, 0), (1, 1), (0, 2)]);
    }

    #[test]
    fn test_more_occupants_than_cells() {
        let cells = spread_positions(10, 2, 2);
        assert_eq!(cells, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(spread_positions(0, 6, 5).is_empty());
        assert!(spread_positions(3, 0, 5).is_empty());
    }

    #[test]
    fn test_neighborhood_clipped_at_corner() {
        let n: Vec<_> = neighborhood(0, 0, 3, 3).collect();
        assert_eq!(n, vec![(1, 0), (0, 1), (1, 1)]);
    }

    #[test]
    fn test_neighborhood_interior() {
        let n: HashSet<_> = neighborhood(1, 1, 3, 3).collect();
        assert_eq!(n.len(), 8);
        assert!(!n.contains(&(1, 1)));
    }

    #[test]
    fn test_neighborhood_single_row() {
        let n: Vec<_> = neighborhood(1, 0, 3, 1).collect();
        assert_eq!(n, vec![(0, 0), (2, 0)]);
    }
}
