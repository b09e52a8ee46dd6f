//! Cell grid derivation from structure-recognition output.
//!
//! Rows and columns arrive as independent labeled boxes; a cell is the
//! intersection of a column's horizontal extent with a row's vertical
//! extent. The grid is dense: every (row, column) pair yields a cell, even
//! when the region is visually empty.

use super::types::{BBox, DetectedObject, TABLE_COLUMN_LABEL, TABLE_ROW_LABEL};

/// One cell position in the derived grid.
#[derive(Debug, Clone)]
pub struct CellCoordinate {
    pub column: BBox,
    pub cell: BBox,
}

/// One grid row: the row box plus one cell per detected column,
/// ordered left to right.
#[derive(Debug, Clone)]
pub struct RowCells {
    pub row: BBox,
    pub cells: Vec<CellCoordinate>,
    pub cell_count: usize,
}

/// Derive the dense cell grid from structure-recognition objects.
///
/// Rows are ordered by top edge, columns by left edge. Zero detected rows
/// or columns produces an empty grid, which downstream reports as an empty
/// table rather than an error.
pub fn build_cell_grid(objects: &[DetectedObject]) -> Vec<RowCells> {
    let mut rows: Vec<&DetectedObject> = objects
        .iter()
        .filter(|o| o.label == TABLE_ROW_LABEL)
        .collect();
    let mut columns: Vec<&DetectedObject> = objects
        .iter()
        .filter(|o| o.label == TABLE_COLUMN_LABEL)
        .collect();

    if rows.is_empty() || columns.is_empty() {
        return vec![];
    }

    rows.sort_by(|a, b| a.bbox.y0.total_cmp(&b.bbox.y0));
    columns.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));

    rows.iter()
        .map(|row| {
            let cells: Vec<CellCoordinate> = columns
                .iter()
                .map(|column| CellCoordinate {
                    column: column.bbox,
                    cell: BBox::new(
                        column.bbox.x0,
                        row.bbox.y0,
                        column.bbox.x1,
                        row.bbox.y1,
                    ),
                })
                .collect();
            let cell_count = cells.len();
            RowCells {
                row: row.bbox,
                cells,
                cell_count,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn object(label: &str, x0: f32, y0: f32, x1: f32, y1: f32) -> DetectedObject {
        DetectedObject {
            label: label.to_string(),
            score: 0.9,
            bbox: BBox::new(x0, y0, x1, y1),
        }
    }

    fn two_by_three() -> Vec<DetectedObject> {
        vec![
            // Rows out of order on purpose
            object(TABLE_ROW_LABEL, 0.0, 40.0, 300.0, 80.0),
            object(TABLE_ROW_LABEL, 0.0, 0.0, 300.0, 40.0),
            // Columns out of order on purpose
            object(TABLE_COLUMN_LABEL, 200.0, 0.0, 300.0, 80.0),
            object(TABLE_COLUMN_LABEL, 0.0, 0.0, 100.0, 80.0),
            object(TABLE_COLUMN_LABEL, 100.0, 0.0, 200.0, 80.0),
        ]
    }

    #[test]
    fn grid_is_row_major_and_sorted() {
        let grid = build_cell_grid(&two_by_three());
        assert_eq!(grid.len(), 2);
        assert!(grid[0].row.y0 < grid[1].row.y0);
        for row in &grid {
            assert_eq!(row.cell_count, 3);
            assert!(row.cells[0].column.x0 < row.cells[1].column.x0);
            assert!(row.cells[1].column.x0 < row.cells[2].column.x0);
        }
    }

    #[test]
    fn cell_is_column_row_intersection() {
        let grid = build_cell_grid(&two_by_three());
        let cell = &grid[1].cells[2].cell;
        assert_eq!(cell.x0, 200.0);
        assert_eq!(cell.y0, 40.0);
        assert_eq!(cell.x1, 300.0);
        assert_eq!(cell.y1, 80.0);
    }

    #[test]
    fn no_rows_yields_empty_grid() {
        let objects = vec![object(TABLE_COLUMN_LABEL, 0.0, 0.0, 100.0, 80.0)];
        assert!(build_cell_grid(&objects).is_empty());
    }

    #[test]
    fn no_columns_yields_empty_grid() {
        let objects = vec![object(TABLE_ROW_LABEL, 0.0, 0.0, 300.0, 40.0)];
        assert!(build_cell_grid(&objects).is_empty());
    }

    #[test]
    fn unrelated_labels_ignored() {
        let mut objects = two_by_three();
        objects.push(object("table column header", 0.0, 0.0, 300.0, 10.0));
        let grid = build_cell_grid(&objects);
        assert_eq!(grid.len(), 2);
        assert_eq!(grid[0].cell_count, 3);
    }
}
