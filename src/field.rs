use crate::error::{Error, Result};
use crate::model::{Board, Design, Position, PositionField};

/// Evenly spaced grid of candidate positions between `margin` and `W - margin` (resp.
/// `H`), snapped to `grid` and deduplicated in row-major (y-outer, x-inner) order.
///
/// Out of the core's scope per the spec (this is the "external collaborator" grid
/// producer), kept minimal and undocumented relative to the rest of the crate.
pub fn generate_grid(board: &Board, nx: usize, ny: usize) -> PositionField {
    let xs = linspace(board.margin, board.width - board.margin, nx);
    let ys = linspace(board.margin, board.height - board.margin, ny);

    let mut field = Vec::with_capacity(nx * ny);
    let mut seen = std::collections::HashSet::new();
    for &y in &ys {
        for &x in &xs {
            let (sx, sy) = (snap(x, board.grid), snap(y, board.grid));
            let key = (sx.to_bits(), sy.to_bits());
            if seen.insert(key) {
                field.push(Position::new(sx, sy));
            }
        }
    }
    field
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    if n == 0 {
        return Vec::new();
    }
    if n == 1 {
        return vec![(start + end) / 2.0];
    }
    let step = (end - start) / (n - 1) as f64;
    (0..n).map(|i| start + step * i as f64).collect()
}

fn snap(value: f64, grid: f64) -> f64 {
    if grid <= 0.0 {
        value
    } else {
        (value / grid).round() * grid
    }
}

/// Resolve the candidate position field for a Design: use its embedded field verbatim
/// when it is large enough, otherwise fall back to the grid producer. Fails with
/// `InsufficientPositions` if neither supplies enough slots for every component.
pub fn resolve_field(design: &Design, nx: usize, ny: usize) -> Result<PositionField> {
    let needed = design.component_count();

    let field = match &design.field {
        Some(field) if field.len() >= needed => field.clone(),
        _ => generate_grid(&design.board, nx, ny),
    };

    if field.len() < needed {
        return Err(Error::InsufficientPositions(field.len(), needed));
    }
    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_is_deduplicated_and_snapped() {
        let board = Board {
            width: 100.0,
            height: 100.0,
            grid: 1.0,
            margin: 5.0,
        };
        let field = generate_grid(&board, 2, 2);
        assert_eq!(field.len(), 4);
        assert_eq!(field[0], Position::new(5.0, 5.0));
        assert_eq!(field[3], Position::new(95.0, 95.0));
    }

    #[test]
    fn single_column_places_midpoint() {
        let board = Board {
            width: 100.0,
            height: 100.0,
            grid: 1.0,
            margin: 0.0,
        };
        let field = generate_grid(&board, 1, 1);
        assert_eq!(field, vec![Position::new(50.0, 50.0)]);
    }

    #[test]
    fn explicit_field_overrides_grid() {
        let mut design = Design {
            board: Board {
                width: 100.0,
                height: 100.0,
                grid: 1.0,
                margin: 5.0,
            },
            components: vec![crate::model::Component {
                name: "A".into(),
                w: 1.0,
                h: 1.0,
                movable: true,
                geometry: None,
            }],
            nets: Vec::new(),
            links: Vec::new(),
            field: Some(vec![Position::new(1.0, 1.0)]),
        };
        let field = resolve_field(&design, 16, 10).unwrap();
        assert_eq!(field, vec![Position::new(1.0, 1.0)]);

        design.field = Some(vec![]);
        let field = resolve_field(&design, 2, 2).unwrap();
        assert_eq!(field.len(), 4);
    }

    #[test]
    fn insufficient_positions_is_reported() {
        let design = Design {
            board: Board {
                width: 10.0,
                height: 10.0,
                grid: 1.0,
                margin: 1.0,
            },
            components: (0..5)
                .map(|i| crate::model::Component {
                    name: format!("C{}", i),
                    w: 1.0,
                    h: 1.0,
                    movable: true,
                    geometry: None,
                })
                .collect(),
            nets: Vec::new(),
            links: Vec::new(),
            field: None,
        };
        let err = resolve_field(&design, 2, 2).unwrap_err();
        match err {
            Error::InsufficientPositions(have, need) => {
                assert_eq!(have, 4);
                assert_eq!(need, 5);
            }
            other => panic!("expected InsufficientPositions, got {:?}", other),
        }
    }
}
