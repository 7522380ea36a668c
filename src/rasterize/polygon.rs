//! Center-sampling polygon scan conversion
//!
//! Pixel `(col, row)` is inside when its center `(col + 0.5, row + 0.5)` is
//! inside the polygon under the even-odd rule. An edge crosses a scanline
//! when `y0 <= yc < y1` and a center is covered when `x_left <= xc < x_right`,
//! so polygons sharing an edge never both claim the pixels along it.

/// Calls `plot(row, col_start, col_end)` for every covered span of the
/// polygon inside a `width x height` grid, `col_end` exclusive
pub fn scan_fill<F>(points: &[(f64, f64)], width: u32, height: u32, mut plot: F)
where
    F: FnMut(usize, usize, usize),
{
    if points.len() < 3 || width == 0 || height == 0 {
        return;
    }

    let (min_y, max_y) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &(_, y)| {
        (lo.min(y), hi.max(y))
    });
    // Rows whose center lies in [min_y, max_y)
    let first_row = (min_y - 0.5).ceil().max(0.0);
    let last_row = ((max_y - 0.5).ceil()).min(height as f64);
    if first_row >= last_row {
        return;
    }

    let mut crossings: Vec<f64> = Vec::with_capacity(points.len());
    for row in first_row as usize..last_row as usize {
        let yc = row as f64 + 0.5;
        crossings.clear();

        for (i, &(x0, y0)) in points.iter().enumerate() {
            let (x1, y1) = points[(i + 1) % points.len()];
            let ((xa, ya), (xb, yb)) = if y0 <= y1 { ((x0, y0), (x1, y1)) } else { ((x1, y1), (x0, y0)) };
            if ya <= yc && yc < yb {
                crossings.push(xa + (yc - ya) * (xb - xa) / (yb - ya));
            }
        }
        crossings.sort_by(|a, b| a.total_cmp(b));

        for pair in crossings.chunks_exact(2) {
            let start = (pair[0] - 0.5).ceil().max(0.0);
            let end = (pair[1] - 0.5).ceil().min(width as f64);
            if start < end {
                plot(row, start as usize, end as usize);
            }
        }
    }
}

/// Corners of a box rotated clockwise by `rotation` degrees about its center
///
/// Image rows grow downwards, so the usual rotation matrix turns clockwise
/// on screen.
pub fn box_corners(xtl: f64, ytl: f64, xbr: f64, ybr: f64, rotation: f64) -> Vec<(f64, f64)> {
    let corners = vec![(xtl, ytl), (xbr, ytl), (xbr, ybr), (xtl, ybr)];
    if rotation == 0.0 {
        return corners;
    }

    let (cx, cy) = ((xtl + xbr) / 2.0, (ytl + ybr) / 2.0);
    let (sin, cos) = rotation.to_radians().sin_cos();
    corners.into_iter()
        .map(|(x, y)| {
            let (dx, dy) = (x - cx, y - cy);
            (cx + dx * cos - dy * sin, cy + dx * sin + dy * cos)
        })
        .collect()
}
