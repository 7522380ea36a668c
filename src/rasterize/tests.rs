//! Tests for scan conversion and compositing

use super::{box_corners, scan_fill, LabelCanvas};
use crate::annotations::{parse_cvat_str, Annotation, LabelMap, Shape};

fn covered(points: &[(f64, f64)], width: u32, height: u32) -> Vec<(usize, usize)> {
    let mut pixels = Vec::new();
    scan_fill(points, width, height, |row, start, end| {
        pixels.extend((start..end).map(|col| (col, row)));
    });
    pixels
}

fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Vec<(f64, f64)> {
    vec![(x0, y0), (x1, y0), (x1, y1), (x0, y1)]
}

#[test]
fn test_integer_square_covers_exact_pixels() {
    let pixels = covered(&square(1.0, 1.0, 3.0, 4.0), 10, 10);
    assert_eq!(pixels, vec![(1, 1), (2, 1), (1, 2), (2, 2), (1, 3), (2, 3)]);
}

#[test]
fn test_adjacent_polygons_share_no_pixels() {
    let left = covered(&square(0.0, 0.0, 2.5, 4.0), 8, 8);
    let right = covered(&square(2.5, 0.0, 5.0, 4.0), 8, 8);
    assert!(left.iter().all(|p| !right.contains(p)));
    assert_eq!(left.len() + right.len(), 5 * 4);
}

#[test]
fn test_center_on_right_edge_is_excluded() {
    // Pixel centers at x = 0.5 and 1.5; the right edge passes through 1.5
    let pixels = covered(&square(0.5, 0.0, 1.5, 1.0), 4, 4);
    assert_eq!(pixels, vec![(0, 0)]);
}

#[test]
fn test_triangle_even_odd() {
    let pixels = covered(&[(0.0, 0.0), (4.0, 0.0), (0.0, 4.0)], 4, 4);
    // Row centers 0.5..3.5 leave spans of 3, 2, 1 and 0 pixels
    assert_eq!(pixels.len(), 3 + 2 + 1);
    assert!(pixels.contains(&(2, 0)));
    assert!(!pixels.contains(&(3, 0)));
}

#[test]
fn test_polygon_is_clipped_to_grid() {
    let pixels = covered(&square(-5.0, -5.0, 2.0, 2.0), 3, 3);
    assert_eq!(pixels.len(), 4);
    assert!(covered(&square(10.0, 10.0, 20.0, 20.0), 3, 3).is_empty());
    assert!(covered(&[(0.0, 0.0), (2.0, 2.0)], 3, 3).is_empty());
}

#[test]
fn test_box_rotation_quarter_turn() {
    let corners = box_corners(0.0, 0.0, 4.0, 2.0, 90.0);
    let (x, y) = corners[0];
    // Top-left corner of a 4x2 box centered on (2, 1) lands top-right
    assert!((x - 3.0).abs() < 1e-9 && (y - -1.0).abs() < 1e-9);
    assert_eq!(box_corners(0.0, 0.0, 4.0, 2.0, 0.0), square(0.0, 0.0, 4.0, 2.0));
}

#[test]
fn test_mask_painted_at_offset_and_clipped() {
    let mut canvas = LabelCanvas::new(4, 4);
    let mask = vec![true; 9];
    canvas.paint_mask(&mask, 2, 2, 3, 3, 7);
    assert_eq!(canvas.get(2, 2), Some(7));
    assert_eq!(canvas.get(3, 3), Some(7));
    assert_eq!(canvas.get(1, 2), Some(0));
    assert_eq!(canvas.pixels().iter().filter(|&&v| v == 7).count(), 4);
}

#[test]
fn test_later_shapes_win_overlaps() {
    let xml = r#"<annotations>
      <meta><task><labels>
        <label><name>A</name></label><label><name>B</name></label>
      </labels></task></meta>
      <image name="tile1.png" width="100" height="100">
        <box label="A" xtl="10" ytl="10" xbr="50" ybr="50"/>
        <polygon label="B" points="30,30;70,30;70,70;30,70"/>
      </image>
    </annotations>"#;
    let set = parse_cvat_str(xml).unwrap();
    let labels = LabelMap::build(&set).unwrap();

    let mut canvas = LabelCanvas::new(100, 100);
    assert_eq!(canvas.draw_all(&set.images[0].annotations, &labels), 2);

    let count = |v: u8| canvas.pixels().iter().filter(|&&p| p == v).count();
    assert_eq!(count(2), 40 * 40);
    assert_eq!(count(1), 40 * 40 - 20 * 20);
    assert_eq!(canvas.get(35, 35), Some(2));
    assert_eq!(canvas.get(10, 10), Some(1));
    assert_eq!(canvas.get(50, 50), Some(2));
    assert_eq!(canvas.get(9, 9), Some(0));
}

#[test]
fn test_unknown_label_is_not_drawn() {
    let labels = LabelMap::default();
    let mut canvas = LabelCanvas::new(2, 2);
    let annotation = Annotation {
        label: "ghost".to_string(),
        shape: Shape::Polygon(square(0.0, 0.0, 2.0, 2.0)),
    };
    assert!(!canvas.draw(&annotation, &labels));
    assert!(canvas.pixels().iter().all(|&v| v == 0));
    assert_eq!(canvas.into_raster().bands[0].len(), 4);
}
