use super::*;

fn chart() -> RadarGeometry {
    RadarGeometry::new(Point::new(100.0, 100.0), 80.0, 5).unwrap()
}

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn zero_is_center_and_max_is_on_outer_ring() {
    let g = chart();
    for i in 0..5 {
        assert_eq!(g.point(0.0, i), g.center);
        let p = g.point(RADAR_SCALE_MAX, i);
        assert!(approx(p.distance(g.center), g.radius), "axis {i}: {p:?}");
    }
}

#[test]
fn first_axis_points_north() {
    let g = chart();
    for v in [1.0, 2.5, 5.0] {
        let p = g.point(v, 0);
        assert!(approx(p.x, g.center.x));
        assert!(p.y < g.center.y);
    }
}

#[test]
fn axes_proceed_clockwise() {
    let g = chart();
    // Axis 1 sits right of north in screen space.
    let p = g.point(5.0, 1);
    assert!(p.x > g.center.x);
    assert!(p.y < g.center.y);
    // Axis 4 mirrors it on the left.
    let q = g.point(5.0, 4);
    assert!(approx(q.x, 2.0 * g.center.x - p.x));
    assert!(approx(q.y, p.y));
}

#[test]
fn rings_are_pentagons_scaled_linearly() {
    let g = chart();
    let rings = g.rings();
    assert_eq!(rings.len(), 5);
    for (level, ring) in rings.iter().enumerate() {
        assert_eq!(ring.len(), 5);
        let expected = (level as f64 + 1.0) / 5.0 * g.radius;
        for p in ring {
            assert!(approx(p.distance(g.center), expected));
        }
    }
}

#[test]
fn out_of_range_values_extrapolate() {
    let g = chart();
    let p = g.point(6.0, 2);
    assert!(approx(p.distance(g.center), 96.0));
    let label = g.label_point(2, 22.0);
    assert!(approx(label.distance(g.center), 102.0));
}

#[test]
fn polygon_ignores_extra_values() {
    let g = chart();
    assert_eq!(g.polygon(&[1.0, 2.0, 3.0, 4.0, 5.0, 5.0]).len(), 5);
}

#[test]
fn invalid_geometry_is_rejected() {
    assert!(RadarGeometry::new(Point::ORIGIN, 0.0, 5).is_err());
    assert!(RadarGeometry::new(Point::ORIGIN, 10.0, 2).is_err());
}

#[test]
fn svg_points_are_compact() {
    assert_eq!(fmt_coord(100.0), "100");
    assert_eq!(fmt_coord(36.5), "36.5");
    assert_eq!(fmt_coord(-0.001), "0");
    assert_eq!(
        svg_points(&[Point::new(1.0, 2.25), Point::new(3.333, 4.0)]),
        "1,2.25 3.33,4"
    );
}
