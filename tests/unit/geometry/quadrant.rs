use super::*;

fn deck_layout() -> QuadrantLayout {
    // Matrix chart box x=1.2 y=1.0 w=8.2 h=4.0.
    QuadrantLayout::centered_in(
        Rect::new(1.2, 1.0, 9.4, 5.0),
        Size::new(3.9, 1.8),
        0.15,
    )
}

fn overlaps(a: Rect, b: Rect) -> bool {
    a.x0 < b.x1 && b.x0 < a.x1 && a.y0 < b.y1 && b.y0 < a.y1
}

#[test]
fn boxes_match_corner_formulas() {
    let c = Point::new(10.0, 20.0);
    let card = Size::new(4.0, 2.0);
    let g = 0.5;
    assert_eq!(
        quadrant_rect(c, card, g, QuadrantId::A),
        Rect::new(5.5, 17.5, 9.5, 19.5)
    );
    assert_eq!(
        quadrant_rect(c, card, g, QuadrantId::B),
        Rect::new(10.5, 17.5, 14.5, 19.5)
    );
    assert_eq!(
        quadrant_rect(c, card, g, QuadrantId::C),
        Rect::new(5.5, 20.5, 9.5, 22.5)
    );
    assert_eq!(
        quadrant_rect(c, card, g, QuadrantId::D),
        Rect::new(10.5, 20.5, 14.5, 22.5)
    );
}

#[test]
fn cards_are_pairwise_disjoint() {
    let rects = deck_layout().rects();
    for (i, (qa, a)) in rects.iter().enumerate() {
        for (qb, b) in &rects[i + 1..] {
            assert!(!overlaps(*a, *b), "{qa:?} overlaps {qb:?}");
        }
    }
}

#[test]
fn cards_are_symmetric_about_both_center_lines() {
    let layout = deck_layout();
    let c = layout.center;
    let a = layout.rect(QuadrantId::A);
    let b = layout.rect(QuadrantId::B);
    let cc = layout.rect(QuadrantId::C);
    let d = layout.rect(QuadrantId::D);

    let eps = 1e-9;
    assert!((c.x - a.x1 - (b.x0 - c.x)).abs() < eps);
    assert!((c.x - a.x0 - (b.x1 - c.x)).abs() < eps);
    assert!((c.y - a.y1 - (cc.y0 - c.y)).abs() < eps);
    assert!((d.x0 - b.x0).abs() < eps && (d.y0 - cc.y0).abs() < eps);
}

#[test]
fn deck_cards_stay_inside_chart_box() {
    let layout = deck_layout();
    let chart = Rect::new(1.2, 1.0, 9.4, 5.0);
    let bounds = layout.bounds();
    assert!(bounds.x0 >= chart.x0 && bounds.x1 <= chart.x1);
    assert!(bounds.y0 >= chart.y0 && bounds.y1 <= chart.y1);
}
