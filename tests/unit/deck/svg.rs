use super::*;
use crate::deck::{
    model::{RadarSeries, SlideKind, Stroke, TextStyle},
    text_fit::fit_text,
};

fn text_el(text: &str, style: TextStyle) -> TextEl {
    let rect = Rect::new(1.0, 1.0, 4.0, 1.5);
    TextEl {
        rect,
        text: text.to_string(),
        fitted: fit_text(text, rect, style.font_pt, style.font_pt, style.line_height),
        style,
    }
}

#[test]
fn escapes_markup() {
    assert_eq!(
        escape_xml(r#"<a & 'b' "c">"#),
        "&lt;a &amp; &apos;b&apos; &quot;c&quot;&gt;"
    );
    assert_eq!(escape_xml("x\u{1}y"), "xy");
}

#[test]
fn slide_svg_has_size_background_and_text() {
    let mut slide = Slide::new(SlideKind::Cover, Rgb8::hex(0xF8FAFC));
    slide.push(text_el(
        "A < B",
        TextStyle::new(12.0, Rgb8::hex(0x1E293B)).bold(),
    ));
    let svg = render_slide_svg(&slide, SlideSize::WIDE_16_9, 96.0);
    assert!(svg.starts_with("<svg "));
    assert!(svg.ends_with("</svg>"));
    assert!(svg.contains(r#"width="960" height="540""#));
    assert!(svg.contains(r##"fill="#f8fafc""##));
    assert!(svg.contains("A &lt; B"));
    assert!(svg.contains(r#"font-weight="700""#));
    // 12pt at 96ppi
    assert!(svg.contains(r#"font-size="16""#));
}

#[test]
fn dashed_lines_and_rotated_text() {
    let mut slide = Slide::new(SlideKind::Matrix, Rgb8::WHITE);
    slide.push(LineEl {
        from: Point::new(0.0, 1.0),
        to: Point::new(5.0, 1.0),
        stroke: Stroke::dashed(Rgb8::hex(0xE2E8F0), 1.0),
    });
    slide.push(text_el(
        "axis",
        TextStyle::new(12.0, Rgb8::BLACK).vertical(),
    ));
    let svg = render_slide_svg(&slide, SlideSize::WIDE_16_9, 72.0);
    assert!(svg.contains("stroke-dasharray"));
    assert!(svg.contains("rotate(-90)"));
}

#[test]
fn shadowed_shape_draws_twice() {
    let mut slide = Slide::new(SlideKind::Cover, Rgb8::WHITE);
    slide.push(ShapeEl {
        rect: Rect::new(1.0, 1.0, 2.0, 2.0),
        fill: Some(Rgb8::WHITE),
        stroke: Some(Stroke::solid(Rgb8::hex(0xE2E8F0), 1.0)),
        corner_radius: 0.05,
        shadow: true,
    });
    let svg = render_slide_svg(&slide, SlideSize::WIDE_16_9, 72.0);
    assert_eq!(svg.matches("<rect ").count(), 3);
    assert!(svg.contains(r#"fill-opacity="0.08""#));
}

#[test]
fn radar_svg_is_local_to_its_box() {
    let el = RadarEl {
        rect: Rect::new(0.5, 1.2, 5.0, 5.2),
        labels: ["a", "b", "c", "d", "e"].map(String::from).to_vec(),
        series: vec![
            RadarSeries {
                name: "Scenario A".into(),
                color: Rgb8::hex(0xEAB308),
                values: vec![1.0, 2.0, 3.0, 4.0, 5.0],
            },
            RadarSeries {
                name: "Scenario B".into(),
                color: Rgb8::hex(0xEF4444),
                values: vec![5.0, 4.0, 3.0, 2.0, 1.0],
            },
        ],
        fill_alpha: 64,
        label_pt: 8.0,
        legend: true,
    };
    let svg = render_radar_svg(&el, 100.0);
    assert!(svg.contains(r#"width="450" height="400""#));
    // 5 grid rings + 2 series
    assert_eq!(svg.matches("<polygon ").count(), 7);
    assert!(svg.contains("Scenario B"));
    assert!(svg.contains(r##"fill="#eab308""##));
    assert!(svg.contains(r#"fill-opacity="0.25""#));
}

#[test]
fn radar_with_too_few_axes_draws_nothing() {
    let el = RadarEl {
        rect: Rect::new(0.0, 0.0, 2.0, 2.0),
        labels: vec!["a".into(), "b".into()],
        series: Vec::new(),
        fill_alpha: 64,
        label_pt: 8.0,
        legend: false,
    };
    let svg = render_radar_svg(&el, 72.0);
    assert!(!svg.contains("<polygon"));
}
