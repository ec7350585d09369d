use super::*;
use crate::{
    deck::model::{ShapeEl, SlideKind},
    foundation::core::{Rect, Rgb8, SlideSize},
};

fn one_slide_deck() -> Deck {
    let mut slide = Slide::new(SlideKind::Cover, Rgb8::hex(0xF8FAFC));
    slide.push(ShapeEl {
        rect: Rect::new(0.0, 0.0, 10.0, 0.15),
        fill: Some(Rgb8::hex(0x4F46E5)),
        stroke: None,
        corner_radius: 0.0,
        shadow: false,
    });
    Deck {
        title: "t".into(),
        author: "Planner".into(),
        size: SlideSize::WIDE_16_9,
        slides: vec![slide],
    }
}

#[test]
fn slide_png_has_expected_dimensions_and_colors() {
    let deck = one_slide_deck();
    let png = rasterize_slide(&deck.slides[0], &deck, 32.0).unwrap();
    let img = image::load_from_memory(&png).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), (320, 180));
    assert_eq!(img.get_pixel(5, 1).0, [0x4F, 0x46, 0xE5, 255]);
    assert_eq!(img.get_pixel(5, 100).0, [0xF8, 0xFA, 0xFC, 255]);
}

#[test]
fn previews_are_named_by_position_and_kind() {
    let deck = one_slide_deck();
    let previews = render_previews(&deck, 16.0).unwrap();
    assert_eq!(previews.len(), 1);
    assert_eq!(previews[0].0, "01_cover.png");
}

#[test]
fn malformed_svg_is_an_error() {
    assert!(rasterize_svg("<svg").is_err());
}
