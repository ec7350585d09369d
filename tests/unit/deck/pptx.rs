use std::io::Read as _;

use super::*;
use crate::{
    deck::{
        builder::build_deck,
        model::{SlideKind, TextStyle},
        text_fit::fit_text,
    },
    export::ExportContext,
    foundation::{
        config::AppConfig,
        core::{Point, SlideSize},
    },
    media::{blob::MediaBlob, wav::encode_wav},
    model::{sample_set, scenario::QuadrantId},
};

fn read_part(bytes: &[u8], name: &str) -> Option<String> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    let mut file = archive.by_name(name).ok()?;
    let mut out = String::new();
    file.read_to_string(&mut out).unwrap();
    Some(out)
}

fn part_names(bytes: &[u8]) -> Vec<String> {
    let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    archive.file_names().map(str::to_string).collect()
}

fn full_deck() -> Deck {
    let mut set = sample_set();
    let s = set.scenario_mut(QuadrantId::A).unwrap();
    let png = {
        let img = image::RgbImage::from_pixel(8, 4, image::Rgb([200, 10, 10]));
        let mut out = Cursor::new(Vec::new());
        img.write_to(&mut out, image::ImageFormat::Png).unwrap();
        out.into_inner()
    };
    s.image = Some(MediaBlob::new("image/png", png));
    s.audio = Some(MediaBlob::new(
        "audio/wav",
        encode_wav(&[0, 1, 2, 3], 24_000).unwrap(),
    ));
    let cfg = AppConfig::default();
    let ctx = ExportContext {
        theme: "Tokyo & Osaka <2035>",
        details: "",
        result: &set,
        config: &cfg,
        generated_on: time::macros::date!(2026 - 01 - 15),
    };
    build_deck(&ctx, "context").unwrap()
}

#[test]
fn package_has_core_parts_and_one_part_per_slide() {
    let deck = full_deck();
    let bytes = write_pptx(&deck, 48.0).unwrap();
    let names = part_names(&bytes);
    for required in [
        "[Content_Types].xml",
        "_rels/.rels",
        "ppt/presentation.xml",
        "ppt/_rels/presentation.xml.rels",
        "ppt/slideMasters/slideMaster1.xml",
        "ppt/slideLayouts/slideLayout1.xml",
        "ppt/theme/theme1.xml",
    ] {
        assert!(names.iter().any(|n| n == required), "missing {required}");
    }
    let slides = names
        .iter()
        .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
        .count();
    assert_eq!(slides, deck.slides.len());

    let presentation = read_part(&bytes, "ppt/presentation.xml").unwrap();
    assert!(presentation.contains(r#"<p:sldSz cx="9144000" cy="5143500"/>"#));
    let types = read_part(&bytes, "[Content_Types].xml").unwrap();
    assert!(types.contains("/ppt/slides/slide11.xml"));
}

#[test]
fn text_is_escaped_and_sized() {
    let deck = full_deck();
    let bytes = write_pptx(&deck, 48.0).unwrap();
    let cover = read_part(&bytes, "ppt/slides/slide1.xml").unwrap();
    assert!(cover.contains("Tokyo &amp; Osaka &lt;2035&gt;"));
    assert!(cover.contains(r#"sz="1400""#));
    assert!(cover.contains("<a:normAutofit/>"));
    let core = read_part(&bytes, "docProps/core.xml").unwrap();
    assert!(core.contains("<dc:title>Tokyo &amp; Osaka &lt;2035&gt;</dc:title>"));
}

#[test]
fn package_properties_carry_deck_author() {
    let mut deck = full_deck();
    assert_eq!(deck.author, AppConfig::default().app_name);
    deck.author = "Futures & Co".to_string();
    let bytes = write_pptx(&deck, 48.0).unwrap();
    let core = read_part(&bytes, "docProps/core.xml").unwrap();
    assert!(core.contains("<dc:creator>Futures &amp; Co</dc:creator>"));
    let app = read_part(&bytes, "docProps/app.xml").unwrap();
    assert!(app.contains("<Application>Futures &amp; Co</Application>"));
}

#[test]
fn narration_is_embedded_as_wav_media() {
    let deck = full_deck();
    let story_index = deck
        .slides
        .iter()
        .position(|s| s.kind == SlideKind::ScenarioStory(QuadrantId::A))
        .unwrap()
        + 1;
    let bytes = write_pptx(&deck, 48.0).unwrap();
    let xml = read_part(&bytes, &format!("ppt/slides/slide{story_index}.xml")).unwrap();
    let rels = read_part(
        &bytes,
        &format!("ppt/slides/_rels/slide{story_index}.xml.rels"),
    )
    .unwrap();
    assert!(xml.contains("<a:audioFile"));
    assert!(xml.contains("p14:media"));
    assert!(rels.contains(REL_AUDIO));
    assert!(rels.contains(REL_MEDIA));
    assert!(rels.contains(".wav"));
    assert!(part_names(&bytes).iter().any(|n| n.ends_with(".wav")));

    let other = deck
        .slides
        .iter()
        .position(|s| s.kind == SlideKind::ScenarioStory(QuadrantId::B))
        .unwrap()
        + 1;
    let xml = read_part(&bytes, &format!("ppt/slides/slide{other}.xml")).unwrap();
    assert!(!xml.contains("<a:audioFile"));
}

#[test]
fn radar_charts_become_pictures() {
    let deck = full_deck();
    let bytes = write_pptx(&deck, 48.0).unwrap();
    let portfolio = read_part(&bytes, "ppt/slides/slide3.xml").unwrap();
    assert!(portfolio.contains("<p:pic>"));
    assert!(portfolio.contains("Radar Chart"));
}

#[test]
fn lines_shapes_and_vertical_text() {
    let mut slide = Slide::new(SlideKind::Matrix, Rgb8::WHITE);
    slide.push(LineEl {
        from: Point::new(5.0, 5.0),
        to: Point::new(1.0, 5.0),
        stroke: crate::deck::model::Stroke::dashed(Rgb8::hex(0xE2E8F0), 1.0),
    });
    slide.push(ShapeEl {
        rect: Rect::new(1.0, 1.0, 2.0, 2.0),
        fill: Some(Rgb8::WHITE),
        stroke: None,
        corner_radius: 0.05,
        shadow: true,
    });
    let rect = Rect::new(0.3, 1.0, 0.9, 5.0);
    let style = TextStyle::new(12.0, Rgb8::BLACK).vertical();
    slide.push(TextEl {
        rect,
        text: "axis".into(),
        style,
        fitted: fit_text("axis", Rect::new(0.0, 0.0, 4.0, 0.6), 12.0, 12.0, 1.2),
    });
    let deck = Deck {
        title: "t".into(),
        author: "Planner".into(),
        size: SlideSize::WIDE_16_9,
        slides: vec![slide],
    };
    let bytes = write_pptx(&deck, 48.0).unwrap();
    let xml = read_part(&bytes, "ppt/slides/slide1.xml").unwrap();
    assert!(xml.contains(r#"flipH="1""#));
    assert!(xml.contains(r#"<a:prstDash val="dash"/>"#));
    assert!(xml.contains(r#"prst="roundRect""#));
    assert!(xml.contains("outerShdw"));
    assert!(xml.contains(r#"vert="vert270""#));
    assert!(xml.contains("<a:noAutofit/>"));
}

#[test]
fn contain_preserves_aspect_ratio() {
    let r = contain(Rect::new(0.0, 0.0, 4.0, 2.0), (100, 100));
    assert!((r.width() - 2.0).abs() < 1e-9);
    assert!((r.x0 - 1.0).abs() < 1e-9);
    assert_eq!(contain(Rect::new(0.0, 0.0, 4.0, 2.0), (0, 10)), Rect::new(0.0, 0.0, 4.0, 2.0));
}

#[test]
fn empty_deck_is_rejected() {
    let deck = Deck {
        title: "t".into(),
        author: "Planner".into(),
        size: SlideSize::WIDE_16_9,
        slides: Vec::new(),
    };
    assert!(matches!(write_pptx(&deck, 48.0), Err(PlannerError::Export(_))));
}
