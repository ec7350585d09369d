use crate::{
    deck::{
        model::{
            Align, AudioEl, Deck, ImageEl, LineEl, RadarEl, RadarSeries, ShapeEl, Slide,
            SlideKind, Stroke, TextEl, TextStyle,
        },
        text_fit::fit_text,
    },
    export::ExportContext,
    foundation::{
        core::{Point, Rect, Rgb8, Size, SlideSize},
        error::PlannerResult,
    },
    geometry::quadrant::QuadrantLayout,
    media::wav::parse_wav,
    model::scenario::{ALLOCATION_SUBJECTS, QuadrantId, Scenario},
};

pub const MAIN: Rgb8 = Rgb8::hex(0x1E293B);
pub const SUB: Rgb8 = Rgb8::hex(0x64748B);
pub const ACCENT: Rgb8 = Rgb8::hex(0x4F46E5);
pub const BACKGROUND: Rgb8 = Rgb8::hex(0xF8FAFC);
pub const AXIS_LINE: Rgb8 = Rgb8::hex(0xCBD5E1);
pub const BORDER: Rgb8 = Rgb8::hex(0xE2E8F0);
pub const MUTED: Rgb8 = Rgb8::hex(0x94A3B8);
pub const BODY: Rgb8 = Rgb8::hex(0x374151);
pub const INK: Rgb8 = Rgb8::hex(0x1F2937);
pub const SIGNS: Rgb8 = Rgb8::hex(0x4B5563);

/// Smallest size shrink-to-fit text may reach.
pub const FONT_FLOOR_PT: f64 = 6.0;

pub const MATRIX_CHART: Rect = Rect::new(1.2, 1.0, 9.4, 5.0);
pub const MATRIX_CARD: Size = Size::new(3.9, 1.8);
pub const MATRIX_GUTTER: f64 = 0.15;

pub const COVER_SUMMARY_TITLE: &str = "前提条件 / コンテキスト";
pub const NO_ANALYSIS: &str = "No analysis data.";

fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
    Rect::new(x, y, x + w, y + h)
}

fn text(bounds: Rect, content: impl Into<String>, style: TextStyle) -> TextEl {
    let content = content.into();
    let min_pt = if style.shrink {
        FONT_FLOOR_PT
    } else {
        style.font_pt
    };
    // Vertical text flows along the box's height.
    let fit_box = if style.vertical {
        Rect::new(0.0, 0.0, bounds.height(), bounds.width())
    } else {
        bounds
    };
    let fitted = fit_text(&content, fit_box, style.font_pt, min_pt, style.line_height);
    TextEl {
        rect: bounds,
        text: content,
        style,
        fitted,
    }
}

fn card(bounds: Rect, shadow: bool) -> ShapeEl {
    ShapeEl {
        rect: bounds,
        fill: Some(Rgb8::WHITE),
        stroke: None,
        corner_radius: 0.05,
        shadow,
    }
}

fn bar(bounds: Rect, color: Rgb8) -> ShapeEl {
    ShapeEl {
        rect: bounds,
        fill: Some(color),
        stroke: None,
        corner_radius: 0.0,
        shadow: false,
    }
}

fn page_title(slide: &mut Slide, title: &str) {
    slide.push(text(
        rect(0.4, 0.3, 9.2, 0.45),
        title,
        TextStyle::new(20.0, MAIN).bold(),
    ));
}

fn footer(slide: &mut Slide, ctx: &ExportContext<'_>, align: Align) {
    slide.push(text(
        rect(0.2, 5.4, 9.6, 0.2),
        ctx.config.copyright.as_str(),
        TextStyle::new(8.0, MUTED).align(align),
    ));
}

/// Lay out the full deck: cover, matrix, portfolio, then two pages per scenario.
///
/// `cover_details` is the (possibly summarized) context shown on the cover; an empty string
/// omits the box. Media that cannot be embedded is logged and left off its slide.
#[tracing::instrument(skip(ctx, cover_details), fields(theme = ctx.theme))]
pub fn build_deck(ctx: &ExportContext<'_>, cover_details: &str) -> PlannerResult<Deck> {
    ctx.result.validate()?;

    let mut slides = vec![
        cover_slide(ctx, cover_details),
        matrix_slide(ctx),
        portfolio_slide(ctx),
    ];
    for s in &ctx.result.scenarios {
        slides.push(story_slide(ctx, s));
        slides.push(strategy_slide(ctx, s));
    }
    tracing::debug!(slides = slides.len(), "deck laid out");

    Ok(Deck {
        title: ctx.theme.to_string(),
        author: ctx.config.app_name.clone(),
        size: SlideSize::WIDE_16_9,
        slides,
    })
}

fn cover_slide(ctx: &ExportContext<'_>, cover_details: &str) -> Slide {
    let cfg = ctx.config;
    let mut slide = Slide::new(SlideKind::Cover, BACKGROUND);
    slide.push(bar(rect(0.0, 0.0, 10.0, 0.15), ACCENT));
    slide.push(text(
        rect(0.5, 1.5, 9.0, 0.4),
        cfg.app_name.as_str(),
        TextStyle::new(14.0, ACCENT).bold().align(Align::Center),
    ));
    slide.push(text(
        rect(0.5, 2.0, 9.0, 1.0),
        ctx.theme,
        TextStyle::new(36.0, MAIN)
            .bold()
            .align(Align::Center)
            .middle()
            .shrink(),
    ));

    if !cover_details.trim().is_empty() {
        slide.push(ShapeEl {
            stroke: Some(Stroke::solid(BORDER, 1.0)),
            ..card(rect(1.5, 3.2, 7.0, 1.8), true)
        });
        slide.push(text(
            rect(1.7, 3.4, 6.6, 0.25),
            COVER_SUMMARY_TITLE,
            TextStyle::new(10.0, SUB).bold(),
        ));
        slide.push(text(
            rect(1.7, 3.7, 6.6, 1.1),
            cover_details,
            TextStyle::new(11.0, MAIN)
                .line_height(18.0 / 11.0)
                .shrink(),
        ));
    }

    slide.push(text(
        rect(0.5, 5.2, 9.0, 0.2),
        format!(
            "Generated on {} | Ver: {}",
            ctx.generated_on_label(),
            cfg.version
        ),
        TextStyle::new(9.0, MUTED).align(Align::Center),
    ));
    footer(&mut slide, ctx, Align::Center);
    slide
}

fn matrix_slide(ctx: &ExportContext<'_>) -> Slide {
    let set = ctx.result;
    let chart = MATRIX_CHART;
    let center = chart.center();
    let mut slide = Slide::new(SlideKind::Matrix, BACKGROUND);
    page_title(&mut slide, "シナリオマトリクス");

    let axis = Stroke::solid(AXIS_LINE, 3.0);
    let guide = Stroke::dashed(BORDER, 1.0);
    slide.push(LineEl {
        from: Point::new(chart.x0, chart.y0),
        to: Point::new(chart.x0, chart.y1),
        stroke: axis,
    });
    slide.push(LineEl {
        from: Point::new(chart.x0, chart.y1),
        to: Point::new(chart.x1, chart.y1),
        stroke: axis,
    });
    slide.push(LineEl {
        from: Point::new(center.x, chart.y0),
        to: Point::new(center.x, chart.y1),
        stroke: guide,
    });
    slide.push(LineEl {
        from: Point::new(chart.x0, center.y),
        to: Point::new(chart.x1, center.y),
        stroke: guide,
    });

    let value = TextStyle::new(10.0, ACCENT).bold().shrink();
    slide.push(text(
        Rect::new(0.3, chart.y0, 0.9, chart.y1),
        set.axis_y.label.as_str(),
        TextStyle::new(12.0, MAIN)
            .bold()
            .align(Align::Center)
            .middle()
            .vertical()
            .shrink(),
    ));
    slide.push(text(
        Rect::new(0.0, chart.y0 - 0.15, chart.x0 - 0.1, chart.y0 + 0.15),
        set.axis_y.max.as_str(),
        value.align(Align::Right),
    ));
    slide.push(text(
        Rect::new(0.0, chart.y1 - 0.15, chart.x0 - 0.1, chart.y1 + 0.15),
        set.axis_y.min.as_str(),
        value.align(Align::Right),
    ));
    slide.push(text(
        rect(center.x - 2.0, chart.y1 + 0.38, 4.0, 0.22),
        set.axis_x.label.as_str(),
        TextStyle::new(12.0, MAIN)
            .bold()
            .align(Align::Center)
            .shrink(),
    ));
    slide.push(text(
        rect(chart.x0, chart.y1 + 0.1, 2.5, 0.3),
        set.axis_x.min.as_str(),
        value,
    ));
    slide.push(text(
        rect(chart.x1 - 2.5, chart.y1 + 0.1, 2.5, 0.3),
        set.axis_x.max.as_str(),
        value.align(Align::Right),
    ));

    let layout = QuadrantLayout::centered_in(chart, MATRIX_CARD, MATRIX_GUTTER);
    for (q, bounds) in layout.rects() {
        if let Some(s) = set.scenario(q) {
            quadrant_card(&mut slide, q, s, bounds);
        }
    }
    footer(&mut slide, ctx, Align::Right);
    slide
}

fn quadrant_card(slide: &mut Slide, q: QuadrantId, s: &Scenario, bounds: Rect) {
    let color = q.color().rgb();
    let (x, y, w) = (bounds.x0, bounds.y0, bounds.width());
    slide.push(ShapeEl {
        stroke: Some(Stroke::solid(BORDER, 1.0)),
        ..card(bounds, true)
    });
    slide.push(bar(rect(x, y, w, 0.08), color));
    slide.push(text(
        rect(x + 0.2, y + 0.2, 2.0, 0.25),
        format!("Scenario {}", q.letter()),
        TextStyle::new(10.0, color).bold(),
    ));
    slide.push(text(
        rect(x + w - 1.2, y + 0.2, 1.0, 0.25),
        format!("{}%", s.probability),
        TextStyle::new(10.0, SUB).bold().align(Align::Right),
    ));
    slide.push(text(
        rect(x + 0.2, y + 0.5, w - 0.4, 0.6),
        s.title.as_str(),
        TextStyle::new(12.0, MAIN).bold().shrink(),
    ));
    slide.push(text(
        rect(x + 0.2, y + 1.0, w - 0.4, 0.7),
        s.headline.as_str(),
        TextStyle::new(9.0, SUB).shrink(),
    ));
}

fn portfolio_slide(ctx: &ExportContext<'_>) -> Slide {
    let set = ctx.result;
    let mut slide = Slide::new(SlideKind::Portfolio, BACKGROUND);
    page_title(&mut slide, "戦略ポートフォリオ比較");

    slide.push(RadarEl {
        rect: rect(0.5, 1.2, 4.5, 4.0),
        labels: ALLOCATION_SUBJECTS.iter().map(|s| s.to_string()).collect(),
        series: set
            .scenarios
            .iter()
            .map(|s| RadarSeries {
                name: s.id.clone(),
                color: s.color().rgb(),
                values: s.allocation_values(),
            })
            .collect(),
        fill_alpha: 64,
        label_pt: 8.0,
        legend: true,
    });

    slide.push(card(rect(5.2, 1.2, 4.4, 3.8), true));
    slide.push(text(
        rect(5.4, 1.4, 4.0, 0.3),
        "📊 戦略ポートフォリオ分析",
        TextStyle::new(11.0, MAIN).bold(),
    ));
    let analysis = if set.portfolio_analysis.trim().is_empty() {
        NO_ANALYSIS
    } else {
        set.portfolio_analysis.as_str()
    };
    slide.push(text(
        rect(5.4, 1.8, 4.0, 3.0),
        analysis,
        TextStyle::new(10.0, BODY)
            .align(Align::Justify)
            .line_height(1.6)
            .shrink(),
    ));
    footer(&mut slide, ctx, Align::Right);
    slide
}

fn story_slide(ctx: &ExportContext<'_>, s: &Scenario) -> Slide {
    let q = s.quadrant();
    let color = s.color().rgb();
    let mut slide = Slide::new(SlideKind::ScenarioStory(q), BACKGROUND);

    slide.push(card(rect(0.5, 0.3, 9.0, 0.8), true));
    slide.push(bar(rect(0.5, 0.3, 0.15, 0.8), color));
    slide.push(text(
        rect(0.8, 0.3, 7.0, 0.8),
        format!("{}: {}", s.id, s.title),
        TextStyle::new(20.0, MAIN).bold().middle().shrink(),
    ));
    slide.push(text(
        rect(8.0, 0.3, 1.3, 0.8),
        format!("確率: {}%", s.probability),
        TextStyle::new(12.0, color)
            .bold()
            .align(Align::Center)
            .middle(),
    ));

    slide.push(card(rect(0.5, 1.3, 9.0, 4.0), true));
    if let Some(image) = image_element(s, rect(0.8, 1.6, 2.8, 1.58)) {
        slide.push(image);
    }
    slide.push(text(
        rect(3.8, 1.6, 5.4, 1.5),
        s.headline.as_str(),
        TextStyle::new(16.0, MAIN).bold().shrink(),
    ));
    slide.push(text(
        rect(0.8, 3.3, 2.0, 0.2),
        "STORY",
        TextStyle::new(10.0, MUTED).bold(),
    ));
    slide.push(text(
        rect(0.8, 3.5, 8.4, 1.6),
        s.story.as_str(),
        TextStyle::new(9.0, BODY)
            .align(Align::Justify)
            .line_height(14.0 / 9.0),
    ));
    if let Some(audio) = audio_element(s, rect(3.7, 2.7, 0.5, 0.5)) {
        slide.push(audio);
    }
    footer(&mut slide, ctx, Align::Right);
    slide
}

fn strategy_slide(ctx: &ExportContext<'_>, s: &Scenario) -> Slide {
    let q = s.quadrant();
    let color = s.color().rgb();
    let mut slide = Slide::new(SlideKind::ScenarioStrategy(q), BACKGROUND);

    slide.push(card(rect(0.5, 0.3, 9.0, 0.5), false));
    slide.push(text(
        rect(0.7, 0.3, 8.6, 0.5),
        format!("{} - Strategy & Analysis", s.id),
        TextStyle::new(12.0, SUB).bold().middle(),
    ));
    slide.push(card(rect(0.5, 1.0, 3.5, 4.2), true));
    slide.push(RadarEl {
        rect: rect(0.6, 1.5, 3.3, 3.3),
        labels: ALLOCATION_SUBJECTS.iter().map(|s| s.to_string()).collect(),
        series: vec![RadarSeries {
            name: s.title.clone(),
            color,
            values: s.allocation_values(),
        }],
        fill_alpha: 102,
        label_pt: 9.0,
        legend: false,
    });

    const X: f64 = 4.4;
    const W: f64 = 5.2;
    let sections = [
        ("BUSINESS INSIGHT", 1.1, s.insight.breakthrough.clone(), INK, 1.1),
        ("ACTION", 2.6, s.action_advice.clone(), INK, 1.1),
        (
            "EARLY SIGNS (予兆)",
            4.1,
            s.early_signs
                .iter()
                .map(|sign| format!("• {sign}"))
                .collect::<Vec<_>>()
                .join("\n"),
            SIGNS,
            1.0,
        ),
    ];
    for (label, y, body, body_color, body_h) in sections {
        slide.push(text(
            rect(X, y, W, 0.25),
            label,
            TextStyle::new(10.0, ACCENT).bold(),
        ));
        slide.push(text(
            rect(X, y + 0.25, W, body_h),
            body,
            TextStyle::new(10.0, body_color)
                .line_height(1.4)
                .shrink(),
        ));
    }
    footer(&mut slide, ctx, Align::Right);
    slide
}

fn image_element(s: &Scenario, bounds: Rect) -> Option<ImageEl> {
    let blob = s.image.as_ref()?;
    if !blob.is_image() {
        tracing::warn!(scenario = %s.id, mime = blob.mime(), "image has a non-image mime; omitted");
        return None;
    }
    match image::load_from_memory(blob.bytes()) {
        Ok(img) => Some(ImageEl {
            rect: bounds,
            blob: blob.clone(),
            pixel_size: (img.width(), img.height()),
        }),
        Err(e) => {
            tracing::warn!(scenario = %s.id, error = %e, "image could not be decoded; omitted");
            None
        }
    }
}

fn audio_element(s: &Scenario, bounds: Rect) -> Option<AudioEl> {
    let blob = s.audio.as_ref()?;
    match parse_wav(blob.bytes()) {
        Ok(info) => Some(AudioEl {
            rect: bounds,
            blob: blob.clone(),
            duration_secs: info.duration_secs(),
        }),
        Err(e) => {
            tracing::warn!(scenario = %s.id, error = %e, "narration could not be embedded; omitted");
            None
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/deck/builder.rs"]
mod tests;
