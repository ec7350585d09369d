use std::sync::{Arc, OnceLock};

use anyhow::Context;

use crate::{
    deck::{
        model::{Deck, RadarEl, Slide},
        svg::{render_radar_svg, render_slide_svg},
    },
    foundation::error::{PlannerError, PlannerResult},
};

/// Raster sizes above this are refused rather than allocated.
const MAX_DIM: u32 = 16_384;

fn shared_fontdb() -> Arc<usvg::fontdb::Database> {
    static DB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        tracing::debug!(faces = db.len(), "loaded system fonts for slide rendering");
        Arc::new(db)
    })
    .clone()
}

pub fn parse_svg(svg: &str) -> PlannerResult<usvg::Tree> {
    let opts = usvg::Options {
        fontdb: shared_fontdb(),
        ..Default::default()
    };
    let tree = usvg::Tree::from_str(svg, &opts).context("parse slide svg")?;
    Ok(tree)
}

/// Render an SVG document to PNG bytes at its intrinsic pixel size.
pub fn rasterize_svg(svg: &str) -> PlannerResult<Vec<u8>> {
    let tree = parse_svg(svg)?;
    let size = tree.size();
    let (w, h) = (size.width().ceil() as u32, size.height().ceil() as u32);
    if w == 0 || h == 0 || w > MAX_DIM || h > MAX_DIM {
        return Err(PlannerError::export(format!(
            "svg raster size out of range: {w}x{h}"
        )));
    }
    let mut pixmap = resvg::tiny_skia::Pixmap::new(w, h)
        .ok_or_else(|| PlannerError::export("failed to allocate slide pixmap"))?;
    resvg::render(
        &tree,
        resvg::tiny_skia::Transform::default(),
        &mut pixmap.as_mut(),
    );
    let png = pixmap.encode_png().context("encode slide png")?;
    Ok(png)
}

pub fn rasterize_slide(slide: &Slide, deck: &Deck, px_per_inch: f64) -> PlannerResult<Vec<u8>> {
    rasterize_svg(&render_slide_svg(slide, deck.size, px_per_inch))
}

pub fn rasterize_radar(el: &RadarEl, px_per_inch: f64) -> PlannerResult<Vec<u8>> {
    rasterize_svg(&render_radar_svg(el, px_per_inch))
}

/// One PNG per slide, named `{index:02}_{slug}.png`.
pub fn render_previews(deck: &Deck, px_per_inch: f64) -> PlannerResult<Vec<(String, Vec<u8>)>> {
    deck.slides
        .iter()
        .enumerate()
        .map(|(i, slide)| {
            let png = rasterize_slide(slide, deck, px_per_inch)?;
            Ok((format!("{:02}_{}.png", i + 1, slide.kind.slug()), png))
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/deck/raster.rs"]
mod tests;
