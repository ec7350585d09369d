//! SVG rendition of deck slides.
//!
//! Used for PNG previews (via [`crate::deck::raster`]) and for the chart pictures embedded in
//! the PPTX package. One user unit is one output pixel at `px_per_inch`.

use std::fmt::Write as _;

use crate::{
    deck::model::{
        Align, AudioEl, Element, ImageEl, LineEl, RadarEl, ShapeEl, Slide, TextEl, VAlign,
    },
    foundation::core::{PT_PER_INCH, Point, Rect, Rgb8, SlideSize, Vec2},
    geometry::radar::{RadarGeometry, fmt_coord, svg_points},
};

pub const FONT_FAMILY: &str =
    "'Noto Sans CJK JP', 'Noto Sans JP', 'Hiragino Sans', 'Yu Gothic', 'Meiryo', sans-serif";

const RADAR_GRID: Rgb8 = Rgb8::hex(0xE2E8F0);
const RADAR_LABEL: Rgb8 = Rgb8::hex(0x6B7280);
/// Share of the radar box height reserved for the legend row.
const LEGEND_SHARE: f64 = 0.12;

/// Escape text for XML content and attribute values.
pub fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if c < ' ' && c != '\n' && c != '\t' => {}
            c => out.push(c),
        }
    }
    out
}

struct Canvas {
    out: String,
    ppi: f64,
}

impl Canvas {
    fn new(ppi: f64) -> Self {
        Self {
            out: String::new(),
            ppi,
        }
    }

    fn px(&self, inches: f64) -> String {
        fmt_coord(inches * self.ppi)
    }

    fn pt(&self, pt: f64) -> String {
        fmt_coord(pt / PT_PER_INCH * self.ppi)
    }

    fn open(&mut self, width_in: f64, height_in: f64) {
        let w = self.px(width_in);
        let h = self.px(height_in);
        let _ = write!(
            self.out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{}">"#,
            escape_xml(FONT_FAMILY)
        );
    }

    fn close(mut self) -> String {
        self.out.push_str("</svg>");
        self.out
    }

    fn rect_attrs(&self, r: Rect) -> String {
        format!(
            r#"x="{}" y="{}" width="{}" height="{}""#,
            self.px(r.x0),
            self.px(r.y0),
            self.px(r.width()),
            self.px(r.height())
        )
    }

    fn background(&mut self, size: SlideSize, color: Rgb8) {
        let attrs = self.rect_attrs(size.bounds());
        let _ = write!(self.out, r#"<rect {attrs} fill="{}"/>"#, color.css());
    }

    fn shape(&mut self, el: &ShapeEl) {
        let rx = self.px(el.corner_radius);
        if el.shadow {
            let attrs = self.rect_attrs(el.rect + Vec2::new(0.02, 0.03));
            let _ = write!(
                self.out,
                r##"<rect {attrs} rx="{rx}" fill="#000000" fill-opacity="0.08"/>"##
            );
        }
        let attrs = self.rect_attrs(el.rect);
        let fill = el.fill.map_or_else(|| "none".to_string(), Rgb8::css);
        let stroke = match el.stroke {
            Some(s) => format!(
                r#" stroke="{}" stroke-width="{}""#,
                s.color.css(),
                self.pt(s.width_pt)
            ),
            None => String::new(),
        };
        let _ = write!(
            self.out,
            r#"<rect {attrs} rx="{rx}" fill="{fill}"{stroke}/>"#
        );
    }

    fn line(&mut self, el: &LineEl) {
        let dash = if el.stroke.dashed {
            let d = self.pt(el.stroke.width_pt * 4.0);
            format!(r#" stroke-dasharray="{d} {d}""#)
        } else {
            String::new()
        };
        let _ = write!(
            self.out,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{}"{dash}/>"#,
            self.px(el.from.x),
            self.px(el.from.y),
            self.px(el.to.x),
            self.px(el.to.y),
            el.stroke.color.css(),
            self.pt(el.stroke.width_pt)
        );
    }

    fn text(&mut self, el: &TextEl) {
        let style = &el.style;
        let fitted = &el.fitted;
        let (w, h) = if style.vertical {
            (el.rect.height(), el.rect.width())
        } else {
            (el.rect.width(), el.rect.height())
        };
        let font_in = fitted.font_pt / PT_PER_INCH;
        let pitch = font_in * style.line_height;
        let total = pitch * fitted.lines.len() as f64;
        let top = match style.valign {
            VAlign::Top => 0.0,
            VAlign::Middle => ((h - total) / 2.0).max(0.0),
        };
        let (anchor, x) = match style.align {
            Align::Left | Align::Justify => ("start", 0.0),
            Align::Center => ("middle", w / 2.0),
            Align::Right => ("end", w),
        };

        let transform = if style.vertical {
            let c = el.rect.center();
            format!(
                "translate({} {}) rotate(-90) translate({} {})",
                self.px(c.x),
                self.px(c.y),
                self.px(-w / 2.0),
                self.px(-h / 2.0)
            )
        } else {
            format!(
                "translate({} {})",
                self.px(el.rect.x0),
                self.px(el.rect.y0)
            )
        };
        let weight = if style.bold { "700" } else { "400" };
        let _ = write!(
            self.out,
            r#"<g transform="{transform}"><text font-size="{}" font-weight="{weight}" fill="{}" text-anchor="{anchor}">"#,
            self.px(font_in),
            style.color.css()
        );
        for (i, line) in fitted.lines.iter().enumerate() {
            let baseline = top + pitch * i as f64 + (pitch - font_in) / 2.0 + font_in * 0.86;
            let _ = write!(
                self.out,
                r#"<tspan x="{}" y="{}">{}</tspan>"#,
                self.px(x),
                self.px(baseline),
                escape_xml(line)
            );
        }
        self.out.push_str("</text></g>");
    }

    fn image(&mut self, el: &ImageEl) {
        let attrs = self.rect_attrs(el.rect);
        let _ = write!(
            self.out,
            r#"<image {attrs} preserveAspectRatio="xMidYMid meet" xlink:href="{}"/>"#,
            el.blob.to_data_uri()
        );
    }

    fn audio(&mut self, el: &AudioEl) {
        let c = el.rect.center();
        let r = el.rect.width().min(el.rect.height()) / 2.0;
        let _ = write!(
            self.out,
            r##"<circle cx="{}" cy="{}" r="{}" fill="#ffffff" fill-opacity="0.9" stroke="#94a3b8" stroke-width="{}"/>"##,
            self.px(c.x),
            self.px(c.y),
            self.px(r),
            self.pt(1.0)
        );
        let tri = [
            Point::new(c.x - r * 0.3, c.y - r * 0.4),
            Point::new(c.x + r * 0.45, c.y),
            Point::new(c.x - r * 0.3, c.y + r * 0.4),
        ]
        .map(|p| Point::new(p.x * self.ppi, p.y * self.ppi));
        let _ = write!(
            self.out,
            r##"<polygon points="{}" fill="#4f46e5"/>"##,
            svg_points(&tri)
        );
    }

    fn radar(&mut self, el: &RadarEl) {
        let (chart, legend) = if el.legend && !el.series.is_empty() {
            let split = el.rect.y1 - el.rect.height() * LEGEND_SHARE;
            (
                Rect::new(el.rect.x0, el.rect.y0, el.rect.x1, split),
                Some(Rect::new(el.rect.x0, split, el.rect.x1, el.rect.y1)),
            )
        } else {
            (el.rect, None)
        };
        let label_in = el.label_pt / PT_PER_INCH;
        let margin = label_in * 2.2;
        let radius = (chart.width().min(chart.height()) / 2.0 - margin).max(0.1);
        let center = chart.center();
        let Ok(geo) = RadarGeometry::new(
            Point::new(center.x * self.ppi, center.y * self.ppi),
            radius * self.ppi,
            el.labels.len(),
        ) else {
            tracing::warn!(axes = el.labels.len(), "radar skipped: too few axes");
            return;
        };

        let hairline = self.pt(0.75);
        for ring in geo.rings() {
            let _ = write!(
                self.out,
                r#"<polygon points="{}" fill="none" stroke="{}" stroke-width="{hairline}"/>"#,
                svg_points(&ring),
                RADAR_GRID.css()
            );
        }
        for i in 0..geo.axes {
            let end = geo.label_point(i, 0.0);
            let _ = write!(
                self.out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{hairline}"/>"#,
                fmt_coord(geo.center.x),
                fmt_coord(geo.center.y),
                fmt_coord(end.x),
                fmt_coord(end.y),
                RADAR_GRID.css()
            );
        }
        let opacity = fmt_coord(f64::from(el.fill_alpha) / 255.0);
        for series in &el.series {
            let _ = write!(
                self.out,
                r#"<polygon points="{}" fill="{}" fill-opacity="{opacity}" stroke="{}" stroke-width="{}"/>"#,
                svg_points(&geo.polygon(&series.values)),
                series.color.css(),
                series.color.css(),
                self.pt(2.0)
            );
        }
        let font = self.pt(el.label_pt);
        for (i, label) in el.labels.iter().enumerate() {
            let p = geo.label_point(i, label_in * 0.9 * self.ppi);
            let dx = p.x - geo.center.x;
            let anchor = if dx.abs() < 1.0 {
                "middle"
            } else if dx > 0.0 {
                "start"
            } else {
                "end"
            };
            let _ = write!(
                self.out,
                r#"<text x="{}" y="{}" font-size="{font}" font-weight="700" fill="{}" text-anchor="{anchor}">{}</text>"#,
                fmt_coord(p.x),
                fmt_coord(p.y + label_in * 0.35 * self.ppi),
                RADAR_LABEL.css(),
                escape_xml(label)
            );
        }

        if let Some(area) = legend {
            let n = el.series.len() as f64;
            let slot = area.width() / n;
            let mid_y = area.center().y;
            for (i, series) in el.series.iter().enumerate() {
                let x = area.x0 + slot * i as f64 + slot * 0.15;
                let _ = write!(
                    self.out,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}"/>"#,
                    self.px(x),
                    self.px(mid_y - label_in * 0.4),
                    self.px(label_in * 0.8),
                    self.px(label_in * 0.8),
                    self.px(label_in * 0.4),
                    series.color.css()
                );
                let _ = write!(
                    self.out,
                    r#"<text x="{}" y="{}" font-size="{font}" fill="{}">{}</text>"#,
                    self.px(x + label_in * 1.2),
                    self.px(mid_y + label_in * 0.35),
                    RADAR_LABEL.css(),
                    escape_xml(&series.name)
                );
            }
        }
    }

    fn element(&mut self, el: &Element) {
        match el {
            Element::Shape(e) => self.shape(e),
            Element::Line(e) => self.line(e),
            Element::Text(e) => self.text(e),
            Element::Image(e) => self.image(e),
            Element::Radar(e) => self.radar(e),
            Element::Audio(e) => self.audio(e),
        }
    }
}

/// Full slide as a standalone SVG document.
pub fn render_slide_svg(slide: &Slide, size: SlideSize, px_per_inch: f64) -> String {
    let mut canvas = Canvas::new(px_per_inch);
    canvas.open(size.width_in, size.height_in);
    canvas.background(size, slide.background);
    for el in &slide.elements {
        canvas.element(el);
    }
    canvas.close()
}

/// A radar chart alone, on a transparent canvas the size of its box.
pub fn render_radar_svg(el: &RadarEl, px_per_inch: f64) -> String {
    let origin = el.rect.origin();
    let local = RadarEl {
        rect: el.rect - origin.to_vec2(),
        ..el.clone()
    };
    let mut canvas = Canvas::new(px_per_inch);
    canvas.open(el.rect.width(), el.rect.height());
    canvas.radar(&local);
    canvas.close()
}

#[cfg(test)]
#[path = "../../tests/unit/deck/svg.rs"]
mod tests;
