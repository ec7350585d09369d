//! PresentationML (`.pptx`) writer.
//!
//! Produces a minimal but complete OOXML package: one master, one blank layout, one theme and
//! one part per slide. Text boxes carry the size chosen by shrink-to-fit plus `normAutofit` so
//! PowerPoint may shrink further. Radar charts are embedded as PNG pictures; narration is
//! embedded as a WAV media part behind a speaker icon.

use std::io::{Cursor, Write as _};

use anyhow::Context;
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::{
    deck::{
        model::{
            Align, AudioEl, Deck, Element, ImageEl, LineEl, RadarEl, ShapeEl, Slide, TextEl,
            VAlign,
        },
        raster::{rasterize_radar, rasterize_svg},
        svg::escape_xml,
    },
    foundation::{
        core::{Rect, Rgb8, inches_to_emu},
        error::{PlannerError, PlannerResult},
    },
};

const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const NS_R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const NS_P: &str = "http://schemas.openxmlformats.org/presentationml/2006/main";
const NS_P14: &str = "http://schemas.microsoft.com/office/powerpoint/2010/main";
const NS_PKG_RELS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

const REL_OFFICE_DOC: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
const REL_CORE: &str =
    "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
const REL_APP: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties";
const REL_SLIDE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";
const REL_MASTER: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster";
const REL_LAYOUT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";
const REL_THEME: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
const REL_IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
const REL_AUDIO: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/audio";
const REL_MEDIA: &str = "http://schemas.microsoft.com/office/2007/relationships/media";

const EXT_MEDIA_URI: &str = "{DAA4B4D4-6D71-4841-9C94-3DE7FCFB9230}";

pub const LATIN_FONT: &str = "Meiryo UI";
pub const EA_FONT: &str = "Meiryo UI";

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

/// PNG of the speaker icon shown over embedded narration, at 96px.
fn speaker_icon_png() -> PlannerResult<Vec<u8>> {
    rasterize_svg(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="96" height="96" viewBox="0 0 96 96"><circle cx="48" cy="48" r="44" fill="#ffffff" stroke="#94a3b8" stroke-width="3"/><polygon points="36,28 70,48 36,68" fill="#4f46e5"/></svg>"##,
    )
}

struct Rel {
    id: String,
    kind: &'static str,
    target: String,
}

fn rels_xml(rels: &[Rel]) -> String {
    let mut out = format!(r#"{XML_DECL}<Relationships xmlns="{NS_PKG_RELS}">"#);
    for r in rels {
        out.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            r.id,
            r.kind,
            escape_xml(&r.target)
        ));
    }
    out.push_str("</Relationships>");
    out
}

/// Media part stored under `ppt/media/`.
struct MediaPart {
    name: String,
    bytes: Vec<u8>,
}

struct SlideWriter<'a> {
    index: usize,
    px_per_inch: f64,
    body: String,
    rels: Vec<Rel>,
    next_shape_id: u32,
    media: &'a mut Vec<MediaPart>,
}

impl<'a> SlideWriter<'a> {
    fn new(index: usize, px_per_inch: f64, media: &'a mut Vec<MediaPart>) -> Self {
        Self {
            index,
            px_per_inch,
            body: String::new(),
            rels: vec![Rel {
                id: "rId1".to_string(),
                kind: REL_LAYOUT,
                target: "../slideLayouts/slideLayout1.xml".to_string(),
            }],
            next_shape_id: 2,
            media,
        }
    }

    fn shape_id(&mut self) -> u32 {
        let id = self.next_shape_id;
        self.next_shape_id += 1;
        id
    }

    fn add_rel(&mut self, kind: &'static str, target: String) -> String {
        let id = format!("rId{}", self.rels.len() + 1);
        self.rels.push(Rel {
            id: id.clone(),
            kind,
            target,
        });
        id
    }

    fn add_media(&mut self, ext: &str, bytes: Vec<u8>) -> String {
        let name = format!("media{}.{ext}", self.media.len() + 1);
        self.media.push(MediaPart {
            name: name.clone(),
            bytes,
        });
        format!("../media/{name}")
    }

    fn element(&mut self, el: &Element) -> PlannerResult<()> {
        match el {
            Element::Shape(e) => self.shape(e),
            Element::Line(e) => self.line(e),
            Element::Text(e) => self.text(e),
            Element::Image(e) => self.image(e)?,
            Element::Radar(e) => self.radar(e)?,
            Element::Audio(e) => self.audio(e)?,
        }
        Ok(())
    }

    fn shape(&mut self, el: &ShapeEl) {
        let id = self.shape_id();
        let geom = if el.corner_radius > 0.0 {
            let short = el.rect.width().min(el.rect.height()).max(1e-6);
            let adj = ((el.corner_radius / short) * 100_000.0).round().min(50_000.0) as i64;
            format!(
                r#"<a:prstGeom prst="roundRect"><a:avLst><a:gd name="adj" fmla="val {adj}"/></a:avLst></a:prstGeom>"#
            )
        } else {
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#.to_string()
        };
        let fill = el.fill.map_or_else(|| "<a:noFill/>".to_string(), solid_fill);
        let line = match el.stroke {
            Some(s) => format!(
                r#"<a:ln w="{}">{}</a:ln>"#,
                pt_to_emu(s.width_pt),
                solid_fill(s.color)
            ),
            None => "<a:ln><a:noFill/></a:ln>".to_string(),
        };
        let effects = if el.shadow {
            r#"<a:effectLst><a:outerShdw blurRad="38100" dist="19050" dir="5400000" algn="t" rotWithShape="0"><a:srgbClr val="000000"><a:alpha val="15000"/></a:srgbClr></a:outerShdw></a:effectLst>"#
        } else {
            ""
        };
        self.body.push_str(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Shape {id}"/><p:cNvSpPr/><p:nvPr/></p:nvSpPr><p:spPr>{}{geom}{fill}{line}{effects}</p:spPr></p:sp>"#,
            xfrm(el.rect, "")
        ));
    }

    fn line(&mut self, el: &LineEl) {
        let id = self.shape_id();
        let rect = Rect::from_points(el.from, el.to);
        let mut flip = String::new();
        if el.to.x < el.from.x {
            flip.push_str(r#" flipH="1""#);
        }
        if el.to.y < el.from.y {
            flip.push_str(r#" flipV="1""#);
        }
        let dash = if el.stroke.dashed {
            r#"<a:prstDash val="dash"/>"#
        } else {
            ""
        };
        self.body.push_str(&format!(
            r#"<p:cxnSp><p:nvCxnSpPr><p:cNvPr id="{id}" name="Line {id}"/><p:cNvCxnSpPr/><p:nvPr/></p:nvCxnSpPr><p:spPr>{}<a:prstGeom prst="line"><a:avLst/></a:prstGeom><a:ln w="{}">{}{dash}</a:ln></p:spPr></p:cxnSp>"#,
            xfrm(rect, &flip),
            pt_to_emu(el.stroke.width_pt),
            solid_fill(el.stroke.color)
        ));
    }

    fn text(&mut self, el: &TextEl) {
        let id = self.shape_id();
        let style = &el.style;
        let anchor = match style.valign {
            VAlign::Top => "t",
            VAlign::Middle => "ctr",
        };
        let vert = if style.vertical {
            r#" vert="vert270""#
        } else {
            ""
        };
        let autofit = if style.shrink {
            "<a:normAutofit/>"
        } else {
            "<a:noAutofit/>"
        };
        let algn = match style.align {
            Align::Left => "l",
            Align::Center => "ctr",
            Align::Right => "r",
            Align::Justify => "just",
        };
        let spacing = (style.line_height / 1.2 * 100_000.0).round() as i64;
        let size = (el.fitted.font_pt * 100.0).round() as i64;
        let bold = if style.bold { r#" b="1""# } else { "" };
        let run_props = format!(
            r#"<a:rPr lang="ja-JP" sz="{size}"{bold} dirty="0">{}<a:latin typeface="{LATIN_FONT}"/><a:ea typeface="{EA_FONT}"/></a:rPr>"#,
            solid_fill(style.color)
        );

        let mut paragraphs = String::new();
        for line in el.text.split('\n') {
            let line = line.trim_end_matches('\r');
            paragraphs.push_str(&format!(
                r#"<a:p><a:pPr algn="{algn}"><a:lnSpc><a:spcPct val="{spacing}"/></a:lnSpc></a:pPr>"#
            ));
            if !line.is_empty() {
                paragraphs.push_str(&format!(
                    "<a:r>{run_props}<a:t>{}</a:t></a:r>",
                    escape_xml(line)
                ));
            }
            paragraphs.push_str(&format!(
                r#"<a:endParaRPr lang="ja-JP" sz="{size}" dirty="0"/></a:p>"#
            ));
        }

        self.body.push_str(&format!(
            r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="Text {id}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/></p:spPr><p:txBody><a:bodyPr wrap="square" lIns="0" tIns="0" rIns="0" bIns="0" anchor="{anchor}"{vert} rtlCol="0">{autofit}</a:bodyPr><a:lstStyle/>{paragraphs}</p:txBody></p:sp>"#,
            xfrm(el.rect, "")
        ));
    }

    fn picture(&mut self, name: &str, rect: Rect, embed: &str, nv_extra: &str) {
        let id = self.shape_id();
        self.body.push_str(&format!(
            r#"<p:pic><p:nvPicPr><p:cNvPr id="{id}" name="{} {id}"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr>{nv_extra}</p:nvPr></p:nvPicPr><p:blipFill><a:blip r:embed="{embed}"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr>{}<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#,
            escape_xml(name),
            xfrm(rect, "")
        ));
    }

    fn image(&mut self, el: &ImageEl) -> PlannerResult<()> {
        let (ext, bytes) = match el.blob.mime() {
            "image/png" => ("png", el.blob.bytes().to_vec()),
            "image/jpeg" => ("jpeg", el.blob.bytes().to_vec()),
            "image/gif" => ("gif", el.blob.bytes().to_vec()),
            other => {
                tracing::debug!(mime = other, "re-encoding image as png for the deck");
                let img = image::load_from_memory(el.blob.bytes())
                    .context("decode image from memory")?;
                let mut out = Cursor::new(Vec::new());
                img.write_to(&mut out, image::ImageFormat::Png)
                    .context("re-encode image as png")?;
                ("png", out.into_inner())
            }
        };
        let target = self.add_media(ext, bytes);
        let rid = self.add_rel(REL_IMAGE, target);
        let rect = contain(el.rect, el.pixel_size);
        self.picture("Image", rect, &rid, "");
        Ok(())
    }

    fn radar(&mut self, el: &RadarEl) -> PlannerResult<()> {
        let png = rasterize_radar(el, self.px_per_inch)?;
        let target = self.add_media("png", png);
        let rid = self.add_rel(REL_IMAGE, target);
        self.picture("Radar Chart", el.rect, &rid, "");
        Ok(())
    }

    fn audio(&mut self, el: &AudioEl) -> PlannerResult<()> {
        let target = self.add_media("wav", el.blob.bytes().to_vec());
        let audio_rid = self.add_rel(REL_AUDIO, target.clone());
        let media_rid = self.add_rel(REL_MEDIA, target);
        let icon = speaker_icon_png()?;
        let icon_target = self.add_media("png", icon);
        let icon_rid = self.add_rel(REL_IMAGE, icon_target);
        let nv = format!(
            r#"<a:audioFile r:link="{audio_rid}"/><p:extLst><p:ext uri="{EXT_MEDIA_URI}"><p14:media xmlns:p14="{NS_P14}" r:embed="{media_rid}"/></p:ext></p:extLst>"#
        );
        self.picture("Narration", el.rect, &icon_rid, &nv);
        Ok(())
    }

    fn finish(self, slide: &Slide) -> (String, String) {
        let xml = format!(
            r#"{XML_DECL}<p:sld xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld><p:bg><p:bgPr>{}<a:effectLst/></p:bgPr></p:bg><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
            solid_fill(slide.background),
            self.body
        );
        tracing::trace!(slide = self.index, rels = self.rels.len(), "slide part written");
        (xml, rels_xml(&self.rels))
    }
}

fn solid_fill(color: Rgb8) -> String {
    format!(r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#, color.to_hex())
}

fn pt_to_emu(pt: f64) -> i64 {
    (pt * 12_700.0).round() as i64
}

fn xfrm(rect: Rect, attrs: &str) -> String {
    format!(
        r#"<a:xfrm{attrs}><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        inches_to_emu(rect.x0),
        inches_to_emu(rect.y0),
        inches_to_emu(rect.width()),
        inches_to_emu(rect.height())
    )
}

/// Largest rect with the aspect ratio of `pixels` centered inside `bounds`.
pub fn contain(bounds: Rect, pixels: (u32, u32)) -> Rect {
    let (pw, ph) = (f64::from(pixels.0), f64::from(pixels.1));
    if pw <= 0.0 || ph <= 0.0 {
        return bounds;
    }
    let scale = (bounds.width() / pw).min(bounds.height() / ph);
    let (w, h) = (pw * scale, ph * scale);
    let c = bounds.center();
    Rect::new(c.x - w / 2.0, c.y - h / 2.0, c.x + w / 2.0, c.y + h / 2.0)
}

fn content_types(slide_count: usize) -> String {
    let mut out = format!(
        r#"{XML_DECL}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Default Extension="jpeg" ContentType="image/jpeg"/><Default Extension="gif" ContentType="image/gif"/><Default Extension="wav" ContentType="audio/wav"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/><Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/><Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/><Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/><Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/><Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>"#
    );
    for i in 1..=slide_count {
        out.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#
        ));
    }
    out.push_str("</Types>");
    out
}

fn presentation_xml(deck: &Deck) -> String {
    let mut ids = String::new();
    for i in 0..deck.slides.len() {
        ids.push_str(&format!(
            r#"<p:sldId id="{}" r:id="rId{}"/>"#,
            256 + i,
            i + 2
        ));
    }
    format!(
        r#"{XML_DECL}<p:presentation xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" saveSubsetFonts="1"><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{ids}</p:sldIdLst><p:sldSz cx="{}" cy="{}"/><p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
        inches_to_emu(deck.size.width_in),
        inches_to_emu(deck.size.height_in)
    )
}

fn presentation_rels(slide_count: usize) -> String {
    let mut rels = vec![Rel {
        id: "rId1".to_string(),
        kind: REL_MASTER,
        target: "slideMasters/slideMaster1.xml".to_string(),
    }];
    for i in 1..=slide_count {
        rels.push(Rel {
            id: format!("rId{}", i + 1),
            kind: REL_SLIDE,
            target: format!("slides/slide{i}.xml"),
        });
    }
    rels.push(Rel {
        id: format!("rId{}", slide_count + 2),
        kind: REL_THEME,
        target: "theme/theme1.xml".to_string(),
    });
    rels_xml(&rels)
}

const EMPTY_TREE: &str = r#"<p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/></p:spTree>"#;

fn master_xml() -> String {
    format!(
        r#"{XML_DECL}<p:sldMaster xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}"><p:cSld>{EMPTY_TREE}</p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#
    )
}

fn layout_xml() -> String {
    format!(
        r#"{XML_DECL}<p:sldLayout xmlns:a="{NS_A}" xmlns:r="{NS_R}" xmlns:p="{NS_P}" type="blank" preserve="1"><p:cSld name="Blank">{EMPTY_TREE}</p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#
    )
}

fn theme_xml() -> String {
    let scheme_color = |name: &str, hex: &str| format!(r#"<a:{name}><a:srgbClr val="{hex}"/></a:{name}>"#);
    let colors = [
        ("dk1", "000000"),
        ("lt1", "FFFFFF"),
        ("dk2", "1E293B"),
        ("lt2", "F8FAFC"),
        ("accent1", "4F46E5"),
        ("accent2", "EAB308"),
        ("accent3", "EF4444"),
        ("accent4", "6B7280"),
        ("accent5", "3B82F6"),
        ("accent6", "10B981"),
        ("hlink", "4F46E5"),
        ("folHlink", "64748B"),
    ]
    .iter()
    .map(|&(n, h)| scheme_color(n, h))
    .collect::<String>();
    let fonts = format!(
        r#"<a:latin typeface="{LATIN_FONT}"/><a:ea typeface="{EA_FONT}"/><a:cs typeface=""/>"#
    );
    let fill = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = r#"<a:ln w="9525"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>"#;
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";
    format!(
        r#"{XML_DECL}<a:theme xmlns:a="{NS_A}" name="Scenario Planner"><a:themeElements><a:clrScheme name="Scenario Planner">{colors}</a:clrScheme><a:fontScheme name="Scenario Planner"><a:majorFont>{fonts}</a:majorFont><a:minorFont>{fonts}</a:minorFont></a:fontScheme><a:fmtScheme name="Scenario Planner"><a:fillStyleLst>{fill}{fill}{fill}</a:fillStyleLst><a:lnStyleLst>{line}{line}{line}</a:lnStyleLst><a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst><a:bgFillStyleLst>{fill}{fill}{fill}</a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#
    )
}

fn core_xml(title: &str, author: &str) -> String {
    format!(
        r#"{XML_DECL}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"><dc:title>{}</dc:title><dc:creator>{}</dc:creator></cp:coreProperties>"#,
        escape_xml(title),
        escape_xml(author)
    )
}

fn app_xml(author: &str, slide_count: usize) -> String {
    format!(
        r#"{XML_DECL}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>{}</Application><Slides>{slide_count}</Slides></Properties>"#,
        escape_xml(author)
    )
}

/// Serialize `deck` as a `.pptx` package.
#[tracing::instrument(skip(deck), fields(slides = deck.slides.len()))]
pub fn write_pptx(deck: &Deck, px_per_inch: f64) -> PlannerResult<Vec<u8>> {
    if deck.slides.is_empty() {
        return Err(PlannerError::export("deck has no slides"));
    }
    let n = deck.slides.len();
    let mut media = Vec::new();
    let mut slide_parts = Vec::with_capacity(n);
    for (i, slide) in deck.slides.iter().enumerate() {
        let mut w = SlideWriter::new(i + 1, px_per_inch, &mut media);
        for el in &slide.elements {
            w.element(el)?;
        }
        slide_parts.push(w.finish(slide));
    }

    let root_rels = rels_xml(&[
        Rel {
            id: "rId1".to_string(),
            kind: REL_OFFICE_DOC,
            target: "ppt/presentation.xml".to_string(),
        },
        Rel {
            id: "rId2".to_string(),
            kind: REL_CORE,
            target: "docProps/core.xml".to_string(),
        },
        Rel {
            id: "rId3".to_string(),
            kind: REL_APP,
            target: "docProps/app.xml".to_string(),
        },
    ]);
    let master_rels = rels_xml(&[
        Rel {
            id: "rId1".to_string(),
            kind: REL_LAYOUT,
            target: "../slideLayouts/slideLayout1.xml".to_string(),
        },
        Rel {
            id: "rId2".to_string(),
            kind: REL_THEME,
            target: "../theme/theme1.xml".to_string(),
        },
    ]);
    let layout_rels = rels_xml(&[Rel {
        id: "rId1".to_string(),
        kind: REL_MASTER,
        target: "../slideMasters/slideMaster1.xml".to_string(),
    }]);

    let mut parts: Vec<(String, Vec<u8>)> = vec![
        ("[Content_Types].xml".into(), content_types(n).into_bytes()),
        ("_rels/.rels".into(), root_rels.into_bytes()),
        ("docProps/core.xml".into(), core_xml(&deck.title, &deck.author).into_bytes()),
        ("docProps/app.xml".into(), app_xml(&deck.author, n).into_bytes()),
        ("ppt/presentation.xml".into(), presentation_xml(deck).into_bytes()),
        (
            "ppt/_rels/presentation.xml.rels".into(),
            presentation_rels(n).into_bytes(),
        ),
        (
            "ppt/slideMasters/slideMaster1.xml".into(),
            master_xml().into_bytes(),
        ),
        (
            "ppt/slideMasters/_rels/slideMaster1.xml.rels".into(),
            master_rels.into_bytes(),
        ),
        (
            "ppt/slideLayouts/slideLayout1.xml".into(),
            layout_xml().into_bytes(),
        ),
        (
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels".into(),
            layout_rels.into_bytes(),
        ),
        ("ppt/theme/theme1.xml".into(), theme_xml().into_bytes()),
    ];
    for (i, (xml, rels)) in slide_parts.into_iter().enumerate() {
        parts.push((format!("ppt/slides/slide{}.xml", i + 1), xml.into_bytes()));
        parts.push((
            format!("ppt/slides/_rels/slide{}.xml.rels", i + 1),
            rels.into_bytes(),
        ));
    }
    for m in media {
        parts.push((format!("ppt/media/{}", m.name), m.bytes));
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let opts = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, bytes) in &parts {
        zip.start_file(name.as_str(), opts)
            .with_context(|| format!("start pptx part '{name}'"))?;
        zip.write_all(bytes)
            .with_context(|| format!("write pptx part '{name}'"))?;
    }
    let cursor = zip.finish().context("finish pptx package")?;
    let bytes = cursor.into_inner();
    tracing::debug!(parts = parts.len(), bytes = bytes.len(), "pptx package written");
    Ok(bytes)
}

#[cfg(test)]
#[path = "../../tests/unit/deck/pptx.rs"]
mod tests;
