use crate::{
    deck::text_fit::FittedText,
    foundation::core::{Point, Rect, Rgb8, SlideSize},
    media::blob::MediaBlob,
    model::scenario::QuadrantId,
};

/// Backend-agnostic slide document. All coordinates are inches from the slide's top-left.
#[derive(Clone, Debug, PartialEq)]
pub struct Deck {
    pub title: String,
    /// Application name stamped into the package properties.
    pub author: String,
    pub size: SlideSize,
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn slide(&self, kind: SlideKind) -> Option<&Slide> {
        self.slides.iter().find(|s| s.kind == kind)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SlideKind {
    Cover,
    Matrix,
    Portfolio,
    /// Image, headline, story and narration of one scenario.
    ScenarioStory(QuadrantId),
    /// Radar and strategy panels of one scenario.
    ScenarioStrategy(QuadrantId),
}

impl SlideKind {
    /// Short stable slug used for preview file names.
    pub fn slug(self) -> String {
        match self {
            Self::Cover => "cover".to_string(),
            Self::Matrix => "matrix".to_string(),
            Self::Portfolio => "portfolio".to_string(),
            Self::ScenarioStory(q) => format!("scenario_{}_story", q.letter()),
            Self::ScenarioStrategy(q) => format!("scenario_{}_strategy", q.letter()),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Slide {
    pub kind: SlideKind,
    pub background: Rgb8,
    /// Paint order: later elements draw over earlier ones.
    pub elements: Vec<Element>,
}

impl Slide {
    pub fn new(kind: SlideKind, background: Rgb8) -> Self {
        Self {
            kind,
            background,
            elements: Vec::new(),
        }
    }

    pub fn push(&mut self, el: impl Into<Element>) {
        self.elements.push(el.into());
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextEl> + '_ {
        self.elements.iter().filter_map(|e| match e {
            Element::Text(t) => Some(t),
            _ => None,
        })
    }

    pub fn has_audio(&self) -> bool {
        self.elements.iter().any(|e| matches!(e, Element::Audio(_)))
    }

    pub fn has_image(&self) -> bool {
        self.elements.iter().any(|e| matches!(e, Element::Image(_)))
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Stroke {
    pub color: Rgb8,
    pub width_pt: f64,
    pub dashed: bool,
}

impl Stroke {
    pub fn solid(color: Rgb8, width_pt: f64) -> Self {
        Self {
            color,
            width_pt,
            dashed: false,
        }
    }

    pub fn dashed(color: Rgb8, width_pt: f64) -> Self {
        Self {
            color,
            width_pt,
            dashed: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum VAlign {
    #[default]
    Top,
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextStyle {
    pub font_pt: f64,
    pub color: Rgb8,
    pub bold: bool,
    pub align: Align,
    pub valign: VAlign,
    /// Line pitch as a multiple of the font size.
    pub line_height: f64,
    /// Rotated 270 degrees (reads bottom-to-top).
    pub vertical: bool,
    /// Whether the backend may shrink the text to fit its box.
    pub shrink: bool,
}

impl TextStyle {
    pub fn new(font_pt: f64, color: Rgb8) -> Self {
        Self {
            font_pt,
            color,
            bold: false,
            align: Align::Left,
            valign: VAlign::Top,
            line_height: 1.2,
            vertical: false,
            shrink: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn middle(mut self) -> Self {
        self.valign = VAlign::Middle;
        self
    }

    pub fn line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn vertical(mut self) -> Self {
        self.vertical = true;
        self
    }

    pub fn shrink(mut self) -> Self {
        self.shrink = true;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShapeEl {
    pub rect: Rect,
    pub fill: Option<Rgb8>,
    pub stroke: Option<Stroke>,
    /// Corner radius in inches; 0 for square corners.
    pub corner_radius: f64,
    pub shadow: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LineEl {
    pub from: Point,
    pub to: Point,
    pub stroke: Stroke,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TextEl {
    pub rect: Rect,
    pub text: String,
    pub style: TextStyle,
    /// Lines and size after shrink-to-fit.
    pub fitted: FittedText,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ImageEl {
    pub rect: Rect,
    pub blob: MediaBlob,
    /// Decoded pixel size, used to preserve aspect ratio inside `rect`.
    pub pixel_size: (u32, u32),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RadarSeries {
    pub name: String,
    pub color: Rgb8,
    pub values: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RadarEl {
    pub rect: Rect,
    pub labels: Vec<String>,
    pub series: Vec<RadarSeries>,
    /// Fill opacity of each series polygon, 0..=255.
    pub fill_alpha: u8,
    pub label_pt: f64,
    pub legend: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AudioEl {
    pub rect: Rect,
    /// `audio/wav` payload, already checked to be a well-formed container.
    pub blob: MediaBlob,
    pub duration_secs: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    Shape(ShapeEl),
    Line(LineEl),
    Text(TextEl),
    Image(ImageEl),
    Radar(RadarEl),
    Audio(AudioEl),
}

impl Element {
    /// Bounding box in inches.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::Shape(e) => e.rect,
            Self::Line(e) => Rect::from_points(e.from, e.to),
            Self::Text(e) => e.rect,
            Self::Image(e) => e.rect,
            Self::Radar(e) => e.rect,
            Self::Audio(e) => e.rect,
        }
    }
}

macro_rules! element_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(impl From<$ty> for Element {
            fn from(value: $ty) -> Self {
                Self::$variant(value)
            }
        })*
    };
}

element_from!(
    Shape(ShapeEl),
    Line(LineEl),
    Text(TextEl),
    Image(ImageEl),
    Radar(RadarEl),
    Audio(AudioEl),
);
