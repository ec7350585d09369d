use crate::{foundation::core::Rgb8, media::blob::MediaBlob};

/// Fixed radar subjects, in axis order. Every scenario's allocation follows this order.
pub const ALLOCATION_SUBJECTS: [&str; 5] = [
    "イノベーション",
    "マーケティング",
    "人材・組織",
    "既存事業",
    "財務・リスク",
];

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// A bipolar uncertainty axis.
pub struct Axis {
    pub label: String,
    pub min: String,
    pub max: String,
}

impl Axis {
    pub fn new(label: impl Into<String>, min: impl Into<String>, max: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            min: min.into(),
            max: max.into(),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.label.trim().is_empty() && self.min.trim().is_empty() && self.max.trim().is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// User-specified axes sent with a generation request.
pub struct CustomAxes {
    pub x: Axis,
    pub y: Axis,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Insight {
    pub context: String,
    pub issue: String,
    pub breakthrough: String,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// One radar value on the 1..=5 scale.
pub struct AllocationEntry {
    pub subject: String,
    pub val: u8,
}

/// One of the four matrix positions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QuadrantId {
    /// min X, max Y (top-left).
    A,
    /// max X, max Y (top-right).
    B,
    /// min X, min Y (bottom-left).
    C,
    /// max X, min Y (bottom-right).
    D,
}

impl QuadrantId {
    pub const ALL: [Self; 4] = [Self::A, Self::B, Self::C, Self::D];

    pub fn letter(self) -> char {
        match self {
            Self::A => 'A',
            Self::B => 'B',
            Self::C => 'C',
            Self::D => 'D',
        }
    }

    /// Find the quadrant letter inside a scenario id, checking A, B, C, D in that order.
    pub fn find_in(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|q| id.contains(q.letter()))
    }

    /// Quadrant for an id; ids without a letter land in C.
    pub fn from_id(id: &str) -> Self {
        Self::find_in(id).unwrap_or(Self::C)
    }

    /// `"Scenario A"`
    pub fn scenario_id(self) -> String {
        format!("Scenario {}", self.letter())
    }

    pub fn color(self) -> ScenarioColor {
        match self {
            Self::A => ScenarioColor::Yellow,
            Self::B => ScenarioColor::Red,
            Self::C => ScenarioColor::Gray,
            Self::D => ScenarioColor::Blue,
        }
    }

    pub fn is_left(self) -> bool {
        matches!(self, Self::A | Self::C)
    }

    pub fn is_top(self) -> bool {
        matches!(self, Self::A | Self::B)
    }
}

/// Display color bound to a quadrant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScenarioColor {
    Yellow,
    Red,
    Gray,
    Blue,
}

impl ScenarioColor {
    pub fn name(self) -> &'static str {
        match self {
            Self::Yellow => "yellow",
            Self::Red => "red",
            Self::Gray => "gray",
            Self::Blue => "blue",
        }
    }

    /// Accent color.
    pub fn rgb(self) -> Rgb8 {
        match self {
            Self::Yellow => Rgb8::hex(0xEAB308),
            Self::Red => Rgb8::hex(0xEF4444),
            Self::Gray => Rgb8::hex(0x6B7280),
            Self::Blue => Rgb8::hex(0x3B82F6),
        }
    }

    /// Pale background tint.
    pub fn tint(self) -> Rgb8 {
        match self {
            Self::Yellow => Rgb8::hex(0xFEFCE8),
            Self::Red => Rgb8::hex(0xFEF2F2),
            Self::Gray => Rgb8::hex(0xF9FAFB),
            Self::Blue => Rgb8::hex(0xEFF6FF),
        }
    }
}

/// Color of a scenario, derived from its id alone.
pub fn color_of(id: &str) -> ScenarioColor {
    QuadrantId::from_id(id).color()
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scenario {
    pub id: String,
    pub title: String,
    pub headline: String,
    pub insight: Insight,
    pub action_advice: String,
    pub story: String,
    pub early_signs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub img_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_tone: Option<String>,
    /// Advisory percentage; sets are not required to sum to 100.
    pub probability: u32,
    pub allocation: Vec<AllocationEntry>,
    /// Generated illustration. Transient; persisted only by the project codec.
    #[serde(skip)]
    pub image: Option<MediaBlob>,
    /// Generated narration (`audio/wav`). Transient; persisted only by the project codec.
    #[serde(skip)]
    pub audio: Option<MediaBlob>,
}

impl Scenario {
    pub fn quadrant(&self) -> QuadrantId {
        QuadrantId::from_id(&self.id)
    }

    pub fn color(&self) -> ScenarioColor {
        color_of(&self.id)
    }

    /// Allocation values in subject order, as radar inputs.
    pub fn allocation_values(&self) -> Vec<f64> {
        self.allocation.iter().map(|a| f64::from(a.val)).collect()
    }

    pub fn media(&self, kind: MediaKind) -> Option<&MediaBlob> {
        match kind {
            MediaKind::Image => self.image.as_ref(),
            MediaKind::Audio => self.audio.as_ref(),
        }
    }

    pub(crate) fn media_slot(&mut self, kind: MediaKind) -> &mut Option<MediaBlob> {
        match kind {
            MediaKind::Image => &mut self.image,
            MediaKind::Audio => &mut self.audio,
        }
    }
}

/// Generated media attached to a scenario.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaKind {
    Image,
    Audio,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
/// The four-scenario result of one generation call.
pub struct ScenarioSet {
    pub axis_x: Axis,
    pub axis_y: Axis,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub portfolio_analysis: String,
    pub scenarios: Vec<Scenario>,
}

impl ScenarioSet {
    pub fn scenario(&self, quadrant: QuadrantId) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.quadrant() == quadrant)
    }

    pub fn scenario_mut(&mut self, quadrant: QuadrantId) -> Option<&mut Scenario> {
        self.scenarios.iter_mut().find(|s| s.quadrant() == quadrant)
    }

    /// Scenarios ordered A, B, C, D; quadrants without a scenario are skipped.
    pub fn scenarios_in_quadrant_order(&self) -> impl Iterator<Item = &Scenario> + '_ {
        QuadrantId::ALL.into_iter().filter_map(|q| self.scenario(q))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/model/scenario.rs"]
mod tests;
