use crate::model::scenario::Scenario;

const IMAGE_STYLE: &str = "A breathtaking cinematic film still from a movie, dramatic lighting, atmospheric, highly detailed, wide angle shot, realistic texture, ar 16:9, 2k resolution.";
const IMAGE_SUFFIX: &str = "No text, no words.";
const SPEECH_PACE: &str = "but maintain a moderate and steady speaking pace";
const SPEECH_DEFAULT: &str = "Speak in a clear tone at a moderate and steady speaking pace";

fn non_blank(v: Option<&str>) -> Option<&str> {
    v.map(str::trim).filter(|v| !v.is_empty())
}

/// Illustration prompt: the fixed film-still style plus the scenario's own visual description.
///
/// Falls back to the story, then the title, when no `img_prompt` was generated.
pub fn image_prompt(s: &Scenario) -> String {
    let subject = non_blank(s.img_prompt.as_deref())
        .or_else(|| non_blank(Some(&s.story)))
        .unwrap_or(s.title.trim());
    format!("{IMAGE_STYLE} {subject}. {IMAGE_SUFFIX}")
}

/// Narration request: tone direction followed by the story to read.
pub fn speech_prompt(s: &Scenario) -> String {
    match non_blank(s.audio_tone.as_deref()) {
        Some(tone) => {
            let tone = tone.strip_suffix(':').unwrap_or(tone).trim_end();
            format!("{tone}, {SPEECH_PACE}: {}", s.story)
        }
        None => format!("{SPEECH_DEFAULT}: {}", s.story),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/generate/prompts.rs"]
mod tests;
