use super::*;
use crate::model::sample_set;

fn scenario() -> Scenario {
    sample_set().scenarios.remove(0)
}

#[test]
fn image_prompt_prefers_img_prompt() {
    let mut s = scenario();
    s.img_prompt = Some("flooded neon streets at dusk".to_string());
    let p = image_prompt(&s);
    assert!(p.starts_with("A breathtaking cinematic film still"));
    assert!(p.ends_with("flooded neon streets at dusk. No text, no words."));
}

#[test]
fn image_prompt_falls_back_to_story_then_title() {
    let mut s = scenario();
    s.img_prompt = Some("   ".to_string());
    s.story = "街が静かに沈む".to_string();
    assert!(image_prompt(&s).contains(" 街が静かに沈む. No text"));

    s.img_prompt = None;
    s.story.clear();
    s.title = "沈む街".to_string();
    assert!(image_prompt(&s).ends_with(" 沈む街. No text, no words."));
}

#[test]
fn speech_prompt_uses_tone_without_trailing_colon() {
    let mut s = scenario();
    s.story = "物語".to_string();
    s.audio_tone = Some("Say calmly:".to_string());
    assert_eq!(
        speech_prompt(&s),
        "Say calmly, but maintain a moderate and steady speaking pace: 物語"
    );

    s.audio_tone = None;
    assert_eq!(
        speech_prompt(&s),
        "Speak in a clear tone at a moderate and steady speaking pace: 物語"
    );
}
