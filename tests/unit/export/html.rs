use super::*;
use crate::{
    foundation::config::AppConfig,
    media::blob::MediaBlob,
    model::{sample_set, scenario::QuadrantId},
};

fn page(set: &crate::model::scenario::ScenarioSet, theme: &str, details: &str) -> String {
    let cfg = AppConfig::default();
    let ctx = ExportContext {
        theme,
        details,
        result: set,
        config: &cfg,
        generated_on: time::macros::date!(2026 - 01 - 15),
    };
    render_html(&ctx)
}

#[test]
fn escapes_all_five_characters() {
    assert_eq!(
        escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
        "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
    );
}

#[test]
fn theme_is_escaped_in_title_and_header() {
    let set = sample_set();
    let html = page(&set, "<script>alert(1)</script>", "");
    assert!(!html.contains("<script>alert(1)</script>"));
    assert!(html.contains("<title>&lt;script&gt;alert(1)&lt;/script&gt; - AI Scenario Planner</title>"));
    assert!(html.contains(r#"<div class="title">&lt;script&gt;"#));
    assert!(html.starts_with("<!doctype html>"));
    assert!(html.contains(r#"<html lang="ja">"#));
}

#[test]
fn one_audio_element_per_scenario_with_narration() {
    let mut set = sample_set();
    for q in [QuadrantId::A, QuadrantId::D] {
        set.scenario_mut(q).unwrap().audio = Some(MediaBlob::new("audio/wav", vec![1, 2, 3]));
    }
    let html = page(&set, "t", "");
    assert_eq!(html.matches("<audio ").count(), 2);
    assert_eq!(html.matches(r#"class="audio-btn" data-audio-id="#).count(), 2);
    assert!(html.contains(r#"<audio id="audio-Scenario A" src="data:audio/wav;base64,AQID" preload="auto">"#));
    assert!(html.contains(AUDIO_STOP));
}

#[test]
fn toggle_script_and_details_are_present() {
    let set = sample_set();
    let html = page(&set, "t", "line one\nline two & more");
    assert!(html.contains(TOGGLE_EXPAND));
    assert!(html.contains(TOGGLE_COLLAPSE));
    assert!(html.contains(r#"id="detailsToggle""#));
    assert!(html.contains("line one\nline two &amp; more"));
}

#[test]
fn cards_and_radar_use_scenario_colors() {
    let set = sample_set();
    let html = page(&set, "t", "");
    assert!(html.contains(r#"style="border-color:#eab30833;""#));
    assert!(html.contains(r##"fill="#ef44444D" stroke="#ef4444""##));
    assert!(html.contains("background:#3b82f60D;"));
    // 5 rings + 4 series
    let radar = radar_svg(&set.scenarios);
    assert_eq!(radar.matches("<polygon").count(), 9);
    assert_eq!(radar.matches("<text").count(), ALLOCATION_SUBJECTS.len());
    // first label sits straight above the center at radius + 22
    assert!(radar.contains(r#"<text x="100" y="-2""#));
}

#[test]
fn missing_analysis_and_media_fall_back() {
    let mut set = sample_set();
    set.portfolio_analysis.clear();
    let html = page(&set, "t", "");
    assert!(html.contains(NO_ANALYSIS));
    assert!(!html.contains("<img "));
    assert!(!html.contains("<audio "));
}

#[test]
fn early_signs_render_as_bullets() {
    let set = sample_set();
    let html = page(&set, "t", "");
    let first = &set.scenarios[0].early_signs[0];
    assert!(html.contains(&format!("• {}", escape_html(first))));
}

#[test]
fn title_uses_configured_app_name() {
    let set = sample_set();
    let cfg = AppConfig {
        app_name: "Futures Lab".to_string(),
        ..AppConfig::default()
    };
    let ctx = ExportContext {
        theme: "t",
        details: "",
        result: &set,
        config: &cfg,
        generated_on: time::macros::date!(2026 - 01 - 15),
    };
    let html = render_html(&ctx);
    assert!(html.contains("<title>t - Futures Lab</title>"));
    assert!(!html.contains("AI Scenario Planner"));
}
