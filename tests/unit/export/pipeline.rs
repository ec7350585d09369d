use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;
use crate::{
    generate::client::HelpTurn,
    media::{blob::MediaBlob, wav::encode_wav},
    model::{sample_set, scenario::CustomAxes, scenario::QuadrantId},
    project::codec::load_project,
};

#[derive(Default)]
struct FakeClient {
    summarize_calls: AtomicUsize,
    fail_summary: bool,
}

#[async_trait::async_trait]
impl GenerationClient for FakeClient {
    async fn generate_scenarios(
        &self,
        _theme: &str,
        _details: &str,
        _axes: Option<&CustomAxes>,
    ) -> PlannerResult<String> {
        Err(PlannerError::remote("not used"))
    }

    async fn generate_image(&self, _prompt: &str) -> PlannerResult<String> {
        Err(PlannerError::remote("not used"))
    }

    async fn generate_speech(&self, _text: &str) -> PlannerResult<String> {
        Err(PlannerError::remote("not used"))
    }

    async fn summarize(&self, _text: &str) -> PlannerResult<String> {
        self.summarize_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_summary {
            Err(PlannerError::remote("Failed to summarize"))
        } else {
            Ok("短い要約".to_string())
        }
    }
    async fn help(&self, _text: &str, _history: &[HelpTurn]) -> PlannerResult<String> {
        Err(PlannerError::remote("not used"))
    }
}

fn workspace(details_chars: usize) -> Workspace {
    let mut ws = Workspace::new("気候変動と都市", "あ".repeat(details_chars));
    ws.set_result(sample_set());
    ws
}

fn date() -> time::Date {
    time::macros::date!(2026 - 01 - 15)
}

#[test]
fn write_atomic_creates_parents_and_leaves_no_temp() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested/out/file.bin");
    write_atomic(&path, b"first").unwrap();
    write_atomic(&path, b"second").unwrap();
    assert_eq!(std::fs::read(&path).unwrap(), b"second");
    let names: Vec<_> = std::fs::read_dir(path.parent().unwrap())
        .unwrap()
        .map(|e| e.unwrap().file_name())
        .collect();
    assert_eq!(names, vec![std::ffi::OsString::from("file.bin")]);
}

#[test]
fn gate_rejects_overlap_and_releases_on_drop() {
    let gate = ExportGate::new();
    {
        let _held = gate.try_begin().unwrap();
        assert!(gate.is_busy());
        assert!(matches!(gate.try_begin(), Err(PlannerError::Busy)));
    }
    assert!(!gate.is_busy());
    assert!(gate.try_begin().is_ok());
}

#[tokio::test]
async fn long_details_are_summarized_exactly_once() {
    let cfg = AppConfig::default();
    let ws = workspace(150);
    let ctx = ExportContext::from_workspace(&ws, &cfg, date()).unwrap();
    let client = FakeClient::default();

    let (text, summarized) = Exporter::new().cover_details(&ctx, &client).await;
    assert!(summarized);
    assert_eq!(text, "短い要約");
    assert_eq!(client.summarize_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn short_details_skip_summarization() {
    let cfg = AppConfig::default();
    let ws = workspace(50);
    let ctx = ExportContext::from_workspace(&ws, &cfg, date()).unwrap();
    let client = FakeClient::default();

    let (text, summarized) = Exporter::new().cover_details(&ctx, &client).await;
    assert!(!summarized);
    assert_eq!(text.chars().count(), 50);
    assert_eq!(client.summarize_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_summary_falls_back_to_full_details() {
    let cfg = AppConfig::default();
    let ws = workspace(150);
    let ctx = ExportContext::from_workspace(&ws, &cfg, date()).unwrap();
    let client = FakeClient {
        fail_summary: true,
        ..FakeClient::default()
    };

    let (text, summarized) = Exporter::new().cover_details(&ctx, &client).await;
    assert!(!summarized);
    assert_eq!(text, ws.details);
}

#[tokio::test]
async fn deck_export_skips_broken_audio_and_writes_previews() {
    let cfg = AppConfig::default();
    let mut ws = workspace(10);
    let wav = encode_wav(&[0, 1000, -1000, 0], 24_000).unwrap();
    let set = ws.result_mut().unwrap();
    set.scenario_mut(QuadrantId::A).unwrap().audio = Some(MediaBlob::new("audio/wav", wav));
    set.scenario_mut(QuadrantId::B).unwrap().audio =
        Some(MediaBlob::new("audio/wav", b"not a wave".to_vec()));

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("deck.pptx");
    let ctx = ExportContext::from_workspace(&ws, &cfg, date()).unwrap();
    let opts = DeckExportOpts {
        preview_dir: Some(dir.path().join("previews")),
        px_per_inch: Some(16.0),
    };
    let stats = Exporter::new()
        .export_deck(&ctx, &FakeClient::default(), &out, &opts)
        .await
        .unwrap();

    assert_eq!(stats.slides, 11);
    assert_eq!(stats.audio_clips, 1);
    assert_eq!(stats.images, 0);
    assert!(!stats.summarized);
    assert_eq!(stats.previews.len(), 11);
    assert!(stats.previews.iter().all(|p| p.exists()));

    let bytes = std::fs::read(&out).unwrap();
    assert_eq!(bytes.len(), stats.bytes);
    assert_eq!(&bytes[..2], b"PK");
}

#[tokio::test]
async fn failed_deck_write_removes_previews() {
    let cfg = AppConfig::default();
    let ws = workspace(10);
    let ctx = ExportContext::from_workspace(&ws, &cfg, date()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    // a non-empty directory cannot be replaced by the deck file
    let out = dir.path().join("deck.pptx");
    std::fs::create_dir_all(out.join("occupied")).unwrap();
    let preview_dir = dir.path().join("previews");
    let opts = DeckExportOpts {
        preview_dir: Some(preview_dir.clone()),
        px_per_inch: Some(8.0),
    };

    let result = Exporter::new()
        .export_deck(&ctx, &FakeClient::default(), &out, &opts)
        .await;
    assert!(result.is_err());
    let leftovers = std::fs::read_dir(&preview_dir)
        .map(|entries| entries.count())
        .unwrap_or(0);
    assert_eq!(leftovers, 0);
    assert!(out.join("occupied").is_dir());
}

#[tokio::test]
async fn busy_exporter_rejects_deck_export() {
    let cfg = AppConfig::default();
    let ws = workspace(10);
    let ctx = ExportContext::from_workspace(&ws, &cfg, date()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("deck.pptx");

    let exporter = Exporter::new();
    let _held = exporter.gate().try_begin().unwrap();
    let err = exporter
        .export_deck(&ctx, &FakeClient::default(), &out, &DeckExportOpts::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PlannerError::Busy));
    assert!(!out.exists());
}

#[test]
fn html_export_writes_page() {
    let cfg = AppConfig::default();
    let ws = workspace(10);
    let ctx = ExportContext::from_workspace(&ws, &cfg, date()).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("page.html");

    let n = Exporter::new().export_html(&ctx, &out).unwrap();
    let html = std::fs::read_to_string(&out).unwrap();
    assert_eq!(html.len(), n);
    assert!(html.contains("気候変動と都市"));
}

#[test]
fn saved_project_loads_back() {
    let cfg = AppConfig::default();
    let mut ws = workspace(10);
    ws.result_mut().unwrap().scenario_mut(QuadrantId::C).unwrap().image =
        Some(MediaBlob::new("image/png", vec![0x89, b'P', b'N', b'G']));
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("p.json");

    save_project(&ws, &cfg, &path, time::OffsetDateTime::UNIX_EPOCH).unwrap();
    let loaded = load_project(&path).unwrap().into_workspace();
    assert_eq!(loaded.theme, ws.theme);
    let image = loaded
        .result()
        .and_then(|s| s.scenario(QuadrantId::C))
        .and_then(|s| s.image.as_ref())
        .unwrap();
    assert_eq!(image.len(), 4);
}
