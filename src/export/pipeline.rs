use std::{
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
};

use anyhow::Context as _;
use time::OffsetDateTime;

use crate::{
    deck::{builder::build_deck, pptx::write_pptx, raster::render_previews},
    export::{ExportContext, html::render_html},
    foundation::{
        config::AppConfig,
        error::{PlannerError, PlannerResult},
    },
    generate::client::GenerationClient,
    model::session::Workspace,
    project::codec::encode_project,
};

pub fn ensure_parent_dir(path: &Path) -> PlannerResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

struct TempFileGuard(Option<PathBuf>);

impl Drop for TempFileGuard {
    fn drop(&mut self) {
        if let Some(path) = self.0.take() {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Files written so far by a multi-file export; removed on drop unless committed.
#[derive(Default)]
struct WrittenFiles {
    paths: Vec<PathBuf>,
    committed: bool,
}

impl WrittenFiles {
    fn commit(mut self) -> Vec<PathBuf> {
        self.committed = true;
        std::mem::take(&mut self.paths)
    }
}

impl Drop for WrittenFiles {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        for path in self.paths.drain(..) {
            let _ = std::fs::remove_file(path);
        }
    }
}

/// Write `bytes` to a sibling temp file, then rename over `path`.
///
/// Readers never observe a partially written file; on error `path` is left untouched.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> PlannerResult<()> {
    ensure_parent_dir(path)?;
    let name = path
        .file_name()
        .ok_or_else(|| PlannerError::validation(format!("'{}' is not a file path", path.display())))?;
    let tmp = path.with_file_name(format!(
        ".{}.tmp-{}",
        name.to_string_lossy(),
        std::process::id()
    ));
    let mut guard = TempFileGuard(Some(tmp.clone()));
    std::fs::write(&tmp, bytes).with_context(|| format!("write '{}'", tmp.display()))?;
    std::fs::rename(&tmp, path)
        .with_context(|| format!("move '{}' into place", path.display()))?;
    guard.0 = None;
    Ok(())
}

/// Rejects overlapping exports.
#[derive(Debug, Default)]
pub struct ExportGate {
    busy: AtomicBool,
}

/// Holds the gate for the duration of one export.
#[derive(Debug)]
pub struct ExportGuard<'a> {
    busy: &'a AtomicBool,
}

impl Drop for ExportGuard<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

impl ExportGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    pub fn try_begin(&self) -> PlannerResult<ExportGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| PlannerError::Busy)?;
        Ok(ExportGuard { busy: &self.busy })
    }
}

/// Options for [`Exporter::export_deck`].
#[derive(Clone, Debug, Default)]
pub struct DeckExportOpts {
    /// Also write one PNG per slide into this directory.
    pub preview_dir: Option<PathBuf>,
    /// Raster density for previews and chart pictures; `None` uses the config value.
    pub px_per_inch: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DeckExportStats {
    pub slides: usize,
    pub bytes: usize,
    pub summarized: bool,
    pub audio_clips: usize,
    pub images: usize,
    pub previews: Vec<PathBuf>,
}

/// Writes decks, HTML pages and project files, one export at a time.
#[derive(Debug, Default)]
pub struct Exporter {
    gate: ExportGate,
}

impl Exporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gate(&self) -> &ExportGate {
        &self.gate
    }

    /// Text for the cover's context box: `details` as-is, or its summary when it is long.
    ///
    /// At most one `summarize` call is made. A failed summary falls back to the full text.
    pub async fn cover_details(
        &self,
        ctx: &ExportContext<'_>,
        client: &dyn GenerationClient,
    ) -> (String, bool) {
        if !ctx.details_need_summary() {
            return (ctx.details.to_string(), false);
        }
        match client.summarize(ctx.details).await {
            Ok(summary) if !summary.trim().is_empty() => (summary.trim().to_string(), true),
            Ok(_) => {
                tracing::warn!("summary came back empty; using full details on the cover");
                (ctx.details.to_string(), false)
            }
            Err(e) => {
                tracing::warn!(error = %e, "summarization failed; using full details on the cover");
                (ctx.details.to_string(), false)
            }
        }
    }

    #[tracing::instrument(skip(self, ctx, client, opts), fields(out = %out.display()))]
    pub async fn export_deck(
        &self,
        ctx: &ExportContext<'_>,
        client: &dyn GenerationClient,
        out: &Path,
        opts: &DeckExportOpts,
    ) -> PlannerResult<DeckExportStats> {
        let _guard = self.gate.try_begin()?;
        let ppi = opts.px_per_inch.unwrap_or(ctx.config.preview_px_per_inch);

        let (cover, summarized) = self.cover_details(ctx, client).await;
        let deck = build_deck(ctx, &cover)?;
        let bytes = write_pptx(&deck, ppi).map_err(|e| match e {
            PlannerError::Export(_) => e,
            other => PlannerError::export(other.to_string()),
        })?;

        let rendered = match &opts.preview_dir {
            Some(dir) => render_previews(&deck, ppi)?
                .into_iter()
                .map(|(name, png)| (dir.join(name), png))
                .collect(),
            None => Vec::new(),
        };

        let mut written = WrittenFiles::default();
        for (path, png) in &rendered {
            write_atomic(path, png)?;
            written.paths.push(path.clone());
        }
        write_atomic(out, &bytes)?;
        let previews = written.commit();

        let stats = DeckExportStats {
            slides: deck.slides.len(),
            bytes: bytes.len(),
            summarized,
            audio_clips: deck.slides.iter().filter(|s| s.has_audio()).count(),
            images: deck.slides.iter().filter(|s| s.has_image()).count(),
            previews,
        };
        tracing::info!(
            slides = stats.slides,
            bytes = stats.bytes,
            summarized,
            "deck exported"
        );
        Ok(stats)
    }

    #[tracing::instrument(skip(self, ctx), fields(out = %out.display()))]
    pub fn export_html(&self, ctx: &ExportContext<'_>, out: &Path) -> PlannerResult<usize> {
        let _guard = self.gate.try_begin()?;
        ctx.result.validate()?;
        let html = render_html(ctx);
        write_atomic(out, html.as_bytes())?;
        tracing::info!(bytes = html.len(), "html exported");
        Ok(html.len())
    }
}

/// Serialize the workspace as a project file at `path`.
#[tracing::instrument(skip(ws, config), fields(path = %path.display()))]
pub fn save_project(
    ws: &Workspace,
    config: &AppConfig,
    path: &Path,
    now: OffsetDateTime,
) -> PlannerResult<()> {
    let bytes = encode_project(ws, config, now)?;
    write_atomic(path, &bytes)?;
    tracing::info!(bytes = bytes.len(), "project saved");
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/export/pipeline.rs"]
mod tests;
