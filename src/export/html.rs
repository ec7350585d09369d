//! Single-file static HTML view of a scenario set.
//!
//! Everything is inlined: CSS, the radar chart as SVG, images and narration as base64 data
//! URIs, and two small scripts (details toggle, exclusive audio playback). All user text goes
//! through [`escape_html`].

use std::fmt::Write as _;

use crate::{
    export::ExportContext,
    foundation::core::Point,
    geometry::radar::{RadarGeometry, fmt_coord, svg_points},
    model::scenario::{ALLOCATION_SUBJECTS, Scenario},
};

pub const CHART_SIZE: f64 = 200.0;
pub const CHART_RADIUS: f64 = 80.0;
pub const LABEL_OFFSET: f64 = 22.0;

pub const NO_ANALYSIS: &str = "分析データがありません。";
pub const TOGGLE_EXPAND: &str = "▼ 全文を表示";
pub const TOGGLE_COLLAPSE: &str = "▲ 閉じる";
pub const AUDIO_PLAY: &str = "▶ 再生";
pub const AUDIO_STOP: &str = "■ 停止";

/// Escape `& < > " '` for text and attribute positions.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

const STYLE: &str = r#"
    :root {
      --bg: #f0f4f8;
      --card: #ffffff;
      --text: #0f172a;
      --muted: #64748b;
      --accent: #4f46e5;
      --accent-2: #7c3aed;
      --border: #e2e8f0;
    }
    * { box-sizing: border-box; }
    body {
      margin: 0;
      font-family: "Hiragino Kaku Gothic ProN", "Noto Sans JP", "Segoe UI", sans-serif;
      background: radial-gradient(#cbd5e1 1px, transparent 1px), var(--bg);
      background-size: 24px 24px;
      color: var(--text);
    }
    .wrap { max-width: 1040px; margin: 0 auto; padding: 28px 18px 80px; }
    .card { background: var(--card); border: 1px solid var(--border); border-radius: 20px; padding: 24px; box-shadow: 0 10px 24px rgba(15, 23, 42, 0.08); }
    .title { font-size: 32px; font-weight: 800; text-align: center; color: #5b4bff; }
    .version { margin-top: 6px; text-align: center; font-size: 11px; font-weight: 700; color: #64748b; }
    .version-badge { display: inline-block; margin-left: 6px; background: #eef2ff; color: #4f46e5; padding: 2px 6px; border-radius: 999px; font-size: 10px; }
    .desc { margin: 12px auto 0; max-width: 820px; font-size: 12px; line-height: 1.8; color: #64748b; text-align: center; white-space: pre-wrap; }
    .desc-collapsed { max-height: 72px; overflow: hidden; position: relative; }
    .desc-fade { position: absolute; left: 0; right: 0; bottom: 0; height: 24px; background: linear-gradient(180deg, rgba(255,255,255,0), #ffffff); }
    .desc-toggle { margin: 8px auto 0; display: block; background: none; border: none; color: #4f46e5; font-size: 12px; font-weight: 700; cursor: pointer; }
    .section-pill { display: inline-flex; padding: 8px 22px; border-radius: 999px; background: linear-gradient(90deg, #4f46e5, #7c3aed); box-shadow: 0 8px 20px rgba(79, 70, 229, 0.25); font-weight: 700; color: #fff; font-size: 13px; }
    .section-title { display: flex; justify-content: center; margin: 12px 0 14px; }
    .matrix-wrap { margin-top: 18px; }
    .matrix { display: grid; grid-template-columns: 70px 1fr; gap: 12px; }
    .matrix-core { display: grid; grid-template-columns: repeat(2, minmax(0, 1fr)); grid-template-rows: repeat(2, minmax(0, 1fr)); gap: 12px; min-height: 380px; }
    .axis { color: var(--muted); font-size: 12px; font-weight: 700; }
    .axis-pill { background: #fff; border: 1px solid #dfe3ff; border-radius: 999px; padding: 6px 10px; color: #4f46e5; font-weight: 700; font-size: 11px; position: relative; z-index: 2; }
    .axis-line { background: #dfe3ff; position: relative; z-index: 1; }
    .scenario-card { border: 1px solid var(--border); border-radius: 12px; padding: 14px; background: #fff; position: relative; box-shadow: 0 4px 10px rgba(15,23,42,0.04); }
    .scenario-prob { position: absolute; top: 0; right: 0; color: #fff; font-weight: 700; font-size: 11px; padding: 6px 12px; border-bottom-left-radius: 10px; }
    .scenario-id { font-size: 10px; font-weight: 700; color: #9ca3af; margin-bottom: 6px; display: block; }
    .headline { font-size: 12px; color: var(--muted); margin-top: 6px; }
    .detail { font-size: 13px; line-height: 1.7; white-space: pre-wrap; }
    .grid { display: grid; gap: 16px; }
    .grid-2 { grid-template-columns: repeat(2, minmax(0, 1fr)); }
    .panel { background: #fff; border: 1px solid var(--border); border-radius: 20px; padding: 24px; box-shadow: 0 6px 20px rgba(15, 23, 42, 0.08); }
    .radar-wrap { display: flex; flex-direction: column; align-items: center; gap: 8px; }
    .radar-svg { overflow: visible; }
    .legend { width: 100%; display: grid; gap: 6px; margin-top: 6px; }
    .legend-row { display: flex; align-items: center; gap: 8px; }
    .legend-dot { width: 10px; height: 10px; border-radius: 50%; }
    .legend-text { font-size: 10px; font-weight: 700; color: #4b5563; }
    .analysis-box { position: relative; background: #fff; border: 1px solid var(--border); border-radius: 16px; padding: 16px 16px 16px 20px; min-height: 100%; }
    .analysis-bar { position: absolute; left: 0; top: 0; width: 4px; height: 100%; background: linear-gradient(180deg, #6366f1, #9333ea); border-radius: 20px 0 0 20px; }
    .analysis-title { font-size: 12px; font-weight: 800; color: #1f2937; display: flex; align-items: center; gap: 6px; margin-bottom: 8px; }
    .detail-header { display: flex; align-items: center; gap: 8px; font-weight: 800; font-size: 20px; color: #1f2937; margin: 18px 0 12px; }
    .scenario-detail { border-left: 4px solid #e5e7eb; border-radius: 18px; padding: 24px; background: rgba(255,255,255,0.9); }
    .scenario-detail-title { font-size: 22px; font-weight: 800; margin: 6px 0 10px; }
    .story-box { background: #fff; border-radius: 12px; padding: 16px; border: 1px solid #e5e7eb; }
    .audio-btn { display: inline-flex; align-items: center; gap: 6px; border: 1px solid #e5e7eb; background: #f8fafc; padding: 6px 10px; border-radius: 999px; font-size: 12px; font-weight: 700; color: #0f172a; cursor: pointer; }
    .audio-btn[data-state="playing"] { background: #e0e7ff; border-color: #c7d2fe; color: #4338ca; }
    .story { font-family: "Yu Mincho", "Hiragino Mincho ProN", "Noto Serif JP", serif; }
    .pill-blue { background: #eef2ff; border: 1px solid #dfe3ff; border-radius: 10px; padding: 10px; }
    .section-tag { font-weight: 800; font-size: 12px; margin-bottom: 6px; }
    footer { color: var(--muted); font-size: 12px; margin-top: 40px; text-align: center; }
    @media (max-width: 820px) {
      .grid-2 { grid-template-columns: 1fr; }
      .matrix { grid-template-columns: 1fr; }
    }
"#;

fn audio_script() -> String {
    format!(
        r#"<script>
  const buttons = document.querySelectorAll(".audio-btn");
  buttons.forEach((btn) => {{
    const audioId = btn.getAttribute("data-audio-id");
    const audio = audioId ? document.getElementById(audioId) : null;
    if (!audio) return;
    btn.addEventListener("click", () => {{
      if (audio.paused) {{
        document.querySelectorAll("audio").forEach((a) => {{ if (a !== audio) {{ a.pause(); }} }});
        document.querySelectorAll(".audio-btn").forEach((b) => {{ if (b !== btn) {{ b.textContent = "{AUDIO_PLAY}"; b.setAttribute("data-state", "paused"); }} }});
        audio.play();
        btn.textContent = "{AUDIO_STOP}";
        btn.setAttribute("data-state", "playing");
      }} else {{
        audio.pause();
        btn.textContent = "{AUDIO_PLAY}";
        btn.setAttribute("data-state", "paused");
      }}
    }});
    audio.addEventListener("ended", () => {{
      btn.textContent = "{AUDIO_PLAY}";
      btn.setAttribute("data-state", "paused");
    }});
  }});
</script>"#
    )
}

fn toggle_script() -> String {
    format!(
        r#"<script>
  (function () {{
    const details = document.getElementById("details");
    const toggle = document.getElementById("detailsToggle");
    const fade = document.getElementById("detailsFade");
    if (!details || !toggle) return;
    let expanded = false;
    toggle.addEventListener("click", () => {{
      expanded = !expanded;
      if (expanded) {{
        details.classList.remove("desc-collapsed");
        if (fade) fade.style.display = "none";
        toggle.textContent = "{TOGGLE_COLLAPSE}";
      }} else {{
        details.classList.add("desc-collapsed");
        if (fade) fade.style.display = "block";
        toggle.textContent = "{TOGGLE_EXPAND}";
      }}
    }});
  }})();
</script>"#
    )
}

/// Portfolio radar as inline SVG markup (200x200, radius 80).
pub fn radar_svg(scenarios: &[Scenario]) -> String {
    let c = CHART_SIZE / 2.0;
    let mut out = format!(
        r#"<svg class="radar-svg" width="{0}" height="{0}" viewBox="0 0 {0} {0}">"#,
        fmt_coord(CHART_SIZE)
    );
    let Ok(geo) = RadarGeometry::new(Point::new(c, c), CHART_RADIUS, ALLOCATION_SUBJECTS.len())
    else {
        out.push_str("</svg>");
        return out;
    };
    for ring in geo.rings() {
        let _ = write!(
            out,
            r##"<polygon points="{}" fill="none" stroke="#e2e8f0" stroke-width="1" />"##,
            svg_points(&ring)
        );
    }
    for s in scenarios {
        let color = s.color().rgb().css();
        let _ = write!(
            out,
            r#"<polygon points="{}" fill="{color}4D" stroke="{color}" stroke-width="2" />"#,
            svg_points(&geo.polygon(&s.allocation_values()))
        );
    }
    for (i, label) in ALLOCATION_SUBJECTS.iter().enumerate() {
        let p = geo.label_point(i, LABEL_OFFSET);
        let _ = write!(
            out,
            r##"<text x="{}" y="{}" text-anchor="middle" dominant-baseline="middle" font-size="10" fill="#6b7280" font-weight="700">{}</text>"##,
            fmt_coord(p.x),
            fmt_coord(p.y),
            escape_html(label)
        );
    }
    out.push_str("</svg>");
    out
}

fn legend(scenarios: &[Scenario]) -> String {
    scenarios
        .iter()
        .map(|s| {
            format!(
                r#"<div class="legend-row"><span class="legend-dot" style="background:{};"></span><span class="legend-text">{}: {}</span></div>"#,
                s.color().rgb().css(),
                escape_html(&s.id),
                escape_html(&s.title)
            )
        })
        .collect()
}

fn matrix_card(s: &Scenario) -> String {
    let color = s.color().rgb().css();
    format!(
        r#"
        <div class="scenario-card" style="border-color:{color}33;">
          <div class="scenario-prob" style="background:{color};">{}%</div>
          <span class="scenario-id">{}</span>
          <div style="font-weight:800; font-size:14px;">{}</div>
          <div class="headline">{}</div>
        </div>"#,
        s.probability,
        escape_html(&s.id),
        escape_html(&s.title),
        escape_html(&s.headline)
    )
}

fn scenario_detail(s: &Scenario) -> String {
    let color = s.color().rgb().css();
    let id = escape_html(&s.id);
    let image = match &s.image {
        Some(blob) if blob.is_image() => format!(
            r#"<img src="{}" alt="{}" style="width:100%; border-radius:12px; border:1px solid #e5e7eb;" />"#,
            blob.to_data_uri(),
            escape_html(&s.title)
        ),
        _ => String::new(),
    };
    let (button, audio) = match &s.audio {
        Some(blob) => (
            format!(
                r#"<button class="audio-btn" data-audio-id="audio-{id}" data-state="paused">{AUDIO_PLAY}</button>"#
            ),
            format!(
                r#"<audio id="audio-{id}" src="{}" preload="auto"></audio>"#,
                blob.to_data_uri()
            ),
        ),
        None => (String::new(), String::new()),
    };
    let signs = s
        .early_signs
        .iter()
        .map(|sign| format!("• {sign}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"
    <div class="scenario-detail" style="border-left-color:{color}; background:{color}0D;">
      <div style="display:flex; justify-content:space-between; gap:16px; flex-wrap:wrap;">
        <div style="flex:1; min-width: 240px;">
          <div class="meta" style="text-transform:uppercase; font-weight:700; opacity:0.7;">{id} ({p}%)</div>
          <div class="scenario-detail-title">{title}</div>
          <div class="headline" style="font-weight:700;">{headline}</div>
        </div>
        <div style="width: 300px;">{image}</div>
      </div>
      <div class="grid grid-2" style="gap: 16px; margin-top: 16px;">
        <div>
          <div class="pill-blue">
            <div class="section-tag" style="color:#4f46e5;">💡 BUSINESS INSIGHT</div>
            <div class="detail">{insight}</div>
          </div>
          <div style="margin-top:12px;">
            <div class="section-tag" style="color:#16a34a;">✅ ACTION</div>
            <div class="detail">{action}</div>
          </div>
          <div style="margin-top:12px;">
            <div class="section-tag" style="color:#f97316;">📡 EARLY SIGNS</div>
            <div class="detail">{signs}</div>
          </div>
        </div>
        <div class="story-box">
          <div style="display:flex; align-items:center; justify-content:space-between; margin-bottom:8px;">
            <div class="meta" style="font-weight:700;">STORY</div>
            {button}
          </div>
          <div class="detail story">{story}</div>
          {audio}
        </div>
      </div>
    </div>"#,
        p = s.probability,
        title = escape_html(&s.title),
        headline = escape_html(&s.headline),
        insight = escape_html(&s.insight.breakthrough),
        action = escape_html(&s.action_advice),
        signs = escape_html(&signs),
        story = escape_html(&s.story),
    )
}

/// Render the whole page.
#[tracing::instrument(skip(ctx), fields(theme = ctx.theme))]
pub fn render_html(ctx: &ExportContext<'_>) -> String {
    let set = ctx.result;
    let cfg = ctx.config;
    let (ax, ay) = (&set.axis_x, &set.axis_y);
    let analysis = if set.portfolio_analysis.trim().is_empty() {
        NO_ANALYSIS
    } else {
        set.portfolio_analysis.as_str()
    };
    let cards: String = set.scenarios_in_quadrant_order().map(matrix_card).collect();
    let details: String = set.scenarios.iter().map(scenario_detail).collect();

    let html = format!(
        r#"<!doctype html>
<html lang="ja">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>{theme} - {app}</title>
  <style>{STYLE}</style>
</head>
<body>
  <div class="wrap">
    <div class="card">
      <div class="title">{theme}</div>
      <div class="version">{app} <span class="version-badge">{version}</span></div>
      <div class="desc desc-collapsed" id="details">
        {details_text}
        <div class="desc-fade" id="detailsFade"></div>
      </div>
      <button class="desc-toggle" id="detailsToggle">{TOGGLE_EXPAND}</button>
    </div>

    <div class="matrix-wrap card" style="margin-top:20px;">
      <div class="section-title"><span class="section-pill">シナリオマトリクス</span></div>
      <div class="matrix">
        <div class="axis" style="display:flex; flex-direction:column; justify-content:space-between; padding: 8px 0;">
          <div>{y_max}</div>
          <div style="display:flex; align-items:center; justify-content:center; flex:1; position:relative; margin: 8px 0;">
            <div class="axis-line" style="position:absolute; width:2px; height:100%; left:50%; transform:translateX(-50%); z-index:1;"></div>
            <div class="axis-pill" style="writing-mode: vertical-rl;">{y_label}</div>
          </div>
          <div>{y_min}</div>
        </div>
        <div>
          <div class="matrix-core">{cards}
          </div>
          <div style="display:flex; align-items:center; gap:8px; margin-top:12px;">
            <div class="axis">{x_min}</div>
            <div style="flex:1; display:flex; align-items:center; justify-content:center; position:relative;">
              <div class="axis-line" style="position:absolute; width:100%; height:2px; z-index:1;"></div>
              <div class="axis-pill">{x_label}</div>
            </div>
            <div class="axis" style="text-align:right;">{x_max}</div>
          </div>
        </div>
      </div>
    </div>

    <div class="panel grid grid-2" style="gap:24px; margin-top:20px;">
      <div class="radar-wrap">
        <div style="font-weight:700; color:#374151; margin-bottom:8px;">戦略ポートフォリオ比較</div>
        {radar}
        <div class="legend">{legend}</div>
      </div>
      <div class="analysis-box">
        <div class="analysis-bar"></div>
        <div class="analysis-title">📊 戦略ポートフォリオ分析</div>
        <div class="detail">{analysis}</div>
      </div>
    </div>

    <div class="detail-header">✓ Detailed Scenarios</div>
    <div class="grid">{details}
    </div>

    <footer>{copyright}</footer>
  </div>
</body>
{audio_script}
{toggle_script}
</html>
"#,
        theme = escape_html(ctx.theme),
        app = escape_html(&cfg.app_name),
        version = escape_html(&cfg.version),
        details_text = escape_html(ctx.details),
        y_max = escape_html(&ay.max),
        y_label = escape_html(&ay.label),
        y_min = escape_html(&ay.min),
        x_min = escape_html(&ax.min),
        x_label = escape_html(&ax.label),
        x_max = escape_html(&ax.max),
        radar = radar_svg(&set.scenarios),
        legend = legend(&set.scenarios),
        analysis = escape_html(analysis),
        copyright = escape_html(&cfg.copyright),
        audio_script = audio_script(),
        toggle_script = toggle_script(),
    );
    tracing::debug!(bytes = html.len(), "html page rendered");
    html
}

#[cfg(test)]
#[path = "../../tests/unit/export/html.rs"]
mod tests;
