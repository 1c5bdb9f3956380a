use crate::models::labels;
use crate::session::DashboardSession;

pub fn render_index(session: Option<&DashboardSession>) -> String {
    let session_json = session
        .and_then(|session| serde_json::to_string(session).ok())
        .unwrap_or_else(|| "null".to_string());
    let labels_json = serde_json::to_string(&labels()).unwrap_or_else(|_| "{}".to_string());

    INDEX_HTML
        .replace("{{SESSION}}", &script_safe(&session_json))
        .replace("{{LABELS}}", &script_safe(&labels_json))
}

// JSON inside <script> must not close the tag early.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}

const INDEX_HTML: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Pain Log Dashboard</title>
  <style>
    :root {
      --bg: #0f172a;
      --card: #1e293b;
      --grid: #334155;
      --ink: #e2e8f0;
      --muted: #94a3b8;
      --line: #60a5fa;
      --dot: #a78bfa;
      --bar: #818cf8;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: var(--bg);
      color: var(--ink);
      font-family: "Inter", "Segoe UI", sans-serif;
      padding: 32px 18px 48px;
    }

    main {
      width: min(1100px, 100%);
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    header {
      display: flex;
      justify-content: space-between;
      align-items: center;
    }

    .hidden {
      display: none !important;
    }

    #drop-zone {
      border: 2px dashed var(--grid);
      border-radius: 18px;
      padding: 64px 24px;
      text-align: center;
      color: var(--muted);
      cursor: pointer;
    }

    #drop-zone.dragover {
      border-color: var(--line);
      color: var(--ink);
    }

    .grid {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(480px, 1fr));
      gap: 20px;
    }

    .card {
      background: var(--card);
      border-radius: 18px;
      padding: 20px;
    }

    .card h2 {
      margin: 0 0 12px;
      font-size: 1rem;
      color: var(--muted);
    }

    svg {
      width: 100%;
      height: 260px;
    }

    svg text {
      fill: var(--muted);
      font-size: 11px;
    }

    button {
      background: var(--grid);
      color: var(--ink);
      border: 0;
      border-radius: 10px;
      padding: 10px 16px;
      cursor: pointer;
    }

    #status[data-type="error"] {
      color: #f87171;
    }
  </style>
</head>
<body>
  <main>
    <header>
      <h1>Pain Log Dashboard</h1>
      <form id="reset-form" method="post" action="/reset" class="hidden">
        <button id="reset-btn" type="submit">Upload another file</button>
      </form>
    </header>

    <section id="upload-section">
      <label id="drop-zone">
        <p>Drop a CSV pain log here or click to choose a file.</p>
        <p>Columns: date, time, area, pain_score</p>
        <input id="file-input" type="file" accept=".csv,text/csv" hidden />
      </label>
    </section>

    <p id="status"></p>

    <section id="dashboard-section" class="hidden">
      <p id="file-info"></p>
      <div class="grid">
        <div class="card"><h2>Daily average pain</h2><svg id="daily-chart" viewBox="0 0 600 260"></svg></div>
        <div class="card"><h2>Pain area frequency</h2><svg id="area-chart" viewBox="0 0 600 260"></svg></div>
        <div class="card"><h2>Pain over time</h2><svg id="time-chart" viewBox="0 0 600 260"></svg></div>
        <div class="card"><h2>Average pain by hour</h2><svg id="hourly-chart" viewBox="0 0 600 260"></svg></div>
      </div>
    </section>
  </main>

  <script>
    const initialSession = {{SESSION}};
    const labels = {{LABELS}};

    const dropZone = document.getElementById('drop-zone');
    const fileInput = document.getElementById('file-input');
    const uploadSection = document.getElementById('upload-section');
    const dashboardSection = document.getElementById('dashboard-section');
    const resetForm = document.getElementById('reset-form');
    const fileInfo = document.getElementById('file-info');
    const statusEl = document.getElementById('status');

    const W = 600;
    const H = 260;
    const PAD = 40;
    const MAX_SCORE = 4;
    const AREA_COLORS = ['#94a3b8', '#f87171', '#fbbf24', '#34d399'];

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
    };

    const esc = (text) =>
      String(text).replace(/[&<>"]/g, (c) => ({ '&': '&amp;', '<': '&lt;', '>': '&gt;', '"': '&quot;' })[c]);

    const clampScore = (value) => Math.max(0, Math.min(value, MAX_SCORE));

    const yFor = (value) => H - PAD - (value / MAX_SCORE) * (H - PAD * 2);

    const axes = () => {
      let out = '';
      for (let score = 0; score <= MAX_SCORE; score++) {
        const y = yFor(score);
        out += `<line x1="${PAD}" x2="${W - 10}" y1="${y}" y2="${y}" stroke="#334155" />`;
        out += `<text x="${PAD - 6}" y="${y + 4}" text-anchor="end">${score}</text>`;
      }
      return out;
    };

    const xStep = (count) => (count > 1 ? (W - PAD - 20) / (count - 1) : 0);

    const renderDaily = (points) => {
      const step = xStep(points.length);
      const x = (i) => PAD + 10 + i * step;
      const path = points
        .map((p, i) => `${i === 0 ? 'M' : 'L'} ${x(i).toFixed(1)} ${yFor(p.average).toFixed(1)}`)
        .join(' ');
      let svg = axes();
      if (points.length) {
        svg += `<path d="${path}" fill="none" stroke="#60a5fa" stroke-width="2" />`;
      }
      points.forEach((p, i) => {
        svg += `<circle cx="${x(i)}" cy="${yFor(p.average)}" r="3" fill="#60a5fa"><title>${esc(p.day)}: ${p.average.toFixed(2)}</title></circle>`;
      });
      document.getElementById('daily-chart').innerHTML = svg;
    };

    const renderArea = (counts) => {
      const total = counts.reduce((a, b) => a + b, 0);
      let svg = '';
      let start = -Math.PI / 2;
      counts.forEach((count, code) => {
        const label = labels.areas[code];
        svg += `<rect x="400" y="${60 + code * 28}" width="14" height="14" fill="${AREA_COLORS[code]}" />`;
        svg += `<text x="422" y="${72 + code * 28}">${label} (${count})</text>`;
        if (!total || !count) return;
        const end = start + (count / total) * Math.PI * 2;
        const large = end - start > Math.PI ? 1 : 0;
        const [cx, cy, r] = [200, 130, 100];
        if (count === total) {
          svg += `<circle cx="${cx}" cy="${cy}" r="${r}" fill="${AREA_COLORS[code]}" />`;
        } else {
          svg += `<path d="M ${cx} ${cy} L ${cx + r * Math.cos(start)} ${cy + r * Math.sin(start)} A ${r} ${r} 0 ${large} 1 ${cx + r * Math.cos(end)} ${cy + r * Math.sin(end)} Z" fill="${AREA_COLORS[code]}" />`;
        }
        start = end;
      });
      document.getElementById('area-chart').innerHTML = svg;
    };

    const renderTime = (points) => {
      let svg = axes();
      if (points.length) {
        const first = points[0].epoch_ms;
        const span = Math.max(points[points.length - 1].epoch_ms - first, 1);
        points.forEach((p) => {
          const x = PAD + 10 + ((p.epoch_ms - first) / span) * (W - PAD - 20);
          const desc = labels.severities[p.pain_score] || '';
          const when = new Date(p.epoch_ms).toLocaleString();
          svg += `<circle cx="${x}" cy="${yFor(clampScore(p.pain_score))}" r="4" fill="#a78bfa"><title>${when}: ${p.pain_score} (${desc})</title></circle>`;
        });
      }
      document.getElementById('time-chart').innerHTML = svg;
    };

    const renderHourly = (values) => {
      let svg = axes();
      const slot = (W - PAD - 10) / values.length;
      values.forEach((value, hour) => {
        const y = yFor(clampScore(value));
        svg += `<rect x="${PAD + hour * slot + 2}" y="${y}" width="${slot - 4}" height="${H - PAD - y}" rx="3" fill="#818cf8"><title>${hour}:00 ${value.toFixed(2)}</title></rect>`;
        if (hour % 3 === 0) {
          svg += `<text x="${PAD + hour * slot + slot / 2}" y="${H - PAD + 16}" text-anchor="middle">${hour}h</text>`;
        }
      });
      document.getElementById('hourly-chart').innerHTML = svg;
    };

    const showDashboard = (session) => {
      uploadSection.classList.add('hidden');
      dashboardSection.classList.remove('hidden');
      resetForm.classList.remove('hidden');
      fileInfo.textContent = `${session.file_name}: ${session.entry_count} entries`;
      renderDaily(session.views.daily_trend);
      renderArea(session.views.area_frequency);
      renderTime(session.views.time_series);
      renderHourly(session.views.hourly_average);
    };

    const handleFile = async (file) => {
      setStatus(`Processing ${file.name}...`);
      try {
        const response = await fetch(`/api/upload?name=${encodeURIComponent(file.name)}`, {
          method: 'POST',
          headers: { 'Content-Type': file.type || 'application/octet-stream' },
          body: file,
        });
        if (!response.ok) {
          setStatus(await response.text(), 'error');
          return;
        }
        setStatus('');
        showDashboard(await response.json());
      } catch (err) {
        setStatus('Failed to read file.', 'error');
      }
    };

    dropZone.addEventListener('dragover', (e) => {
      e.preventDefault();
      dropZone.classList.add('dragover');
    });
    dropZone.addEventListener('dragleave', () => dropZone.classList.remove('dragover'));
    dropZone.addEventListener('drop', (e) => {
      e.preventDefault();
      dropZone.classList.remove('dragover');
      if (e.dataTransfer.files.length) handleFile(e.dataTransfer.files[0]);
    });
    fileInput.addEventListener('change', (e) => {
      if (e.target.files.length) handleFile(e.target.files[0]);
    });

    if (initialSession) {
      showDashboard(initialSession);
    }
  </script>
</body>
</html>
"##;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::run_pipeline;

    #[test]
    fn empty_page_has_no_session() {
        let html = render_index(None);
        assert!(html.contains("const initialSession = null;"));
        assert!(html.contains("\"lower back\""));
        assert!(html.contains(r##"stroke="#334155""##));
        assert!(html.contains("clampScore"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn loaded_page_embeds_session_safely() {
        let session = run_pipeline(
            "</script>.csv",
            "text/csv",
            b"date,time,area,pain_score\n2024-01-01,09:00,1,2\n",
        )
        .unwrap();
        let html = render_index(Some(&session));
        assert!(html.contains("<\\/script>.csv"));
        assert!(!html.contains("{{SESSION}}"));
    }
}
