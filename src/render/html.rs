use crate::model::ReportData;
use crate::render::RenderConfig;
use serde::Serialize;

#[derive(Serialize)]
struct Page<'a> {
    plc_name: &'a str,
    report: &'a ReportData,
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Render a self-contained HTML report (data embedded as JSON).
///
/// Important: we avoid `format!()` because the HTML contains many `{}` from JS
/// template literals (e.g., `${x}`), which would conflict with Rust formatting.
pub fn render_html_report(data: &ReportData, config: &RenderConfig) -> anyhow::Result<String> {
    let page = Page {
        plc_name: &config.plc_name,
        report: data,
    };
    // "</" would close the script element early.
    let json = serde_json::to_string(&page)?.replace("</", "<\\/");

    const TEMPLATE: &str = r#"<!doctype html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>__TITLE__ Cause &amp; Effect</title>
<style>
  body { font-family: system-ui, -apple-system, Segoe UI, Roboto, Arial, sans-serif; margin: 0; }
  header { padding: 12px 16px; border-bottom: 1px solid #ddd; }
  .container { display: flex; height: calc(100vh - 58px); }
  .sidebar { width: 380px; border-right: 1px solid #ddd; padding: 12px; overflow: auto; }
  .main { flex: 1; padding: 12px; overflow: auto; }

  .summary { display: flex; gap: 16px; flex-wrap: wrap; font-size: 14px; color: #333; }
  .pill { padding: 4px 8px; border: 1px solid #ddd; border-radius: 999px; background: #fafafa; }

  .row-item { cursor: pointer; user-select: none; padding: 4px 6px; border-radius: 4px; }
  .row-item:hover { background: #f3f3f3; }
  .row-item.selected { background: #e9f2ff; border: 1px solid #cfe3ff; }
  .muted { color: #777; font-size: 12px; }

  table { border-collapse: collapse; margin-top: 8px; }
  th, td { border: 1px solid #ddd; padding: 4px 6px; text-align: left; font-size: 13px; }
  th { position: sticky; top: 0; background: white; }
  th.effect { background: #90ee90; text-align: center; min-width: 90px; }
  th.cause { background: #ffff00; }
  td.mark { text-align: center; font-weight: bold; }
  tr.selected td { background: #e9f2ff; }
  code { font-family: ui-monospace, SFMono-Regular, Menlo, Consolas, monospace; font-size: 12px; }
</style>
</head>
<body>
<header>
  <div class="summary" id="summary"></div>
</header>

<div class="container">
  <div class="sidebar">
    <input id="search" placeholder="Search tag or description..." style="width: 100%; box-sizing: border-box; padding: 6px 8px; border: 1px solid #ddd; border-radius: 6px;">
    <h3>Interlocks</h3>
    <div id="interlocks"></div>
    <h3>Alarms</h3>
    <div id="alarms"></div>
    <h3>Failed rungs</h3>
    <div id="failures" class="muted"></div>
  </div>

  <div class="main">
    <h2 id="title">Cause &amp; Effect</h2>
    <div id="meta" class="muted"></div>
    <table id="matrix">
      <thead id="matrixHead"></thead>
      <tbody id="matrixBody"></tbody>
    </table>
  </div>
</div>

<script>
// Embedded report data (JSON object literal)
const PAGE = __DATA__;
const DATA = PAGE.report;

const state = {
  selected: null,
  search: ""
};

function escapeHtml(s) {
  return String(s)
    .replaceAll("&", "&amp;")
    .replaceAll("<", "&lt;")
    .replaceAll(">", "&gt;")
    .replaceAll('"', "&quot;")
    .replaceAll("'", "&#39;");
}

function matches(...fields) {
  if (!state.search) return true;
  const s = state.search.toLowerCase();
  return fields.some(f => String(f || "").toLowerCase().includes(s));
}

function renderSummary() {
  const t = DATA.totals;
  document.getElementById("summary").innerHTML = `
    <span class="pill"><b>${escapeHtml(PAGE.plc_name)}</b></span>
    <span class="pill">tags: <b>${t.tags}</b></span>
    <span class="pill">rungs: <b>${t.rungs}</b></span>
    <span class="pill">interlocks: <b>${t.interlocks}</b></span>
    <span class="pill">effects: <b>${t.effects}</b></span>
    <span class="pill">alarms: <b>${t.alarms}</b> of ${t.alarm_candidates}</span>
    <span class="pill">uncatalogued: <b>${t.uncatalogued}</b></span>
    <span class="pill">failed rungs: <b>${t.failures}</b></span>
  `;
}

function renderSidebar() {
  const list = document.getElementById("interlocks");
  list.innerHTML = "";
  for (const il of DATA.matrix.interlocks) {
    if (!matches(il.cause, il.description, il.rung)) continue;
    const row = document.createElement("div");
    row.className = "row-item" + (state.selected === il.id ? " selected" : "");
    row.innerHTML = `<b>I-${il.id}</b> <code>${escapeHtml(il.cause || "")}</code> ${escapeHtml(il.description)} <span class="muted">(rung ${escapeHtml(il.rung)})</span>`;
    row.onclick = () => selectInterlock(il.id);
    list.appendChild(row);
  }

  const alarms = document.getElementById("alarms");
  alarms.innerHTML = "";
  for (const a of DATA.alarms) {
    if (!matches(a.address, a.description)) continue;
    const row = document.createElement("div");
    row.className = "row-item";
    row.innerHTML = `<code>${escapeHtml(a.address)}</code> ${escapeHtml(a.description)}`;
    alarms.appendChild(row);
  }

  const failures = document.getElementById("failures");
  failures.innerHTML = DATA.failures.length ? "" : "none";
  for (const f of DATA.failures) {
    if (!matches(f.rung, f.address, f.message)) continue;
    const row = document.createElement("div");
    row.innerHTML = `rung ${escapeHtml(f.rung)} ${escapeHtml(f.role)}: ${escapeHtml(f.message)}`;
    failures.appendChild(row);
  }
}

function renderMatrix() {
  const cols = DATA.matrix.columns;
  const head = document.getElementById("matrixHead");
  head.innerHTML = `<tr>
    <th class="cause">Interlock</th><th class="cause">Tag No</th><th class="cause">Service Description</th>
    ${cols.map(c => `<th class="effect"><code>${escapeHtml(c.address)}</code><br>${escapeHtml(c.description)}</th>`).join("")}
  </tr>`;

  const body = document.getElementById("matrixBody");
  body.innerHTML = "";
  for (const il of DATA.matrix.interlocks) {
    if (!matches(il.cause, il.description, il.rung)) continue;
    const effects = new Set(il.effects);
    const tr = document.createElement("tr");
    if (state.selected === il.id) tr.className = "selected";
    tr.innerHTML = `
      <td>I-${il.id}</td>
      <td><code>${escapeHtml(il.cause || "")}</code></td>
      <td>${escapeHtml(il.description)}</td>
      ${cols.map(c => `<td class="mark">${effects.has(c.address) ? "X" : ""}</td>`).join("")}
    `;
    tr.onclick = () => selectInterlock(il.id);
    body.appendChild(tr);
  }
}

function selectInterlock(id) {
  state.selected = id;
  const il = DATA.matrix.interlocks.find(i => i.id === id);
  if (il) {
    document.getElementById("title").textContent = `I-${il.id}: ${il.description}`;
    const logic = il.logic_kind ? ` | logic: ${il.logic_kind}` : "";
    document.getElementById("meta").textContent =
      `rung ${il.rung} | inputs: ${il.inputs.join(", ")} | outputs: ${il.outputs.join(", ")}` + logic;
  }
  renderSidebar();
  renderMatrix();
}

document.getElementById("search").addEventListener("input", (e) => {
  state.search = e.target.value || "";
  renderSidebar();
  renderMatrix();
});

renderSummary();
renderSidebar();
renderMatrix();
</script>
</body>
</html>
"#;

    // Substitute in one pass so the title cannot receive the data.
    let (head, tail) = TEMPLATE
        .split_once("__DATA__")
        .ok_or_else(|| anyhow::anyhow!("html template has no data marker"))?;
    let mut out = head.replace("__TITLE__", &escape_html(&config.plc_name));
    out.push_str(&json);
    out.push_str(tail);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::build_report_data;
    use crate::program::source::ProgramSpec;

    fn report(json: &str) -> ReportData {
        let program = ProgramSpec::from_json(json)
            .and_then(ProgramSpec::validate_and_build)
            .expect("program");
        build_report_data(&program)
    }

    #[test]
    fn embeds_report_json_and_title() {
        let data = report(
            r#"{
                "tags": [{"address": "O:0/0", "description": "Deluge Valve Zone 2 Open"}],
                "rungs": [{"rung": "0002", "inputs": ["I:0/0"], "outputs": ["O:0/0"],
                           "description": "Deluge"}]
            }"#,
        );
        let config = RenderConfig {
            plc_name: "Fire <System>".to_string(),
            ..RenderConfig::default()
        };
        let html = render_html_report(&data, &config).expect("render");
        assert!(html.contains("<title>Fire &lt;System&gt; Cause &amp; Effect</title>"));
        assert!(html.contains(r#""address":"O:0/0""#));
        assert!(html.contains("Deluge Valve Zone 2 Open"));
        assert!(!html.contains("__DATA__"));
    }

    #[test]
    fn script_close_tags_in_data_are_escaped() {
        let data = report(
            r#"{
                "rungs": [{"rung": "0001", "inputs": ["I:0/0"], "outputs": ["O:0/0"],
                           "description": "</script><b>"}]
            }"#,
        );
        let html = render_html_report(&data, &RenderConfig::default()).expect("render");
        assert_eq!(html.matches("</script>").count(), 1);
    }

    #[test]
    fn marker_text_in_plc_name_stays_in_title() {
        let data = report(r#"{"rungs": [{"rung": "0001", "inputs": ["I:0/0"], "outputs": ["O:0/0"]}]}"#);
        let config = RenderConfig {
            plc_name: "__DATA__ __TITLE__".to_string(),
            ..RenderConfig::default()
        };
        let html = render_html_report(&data, &config).expect("render");
        assert!(html.contains("<title>__DATA__ __TITLE__ Cause &amp; Effect</title>"));
        assert_eq!(html.matches(r#""rungs":1"#).count(), 1);
    }

    #[test]
    fn failed_rungs_are_embedded() {
        let data = report(r#"{"rungs": [{"rung": "0007", "inputs": ["N7:0/0"], "outputs": ["O:0/0"]}]}"#);
        let html = render_html_report(&data, &RenderConfig::default()).expect("render");
        assert!(html.contains(r#""failures":[{"rung":"0007""#));
    }
}
