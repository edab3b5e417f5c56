//! page.rs — render the dashboard as one self-contained HTML document.
//!
//! Layout:
//!   basemap tiles   — positioned from the Web-Mercator viewport
//!   marker pane     — one overlay per point, filtered-out ones hidden
//!   filter bar      — five selects plus "Limpar filtros"
//!   legend          — audience colours behind a toggle button
//!   popup           — filled on marker click, buttons wired after a delay

use serde::Serialize;

use crate::{
    actions::{
        copy_details, share_plan, whatsapp, ButtonKind, Outcome, SharePlan, POPUP_WIRE_DELAY,
        REVERT_AFTER,
    },
    dashboard::{Dashboard, LoadState},
    filter::FilterField,
    html::{escape, script_safe},
    overlay::{HtmlPane, MarkerNode, OverlayLayer, StyleRegistry, PULSE_STYLE},
    palette::legend,
    point::Point,
    popup,
    projection::{LatLng, Viewport, DEFAULT_TILE_URL},
    Result,
};

#[derive(Debug, Clone)]
pub struct PageOptions {
    pub title:    String,
    pub width:    u32,
    pub height:   u32,
    pub tile_url: String,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            title:    "Mapa das Células".to_string(),
            width:    1280,
            height:   800,
            tile_url: DEFAULT_TILE_URL.to_string(),
        }
    }
}

const BASE_STYLE: &str = "\
body { margin: 0; font-family: system-ui, sans-serif; background: #0c1a2e; }
#cm-map { position: relative; overflow: hidden; margin: 0 auto; background: #dfe6ee; }
.cm-tile { position: absolute; width: 256px; height: 256px; user-select: none; }
.cm-marker { position: absolute; transform: translate(-50%, -50%); text-align: center; cursor: pointer; }
.cm-marker[hidden] { display: none; }
.cm-avatar { position: relative; width: 50px; height: 50px; border: 3px solid #fff; border-radius: 50%;
  background-color: #fff; background-size: cover; background-position: center; margin: 0 auto; }
.cm-dot { position: absolute; right: -2px; bottom: -2px; width: 14px; height: 14px; border-radius: 50%;
  border: 2px solid #fff; }
.cm-name { font-size: 12px; font-weight: bold; color: #000; margin-top: 4px; }
#cm-filters { position: absolute; top: 12px; left: 50%; transform: translateX(-50%); display: flex; gap: 8px;
  flex-wrap: wrap; background: rgba(255,255,255,.95); padding: 8px 12px; border-radius: 12px;
  box-shadow: 0 2px 8px rgba(0,0,0,.3); z-index: 10; }
#cm-filters select, #cm-filters button { padding: 4px 8px; border-radius: 8px; border: 1px solid #ccc; }
#cm-legend-toggle { display: none; }
.cm-legend-btn { position: absolute; bottom: 16px; right: 16px; z-index: 10; background: #fff; padding: 8px 12px;
  border-radius: 12px; cursor: pointer; box-shadow: 0 2px 8px rgba(0,0,0,.3); }
#cm-legend { display: none; position: absolute; bottom: 60px; right: 16px; z-index: 10; background: #fff;
  padding: 12px; border-radius: 12px; box-shadow: 0 2px 8px rgba(0,0,0,.3); font-size: 13px; }
#cm-legend-toggle:checked ~ #cm-legend { display: block; }
.cm-swatch { display: inline-block; width: 12px; height: 12px; border-radius: 50%; border: 1px solid #999;
  margin-right: 6px; vertical-align: middle; }
#cm-popup { position: absolute; z-index: 20; transform: translate(-50%, calc(-100% - 34px)); max-width: 220px;
  background: #fff; border-radius: 12px; padding: 12px; box-shadow: 0 4px 16px rgba(0,0,0,.4); }
#cm-popup[hidden] { display: none; }
.cm-popup-photo { display: flex; justify-content: center; border-radius: 16px; padding: 12px; margin-bottom: 8px;
  box-shadow: inset 0 2px 8px rgba(0,0,0,.53); }
.cm-popup-photo img { width: 80px; height: 80px; border-radius: 50%; object-fit: cover; }
.cm-popup-body h3 { margin: 0; font-size: 16px; color: #000; }
.cm-row { display: block; margin: 4px 0; font-size: 14px; color: #161616; }
.cm-actions { display: flex; gap: 8px; margin-top: 12px; }
.cm-actions button { flex: 1; padding: 10px 4px; border: none; border-radius: 8px; color: #fff; cursor: pointer;
  font-size: 11px; }
.cm-close { position: absolute; top: 4px; right: 8px; cursor: pointer; border: none; background: none; }
.cm-loading { display: flex; flex-direction: column; align-items: center; justify-content: center; height: 100vh;
  color: #e2e8f0; }
.cm-spinner { width: 48px; height: 48px; border: 4px solid #1d3461; border-top-color: #facc15; border-radius: 50%;
  animation: cm-spin 1s linear infinite; }
@keyframes cm-spin { to { transform: rotate(360deg); } }";

// ---------------------------------------------------------------------------
// Script payload
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct PointActions {
    copy:     Outcome,
    whatsapp: Outcome,
    share:    SharePlan,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Payload {
    revert_ms:     u64,
    wire_delay_ms: u64,
    labels:        [(&'static str, &'static str); 3],
    popups:        Vec<String>,
    actions:       Vec<PointActions>,
}

const SCRIPT: &str = r#"
(function () {
  const D = JSON.parse(document.getElementById('cm-data').textContent);
  const labels = Object.fromEntries(D.labels);
  const pop = document.getElementById('cm-popup');
  const body = document.getElementById('cm-popup-content');
  const embedded = window.self !== window.top;

  function perform(out, btn, kind) {
    const e = out.effect;
    if (e.kind === 'clipboard' && navigator.clipboard) navigator.clipboard.writeText(e.text).catch(() => {});
    else if (e.kind === 'open_window') window.open(e.url, '_blank');
    else if (e.kind === 'native_share') navigator.share(e.data).catch(() => {});
    else if (e.kind === 'post_to_parent') window.parent.postMessage(e.message, '*');
    if (out.notice) {
      btn.textContent = out.notice;
      setTimeout(() => { btn.textContent = labels[kind]; }, D.revertMs);
    }
  }

  function wire(i) {
    const a = D.actions[i];
    body.querySelectorAll('[data-action]').forEach((btn) => {
      const kind = btn.dataset.action;
      btn.onclick = () => {
        if (kind === 'share') {
          const plan = embedded ? a.share.embedded : (navigator.share ? a.share.native : a.share.fallback);
          perform(plan, btn, kind);
        } else {
          perform(a[kind], btn, kind);
        }
      };
    });
  }

  document.querySelectorAll('.cm-marker').forEach((m) => {
    m.addEventListener('click', () => {
      const i = Number(m.dataset.popup);
      body.innerHTML = D.popups[i];
      pop.style.left = m.style.left;
      pop.style.top = m.style.top;
      pop.hidden = false;
      setTimeout(() => wire(i), D.wireDelayMs);
    });
  });
  document.getElementById('cm-popup-close').onclick = () => { pop.hidden = true; };

  const selects = Array.from(document.querySelectorAll('#cm-filters select'));
  const count = document.getElementById('cm-count');
  function applyFilters() {
    let visible = 0;
    document.querySelectorAll('.cm-marker').forEach((m) => {
      m.hidden = !selects.every((s) => s.value === '' || m.dataset[s.name] === s.value);
      if (!m.hidden) visible += 1;
    });
    count.textContent = visible + ' de ' + count.dataset.total + ' células';
  }
  selects.forEach((s) => s.addEventListener('change', applyFilters));
  document.getElementById('cm-clear').onclick = () => { selects.forEach((s) => { s.value = ''; }); applyFilters(); };
})();
"#;

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

pub fn render(dash: &Dashboard, opts: &PageOptions) -> Result<String> {
    let mut styles = StyleRegistry::default();
    styles.inject("cm-base", BASE_STYLE);

    let mut s = String::with_capacity(64 << 10);
    s.push_str(&format!(
        "<!DOCTYPE html>\n<html lang='pt-BR'>\n<head>\n<meta charset='utf-8'>\n\
         <meta name='viewport' content='width=device-width, initial-scale=1'>\n<title>{}</title>\n",
        escape(&opts.title)
    ));

    if dash.state() == LoadState::Loading {
        s.push_str(&styles.to_html());
        s.push_str("</head>\n<body>\n");
        s.push_str(&loading_screen());
        s.push_str("</body>\n</html>\n");
        return Ok(s);
    }

    styles.inject("cm-pulse", PULSE_STYLE);
    s.push_str(&styles.to_html());
    s.push_str("</head>\n<body>\n");

    let points = dash.points();
    // frame every point, not only the visible ones: the filter bar can reveal any of them
    let coords: Vec<LatLng> = points.iter().map(|p| LatLng { lat: p.lat, lng: p.lng }).collect();
    let vp = Viewport::fit(&coords, opts.width, opts.height);

    let mut layer = OverlayLayer::new(HtmlPane::new());
    layer.sync(points);
    layer.redraw(&vp);

    s.push_str(&format!(
        "<div id='cm-map' style='width:{}px;height:{}px'>\n",
        opts.width, opts.height
    ));

    // basemap
    for t in vp.tiles(&opts.tile_url) {
        s.push_str(&format!(
            "  <img class='cm-tile' alt='' src='{}' style='left:{:.1}px;top:{:.1}px'>\n",
            escape(&t.url),
            t.left,
            t.top
        ));
    }

    // markers
    for node in layer.surface().nodes() {
        let Some(p) = points.get(node.popup) else { continue };
        s.push_str("  ");
        s.push_str(&marker_html(node, p, dash.filters().matches(p)));
        s.push('\n');
    }

    s.push_str(&filter_bar(dash));
    s.push_str(&legend_panel());
    s.push_str(
        "  <div id='cm-popup' hidden><button type='button' id='cm-popup-close' class='cm-close' \
         aria-label='Fechar'>×</button><div id='cm-popup-content'></div></div>\n",
    );
    s.push_str("</div>\n");

    s.push_str(&data_block(points)?);
    s.push_str("<script>");
    s.push_str(SCRIPT);
    s.push_str("</script>\n</body>\n</html>\n");
    Ok(s)
}

fn loading_screen() -> String {
    "<div class='cm-loading'><div class='cm-spinner'></div><p>Carregando células...</p></div>\n".to_string()
}

fn marker_html(node: &MarkerNode, p: &Point, visible: bool) -> String {
    let mut attrs = String::new();
    for field in FilterField::ALL {
        if let Some(v) = field.value(p) {
            attrs.push_str(&format!(" data-{}='{}'", data_key(field), escape(v)));
        }
    }
    if !visible {
        attrs.push_str(" hidden");
    }
    let html = node.to_html();
    // splice the filter attributes into the outer element
    match html.find('>') {
        Some(i) => format!("{}{attrs}{}", &html[..i], &html[i..]),
        None => html,
    }
}

/// `data-*` name; the script reads it back through `dataset[select.name]`.
fn data_key(field: FilterField) -> &'static str {
    match field {
        FilterField::Bairro      => "bairro",
        FilterField::Discipulado => "discipulado",
        FilterField::PublicoAlvo => "publico",
        FilterField::DiaDaSemana => "dia",
        FilterField::Rede        => "rede",
    }
}

fn filter_bar(dash: &Dashboard) -> String {
    let mut s = String::from("  <div id='cm-filters'>\n");
    for field in FilterField::ALL {
        let current = dash.filters().get(field);
        s.push_str(&format!(
            "    <select name='{}' aria-label='{label}'><option value=''>{label}: todos</option>",
            data_key(field),
            label = field.label(),
        ));
        for v in dash.options().get(field) {
            let sel = if current == Some(v.as_str()) { " selected" } else { "" };
            let v = escape(v);
            s.push_str(&format!("<option value='{v}'{sel}>{v}</option>"));
        }
        s.push_str("</select>\n");
    }
    s.push_str(&format!(
        "    <button type='button' id='cm-clear'>Limpar filtros</button>\n\
         <span id='cm-count' data-total='{total}'>{} de {total} células</span>\n  </div>\n",
        dash.visible().len(),
        total = dash.points().len()
    ));
    s
}

fn legend_panel() -> String {
    let mut s = String::from(
        "  <input type='checkbox' id='cm-legend-toggle'>\n  \
         <label for='cm-legend-toggle' class='cm-legend-btn'>Gabarito</label>\n  <div id='cm-legend'>\n",
    );
    s.push_str("    <strong>Público Alvo</strong><br>\n");
    for (label, color) in legend() {
        s.push_str(&format!(
            "    <div><span class='cm-swatch' style='background:{color}'></span>{}</div>\n",
            escape(label)
        ));
    }
    s.push_str("  </div>\n");
    s
}

fn data_block(points: &[Point]) -> Result<String> {
    let payload = Payload {
        revert_ms:     REVERT_AFTER.as_millis() as u64,
        wire_delay_ms: POPUP_WIRE_DELAY.as_millis() as u64,
        labels: [
            ("copy", ButtonKind::Copy.label()),
            ("whatsapp", ButtonKind::Whatsapp.label()),
            ("share", ButtonKind::Share.label()),
        ],
        popups:  points.iter().map(popup::render).collect(),
        actions: points
            .iter()
            .map(|p| PointActions { copy: copy_details(p), whatsapp: whatsapp(p), share: share_plan(p) })
            .collect(),
    };
    let json = serde_json::to_string(&payload)?;
    Ok(format!(
        "<script type='application/json' id='cm-data'>{}</script>\n",
        script_safe(&json)
    ))
}
