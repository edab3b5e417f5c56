//! popup.rs — info popup markup for one point.

use crate::{
    actions::{detail_rows, ButtonKind},
    html::escape,
    palette::audience_color,
    point::Point,
};

pub fn render(p: &Point) -> String {
    let mut s = String::with_capacity(2048);

    s.push_str(&format!(
        "<div class='cm-popup-body' style='border-top:4px solid {accent}'>\
         <div class='cm-popup-photo'><img src='{photo}' alt='foto'></div>\
         <h3>{name}</h3>",
        accent = audience_color(p.publico_alvo.as_deref()),
        photo  = escape(p.photo_or_default()),
        name   = escape(p.nome_lider.as_deref().unwrap_or_default()),
    ));

    for (label, value) in detail_rows(p) {
        s.push_str(&format!(
            "<span class='cm-row'><b>{label}:</b> {}</span>",
            escape(value)
        ));
    }

    s.push_str("<div class='cm-actions'>");
    for kind in ButtonKind::ALL {
        s.push_str(&format!(
            "<button type='button' data-action='{action}' title='{label}' style='background:{color}'>{label}</button>",
            action = action_name(kind),
            label  = kind.label(),
            color  = kind.color(),
        ));
    }
    s.push_str("</div></div>");
    s
}

fn action_name(kind: ButtonKind) -> &'static str {
    match kind {
        ButtonKind::Copy     => "copy",
        ButtonKind::Whatsapp => "whatsapp",
        ButtonKind::Share    => "share",
    }
}
