//! actions.rs — the three popup buttons: copy, WhatsApp, share.
//!
//! Each action resolves to an [`Outcome`]: one side effect for the page to
//! perform plus an optional transient button label. Nothing here touches a
//! browser; the generated page replays the outcome as-is.

use std::time::Duration;

use serde::Serialize;

use crate::point::Point;

/// How long a transient label stays before the button reverts.
pub const REVERT_AFTER: Duration = Duration::from_millis(1500);

/// Delay between injecting popup markup and wiring its buttons.
pub const POPUP_WIRE_DELAY: Duration = Duration::from_millis(100);

pub const WHATSAPP_COUNTRY_CODE: &str = "55";

/// Message type understood by the embedding page.
pub const PARENT_SHARE_TYPE: &str = "abrir-compartilhamento";

pub const NOT_INFORMED: &str = "Não informado";

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShareData {
    pub title: String,
    pub text:  String,
    pub url:   String,
}

/// `{ type: "abrir-compartilhamento", data: { title, text, url } }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParentMessage {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: ShareData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    Clipboard { text: String },
    /// Open in a new browsing context.
    OpenWindow { url: String },
    /// Platform share sheet; failure or cancel is ignored.
    NativeShare { data: ShareData },
    /// Posted to the parent frame with target origin `*`.
    PostToParent { message: ParentMessage },
    Nothing,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outcome {
    pub effect: Effect,
    pub notice: Option<&'static str>,
}

/// Runtime facts the share action branches on.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShareContext {
    /// Running inside a frame whose top context is another page.
    pub embedded:     bool,
    pub native_share: bool,
}

// ---------------------------------------------------------------------------
// Link builders
// ---------------------------------------------------------------------------

pub fn maps_link(p: &Point) -> String {
    format!("https://www.google.com/maps?q={},{}", p.lat, p.lng)
}

pub fn directions_link(p: &Point) -> String {
    format!("https://www.google.com/maps/dir/?api=1&destination={},{}", p.lat, p.lng)
}

fn or_placeholder(v: &Option<String>) -> &str {
    v.as_deref().unwrap_or(NOT_INFORMED)
}

/// Labeled rows shown in the popup and in the copied text, in display order.
pub fn detail_rows(p: &Point) -> [(&'static str, &str); 8] {
    [
        ("Célula",           or_placeholder(&p.nome_celula)),
        ("Rede",             or_placeholder(&p.rede)),
        ("Discipulado",      or_placeholder(&p.discipulado)),
        ("Público Alvo",     or_placeholder(&p.publico_alvo)),
        ("Dia da Semana",    or_placeholder(&p.dia_da_semana)),
        ("Celular do Líder", or_placeholder(&p.celular_lider)),
        ("Horário",          or_placeholder(&p.horario)),
        ("Bairro",           or_placeholder(&p.bairro)),
    ]
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

pub fn details_text(p: &Point) -> String {
    let mut lines = vec![format!("Líder: {}", or_placeholder(&p.nome_lider))];
    lines.extend(detail_rows(p).iter().map(|(k, v)| format!("{k}: {v}")));
    lines.push(format!("Localização: {}", maps_link(p)));
    lines.join("\n")
}

/// Copy every field plus a maps link. Success is assumed.
pub fn copy_details(p: &Point) -> Outcome {
    Outcome {
        effect: Effect::Clipboard { text: details_text(p) },
        notice: Some("Copiado!"),
    }
}

/// Open a chat with the leader, or say there is no number to open.
pub fn whatsapp(p: &Point) -> Outcome {
    let digits: String = p
        .celular_lider
        .as_deref()
        .unwrap_or_default()
        .chars()
        .filter(char::is_ascii_digit)
        .collect();

    if digits.is_empty() {
        return Outcome { effect: Effect::Nothing, notice: Some("Sem WhatsApp") };
    }

    let message = format!(
        "Olá {}, gostaria de saber mais sobre a célula \"{}\".",
        p.nome_lider.as_deref().unwrap_or_default(),
        p.nome_celula.as_deref().unwrap_or_default(),
    );
    let url = format!(
        "https://wa.me/{WHATSAPP_COUNTRY_CODE}{digits}?text={}",
        urlencoding::encode(&message)
    );
    Outcome { effect: Effect::OpenWindow { url }, notice: None }
}

pub fn share_data(p: &Point) -> ShareData {
    let lider = p.nome_lider.as_deref().unwrap_or_default();
    let url = directions_link(p);
    ShareData {
        title: format!("Localização da célula de {lider}"),
        text:  format!("Veja a localização da célula de {lider}:\n{url}"),
        url,
    }
}

pub fn share(p: &Point, ctx: ShareContext) -> Outcome {
    let data = share_data(p);
    if ctx.embedded {
        let message = ParentMessage { kind: PARENT_SHARE_TYPE, data };
        return Outcome { effect: Effect::PostToParent { message }, notice: Some("Link enviado!") };
    }
    if ctx.native_share {
        return Outcome { effect: Effect::NativeShare { data }, notice: None };
    }
    Outcome { effect: Effect::Clipboard { text: data.url }, notice: Some("Link copiado!") }
}

/// The share outcome for each runtime context, resolved ahead of time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SharePlan {
    pub embedded: Outcome,
    pub native:   Outcome,
    pub fallback: Outcome,
}

pub fn share_plan(p: &Point) -> SharePlan {
    SharePlan {
        embedded: share(p, ShareContext { embedded: true, native_share: false }),
        native:   share(p, ShareContext { embedded: false, native_share: true }),
        fallback: share(p, ShareContext::default()),
    }
}

// ---------------------------------------------------------------------------
// Buttons
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonKind {
    Copy,
    Whatsapp,
    Share,
}

impl ButtonKind {
    pub const ALL: [ButtonKind; 3] = [ButtonKind::Copy, ButtonKind::Whatsapp, ButtonKind::Share];

    pub fn label(self) -> &'static str {
        match self {
            ButtonKind::Copy     => "Copiar informações",
            ButtonKind::Whatsapp => "WhatsApp do Líder",
            ButtonKind::Share    => "Compartilhar Localização",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            ButtonKind::Copy     => "#6c757d",
            ButtonKind::Whatsapp => "#25d366",
            ButtonKind::Share    => "#ff9800",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::CelulaRow;

    fn point(phone: Option<&str>) -> Point {
        Point::from_row(CelulaRow {
            lat: Some("-15.6".into()),
            lng: Some("-56.1".into()),
            nome_lider: Some("Ana".into()),
            nome_celula: Some("Luz".into()),
            celular_lider: phone.map(Into::into),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn copy_text_lists_every_field() {
        let text = details_text(&point(None));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 10);
        assert_eq!(lines[0], "Líder: Ana");
        assert_eq!(lines[1], "Célula: Luz");
        assert_eq!(lines[6], "Celular do Líder: Não informado");
        assert_eq!(lines[9], "Localização: https://www.google.com/maps?q=-15.6,-56.1");
        assert_eq!(copy_details(&point(None)).notice, Some("Copiado!"));
    }

    #[test]
    fn whatsapp_strips_non_digits() {
        let out = whatsapp(&point(Some("(65) 99999-1234")));
        let Effect::OpenWindow { url } = out.effect else { panic!("expected navigation") };
        assert!(url.starts_with("https://wa.me/5565999991234?text="));
        assert!(url.contains("Ol%C3%A1%20Ana"));
        assert!(url.contains("%22Luz%22"));
        assert_eq!(out.notice, None);
    }

    #[test]
    fn whatsapp_without_number_does_not_navigate() {
        for phone in [None, Some("--")] {
            let out = whatsapp(&point(phone));
            assert_eq!(out.effect, Effect::Nothing);
            assert_eq!(out.notice, Some("Sem WhatsApp"));
        }
    }

    #[test]
    fn share_branches_on_context() {
        let p = point(None);
        let embedded = share(&p, ShareContext { embedded: true, native_share: true });
        let Effect::PostToParent { message } = &embedded.effect else { panic!() };
        assert_eq!(message.kind, PARENT_SHARE_TYPE);
        assert!(embedded.notice.is_some());

        let native = share(&p, ShareContext { embedded: false, native_share: true });
        assert!(matches!(native.effect, Effect::NativeShare { .. }));
        assert_eq!(native.notice, None);

        let fallback = share(&p, ShareContext::default());
        assert_eq!(fallback.effect, Effect::Clipboard { text: directions_link(&p) });
        assert_eq!(fallback.notice, Some("Link copiado!"));
    }

    #[test]
    fn parent_message_wire_shape() {
        let p = point(None);
        let Effect::PostToParent { message } = share(&p, ShareContext { embedded: true, native_share: false }).effect
        else { panic!() };
        let v = serde_json::to_value(&message).unwrap();
        assert_eq!(v["type"], "abrir-compartilhamento");
        assert_eq!(v["data"]["title"], "Localização da célula de Ana");
        assert_eq!(v["data"]["url"], directions_link(&p));
    }
}
