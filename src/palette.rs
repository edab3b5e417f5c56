//! palette.rs — status-dot colours keyed on the target audience.
//!
//! Colours (the "gabarito" legend):
//!   yellow (#facc15) — kids
//!   green  (#22c55e) — adolescentes
//!   blue   (#3b82f6) — jovens
//!   red    (#ef4444) — adultos
//!   purple (#a855f7) — casais
//!   white  (#ffffff) — anything else, or not informed

pub const DEFAULT_COLOR: &str = "#ffffff";

const AUDIENCES: [(&str, &str, &str); 5] = [
    ("kids",         "Kids",         "#facc15"),
    ("adolescentes", "Adolescentes", "#22c55e"),
    ("jovens",       "Jovens",       "#3b82f6"),
    ("adultos",      "Adultos",      "#ef4444"),
    ("casais",       "Casais",       "#a855f7"),
];

/// Colour for a `publico_alvo` value; case and surrounding space are ignored.
pub fn audience_color(publico_alvo: Option<&str>) -> &'static str {
    let key = match publico_alvo {
        Some(v) => v.trim().to_lowercase(),
        None    => return DEFAULT_COLOR,
    };
    AUDIENCES
        .iter()
        .find(|(k, _, _)| *k == key)
        .map_or(DEFAULT_COLOR, |&(_, _, color)| color)
}

/// Ordered `(label, colour)` entries for the legend panel.
pub fn legend() -> Vec<(&'static str, &'static str)> {
    AUDIENCES
        .iter()
        .map(|&(_, label, color)| (label, color))
        .chain(std::iter::once(("Outros / não informado", DEFAULT_COLOR)))
        .collect()
}
