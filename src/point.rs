//! point.rs — raw `celulas` rows and the map points built from them.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

/// Avatar used when a row carries no photo.
pub const DEFAULT_PHOTO: &str = "https://www.gravatar.com/avatar/?d=mp&s=160";

// ---------------------------------------------------------------------------
// Raw row
// ---------------------------------------------------------------------------

/// One row of the `celulas` table, exactly as the service returns it.
/// Every column is text in storage; numbers are tolerated and kept as text.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CelulaRow {
    #[serde(default, deserialize_with = "text")] pub lat:           Option<String>,
    #[serde(default, deserialize_with = "text")] pub lng:           Option<String>,
    #[serde(default, deserialize_with = "text")] pub nome_lider:    Option<String>,
    #[serde(default, deserialize_with = "text")] pub nome_celula:   Option<String>,
    #[serde(default, deserialize_with = "text")] pub bairro:        Option<String>,
    #[serde(default, deserialize_with = "text")] pub rede:          Option<String>,
    #[serde(default, deserialize_with = "text")] pub discipulado:   Option<String>,
    #[serde(default, deserialize_with = "text")] pub publico_alvo:  Option<String>,
    #[serde(default, deserialize_with = "text")] pub dia_da_semana: Option<String>,
    #[serde(default, deserialize_with = "text")] pub celular_lider: Option<String>,
    #[serde(default, deserialize_with = "text")] pub horario:       Option<String>,
    #[serde(default, deserialize_with = "text")] pub photo:         Option<String>,
}

fn text<'de, D: Deserializer<'de>>(de: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(de)? {
        Value::Null        => None,
        Value::String(s)   => Some(s),
        Value::Number(n)   => Some(n.to_string()),
        Value::Bool(b)     => Some(b.to_string()),
        other              => Some(other.to_string()),
    })
}

// ---------------------------------------------------------------------------
// Point
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub lat:           f64,
    pub lng:           f64,
    pub nome_lider:    Option<String>,
    pub nome_celula:   Option<String>,
    pub bairro:        Option<String>,
    pub rede:          Option<String>,
    pub discipulado:   Option<String>,
    pub publico_alvo:  Option<String>,
    pub dia_da_semana: Option<String>,
    pub celular_lider: Option<String>,
    pub horario:       Option<String>,
    pub photo_url:     Option<String>,
}

impl Point {
    /// Build a point from a raw row. Returns `None` when either coordinate
    /// is missing, non-numeric, non-finite or outside the valid range.
    /// Zero is a valid coordinate.
    pub fn from_row(row: CelulaRow) -> Option<Point> {
        let lat = parse_coord(row.lat.as_deref(), 90.0)?;
        let lng = parse_coord(row.lng.as_deref(), 180.0)?;
        Some(Point {
            lat,
            lng,
            nome_lider:    non_empty(row.nome_lider),
            nome_celula:   non_empty(row.nome_celula),
            bairro:        non_empty(row.bairro),
            rede:          non_empty(row.rede),
            discipulado:   non_empty(row.discipulado),
            publico_alvo:  non_empty(row.publico_alvo),
            dia_da_semana: non_empty(row.dia_da_semana),
            celular_lider: non_empty(row.celular_lider),
            horario:       non_empty(row.horario),
            photo_url:     non_empty(row.photo),
        })
    }

    pub fn photo_or_default(&self) -> &str {
        self.photo_url.as_deref().unwrap_or(DEFAULT_PHOTO)
    }
}

fn parse_coord(raw: Option<&str>, limit: f64) -> Option<f64> {
    let v = raw?.trim().parse::<f64>().ok()?;
    (v.is_finite() && v.abs() <= limit).then_some(v)
}

fn non_empty(v: Option<String>) -> Option<String> {
    v.filter(|s| !s.trim().is_empty())
}

/// Convert every row, silently dropping the ones without usable coordinates.
pub fn points_from_rows(rows: Vec<CelulaRow>) -> Vec<Point> {
    let total = rows.len();
    let points: Vec<Point> = rows.into_iter().filter_map(Point::from_row).collect();
    if points.len() < total {
        debug!(dropped = total - points.len(), "rows without valid coordinates skipped");
    }
    points
}
