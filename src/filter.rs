//! filter.rs — the five categorical filters and their option lists.

use crate::point::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterField {
    Bairro,
    Discipulado,
    PublicoAlvo,
    DiaDaSemana,
    Rede,
}

impl FilterField {
    pub const ALL: [FilterField; 5] = [
        FilterField::Bairro,
        FilterField::Discipulado,
        FilterField::PublicoAlvo,
        FilterField::DiaDaSemana,
        FilterField::Rede,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FilterField::Bairro      => "Bairro",
            FilterField::Discipulado => "Discipulado",
            FilterField::PublicoAlvo => "Público Alvo",
            FilterField::DiaDaSemana => "Dia da Semana",
            FilterField::Rede        => "Rede",
        }
    }

    pub fn value(self, p: &Point) -> Option<&str> {
        match self {
            FilterField::Bairro      => p.bairro.as_deref(),
            FilterField::Discipulado => p.discipulado.as_deref(),
            FilterField::PublicoAlvo => p.publico_alvo.as_deref(),
            FilterField::DiaDaSemana => p.dia_da_semana.as_deref(),
            FilterField::Rede        => p.rede.as_deref(),
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// Option lists
// ---------------------------------------------------------------------------

/// Distinct non-empty values per field, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    values: [Vec<String>; 5],
}

impl FilterOptions {
    pub fn from_points(points: &[Point]) -> Self {
        let mut values: [Vec<String>; 5] = Default::default();
        for field in FilterField::ALL {
            let seen = &mut values[field.index()];
            for v in points.iter().filter_map(|p| field.value(p)) {
                if !v.is_empty() && !seen.iter().any(|s| s == v) {
                    seen.push(v.to_string());
                }
            }
        }
        Self { values }
    }

    pub fn get(&self, field: FilterField) -> &[String] {
        &self.values[field.index()]
    }
}

// ---------------------------------------------------------------------------
// Selections
// ---------------------------------------------------------------------------

/// Five independent exact-match filters; `None` means unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    selected: [Option<String>; 5],
}

impl Filters {
    pub fn set(&mut self, field: FilterField, value: Option<String>) {
        self.selected[field.index()] = value.filter(|v| !v.is_empty());
    }

    pub fn get(&self, field: FilterField) -> Option<&str> {
        self.selected[field.index()].as_deref()
    }

    pub fn clear(&mut self) {
        self.selected = Default::default();
    }

    pub fn is_empty(&self) -> bool {
        self.selected.iter().all(Option::is_none)
    }

    /// True when the point equals every set filter.
    pub fn matches(&self, p: &Point) -> bool {
        FilterField::ALL.iter().all(|&field| match self.get(field) {
            None => true,
            Some(want) => field.value(p) == Some(want),
        })
    }

    pub fn apply<'a>(&self, points: &'a [Point]) -> Vec<&'a Point> {
        points.iter().filter(|p| self.matches(p)).collect()
    }
}
