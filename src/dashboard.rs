//! dashboard.rs — page state: loading flag, points, options, filters.

use tracing::{error, info};

use crate::{
    filter::{FilterField, FilterOptions, Filters},
    point::{points_from_rows, Point},
    supabase::CelulaSource,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    state:   LoadState,
    points:  Vec<Point>,
    options: FilterOptions,
    filters: Filters,
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

impl Dashboard {
    pub fn new() -> Self {
        Self {
            state:   LoadState::Loading,
            points:  Vec::new(),
            options: FilterOptions::default(),
            filters: Filters::default(),
        }
    }

    /// Run the one fetch. A failed fetch is logged and leaves the
    /// dashboard ready with no points; it never propagates.
    pub fn load(&mut self, source: &impl CelulaSource) {
        let points = match source.fetch_rows() {
            Ok(rows) => points_from_rows(rows),
            Err(e) => {
                error!(error = %e, "failed to fetch celulas");
                Vec::new()
            }
        };
        info!(points = points.len(), "dashboard ready");
        self.replace_points(points);
    }

    /// Swap in a new point set wholesale and recompute the option lists.
    pub fn replace_points(&mut self, points: Vec<Point>) {
        self.options = FilterOptions::from_points(&points);
        self.points = points;
        self.state = LoadState::Ready;
    }

    pub fn set_filter(&mut self, field: FilterField, value: Option<String>) {
        self.filters.set(field, value);
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// Points passing every set filter.
    pub fn visible(&self) -> Vec<&Point> {
        self.filters.apply(&self.points)
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }
}
