//! celula-map — fetch célula locations from the hosted table and render
//! them as a filterable map dashboard.

pub mod actions;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod html;
pub mod overlay;
pub mod page;
pub mod palette;
pub mod point;
pub mod popup;
pub mod projection;
pub mod supabase;

pub use config::Config;
pub use dashboard::{Dashboard, LoadState};
pub use error::{Error, Result};
pub use filter::{FilterField, FilterOptions, Filters};
pub use point::{CelulaRow, Point};
pub use supabase::{CelulaSource, SupabaseClient};
