//! celula-map — fetch the `celulas` table and write a self-contained map
//! dashboard (`celulas.html` by default).
//!
//! Connection settings come from flags or the environment; `.env.local`
//! and `.env` are read first when present.

use std::{fs, path::PathBuf, time::Duration};

use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use celula_map::{
    config::{Config, DEFAULT_TABLE, KEY_VAR, URL_VAR},
    page::{self, PageOptions},
    projection::DEFAULT_TILE_URL,
    Dashboard, FilterField, SupabaseClient,
};

#[derive(Parser, Debug)]
#[command(name = "celula-map")]
#[command(about = "Render célula locations as a filterable map dashboard")]
struct Args {
    /// Service URL
    #[arg(long, env = URL_VAR)]
    url: String,

    /// Public (anon) API key
    #[arg(long, env = KEY_VAR, hide_env_values = true)]
    key: String,

    /// Table to read
    #[arg(long, default_value = DEFAULT_TABLE)]
    table: String,

    /// Output file
    #[arg(short, long, default_value = "celulas.html")]
    output: PathBuf,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 15)]
    timeout: u64,

    /// Basemap tile URL template with {z}, {x} and {y}
    #[arg(long, default_value = DEFAULT_TILE_URL)]
    tiles: String,

    /// Map width in pixels
    #[arg(long, default_value_t = 1280)]
    width: u32,

    /// Map height in pixels
    #[arg(long, default_value_t = 800)]
    height: u32,

    #[arg(long)]
    bairro: Option<String>,

    #[arg(long)]
    discipulado: Option<String>,

    #[arg(long)]
    publico_alvo: Option<String>,

    #[arg(long)]
    dia_da_semana: Option<String>,

    #[arg(long)]
    rede: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn filter(&self, field: FilterField) -> Option<String> {
        match field {
            FilterField::Bairro      => self.bairro.clone(),
            FilterField::Discipulado => self.discipulado.clone(),
            FilterField::PublicoAlvo => self.publico_alvo.clone(),
            FilterField::DiaDaSemana => self.dia_da_semana.clone(),
            FilterField::Rede        => self.rede.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn"  => Level::WARN,
        "error" => Level::ERROR,
        _       => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = Config::new(&args.url, &args.key)?
        .with_table(args.table.clone())
        .with_timeout(Duration::from_secs(args.timeout));

    info!(table = %config.table, "fetching célula list");
    let client = SupabaseClient::new(config);

    let mut dash = Dashboard::new();
    dash.load(&client);

    for field in FilterField::ALL {
        dash.set_filter(field, args.filter(field));
    }
    info!(
        total = dash.points().len(),
        visible = dash.visible().len(),
        "filters applied"
    );

    let opts = PageOptions {
        width: args.width,
        height: args.height,
        tile_url: args.tiles.clone(),
        ..PageOptions::default()
    };
    let html = page::render(&dash, &opts)?;

    // Write to a temp file then atomically rename.
    let tmp = args.output.with_extension("html.tmp");
    fs::write(&tmp, &html)?;
    fs::rename(&tmp, &args.output)?;
    info!(path = %args.output.display(), bytes = html.len(), "dashboard written");
    Ok(())
}
