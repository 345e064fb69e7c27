//! # Credencial CLI
//!
//! Command-line interface for card rendering.
//!
//! ## Usage
//!
//! ```bash
//! # Render a card spec to PNG at a 600px viewport
//! credencial render --spec card.json --width 600 --out card.png
//!
//! # Print the base64 data URI instead of writing a file
//! credencial render --spec card.json --data-uri
//!
//! # Serve the HTTP embedding API
//! credencial serve --listen 0.0.0.0:8080 --width 1200
//! ```

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use credencial::{
    CardError, CardSession, CardSpec,
    host::NullSink,
    layout::DESIGN_WIDTH,
    server::{ServerConfig, serve},
};

/// Credencial - ID-card rendering utility
#[derive(Parser, Debug)]
#[command(name = "credencial")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render a card spec JSON file to a PNG snapshot
    Render {
        /// Path to the card spec JSON
        #[arg(long, value_name = "FILE")]
        spec: PathBuf,

        /// Viewport width in pixels
        #[arg(long, default_value_t = DESIGN_WIDTH)]
        width: f64,

        /// Output PNG path
        #[arg(long, value_name = "FILE", default_value = "card.png")]
        out: PathBuf,

        /// Print the base64 data URI to stdout instead of writing a file
        #[arg(long)]
        data_uri: bool,
    },
    /// Serve the HTTP embedding API
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "0.0.0.0:8080")]
        listen: String,

        /// Initial viewport width for the shared session
        #[arg(long, default_value_t = DESIGN_WIDTH)]
        width: f64,
    },
}

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CardError> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            spec,
            width,
            out,
            data_uri,
        } => {
            let json = std::fs::read_to_string(&spec)?;
            let spec = CardSpec::from_json(&json)?;

            let mut session = CardSession::new(width, Box::new(NullSink));
            session.draw_new_content(spec);

            if data_uri {
                let uri = session.get_node_image().await?;
                println!("{uri}");
            } else {
                let png = session.render_png().await?;
                std::fs::write(&out, &png)?;
                println!("[render] wrote {}", out.display());
            }
            Ok(())
        }
        Commands::Serve { listen, width } => {
            serve(ServerConfig {
                listen_addr: listen,
                viewport_width: width,
            })
            .await
        }
    }
}
