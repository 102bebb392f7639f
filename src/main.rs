//! Block Assembler CLI
//!
//! Usage:
//!   block-assembler [OPTIONS] --catalog <FILE> [SCRIPT]
//!
//! Options:
//!   -c, --catalog <FILE>     Part catalog (JSON)
//!   -b, --board <FILE>       Board configuration (TOML)
//!   -s, --select <IDS>       Comma-separated part ids to offer in the palette
//!   -f, --format <FORMAT>    Output format: svg (default) or json
//!   --embed-textures         Inline textures as base64 data URIs
//!   -d, --debug              Dump the board and raise log level to debug
//!   -g, --grammar            Show gesture script reference
//!   -h, --help               Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use block_assembler::{
    assemble, render_svg, script, AssembleConfig, AssembleError, BoardConfig, Catalog, SvgConfig,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Svg,
    Json,
}

#[derive(Parser)]
#[command(name = "block-assembler")]
#[command(about = "Replay drag-and-drop gestures against a polyomino placement board")]
struct Cli {
    /// Gesture script (reads from stdin if not provided)
    script: Option<PathBuf>,

    /// Part catalog (JSON)
    #[arg(short, long)]
    catalog: Option<PathBuf>,

    /// Board configuration (TOML)
    #[arg(short, long)]
    board: Option<PathBuf>,

    /// Comma-separated part ids to offer in the palette
    #[arg(short, long, value_delimiter = ',')]
    select: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Svg)]
    format: Format,

    /// Inline textures as base64 data URIs (paths resolve against the catalog's directory)
    #[arg(long)]
    embed_textures: bool,

    /// Debug mode: dump the board to stderr and log at debug level
    #[arg(short, long)]
    debug: bool,

    /// Show gesture script reference
    #[arg(short, long)]
    grammar: bool,
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    if cli.grammar {
        print!("{}", script::REFERENCE);
        return;
    }

    let Some(catalog_path) = &cli.catalog else {
        print_intro();
        std::process::exit(1);
    };

    // If no script file and stdin is a terminal (interactive), show intro help
    if cli.script.is_none() && io::stdin().is_terminal() {
        print_intro();
        return;
    }

    let catalog = match Catalog::from_file(catalog_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading catalog '{}': {}", catalog_path.display(), e);
            std::process::exit(1);
        }
    };

    let board = match &cli.board {
        Some(path) => match BoardConfig::from_file(path) {
            Ok(b) => b,
            Err(e) => {
                eprintln!("Error loading board config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => BoardConfig::default(),
    };

    // Read input
    let (source, filename) = match &cli.script {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let mut svg = SvgConfig::new();
    if cli.embed_textures {
        let root = catalog_path.parent().unwrap_or(Path::new("."));
        svg = svg.with_embedded_textures(root);
    }
    let mut config = AssembleConfig::new()
        .with_board(board)
        .with_svg(svg)
        .with_debug(cli.debug);
    if !cli.select.is_empty() {
        config = config.with_selection(cli.select.iter().cloned());
    }

    let assembly = match assemble(&source, &catalog, &config) {
        Ok(assembly) => assembly,
        Err(AssembleError::Script(errors)) => {
            for error in &errors {
                eprint!("{}", error.format(&source, &filename));
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    match cli.format {
        Format::Svg => println!("{}", render_svg(&assembly.frame, &config.svg)),
        Format::Json => match serde_json::to_string_pretty(&assembly) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
    }
}

fn print_intro() {
    println!(
        r#"Block Assembler - drag-and-drop polyomino placement, replayed from scripts

USAGE:
    block-assembler --catalog parts.json [OPTIONS] [SCRIPT]
    echo '<script>' | block-assembler --catalog parts.json

OPTIONS:
    -c, --catalog          Part catalog (JSON)
    -b, --board            Board configuration (TOML)
    -s, --select           Comma-separated part ids to offer
    -f, --format           svg (default) or json
    --embed-textures       Inline textures as data URIs
    -d, --debug            Dump the board, log at debug level
    -g, --grammar          Show gesture script reference
    -h, --help             Print help

QUICK START:
    echo 'pick "l_block" move 90, 90 rotate release' | block-assembler -c parts.json > board.svg"#
    );
}
