use atc2json::block::display_tag;
use atc2json::{parse, scan_blocks, ConvertOptions};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "atc2json", about = "Convert ATC ECG recordings to JSON")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log verbosity (RUST_LOG is honoured as well)
    #[arg(long, value_enum, default_value = "warn", global = true)]
    log_level: LogLevel,
}

#[derive(Subcommand)]
enum Commands {
    /// Decode a recording and print it as JSON (default)
    Convert {
        /// Input file; stdin when omitted or "-"
        input: Option<PathBuf>,
        /// Indent the JSON output
        #[arg(short, long)]
        pretty: bool,
        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the blocks of a recording with their checksums
    Inspect {
        /// Input file; stdin when omitted or "-"
        input: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut env_builder = env_logger::Builder::from_default_env();
    env_builder.filter_level(cli.log_level.to_level_filter());
    env_builder.format_timestamp(None);
    env_builder.try_init()?;

    let command = cli.command.unwrap_or(Commands::Convert { input: None, pretty: false, output: None });

    match command {
        // ── Convert ──────────────────────────────────────────────────────────
        Commands::Convert { input, pretty, output } => {
            let data = read_input(input.as_deref())?;
            let json = atc2json::convert_with(&data, &ConvertOptions { pretty })?;
            match output {
                Some(path) => {
                    std::fs::write(&path, json)?;
                    log::info!("Wrote {}", path.display());
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    stdout.write_all(json.as_bytes())?;
                    stdout.flush()?;
                }
            }
        }

        // ── Inspect ──────────────────────────────────────────────────────────
        Commands::Inspect { input } => {
            let data = read_input(input.as_deref())?;
            let blocks = scan_blocks(&data)?;
            println!("{:>8}  {:<10} {:>8}  {:>10}  {:>10}  Status",
                     "Offset", "Tag", "Length", "Stored", "Computed");
            for b in &blocks {
                let status = match b.checksum_ok() {
                    Some(true)  => "ok",
                    Some(false) => "MISMATCH",
                    None        => "skipped",
                };
                println!("{:>8}  {:<10} {:>8}  {:>10}  {:>10}  {}",
                    b.offset, display_tag(&b.tag), b.length,
                    checksum_cell(b.stored), checksum_cell(b.expected), status);
            }
            // Full decode for the summary line; reports the first fatal error.
            match parse(&data) {
                Ok(ecg) => println!(
                    "{} block(s), {} Hz, {} Hz mains, gain {}, leads: {}",
                    blocks.len(),
                    ecg.frequency,
                    ecg.mains_frequency,
                    ecg.gain,
                    ecg.samples.leads().iter().map(|l| l.key()).collect::<Vec<_>>().join(", "),
                ),
                Err(e) => println!("{} block(s), not decodable: {e}", blocks.len()),
            }
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn checksum_cell(v: Option<u32>) -> String {
    v.map(|s| format!("{s:08x}")).unwrap_or_else(|| "-".into())
}

fn read_input(path: Option<&Path>) -> std::io::Result<Vec<u8>> {
    match path {
        Some(p) if p != Path::new("-") => {
            log::debug!("Reading {}", p.display());
            std::fs::read(p)
        }
        _ => {
            let mut buf = Vec::new();
            std::io::stdin().lock().read_to_end(&mut buf)?;
            log::debug!("Read {} bytes from stdin", buf.len());
            Ok(buf)
        }
    }
}
