use clap::Parser;
use imgc::cfu::trace::Tracer;
use imgc::emulator::config::{apply_cli_overrides, load_config_file, validate_config, AppConfig};
use imgc::emulator::{selftest, shell};
use imgc::init_log;
use imgc::SoftwareCfu;
use std::path::Path;

/// imgc - software CFU emulator for 8-bit quantized convolution
#[derive(Parser, Debug)]
#[command(name = "imgc")]
#[command(version = "0.1.0")]
#[command(about = "Software model of the image-convolution accelerator unit", long_about = None)]
struct Args {
  /// Start the interactive menu shell
  #[arg(short, long)]
  shell: bool,

  /// Quiet mode (suppress log messages)
  #[arg(short, long)]
  quiet: bool,

  /// Output instruction trace file path (JSON lines)
  #[arg(long, value_name = "FILE")]
  trace_file: Option<String>,

  /// FIFO capacity in packed words
  #[arg(long, value_name = "WORDS")]
  fifo_capacity: Option<usize>,

  /// Configuration file (TOML)
  #[arg(short, long, value_name = "FILE")]
  config: Option<String>,
}

fn main() -> std::io::Result<()> {
  init_log();

  let args = Args::parse();

  let mut config = match args.config.as_deref() {
    Some(path) => load_config_file(Path::new(path))?,
    None => AppConfig::default(),
  };
  apply_cli_overrides(&mut config, args.quiet, args.trace_file.as_deref(), args.fifo_capacity);
  validate_config(&config)?;

  if config.emulator.quiet {
    log::set_max_level(log::LevelFilter::Error);
  }

  let mut cfu = SoftwareCfu::with_fifo_capacity(config.emulator.fifo_capacity);
  if !config.emulator.trace_file.is_empty() {
    let tracer = Tracer::create(Path::new(&config.emulator.trace_file))?;
    cfu.set_tracer(tracer);
    log::info!("tracing instructions to {}", config.emulator.trace_file);
  }

  let result = if args.shell {
    shell::run(&mut cfu).map(|_| true)
  } else {
    Ok(selftest::run_all(&mut cfu))
  };

  if let Some(mut tracer) = cfu.take_tracer() {
    tracer.flush()?;
  }

  match result? {
    true => Ok(()),
    false => std::process::exit(1),
  }
}
