use clap::Parser as _;
use color_eyre::eyre::{eyre, Result};
use smps::cli::Cli;
use smps::core::CoreParser;
use smps::line::LexMode;
use smps::stoch::StochParser;
use smps::time::TimeParser;
use std::path::Path;

fn extension_of(path: &str) -> String {
  Path::new(path)
    .extension()
    .and_then(|ext| ext.to_str())
    .unwrap_or_default()
    .to_ascii_lowercase()
}

fn main() -> Result<()> {
  color_eyre::install()?;
  env_logger::init();

  let args = Cli::parse();
  let lex_mode = if args.free_form { LexMode::Free } else { LexMode::Fixed };

  match extension_of(&args.input_path).as_str() {
    "tim" | "time" => {
      let mut parser = TimeParser::new(&args.input_path, lex_mode)?;
      parser.parse()?;
      println!("{parser:#?}");
    }
    "sto" | "stoch" => {
      let mut parser = StochParser::new(&args.input_path, lex_mode)?;
      parser.parse()?;
      println!("{parser:#?}");
    }
    "mps" | "cor" | "core" | "" => {
      let mut parser = CoreParser::new(&args.input_path, lex_mode)?;
      parser.parse()?;
      println!("{parser:#?}");
    }
    other => return Err(eyre!("unrecognized SMPS file extension {other:?}")),
  }

  Ok(())
}
