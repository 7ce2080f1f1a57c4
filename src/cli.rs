use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, about = "A utility for parsing SMPS (CORE/TIME/STOCH) files")]
pub struct Cli {
  #[arg(
    short,
    long,
    value_name = "FILE",
    help = "The path to the CORE, TIME, or STOCH file to parse. The file's extension (.cor/.mps, \
            .tim, .sto) or, failing that, a matching sibling file picks which parser runs."
  )]
  pub input_path: String,

  #[arg(
    short,
    long,
    help = "Read the file in free-form (whitespace-tokenized) mode instead of fixed MPS columns"
  )]
  pub free_form: bool,
}
