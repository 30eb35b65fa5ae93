use clap::{Parser, Subcommand};
use ghostscript::{Ghostscript, Revision};
use log::info;
use std::env;
use std::error::Error;
use std::path::PathBuf;

/// Drive the Ghostscript interpreter from the command line.
#[derive(Parser, Debug)]
#[command(name = "gsrun", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the linked library's revision.
    Revision {
        /// Print as JSON
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Initialize the interpreter with the given arguments, then run any
    /// extra sources.
    Run {
        /// PostScript text to run after initialization (repeatable)
        #[arg(long = "string", value_name = "TEXT")]
        strings: Vec<String>,

        /// File to run after initialization (repeatable)
        #[arg(long = "file", value_name = "PATH")]
        files: Vec<PathBuf>,

        /// Interpreter arguments, e.g. -q -dBATCH -sDEVICE=pdfwrite ...
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        args: Vec<String>,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "ghostscript=info");
        }
    }
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Revision { json } => {
            let revision = ghostscript::revision()?;
            print_revision(&revision, json)?;
        }
        Command::Run {
            strings,
            files,
            args,
        } => {
            let mut gs = Ghostscript::new()?;
            let argv = std::iter::once("gsrun".to_string()).chain(args);
            gs.init(argv)?;

            for text in &strings {
                let code = gs.run_string(text)?;
                info!("String finished with exit code {code}");
            }
            for file in &files {
                let code = gs.run_file(file)?;
                info!("{} finished with exit code {code}", file.display());
            }

            gs.exit()?;
            gs.destroy();
        }
    }
    Ok(())
}

fn print_revision(revision: &Revision, json: bool) -> Result<(), serde_json::Error> {
    if json {
        println!("{}", serde_json::to_string_pretty(revision)?);
    } else {
        println!("{revision}");
        println!("{}", revision.copyright);
    }
    Ok(())
}
