use clap::Parser;
use ghostscript::{Ghostscript, GsError};
use log::info;
use std::env;
use std::path::PathBuf;

/// Concatenate PDF files with the pdfwrite device.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Output file
    #[arg(short, long, default_value = "concat.pdf")]
    output: PathBuf,

    /// Input files, in page order
    #[arg(default_values = ["page-1.pdf", "page-2.pdf"])]
    inputs: Vec<PathBuf>,
}

fn main() -> Result<(), GsError> {
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "ghostscript=info,pdf_concat=info");
        }
    }
    env_logger::init();

    let args = Args::parse();

    let revision = ghostscript::revision()?;
    info!("Revision: {revision}");

    let mut gs_args = vec![
        "gs".to_string(), // ignored by the interpreter
        "-q".into(),
        "-dBATCH".into(),
        "-dColorConversionStrategy=/LeaveColorUnchanged".into(),
        "-dCompatibilityLevel=1.5".into(),
        "-dEmbedAllFonts=true".into(),
        "-dNOPAUSE".into(),
        "-dPDFSETTINGS=/printer".into(),
        "-dSAFER".into(),
        "-dSubsetFonts=true".into(),
        "-sDEVICE=pdfwrite".into(),
        format!("-sOutputFile={}", args.output.display()),
    ];
    gs_args.extend(args.inputs.iter().map(|p| p.display().to_string()));

    let mut gs = Ghostscript::new()?;
    gs.init(&gs_args)?;
    gs.exit()?;
    gs.destroy();

    info!("Wrote {}", args.output.display());
    Ok(())
}
