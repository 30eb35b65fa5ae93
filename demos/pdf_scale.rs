use clap::Parser;
use ghostscript::{Ghostscript, GsError};
use log::info;
use std::env;
use std::path::PathBuf;

/// Scale every page of an A4 PDF down by half onto a page of the same size.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input file
    #[arg(default_value = "unscaled.pdf")]
    input: PathBuf,

    /// Output file
    #[arg(short, long, default_value = "scaled.pdf")]
    output: PathBuf,

    /// Device width in points, from the input's MediaBox
    #[arg(long, default_value_t = 596)]
    width: u32,

    /// Device height in points, from the input's MediaBox
    #[arg(long, default_value_t = 843)]
    height: u32,
}

fn main() -> Result<(), GsError> {
    if env::var("RUST_LOG").is_err() {
        unsafe {
            env::set_var("RUST_LOG", "ghostscript=info,pdf_scale=info");
        }
    }
    env_logger::init();

    let args = Args::parse();

    let revision = ghostscript::revision()?;
    info!("Revision: {revision}");

    // Centre the half-size page.
    let begin_page = format!(
        "<</BeginPage{{0.5 0.5 scale {} {} translate}}>> setpagedevice",
        f64::from(args.width) / 2.0,
        f64::from(args.height) / 2.0
    );

    let gs_args = [
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
        format!("-dDEVICEHEIGHT={}", args.height),
        format!("-dDEVICEWIDTH={}", args.width),
        format!("-sOutputFile={}", args.output.display()),
        "-c".into(),
        begin_page,
        format!("-f{}", args.input.display()),
    ];

    let mut gs = Ghostscript::new()?;
    gs.init(&gs_args)?;
    gs.exit()?;
    gs.destroy();

    info!("Wrote {}", args.output.display());
    Ok(())
}
