use clap::{App, AppSettings, Arg, ArgMatches, SubCommand};
use std::fs;
use std::path::Path;
use std::process;
use tracing_subscriber::EnvFilter;

//===========================================================================//

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    let matches = App::new("favicon")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Generates favicon files from an image")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .subcommand(
            SubCommand::with_name("image")
                .about("Converts an image to its favicon formats")
                .arg(
                    Arg::with_name("only")
                        .takes_value(true)
                        .value_name("FILENAME")
                        .long("only")
                        .multiple(true)
                        .number_of_values(1)
                        .help("Generates only this output (may be repeated)"),
                )
                .arg(Arg::with_name("source").required(true))
                .arg(Arg::with_name("target").required(true)),
        )
        .subcommand(
            SubCommand::with_name("inspect")
                .about("Lists the images in an ICO file")
                .arg(Arg::with_name("ico").required(true)),
        )
        .get_matches();
    let result = match matches.subcommand() {
        ("image", Some(submatches)) => run_image(submatches),
        ("inspect", Some(submatches)) => run_inspect(submatches),
        _ => Ok(true),
    };
    match result {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(error) => {
            eprintln!("error: {}", error);
            process::exit(1);
        }
    }
}

fn run_image(submatches: &ArgMatches) -> favicon::Result<bool> {
    let source = Path::new(submatches.value_of("source").unwrap_or_default());
    let target = Path::new(submatches.value_of("target").unwrap_or_default());
    let mut outputs = favicon::generate::default_outputs();
    if let Some(only) = submatches.values_of("only") {
        let only: Vec<&str> = only.collect();
        for name in only.iter() {
            if !outputs.iter().any(|output| output.filename == *name) {
                return Err(favicon::Error::InvalidInput(format!(
                    "Unknown output {:?}",
                    name
                )));
            }
        }
        outputs.retain(|output| only.contains(&output.filename.as_str()));
    }
    let report = favicon::generate::generate(source, target, &outputs)?;
    for (path, error) in report.failed() {
        eprintln!("{}: {}", path.display(), error);
    }
    println!(
        "Wrote {} of {} files to {}",
        report.written().len(),
        outputs.len(),
        target.display()
    );
    Ok(report.is_success())
}

fn run_inspect(submatches: &ArgMatches) -> favicon::Result<bool> {
    let path = submatches.value_of("ico").unwrap_or_default();
    let file = fs::File::open(path).map_err(favicon::Error::Read)?;
    let icon = favicon::IconFile::read(file)?;
    println!("Resource type: {:?}", icon.header().resource_type());
    for (index, entry) in icon.entries().iter().enumerate() {
        let kind = match icon.payload(index) {
            Some(data) if data.starts_with(b"\x89PNG") => "PNG",
            _ => "BMP",
        };
        println!(
            "{:5}: {}x{} {}, {} bpp, {} bytes at offset {}",
            index,
            entry.width(),
            entry.height(),
            kind,
            entry.bits_per_pixel(),
            entry.data_size(),
            entry.data_offset()
        );
    }
    Ok(true)
}

//===========================================================================//
