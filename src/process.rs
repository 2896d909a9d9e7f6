use super::layout::{layout_args, layout_from_matches, Layout};
use super::VERSION;
use clap::{App, Arg};
use std::path::PathBuf;

/// Settings of the processing app
#[derive(Debug, Clone)]
pub struct ProcessArgs {
    pub csvin: PathBuf,
    pub csvout: PathBuf,
    pub layout: Layout,
    pub verbose: bool,
}

impl ProcessArgs {
    /// running sums, next to the cleaned file
    pub fn cumulative_path(&self) -> PathBuf {
        self.sibling("cumulative")
    }

    /// totals and percentages, next to the cleaned file
    pub fn totals_path(&self) -> PathBuf {
        self.sibling("totals")
    }

    fn sibling(&self, name: &str) -> PathBuf {
        let stem = self
            .csvout
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let stem = stem.strip_suffix("_cleaned").unwrap_or(&stem);
        self.csvout.with_file_name(format!("{}_{}.csv", stem, name))
    }
}

/// Takes the CLI arguments to set the processing parameters.
pub fn parse_cli() -> ProcessArgs {
    parse_cli_from(std::env::args_os())
}

pub fn parse_cli_from<I, T>(args: I) -> ProcessArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let arg_csvin = Arg::with_name("input_csvfile")
        .help("name of the exported csv file")
        .short("f")
        .long("csvfile")
        .takes_value(true)
        .required(true);
    let arg_csvout = Arg::with_name("output_csvfile")
        .help("name of the cleaned csv file")
        .short("o")
        .long("outfile")
        .takes_value(true);
    let arg_verbose = Arg::with_name("verbose")
        .help("print verbose information")
        .short("v")
        .long("verbose")
        .takes_value(false);

    let cli_args = App::new("clean the application counts")
        .version(VERSION.unwrap_or("unknown"))
        .author("Luca Peruzzo")
        .about("cli to clean and aggregate the number and types of applications")
        .arg(arg_csvin)
        .arg(arg_csvout)
        .arg(arg_verbose)
        .args(&layout_args())
        .get_matches_from(args);

    let csvin = PathBuf::from(cli_args.value_of("input_csvfile").unwrap_or_default());
    let csvout = match cli_args.value_of("output_csvfile") {
        Some(p) => PathBuf::from(p),
        None => {
            let stem = csvin
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| String::from("appcounts"));
            csvin.with_file_name(format!("{}_cleaned.csv", stem))
        }
    };
    ProcessArgs {
        csvin,
        csvout,
        layout: layout_from_matches(&cli_args),
        verbose: cli_args.is_present("verbose"),
    }
}
