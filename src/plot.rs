use super::charts::ChartFormat;
use super::layout::{layout_args, layout_from_matches, Layout};
use super::{DEFAULT_CSV, VERSION};
use clap::{value_t, App, Arg};
use std::path::{Path, PathBuf};

/// Which of the charts to draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ChartSelection {
    Line,
    Bar,
    Pie,
    All,
}

impl ChartSelection {
    pub fn line(&self) -> bool {
        matches!(self, ChartSelection::Line | ChartSelection::All)
    }

    pub fn bar(&self) -> bool {
        matches!(self, ChartSelection::Bar | ChartSelection::All)
    }

    pub fn pie(&self) -> bool {
        matches!(self, ChartSelection::Pie | ChartSelection::All)
    }
}

/// Settings of the plotting app
#[derive(Debug, Clone)]
pub struct PlotArgs {
    pub csvin: PathBuf,
    pub outdir: PathBuf,
    pub prefix: String,
    pub format: ChartFormat,
    pub charts: ChartSelection,
    pub layout: Layout,
    pub verbose: bool,
}

impl PlotArgs {
    pub fn trend_path(&self) -> PathBuf {
        self.chart_path("trend")
    }

    pub fn totals_path(&self) -> PathBuf {
        self.chart_path("totals")
    }

    pub fn proportions_path(&self) -> PathBuf {
        self.chart_path("proportions")
    }

    fn chart_path(&self, name: &str) -> PathBuf {
        self.outdir
            .join(format!("{}_{}.{}", self.prefix, name, self.format.extension()))
    }
}

/// Takes the CLI arguments that control the plotting of the application counts.
pub fn parse_cli() -> PlotArgs {
    parse_cli_from(std::env::args_os())
}

pub fn parse_cli_from<I, T>(args: I) -> PlotArgs
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let arg_csvin = Arg::with_name("input_csvfile")
        .help("name of the exported csv file")
        .short("f")
        .long("csvfile")
        .takes_value(true)
        .default_value(DEFAULT_CSV);
    let arg_outdir = Arg::with_name("output_dir")
        .help("directory for the charts, default is the directory of the csv file")
        .short("o")
        .long("outdir")
        .takes_value(true);
    let arg_prefix = Arg::with_name("prefix")
        .help("prefix of the chart file names, default is the csv file name")
        .long("prefix")
        .takes_value(true);
    let arg_format = Arg::with_name("format")
        .help("image format of the charts")
        .long("format")
        .takes_value(true)
        .possible_values(&["svg", "png"])
        .default_value("svg");
    let arg_chart = Arg::with_name("chart")
        .help("chart to draw")
        .short("c")
        .long("chart")
        .takes_value(true)
        .possible_values(&["line", "bar", "pie", "all"])
        .default_value("all");
    let arg_verbose = Arg::with_name("verbose")
        .help("print verbose information")
        .short("v")
        .long("verbose")
        .takes_value(false);
    let cli_args = App::new("Appcount_plot")
        .version(VERSION.unwrap_or("unknown"))
        .author("Luca Peruzzo")
        .about("cli app to plot the number and types of applications")
        .arg(arg_csvin)
        .arg(arg_outdir)
        .arg(arg_prefix)
        .arg(arg_format)
        .arg(arg_chart)
        .arg(arg_verbose)
        .args(&layout_args())
        .get_matches_from(args);

    let csvin = PathBuf::from(cli_args.value_of("input_csvfile").unwrap_or(DEFAULT_CSV));
    let outdir = match cli_args.value_of("output_dir") {
        Some(p) => PathBuf::from(p),
        None => csvin
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(".")),
    };
    let prefix = match cli_args.value_of("prefix") {
        Some(p) => String::from(p),
        None => csvin
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("appcounts")),
    };
    let format = value_t!(cli_args, "format", ChartFormat).unwrap_or_else(|e| e.exit());
    let charts = match cli_args.value_of("chart") {
        Some("line") => ChartSelection::Line,
        Some("bar") => ChartSelection::Bar,
        Some("pie") => ChartSelection::Pie,
        _ => ChartSelection::All,
    };
    PlotArgs {
        csvin,
        outdir,
        prefix,
        format,
        charts,
        layout: layout_from_matches(&cli_args),
        verbose: cli_args.is_present("verbose"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = parse_cli_from(vec!["appcount_plot"]);
        assert_eq!(args.csvin, PathBuf::from(DEFAULT_CSV));
        assert_eq!(args.outdir, PathBuf::from(""));
        assert_eq!(
            args.prefix,
            "Number-and-types-of-applications-by-all-account-customers-2023-11"
        );
        assert_eq!(args.format, ChartFormat::Svg);
        assert_eq!(args.charts, ChartSelection::All);
        assert_eq!(args.layout, Layout::default());
        assert!(!args.verbose);
    }

    #[test]
    fn output_paths() {
        let args = parse_cli_from(vec![
            "appcount_plot",
            "-f",
            "data/apps-2024-01.csv",
            "--format",
            "png",
            "-c",
            "pie",
            "-v",
        ]);
        assert_eq!(args.outdir, PathBuf::from("data"));
        assert_eq!(args.trend_path(), PathBuf::from("data/apps-2024-01_trend.png"));
        assert_eq!(
            args.proportions_path(),
            PathBuf::from("data/apps-2024-01_proportions.png")
        );
        assert!(args.charts.pie());
        assert!(!args.charts.bar());
        assert!(args.verbose);
    }

    #[test]
    fn explicit_outdir_and_prefix() {
        let args = parse_cli_from(vec!["appcount_plot", "-o", "out", "--prefix", "nov"]);
        assert_eq!(args.totals_path(), PathBuf::from("out/nov_totals.svg"));
    }
}
