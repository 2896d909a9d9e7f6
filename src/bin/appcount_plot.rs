use appcount_lpp::charts::{plot_cumulative, plot_proportions, plot_totals, ChartLabels};
use appcount_lpp::plot::{parse_cli, PlotArgs};
use appcount_lpp::{export_period, init_logging, AppCounts, Result};
use tracing::{error, info};

fn main() {
    let args = parse_cli();
    init_logging(args.verbose);
    info!(
        "read data from {} and plot to {}",
        args.csvin.display(),
        args.outdir.display()
    );
    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &PlotArgs) -> Result<()> {
    let counts = AppCounts::from_csv(&args.csvin, &args.layout)?;
    counts.check_totals();
    let period = export_period(&args.csvin);
    if !args.outdir.as_os_str().is_empty() {
        std::fs::create_dir_all(&args.outdir)
            .map_err(|e| appcount_lpp::AppCountError::io(&args.outdir, e))?;
    }

    if args.charts.line() {
        let labels = ChartLabels::trend().with_period(period);
        plot_cumulative(&counts.cumulative(), &labels, &args.trend_path(), args.format)?;
    }
    let totals = counts.totals();
    if args.charts.bar() {
        let labels = ChartLabels::totals().with_period(period);
        plot_totals(&totals, &labels, &args.totals_path(), args.format)?;
    }
    if args.charts.pie() {
        let labels = ChartLabels::proportions().with_period(period);
        plot_proportions(&totals, &labels, &args.proportions_path(), args.format)?;
    }
    Ok(())
}
