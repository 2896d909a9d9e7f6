use appcount_lpp::process::{parse_cli, ProcessArgs};
use appcount_lpp::{init_logging, AppCounts, Result};
use tracing::{debug, error, info, warn};

fn main() {
    let args = parse_cli();
    init_logging(args.verbose);
    info!(
        "read data from {} and save to {}",
        args.csvin.display(),
        args.csvout.display()
    );
    if let Err(e) = run(&args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: &ProcessArgs) -> Result<()> {
    let counts = AppCounts::from_csv(&args.csvin, &args.layout)?;
    debug!("cleaned table:\n{}", counts);

    let mismatches = counts.check_totals();
    if !mismatches.is_empty() {
        warn!("{} rows with a total different from the sum of their types", mismatches.len());
    }

    counts.to_csv(&args.csvout)?;
    counts.cumulative().to_csv(args.cumulative_path())?;
    let totals = counts.totals();
    totals.to_csv(args.totals_path())?;
    info!(
        "{} rows, {} application types, {} applications in total",
        counts.len(),
        counts.categories.len(),
        totals.grand_total()
    );
    Ok(())
}
