use appcount_lpp::charts::{plot_cumulative, plot_proportions, plot_totals, ChartFormat, ChartLabels};
use appcount_lpp::{export_period, AppCountError, AppCounts, Layout};
use std::path::{Path, PathBuf};

fn fixture() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("data")
        .join("Number-and-types-of-applications-by-all-account-customers-2023-11.csv")
}

fn load() -> AppCounts {
    AppCounts::from_csv(fixture(), &Layout::default()).unwrap()
}

fn read_svg(result: Result<(), AppCountError>, path: &Path) -> String {
    if let Err(e) = result {
        panic!("rendering {} failed: {}", path.display(), e);
    }
    let svg = std::fs::read_to_string(path).unwrap();
    assert!(svg.contains("<svg"));
    svg
}

#[test]
fn loads_the_export() {
    let counts = load();
    assert_eq!(
        counts.categories,
        vec!["Transfer", "Charge", "Search", "Official Copy"]
    );
    assert_eq!(counts.len(), 3);
    assert_eq!(counts.customers[0], "Alpha Conveyancing LLP");
    assert_eq!(counts.reported_totals[0], Some(1250));
    assert!(counts.check_totals().is_empty());
}

#[test]
fn aggregates_the_export() {
    let counts = load();
    let cumulative = counts.cumulative();
    assert_eq!(cumulative.values[0], vec![250, 350, 360]);
    assert_eq!(cumulative.values[3], vec![300, 450, 480]);

    let totals = counts.totals();
    assert_eq!(totals.values, vec![360, 520, 580, 480]);
    assert_eq!(totals.grand_total(), 1940);
    let p = totals.proportions();
    assert!((p[2] - 580. / 1940. * 100.).abs() < 1e-9);
}

#[test]
fn missing_file_is_an_io_error() {
    let r = AppCounts::from_csv("does/not/exist.csv", &Layout::default());
    assert!(matches!(r, Err(AppCountError::Io { .. })));
}

#[test]
fn writes_processed_csv_files() {
    let dir = tempfile::tempdir().unwrap();
    let counts = load();
    let cleaned = dir.path().join("cleaned.csv");
    let cumulative = dir.path().join("cumulative.csv");
    let totals = dir.path().join("totals.csv");
    counts.to_csv(&cleaned).unwrap();
    counts.cumulative().to_csv(&cumulative).unwrap();
    counts.totals().to_csv(&totals).unwrap();

    let cleaned = std::fs::read_to_string(cleaned).unwrap();
    let mut lines = cleaned.lines();
    assert_eq!(
        lines.next(),
        Some("Account Customer,Total,Transfer,Charge,Search,Official Copy")
    );
    assert_eq!(lines.next(), Some("Alpha Conveyancing LLP,1250,250,300,400,300"));
    assert_eq!(cleaned.lines().count(), 4);

    let cumulative = std::fs::read_to_string(cumulative).unwrap();
    assert_eq!(
        cumulative.lines().last(),
        Some("3,360,520,580,480")
    );

    let totals = std::fs::read_to_string(totals).unwrap();
    let lines: Vec<&str> = totals.lines().collect();
    assert_eq!(lines[0], "category,total,percent");
    assert_eq!(lines[1], "Transfer,360,18.557");

    // the cleaned file reads back with no header rows to skip
    let layout = Layout {
        skip_rows: 0,
        ..Layout::default()
    };
    let reloaded = AppCounts::from_csv(dir.path().join("cleaned.csv"), &layout).unwrap();
    assert_eq!(reloaded.counts, counts.counts);
}

#[test]
fn renders_the_three_charts() {
    let dir = tempfile::tempdir().unwrap();
    let counts = load();
    let period = export_period(fixture());
    let totals = counts.totals();

    let trend = dir.path().join("trend.svg");
    let svg = read_svg(
        plot_cumulative(
            &counts.cumulative(),
            &ChartLabels::trend().with_period(period),
            &trend,
            ChartFormat::Svg,
        ),
        &trend,
    );
    assert!(svg.contains("Trend of Application Types Over Time (November 2023)"));
    assert!(svg.contains("Official Copy"));

    let bars = dir.path().join("totals.svg");
    let svg = read_svg(
        plot_totals(&totals, &ChartLabels::totals(), &bars, ChartFormat::Svg),
        &bars,
    );
    for name in totals.categories.iter() {
        assert_eq!(svg.matches(name.as_str()).count(), 1, "{}", name);
    }

    let pie = dir.path().join("proportions.svg");
    let svg = read_svg(
        plot_proportions(&totals, &ChartLabels::proportions(), &pie, ChartFormat::Svg),
        &pie,
    );
    for label in ["18.6%", "26.8%", "29.9%", "24.7%"].iter() {
        assert!(svg.contains(label), "{}", label);
    }
}

#[test]
fn renders_png() {
    let dir = tempfile::tempdir().unwrap();
    let totals = load().totals();
    let pie = dir.path().join("proportions.png");
    plot_proportions(&totals, &ChartLabels::proportions(), &pie, ChartFormat::Png).unwrap();
    let bytes = std::fs::read(&pie).unwrap();
    assert!(bytes.starts_with(b"\x89PNG"));
}
