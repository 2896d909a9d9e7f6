use clap::{value_t, Arg, ArgMatches};

/// Shape of the exported csv: where the column names are and which columns are not application types.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    /// records dropped before the column-name record
    pub skip_rows: usize,
    /// records dropped at the end, before the blank footer rows are stripped
    pub skip_footer: usize,
    pub label_column: String,
    pub total_column: String,
}

impl Default for Layout {
    fn default() -> Self {
        Layout {
            skip_rows: 4,
            skip_footer: 0,
            label_column: String::from("Account Customer"),
            total_column: String::from("Total"),
        }
    }
}

/// CLI arguments shared by the apps to override the default layout.
pub fn layout_args() -> Vec<Arg<'static, 'static>> {
    vec![
        Arg::with_name("skip_rows")
            .help("number of records before the row with the column names")
            .long("skip-rows")
            .takes_value(true)
            .default_value("4"),
        Arg::with_name("skip_footer")
            .help("number of records to drop at the end of the file")
            .long("skip-footer")
            .takes_value(true)
            .default_value("0"),
        Arg::with_name("label_column")
            .help("name of the column with the account customer")
            .long("label-column")
            .takes_value(true)
            .default_value("Account Customer"),
        Arg::with_name("total_column")
            .help("name of the column with the row totals")
            .long("total-column")
            .takes_value(true)
            .default_value("Total"),
    ]
}

/// Builds the layout from the parsed arguments, exits with the clap message on invalid numbers.
pub fn layout_from_matches(cli_args: &ArgMatches) -> Layout {
    let defaults = Layout::default();
    Layout {
        skip_rows: value_t!(cli_args, "skip_rows", usize).unwrap_or_else(|e| e.exit()),
        skip_footer: value_t!(cli_args, "skip_footer", usize).unwrap_or_else(|e| e.exit()),
        label_column: cli_args
            .value_of("label_column")
            .map(String::from)
            .unwrap_or(defaults.label_column),
        total_column: cli_args
            .value_of("total_column")
            .map(String::from)
            .unwrap_or(defaults.total_column),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::App;

    #[test]
    fn defaults_match_layout_default() {
        let m = App::new("t").args(&layout_args()).get_matches_from(vec!["t"]);
        assert_eq!(layout_from_matches(&m), Layout::default());
    }

    #[test]
    fn overrides() {
        let m = App::new("t").args(&layout_args()).get_matches_from(vec![
            "t",
            "--skip-rows",
            "2",
            "--skip-footer",
            "1",
            "--label-column",
            "Customer",
        ]);
        let layout = layout_from_matches(&m);
        assert_eq!(layout.skip_rows, 2);
        assert_eq!(layout.skip_footer, 1);
        assert_eq!(layout.label_column, "Customer");
        assert_eq!(layout.total_column, "Total");
    }
}
