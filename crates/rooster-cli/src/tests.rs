use super::*;

#[test]
fn parses_fetch_without_options() {
    let cli = Cli::try_parse_from(["rooster-cli", "fetch"]).expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Fetch {
            view: ViewArgs {
                format: None,
                only: None,
                from: None,
                to: None,
                days: None,
            }
        }
    ));
}

#[test]
fn parses_fetch_with_view_options() {
    let cli = Cli::try_parse_from([
        "rooster-cli",
        "fetch",
        "--format",
        "string",
        "--only",
        "shifts",
        "--days",
        "7",
    ])
    .expect("expected valid cli args");

    let Commands::Fetch { view } = cli.command else {
        panic!("expected fetch command");
    };
    assert_eq!(view.format.as_deref(), Some("string"));
    assert_eq!(view.only.as_deref(), Some("shifts"));
    assert_eq!(view.days.as_deref(), Some("7"));
}

#[test]
fn parses_parse_with_file_and_range() {
    let cli = Cli::try_parse_from([
        "rooster-cli",
        "parse",
        "saved.html",
        "--from",
        "2024-06-10",
        "--to",
        "2024-06-16",
    ])
    .expect("expected valid cli args");

    assert!(matches!(
        cli.command,
        Commands::Parse { ref file, ref view }
            if file == &PathBuf::from("saved.html")
                && view.from.as_deref() == Some("2024-06-10")
                && view.to.as_deref() == Some("2024-06-16")
    ));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["rooster-cli"]).is_err());
}

#[test]
fn parse_file_reports_missing_file() {
    let report = parse_file(Path::new("/definitely/not/here.html")).unwrap_err();
    assert_eq!(report.error, "IO_ERROR");
}

#[test]
fn present_rejects_invalid_date_bounds() {
    let today = NaiveDate::from_ymd_opt(2024, 6, 10).expect("valid date");
    let view = ViewArgs {
        from: Some("june".to_string()),
        ..ViewArgs::default()
    };
    let report = present(today, &[], &view).unwrap_err();
    assert_eq!(report.error, "BAD_REQUEST");
}
