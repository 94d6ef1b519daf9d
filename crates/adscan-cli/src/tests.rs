use super::*;

#[test]
fn parses_analyze_with_inline_companies() {
    let cli = Cli::try_parse_from([
        "adscan",
        "analyze",
        "--company",
        "Acme Corp|https://acme.com|https://facebook.com/acmecorp",
        "--company",
        "Globex|globex.com",
        "--date-range",
        "7",
    ])
    .expect("expected valid cli args");

    let Commands::Analyze {
        companies,
        company,
        date_range,
    } = cli.command
    else {
        panic!("expected analyze command");
    };
    assert!(companies.is_none());
    assert_eq!(date_range, 7);
    assert_eq!(company.len(), 2);
    assert_eq!(
        company[0].social_url.as_deref(),
        Some("https://facebook.com/acmecorp")
    );
    assert_eq!(company[1].website_url, "globex.com");
    assert_eq!(company[1].social_url, None);
}

#[test]
fn analyze_defaults_to_thirty_days() {
    let cli = Cli::try_parse_from(["adscan", "analyze", "--companies", "companies.yaml"])
        .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Analyze { date_range: 30, .. }
    ));
}

#[test]
fn date_range_out_of_bounds_is_rejected() {
    assert!(Cli::try_parse_from(["adscan", "analyze", "--date-range", "0"]).is_err());
    assert!(Cli::try_parse_from(["adscan", "analyze", "--date-range", "400"]).is_err());
}

#[test]
fn parses_scan_command() {
    let cli = Cli::try_parse_from([
        "adscan",
        "scan",
        "--document",
        "page.html",
        "--name",
        "Acme Corp",
        "--social",
        "https://fb.com/acmecorp",
    ])
    .expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Scan {
            date_range: 30,
            social: Some(_),
            ..
        }
    ));
}

#[test]
fn parses_handles_command() {
    let cli = Cli::try_parse_from(["adscan", "handles", "https://instagram.com/acme"])
        .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Handles { .. }));
}

#[test]
fn missing_subcommand_is_an_error() {
    assert!(Cli::try_parse_from(["adscan"]).is_err());
}

#[test]
fn company_flag_requires_name() {
    assert!(parse_company_flag("|acme.com").is_err());
    assert!(parse_company_flag("").is_err());
}

#[test]
fn company_flag_rejects_extra_fields() {
    assert!(parse_company_flag("Acme|acme.com|fb.com/acme|extra").is_err());
}

#[test]
fn company_flag_trims_and_treats_empty_social_as_none() {
    let input = parse_company_flag(" Acme | acme.com | ").unwrap();
    assert_eq!(input.company_name, "Acme");
    assert_eq!(input.website_url, "acme.com");
    assert_eq!(input.social_url, None);
}

#[test]
fn inline_companies_follow_file_entries() {
    let companies =
        analyze::collect_companies(None, vec![CompanyInput::new("Acme", "acme.com", None)])
            .unwrap();
    assert_eq!(companies.len(), 1);
    assert_eq!(companies[0].company_name, "Acme");
}

#[test]
fn help_is_rendered_by_clap() {
    let err = Cli::try_parse_from(["adscan", "--help"]).unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn handles_runs_without_loaded_configuration() {
    scan::run_handles(None, "https://facebook.com/acmecorp", "https://acme.com")
        .expect("handles should not need configuration");
}
