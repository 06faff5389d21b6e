use super::*;

#[test]
fn parses_scan_with_defaults() {
    let cli = Cli::try_parse_from(["obscan", "scan"]).expect("expected valid cli args");
    assert!(matches!(
        cli.command,
        Commands::Scan {
            config: None,
            output: None,
            concurrency: None,
            dry_run: false
        }
    ));
}

#[test]
fn parses_scan_overrides() {
    let cli = Cli::try_parse_from([
        "obscan",
        "scan",
        "--config",
        "config/bb.yaml",
        "--output",
        "out/hits.json",
        "--concurrency",
        "4",
        "--dry-run",
    ])
    .expect("expected valid cli args");

    match cli.command {
        Commands::Scan {
            config,
            output,
            concurrency,
            dry_run,
        } => {
            assert_eq!(config, Some(PathBuf::from("config/bb.yaml")));
            assert_eq!(output, Some(PathBuf::from("out/hits.json")));
            assert_eq!(concurrency, Some(4));
            assert!(dry_run);
        }
        other => panic!("expected scan command, got {other:?}"),
    }
}

#[test]
fn rejects_non_numeric_concurrency() {
    let result = Cli::try_parse_from(["obscan", "scan", "--concurrency", "many"]);
    assert!(result.is_err());
}

#[test]
fn parses_template_command() {
    let cli = Cli::try_parse_from(["obscan", "template", "--seed", "30303"])
        .expect("expected valid cli args");
    match cli.command {
        Commands::Template { seed, config } => {
            assert_eq!(seed, "30303");
            assert!(config.is_none());
        }
        other => panic!("expected template command, got {other:?}"),
    }
}

#[test]
fn template_requires_seed() {
    assert!(Cli::try_parse_from(["obscan", "template"]).is_err());
}

#[test]
fn parses_seeds_command() {
    let cli = Cli::try_parse_from(["obscan", "seeds"]).expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Seeds));
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["obscan"]).is_err());
}
