use prospector::cli::commands::config::ConfigCommands;
use prospector::cli::types::{BackendArg, ModeArg, PatternArg};
use prospector::cli::{Cli, Commands};
use prospector::domain::models::{OrchestrationPattern, SimulationMode};
use clap::{CommandFactory, Parser};
use std::io::Write;
use std::path::PathBuf;

#[test]
fn test_parse_simulate_minimal() {
    let cli = Cli::try_parse_from(vec!["prospector", "simulate", "--company", "Acme Corp"]).unwrap();

    match cli.command {
        Commands::Simulate(args) => {
            assert_eq!(args.lead.company.as_deref(), Some("Acme Corp"));
            assert_eq!(args.mode, ModeArg::Basic);
            assert!(args.pattern.is_none());
            assert!(args.backend.is_none());

            let request = args.to_request().unwrap();
            assert_eq!(request.mode, SimulationMode::Basic);
            assert_eq!(request.lead.company_name, "Acme Corp");
            assert!(request.lead.industry.is_none());
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_simulate_full() {
    let cli = Cli::try_parse_from(vec![
        "prospector",
        "--json",
        "simulate",
        "--company",
        "Acme Corp",
        "--industry",
        "Enterprise Software",
        "--size",
        "2000",
        "--contact",
        "Jordan Lee",
        "--pain-point",
        "Manual reporting",
        "--pain-point",
        "Slow onboarding",
        "--tech",
        "Kubernetes,Postgres",
        "--engagement",
        "0.8",
        "--research-completed",
        "--mode",
        "advanced",
        "--pattern",
        "round-robin",
        "--backend",
        "mock",
        "--max-turns",
        "12",
        "--temperature",
        "0.5",
        "--seed",
        "42",
    ])
    .unwrap();

    assert!(cli.json);
    match cli.command {
        Commands::Simulate(args) => {
            assert_eq!(args.backend, Some(BackendArg::Mock));
            assert_eq!(args.pattern, Some(PatternArg::RoundRobin));

            let request = args.to_request().unwrap();
            assert_eq!(request.mode, SimulationMode::Advanced);
            assert_eq!(request.pattern, Some(OrchestrationPattern::RoundRobin));
            assert_eq!(request.max_turns, Some(12));
            assert_eq!(request.seed, Some(42));
            assert_eq!(request.lead.company_size, Some(2000));
            assert_eq!(request.lead.pain_points.len(), 2);
            assert_eq!(request.lead.tech_stack, vec!["Kubernetes", "Postgres"]);
            assert!(request.lead.research_completed);
        }
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_simulate_requires_company_or_file() {
    assert!(Cli::try_parse_from(vec!["prospector", "simulate"]).is_err());
}

#[test]
fn test_invalid_enum_values_rejected() {
    assert!(Cli::try_parse_from(vec![
        "prospector",
        "simulate",
        "--company",
        "A",
        "--mode",
        "turbo"
    ])
    .is_err());
    assert!(Cli::try_parse_from(vec![
        "prospector",
        "simulate",
        "--company",
        "A",
        "--size",
        "0"
    ])
    .is_err());
}

#[test]
fn test_out_of_range_values_fail_request_validation() {
    let cli = Cli::try_parse_from(vec![
        "prospector",
        "simulate",
        "--company",
        "A",
        "--max-turns",
        "50",
    ])
    .unwrap();
    let Commands::Simulate(args) = cli.command else {
        panic!("Wrong top-level command");
    };
    assert!(args.to_request().is_err());

    let cli = Cli::try_parse_from(vec![
        "prospector",
        "strategy",
        "--company",
        "A",
        "--engagement",
        "1.5",
    ])
    .unwrap();
    let Commands::Strategy(lead) = cli.command else {
        panic!("Wrong top-level command");
    };
    assert!(lead.to_lead().is_err());
}

#[test]
fn test_max_turns_lower_bound() {
    let to_request = |turns: &str| {
        let cli = Cli::try_parse_from(vec![
            "prospector",
            "simulate",
            "--company",
            "A",
            "--max-turns",
            turns,
        ])
        .unwrap();
        let Commands::Simulate(args) = cli.command else {
            panic!("Wrong top-level command");
        };
        args.to_request()
    };

    assert!(to_request("3").is_err());
    assert_eq!(to_request("4").unwrap().max_turns, Some(4));
    assert_eq!(to_request("20").unwrap().max_turns, Some(20));

    let command = Cli::command();
    let help = command
        .find_subcommand("simulate")
        .and_then(|sub| sub.get_arguments().find(|arg| arg.get_id() == "max_turns"))
        .and_then(|arg| arg.get_help())
        .map(|help| help.to_string())
        .unwrap();
    assert!(help.contains("4-20"), "help text: {help}");
}

#[test]
fn test_lead_file_with_flag_override() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        "company_name: Initech\nindustry: Finance\ncompany_size: 300\npain_points:\n  - TPS reports\n"
    )
    .unwrap();

    let path = file.path().to_string_lossy().to_string();
    let cli = Cli::try_parse_from(vec![
        "prospector",
        "strategy",
        "--lead-file",
        &path,
        "--size",
        "1200",
        "--pain-point",
        "Legacy mainframe",
    ])
    .unwrap();

    let Commands::Strategy(args) = cli.command else {
        panic!("Wrong top-level command");
    };
    let lead = args.to_lead().unwrap();
    assert_eq!(lead.company_name, "Initech");
    assert_eq!(lead.industry.as_deref(), Some("Finance"));
    assert_eq!(lead.company_size, Some(1200));
    assert_eq!(lead.pain_points, vec!["TPS reports", "Legacy mainframe"]);
}

#[test]
fn test_lead_file_json() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{"company_name": "Hooli", "engagement_level": 0.4}}"#).unwrap();

    let path = file.path().to_string_lossy().to_string();
    let cli = Cli::try_parse_from(vec!["prospector", "strategy", "--lead-file", &path]).unwrap();
    let Commands::Strategy(args) = cli.command else {
        panic!("Wrong top-level command");
    };
    let lead = args.to_lead().unwrap();
    assert_eq!(lead.company_name, "Hooli");
    assert!((lead.engagement_level - 0.4).abs() < f64::EPSILON);
}

#[test]
fn test_parse_validate() {
    let cli = Cli::try_parse_from(vec!["prospector", "validate", "results.json"]).unwrap();
    match cli.command {
        Commands::Validate { file } => assert_eq!(file, PathBuf::from("results.json")),
        _ => panic!("Wrong top-level command"),
    }
}

#[test]
fn test_parse_config_show_with_global_flags() {
    let cli = Cli::try_parse_from(vec![
        "prospector",
        "config",
        "show",
        "--config",
        "custom.yaml",
        "--verbose",
    ])
    .unwrap();

    assert!(cli.verbose);
    assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
    match cli.command {
        Commands::Config(args) => assert!(matches!(args.command, ConfigCommands::Show)),
        _ => panic!("Wrong top-level command"),
    }
}
