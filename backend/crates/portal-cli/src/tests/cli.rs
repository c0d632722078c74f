use crate::{Cli, Commands, DEFAULT_SERVER_URL};

use clap::Parser;
use googletest::assert_that;
use googletest::prelude::{eq, none, some};

#[test]
fn given_status_without_name_when_parse_then_all_services() {
    // When
    let cli = Cli::try_parse_from(["portalctl", "status"]).unwrap();

    // Then
    match cli.command {
        Commands::Status { name } => assert_that!(name, none()),
        _ => panic!("expected status"),
    }
}

#[test]
fn given_server_flag_when_parse_then_overrides_default() {
    // When
    let cli = Cli::try_parse_from([
        "portalctl",
        "start",
        "alpha",
        "--server",
        "http://10.0.0.5:9000",
        "--pretty",
    ])
    .unwrap();

    // Then
    assert_that!(cli.server.as_str(), eq("http://10.0.0.5:9000"));
    assert!(cli.pretty);
    match cli.command {
        Commands::Start { name } => assert_that!(name.as_str(), eq("alpha")),
        _ => panic!("expected start"),
    }
}

#[test]
fn given_reset_stats_when_parse_then_kebab_case_subcommand() {
    // When
    let cli = Cli::try_parse_from(["portalctl", "reset-stats", "censor"]).unwrap();

    // Then
    assert!(matches!(cli.command, Commands::ResetStats { ref name } if name == "censor"));
}

#[test]
fn given_health_with_name_when_parse_then_single_unit() {
    // When
    let cli = Cli::try_parse_from(["portalctl", "health", "writing"]).unwrap();

    // Then
    match cli.command {
        Commands::Health { name } => assert_that!(name, some(eq("writing"))),
        _ => panic!("expected health"),
    }
}

#[test]
fn given_no_server_when_parse_then_default_or_env_url() {
    // When
    let cli = Cli::try_parse_from(["portalctl", "systems"]).unwrap();

    // Then
    let expected = std::env::var("PORTAL_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string());
    assert_that!(cli.server, eq(&expected));
}

#[test]
fn given_start_without_name_when_parse_then_error() {
    assert!(Cli::try_parse_from(["portalctl", "start"]).is_err());
}
