//! CLI parsing tests

use cascade_erasure::cli::{Cli, Commands};
use cascade_erasure::domain::ErasureMode;
use clap::Parser;
use test_case::test_case;

#[test_case("anonymize", ErasureMode::Anonymize)]
#[test_case("delete", ErasureMode::Delete)]
#[test_case("tombstone", ErasureMode::Tombstone)]
#[test_case("soft_delete", ErasureMode::Tombstone)]
fn test_erase_mode_parsing(raw: &str, expected: ErasureMode) {
    let cli = Cli::parse_from(["cascade-erasure", "erase", "--subject-id", "u1", "--mode", raw]);
    match cli.command {
        Commands::Erase(args) => assert_eq!(args.target.mode, expected),
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_erase_batch_and_flags() {
    let cli = Cli::parse_from([
        "cascade-erasure",
        "--config",
        "prod.toml",
        "erase",
        "--subject-id",
        "u1",
        "--subject-id",
        "u2",
        "--mode",
        "delete",
        "--dry-run",
        "--yes",
    ]);
    assert_eq!(cli.config, "prod.toml");
    match cli.command {
        Commands::Erase(args) => {
            assert_eq!(args.target.subject_id, vec!["u1", "u2"]);
            assert!(args.dry_run);
            assert!(args.yes);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[test]
fn test_preview_requires_subject() {
    assert!(Cli::try_parse_from(["cascade-erasure", "preview", "--mode", "delete"]).is_err());

    let cli = Cli::parse_from([
        "cascade-erasure",
        "preview",
        "--subject-id",
        "u1",
        "--mode",
        "anonymize",
    ]);
    assert!(matches!(cli.command, Commands::Preview(_)));
}

#[test]
fn test_verify_rejects_invalid_entity_name() {
    let result = Cli::try_parse_from([
        "cascade-erasure",
        "verify",
        "--subject-id",
        "u1",
        "--mode",
        "delete",
        "--entity",
        "jobs; drop table",
    ]);
    assert!(result.is_err());
}

#[test]
fn test_init_defaults() {
    let cli = Cli::parse_from(["cascade-erasure", "init"]);
    match cli.command {
        Commands::Init(args) => {
            assert_eq!(args.output, "erasure.toml");
            assert!(!args.force);
        }
        other => panic!("unexpected command: {other:?}"),
    }
}
