//! Integration tests for argument parsing and command dispatch exit codes.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use rstest::rstest;
use tempfile::TempDir;

use treejack::cli::args::{Commands, PayloadCommands};
use treejack::cli::{execute_command, Cli};
use treejack::exitcode;
use treejack::util::testing;

fn config_file(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("treejack.toml");
    fs::write(&path, "[render]\ncolor = false\n").unwrap();
    path
}

fn run(config: &Path, args: &[&str]) -> Result<(), i32> {
    testing::init_test_setup();
    let mut argv = vec!["treejack", "-c", config.to_str().unwrap()];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).expect("arguments parse");
    execute_command(&cli).map_err(|e| e.exit_code())
}

#[test]
fn given_repeated_debug_flag_when_parsing_then_counts_verbosity() {
    let cli = Cli::try_parse_from(["treejack", "-dd", "defaults", "example:age_check"]).unwrap();

    assert_eq!(cli.debug, 2);
    assert!(matches!(cli.command, Some(Commands::Defaults { ref tree }) if tree == "example:age_check"));
}

#[test]
fn given_payload_subcommand_when_parsing_then_reads_inputs_option() {
    let cli = Cli::try_parse_from([
        "treejack",
        "payload",
        "unreachable",
        "tree.json",
        "--inputs",
        "base.json",
    ])
    .unwrap();

    match cli.command {
        Some(Commands::Payload {
            command: PayloadCommands::Unreachable { tree, inputs },
        }) => {
            assert_eq!(tree, "tree.json");
            assert_eq!(inputs, Some(PathBuf::from("base.json")));
        }
        other => panic!("unexpected command: {other:?}"),
    }
}

#[rstest]
#[case(&["defaults", "example:loan_application"])]
#[case(&["samples", "example:age_check"])]
#[case(&["render", "example:product_recommendation"])]
#[case(&["render", "example:complex_loan", "--json"])]
#[case(&["validate", "example:complex_loan"])]
#[case(&["payload", "simulate", "example:age_check"])]
#[case(&["examples", "list"])]
#[case(&["examples", "samples", "complex_loan"])]
#[case(&["config", "show"])]
fn given_bundled_example_when_running_then_succeeds(#[case] args: &[&str]) {
    let dir = TempDir::new().unwrap();
    assert_eq!(run(&config_file(&dir), args), Ok(()));
}

#[rstest]
#[case(&["defaults", "/definitely/missing/tree.json"], exitcode::NOINPUT)]
#[case(&["examples", "show", "no_such_example"], exitcode::NOINPUT)]
#[case(&["defaults", "example:no_such_example"], exitcode::NOINPUT)]
fn given_missing_input_when_running_then_exits_noinput(#[case] args: &[&str], #[case] code: i32) {
    let dir = TempDir::new().unwrap();
    assert_eq!(run(&config_file(&dir), args), Err(code));
}

#[test]
fn given_invalid_tree_when_validating_then_exits_dataerr() {
    let dir = TempDir::new().unwrap();
    let tree = dir.path().join("dup.json");
    fs::write(
        &tree,
        r#"{"root": {"node_id": "a", "text": "A", "children": [{"node_id": "a", "text": "again"}]}}"#,
    )
    .unwrap();

    let code = run(&config_file(&dir), &["validate", tree.to_str().unwrap()]);

    assert_eq!(code, Err(exitcode::DATAERR));
}

#[test]
fn given_missing_config_file_when_running_then_exits_config() {
    let dir = TempDir::new().unwrap();

    let code = run(&dir.path().join("absent.toml"), &["examples", "list"]);

    assert_eq!(code, Err(exitcode::CONFIG));
}

#[test]
fn given_simulation_response_when_exporting_then_writes_target() {
    let dir = TempDir::new().unwrap();
    let response = dir.path().join("response.json");
    fs::write(
        &response,
        r#"{"path": ["start", "minor"], "final_node": {"node_id": "minor", "text": "You are a minor."}}"#,
    )
    .unwrap();
    let target = dir.path().join("results").join("path-results.json");

    let code = run(
        &config_file(&dir),
        &[
            "export",
            response.to_str().unwrap(),
            "-o",
            target.to_str().unwrap(),
        ],
    );

    assert_eq!(code, Ok(()));
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&target).unwrap()).unwrap();
    assert_eq!(written["path"][1], "minor");
}
