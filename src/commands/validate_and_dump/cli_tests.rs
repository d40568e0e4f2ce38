//! CLI parsing tests for validate-and-dump command using the test DSL.

#[cfg(test)]
mod tests {
    use crate::cli::Args;
    use clap::Parser;
    use rstest::rstest;

    crate::cli_defaults_test! {
        command: "validate-and-dump",
        variant: ValidateAndDump,
        required_args: [],
        defaults: {
            skip_create: false,
        },
    }

    crate::cli_option_test! {
        command: "validate-and-dump",
        variant: ValidateAndDump,
        test_name: test_validate_and_dump_skip_create,
        args: ["--skip-create"],
        field: skip_create,
        expected: true,
    }

    #[rstest]
    fn test_validate_and_dump_shares_pg_dump_options() {
        let args = Args::try_parse_from([
            "blogdb",
            "validate-and-dump",
            "--container",
            "postgres-dev",
            "--timeout-secs",
            "10",
        ])
        .unwrap();
        match args.command {
            crate::commands::Command::ValidateAndDump(cmd) => {
                assert_eq!(cmd.dump.container.as_deref(), Some("postgres-dev"));
                assert_eq!(cmd.dump.timeout_secs, 10);
            }
            _ => panic!("Expected ValidateAndDump command"),
        }
    }
}
