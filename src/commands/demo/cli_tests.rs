//! CLI parsing tests for demo command.

#[cfg(test)]
mod tests {
    use crate::cli::Args;
    use clap::Parser;
    use rstest::rstest;

    #[rstest]
    fn test_demo_parses() {
        let args = Args::try_parse_from(["blogdb", "demo"]).unwrap();
        assert!(matches!(args.command, crate::commands::Command::Demo(_)));
    }

    crate::cli_error_test! {
        command: "demo",
        test_name: test_demo_takes_no_options,
        args: ["--keep"],
    }
}
