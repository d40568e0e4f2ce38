//! CLI parsing tests for setup command using the test DSL.

#[cfg(test)]
mod tests {
    use crate::cli::Args;
    use clap::Parser;
    use rstest::rstest;

    crate::cli_defaults_test! {
        command: "setup",
        variant: Setup,
        required_args: [],
        defaults: {
            dry_run: false,
        },
    }

    crate::cli_option_test! {
        command: "setup",
        variant: Setup,
        test_name: test_setup_dry_run,
        args: ["--dry-run"],
        field: dry_run,
        expected: true,
    }

    crate::cli_error_test! {
        command: "setup",
        test_name: test_setup_rejects_force,
        args: ["--force"],
    }
}
