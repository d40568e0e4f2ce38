//! CLI parsing tests for dump command using the test DSL.

#[cfg(test)]
mod tests {
    use crate::cli::Args;
    use crate::db::schema::Dialect;
    use clap::Parser;
    use rstest::rstest;
    use std::path::PathBuf;

    crate::cli_defaults_test! {
        command: "dump",
        variant: Dump,
        required_args: [],
        defaults: {
            dialects: Vec::<Dialect>::new(),
            output_dir: PathBuf::from("schema"),
            from_db: false,
            validate: false,
        },
    }

    crate::cli_option_test! {
        command: "dump",
        variant: Dump,
        test_name: test_dump_dialect_list,
        args: ["--dialects", "postgresql,sqlite"],
        field: dialects,
        expected: vec![Dialect::Postgresql, Dialect::Sqlite],
    }

    crate::cli_option_test! {
        command: "dump",
        variant: Dump,
        test_name: test_dump_output_dir,
        args: ["-o", "build/sql"],
        field: output_dir,
        expected: PathBuf::from("build/sql"),
    }

    crate::cli_option_test! {
        command: "dump",
        variant: Dump,
        test_name: test_dump_from_db,
        args: ["--from-db"],
        field: from_db,
        expected: true,
    }

    crate::cli_option_test! {
        command: "dump",
        variant: Dump,
        test_name: test_dump_validate,
        args: ["--validate"],
        field: validate,
        expected: true,
    }

    crate::cli_error_test! {
        command: "dump",
        test_name: test_dump_rejects_unknown_dialect,
        args: ["--dialects", "oracle"],
    }
}
