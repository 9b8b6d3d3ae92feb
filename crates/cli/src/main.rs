use std::process::ExitCode;

fn main() -> ExitCode {
    bundly_cli::run()
}
