use std::process::ExitCode;

fn main() -> ExitCode {
    match mnky_lang::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {}", err);
            ExitCode::FAILURE
        },
    }
}
