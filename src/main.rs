use std::process::ExitCode;

fn main() -> ExitCode {
    sphere_mc::logging::init();
    match sphere_mc::app::run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(err.exit_code())
        }
    }
}
