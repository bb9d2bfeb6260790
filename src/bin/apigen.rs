use apigen::logging::{init_logging, LogConfig};

fn main() {
    if let Err(e) = init_logging(&LogConfig::from_env()) {
        eprintln!("Warning: {e:#}");
    }
    if let Err(e) = apigen::cli::run_cli() {
        eprintln!("❌ {e:#}");
        std::process::exit(1);
    }
}
