// src/main.rs

use logrun::{cli, logging, run};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("logrun: {err:?}");
    }

    let code = match run(args).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("logrun: {err}");
            err.exit_status()
        }
    };
    std::process::exit(code);
}
