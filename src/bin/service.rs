// src/bin/service.rs
use color_eyre::eyre::{Result, WrapErr};
use profile_scan::{cli, service};

fn main() -> Result<()> {
    color_eyre::install()?;
    profile_scan::log::init(profile_scan::config::consts::LOG_FILE);

    let opts = match cli::parse_service_args(std::env::args().skip(1))? {
        cli::Command::Run(opts) => opts,
        cli::Command::Help => {
            eprintln!("{}", cli::SERVICE_HELP);
            return Ok(());
        }
    };

    service::run(&opts).wrap_err_with(|| format!("Analysis service on {} stopped", opts.bind))
}
