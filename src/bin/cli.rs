// src/bin/cli.rs
use color_eyre::eyre::{Result, WrapErr};
use profile_scan::{cli, runner, table};

fn main() -> Result<()> {
    color_eyre::install()?;
    profile_scan::log::init(profile_scan::config::consts::LOG_FILE);

    let opts = match cli::parse_processor_args(std::env::args().skip(1))? {
        cli::Command::Run(opts) => opts,
        cli::Command::Help => {
            eprintln!("{}", cli::PROCESSOR_HELP);
            return Ok(());
        }
    };

    let mut progress = cli::ConsoleProgress::new(opts.quiet);
    let summary = runner::run(&opts, Some(&mut progress))
        .wrap_err_with(|| format!("Analysis of {} failed", opts.input.display()))?;

    print!("{}", table::render_text(&summary.table.to_dataset()));
    println!(
        "\n{} of {} {} profiles found. Exported to {}",
        summary.table.found_count(),
        summary.table.len(),
        summary.table.platform(),
        summary.written.display()
    );
    Ok(())
}
