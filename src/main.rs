use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use benchreport::chart::JsonDirSink;
use benchreport::config::Args;
use benchreport::pipeline;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();
    let settings = args.settings();
    let report = pipeline::run_files(&args.inputs(), &settings)
        .with_context(|| format!("cannot load benchmark results for {}", args.input.display()))?;

    let stdout = io::stdout();
    let mut output = stdout.lock();
    report.write_tables(&mut output, &args.palette(), settings.per_category)?;
    output.flush()?;

    if let Some(dir) = &args.chart_dir {
        let mut sink = JsonDirSink::create(dir)
            .with_context(|| format!("cannot create chart directory {}", dir.display()))?;
        report
            .emit_charts(&mut sink)
            .with_context(|| format!("cannot write charts to {}", dir.display()))?;
        info!("{} charts written to {}", sink.written(), dir.display());
    }
    Ok(())
}
