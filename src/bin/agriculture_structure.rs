use std::path::Path;

use agrisurface::charts::structure::{self, OUTPUT_FILE};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let summary = structure::run(Path::new(OUTPUT_FILE))?;
    println!("{}", summary.report(OUTPUT_FILE));
    Ok(())
}
