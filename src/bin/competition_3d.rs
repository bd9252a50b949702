use std::path::Path;

use agrisurface::charts::competition::{self, OUTPUT_FILE};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let status = competition::run(Path::new(OUTPUT_FILE))?;
    println!("{status}");
    Ok(())
}
