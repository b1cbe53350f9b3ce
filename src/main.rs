use anyhow::Result;

fn main() -> Result<()> {
  verrange::cli::run()
}
