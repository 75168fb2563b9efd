//! kvblast binary entry point.

fn main() -> anyhow::Result<()> {
    kvblast_cli::run()
}
