//! UnNest command-line binary

fn main() -> anyhow::Result<()> {
    unnest::cli::run_cli()
}
