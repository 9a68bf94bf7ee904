// src/bin/cli.rs
fn main() -> color_eyre::Result<()> {
    medal_watch::cli::run()
}
