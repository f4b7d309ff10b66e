fn main() -> anyhow::Result<()> {
    logagg_cli::run()
}
