fn main() -> anyhow::Result<()> {
    condo::cli::run()
}
