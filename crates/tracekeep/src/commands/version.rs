pub fn run() -> anyhow::Result<()> {
    println!("tracekeep {}", env!("CARGO_PKG_VERSION"));
    println!("Incremental Markdown archive of AI conversation history");
    Ok(())
}
