use anyhow::Result;

pub fn run(port: u16, no_open: bool) -> Result<()> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(goalsmith_server::serve(port, !no_open))
}
