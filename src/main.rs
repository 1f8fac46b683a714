use anyhow::Context;
use simple_qoi::disassemble;

fn main() -> anyhow::Result<()> {
    let file_name = std::env::args()
        .nth(1)
        .context("usage: simple-qoi <file.qoi>")?;
    let input = std::fs::read(&file_name).context(format!("Failed to read {file_name}"))?;
    let (header, ops) = disassemble(&input)?;
    println!("{:?}", header);
    for op in ops {
        let (offset, op) = op?;
        println!("{offset:>8}: {:?}", op);
    }
    Ok(())
}
