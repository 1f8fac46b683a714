use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context};
use simple_qoi::{Channels, Header, Image};

const USAGE: &str =
    "usage: process-image [-v] encode <width> <height> <file.rgba> | decode <file.qoi>";

fn main() -> anyhow::Result<()> {
    let mut args: Vec<_> = std::env::args().skip(1).collect();
    let verbosity = if args.first().map(String::as_str) == Some("-v") {
        args.remove(0);
        log::LevelFilter::Info
    } else {
        log::LevelFilter::Error
    };
    pretty_env_logger::formatted_builder()
        .filter_level(verbosity)
        .init();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();
    match args[..] {
        ["encode", width, height, file_name] => encode(
            width.parse::<u32>().context("width must be a number")?,
            height.parse::<u32>().context("height must be a number")?,
            Path::new(file_name),
        ),
        ["decode", file_name] => decode(Path::new(file_name)),
        _ => bail!(USAGE),
    }
}

fn output_path(input: &Path, extension: &str) -> anyhow::Result<PathBuf> {
    let output = input.with_extension(extension);
    if output == input {
        bail!("{} already has the .{extension} extension", input.display());
    }
    Ok(output)
}

fn encode(width: u32, height: u32, input: &Path) -> anyhow::Result<()> {
    let output = output_path(input, "qoi")?;
    let data = fs::read(input).context(format!("Failed to read {}", input.display()))?;
    let image = Image::new(Header::new(width, height, Channels::Rgba, 0), data)
        .context("Raw RGBA data doesn't match the given dimensions")?;
    fs::write(&output, image.encode()?)?;
    log::info!("{} {} {}", output.display(), width, height);
    Ok(())
}

fn decode(input: &Path) -> anyhow::Result<()> {
    let output = output_path(input, "rgba")?;
    let bytes = fs::read(input).context(format!("Failed to read {}", input.display()))?;
    let image = Image::decode(&bytes).context(format!("Failed to decode {}.", input.display()))?;
    fs::write(&output, image.as_rgba())?;
    log::info!("{} {} {}", output.display(), image.width(), image.height());
    Ok(())
}
