use std::{fs, path::Path, time::Instant};

use anyhow::{ensure, Context};
use simple_qoi::{decode, encode, Channels};

const WIDTH: u32 = 512;
const HEIGHT: u32 = 512;

fn synthetic_images() -> Vec<(&'static str, Vec<u32>)> {
    let coords = || (0..HEIGHT).flat_map(|y| (0..WIDTH).map(move |x| (x, y)));
    let rgba = |r: u32, g: u32, b: u32, a: u32| {
        (r & 0xff) << 24 | (g & 0xff) << 16 | (b & 0xff) << 8 | (a & 0xff)
    };
    let mut seed = 0x2545_f491_u32;
    let mut next = move || {
        seed ^= seed << 13;
        seed ^= seed >> 17;
        seed ^= seed << 5;
        seed
    };
    vec![
        ("flat", coords().map(|_| rgba(40, 80, 120, 255)).collect()),
        (
            "gradient",
            coords().map(|(x, y)| rgba(x, y, (x + y) / 2, 255)).collect(),
        ),
        (
            "stripes",
            coords()
                .map(|(x, _)| {
                    if x / 8 % 2 == 0 {
                        rgba(255, 0, 0, 255)
                    } else {
                        rgba(0, 0, 255, 255)
                    }
                })
                .collect(),
        ),
        (
            "alpha-ramp",
            coords().map(|(x, y)| rgba(200, 100, 50, x ^ y)).collect(),
        ),
        ("noise", coords().map(|_| next()).collect()),
    ]
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::formatted_builder()
        .filter_level(log::LevelFilter::Info)
        .init();
    let output_dir = Path::new("benchmark");
    fs::create_dir_all(output_dir).context("Failed to create benchmark folder")?;

    let mut results = Vec::new();
    for (name, pixels) in synthetic_images() {
        let start = Instant::now();
        let stream = encode(&pixels, WIDTH, HEIGHT, Channels::Rgba, 0)
            .context(format!("Failed to encode {name}"))?;
        let encode_time = start.elapsed();
        let start = Instant::now();
        let image = decode(&stream).context(format!("Failed to decode {name}"))?;
        let decode_time = start.elapsed();
        ensure!(image.packed() == pixels, "{name} did not round-trip");

        let raw_bytes = pixels.len() * 4;
        log::info!("{name}: {raw_bytes} -> {} bytes", stream.len());
        results.push(serde_json::json!({
            "name": name,
            "width": WIDTH,
            "height": HEIGHT,
            "raw_bytes": raw_bytes,
            "encoded_bytes": stream.len(),
            "ratio": stream.len() as f64 / raw_bytes as f64,
            "encode_ms": encode_time.as_secs_f64() * 1000.0,
            "decode_ms": decode_time.as_secs_f64() * 1000.0,
        }));
    }
    let now = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Iso8601::DEFAULT)?;
    let report = serde_json::json!({
        "date": now,
        "images": results,
    });
    fs::write(output_dir.join("bench_results.json"), report.to_string())?;
    Ok(())
}
