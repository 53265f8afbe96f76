use std::{
    fs::File,
    io::{self, BufWriter},
    path::Path,
};

use anyhow::Context;

/// Writes a pretty-printed JSON report to `output_path`, or to stdout
/// when no path is given.
pub fn save_json<T>(value: &T, output_path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    match output_path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create output file: {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_json(&mut writer, value)
                .with_context(|| format!("failed to write JSON to {}", path.display()))?;
        }
        None => {
            let mut writer = io::stdout().lock();
            write_json(&mut writer, value).context("failed to write JSON to stdout")?;
        }
    }
    Ok(())
}

fn write_json<W, T>(writer: &mut W, value: &T) -> anyhow::Result<()>
where
    W: io::Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
