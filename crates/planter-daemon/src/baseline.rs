//! Two-line baseline cache: raw CO2 on the first line, raw VOC on the
//! second. Read once at startup, written every N samples and at
//! shutdown. Read and write failures are soft: the sensor just runs
//! without a restored baseline.

use anyhow::Context;
use std::path::Path;

use planter_core::Baseline;

pub fn load(path: &Path) -> anyhow::Result<Baseline> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("reading baseline cache {:?}", path))?;
    let mut lines = content.lines();
    let raw_co2 = lines
        .next()
        .context("baseline cache missing co2 line")?
        .trim()
        .parse()
        .context("baseline co2 line not an integer")?;
    let raw_voc = lines
        .next()
        .context("baseline cache missing voc line")?
        .trim()
        .parse()
        .context("baseline voc line not an integer")?;
    Ok(Baseline { raw_co2, raw_voc })
}

pub fn store(path: &Path, baseline: Baseline) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, format!("{}\n{}", baseline.raw_co2, baseline.raw_voc))
        .with_context(|| format!("writing baseline cache {:?}", path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sgp30-baseline");
        let baseline = Baseline {
            raw_co2: 37120,
            raw_voc: 36800,
        };
        store(&path, baseline).unwrap();
        assert_eq!(load(&path).unwrap(), baseline);
    }

    #[test]
    fn missing_file_is_an_error_not_a_panic() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(&dir.path().join("nope")).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sgp30-baseline");
        std::fs::write(&path, "not a number\n123").unwrap();
        assert!(load(&path).is_err());
        std::fs::write(&path, "123").unwrap();
        assert!(load(&path).is_err());
    }
}
