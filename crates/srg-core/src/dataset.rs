//! Stretched SRG dataset loader.
//!
//! File layout, one item per line:
//!
//! ```text
//! <grating count G>
//! <stretch step count S>
//! S rows of G pitches
//! S rows of G amplitudes
//! S rows of G angles (radians)
//! ```
//!
//! Values on a row are whitespace separated. Anything after the angle rows is ignored.

use std::{
    f64::consts::PI,
    fs::File,
    io::{BufRead, BufReader, ErrorKind, Lines},
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::error::{Result, SrgError};
use crate::grating::Grating;
use crate::surface::{SamplingWindow, Surface};
use crate::synth;
use crate::table::ParameterTable;

/// Grating parameters of a stretched SRG, one row per stretch step.
#[derive(Debug, Clone)]
pub struct SrgDataset {
    pitch: ParameterTable,
    amplitude: ParameterTable,
    angle: ParameterTable,
    source: Option<PathBuf>,
}

impl SrgDataset {
    /// Loads a dataset from a text file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("Loading {:?}...", path);
        let file = File::open(path).map_err(|e| SrgError::from(e).with_path(path))?;
        let mut dataset = Self::parse(BufReader::new(file)).map_err(|e| e.with_path(path))?;
        dataset.source = Some(path.to_path_buf());
        Ok(dataset)
    }

    /// Parses a dataset from any buffered reader.
    ///
    /// Either the whole dataset is read or an error is returned. Every value
    /// must be finite and every pitch strictly positive.
    pub fn parse<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = LineReader::new(reader);
        let gratings = lines.read_count("grating count")?;
        let steps = lines.read_count("stretch step count")?;
        let pitch = lines.read_table(steps, gratings, "pitch", true)?;
        let amplitude = lines.read_table(steps, gratings, "amplitude", false)?;
        let angle = lines.read_table(steps, gratings, "angle", false)?;
        log::info!(
            "... loaded {} gratings over {} stretch steps",
            gratings,
            steps
        );
        Ok(Self {
            pitch,
            amplitude,
            angle,
            source: None,
        })
    }

    pub fn grating_count(&self) -> usize {
        self.pitch.gratings()
    }

    pub fn stretch_step_count(&self) -> usize {
        self.pitch.steps()
    }

    /// Estimated phase between gratings: π / grating count.
    pub fn phase(&self) -> f64 {
        PI / self.grating_count() as f64
    }

    pub fn pitch(&self) -> &ParameterTable {
        &self.pitch
    }

    pub fn amplitude(&self) -> &ParameterTable {
        &self.amplitude
    }

    pub fn angle(&self) -> &ParameterTable {
        &self.angle
    }

    /// File the dataset was loaded from, if it came from [`SrgDataset::from_path`].
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// See [`synth::gratings_at_step`].
    pub fn gratings_at_step(&self, step_index: usize) -> Result<Vec<Grating>> {
        synth::gratings_at_step(self, step_index)
    }

    /// See [`synth::stretched_surface`].
    pub fn stretched_surface(&self, step_index: usize, window: SamplingWindow) -> Result<Surface> {
        synth::stretched_surface(self, step_index, window)
    }

    /// Stretched surface for every step, in stretch order.
    pub fn stretched_surfaces(&self, window: SamplingWindow) -> Result<Vec<Surface>> {
        (0..self.stretch_step_count())
            .map(|step| self.stretched_surface(step, window))
            .collect()
    }
}

impl FromStr for SrgDataset {
    type Err = SrgError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s.as_bytes())
    }
}

/// Line iterator keeping the 1-based number of the last line read.
struct LineReader<R> {
    lines: Lines<R>,
    number: usize,
}

impl<R: BufRead> LineReader<R> {
    fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            number: 0,
        }
    }

    fn next_line(&mut self, expected: &str) -> Result<String> {
        match self.lines.next() {
            Some(Ok(line)) => {
                self.number += 1;
                Ok(line)
            }
            Some(Err(e)) if e.kind() == ErrorKind::InvalidData => {
                Err(SrgError::malformed(self.number + 1, "line is not valid UTF-8"))
            }
            Some(Err(e)) => Err(e.into()),
            None => Err(SrgError::malformed(
                self.number + 1,
                format!("unexpected end of input, expected {expected}"),
            )),
        }
    }

    /// Reads a positive integer from the first token of the next line.
    fn read_count(&mut self, what: &str) -> Result<usize> {
        let line = self.next_line(what)?;
        let token = line
            .split_whitespace()
            .next()
            .ok_or_else(|| SrgError::malformed(self.number, format!("missing {what}")))?;
        let count: i64 = token.parse().map_err(|_| {
            SrgError::malformed(self.number, format!("{what} `{token}` is not an integer"))
        })?;
        if count <= 0 {
            return Err(SrgError::malformed(
                self.number,
                format!("{what} must be positive, found {count}"),
            ));
        }
        usize::try_from(count)
            .map_err(|_| SrgError::malformed(self.number, format!("{what} {count} is too large")))
    }

    /// Reads `steps` rows of exactly `gratings` finite values.
    /// With `positive`, zero and negative values are rejected too.
    fn read_table(
        &mut self,
        steps: usize,
        gratings: usize,
        name: &str,
        positive: bool,
    ) -> Result<ParameterTable> {
        let mut table = ParameterTable::new(gratings);
        let mut row = Vec::new();
        for step in 0..steps {
            let line = self.next_line(&format!("{name} row for stretch step {step}"))?;
            row.clear();
            for token in line.split_whitespace() {
                let value: f64 = token.parse().map_err(|_| {
                    SrgError::malformed(self.number, format!("{name} value `{token}` is not a number"))
                })?;
                if !value.is_finite() {
                    return Err(SrgError::malformed(
                        self.number,
                        format!("{name} value `{token}` is not finite"),
                    ));
                }
                if positive && value <= 0.0 {
                    return Err(SrgError::malformed(
                        self.number,
                        format!("{name} value {value} must be positive"),
                    ));
                }
                row.push(value);
            }
            if row.len() != gratings {
                return Err(SrgError::malformed(
                    self.number,
                    format!("expected {gratings} {name} values, found {}", row.len()),
                ));
            }
            table.push_row(&row);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fixture_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("data/3g.txt")
    }

    fn expect_malformed(text: &str) -> (usize, String) {
        match text.parse::<SrgDataset>() {
            Err(SrgError::MalformedDataset { line, reason }) => (line, reason),
            other => panic!("expected MalformedDataset, got {other:?}"),
        }
    }

    #[test_log::test]
    fn reference_file_shape() {
        let dataset = SrgDataset::from_path(fixture_path()).unwrap();
        assert_eq!(dataset.grating_count(), 3);
        assert_eq!(dataset.stretch_step_count(), 7);
        for table in [dataset.pitch(), dataset.amplitude(), dataset.angle()] {
            assert_eq!(table.steps(), 7);
            assert_eq!(table.rows().count(), 7);
            assert!(table.rows().all(|row| row.len() == 3));
        }
        assert_eq!(dataset.source(), Some(fixture_path().as_path()));
    }

    #[test]
    fn reference_file_values() {
        let dataset = SrgDataset::from_path(fixture_path()).unwrap();
        assert_eq!(dataset.pitch().get(0, 0), 0.695692302);
        assert_eq!(dataset.amplitude().get(0, 0), 1.0);
        assert_eq!(dataset.angle().get(0, 0), 1.46323095);
        assert_eq!(dataset.pitch().get(6, 2), 1.1511);
        assert_eq!(dataset.amplitude().row(6), &[0.76, 0.266, -0.38]);
        assert_eq!(dataset.angle().get(6, 1), 0.172);
    }

    #[test]
    fn phase_is_pi_over_grating_count() {
        let dataset = SrgDataset::from_path(fixture_path()).unwrap();
        assert_relative_eq!(dataset.phase(), PI / 3.0);

        let single: SrgDataset = "1\n1\n2.0\n0.5\n0.0\n".parse().unwrap();
        assert_relative_eq!(single.phase(), PI);
        assert!(single.source().is_none());
    }

    #[test]
    fn counts_use_first_token_and_trailing_lines_are_ignored() {
        let text = "2 gratings\r\n1 step\r\n1.0 2.0\r\n0.5 0.25\r\n0.0 1.0\r\n\r\nnotes\n";
        let dataset: SrgDataset = text.parse().unwrap();
        assert_eq!(dataset.grating_count(), 2);
        assert_eq!(dataset.stretch_step_count(), 1);
        assert_eq!(dataset.amplitude().row(0), &[0.5, 0.25]);
        assert_eq!(dataset.angle().row(0), &[0.0, 1.0]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SrgDataset::from_path("does/not/exist.txt").unwrap_err();
        assert!(matches!(err, SrgError::Io { path: Some(_), .. }));
        assert!(err.to_string().contains("exist.txt"), "{err}");
    }

    #[test]
    fn reader_errors_have_no_path() {
        struct Broken;
        impl std::io::Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(ErrorKind::Other, "disk gone"))
            }
        }
        let err = SrgDataset::parse(BufReader::new(Broken)).unwrap_err();
        assert!(matches!(err, SrgError::Io { path: None, .. }));
    }

    #[test]
    fn invalid_utf8_is_malformed() {
        let bytes: &[u8] = b"1
1
\xFF\xFE
1
0
";
        match SrgDataset::parse(bytes) {
            Err(SrgError::MalformedDataset { line, reason }) => {
                assert_eq!(line, 3);
                assert!(reason.contains("UTF-8"), "{reason}");
            }
            other => panic!("expected MalformedDataset, got {other:?}"),
        }
    }

    #[test]
    fn huge_grating_count_with_short_input_is_malformed() {
        let (line, reason) = expect_malformed("4611686018427387904\n1\n1\n");
        assert_eq!(line, 3);
        assert!(reason.contains("found 1"), "{reason}");
        let (line, _) = expect_malformed("4611686018427387904\n1\n");
        assert_eq!(line, 3);
    }

    #[test]
    fn non_positive_pitch_is_rejected() {
        let (line, reason) = expect_malformed("1\n1\n0\n1\n0\n");
        assert_eq!(line, 3);
        assert!(reason.contains("must be positive"), "{reason}");
        assert_eq!(expect_malformed("2\n1\n1 -0.5\n1 1\n0 0\n").0, 3);
        // Negative amplitudes and angles are valid.
        let dataset: SrgDataset = "1\n1\n2\n-1\n-0.5\n".parse().unwrap();
        assert_eq!(dataset.amplitude().get(0, 0), -1.0);
    }

    #[test]
    fn non_finite_values_are_rejected() {
        assert_eq!(expect_malformed("1\n1\ninf\n1\n0\n").0, 3);
        assert_eq!(expect_malformed("1\n1\n1\nNaN\n0\n").0, 4);
        let (line, reason) = expect_malformed("1\n1\n1\n1\n-inf\n");
        assert_eq!(line, 5);
        assert!(reason.contains("not finite"), "{reason}");
    }

    #[test]
    fn truncated_file_reports_next_line() {
        let (line, reason) = expect_malformed("2\n2\n1 2\n3 4\n0.1 0.2\n");
        assert_eq!(line, 6);
        assert!(reason.contains("end of input"), "{reason}");
        assert!(reason.contains("amplitude"), "{reason}");
    }

    #[test]
    fn short_row_is_rejected() {
        let (line, reason) = expect_malformed("3\n1\n1 2\n0.1 0.2 0.3\n0 0 0\n");
        assert_eq!(line, 3);
        assert!(reason.contains("expected 3 pitch values, found 2"), "{reason}");
    }

    #[test]
    fn long_row_is_rejected() {
        let (line, _) = expect_malformed("1\n1\n1\n0.1 0.2\n0\n");
        assert_eq!(line, 4);
    }

    #[test]
    fn non_numeric_token_is_rejected() {
        let (line, reason) = expect_malformed("2\n1\n1 2\n0.1 0.2\n0 north\n");
        assert_eq!(line, 5);
        assert!(reason.contains("`north`"), "{reason}");
    }

    #[test]
    fn non_positive_counts_are_rejected() {
        assert_eq!(expect_malformed("0\n1\n").0, 1);
        assert_eq!(expect_malformed("2\n-1\n").0, 2);
        assert_eq!(expect_malformed("two\n1\n").0, 1);
        assert_eq!(expect_malformed("\n1\n").0, 1);
        assert_eq!(expect_malformed("").0, 1);
    }
}
