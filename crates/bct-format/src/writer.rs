//! Writing `.bct` boundary condition files.

use crate::{BoundarySection, FormatError, NanPolicy, Result, SciFormatter};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::{debug, info, warn};

/// Line terminator of every header line and record.
pub const LINE_ENDING: &str = "\r\n";

/// Renders boundary sections in the Delft3D time-series table format.
#[derive(Debug, Clone)]
pub struct BctWriter {
    reference_date: String,
    formatter: SciFormatter,
}

impl BctWriter {
    /// `reference_date` is written verbatim as the `reference-time` (`YYYYMMDD`).
    pub fn new(reference_date: impl Into<String>, formatter: SciFormatter) -> Self {
        Self {
            reference_date: reference_date.into(),
            formatter,
        }
    }

    /// Formatter used for every value.
    pub fn formatter(&self) -> &SciFormatter {
        &self.formatter
    }

    /// The 11 header lines of a section, without line endings.
    pub fn header_lines(&self, section: &BoundarySection) -> [String; 11] {
        [
            "table-name           'Boundary Section : 1'".to_string(),
            "contents             'Uniform             '".to_string(),
            format!("location             '{}              '", section.name()),
            "time-function        'non-equidistant'".to_string(),
            format!("reference-time       {}", self.reference_date),
            "time-unit            'minutes'".to_string(),
            "interpolation        'linear'".to_string(),
            "parameter            'time                '                     unit '[min]'"
                .to_string(),
            "parameter            'water elevation (z)  end A'               unit '[m]'"
                .to_string(),
            "parameter            'water elevation (z)  end B'               unit '[m]'"
                .to_string(),
            format!("records-in-table     {}", section.len()),
        ]
    }

    /// Render a whole section. Nothing is returned if any value fails to format.
    pub fn render_section(&self, section: &BoundarySection) -> Result<String> {
        let mut out = String::new();
        for line in self.header_lines(section) {
            out.push_str(&line);
            out.push_str(LINE_ENDING);
        }

        for (idx, (time, a, b)) in section.rows().enumerate() {
            let row = self.format_row(time, a, b).map_err(|e| FormatError::Row {
                section: section.name().to_string(),
                row: idx + 1,
                source: Box::new(e),
            })?;
            out.push_str(&row);
            out.push_str(LINE_ENDING);
        }

        Ok(out)
    }

    fn format_row(&self, time: f64, a: f64, b: f64) -> Result<String> {
        Ok(format!(
            "{} {} {}",
            self.formatter.format_padded(time)?,
            self.formatter.format_padded(a)?,
            self.formatter.format_padded(b)?
        ))
    }

    /// Write one section to a stream.
    pub fn write_section<W: Write>(&self, out: &mut W, section: &BoundarySection) -> Result<()> {
        let missing = section.missing_levels();
        if missing > 0 && self.formatter.nan_policy() == NanPolicy::SubstituteZero {
            warn!(
                "Section {}: {} missing water levels written as 0.0",
                section.name(),
                missing
            );
        }

        let text = self.render_section(section)?;
        out.write_all(text.as_bytes())?;
        debug!("Wrote section {} ({} records)", section.name(), section.len());
        Ok(())
    }

    /// Write sections to a stream in order.
    pub fn write_sections<W: Write>(&self, out: &mut W, sections: &[BoundarySection]) -> Result<()> {
        for section in sections {
            self.write_section(out, section)?;
        }
        Ok(())
    }

    /// Replace `path` with a file holding all sections.
    ///
    /// An existing file is deleted first. The write is not atomic: a failure
    /// part way leaves the sections written so far.
    pub fn write_file<P: AsRef<Path>>(&self, path: P, sections: &[BoundarySection]) -> Result<()> {
        let path = path.as_ref();
        let io_err = |source: io::Error| FormatError::Io {
            path: path.to_path_buf(),
            source,
        };

        match fs::remove_file(path) {
            Ok(()) => debug!("Removed existing {}", path.display()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(io_err(e)),
        }

        let mut out = BufWriter::new(File::create(path).map_err(io_err)?);
        self.write_sections(&mut out, sections).map_err(|e| match e {
            FormatError::Write(source) => io_err(source),
            other => other,
        })?;
        out.flush().map_err(io_err)?;

        info!("Wrote {} sections to {}", sections.len(), path.display());
        Ok(())
    }
}
