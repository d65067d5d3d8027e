//! Output writers for simulation results.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::metrics::{CsvSummaryRow, GameMetrics};
use crate::types::OutputFormat;

pub struct OutputWriter {
    format: OutputFormat,
    detail_writer: Box<dyn Write + Send>,
    detail_path: PathBuf,
    csv_writer: csv::Writer<BufWriter<File>>,
    csv_path: PathBuf,
    /// Buffered games for `OutputFormat::Json`, written as one array on finish.
    pending: Vec<GameMetrics>,
}

fn create(path: &Path) -> std::io::Result<File> {
    OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(path)
}

impl OutputWriter {
    pub fn new(
        output_dir: &str,
        format: &OutputFormat,
        compress: bool,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let dir = Path::new(output_dir);
        std::fs::create_dir_all(dir)?;

        let timestamp = time::OffsetDateTime::now_utc()
            .format(&time::format_description::well_known::Iso8601::DEFAULT)
            .unwrap_or_else(|_| "unknown".to_string())
            .replace(':', "-");

        let extension = match format {
            OutputFormat::Jsonl => "jsonl",
            OutputFormat::Json => "json",
        };
        let filename = format!("simulation_{timestamp}.{extension}");
        let (detail_writer, detail_path): (Box<dyn Write + Send>, PathBuf) = if compress {
            let gz_path = dir.join(format!("{filename}.gz"));
            let encoder = GzEncoder::new(create(&gz_path)?, Compression::default());
            (Box::new(BufWriter::new(encoder)), gz_path)
        } else {
            let path = dir.join(&filename);
            (Box::new(BufWriter::new(create(&path)?)), path)
        };

        // Always write the CSV summary
        let csv_path = dir.join(format!("simulation_{timestamp}_summary.csv"));
        let csv_writer = csv::Writer::from_writer(BufWriter::new(create(&csv_path)?));

        Ok(Self {
            format: format.clone(),
            detail_writer,
            detail_path,
            csv_writer,
            csv_path,
            pending: Vec::new(),
        })
    }

    pub fn write_game(&mut self, metrics: &GameMetrics) -> Result<(), Box<dyn std::error::Error>> {
        match self.format {
            OutputFormat::Jsonl => {
                let json = serde_json::to_string(metrics)?;
                writeln!(self.detail_writer, "{json}")?;
                self.detail_writer.flush()?;
            }
            OutputFormat::Json => self.pending.push(metrics.clone()),
        }

        let row = CsvSummaryRow::from(metrics);
        self.csv_writer.serialize(&row)?;
        self.csv_writer.flush()?;
        Ok(())
    }

    pub fn finish(mut self) -> Result<(), Box<dyn std::error::Error>> {
        if matches!(self.format, OutputFormat::Json) {
            serde_json::to_writer_pretty(&mut self.detail_writer, &self.pending)?;
            writeln!(self.detail_writer)?;
        }
        self.detail_writer.flush()?;
        self.csv_writer.flush()?;
        Ok(())
    }

    pub fn output_paths(&self) -> (&Path, &Path) {
        (&self.detail_path, &self.csv_path)
    }
}
