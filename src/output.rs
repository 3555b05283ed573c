use std::{fs::File, io::{self, BufWriter, Write}, path::Path};

use anyhow::Context;

use crate::{error::CrawlError, record::JobRecord};


/// Writes each record as one line of JSON.
pub(crate) struct JsonLinesSink<W: Write> {
    writer: W
}


impl JsonLinesSink<Box<dyn Write + Send>> {
    /// Appends to `path` if given, otherwise writes to stdout.
    pub(crate) fn open(path: Option<&Path>) -> anyhow::Result<Self> {
        let writer: Box<dyn Write + Send> = match path {
            Some(path) => {
                let file = File::options()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open {} for writing", path.display()))?;
                Box::new(BufWriter::new(file))
            }
            None => Box::new(io::stdout())
        };
        Ok(Self::new(writer))
    }
}


impl<W: Write> JsonLinesSink<W> {
    pub(crate) fn new(writer: W) -> Self {
        Self { writer }
    }

    pub(crate) fn write(&mut self, record: &JobRecord) -> Result<(), CrawlError> {
        serde_json::to_writer(&mut self.writer, record)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    pub(crate) fn flush(&mut self) -> Result<(), CrawlError> {
        self.writer.flush()?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn into_inner(self) -> W {
        self.writer
    }
}
