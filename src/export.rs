//! Job export files
//!
//! Interactive exports are pretty printed, one job object after another. Batch exports are
//! json lines, one compact job per line. [`parse_jobs`] reads either layout, and also a single
//! json array of jobs.

use std::io;

use serde_json::{Deserializer, Value};
use tracing::debug;

use crate::{
    config::ExportMode,
    error::{DecodeError, Result},
    job::{NewJob, NewJobResource, job_from_value},
};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unable to serialize job: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("unable to write export: {0}")]
    Io(#[from] io::Error),
}

pub fn write_jobs<W: io::Write>(
    mut writer: W,
    mode: ExportMode,
    jobs: &[NewJob],
) -> Result<(), ExportError> {
    debug!("exporting {} jobs ({mode})", jobs.len());

    for job in jobs {
        let resource = NewJobResource::from(job);
        match mode {
            ExportMode::Interactive => serde_json::to_writer_pretty(&mut writer, &resource)?,
            ExportMode::Batch => serde_json::to_writer(&mut writer, &resource)?,
        }

        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}

pub fn to_string(mode: ExportMode, jobs: &[NewJob]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_jobs(&mut buffer, mode, jobs)?;

    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Every job in an export file, errors carry the line of the failing job
pub fn parse_jobs(input: &str) -> Result<Vec<NewJob>> {
    let mut jobs = Vec::new();
    let mut stream = Deserializer::from_str(input).into_iter::<Value>();

    loop {
        let start = next_value_start(input, stream.byte_offset());
        let line = line_at(input, start);

        let value = match stream.next() {
            None => break,
            Some(Ok(value)) => value,
            // syntax errors know their own line
            Some(Err(error)) => {
                let line = match error.line() {
                    0 => line,
                    found => found,
                };

                return Err(at_line(line, error.into()));
            }
        };

        match value {
            // a whole file written as one array of jobs
            Value::Array(values) => {
                for value in &values {
                    jobs.push(job_from_value(value).map_err(|error| at_line(line, error))?);
                }
            }
            value => jobs.push(job_from_value(&value).map_err(|error| at_line(line, error))?),
        }
    }

    debug!("parsed {} jobs", jobs.len());
    Ok(jobs)
}

fn at_line(line: usize, source: DecodeError) -> DecodeError {
    DecodeError::ExportLine { line, source: Box::new(source) }
}

fn next_value_start(input: &str, offset: usize) -> usize {
    let rest = &input[offset..];
    offset + (rest.len() - rest.trim_start().len())
}

/// 1-based line of a byte offset
fn line_at(input: &str, offset: usize) -> usize {
    memchr::memchr_iter(b'\n', &input.as_bytes()[..offset]).count() + 1
}
