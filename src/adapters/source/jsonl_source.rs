//! JSON Lines event source. One trigger payload per line on any async reader.
//!
//! Blank lines are skipped. A line that does not parse (bad JSON or bad UTF-8)
//! yields an error for that line only; the next call continues with the
//! following line. Any other read failure closes the source for good.

use super::mapper::{raw_to_domain, EntityNames, RawEvent};
use crate::domain::{ContentEvent, DomainError};
use crate::ports::EventSource;
use std::io::ErrorKind;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::debug;

pub struct JsonLinesSource<R> {
    lines: Lines<R>,
    names: EntityNames,
    line_no: usize,
    closed: bool,
}

impl<R: AsyncBufRead + Unpin + Send> JsonLinesSource<R> {
    pub fn new(reader: R, names: EntityNames) -> Self {
        Self {
            lines: reader.lines(),
            names,
            line_no: 0,
            closed: false,
        }
    }
}

impl JsonLinesSource<BufReader<Stdin>> {
    pub fn stdin(names: EntityNames) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), names)
    }
}

#[async_trait::async_trait]
impl<R: AsyncBufRead + Unpin + Send> EventSource for JsonLinesSource<R> {
    async fn next_event(&mut self) -> Result<Option<ContentEvent>, DomainError> {
        if self.closed {
            return Ok(None);
        }
        loop {
            let next = match self.lines.next_line().await {
                Ok(next) => next,
                Err(e) if e.kind() == ErrorKind::InvalidData => {
                    self.line_no += 1;
                    return Err(DomainError::Source(format!("line {}: {}", self.line_no, e)));
                }
                Err(e) => {
                    self.closed = true;
                    return Err(DomainError::StreamClosed(e.to_string()));
                }
            };
            let Some(line) = next else {
                return Ok(None);
            };
            self.line_no += 1;

            if line.trim().is_empty() {
                continue;
            }

            let raw: RawEvent = serde_json::from_str(&line)
                .map_err(|e| DomainError::Source(format!("line {}: {}", self.line_no, e)))?;
            debug!(line = self.line_no, entity = %raw.entity, "event received");
            return Ok(Some(raw_to_domain(&raw, &self.names)));
        }
    }
}
