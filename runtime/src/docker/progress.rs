//! Pull progress stream scanning.
//!
//! The engine answers `POST /images/create` with `200 OK` as soon as the pull
//! starts and then streams one JSON message per line. A pull that fails
//! part-way (unknown tag, denied access) still ends with a `200 OK` response,
//! the failure only shows up as a message carrying `error`/`errorDetail`.

use serde::Deserialize;

use super::DockerError;

/// One line of the pull progress stream.
#[derive(Debug, Default, Deserialize)]
struct PullMessage {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default, rename = "errorDetail")]
    error_detail: Option<ErrorDetail>,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

impl PullMessage {
    fn error_message(&self) -> Option<String> {
        self.error_detail
            .as_ref()
            .and_then(|d| d.message.clone())
            .or_else(|| self.error.clone())
    }
}

/// Splits streamed chunks into lines and fails on the first error message.
#[derive(Debug, Default)]
pub struct ProgressScanner {
    pending: Vec<u8>,
    messages: usize,
}

impl ProgressScanner {
    /// Feed one chunk of the response body.
    pub fn feed(&mut self, chunk: &[u8]) -> Result<(), DockerError> {
        self.pending.extend_from_slice(chunk);
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.check_line(&line)?;
        }
        Ok(())
    }

    /// Check whatever is left after the body has ended.
    ///
    /// Returns the number of progress messages seen.
    pub fn finish(mut self) -> Result<usize, DockerError> {
        let rest = std::mem::take(&mut self.pending);
        self.check_line(&rest)?;
        Ok(self.messages)
    }

    fn check_line(&mut self, line: &[u8]) -> Result<(), DockerError> {
        let text = String::from_utf8_lossy(line);
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        match serde_json::from_str::<PullMessage>(text) {
            Ok(message) => {
                self.messages += 1;
                if let Some(error) = message.error_message() {
                    return Err(DockerError::Pull(error));
                }
                if let Some(status) = message.status {
                    tracing::trace!(status = %status, "Pull progress");
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, line = %text, "Ignoring unparseable pull progress line");
            }
        }
        Ok(())
    }
}
