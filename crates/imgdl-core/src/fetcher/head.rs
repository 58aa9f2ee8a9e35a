//! Parse HTTP response header lines as curl delivers them.

use crate::resolver::ResponseMeta;

/// Headers of the current response. Reset on every status line, so after a
/// redirect chain only the final response's headers remain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ResponseHead {
    pub status: Option<u32>,
    pub content_type: Option<String>,
    pub content_disposition: Option<String>,
    pub content_length: Option<u64>,
}

impl ResponseHead {
    /// Feed one raw header line (including the status line).
    pub fn push_line(&mut self, raw: &[u8]) {
        let line = String::from_utf8_lossy(raw);
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if let Some(status) = parse_status_line(line) {
            *self = ResponseHead {
                status: Some(status),
                ..ResponseHead::default()
            };
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            let name = name.trim();
            let value = value.trim();
            if name.eq_ignore_ascii_case("content-type") {
                self.content_type = Some(value.to_string());
            } else if name.eq_ignore_ascii_case("content-disposition") {
                self.content_disposition = Some(value.to_string());
            } else if name.eq_ignore_ascii_case("content-length") {
                self.content_length = value.parse::<u64>().ok();
            }
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, Some(200..=299))
    }

    pub fn meta(&self) -> ResponseMeta {
        ResponseMeta {
            content_disposition: self.content_disposition.clone(),
            content_type: self.content_type.clone(),
        }
    }
}

/// `HTTP/1.1 404 Not Found` → 404.
fn parse_status_line(line: &str) -> Option<u32> {
    if !line.starts_with("HTTP/") {
        return None;
    }
    line.split_whitespace().nth(1)?.parse().ok()
}
