/// RFC 5321 reply lines are at most 512 octets; a reply may span several.
pub(crate) const MAX_REPLY_LEN: usize = 512 * 32;

/// Accumulates raw bytes until they form one complete SMTP reply.
#[derive(Debug, Default)]
pub(crate) struct ReplyBuffer {
    data: Vec<u8>,
}

impl ReplyBuffer {
    pub(crate) fn push(&mut self, chunk: &[u8]) {
        self.data.extend_from_slice(chunk);
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    /// More bytes than any legitimate reply, still without an end.
    pub(crate) fn is_overflowing(&self) -> bool {
        self.data.len() > MAX_REPLY_LEN
    }

    /// Ends in a newline and the last line is not a `NNN-` continuation.
    pub(crate) fn is_complete(&self) -> bool {
        let Some(body) = self.data.strip_suffix(b"\n") else {
            return false;
        };
        let last_line_start = body
            .iter()
            .rposition(|byte| *byte == b'\n')
            .map_or(0, |pos| pos + 1);
        body[last_line_start..].get(3) != Some(&b'-')
    }

    /// RFC 5321 only mandates the three-digit code; text is optional.
    pub(crate) fn starts_with_reply_code(&self) -> bool {
        self.data.len() >= 3 && self.data[..3].iter().all(u8::is_ascii_digit)
    }

    pub(crate) fn take(&mut self) -> String {
        let data = std::mem::take(&mut self.data);
        String::from_utf8_lossy(&data).into_owned()
    }
}
