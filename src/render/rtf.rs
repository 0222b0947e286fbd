//! Minimal RTF writer for the event stream: one paragraph per surfaced event,
//! bold spans for the acting party and a grey color for NPC-only noise.

const RTF_HEADER: &str =
    r"{\rtf1\ansi{\colortbl ;\red0\green0\blue0;\red128\green128\blue128;}\fs20 ";
const RTF_FOOTER: char = '}';
const BOLD_ON: &str = r"\b ";
const BOLD_OFF: &str = r"\b0 ";
const MUTED_ON: &str = r"\cf2 ";
const COLOR_OFF: &str = r"\cf0 ";
const PARAGRAPH_END: &str = r"\par ";

#[derive(Debug)]
pub(crate) struct RtfDocument {
    buffer: String,
}

impl RtfDocument {
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        let mut buffer = String::with_capacity(capacity.max(RTF_HEADER.len() + 1));
        buffer.push_str(RTF_HEADER);
        Self { buffer }
    }

    pub(crate) fn text(&mut self, value: &str) -> &mut Self {
        escape_into(&mut self.buffer, value);
        self
    }

    pub(crate) fn bold(&mut self, value: &str) -> &mut Self {
        self.buffer.push_str(BOLD_ON);
        escape_into(&mut self.buffer, value);
        self.buffer.push_str(BOLD_OFF);
        self
    }

    pub(crate) fn muted(&mut self) -> &mut Self {
        self.buffer.push_str(MUTED_ON);
        self
    }

    /// Resets the color and closes the current paragraph.
    pub(crate) fn end_paragraph(&mut self) -> &mut Self {
        self.buffer.push_str(COLOR_OFF);
        self.buffer.push_str(PARAGRAPH_END);
        self
    }

    pub(crate) fn finish(mut self) -> String {
        self.buffer.push(RTF_FOOTER);
        self.buffer
    }
}

/// Escapes RTF control characters; anything outside ASCII is written as
/// `\uN?` with signed UTF-16 code units.
pub fn escape_rtf(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    escape_into(&mut escaped, value);
    escaped
}

fn escape_into(buffer: &mut String, value: &str) {
    for character in value.chars() {
        match character {
            '\\' => buffer.push_str(r"\\"),
            '{' => buffer.push_str(r"\{"),
            '}' => buffer.push_str(r"\}"),
            character if character.is_ascii() => buffer.push(character),
            character => {
                let mut units = [0_u16; 2];
                for unit in character.encode_utf16(&mut units) {
                    buffer.push_str(&format!("\\u{}?", *unit as i16));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{escape_rtf, RtfDocument, RTF_HEADER};

    #[test]
    fn escapes_control_characters() {
        assert_eq!(escape_rtf(r"a\b{c}"), r"a\\b\{c\}");
        assert_eq!(escape_rtf("plain_name 01"), "plain_name 01");
    }

    #[test]
    fn escapes_non_ascii_as_unicode_control_words() {
        assert_eq!(escape_rtf("Zoë"), r"Zo\u235?");
        assert_eq!(escape_rtf("€"), r"\u8364?");
        assert_eq!(escape_rtf("😀"), r"\u-10179?\u-8704?");
    }

    #[test]
    fn frames_document_with_header_and_footer() {
        let mut document = RtfDocument::with_capacity(0);
        document.bold("Alpha").text(" hit {B}").end_paragraph();

        assert_eq!(
            document.finish(),
            format!("{RTF_HEADER}\\b Alpha\\b0  hit \\{{B\\}}\\cf0 \\par }}")
        );
    }
}
