use crate::error::TaxfixError;
use crate::extraction::{BBox, LineSpan, PageContent, PdfExtractor};
use std::io::Write;
use std::path::Path;
use std::process::Command;

/// PDF extraction backend using pdftotext (from poppler-utils).
///
/// Layout mode (`-layout`) keeps labels and their amounts on the same line,
/// which is what label-anchored matching wants. Raw mode follows content
/// stream order instead.
pub struct PdftotextExtractor {
    layout: bool,
}

impl PdftotextExtractor {
    pub fn new() -> Self {
        PdftotextExtractor { layout: true }
    }

    /// Extract in content stream order (`-raw`).
    pub fn raw() -> Self {
        PdftotextExtractor { layout: false }
    }

    /// Check if pdftotext is available on the system.
    pub fn is_available() -> bool {
        Command::new("pdftotext")
            .arg("-v")
            .output()
            .map(|o| o.status.success() || !o.stderr.is_empty())
            .unwrap_or(false)
    }
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor for PdftotextExtractor {
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, TaxfixError> {
        let mut tmpfile =
            tempfile::NamedTempFile::new().map_err(|e| TaxfixError::Extraction(e.to_string()))?;
        tmpfile
            .write_all(pdf_bytes)
            .map_err(|e| TaxfixError::Extraction(e.to_string()))?;

        let mode = if self.layout { "-layout" } else { "-raw" };
        let text = run_pdftotext(mode, tmpfile.path())?;
        tracing::debug!(mode, bytes = text.len(), "pdftotext finished");

        // Bounding boxes only line up with layout output.
        let bbox_lines = if self.layout {
            parse_bbox_xml(&run_pdftotext("-bbox-layout", tmpfile.path())?)
        } else {
            Vec::new()
        };

        Ok(split_pages(&text)
            .into_iter()
            .map(|mut page| {
                page.line_spans =
                    match_layout_lines_to_bbox(page.page_number, &page.lines, &bbox_lines);
                page
            })
            .collect())
    }

    fn backend_name(&self) -> &str {
        "pdftotext"
    }
}

fn run_pdftotext(mode: &str, pdf_path: &Path) -> Result<String, TaxfixError> {
    let output = Command::new("pdftotext")
        .arg(mode)
        .arg(pdf_path)
        .arg("-") // output to stdout
        .output()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                TaxfixError::PdftotextNotFound
            } else {
                TaxfixError::Extraction(format!("pdftotext {mode} failed: {e}"))
            }
        })?;

    if !output.status.success() {
        let code = output.status.code().unwrap_or(-1);
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        return Err(TaxfixError::PdftotextFailed { code, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// pdftotext separates pages with form feeds and ends with a trailing one.
fn split_pages(text: &str) -> Vec<PageContent> {
    text.split('\x0c')
        .enumerate()
        .map(|(i, page_text)| PageContent {
            page_number: i + 1,
            lines: page_text.lines().map(|l| l.to_string()).collect(),
            line_spans: Vec::new(),
        })
        .filter(|p| !p.lines.is_empty() || p.page_number == 1)
        .collect()
}

#[derive(Debug, Clone)]
struct BBoxLine {
    page_number: usize,
    text: String,
    bbox: BBox,
}

fn parse_bbox_xml(xml: &str) -> Vec<BBoxLine> {
    let mut out = Vec::new();
    let mut page_number: Option<usize> = None;
    let mut line_bbox: Option<BBox> = None;
    let mut words: Vec<String> = Vec::new();

    for line in xml.lines().map(str::trim) {
        if line.starts_with("<page ") {
            page_number = attr(line, "number").and_then(|v| v.parse().ok());
        } else if line.starts_with("<line ") {
            line_bbox = parse_bbox(line);
            words.clear();
        } else if line.starts_with("<word ") {
            if let Some(word) = word_text(line) {
                let word = decode_xml_entities(word);
                if !word.trim().is_empty() {
                    words.push(word.trim().to_string());
                }
            }
        } else if line.starts_with("</line>") {
            if let (Some(page_number), Some(bbox)) = (page_number, line_bbox.take()) {
                if !words.is_empty() {
                    out.push(BBoxLine {
                        page_number,
                        text: words.join(" "),
                        bbox,
                    });
                }
            }
            words.clear();
        }
    }

    out
}

/// Pair each layout line with the first unused bbox line on the same page
/// whose words are identical.
fn match_layout_lines_to_bbox(
    page_number: usize,
    lines: &[String],
    bbox_lines: &[BBoxLine],
) -> Vec<LineSpan> {
    let mut used = vec![false; bbox_lines.len()];
    let mut spans = Vec::new();

    for (line_index, line) in lines.iter().enumerate() {
        let norm = normalize_ws(line);
        if norm.is_empty() {
            continue;
        }

        let found = bbox_lines.iter().enumerate().find(|(i, b)| {
            !used[*i] && b.page_number == page_number && normalize_ws(&b.text) == norm
        });
        if let Some((i, b)) = found {
            used[i] = true;
            spans.push(LineSpan {
                page_number,
                line_index,
                text: line.clone(),
                bbox: b.bbox.clone(),
            });
        }
    }

    spans
}

fn attr<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    let needle = format!("{name}=\"");
    let start = tag.find(&needle)? + needle.len();
    let rest = &tag[start..];
    Some(&rest[..rest.find('"')?])
}

fn parse_bbox(tag: &str) -> Option<BBox> {
    let f = |name| attr(tag, name).and_then(|v| v.parse::<f32>().ok());
    Some(BBox {
        x_min: f("xMin")?,
        y_min: f("yMin")?,
        x_max: f("xMax")?,
        y_max: f("yMax")?,
    })
}

fn word_text(tag: &str) -> Option<&str> {
    let start = tag.find('>')? + 1;
    let end = tag.rfind("</word>")?;
    tag.get(start..end)
}

fn decode_xml_entities(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_pages_on_form_feed() {
        let pages = split_pages("INVOICE\nMONTHLY COST $217.75\n\x0cTOTAL $435.50\n\x0c");
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].lines, vec!["INVOICE", "MONTHLY COST $217.75"]);
        assert_eq!(pages[1].page_number, 2);
    }

    #[test]
    fn test_split_pages_keeps_empty_first_page() {
        let pages = split_pages("");
        assert_eq!(pages.len(), 1);
        assert!(pages[0].lines.is_empty());
    }

    #[test]
    fn test_parse_bbox_xml_lines() {
        let xml = r#"
<doc>
  <page number="1">
    <line xMin="410.5" yMin="620.0" xMax="520.0" yMax="632.0">
      <word xMin="410.5" yMin="620.0" xMax="440.0" yMax="632.0">AMOUNT</word>
      <word xMin="444.0" yMin="620.0" xMax="470.0" yMax="632.0">DUE</word>
      <word xMin="480.0" yMin="620.0" xMax="520.0" yMax="632.0">$435.50</word>
    </line>
  </page>
</doc>
"#;
        let lines = parse_bbox_xml(xml);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].page_number, 1);
        assert_eq!(lines[0].text, "AMOUNT DUE $435.50");
        assert_eq!(lines[0].bbox.x_min, 410.5);
    }

    #[test]
    fn test_entities_decoded_once() {
        assert_eq!(decode_xml_entities("A&amp;B &amp;lt;"), "A&B &lt;");
    }

    #[test]
    fn test_match_layout_lines_to_bbox() {
        let bbox_lines = vec![BBoxLine {
            page_number: 1,
            text: "SUBTOTAL $400.00".to_string(),
            bbox: BBox {
                x_min: 400.0,
                y_min: 580.0,
                x_max: 520.0,
                y_max: 592.0,
            },
        }];

        let lines = vec!["".to_string(), "   SUBTOTAL        $400.00".to_string()];
        let spans = match_layout_lines_to_bbox(1, &lines, &bbox_lines);
        assert_eq!(spans.len(), 1);
        assert_eq!(spans[0].line_index, 1);

        assert!(match_layout_lines_to_bbox(2, &lines, &bbox_lines).is_empty());
    }
}
