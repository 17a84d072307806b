use crate::extraction::{BBox, PageContent};
use crate::model::CurrencyToken;
use crate::parsing::collect_tokens;
use serde::{Deserialize, Serialize};

/// Where a token sits in the source PDF.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenPosition {
    pub page_number: usize,
    pub line_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BBox>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatedToken {
    #[serde(flatten)]
    pub token: CurrencyToken,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<TokenPosition>,
}

#[derive(Debug, Clone)]
struct LineStart {
    offset: usize,
    page_index: usize,
    line_index: usize,
}

/// Page text joined into one blob, with a map back from byte offsets to
/// page and line.
///
/// Lines are joined with `\n`, so multi-word labels split across lines by
/// the extractor still match.
#[derive(Debug, Clone)]
pub struct TextDocument {
    text: String,
    pages: Vec<PageContent>,
    line_starts: Vec<LineStart>,
}

impl TextDocument {
    pub fn from_pages(pages: Vec<PageContent>) -> Self {
        let mut text = String::new();
        let mut line_starts: Vec<LineStart> = Vec::new();

        for (page_index, page) in pages.iter().enumerate() {
            for (line_index, line) in page.lines.iter().enumerate() {
                if !line_starts.is_empty() {
                    text.push('\n');
                }
                line_starts.push(LineStart {
                    offset: text.len(),
                    page_index,
                    line_index,
                });
                text.push_str(line);
            }
        }

        TextDocument {
            text,
            pages,
            line_starts,
        }
    }

    /// Plain text with no page information.
    pub fn from_text(text: impl Into<String>) -> Self {
        TextDocument {
            text: text.into(),
            pages: Vec::new(),
            line_starts: Vec::new(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Page and line containing byte `offset`, with the line's bounding box
    /// when the extractor provided one.
    pub fn position(&self, offset: usize) -> Option<TokenPosition> {
        let idx = self
            .line_starts
            .partition_point(|l| l.offset <= offset)
            .checked_sub(1)?;
        let start = &self.line_starts[idx];
        let page = &self.pages[start.page_index];

        let bbox = page
            .line_spans
            .iter()
            .find(|s| s.line_index == start.line_index)
            .map(|s| s.bbox.clone());

        Some(TokenPosition {
            page_number: page.page_number,
            line_index: start.line_index,
            bbox,
        })
    }

    /// Every well-formed dollar amount, with its position.
    pub fn located_tokens(&self) -> Vec<LocatedToken> {
        collect_tokens(&self.text)
            .into_iter()
            .map(|token| LocatedToken {
                position: self.position(token.span.start),
                token,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::LineSpan;
    use rust_decimal_macros::dec;

    fn page(number: usize, lines: &[&str]) -> PageContent {
        PageContent {
            page_number: number,
            lines: lines.iter().map(|s| s.to_string()).collect(),
            line_spans: vec![],
        }
    }

    #[test]
    fn test_lines_joined_with_newlines() {
        let doc = TextDocument::from_pages(vec![
            page(1, &["AMOUNT", "DUE $1.00"]),
            page(2, &["TOTAL $2.00"]),
        ]);
        assert_eq!(doc.text(), "AMOUNT\nDUE $1.00\nTOTAL $2.00");
        assert_eq!(doc.page_count(), 2);
    }

    #[test]
    fn test_token_positions() {
        let doc = TextDocument::from_pages(vec![
            page(1, &["Invoice", "MONTHLY COST   1.00   $200.00"]),
            page(2, &["", "TOTAL   $435.50"]),
        ]);
        let located = doc.located_tokens();
        assert_eq!(located.len(), 2);

        let first = located[0].position.as_ref().unwrap();
        assert_eq!((first.page_number, first.line_index), (1, 1));

        let second = located[1].position.as_ref().unwrap();
        assert_eq!((second.page_number, second.line_index), (2, 1));
        assert_eq!(located[1].token.value, dec!(435.50));
    }

    #[test]
    fn test_bbox_attached_from_line_spans() {
        let mut p = page(1, &["TAX   $35.50"]);
        p.line_spans.push(LineSpan {
            page_number: 1,
            line_index: 0,
            text: "TAX   $35.50".into(),
            bbox: BBox {
                x_min: 400.0,
                y_min: 600.0,
                x_max: 520.0,
                y_max: 612.0,
            },
        });
        let doc = TextDocument::from_pages(vec![p]);
        let pos = doc.position(6).unwrap();
        assert_eq!(pos.bbox.unwrap().x_min, 400.0);
    }

    #[test]
    fn test_plain_text_has_no_positions() {
        let doc = TextDocument::from_text("TOTAL $1.00");
        assert!(doc.position(6).is_none());
        assert_eq!(doc.located_tokens()[0].position, None);
    }
}
