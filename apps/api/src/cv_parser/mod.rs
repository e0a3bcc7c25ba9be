//! CV text extraction — best-effort download-and-parse of candidate CVs.
//!
//! CV parsing is an enhancement signal for matching, not a correctness path:
//! every failure mode (missing URL, network error, unsupported content type,
//! malformed document, parser panic) degrades to empty text. `extract_text`
//! is total; callers never see an error from it.

use std::io::Read;
use std::time::Duration;

use async_trait::async_trait;
use quick_xml::events::Event;
use reqwest::Client;
use tracing::debug;

const DOCX_CONTENT_TYPE: &str = "vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Source of plain text for a candidate's CV document.
///
/// Implementations must be total: a failed extraction is an empty string,
/// never an error surfaced to the matcher.
#[async_trait]
pub trait CvTextSource: Send + Sync {
    async fn extract_text(&self, cv_url: Option<&str>) -> String;
}

/// Document formats the extractor knows how to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocKind {
    Pdf,
    Docx,
}

impl DocKind {
    /// Parser selection: the declared content type wins, the file extension
    /// is the fallback. Anything else is unsupported.
    fn detect(content_type: &str, url: &str) -> Option<Self> {
        let url = url.to_lowercase();
        if content_type.contains("pdf") || url.ends_with(".pdf") {
            Some(DocKind::Pdf)
        } else if content_type.contains(DOCX_CONTENT_TYPE) || url.ends_with(".docx") {
            Some(DocKind::Docx)
        } else {
            None
        }
    }
}

/// Fetches CVs over HTTP and parses PDF or DOCX payloads.
pub struct HttpCvExtractor {
    client: Client,
}

impl HttpCvExtractor {
    pub fn new(fetch_timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(fetch_timeout)
                .build()
                .expect("Failed to build HTTP client"),
        }
    }

    async fn fetch_and_parse(&self, url: &str) -> anyhow::Result<String> {
        let response = self.client.get(url).send().await?.error_for_status()?;

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();

        let bytes = response.bytes().await?;

        match DocKind::detect(&content_type, url) {
            Some(DocKind::Pdf) => Ok(parse_pdf(bytes.to_vec()).await),
            Some(DocKind::Docx) => parse_docx(&bytes),
            // Unsupported type for now
            None => Ok(String::new()),
        }
    }
}

#[async_trait]
impl CvTextSource for HttpCvExtractor {
    async fn extract_text(&self, cv_url: Option<&str>) -> String {
        let url = match cv_url {
            Some(u) if !u.trim().is_empty() => u,
            _ => return String::new(),
        };

        match self.fetch_and_parse(url).await {
            Ok(text) => text.trim().to_string(),
            Err(e) => {
                debug!("CV extraction failed for {url}: {e}");
                String::new()
            }
        }
    }
}

/// Parses PDF bytes on a blocking thread. A parse error or a panic inside
/// the PDF backend both degrade to empty text; the backend is known to choke
/// on some real-world PDFs.
async fn parse_pdf(bytes: Vec<u8>) -> String {
    let parsed =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await;
    match parsed {
        Ok(Ok(text)) => text,
        _ => String::new(),
    }
}

/// Extracts the text runs of `word/document.xml` from a DOCX archive.
/// Paragraph boundaries become newlines.
fn parse_docx(bytes: &[u8]) -> anyhow::Result<String> {
    let cursor = std::io::Cursor::new(bytes);
    let mut archive = zip::ZipArchive::new(cursor)?;

    let mut document = String::new();
    archive
        .by_name("word/document.xml")?
        .read_to_string(&mut document)?;

    let mut reader = quick_xml::Reader::from_str(&document);
    let mut out = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == b"w:t" => in_text_run = true,
            Event::End(ref e) => match e.name().as_ref() {
                b"w:t" => in_text_run = false,
                b"w:p" => out.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text_run => out.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}
