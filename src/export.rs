use crate::report::Report;
use anyhow::Result;
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use serde::Serialize;
use std::{
    fs,
    io::BufWriter,
    path::{Path, PathBuf},
};

const NOT_AVAILABLE: &str = "N/A";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Pdf,
}

impl ExportFormat {
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Json => "report.json",
            ExportFormat::Csv => "report.csv",
            ExportFormat::Pdf => "report.pdf",
        }
    }
}

/// Serializes completed (possibly partial) reports into downloadable byte
/// payloads. Every absent field renders as "N/A"; export never fails on a
/// partial report.
pub struct Exporter;

impl Exporter {
    pub fn new() -> Self {
        Self
    }

    /// Pretty-printed JSON of the full report including narrative.
    /// Byte-identical across repeated calls on the same report.
    pub fn to_json(&self, report: &Report) -> Result<Vec<u8>> {
        let mut bytes = serde_json::to_vec_pretty(report)?;
        bytes.push(b'\n');
        Ok(bytes)
    }

    /// Single-row CSV: one column per top-level report field. Nested
    /// mappings embed their JSON serialization rather than flattening.
    pub fn to_csv(&self, report: &Report) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(vec![]);
        writer.write_record([
            "domain",
            "traceroute",
            "dns",
            "ip_lookup",
            "tech_stack",
            "infrastructure",
            "site_details",
            "narrative",
        ])?;
        writer.write_record([
            report.domain.as_str(),
            report.traceroute.as_deref().unwrap_or(NOT_AVAILABLE),
            report.dns.as_deref().unwrap_or(NOT_AVAILABLE),
            &embed_json(&report.ip_lookup),
            &embed_json(&report.tech_stack),
            &embed_json(&report.infrastructure),
            &embed_json(&report.site_details),
            report.narrative.as_deref().unwrap_or(NOT_AVAILABLE),
        ])?;
        writer.flush()?;
        writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("finalizing CSV writer: {}", e))
    }

    /// Paginated PDF with one titled section per report field.
    pub fn to_pdf(&self, report: &Report) -> Result<Vec<u8>> {
        let mut pdf = PdfBuilder::new()?;

        pdf.section(
            "Site Description",
            report.narrative.as_deref().unwrap_or(NOT_AVAILABLE),
        );

        pdf.title("Basic Info");
        for (label, value) in basic_info(report) {
            pdf.body_line(&format!("{}: {}", label, value));
        }
        pdf.section_gap();

        pdf.section(
            "Traceroute",
            report.traceroute.as_deref().unwrap_or(NOT_AVAILABLE),
        );
        pdf.section("DNS Information", report.dns.as_deref().unwrap_or(NOT_AVAILABLE));
        pdf.section("IP Lookup", &embed_json(&report.ip_lookup));
        pdf.section("Tech Stack", &embed_json(&report.tech_stack));
        pdf.section("Infrastructure", &embed_json(&report.infrastructure));
        pdf.section("Site Details", &embed_json(&report.site_details));

        pdf.finish()
    }

    pub fn render(&self, report: &Report, format: ExportFormat) -> Result<Vec<u8>> {
        match format {
            ExportFormat::Json => self.to_json(report),
            ExportFormat::Csv => self.to_csv(report),
            ExportFormat::Pdf => self.to_pdf(report),
        }
    }

    /// Write the requested formats under `output_dir` and return the paths.
    pub fn export_report(
        &self,
        report: &Report,
        output_dir: &Path,
        formats: &[ExportFormat],
    ) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(output_dir)?;
        let mut exported_files = Vec::new();

        for format in formats {
            let path = output_dir.join(format.file_name());
            fs::write(&path, self.render(report, *format)?)?;
            exported_files.push(path);
        }

        Ok(exported_files)
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Structural serialization for non-string section bodies, with the uniform
/// missing-value fallback.
fn embed_json<T: Serialize>(value: &Option<T>) -> String {
    match value {
        Some(v) => serde_json::to_string_pretty(v).unwrap_or_else(|_| NOT_AVAILABLE.to_string()),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// The derived Basic Info rows; every missing value falls back to "N/A".
fn basic_info(report: &Report) -> Vec<(&'static str, String)> {
    let ip = report.ip_lookup.as_ref();
    let addresses = ip
        .and_then(|i| i.network.as_ref())
        .map(|n| n.cidr.join(", "))
        .filter(|joined| !joined.is_empty());

    vec![
        ("Domain", report.domain.clone()),
        (
            "Server",
            report
                .infrastructure
                .as_ref()
                .and_then(|i| i.server.clone())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        (
            "Address",
            ip.and_then(|i| i.asn_cidr.clone())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        (
            "Name",
            ip.and_then(|i| i.asn_description.clone())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        (
            "Addresses",
            addresses.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        ),
        ("Aliases", report.domain.clone()),
    ]
}

// printpdf measures in Mm(f32); keep the whole layout in f32.
const PAGE_WIDTH_MM: f32 = 210.0;
const PAGE_HEIGHT_MM: f32 = 297.0;
const MARGIN_MM: f32 = 15.0;
const LINE_HEIGHT_MM: f32 = 5.0;
const TITLE_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const BODY_WRAP_COLUMNS: usize = 95;

struct PdfBuilder {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    y: f32,
}

impl PdfBuilder {
    fn new() -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(
            "Website Investigation Report",
            Mm(PAGE_WIDTH_MM),
            Mm(PAGE_HEIGHT_MM),
            "Layer 1",
        );
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);

        let mut builder = Self {
            doc,
            layer,
            regular,
            bold,
            y: PAGE_HEIGHT_MM - MARGIN_MM,
        };
        builder.page_header();
        Ok(builder)
    }

    fn page_header(&mut self) {
        self.layer.use_text(
            "Website Investigation Report",
            TITLE_SIZE,
            Mm(70.0),
            Mm(self.y),
            &self.bold,
        );
        self.y -= LINE_HEIGHT_MM * 2.0;
    }

    fn ensure_room(&mut self) {
        if self.y < MARGIN_MM {
            let (page, layer) = self
                .doc
                .add_page(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), "Layer 1");
            self.layer = self.doc.get_page(page).get_layer(layer);
            self.y = PAGE_HEIGHT_MM - MARGIN_MM;
            self.page_header();
        }
    }

    fn title(&mut self, text: &str) {
        self.ensure_room();
        self.layer
            .use_text(text, TITLE_SIZE, Mm(MARGIN_MM), Mm(self.y), &self.bold);
        self.y -= LINE_HEIGHT_MM * 1.5;
    }

    fn body_line(&mut self, line: &str) {
        for wrapped in wrap_line(line, BODY_WRAP_COLUMNS) {
            self.ensure_room();
            self.layer
                .use_text(wrapped, BODY_SIZE, Mm(MARGIN_MM), Mm(self.y), &self.regular);
            self.y -= LINE_HEIGHT_MM;
        }
    }

    fn section_gap(&mut self) {
        self.y -= LINE_HEIGHT_MM;
    }

    fn section(&mut self, title: &str, body: &str) {
        self.title(title);
        for line in body.lines() {
            self.body_line(line);
        }
        if body.is_empty() {
            self.body_line(NOT_AVAILABLE);
        }
        self.section_gap();
    }

    fn finish(self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.doc.save(&mut BufWriter::new(&mut bytes))?;
        Ok(bytes)
    }
}

/// Greedy word wrap; tokens longer than the width are hard-split so no
/// content is ever dropped.
fn wrap_line(line: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in line.split_whitespace() {
        let mut chunks: Vec<String> = Vec::new();
        let mut chunk = String::new();
        for ch in word.chars() {
            if chunk.chars().count() == width {
                chunks.push(std::mem::take(&mut chunk));
            }
            chunk.push(ch);
        }
        chunks.push(chunk);

        for piece in chunks {
            let needed = if current.is_empty() {
                piece.chars().count()
            } else {
                current.chars().count() + 1 + piece.chars().count()
            };
            if needed > width && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(&piece);
        }
    }

    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{assemble, Infrastructure, IpLookup, Network, Report};

    fn empty_report() -> Report {
        assemble("example.com", None, None, None, None, None, None)
    }

    #[test]
    fn json_round_trips_and_is_idempotent() {
        let exporter = Exporter::new();
        let mut report = empty_report();
        report.narrative = Some("A bare report.".to_string());

        let first = exporter.to_json(&report).unwrap();
        let second = exporter.to_json(&report).unwrap();
        assert_eq!(first, second);

        let parsed: Report = serde_json::from_slice(&first).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn csv_renders_missing_fields_as_not_available() {
        let exporter = Exporter::new();
        let bytes = exporter.to_csv(&empty_report()).unwrap();

        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.len(), 8);
        assert_eq!(&headers[0], "domain");

        let records: Vec<_> = reader.records().collect::<Result<_, _>>().unwrap();
        assert_eq!(records.len(), 1);
        let row = &records[0];
        assert_eq!(&row[0], "example.com");
        for field in row.iter().skip(1) {
            assert_eq!(field, "N/A");
        }
    }

    #[test]
    fn csv_embeds_nested_mappings_as_json() {
        let exporter = Exporter::new();
        let mut report = empty_report();
        report.infrastructure = Some(Infrastructure {
            server: Some("nginx".to_string()),
            ..Default::default()
        });

        let bytes = exporter.to_csv(&report).unwrap();
        let mut reader = csv::Reader::from_reader(bytes.as_slice());
        let record = reader.records().next().unwrap().unwrap();
        let infra: serde_json::Value = serde_json::from_str(&record[5]).unwrap();
        assert_eq!(infra["Server"], "nginx");
    }

    #[test]
    fn pdf_export_of_empty_report_never_fails() {
        let exporter = Exporter::new();
        let bytes = exporter.to_pdf(&empty_report()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn basic_info_falls_back_per_missing_value() {
        let mut report = empty_report();
        let rows = basic_info(&report);
        assert_eq!(rows[0], ("Domain", "example.com".to_string()));
        assert_eq!(rows[2], ("Address", "N/A".to_string()));
        assert_eq!(rows[3], ("Name", "N/A".to_string()));

        report.ip_lookup = Some(IpLookup {
            asn_cidr: Some("93.184.216.0/24".to_string()),
            asn_description: Some("EDGECAST".to_string()),
            network: Some(Network {
                cidr: vec!["93.184.216.0/24".to_string()],
                ..Default::default()
            }),
            ..Default::default()
        });
        let rows = basic_info(&report);
        assert_eq!(rows[2].1, "93.184.216.0/24");
        assert_eq!(rows[4].1, "93.184.216.0/24");
    }

    #[test]
    fn wrap_line_hard_splits_long_tokens() {
        let token = "a".repeat(25);
        let wrapped = wrap_line(&token, 10);
        assert_eq!(wrapped.len(), 3);
        assert!(wrapped.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn wrap_line_preserves_short_lines() {
        assert_eq!(wrap_line("hello world", 95), vec!["hello world"]);
        assert_eq!(wrap_line("", 95), vec![""]);
    }
}
