//! PDF report rendering.
//!
//! Lays the SMART records and the ikigai reflection out on A4 pages using
//! the builtin Helvetica family, so no font assets ship with the binary.
//! Provider text is Markdown-flavored; it is flattened to plain text before
//! layout.

use std::sync::OnceLock;

use chrono::{Datelike, Local};
use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use regex::Regex;

use goalsmith_core::{GoalsmithError, IkigaiRecord, Result, SmartRecord};

const PAGE_WIDTH: f32 = 210.0;
const PAGE_HEIGHT: f32 = 297.0;
const MARGIN: f32 = 18.0;
const LINE_HEIGHT: f32 = 5.2;

const TITLE_SIZE: f32 = 20.0;
const HEADING_SIZE: f32 = 13.0;
const GOAL_SIZE: f32 = 12.0;
const BODY_SIZE: f32 = 10.0;
const SMALL_SIZE: f32 = 8.5;

// Helvetica at body size fits about this many characters between the margins.
const WRAP_COLUMNS: usize = 92;

// ---------------------------------------------------------------------------
// ReportWriter
// ---------------------------------------------------------------------------

#[derive(Clone, Copy)]
enum Face {
    Regular,
    Bold,
    Oblique,
}

/// Cursor-style writer: tracks the current page, layer and vertical
/// position, breaking pages as text runs out of room.
struct ReportWriter {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    oblique: IndirectFontRef,
    y: f32,
}

fn pdf_err(err: printpdf::Error) -> GoalsmithError {
    GoalsmithError::Pdf(err.to_string())
}

impl ReportWriter {
    fn new(title: &str) -> Result<Self> {
        let (doc, page, layer) =
            PdfDocument::new(title, Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "page 1");
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(pdf_err)?;
        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(pdf_err)?;
        let oblique = doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(pdf_err)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            oblique,
            y: PAGE_HEIGHT - MARGIN,
        })
    }

    fn break_page(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_WIDTH), Mm(PAGE_HEIGHT), "page");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT - MARGIN;
    }

    fn ensure_room(&mut self, lines: usize) {
        if self.y - lines as f32 * LINE_HEIGHT < MARGIN {
            self.break_page();
        }
    }

    fn write_line(&mut self, text: &str, size: f32, face: Face) {
        self.ensure_room(1);
        let font = match face {
            Face::Regular => &self.regular,
            Face::Bold => &self.bold,
            Face::Oblique => &self.oblique,
        };
        self.layer.use_text(text, size, Mm(MARGIN), Mm(self.y), font);
        self.y -= LINE_HEIGHT * (size / BODY_SIZE).max(1.0);
    }

    fn write_wrapped(&mut self, text: &str, size: f32, face: Face) {
        for line in wrap(text, WRAP_COLUMNS) {
            self.write_line(&line, size, face);
        }
    }

    fn gap(&mut self, mm: f32) {
        self.y -= mm;
        if self.y < MARGIN {
            self.break_page();
        }
    }

    fn finish(self) -> Result<Vec<u8>> {
        self.doc.save_to_bytes().map_err(pdf_err)
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Render the full report. At least one of the two inputs is expected to
/// carry content; the route layer enforces that.
pub fn render_report(
    objectives: &[SmartRecord],
    ikigai: Option<&IkigaiRecord>,
) -> Result<Vec<u8>> {
    let now = Local::now();
    let mut w = ReportWriter::new("Goalsmith Report")?;

    w.write_line("Goalsmith", TITLE_SIZE, Face::Bold);
    w.gap(2.0);
    w.write_line(
        &format!("My Objectives for {}", now.year()),
        HEADING_SIZE,
        Face::Bold,
    );
    w.write_line(
        &format!("Generated on {}", now.format("%d/%m/%Y %H:%M")),
        SMALL_SIZE,
        Face::Oblique,
    );
    w.gap(5.0);

    if !objectives.is_empty() {
        let total = objectives.len();
        w.write_line(
            &format!("SMART Objectives ({total} processed individually)"),
            HEADING_SIZE,
            Face::Bold,
        );
        w.gap(3.0);

        for (index, record) in objectives.iter().enumerate() {
            // One objective per page keeps each analysis readable.
            if index > 0 {
                w.break_page();
            }
            render_objective(&mut w, record, index == 0, total);
        }
    }

    if let Some(record) = ikigai.filter(|record| record.has_content()) {
        if !objectives.is_empty() {
            w.break_page();
        }
        render_ikigai(&mut w, record);
    }

    w.gap(6.0);
    w.write_line("Generated by Goalsmith", SMALL_SIZE, Face::Oblique);
    w.finish()
}

fn render_objective(w: &mut ReportWriter, record: &SmartRecord, first: bool, total: usize) {
    let mut header = format!("OBJECTIVE #{} / {}", record.objective_id, total);
    if first {
        header.push_str("  (priority)");
    }
    w.write_line(&header, HEADING_SIZE, Face::Bold);
    w.gap(1.5);

    w.write_wrapped(&clean_text(&record.smart.goal), GOAL_SIZE, Face::Bold);

    let original = record.original_text.trim();
    if !original.is_empty() && original != record.smart.goal.trim() {
        w.write_wrapped(
            &format!("Original objective: \"{}\"", clean_text(original)),
            SMALL_SIZE,
            Face::Oblique,
        );
    }
    w.gap(2.5);

    for (label, value) in [
        ("S - Specific", &record.smart.specific),
        ("M - Measurable", &record.smart.measurable),
        ("A - Achievable", &record.smart.achievable),
        ("R - Relevant", &record.smart.relevant),
        ("T - Time-bound", &record.smart.time_bound),
    ] {
        w.write_line(label, BODY_SIZE, Face::Bold);
        w.write_wrapped(&clean_text(value), BODY_SIZE, Face::Regular);
        w.gap(1.5);
    }

    w.gap(1.5);
    w.write_line(
        &format!("Analysis of objective #{}", record.objective_id),
        BODY_SIZE,
        Face::Bold,
    );
    w.write_wrapped(&clean_text(&record.smart.analysis), BODY_SIZE, Face::Regular);
}

fn render_ikigai(w: &mut ReportWriter, record: &IkigaiRecord) {
    w.write_line("My Ikigai", HEADING_SIZE, Face::Bold);
    w.gap(2.5);

    for (label, value) in [
        ("What I love", &record.answers.what_you_love),
        ("What I am good at", &record.answers.what_you_are_good_at),
        ("What the world needs", &record.answers.what_world_needs),
        ("What I can be paid for", &record.answers.what_you_can_be_paid_for),
    ] {
        w.write_line(label, BODY_SIZE, Face::Bold);
        let cleaned = clean_text(value);
        if cleaned.is_empty() {
            w.write_line("Not provided", BODY_SIZE, Face::Oblique);
        } else {
            w.write_wrapped(&cleaned, BODY_SIZE, Face::Regular);
        }
        w.gap(1.5);
    }

    if !record.analysis.trim().is_empty() {
        w.gap(1.5);
        w.write_line("Ikigai analysis", BODY_SIZE, Face::Bold);
        w.write_wrapped(&clean_text(&record.analysis), BODY_SIZE, Face::Regular);
    }
}

// ---------------------------------------------------------------------------
// Text preparation
// ---------------------------------------------------------------------------

/// Flatten Markdown-flavored provider text to plain text for layout:
/// code fences, emphasis markers, headings, inline code and list markers
/// all go, control characters are dropped, whitespace is collapsed.
pub fn clean_text(text: &str) -> String {
    struct Cleaners {
        code_block: Regex,
        fence: Regex,
        bold: Regex,
        bold_alt: Regex,
        italic: Regex,
        italic_alt: Regex,
        heading: Regex,
        inline_code: Regex,
        bullet: Regex,
        numbered: Regex,
        spaces: Regex,
        blank_lines: Regex,
    }

    static CLEANERS: OnceLock<Cleaners> = OnceLock::new();
    let c = CLEANERS.get_or_init(|| Cleaners {
        code_block: Regex::new(r"(?s)```\w*\n.*?```").expect("valid regex"),
        fence: Regex::new(r"```").expect("valid regex"),
        bold: Regex::new(r"\*\*(.+?)\*\*").expect("valid regex"),
        bold_alt: Regex::new(r"__(.+?)__").expect("valid regex"),
        italic: Regex::new(r"\*(.+?)\*").expect("valid regex"),
        italic_alt: Regex::new(r"_(.+?)_").expect("valid regex"),
        heading: Regex::new(r"(?m)^#+\s*").expect("valid regex"),
        inline_code: Regex::new(r"`(.+?)`").expect("valid regex"),
        bullet: Regex::new(r"(?m)^\s*[-*+]\s+").expect("valid regex"),
        numbered: Regex::new(r"(?m)^\s*\d+\.\s+").expect("valid regex"),
        spaces: Regex::new(r" +").expect("valid regex"),
        blank_lines: Regex::new(r"\n{3,}").expect("valid regex"),
    });

    let kept: String = text
        .chars()
        .filter(|ch| *ch == '\n' || *ch == '\t' || *ch >= ' ')
        .collect();
    let kept = kept.replace("\r\n", "\n").replace('\r', "\n");

    let pass = c.code_block.replace_all(&kept, "");
    let pass = c.fence.replace_all(&pass, "");
    let pass = c.bold.replace_all(&pass, "$1");
    let pass = c.bold_alt.replace_all(&pass, "$1");
    let pass = c.italic.replace_all(&pass, "$1");
    let pass = c.italic_alt.replace_all(&pass, "$1");
    let pass = c.heading.replace_all(&pass, "");
    let pass = c.inline_code.replace_all(&pass, "$1");
    let pass = c.bullet.replace_all(&pass, "");
    let pass = c.numbered.replace_all(&pass, "");
    let pass = c.spaces.replace_all(&pass, " ");
    let pass = c.blank_lines.replace_all(&pass, "\n\n");

    pass.trim().to_string()
}

/// Greedy word wrap by character count, preserving explicit newlines.
fn wrap(text: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for source in text.split('\n') {
        if source.trim().is_empty() {
            lines.push(String::new());
            continue;
        }
        let mut current = String::new();
        for word in source.split_whitespace() {
            if current.is_empty() {
                current = word.to_string();
            } else if current.chars().count() + 1 + word.chars().count() <= columns {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(current);
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use goalsmith_core::{IkigaiAnswers, SmartFields};

    fn record(id: usize) -> SmartRecord {
        SmartRecord {
            objective_id: id,
            original_text: format!("objective {id}"),
            smart: SmartFields {
                goal: format!("Objective {id} restated with clarity"),
                specific: "A concrete plan with the actions spelled out.".into(),
                measurable: "Tracked weekly with explicit numbers.".into(),
                achievable: "Resources and time are already available.".into(),
                relevant: "Aligned with this person's priorities.".into(),
                time_bound: "Finished by mid-December with checkpoints.".into(),
                analysis: "A solid objective with a clear cadence and realistic scope.".into(),
            },
        }
    }

    #[test]
    fn clean_text_strips_markdown() {
        let input = "## Heading\n\n**bold** and *italic* and `code`\n- bullet one\n1. numbered";
        let out = clean_text(input);
        assert!(!out.contains('#'));
        assert!(!out.contains('*'));
        assert!(!out.contains('`'));
        assert!(out.contains("Heading"));
        assert!(out.contains("bold and italic and code"));
        assert!(out.contains("bullet one"));
        assert!(out.contains("numbered"));
    }

    #[test]
    fn clean_text_drops_code_blocks_and_control_chars() {
        let input = "before\n```json\n{\"a\": 1}\n```\nafter\u{0000}\u{0007}";
        let out = clean_text(input);
        assert!(out.contains("before"));
        assert!(out.contains("after"));
        assert!(!out.contains("{\"a\": 1}"));
        assert!(!out.contains('\u{0000}'));
    }

    #[test]
    fn clean_text_collapses_whitespace() {
        let out = clean_text("a    b\n\n\n\n\nc");
        assert_eq!(out, "a b\n\nc");
    }

    #[test]
    fn wrap_respects_column_limit() {
        let text = "one two three four five six seven eight nine ten";
        for line in wrap(text, 12) {
            assert!(line.chars().count() <= 12, "line too long: {line:?}");
        }
    }

    #[test]
    fn wrap_keeps_overlong_words_whole() {
        let lines = wrap("supercalifragilisticexpialidocious ok", 10);
        assert_eq!(lines[0], "supercalifragilisticexpialidocious");
        assert_eq!(lines[1], "ok");
    }

    #[test]
    fn wrap_preserves_paragraph_breaks() {
        let lines = wrap("first\n\nsecond", 80);
        assert_eq!(lines, vec!["first".to_string(), String::new(), "second".to_string()]);
    }

    #[test]
    fn render_report_produces_pdf_bytes() {
        let bytes = render_report(&[record(1), record(2)], None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 500);
    }

    #[test]
    fn render_report_with_ikigai_only() {
        let ikigai = IkigaiRecord {
            answers: IkigaiAnswers {
                what_you_love: "music".into(),
                ..Default::default()
            },
            analysis: "## Your Ikigai\n\nMusic is the thread.".into(),
        };
        let bytes = render_report(&[], Some(&ikigai)).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn render_report_with_many_objectives_spans_pages() {
        let records: Vec<SmartRecord> = (1..=6).map(record).collect();
        let bytes = render_report(&records, None).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
