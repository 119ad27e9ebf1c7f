//! Page layout of the quiz report.

use quiz_core::analytics::ReviewEntry;

use super::document::{Align, DocumentRenderer, DrawCommand, PageSize, TextStyle};
use crate::charts::RasterImage;

pub const REPORT_TITLE: &str = "Quiz Report";
pub const REVIEW_HEADING: &str = "Question Review";

const TOP: f32 = 16.0;
const MARGIN_LEFT: f32 = 14.0;
const ANSWER_INDENT: f32 = 4.0;
const CHART_GUTTER: f32 = 8.0;
const CHART_HEIGHT: f32 = 55.0;
const CHART_ADVANCE: f32 = CHART_HEIGHT + 10.0;
const CHART_PAGE_RESERVE: f32 = 30.0;
const REVIEW_PAGE_RESERVE: f32 = 20.0;
const REVIEW_LINE_HEIGHT: f32 = 4.0;
const REVIEW_BLOCK_EXTRA: f32 = 12.0;

const TITLE_STYLE: TextStyle = TextStyle::bold(18.0);
const SUMMARY_STYLE: TextStyle = TextStyle::regular(12.0);
const HEADING_STYLE: TextStyle = TextStyle::bold(14.0);
const BODY_STYLE: TextStyle = TextStyle::regular(10.0);

/// Everything that goes into one report.
#[derive(Debug, Clone, Copy)]
pub struct ReportContent<'a> {
    pub summary: [&'a str; 3],
    pub donut: &'a RasterImage,
    pub bar: &'a RasterImage,
    pub review: &'a [ReviewEntry],
}

/// Lay out the report top to bottom.
///
/// A review block is never split: if it does not fit above the bottom reserve
/// it moves whole to a new page.
#[must_use]
pub fn layout_report(content: &ReportContent<'_>, document: &dyn DocumentRenderer) -> Vec<DrawCommand> {
    let page = document.page_size();
    let mut cursor = Cursor::new();

    cursor.text(page.width / 2.0, REPORT_TITLE, TITLE_STYLE, Align::Center);
    cursor.advance(8.0);

    for (i, line) in content.summary.iter().enumerate() {
        cursor.text(MARGIN_LEFT, line, SUMMARY_STYLE, Align::Left);
        cursor.advance(if i + 1 == content.summary.len() { 10.0 } else { 6.0 });
    }

    let chart_width = chart_width(page);
    cursor.image(MARGIN_LEFT, chart_width, content.donut);
    cursor.image(MARGIN_LEFT + chart_width + CHART_GUTTER, chart_width, content.bar);
    cursor.advance(CHART_ADVANCE);
    if cursor.y > page.height - CHART_PAGE_RESERVE {
        cursor.page_break();
    }

    cursor.text(MARGIN_LEFT, REVIEW_HEADING, HEADING_STYLE, Align::Left);
    cursor.advance(6.0);

    let content_width = page.width - MARGIN_LEFT * 2.0;
    for entry in content.review {
        let lines = document.split_text(&entry.question_line(), content_width, BODY_STYLE);
        let needed = block_height(lines.len());
        // A block taller than a page starts at the top and overflows.
        if cursor.y + needed > page.height - REVIEW_PAGE_RESERVE && !cursor.at_top() {
            cursor.page_break();
        }
        for line in lines {
            cursor.text(MARGIN_LEFT, &line, BODY_STYLE, Align::Left);
            cursor.advance(REVIEW_LINE_HEIGHT);
        }
        let answer_x = MARGIN_LEFT + ANSWER_INDENT;
        cursor.text(answer_x, &entry.your_answer_line(), BODY_STYLE, Align::Left);
        cursor.advance(REVIEW_LINE_HEIGHT);
        cursor.text(answer_x, &entry.correct_answer_line(), BODY_STYLE, Align::Left);
        cursor.advance(6.0);
    }

    cursor.commands
}

/// Width of each of the two side-by-side charts.
#[must_use]
pub fn chart_width(page: PageSize) -> f32 {
    (page.width - MARGIN_LEFT * 2.0 - CHART_GUTTER) / 2.0
}

/// Vertical extent a review block reserves for `question_lines` wrapped lines.
#[must_use]
pub fn block_height(question_lines: usize) -> f32 {
    question_lines as f32 * REVIEW_LINE_HEIGHT + REVIEW_BLOCK_EXTRA
}

struct Cursor {
    y: f32,
    commands: Vec<DrawCommand>,
}

impl Cursor {
    fn new() -> Self {
        Self {
            y: TOP,
            commands: Vec::new(),
        }
    }

    fn advance(&mut self, dy: f32) {
        self.y += dy;
    }

    fn at_top(&self) -> bool {
        self.y <= TOP
    }

    fn page_break(&mut self) {
        self.commands.push(DrawCommand::PageBreak);
        self.y = TOP;
    }

    fn text(&mut self, x: f32, text: &str, style: TextStyle, align: Align) {
        self.commands.push(DrawCommand::Text {
            x,
            y: self.y,
            text: text.to_string(),
            style,
            align,
        });
    }

    fn image(&mut self, x: f32, width: f32, image: &RasterImage) {
        self.commands.push(DrawCommand::Image {
            x,
            y: self.y,
            width,
            height: CHART_HEIGHT,
            image: image.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ReportError;
    use quiz_core::analytics::ReviewStatus;

    /// Wraps every `chars_per_line` characters.
    struct FixedWidthDocument {
        chars_per_line: usize,
    }

    impl DocumentRenderer for FixedWidthDocument {
        fn page_size(&self) -> PageSize {
            PageSize::A4_PORTRAIT
        }

        fn split_text(&self, text: &str, _max_width: f32, _style: TextStyle) -> Vec<String> {
            let chars: Vec<char> = text.chars().collect();
            chars
                .chunks(self.chars_per_line)
                .map(|chunk| chunk.iter().collect())
                .collect()
        }

        fn render(&self, _commands: &[DrawCommand]) -> Result<Vec<u8>, ReportError> {
            Ok(Vec::new())
        }
    }

    fn entry(number: usize, question: String) -> ReviewEntry {
        ReviewEntry {
            number,
            question,
            status: ReviewStatus::Correct,
            your_answer: "yes".into(),
            correct_answer: "yes".into(),
        }
    }

    fn image() -> RasterImage {
        RasterImage::from_png(vec![0x89, b'P', b'N', b'G'], 4, 4)
    }

    fn pages(commands: &[DrawCommand]) -> Vec<Vec<&DrawCommand>> {
        let mut pages = vec![Vec::new()];
        for command in commands {
            match command {
                DrawCommand::PageBreak => pages.push(Vec::new()),
                other => pages.last_mut().unwrap().push(other),
            }
        }
        pages
    }

    fn texts<'a>(page: &[&'a DrawCommand]) -> Vec<(&'a str, f32)> {
        page.iter()
            .filter_map(|command| match command {
                DrawCommand::Text { text, y, .. } => Some((text.as_str(), *y)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn first_page_has_title_summary_and_charts() {
        let donut = image();
        let bar = image();
        let review = vec![entry(1, "Short?".into())];
        let content = ReportContent {
            summary: ["You scored 1 out of 1 (100.00%).", "Time taken: 0 min 5 sec", "Accuracy: 100.00%."],
            donut: &donut,
            bar: &bar,
            review: &review,
        };
        let document = FixedWidthDocument { chars_per_line: 80 };

        let commands = layout_report(&content, &document);

        assert!(matches!(
            &commands[0],
            DrawCommand::Text { text, align: Align::Center, y, .. } if text == REPORT_TITLE && *y == 16.0
        ));
        let first = texts(&pages(&commands)[0]);
        assert_eq!(first[1], ("You scored 1 out of 1 (100.00%).", 24.0));
        assert_eq!(first[3], ("Accuracy: 100.00%.", 36.0));
        assert_eq!(first[4], (REVIEW_HEADING, 111.0));
        assert_eq!(first[5], ("1. Short?", 117.0));

        let images: Vec<_> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Image { x, y, width, height, .. } => Some((*x, *y, *width, *height)),
                _ => None,
            })
            .collect();
        assert_eq!(images, vec![(14.0, 46.0, 87.0, 55.0), (109.0, 46.0, 87.0, 55.0)]);
    }

    #[test]
    fn long_review_paginates_without_splitting_blocks() {
        let donut = image();
        let bar = image();
        // Question lengths vary so blocks wrap to 1..=4 lines.
        let review: Vec<_> = (1..=60)
            .map(|n| entry(n, "x".repeat((n % 4) * 30 + 5)))
            .collect();
        let content = ReportContent {
            summary: ["a", "b", "c"],
            donut: &donut,
            bar: &bar,
            review: &review,
        };
        let document = FixedWidthDocument { chars_per_line: 40 };
        let height = PageSize::A4_PORTRAIT.height;

        let commands = layout_report(&content, &document);
        let pages = pages(&commands);
        assert!(pages.len() > 2);

        let mut seen = 0;
        for page in &pages {
            let texts = texts(page);
            for (text, y) in &texts {
                assert!(*y <= height - REVIEW_PAGE_RESERVE, "{text} at {y}");
            }
            // Every block that starts on this page ends on it.
            let starts = texts.iter().filter(|(t, _)| t.contains(". x")).count();
            let ends = texts.iter().filter(|(t, _)| t.starts_with("Correct answer:")).count();
            assert_eq!(starts, ends);
            seen += ends;
        }
        assert_eq!(seen, 60);
    }

    #[test]
    fn oversized_block_does_not_leave_a_blank_page() {
        let donut = image();
        let bar = image();
        // 80 wrapped lines need more than a whole page.
        let review = vec![entry(1, "x".repeat(800)), entry(2, "x".repeat(800))];
        let content = ReportContent {
            summary: ["a", "b", "c"],
            donut: &donut,
            bar: &bar,
            review: &review,
        };
        let document = FixedWidthDocument { chars_per_line: 10 };

        let commands = layout_report(&content, &document);
        let pages = pages(&commands);

        assert_eq!(pages.len(), 3);
        for page in &pages {
            assert!(!texts(page).is_empty(), "blank page in {pages:?}");
        }
        let second = texts(&pages[2]);
        assert_eq!(second[0], ("2. xxxxxxx", TOP));
    }

    #[test]
    fn block_height_counts_wrapped_lines() {
        assert_eq!(block_height(1), 16.0);
        assert_eq!(block_height(3), 24.0);
        assert_eq!(chart_width(PageSize::A4_PORTRAIT), 87.0);
    }
}
