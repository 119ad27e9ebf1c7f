//! Chart payloads shared by the donut and bar views.
//!
//! Both views draw the same [`ChartDataset`]; only [`ChartKind`] and
//! [`ChartStyle`] differ.

pub const CHART_LABELS: [&str; 2] = ["Correct", "Wrong"];

/// Correct-vs-wrong counts. Derived from a score, never edited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartDataset {
    correct: u32,
    wrong: u32,
}

impl ChartDataset {
    #[must_use]
    pub fn new(correct: u32, wrong: u32) -> Self {
        Self { correct, wrong }
    }

    #[must_use]
    pub fn labels(&self) -> [&'static str; 2] {
        CHART_LABELS
    }

    #[must_use]
    pub fn values(&self) -> [u32; 2] {
        [self.correct, self.wrong]
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.correct.saturating_add(self.wrong)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartKind {
    /// Donut: share of correct vs wrong.
    Proportional,
    /// Bar: absolute counts.
    Magnitude,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    #[must_use]
    pub fn to_array(self) -> [u8; 3] {
        [self.0, self.1, self.2]
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Series colours, in label order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartStyle {
    pub series: [Rgb; 2],
    pub background: Rgb,
}

impl ChartStyle {
    #[must_use]
    pub fn for_kind(kind: ChartKind) -> Self {
        let series = match kind {
            ChartKind::Proportional => [Rgb(0x22, 0xc5, 0x5e), Rgb(0xf9, 0x73, 0x73)],
            ChartKind::Magnitude => [Rgb(0x4f, 0x46, 0xe5), Rgb(0x63, 0x66, 0xf1)],
        };
        Self {
            series,
            background: Rgb(0xff, 0xff, 0xff),
        }
    }
}

/// Everything a chart renderer needs to draw one view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSpec {
    pub dataset: ChartDataset,
    pub kind: ChartKind,
    pub style: ChartStyle,
}

impl ChartSpec {
    #[must_use]
    pub fn new(dataset: ChartDataset, kind: ChartKind) -> Self {
        Self {
            dataset,
            kind,
            style: ChartStyle::for_kind(kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn both_views_share_one_dataset() {
        let dataset = ChartDataset::new(7, 3);
        let donut = ChartSpec::new(dataset, ChartKind::Proportional);
        let bar = ChartSpec::new(dataset, ChartKind::Magnitude);
        assert_eq!(donut.dataset, bar.dataset);
        assert_eq!(donut.dataset.values(), [7, 3]);
        assert_ne!(donut.style, bar.style);
    }

    #[test]
    fn hex_round_trips_palette() {
        let style = ChartStyle::for_kind(ChartKind::Proportional);
        assert_eq!(style.series[0].to_hex(), "#22c55e");
    }
}
