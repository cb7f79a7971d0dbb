use crate::CalculationResult;

/// Visual sentiment of a chart bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartTone {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartDatum {
    pub label: &'static str,
    pub value: f64,
    pub tone: ChartTone,
}

/// Builds the three-bar overview: assets, liabilities, and the BNE figure.
pub fn chart_dataset(result: &CalculationResult) -> [ChartDatum; 3] {
    [
        ChartDatum {
            label: "Assets",
            value: result.total_ar + result.total_bank,
            tone: ChartTone::Positive,
        },
        ChartDatum {
            label: "Liabilities",
            value: result.total_ap + result.total_credit,
            tone: ChartTone::Negative,
        },
        ChartDatum {
            label: "Net (BNE)",
            value: result.bne,
            tone: ChartTone::Neutral,
        },
    ]
}
