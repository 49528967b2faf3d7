//! Dashboard state and render functions.
//!
//! All mutable dashboard state (selected symbols, live charts) lives in one
//! [`DashboardState`] value that callers own and pass into the render
//! functions. Charts are created and destroyed in pairs: either explicitly
//! through [`DashboardState::mount_chart`]/[`DashboardState::unmount_chart`],
//! or by a [`ChartScope`] that destroys what it mounted when dropped.

use std::collections::{BTreeMap, HashMap};
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    sanitize_with, AnalysisReport, ForecastChart, Prediction, PredictionSummary, RenderOptions,
    SanitizeConfig, Symbol, UtcDateTime,
};

/// Handle of a mounted chart. Ids are never reused within one state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChartId(u64);

impl Display for ChartId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "chart-{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct MountedChart {
    symbol: Symbol,
    chart: ForecastChart,
}

#[derive(Debug, Default)]
pub struct DashboardState {
    symbols: Vec<Symbol>,
    charts: BTreeMap<ChartId, MountedChart>,
    by_symbol: HashMap<Symbol, ChartId>,
    next_id: u64,
}

impl DashboardState {
    pub fn new(symbols: Vec<Symbol>) -> Self {
        Self {
            symbols,
            ..Self::default()
        }
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn is_selected(&self, symbol: &Symbol) -> bool {
        self.symbols.contains(symbol)
    }

    /// Replace the selection, destroying charts of deselected symbols.
    pub fn select(&mut self, symbols: Vec<Symbol>) {
        self.symbols = symbols;
        let stale: Vec<ChartId> = self
            .charts
            .iter()
            .filter(|(_, mounted)| !self.symbols.contains(&mounted.symbol))
            .map(|(id, _)| *id)
            .collect();
        for id in stale {
            self.unmount_chart(id);
        }
    }

    /// Mount a chart for `symbol`, destroying the chart it replaces.
    pub fn mount_chart(&mut self, symbol: Symbol, chart: ForecastChart) -> ChartId {
        if let Some(previous) = self.by_symbol.get(&symbol).copied() {
            self.unmount_chart(previous);
        }

        self.next_id += 1;
        let id = ChartId(self.next_id);
        self.by_symbol.insert(symbol.clone(), id);
        self.charts.insert(id, MountedChart { symbol, chart });
        id
    }

    pub fn unmount_chart(&mut self, id: ChartId) -> Option<ForecastChart> {
        let mounted = self.charts.remove(&id)?;
        if self.by_symbol.get(&mounted.symbol) == Some(&id) {
            self.by_symbol.remove(&mounted.symbol);
        }
        debug!(%id, symbol = %mounted.symbol, "destroyed chart");
        Some(mounted.chart)
    }

    /// Destroy every mounted chart and return how many there were.
    pub fn clear_charts(&mut self) -> usize {
        let count = self.charts.len();
        self.charts.clear();
        self.by_symbol.clear();
        count
    }

    pub fn chart(&self, id: ChartId) -> Option<&ForecastChart> {
        self.charts.get(&id).map(|mounted| &mounted.chart)
    }

    pub fn chart_for(&self, symbol: &Symbol) -> Option<ChartId> {
        self.by_symbol.get(symbol).copied()
    }

    pub fn chart_count(&self) -> usize {
        self.charts.len()
    }

    /// Open a scope whose charts are destroyed when it is dropped.
    pub fn scope(&mut self) -> ChartScope<'_> {
        ChartScope {
            state: self,
            mounted: Vec::new(),
        }
    }
}

/// Scoped chart acquisition; see [`DashboardState::scope`].
pub struct ChartScope<'a> {
    state: &'a mut DashboardState,
    mounted: Vec<ChartId>,
}

impl ChartScope<'_> {
    pub fn mount(&mut self, symbol: Symbol, chart: ForecastChart) -> ChartId {
        let id = self.state.mount_chart(symbol, chart);
        self.mounted.push(id);
        id
    }

    pub fn state(&self) -> &DashboardState {
        self.state
    }

    /// Keep the scope's charts alive past the scope.
    pub fn persist(mut self) -> Vec<ChartId> {
        std::mem::take(&mut self.mounted)
    }
}

impl Drop for ChartScope<'_> {
    fn drop(&mut self) {
        for id in self.mounted.drain(..) {
            self.state.unmount_chart(id);
        }
    }
}

/// One prediction card: the sanitized summary and its chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionCard {
    pub symbol: Symbol,
    pub chart_id: ChartId,
    pub trend_icon: &'static str,
    pub change_label: String,
    pub summary: PredictionSummary,
}

/// Sanitize each selected prediction, mount its chart and build its card.
///
/// Predictions for symbols outside the selection are skipped.
pub fn render_predictions(
    state: &mut DashboardState,
    predictions: &[Prediction],
    config: &SanitizeConfig,
) -> Vec<PredictionCard> {
    predictions
        .iter()
        .filter_map(|prediction| render_prediction(state, prediction, config))
        .collect()
}

/// Card for one prediction, mounting its chart; `None` when the symbol is
/// not selected.
pub fn render_prediction(
    state: &mut DashboardState,
    prediction: &Prediction,
    config: &SanitizeConfig,
) -> Option<PredictionCard> {
    if !state.is_selected(&prediction.symbol) {
        debug!(symbol = %prediction.symbol, "skipping unselected prediction");
        return None;
    }

    let summary = sanitize_with(prediction, config);
    let chart = ForecastChart::from_summary(&summary);
    let chart_id = state.mount_chart(prediction.symbol.clone(), chart);

    Some(PredictionCard {
        symbol: prediction.symbol.clone(),
        chart_id,
        trend_icon: summary.trend.icon(),
        change_label: format!("{:+.2}%", summary.percent_change),
        summary,
    })
}

/// Rendered report panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportPanel {
    pub html: String,
    pub assets_analyzed: Vec<Symbol>,
    pub time_horizon: String,
    pub timestamp: UtcDateTime,
}

pub fn render_report(report: &AnalysisReport, options: &RenderOptions) -> ReportPanel {
    ReportPanel {
        html: report.to_html_with(options),
        assets_analyzed: report.assets_analyzed.clone(),
        time_horizon: report.time_horizon.clone(),
        timestamp: report.timestamp,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{sanitize, ForecastPoint};

    fn symbol(raw: &str) -> Symbol {
        Symbol::parse(raw).expect("valid symbol")
    }

    fn chart_for(raw: &str) -> ForecastChart {
        let prediction = Prediction::new(
            symbol(raw),
            10.0,
            vec![ForecastPoint::new(0, 11.0, 10.0, 12.0)],
        );
        ForecastChart::from_summary(&sanitize(&prediction))
    }

    #[test]
    fn remounting_a_symbol_destroys_previous_chart() {
        let mut state = DashboardState::new(vec![symbol("AAPL")]);

        let first = state.mount_chart(symbol("AAPL"), chart_for("AAPL"));
        let second = state.mount_chart(symbol("AAPL"), chart_for("AAPL"));

        assert_ne!(first, second);
        assert_eq!(state.chart_count(), 1);
        assert!(state.chart(first).is_none());
        assert_eq!(state.chart_for(&symbol("AAPL")), Some(second));
    }

    #[test]
    fn scope_destroys_its_charts_on_drop() {
        let mut state = DashboardState::new(vec![symbol("AAPL"), symbol("MSFT")]);
        let outside = state.mount_chart(symbol("AAPL"), chart_for("AAPL"));

        {
            let mut scope = state.scope();
            scope.mount(symbol("MSFT"), chart_for("MSFT"));
            assert_eq!(scope.state().chart_count(), 2);
        }

        assert_eq!(state.chart_count(), 1);
        assert!(state.chart(outside).is_some());
    }

    #[test]
    fn persisted_scope_keeps_charts() {
        let mut state = DashboardState::new(vec![symbol("TSLA")]);
        let kept = {
            let mut scope = state.scope();
            scope.mount(symbol("TSLA"), chart_for("TSLA"));
            scope.persist()
        };

        assert_eq!(kept.len(), 1);
        assert!(state.chart(kept[0]).is_some());
    }

    #[test]
    fn deselecting_destroys_charts() {
        let mut state = DashboardState::new(vec![symbol("AAPL"), symbol("MSFT")]);
        state.mount_chart(symbol("AAPL"), chart_for("AAPL"));
        let msft = state.mount_chart(symbol("MSFT"), chart_for("MSFT"));

        state.select(vec![symbol("MSFT")]);

        assert_eq!(state.chart_count(), 1);
        assert_eq!(state.chart_for(&symbol("AAPL")), None);
        assert!(state.chart(msft).is_some());
    }

    #[test]
    fn render_skips_unselected_predictions() {
        let mut state = DashboardState::new(vec![symbol("AAPL")]);
        let predictions = vec![
            Prediction::new(symbol("AAPL"), 100.0, vec![ForecastPoint::new(0, 90.0, 85.0, 95.0)]),
            Prediction::new(symbol("AMZN"), 100.0, vec![ForecastPoint::new(0, 110.0, 105.0, 115.0)]),
        ];

        let cards = render_predictions(&mut state, &predictions, &SanitizeConfig::default());

        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].symbol.as_str(), "AAPL");
        assert_eq!(cards[0].trend_icon, "trending-down");
        assert_eq!(cards[0].change_label, "-10.00%");
        assert_eq!(state.chart_for(&symbol("AAPL")), Some(cards[0].chart_id));
    }

    #[test]
    fn clear_charts_reports_count() {
        let mut state = DashboardState::new(vec![symbol("AAPL"), symbol("MSFT")]);
        state.mount_chart(symbol("AAPL"), chart_for("AAPL"));
        state.mount_chart(symbol("MSFT"), chart_for("MSFT"));

        assert_eq!(state.clear_charts(), 2);
        assert_eq!(state.chart_count(), 0);
    }
}
