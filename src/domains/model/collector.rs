use super::lifecycle::Model;
use crate::domains::entity::Agent;
use std::collections::BTreeMap;
use std::fmt;

type Reporter<A> = Box<dyn Fn(&Model<A>) -> f64>;

/// Builds per-step time series from model-level reporters.
///
/// Call `collect` once per completed step, after the step's metrics are final.
pub struct DataCollector<A: Agent> {
    reporters: Vec<(String, Reporter<A>)>,
    series: BTreeMap<String, Vec<f64>>,
    collections: usize,
}

impl<A: Agent> fmt::Debug for DataCollector<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataCollector")
            .field("reporters", &self.reporters.iter().map(|(n, _)| n).collect::<Vec<_>>())
            .field("collections", &self.collections)
            .finish()
    }
}

impl<A: Agent> Default for DataCollector<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Agent> DataCollector<A> {
    pub fn new() -> Self {
        Self {
            reporters: Vec::new(),
            series: BTreeMap::new(),
            collections: 0,
        }
    }

    pub fn with_model_reporter<F>(mut self, name: impl Into<String>, reporter: F) -> Self
    where
        F: Fn(&Model<A>) -> f64 + 'static,
    {
        let name = name.into();
        self.series.entry(name.clone()).or_default();
        self.reporters.push((name, Box::new(reporter)));
        self
    }

    pub fn collect(&mut self, model: &Model<A>) {
        for (name, reporter) in &self.reporters {
            self.series.entry(name.clone()).or_default().push(reporter(model));
        }
        self.collections += 1;
    }

    pub fn series(&self, name: &str) -> Option<&[f64]> {
        self.series.get(name).map(Vec::as_slice)
    }

    pub fn collections(&self) -> usize {
        self.collections
    }

    /// `{ reporter: [values...] }`, one entry per reporter.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!(self.series)
    }
}
