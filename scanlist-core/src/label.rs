//! Label statistics derived from a symbol's breakout list.
//!
//! Every breakout may carry a `labels` map (e.g. `{"ret_20d": 0.12}`). One
//! label key is picked per symbol and summarised four ways; the panel shows
//! whichever summary the current [`LabelMode`] names in its `label` column.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which label summary feeds the `label` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelMode {
    #[default]
    Avg,
    Max,
    BestQuality,
    Latest,
}

impl LabelMode {
    pub const ALL: [LabelMode; 4] = [
        LabelMode::Avg,
        LabelMode::Max,
        LabelMode::BestQuality,
        LabelMode::Latest,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LabelMode::Avg => "avg",
            LabelMode::Max => "max",
            LabelMode::BestQuality => "best_quality",
            LabelMode::Latest => "latest",
        }
    }

    pub fn next(self) -> LabelMode {
        match self {
            LabelMode::Avg => LabelMode::Max,
            LabelMode::Max => LabelMode::BestQuality,
            LabelMode::BestQuality => LabelMode::Latest,
            LabelMode::Latest => LabelMode::Avg,
        }
    }
}

impl fmt::Display for LabelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        LabelMode::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| format!("unknown label mode '{s}' (expected avg, max, best_quality or latest)"))
    }
}

/// The four label summaries for one symbol. Any of them may be undefined.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelStats {
    /// Canonical label key: first key of the first non-empty `labels` map.
    pub key: Option<String>,
    pub avg: Option<f64>,
    pub max: Option<f64>,
    pub best_quality: Option<f64>,
    pub latest: Option<f64>,
}

impl LabelStats {
    pub fn from_breakouts(breakouts: &[Value]) -> Self {
        let Some(key) = breakouts.iter().find_map(first_label_key) else {
            return Self::default();
        };

        let values: Vec<f64> = breakouts
            .iter()
            .filter_map(|bo| label_value(bo, &key))
            .collect();

        let avg = if values.is_empty() {
            None
        } else {
            Some(values.iter().sum::<f64>() / values.len() as f64)
        };
        let max = values.iter().copied().reduce(f64::max);

        let best_quality = first_max_by(breakouts, |a, b| quality_score(a) > quality_score(b))
            .and_then(|bo| label_value(bo, &key));
        // Raw string comparison on purpose: dates are ISO strings in scan output.
        let latest = first_max_by(breakouts, |a, b| breakout_date(a) > breakout_date(b))
            .and_then(|bo| label_value(bo, &key));

        Self {
            key: Some(key),
            avg,
            max,
            best_quality,
            latest,
        }
    }

    pub fn get(&self, mode: LabelMode) -> Option<f64> {
        match mode {
            LabelMode::Avg => self.avg,
            LabelMode::Max => self.max,
            LabelMode::BestQuality => self.best_quality,
            LabelMode::Latest => self.latest,
        }
    }
}

fn first_label_key(breakout: &Value) -> Option<String> {
    breakout
        .get("labels")
        .and_then(Value::as_object)
        .and_then(|labels| labels.keys().next().cloned())
}

fn label_value(breakout: &Value, key: &str) -> Option<f64> {
    breakout
        .get("labels")
        .and_then(|labels| labels.get(key))
        .and_then(Value::as_f64)
}

/// `quality_score`, with missing or null treated as zero.
pub fn quality_score(breakout: &Value) -> f64 {
    breakout
        .get("quality_score")
        .and_then(Value::as_f64)
        .unwrap_or(0.0)
}

fn breakout_date(breakout: &Value) -> &str {
    breakout.get("date").and_then(Value::as_str).unwrap_or("")
}

/// First element that no later element beats (ties keep the earliest).
fn first_max_by<'a>(items: &'a [Value], beats: impl Fn(&Value, &Value) -> bool) -> Option<&'a Value> {
    let mut best: Option<&Value> = None;
    for item in items {
        match best {
            Some(current) if !beats(item, current) => {}
            _ => best = Some(item),
        }
    }
    best
}
