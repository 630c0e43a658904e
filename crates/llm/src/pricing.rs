//! Cost estimation and the usage footer.
//!
//! Rates are dollars per million tokens. The defaults are a snapshot and
//! go stale; hosts can override them from config.

use crate::{ProviderKind, Usage};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-provider dollar rates (per million tokens).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rates {
    /// Dollars per million input tokens.
    pub input_per_mtok: f64,
    /// Dollars per million output tokens.
    pub output_per_mtok: f64,
}

impl Rates {
    /// Estimate the dollar cost for the given usage.
    pub fn cost(&self, usage: &Usage) -> f64 {
        let input = usage.input_tokens as f64 * self.input_per_mtok;
        let output = usage.output_tokens as f64 * self.output_per_mtok;
        (input + output) / 1_000_000.0
    }
}

/// Rate table keyed by provider, with overridable defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceTable {
    rates: BTreeMap<ProviderKind, Rates>,
}

impl Default for PriceTable {
    fn default() -> Self {
        let mut rates = BTreeMap::new();
        rates.insert(
            ProviderKind::Grok,
            Rates {
                input_per_mtok: 3.0,
                output_per_mtok: 15.0,
            },
        );
        rates.insert(
            ProviderKind::Groq,
            Rates {
                input_per_mtok: 0.59,
                output_per_mtok: 0.79,
            },
        );
        rates.insert(
            ProviderKind::Gemini,
            Rates {
                input_per_mtok: 1.25,
                output_per_mtok: 10.0,
            },
        );
        rates.insert(
            ProviderKind::Claude,
            Rates {
                input_per_mtok: 3.0,
                output_per_mtok: 15.0,
            },
        );
        // Local inference is free.
        rates.insert(
            ProviderKind::Ollama,
            Rates {
                input_per_mtok: 0.0,
                output_per_mtok: 0.0,
            },
        );
        Self { rates }
    }
}

impl PriceTable {
    /// Override the rates for one provider.
    pub fn set(&mut self, kind: ProviderKind, rates: Rates) {
        self.rates.insert(kind, rates);
    }

    /// Rates for a provider (zero when unknown).
    pub fn rates(&self, kind: ProviderKind) -> Rates {
        self.rates.get(&kind).copied().unwrap_or(Rates {
            input_per_mtok: 0.0,
            output_per_mtok: 0.0,
        })
    }

    /// Estimated dollar cost of one request.
    pub fn cost(&self, kind: ProviderKind, usage: &Usage) -> f64 {
        self.rates(kind).cost(usage)
    }

    /// The trailing usage footer appended to assistant text.
    ///
    /// The format is fixed — downstream components parse `Cost: $([\d.]+)`
    /// to aggregate spend.
    pub fn footer(&self, kind: ProviderKind, usage: &Usage) -> String {
        format!(
            "\n\n---\nTokens: {} ({} in, {} out)\nCost: ${:.6}",
            usage.total(),
            usage.input_tokens,
            usage.output_tokens,
            self.cost(kind, usage),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_scales_per_million() {
        let rates = Rates {
            input_per_mtok: 3.0,
            output_per_mtok: 15.0,
        };
        let usage = Usage::new(1_000_000, 1_000_000);
        assert!((rates.cost(&usage) - 18.0).abs() < 1e-9);
    }

    #[test]
    fn footer_matches_fixed_format() {
        let table = PriceTable::default();
        let usage = Usage::new(100, 50);
        let footer = table.footer(ProviderKind::Claude, &usage);
        assert!(footer.starts_with("\n\n---\nTokens: 150 (100 in, 50 out)\nCost: $"));
        // Six decimal places, parseable by the Cost: $X.XXXXXX scraper.
        let cost = footer.rsplit('$').next().unwrap();
        assert_eq!(cost.split('.').nth(1).unwrap().len(), 6);
    }

    #[test]
    fn ollama_is_free() {
        let table = PriceTable::default();
        let usage = Usage::new(1_000_000, 1_000_000);
        assert_eq!(table.cost(ProviderKind::Ollama, &usage), 0.0);
    }

    #[test]
    fn overrides_replace_defaults() {
        let mut table = PriceTable::default();
        table.set(
            ProviderKind::Groq,
            Rates {
                input_per_mtok: 1.0,
                output_per_mtok: 2.0,
            },
        );
        let usage = Usage::new(1_000_000, 0);
        assert!((table.cost(ProviderKind::Groq, &usage) - 1.0).abs() < 1e-9);
    }
}
