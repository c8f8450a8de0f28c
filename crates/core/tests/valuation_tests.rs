// ═══════════════════════════════════════════════════════════════════
// Valuation Tests — ValuationService series math, error cases,
// ChartService projection
// ═══════════════════════════════════════════════════════════════════

use chrono::NaiveDate;
use proptest::prelude::*;

use allocation_backtest_core::errors::ValuationError;
use allocation_backtest_core::models::allocation::AllocationFractions;
use allocation_backtest_core::models::chart::ChartStyle;
use allocation_backtest_core::models::price::PriceHistory;
use allocation_backtest_core::services::chart_service::ChartService;
use allocation_backtest_core::services::valuation_service::ValuationService;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn fractions(pairs: &[(&str, f64)]) -> AllocationFractions {
    pairs.iter().map(|(s, f)| (*s, *f)).collect()
}

fn engine() -> ValuationService {
    ValuationService::new()
}

// ── Series math ─────────────────────────────────────────────────────

mod series_math {
    use super::*;

    #[test]
    fn fifty_fifty_single_date() {
        let history = PriceHistory::new()
            .with_close(d(2024, 1, 2), "A", 10.0)
            .with_close(d(2024, 1, 2), "B", 20.0);
        let series = engine()
            .compute_series(&history, 1000.0, &fractions(&[("A", 0.5), ("B", 0.5)]))
            .unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series.points()[0].date, d(2024, 1, 2));
        assert_eq!(series.points()[0].value, 15000.0);
    }

    #[test]
    fn one_value_per_date() {
        let history = PriceHistory::new()
            .with_close(d(2024, 1, 2), "A", 1.0)
            .with_close(d(2024, 1, 3), "A", 2.0)
            .with_close(d(2024, 1, 4), "A", 4.0);
        let series = engine()
            .compute_series(&history, 100.0, &fractions(&[("A", 1.0)]))
            .unwrap();
        assert_eq!(series.values(), vec![100.0, 200.0, 400.0]);
    }

    #[test]
    fn output_sorted_ascending_even_if_inserted_newest_first() {
        let history = PriceHistory::new()
            .with_close(d(2024, 1, 4), "A", 3.0)
            .with_close(d(2024, 1, 3), "A", 2.0)
            .with_close(d(2024, 1, 2), "A", 1.0);
        let series = engine()
            .compute_series(&history, 1.0, &fractions(&[("A", 1.0)]))
            .unwrap();
        assert_eq!(series.dates(), vec![d(2024, 1, 2), d(2024, 1, 3), d(2024, 1, 4)]);
        assert_eq!(series.values(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn three_asset_weighted_sum() {
        let history = PriceHistory::new()
            .with_close(d(2024, 1, 2), "AAPL", 185.0)
            .with_close(d(2024, 1, 2), "GOOG", 140.0)
            .with_close(d(2024, 1, 2), "MSFT", 370.0);
        let series = engine()
            .compute_series(
                &history,
                10.0,
                &fractions(&[("AAPL", 0.5), ("GOOG", 0.25), ("MSFT", 0.25)]),
            )
            .unwrap();
        let expected = 185.0 * 10.0 * 0.5 + 140.0 * 10.0 * 0.25 + 370.0 * 10.0 * 0.25;
        assert!((series.points()[0].value - expected).abs() < 1e-9);
    }

    #[test]
    fn unallocated_symbols_in_history_are_ignored() {
        let history = PriceHistory::new()
            .with_close(d(2024, 1, 2), "A", 10.0)
            .with_close(d(2024, 1, 2), "EXTRA", 999.0);
        let series = engine()
            .compute_series(&history, 1.0, &fractions(&[("A", 1.0)]))
            .unwrap();
        assert_eq!(series.values(), vec![10.0]);
    }

    #[test]
    fn zero_fraction_contributes_nothing_but_still_needs_price() {
        let history = PriceHistory::new()
            .with_close(d(2024, 1, 2), "A", 10.0)
            .with_close(d(2024, 1, 2), "B", 50.0);
        let series = engine()
            .compute_series(&history, 1.0, &fractions(&[("A", 1.0), ("B", 0.0)]))
            .unwrap();
        assert_eq!(series.values(), vec![10.0]);
    }

    #[test]
    fn zero_price_is_valid() {
        let history = PriceHistory::new().with_close(d(2024, 1, 2), "A", 0.0);
        let series = engine()
            .compute_series(&history, 1000.0, &fractions(&[("A", 1.0)]))
            .unwrap();
        assert_eq!(series.values(), vec![0.0]);
    }

    #[test]
    fn empty_history_gives_empty_series() {
        let series = engine()
            .compute_series(&PriceHistory::new(), 1000.0, &fractions(&[("A", 1.0)]))
            .unwrap();
        assert!(series.is_empty());
    }

    #[test]
    fn identical_inputs_identical_outputs() {
        let history = PriceHistory::new()
            .with_close(d(2024, 1, 2), "A", 10.5)
            .with_close(d(2024, 1, 2), "B", 20.25)
            .with_close(d(2024, 1, 3), "A", 11.0)
            .with_close(d(2024, 1, 3), "B", 19.75);
        let f = fractions(&[("A", 0.3), ("B", 0.7)]);
        let first = engine().compute_series(&history, 1234.5, &f).unwrap();
        let second = engine().compute_series(&history, 1234.5, &f).unwrap();
        assert_eq!(first, second);
    }
}

// ── Error cases ─────────────────────────────────────────────────────

mod errors {
    use super::*;

    #[test]
    fn missing_goog_on_date() {
        let history = PriceHistory::new().with_close(d(2024, 1, 2), "AAPL", 100.0);
        let err = engine()
            .compute_series(&history, 1000.0, &fractions(&[("AAPL", 0.5), ("GOOG", 0.5)]))
            .unwrap_err();
        assert_eq!(
            err,
            ValuationError::MissingPriceData {
                date: d(2024, 1, 2),
                symbol: "GOOG".into(),
            }
        );
        assert_eq!(err.tag(), "MissingPriceData");
    }

    #[test]
    fn missing_data_reports_earliest_date() {
        let history = PriceHistory::new()
            .with_close(d(2024, 1, 2), "A", 1.0)
            .with_close(d(2024, 1, 3), "B", 1.0)
            .with_close(d(2024, 1, 2), "B", 1.0);
        let err = engine()
            .compute_series(&history, 1.0, &fractions(&[("A", 0.5), ("B", 0.5)]))
            .unwrap_err();
        assert_eq!(
            err,
            ValuationError::MissingPriceData {
                date: d(2024, 1, 3),
                symbol: "A".into(),
            }
        );
    }

    #[test]
    fn negative_price() {
        let history = PriceHistory::new().with_close(d(2024, 1, 2), "A", -1.0);
        let err = engine()
            .compute_series(&history, 1.0, &fractions(&[("A", 1.0)]))
            .unwrap_err();
        assert_eq!(
            err,
            ValuationError::InvalidPriceData {
                date: d(2024, 1, 2),
                symbol: "A".into(),
                price: -1.0,
            }
        );
    }

    #[test]
    fn nan_price() {
        let history = PriceHistory::new().with_close(d(2024, 1, 2), "A", f64::NAN);
        let err = engine()
            .compute_series(&history, 1.0, &fractions(&[("A", 1.0)]))
            .unwrap_err();
        assert_eq!(err.tag(), "InvalidPriceData");
    }

    #[test]
    fn infinite_price_in_unallocated_symbol_still_rejected() {
        let history = PriceHistory::new()
            .with_close(d(2024, 1, 2), "A", 1.0)
            .with_close(d(2024, 1, 2), "OTHER", f64::INFINITY);
        let err = engine()
            .compute_series(&history, 1.0, &fractions(&[("A", 1.0)]))
            .unwrap_err();
        assert_eq!(err.tag(), "InvalidPriceData");
    }

    #[test]
    fn invalid_price_takes_precedence_over_missing_data() {
        let history = PriceHistory::new()
            .with_close(d(2024, 1, 2), "A", 1.0)
            .with_close(d(2024, 1, 3), "A", -5.0);
        let err = engine()
            .compute_series(&history, 1.0, &fractions(&[("A", 0.5), ("B", 0.5)]))
            .unwrap_err();
        assert_eq!(err.tag(), "InvalidPriceData");
    }
}

// ── Chart payload ───────────────────────────────────────────────────

mod chart_payload {
    use super::*;

    #[test]
    fn labels_and_data_align_with_series() {
        let history = PriceHistory::new()
            .with_close(d(2024, 1, 3), "A", 2.0)
            .with_close(d(2024, 1, 2), "A", 1.0);
        let series = engine()
            .compute_series(&history, 10.0, &fractions(&[("A", 1.0)]))
            .unwrap();
        let payload = ChartService::new().build_payload(&series);
        assert_eq!(payload.labels, vec!["2024-01-02", "2024-01-03"]);
        assert_eq!(payload.datasets.len(), 1);
        assert_eq!(payload.datasets[0].data, vec![10.0, 20.0]);
        assert_eq!(payload.datasets[0].label, "Portfolio Value");
        assert_eq!(payload.datasets[0].border_color, "rgba(75,192,192,1)");
        assert!(!payload.datasets[0].fill);
    }

    #[test]
    fn empty_series_gives_empty_labels_and_data() {
        let series = engine()
            .compute_series(&PriceHistory::new(), 10.0, &fractions(&[("A", 1.0)]))
            .unwrap();
        let payload = ChartService::new().build_payload(&series);
        assert!(payload.labels.is_empty());
        assert!(payload.datasets[0].data.is_empty());
    }

    #[test]
    fn custom_style_is_applied() {
        let style = ChartStyle {
            label: "Backtest".into(),
            border_color: "#ff0000".into(),
            fill: true,
        };
        let payload = ChartService::with_style(style)
            .build_payload(&Default::default());
        assert_eq!(payload.datasets[0].label, "Backtest");
        assert_eq!(payload.datasets[0].border_color, "#ff0000");
        assert!(payload.datasets[0].fill);
    }
}

// ── Properties ──────────────────────────────────────────────────────

fn arb_history() -> impl Strategy<Value = PriceHistory> {
    proptest::collection::vec((0u32..60, 0.01f64..10_000.0, 0.01f64..10_000.0), 0..30).prop_map(
        |rows| {
            let mut history = PriceHistory::new();
            for (offset, a, b) in rows {
                let date = d(2020, 1, 1) + chrono::Duration::days(offset as i64);
                history.insert(date, "A", a);
                history.insert(date, "B", b);
            }
            history
        },
    )
}

proptest! {
    /// Scaling the balance by k scales every value by k.
    #[test]
    fn linear_in_initial_balance(
        history in arb_history(),
        balance in 1.0f64..1_000_000.0,
        k in 0.01f64..100.0,
        split in 0.0f64..=1.0,
    ) {
        let f = fractions(&[("A", split), ("B", 1.0 - split)]);
        let base = engine().compute_series(&history, balance, &f).unwrap();
        let scaled = engine().compute_series(&history, balance * k, &f).unwrap();

        prop_assert_eq!(base.len(), history.len());
        prop_assert_eq!(scaled.len(), base.len());
        for (b, s) in base.points().iter().zip(scaled.points()) {
            prop_assert_eq!(b.date, s.date);
            let expected = b.value * k;
            prop_assert!((s.value - expected).abs() <= 1e-9 * expected.abs().max(1.0));
        }
    }

    /// Each value equals the weighted sum of that date's closes.
    #[test]
    fn value_is_weighted_sum(history in arb_history(), balance in 1.0f64..100_000.0, split in 0.0f64..=1.0) {
        let f = fractions(&[("A", split), ("B", 1.0 - split)]);
        let series = engine().compute_series(&history, balance, &f).unwrap();
        for point in series.points() {
            let a = history.get(point.date, "A").unwrap();
            let b = history.get(point.date, "B").unwrap();
            let expected = a * balance * split + b * balance * (1.0 - split);
            prop_assert!((point.value - expected).abs() <= 1e-9 * expected.abs().max(1.0));
            prop_assert!(point.value >= 0.0);
        }
    }
}
