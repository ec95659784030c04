#[cfg(test)]
mod tests {
    use super::super::config::EngineConfig;
    use super::super::indicators::*;
    use analysis_core::Bar;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use chrono::{Duration, TimeZone, Utc};

    // Wilder's RSI worksheet closes
    fn sample_prices() -> Vec<f64> {
        vec![
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08,
            45.89, 46.03, 45.61, 46.28, 46.28, 46.00, 46.03, 46.41, 46.22, 45.64,
        ]
    }

    // Deterministic wavy series long enough for every indicator
    fn long_prices(n: usize) -> Vec<f64> {
        (0..n)
            .map(|i| {
                let t = i as f64;
                100.0 + (t * 0.21).sin() * 6.0 + (t * 0.05).cos() * 3.0 + t * 0.08
            })
            .collect()
    }

    fn bars_from(closes: &[f64]) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| Bar {
                timestamp: start + Duration::days(i as i64),
                open: close,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 1000000.0,
            })
            .collect()
    }

    #[test]
    fn test_sma_basic() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let result = sma(&data, 3);

        assert_eq!(result.len(), 3);
        assert_abs_diff_eq!(result[0], 2.0, epsilon = 1e-12); // (1+2+3)/3
        assert_abs_diff_eq!(result[1], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result[2], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sma_insufficient_data() {
        assert!(sma(&[1.0, 2.0], 5).is_empty());
        assert!(sma(&[1.0, 2.0], 0).is_empty());
    }

    #[test]
    fn test_sma_period_one_is_identity() {
        let prices = sample_prices();
        assert_eq!(sma(&prices, 1), prices);
    }

    #[test]
    fn test_sma_real_prices() {
        let prices = sample_prices();
        let result = sma(&prices, 5);

        assert_eq!(result.len(), prices.len() - 4);
        let expected_first = (44.34 + 44.09 + 44.15 + 43.61 + 44.33) / 5.0;
        assert_relative_eq!(result[0], expected_first, epsilon = 1e-12);
    }

    #[test]
    fn test_ema_basic() {
        let data = vec![22.0, 24.0, 23.0, 25.0, 26.0];
        let result = ema(&data, 3);

        // Seeded with SMA(3) = 23, then alpha = 0.5
        assert_eq!(result.len(), 3);
        assert_abs_diff_eq!(result[0], 23.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result[1], 24.0, epsilon = 1e-12);
        assert_abs_diff_eq!(result[2], 25.0, epsilon = 1e-12);
    }

    #[test]
    fn test_ema_real_prices() {
        let result = ema(&sample_prices(), 10);
        assert_eq!(result.len(), 11);
        assert_relative_eq!(result[0], 44.779, epsilon = 1e-9);
        assert_relative_eq!(result[1], 44.981, epsilon = 1e-9);
    }

    #[test]
    fn test_ema_of_constant_is_constant() {
        let result = ema(&[7.5; 30], 12);
        assert_eq!(result.len(), 19);
        for v in result {
            assert_abs_diff_eq!(v, 7.5, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_ema_empty_data() {
        let data: Vec<f64> = vec![];
        assert!(ema(&data, 5).is_empty());
    }

    #[test]
    fn test_ema_increases_with_uptrend() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0];
        let result = ema(&data, 3);

        for i in 1..result.len() {
            assert!(result[i] > result[i - 1]);
        }
    }

    #[test]
    fn test_rolling_std_dev_is_population() {
        let result = rolling_std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0], 8);
        assert_eq!(result.len(), 1);
        assert_abs_diff_eq!(result[0], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rsi_matches_worksheet() {
        let result = rsi(&sample_prices(), 14);

        assert_eq!(result.len(), 6);
        assert_abs_diff_eq!(result[0], 70.46, epsilon = 0.01);
        assert_abs_diff_eq!(result[1], 66.25, epsilon = 0.01);
        assert_abs_diff_eq!(result[5], 57.92, epsilon = 0.01);
    }

    #[test]
    fn test_rsi_bounded() {
        for value in rsi(&long_prices(300), 14) {
            assert!((0.0..=100.0).contains(&value));
        }
    }

    #[test]
    fn test_rsi_insufficient_data() {
        assert!(rsi(&[1.0, 2.0, 3.0], 14).is_empty());
        // period + 1 prices give exactly one value
        assert_eq!(rsi(&sample_prices()[..15], 14).len(), 1);
    }

    #[test]
    fn test_rsi_overbought_oversold() {
        let uptrend: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let up = rsi(&uptrend, 14);
        assert!(*up.last().unwrap() > 99.99);
        assert!(up.last().unwrap().is_finite());

        let downtrend: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let down = rsi(&downtrend, 14);
        assert_abs_diff_eq!(*down.last().unwrap(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rsi_flat_series_is_neutral() {
        let result = rsi(&[50.0; 30], 14);
        assert_eq!(result.len(), 16);
        assert!(result.iter().all(|v| *v == 50.0));
    }

    #[test]
    fn test_macd_alignment() {
        let prices = long_prices(120);
        let result = macd(&prices, 12, 26, 9);

        // Slow EMA starts at bar 25, signal adds 8 more
        assert_eq!(result.offset, 33);
        assert_eq!(result.macd_line.len(), prices.len() - 33);
        assert_eq!(result.signal_line.len(), result.macd_line.len());
        assert_eq!(result.histogram.len(), result.macd_line.len());

        for i in 0..result.histogram.len() {
            assert_abs_diff_eq!(
                result.histogram[i],
                result.macd_line[i] - result.signal_line[i],
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_macd_line_aligned_from_the_front() {
        let prices = long_prices(120);
        let result = macd(&prices, 12, 26, 9);
        let fast = ema(&prices, 12);
        let slow = ema(&prices, 26);

        // Latest MACD value uses the latest value of both EMAs
        assert_relative_eq!(
            *result.macd_line.last().unwrap(),
            fast.last().unwrap() - slow.last().unwrap(),
            epsilon = 1e-12
        );
        // First MACD value sits on bar 33: fast EMA index 33 - 11, slow 33 - 25
        assert_relative_eq!(result.macd_line[0], fast[22] - slow[8], epsilon = 1e-12);
    }

    #[test]
    fn test_macd_insufficient_data() {
        let result = macd(&long_prices(34), 12, 26, 9);
        assert!(result.macd_line.is_empty());
        assert!(result.histogram.is_empty());

        let result = macd(&long_prices(35), 12, 26, 9);
        assert_eq!(result.histogram.len(), 2);
    }

    #[test]
    fn test_macd_rejects_inverted_periods() {
        assert!(macd(&long_prices(100), 26, 12, 9).histogram.is_empty());
        assert!(macd(&long_prices(100), 12, 12, 9).histogram.is_empty());
    }

    #[test]
    fn test_bollinger_bands_basic() {
        let prices = sample_prices();
        let bands = bollinger_bands(&prices, 5, 2.0);

        assert_eq!(bands.offset, 4);
        assert_eq!(bands.len(), prices.len() - 4);
        assert_relative_eq!(bands.middle[0], 44.104, epsilon = 1e-9);
        assert_relative_eq!(bands.upper[0], 44.104 + 2.0 * 0.26575176386997, epsilon = 1e-9);
    }

    #[test]
    fn test_bollinger_bands_ordering() {
        let bands = bollinger_bands(&long_prices(200), 20, 2.0);

        for i in 0..bands.len() {
            assert!(bands.upper[i] >= bands.middle[i]);
            assert!(bands.middle[i] >= bands.lower[i]);
        }
    }

    #[test]
    fn test_bollinger_bands_width() {
        let narrow = bollinger_bands(&long_prices(60), 20, 1.0);
        let wide = bollinger_bands(&long_prices(60), 20, 3.0);

        let narrow_width = narrow.upper[0] - narrow.lower[0];
        let wide_width = wide.upper[0] - wide.lower[0];
        assert_relative_eq!(wide_width, narrow_width * 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_bollinger_at_bar() {
        let bands = bollinger_bands(&sample_prices(), 5, 2.0);
        assert_eq!(bands.at_bar(3), None);
        assert_eq!(
            bands.at_bar(4),
            Some((bands.upper[0], bands.middle[0], bands.lower[0]))
        );
        assert_eq!(bands.at_bar(20), None);
    }

    #[test]
    fn test_momentum() {
        let prices: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let result = momentum(&prices, 10);

        assert_eq!(result.len(), 20);
        assert!(result.iter().all(|m| *m == 10.0));
        assert!(momentum(&prices[..10], 10).is_empty());
    }

    #[test]
    fn test_volatility() {
        assert!(volatility(&[50.0; 30], 20).iter().all(|v| *v == 0.0));
        assert_eq!(volatility(&[50.0; 30], 20).len(), 10);
        assert!(volatility(&[50.0; 20], 20).is_empty());

        // Alternating +10% / -10%ish moves: std-dev well above 3%
        let choppy: Vec<f64> = (0..30).map(|i| if i % 2 == 0 { 100.0 } else { 110.0 }).collect();
        assert!(*volatility(&choppy, 20).last().unwrap() > 0.05);
    }

    #[test]
    fn test_indicator_series_offsets() {
        let series = IndicatorSeries::new(19, sma(&long_prices(25), 20));

        assert_eq!(series.len(), 6);
        assert_eq!(series.at_bar(18), None);
        assert_eq!(series.at_bar(19), series.values.first().copied());
        assert_eq!(series.at_bar(24), series.latest());
        assert_eq!(series.back(5), series.at_bar(19));
        assert_eq!(series.back(6), None);
        assert_eq!(series.back(usize::MAX), None);
    }

    #[test]
    fn test_compute_indicators_end_on_latest_bar() {
        let prices = long_prices(260);
        let bars = bars_from(&prices);
        let set = compute_indicators(&bars, &EngineConfig::default());
        let last_bar = prices.len() - 1;

        for series in [
            &set.rsi,
            &set.ema_20,
            &set.ema_50,
            &set.ema_200,
            &set.sma_20,
            &set.sma_50,
            &set.sma_200,
            &set.momentum,
            &set.volatility,
        ] {
            assert_eq!(series.offset + series.len() - 1, last_bar);
        }
        assert_eq!(set.macd.offset + set.macd.histogram.len() - 1, last_bar);
        assert_eq!(set.bollinger.offset + set.bollinger.len() - 1, last_bar);
        assert_eq!(set.ema_200.at_bar(199), Some(ema(&prices, 200)[0]));
    }

    #[test]
    fn test_compute_indicators_short_history() {
        let bars = bars_from(&long_prices(30));
        let set = compute_indicators(&bars, &EngineConfig::default());

        assert!(set.macd.histogram.is_empty());
        assert!(set.ema_50.is_empty());
        assert!(set.sma_200.is_empty());
        assert_eq!(set.rsi.len(), 16);
        assert_eq!(set.bollinger.len(), 11);
    }
}
