//! True range and Wilder's ATR smoothing (§4.2 "ATR" envelope method).

use crate::domain::Bar;
use crate::money::Price;
use crate::time::Timestamp;
use rust_decimal::Decimal;

/// True range series, one value per bar. `tr[0]` has no previous close and
/// is just `high - low`; `tr[i>0] = max(high-low, |high-prev_close|,
/// |low-prev_close|)`.
pub fn true_range(bars: &[Bar]) -> Vec<Decimal> {
    let mut tr = Vec::with_capacity(bars.len());
    for (i, bar) in bars.iter().enumerate() {
        if i == 0 {
            tr.push(bar.high - bar.low);
        } else {
            let prev_close = bars[i - 1].close;
            let range = bar.high - bar.low;
            let up = (bar.high - prev_close).abs();
            let down = (bar.low - prev_close).abs();
            tr.push(range.max(up).max(down));
        }
    }
    tr
}

/// Wilder's ATR: seed with the mean of the first `period` true-range values,
/// then smooth with alpha = 1/period. Returns `(timestamp, atr)` pairs
/// aligned to `bars`, starting at the bar where the seed completes —
/// warm-up points are omitted, not NaN-padded (§4.2).
pub fn atr_series(bars: &[Bar], period: usize) -> Vec<(Timestamp, Price)> {
    if period == 0 || bars.len() < period {
        return Vec::new();
    }
    let tr = true_range(bars);
    let period_dec = Decimal::from(period as u64);
    let seed: Decimal = tr[..period].iter().sum::<Decimal>() / period_dec;
    let alpha = Decimal::ONE / period_dec;

    let mut out = Vec::with_capacity(bars.len() - period + 1);
    out.push((bars[period - 1].timestamp, seed));

    let mut prev = seed;
    for i in period..bars.len() {
        let smoothed = alpha * tr[i] + (Decimal::ONE - alpha) * prev;
        out.push((bars[i].timestamp, smoothed));
        prev = smoothed;
    }
    out
}
