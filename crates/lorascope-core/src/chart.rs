// ── Uplink RF chart data ──
//
// Pure shaping of an event list into the samples and axis domains the
// RF charts draw: four time series (RSSI, SNR, frequency, data rate) and
// an SNR-vs-RSSI scatter sharing the same two domains.

use serde::Serialize;

use crate::model::Event;

/// Time label on the chart x-axis (`dd/mm HH:MM`).
pub const TIME_LABEL_FORMAT: &str = "%d/%m %H:%M";

const HZ_PER_MHZ: f64 = 1_000_000.0;
const DR_MIN: f64 = 0.0;
const DR_MAX: f64 = 15.0;

// ── Metrics ──────────────────────────────────────────────────────────

/// One of the four plotted radio metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RfMetric {
    Rssi,
    Snr,
    Frequency,
    DataRate,
}

impl RfMetric {
    pub const ALL: [RfMetric; 4] = [Self::Rssi, Self::Snr, Self::Frequency, Self::DataRate];

    pub fn name(self) -> &'static str {
        match self {
            Self::Rssi => "RSSI",
            Self::Snr => "SNR",
            Self::Frequency => "Frequency",
            Self::DataRate => "Data Rate",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Self::Rssi => " dBm",
            Self::Snr => " dB",
            Self::Frequency => " MHz",
            Self::DataRate => "",
        }
    }

    /// Domain used when no sample carries this metric.
    pub fn fallback_domain(self) -> AxisDomain {
        match self {
            Self::Rssi => AxisDomain::new(-150.0, 0.0),
            Self::Snr => AxisDomain::new(-20.0, 20.0),
            Self::Frequency => AxisDomain::new(900.0, 930.0),
            Self::DataRate => AxisDomain::new(DR_MIN, DR_MAX),
        }
    }

    /// Fraction of the value range added on each side.
    fn padding_ratio(self) -> f64 {
        match self {
            Self::Frequency => 0.05,
            _ => 0.1,
        }
    }

    /// Pull this metric out of a sample.
    pub fn value(self, sample: &RfSample) -> Option<f64> {
        match self {
            Self::Rssi => sample.rssi.map(f64::from),
            Self::Snr => sample.snr,
            Self::Frequency => sample.frequency_mhz,
            Self::DataRate => sample.dr.map(f64::from),
        }
    }

    /// Point tooltip text: `"RSSI: -97 dBm"`.
    pub fn tooltip(self, value: f64) -> String {
        let formatted = match self {
            Self::Rssi | Self::DataRate => format!("{value:.0}"),
            Self::Snr => format!("{value:.1}"),
            Self::Frequency => format!("{value:.3}"),
        };
        format!("{}: {formatted}{}", self.name(), self.unit())
    }
}

// ── Domains ──────────────────────────────────────────────────────────

/// Closed `[min, max]` range for one chart axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisDomain {
    pub min: f64,
    pub max: f64,
}

impl AxisDomain {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// `[min, max]` for ratatui's `Axis::bounds`.
    pub fn bounds(self) -> [f64; 2] {
        [self.min, self.max]
    }

    /// Compute the padded domain for `metric` over `values`.
    pub fn for_values(metric: RfMetric, values: impl IntoIterator<Item = f64>) -> Self {
        let Some((min, max)) = min_max(values) else {
            return metric.fallback_domain();
        };

        if metric == RfMetric::DataRate {
            return Self::new((min - 1.0).max(DR_MIN), (max + 1.0).min(DR_MAX));
        }

        let range = max - min;
        #[allow(clippy::float_cmp)]
        let padding = if range == 0.0 {
            1.0
        } else {
            range * metric.padding_ratio()
        };
        Self::new(min - padding, max + padding)
    }
}

fn min_max(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

// ── Samples ──────────────────────────────────────────────────────────

/// One plotted uplink.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfSample {
    pub event_id: i64,
    /// Epoch milliseconds of `event_time`; `None` if it didn't parse.
    pub timestamp_ms: Option<i64>,
    /// `dd/mm HH:MM`, or the raw `event_time` if it didn't parse.
    pub time_label: String,
    pub rssi: Option<i32>,
    pub snr: Option<f64>,
    pub frequency_mhz: Option<f64>,
    pub dr: Option<u8>,
    pub received_at_ms: Option<i64>,
}

impl RfSample {
    fn from_event(event: &Event) -> Self {
        let time = event.event_timestamp();
        #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
        let frequency_mhz = event.frequency.map(|hz| hz as f64 / HZ_PER_MHZ);

        Self {
            event_id: event.id,
            timestamp_ms: time.map(|t| t.timestamp_millis()),
            time_label: time.map_or_else(
                || event.event_time.clone(),
                |t| t.format(TIME_LABEL_FORMAT).to_string(),
            ),
            rssi: event.rssi,
            snr: event.snr,
            frequency_mhz,
            dr: event.dr,
            received_at_ms: event.received_timestamp().map(|t| t.timestamp_millis()),
        }
    }
}

/// Everything the RF charts need, derived from one event list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfChartData {
    /// Ascending by timestamp; unparseable times last, in input order.
    pub samples: Vec<RfSample>,
    pub rssi_domain: AxisDomain,
    pub snr_domain: AxisDomain,
    pub frequency_domain: AxisDomain,
    pub dr_domain: AxisDomain,
}

impl RfChartData {
    /// Shape `events` for charting.
    ///
    /// Keeps uplinks that carry at least one radio metric. Returns `None`
    /// when nothing qualifies; callers show a "no data" placeholder
    /// instead of an empty chart.
    pub fn from_events(events: &[Event]) -> Option<Self> {
        let mut samples: Vec<RfSample> = events
            .iter()
            .filter(|e| e.event_type.is_uplink() && e.has_radio_metrics())
            .map(RfSample::from_event)
            .collect();

        if samples.is_empty() {
            return None;
        }

        // Stable sort; unparseable timestamps sort after every real one.
        samples.sort_by_key(|s| (s.timestamp_ms.is_none(), s.timestamp_ms));

        let domain = |metric: RfMetric| {
            AxisDomain::for_values(metric, samples.iter().filter_map(|s| metric.value(s)))
        };

        Some(Self {
            rssi_domain: domain(RfMetric::Rssi),
            snr_domain: domain(RfMetric::Snr),
            frequency_domain: domain(RfMetric::Frequency),
            dr_domain: domain(RfMetric::DataRate),
            samples,
        })
    }

    pub fn domain(&self, metric: RfMetric) -> AxisDomain {
        match metric {
            RfMetric::Rssi => self.rssi_domain,
            RfMetric::Snr => self.snr_domain,
            RfMetric::Frequency => self.frequency_domain,
            RfMetric::DataRate => self.dr_domain,
        }
    }

    /// `(sample index, value)` points for one time series. Samples missing
    /// the metric leave a gap rather than a zero.
    pub fn series(&self, metric: RfMetric) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .enumerate()
            .filter_map(|(i, s)| {
                #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
                let x = i as f64;
                metric.value(s).map(|v| (x, v))
            })
            .collect()
    }

    /// `(rssi, snr)` points for the correlation scatter.
    pub fn scatter(&self) -> Vec<(f64, f64)> {
        self.samples
            .iter()
            .filter_map(|s| Some((f64::from(s.rssi?), s.snr?)))
            .collect()
    }

    /// First, middle and last time labels for the x-axis.
    pub fn time_axis_labels(&self) -> Vec<&str> {
        let n = self.samples.len();
        let picks = match n {
            0 => vec![],
            1 => vec![0],
            2 => vec![0, 1],
            _ => vec![0, n / 2, n - 1],
        };
        picks
            .into_iter()
            .filter_map(|i| self.samples.get(i).map(|s| s.time_label.as_str()))
            .collect()
    }

    /// Upper x bound for the time series (index of the last sample).
    pub fn x_max(&self) -> f64 {
        #[allow(clippy::cast_precision_loss, clippy::as_conversions)]
        let last = self.samples.len().saturating_sub(1) as f64;
        last.max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EventType;
    use pretty_assertions::assert_eq;

    fn event(id: i64, ty: EventType, time: &str) -> Event {
        Event {
            id,
            event_type: ty,
            dev_eui: "a84041000181c4b1".into(),
            device_name: None,
            event_time: time.into(),
            received_at: time.into(),
            f_port: None,
            rssi: None,
            snr: None,
            frequency: None,
            dr: None,
        }
    }

    fn uplink_rssi(id: i64, time: &str, rssi: i32) -> Event {
        Event {
            rssi: Some(rssi),
            ..event(id, EventType::Uplink, time)
        }
    }

    #[test]
    fn keeps_only_uplinks_with_some_metric() {
        let with_snr = Event {
            snr: Some(4.5),
            ..event(1, EventType::Uplink, "2025-03-01T10:00:00")
        };
        let bare_uplink = event(2, EventType::Uplink, "2025-03-01T10:01:00");
        let join_with_rssi = Event {
            rssi: Some(-90),
            ..event(3, EventType::Join, "2025-03-01T10:02:00")
        };
        let with_dr = Event {
            dr: Some(0),
            ..event(4, EventType::Uplink, "2025-03-01T10:03:00")
        };

        let data = RfChartData::from_events(&[with_snr, bare_uplink, join_with_rssi, with_dr])
            .expect("two uplinks qualify");
        let ids: Vec<i64> = data.samples.iter().map(|s| s.event_id).collect();
        assert_eq!(ids, vec![1, 4]);
    }

    #[test]
    fn no_qualifying_events_means_placeholder() {
        let events = vec![
            event(1, EventType::Uplink, "2025-03-01T10:00:00"),
            event(2, EventType::Log, "2025-03-01T10:00:00"),
        ];
        assert_eq!(RfChartData::from_events(&events), None);
        assert_eq!(RfChartData::from_events(&[]), None);
    }

    #[test]
    fn frequency_converts_to_mhz_exactly() {
        let e = Event {
            frequency: Some(915_000_000),
            ..event(1, EventType::Uplink, "2025-03-01T10:00:00")
        };
        let data = RfChartData::from_events(&[e]).expect("qualifies");
        assert_eq!(data.samples[0].frequency_mhz, Some(915.0));
    }

    #[test]
    fn rssi_domain_pads_ten_percent() {
        let events = vec![
            uplink_rssi(1, "2025-03-01T10:00:00", -120),
            uplink_rssi(2, "2025-03-01T10:05:00", -80),
        ];
        let data = RfChartData::from_events(&events).expect("qualifies");
        assert_eq!(data.rssi_domain, AxisDomain::new(-124.0, -76.0));
    }

    #[test]
    fn single_value_domain_pads_one_unit() {
        let events = vec![
            uplink_rssi(1, "2025-03-01T10:00:00", -100),
            uplink_rssi(2, "2025-03-01T10:05:00", -100),
        ];
        let data = RfChartData::from_events(&events).expect("qualifies");
        assert_eq!(data.rssi_domain, AxisDomain::new(-101.0, -99.0));
    }

    #[test]
    fn missing_metric_uses_fallback_domain() {
        let events = vec![uplink_rssi(1, "2025-03-01T10:00:00", -100)];
        let data = RfChartData::from_events(&events).expect("qualifies");
        assert_eq!(data.snr_domain, AxisDomain::new(-20.0, 20.0));
        assert_eq!(data.frequency_domain, AxisDomain::new(900.0, 930.0));
        assert_eq!(data.dr_domain, AxisDomain::new(0.0, 15.0));
    }

    #[test]
    fn frequency_domain_pads_five_percent() {
        let domain = AxisDomain::for_values(RfMetric::Frequency, [902.0, 922.0]);
        assert_eq!(domain, AxisDomain::new(901.0, 923.0));
    }

    #[test]
    fn data_rate_domain_is_clamped() {
        assert_eq!(
            AxisDomain::for_values(RfMetric::DataRate, [0.0, 15.0]),
            AxisDomain::new(0.0, 15.0)
        );
        assert_eq!(
            AxisDomain::for_values(RfMetric::DataRate, [3.0, 5.0]),
            AxisDomain::new(2.0, 6.0)
        );
        assert_eq!(
            AxisDomain::for_values(RfMetric::DataRate, [5.0]),
            AxisDomain::new(4.0, 6.0)
        );
    }

    #[test]
    fn samples_sort_ascending_with_bad_times_last() {
        let events = vec![
            uplink_rssi(1, "2025-03-01T12:00:00", -90),
            uplink_rssi(2, "not-a-date", -91),
            uplink_rssi(3, "2025-03-01T09:00:00", -92),
            uplink_rssi(4, "2025-03-01T09:00:00", -93),
            uplink_rssi(5, "also-bad", -94),
        ];
        let data = RfChartData::from_events(&events).expect("qualifies");
        let ids: Vec<i64> = data.samples.iter().map(|s| s.event_id).collect();
        assert_eq!(ids, vec![3, 4, 1, 2, 5]);
        assert_eq!(data.samples[0].time_label, "01/03 09:00");
        assert_eq!(data.samples[3].time_label, "not-a-date");
    }

    #[test]
    fn series_skip_missing_values_and_scatter_needs_both() {
        let a = Event {
            rssi: Some(-100),
            snr: Some(5.0),
            ..event(1, EventType::Uplink, "2025-03-01T10:00:00")
        };
        let b = Event {
            snr: Some(7.5),
            ..event(2, EventType::Uplink, "2025-03-01T10:01:00")
        };
        let data = RfChartData::from_events(&[a, b]).expect("qualifies");
        assert_eq!(data.series(RfMetric::Rssi), vec![(0.0, -100.0)]);
        assert_eq!(data.series(RfMetric::Snr), vec![(0.0, 5.0), (1.0, 7.5)]);
        assert_eq!(data.scatter(), vec![(-100.0, 5.0)]);
    }

    #[test]
    fn tooltips_carry_name_value_and_unit() {
        assert_eq!(RfMetric::Rssi.tooltip(-97.0), "RSSI: -97 dBm");
        assert_eq!(RfMetric::Snr.tooltip(7.3), "SNR: 7.3 dB");
        assert_eq!(RfMetric::Frequency.tooltip(915.2), "Frequency: 915.200 MHz");
        assert_eq!(RfMetric::DataRate.tooltip(3.0), "Data Rate: 3");
    }
}
