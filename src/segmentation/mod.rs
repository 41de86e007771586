//! Map annotation tiers onto concrete sample ranges of a waveform.
//!
//! A recording arrives with two interval tiers: one labeling phones, one
//! marking creaky (or otherwise disordered) regions. The functions here
//! bucket the phone tier by label, intersect one phone's occurrences with
//! the marked regions, and convert the surviving segments to sample indices
//! ready for slicing.

use std::collections::HashMap;

use textgrid::{TextGrid, Tier, TierType};

use crate::error::PhonationError;
use crate::types::{Interval, SampleRange, TimeRange};


/// Bucket a tier's intervals by label.
///
/// Within a bucket, intervals keep the order they appear in the tier. An
/// empty tier yields an empty map.
pub fn phone_interval_map(tier: &[Interval]) -> HashMap<String, Vec<TimeRange>> {
    let mut map: HashMap<String, Vec<TimeRange>> = HashMap::new();
    for interval in tier {
        map.entry(interval.label().to_string())
            .or_default()
            .push(interval.range());
    }
    map
}

/// Intersect one phone's occurrences with the marked regions of a tier.
///
/// A marker interval participates iff `(label == marker_label)` agrees with
/// `select_marked`, so the same call shape extracts both the creaky and the
/// non-creaky portions of a phone. For each participating marker and each
/// phone occurrence, a segment is emitted when the phone lies fully inside
/// the marker, or when exactly one phone boundary crosses a marker edge (the
/// segment is then clipped to that edge). Results come out marker-major,
/// phone-minor.
///
/// A marker lying strictly inside a single phone occurrence, with both phone
/// boundaries outside it, emits nothing even though a sub-segment exists.
/// TODO: confirm with the annotation owners whether that configuration
/// should emit the marker range itself.
pub fn marked_segments(
    marker_tier: &[Interval],
    marker_label: &str,
    phone_intervals: &[TimeRange],
    select_marked: bool,
) -> Vec<TimeRange> {
    let mut segments = Vec::new();
    for marker in marker_tier {
        if (marker.label() == marker_label) != select_marked {
            continue;
        }
        let (t_min, t_max) = (marker.t_min(), marker.t_max());
        for phone in phone_intervals {
            let (pt_min, pt_max) = (phone.t_min, phone.t_max);
            if t_min <= pt_min && pt_max <= t_max {
                segments.push(TimeRange {
                    t_min: pt_min,
                    t_max: pt_max,
                });
            } else if pt_min < t_min && t_min < pt_max && pt_max <= t_max {
                segments.push(TimeRange {
                    t_min,
                    t_max: pt_max,
                });
            } else if t_min <= pt_min && pt_min < t_max && t_max < pt_max {
                segments.push(TimeRange {
                    t_min: pt_min,
                    t_max,
                });
            }
        }
    }
    segments
}

/// Convert segments to integer sample indices: `i_min = ceil(t_min * rate)`,
/// `i_max = floor(t_max * rate)`.
///
/// No clamping is performed against any waveform length; a segment near a
/// recording boundary may yield an out-of-range index, and callers must
/// bounds-check before slicing. [`slice_waveform`] does exactly that.
pub fn segment_sample_ranges(sample_rate: u32, segments: &[TimeRange]) -> Vec<SampleRange> {
    segments
        .iter()
        .map(|segment| SampleRange {
            i_min: (segment.t_min * sample_rate as f64).ceil() as usize,
            i_max: (segment.t_max * sample_rate as f64).floor() as usize,
        })
        .collect()
}

/// Cut the waveform slice for every segment.
///
/// A segment reaching past the end of the waveform is a typed error rather
/// than a panic. A segment too short to contain a whole sample (its ceiled
/// start passes its floored end) yields an empty slice.
pub fn slice_waveform<'a>(
    waveform: &'a [f32],
    sample_rate: u32,
    segments: &[TimeRange],
) -> Result<Vec<&'a [f32]>, PhonationError> {
    segment_sample_ranges(sample_rate, segments)
        .into_iter()
        .map(|range| {
            if range.i_max > waveform.len() {
                return Err(PhonationError::SampleRangeOutOfBounds {
                    i_min: range.i_min,
                    i_max: range.i_max,
                    len: waveform.len(),
                });
            }
            if range.i_min >= range.i_max {
                return Ok(&[] as &[f32]);
            }
            Ok(&waveform[range.i_min..range.i_max])
        })
        .collect()
}

/// Find the interval tier with the given name in a parsed TextGrid.
pub fn interval_tier<'a>(grid: &'a TextGrid, name: &str) -> Result<&'a Tier, PhonationError> {
    grid.tiers
        .iter()
        .find(|tier| {
            tier.tier_type == TierType::IntervalTier && tier.name.eq_ignore_ascii_case(name)
        })
        .ok_or_else(|| {
            PhonationError::invalid_input(format!("missing IntervalTier named '{name}'"))
        })
}

/// Convert a parsed TextGrid tier into this crate's intervals, rejecting
/// malformed boundaries.
pub fn tier_intervals(tier: &Tier) -> Result<Vec<Interval>, PhonationError> {
    tier.intervals
        .iter()
        .map(|interval| Interval::new(interval.xmin, interval.xmax, interval.text.clone()))
        .collect()
}
