//! # Trace Analysis
//!
//! Kinematics of a pointer trace and the fluidity it implies.
//!
//! - Path length, max/avg speed, pauses and duration from consecutive samples
//! - Fluidity: pause penalty, engagement bonus, speed consistency bonus
//! - Variability: spread of turning angles (smooth strokes turn steadily)

use std::f64::consts::PI;

use crate::engine::config::TraceConfig;
use crate::models::{clamp_unit, Trace, TraceEvent, TraceMetrics, TracePoint};

/// Build a trace (points + metrics, fluidity included) from raw events.
pub fn capture_trace(events: &[TraceEvent], config: &TraceConfig) -> Trace {
    let points: Vec<TracePoint> = events.iter().map(TracePoint::from).collect();
    let metrics = measure(&points, config);
    Trace { points, metrics }
}

/// Kinematic metrics of an ordered point sequence, fluidity filled in.
pub fn measure(points: &[TracePoint], config: &TraceConfig) -> TraceMetrics {
    let mut metrics = TraceMetrics::default();

    for pair in points.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let distance = (cur.x - prev.x).hypot(cur.y - prev.y);
        metrics.total_length += distance;

        let dt_ms = cur.timestamp_ms - prev.timestamp_ms;
        if dt_ms > 0.0 {
            let speed = distance / (dt_ms / 1000.0);
            metrics.max_speed = metrics.max_speed.max(speed);
            if dt_ms > config.pause_threshold_ms {
                metrics.pause_count += 1;
            }
        }
    }

    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        if points.len() > 1 {
            metrics.duration_s = (last.timestamp_ms - first.timestamp_ms) / 1000.0;
            if metrics.duration_s > 0.0 {
                metrics.avg_speed = metrics.total_length / metrics.duration_s;
            }
        }
    }

    metrics.fluidity = fluidity_score(&metrics, config);
    metrics
}

/// Fluidity in [0, 1] from kinematic metrics.
pub fn fluidity_score(metrics: &TraceMetrics, config: &TraceConfig) -> f64 {
    let mut score = 1.0;

    let pause_penalty =
        (metrics.pause_count as f64 * config.pause_penalty).min(config.pause_penalty_cap);
    score -= pause_penalty;

    let length_bonus =
        (metrics.total_length / config.length_bonus_divisor).min(config.length_bonus_cap);
    score += length_bonus;

    // Constant speed keeps avg close to max; spikes push the ratio toward 0
    if metrics.max_speed > 0.0 {
        score += (metrics.avg_speed / metrics.max_speed) * config.speed_consistency_weight;
    }

    clamp_unit(score)
}

/// Smoothness in [0, 1] from the spread of turning angles.
///
/// Fewer than three points cannot turn and score 1.0.
pub fn variability_score(points: &[TracePoint]) -> f64 {
    if points.len() < 3 {
        return 1.0;
    }

    let angles: Vec<f64> = points
        .windows(3)
        .map(|w| {
            let heading_in = (w[1].y - w[0].y).atan2(w[1].x - w[0].x);
            let heading_out = (w[2].y - w[1].y).atan2(w[2].x - w[1].x);
            let mut diff = (heading_out - heading_in).abs();
            if diff > PI {
                diff = 2.0 * PI - diff;
            }
            diff
        })
        .collect();

    let n = angles.len() as f64;
    let mean = angles.iter().sum::<f64>() / n;
    let variance = angles.iter().map(|a| (a - mean).powi(2)).sum::<f64>() / n;

    clamp_unit(1.0 - variance.sqrt() / PI)
}

/// Category fluidity: weighted blend of kinematic fluidity and variability.
pub fn composite_fluidity(fluidity: f64, variability: f64, config: &TraceConfig) -> f64 {
    clamp_unit(fluidity * config.fluidity_weight + variability * config.variability_weight)
}
