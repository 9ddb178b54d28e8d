//! Pointer trace data captured while a contribution is drawn.

use serde::{Deserialize, Serialize};

pub const DEFAULT_PRESSURE: f64 = 1.0;

fn default_pressure() -> f64 {
    DEFAULT_PRESSURE
}

/// Raw pointer sample as it arrives from the client.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: f64,
    #[serde(default)]
    pub pressure: Option<f64>,
}

impl TraceEvent {
    pub fn new(x: f64, y: f64, timestamp_ms: f64) -> Self {
        Self { x, y, timestamp_ms, pressure: None }
    }

    pub fn with_pressure(mut self, pressure: f64) -> Self {
        self.pressure = Some(pressure);
        self
    }
}

/// Normalized trace sample; pressure is always present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TracePoint {
    pub x: f64,
    pub y: f64,
    pub timestamp_ms: f64,
    #[serde(default = "default_pressure")]
    pub pressure: f64,
}

impl From<&TraceEvent> for TracePoint {
    fn from(evt: &TraceEvent) -> Self {
        Self {
            x: evt.x,
            y: evt.y,
            timestamp_ms: evt.timestamp_ms,
            pressure: evt.pressure.unwrap_or(DEFAULT_PRESSURE),
        }
    }
}

/// Kinematic summary of a trace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceMetrics {
    /// Pixels per second over the whole stroke
    pub avg_speed: f64,
    /// Fastest instantaneous segment speed (pixels per second)
    pub max_speed: f64,
    /// Total path length in pixels
    pub total_length: f64,
    pub pause_count: u32,
    /// Seconds between first and last sample
    pub duration_s: f64,
    /// Raw fluidity in [0, 1], before blending with variability
    pub fluidity: f64,
}

/// Ordered samples plus their derived metrics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    pub points: Vec<TracePoint>,
    pub metrics: TraceMetrics,
}

impl Trace {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_pressure_defaults_to_one() {
        let evt: TraceEvent = serde_json::from_str(r#"{"x":1,"y":2,"timestamp_ms":10}"#).unwrap();
        assert_eq!(evt.pressure, None);
        assert_eq!(TracePoint::from(&evt).pressure, 1.0);
    }

    #[test]
    fn test_explicit_pressure_is_kept() {
        let evt = TraceEvent::new(0.0, 0.0, 0.0).with_pressure(0.4);
        assert_eq!(TracePoint::from(&evt).pressure, 0.4);
    }
}
