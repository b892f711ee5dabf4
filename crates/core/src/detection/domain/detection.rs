use crate::shared::constants::DEFAULT_MIN_CONFIDENCE;
use crate::shared::geometry::{BoundingBox, Dimensions};

/// One detected face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub score: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectionOptions {
    min_confidence: f32,
}

impl DetectionOptions {
    pub fn new(min_confidence: f32) -> Self {
        let min_confidence = if min_confidence.is_nan() {
            DEFAULT_MIN_CONFIDENCE
        } else {
            min_confidence.clamp(0.0, 1.0)
        };
        Self { min_confidence }
    }

    pub fn min_confidence(&self) -> f32 {
        self.min_confidence
    }
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_CONFIDENCE)
    }
}

/// Everything one detection run produced, in the coordinates of `source`.
///
/// A new run replaces the previous set wholesale; sets are never merged.
#[derive(Clone, Debug, PartialEq)]
pub struct DetectionResultSet {
    detections: Vec<Detection>,
    source: Dimensions,
}

impl DetectionResultSet {
    /// Orders detections by descending score.
    pub fn new(mut detections: Vec<Detection>, source: Dimensions) -> Self {
        detections.sort_by(|a, b| b.score.total_cmp(&a.score));
        Self { detections, source }
    }

    pub fn empty(source: Dimensions) -> Self {
        Self::new(Vec::new(), source)
    }

    pub fn detections(&self) -> &[Detection] {
        &self.detections
    }

    pub fn source(&self) -> Dimensions {
        self.source
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    /// Maps every box from the source image size to `target`.
    ///
    /// The detector works on the full-resolution image while the panel shows
    /// a scaled-down copy, so boxes are rescaled before drawing.
    pub fn resize_to(&self, target: Dimensions) -> DetectionResultSet {
        if self.source.width == 0 || self.source.height == 0 {
            return DetectionResultSet::empty(target);
        }
        let sx = target.width as f32 / self.source.width as f32;
        let sy = target.height as f32 / self.source.height as f32;
        let detections = self
            .detections
            .iter()
            .map(|d| Detection {
                bbox: d.bbox.scale(sx, sy),
                score: d.score,
            })
            .collect();
        Self {
            detections,
            source: target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    fn det(x: f32, score: f32) -> Detection {
        Detection {
            bbox: BoundingBox::new(x, 10.0, 20.0, 20.0),
            score,
        }
    }

    #[test]
    fn test_new_orders_by_descending_score() {
        let set = DetectionResultSet::new(
            vec![det(0.0, 0.6), det(50.0, 0.9), det(100.0, 0.7)],
            Dimensions::new(200, 100),
        );
        let scores: Vec<f32> = set.detections().iter().map(|d| d.score).collect();
        assert_eq!(scores, vec![0.9, 0.7, 0.6]);
    }

    #[test]
    fn test_resize_to_halves_coordinates() {
        let set = DetectionResultSet::new(vec![det(100.0, 0.8)], Dimensions::new(800, 600));
        let resized = set.resize_to(Dimensions::new(400, 300));
        let b = resized.detections()[0].bbox;
        assert_relative_eq!(b.x, 50.0);
        assert_relative_eq!(b.y, 5.0);
        assert_relative_eq!(b.width, 10.0);
        assert_relative_eq!(b.height, 10.0);
        assert_eq!(resized.source(), Dimensions::new(400, 300));
    }

    #[test]
    fn test_resize_keeps_scores_and_order() {
        let set = DetectionResultSet::new(
            vec![det(0.0, 0.55), det(10.0, 0.95)],
            Dimensions::new(100, 100),
        );
        let resized = set.resize_to(Dimensions::new(50, 50));
        assert_eq!(resized.len(), 2);
        assert_eq!(resized.detections()[0].score, 0.95);
        assert_eq!(resized.detections()[1].score, 0.55);
    }

    #[test]
    fn test_resize_empty_source_yields_empty() {
        let set = DetectionResultSet::new(vec![det(0.0, 0.9)], Dimensions::new(0, 0));
        assert!(set.resize_to(Dimensions::new(10, 10)).is_empty());
    }

    #[rstest]
    #[case(0.5, 0.5)]
    #[case(-1.0, 0.0)]
    #[case(3.0, 1.0)]
    #[case(f32::NAN, DEFAULT_MIN_CONFIDENCE)]
    fn test_options_clamp_confidence(#[case] input: f32, #[case] expected: f32) {
        assert_eq!(DetectionOptions::new(input).min_confidence(), expected);
    }

    #[test]
    fn test_default_threshold_is_half() {
        assert_eq!(DetectionOptions::default().min_confidence(), 0.5);
    }
}
