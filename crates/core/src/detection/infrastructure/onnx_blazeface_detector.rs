//! BlazeFace (short-range) face detector on ONNX Runtime.
//!
//! The network sees a 128×128 square; boxes come back normalized to that
//! square and are mapped to the source image before being returned.
use std::path::Path;

use ndarray::Array4;

use crate::detection::domain::detection::{Detection, DetectionOptions};
use crate::detection::domain::face_detector::FaceDetector;
use crate::shared::frame::Frame;
use crate::shared::geometry::BoundingBox;

use super::execution_provider::open_session;

/// Model input resolution (square).
const INPUT_SIZE: usize = 128;

/// Boxes overlapping a better-scoring box by more than this are dropped.
const NMS_IOU_THRESH: f32 = 0.3;

/// 16×16 grid × 2 anchors + 8×8 grid × 6 anchors.
const NUM_ANCHORS: usize = 896;

/// Values per anchor in the regressor output: box (4) + 6 keypoints (12).
const REGRESSOR_STRIDE: usize = 16;

/// `(stride, anchors per cell)` for each feature map.
const FEATURE_MAPS: [(usize, usize); 2] = [(8, 2), (16, 6)];

pub struct OnnxBlazefaceDetector {
    session: ort::session::Session,
    anchors: Vec<[f32; 2]>,
}

impl OnnxBlazefaceDetector {
    pub fn new(model_path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let session = open_session(model_path)?;
        Ok(Self {
            session,
            anchors: anchor_centers(),
        })
    }
}

impl FaceDetector for OnnxBlazefaceDetector {
    fn detect(
        &mut self,
        frame: &Frame,
        options: &DetectionOptions,
    ) -> Result<Vec<Detection>, Box<dyn std::error::Error>> {
        if frame.width() == 0 || frame.height() == 0 {
            return Ok(Vec::new());
        }

        let input = ort::value::Tensor::from_array(to_input_tensor(frame))?;
        let outputs = self.session.run(ort::inputs![input])?;

        // [1, 896, 16] box/keypoint regressors, [1, 896, 1] logits
        if outputs.len() < 2 {
            return Err(format!("BlazeFace expected 2 outputs, got {}", outputs.len()).into());
        }
        let regressors = outputs[0].try_extract_array::<f32>()?;
        let logits = outputs[1].try_extract_array::<f32>()?;
        let regressors = regressors.as_slice().ok_or("regressor tensor is not contiguous")?;
        let logits = logits.as_slice().ok_or("score tensor is not contiguous")?;

        let candidates = decode(
            &self.anchors,
            regressors,
            logits,
            options.min_confidence(),
        );
        let sx = frame.width() as f32;
        let sy = frame.height() as f32;
        let dims = frame.dimensions();

        Ok(non_max_suppression(candidates, NMS_IOU_THRESH)
            .into_iter()
            .map(|d| Detection {
                bbox: d.bbox.scale(sx, sy).clamp_to(dims),
                score: d.score,
            })
            .filter(|d| d.bbox.area() > 0.0)
            .collect())
    }
}

/// Nearest-neighbour resample to `INPUT_SIZE²`, scaled to [0, 1], NCHW.
fn to_input_tensor(frame: &Frame) -> Array4<f32> {
    let pixels = frame.as_ndarray();
    let (src_h, src_w) = (frame.height() as usize, frame.width() as usize);

    Array4::from_shape_fn((1, 3, INPUT_SIZE, INPUT_SIZE), |(_, c, y, x)| {
        let sy = ((y * 2 + 1) * src_h / (INPUT_SIZE * 2)).min(src_h - 1);
        let sx = ((x * 2 + 1) * src_w / (INPUT_SIZE * 2)).min(src_w - 1);
        pixels[[sy, sx, c]] as f32 / 255.0
    })
}

/// Anchor centers in normalized `[0, 1]` coordinates, in model output order.
fn anchor_centers() -> Vec<[f32; 2]> {
    let mut anchors = Vec::with_capacity(NUM_ANCHORS);
    for (stride, per_cell) in FEATURE_MAPS {
        let grid = INPUT_SIZE / stride;
        for row in 0..grid {
            for col in 0..grid {
                let center = [
                    (col as f32 + 0.5) / grid as f32,
                    (row as f32 + 0.5) / grid as f32,
                ];
                anchors.extend(std::iter::repeat(center).take(per_cell));
            }
        }
    }
    anchors
}

/// Decode regressors against their anchors, keeping scores at or above `min_score`.
///
/// Boxes are normalized to the unit square.
fn decode(anchors: &[[f32; 2]], regressors: &[f32], logits: &[f32], min_score: f32) -> Vec<Detection> {
    let input = INPUT_SIZE as f32;
    anchors
        .iter()
        .zip(logits)
        .zip(regressors.chunks_exact(REGRESSOR_STRIDE))
        .filter_map(|((anchor, &logit), reg)| {
            let score = sigmoid(logit);
            if score < min_score {
                return None;
            }
            let cx = anchor[0] + reg[0] / input;
            let cy = anchor[1] + reg[1] / input;
            let w = reg[2] / input;
            let h = reg[3] / input;
            Some(Detection {
                bbox: BoundingBox::from_corners(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0),
                score,
            })
        })
        .collect()
}

/// Greedy NMS: best-scoring boxes first, drop anything overlapping a kept box.
fn non_max_suppression(mut candidates: Vec<Detection>, iou_thresh: f32) -> Vec<Detection> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    let mut kept: Vec<Detection> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        if kept.iter().all(|k| k.bbox.iou(&candidate.bbox) <= iou_thresh) {
            kept.push(candidate);
        }
    }
    kept
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn det(x: f32, y: f32, size: f32, score: f32) -> Detection {
        Detection {
            bbox: BoundingBox::new(x, y, size, size),
            score,
        }
    }

    #[test]
    fn test_input_tensor_shape_and_range() {
        let frame = Frame::filled(200, 100, [255, 0, 128]);
        let tensor = to_input_tensor(&frame);
        assert_eq!(tensor.shape(), &[1, 3, 128, 128]);
        assert_relative_eq!(tensor[[0, 0, 5, 5]], 1.0);
        assert_relative_eq!(tensor[[0, 1, 5, 5]], 0.0);
        assert_relative_eq!(tensor[[0, 2, 127, 127]], 128.0 / 255.0);
    }

    #[test]
    fn test_input_tensor_from_single_pixel() {
        let frame = Frame::filled(1, 1, [51, 51, 51]);
        let tensor = to_input_tensor(&frame);
        assert_relative_eq!(tensor[[0, 0, 127, 0]], 0.2);
    }

    #[test]
    fn test_anchor_count_and_range() {
        let anchors = anchor_centers();
        assert_eq!(anchors.len(), NUM_ANCHORS);
        assert!(anchors
            .iter()
            .all(|a| a[0] > 0.0 && a[0] < 1.0 && a[1] > 0.0 && a[1] < 1.0));
    }

    #[test]
    fn test_first_anchors_share_a_cell() {
        let anchors = anchor_centers();
        assert_eq!(anchors[0], anchors[1]);
        assert_relative_eq!(anchors[0][0], 0.5 / 16.0);
    }

    #[test]
    fn test_decode_filters_by_score() {
        let anchors = vec![[0.5, 0.5], [0.25, 0.25]];
        let mut regressors = vec![0.0; 2 * REGRESSOR_STRIDE];
        // both boxes 32px wide in model space
        regressors[2] = 32.0;
        regressors[3] = 32.0;
        regressors[REGRESSOR_STRIDE + 2] = 32.0;
        regressors[REGRESSOR_STRIDE + 3] = 32.0;
        let logits = vec![4.0, -4.0];

        let dets = decode(&anchors, &regressors, &logits, 0.5);
        assert_eq!(dets.len(), 1);
        let b = dets[0].bbox;
        assert_relative_eq!(b.x, 0.375);
        assert_relative_eq!(b.width, 0.25);
        assert!(dets[0].score > 0.98);
    }

    #[test]
    fn test_decode_threshold_zero_keeps_everything() {
        let anchors = vec![[0.5, 0.5]; 3];
        let regressors = vec![0.0; 3 * REGRESSOR_STRIDE];
        let logits = vec![-20.0, 0.0, 20.0];
        assert_eq!(decode(&anchors, &regressors, &logits, 0.0).len(), 3);
    }

    #[test]
    fn test_nms_suppresses_overlap() {
        let kept = non_max_suppression(
            vec![det(5.0, 5.0, 100.0, 0.7), det(0.0, 0.0, 100.0, 0.9)],
            NMS_IOU_THRESH,
        );
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].score, 0.9);
    }

    #[test]
    fn test_nms_keeps_separate_faces() {
        let kept = non_max_suppression(
            vec![det(0.0, 0.0, 50.0, 0.9), det(200.0, 200.0, 50.0, 0.8)],
            NMS_IOU_THRESH,
        );
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn test_sigmoid() {
        assert_relative_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(10.0) > 0.999);
        assert!(sigmoid(-10.0) < 0.001);
    }
}
