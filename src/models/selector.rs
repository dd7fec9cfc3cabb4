// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Picture selection for `replace_figure`.

use crate::error::ClientError;
use crate::util::geometry::Rect;
use serde::Serialize;
use std::cmp::Ordering;

/// Which picture on the slide to replace. All indices are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PictureSelector {
    /// Position in the slide's list of pictures
    #[serde(rename = "pic_no")]
    Position(u32),
    /// Rank by left offset
    #[serde(rename = "left_no")]
    Left(u32),
    /// Rank by top offset
    #[serde(rename = "top_no")]
    Top(u32),
    /// Rank by z-order, counting from the front
    #[serde(rename = "zorder_no")]
    ZOrder(u32),
}

impl Default for PictureSelector {
    fn default() -> Self {
        PictureSelector::Position(1)
    }
}

impl PictureSelector {
    /// Build a selector from the four optional indices.
    ///
    /// At most one may be set; with none set the first picture is selected.
    pub fn from_indices(
        pic_no: Option<u32>,
        left_no: Option<u32>,
        top_no: Option<u32>,
        zorder_no: Option<u32>,
    ) -> Result<Self, ClientError> {
        let candidates = [
            ("pic_no", pic_no.map(PictureSelector::Position)),
            ("left_no", left_no.map(PictureSelector::Left)),
            ("top_no", top_no.map(PictureSelector::Top)),
            ("zorder_no", zorder_no.map(PictureSelector::ZOrder)),
        ];

        let mut chosen = None;
        for (name, selector) in candidates {
            let Some(selector) = selector else { continue };
            if selector.index() == 0 {
                return Err(ClientError::InvalidIndex { name });
            }
            if chosen.replace(selector).is_some() {
                return Err(ClientError::ConflictingSelector);
            }
        }
        Ok(chosen.unwrap_or_default())
    }

    /// The 1-based index, whatever the selection mode.
    pub fn index(&self) -> u32 {
        match *self {
            PictureSelector::Position(n)
            | PictureSelector::Left(n)
            | PictureSelector::Top(n)
            | PictureSelector::ZOrder(n) => n,
        }
    }

    /// Apply the selector to pictures listed back to front.
    ///
    /// Returns the index into `pictures`, or `None` if out of range.
    pub fn pick(&self, pictures: &[Rect]) -> Option<usize> {
        let n = self.index() as usize;
        if n == 0 || n > pictures.len() {
            return None;
        }

        match self {
            PictureSelector::Position(_) => Some(n - 1),
            PictureSelector::ZOrder(_) => Some(pictures.len() - n),
            PictureSelector::Left(_) => Some(ranked(pictures, |a, b| a.x.total_cmp(&b.x))[n - 1]),
            PictureSelector::Top(_) => Some(ranked(pictures, |a, b| a.y.total_cmp(&b.y))[n - 1]),
        }
    }
}

/// Indices of `rects` sorted by `cmp`; equal keys keep list order.
fn ranked(rects: &[Rect], cmp: impl Fn(&Rect, &Rect) -> Ordering) -> Vec<usize> {
    let mut order: Vec<usize> = (0..rects.len()).collect();
    order.sort_by(|&a, &b| cmp(&rects[a], &rects[b]));
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pictures() -> Vec<Rect> {
        vec![
            Rect::new(300.0, 50.0, 100.0, 100.0),
            Rect::new(10.0, 200.0, 100.0, 100.0),
            Rect::new(150.0, 10.0, 100.0, 100.0),
        ]
    }

    #[test]
    fn test_default_is_first_picture() {
        let selector = PictureSelector::from_indices(None, None, None, None).unwrap();
        assert_eq!(selector, PictureSelector::Position(1));
    }

    #[test]
    fn test_single_selector_accepted() {
        assert_eq!(
            PictureSelector::from_indices(None, Some(2), None, None).unwrap(),
            PictureSelector::Left(2)
        );
        assert_eq!(
            PictureSelector::from_indices(None, None, None, Some(1)).unwrap(),
            PictureSelector::ZOrder(1)
        );
    }

    #[test]
    fn test_conflicting_selectors_rejected() {
        let err = PictureSelector::from_indices(Some(1), None, Some(2), None).unwrap_err();
        assert!(matches!(err, ClientError::ConflictingSelector));
    }

    #[test]
    fn test_zero_index_rejected() {
        let err = PictureSelector::from_indices(None, None, Some(0), None).unwrap_err();
        assert!(matches!(err, ClientError::InvalidIndex { name: "top_no" }));
    }

    #[test]
    fn test_pick() {
        let pics = pictures();
        assert_eq!(PictureSelector::Position(2).pick(&pics), Some(1));
        assert_eq!(PictureSelector::Left(1).pick(&pics), Some(1));
        assert_eq!(PictureSelector::Left(3).pick(&pics), Some(0));
        assert_eq!(PictureSelector::Top(1).pick(&pics), Some(2));
        // Front-most picture is the last one listed
        assert_eq!(PictureSelector::ZOrder(1).pick(&pics), Some(2));
        assert_eq!(PictureSelector::ZOrder(3).pick(&pics), Some(0));
        assert_eq!(PictureSelector::Position(4).pick(&pics), None);
        assert_eq!(PictureSelector::Position(1).pick(&[]), None);
    }

    #[test]
    fn test_serializes_single_parameter() {
        let value = serde_json::to_value(PictureSelector::Top(3)).unwrap();
        assert_eq!(value, serde_json::json!({ "top_no": 3 }));
    }
}
