use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectedPoint {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub point_index: usize,
    #[serde(default)]
    pub curve_number: usize,
}

impl SelectedPoint {
    #[must_use]
    pub fn new(x: f64, y: f64, point_index: usize) -> Self {
        Self {
            x,
            y,
            point_index,
            curve_number: 0,
        }
    }
}

/// Region drawn by the box or lasso tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tool", rename_all = "snake_case")]
pub enum SelectionRegion {
    Range { x: (f64, f64), y: (f64, f64) },
    Lasso { x: Vec<f64>, y: Vec<f64> },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl BoundingBox {
    fn enclosing(xs: impl IntoIterator<Item = f64>, ys: impl IntoIterator<Item = f64>) -> Option<Self> {
        let (min_x, max_x) = min_max(xs)?;
        let (min_y, max_y) = min_max(ys)?;
        Some(Self {
            min_x,
            max_x,
            min_y,
            max_y,
        })
    }

    #[must_use]
    pub fn area(self) -> f64 {
        (self.max_x - self.min_x) * (self.max_y - self.min_y)
    }
}

fn min_max(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((min, max)) => Some((min.min(v), max.max(v))),
        })
}

/// Points picked with a box or lasso selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    #[serde(default)]
    pub points: Vec<SelectedPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<SelectionRegion>,
}

impl Selection {
    #[must_use]
    pub fn new(points: Vec<SelectedPoint>, region: Option<SelectionRegion>) -> Self {
        Self { points, region }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Box around the drawn region, falling back to the selected points.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        match &self.region {
            Some(SelectionRegion::Range { x, y }) => {
                BoundingBox::enclosing([x.0, x.1], [y.0, y.1])
            }
            Some(SelectionRegion::Lasso { x, y }) => {
                BoundingBox::enclosing(x.iter().copied(), y.iter().copied())
            }
            None => BoundingBox::enclosing(
                self.points.iter().map(|p| p.x),
                self.points.iter().map(|p| p.y),
            ),
        }
    }

    /// Selected points per unit of bounding-box area.
    ///
    /// `None` when nothing is selected or the box has zero area.
    #[must_use]
    pub fn density(&self) -> Option<f64> {
        if self.points.is_empty() {
            return None;
        }
        let area = self.bounding_box()?.area();
        if !area.is_finite() || area <= 0.0 {
            return None;
        }
        Some(self.points.len() as f64 / area)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_selection_density() {
        let selection = Selection::new(
            vec![SelectedPoint::new(1.0, 1.0, 0), SelectedPoint::new(2.0, 3.0, 1)],
            Some(SelectionRegion::Range {
                x: (0.0, 2.0),
                y: (0.0, 4.0),
            }),
        );
        assert_eq!(selection.density(), Some(0.25));
    }

    #[test]
    fn single_point_without_region_has_no_density() {
        let selection = Selection::new(vec![SelectedPoint::new(1.0, 1.0, 0)], None);
        assert_eq!(selection.density(), None);
    }
}
