//! Splits series onto at most two y-axes by their `group` attribute.

use std::sync::Arc;

use smallvec::SmallVec;

use crate::error::{ChartError, Result};
use crate::series::Series;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Primary,
    Secondary,
}

/// Axis assignment for every series, in series order.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisGroups {
    /// First two distinct group values, in order of appearance.
    pub primary: Option<Arc<str>>,
    pub secondary: Option<Arc<str>>,
    assignment: Vec<Axis>,
}

impl AxisGroups {
    /// Walks the series once, recording the first two distinct groups.
    ///
    /// A third distinct group is an error naming how many were found.
    pub fn split(series: &[Series]) -> Result<Self> {
        let mut distinct: SmallVec<[Arc<str>; 2]> = SmallVec::new();
        let mut assignment = Vec::with_capacity(series.len());
        for s in series {
            let slot = match distinct.iter().position(|g| *g == s.group) {
                Some(i) => i,
                None => {
                    distinct.push(s.group.clone());
                    distinct.len() - 1
                }
            };
            assignment.push(if slot == 0 {
                Axis::Primary
            } else {
                Axis::Secondary
            });
        }

        if distinct.len() > 2 {
            return Err(ChartError::AxisGroupOverflow {
                count: distinct.len(),
                groups: distinct.iter().map(|g| g.to_string()).collect(),
            });
        }

        let mut it = distinct.into_iter();
        Ok(Self {
            primary: it.next(),
            secondary: it.next(),
            assignment,
        })
    }

    pub fn has_second_axis(&self) -> bool {
        self.secondary.is_some()
    }

    /// Axis of the series at `series_idx`.
    pub fn axis_of(&self, series_idx: usize) -> Axis {
        self.assignment
            .get(series_idx)
            .copied()
            .unwrap_or(Axis::Primary)
    }

    /// Indices of the series on `axis`, in series order.
    pub fn members(&self, axis: Axis) -> impl Iterator<Item = usize> + '_ {
        self.assignment
            .iter()
            .enumerate()
            .filter(move |(_, a)| **a == axis)
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(id: &str, group: &str) -> Series {
        Series {
            id: id.into(),
            label: id.into(),
            group: group.into(),
            values: Vec::new(),
        }
    }

    #[test]
    fn first_two_groups_map_to_axes_in_order() {
        let s = vec![series("a", "rate"), series("b", "count"), series("c", "rate")];
        let g = AxisGroups::split(&s).unwrap();
        assert_eq!(g.primary.as_deref(), Some("rate"));
        assert_eq!(g.secondary.as_deref(), Some("count"));
        assert!(g.has_second_axis());
        assert_eq!(g.axis_of(2), Axis::Primary);
        assert_eq!(g.members(Axis::Secondary).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn single_group_has_no_second_axis() {
        let g = AxisGroups::split(&[series("a", ""), series("b", "")]).unwrap();
        assert!(!g.has_second_axis());
        assert_eq!(g.members(Axis::Primary).count(), 2);
    }

    #[test]
    fn third_group_is_rejected() {
        let s = vec![series("a", "1"), series("b", "2"), series("c", "3")];
        assert_eq!(
            AxisGroups::split(&s).unwrap_err(),
            ChartError::AxisGroupOverflow {
                count: 3,
                groups: vec!["1".into(), "2".into(), "3".into()],
            }
        );
    }
}
