use homolog_core::{Correspondence, PointMatch, PointSet};

#[cfg(feature = "serde-serialize")]
use serde::{Deserialize, Serialize};

/// The accepted pairs of homologous points between a left and a right point set.
///
/// Every left index and every right index appears in at most one pair. Points without a
/// partner are simply absent. The pairs are kept sorted by left index.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Correspondences {
    pairs: Vec<Correspondence>,
    right_homologous: Vec<Option<usize>>,
    left_homologous: Vec<Option<usize>>,
}

impl Correspondences {
    /// An empty set between `left_len` left points and `right_len` right points.
    pub fn new(left_len: usize, right_len: usize) -> Self {
        Self {
            pairs: vec![],
            right_homologous: vec![None; left_len],
            left_homologous: vec![None; right_len],
        }
    }

    /// Returns `false` if either endpoint is out of range or already taken.
    pub(crate) fn try_insert(&mut self, correspondence: Correspondence) -> bool {
        let Correspondence { left, right, .. } = correspondence;
        match (
            self.right_homologous.get(left),
            self.left_homologous.get(right),
        ) {
            (Some(None), Some(None)) => {
                self.right_homologous[left] = Some(right);
                self.left_homologous[right] = Some(left);
                self.pairs.push(correspondence);
                true
            }
            _ => false,
        }
    }

    pub(crate) fn finish(mut self) -> Self {
        self.pairs.sort_unstable_by_key(|c| c.left);
        self
    }

    /// The accepted pairs, sorted by left index.
    pub fn pairs(&self) -> &[Correspondence] {
        &self.pairs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Correspondence> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// The right partner of a left point.
    pub fn right_of(&self, left: usize) -> Option<usize> {
        self.right_homologous.get(left).copied().flatten()
    }

    /// The left partner of a right point.
    pub fn left_of(&self, right: usize) -> Option<usize> {
        self.left_homologous.get(right).copied().flatten()
    }

    /// For every left point, the index of its homologous right point.
    pub fn right_homologous(&self) -> &[Option<usize>] {
        &self.right_homologous
    }

    /// For every right point, the index of its homologous left point.
    pub fn left_homologous(&self) -> &[Option<usize>] {
        &self.left_homologous
    }

    /// The sum of the distances of all accepted pairs.
    pub fn total_distance(&self) -> f64 {
        self.pairs.iter().map(|c| c.distance).sum()
    }

    /// The mean distance of the accepted pairs, or `None` if there are none.
    pub fn mean_distance(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.total_distance() / self.len() as f64)
        }
    }

    /// Looks up the points of every pair.
    ///
    /// Returns `None` if the sets are not the ones the correspondences were resolved for.
    pub fn point_matches(&self, left: &PointSet, right: &PointSet) -> Option<Vec<PointMatch>> {
        if left.len() != self.right_homologous.len() || right.len() != self.left_homologous.len()
        {
            return None;
        }
        Some(
            self.pairs
                .iter()
                .map(|c| PointMatch(left[c.left], right[c.right]))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Correspondences {
    type Item = &'a Correspondence;
    type IntoIter = std::slice::Iter<'a, Correspondence>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use homolog_core::KeyPoint;

    #[test]
    fn insertion_is_injective() {
        let mut correspondences = Correspondences::new(3, 2);
        assert!(correspondences.try_insert(Correspondence::new(2, 0, 1.0)));
        assert!(!correspondences.try_insert(Correspondence::new(2, 1, 0.5)));
        assert!(!correspondences.try_insert(Correspondence::new(0, 0, 0.5)));
        assert!(!correspondences.try_insert(Correspondence::new(3, 1, 0.5)));
        assert!(correspondences.try_insert(Correspondence::new(0, 1, 3.0)));
        let correspondences = correspondences.finish();
        assert_eq!(correspondences.pairs()[0].left, 0);
        assert_eq!(correspondences.right_homologous(), &[Some(1), None, Some(0)]);
        assert_eq!(correspondences.left_homologous(), &[Some(2), Some(0)]);
        assert_eq!(correspondences.left_of(1), Some(0));
        assert_eq!(correspondences.right_of(1), None);
        assert_eq!(correspondences.right_of(7), None);
        assert_eq!(correspondences.mean_distance(), Some(2.0));
    }

    #[test]
    fn point_matches_checks_lengths() {
        let mut correspondences = Correspondences::new(1, 1);
        correspondences.try_insert(Correspondence::new(0, 0, 0.0));
        let left: PointSet = vec![KeyPoint::new(1.0, 2.0)].into();
        let right: PointSet = vec![KeyPoint::new(3.0, 4.0)].into();
        assert_eq!(
            correspondences.point_matches(&left, &right),
            Some(vec![PointMatch(KeyPoint::new(1.0, 2.0), KeyPoint::new(3.0, 4.0))])
        );
        assert_eq!(correspondences.point_matches(&left, &PointSet::new()), None);
        assert_eq!(Correspondences::default().mean_distance(), None);
    }
}
