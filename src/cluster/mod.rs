//! Grouping of overlapping stations into map clusters
//!
//! The default `Seed` strategy groups each unprocessed station with the
//! later stations that overlap *it*, so membership does not chain through
//! other members and depends on input order. `Transitive` groups connected
//! components of the overlap graph instead.

use crate::overlap::OverlapDetector;
use crate::station::Station;
use serde::{Deserialize, Serialize};

/// How overlapping stations are grouped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusterStrategy {
    /// Greedy grouping around the first unprocessed station
    #[default]
    Seed,
    /// Connected components of the overlap graph
    Transitive,
}

impl std::fmt::Display for ClusterStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Seed => write!(f, "seed"),
            Self::Transitive => write!(f, "transitive"),
        }
    }
}

impl std::str::FromStr for ClusterStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "seed" => Ok(Self::Seed),
            "transitive" | "components" => Ok(Self::Transitive),
            _ => Err(format!("Unknown cluster strategy: {}", s)),
        }
    }
}

/// Stations drawn as a single cluster icon
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Members, seed first
    pub stations: Vec<Station>,
    /// Any member has gaps or lacks a station-info record
    pub has_problem: bool,
}

impl Cluster {
    fn new(stations: Vec<Station>) -> Self {
        let has_problem = stations.iter().any(Station::has_problem);
        Self {
            stations,
            has_problem,
        }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn contains(&self, api_id: &str) -> bool {
        self.stations.iter().any(|s| s.api_id == api_id)
    }
}

/// Group overlapped stations into clusters of two or more
pub fn build_clusters(
    overlapped: &[Station],
    detector: &OverlapDetector,
    strategy: ClusterStrategy,
) -> Vec<Cluster> {
    let groups = match strategy {
        ClusterStrategy::Seed => seed_groups(overlapped, detector),
        ClusterStrategy::Transitive => component_groups(overlapped, detector),
    };

    groups
        .into_iter()
        .filter(|group| group.len() >= 2)
        .map(|group| Cluster::new(group.into_iter().map(|i| overlapped[i].clone()).collect()))
        .collect()
}

fn seed_groups(stations: &[Station], detector: &OverlapDetector) -> Vec<Vec<usize>> {
    let mut processed = vec![false; stations.len()];
    let mut groups = Vec::new();

    for seed in 0..stations.len() {
        if processed[seed] {
            continue;
        }
        processed[seed] = true;
        let mut group = vec![seed];

        for other in (seed + 1)..stations.len() {
            if !processed[other] && detector.overlaps(&stations[seed], &stations[other]) {
                processed[other] = true;
                group.push(other);
            }
        }

        groups.push(group);
    }

    groups
}

fn component_groups(stations: &[Station], detector: &OverlapDetector) -> Vec<Vec<usize>> {
    let mut sets = DisjointSet::new(stations.len());
    for i in 0..stations.len() {
        for j in (i + 1)..stations.len() {
            if detector.overlaps(&stations[i], &stations[j]) {
                sets.union(i, j);
            }
        }
    }

    // Groups ordered by their first member; members keep input order
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut group_of_root = vec![None::<usize>; stations.len()];
    for i in 0..stations.len() {
        let root = sets.find(i);
        match group_of_root[root] {
            Some(g) => groups[g].push(i),
            None => {
                group_of_root[root] = Some(groups.len());
                groups.push(vec![i]);
            }
        }
    }
    groups
}

/// Union-find with path halving and union by size
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::MapView;
    use crate::overlap::tests::{north_of, origin};

    fn detector(threshold: f64) -> OverlapDetector {
        OverlapDetector::new(Some(MapView::new(origin()))).with_override(Some(threshold))
    }

    fn ids(cluster: &Cluster) -> Vec<&str> {
        cluster.stations.iter().map(|s| s.api_id.as_str()).collect()
    }

    /// Scan then cluster, as the map view does
    fn clusters_for(stations: &[Station], det: &OverlapDetector, strategy: ClusterStrategy) -> Vec<Cluster> {
        let (_, overlapped) = det.scan(stations);
        build_clusters(&overlapped, det, strategy)
    }

    #[test]
    fn test_empty_input() {
        assert!(build_clusters(&[], &detector(10.0), ClusterStrategy::Seed).is_empty());
        assert!(build_clusters(&[], &detector(10.0), ClusterStrategy::Transitive).is_empty());
    }

    #[test]
    fn test_chain_is_not_transitive_with_seed() {
        // a-b 8m, b-c 8m, a-c 16m
        let det = detector(10.0);
        let stations = vec![
            north_of("a", origin(), 0.0),
            north_of("b", origin(), 8.0),
            north_of("c", origin(), 16.0),
        ];

        let clusters = clusters_for(&stations, &det, ClusterStrategy::Seed);
        assert_eq!(clusters.len(), 1);
        assert_eq!(ids(&clusters[0]), ["a", "b"]);
        assert!(!clusters[0].contains("c"));
    }

    #[test]
    fn test_chain_is_one_component_with_transitive() {
        let det = detector(10.0);
        let stations = vec![
            north_of("a", origin(), 0.0),
            north_of("b", origin(), 8.0),
            north_of("c", origin(), 16.0),
        ];

        let clusters = clusters_for(&stations, &det, ClusterStrategy::Transitive);
        assert_eq!(clusters.len(), 1);
        assert_eq!(ids(&clusters[0]), ["a", "b", "c"]);
    }

    #[test]
    fn test_seed_order_decides_membership() {
        // a at 0, b 4.9m north, c 4.9m south: a-b and a-c overlap, b-c (9.8m) does not
        let det = detector(9.0);
        let a = north_of("a", origin(), 0.0);
        let b = north_of("b", origin(), 4.9);
        let c = north_of("c", origin(), -4.9);
        let far = north_of("far", origin(), 1000.0);

        let seeded_by_a = clusters_for(
            &[a.clone(), b.clone(), c.clone(), far.clone()],
            &det,
            ClusterStrategy::Seed,
        );
        assert_eq!(seeded_by_a.len(), 1);
        assert_eq!(ids(&seeded_by_a[0]), ["a", "b", "c"]);

        let seeded_by_b = clusters_for(&[b, a, c, far], &det, ClusterStrategy::Seed);
        assert_eq!(seeded_by_b.len(), 1);
        assert_eq!(ids(&seeded_by_b[0]), ["b", "a"]);
    }

    #[test]
    fn test_all_within_threshold_forms_one_cluster() {
        let det = detector(50.0);
        let stations: Vec<_> = (0..5)
            .map(|i| north_of(&format!("s{}", i), origin(), i as f64 * 2.0))
            .collect();

        for strategy in [ClusterStrategy::Seed, ClusterStrategy::Transitive] {
            let clusters = clusters_for(&stations, &det, strategy);
            assert_eq!(clusters.len(), 1);
            assert_eq!(clusters[0].len(), 5);
        }
    }

    #[test]
    fn test_transitive_keeps_separate_components_apart() {
        let det = detector(10.0);
        let stations = vec![
            north_of("a", origin(), 0.0),
            north_of("d", origin(), 500.0),
            north_of("b", origin(), 8.0),
            north_of("e", origin(), 505.0),
            north_of("c", origin(), 16.0),
        ];

        let clusters = clusters_for(&stations, &det, ClusterStrategy::Transitive);
        assert_eq!(clusters.len(), 2);
        assert_eq!(ids(&clusters[0]), ["a", "b", "c"]);
        assert_eq!(ids(&clusters[1]), ["d", "e"]);
    }

    #[test]
    fn test_no_singleton_clusters() {
        let det = detector(10.0);
        let stations = vec![
            north_of("a", origin(), 0.0),
            north_of("b", origin(), 8.0),
            north_of("c", origin(), 16.0),
            north_of("d", origin(), 500.0),
            north_of("e", origin(), 505.0),
        ];
        for strategy in [ClusterStrategy::Seed, ClusterStrategy::Transitive] {
            let clusters = clusters_for(&stations, &det, strategy);
            assert!(clusters.iter().all(|c| c.len() >= 2));
            assert_eq!(clusters.len(), 2);
        }
    }

    #[test]
    fn test_problem_flag() {
        let det = detector(10.0);
        let stations = vec![
            north_of("a", origin(), 0.0),
            north_of("b", origin(), 2.0).with_gaps(true),
            north_of("c", origin(), 500.0),
            north_of("d", origin(), 502.0),
        ];
        let clusters = clusters_for(&stations, &det, ClusterStrategy::Seed);
        assert_eq!(clusters.len(), 2);
        assert!(clusters[0].has_problem);
        assert!(!clusters[1].has_problem);
    }

    #[test]
    fn test_strategy_parse() {
        assert_eq!("seed".parse::<ClusterStrategy>().unwrap(), ClusterStrategy::Seed);
        assert_eq!(
            "Transitive".parse::<ClusterStrategy>().unwrap(),
            ClusterStrategy::Transitive
        );
        assert!("other".parse::<ClusterStrategy>().is_err());
        assert_eq!(ClusterStrategy::default().to_string(), "seed");
    }
}
