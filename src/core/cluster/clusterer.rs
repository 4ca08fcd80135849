//! Single-pass temporal clustering.

use super::FileCluster;
use crate::core::scanner::FileDescriptor;
use chrono::Duration;

/// Configuration for clustering
#[derive(Debug, Clone)]
pub struct ClusterConfig {
    /// Largest gap between neighbouring files that keeps them together
    pub max_gap: Duration,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            max_gap: Duration::hours(15),
        }
    }
}

/// Partitions date-ordered media files into clusters
pub struct Clusterer {
    config: ClusterConfig,
}

impl Clusterer {
    pub fn new(config: ClusterConfig) -> Self {
        Self { config }
    }

    /// Cluster `files`, which must already be sorted by ascending date.
    ///
    /// A gap is measured from the previous file, not from the start of the
    /// cluster, so a steady trickle of photos can form one long cluster.
    pub fn cluster(&self, files: &[FileDescriptor]) -> Vec<FileCluster> {
        debug_assert!(
            files.windows(2).all(|w| w[0].date() <= w[1].date()),
            "clusterer input must be sorted by date"
        );

        let mut clusters = Vec::new();
        let mut current: Vec<FileDescriptor> = Vec::new();

        for file in files {
            if let Some(previous) = current.last() {
                if file.date() - previous.date() > self.config.max_gap {
                    clusters.extend(FileCluster::from_files(std::mem::take(&mut current)));
                }
            }
            current.push(file.clone());
        }
        clusters.extend(FileCluster::from_files(current));

        clusters
    }
}

impl Default for Clusterer {
    fn default() -> Self {
        Self::new(ClusterConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::test_support::{base_time, descriptor};

    fn at_hours(hours: &[i64]) -> Vec<FileDescriptor> {
        hours
            .iter()
            .enumerate()
            .map(|(i, h)| descriptor(&format!("/p/{}.jpg", i), base_time() + Duration::hours(*h)))
            .collect()
    }

    fn sizes(clusters: &[FileCluster]) -> Vec<usize> {
        clusters.iter().map(|c| c.len()).collect()
    }

    #[test]
    fn empty_input_gives_no_clusters() {
        assert!(Clusterer::default().cluster(&[]).is_empty());
    }

    #[test]
    fn single_file_is_one_cluster() {
        let clusters = Clusterer::default().cluster(&at_hours(&[0]));

        assert_eq!(sizes(&clusters), vec![1]);
        assert_eq!(clusters[0].start, clusters[0].end);
        assert_eq!(clusters[0].dir_name, "2024-01-15");
    }

    #[test]
    fn large_gap_splits_clusters() {
        let clusters = Clusterer::default().cluster(&at_hours(&[0, 1, 20, 22]));

        assert_eq!(sizes(&clusters), vec![2, 2]);
        assert_eq!(clusters[0].start, base_time());
        assert_eq!(clusters[0].end, base_time() + Duration::hours(1));
        assert_eq!(clusters[1].start, base_time() + Duration::hours(20));
        assert_eq!(clusters[1].end, base_time() + Duration::hours(22));
    }

    #[test]
    fn gap_of_exactly_the_threshold_stays_together() {
        let clusters = Clusterer::default().cluster(&at_hours(&[0, 15]));
        assert_eq!(sizes(&clusters), vec![2]);
    }

    #[test]
    fn gap_just_over_the_threshold_splits() {
        let files = vec![
            descriptor("/p/a.jpg", base_time()),
            descriptor(
                "/p/b.jpg",
                base_time() + Duration::hours(15) + Duration::seconds(1),
            ),
        ];
        let clusters = Clusterer::default().cluster(&files);
        assert_eq!(sizes(&clusters), vec![1, 1]);
    }

    #[test]
    fn gap_is_measured_from_previous_file() {
        // Every step is 10 h, so the chain holds even though it spans 40 h
        let clusters = Clusterer::default().cluster(&at_hours(&[0, 10, 20, 30, 40]));

        assert_eq!(sizes(&clusters), vec![5]);
        assert_eq!(clusters[0].span(), Duration::hours(40));
        assert_eq!(clusters[0].dir_name, "2024-01");
    }

    #[test]
    fn clusters_partition_the_input_in_order() {
        let input = at_hours(&[0, 2, 30, 31, 100, 200, 201]);
        let clusters = Clusterer::default().cluster(&input);

        let flattened: Vec<FileDescriptor> =
            clusters.iter().flat_map(|c| c.files.clone()).collect();
        assert_eq!(flattened, input);
        assert_eq!(sizes(&clusters), vec![2, 2, 1, 2]);
    }

    #[test]
    fn threshold_is_configurable() {
        let clusterer = Clusterer::new(ClusterConfig {
            max_gap: Duration::hours(1),
        });
        let clusters = clusterer.cluster(&at_hours(&[0, 1, 3]));
        assert_eq!(sizes(&clusters), vec![2, 1]);
    }
}
