//! Merging of duplicate cylinder detections.
//!
//! The same hole or post is often detected several times, once per Z band
//! or per pass. Detections whose axis centers lie within a per-axis XY box
//! of each other are merged into one [`CylinderCluster`].

use hashbrown::HashMap;
use tracing::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::detection::CylinderDetection;

/// How detections are grouped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ClusterStrategy {
    /// Single greedy scan: each unassigned detection seeds a cluster and
    /// takes every unassigned detection within tolerance of the seed.
    ///
    /// Membership is relative to the seed only, so a chain A~B~C with A and
    /// C far apart can split depending on input order.
    #[default]
    SeedBox,
    /// Connected components of the "within tolerance" relation. Any chain
    /// of close detections ends up in one cluster regardless of order.
    Transitive,
}

/// Parameters for [`cluster_cylinders`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusterParams {
    /// Two centers are close when both `|dx|` and `|dy|` are below this.
    pub xy_tolerance: f64,
    /// Grouping strategy.
    pub strategy: ClusterStrategy,
}

impl Default for ClusterParams {
    fn default() -> Self {
        Self {
            xy_tolerance: 1.0,
            strategy: ClusterStrategy::SeedBox,
        }
    }
}

impl ClusterParams {
    /// Create parameters with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the XY tolerance.
    #[must_use]
    pub const fn with_xy_tolerance(mut self, tolerance: f64) -> Self {
        self.xy_tolerance = tolerance;
        self
    }

    /// Set the grouping strategy.
    #[must_use]
    pub const fn with_strategy(mut self, strategy: ClusterStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    fn close(&self, a: &CylinderDetection, b: &CylinderDetection) -> bool {
        (a.center.x - b.center.x).abs() < self.xy_tolerance
            && (a.center.y - b.center.y).abs() < self.xy_tolerance
    }
}

/// One physical hole or post, aggregated from its detections.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CylinderCluster {
    /// Mean X of the member centers.
    pub x: f64,
    /// Mean Y of the member centers.
    pub y: f64,
    /// Mean member radius.
    pub radius: f64,
    /// Lowest member `z_min`.
    pub z_min: f64,
    /// Highest member `z_max`.
    pub z_max: f64,
    /// `z_max - z_min`.
    pub height: f64,
    /// Number of merged detections.
    pub member_count: usize,
    /// Indices of the members in the input slice, ascending.
    pub members: Vec<usize>,
}

impl CylinderCluster {
    /// Diameter (twice the mean radius).
    #[must_use]
    pub fn diameter(&self) -> f64 {
        self.radius * 2.0
    }

    #[allow(clippy::cast_precision_loss)]
    // Precision loss: detection counts beyond 2^52 are unsupported
    fn aggregate(detections: &[CylinderDetection], members: Vec<usize>) -> Self {
        let n = members.len() as f64;
        let mut x = 0.0;
        let mut y = 0.0;
        let mut radius = 0.0;
        let mut z_min = f64::INFINITY;
        let mut z_max = f64::NEG_INFINITY;

        for d in members.iter().map(|&i| &detections[i]) {
            x += d.center.x;
            y += d.center.y;
            radius += d.radius;
            z_min = z_min.min(d.z_min);
            z_max = z_max.max(d.z_max);
        }

        Self {
            x: x / n,
            y: y / n,
            radius: radius / n,
            z_min,
            z_max,
            height: z_max - z_min,
            member_count: members.len(),
            members,
        }
    }
}

/// Group cylinder detections that share an XY position.
///
/// Clusters are returned in the order they were opened, which is the order
/// of their first member in `detections`. An empty input gives an empty
/// output.
///
/// # Example
///
/// ```
/// use mesh_primitives::{ClusterParams, CylinderDetection, cluster_cylinders};
/// use nalgebra::{Point3, Vector3};
///
/// let hole = |x: f64, y: f64, z: f64| CylinderDetection {
///     center: Point3::new(x, y, z),
///     axis: Vector3::z(),
///     radius: 1.5,
///     inlier_count: 40,
///     z_min: z,
///     z_max: z + 2.0,
///     height: 2.0,
///     inliers: Vec::new(),
/// };
///
/// let clusters = cluster_cylinders(&[hole(5.0, 5.0, 0.0), hole(5.2, 4.9, 2.0)], &ClusterParams::default());
/// assert_eq!(clusters.len(), 1);
/// assert_eq!(clusters[0].member_count, 2);
/// ```
#[must_use]
pub fn cluster_cylinders(
    detections: &[CylinderDetection],
    params: &ClusterParams,
) -> Vec<CylinderCluster> {
    let groups = match params.strategy {
        ClusterStrategy::SeedBox => seed_box_groups(detections, params),
        ClusterStrategy::Transitive => transitive_groups(detections, params),
    };

    debug!(
        detections = detections.len(),
        clusters = groups.len(),
        strategy = ?params.strategy,
        "Clustered cylinder detections"
    );

    groups
        .into_iter()
        .map(|members| CylinderCluster::aggregate(detections, members))
        .collect()
}

fn seed_box_groups(detections: &[CylinderDetection], params: &ClusterParams) -> Vec<Vec<usize>> {
    let mut assigned = vec![false; detections.len()];
    let mut groups = Vec::new();

    for (seed, seed_detection) in detections.iter().enumerate() {
        if assigned[seed] {
            continue;
        }
        assigned[seed] = true;
        let mut members = vec![seed];

        // Every index before the seed is already assigned
        for (other, detection) in detections.iter().enumerate().skip(seed + 1) {
            if !assigned[other] && params.close(seed_detection, detection) {
                assigned[other] = true;
                members.push(other);
            }
        }
        groups.push(members);
    }

    groups
}

fn transitive_groups(detections: &[CylinderDetection], params: &ClusterParams) -> Vec<Vec<usize>> {
    let mut parent: Vec<usize> = (0..detections.len()).collect();

    for i in 0..detections.len() {
        for j in (i + 1)..detections.len() {
            if params.close(&detections[i], &detections[j]) {
                let ri = find_root(&mut parent, i);
                let rj = find_root(&mut parent, j);
                if ri != rj {
                    // Smaller index wins so roots are first members
                    parent[ri.max(rj)] = ri.min(rj);
                }
            }
        }
    }

    let mut group_of_root: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<Vec<usize>> = Vec::new();
    for i in 0..detections.len() {
        let root = find_root(&mut parent, i);
        let slot = *group_of_root.entry(root).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(i);
    }

    groups
}

fn find_root(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

/// Sort clusters by descending diameter, keeping input order among equals.
pub fn sort_by_diameter_desc(clusters: &mut [CylinderCluster]) {
    clusters.sort_by(|a, b| b.radius.total_cmp(&a.radius));
}
