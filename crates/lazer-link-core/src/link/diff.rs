//! Materializes only the sets a reference catalog lacks

use std::collections::HashSet;

use tracing::info;

use crate::beatmap::BeatmapSet;
use crate::catalog::CatalogStore;
use crate::link::{ProjectionResult, Projector};

/// Sets of `primary` whose online ID does not occur in `reference`
pub fn difference<'p>(
    primary: &'p dyn CatalogStore,
    reference: &dyn CatalogStore,
) -> Vec<&'p BeatmapSet> {
    let reference_ids: HashSet<i64> = reference
        .beatmap_sets()
        .iter()
        .map(|set| set.online_id)
        .collect();

    primary
        .beatmap_sets()
        .iter()
        .filter(|set| !reference_ids.contains(&set.online_id))
        .collect()
}

/// Materialize the sets unique to `primary`
pub fn materialize_difference(
    projector: &Projector<'_>,
    primary: &dyn CatalogStore,
    reference: &dyn CatalogStore,
) -> ProjectionResult {
    let missing = difference(primary, reference);
    info!(
        "{} of {} beatmap sets are missing from the reference catalog",
        missing.len(),
        primary.beatmap_sets().len()
    );
    projector.materialize_sets(missing)
}
