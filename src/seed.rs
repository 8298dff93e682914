// Seed data: the canonical museum list and a JSON loader

use crate::model::SeedVisit;
use eyre::{Context, Result};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// The canonical seed set: 8 museums, 3 already visited, 5 still to visit
pub fn default_visits() -> Vec<SeedVisit> {
    vec![
        SeedVisit::new("Museo del Prado", "2025-03-15", true),
        SeedVisit::new("Museo Egizio", "2025-04-02", true),
        SeedVisit::new("Museo Nazionale Romano", "2025-04-20", true),
        SeedVisit::new("Museo di Capodimonte", "2025-05-11", false),
        SeedVisit::new("Museo Galileo", "2025-06-10", false),
        SeedVisit::new("Museo Archeologico Nazionale di Napoli", "2025-07-05", false),
        SeedVisit::new("Museo delle Scienze", "2025-08-22", false),
        SeedVisit::new("Museo Leonardo da Vinci", "2025-09-14", false),
    ]
}

/// Load a seed list from a JSON file: an ordered array of
/// `{"name": ..., "date": "YYYY-MM-DD", "completed": ...}` objects.
///
/// Seed data is trusted, so entries are taken as-is; a file that does not
/// parse is an error for the caller, not a store rejection.
pub fn load_seed_file<P: AsRef<Path>>(path: P) -> Result<Vec<SeedVisit>> {
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open seed file {}", path.display()))?;
    let reader = BufReader::new(file);
    let seed: Vec<SeedVisit> =
        serde_json::from_reader(reader).context("Failed to parse seed file as a JSON visit list")?;
    debug!(count = seed.len(), file = ?path, "loaded seed file");
    Ok(seed)
}
