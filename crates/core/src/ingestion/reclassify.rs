use log::{debug, info};
use std::collections::BTreeMap;

use super::ingestion_model::{ReclassifyReport, StoredSecurity};
use super::ingestion_traits::StatementStoreTrait;
use crate::classification::classify_holding;
use crate::errors::Result;

/// Re-runs classification over every stored security and updates holdings
/// whose asset type or category no longer matches the current rules.
///
/// Each (name, section) pair is classified once, however many stale
/// classifications it is stored under. Running it twice changes nothing the
/// second time.
pub fn reclassify(store: &dyn StatementStoreTrait) -> Result<ReclassifyReport> {
    let securities = store.stored_securities()?;
    let mut report = ReclassifyReport {
        examined: securities.len(),
        ..Default::default()
    };

    let mut by_key: BTreeMap<(&str, Option<&str>), Vec<&StoredSecurity>> = BTreeMap::new();
    for security in &securities {
        by_key
            .entry((security.security_name.as_str(), security.section.as_deref()))
            .or_default()
            .push(security);
    }

    for ((name, section), stored) in by_key {
        let classification = classify_holding(name, section);
        let stale: Vec<_> = stored
            .iter()
            .filter(|s| {
                s.asset_type != classification.asset_type
                    || s.asset_category != classification.asset_category
            })
            .collect();
        let Some(first) = stale.first() else {
            continue;
        };
        for security in &stale {
            debug!(
                "Reclassifying '{}': {} / {} -> {} / {}",
                name,
                security.asset_type,
                security.asset_category,
                classification.asset_type,
                classification.asset_category
            );
        }
        report.changed += store.update_classification(first, &classification)?;
    }

    info!(
        "Reclassified {} holding row(s) across {} stored securities",
        report.changed, report.examined
    );
    Ok(report)
}
