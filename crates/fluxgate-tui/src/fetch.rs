//! Background usage fetch -- bridges the async panel client to the
//! synchronous render loop.
//!
//! Each selection change spawns one fetch task tagged with a generation
//! counter; the app discards any result whose generation no longer
//! matches, so a stale response can never overwrite a newer selection.

use chrono::{FixedOffset, Utc};
use tokio::sync::mpsc::UnboundedSender;

use fluxgate_api::{PanelClient, UsageScope};
use fluxgate_core::{
    ChartRow, Entity, LabelContext, LabelLocale, QueryRange, RangeSelection, StatsSeries, convert,
    normalize, resolve_range,
};

/// Result of one background fetch, tagged with its generation.
#[derive(Debug)]
pub enum FetchOutcome {
    Usage {
        generation: u64,
        range: QueryRange,
        entities: Vec<Entity>,
        rows: Vec<ChartRow>,
    },
    Failed {
        generation: u64,
        message: String,
    },
}

impl FetchOutcome {
    pub fn generation(&self) -> u64 {
        match self {
            Self::Usage { generation, .. } | Self::Failed { generation, .. } => *generation,
        }
    }
}

/// Spawn a fetch for the given selection; the outcome arrives on `tx`.
#[allow(clippy::too_many_arguments)]
pub fn spawn_usage_fetch(
    handle: &tokio::runtime::Handle,
    client: PanelClient,
    scope: UsageScope,
    selection: RangeSelection,
    locale: LabelLocale,
    utc_offset: FixedOffset,
    generation: u64,
    tx: UnboundedSender<FetchOutcome>,
) {
    handle.spawn(async move {
        let outcome = fetch(&client, scope, selection, locale, utc_offset, generation).await;
        let _ = tx.send(outcome);
    });
}

async fn fetch(
    client: &PanelClient,
    scope: UsageScope,
    selection: RangeSelection,
    locale: LabelLocale,
    utc_offset: FixedOffset,
    generation: u64,
) -> FetchOutcome {
    let now = Utc::now();
    let labels = LabelContext::new(locale, utc_offset, now);

    let range = match resolve_range(&selection, now) {
        Ok(range) => range,
        Err(e) => {
            return FetchOutcome::Failed {
                generation,
                message: e.to_string(),
            };
        }
    };

    let entities = match scope {
        UsageScope::Nodes => client
            .list_nodes()
            .await
            .map(|nodes| convert::entities_from_nodes(&nodes)),
        UsageScope::Admins => client
            .list_admins()
            .await
            .map(|admins| convert::entities_from_admins(&admins)),
    };
    let entities = match entities {
        Ok(entities) => entities,
        Err(e) => {
            return FetchOutcome::Failed {
                generation,
                message: e.to_string(),
            };
        }
    };

    let raw = match client
        .get_usage(
            scope,
            range.start,
            range.end,
            &range.granularity.to_string(),
        )
        .await
    {
        Ok(raw) => raw,
        Err(e) => {
            return FetchOutcome::Failed {
                generation,
                message: e.to_string(),
            };
        }
    };

    let stats = StatsSeries::from(&raw);
    let rows = normalize(&range, &stats, &entities, &labels);

    FetchOutcome::Usage {
        generation,
        range,
        entities,
        rows,
    }
}
