//! Roll-up of raw click rows into the summary views served by the
//! analytics API.
//!
//! Every call recomputes from raw records; nothing is cached. That is
//! fine at the volumes a single shortener sees, and it keeps the two
//! views (per-link detail, global overview) trivially consistent with
//! the store.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};

use crate::analytics::classifier;
use crate::models::{Click, Link};

/// Per-link detail view. No time window: every click the link ever
/// received is counted.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkAnalytics {
    pub link: LinkRef,
    pub total_clicks: u64,
    pub unique_visitors: u64,
    pub clicks_by_date: BTreeMap<String, u64>,
    pub device_breakdown: BTreeMap<String, u64>,
    pub browser_breakdown: BTreeMap<String, u64>,
    pub os_breakdown: BTreeMap<String, u64>,
    pub referrer_breakdown: BTreeMap<String, u64>,
}

/// The link fields exposed alongside analytics. `short_url` carries the
/// bare code, not the fully-qualified URL.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkRef {
    pub short_url: String,
    pub original_url: String,
}

/// Global overview across all links, windowed to the last 30 days by
/// the caller (the per-link detail view deliberately is not — the two
/// stay distinct operations).
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalAnalytics {
    pub total_clicks: u64,
    pub unique_visitors: u64,
    pub clicks_by_date: BTreeMap<String, u64>,
    pub device_breakdown: BTreeMap<String, u64>,
    pub country_breakdown: BTreeMap<String, u64>,
    pub referrer_breakdown: BTreeMap<String, u64>,
    pub links: Vec<LinkStats>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStats {
    pub short_url: String,
    pub original_url: String,
    pub total_clicks: u64,
    pub unique_visitors: u64,
    /// UTC creation date, `YYYY-MM-DD`.
    pub created_at: String,
}

/// UTC calendar date of a Unix timestamp.
fn utc_date(ts: i64) -> String {
    chrono::DateTime::from_timestamp(ts, 0)
        .unwrap_or_default()
        .format("%Y-%m-%d")
        .to_string()
}

fn bump(map: &mut BTreeMap<String, u64>, key: impl Into<String>) {
    *map.entry(key.into()).or_insert(0) += 1;
}

/// Compute the detail view for one link from all of its clicks.
///
/// Unique visitors count distinct present IPs. Missing referrers bucket
/// as `Direct`; missing device/browser labels bucket as `Unknown`. The
/// OS breakdown is re-derived from the stored raw user-agent.
pub fn aggregate_link(link: &Link, clicks: &[Click]) -> LinkAnalytics {
    let mut clicks_by_date = BTreeMap::new();
    let mut device_breakdown = BTreeMap::new();
    let mut browser_breakdown = BTreeMap::new();
    let mut os_breakdown = BTreeMap::new();
    let mut referrer_breakdown = BTreeMap::new();
    let mut ips = HashSet::new();

    for click in clicks {
        if let Some(ip) = click.ip.as_deref().filter(|ip| !ip.is_empty()) {
            ips.insert(ip);
        }

        bump(&mut clicks_by_date, utc_date(click.created_at));

        let device = if click.device.is_empty() { "Unknown" } else { &click.device };
        bump(&mut device_breakdown, device);

        let browser = if click.browser.is_empty() { "Unknown" } else { &click.browser };
        bump(&mut browser_breakdown, browser);

        bump(&mut os_breakdown, classifier::os(&click.user_agent));

        let referrer = if click.referrer.is_empty() { "Direct" } else { &click.referrer };
        bump(&mut referrer_breakdown, referrer);
    }

    LinkAnalytics {
        link: LinkRef {
            short_url: link.short_code.clone(),
            original_url: link.original_url.clone(),
        },
        total_clicks: clicks.len() as u64,
        unique_visitors: ips.len() as u64,
        clicks_by_date,
        device_breakdown,
        browser_breakdown,
        os_breakdown,
        referrer_breakdown,
    }
}

/// Compute the global overview. `clicks` must already be filtered to
/// the reporting window by the caller.
///
/// Unlike the detail view, rows with a missing device, referrer, or
/// country simply do not contribute to that breakdown.
pub fn aggregate_global(links: &[Link], clicks: &[Click]) -> GlobalAnalytics {
    let mut clicks_by_date = BTreeMap::new();
    let mut device_breakdown = BTreeMap::new();
    let mut country_breakdown = BTreeMap::new();
    let mut referrer_breakdown = BTreeMap::new();
    let mut all_ips = HashSet::new();

    // link_id -> (click count, distinct IPs)
    let mut per_link: HashMap<i64, (u64, HashSet<&str>)> = HashMap::new();

    for click in clicks {
        let entry = per_link.entry(click.link_id).or_default();
        entry.0 += 1;

        if let Some(ip) = click.ip.as_deref().filter(|ip| !ip.is_empty()) {
            entry.1.insert(ip);
            all_ips.insert(ip);
        }

        bump(&mut clicks_by_date, utc_date(click.created_at));

        if !click.device.is_empty() {
            bump(&mut device_breakdown, click.device.as_str());
        }
        if !click.referrer.is_empty() {
            bump(&mut referrer_breakdown, click.referrer.as_str());
        }
        if let Some(country) = click.country.as_deref().filter(|c| !c.is_empty()) {
            bump(&mut country_breakdown, country);
        }
    }

    let link_stats = links
        .iter()
        .map(|link| {
            let (total, ips) = per_link.remove(&link.id).unwrap_or_default();
            LinkStats {
                short_url: link.short_code.clone(),
                original_url: link.original_url.clone(),
                total_clicks: total,
                unique_visitors: ips.len() as u64,
                created_at: utc_date(link.created_at),
            }
        })
        .collect();

    GlobalAnalytics {
        total_clicks: clicks.len() as u64,
        unique_visitors: all_ips.len() as u64,
        clicks_by_date,
        device_breakdown,
        country_breakdown,
        referrer_breakdown,
        links: link_stats,
    }
}
