//! Route performance and booking dashboard reports

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::reference::{
    ReferenceItem, STATUS_DELIVERED, STATUS_IN_TRANSIT, STATUS_PENDING, STATUS_PROCESSING,
};

/// Efficiency score an order contributes, by status name.
///
/// Delivered 100, In Transit 75, Pending/Processing 50, anything else 25.
pub fn efficiency_score(status: &str) -> Decimal {
    match status {
        STATUS_DELIVERED => Decimal::from(100),
        STATUS_IN_TRANSIT => Decimal::from(75),
        STATUS_PENDING | STATUS_PROCESSING => Decimal::from(50),
        _ => Decimal::from(25),
    }
}

/// Order count for one route, status, and (optionally) day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusCount {
    pub date: Option<NaiveDate>,
    pub route_id: i32,
    pub status: String,
    pub orders: i64,
}

#[derive(Debug, Clone, Default)]
struct Tally {
    orders: i64,
    score: Decimal,
    delivered: i64,
    in_transit: i64,
    pending: i64,
}

impl Tally {
    fn add(&mut self, status: &str, orders: i64) {
        self.orders += orders;
        self.score += efficiency_score(status) * Decimal::from(orders);
        match status {
            STATUS_DELIVERED => self.delivered += orders,
            STATUS_IN_TRANSIT => self.in_transit += orders,
            STATUS_PENDING | STATUS_PROCESSING => self.pending += orders,
            _ => {}
        }
    }

    /// Average score, one decimal place; zero when there are no orders
    fn efficiency(&self) -> Decimal {
        if self.orders == 0 {
            Decimal::ZERO
        } else {
            (self.score / Decimal::from(self.orders)).round_dp(1)
        }
    }
}

/// One route's figures on one day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RoutePerformance {
    pub route: String,
    pub deliveries: i64,
    pub efficiency: Decimal,
}

/// All routes on one day
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyRoutePerformance {
    pub date: NaiveDate,
    pub routes: Vec<RoutePerformance>,
}

/// Per-day deliveries and efficiency for a single route
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub deliveries: i64,
    pub efficiency: Decimal,
}

/// Lifetime figures for a route
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RouteStats {
    pub id: i32,
    pub name: String,
    pub total_orders: i64,
    pub delivered_orders: i64,
    pub in_transit_orders: i64,
    pub pending_orders: i64,
    pub efficiency: Decimal,
}

/// Build the per-day report. Every day present in `counts` lists every
/// route, sorted by name; routes without orders that day report zeros.
pub fn summarize_route_performance(
    routes: &[ReferenceItem],
    counts: &[StatusCount],
) -> Vec<DailyRoutePerformance> {
    let mut tallies: HashMap<(NaiveDate, i32), Tally> = HashMap::new();
    let mut dates = BTreeSet::new();

    for count in counts {
        let Some(date) = count.date else { continue };
        dates.insert(date);
        tallies
            .entry((date, count.route_id))
            .or_default()
            .add(&count.status, count.orders);
    }

    dates
        .into_iter()
        .map(|date| {
            let mut day: Vec<RoutePerformance> = routes
                .iter()
                .map(|route| match tallies.get(&(date, route.id)) {
                    Some(tally) => RoutePerformance {
                        route: route.name.clone(),
                        deliveries: tally.orders,
                        efficiency: tally.efficiency(),
                    },
                    None => RoutePerformance {
                        route: route.name.clone(),
                        deliveries: 0,
                        efficiency: Decimal::ZERO,
                    },
                })
                .collect();
            day.sort_by(|a, b| a.route.cmp(&b.route));
            DailyRoutePerformance { date, routes: day }
        })
        .collect()
}

/// Daily trend for one route; `counts` should already be filtered to it
pub fn summarize_trend(counts: &[StatusCount]) -> Vec<TrendPoint> {
    let mut by_date: BTreeMap<NaiveDate, Tally> = BTreeMap::new();
    for count in counts {
        if let Some(date) = count.date {
            by_date.entry(date).or_default().add(&count.status, count.orders);
        }
    }

    by_date
        .into_iter()
        .map(|(date, tally)| TrendPoint {
            date,
            deliveries: tally.orders,
            efficiency: tally.efficiency(),
        })
        .collect()
}

/// Per-route totals ordered by efficiency, best first
pub fn summarize_route_stats(routes: &[ReferenceItem], counts: &[StatusCount]) -> Vec<RouteStats> {
    let mut tallies: HashMap<i32, Tally> = HashMap::new();
    for count in counts {
        tallies
            .entry(count.route_id)
            .or_default()
            .add(&count.status, count.orders);
    }

    let mut stats: Vec<RouteStats> = routes
        .iter()
        .map(|route| {
            let tally = tallies.remove(&route.id).unwrap_or_default();
            RouteStats {
                id: route.id,
                name: route.name.clone(),
                total_orders: tally.orders,
                delivered_orders: tally.delivered,
                in_transit_orders: tally.in_transit,
                pending_orders: tally.pending,
                efficiency: tally.efficiency(),
            }
        })
        .collect();

    stats.sort_by(|a, b| b.efficiency.cmp(&a.efficiency).then(a.name.cmp(&b.name)));
    stats
}

/// Orders per status, for the booking status panel
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusSummary {
    pub status: String,
    pub color: Option<String>,
    pub orders: i64,
}

/// Admin dashboard headline figures
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_orders: i64,
    pub by_status: Vec<StatusSummary>,
    pub total_charges: Decimal,
}
