//! Reward offers for the break between focus segments.
//!
//! A reward is a (site, minutes) pair drawn from the cross product of the
//! site list and the interval ladder `{5, 10, ..., 30}`. Combinations shown
//! before are avoided until every combination has been shown once.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const REWARD_TIME_INTERVAL: u32 = 5;
pub const MAX_REWARD_TIME: u32 = 30;
pub const REWARD_OFFER_COUNT: usize = 3;

/// A break activity offered to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    /// Opaque id for list diffing. Not an identity: never compare on it.
    pub id: String,
    pub site: String,
    pub minutes: u32,
    pub seconds: u64,
}

impl Reward {
    pub fn combination_key(&self) -> String {
        combination_key(&self.site, self.minutes)
    }
}

pub fn combination_key(site: &str, minutes: u32) -> String {
    format!("{site}|{minutes}")
}

/// Supplier of reward site candidates, re-queried on every generation.
pub trait SiteSource {
    fn sites(&self) -> Vec<String>;
}

impl SiteSource for Vec<String> {
    fn sites(&self) -> Vec<String> {
        self.clone()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardGenerator {
    interval_minutes: u32,
    max_minutes: u32,
}

impl Default for RewardGenerator {
    fn default() -> Self {
        Self::new(REWARD_TIME_INTERVAL, MAX_REWARD_TIME)
    }
}

impl RewardGenerator {
    /// A zero interval is treated as the default ladder step.
    pub fn new(interval_minutes: u32, max_minutes: u32) -> Self {
        let interval_minutes = if interval_minutes == 0 {
            REWARD_TIME_INTERVAL
        } else {
            interval_minutes
        };
        Self {
            interval_minutes,
            max_minutes,
        }
    }

    /// Every minute value on the ladder.
    pub fn intervals(&self) -> impl Iterator<Item = u32> + '_ {
        let steps = self.max_minutes / self.interval_minutes;
        (1..=steps).map(move |i| i * self.interval_minutes)
    }

    pub fn all_combinations(&self, sites: &[String]) -> Vec<(String, u32)> {
        sites
            .iter()
            .flat_map(|site| self.intervals().map(move |m| (site.clone(), m)))
            .collect()
    }

    /// Pick one reward, preferring combinations not in `shown`.
    ///
    /// Returns `None` only when there is nothing to pick from (no sites, or
    /// an empty interval ladder).
    pub fn generate_one<R: Rng + ?Sized>(
        &self,
        sites: &[String],
        shown: &BTreeSet<String>,
        rng: &mut R,
        now_ms: i64,
    ) -> Option<Reward> {
        let all = self.all_combinations(sites);
        let fresh: Vec<&(String, u32)> = all
            .iter()
            .filter(|(site, minutes)| !shown.contains(&combination_key(site, *minutes)))
            .collect();

        let (site, minutes) = if fresh.is_empty() {
            all.choose(rng)?
        } else {
            *fresh.choose(rng)?
        };

        Some(Reward {
            id: format!("{site}-{now_ms}-{}", Uuid::new_v4().simple()),
            site: site.clone(),
            minutes: *minutes,
            seconds: u64::from(*minutes) * 60,
        })
    }

    /// Pick up to `count` rewards. Each pick is recorded in `shown` before
    /// the next, so a batch never repeats itself while fresh pairs remain.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        sites: &[String],
        count: usize,
        shown: &mut BTreeSet<String>,
        rng: &mut R,
        now_ms: i64,
    ) -> Vec<Reward> {
        let mut rewards = Vec::with_capacity(count);
        for _ in 0..count {
            match self.generate_one(sites, shown, rng, now_ms) {
                Some(reward) => {
                    shown.insert(reward.combination_key());
                    rewards.push(reward);
                }
                None => break,
            }
        }
        rewards
    }
}
